//! Parser and renderer settings.

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfig {
    /// Maximum handler nesting before parsing fails with a recursion error.
    pub max_depth: usize,
}

impl ParserConfig {
    /// Default nesting limit.
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    /// Returns the config with a different nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Emit keywords in upper case.
    pub uppercase_keywords: bool,
}

impl RenderConfig {
    /// Returns the config with a different indentation width.
    #[must_use]
    pub const fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Returns the config with keyword casing switched.
    #[must_use]
    pub const fn with_uppercase_keywords(mut self, uppercase: bool) -> Self {
        self.uppercase_keywords = uppercase;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            uppercase_keywords: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ParserConfig::default().max_depth, 256);
        let render = RenderConfig::default();
        assert_eq!(render.indent_width, 2);
        assert!(render.uppercase_keywords);
    }

    #[test]
    fn test_builders() {
        assert_eq!(ParserConfig::default().with_max_depth(8).max_depth, 8);
        let render = RenderConfig::default()
            .with_indent_width(4)
            .with_uppercase_keywords(false);
        assert_eq!(render.indent_width, 4);
        assert!(!render.uppercase_keywords);
    }
}
