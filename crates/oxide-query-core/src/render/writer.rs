//! Text output with indentation and fragment capture.

use crate::config::RenderConfig;

/// Rendered text that has not been placed yet.
///
/// Fragments are produced by rendering into a scratch writer at indentation
/// zero; [`SqlWriter::write_fragment`] re-indents them at the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    text: String,
}

impl Fragment {
    /// The captured text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if the fragment spans several lines.
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        self.text.contains('\n')
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Accumulates SQL text.
///
/// Indentation is a stack of levels applied at the start of every line.
/// Inside [`SqlWriter::inline`] line breaks collapse to single spaces, which
/// is how subqueries in value positions stay on one line.
#[derive(Debug, Clone)]
pub struct SqlWriter {
    buf: String,
    indent_width: usize,
    indents: Vec<usize>,
    suppress: usize,
    pending_space: bool,
    uppercase: bool,
}

impl SqlWriter {
    /// Creates an empty writer.
    #[must_use]
    pub const fn new(config: &RenderConfig) -> Self {
        Self {
            buf: String::new(),
            indent_width: config.indent_width,
            indents: Vec::new(),
            suppress: 0,
            pending_space: false,
            uppercase: config.uppercase_keywords,
        }
    }

    /// An empty writer with the same settings, used to capture fragments.
    #[must_use]
    pub const fn scratch(&self) -> Self {
        Self {
            buf: String::new(),
            indent_width: self.indent_width,
            indents: Vec::new(),
            suppress: self.suppress,
            pending_space: false,
            uppercase: self.uppercase,
        }
    }

    /// Current indentation in columns.
    #[must_use]
    pub fn indentation(&self) -> usize {
        self.indents.last().copied().unwrap_or(0)
    }

    /// Returns true while line breaks are suppressed.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        self.suppress > 0
    }

    fn at_line_start(&self) -> bool {
        self.buf.is_empty() || self.buf.ends_with('\n')
    }

    /// Appends text verbatim, indenting first if a line is starting.
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.pending_space {
            self.pending_space = false;
            if !self.buf.ends_with('(') && !text.starts_with([' ', ')']) && !self.at_line_start() {
                self.buf.push(' ');
            }
        }
        if self.at_line_start() {
            let width = self.indentation();
            self.buf.push_str(&" ".repeat(width));
        }
        self.buf.push_str(text);
    }

    /// Appends a keyword in the configured case.
    pub fn keyword(&mut self, keyword: &str) {
        if self.uppercase {
            self.append(keyword);
        } else {
            self.append(&keyword.to_lowercase());
        }
    }

    /// Appends a single space.
    pub fn space(&mut self) {
        self.append(" ");
    }

    /// Starts a new line, or separates with a space when inline.
    pub fn newline(&mut self) {
        if self.suppress > 0 {
            self.pending_space = true;
        } else if !self.at_line_start() {
            self.buf.push('\n');
        }
    }

    /// Pushes one indentation level.
    pub fn indent(&mut self) {
        let next = self.indentation() + self.indent_width;
        self.indents.push(next);
    }

    /// Pops one indentation level.
    pub fn outdent(&mut self) {
        self.indents.pop();
    }

    /// Runs `f` with line breaks suppressed.
    pub fn inline<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.suppress += 1;
        let out = f(self);
        self.suppress -= 1;
        out
    }

    /// Runs `f` one indentation level deeper.
    pub fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.indent();
        let out = f(self);
        self.outdent();
        out
    }

    /// Writes `items` separated by `", "`.
    ///
    /// # Errors
    ///
    /// Stops at the first item that fails.
    pub fn comma_join<T, E>(
        &mut self,
        items: &[T],
        mut item: impl FnMut(&T, &mut Self) -> Result<(), E>,
    ) -> Result<(), E> {
        for (i, value) in items.iter().enumerate() {
            if i > 0 {
                self.append(", ");
            }
            item(value, self)?;
        }
        Ok(())
    }

    /// Renders into a scratch writer and returns what it produced.
    ///
    /// # Errors
    ///
    /// Propagates the error of `f`.
    pub fn capture<E>(&self, f: impl FnOnce(&mut Self) -> Result<(), E>) -> Result<Fragment, E> {
        let mut scratch = self.scratch();
        f(&mut scratch)?;
        Ok(scratch.into_fragment())
    }

    /// Places a captured fragment at the current position, indenting each of
    /// its lines to the current level.
    pub fn write_fragment(&mut self, fragment: &Fragment) {
        for (i, line) in fragment.text.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            if self.suppress > 0 {
                self.append(line.trim_start());
            } else {
                let depth = line.len() - line.trim_start().len();
                self.indents.push(self.indentation() + depth);
                self.append(line.trim_start());
                self.indents.pop();
            }
        }
    }

    /// Converts the writer into a fragment.
    #[must_use]
    pub fn into_fragment(self) -> Fragment {
        Fragment { text: self.buf }
    }

    /// Returns the rendered text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }
}
