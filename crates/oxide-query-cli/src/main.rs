//! oxq CLI
//!
//! Parses SQL in one dialect and renders it in another. With the same
//! dialect on both sides it reformats; with `--emit ast` it prints the
//! parsed tree as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_query_core::ast::{Expr, Predicate, Query};
use oxide_query_core::{DialectCatalog, ParserConfig, RenderConfig, SqlDialect};

/// Bidirectional SQL transpiler.
#[derive(Parser, Debug)]
#[command(name = "oxq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dialect of the input.
    #[arg(short, long, env = "OXQ_FROM", default_value = "ansi")]
    from: String,

    /// Dialect of the output.
    #[arg(short, long, env = "OXQ_TO", default_value = "ansi")]
    to: String,

    /// What the input is.
    #[arg(short, long, value_enum, default_value_t = Kind::Query)]
    kind: Kind,

    /// What to print.
    #[arg(short, long, value_enum, default_value_t = Emit::Sql)]
    emit: Emit,

    /// Spaces per indentation level.
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Write keywords in lower case.
    #[arg(long)]
    lowercase: bool,

    /// Maximum nesting depth accepted by the parser.
    #[arg(long, default_value_t = 256)]
    max_depth: usize,

    /// List the known dialects and exit.
    #[arg(long)]
    list_dialects: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// SQL file to read (stdin if not specified).
    file: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    /// A full query.
    Query,
    /// A search condition.
    Predicate,
    /// A scalar expression.
    Expr,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Emit {
    /// SQL text in the target dialect.
    Sql,
    /// The parsed tree as JSON.
    Ast,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no SQL to read")]
    EmptyInput,
}

/// A parsed input of any kind.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Tree {
    Query(Query),
    Predicate(Predicate),
    Expr(Expr),
}

impl Tree {
    fn parse(dialect: &SqlDialect, kind: Kind, sql: &str) -> anyhow::Result<Self> {
        let tree = match kind {
            Kind::Query => Self::Query(dialect.parse_query(sql)?),
            Kind::Predicate => Self::Predicate(dialect.parse_predicate(sql)?),
            Kind::Expr => Self::Expr(dialect.parse_expr(sql)?),
        };
        Ok(tree)
    }

    fn render(&self, dialect: &SqlDialect) -> anyhow::Result<String> {
        let sql = match self {
            Self::Query(query) => dialect.render(query)?,
            Self::Predicate(predicate) => dialect.render(predicate)?,
            Self::Expr(expr) => dialect.render(expr)?,
        };
        Ok(sql)
    }
}

fn catalog() -> DialectCatalog {
    let mut catalog = DialectCatalog::new();
    oxide_query_postgres::register(&mut catalog);
    catalog
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    let sql = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    if sql.trim().is_empty() {
        return Err(CliError::EmptyInput.into());
    }
    Ok(sql)
}

/// Runs one conversion and returns the text to print.
fn run(cli: &Cli, catalog: &DialectCatalog, sql: &str) -> anyhow::Result<String> {
    let source = catalog
        .get(&cli.from)?
        .clone()
        .with_parser_config(ParserConfig::default().with_max_depth(cli.max_depth));
    let target = catalog.get(&cli.to)?.clone().with_render_config(
        RenderConfig::default()
            .with_indent_width(cli.indent)
            .with_uppercase_keywords(!cli.lowercase),
    );
    debug!(from = source.name(), to = target.name(), kind = ?cli.kind, "converting");

    let tree = Tree::parse(&source, cli.kind, sql)
        .with_context(|| format!("failed to parse {} input", source.name()))?;
    match cli.emit {
        Emit::Ast => Ok(serde_json::to_string_pretty(&tree)?),
        Emit::Sql => tree
            .render(&target)
            .with_context(|| format!("failed to render for {}", target.name())),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let catalog = catalog();
    if cli.list_dialects {
        for name in catalog.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let sql = read_input(cli.file.as_deref())?;
    let output = run(&cli, &catalog, &sql)?;
    println!("{output}");
    info!(from = %cli.from, to = %cli.to, "done");
    Ok(())
}
