//! `stockwise-cli`: presentation shell around the prediction pipeline.
//!
//! Loads a JSON catalog, runs one prediction session and prints the catalog
//! and the recommendation table.

pub mod table;

use std::path::PathBuf;

use anyhow::{Context, bail};

/// Environment variable naming the catalog file when no argument is given.
pub const CATALOG_ENV: &str = "STOCKWISE_CATALOG";

/// Output mode for the result table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub catalog: PathBuf,
    pub output: Output,
}

impl Invocation {
    /// Parse `[--json] [CATALOG]`, falling back to `STOCKWISE_CATALOG`.
    pub fn parse<I>(args: I, env_catalog: Option<String>) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut output = Output::Table;
        let mut catalog: Option<PathBuf> = None;

        for arg in args {
            match arg.as_str() {
                "--json" => output = Output::Json,
                flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
                path if catalog.is_none() => catalog = Some(PathBuf::from(path)),
                extra => bail!("unexpected argument {extra}"),
            }
        }

        let catalog = catalog
            .or_else(|| env_catalog.map(PathBuf::from))
            .with_context(|| format!("no catalog given (pass a path or set {CATALOG_ENV})"))?;

        Ok(Self { catalog, output })
    }
}
