/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Resolve command implementation
 */

//! Resolve command implementation.
//!
//! Reads one directive option block, resolves it for the given builder and
//! format, and prints the resulting options as JSON. A failed block is
//! reported on stderr with its title, diagnostic code and a non-zero exit
//! status.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::debug;

use quarto_option_specs::{BlockOutcome, ContextHolder, OptionBlockHandler, ScopedOptionBlock};

/// Arguments for the resolve command
#[derive(Debug)]
pub struct ResolveArgs {
    /// File holding the option block, or stdin
    pub input: Option<PathBuf>,
    pub builder: String,
    pub format: String,
    pub directive: String,
    /// Explicit option tables file
    pub config: Option<PathBuf>,
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs) -> Result<()> {
    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read option block from stdin")?;
            buf
        }
    };

    let search_from = match args.input.as_ref().and_then(|p| p.parent()) {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let tables = super::load_tables(args.config.as_deref(), &search_from)?;
    let table = tables.table(&args.directive)?;

    let holder = ContextHolder::new();
    if !args.builder.is_empty() || !args.format.is_empty() {
        holder.set(args.builder.as_str(), args.format.as_str());
    }
    let ctx = holder.get();

    let block = dedent_block(&text);
    let lines: Vec<&str> = block.iter().map(String::as_str).collect();
    debug!(lines = lines.len(), directive = %args.directive, "Resolving option block");

    let outcome = BlockOutcome::from(ScopedOptionBlock::new().parse_options(&lines, &table, &ctx));
    match outcome {
        BlockOutcome::Resolved { options } => {
            println!("{}", serde_json::to_string_pretty(&options)?);
            Ok(())
        }
        BlockOutcome::Failed {
            code,
            title,
            message,
        } => {
            bail!("{} [{}] {}", title, code, message)
        }
    }
}

/// Strip the common indentation from a block and drop leading/trailing blank
/// lines, so an option block copied from under a directive reads as-is.
fn dedent_block(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    let body = &lines[start..end];

    let indent = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    body.iter()
        .map(|l| l.get(indent..).unwrap_or_else(|| l.trim_start()).to_string())
        .collect()
}
