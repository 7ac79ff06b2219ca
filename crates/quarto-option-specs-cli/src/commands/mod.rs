//! Command implementations for the optionspecs CLI
//!
//! Each command module handles the CLI interface and delegates to
//! quarto-option-specs for the actual work.

pub mod resolve;
pub mod tables;
pub mod weigh;

use std::path::Path;

use anyhow::{Context, Result};
use quarto_option_specs::OptionTablesConfig;
use tracing::{debug, info};

/// Load option tables from `explicit`, else from the nearest
/// `_optionspecs.yml` above `search_from`, else the built-in tables.
pub fn load_tables(explicit: Option<&Path>, search_from: &Path) -> Result<OptionTablesConfig> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "Using option tables");
        return OptionTablesConfig::load(path)
            .with_context(|| format!("Failed to load option tables from {}", path.display()));
    }

    match OptionTablesConfig::discover(search_from)
        .with_context(|| format!("Failed to search for option tables from {}", search_from.display()))?
    {
        Some((path, config)) => {
            info!(path = %path.display(), "Using option tables");
            Ok(config)
        }
        None => {
            debug!("No option tables file found; using built-in tables");
            Ok(OptionTablesConfig::builtin())
        }
    }
}
