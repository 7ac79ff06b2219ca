//! Tables command: list directives and the converters of their options.

use std::path::Path;

use anyhow::{Context, Result};

use quarto_option_specs::OptionTablesConfig;

/// Execute the tables command
pub fn execute(config: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let tables = super::load_tables(config, &cwd)?;
    print!("{}", describe(&tables));
    Ok(())
}

fn describe(tables: &OptionTablesConfig) -> String {
    let mut out = String::new();
    for (directive, options) in &tables.directives {
        out.push_str(directive);
        out.push('\n');
        let width = options.keys().map(String::len).max().unwrap_or(0);
        for (name, spec) in options {
            out.push_str(&format!("  {:<width$}  {}", name, spec.kind(), width = width));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let tables = OptionTablesConfig::from_yaml_str(
            "directives:\n  toctree:\n    caption: unchanged\n    maxdepth: int\n    numbered: disabled\n",
        )
        .unwrap();
        assert_eq!(
            describe(&tables),
            "toctree\n  caption   unchanged\n  maxdepth  int\n  numbered  disabled\n"
        );
    }
}
