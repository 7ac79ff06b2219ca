//! Weigh command: show how each key scores against a build target.

use anyhow::Result;

use quarto_option_specs::{BuildContext, QualifiedOptionKey, Specificity};

/// Execute the weigh command
pub fn execute(keys: &[String], builder: &str, format: &str) -> Result<()> {
    let ctx = BuildContext::new(builder, format);
    for line in weigh_keys(keys, &ctx) {
        println!("{}", line);
    }
    Ok(())
}

fn weigh_keys(keys: &[String], ctx: &BuildContext) -> Vec<String> {
    let width = keys.iter().map(String::len).max().unwrap_or(0);
    keys.iter()
        .map(|raw| {
            let key = QualifiedOptionKey::parse(raw.as_str());
            let specificity = Specificity::score(&key, ctx);
            format!("{:<width$}  {}", raw, specificity, width = width)
        })
        .collect()
}
