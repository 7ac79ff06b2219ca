/*
 * field_list.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reader for directive option blocks written as field lists.
 */

//! Field-list option blocks.
//!
//! Directive options are written as a field list directly under the directive:
//!
//! ```text
//! :caption: Title for the general case
//! :caption:html:html: Title for the html builder
//! :maxdepth: 2
//! :hidden:
//! ```
//!
//! A field name runs from the leading `:` to the first `:` that is followed by
//! spaces or the end of the line, so scoped names like `caption::html` are
//! read whole. Indented lines continue the previous field's body; blank lines
//! separate paragraphs. Field names are case-insensitive.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{OptionError, OptionResult};
use crate::key::CandidatePair;

/// Field marker: `:name:` followed by spaces or the end of the line.
///
/// A colon inside the name must not be followed by a space or backtick, and a
/// backslash escapes the next character. The name may not start with `:` or a
/// space, or end with a space; those rules need look-around and are checked in
/// [`split_field_marker`].
static FIELD_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:((?:[^:\\]|\\.|:+(?:[^: `\\]|\\.))*:*):(?: +|$)")
        .expect("Invalid regex pattern for field marker")
});

/// One field read from an option block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name exactly as written, without the enclosing colons
    pub name: String,
    /// Body paragraphs, each dedented and joined with newlines
    pub paragraphs: Vec<String>,
}

/// What a reader made of an option block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockScan {
    pub fields: Vec<Field>,
    /// Number of lines consumed from the start of the block
    pub consumed: usize,
    /// False if reading stopped without a blank line or end of input after the
    /// last field
    pub clean_finish: bool,
}

/// Turns the raw lines of an option block into fields.
///
/// This is the seam where a host plugs in its own markup reader.
pub trait OptionBlockReader {
    fn read(&self, lines: &[&str]) -> BlockScan;
}

/// Reader for reStructuredText-style field lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldListReader;

impl OptionBlockReader for FieldListReader {
    fn read(&self, lines: &[&str]) -> BlockScan {
        let mut scan = BlockScan {
            clean_finish: true,
            ..Default::default()
        };
        let mut current: Option<PendingField> = None;
        let mut last_blank = true;

        for (index, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                if let Some(field) = current.as_mut() {
                    field.lines.push(String::new());
                }
                last_blank = true;
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                if let Some(field) = current.as_mut() {
                    field.lines.push((*line).to_string());
                    last_blank = false;
                    continue;
                }
                // Indented text with no field to attach to.
                scan.consumed = index;
                scan.clean_finish = last_blank;
                return scan;
            }

            match split_field_marker(line) {
                Some((name, rest)) => {
                    if let Some(field) = current.take() {
                        scan.fields.push(field.finish());
                    }
                    current = Some(PendingField::new(name, rest));
                    last_blank = false;
                }
                None => {
                    if let Some(field) = current.take() {
                        scan.fields.push(field.finish());
                    }
                    scan.consumed = index;
                    scan.clean_finish = last_blank;
                    return scan;
                }
            }
        }

        if let Some(field) = current.take() {
            scan.fields.push(field.finish());
        }
        scan.consumed = lines.len();
        scan
    }
}

struct PendingField {
    name: String,
    first: String,
    lines: Vec<String>,
}

impl PendingField {
    fn new(name: &str, first: &str) -> Self {
        Self {
            name: name.to_string(),
            first: first.trim().to_string(),
            lines: Vec::new(),
        }
    }

    fn finish(self) -> Field {
        let indent = self
            .lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);

        let mut body: Vec<&str> = Vec::with_capacity(self.lines.len() + 1);
        if !self.first.is_empty() {
            body.push(&self.first);
        }
        for l in &self.lines {
            if l.trim().is_empty() {
                body.push("");
            } else {
                body.push(l.get(indent..).unwrap_or(l.trim_start()).trim_end());
            }
        }

        let paragraphs = body
            .split(|l| l.is_empty())
            .filter(|p| !p.is_empty())
            .map(|p| p.join("\n"))
            .collect();

        Field {
            name: self.name,
            paragraphs,
        }
    }
}

/// Split `:name: rest` into `(name, rest)`.
fn split_field_marker(line: &str) -> Option<(&str, &str)> {
    let caps = FIELD_MARKER.captures(line)?;
    let name = caps.get(1)?.as_str();
    if name.is_empty() || name.starts_with([':', ' ']) || name.ends_with(' ') {
        return None;
    }
    let marker = caps.get(0)?;
    Some((name, &line[marker.end()..]))
}

/// Turn fields into `(key, value)` candidates. Keys are lower-cased.
///
/// # Errors
///
/// [`OptionError::InvalidOptionData`] if a field name contains whitespace or a
/// body has more than one paragraph.
pub fn extract_candidates(fields: &[Field]) -> OptionResult<Vec<CandidatePair>> {
    fields
        .iter()
        .map(|field| {
            if field.name.split_whitespace().count() != 1 {
                return Err(OptionError::InvalidOptionData {
                    reason: "extension option field name may not contain multiple words"
                        .to_string(),
                });
            }
            let name = field.name.to_lowercase();
            let value = match field.paragraphs.as_slice() {
                [] => None,
                [single] => Some(single.clone()),
                _ => {
                    return Err(OptionError::InvalidOptionData {
                        reason: format!(
                            "extension option field body may contain\na single paragraph only (option \"{}\")",
                            name
                        ),
                    });
                }
            };
            Ok(CandidatePair::new(name, value))
        })
        .collect()
}
