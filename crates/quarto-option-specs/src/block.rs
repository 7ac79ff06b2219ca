/*
 * block.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Option block handling: structural gate, extraction, resolution.
 */

//! Directive option block handling.
//!
//! [`OptionBlockHandler`] is the hook a directive host calls with the raw lines
//! of an option block. [`ScopedOptionBlock`] is the standard handler:
//!
//! 1. read the block into fields; if the reader did not consume every line the
//!    block is rejected before any option is looked at
//! 2. extract `(key, value)` candidates and resolve them against the build
//!    context
//! 3. reject the block if the reader did not finish cleanly
//!
//! [`BlockOutcome`] is the `(success, message)` form handed back to hosts that
//! report errors as text.

use serde::Serialize;

use crate::context::BuildContext;
use crate::convert::ConversionTable;
use crate::error::{OptionError, OptionResult};
use crate::field_list::{FieldListReader, OptionBlockReader, extract_candidates};
use crate::resolve::{ResolvedOptions, resolve_options};

/// Parses and resolves the option block of one directive.
pub trait OptionBlockHandler {
    fn parse_options(
        &self,
        lines: &[&str],
        table: &ConversionTable,
        ctx: &BuildContext,
    ) -> OptionResult<ResolvedOptions>;
}

/// Handler that resolves `name[:builder][:format]` option keys.
#[derive(Debug, Clone, Default)]
pub struct ScopedOptionBlock<R = FieldListReader> {
    reader: R,
}

impl ScopedOptionBlock<FieldListReader> {
    pub fn new() -> Self {
        Self {
            reader: FieldListReader,
        }
    }
}

impl<R: OptionBlockReader> ScopedOptionBlock<R> {
    /// Use a custom block reader.
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: OptionBlockReader> OptionBlockHandler for ScopedOptionBlock<R> {
    fn parse_options(
        &self,
        lines: &[&str],
        table: &ConversionTable,
        ctx: &BuildContext,
    ) -> OptionResult<ResolvedOptions> {
        let scan = self.reader.read(lines);
        if scan.consumed != lines.len() {
            tracing::debug!(
                consumed = scan.consumed,
                total = lines.len(),
                "Option block not fully consumed"
            );
            return Err(OptionError::IncompleteBlock);
        }

        let candidates = extract_candidates(&scan.fields)?;
        let options = resolve_options(&candidates, table, ctx)?;

        if !scan.clean_finish {
            return Err(OptionError::IncompletelyParsed);
        }

        tracing::debug!(
            candidates = candidates.len(),
            resolved = options.len(),
            context = %ctx,
            "Resolved option block"
        );
        Ok(options)
    }
}

/// Host-facing result of handling an option block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BlockOutcome {
    Resolved { options: ResolvedOptions },
    Failed {
        code: &'static str,
        title: &'static str,
        message: String,
    },
}

impl BlockOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BlockOutcome::Resolved { .. })
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            BlockOutcome::Resolved { .. } => None,
            BlockOutcome::Failed { message, .. } => Some(message),
        }
    }

    /// The `(success, message)` pair; the message is empty on success.
    pub fn into_pair(self) -> (bool, String) {
        match self {
            BlockOutcome::Resolved { .. } => (true, String::new()),
            BlockOutcome::Failed { message, .. } => (false, message),
        }
    }
}

impl From<OptionResult<ResolvedOptions>> for BlockOutcome {
    fn from(result: OptionResult<ResolvedOptions>) -> Self {
        match result {
            Ok(options) => BlockOutcome::Resolved { options },
            Err(err) => BlockOutcome::Failed {
                code: err.code(),
                title: err.title(),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{Converter, OptionValue};
    use crate::field_list::{BlockScan, Field};

    fn table() -> ConversionTable {
        ConversionTable::new()
            .with("caption", Converter::Unchanged)
            .with("maxdepth", Converter::Int)
            .with("hidden", Converter::Flag)
    }

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn test_resolves_toctree_block() {
        let block = lines(
            ":caption:           Title for the general case\n\
             :caption:html:html: Title for html\n\
             :caption::html:     Header for other html builders\n\
             :caption:epub:      Header for epub\n\
             :maxdepth: 2\n\
             :hidden:",
        );
        let handler = ScopedOptionBlock::new();

        let html = handler
            .parse_options(&block, &table(), &BuildContext::new("html", "html"))
            .unwrap();
        assert_eq!(html["caption"], OptionValue::Text("Title for html".to_string()));
        assert_eq!(html["maxdepth"], OptionValue::Int(2));
        assert_eq!(html["hidden"], OptionValue::Flag);

        let dirhtml = handler
            .parse_options(&block, &table(), &BuildContext::new("dirhtml", "html"))
            .unwrap();
        assert_eq!(
            dirhtml["caption"],
            OptionValue::Text("Header for other html builders".to_string())
        );

        let latex = handler
            .parse_options(&block, &table(), &BuildContext::new("latex", "latex"))
            .unwrap();
        assert_eq!(
            latex["caption"],
            OptionValue::Text("Title for the general case".to_string())
        );
    }

    #[test]
    fn test_incomplete_block_precedes_resolution() {
        // The unknown option would fail resolution, but the structural error wins.
        let block = lines(":bogus: 1\nstray text");
        let err = ScopedOptionBlock::new()
            .parse_options(&block, &table(), &BuildContext::unset())
            .unwrap_err();
        assert_eq!(err, OptionError::IncompleteBlock);
    }

    struct UncleanReader;

    impl OptionBlockReader for UncleanReader {
        fn read(&self, lines: &[&str]) -> BlockScan {
            BlockScan {
                fields: vec![Field {
                    name: "maxdepth".to_string(),
                    paragraphs: vec!["x".to_string()],
                }],
                consumed: lines.len(),
                clean_finish: false,
            }
        }
    }

    #[test]
    fn test_unclean_finish_reported_after_resolution() {
        let handler = ScopedOptionBlock::with_reader(UncleanReader);

        // Resolution errors are reported first...
        let err = handler
            .parse_options(&["ignored"], &table(), &BuildContext::unset())
            .unwrap_err();
        assert!(matches!(err, OptionError::InvalidOptionValue { .. }));

        // ...and the unclean finish only when resolution succeeded.
        let lenient = ConversionTable::new().with("maxdepth", Converter::Unchanged);
        let err = handler
            .parse_options(&["ignored"], &lenient, &BuildContext::unset())
            .unwrap_err();
        assert_eq!(err, OptionError::IncompletelyParsed);
    }

    #[test]
    fn test_outcome_pairs() {
        let handler = ScopedOptionBlock::new();
        let ctx = BuildContext::new("html", "html");

        let ok: BlockOutcome = handler
            .parse_options(&lines(":caption: Title"), &table(), &ctx)
            .into();
        assert!(ok.is_success());
        assert_eq!(ok.message(), None);
        assert_eq!(ok.into_pair(), (true, String::new()));

        let failed: BlockOutcome = handler
            .parse_options(&lines(":caption:html: a\n:caption:html: b"), &table(), &ctx)
            .into();
        assert!(!failed.is_success());
        assert_eq!(failed.message(), Some("duplicate option \"caption:html\""));
        assert_eq!(
            failed.into_pair(),
            (false, "duplicate option \"caption:html\"".to_string())
        );
    }

    #[test]
    fn test_outcome_serializes_with_status() {
        let outcome = BlockOutcome::from(Err(OptionError::IncompleteBlock));
        insta::assert_snapshot!(
            serde_json::to_string(&outcome).unwrap(),
            @r#"{"status":"failed","code":"Q-15-6","title":"Invalid Option Block","message":"invalid option block"}"#
        );
    }
}
