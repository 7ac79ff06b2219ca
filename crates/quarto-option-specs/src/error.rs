/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for option resolution and option-table configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported for one directive's option block.
///
/// All of these are local to the directive. The host decides whether to keep
/// building after reporting one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// The base name is not in the conversion table, or is disabled.
    #[error("unknown option: \"{key}\"")]
    UnknownOption { key: String },

    /// The same qualified key was declared twice at the winning weight.
    #[error("duplicate option \"{key}\"")]
    DuplicateOption { key: String },

    /// Two different qualified keys for one option tied at the winning weight.
    #[error("duplicate options \"{key}\" and \"{previous}\"")]
    ConflictingOptions { key: String, previous: String },

    /// The option's converter rejected the raw value.
    #[error("invalid option value: (option: \"{key}\"; value: {})\n{reason}", display_raw(.value))]
    InvalidOptionValue {
        key: String,
        value: Option<String>,
        reason: String,
    },

    /// A field could not be turned into a `(key, value)` pair.
    #[error("invalid option data: {reason}")]
    InvalidOptionData { reason: String },

    /// The block reader stopped before the end of the block.
    #[error("invalid option block")]
    IncompleteBlock,

    /// The block did not finish on a clean field boundary.
    #[error("option data incompletely parsed")]
    IncompletelyParsed,
}

impl OptionError {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            OptionError::UnknownOption { .. } => "Q-15-1",
            OptionError::DuplicateOption { .. } => "Q-15-2",
            OptionError::ConflictingOptions { .. } => "Q-15-3",
            OptionError::InvalidOptionValue { .. } => "Q-15-4",
            OptionError::InvalidOptionData { .. } => "Q-15-5",
            OptionError::IncompleteBlock => "Q-15-6",
            OptionError::IncompletelyParsed => "Q-15-7",
        }
    }

    /// Short title, suitable for a diagnostic heading.
    pub fn title(&self) -> &'static str {
        match self {
            OptionError::UnknownOption { .. } => "Unknown Directive Option",
            OptionError::DuplicateOption { .. } => "Duplicate Directive Option",
            OptionError::ConflictingOptions { .. } => "Conflicting Directive Options",
            OptionError::InvalidOptionValue { .. } => "Invalid Directive Option Value",
            OptionError::InvalidOptionData { .. } => "Invalid Directive Option Data",
            OptionError::IncompleteBlock => "Invalid Option Block",
            OptionError::IncompletelyParsed => "Incomplete Option Block",
        }
    }

    /// True for failures detected before resolution ran.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            OptionError::IncompleteBlock | OptionError::IncompletelyParsed
        )
    }
}

/// Render a raw value the way it appears in diagnostics, or `None`.
///
/// Single quotes are used unless the value contains a single quote and no
/// double quote, in which case the value is double-quoted unescaped.
fn display_raw(value: &Option<String>) -> String {
    let Some(value) = value else {
        return "None".to_string();
    };

    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Result type for option resolution.
pub type OptionResult<T> = Result<T, OptionError>;

/// Errors loading option tables from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read option tables from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse option tables: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown converter '{kind}' for option '{option}' of directive '{directive}'")]
    UnknownConverter {
        directive: String,
        option: String,
        kind: String,
    },

    #[error("no option table for directive '{0}'")]
    UnknownDirective(String),
}
