/*
 * specificity.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Specificity scoring for qualified option keys.
 */

//! Specificity scoring.
//!
//! | key form               | weight |
//! |------------------------|--------|
//! | `name`                 | 1      |
//! | `name::format`         | 11     |
//! | `name:builder`         | 101    |
//! | `name:builder:format`  | 111    |
//!
//! A scope that disagrees with the active context rejects the key outright.

use std::fmt;

use crate::context::BuildContext;
use crate::key::QualifiedOptionKey;

/// Weight of a key with no scopes.
pub const BASE_WEIGHT: u32 = 1;
/// Added when the builder scope matches the active builder.
pub const BUILDER_WEIGHT: u32 = 100;
/// Added when the format scope matches the active format.
pub const FORMAT_WEIGHT: u32 = 10;

/// Outcome of scoring one key against a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specificity {
    /// A scope disagreed with the context; the key does not apply.
    Rejected,
    /// The key applies with the given weight.
    Weight(u32),
}

impl Specificity {
    /// Score `key` against `ctx`.
    pub fn score(key: &QualifiedOptionKey, ctx: &BuildContext) -> Self {
        let mut weight = BASE_WEIGHT;

        if let Some(builder) = key.builder_scope() {
            if builder != ctx.builder {
                return Self::Rejected;
            }
            weight += BUILDER_WEIGHT;
        }

        if let Some(format) = key.format_scope() {
            if format != ctx.format {
                return Self::Rejected;
            }
            weight += FORMAT_WEIGHT;
        }

        Self::Weight(weight)
    }

    /// The weight, or `None` if rejected.
    pub fn weight(self) -> Option<u32> {
        match self {
            Self::Rejected => None,
            Self::Weight(w) => Some(w),
        }
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected => f.write_str("rejected"),
            Self::Weight(w) => write!(f, "{}", w),
        }
    }
}
