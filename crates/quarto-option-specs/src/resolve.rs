/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Merge scoped option declarations into one value per option.
 */

//! Option resolution.
//!
//! Candidates are visited in declaration order. For each base option the most
//! specific applicable declaration wins:
//!
//! - keys whose scopes disagree with the context are dropped silently
//! - a more specific key replaces a less specific one, in either order
//! - two keys of equal specificity for the same option are an error
//!
//! The whole call fails on the first error; no partial mapping is returned.

use indexmap::IndexMap;

use crate::context::BuildContext;
use crate::convert::{ConversionTable, OptionValue};
use crate::error::{OptionError, OptionResult};
use crate::key::CandidatePair;
use crate::specificity::Specificity;

/// Final mapping from base option name to converted value.
///
/// Options appear in the order their first applicable declaration was seen.
pub type ResolvedOptions = IndexMap<String, OptionValue>;

/// The current winner for one base option.
struct Winner {
    weight: u32,
    key: String,
    value: OptionValue,
}

/// Resolve `candidates` against `table` for the given build context.
///
/// # Errors
///
/// - [`OptionError::UnknownOption`] if any candidate names an option that is
///   missing from `table` or disabled, whatever its scope
/// - [`OptionError::DuplicateOption`] if the same key appears twice at the
///   winning weight
/// - [`OptionError::ConflictingOptions`] if two different keys for the same
///   option tie at the winning weight
/// - [`OptionError::InvalidOptionValue`] if a winning value fails conversion
pub fn resolve_options(
    candidates: &[CandidatePair],
    table: &ConversionTable,
    ctx: &BuildContext,
) -> OptionResult<ResolvedOptions> {
    let mut state: IndexMap<String, Winner> = IndexMap::new();

    for candidate in candidates {
        let key = &candidate.key;
        let Some(converter) = table.converter(key.base_name()) else {
            return Err(OptionError::UnknownOption {
                key: key.as_str().to_string(),
            });
        };

        let Some(weight) = Specificity::score(key, ctx).weight() else {
            tracing::trace!(key = %key, context = %ctx, "Option does not apply to build context");
            continue;
        };

        if let Some(current) = state.get(key.base_name()) {
            if weight < current.weight {
                continue;
            }
            if weight == current.weight {
                return Err(if current.key == key.as_str() {
                    OptionError::DuplicateOption {
                        key: key.as_str().to_string(),
                    }
                } else {
                    OptionError::ConflictingOptions {
                        key: key.as_str().to_string(),
                        previous: current.key.clone(),
                    }
                });
            }
        }

        let value = converter
            .convert(candidate.raw_value.as_deref())
            .map_err(|reason| OptionError::InvalidOptionValue {
                key: key.as_str().to_string(),
                value: candidate.raw_value.clone(),
                reason,
            })?;

        let winner = Winner {
            weight,
            key: key.as_str().to_string(),
            value,
        };
        if let Some(replaced) = state.insert(key.base_name().to_string(), winner) {
            tracing::trace!(key = %key, replaced = %replaced.key, weight, "More specific option wins");
        }
    }

    Ok(state
        .into_iter()
        .map(|(name, winner)| (name, winner.value))
        .collect())
}
