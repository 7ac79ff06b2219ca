/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Active builder/format context for option resolution.
 */

//! The active output target for a build run.
//!
//! Resolution functions take a [`BuildContext`] by reference. Hosts that learn
//! their output target partway through start-up can park it in a
//! [`ContextHolder`] and hand out snapshots once it is known.

use std::fmt;
use std::sync::RwLock;

/// The builder and format a document is being built for.
///
/// An unset context has both fields empty. Under an unset context only
/// unscoped option declarations can match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BuildContext {
    /// Name of the active builder (e.g. `html`, `epub`, `latex`)
    pub builder: String,
    /// Output format produced by that builder (e.g. `html`, `latex`)
    pub format: String,
}

impl BuildContext {
    /// Create a context for a known output target.
    pub fn new(builder: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            builder: builder.into(),
            format: format.into(),
        }
    }

    /// The empty sentinel context used before the build target is known.
    pub fn unset() -> Self {
        Self::default()
    }

    /// True if neither builder nor format has been set.
    pub fn is_unset(&self) -> bool {
        self.builder.is_empty() && self.format.is_empty()
    }
}

impl fmt::Display for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.builder, self.format)
    }
}

/// Set-once holder for the run's [`BuildContext`].
///
/// Setting the same target again is a no-op. Setting a different target
/// overwrites the previous one; a run is expected to have a single target, so
/// this only logs a warning.
#[derive(Debug, Default)]
pub struct ContextHolder {
    current: RwLock<Option<BuildContext>>,
}

impl ContextHolder {
    /// Create an empty holder.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Record the active builder and format.
    pub fn set(&self, builder: impl Into<String>, format: impl Into<String>) {
        let ctx = BuildContext::new(builder, format);
        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match current.as_ref() {
            Some(existing) if *existing == ctx => return,
            Some(existing) => {
                tracing::warn!(previous = %existing, next = %ctx, "Overwriting option-spec build context");
            }
            None => {
                tracing::info!(target_context = %ctx, "Option specs active");
            }
        }

        *current = Some(ctx);
    }

    /// Snapshot of the active context, or the unset sentinel.
    pub fn get(&self) -> BuildContext {
        let current = match self.current.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        current.clone().unwrap_or_default()
    }

    /// True once [`ContextHolder::set`] has been called.
    pub fn is_initialized(&self) -> bool {
        match self.current.read() {
            Ok(guard) => guard.is_some(),
            Err(poisoned) => poisoned.into_inner().is_some(),
        }
    }
}
