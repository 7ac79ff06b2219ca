/*
 * key.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Qualified option keys: name[:builder][:format]
 */

//! Qualified option keys.
//!
//! A directive option may be written with up to two scope qualifiers:
//!
//! ```text
//! caption              any builder, any format
//! caption:epub         epub builder, any format
//! caption::html        any builder, html format
//! caption:html:html    html builder, html format
//! ```
//!
//! Splitting is positional on `:`. Segments past the third are kept in the raw
//! key but not otherwise modelled.

use std::fmt;

/// Separator between the base name and its scope segments.
pub const SCOPE_SEPARATOR: char = ':';

/// An option key split into its base name and optional scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedOptionKey {
    raw: String,
    base_name: String,
    builder_scope: Option<String>,
    format_scope: Option<String>,
}

impl QualifiedOptionKey {
    /// Split a raw key into its segments.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut segments = raw.split(SCOPE_SEPARATOR);

        // split always yields at least one segment
        let base_name = segments.next().unwrap_or_default().to_string();
        let builder_scope = segments.next().map(str::to_string);
        let format_scope = segments.next().map(str::to_string);

        Self {
            raw,
            base_name,
            builder_scope,
            format_scope,
        }
    }

    /// The key exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The option name with all qualifiers stripped.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The builder scope, if one was written and is not blank.
    pub fn builder_scope(&self) -> Option<&str> {
        non_blank(self.builder_scope.as_deref())
    }

    /// The format scope, if one was written and is not blank.
    pub fn format_scope(&self) -> Option<&str> {
        non_blank(self.format_scope.as_deref())
    }

    /// True if neither scope constrains the key.
    pub fn is_unscoped(&self) -> bool {
        self.builder_scope().is_none() && self.format_scope().is_none()
    }
}

fn non_blank(segment: Option<&str>) -> Option<&str> {
    segment.map(str::trim).filter(|s| !s.is_empty())
}

impl fmt::Display for QualifiedOptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for QualifiedOptionKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for QualifiedOptionKey {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

/// One `(key, value)` declaration from an option block.
///
/// The value is `None` when the field body was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePair {
    pub key: QualifiedOptionKey,
    pub raw_value: Option<String>,
}

impl CandidatePair {
    pub fn new(key: impl Into<QualifiedOptionKey>, raw_value: Option<String>) -> Self {
        Self {
            key: key.into(),
            raw_value,
        }
    }

    /// Shorthand for a declaration with a value.
    pub fn with_value(key: impl Into<QualifiedOptionKey>, raw_value: impl Into<String>) -> Self {
        Self::new(key, Some(raw_value.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name() {
        let key = QualifiedOptionKey::parse("caption");
        assert_eq!(key.base_name(), "caption");
        assert_eq!(key.builder_scope(), None);
        assert_eq!(key.format_scope(), None);
        assert!(key.is_unscoped());
    }

    #[test]
    fn test_builder_only() {
        let key = QualifiedOptionKey::parse("caption:epub");
        assert_eq!(key.base_name(), "caption");
        assert_eq!(key.builder_scope(), Some("epub"));
        assert_eq!(key.format_scope(), None);
    }

    #[test]
    fn test_empty_builder_with_format() {
        let key = QualifiedOptionKey::parse("caption::html");
        assert_eq!(key.builder_scope(), None);
        assert_eq!(key.format_scope(), Some("html"));
        assert!(!key.is_unscoped());
    }

    #[test]
    fn test_builder_and_format() {
        let key = QualifiedOptionKey::parse("caption:html:html");
        assert_eq!(key.builder_scope(), Some("html"));
        assert_eq!(key.format_scope(), Some("html"));
        assert_eq!(key.as_str(), "caption:html:html");
    }

    #[test]
    fn test_blank_segments_are_wildcards() {
        let key = QualifiedOptionKey::parse("caption: : ");
        assert!(key.is_unscoped());
        assert_eq!(key.as_str(), "caption: : ");
    }

    #[test]
    fn test_scope_segments_are_trimmed() {
        let key = QualifiedOptionKey::parse("caption: html :latex");
        assert_eq!(key.builder_scope(), Some("html"));
        assert_eq!(key.format_scope(), Some("latex"));
    }

    #[test]
    fn test_extra_segments_stay_in_raw_key() {
        let key = QualifiedOptionKey::parse("caption:html:html:extra");
        assert_eq!(key.builder_scope(), Some("html"));
        assert_eq!(key.format_scope(), Some("html"));
        assert_eq!(key.to_string(), "caption:html:html:extra");
    }
}
