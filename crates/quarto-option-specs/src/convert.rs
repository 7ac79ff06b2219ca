/*
 * convert.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Option value converters and per-directive conversion tables.
 */

//! Option value conversion.
//!
//! Each directive declares which options it accepts and how the raw text of
//! each option is converted. A [`ConversionTable`] maps base option names to an
//! [`OptionSpec`]: either a [`Converter`] or an explicit `Disabled` marker,
//! which is treated the same as an unknown option.

use std::fmt;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

static NON_ID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex pattern for id characters"));

static NON_ID_AT_ENDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-0-9]+|-+$").expect("Invalid regex pattern for id ends"));

/// A converted option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Free text
    Text(String),
    /// Integer
    Int(i64),
    /// Decimal number
    Float(f64),
    /// Presence-only option
    Flag,
    /// Path with internal whitespace removed
    Path(String),
    /// URI with whitespace removed
    Uri(String),
    /// Normalised class names
    Classes(Vec<String>),
    /// One of a fixed set of values (lower-cased)
    Choice(String),
}

impl OptionValue {
    /// Borrow the value as text, for the string-like variants.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s)
            | OptionValue::Path(s)
            | OptionValue::Uri(s)
            | OptionValue::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, OptionValue::Flag)
    }
}

/// Signature of a caller-supplied converter.
pub type ConvertFn = dyn Fn(Option<&str>) -> Result<OptionValue, String> + Send + Sync;

/// How to turn an option's raw text into an [`OptionValue`].
#[derive(Clone)]
pub enum Converter {
    /// Keep the text; an absent value becomes the empty string.
    Unchanged,
    /// Keep the text; a value is required.
    UnchangedRequired,
    /// No value allowed.
    Flag,
    /// Signed integer.
    Int,
    /// Integer `>= 0`.
    NonNegativeInt,
    /// Integer `>= 1`.
    PositiveInt,
    /// Integer, or 999 when no value is given.
    IntOrNothing,
    /// Integer `>= 0` with an optional trailing `%`.
    Percentage,
    /// Decimal number.
    Float,
    /// Path; line breaks and surrounding whitespace removed.
    Path,
    /// URI; all whitespace removed.
    Uri,
    /// Whitespace-separated class names.
    ClassOption,
    /// Case-insensitive choice from a fixed list.
    Choice(Vec<String>),
    /// Caller-defined conversion.
    Custom {
        name: String,
        convert: Arc<ConvertFn>,
    },
}

impl Converter {
    /// Look up a standard converter by its configuration name.
    ///
    /// `choice` needs its list of values and is not available through this
    /// lookup; build it with [`Converter::choice`].
    pub fn from_kind(kind: &str) -> Option<Self> {
        let converter = match kind {
            "unchanged" => Converter::Unchanged,
            "unchanged_required" => Converter::UnchangedRequired,
            "flag" => Converter::Flag,
            "int" => Converter::Int,
            "nonnegative_int" => Converter::NonNegativeInt,
            "positive_int" => Converter::PositiveInt,
            "int_or_nothing" => Converter::IntOrNothing,
            "percentage" => Converter::Percentage,
            "float" => Converter::Float,
            "path" => Converter::Path,
            "uri" => Converter::Uri,
            "class_option" => Converter::ClassOption,
            _ => return None,
        };
        Some(converter)
    }

    pub fn choice<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Converter::Choice(values.into_iter().map(Into::into).collect())
    }

    pub fn custom<F>(name: impl Into<String>, convert: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<OptionValue, String> + Send + Sync + 'static,
    {
        Converter::Custom {
            name: name.into(),
            convert: Arc::new(convert),
        }
    }

    /// The configuration name of this converter.
    pub fn kind(&self) -> &str {
        match self {
            Converter::Unchanged => "unchanged",
            Converter::UnchangedRequired => "unchanged_required",
            Converter::Flag => "flag",
            Converter::Int => "int",
            Converter::NonNegativeInt => "nonnegative_int",
            Converter::PositiveInt => "positive_int",
            Converter::IntOrNothing => "int_or_nothing",
            Converter::Percentage => "percentage",
            Converter::Float => "float",
            Converter::Path => "path",
            Converter::Uri => "uri",
            Converter::ClassOption => "class_option",
            Converter::Choice(_) => "choice",
            Converter::Custom { name, .. } => name,
        }
    }

    /// Convert a raw value. The error string is the reason shown to the user.
    pub fn convert(&self, raw: Option<&str>) -> Result<OptionValue, String> {
        match self {
            Converter::Unchanged => Ok(OptionValue::Text(raw.unwrap_or_default().to_string())),
            Converter::UnchangedRequired => Ok(OptionValue::Text(required(raw)?.to_string())),
            Converter::Flag => match raw {
                Some(value) if !value.trim().is_empty() => {
                    Err(format!("no argument is allowed; \"{}\" supplied", value))
                }
                _ => Ok(OptionValue::Flag),
            },
            Converter::Int => parse_int(required(raw)?).map(OptionValue::Int),
            Converter::NonNegativeInt => nonnegative_int(required(raw)?).map(OptionValue::Int),
            Converter::PositiveInt => {
                let value = parse_int(required(raw)?)?;
                if value < 1 {
                    return Err("negative or zero value; must be positive".to_string());
                }
                Ok(OptionValue::Int(value))
            }
            Converter::IntOrNothing => match raw {
                Some(text) if !text.trim().is_empty() => parse_int(text).map(OptionValue::Int),
                _ => Ok(OptionValue::Int(UNLIMITED_DEPTH)),
            },
            Converter::Percentage => {
                let text = required(raw)?.trim_end_matches([' ', '%']);
                nonnegative_int(text).map(OptionValue::Int)
            }
            Converter::Float => {
                let text = required(raw)?.trim();
                text.parse::<f64>()
                    .map(OptionValue::Float)
                    .map_err(|_| format!("invalid literal for float: \"{}\"", text))
            }
            Converter::Path => {
                let joined: String = required(raw)?.lines().map(str::trim).collect();
                Ok(OptionValue::Path(joined))
            }
            Converter::Uri => {
                let joined: String = required(raw)?.split_whitespace().collect();
                Ok(OptionValue::Uri(joined))
            }
            Converter::ClassOption => {
                let mut classes = Vec::new();
                for name in required(raw)?.split_whitespace() {
                    let class = make_id(name);
                    if class.is_empty() {
                        return Err(format!("cannot make \"{}\" into a class name", name));
                    }
                    classes.push(class);
                }
                Ok(OptionValue::Classes(classes))
            }
            Converter::Choice(values) => {
                let text = raw.ok_or_else(|| {
                    format!("must supply an argument; choose from {}", format_values(values))
                })?;
                let normalized = text.trim().to_lowercase();
                if values.iter().any(|v| *v == normalized) {
                    Ok(OptionValue::Choice(normalized))
                } else {
                    Err(format!("\"{}\" unknown; choose from {}", text, format_values(values)))
                }
            }
            Converter::Custom { convert, .. } => convert(raw),
        }
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converter::Choice(values) => f.debug_tuple("Choice").field(values).finish(),
            Converter::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

fn required(raw: Option<&str>) -> Result<&str, String> {
    raw.ok_or_else(|| "argument required but none supplied".to_string())
}

/// Value of `int_or_nothing` when the option is given without a number.
const UNLIMITED_DEPTH: i64 = 999;

fn nonnegative_int(text: &str) -> Result<i64, String> {
    let value = parse_int(text)?;
    if value < 0 {
        return Err("negative value; must be positive or zero".to_string());
    }
    Ok(value)
}

fn parse_int(text: &str) -> Result<i64, String> {
    let text = text.trim();
    text.parse::<i64>()
        .map_err(|_| format!("invalid literal for integer: \"{}\"", text))
}

fn format_values(values: &[String]) -> String {
    match values.split_last() {
        None => "nothing".to_string(),
        Some((last, [])) => format!("\"{}\"", last),
        Some((last, rest)) => {
            let head: Vec<String> = rest.iter().map(|v| format!("\"{}\"", v)).collect();
            format!("{}, or \"{}\"", head.join(", "), last)
        }
    }
}

/// Normalise a name into an identifier usable as a CSS class.
///
/// Lower-cases, replaces runs of characters outside `a-z0-9` with a single
/// `-`, and strips leading digits/hyphens and trailing hyphens.
pub fn make_id(name: &str) -> String {
    let lowered = name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let dashed = NON_ID_CHARS.replace_all(&lowered, "-");
    NON_ID_AT_ENDS.replace_all(&dashed, "").into_owned()
}

/// Entry in a [`ConversionTable`].
#[derive(Debug, Clone)]
pub enum OptionSpec {
    Convert(Converter),
    /// The option is recognised by name but switched off.
    Disabled,
}

/// Per-directive mapping from base option name to its converter.
#[derive(Debug, Clone, Default)]
pub struct ConversionTable {
    entries: IndexMap<String, OptionSpec>,
}

impl ConversionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a converter.
    pub fn with(mut self, name: impl Into<String>, converter: Converter) -> Self {
        self.insert(name, OptionSpec::Convert(converter));
        self
    }

    /// Builder-style insertion of a disabled option.
    pub fn with_disabled(mut self, name: impl Into<String>) -> Self {
        self.insert(name, OptionSpec::Disabled);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: OptionSpec) {
        self.entries.insert(name.into(), spec);
    }

    /// The converter for `base_name`, or `None` if unknown or disabled.
    pub fn converter(&self, base_name: &str) -> Option<&Converter> {
        match self.entries.get(base_name)? {
            OptionSpec::Convert(converter) => Some(converter),
            OptionSpec::Disabled => None,
        }
    }

    pub fn get(&self, base_name: &str) -> Option<&OptionSpec> {
        self.entries.get(base_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
