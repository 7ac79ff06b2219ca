/*
 * tables.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Directive option tables loaded from `_optionspecs.yml`.
 */

//! Option table configuration.
//!
//! Which options a directive accepts, and how each is converted, can be
//! declared in an `_optionspecs.yml` file:
//!
//! ```yaml
//! directives:
//!   toctree:
//!     caption: unchanged_required
//!     maxdepth: int
//!     hidden: flag
//!     numbered: disabled
//!     titlesonly:
//!       kind: choice
//!       choices: ["yes", "no"]
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::convert::{ConversionTable, Converter, OptionSpec};
use crate::error::ConfigError;

/// File names searched for by [`OptionTablesConfig::discover`].
pub const CONFIG_FILE_NAMES: [&str; 2] = ["_optionspecs.yml", "_optionspecs.yaml"];

/// Converter kind that marks an option as recognised but switched off.
const DISABLED_KIND: &str = "disabled";

/// How one option is declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConverterSpec {
    /// Just the converter kind, e.g. `int`
    Kind(String),
    /// Kind plus parameters, e.g. `{ kind: choice, choices: [a, b] }`
    Detailed {
        kind: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        choices: Vec<String>,
    },
}

impl ConverterSpec {
    pub fn kind(&self) -> &str {
        match self {
            ConverterSpec::Kind(kind) | ConverterSpec::Detailed { kind, .. } => kind,
        }
    }

    fn choices(&self) -> &[String] {
        match self {
            ConverterSpec::Kind(_) => &[],
            ConverterSpec::Detailed { choices, .. } => choices,
        }
    }

    fn to_option_spec(&self, directive: &str, option: &str) -> Result<OptionSpec, ConfigError> {
        let kind = self.kind();
        if kind == DISABLED_KIND {
            return Ok(OptionSpec::Disabled);
        }
        if kind == "choice" && !self.choices().is_empty() {
            return Ok(OptionSpec::Convert(Converter::choice(
                self.choices().iter().map(|c| c.to_lowercase()),
            )));
        }
        Converter::from_kind(kind)
            .map(OptionSpec::Convert)
            .ok_or_else(|| ConfigError::UnknownConverter {
                directive: directive.to_string(),
                option: option.to_string(),
                kind: kind.to_string(),
            })
    }
}

/// Option tables for a set of directives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTablesConfig {
    #[serde(default)]
    pub directives: IndexMap<String, IndexMap<String, ConverterSpec>>,
}

impl OptionTablesConfig {
    /// Parse option tables from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read option tables from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loading option tables");
        Self::from_yaml_str(&content)
    }

    /// Search `start_dir` and its parents for an option tables file.
    ///
    /// Returns `Ok(None)` if none is found.
    pub fn discover(start_dir: impl AsRef<Path>) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut current = Some(start_dir.as_ref());

        while let Some(dir) = current {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    let config = Self::load(&candidate)?;
                    return Ok(Some((candidate, config)));
                }
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Tables for common directives, used when no configuration file exists.
    pub fn builtin() -> Self {
        let kind = |k: &str| ConverterSpec::Kind(k.to_string());
        let choice = |values: &[&str]| ConverterSpec::Detailed {
            kind: "choice".to_string(),
            choices: values.iter().map(|v| v.to_string()).collect(),
        };

        let toctree: IndexMap<String, ConverterSpec> = [
            ("maxdepth", kind("int")),
            ("name", kind("unchanged")),
            ("class", kind("class_option")),
            ("caption", kind("unchanged_required")),
            ("glob", kind("flag")),
            ("hidden", kind("flag")),
            ("includehidden", kind("flag")),
            ("numbered", kind("int_or_nothing")),
            ("titlesonly", kind("flag")),
            ("reversed", kind("flag")),
        ]
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect();

        let image: IndexMap<String, ConverterSpec> = [
            ("alt", kind("unchanged")),
            ("height", kind("unchanged")),
            ("width", kind("unchanged")),
            ("scale", kind("percentage")),
            (
                "align",
                choice(&["top", "middle", "bottom", "left", "center", "right"]),
            ),
            ("target", kind("unchanged_required")),
            ("class", kind("class_option")),
            ("name", kind("unchanged")),
        ]
        .into_iter()
        .map(|(name, spec)| (name.to_string(), spec))
        .collect();

        let mut directives = IndexMap::new();
        directives.insert("toctree".to_string(), toctree);
        directives.insert("image".to_string(), image);
        Self { directives }
    }

    /// Build the conversion table for one directive.
    pub fn table(&self, directive: &str) -> Result<ConversionTable, ConfigError> {
        let options = self
            .directives
            .get(directive)
            .ok_or_else(|| ConfigError::UnknownDirective(directive.to_string()))?;

        let mut table = ConversionTable::new();
        for (option, spec) in options {
            table.insert(option.clone(), spec.to_option_spec(directive, option)?);
        }
        Ok(table)
    }

    pub fn directive_names(&self) -> impl Iterator<Item = &str> {
        self.directives.keys().map(String::as_str)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for directive in self.directives.keys() {
            self.table(directive)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::OptionValue;

    const SAMPLE: &str = r#"
directives:
  toctree:
    caption: unchanged_required
    maxdepth: int
    hidden: flag
    numbered: disabled
    titlesonly:
      kind: choice
      choices: ["Yes", "no"]
"#;

    #[test]
    fn test_parse_sample() {
        let config = OptionTablesConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.directive_names().collect::<Vec<_>>(), vec!["toctree"]);

        let table = config.table("toctree").unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.converter("maxdepth").unwrap().kind(), "int");
        assert!(matches!(table.get("numbered"), Some(OptionSpec::Disabled)));
        assert_eq!(
            table.converter("titlesonly").unwrap().convert(Some("YES")),
            Ok(OptionValue::Choice("yes".to_string()))
        );
    }

    #[test]
    fn test_unknown_converter_kind() {
        let err = OptionTablesConfig::from_yaml_str(
            "directives:\n  toctree:\n    maxdepth: integer\n",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown converter 'integer' for option 'maxdepth' of directive 'toctree'"
        );
    }

    #[test]
    fn test_choice_without_choices_is_rejected() {
        let err =
            OptionTablesConfig::from_yaml_str("directives:\n  figure:\n    align: choice\n")
                .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownConverter { .. }));
    }

    #[test]
    fn test_unknown_directive() {
        let err = OptionTablesConfig::builtin().table("tocttree").unwrap_err();
        assert_eq!(err.to_string(), "no option table for directive 'tocttree'");
    }

    #[test]
    fn test_malformed_yaml() {
        let err = OptionTablesConfig::from_yaml_str("directives: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_builtin_tables_are_valid() {
        let config = OptionTablesConfig::builtin();
        config.validate().unwrap();
        let toctree = config.table("toctree").unwrap();
        assert_eq!(toctree.converter("caption").unwrap().kind(), "unchanged_required");
        let image = config.table("image").unwrap();
        assert_eq!(image.converter("align").unwrap().kind(), "choice");
        assert_eq!(image.converter("scale").unwrap().kind(), "percentage");
        assert_eq!(image.converter("target").unwrap().kind(), "unchanged_required");
    }

    #[test]
    fn test_builtin_numbered_defaults_to_unlimited_depth() {
        let toctree = OptionTablesConfig::builtin().table("toctree").unwrap();
        let numbered = toctree.converter("numbered").unwrap();
        assert_eq!(numbered.kind(), "int_or_nothing");
        assert_eq!(numbered.convert(None), Ok(OptionValue::Int(999)));
        assert_eq!(numbered.convert(Some("2")), Ok(OptionValue::Int(2)));
    }

    #[test]
    fn test_discover_in_parent_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let nested = temp.path().join("docs").join("chapter");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("_optionspecs.yml"), SAMPLE).unwrap();

        let (path, config) = OptionTablesConfig::discover(&nested).unwrap().unwrap();
        assert_eq!(path, temp.path().join("_optionspecs.yml"));
        assert!(config.directives.contains_key("toctree"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = OptionTablesConfig::load(temp.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
