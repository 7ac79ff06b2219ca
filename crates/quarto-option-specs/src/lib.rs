/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Builder- and format-scoped directive options.
//!
//! A directive option can be declared several times with different scopes,
//! and the declaration that best matches the active output target wins:
//!
//! ```text
//! .. toctree::
//!    :caption:           Title for the general case
//!    :caption:html:html: Title for the html builder writing html
//!    :caption::html:     Title for any other builder writing html
//!    :caption:epub:      Title for the epub builder
//! ```
//!
//! # Overview
//!
//! - [`BuildContext`] / [`ContextHolder`]: the active builder and format
//! - [`QualifiedOptionKey`]: `name[:builder][:format]` split into parts
//! - [`Specificity`]: how well a key matches the context (1, 11, 101, 111, or rejected)
//! - [`resolve_options`]: merge candidates into one converted value per option
//! - [`ScopedOptionBlock`]: read, gate and resolve a raw option block
//! - [`OptionTablesConfig`]: per-directive converter tables from `_optionspecs.yml`
//!
//! # Example
//!
//! ```rust
//! use quarto_option_specs::{
//!     BuildContext, ConversionTable, Converter, OptionBlockHandler, OptionValue,
//!     ScopedOptionBlock,
//! };
//!
//! let table = ConversionTable::new()
//!     .with("caption", Converter::Unchanged)
//!     .with("maxdepth", Converter::Int);
//!
//! let block = [
//!     ":caption: Contents",
//!     ":caption:epub: Table of Contents",
//!     ":maxdepth: 2",
//! ];
//!
//! let ctx = BuildContext::new("epub", "html");
//! let options = ScopedOptionBlock::new().parse_options(&block, &table, &ctx).unwrap();
//!
//! assert_eq!(options["caption"], OptionValue::Text("Table of Contents".to_string()));
//! assert_eq!(options["maxdepth"], OptionValue::Int(2));
//! ```

pub mod block;
pub mod context;
pub mod convert;
pub mod error;
pub mod field_list;
pub mod key;
pub mod resolve;
pub mod specificity;
pub mod tables;

pub use block::{BlockOutcome, OptionBlockHandler, ScopedOptionBlock};
pub use context::{BuildContext, ContextHolder};
pub use convert::{ConversionTable, Converter, OptionSpec, OptionValue};
pub use error::{ConfigError, OptionError, OptionResult};
pub use field_list::{BlockScan, Field, FieldListReader, OptionBlockReader, extract_candidates};
pub use key::{CandidatePair, QualifiedOptionKey};
pub use resolve::{ResolvedOptions, resolve_options};
pub use specificity::Specificity;
pub use tables::{ConverterSpec, OptionTablesConfig};
