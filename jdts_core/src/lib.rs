//! `jdts_core` is the core library for jdts, the Javadoc tag setter. It
//! finds the Javadoc comments in Java source files, works out what kind of
//! declaration each one documents, and inserts, overwrites or removes block
//! tags (`@author`, `@since`, `@version` and friends) according to a list of
//! configured tag policies.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Java source file
//!   -> Splitter (finds each `/** ... */` and the declaration after it)
//!   -> Classifier (CLASS, INTERFACE, ENUM, ANNOTATION_DEFINITION, FIELD, METHOD, ...)
//!   -> Tag parser (existing block tags with their exact source text)
//!   -> Engine (applies every policy, in order, to every block)
//!   -> Two-phase substitution (each block rewritten exactly once)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: loading `jdts.yml`, including data sources for templated tag
//!   values.
//! - [`pipeline`]: discovering Java files and rewriting them in a batch.
//! - [`version`]: Maven-style version ordering for the `ifLower` rule.
//!
//! ## Key Types
//!
//! - [`TagPolicy`]: one configured rule for a tag.
//! - [`DeclarationKind`]: what a Javadoc block documents.
//! - [`JavadocTags`]: the tags found inside one comment body.
//! - [`JdtsCode`]: a source file split into rewritable blocks.
//! - [`RunReport`]: the outcome of a batch run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jdts_core::JdtsConfig;
//! use jdts_core::RunOptions;
//! use jdts_core::run_pipeline;
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let config = JdtsConfig::load_resolved(root, None).unwrap();
//! let report = run_pipeline(root, &config, RunOptions::default()).unwrap();
//! println!("{} file(s) changed", report.accumulator.files_changed);
//! ```

pub use code::*;
pub use config::*;
pub use declaration::*;
pub use engine::*;
pub use error::*;
pub use pipeline::*;
pub use splitter::*;
pub use tags::*;

mod code;
pub mod config;
mod declaration;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod pipeline;
mod splitter;
mod tags;
pub mod version;

#[cfg(test)]
mod __fixtures;
