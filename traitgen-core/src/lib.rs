//! traitgen-core: usage-driven trait extraction library for Rust
//!
//! This library derives a minimal behavioral contract (a `trait`) for a
//! single named concrete type by analyzing how that type is actually
//! used across a crate, and emits the trait declaration as generated
//! source.
//!
//! # How it works
//!
//! - **Type location**: a `module::TypeName` selector picks one
//!   struct or enum out of the unit
//! - **Method set**: the type's inherent methods plus everything
//!   promoted along its `Deref` target chain
//! - **Usage scan**: every external method call on the type is
//!   collected; calls inside the type's own method bodies and inside
//!   constructor functions are excluded
//! - **Synthesis**: the used subset becomes a sorted trait declaration
//!   with an import block for foreign-module types, formatted through
//!   prettyplease
//!
//! Regeneration is idempotent: an existing trait with the derived name
//! pre-seeds the used set, so a method never drops out of a contract
//! just because its callers moved.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use traitgen_core::prelude::*;
//!
//! let synthesis = Traitgen::new("/path/to/crate", "bar::Bar")
//!     .output("-")
//!     .run()?;
//! ```
//!
//! # Module Organization
//!
//! - [`model`]: the resolved symbol model (declarations, spans, calls)
//! - [`frontend`]: syn-based model producer
//! - [`locate`]: selector parsing and type location
//! - [`methods`]: method set construction with `Deref` promotion
//! - [`usage`]: external-usage scan with exclusion rules
//! - [`derive`]: trait and file name heuristics
//! - [`render`]: trait declaration synthesis and formatting
//! - [`sink`]: output destinations
//! - [`scan`]: parallel file discovery
//! - [`pipeline`]: fluent builder API driving the whole sequence
//! - [`error`]: typed error handling

pub mod config;
pub mod derive;
pub mod error;
pub mod frontend;
pub mod locate;
pub mod logging;
pub mod methods;
pub mod model;
pub mod pipeline;
pub mod prelude;
pub mod render;
pub mod report;
pub mod scan;
pub mod sink;
pub mod usage;

pub use error::{TraitgenError, TraitgenResult};
pub use pipeline::{Synthesis, Traitgen};

#[cfg(test)]
mod tests;
