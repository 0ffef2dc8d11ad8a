//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use traitgen_core::prelude::*;
//! ```

// Errors
pub use crate::error::{TraitgenError, TraitgenResult};

// Symbol model and front end
pub use crate::frontend::build_model;
pub use crate::model::{DeclId, SymbolModel};

// Type location
pub use crate::locate::{locate_type, parse_selector, Selector};

// Method set and usage analysis
pub use crate::methods::{collect_methods, ContractMethod};
pub use crate::usage::{scan_usage, UsedSet};

// Naming
pub use crate::derive::{derive_file_name, derive_trait_name};

// Rendering and output
pub use crate::render::{render_trait, ImportMap, RenderInput};
pub use crate::sink::{resolve_sink, write_rendered, Sink};

// File scanning
pub use crate::scan::{gather_rs_files, gather_rs_files_with_excludes};

// Configuration
pub use crate::config::{load_config, TraitgenConfig};

// Builder API
pub use crate::pipeline::{Synthesis, Traitgen};

// Reporting
pub use crate::report::{RunReport, UnitOutcome, UnitReport};
