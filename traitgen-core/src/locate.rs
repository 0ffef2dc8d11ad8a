//! Concrete type location by selector.
//!
//! A selector names one concrete type as `module::TypeName`, where the
//! module part is the declaring module's *short* name (the crate name
//! for root declarations). Location returns `None` rather than an error
//! when the unit has no match, so a multi-unit run can keep going.

use crate::error::{TraitgenError, TraitgenResult};
use crate::model::{DeclId, SymbolModel};

/// A parsed type selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Declaring module's short name.
    pub module: String,
    /// The concrete type's name.
    pub name: String,
}

/// Parses a `module::TypeName` selector.
///
/// Splits on the *first* `::`; a selector without one is malformed and
/// fails the whole run.
pub fn parse_selector(selector: &str) -> TraitgenResult<Selector> {
    let (module, name) = selector
        .split_once("::")
        .ok_or_else(|| TraitgenError::selector(selector))?;

    if module.is_empty() || name.is_empty() {
        return Err(TraitgenError::selector(selector));
    }

    Ok(Selector {
        module: module.to_string(),
        name: name.to_string(),
    })
}

/// Locates the declaration matching a selector.
///
/// Declarations are scanned in model order (sorted files, then source
/// order), and the first match wins. With two aliases of the same name
/// in scope this is a documented first-found rule, not an error; model
/// order is stable, so the choice is deterministic across runs.
pub fn locate_type(model: &SymbolModel, selector: &Selector) -> Option<DeclId> {
    model
        .types
        .iter()
        .find(|decl| decl.name == selector.name && model.module_name(decl.id) == selector.module)
        .map(|decl| decl.id)
}
