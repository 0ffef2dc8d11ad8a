//! Method set construction, including promoted methods.
//!
//! Enumerates a located type's inherent methods and then walks its
//! `Deref` target chain, appending each target's methods tagged with
//! promotion provenance. Visibility filtering is applied relative to
//! the *embedding* type's exposure: when the type is inspected from a
//! foreign module context, non-exported methods are dropped at every
//! level of the chain.
//!
//! No deduplication happens here: two promotion paths may contribute
//! methods with the same name, and the used-set stage collapses them by
//! name. That collapse is a known property of the reference behavior,
//! covered by a dedicated test rather than silently fixed.

use std::collections::HashSet;

use crate::model::{DeclId, Param, Receiver, SymbolModel, TypeRef};

/// Promotion provenance: which embedded type a method came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    /// Name of the `Deref` target type.
    pub type_name: String,
    /// The target's declaring-module path.
    pub module: Vec<String>,
}

/// One method of the candidate contract, direct or promoted.
#[derive(Debug, Clone)]
pub struct ContractMethod {
    pub name: String,
    pub receiver: Receiver,
    pub params: Vec<Param>,
    pub returns: Vec<TypeRef>,
    /// `None` for direct methods.
    pub promoted_from: Option<Promotion>,
}

/// Builds the full candidate method set for one type.
///
/// Direct methods come first in declaration order, then each level of
/// the `Deref` chain in order. The walk is cycle-guarded, so mutually
/// derefing types terminate.
pub fn collect_methods(model: &SymbolModel, id: DeclId, foreign: bool) -> Vec<ContractMethod> {
    let mut out = Vec::new();
    let mut visited = HashSet::new();
    append_methods(model, id, foreign, None, &mut visited, &mut out);
    out
}

fn append_methods(
    model: &SymbolModel,
    id: DeclId,
    foreign: bool,
    promotion: Option<&Promotion>,
    visited: &mut HashSet<DeclId>,
    out: &mut Vec<ContractMethod>,
) {
    if !visited.insert(id) {
        return;
    }

    for m in model.methods_of(id) {
        if foreign && !m.exported {
            continue;
        }
        out.push(ContractMethod {
            name: m.name.clone(),
            receiver: m.receiver,
            params: m.params.clone(),
            returns: m.returns.clone(),
            promoted_from: promotion.cloned(),
        });
    }

    if let Some(target) = model.type_decl(id).deref_target {
        let decl = model.type_decl(target);
        let next = Promotion {
            type_name: decl.name.clone(),
            module: decl.module.clone(),
        };
        append_methods(model, target, foreign, Some(&next), visited, out);
    }
}
