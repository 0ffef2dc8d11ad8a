//! External-usage scan over the use-graph.
//!
//! A call site counts as external use of the target type unless it
//! falls inside an excluded region:
//!
//! * bodies of receiver-bearing methods of the target type itself
//!   (a type calling its own methods is not a consumer), or
//! * bodies of constructor functions: receiverless functions that
//!   return the type without also taking it as a parameter. A function
//!   that both takes and returns the type is a transformer, not a
//!   constructor, and its calls do count.
//!
//! The resulting set is keyed by method name alone. When two promotion
//! paths contribute methods with the same name, use of one marks both;
//! that collapse is intentional and covered by a pipeline test.

use std::collections::HashSet;

use crate::model::{DeclId, Span, SymbolModel};

/// Names of methods observed in external use.
#[derive(Debug, Default, Clone)]
pub struct UsedSet {
    names: HashSet<String>,
}

impl UsedSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Scans the use-graph for external calls on `id`.
///
/// `trait_name` pre-seeds the set from an already-generated contract of
/// the same name, so regeneration never shrinks an existing trait.
pub fn scan_usage(model: &SymbolModel, id: DeclId, trait_name: &str) -> UsedSet {
    let excluded = exclusion_spans(model, id);

    let mut used = UsedSet::default();
    for existing in &model.traits {
        if existing.name == trait_name {
            for m in &existing.methods {
                used.insert(m.clone());
            }
        }
    }

    for call in &model.calls {
        if call.receiver != id {
            continue;
        }
        if excluded.iter().any(|span| span.contains(&call.span)) {
            tracing::debug!(method = %call.method, "call site excluded");
            continue;
        }
        used.insert(call.method.clone());
    }
    used
}

fn exclusion_spans(model: &SymbolModel, id: DeclId) -> Vec<Span> {
    let mut spans: Vec<Span> = model
        .self_bodies
        .iter()
        .filter(|(owner, _)| *owner == id)
        .map(|(_, span)| *span)
        .collect();

    for f in &model.functions {
        if f.returns.contains(&id) && !f.takes.contains(&id) {
            spans.push(f.body);
        }
    }
    spans
}
