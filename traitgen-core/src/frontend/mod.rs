//! The semantic front end: parses a unit's source files and produces
//! the resolved [`SymbolModel`] the analysis core runs on.
//!
//! Per-file scanning is syntactic and runs on Rayon workers (spans are
//! materialized inside the worker, so no syn AST outlives its parse).
//! The sequential merge then interns declarations in file-then-source
//! order and resolves every cross-file reference to an identity key.
//! Files that fail to parse are logged and skipped; they contribute
//! nothing to the model but do not abort the unit.

pub mod paths;
mod scan_file;

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;
use tracing::warn;

use crate::error::TraitgenError;
use crate::model::{CallSite, FreeFn, Param, Span, SymbolModel, TraitDef, TypeRef};
use scan_file::{scan_file, FileScan, RawTypeRef};

/// Minimal slice of a Cargo manifest, for the crate's short name.
#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<PackageSection>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: Option<String>,
}

/// The crate short name: the manifest's package name (with `-` mapped
/// to `_` as rustc does), or the root directory name as a fallback.
fn crate_name(root: &Path) -> String {
    let from_manifest = fs::read_to_string(root.join("Cargo.toml"))
        .ok()
        .and_then(|content| toml::from_str::<Manifest>(&content).ok())
        .and_then(|m| m.package)
        .and_then(|p| p.name);

    let name = from_manifest.unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "crate".to_string())
    });
    name.replace('-', "_")
}

/// Builds the symbol model for one unit from its source files.
///
/// `files` must be the sorted output of the scan step; the model's
/// declaration order (the locator tie-break) follows it.
pub fn build_model(root: &Path, files: &[PathBuf]) -> SymbolModel {
    let scans: Vec<Option<FileScan>> = files
        .par_iter()
        .map(|path| {
            let rel = path.strip_prefix(root).unwrap_or(path);
            // tests/ and benches/ trees are separate compilation
            // targets, not part of the unit's module hierarchy.
            if !rel.iter().any(|c| c == "src") {
                return None;
            }
            let content = match fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable file");
                    return None;
                }
            };
            match scan_file(rel, &content) {
                Ok(scan) => Some(scan),
                Err(message) => {
                    let err = TraitgenError::parse(path.clone(), message);
                    warn!(error = %err, "skipping unparsable file");
                    None
                }
            }
        })
        .collect();

    let mut model = SymbolModel::with_crate_name(crate_name(root));
    model.files = files.to_vec();

    // Pass A: intern every type declaration so cross-file references
    // resolve regardless of file order.
    for (file, scan) in scans.iter().enumerate() {
        let Some(scan) = scan else { continue };
        for ty in &scan.types {
            model.intern_type(
                ty.name.clone(),
                ty.module.clone(),
                ty.exported,
                to_span(file, &ty.range),
            );
        }
    }

    // Pass B: resolve promotion edges, methods, functions, and the
    // use-graph against the interned arena.
    let mut derefs = Vec::new();
    let mut methods = Vec::new();
    let mut self_bodies = Vec::new();
    let mut functions = Vec::new();
    let mut calls = Vec::new();
    let mut traits = Vec::new();

    for (file, scan) in scans.iter().enumerate() {
        let Some(scan) = scan else { continue };

        for (owner, target) in &scan.derefs {
            if let (Some(o), Some(t)) = (model.lookup(owner), model.lookup(target)) {
                derefs.push((o, t));
            }
        }

        for m in &scan.methods {
            let Some(owner) = model.lookup(&m.owner) else {
                continue;
            };
            methods.push(crate::model::MethodDecl {
                owner,
                name: m.name.clone(),
                receiver: m.receiver,
                params: m
                    .params
                    .iter()
                    .map(|p| Param {
                        name: p.name.clone(),
                        ty: finish_type(&p.ty, &model),
                    })
                    .collect(),
                returns: m.returns.iter().map(|r| finish_type(r, &model)).collect(),
                exported: m.exported,
                body: to_span(file, &m.body),
            });
        }

        for (owner, range) in &scan.self_bodies {
            if let Some(id) = model.lookup(owner) {
                self_bodies.push((id, to_span(file, range)));
            }
        }

        for f in &scan.functions {
            functions.push(FreeFn {
                name: f.name.clone(),
                takes: f.takes.iter().filter_map(|s| model.lookup(s)).collect(),
                returns: f.returns.iter().filter_map(|s| model.lookup(s)).collect(),
                body: to_span(file, &f.body),
            });
        }

        for c in &scan.calls {
            if let Some(receiver) = model.lookup(&c.receiver) {
                calls.push(CallSite {
                    method: c.method.clone(),
                    receiver,
                    span: to_span(file, &c.range),
                });
            }
        }

        for t in &scan.traits {
            traits.push(TraitDef {
                name: t.name.clone(),
                methods: t.methods.clone(),
            });
        }
    }

    for (owner, target) in derefs {
        let decl = model.type_decl_mut(owner);
        if decl.deref_target.is_none() {
            decl.deref_target = Some(target);
        }
    }
    model.methods = methods;
    model.self_bodies = self_bodies;
    model.functions = functions;
    model.calls = calls;
    model.traits = traits;

    model
}

fn to_span(file: usize, range: &Range<usize>) -> Span {
    Span {
        file,
        start: range.start,
        end: range.end,
    }
}

/// Finalizes a raw type reference against the interned arena: resolved
/// references adopt their declaration's name and module; everything
/// else is kept as written.
fn finish_type(raw: &RawTypeRef, model: &SymbolModel) -> TypeRef {
    let (base, module) = match model.lookup(&raw.segments) {
        Some(id) => {
            let decl = model.type_decl(id);
            (decl.name.clone(), Some(decl.module.clone()))
        }
        None => (raw.written.clone(), None),
    };

    TypeRef {
        prefix: raw.prefix.clone(),
        base,
        module,
        args: raw.args.iter().map(|a| finish_type(a, model)).collect(),
    }
}
