//! Lexical path resolution for the front end.
//!
//! Maps a file's position in the crate to module path segments and
//! resolves type paths written in source (`Bar`, `crate::bar::Bar`,
//! `super::Widget`, imported aliases) to absolute segment lists that the
//! symbol model can intern and look up.

use std::collections::HashMap;
use std::path::Path;
use syn::{Item, UseTree};

/// A module's position in the crate hierarchy.
///
/// Example: `src/api/v1/mod.rs` maps to `["api", "v1"]`.
#[derive(Debug, Clone, Default)]
pub struct ModulePath {
    /// Path segments from the crate root (excluding `crate::`).
    pub segments: Vec<String>,
}

impl ModulePath {
    /// Derives the module path from a source path relative to the unit
    /// root.
    ///
    /// - `src/lib.rs` → `[]`
    /// - `src/bar.rs` and `src/bar/mod.rs` → `["bar"]`
    /// - `src/api/v1/handler.rs` → `["api", "v1", "handler"]`
    pub fn from_source_path(path: &Path) -> Self {
        let mut segments = Vec::new();
        let mut inside_src = false;

        for component in path.iter() {
            let part = component.to_string_lossy();

            if !inside_src {
                if part == "src" {
                    inside_src = true;
                }
                continue;
            }

            // Crate roots and mod.rs stand for their parent directory.
            if part == "mod.rs" || part == "lib.rs" || part == "main.rs" {
                continue;
            }

            match part.strip_suffix(".rs") {
                Some(stem) => segments.push(stem.to_string()),
                None => segments.push(part.into_owned()),
            }
        }

        Self { segments }
    }

    /// The path of an inline `mod name { .. }` nested in this module.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// The parent module path, for `super::` resolution.
    pub fn parent(&self) -> Self {
        Self {
            segments: self
                .segments
                .split_last()
                .map(|(_, rest)| rest.to_vec())
                .unwrap_or_default(),
        }
    }
}

/// Resolved `use` statements of one lexical scope.
///
/// Maps a local name (or rename alias) to absolute path segments.
/// Scopes clone their parent's table and layer their own imports on
/// top, so inline modules see outer imports shadowed correctly.
#[derive(Debug, Clone, Default)]
pub struct UseTable {
    map: HashMap<String, Vec<String>>,
}

impl UseTable {
    /// Extends the table with all `use` items in one scope.
    pub fn extend_from_items(&mut self, items: &[Item], ctx: &ModulePath) {
        for item in items {
            if let Item::Use(u) = item {
                self.walk_tree(&u.tree, ctx, Vec::new());
            }
        }
    }

    fn walk_tree(&mut self, tree: &UseTree, ctx: &ModulePath, mut prefix: Vec<String>) {
        match tree {
            UseTree::Path(p) => {
                prefix.push(p.ident.to_string());
                self.walk_tree(&p.tree, ctx, prefix);
            }
            UseTree::Name(n) => {
                let name = n.ident.to_string();
                prefix.push(name.clone());
                let resolved = rebase(&prefix, ctx);
                self.map.insert(name, resolved);
            }
            UseTree::Rename(r) => {
                prefix.push(r.ident.to_string());
                let resolved = rebase(&prefix, ctx);
                self.map.insert(r.rename.to_string(), resolved);
            }
            UseTree::Group(g) => {
                for t in &g.items {
                    self.walk_tree(t, ctx, prefix.clone());
                }
            }
            // Glob imports cannot be statically mapped to names.
            UseTree::Glob(_) => {}
        }
    }

    /// Resolves an imported local name to absolute segments.
    pub fn lookup(&self, name: &str) -> Option<&[String]> {
        self.map.get(name).map(Vec::as_slice)
    }
}

/// Rebases path segments written in source onto absolute crate-rooted
/// segments, handling `crate`/`self`/`super` prefixes.
fn rebase(segments: &[String], ctx: &ModulePath) -> Vec<String> {
    match segments.first().map(String::as_str) {
        Some("crate") => segments[1..].to_vec(),
        Some("self") => {
            let mut out = ctx.segments.clone();
            out.extend_from_slice(&segments[1..]);
            out
        }
        Some("super") => {
            let mut out = ctx.parent().segments;
            out.extend_from_slice(&segments[1..]);
            out
        }
        // External crate paths (std::, serde::) stay as written; they
        // will simply never resolve against the model's index.
        _ => segments.to_vec(),
    }
}

/// Resolves a type path written in source to absolute segments.
///
/// Resolution order: `crate`/`self`/`super` prefixes, then the scope's
/// imports, then "declared in the current module" for bare names.
pub fn absolute_type_path(
    segments: &[String],
    table: &UseTable,
    ctx: &ModulePath,
) -> Vec<String> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };

    if matches!(first.as_str(), "crate" | "self" | "super") {
        return rebase(segments, ctx);
    }

    if let Some(imported) = table.lookup(first) {
        let mut out = imported.to_vec();
        out.extend_from_slice(&segments[1..]);
        return out;
    }

    if segments.len() == 1 {
        // Bare name: assume the current module declares it.
        let mut out = ctx.segments.clone();
        out.push(first.clone());
        return out;
    }

    // Qualified but unimported: external crate or sibling module path.
    segments.to_vec()
}
