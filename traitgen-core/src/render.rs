//! Trait declaration synthesis.
//!
//! Assembles the generated file text from the retained method set:
//! optional build-tag attribute, provenance header, `use` block, and
//! the trait body with one signature per method, sorted by name. The
//! assembled text is then round-tripped through `syn::parse_file` and
//! `prettyplease::unparse`; a parse rejection means a rendering bug and
//! surfaces as a [`TraitgenError::Render`] carrying the offending text.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use crate::error::{TraitgenError, TraitgenResult};
use crate::methods::ContractMethod;
use crate::model::{Receiver, TypeRef};
use crate::usage::UsedSet;

/// Foreign-module imports accumulated while rendering signatures.
///
/// The default alias for a module is its short name. On collision the
/// path is walked upward one segment at a time, joining segments with
/// `_`, until an unused alias is found. Aliases are first-writer-wins
/// and are never reassigned or dropped.
#[derive(Debug, Default)]
pub struct ImportMap {
    entries: Vec<(Vec<String>, String)>,
    by_path: HashMap<Vec<String>, usize>,
    taken: HashSet<String>,
}

impl ImportMap {
    /// Returns the alias for a module path, registering it on first use.
    pub fn alias_for(&mut self, path: &[String]) -> &str {
        if let Some(&idx) = self.by_path.get(path) {
            return &self.entries[idx].1;
        }

        let mut alias = path.last().cloned().unwrap_or_default();
        let mut from = path.len().saturating_sub(1);
        while self.taken.contains(&alias) && from > 0 {
            from -= 1;
            alias = path[from..].join("_");
        }

        // The walk can exhaust a short path with the alias still taken;
        // a numeric suffix keeps every import distinct.
        if self.taken.contains(&alias) {
            let stem = alias.clone();
            let mut n = 2;
            while self.taken.contains(&alias) {
                alias = format!("{stem}_{n}");
                n += 1;
            }
        }

        self.taken.insert(alias.clone());
        self.by_path.insert(path.to_vec(), self.entries.len());
        self.entries.push((path.to_vec(), alias));
        &self.entries.last().unwrap().1
    }

    /// Registered imports in first-use order.
    pub fn entries(&self) -> &[(Vec<String>, String)] {
        &self.entries
    }

    fn use_block(&self) -> String {
        let mut out = String::new();
        for (path, alias) in &self.entries {
            let joined = path.join("::");
            if path.last().map(String::as_str) == Some(alias.as_str()) {
                let _ = writeln!(out, "use crate::{joined};");
            } else {
                let _ = writeln!(out, "use crate::{joined} as {alias};");
            }
        }
        out
    }
}

/// Everything the synthesizer needs for one contract.
#[derive(Debug)]
pub struct RenderInput<'a> {
    pub trait_name: &'a str,
    /// Short name of the module the generated file belongs to.
    pub dest_module: &'a str,
    pub crate_name: &'a str,
    /// `cfg` predicate emitted as an inner attribute, when present.
    pub tags: Option<&'a str>,
    /// Command-line provenance for the generated header.
    pub provenance: &'a str,
    pub methods: &'a [ContractMethod],
    pub used: &'a UsedSet,
}

/// Renders the full generated-file text for one trait.
pub fn render_trait(input: &RenderInput<'_>) -> TraitgenResult<String> {
    let mut retained: Vec<&ContractMethod> = input
        .methods
        .iter()
        .filter(|m| input.used.contains(&m.name))
        .collect();
    retained.sort_by(|a, b| a.name.cmp(&b.name));
    // The used set is keyed by name, so same-named entries render once.
    retained.dedup_by(|a, b| a.name == b.name);

    let mut imports = ImportMap::default();
    let mut body = String::new();
    for m in &retained {
        let _ = writeln!(body, "    {};", render_signature(m, input, &mut imports));
    }

    let mut text = String::new();
    if let Some(tags) = input.tags {
        let _ = writeln!(text, "#![cfg({tags})]");
    }
    let _ = writeln!(text, "//! generated by {}. !DO NOT EDIT!", input.provenance);
    let _ = writeln!(text, "//! belongs to module `{}`.", input.dest_module);
    let use_block = imports.use_block();
    if !use_block.is_empty() {
        text.push('\n');
        text.push_str(&use_block);
    }
    text.push('\n');
    let _ = writeln!(text, "pub trait {} {{", input.trait_name);
    text.push_str(&body);
    text.push_str("}\n");

    let file = syn::parse_file(&text)
        .map_err(|e| TraitgenError::render(e.to_string(), text.clone()))?;
    Ok(prettyplease::unparse(&file))
}

fn render_signature(
    m: &ContractMethod,
    input: &RenderInput<'_>,
    imports: &mut ImportMap,
) -> String {
    let receiver = match m.receiver {
        Receiver::Ref => "&self",
        Receiver::RefMut => "&mut self",
        Receiver::Value => "self",
    };

    let mut sig = format!("fn {}({receiver}", m.name);
    for p in &m.params {
        let _ = write!(sig, ", {}: {}", p.name, render_type(&p.ty, input, imports));
    }
    sig.push(')');

    match m.returns.len() {
        0 => {}
        1 => {
            let _ = write!(sig, " -> {}", render_type(&m.returns[0], input, imports));
        }
        _ => {
            let rendered: Vec<String> = m
                .returns
                .iter()
                .map(|r| render_type(r, input, imports))
                .collect();
            let _ = write!(sig, " -> ({})", rendered.join(", "));
        }
    }
    sig
}

/// Renders one type reference relative to the destination module,
/// registering an import when it lives in a different unit module.
fn render_type(ty: &TypeRef, input: &RenderInput<'_>, imports: &mut ImportMap) -> String {
    let base = match &ty.module {
        Some(module) => {
            let short = module
                .last()
                .map(String::as_str)
                .unwrap_or(input.crate_name);
            if short == input.dest_module {
                ty.base.clone()
            } else if module.is_empty() {
                format!("crate::{}", ty.base)
            } else {
                format!("{}::{}", imports.alias_for(module), ty.base)
            }
        }
        None => ty.base.clone(),
    };

    let mut out = format!("{}{}", ty.prefix, base);
    if !ty.args.is_empty() {
        let args: Vec<String> = ty
            .args
            .iter()
            .map(|a| render_type(a, input, imports))
            .collect();
        let _ = write!(out, "<{}>", args.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Param;

    fn contract(name: &str, params: Vec<Param>, returns: Vec<TypeRef>) -> ContractMethod {
        ContractMethod {
            name: name.into(),
            receiver: Receiver::Ref,
            params,
            returns,
            promoted_from: None,
        }
    }

    fn local_ty(base: &str, module: &[&str]) -> TypeRef {
        TypeRef {
            prefix: String::new(),
            base: base.into(),
            module: Some(module.iter().map(|s| s.to_string()).collect()),
            args: Vec::new(),
        }
    }

    fn input<'a>(
        methods: &'a [ContractMethod],
        used: &'a UsedSet,
    ) -> RenderInput<'a> {
        RenderInput {
            trait_name: "Barer",
            dest_module: "bar",
            crate_name: "fixture",
            tags: None,
            provenance: "traitgen --type bar::Bar",
            methods,
            used,
        }
    }

    #[test]
    fn test_methods_sorted_and_filtered() {
        let methods = vec![
            contract("zeta", Vec::new(), vec![TypeRef::plain("i32")]),
            contract("alpha", Vec::new(), Vec::new()),
            contract("unused", Vec::new(), Vec::new()),
        ];
        let mut used = UsedSet::default();
        used.insert("zeta");
        used.insert("alpha");

        let text = render_trait(&input(&methods, &used)).unwrap();
        let alpha = text.find("fn alpha").unwrap();
        let zeta = text.find("fn zeta").unwrap();
        assert!(alpha < zeta);
        assert!(!text.contains("unused"));
        assert!(text.contains("pub trait Barer"));
        assert!(text.contains("!DO NOT EDIT!"));
    }

    #[test]
    fn test_zero_used_methods_renders_empty_trait() {
        let methods = vec![contract("never", Vec::new(), Vec::new())];
        let used = UsedSet::default();

        let text = render_trait(&input(&methods, &used)).unwrap();
        assert!(text.contains("pub trait Barer"));
        assert!(!text.contains("fn never"));
    }

    #[test]
    fn test_same_module_type_unqualified() {
        let methods = vec![contract(
            "get",
            Vec::new(),
            vec![local_ty("Widget", &["bar"])],
        )];
        let mut used = UsedSet::default();
        used.insert("get");

        let text = render_trait(&input(&methods, &used)).unwrap();
        assert!(text.contains("-> Widget"));
        assert!(!text.contains("use crate::bar"));
    }

    #[test]
    fn test_foreign_module_imported_and_qualified() {
        let methods = vec![contract(
            "fetch",
            vec![Param {
                name: "id".into(),
                ty: TypeRef::plain("u64"),
            }],
            vec![local_ty("Record", &["store"])],
        )];
        let mut used = UsedSet::default();
        used.insert("fetch");

        let text = render_trait(&input(&methods, &used)).unwrap();
        assert!(text.contains("use crate::store;"));
        assert!(text.contains("-> store::Record"));
    }

    #[test]
    fn test_alias_collision_gets_joined_path() {
        let methods = vec![contract(
            "pair",
            Vec::new(),
            vec![
                local_ty("A", &["x", "util"]),
                local_ty("B", &["y", "util"]),
            ],
        )];
        let mut used = UsedSet::default();
        used.insert("pair");

        let text = render_trait(&input(&methods, &used)).unwrap();
        assert!(text.contains("use crate::x::util;"));
        assert!(text.contains("use crate::y::util as y_util;"));
        assert!(text.contains("util::A"));
        assert!(text.contains("y_util::B"));
    }

    #[test]
    fn test_tuple_return_and_tags() {
        let methods = vec![contract(
            "split",
            Vec::new(),
            vec![TypeRef::plain("i32"), TypeRef::plain("bool")],
        )];
        let mut used = UsedSet::default();
        used.insert("split");
        let mut inp = input(&methods, &used);
        inp.tags = Some("feature = \"generated\"");

        let text = render_trait(&inp).unwrap();
        assert!(text.contains("#![cfg(feature = \"generated\")]"));
        assert!(text.contains("-> (i32, bool)"));
    }

    #[test]
    fn test_generic_args_rendered_recursively() {
        let inner = local_ty("Record", &["store"]);
        let outer = TypeRef {
            prefix: String::new(),
            base: "Option".into(),
            module: None,
            args: vec![inner],
        };
        let methods = vec![contract("find", Vec::new(), vec![outer])];
        let mut used = UsedSet::default();
        used.insert("find");

        let text = render_trait(&input(&methods, &used)).unwrap();
        assert!(text.contains("-> Option<store::Record>"));
    }

    #[test]
    fn test_single_segment_collision_gets_distinct_alias() {
        let methods = vec![contract(
            "pair",
            Vec::new(),
            vec![local_ty("A", &["x", "util"]), local_ty("B", &["util"])],
        )];
        let mut used = UsedSet::default();
        used.insert("pair");

        let text = render_trait(&input(&methods, &used)).unwrap();
        assert!(text.contains("use crate::x::util;"));
        assert!(text.contains("use crate::util as util_2;"));
        assert!(text.contains("-> (util::A, util_2::B)"));

        assert_unique_aliases(&text);
    }

    fn assert_unique_aliases(text: &str) {
        let aliases: Vec<&str> = text
            .lines()
            .filter(|l| l.trim_start().starts_with("use "))
            .map(|l| {
                let l = l.trim().trim_end_matches(';');
                l.rsplit_once(" as ")
                    .map(|(_, a)| a)
                    .unwrap_or_else(|| l.rsplit("::").next().unwrap())
            })
            .collect();
        let unique: std::collections::HashSet<&&str> = aliases.iter().collect();
        assert_eq!(aliases.len(), unique.len());
    }

    #[test]
    fn test_import_map_exhausted_walk_appends_suffix() {
        let mut map = ImportMap::default();
        let a = map
            .alias_for(&["x".to_string(), "util".to_string()])
            .to_string();
        let b = map.alias_for(&["util".to_string()]).to_string();
        let c = map
            .alias_for(&["y".to_string(), "x".to_string(), "util".to_string()])
            .to_string();

        assert_eq!(a, "util");
        assert_eq!(b, "util_2");
        assert_eq!(c, "x_util");
        assert_eq!(map.entries().len(), 3);
    }

    #[test]
    fn test_import_map_first_writer_wins() {
        let mut map = ImportMap::default();
        let a = map
            .alias_for(&["x".to_string(), "util".to_string()])
            .to_string();
        let b = map
            .alias_for(&["y".to_string(), "util".to_string()])
            .to_string();
        let again = map
            .alias_for(&["x".to_string(), "util".to_string()])
            .to_string();

        assert_eq!(a, "util");
        assert_eq!(b, "y_util");
        assert_eq!(again, "util");
        assert_eq!(map.entries().len(), 2);
    }
}
