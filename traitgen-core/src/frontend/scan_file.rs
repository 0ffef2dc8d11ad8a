//! Single-file syntactic scan.
//!
//! Each source file is scanned in isolation (safe to run on a Rayon
//! worker): declarations, impl blocks, `Deref` promotion edges, function
//! signatures, pre-existing traits, and method-call sites are collected
//! with their byte spans materialized immediately. Type paths are
//! resolved lexically to absolute segment lists here; cross-file
//! resolution to identity keys happens later in the merge.
//!
//! Receiver types at call sites come from lexical binding tracking:
//! typed parameters, `let` bindings with explicit types, constructor and
//! struct-literal inference, and `self` inside impl blocks. Receivers
//! that cannot be resolved this way are skipped, never guessed.

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use syn::spanned::Spanned;
use syn::visit::Visit;
use syn::{
    Expr, FnArg, GenericArgument, ImplItem, Item, Pat, PathArguments, ReturnType, Type,
    Visibility,
};

use super::paths::{absolute_type_path, ModulePath, UseTable};
use crate::model::Receiver;

/// A type reference with its path resolved to absolute segments but not
/// yet to an identity key.
#[derive(Debug, Clone)]
pub(crate) struct RawTypeRef {
    pub prefix: String,
    /// Absolute segment candidate for model lookup; empty when the
    /// reference is opaque (tuples, slices, fn pointers).
    pub segments: Vec<String>,
    /// The reference as written, used verbatim when the lookup misses.
    pub written: String,
    pub args: Vec<RawTypeRef>,
}

#[derive(Debug)]
pub(crate) struct RawType {
    pub name: String,
    pub module: Vec<String>,
    pub exported: bool,
    pub range: Range<usize>,
}

#[derive(Debug)]
pub(crate) struct RawParam {
    pub name: String,
    pub ty: RawTypeRef,
}

#[derive(Debug)]
pub(crate) struct RawMethod {
    /// Absolute segments of the owning type.
    pub owner: Vec<String>,
    pub name: String,
    pub receiver: Receiver,
    pub params: Vec<RawParam>,
    pub returns: Vec<RawTypeRef>,
    pub exported: bool,
    pub body: Range<usize>,
}

#[derive(Debug)]
pub(crate) struct RawFn {
    pub name: String,
    pub takes: Vec<Vec<String>>,
    pub returns: Vec<Vec<String>>,
    pub body: Range<usize>,
}

#[derive(Debug)]
pub(crate) struct RawCall {
    /// Absolute segments of the receiver's type.
    pub receiver: Vec<String>,
    pub method: String,
    pub range: Range<usize>,
}

#[derive(Debug)]
pub(crate) struct RawTrait {
    pub name: String,
    pub methods: Vec<String>,
}

/// Everything extracted from one file.
#[derive(Debug, Default)]
pub(crate) struct FileScan {
    pub types: Vec<RawType>,
    pub methods: Vec<RawMethod>,
    /// (owner segments, body range) for every receiver-bearing method,
    /// inherent or trait impl.
    pub self_bodies: Vec<(Vec<String>, Range<usize>)>,
    pub functions: Vec<RawFn>,
    /// (self segments, target segments) per `Deref` impl.
    pub derefs: Vec<(Vec<String>, Vec<String>)>,
    pub calls: Vec<RawCall>,
    pub traits: Vec<RawTrait>,
}

/// Scans one file's source text.
///
/// Returns a parse error message on syntactically broken input; the
/// caller decides whether to skip the file or abort.
pub(crate) fn scan_file(rel_path: &Path, content: &str) -> Result<FileScan, String> {
    let ast = syn::parse_file(content).map_err(|e| e.to_string())?;

    let ctx = ModulePath::from_source_path(rel_path);
    let mut table = UseTable::default();
    table.extend_from_items(&ast.items, &ctx);

    let mut scan = FileScan::default();
    walk_items(&ast.items, &ctx, &table, &mut scan);
    Ok(scan)
}

fn walk_items(items: &[Item], ctx: &ModulePath, table: &UseTable, scan: &mut FileScan) {
    for item in items {
        match item {
            Item::Mod(m) => {
                if let Some((_, inner)) = &m.content {
                    let child_ctx = ctx.child(&m.ident.to_string());
                    let mut child_table = table.clone();
                    child_table.extend_from_items(inner, &child_ctx);
                    walk_items(inner, &child_ctx, &child_table, scan);
                }
            }

            Item::Struct(s) => scan.types.push(RawType {
                name: s.ident.to_string(),
                module: ctx.segments.clone(),
                exported: is_exported(&s.vis),
                range: s.ident.span().byte_range(),
            }),

            Item::Enum(e) => scan.types.push(RawType {
                name: e.ident.to_string(),
                module: ctx.segments.clone(),
                exported: is_exported(&e.vis),
                range: e.ident.span().byte_range(),
            }),

            Item::Impl(imp) => scan_impl(imp, ctx, table, scan),

            Item::Fn(f) => {
                let body = f.block.span().byte_range();
                scan.functions.push(lower_free_fn(&f.sig, None, body.clone(), ctx, table));
                collect_calls(&f.block, &f.sig, None, ctx, table, scan);
            }

            Item::Trait(t) => scan.traits.push(RawTrait {
                name: t.ident.to_string(),
                methods: t
                    .items
                    .iter()
                    .filter_map(|i| match i {
                        syn::TraitItem::Fn(f) => Some(f.sig.ident.to_string()),
                        _ => None,
                    })
                    .collect(),
            }),

            _ => {}
        }
    }
}

fn scan_impl(imp: &syn::ItemImpl, ctx: &ModulePath, table: &UseTable, scan: &mut FileScan) {
    // Only path-shaped self types carry a resolvable identity.
    let Some(self_segs) = type_path_segments(&imp.self_ty) else {
        return;
    };
    let self_segs = absolute_type_path(&self_segs, table, ctx);

    let inherent = imp.trait_.is_none();
    let is_deref = imp
        .trait_
        .as_ref()
        .and_then(|(_, path, _)| path.segments.last())
        .is_some_and(|seg| seg.ident == "Deref");

    if is_deref {
        for item in &imp.items {
            if let ImplItem::Type(assoc) = item {
                if assoc.ident == "Target" {
                    if let Some(target) = type_path_segments(&assoc.ty) {
                        let target = absolute_type_path(&target, table, ctx);
                        scan.derefs.push((self_segs.clone(), target));
                    }
                }
            }
        }
    }

    for item in &imp.items {
        let ImplItem::Fn(f) = item else { continue };
        let body = f.block.span().byte_range();

        match f.sig.receiver() {
            Some(recv) => {
                scan.self_bodies.push((self_segs.clone(), body.clone()));
                if inherent {
                    scan.methods.push(RawMethod {
                        owner: self_segs.clone(),
                        name: f.sig.ident.to_string(),
                        receiver: receiver_form(recv),
                        params: lower_params(&f.sig, Some(&self_segs), ctx, table),
                        returns: lower_returns(&f.sig.output, Some(&self_segs), ctx, table),
                        exported: is_exported(&f.vis),
                        body: body.clone(),
                    });
                }
            }
            None => {
                // Associated functions (and trait-impl constructors like
                // Default::default) feed the constructor exclusion rule.
                scan.functions.push(lower_free_fn(
                    &f.sig,
                    Some(&self_segs),
                    body.clone(),
                    ctx,
                    table,
                ));
            }
        }

        collect_calls(&f.block, &f.sig, Some(&self_segs), ctx, table, scan);
    }
}

fn is_exported(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

fn receiver_form(recv: &syn::Receiver) -> Receiver {
    match (&recv.reference, &recv.mutability) {
        (Some(_), Some(_)) => Receiver::RefMut,
        (Some(_), None) => Receiver::Ref,
        (None, _) => Receiver::Value,
    }
}

/// Extracts the ident segments of a path-shaped type, stripping one
/// level of reference indirection and ignoring generic arguments.
fn type_path_segments(ty: &Type) -> Option<Vec<String>> {
    match ty {
        Type::Reference(r) => type_path_segments(&r.elem),
        Type::Paren(p) => type_path_segments(&p.elem),
        Type::Path(p) if p.qself.is_none() => Some(
            p.path
                .segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect(),
        ),
        _ => None,
    }
}

/// Lowers a syn type into a [`RawTypeRef`].
fn lower_type(
    ty: &Type,
    self_segs: Option<&[String]>,
    ctx: &ModulePath,
    table: &UseTable,
) -> RawTypeRef {
    match ty {
        Type::Reference(r) => {
            let mut inner = lower_type(&r.elem, self_segs, ctx, table);
            let prefix = if r.mutability.is_some() { "&mut " } else { "&" };
            inner.prefix = format!("{}{}", prefix, inner.prefix);
            inner
        }
        Type::Paren(p) => lower_type(&p.elem, self_segs, ctx, table),
        Type::Path(p) if p.qself.is_none() => {
            let idents: Vec<String> = p
                .path
                .segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect();

            // `Self` stands for the impl's self type.
            let (segments, written) = if idents.len() == 1 && idents[0] == "Self" {
                match self_segs {
                    Some(s) => (s.to_vec(), s.join("::")),
                    None => (Vec::new(), "Self".to_string()),
                }
            } else {
                (
                    absolute_type_path(&idents, table, ctx),
                    idents.join("::"),
                )
            };

            let args = match p.path.segments.last().map(|s| &s.arguments) {
                Some(PathArguments::AngleBracketed(ab)) => ab
                    .args
                    .iter()
                    .filter_map(|a| match a {
                        GenericArgument::Type(t) => {
                            Some(lower_type(t, self_segs, ctx, table))
                        }
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };

            RawTypeRef {
                prefix: String::new(),
                segments,
                written,
                args,
            }
        }
        // Tuples, slices, fn pointers, trait objects: kept opaque and
        // re-rendered as written. The final formatting pass normalizes
        // token spacing.
        other => RawTypeRef {
            prefix: String::new(),
            segments: Vec::new(),
            written: quote::quote!(#other).to_string(),
            args: Vec::new(),
        },
    }
}

fn lower_params(
    sig: &syn::Signature,
    self_segs: Option<&[String]>,
    ctx: &ModulePath,
    table: &UseTable,
) -> Vec<RawParam> {
    sig.inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Receiver(_) => None,
            FnArg::Typed(pt) => {
                let name = match &*pt.pat {
                    Pat::Ident(pi) => pi.ident.to_string(),
                    _ => "_".to_string(),
                };
                Some(RawParam {
                    name,
                    ty: lower_type(&pt.ty, self_segs, ctx, table),
                })
            }
        })
        .collect()
}

/// Lowers a return type to an ordered value list: `()` is empty, a
/// tuple is flattened, anything else is a single entry.
fn lower_returns(
    output: &ReturnType,
    self_segs: Option<&[String]>,
    ctx: &ModulePath,
    table: &UseTable,
) -> Vec<RawTypeRef> {
    match output {
        ReturnType::Default => Vec::new(),
        ReturnType::Type(_, ty) => match &**ty {
            Type::Tuple(t) => t
                .elems
                .iter()
                .map(|e| lower_type(e, self_segs, ctx, table))
                .collect(),
            other => vec![lower_type(other, self_segs, ctx, table)],
        },
    }
}

fn lower_free_fn(
    sig: &syn::Signature,
    self_segs: Option<&[String]>,
    body: Range<usize>,
    ctx: &ModulePath,
    table: &UseTable,
) -> RawFn {
    let mut takes = Vec::new();
    for arg in &sig.inputs {
        if let FnArg::Typed(pt) = arg {
            if let Some(segs) = type_path_segments(&pt.ty) {
                takes.push(resolve_maybe_self(&segs, self_segs, ctx, table));
            }
        }
    }

    let mut returns = Vec::new();
    if let ReturnType::Type(_, ty) = &sig.output {
        collect_return_candidates(ty, self_segs, ctx, table, &mut returns);
    }

    RawFn {
        name: sig.ident.to_string(),
        takes,
        returns,
        body,
    }
}

/// Collects every path-shaped type mentioned in a return type,
/// recursing through references, tuples, and generic arguments so
/// factories like `fn make() -> Result<Bar, E>` are recognized.
fn collect_return_candidates(
    ty: &Type,
    self_segs: Option<&[String]>,
    ctx: &ModulePath,
    table: &UseTable,
    out: &mut Vec<Vec<String>>,
) {
    match ty {
        Type::Reference(r) => collect_return_candidates(&r.elem, self_segs, ctx, table, out),
        Type::Paren(p) => collect_return_candidates(&p.elem, self_segs, ctx, table, out),
        Type::Tuple(t) => {
            for e in &t.elems {
                collect_return_candidates(e, self_segs, ctx, table, out);
            }
        }
        Type::Path(p) if p.qself.is_none() => {
            let idents: Vec<String> = p
                .path
                .segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect();
            out.push(resolve_maybe_self(&idents, self_segs, ctx, table));

            if let Some(PathArguments::AngleBracketed(ab)) =
                p.path.segments.last().map(|s| &s.arguments)
            {
                for arg in &ab.args {
                    if let GenericArgument::Type(t) = arg {
                        collect_return_candidates(t, self_segs, ctx, table, out);
                    }
                }
            }
        }
        _ => {}
    }
}

fn resolve_maybe_self(
    idents: &[String],
    self_segs: Option<&[String]>,
    ctx: &ModulePath,
    table: &UseTable,
) -> Vec<String> {
    if idents.len() == 1 && idents[0] == "Self" {
        if let Some(s) = self_segs {
            return s.to_vec();
        }
    }
    absolute_type_path(idents, table, ctx)
}

// ---------------------------------------------------------------------
// Call-site collection
// ---------------------------------------------------------------------

struct CallCollector<'a> {
    ctx: &'a ModulePath,
    table: &'a UseTable,
    /// Lexical bindings: variable name to absolute type segments.
    locals: HashMap<String, Vec<String>>,
    sites: Vec<RawCall>,
}

impl<'a> CallCollector<'a> {
    fn resolve_receiver(&self, expr: &Expr) -> Option<Vec<String>> {
        match expr {
            Expr::Reference(r) => self.resolve_receiver(&r.expr),
            Expr::Paren(p) => self.resolve_receiver(&p.expr),
            Expr::Path(p) if p.qself.is_none() && p.path.segments.len() == 1 => {
                let name = p.path.segments[0].ident.to_string();
                self.locals.get(&name).cloned()
            }
            _ => None,
        }
    }

    /// Infers the type of a binding initializer: struct literals,
    /// `Type::assoc(..)` constructor calls, and unit-struct paths.
    fn infer_expr_type(&self, expr: &Expr) -> Option<Vec<String>> {
        match expr {
            Expr::Reference(r) => self.infer_expr_type(&r.expr),
            Expr::Paren(p) => self.infer_expr_type(&p.expr),
            Expr::Struct(s) if s.qself.is_none() => {
                let idents: Vec<String> = s
                    .path
                    .segments
                    .iter()
                    .map(|seg| seg.ident.to_string())
                    .collect();
                Some(absolute_type_path(&idents, self.table, self.ctx))
            }
            Expr::Call(c) => match &*c.func {
                Expr::Path(p) if p.qself.is_none() && p.path.segments.len() >= 2 => {
                    let idents: Vec<String> = p
                        .path
                        .segments
                        .iter()
                        .take(p.path.segments.len() - 1)
                        .map(|seg| seg.ident.to_string())
                        .collect();
                    Some(absolute_type_path(&idents, self.table, self.ctx))
                }
                _ => None,
            },
            Expr::Path(p) if p.qself.is_none() => {
                let idents: Vec<String> = p
                    .path
                    .segments
                    .iter()
                    .map(|seg| seg.ident.to_string())
                    .collect();
                Some(absolute_type_path(&idents, self.table, self.ctx))
            }
            _ => None,
        }
    }
}

impl<'a, 'ast> Visit<'ast> for CallCollector<'a> {
    fn visit_local(&mut self, node: &'ast syn::Local) {
        // Visit the initializer first so call sites inside it are seen
        // before the new binding shadows anything.
        syn::visit::visit_local(self, node);

        match &node.pat {
            Pat::Type(pt) => {
                if let (Pat::Ident(pi), Some(segs)) =
                    (&*pt.pat, type_path_segments(&pt.ty))
                {
                    let abs = absolute_type_path(&segs, self.table, self.ctx);
                    self.locals.insert(pi.ident.to_string(), abs);
                }
            }
            Pat::Ident(pi) => {
                if let Some(init) = &node.init {
                    if let Some(abs) = self.infer_expr_type(&init.expr) {
                        self.locals.insert(pi.ident.to_string(), abs);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        if let Some(receiver) = self.resolve_receiver(&node.receiver) {
            self.sites.push(RawCall {
                receiver,
                method: node.method.to_string(),
                range: node.method.span().byte_range(),
            });
        }
        syn::visit::visit_expr_method_call(self, node);
    }
}

/// Walks one function body and appends its resolvable call sites.
fn collect_calls(
    block: &syn::Block,
    sig: &syn::Signature,
    self_segs: Option<&[String]>,
    ctx: &ModulePath,
    table: &UseTable,
    scan: &mut FileScan,
) {
    let mut locals = HashMap::new();

    if sig.receiver().is_some() {
        if let Some(s) = self_segs {
            locals.insert("self".to_string(), s.to_vec());
        }
    }
    for arg in &sig.inputs {
        if let FnArg::Typed(pt) = arg {
            if let (Pat::Ident(pi), Some(segs)) = (&*pt.pat, type_path_segments(&pt.ty)) {
                let abs = resolve_maybe_self(&segs, self_segs, ctx, table);
                locals.insert(pi.ident.to_string(), abs);
            }
        }
    }

    let mut collector = CallCollector {
        ctx,
        table,
        locals,
        sites: Vec::new(),
    };
    collector.visit_block(block);
    scan.calls.extend(collector.sites);
}
