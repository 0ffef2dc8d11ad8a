//! The resolved symbol model for one compilation unit.
//!
//! This is the contract between the syn-based front end and the analysis
//! core: declarations are interned into arenas and referred to by opaque
//! [`DeclId`] handles, never by bare name. Two distinct declarations may
//! share a name across modules, so every identity comparison in the core
//! goes through these handles.
//!
//! The model is built once per unit and is read-only afterward.

use std::collections::HashMap;
use std::path::PathBuf;

/// Opaque identity key for one type declaration.
///
/// Indexes into [`SymbolModel::types`]. Stable for the lifetime of the
/// model; comparable and hashable, carrying no name information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub(crate) usize);

/// A byte range within one source file of the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Index into [`SymbolModel::files`].
    pub file: usize,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Interval containment: does `self` fully enclose `other`?
    ///
    /// Spans in different files never contain each other.
    pub fn contains(&self, other: &Span) -> bool {
        self.file == other.file && self.start <= other.start && other.end <= self.end
    }
}

/// A resolved type reference, structured enough to re-render in a
/// different lexical context than the one it was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Textual prefix preserved verbatim: `""`, `"&"`, `"&mut "`.
    pub prefix: String,
    /// Base identifier (`Bar`, `i32`, `Option`). For references that do
    /// not resolve to a unit-local declaration this may be a full path
    /// (`std::fmt::Display`) rendered as written.
    pub base: String,
    /// Declaring-module path when the base resolves to a declaration in
    /// this unit; `None` for primitives, std types, and foreign crates.
    pub module: Option<Vec<String>>,
    /// Generic arguments, recursively structured.
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// A plain, unqualified reference with no wrapping or arguments.
    pub fn plain(base: impl Into<String>) -> Self {
        Self {
            prefix: String::new(),
            base: base.into(),
            module: None,
            args: Vec::new(),
        }
    }

    /// Walks the reference and its generic arguments, yielding every
    /// declaring-module path mentioned anywhere in the tree.
    pub fn modules(&self) -> Vec<&[String]> {
        let mut out = Vec::new();
        self.collect_modules(&mut out);
        out
    }

    fn collect_modules<'a>(&'a self, out: &mut Vec<&'a [String]>) {
        if let Some(m) = &self.module {
            out.push(m.as_slice());
        }
        for arg in &self.args {
            arg.collect_modules(out);
        }
    }
}

/// One named parameter of a method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Binding name; `_` when the original pattern was not a plain ident.
    pub name: String,
    pub ty: TypeRef,
}

/// Receiver form of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `&self`
    Ref,
    /// `&mut self`
    RefMut,
    /// `self`
    Value,
}

/// A struct or enum declaration in the unit.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub id: DeclId,
    pub name: String,
    /// Module path segments from the crate root (empty at the root).
    pub module: Vec<String>,
    /// `pub` visibility; restricted forms count as internal.
    pub exported: bool,
    /// Promotion edge: the `Deref` target, when one is declared and
    /// resolves to a unit-local type.
    pub deref_target: Option<DeclId>,
    /// Span of the declaration itself (used to locate its source file).
    pub span: Span,
}

/// An inherent method declaration, owned by a [`TypeDecl`].
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub owner: DeclId,
    pub name: String,
    pub receiver: Receiver,
    pub params: Vec<Param>,
    /// Return values in order; a tuple return is flattened, `()` is empty.
    pub returns: Vec<TypeRef>,
    pub exported: bool,
    /// Span of the method body.
    pub body: Span,
}

/// A function without a receiver: free, associated, or a trait-impl item.
///
/// Only the identity-relevant parts of the signature are kept; these
/// feed the constructor-body exclusion rule.
#[derive(Debug, Clone)]
pub struct FreeFn {
    pub name: String,
    /// Unit-local types appearing among the parameters (indirection
    /// stripped).
    pub takes: Vec<DeclId>,
    /// Unit-local types appearing anywhere in the return type, including
    /// inside generic arguments such as `Result<T, E>`.
    pub returns: Vec<DeclId>,
    /// Span of the function body.
    pub body: Span,
}

/// One entry of the use-graph: a method-selector invocation whose
/// receiver resolved to a unit-local type.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub method: String,
    pub receiver: DeclId,
    /// Span of the callee identifier.
    pub span: Span,
}

/// A pre-existing trait declaration, kept for idempotent pre-seeding of
/// regenerated contracts.
#[derive(Debug, Clone)]
pub struct TraitDef {
    pub name: String,
    pub methods: Vec<String>,
}

/// The whole-unit symbol model.
///
/// All vectors preserve a deterministic order: files are sorted by path
/// before parsing, and declarations appear in file-then-source order.
/// That order is the locator's tie-break.
#[derive(Debug, Default)]
pub struct SymbolModel {
    /// Short name of the crate, used as the module short name for
    /// declarations at the crate root.
    pub crate_name: String,
    /// Source files of the unit, sorted.
    pub files: Vec<PathBuf>,
    /// Arena of type declarations; `DeclId` indexes into this.
    pub types: Vec<TypeDecl>,
    /// Inherent methods, in declaration order.
    pub methods: Vec<MethodDecl>,
    /// Body spans of every receiver-bearing method (inherent or trait
    /// impl), per owning type. Feeds the self-call exclusion.
    pub self_bodies: Vec<(DeclId, Span)>,
    /// Receiverless functions, in declaration order.
    pub functions: Vec<FreeFn>,
    /// The use-graph, in traversal order.
    pub calls: Vec<CallSite>,
    /// Pre-existing trait declarations.
    pub traits: Vec<TraitDef>,
    index: HashMap<(Vec<String>, String), DeclId>,
}

impl SymbolModel {
    /// Creates an empty model for a crate with the given short name.
    pub fn with_crate_name(crate_name: impl Into<String>) -> Self {
        Self {
            crate_name: crate_name.into(),
            ..Default::default()
        }
    }

    /// Interns a type declaration and returns its identity key.
    pub fn intern_type(
        &mut self,
        name: String,
        module: Vec<String>,
        exported: bool,
        span: Span,
    ) -> DeclId {
        let id = DeclId(self.types.len());
        self.index.insert((module.clone(), name.clone()), id);
        self.types.push(TypeDecl {
            id,
            name,
            module,
            exported,
            deref_target: None,
            span,
        });
        id
    }

    /// Looks up a declaration by absolute path segments
    /// (`["bar", "Bar"]`). The last segment is the type name.
    pub fn lookup(&self, segments: &[String]) -> Option<DeclId> {
        let (name, module) = segments.split_last()?;
        self.index.get(&(module.to_vec(), name.clone())).copied()
    }

    pub fn type_decl(&self, id: DeclId) -> &TypeDecl {
        &self.types[id.0]
    }

    pub(crate) fn type_decl_mut(&mut self, id: DeclId) -> &mut TypeDecl {
        &mut self.types[id.0]
    }

    /// Module short name of a declaration: last path segment, or the
    /// crate name for declarations at the crate root.
    pub fn module_name(&self, id: DeclId) -> &str {
        let decl = self.type_decl(id);
        decl.module
            .last()
            .map(String::as_str)
            .unwrap_or(&self.crate_name)
    }

    /// Inherent methods of one type, in declaration order.
    pub fn methods_of(&self, id: DeclId) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(move |m| m.owner == id)
    }
}
