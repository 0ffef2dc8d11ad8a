//! The per-unit pipeline behind the public builder API.
//!
//! scan files -> build model -> locate -> method set -> usage ->
//! render -> write. Units are independent; the builder holds only the
//! request, never cross-unit state.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::load_config;
use crate::derive::{derive_file_name, derive_trait_name};
use crate::error::{TraitgenError, TraitgenResult};
use crate::frontend::build_model;
use crate::locate::{locate_type, parse_selector};
use crate::methods::collect_methods;
use crate::render::{render_trait, RenderInput};
use crate::scan::gather_rs_files_with_excludes;
use crate::sink::{resolve_sink, write_rendered, Sink};
use crate::usage::scan_usage;

/// Result of one successful synthesis.
#[derive(Debug)]
pub struct Synthesis {
    pub trait_name: String,
    /// Retained method names, in rendered (ascending) order.
    pub methods: Vec<String>,
    /// The formatted generated-file text.
    pub text: String,
    pub destination: Sink,
}

/// Fluent entry point: one request for one unit.
///
/// ```no_run
/// use traitgen_core::Traitgen;
///
/// let synthesis = Traitgen::new(".", "bar::Bar")
///     .tags("feature = \"generated\"")
///     .run()?;
/// # Ok::<(), traitgen_core::TraitgenError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Traitgen {
    root: PathBuf,
    selector: String,
    name: Option<String>,
    module: Option<String>,
    tags: Option<String>,
    output: Option<String>,
    provenance: Option<String>,
}

impl Traitgen {
    pub fn new(root: impl Into<PathBuf>, selector: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            selector: selector.into(),
            name: None,
            module: None,
            tags: None,
            output: None,
            provenance: None,
        }
    }

    /// Explicit trait name instead of the derived agent noun.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Destination module for the generated declaration.
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// `cfg` predicate for the generated file's build-tag line.
    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Output target: `-` for stdout, otherwise a path.
    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Command line recorded in the generated header. Defaults to a
    /// reconstructed invocation.
    pub fn provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    /// Runs the pipeline for this unit.
    ///
    /// Returns `Ok(None)` when the unit contains no matching type; that
    /// is an expected per-unit outcome, not an error.
    pub fn run(self) -> TraitgenResult<Option<Synthesis>> {
        let selector = parse_selector(&self.selector)?;

        let config = load_config(&self.root)
            .map_err(|e| TraitgenError::config(self.root.join("traitgen.toml"), e.to_string()))?
            .unwrap_or_default();
        let name = self.name.or(config.name);
        let module = self.module.or(config.module);
        let tags = self.tags.or(config.tags);
        let output = self.output.or(config.output);
        let extra_excludes = config.exclude.unwrap_or_default();

        let exclude_refs: Vec<&str> = extra_excludes.iter().map(String::as_str).collect();
        let files = gather_rs_files_with_excludes(&self.root, &exclude_refs).map_err(|e| {
            TraitgenError::Output {
                path: self.root.clone(),
                message: e.to_string(),
                source: None,
            }
        })?;
        info!(unit = %self.root.display(), files = files.len(), "scanned unit");

        let model = build_model(&self.root, &files);

        let Some(id) = locate_type(&model, &selector) else {
            info!(
                unit = %self.root.display(),
                selector = %self.selector,
                "type not found in unit"
            );
            return Ok(None);
        };

        let type_name = model.type_decl(id).name.clone();
        let type_file = model.files[model.type_decl(id).span.file].clone();
        let own_module = model.module_name(id).to_string();
        let dest_module = module.unwrap_or_else(|| own_module.clone());
        let foreign = dest_module != own_module;

        let methods = collect_methods(&model, id, foreign);
        let trait_name = name.unwrap_or_else(|| derive_trait_name(&type_name));
        let used = scan_usage(&model, id, &trait_name);
        debug!(
            candidates = methods.len(),
            used = used.len(),
            "usage scan complete"
        );

        let provenance = self
            .provenance
            .unwrap_or_else(|| format!("traitgen --type {}", self.selector));
        let text = render_trait(&RenderInput {
            trait_name: &trait_name,
            dest_module: &dest_module,
            crate_name: &model.crate_name,
            tags: tags.as_deref(),
            provenance: &provenance,
            methods: &methods,
            used: &used,
        })?;

        let mut retained: Vec<String> = methods
            .iter()
            .filter(|m| used.contains(&m.name))
            .map(|m| m.name.clone())
            .collect();
        retained.sort();
        retained.dedup();

        let file_name = derive_file_name(&trait_name);
        let destination = resolve_sink(output.as_deref(), &type_file, &file_name);
        write_rendered(&destination, &text)?;
        info!(
            trait_name = %trait_name,
            methods = retained.len(),
            destination = %destination.describe(),
            "contract written"
        );

        Ok(Some(Synthesis {
            trait_name,
            methods: retained,
            text,
            destination,
        }))
    }
}
