//! Integration test suite for traitgen-core.
//!
//! Each test builds a small on-disk crate in a temp directory and runs
//! the full pipeline against it.

use crate::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_project() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("traitgen_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(dir.join("src")).unwrap();
    write_file(
        &dir.join("Cargo.toml"),
        "[package]\nname = \"fixture\"\nversion = \"0.1.0\"\n",
    );
    write_file(&dir.join("src/lib.rs"), "pub mod bar;\npub mod foo;\n");
    dir
}

const BAR_RS: &str = r#"
use std::ops::Deref;

pub struct Alpha;

impl Alpha {
    pub fn embedded_method(&self) {}
}

pub struct Bar {
    alpha: Alpha,
    count: i32,
}

impl Bar {
    pub fn constant(&self) -> i32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    fn internal(&self) -> i32 {
        self.constant()
    }
}

impl Deref for Bar {
    type Target = Alpha;

    fn deref(&self) -> &Alpha {
        &self.alpha
    }
}

pub fn new_bar() -> Bar {
    let b = Bar { alpha: Alpha, count: 7 };
    b.constant();
    b
}
"#;

// Core Test 1: the full promotion scenario, written next to the type.
#[test]
fn test_promoted_and_direct_methods_extracted() {
    let root = setup_temp_project();
    write_file(&root.join("src/bar.rs"), BAR_RS);
    write_file(
        &root.join("src/foo.rs"),
        r#"
use crate::bar::Bar;

pub fn consume(b: &Bar) -> i32 {
    b.embedded_method();
    b.constant()
}
"#,
    );

    let synthesis = Traitgen::new(&root, "bar::Bar").run().unwrap().unwrap();
    assert_eq!(synthesis.trait_name, "Barer");
    assert_eq!(
        synthesis.methods,
        vec!["constant".to_string(), "embedded_method".to_string()]
    );

    let out = root.join("src/barer_gen.rs");
    assert_eq!(synthesis.destination, Sink::File(out.clone()));
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("pub trait Barer"));
    assert!(text.contains("fn constant(&self) -> i32;"));
    assert!(text.contains("fn embedded_method(&self);"));
    assert!(text.contains("!DO NOT EDIT!"));

    // Sorted ascending, no leakage of unused or excluded methods.
    assert!(text.find("fn constant").unwrap() < text.find("fn embedded_method").unwrap());
    assert!(!text.contains("fn reset"));
    assert!(!text.contains("fn internal"));

    fs::remove_dir_all(&root).ok();
}

// Core Test 2: self-calls and constructor bodies never count as use.
#[test]
fn test_exclusions_yield_empty_trait() {
    let root = setup_temp_project();
    write_file(&root.join("src/bar.rs"), BAR_RS);
    write_file(&root.join("src/foo.rs"), "pub fn unrelated() {}\n");

    let synthesis = Traitgen::new(&root, "bar::Bar").run().unwrap().unwrap();
    assert!(synthesis.methods.is_empty());

    let text = fs::read_to_string(root.join("src/barer_gen.rs")).unwrap();
    assert!(text.contains("pub trait Barer"));
    assert!(!text.contains("fn "));

    fs::remove_dir_all(&root).ok();
}

// Core Test 3: a function taking the type as a parameter is not a
// constructor, even when it also returns it.
#[test]
fn test_transformer_calls_count() {
    let root = setup_temp_project();
    write_file(&root.join("src/bar.rs"), BAR_RS);
    write_file(
        &root.join("src/foo.rs"),
        r#"
use crate::bar::Bar;

pub fn touch(b: Bar) -> Bar {
    b.constant();
    b
}
"#,
    );

    let synthesis = Traitgen::new(&root, "bar::Bar").run().unwrap().unwrap();
    assert_eq!(synthesis.methods, vec!["constant".to_string()]);

    fs::remove_dir_all(&root).ok();
}

// Core Test 4: regeneration is idempotent; an existing contract file
// pre-seeds the used set so methods never drop out.
#[test]
fn test_regeneration_preserves_existing_methods() {
    let root = setup_temp_project();
    write_file(&root.join("src/bar.rs"), BAR_RS);
    write_file(
        &root.join("src/foo.rs"),
        r#"
use crate::bar::Bar;

pub fn consume(b: &Bar) -> i32 {
    b.embedded_method();
    b.constant()
}
"#,
    );

    let first = Traitgen::new(&root, "bar::Bar").run().unwrap().unwrap();
    assert_eq!(first.methods.len(), 2);

    // The caller of constant() disappears; the generated trait keeps it.
    write_file(
        &root.join("src/foo.rs"),
        r#"
use crate::bar::Bar;

pub fn consume(b: &Bar) {
    b.embedded_method();
}
"#,
    );

    let second = Traitgen::new(&root, "bar::Bar").run().unwrap().unwrap();
    assert_eq!(
        second.methods,
        vec!["constant".to_string(), "embedded_method".to_string()]
    );
    assert_eq!(first.text, second.text);

    fs::remove_dir_all(&root).ok();
}

// Core Test 5: same-named methods across promotion paths collapse into
// one rendered signature. Known property of the name-keyed used set.
#[test]
fn test_promotion_name_collision_collapses() {
    let root = setup_temp_project();
    write_file(
        &root.join("src/bar.rs"),
        r#"
use std::ops::Deref;

pub struct Inner;

impl Inner {
    pub fn reset(&self) -> i32 {
        0
    }
}

pub struct Outer {
    inner: Inner,
}

impl Outer {
    pub fn reset(&self) -> i32 {
        1
    }
}

impl Deref for Outer {
    type Target = Inner;

    fn deref(&self) -> &Inner {
        &self.inner
    }
}
"#,
    );
    write_file(
        &root.join("src/foo.rs"),
        r#"
use crate::bar::Outer;

pub fn drive(o: &Outer) -> i32 {
    o.reset()
}
"#,
    );

    let synthesis = Traitgen::new(&root, "bar::Outer").run().unwrap().unwrap();
    assert_eq!(synthesis.methods, vec!["reset".to_string()]);
    assert_eq!(synthesis.text.matches("fn reset").count(), 1);

    fs::remove_dir_all(&root).ok();
}

// Core Test 6: a foreign destination module drops unexported methods
// from the candidate set.
#[test]
fn test_foreign_module_drops_internal_methods() {
    let root = setup_temp_project();
    let source = r#"
pub struct Bar;

impl Bar {
    pub fn visible(&self) -> i32 {
        1
    }

    fn hidden(&self) -> i32 {
        2
    }
}

pub fn probe(b: &Bar) -> i32 {
    b.visible() + b.hidden()
}
"#;
    write_file(&root.join("src/bar.rs"), source);
    write_file(&root.join("src/foo.rs"), "pub fn unrelated() {}\n");

    let same = Traitgen::new(&root, "bar::Bar")
        .output("-")
        .run()
        .unwrap()
        .unwrap();
    assert_eq!(
        same.methods,
        vec!["hidden".to_string(), "visible".to_string()]
    );

    let foreign = Traitgen::new(&root, "bar::Bar")
        .module("store")
        .output("-")
        .run()
        .unwrap()
        .unwrap();
    assert_eq!(foreign.methods, vec!["visible".to_string()]);
    assert!(foreign.text.contains("`store`"));

    fs::remove_dir_all(&root).ok();
}

// Core Test 7: explicit output path and build tags.
#[test]
fn test_explicit_output_and_tags() {
    let root = setup_temp_project();
    write_file(&root.join("src/bar.rs"), BAR_RS);
    write_file(
        &root.join("src/foo.rs"),
        r#"
use crate::bar::Bar;

pub fn consume(b: &Bar) -> i32 {
    b.constant()
}
"#,
    );

    let out = root.join("custom_gen.rs");
    let synthesis = Traitgen::new(&root, "bar::Bar")
        .name("BarContract")
        .tags("feature = \"generated\"")
        .output(out.to_str().unwrap())
        .run()
        .unwrap()
        .unwrap();

    assert_eq!(synthesis.trait_name, "BarContract");
    assert_eq!(synthesis.destination, Sink::File(out.clone()));
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("#![cfg(feature = \"generated\")]"));
    assert!(text.contains("pub trait BarContract"));

    fs::remove_dir_all(&root).ok();
}

// Core Test 8: the generated text always re-parses as valid Rust.
#[test]
fn test_generated_text_parses() {
    let root = setup_temp_project();
    write_file(&root.join("src/bar.rs"), BAR_RS);
    write_file(
        &root.join("src/foo.rs"),
        r#"
use crate::bar::Bar;

pub fn consume(b: &Bar) -> i32 {
    b.embedded_method();
    b.constant()
}
"#,
    );

    let synthesis = Traitgen::new(&root, "bar::Bar")
        .output("-")
        .run()
        .unwrap()
        .unwrap();
    assert!(syn::parse_file(&synthesis.text).is_ok());

    fs::remove_dir_all(&root).ok();
}
