//! Output sink resolution and writing.
//!
//! Nothing is opened before rendering succeeds, so a failed render
//! leaves no partial artifact behind.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, TraitgenResult};

/// Where one rendered contract goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

impl Sink {
    /// Display form for logs and reports.
    pub fn describe(&self) -> String {
        match self {
            Sink::Stdout => "-".to_string(),
            Sink::File(path) => path.display().to_string(),
        }
    }
}

/// Resolves the destination for one contract.
///
/// `-` means stdout; any other explicit path is used verbatim; with no
/// override the derived file name lands next to the file declaring the
/// located type.
pub fn resolve_sink(output: Option<&str>, type_file: &Path, derived_name: &str) -> Sink {
    match output {
        Some("-") => Sink::Stdout,
        Some(path) => Sink::File(PathBuf::from(path)),
        None => {
            let dir = type_file.parent().unwrap_or_else(|| Path::new("."));
            Sink::File(dir.join(derived_name))
        }
    }
}

/// Writes fully rendered text to the sink in one buffered pass.
pub fn write_rendered(sink: &Sink, text: &str) -> TraitgenResult<()> {
    match sink {
        Sink::Stdout => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(text.as_bytes()).with_path("-")?;
            lock.flush().with_path("-")
        }
        Sink::File(path) => {
            let file = std::fs::File::create(path).with_path(path.clone())?;
            let mut writer = BufWriter::new(file);
            writer.write_all(text.as_bytes()).with_path(path.clone())?;
            writer.flush().with_path(path.clone())
        }
    }
}
