//! Run summaries in plain and JSON form.
//!
//! The summary goes to stderr-adjacent reporting surfaces, never into
//! the generated output itself.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

/// Outcome of processing one unit.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UnitOutcome {
    /// A contract was rendered and written.
    Generated {
        trait_name: String,
        methods: Vec<String>,
        destination: String,
    },
    /// The unit was skipped; the reason says why.
    Skipped { reason: String },
}

/// One unit's line in the summary.
#[derive(Debug, Serialize)]
pub struct UnitReport {
    pub unit: PathBuf,
    #[serde(flatten)]
    pub outcome: UnitOutcome,
}

/// The whole run's summary.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub units: Vec<UnitReport>,
}

impl RunReport {
    pub fn push(&mut self, unit: PathBuf, outcome: UnitOutcome) {
        self.units.push(UnitReport { unit, outcome });
    }

    /// Number of units that produced a contract.
    pub fn generated_count(&self) -> usize {
        self.units
            .iter()
            .filter(|u| matches!(u.outcome, UnitOutcome::Generated { .. }))
            .count()
    }

    /// Human-readable summary.
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for u in &self.units {
            match &u.outcome {
                UnitOutcome::Generated {
                    trait_name,
                    methods,
                    destination,
                } => {
                    let _ = writeln!(
                        out,
                        "{}: trait {} ({} methods) -> {}",
                        u.unit.display(),
                        trait_name,
                        methods.len(),
                        destination
                    );
                }
                UnitOutcome::Skipped { reason } => {
                    let _ = writeln!(out, "{}: skipped ({})", u.unit.display(), reason);
                }
            }
        }
        let _ = writeln!(
            out,
            "{} of {} units generated",
            self.generated_count(),
            self.units.len()
        );
        out
    }

    /// Machine-readable summary.
    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
