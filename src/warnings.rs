//! Structured, serializable warnings for recoverable geometric anomalies.
//!
//! No step in the packer ever raises to the caller for a geometric issue —
//! every drop or reclassification is recorded here instead, per the
//! "best effort with diagnostics" contract.

use serde::{Deserialize, Serialize};

/// The closed set of recoverable anomalies a `pack_wall` call can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// An aperture failed the area validity filter and was ignored.
    ApertureFiltered,
    /// An aperture covered >= 80% of the wall area.
    ApertureOversized,
    /// `sanitize` reduced the hole count of a polygon.
    HoleCountDropped,
    /// A multi-component geometry result was collapsed to its largest piece.
    MultiComponentCollapsed,
    /// A placed or custom piece was dropped for falling below the size floor.
    DegenerateDropped,
    /// Strategy `small` found no candidate passing the reinforcement gate;
    /// the row fell back to the row-sweep packer.
    CoverageFallback,
}

/// A single recoverable anomaly, with enough detail to locate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub details: String,
}

impl Warning {
    pub fn new(kind: WarningKind, details: impl Into<String>) -> Self {
        let warning = Self {
            kind,
            details: details.into(),
        };
        tracing::warn!(kind = ?warning.kind, details = %warning.details, "pack_wall anomaly");
        warning
    }
}
