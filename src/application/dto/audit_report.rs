//! Audit report DTOs - output of the offline rule-data reporter

use serde::Serialize;

use crate::domain::value_objects::MechanicSpec;

/// Why an ability was flagged for human review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditFindingKind {
    /// Mechanics exist only because the text heuristics matched;
    /// regex-style inference can mis-tag and should be reviewed
    HeuristicOnly,
    /// The description matched no known pattern; the ability currently
    /// contributes nothing
    Unclassified,
}

impl AuditFindingKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HeuristicOnly => "heuristic-only",
            Self::Unclassified => "unclassified",
        }
    }
}

/// One flagged ability.
#[derive(Debug, Clone, Serialize)]
pub struct AuditFinding {
    pub datasheet: String,
    pub ability: String,
    pub kind: AuditFindingKind,
    /// What the heuristics inferred, for review side-by-side with the text
    pub inferred: Vec<MechanicSpec>,
}

/// Best-effort report over one faction's rule data.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub faction: String,
    pub abilities_scanned: usize,
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    pub fn heuristic_only(&self) -> impl Iterator<Item = &AuditFinding> {
        self.findings
            .iter()
            .filter(|f| f.kind == AuditFindingKind::HeuristicOnly)
    }

    pub fn unclassified(&self) -> impl Iterator<Item = &AuditFinding> {
        self.findings
            .iter()
            .filter(|f| f.kind == AuditFindingKind::Unclassified)
    }
}
