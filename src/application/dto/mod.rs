//! Data Transfer Objects - For display-layer boundaries
//!
//! DTOs live in the application layer so a UI or transport adapter can
//! serialize engine output without reaching into domain internals.

pub mod audit_report;
pub mod bonus_summary;

pub use audit_report::{AuditFinding, AuditFindingKind, AuditReport};
pub use bonus_summary::{
    AbilityBadge, BonusSource, FeelNoPainSummary, RollBonusSummary, StatDelta, UnitBonusSummary,
};
