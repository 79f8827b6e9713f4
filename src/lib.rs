//! Rosterforge - army-list builder and combat rules engine for
//! tabletop wargames
//!
//! The core is the rules-resolution engine: given a unit's datasheet,
//! its attached leaders, its equipped wargear and enhancements, and a
//! snapshot of battlefield conditions, it deterministically computes
//! the active game-mechanic modifiers for an attack or defense action.
//! List management (leader attachment, enhancements, loadouts) operates
//! on immutable snapshots; persistence and faction-data loading sit
//! behind ports with thin JSON adapters.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::dto::UnitBonusSummary;
pub use application::services::resolution::{
    collect_unit_abilities, resolve_unit_bonuses, UnitContext,
};
pub use domain::aggregates::{AttachMode, AttachmentDecision, ListAggregate};
pub use domain::value_objects::{combat_status_flags, CombatStatus, GamePhase, Side};
