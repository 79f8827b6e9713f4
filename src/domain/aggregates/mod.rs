//! Aggregates - consistency boundaries over the entity graph

mod list_aggregate;

pub use list_aggregate::{
    validate_multi_leader_attachment, AttachMode, AttachmentDecision, CombinedUnit, ListAggregate,
    RosterError, WarlordEligibility,
};
