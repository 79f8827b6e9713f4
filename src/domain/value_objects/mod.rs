//! Value objects - Immutable objects defined by their attributes

mod combat_status;
mod ids;
mod keywords;
mod loadout;
mod mechanic;

pub use combat_status::{
    combat_status_flags, CombatStatus, CombatStatusFlag, CombatStatusFlagInfo, GamePhase, Side,
    TurnOwner,
};
pub use ids::{DatasheetId, EnhancementId, FactionId, ListId, ListItemId, StratagemId};
pub use keywords::KeywordList;
pub use loadout::{ConstraintKind, LoadoutConstraint};
pub use mechanic::{
    ConditionState, Mechanic, MechanicAttribute, MechanicCondition, MechanicEffect,
    MechanicSource, MechanicSpec, MechanicTarget, MechanicValue, Provenance, SourceAttribution,
    SourceKind, SyntheticState,
};
