//! Application services - Use case implementations
//!
//! Each service follows hexagonal architecture principles, accepting
//! its dependencies through outbound ports and returning domain
//! entities or DTOs. The resolution submodule is the pure rules engine
//! and takes no dependencies at all.

pub mod audit_service;
pub mod loadout_service;
pub mod resolution;
pub mod roster_service;

pub use audit_service::AuditService;
pub use loadout_service::{option_legality, set_option_count, LoadoutError, OptionLegality};
pub use resolution::{
    aggregate_bonuses, collect_unit_abilities, is_mechanic_active, resolve_unit_bonuses,
    UnitContext,
};
pub use roster_service::{CreateListRequest, RosterService, RosterServiceImpl};
