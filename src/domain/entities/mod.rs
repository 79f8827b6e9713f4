//! Domain entities - Core business objects with identity

mod ability;
mod army_list;
mod datasheet;
mod enhancement;
mod faction;
mod stratagem;
mod weapon;

pub use ability::{Ability, AbilityType};
pub use army_list::{ArmyList, ArmyListItem, LoadoutSelection, ModelInstance, UnitRef};
pub use datasheet::{
    BattlefieldRole, CompositionLine, DamagedProfile, Datasheet, LeaderConditions, LeaderRules,
    ModelProfile, PointsBracket, WargearOption,
};
pub use enhancement::Enhancement;
pub use faction::{Detachment, Faction};
pub use stratagem::Stratagem;
pub use weapon::{Weapon, WeaponKind, WeaponProfile};
