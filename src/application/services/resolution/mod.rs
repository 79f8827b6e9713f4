//! Resolution engine - the rules-resolution core
//!
//! Pure and synchronous: given a unit, its attached leaders, its
//! loadout and a combat-status snapshot, compute the active
//! game-mechanic modifiers for an attack or defense action. Every
//! function here is a deterministic function of its inputs with no
//! I/O, so re-running the pipeline on every state change is safe and
//! idempotent.
//!
//! Pipeline: [`collect_unit_abilities`] walks the rule sources,
//! [`is_mechanic_active`] filters by conditions and phase,
//! [`aggregate_bonuses`] collapses the survivors into display
//! summaries. [`resolve_unit_bonuses`] runs all three.

mod aggregation;
mod conditions;
mod extraction;
pub mod heuristics;

pub use aggregation::aggregate_bonuses;
pub use conditions::is_mechanic_active;
pub use extraction::collect_unit_abilities;

use crate::application::dto::UnitBonusSummary;
use crate::domain::aggregates::CombinedUnit;
use crate::domain::entities::{Ability, ArmyListItem, ModelProfile, WeaponProfile};
use crate::domain::value_objects::{CombatStatus, GamePhase, Mechanic, Side};

/// The evaluation frame for one query: a unit, its attached leaders,
/// the selected model/weapon profile and the combat-status snapshot.
/// Constructed fresh per query and never cached across roster
/// mutations; the engine borrows everything and owns nothing.
#[derive(Debug, Clone)]
pub struct UnitContext<'a> {
    pub unit: &'a ArmyListItem,
    pub model: Option<&'a ModelProfile>,
    pub weapon_profile: Option<&'a WeaponProfile>,
    pub status: &'a CombatStatus,
    /// Attached leaders in display order
    pub leaders: Vec<&'a ArmyListItem>,
    /// Detachment rules in play for this army
    pub detachment_rules: Vec<&'a Ability>,
}

impl<'a> UnitContext<'a> {
    pub fn new(unit: &'a ArmyListItem, status: &'a CombatStatus) -> Self {
        Self {
            unit,
            model: None,
            weapon_profile: None,
            status,
            leaders: Vec::new(),
            detachment_rules: Vec::new(),
        }
    }

    /// Build a context for a combined fighting unit: the bodyguard (or
    /// standalone item) with its leader group. Returns nothing for a
    /// combined entry that somehow carries no unit at all.
    pub fn from_combined(combined: &'a CombinedUnit, status: &'a CombatStatus) -> Option<Self> {
        let unit = combined
            .bodyguard
            .as_ref()
            .or(combined.standalone.as_ref())?;
        Some(Self {
            unit,
            model: None,
            weapon_profile: None,
            status,
            leaders: combined.leaders.iter().collect(),
            detachment_rules: Vec::new(),
        })
    }

    pub fn with_model(mut self, model: &'a ModelProfile) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_weapon_profile(mut self, profile: &'a WeaponProfile) -> Self {
        self.weapon_profile = Some(profile);
        self
    }

    pub fn with_leader(mut self, leader: &'a ArmyListItem) -> Self {
        self.leaders.push(leader);
        self
    }

    pub fn with_detachment_rules(mut self, rules: &'a [Ability]) -> Self {
        self.detachment_rules.extend(rules.iter());
        self
    }
}

/// Extract, filter and aggregate in one call: the typed bonus summary
/// for one side of an exchange under the given phase.
pub fn resolve_unit_bonuses(
    context: &UnitContext<'_>,
    side: Side,
    phase: GamePhase,
) -> UnitBonusSummary {
    let mechanics = collect_unit_abilities(context, side);
    let active: Vec<Mechanic> = mechanics
        .into_iter()
        .filter(|m| is_mechanic_active(m, context, side, phase))
        .collect();
    aggregate_bonuses(&active, context, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BattlefieldRole, Datasheet};
    use crate::domain::value_objects::{
        CombatStatusFlag, MechanicAttribute, MechanicCondition, MechanicEffect, MechanicSpec,
        MechanicValue,
    };

    fn plus_one_wound_while_leading() -> MechanicSpec {
        MechanicSpec::new(MechanicEffect::RollBonus)
            .with_attribute(MechanicAttribute::Wound)
            .with_value(MechanicValue::Int(1))
            .with_condition(MechanicCondition::leading())
    }

    fn bodyguard() -> ArmyListItem {
        ArmyListItem::from_datasheet(Datasheet::new(
            "ds-squad",
            "faction-a",
            "Intercessor Squad",
            BattlefieldRole::Battleline,
        ))
    }

    fn captain_with(spec: MechanicSpec) -> ArmyListItem {
        ArmyListItem::from_datasheet(
            Datasheet::new("ds-cap", "faction-a", "Captain", BattlefieldRole::Character)
                .with_ability(crate::domain::entities::Ability::new("Rites of Battle").with_mechanic(spec)),
        )
    }

    #[test]
    fn test_collection_is_idempotent() {
        let unit = bodyguard();
        let captain = captain_with(plus_one_wound_while_leading());
        let mut status = CombatStatus::new();
        status.set(CombatStatusFlag::InCover, true);
        let context = UnitContext::new(&unit, &status).with_leader(&captain);

        let first = collect_unit_abilities(&context, Side::Attacker);
        let second = collect_unit_abilities(&context, Side::Attacker);
        assert_eq!(first, second);
    }

    #[test]
    fn test_leading_gated_bonus_end_to_end() {
        let unit = bodyguard();
        let captain = captain_with(plus_one_wound_while_leading());
        let status = CombatStatus::new();

        let led = UnitContext::new(&unit, &status).with_leader(&captain);
        let summary = resolve_unit_bonuses(&led, Side::Attacker, GamePhase::Fight);
        assert_eq!(summary.wound_roll.total, 1);
        assert_eq!(summary.wound_roll.sources[0].name, "Rites of Battle");

        // the same rule authored on the bodyguard itself must not fire,
        // with or without leaders attached
        let own_rule = ArmyListItem::from_datasheet(
            Datasheet::new("ds-squad2", "faction-a", "Intercessor Squad", BattlefieldRole::Battleline)
                .with_ability(
                    crate::domain::entities::Ability::new("Squad Doctrine")
                        .with_mechanic(plus_one_wound_while_leading()),
                ),
        );
        let alone = UnitContext::new(&own_rule, &status);
        let summary = resolve_unit_bonuses(&alone, Side::Attacker, GamePhase::Fight);
        assert_eq!(summary.wound_roll.total, 0);

        let led = UnitContext::new(&own_rule, &status).with_leader(&captain);
        let summary = resolve_unit_bonuses(&led, Side::Attacker, GamePhase::Fight);
        assert_eq!(summary.wound_roll.total, 0);
    }

    #[test]
    fn test_full_pipeline_with_inferred_text_and_status_gate() {
        let unit = ArmyListItem::from_datasheet(
            Datasheet::new("ds-squad", "faction-a", "Heavy Intercessor Squad", BattlefieldRole::Battleline)
                .with_ability(
                    crate::domain::entities::Ability::new("Unyielding in Cover").with_description(
                        "While this unit has the benefit of cover, add 1 to its Save rolls.",
                    ),
                ),
        );
        let mut status = CombatStatus::new();
        let context = UnitContext::new(&unit, &status);
        let summary = resolve_unit_bonuses(&context, Side::Defender, GamePhase::Shooting);
        assert_eq!(summary.save_roll.total, 0);

        status.set(CombatStatusFlag::InCover, true);
        let context = UnitContext::new(&unit, &status);
        let summary = resolve_unit_bonuses(&context, Side::Defender, GamePhase::Shooting);
        assert_eq!(summary.save_roll.total, 1);
    }

    #[test]
    fn test_context_from_combined_unit() {
        use crate::domain::aggregates::{AttachMode, ListAggregate};
        use crate::domain::entities::{ArmyList, LeaderRules};

        let captain = Datasheet::new("ds-cap", "faction-a", "Captain", BattlefieldRole::Character)
            .with_keywords(vec!["Character"])
            .with_leader_rules(LeaderRules {
                can_lead: vec!["Intercessor Squad".to_string()],
                leader_conditions: None,
            });
        let squad = Datasheet::new(
            "ds-squad",
            "faction-a",
            "Intercessor Squad",
            BattlefieldRole::Battleline,
        );

        let list = ArmyList::new("Strike Force", "faction-a");
        let list = ListAggregate::new(&list).add_unit(captain);
        let list = ListAggregate::new(&list).add_unit(squad);
        let captain_id = list.items[0].list_item_id;
        let squad_id = list.items[1].list_item_id;
        let list = ListAggregate::new(&list)
            .attach_leader(captain_id, squad_id, AttachMode::Join)
            .unwrap();

        let combined = ListAggregate::new(&list).combined_units();
        let group = combined.iter().find(|c| c.bodyguard.is_some()).unwrap();

        let status = CombatStatus::new();
        let context = UnitContext::from_combined(group, &status).unwrap();
        assert_eq!(context.unit.datasheet.name, "Intercessor Squad");
        assert_eq!(context.leaders.len(), 1);
        assert_eq!(context.leaders[0].datasheet.name, "Captain");
    }
}
