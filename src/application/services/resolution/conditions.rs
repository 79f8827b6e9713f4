//! Condition evaluation - decides whether a mechanic is currently active

use crate::application::services::resolution::UnitContext;
use crate::domain::value_objects::{
    ConditionState, GamePhase, Mechanic, MechanicCondition, Side, SyntheticState,
};

/// Whether a mechanic applies under the given context and phase.
///
/// A mechanic with no conditions is always active. Conditions combine
/// with AND semantics; the states inside one condition with OR
/// semantics. The `side` parameter is accepted for signature parity
/// with callers but side-relevance of individual flags is a
/// presentation concern: the engine evaluates whatever flags the given
/// status register holds.
pub fn is_mechanic_active(
    mechanic: &Mechanic,
    context: &UnitContext<'_>,
    _side: Side,
    phase: GamePhase,
) -> bool {
    mechanic
        .spec
        .conditions
        .iter()
        .all(|condition| condition_met(condition, mechanic, context, phase))
}

fn condition_met(
    condition: &MechanicCondition,
    mechanic: &Mechanic,
    context: &UnitContext<'_>,
    phase: GamePhase,
) -> bool {
    condition.states.iter().any(|state| match state {
        ConditionState::Flag(flag) => context.status.get(*flag),
        // leader-only bonuses must not leak onto bodyguard-only
        // abilities: the source itself must be leader-derived
        ConditionState::Synthetic(SyntheticState::Leading) => {
            !context.leaders.is_empty() && mechanic.source.kind.is_leader_derived()
        }
        ConditionState::Phase(required) => *required == phase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ArmyListItem, BattlefieldRole, Datasheet};
    use crate::domain::value_objects::{
        CombatStatus, CombatStatusFlag, MechanicEffect, MechanicSource, MechanicSpec, Provenance,
        SourceKind,
    };

    fn item(name: &str) -> ArmyListItem {
        ArmyListItem::from_datasheet(Datasheet::new(
            format!("ds-{name}"),
            "faction-a",
            name,
            BattlefieldRole::Battleline,
        ))
    }

    fn mechanic(conditions: Vec<MechanicCondition>, kind: SourceKind) -> Mechanic {
        let mut spec = MechanicSpec::new(MechanicEffect::RollBonus);
        spec.conditions = conditions;
        Mechanic::new(spec, MechanicSource::new("Test Rule", kind), Provenance::Structured)
    }

    #[test]
    fn test_no_conditions_is_always_active() {
        let unit = item("Intercessor Squad");
        let status = CombatStatus::new();
        let context = UnitContext::new(&unit, &status);
        let m = mechanic(vec![], SourceKind::DatasheetAbility);
        assert!(is_mechanic_active(&m, &context, Side::Attacker, GamePhase::Fight));
    }

    #[test]
    fn test_and_across_conditions_or_within_states() {
        let unit = item("Intercessor Squad");
        let mut status = CombatStatus::new();
        let m = mechanic(
            vec![
                MechanicCondition::any_of(vec![
                    ConditionState::Flag(CombatStatusFlag::InCover),
                    ConditionState::Flag(CombatStatusFlag::RemainedStationary),
                ]),
                MechanicCondition::flag(CombatStatusFlag::Charged),
            ],
            SourceKind::DatasheetAbility,
        );

        // neither condition satisfied
        let context = UnitContext::new(&unit, &status);
        assert!(!is_mechanic_active(&m, &context, Side::Defender, GamePhase::Fight));

        // OR leg satisfied, AND leg not
        status.set(CombatStatusFlag::RemainedStationary, true);
        let context = UnitContext::new(&unit, &status);
        assert!(!is_mechanic_active(&m, &context, Side::Defender, GamePhase::Fight));

        // both satisfied
        status.set(CombatStatusFlag::Charged, true);
        let context = UnitContext::new(&unit, &status);
        assert!(is_mechanic_active(&m, &context, Side::Defender, GamePhase::Fight));
    }

    #[test]
    fn test_leading_requires_attached_leaders_and_leader_source() {
        let unit = item("Intercessor Squad");
        let captain = item("Captain");
        let status = CombatStatus::new();

        let from_leader = mechanic(vec![MechanicCondition::leading()], SourceKind::LeaderAbility);
        let from_unit = mechanic(
            vec![MechanicCondition::leading()],
            SourceKind::DatasheetAbility,
        );

        // no leaders attached: inactive regardless of source
        let context = UnitContext::new(&unit, &status);
        assert!(!is_mechanic_active(&from_leader, &context, Side::Attacker, GamePhase::Fight));

        // leaders attached: only the leader-sourced mechanic activates
        let context = UnitContext::new(&unit, &status).with_leader(&captain);
        assert!(is_mechanic_active(&from_leader, &context, Side::Attacker, GamePhase::Fight));
        assert!(!is_mechanic_active(&from_unit, &context, Side::Attacker, GamePhase::Fight));
    }

    #[test]
    fn test_enhancement_source_counts_as_leader_derived() {
        let unit = item("Intercessor Squad");
        let captain = item("Captain");
        let status = CombatStatus::new();
        let m = mechanic(vec![MechanicCondition::leading()], SourceKind::Enhancement);

        let context = UnitContext::new(&unit, &status).with_leader(&captain);
        assert!(is_mechanic_active(&m, &context, Side::Attacker, GamePhase::Fight));
    }

    #[test]
    fn test_phase_condition() {
        let unit = item("Intercessor Squad");
        let status = CombatStatus::new();
        let context = UnitContext::new(&unit, &status);
        let m = mechanic(
            vec![MechanicCondition::phase(GamePhase::Shooting)],
            SourceKind::DatasheetAbility,
        );

        assert!(is_mechanic_active(&m, &context, Side::Attacker, GamePhase::Shooting));
        assert!(!is_mechanic_active(&m, &context, Side::Attacker, GamePhase::Fight));
    }

    #[test]
    fn test_unknown_phase_gate_never_activates() {
        let unit = item("Intercessor Squad");
        let status = CombatStatus::new();
        let context = UnitContext::new(&unit, &status);
        let m = mechanic(
            vec![MechanicCondition::phase(GamePhase::Unknown)],
            SourceKind::DatasheetAbility,
        );
        for phase in GamePhase::all() {
            assert!(!is_mechanic_active(&m, &context, Side::Attacker, phase));
        }
    }
}
