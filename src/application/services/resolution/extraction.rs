//! Mechanic extraction - walk a combined unit's rule sources in order
//!
//! Walk order: the unit's own abilities, each attached leader's
//! abilities, equipped enhancements, wargear-option and weapon-profile
//! mechanics for the selected loadout, the damaged bracket, then
//! detachment rules. Structured `mechanics` data always beats the text
//! heuristics; nothing is deduplicated here (that is aggregation's
//! job); malformed entries contribute nothing.

use crate::application::services::resolution::{heuristics, UnitContext};
use crate::domain::entities::{Ability, DamagedProfile, Enhancement, WargearOption};
use crate::domain::value_objects::{
    CombatStatusFlag, ConditionState, Mechanic, MechanicCondition, MechanicSource, MechanicSpec,
    Provenance, Side, SourceKind,
};

/// Extract every potentially-applicable mechanic for the context, in
/// walk order, with source attribution. Condition filtering happens
/// separately so callers can show inactive rules greyed out.
pub fn collect_unit_abilities(context: &UnitContext<'_>, side: Side) -> Vec<Mechanic> {
    let mut mechanics = Vec::new();

    for ability in &context.unit.datasheet.abilities {
        mechanics.extend(from_ability(ability, SourceKind::DatasheetAbility));
    }

    for leader in &context.leaders {
        for ability in &leader.datasheet.abilities {
            mechanics.extend(from_ability(ability, SourceKind::LeaderAbility));
        }
    }

    for item in std::iter::once(context.unit).chain(context.leaders.iter().copied()) {
        if let Some(enhancement) = &item.enhancement {
            mechanics.extend(from_enhancement(enhancement));
        }
    }

    for selection in &context.unit.loadout_selections {
        if selection.count == 0 {
            continue;
        }
        // stale option indices are treated as absent
        let Some(option) = context
            .unit
            .datasheet
            .wargear_options
            .get(selection.option_index)
        else {
            continue;
        };
        let name = option_display_name(option);
        for spec in &option.mechanics {
            mechanics.push(Mechanic::new(
                spec.clone(),
                MechanicSource::new(name.clone(), SourceKind::WargearOption),
                Provenance::Structured,
            ));
        }
    }

    if let Some(profile) = context.weapon_profile {
        for spec in &profile.mechanics {
            mechanics.push(Mechanic::new(
                spec.clone(),
                MechanicSource::new(profile.name.clone(), SourceKind::WargearOption),
                Provenance::Structured,
            ));
        }
    }

    if let Some(damaged) = &context.unit.datasheet.damaged {
        mechanics.extend(from_damaged(damaged));
    }

    for rule in &context.detachment_rules {
        mechanics.extend(from_ability(rule, SourceKind::DetachmentRule));
    }

    tracing::debug!(
        unit = %context.unit.datasheet.name,
        side = side.display_name(),
        leaders = context.leaders.len(),
        mechanics = mechanics.len(),
        "collected unit mechanics"
    );
    mechanics
}

/// Structured mechanics win; heuristics fire only for description-only
/// abilities; an ability with neither contributes nothing.
fn from_ability(ability: &Ability, kind: SourceKind) -> Vec<Mechanic> {
    if ability.has_structured_mechanics() {
        return ability
            .mechanics
            .iter()
            .map(|spec| {
                Mechanic::new(
                    spec.clone(),
                    MechanicSource::new(ability.name.clone(), kind),
                    Provenance::Structured,
                )
            })
            .collect();
    }
    let Some(description) = &ability.description else {
        return Vec::new();
    };
    heuristics::classify(description)
        .into_iter()
        .map(|spec| {
            Mechanic::new(
                spec,
                MechanicSource::new(ability.name.clone(), kind),
                Provenance::Inferred,
            )
        })
        .collect()
}

fn from_enhancement(enhancement: &Enhancement) -> Vec<Mechanic> {
    if !enhancement.mechanics.is_empty() {
        return enhancement
            .mechanics
            .iter()
            .map(|spec| {
                Mechanic::new(
                    spec.clone(),
                    MechanicSource::new(enhancement.name.clone(), SourceKind::Enhancement),
                    Provenance::Structured,
                )
            })
            .collect();
    }
    let Some(description) = &enhancement.description else {
        return Vec::new();
    };
    heuristics::classify(description)
        .into_iter()
        .map(|spec| {
            Mechanic::new(
                spec,
                MechanicSource::new(enhancement.name.clone(), SourceKind::Enhancement),
                Provenance::Inferred,
            )
        })
        .collect()
}

/// Damaged-bracket mechanics are always gated on the damaged flag;
/// inject the condition if the authored record lacks it.
fn from_damaged(damaged: &DamagedProfile) -> Vec<Mechanic> {
    let (specs, provenance) = if damaged.mechanics.is_empty() {
        let Some(description) = &damaged.description else {
            return Vec::new();
        };
        (heuristics::classify(description), Provenance::Inferred)
    } else {
        (damaged.mechanics.clone(), Provenance::Structured)
    };

    specs
        .into_iter()
        .map(|mut spec| {
            let gated = spec.conditions.iter().any(|c| {
                c.states
                    .contains(&ConditionState::Flag(CombatStatusFlag::Damaged))
            });
            if !gated {
                spec.conditions
                    .push(MechanicCondition::flag(CombatStatusFlag::Damaged));
            }
            Mechanic::new(
                spec,
                MechanicSource::new("Damaged", SourceKind::DamagedProfile),
                provenance,
            )
        })
        .collect()
}

/// Attribution label for a wargear option: the granted item when known,
/// otherwise the option text itself.
fn option_display_name(option: &WargearOption) -> String {
    option
        .adds
        .first()
        .cloned()
        .unwrap_or_else(|| option.description.clone())
}
