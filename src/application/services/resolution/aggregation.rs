//! Bonus aggregation - collapse active mechanics into display summaries
//!
//! Stacking policy, preserved from the ruleset: numeric effects stack
//! additively across sources, while granted ability keywords
//! deduplicate (first occurrence wins, statics printed on the profile
//! suppress dynamic duplicates). Attribution survives every merge: a
//! summed value keeps one source entry per contributor.

use crate::application::dto::{
    AbilityBadge, BonusSource, FeelNoPainSummary, RollBonusSummary, StatDelta, UnitBonusSummary,
};
use crate::application::services::resolution::UnitContext;
use crate::domain::value_objects::{
    Mechanic, MechanicAttribute, MechanicEffect, Side,
};

/// Collapse an active mechanic list into a side-specific summary.
pub fn aggregate_bonuses(
    mechanics: &[Mechanic],
    context: &UnitContext<'_>,
    side: Side,
) -> UnitBonusSummary {
    let mut summary = UnitBonusSummary::empty(side);

    for mechanic in mechanics {
        match mechanic.spec.effect {
            MechanicEffect::RollBonus | MechanicEffect::RollPenalty => {
                apply_roll_effect(&mut summary, mechanic);
            }
            MechanicEffect::StatBonus
            | MechanicEffect::StatPenalty
            | MechanicEffect::StatMultiplier
            | MechanicEffect::StaticNumber => {
                apply_stat_effect(&mut summary, mechanic);
            }
            MechanicEffect::AddsAbility => {
                apply_ability_grants(&mut summary, mechanic, context);
            }
        }
    }
    summary
}

fn source_of(mechanic: &Mechanic) -> BonusSource {
    BonusSource {
        name: mechanic.source.name.clone(),
        attribution: mechanic.source.kind.attribution(),
    }
}

/// Roll effects touch the three roll-time modifiers only.
fn apply_roll_effect(summary: &mut UnitBonusSummary, mechanic: &Mechanic) {
    let Some(value) = mechanic.spec.value.as_ref().and_then(|v| v.as_i64()) else {
        return;
    };
    let signed = match mechanic.spec.effect {
        MechanicEffect::RollPenalty => -value,
        _ => value,
    };
    let slot: &mut RollBonusSummary = match mechanic.spec.attribute {
        Some(MechanicAttribute::Hit) => &mut summary.hit_roll,
        Some(MechanicAttribute::Wound) => &mut summary.wound_roll,
        Some(MechanicAttribute::Save) => &mut summary.save_roll,
        // a roll effect aimed at a printed characteristic is malformed
        _ => return,
    };
    slot.total += signed;
    slot.sources.push(source_of(mechanic));
}

/// Numeric characteristic changes stack additively; multipliers
/// combine multiplicatively; a static number pins the displayed value.
fn apply_stat_effect(summary: &mut UnitBonusSummary, mechanic: &Mechanic) {
    let Some(attribute) = mechanic.spec.attribute else {
        return;
    };
    if attribute.is_roll() {
        return;
    }
    let Some(value) = mechanic.spec.value.as_ref() else {
        return;
    };

    let index = match summary
        .stat_deltas
        .iter()
        .position(|d| d.attribute == attribute)
    {
        Some(index) => index,
        None => {
            summary.stat_deltas.push(StatDelta {
                attribute,
                added: 0,
                multiplier: None,
                static_value: None,
                sources: Vec::new(),
            });
            summary.stat_deltas.len() - 1
        }
    };
    let delta = &mut summary.stat_deltas[index];

    match mechanic.spec.effect {
        MechanicEffect::StatBonus => {
            let Some(v) = value.as_i64() else { return };
            delta.added += v;
        }
        MechanicEffect::StatPenalty => {
            let Some(v) = value.as_i64() else { return };
            delta.added -= v;
        }
        MechanicEffect::StatMultiplier => {
            let Some(v) = value.as_f64() else { return };
            delta.multiplier = Some(delta.multiplier.unwrap_or(1.0) * v);
        }
        MechanicEffect::StaticNumber => {
            delta.static_value = Some(value.display());
        }
        _ => unreachable!("stat handler called for non-stat effect"),
    }
    delta.sources.push(source_of(mechanic));
}

/// Granted keywords become badges. A keyword already printed on the
/// selected weapon profile is suppressed; among dynamic grants the
/// first occurrence of an uppercased name wins. Feel-No-Pain grants
/// with a threshold feed the dedicated summary instead, best value
/// winning with all sources kept.
fn apply_ability_grants(
    summary: &mut UnitBonusSummary,
    mechanic: &Mechanic,
    context: &UnitContext<'_>,
) {
    for name in &mechanic.spec.abilities {
        let upper = name.to_uppercase();

        if let Some(threshold) = feel_no_pain_threshold(&upper) {
            match &mut summary.feel_no_pain {
                Some(existing) => {
                    existing.threshold = existing.threshold.min(threshold);
                    existing.sources.push(source_of(mechanic));
                }
                None => {
                    summary.feel_no_pain = Some(FeelNoPainSummary {
                        threshold,
                        sources: vec![source_of(mechanic)],
                    });
                }
            }
            continue;
        }

        let printed = context
            .weapon_profile
            .map(|p| p.has_attribute(&upper))
            .unwrap_or(false);
        if printed {
            continue;
        }
        if summary.added_abilities.iter().any(|b| b.name == upper) {
            continue;
        }
        summary.added_abilities.push(AbilityBadge {
            name: upper,
            source: source_of(mechanic),
        });
    }
}

/// "FEEL NO PAIN 5+" -> 5. Numberless FNP text stays a badge.
fn feel_no_pain_threshold(name: &str) -> Option<u8> {
    let rest = name.strip_prefix("FEEL NO PAIN")?;
    let digits: String = rest
        .chars()
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
