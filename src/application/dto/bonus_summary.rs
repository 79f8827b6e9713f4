//! Typed combat-bonus summaries consumed by the display layer

use serde::Serialize;

use crate::domain::value_objects::{MechanicAttribute, Side, SourceAttribution};

/// Attribution for one contribution to a bonus. Kept per-source even
/// when values merge, so tooltips can list every contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusSource {
    pub name: String,
    pub attribution: SourceAttribution,
}

/// A summed roll-time modifier (to hit, to wound, or to save).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RollBonusSummary {
    /// Net modifier; penalties subtract
    pub total: i64,
    pub sources: Vec<BonusSource>,
}

impl RollBonusSummary {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Net change to one printed characteristic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatDelta {
    pub attribute: MechanicAttribute,
    /// Sum of additive bonuses/penalties
    pub added: i64,
    /// Combined multiplier, when any multiplier effect is active
    /// (0.5 renders as "Half")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    /// Literal override from a static-number effect, as authored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_value: Option<String>,
    pub sources: Vec<BonusSource>,
}

/// A granted ability keyword shown as a badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityBadge {
    /// Uppercased ability name ("SUSTAINED HITS 1")
    pub name: String,
    pub source: BonusSource,
}

/// The best active Feel-No-Pain style defence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeelNoPainSummary {
    /// Roll needed to shrug a wound (5 = 5+); grants do not stack, the
    /// best threshold wins
    pub threshold: u8,
    pub sources: Vec<BonusSource>,
}

/// All active bonuses for one side of an exchange, collapsed from the
/// filtered mechanic list.
#[derive(Debug, Clone, Serialize)]
pub struct UnitBonusSummary {
    pub side: Side,
    pub hit_roll: RollBonusSummary,
    pub wound_roll: RollBonusSummary,
    pub save_roll: RollBonusSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feel_no_pain: Option<FeelNoPainSummary>,
    pub added_abilities: Vec<AbilityBadge>,
    pub stat_deltas: Vec<StatDelta>,
}

impl UnitBonusSummary {
    pub fn empty(side: Side) -> Self {
        Self {
            side,
            hit_roll: RollBonusSummary::default(),
            wound_roll: RollBonusSummary::default(),
            save_roll: RollBonusSummary::default(),
            feel_no_pain: None,
            added_abilities: Vec::new(),
            stat_deltas: Vec::new(),
        }
    }

    pub fn stat_delta(&self, attribute: MechanicAttribute) -> Option<&StatDelta> {
        self.stat_deltas.iter().find(|d| d.attribute == attribute)
    }
}
