//! Mechanic - the normalized unit of game-rule effect
//!
//! Authored rule data arrives as loosely-shaped `MechanicSpec` records
//! on abilities, enhancements and wargear options. Extraction turns
//! them into [`Mechanic`]s by attaching a source back-reference (for
//! display attribution) and a provenance tag (structured data vs text
//! heuristics). Both enums here are closed on purpose: the content
//! loader validates once at the boundary and the engine matches
//! exhaustively.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CombatStatusFlag, GamePhase};

/// What a mechanic does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanicEffect {
    /// +value to a hit/wound/save roll
    RollBonus,
    /// -value from a hit/wound/save roll
    RollPenalty,
    /// +value to a printed characteristic
    StatBonus,
    /// -value from a printed characteristic
    StatPenalty,
    /// characteristic * value (0.5 renders as "Half")
    StatMultiplier,
    /// grants the named weapon/unit abilities
    AddsAbility,
    /// sets a characteristic to a literal value
    StaticNumber,
}

impl MechanicEffect {
    /// Roll effects touch roll-time modifiers only, never a printed
    /// characteristic.
    pub fn is_roll_effect(&self) -> bool {
        matches!(self, Self::RollBonus | Self::RollPenalty)
    }
}

/// Which stat or roll a mechanic touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanicAttribute {
    Hit,
    Wound,
    Save,
    #[serde(rename = "s")]
    Strength,
    #[serde(rename = "t")]
    Toughness,
    #[serde(rename = "a")]
    Attacks,
    #[serde(rename = "ap")]
    ArmourPenetration,
    #[serde(rename = "d")]
    Damage,
    #[serde(rename = "oc")]
    ObjectiveControl,
    #[serde(rename = "ld")]
    Leadership,
    Range,
    BsWs,
}

impl MechanicAttribute {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hit => "Hit roll",
            Self::Wound => "Wound roll",
            Self::Save => "Save roll",
            Self::Strength => "S",
            Self::Toughness => "T",
            Self::Attacks => "A",
            Self::ArmourPenetration => "AP",
            Self::Damage => "D",
            Self::ObjectiveControl => "OC",
            Self::Leadership => "Ld",
            Self::Range => "Range",
            Self::BsWs => "BS/WS",
        }
    }

    /// Attributes that are roll targets rather than characteristics.
    pub fn is_roll(&self) -> bool {
        matches!(self, Self::Hit | Self::Wound | Self::Save)
    }
}

/// A mechanic value as authored: whole number, fraction or text
/// (e.g. `1`, `0.5`, `"D3"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MechanicValue {
    Int(i64),
    Number(f64),
    Text(String),
}

impl MechanicValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Number(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Human rendering; halving multipliers read "Half" on datasheets.
    pub fn display(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Number(v) if *v == 0.5 => "Half".to_string(),
            Self::Number(v) => v.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// The subject a mechanic applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanicTarget {
    #[default]
    ThisUnit,
    ThisModel,
    AttachedUnit,
}

/// States with no direct combat-status flag behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticState {
    /// Satisfied when the evaluated unit has attached leaders and the
    /// mechanic came from one of them.
    #[serde(alias = "is_leading_unit")]
    Leading,
}

/// One state a condition may name: a status flag, a synthetic state,
/// or a game phase.
///
/// Variant order matters for deserialization: phases are tried last,
/// and `GamePhase`'s forward-compat variant absorbs any unrecognized
/// string as an unknown phase - which never matches the current phase,
/// so a mechanic gated on a state this build does not know simply
/// stays inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionState {
    Flag(CombatStatusFlag),
    Synthetic(SyntheticState),
    Phase(GamePhase),
}

/// A gating predicate on a mechanic.
///
/// A single condition holds one or more states with OR semantics; a
/// mechanic's condition list is combined with AND semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicCondition {
    #[serde(rename = "state", alias = "states", with = "one_or_many")]
    pub states: Vec<ConditionState>,
}

impl MechanicCondition {
    pub fn state(state: ConditionState) -> Self {
        Self {
            states: vec![state],
        }
    }

    pub fn flag(flag: CombatStatusFlag) -> Self {
        Self::state(ConditionState::Flag(flag))
    }

    pub fn leading() -> Self {
        Self::state(ConditionState::Synthetic(SyntheticState::Leading))
    }

    pub fn phase(phase: GamePhase) -> Self {
        Self::state(ConditionState::Phase(phase))
    }

    pub fn any_of(states: Vec<ConditionState>) -> Self {
        Self { states }
    }
}

/// Authored rule data serializes `state` as either one value or an
/// array of values; normalize to a vector on the way in.
mod one_or_many {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ConditionState;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ConditionState),
        Many(Vec<ConditionState>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<ConditionState>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(state) => vec![state],
            OneOrMany::Many(states) => states,
        })
    }

    pub fn serialize<S>(states: &[ConditionState], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if states.len() == 1 {
            states[0].serialize(serializer)
        } else {
            states.serialize(serializer)
        }
    }
}

/// A rule effect as authored, before extraction attaches its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicSpec {
    pub effect: MechanicEffect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<MechanicAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<MechanicValue>,
    #[serde(default)]
    pub target: MechanicTarget,
    /// Ability names granted when `effect` is `AddsAbility`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<MechanicCondition>,
}

impl MechanicSpec {
    pub fn new(effect: MechanicEffect) -> Self {
        Self {
            effect,
            attribute: None,
            value: None,
            target: MechanicTarget::default(),
            abilities: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: MechanicAttribute) -> Self {
        self.attribute = Some(attribute);
        self
    }

    pub fn with_value(mut self, value: MechanicValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_target(mut self, target: MechanicTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_ability(mut self, name: impl Into<String>) -> Self {
        self.abilities.push(name.into());
        self
    }

    pub fn with_condition(mut self, condition: MechanicCondition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// Where a mechanic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    DatasheetAbility,
    LeaderAbility,
    Enhancement,
    WargearOption,
    DamagedProfile,
    DetachmentRule,
}

impl SourceKind {
    /// Leader-derived mechanics are the only ones the synthetic
    /// `Leading` condition may admit.
    pub fn is_leader_derived(&self) -> bool {
        matches!(self, Self::LeaderAbility | Self::Enhancement)
    }

    /// Attribution bucket shown in bonus tooltips.
    pub fn attribution(&self) -> SourceAttribution {
        match self {
            Self::DatasheetAbility | Self::DamagedProfile => SourceAttribution::Unit,
            Self::LeaderAbility => SourceAttribution::Leader,
            Self::Enhancement => SourceAttribution::Enhancement,
            Self::WargearOption => SourceAttribution::Wargear,
            Self::DetachmentRule => SourceAttribution::Detachment,
        }
    }
}

/// Tooltip-facing attribution bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceAttribution {
    Unit,
    Leader,
    Enhancement,
    Wargear,
    Detachment,
}

impl SourceAttribution {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unit => "Unit",
            Self::Leader => "Leader",
            Self::Enhancement => "Enhancement",
            Self::Wargear => "Wargear",
            Self::Detachment => "Detachment",
        }
    }
}

/// Back-reference from a mechanic to the rule object that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicSource {
    /// Display name of the originating ability/enhancement/option
    pub name: String,
    pub kind: SourceKind,
}

impl MechanicSource {
    pub fn new(name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// How a mechanic was obtained from its ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Authored structured `mechanics` data
    Structured,
    /// Derived from description text by the classification heuristics
    Inferred,
}

/// A fully-extracted mechanic: derived data, recomputed per query and
/// never persisted apart from its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mechanic {
    #[serde(flatten)]
    pub spec: MechanicSpec,
    pub source: MechanicSource,
    pub provenance: Provenance,
}

impl Mechanic {
    pub fn new(spec: MechanicSpec, source: MechanicSource, provenance: Provenance) -> Self {
        Self {
            spec,
            source,
            provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_state_accepts_single_or_array() {
        let single: MechanicCondition = serde_json::from_str(r#"{"state": "in_cover"}"#).unwrap();
        assert_eq!(
            single.states,
            vec![ConditionState::Flag(CombatStatusFlag::InCover)]
        );

        let many: MechanicCondition =
            serde_json::from_str(r#"{"state": ["in_cover", "charged"]}"#).unwrap();
        assert_eq!(many.states.len(), 2);
    }

    #[test]
    fn test_leading_state_parses_both_spellings() {
        for raw in [r#"{"state": "leading"}"#, r#"{"state": "is_leading_unit"}"#] {
            let condition: MechanicCondition = serde_json::from_str(raw).unwrap();
            assert_eq!(
                condition.states,
                vec![ConditionState::Synthetic(SyntheticState::Leading)]
            );
        }
    }

    #[test]
    fn test_unrecognized_state_parses_as_unknown_phase() {
        let condition: MechanicCondition =
            serde_json::from_str(r#"{"state": "some_future_flag"}"#).unwrap();
        assert_eq!(
            condition.states,
            vec![ConditionState::Phase(GamePhase::Unknown)]
        );
    }

    #[test]
    fn test_phase_state_parses() {
        let condition: MechanicCondition = serde_json::from_str(r#"{"state": "fight"}"#).unwrap();
        assert_eq!(
            condition.states,
            vec![ConditionState::Phase(GamePhase::Fight)]
        );
    }

    #[test]
    fn test_attribute_short_names_round_trip() {
        let attribute: MechanicAttribute = serde_json::from_str(r#""ap""#).unwrap();
        assert_eq!(attribute, MechanicAttribute::ArmourPenetration);
        assert_eq!(serde_json::to_string(&attribute).unwrap(), r#""ap""#);
    }

    #[test]
    fn test_value_display_renders_half() {
        assert_eq!(MechanicValue::Number(0.5).display(), "Half");
        assert_eq!(MechanicValue::Int(2).display(), "2");
        assert_eq!(MechanicValue::Text("D3".to_string()).display(), "D3");
    }

    #[test]
    fn test_spec_deserializes_with_defaults() {
        let spec: MechanicSpec =
            serde_json::from_str(r#"{"effect": "roll_bonus", "attribute": "hit", "value": 1}"#)
                .unwrap();
        assert_eq!(spec.effect, MechanicEffect::RollBonus);
        assert_eq!(spec.target, MechanicTarget::ThisUnit);
        assert!(spec.conditions.is_empty());
    }

    #[test]
    fn test_leader_derivation() {
        assert!(SourceKind::LeaderAbility.is_leader_derived());
        assert!(SourceKind::Enhancement.is_leader_derived());
        assert!(!SourceKind::DatasheetAbility.is_leader_derived());
        assert!(!SourceKind::WargearOption.is_leader_derived());
    }
}
