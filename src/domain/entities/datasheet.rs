//! Datasheet entity - immutable reference data for a unit type
//!
//! Loaded once per faction and never mutated during combat resolution;
//! roster items embed a clone plus their own identity.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Ability, Weapon};
use crate::domain::value_objects::{DatasheetId, FactionId, KeywordList, MechanicSpec};

/// Battlefield role grouping on the army roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlefieldRole {
    Character,
    Battleline,
    DedicatedTransport,
    Fortification,
    Other,
    /// Unknown role (for forward compatibility)
    #[serde(other)]
    Unknown,
}

impl BattlefieldRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Character => "Character",
            Self::Battleline => "Battleline",
            Self::DedicatedTransport => "Dedicated Transport",
            Self::Fortification => "Fortification",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }
}

/// A single model's stat line. Stats are never mutated in place;
/// active mechanics produce derived views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub name: String,
    /// Movement in inches
    pub movement: u32,
    pub toughness: u32,
    /// Armour save, as the roll needed (3 = 3+)
    pub save: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invulnerable_save: Option<u8>,
    pub wounds: u32,
    /// Leadership, as the test value (6 = 6+)
    pub leadership: u8,
    pub objective_control: u32,
}

impl ModelProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            movement: 6,
            toughness: 4,
            save: 3,
            invulnerable_save: None,
            wounds: 2,
            leadership: 6,
            objective_control: 1,
        }
    }

    pub fn with_stats(
        mut self,
        movement: u32,
        toughness: u32,
        save: u8,
        wounds: u32,
        leadership: u8,
        objective_control: u32,
    ) -> Self {
        self.movement = movement;
        self.toughness = toughness;
        self.save = save;
        self.wounds = wounds;
        self.leadership = leadership;
        self.objective_control = objective_control;
        self
    }

    pub fn with_invulnerable(mut self, save: u8) -> Self {
        self.invulnerable_save = Some(save);
        self
    }
}

/// One line of the unit-composition block ("4 Intercessors", "1 Sergeant").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionLine {
    pub count: u32,
    pub description: String,
}

/// Points cost for a given unit size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBracket {
    pub models: u32,
    pub points: u32,
}

/// Keyword gate applied when a second or later leader tries to join an
/// already-led unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderConditions {
    /// This leader tolerates any company
    #[serde(default)]
    pub allows_any_existing_leader: bool,
    /// Otherwise at least one existing leader must match one of these
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_existing_leader_keywords: Vec<String>,
}

/// Leader rules for datasheets that can attach to other units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderRules {
    /// Names of the unit types this leader may attach to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub can_lead: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_conditions: Option<LeaderConditions>,
}

/// Bracketed profile applied once the unit has taken enough damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamagedProfile {
    /// Bracket applies while this many wounds or fewer remain
    pub remaining_wounds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mechanics: Vec<MechanicSpec>,
}

/// An optional wargear swap or addition, with the prose constraint that
/// governs how many models may take it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WargearOption {
    pub description: String,
    /// Weapon names removed from a model taking this option
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removes: Vec<String>,
    /// Weapon names added to a model taking this option
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adds: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mechanics: Vec<MechanicSpec>,
}

impl WargearOption {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            removes: Vec::new(),
            adds: Vec::new(),
            mechanics: Vec::new(),
        }
    }
}

/// Reference stat block and rules card for a unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasheet {
    pub id: DatasheetId,
    pub faction_id: FactionId,
    pub name: String,
    pub role: BattlefieldRole,
    #[serde(default)]
    pub keywords: KeywordList,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<ModelProfile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weapons: Vec<Weapon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<Ability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub composition: Vec<CompositionLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<PointsBracket>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wargear_options: Vec<WargearOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<LeaderRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damaged: Option<DamagedProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legends: Option<String>,
}

impl Datasheet {
    pub fn new(
        id: impl Into<DatasheetId>,
        faction_id: impl Into<FactionId>,
        name: impl Into<String>,
        role: BattlefieldRole,
    ) -> Self {
        Self {
            id: id.into(),
            faction_id: faction_id.into(),
            name: name.into(),
            role,
            keywords: KeywordList::default(),
            models: Vec::new(),
            weapons: Vec::new(),
            abilities: Vec::new(),
            composition: Vec::new(),
            points: Vec::new(),
            wargear_options: Vec::new(),
            leader: None,
            damaged: None,
            transport: None,
            legends: None,
        }
    }

    pub fn with_keywords(mut self, keywords: impl Into<KeywordList>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn with_model(mut self, model: ModelProfile) -> Self {
        self.models.push(model);
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn with_points(mut self, models: u32, points: u32) -> Self {
        self.points.push(PointsBracket { models, points });
        self
    }

    pub fn with_wargear_option(mut self, option: WargearOption) -> Self {
        self.wargear_options.push(option);
        self
    }

    pub fn with_leader_rules(mut self, leader: LeaderRules) -> Self {
        self.leader = Some(leader);
        self
    }

    pub fn with_damaged(mut self, damaged: DamagedProfile) -> Self {
        self.damaged = Some(damaged);
        self
    }

    pub fn is_character(&self) -> bool {
        self.keywords.has("Character")
    }

    pub fn is_epic_hero(&self) -> bool {
        self.keywords.has("Epic Hero")
    }

    pub fn is_leader(&self) -> bool {
        self.leader.is_some()
    }

    /// Whether this datasheet's leader rules permit attaching to a unit
    /// with the given name.
    pub fn can_lead(&self, unit_name: &str) -> bool {
        self.leader
            .as_ref()
            .map(|l| {
                l.can_lead
                    .iter()
                    .any(|n| n.eq_ignore_ascii_case(unit_name))
            })
            .unwrap_or(false)
    }

    /// Smallest model count the unit can be fielded at.
    pub fn minimum_size(&self) -> u32 {
        self.points
            .iter()
            .map(|b| b.models)
            .min()
            .unwrap_or_else(|| self.composition.iter().map(|c| c.count).sum::<u32>().max(1))
    }

    /// Points cost at the given size: the cheapest bracket that covers
    /// the model count, or the largest bracket if none does.
    pub fn points_for(&self, model_count: u32) -> Option<u32> {
        let mut brackets: Vec<_> = self.points.iter().collect();
        brackets.sort_by_key(|b| b.models);
        brackets
            .iter()
            .find(|b| b.models >= model_count)
            .or_else(|| brackets.last())
            .map(|b| b.points)
    }

    pub fn model(&self, name: &str) -> Option<&ModelProfile> {
        self.models.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.name.eq_ignore_ascii_case(name))
    }
}
