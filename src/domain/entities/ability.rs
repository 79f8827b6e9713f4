//! Ability entity - a named rule carried by a datasheet or detachment

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::MechanicSpec;

/// Where in the rules hierarchy an ability is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityType {
    Core,
    Faction,
    Datasheet,
    Wargear,
    /// Unknown ability type (for forward compatibility)
    #[serde(other)]
    Unknown,
}

impl AbilityType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Faction => "Faction",
            Self::Datasheet => "Datasheet",
            Self::Wargear => "Wargear",
            Self::Unknown => "Unknown",
        }
    }
}

/// A named rule. The primary source mechanics are extracted from:
/// structured `mechanics` records when the data author supplied them,
/// otherwise the description text is run through the classification
/// heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AbilityType>,
    /// Numeric rider some abilities carry (e.g. Feel No Pain 5, Scouts 6)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mechanics: Vec<MechanicSpec>,
}

impl Ability {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            parameter: None,
            description: None,
            mechanics: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: AbilityType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_parameter(mut self, parameter: f64) -> Self {
        self.parameter = Some(parameter);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mechanic(mut self, mechanic: MechanicSpec) -> Self {
        self.mechanics.push(mechanic);
        self
    }

    /// Whether this ability carries authored structured mechanics.
    pub fn has_structured_mechanics(&self) -> bool {
        !self.mechanics.is_empty()
    }
}
