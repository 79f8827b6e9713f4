//! Faction entity - the bundle of reference data a list is built from

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Ability, Datasheet, Enhancement, Stratagem};
use crate::domain::value_objects::{DatasheetId, EnhancementId, FactionId};

/// A detachment choice within a faction: its rules, enhancements and
/// stratagems. Detachment rules take part in mechanic extraction with
/// detachment attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detachment {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Ability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enhancements: Vec<Enhancement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stratagems: Vec<Stratagem>,
}

impl Detachment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            enhancements: Vec::new(),
            stratagems: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Ability) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_enhancement(mut self, enhancement: Enhancement) -> Self {
        self.enhancements.push(enhancement);
        self
    }

    pub fn with_stratagem(mut self, stratagem: Stratagem) -> Self {
        self.stratagems.push(stratagem);
        self
    }

    pub fn enhancement(&self, id: &EnhancementId) -> Option<&Enhancement> {
        self.enhancements.iter().find(|e| &e.id == id)
    }
}

/// A faction's complete reference data, loaded once and read-only
/// during combat resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasheets: Vec<Datasheet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detachments: Vec<Detachment>,
}

impl Faction {
    pub fn new(id: impl Into<FactionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            datasheets: Vec::new(),
            detachments: Vec::new(),
        }
    }

    pub fn with_datasheet(mut self, datasheet: Datasheet) -> Self {
        self.datasheets.push(datasheet);
        self
    }

    pub fn with_detachment(mut self, detachment: Detachment) -> Self {
        self.detachments.push(detachment);
        self
    }

    pub fn datasheet(&self, id: &DatasheetId) -> Option<&Datasheet> {
        self.datasheets.iter().find(|d| &d.id == id)
    }

    pub fn datasheet_by_name(&self, name: &str) -> Option<&Datasheet> {
        self.datasheets
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn detachment(&self, name: &str) -> Option<&Detachment> {
        self.detachments
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}
