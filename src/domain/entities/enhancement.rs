//! Enhancement entity - a named upgrade for one Character per list

use serde::{Deserialize, Serialize};

use crate::domain::entities::Datasheet;
use crate::domain::value_objects::{EnhancementId, MechanicSpec};

/// A detachment enhancement. Grantable to exactly one Character-keyword
/// leader per list; Epic Heroes never take enhancements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enhancement {
    pub id: EnhancementId,
    pub name: String,
    pub cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mechanics: Vec<MechanicSpec>,
    /// Extra keyword requirements beyond Character (e.g. "Adeptus
    /// Astartes", "Terminator"); empty means any Character qualifies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyword_requirements: Vec<String>,
}

impl Enhancement {
    pub fn new(id: impl Into<EnhancementId>, name: impl Into<String>, cost: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
            description: None,
            mechanics: Vec::new(),
            keyword_requirements: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mechanic(mut self, mechanic: MechanicSpec) -> Self {
        self.mechanics.push(mechanic);
        self
    }

    pub fn with_keyword_requirement(mut self, keyword: impl Into<String>) -> Self {
        self.keyword_requirements.push(keyword.into());
        self
    }

    /// Whether the given datasheet may carry this enhancement.
    pub fn eligible_for(&self, datasheet: &Datasheet) -> bool {
        if !datasheet.is_character() || datasheet.is_epic_hero() {
            return false;
        }
        self.keyword_requirements.is_empty()
            || datasheet
                .keywords
                .matches_any(self.keyword_requirements.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BattlefieldRole;

    fn character(keywords: Vec<&str>) -> Datasheet {
        Datasheet::new("ds-c", "faction-a", "Captain", BattlefieldRole::Character)
            .with_keywords(keywords)
    }

    #[test]
    fn test_requires_character_keyword() {
        let enhancement = Enhancement::new("enh-1", "Artificer Armour", 10);
        assert!(enhancement.eligible_for(&character(vec!["Character"])));
        assert!(!enhancement.eligible_for(&character(vec!["Infantry"])));
    }

    #[test]
    fn test_epic_heroes_are_excluded() {
        let enhancement = Enhancement::new("enh-1", "Artificer Armour", 10);
        assert!(!enhancement.eligible_for(&character(vec!["Character", "Epic Hero"])));
    }

    #[test]
    fn test_keyword_requirements_gate() {
        let enhancement =
            Enhancement::new("enh-2", "Thief of Secrets", 15).with_keyword_requirement("Terminator");
        assert!(enhancement.eligible_for(&character(vec!["Character", "Terminator"])));
        assert!(!enhancement.eligible_for(&character(vec!["Character", "Gravis"])));
    }
}
