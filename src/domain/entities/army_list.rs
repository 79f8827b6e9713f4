//! Army list entities - the user-built roster for one side
//!
//! The list is the only mutable shared resource in the system and it is
//! owned by the list-management layer; every mutation in
//! [`crate::domain::aggregates::ListAggregate`] is a pure transform
//! returning a new snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Datasheet, Enhancement};
use crate::domain::value_objects::{DatasheetId, EnhancementId, FactionId, ListId, ListItemId};

/// Reference to another roster item, used for the leader/bodyguard
/// graph. Pre-migration records carried no `list_item_id`, so the
/// datasheet id + name pair is kept as a legacy resolution fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item_id: Option<ListItemId>,
    pub datasheet_id: DatasheetId,
    pub name: String,
}

impl UnitRef {
    pub fn to_item(item: &ArmyListItem) -> Self {
        Self {
            list_item_id: Some(item.list_item_id),
            datasheet_id: item.datasheet.id.clone(),
            name: item.datasheet.name.clone(),
        }
    }

    /// Whether this reference points at the given item, by id when
    /// present, otherwise by the legacy datasheet-id + name pair.
    pub fn points_at(&self, item: &ArmyListItem) -> bool {
        match self.list_item_id {
            Some(id) => id == item.list_item_id,
            None => self.datasheet_id == item.datasheet.id && self.name == item.datasheet.name,
        }
    }
}

/// Per-option selection count on a roster item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutSelection {
    /// Index into the datasheet's `wargear_options`
    pub option_index: usize,
    pub count: u32,
}

/// One physical model's chosen profile and weapons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInstance {
    pub profile: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weapons: Vec<String>,
}

/// A roster instance of a datasheet.
///
/// Embeds a clone of the datasheet so the list stays renderable even if
/// the faction file changes shape later; identity is the generated
/// `list_item_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyListItem {
    pub list_item_id: ListItemId,
    pub datasheet: Datasheet,
    pub model_count: u32,
    /// The unit this item is currently leading, if it is an attached leader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leading: Option<UnitRef>,
    /// Leaders attached to this item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub led_by: Vec<UnitRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhancement: Option<Enhancement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loadout_selections: Vec<LoadoutSelection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub model_instances: Vec<ModelInstance>,
    #[serde(default)]
    pub is_warlord: bool,
}

impl ArmyListItem {
    /// Create a roster item from reference data at minimum size.
    pub fn from_datasheet(datasheet: Datasheet) -> Self {
        let model_count = datasheet.minimum_size();
        Self {
            list_item_id: ListItemId::new(),
            datasheet,
            model_count,
            leading: None,
            led_by: Vec::new(),
            enhancement: None,
            loadout_selections: Vec::new(),
            model_instances: Vec::new(),
            is_warlord: false,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.datasheet.name
    }

    pub fn is_leading(&self) -> bool {
        self.leading.is_some()
    }

    pub fn is_led(&self) -> bool {
        !self.led_by.is_empty()
    }

    /// Points for this item: size bracket plus enhancement cost.
    pub fn points(&self) -> u32 {
        self.datasheet.points_for(self.model_count).unwrap_or(0)
            + self.enhancement.as_ref().map(|e| e.cost).unwrap_or(0)
    }
}

/// A user-built army list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyList {
    pub id: ListId,
    pub name: String,
    pub faction_id: FactionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detachment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ArmyListItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArmyList {
    pub fn new(name: impl Into<String>, faction_id: impl Into<FactionId>) -> Self {
        let now = Utc::now();
        Self {
            id: ListId::new(),
            name: name.into(),
            faction_id: faction_id.into(),
            detachment: None,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_detachment(mut self, detachment: impl Into<String>) -> Self {
        self.detachment = Some(detachment.into());
        self
    }

    pub fn item(&self, id: ListItemId) -> Option<&ArmyListItem> {
        self.items.iter().find(|i| i.list_item_id == id)
    }

    /// Resolve a leader/bodyguard reference, tolerating legacy records;
    /// a dangling reference resolves to nothing rather than an error.
    pub fn resolve(&self, unit_ref: &UnitRef) -> Option<&ArmyListItem> {
        self.items.iter().find(|i| unit_ref.points_at(i))
    }

    /// Enhancements already claimed by some item in the list. Usage is
    /// unique per list: no two items may hold the same enhancement.
    pub fn used_enhancements(&self) -> Vec<EnhancementId> {
        self.items
            .iter()
            .filter_map(|i| i.enhancement.as_ref().map(|e| e.id.clone()))
            .collect()
    }

    pub fn points_total(&self) -> u32 {
        self.items.iter().map(ArmyListItem::points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BattlefieldRole;

    fn item(name: &str) -> ArmyListItem {
        ArmyListItem::from_datasheet(Datasheet::new(
            format!("ds-{name}"),
            "faction-a",
            name,
            BattlefieldRole::Battleline,
        ))
    }

    #[test]
    fn test_resolve_by_list_item_id() {
        let mut list = ArmyList::new("Strike Force", "faction-a");
        let a = item("Intercessor Squad");
        let unit_ref = UnitRef::to_item(&a);
        list.items.push(a);

        assert!(list.resolve(&unit_ref).is_some());
    }

    #[test]
    fn test_resolve_legacy_reference_by_id_and_name() {
        let mut list = ArmyList::new("Strike Force", "faction-a");
        let a = item("Intercessor Squad");
        let legacy = UnitRef {
            list_item_id: None,
            datasheet_id: a.datasheet.id.clone(),
            name: a.datasheet.name.clone(),
        };
        list.items.push(a);

        assert!(list.resolve(&legacy).is_some());
    }

    #[test]
    fn test_dangling_reference_resolves_to_none() {
        let list = ArmyList::new("Strike Force", "faction-a");
        let dangling = UnitRef {
            list_item_id: Some(ListItemId::new()),
            datasheet_id: DatasheetId::new("ds-x"),
            name: "Removed Unit".to_string(),
        };
        assert!(list.resolve(&dangling).is_none());
    }

    #[test]
    fn test_points_total_includes_enhancements() {
        let mut list = ArmyList::new("Strike Force", "faction-a");
        let mut a = item("Intercessor Squad");
        a.datasheet.points.push(crate::domain::entities::PointsBracket {
            models: a.model_count,
            points: 80,
        });
        a.enhancement = Some(Enhancement::new("enh-1", "Artificer Armour", 10));
        list.items.push(a);

        assert_eq!(list.points_total(), 90);
    }
}
