//! Loadout Service - wargear-option legality over parsed constraints
//!
//! Bridges the prose constraint parser to roster items: how many of
//! each option is legal at the unit's current size, and copy-on-write
//! updates to an item's selections.

use tracing::instrument;

use crate::domain::entities::{ArmyList, ArmyListItem, LoadoutSelection};
use crate::domain::value_objects::{ListItemId, LoadoutConstraint};

#[derive(Debug, thiserror::Error)]
pub enum LoadoutError {
    #[error("list item {0} not found")]
    ItemNotFound(ListItemId),
    #[error("wargear option {0} does not exist on this datasheet")]
    UnknownOption(usize),
    #[error("selection of {requested} exceeds the legal maximum of {max}")]
    ExceedsMaximum { requested: u32, max: u32 },
}

/// One wargear option's parsed legality for a specific roster item.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLegality {
    pub option_index: usize,
    pub description: String,
    pub constraint: LoadoutConstraint,
    pub selected: u32,
    pub remaining: u32,
}

/// Parse every wargear option on an item against its current model
/// count.
pub fn option_legality(item: &ArmyListItem) -> Vec<OptionLegality> {
    item.datasheet
        .wargear_options
        .iter()
        .enumerate()
        .map(|(option_index, option)| {
            let constraint = LoadoutConstraint::parse(&option.description, item.model_count);
            let selected = item
                .loadout_selections
                .iter()
                .find(|s| s.option_index == option_index)
                .map(|s| s.count)
                .unwrap_or(0);
            OptionLegality {
                option_index,
                description: option.description.clone(),
                constraint,
                selected,
                remaining: constraint.max_selections.saturating_sub(selected),
            }
        })
        .collect()
}

/// Set how many times an option is taken on an item, returning a new
/// list snapshot. A count of zero clears the selection.
#[instrument(skip(list), fields(item = %item_id))]
pub fn set_option_count(
    list: &ArmyList,
    item_id: ListItemId,
    option_index: usize,
    count: u32,
) -> Result<ArmyList, LoadoutError> {
    let item = list
        .item(item_id)
        .ok_or(LoadoutError::ItemNotFound(item_id))?;
    let option = item
        .datasheet
        .wargear_options
        .get(option_index)
        .ok_or(LoadoutError::UnknownOption(option_index))?;

    let constraint = LoadoutConstraint::parse(&option.description, item.model_count);
    if count > constraint.max_selections {
        return Err(LoadoutError::ExceedsMaximum {
            requested: count,
            max: constraint.max_selections,
        });
    }

    let mut next = list.clone();
    next.updated_at = chrono::Utc::now();
    if let Some(item) = next.items.iter_mut().find(|i| i.list_item_id == item_id) {
        item.loadout_selections
            .retain(|s| s.option_index != option_index);
        if count > 0 {
            item.loadout_selections.push(LoadoutSelection {
                option_index,
                count,
            });
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::ListAggregate;
    use crate::domain::entities::{BattlefieldRole, Datasheet, WargearOption};
    use crate::domain::value_objects::ConstraintKind;

    fn list_with_squad(total_models: u32) -> ArmyList {
        let sheet = Datasheet::new(
            "ds-squad",
            "faction-a",
            "Intercessor Squad",
            BattlefieldRole::Battleline,
        )
        .with_points(total_models, 80)
        .with_wargear_option(WargearOption::new(
            "For every 5 models, 1 model's bolt pistol can be replaced with a plasma pistol.",
        ));
        let list = ArmyList::new("Strike Force", "faction-a");
        ListAggregate::new(&list).add_unit(sheet)
    }

    #[test]
    fn test_option_legality_tracks_model_count() {
        let list = list_with_squad(10);
        let legality = option_legality(&list.items[0]);
        assert_eq!(legality.len(), 1);
        assert_eq!(legality[0].constraint.kind, ConstraintKind::Ratio { per_models: 5 });
        assert_eq!(legality[0].constraint.max_selections, 2);
        assert_eq!(legality[0].selected, 0);
        assert_eq!(legality[0].remaining, 2);
    }

    #[test]
    fn test_set_option_count_within_limit() {
        let list = list_with_squad(10);
        let item_id = list.items[0].list_item_id;

        let list = set_option_count(&list, item_id, 0, 2).unwrap();
        let legality = option_legality(&list.items[0]);
        assert_eq!(legality[0].selected, 2);
        assert_eq!(legality[0].remaining, 0);
    }

    #[test]
    fn test_set_option_count_over_limit_is_refused() {
        let list = list_with_squad(7);
        let item_id = list.items[0].list_item_id;

        let err = set_option_count(&list, item_id, 0, 2).unwrap_err();
        assert!(matches!(
            err,
            LoadoutError::ExceedsMaximum { requested: 2, max: 1 }
        ));
    }

    #[test]
    fn test_zero_count_clears_selection() {
        let list = list_with_squad(10);
        let item_id = list.items[0].list_item_id;
        let list = set_option_count(&list, item_id, 0, 1).unwrap();
        let list = set_option_count(&list, item_id, 0, 0).unwrap();
        assert!(list.items[0].loadout_selections.is_empty());
    }

    #[test]
    fn test_unknown_option_is_an_error() {
        let list = list_with_squad(10);
        let item_id = list.items[0].list_item_id;
        assert!(matches!(
            set_option_count(&list, item_id, 4, 1),
            Err(LoadoutError::UnknownOption(4))
        ));
    }
}
