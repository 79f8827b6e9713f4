//! Roster Service - Application service for army-list management
//!
//! Use case implementations for creating lists and editing the roster
//! graph: adding units, attaching/detaching leaders, equipping
//! enhancements, picking a warlord. Every edit goes through the list
//! aggregate's copy-on-write transforms and the resulting snapshot is
//! persisted wholesale through the repository port.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, instrument};

use crate::application::ports::outbound::{ArmyListRepositoryPort, FactionDataPort};
use crate::domain::aggregates::{
    AttachMode, AttachmentDecision, CombinedUnit, ListAggregate, WarlordEligibility,
};
use crate::domain::entities::{ArmyList, Enhancement};
use crate::domain::value_objects::{DatasheetId, EnhancementId, FactionId, ListId, ListItemId};

/// Request to create a new army list
#[derive(Debug, Clone)]
pub struct CreateListRequest {
    pub name: String,
    pub faction_id: FactionId,
    pub detachment: Option<String>,
}

/// Roster service trait defining the application use cases
#[async_trait]
pub trait RosterService: Send + Sync {
    /// Create a new, empty army list
    async fn create_list(&self, request: CreateListRequest) -> Result<ArmyList>;

    /// Get a list by ID
    async fn get_list(&self, id: ListId) -> Result<Option<ArmyList>>;

    /// List all stored army lists
    async fn list_lists(&self) -> Result<Vec<ArmyList>>;

    /// Delete a list
    async fn delete_list(&self, id: ListId) -> Result<()>;

    /// Add a unit from the list's faction
    async fn add_unit(&self, list_id: ListId, datasheet_id: &DatasheetId) -> Result<ArmyList>;

    /// Remove a unit and every reference to it
    async fn remove_unit(&self, list_id: ListId, item_id: ListItemId) -> Result<ArmyList>;

    /// Run the attachment gate without mutating the list
    async fn validate_attachment(
        &self,
        list_id: ListId,
        leader_id: ListItemId,
        target_id: ListItemId,
    ) -> Result<AttachmentDecision>;

    /// Attach a leader to a bodyguard unit
    async fn attach_leader(
        &self,
        list_id: ListId,
        leader_id: ListItemId,
        target_id: ListItemId,
        mode: AttachMode,
    ) -> Result<ArmyList>;

    /// Detach a leader from the unit it is leading
    async fn detach_leader(&self, list_id: ListId, leader_id: ListItemId) -> Result<ArmyList>;

    /// Equip a detachment enhancement on a leader
    async fn equip_enhancement(
        &self,
        list_id: ListId,
        item_id: ListItemId,
        enhancement_id: &EnhancementId,
    ) -> Result<ArmyList>;

    /// Remove an item's enhancement
    async fn unequip_enhancement(&self, list_id: ListId, item_id: ListItemId) -> Result<ArmyList>;

    /// Change a unit's fielded model count
    async fn set_model_count(
        &self,
        list_id: ListId,
        item_id: ListItemId,
        count: u32,
    ) -> Result<ArmyList>;

    /// Warlord eligibility for every item in the list
    async fn warlord_eligibility(&self, list_id: ListId) -> Result<Vec<WarlordEligibility>>;

    /// Mark an item as the warlord
    async fn set_warlord(&self, list_id: ListId, item_id: ListItemId) -> Result<ArmyList>;

    /// The combined fighting-unit view of the list
    async fn combined_units(&self, list_id: ListId) -> Result<Vec<CombinedUnit>>;
}

/// Default implementation over the repository and content ports
pub struct RosterServiceImpl<R, F> {
    repository: Arc<R>,
    content: Arc<F>,
}

impl<R, F> RosterServiceImpl<R, F>
where
    R: ArmyListRepositoryPort,
    F: FactionDataPort,
{
    pub fn new(repository: Arc<R>, content: Arc<F>) -> Self {
        Self {
            repository,
            content,
        }
    }

    fn validate_create_request(request: &CreateListRequest) -> Result<()> {
        if request.name.trim().is_empty() {
            anyhow::bail!("List name cannot be empty");
        }
        if request.name.len() > 255 {
            anyhow::bail!("List name cannot exceed 255 characters");
        }
        Ok(())
    }

    async fn load_list(&self, id: ListId) -> Result<ArmyList> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Army list not found: {id}"))
    }

    async fn save(&self, list: ArmyList) -> Result<ArmyList> {
        self.repository.update(&list).await?;
        Ok(list)
    }

    /// Find an enhancement by id in the list's detachment, falling back
    /// to any detachment the faction offers when none is chosen.
    async fn find_enhancement(
        &self,
        list: &ArmyList,
        enhancement_id: &EnhancementId,
    ) -> Result<Enhancement> {
        let faction = self
            .content
            .load_faction(&list.faction_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Faction not found: {}", list.faction_id))?;

        let found = match &list.detachment {
            Some(name) => faction
                .detachment(name)
                .and_then(|d| d.enhancement(enhancement_id)),
            None => faction
                .detachments
                .iter()
                .find_map(|d| d.enhancement(enhancement_id)),
        };
        found
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Enhancement not found: {enhancement_id}"))
    }
}

#[async_trait]
impl<R, F> RosterService for RosterServiceImpl<R, F>
where
    R: ArmyListRepositoryPort,
    F: FactionDataPort,
{
    #[instrument(skip(self), fields(name = %request.name, faction = %request.faction_id))]
    async fn create_list(&self, request: CreateListRequest) -> Result<ArmyList> {
        Self::validate_create_request(&request)?;

        // the faction must exist before an empty list makes sense
        self.content
            .load_faction(&request.faction_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Faction not found: {}", request.faction_id))?;

        let mut list = ArmyList::new(request.name, request.faction_id);
        list.detachment = request.detachment;
        self.repository
            .create(&list)
            .await
            .context("Failed to persist new army list")?;
        info!(list_id = %list.id, "created army list");
        Ok(list)
    }

    async fn get_list(&self, id: ListId) -> Result<Option<ArmyList>> {
        self.repository.get(id).await
    }

    async fn list_lists(&self) -> Result<Vec<ArmyList>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    async fn delete_list(&self, id: ListId) -> Result<()> {
        self.repository.delete(id).await
    }

    #[instrument(skip(self), fields(list = %list_id, datasheet = %datasheet_id))]
    async fn add_unit(&self, list_id: ListId, datasheet_id: &DatasheetId) -> Result<ArmyList> {
        let list = self.load_list(list_id).await?;
        let faction = self
            .content
            .load_faction(&list.faction_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Faction not found: {}", list.faction_id))?;
        let datasheet = faction
            .datasheet(datasheet_id)
            .ok_or_else(|| anyhow::anyhow!("Datasheet not found: {datasheet_id}"))?
            .clone();

        let next = ListAggregate::new(&list).add_unit(datasheet);
        self.save(next).await
    }

    #[instrument(skip(self), fields(list = %list_id))]
    async fn remove_unit(&self, list_id: ListId, item_id: ListItemId) -> Result<ArmyList> {
        let list = self.load_list(list_id).await?;
        let next = ListAggregate::new(&list).remove_unit(item_id)?;
        self.save(next).await
    }

    async fn validate_attachment(
        &self,
        list_id: ListId,
        leader_id: ListItemId,
        target_id: ListItemId,
    ) -> Result<AttachmentDecision> {
        let list = self.load_list(list_id).await?;
        Ok(ListAggregate::new(&list).validate_attachment(leader_id, target_id)?)
    }

    #[instrument(skip(self), fields(list = %list_id))]
    async fn attach_leader(
        &self,
        list_id: ListId,
        leader_id: ListItemId,
        target_id: ListItemId,
        mode: AttachMode,
    ) -> Result<ArmyList> {
        let list = self.load_list(list_id).await?;
        let next = ListAggregate::new(&list).attach_leader(leader_id, target_id, mode)?;
        self.save(next).await
    }

    #[instrument(skip(self), fields(list = %list_id))]
    async fn detach_leader(&self, list_id: ListId, leader_id: ListItemId) -> Result<ArmyList> {
        let list = self.load_list(list_id).await?;
        let next = ListAggregate::new(&list).detach_leader(leader_id)?;
        self.save(next).await
    }

    #[instrument(skip(self), fields(list = %list_id, enhancement = %enhancement_id))]
    async fn equip_enhancement(
        &self,
        list_id: ListId,
        item_id: ListItemId,
        enhancement_id: &EnhancementId,
    ) -> Result<ArmyList> {
        let list = self.load_list(list_id).await?;
        let enhancement = self.find_enhancement(&list, enhancement_id).await?;
        let next = ListAggregate::new(&list).equip_enhancement(item_id, enhancement)?;
        self.save(next).await
    }

    async fn unequip_enhancement(&self, list_id: ListId, item_id: ListItemId) -> Result<ArmyList> {
        let list = self.load_list(list_id).await?;
        let next = ListAggregate::new(&list).unequip_enhancement(item_id)?;
        self.save(next).await
    }

    async fn set_model_count(
        &self,
        list_id: ListId,
        item_id: ListItemId,
        count: u32,
    ) -> Result<ArmyList> {
        let list = self.load_list(list_id).await?;
        let next = ListAggregate::new(&list).set_model_count(item_id, count)?;
        self.save(next).await
    }

    async fn warlord_eligibility(&self, list_id: ListId) -> Result<Vec<WarlordEligibility>> {
        let list = self.load_list(list_id).await?;
        Ok(ListAggregate::new(&list).warlord_eligibility())
    }

    async fn set_warlord(&self, list_id: ListId, item_id: ListItemId) -> Result<ArmyList> {
        let list = self.load_list(list_id).await?;
        let next = ListAggregate::new(&list).set_warlord(item_id)?;
        self.save(next).await
    }

    async fn combined_units(&self, list_id: ListId) -> Result<Vec<CombinedUnit>> {
        let list = self.load_list(list_id).await?;
        Ok(ListAggregate::new(&list).combined_units())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BattlefieldRole, Datasheet, Detachment, Faction, LeaderRules};
    use crate::infrastructure::persistence::InMemoryListRepository;

    struct StaticFactionStore {
        faction: Faction,
    }

    #[async_trait]
    impl FactionDataPort for StaticFactionStore {
        async fn load_faction(&self, id: &FactionId) -> Result<Option<Faction>> {
            Ok((id == &self.faction.id).then(|| self.faction.clone()))
        }

        async fn list_factions(&self) -> Result<Vec<FactionId>> {
            Ok(vec![self.faction.id.clone()])
        }
    }

    fn faction() -> Faction {
        Faction::new("faction-a", "Adeptus Example")
            .with_datasheet(
                Datasheet::new("ds-cap", "faction-a", "Captain", BattlefieldRole::Character)
                    .with_keywords(vec!["Character"])
                    .with_leader_rules(LeaderRules {
                        can_lead: vec!["Intercessor Squad".to_string()],
                        leader_conditions: None,
                    }),
            )
            .with_datasheet(Datasheet::new(
                "ds-squad",
                "faction-a",
                "Intercessor Squad",
                BattlefieldRole::Battleline,
            ))
            .with_detachment(
                Detachment::new("Gladius Task Force")
                    .with_enhancement(Enhancement::new("enh-1", "Artificer Armour", 10)),
            )
    }

    fn service() -> RosterServiceImpl<InMemoryListRepository, StaticFactionStore> {
        RosterServiceImpl::new(
            Arc::new(InMemoryListRepository::new()),
            Arc::new(StaticFactionStore { faction: faction() }),
        )
    }

    #[test]
    fn test_create_request_validation() {
        let request = CreateListRequest {
            name: "".to_string(),
            faction_id: "faction-a".into(),
            detachment: None,
        };
        assert!(
            RosterServiceImpl::<InMemoryListRepository, StaticFactionStore>::validate_create_request(
                &request
            )
            .is_err()
        );

        let request = CreateListRequest {
            name: "Strike Force Epsilon".to_string(),
            faction_id: "faction-a".into(),
            detachment: None,
        };
        assert!(
            RosterServiceImpl::<InMemoryListRepository, StaticFactionStore>::validate_create_request(
                &request
            )
            .is_ok()
        );
    }

    #[tokio::test]
    async fn test_create_add_attach_flow() {
        let service = service();
        let list = service
            .create_list(CreateListRequest {
                name: "Strike Force".to_string(),
                faction_id: "faction-a".into(),
                detachment: Some("Gladius Task Force".to_string()),
            })
            .await
            .unwrap();

        let list = service.add_unit(list.id, &"ds-cap".into()).await.unwrap();
        let list = service.add_unit(list.id, &"ds-squad".into()).await.unwrap();
        let captain = list.items[0].list_item_id;
        let squad = list.items[1].list_item_id;

        let decision = service
            .validate_attachment(list.id, captain, squad)
            .await
            .unwrap();
        assert!(decision.can_attach);

        let list = service
            .attach_leader(list.id, captain, squad, AttachMode::Join)
            .await
            .unwrap();
        assert!(list.item(captain).unwrap().leading.is_some());

        // the mutation was persisted, not just returned
        let reloaded = service.get_list(list.id).await.unwrap().unwrap();
        assert!(reloaded.item(captain).unwrap().leading.is_some());
    }

    #[tokio::test]
    async fn test_equip_enhancement_resolves_from_detachment() {
        let service = service();
        let list = service
            .create_list(CreateListRequest {
                name: "Strike Force".to_string(),
                faction_id: "faction-a".into(),
                detachment: Some("Gladius Task Force".to_string()),
            })
            .await
            .unwrap();
        let list = service.add_unit(list.id, &"ds-cap".into()).await.unwrap();
        let captain = list.items[0].list_item_id;

        let list = service
            .equip_enhancement(list.id, captain, &"enh-1".into())
            .await
            .unwrap();
        assert_eq!(
            list.item(captain).unwrap().enhancement.as_ref().unwrap().name,
            "Artificer Armour"
        );

        let missing = service
            .equip_enhancement(list.id, captain, &"enh-missing".into())
            .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_unknown_faction_is_rejected() {
        let service = service();
        let result = service
            .create_list(CreateListRequest {
                name: "Doomed".to_string(),
                faction_id: "faction-z".into(),
                detachment: None,
            })
            .await;
        assert!(result.is_err());
    }
}
