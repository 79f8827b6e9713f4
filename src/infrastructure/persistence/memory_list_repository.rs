//! In-memory army-list repository - for tests and ephemeral sessions

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::ArmyListRepositoryPort;
use crate::domain::entities::ArmyList;
use crate::domain::value_objects::ListId;

/// Map-backed implementation of the repository port.
#[derive(Default)]
pub struct InMemoryListRepository {
    lists: RwLock<HashMap<ListId, ArmyList>>,
}

impl InMemoryListRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArmyListRepositoryPort for InMemoryListRepository {
    async fn create(&self, list: &ArmyList) -> Result<()> {
        self.lists.write().await.insert(list.id, list.clone());
        Ok(())
    }

    async fn get(&self, id: ListId) -> Result<Option<ArmyList>> {
        Ok(self.lists.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<ArmyList>> {
        let mut lists: Vec<ArmyList> = self.lists.read().await.values().cloned().collect();
        lists.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lists)
    }

    async fn update(&self, list: &ArmyList) -> Result<()> {
        self.lists.write().await.insert(list.id, list.clone());
        Ok(())
    }

    async fn delete(&self, id: ListId) -> Result<()> {
        self.lists.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let repository = InMemoryListRepository::new();
        let list = ArmyList::new("Strike Force", "faction-a");
        repository.create(&list).await.unwrap();

        let loaded = repository.get(list.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Strike Force");

        repository.delete(list.id).await.unwrap();
        assert!(repository.get(list.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let repository = InMemoryListRepository::new();
        repository
            .create(&ArmyList::new("Zeta Force", "faction-a"))
            .await
            .unwrap();
        repository
            .create(&ArmyList::new("Alpha Force", "faction-a"))
            .await
            .unwrap();

        let lists = repository.list().await.unwrap();
        assert_eq!(lists[0].name, "Alpha Force");
        assert_eq!(lists[1].name, "Zeta Force");
    }
}
