//! JSON-file army-list repository
//!
//! One JSON record per list under the lists directory, replaced
//! wholesale on save. Records pass through the load-time migrations so
//! older shapes keep loading; an unreadable record is logged and
//! skipped rather than failing the whole listing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

use crate::application::ports::outbound::ArmyListRepositoryPort;
use crate::domain::entities::ArmyList;
use crate::domain::value_objects::ListId;
use crate::infrastructure::persistence::migrations;

pub struct JsonListRepository {
    root: PathBuf,
}

impl JsonListRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: ListId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    async fn write(&self, list: &ArmyList) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create lists directory {:?}", self.root))?;
        let bytes = serde_json::to_vec_pretty(list)?;
        tokio::fs::write(self.path_for(list.id), bytes)
            .await
            .with_context(|| format!("Failed to write list {}", list.id))?;
        Ok(())
    }

    async fn read(path: &Path) -> Result<ArmyList> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read list record {path:?}"))?;
        let mut value: serde_json::Value =
            serde_json::from_slice(&bytes).context("List record is not valid JSON")?;
        migrations::migrate_list(&mut value);
        serde_json::from_value(value).context("List record does not match the expected shape")
    }
}

#[async_trait]
impl ArmyListRepositoryPort for JsonListRepository {
    async fn create(&self, list: &ArmyList) -> Result<()> {
        self.write(list).await
    }

    async fn get(&self, id: ListId) -> Result<Option<ArmyList>> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::read(&path).await?))
    }

    async fn list(&self) -> Result<Vec<ArmyList>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut lists = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("Failed to read lists directory {:?}", self.root))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path).await {
                Ok(list) => lists.push(list),
                Err(error) => warn!(?path, %error, "skipping unreadable list record"),
            }
        }
        lists.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lists)
    }

    async fn update(&self, list: &ArmyList) -> Result<()> {
        self.write(list).await
    }

    async fn delete(&self, id: ListId) -> Result<()> {
        let path = self.path_for(id);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .with_context(|| format!("Failed to delete list record {path:?}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::ListAggregate;
    use crate::domain::entities::{BattlefieldRole, Datasheet};

    #[tokio::test]
    async fn test_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonListRepository::new(dir.path());

        let list = ArmyList::new("Strike Force", "faction-a");
        let list = ListAggregate::new(&list).add_unit(Datasheet::new(
            "ds-squad",
            "faction-a",
            "Intercessor Squad",
            BattlefieldRole::Battleline,
        ));
        repository.create(&list).await.unwrap();

        let loaded = repository.get(list.id).await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].datasheet.name, "Intercessor Squad");

        repository.delete(list.id).await.unwrap();
        assert!(repository.get(list.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listing_skips_unreadable_records() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonListRepository::new(dir.path());

        repository
            .create(&ArmyList::new("Good List", "faction-a"))
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("corrupt.json"), b"not json at all")
            .await
            .unwrap();

        let lists = repository.list().await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Good List");
    }

    #[tokio::test]
    async fn test_legacy_record_is_migrated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonListRepository::new(dir.path());

        // a valid current-shape record, then regress it to the legacy
        // shape on disk: single led_by object, no list_item_id
        let list = ArmyList::new("Old Guard", "faction-a");
        let list = ListAggregate::new(&list).add_unit(Datasheet::new(
            "ds-squad",
            "faction-a",
            "Intercessor Squad",
            BattlefieldRole::Battleline,
        ));
        let mut value = serde_json::to_value(&list).unwrap();
        let item = &mut value["items"][0];
        item.as_object_mut().unwrap().remove("list_item_id");
        item["led_by"] = serde_json::json!({
            "datasheet_id": "ds-gone",
            "name": "Deleted Captain"
        });
        tokio::fs::write(
            dir.path().join(format!("{}.json", list.id)),
            serde_json::to_vec_pretty(&value).unwrap(),
        )
        .await
        .unwrap();

        let loaded = repository.get(list.id).await.unwrap().unwrap();
        // id backfilled, dangling reference stripped
        assert_eq!(loaded.items.len(), 1);
        assert!(loaded.items[0].led_by.is_empty());
    }
}
