//! JSON-file faction store - content adapter for reference data
//!
//! One JSON document per faction under the data directory. Validation
//! happens here, once, at the load boundary: the closed enums in the
//! domain model reject malformed effect/attribute values, and absent
//! optional fields default to empty so the engine downstream never
//! second-guesses the data shape.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::ports::outbound::FactionDataPort;
use crate::domain::entities::Faction;
use crate::domain::value_objects::FactionId;

pub struct JsonFactionStore {
    root: PathBuf,
}

impl JsonFactionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FactionDataPort for JsonFactionStore {
    async fn load_faction(&self, id: &FactionId) -> Result<Option<Faction>> {
        let path = self.root.join(format!("{id}.json"));
        if !path.exists() {
            return Ok(None);
        }
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read faction file {path:?}"))?;
        let faction: Faction = serde_json::from_slice(&bytes)
            .with_context(|| format!("Faction file {path:?} does not match the expected shape"))?;
        debug!(
            faction = %faction.name,
            datasheets = faction.datasheets.len(),
            "loaded faction data"
        );
        Ok(Some(faction))
    }

    async fn list_factions(&self) -> Result<Vec<FactionId>> {
        if !self.root.exists() {
            warn!(root = ?self.root, "faction data directory does not exist");
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("Failed to read faction directory {:?}", self.root))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(FactionId::new(stem));
            }
        }
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(ids)
    }
}
