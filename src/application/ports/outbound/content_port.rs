//! Content port - Interface for faction reference-data retrieval
//!
//! Data loading is an external collaborator: the engine assumes
//! whatever implements this port has already produced schema-valid,
//! fully-materialized structures.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::Faction;
use crate::domain::value_objects::FactionId;

/// Port for loading faction reference data
#[async_trait]
pub trait FactionDataPort: Send + Sync {
    /// Load one faction's complete data
    async fn load_faction(&self, id: &FactionId) -> Result<Option<Faction>>;

    /// Enumerate the factions available to build lists from
    async fn list_factions(&self) -> Result<Vec<FactionId>>;
}
