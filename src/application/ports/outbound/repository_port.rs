//! Repository ports - Interfaces for army-list persistence
//!
//! These traits define the contracts that infrastructure repositories
//! must implement. Application services depend on these traits, not
//! concrete implementations. The store is a key-value discipline: one
//! record per list, replaced wholesale on save.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::ArmyList;
use crate::domain::value_objects::ListId;

/// Repository port for ArmyList operations
#[async_trait]
pub trait ArmyListRepositoryPort: Send + Sync {
    /// Persist a new list
    async fn create(&self, list: &ArmyList) -> Result<()>;

    /// Get a list by ID
    async fn get(&self, id: ListId) -> Result<Option<ArmyList>>;

    /// List all stored lists
    async fn list(&self) -> Result<Vec<ArmyList>>;

    /// Replace a stored list with a new snapshot
    async fn update(&self, list: &ArmyList) -> Result<()>;

    /// Delete a list
    async fn delete(&self, id: ListId) -> Result<()>;
}
