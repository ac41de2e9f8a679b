//! Update trait for modifying entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Resource;
use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;

/// Update an existing entity.
///
/// Only the fields set in the parameters are sent.
///
/// # Example
///
/// ```ignore
/// use harvestapi::{HarvestClient, Task, TaskParams, Update};
///
/// let client = HarvestClient::from_env("MyApp (ops@example.com)")?;
/// let updated = Task::update(
///     &client,
///     8083800,
///     &TaskParams {
///         is_active: Some(false),
///         ..Default::default()
///     },
/// ).await?;
/// ```
#[async_trait]
pub trait Update: Resource + DeserializeOwned + Send + Sized + 'static {
    /// Parameters for the update.
    type Params: Serialize + Send + Sync;

    /// Update the entity and return the updated version.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(client: &HarvestClient, id: u64, params: &Self::Params) -> Result<Self> {
        dispatch::update(client, &Self::item_path(id), Some(params)).await
    }
}
