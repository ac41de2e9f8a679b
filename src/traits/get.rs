//! Get trait for fetching single entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::Resource;
use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// # Example
///
/// ```ignore
/// use harvestapi::{Get, HarvestClient, Project};
///
/// let client = HarvestClient::from_env("MyApp (ops@example.com)")?;
/// let project = Project::get(&client, 14308069).await?;
/// ```
#[async_trait]
pub trait Get: Resource + DeserializeOwned + Send + Sized + 'static {
    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::NotFound`](crate::HarvestError::NotFound) if
    /// no entity has this ID, or any transport or decode error.
    async fn get(client: &HarvestClient, id: u64) -> Result<Self> {
        dispatch::get(client, &Self::item_path(id)).await
    }
}
