//! Create trait for adding entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Resource;
use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;

/// Create a new entity.
///
/// # Example
///
/// ```ignore
/// use harvestapi::{Client, ClientParams, Create, HarvestClient};
///
/// let client = HarvestClient::from_env("MyApp (ops@example.com)")?;
/// let created = Client::create(
///     &client,
///     &ClientParams {
///         name: Some("ABC Corp".to_string()),
///         ..Default::default()
///     },
/// ).await?;
/// ```
#[async_trait]
pub trait Create: Resource + DeserializeOwned + Send + Sized + 'static {
    /// Request body for the create call.
    type Params: Serialize + Send + Sync;

    /// Create the entity and return it as stored by Harvest.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Validation`](crate::HarvestError::Validation)
    /// when Harvest rejects the parameters.
    async fn create(client: &HarvestClient, params: &Self::Params) -> Result<Self> {
        dispatch::create(client, Self::PATH, params).await
    }
}
