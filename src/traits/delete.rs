//! Delete trait for removing entities.

use async_trait::async_trait;

use super::Resource;
use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;

/// Delete an entity by ID.
#[async_trait]
pub trait Delete: Resource + 'static {
    /// Delete the entity. Harvest answers with an empty body.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found, cannot be deleted (for
    /// example a time entry on a closed invoice), or the request fails.
    async fn delete(client: &HarvestClient, id: u64) -> Result<()> {
        dispatch::delete(client, &Self::item_path(id)).await
    }
}
