//! List trait for fetching collections of entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Resource;
use crate::client::HarvestClient;
use crate::error::Result;
use crate::pagination::{fetch_all, fetch_page, Items, Listing, Page, Paginated, PaginationMode};

/// List/filter entities with pagination support.
///
/// # Example
///
/// ```ignore
/// use harvestapi::{HarvestClient, List, Project, ProjectListOptions};
///
/// let client = HarvestClient::from_env("MyApp (ops@example.com)")?;
///
/// // Fetch a single page
/// let page = Project::list_page(&client, &ProjectListOptions::default()).await?;
///
/// // Fetch all pages
/// let all_projects = Project::list_all(&client, &ProjectListOptions::default()).await?;
///
/// // Or one item at a time
/// let mut projects = Project::iter(&client, &ProjectListOptions::default());
/// while let Some(project) = projects.next().await? {
///     println!("{}", project.name);
/// }
/// ```
#[async_trait]
pub trait List: Resource + DeserializeOwned + Send + Sized + 'static {
    /// Query parameters for filtering.
    type Query: Paginated + Serialize + Clone + Default + Send + Sync;

    /// JSON key of the items array in the list envelope.
    const COLLECTION: &'static str;

    /// How the endpoint paginates.
    const MODE: PaginationMode = PaginationMode::PageNumber;

    /// The list endpoint.
    fn listing() -> Listing {
        Listing {
            path: Self::PATH.to_string(),
            collection: Self::COLLECTION,
            mode: Self::MODE,
        }
    }

    /// Fetch one page. Unset `page` and `per_page` are defaulted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(client: &HarvestClient, query: &Self::Query) -> Result<Page<Self>> {
        fetch_page(client, &Self::listing(), query).await
    }

    /// List all entities matching the query (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails; no partial result is
    /// returned.
    async fn list_all(client: &HarvestClient, query: &Self::Query) -> Result<Vec<Self>> {
        fetch_all(client, Self::listing(), query).await
    }

    /// Lazily iterate over all entities matching the query.
    fn iter(client: &HarvestClient, query: &Self::Query) -> Items<Self, Self::Query> {
        Items::new(client.clone(), Self::listing(), query.clone())
    }
}
