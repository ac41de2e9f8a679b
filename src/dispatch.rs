//! Generic CRUD operations.
//!
//! Every resource call goes through these functions; they only differ in the
//! path, the body type and the type the response decodes into.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::{HarvestClient, RawResponse};
use crate::error::{HarvestError, Result};
use crate::pagination::{Listing, Page};

/// GET `path` and decode the body as `T`.
pub async fn get<T: DeserializeOwned>(client: &HarvestClient, path: &str) -> Result<T> {
    client.get(path).await?.json()
}

/// GET one page of `listing`, with `opts` encoded as query parameters.
pub async fn list_page<T, O>(client: &HarvestClient, listing: &Listing, opts: &O) -> Result<Page<T>>
where
    T: DeserializeOwned,
    O: Serialize + ?Sized,
{
    let response = client.get_with_query(&listing.path, opts).await?;
    decode_page(&response, listing.collection)
}

/// GET the page a `links.next` URL points at.
///
/// Only the path and query of `next_url` are used, resolved against the
/// client's base URL; the query is sent exactly as the server produced it.
pub async fn list_page_from_url<T: DeserializeOwned>(
    client: &HarvestClient,
    next_url: &str,
    collection: &str,
) -> Result<Page<T>> {
    let parsed = client.base_url().join(next_url)?;
    let mut path_and_query = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    let response = client.get(&path_and_query).await?;
    decode_page(&response, collection)
}

/// POST `body` to `path` and decode the created resource.
pub async fn create<T, B>(client: &HarvestClient, path: &str, body: &B) -> Result<T>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    client.post(path, body).await?.json()
}

/// PATCH `path` and decode the updated resource.
///
/// `body` is `None` for state transitions (`stop`, `close`, `reopen`, ...).
pub async fn update<T, B>(client: &HarvestClient, path: &str, body: Option<&B>) -> Result<T>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    client.patch(path, body).await?.json()
}

/// DELETE `path`. Any response body is ignored.
pub async fn delete(client: &HarvestClient, path: &str) -> Result<()> {
    client.delete(path).await?;
    Ok(())
}

fn decode_page<T: DeserializeOwned>(response: &RawResponse, collection: &str) -> Result<Page<T>> {
    let value: Value = response.json()?;
    let page = Page::from_value(value, collection).map_err(|source| HarvestError::Decode {
        method: response.method().clone(),
        url: response.url().clone(),
        source,
    })?;

    if page.per_page > 0 && page.len() > page.per_page as usize {
        tracing::warn!(
            url = %response.url(),
            items = page.len(),
            per_page = page.per_page,
            "page holds more items than its declared page size"
        );
    }
    Ok(page)
}
