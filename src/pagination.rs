//! Pagination for Harvest list endpoints.
//!
//! Harvest paginates in two ways. Most endpoints use page numbers: the client
//! asks for `page=N` and the response says which page comes next. Newer
//! endpoints (users, assignments, item categories) use cursors: the response
//! carries an opaque `links.next` URL that must be followed as-is.
//!
//! Both are driven by [`Pages`], which after every page follows `links.next`
//! when present and otherwise `next_page`, stopping when neither is set.
//! [`fetch_all`] collects every item eagerly; [`Items`] yields them one at a
//! time and only requests a page once the previous one is used up.

use std::collections::VecDeque;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;

/// Default page size for list operations. Also the largest the API accepts.
pub const DEFAULT_PER_PAGE: u32 = 2000;

/// A page of results from the Harvest API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number. Absent under cursor pagination.
    pub page: Option<u32>,
    /// Number of items per page.
    pub per_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of items across all pages.
    pub total_entries: u64,
    /// Number of the next page, if any.
    pub next_page: Option<u32>,
    /// Number of the previous page, if any.
    pub previous_page: Option<u32>,
    /// Navigation links.
    pub links: PaginationLinks,
}

/// Navigation links of a page. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
}

/// What to request after a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Follow this URL verbatim (cursor pagination).
    Link(String),
    /// Request this page number (page-number pagination).
    Page(u32),
}

#[derive(Deserialize)]
struct PageMeta {
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    per_page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_entries: u64,
    #[serde(default)]
    next_page: Option<u32>,
    #[serde(default)]
    previous_page: Option<u32>,
    #[serde(default)]
    links: Option<PaginationLinks>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode a list envelope whose items live under `collection`.
    ///
    /// # Errors
    ///
    /// Fails if the envelope is not an object, `collection` is missing, or
    /// the items do not match `T`.
    pub fn from_value(value: Value, collection: &str) -> serde_json::Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(serde_json::Error::custom(
                "expected a JSON object for a paginated response",
            ));
        };
        let items = match map.remove(collection) {
            Some(Value::Null) => Vec::new(),
            Some(items) => serde_json::from_value(items)?,
            None => {
                return Err(serde_json::Error::custom(format!(
                    "paginated response has no `{collection}` field"
                )))
            }
        };
        let meta: PageMeta = serde_json::from_value(Value::Object(map))?;

        Ok(Self {
            items,
            page: meta.page,
            per_page: meta.per_page,
            total_pages: meta.total_pages,
            total_entries: meta.total_entries,
            next_page: meta.next_page,
            previous_page: meta.previous_page,
            links: meta.links.unwrap_or_default(),
        })
    }
}

impl<T> Page<T> {
    /// The `links.next` URL, if present and non-empty.
    pub fn next_link(&self) -> Option<&str> {
        self.links.next.as_deref().filter(|l| !l.is_empty())
    }

    /// Whether another page exists, by either pagination style.
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some() || self.next_link().is_some()
    }

    /// Whether a previous page exists.
    pub fn has_previous_page(&self) -> bool {
        self.previous_page.is_some()
            || self.links.previous.as_deref().is_some_and(|l| !l.is_empty())
    }

    /// What to fetch next. The link wins when both indicators are present.
    pub fn continuation(&self) -> Option<Continuation> {
        match self.next_link() {
            Some(link) => Some(Continuation::Link(link.to_string())),
            None => self.next_page.map(Continuation::Page),
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
            total_entries: self.total_entries,
            next_page: self.next_page,
            previous_page: self.previous_page,
            links: self.links,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Pagination parameters shared by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Page number (1-indexed). Ignored by cursor-paginated endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Number of items per page. `None` or `0` means [`DEFAULT_PER_PAGE`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Only return records updated since this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_since: Option<DateTime<Utc>>,
}

impl ListOptions {
    /// Pagination params for a specific page.
    #[must_use]
    pub fn for_page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            updated_since: None,
        }
    }
}

/// Option structs that carry a [`ListOptions`].
///
/// Filter structs embed the shared options as a flattened field; this trait
/// lets the traversal advance the page number on its own copy.
pub trait Paginated {
    fn pagination(&self) -> &ListOptions;
    fn pagination_mut(&mut self) -> &mut ListOptions;
}

impl Paginated for ListOptions {
    fn pagination(&self) -> &ListOptions {
        self
    }

    fn pagination_mut(&mut self) -> &mut ListOptions {
        self
    }
}

/// Implement [`Paginated`] for option structs with a `pagination` field.
macro_rules! impl_paginated {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::pagination::Paginated for $ty {
                fn pagination(&self) -> &$crate::pagination::ListOptions {
                    &self.pagination
                }

                fn pagination_mut(&mut self) -> &mut $crate::pagination::ListOptions {
                    &mut self.pagination
                }
            }
        )+
    };
}
pub(crate) use impl_paginated;

/// How an endpoint paginates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Client-computed page numbers.
    PageNumber,
    /// Server-supplied `links.next` URLs.
    Cursor,
}

/// One list endpoint: where it lives, where its items are, how it paginates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub path: String,
    /// Key of the items array in the response envelope.
    pub collection: &'static str,
    pub mode: PaginationMode,
}

impl Listing {
    /// A page-number paginated endpoint.
    pub fn pages(path: impl Into<String>, collection: &'static str) -> Self {
        Self {
            path: path.into(),
            collection,
            mode: PaginationMode::PageNumber,
        }
    }

    /// A cursor paginated endpoint.
    pub fn cursor(path: impl Into<String>, collection: &'static str) -> Self {
        Self {
            path: path.into(),
            collection,
            mode: PaginationMode::Cursor,
        }
    }

    /// Fill in defaults before the first request.
    ///
    /// `per_page` of `None` or `0` becomes [`DEFAULT_PER_PAGE`]. Page-number
    /// endpoints start at page 1; cursor endpoints leave `page` as given.
    pub fn normalize(&self, opts: &mut ListOptions) {
        if opts.per_page.unwrap_or(0) == 0 {
            opts.per_page = Some(DEFAULT_PER_PAGE);
        }
        if self.mode == PaginationMode::PageNumber && opts.page.unwrap_or(0) == 0 {
            opts.page = Some(1);
        }
    }
}

enum State {
    Start,
    Next(Continuation),
    Done,
}

/// Page-at-a-time traversal of a list endpoint.
///
/// Works on its own copy of the options, so the caller's value is never
/// advanced. Not restartable: build a new one to start over. An error does
/// not advance it; the next call requests the failed page again.
pub struct Pages<T, O> {
    client: HarvestClient,
    listing: Listing,
    opts: O,
    state: State,
    _item: PhantomData<fn() -> T>,
}

impl<T, O> Pages<T, O>
where
    T: DeserializeOwned,
    O: Serialize + Paginated,
{
    pub fn new(client: HarvestClient, listing: Listing, mut opts: O) -> Self {
        listing.normalize(opts.pagination_mut());
        Self {
            client,
            listing,
            opts,
            state: State::Start,
            _item: PhantomData,
        }
    }

    /// The options the next page-number request will use.
    pub fn options(&self) -> &O {
        &self.opts
    }

    /// Fetch the next page. `Ok(None)` once the last page has been returned.
    ///
    /// A failed fetch leaves the traversal where it was, so calling again
    /// retries the same page.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        let state = std::mem::replace(&mut self.state, State::Done);
        let fetched = match &state {
            State::Done => return Ok(None),
            State::Start => dispatch::list_page(&self.client, &self.listing, &self.opts).await,
            State::Next(Continuation::Link(url)) => {
                dispatch::list_page_from_url(&self.client, url, self.listing.collection).await
            }
            State::Next(Continuation::Page(number)) => {
                self.opts.pagination_mut().page = Some(*number);
                dispatch::list_page(&self.client, &self.listing, &self.opts).await
            }
        };
        let page = match fetched {
            Ok(page) => page,
            Err(err) => {
                self.state = state;
                return Err(err);
            }
        };

        let next = page.continuation();
        tracing::debug!(
            path = %self.listing.path,
            page = ?page.page,
            items = page.len(),
            next = ?next,
            "fetched page"
        );
        if let Some(next) = next {
            self.state = State::Next(next);
        }
        Ok(Some(page))
    }

    /// Fetch every remaining page and concatenate the items in fetch order.
    pub async fn collect_items(mut self) -> Result<Vec<T>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page.items);
        }
        Ok(all)
    }
}

/// Fetch a single page of `listing`, with unset `page`/`per_page` defaulted.
///
/// `opts` is cloned, never modified.
pub async fn fetch_page<T, O>(client: &HarvestClient, listing: &Listing, opts: &O) -> Result<Page<T>>
where
    T: DeserializeOwned,
    O: Serialize + Paginated + Clone,
{
    let mut opts = opts.clone();
    listing.normalize(opts.pagination_mut());
    dispatch::list_page(client, listing, &opts).await
}

/// Fetch every page of `listing` and return all items in order.
///
/// Fails as a whole if any page fails; items from earlier pages are dropped.
/// `opts` is cloned, never modified.
pub async fn fetch_all<T, O>(client: &HarvestClient, listing: Listing, opts: &O) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    O: Serialize + Paginated + Clone,
{
    Pages::new(client.clone(), listing, opts.clone())
        .collect_items()
        .await
}

/// Item-at-a-time iterator over a list endpoint.
///
/// A page is requested only when the items of the previous one are used up.
/// Single consumer; not restartable.
///
/// # Example
///
/// ```ignore
/// let mut entries = TimeEntry::iter(&client, &TimeEntryListOptions::default());
/// while let Some(entry) = entries.next().await? {
///     println!("{} {}", entry.spent_date, entry.hours);
/// }
/// ```
pub struct Items<T, O> {
    pages: Pages<T, O>,
    buffer: VecDeque<T>,
}

impl<T, O> Items<T, O>
where
    T: DeserializeOwned,
    O: Serialize + Paginated,
{
    pub fn new(client: HarvestClient, listing: Listing, opts: O) -> Self {
        Self {
            pages: Pages::new(client, listing, opts),
            buffer: VecDeque::new(),
        }
    }

    /// The next item, or `Ok(None)` when every page has been consumed.
    ///
    /// If a page request fails the error is returned and the iterator stays
    /// put; calling `next` again retries that page.
    pub async fn next(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            match self.pages.next_page().await? {
                Some(page) => self.buffer.extend(page.items),
                None => return Ok(None),
            }
        }
    }

    /// Fetch the next page whole, bypassing the item buffer.
    ///
    /// Items already buffered by [`next`](Self::next) stay buffered and are
    /// still returned by later calls to `next`.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        self.pages.next_page().await
    }

    /// Collect all remaining items into a `Vec`.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut all: Vec<T> = self.buffer.drain(..).collect();
        all.extend(self.pages.collect_items().await?);
        Ok(all)
    }
}
