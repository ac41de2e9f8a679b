//! Harvest API client library.
//!
//! A Rust library for the Harvest v2 time-tracking and invoicing REST API.
//! Each operation (Get, List, Create, Update, Delete) is a trait that the
//! resource types implement; nested resources such as project assignments
//! and invoice messages are reached through free functions.
//!
//! # Quick Start
//!
//! ```no_run
//! use harvestapi::{Get, HarvestClient, List, Project, TimeEntry, TimeEntryListOptions};
//!
//! #[tokio::main]
//! async fn main() -> harvestapi::Result<()> {
//!     // Token and account from HARVEST_ACCESS_TOKEN / HARVEST_ACCOUNT_ID
//!     let client = HarvestClient::from_env("MyApp (ops@example.com)")?;
//!
//!     // Get a project by ID
//!     let project = Project::get(&client, 14308069).await?;
//!     println!("Project: {}", project.name);
//!
//!     // Every time entry, all pages
//!     let entries = TimeEntry::list_all(&client, &TimeEntryListOptions::default()).await?;
//!     println!("Found {} time entries", entries.len());
//!
//!     // Or lazily, one page at a time under the hood
//!     let mut iter = TimeEntry::iter(&client, &TimeEntryListOptions::default());
//!     while let Some(entry) = iter.next().await? {
//!         println!("{} {:.2}h", entry.spent_date, entry.hours);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Pagination
//!
//! Most endpoints paginate by page number; users, assignments and item
//! categories use cursors (`links.next`). [`List::list_all`] and
//! [`List::iter`] handle both, fetching 2000 items per page unless the
//! options ask otherwise. The options passed in are never modified.
//!
//! # Cancellation
//!
//! Bind a [`RequestContext`] to a client handle with
//! [`HarvestClient::with_context`]. Requests made through the handle fail
//! with [`HarvestError::Cancelled`] or [`HarvestError::DeadlineExceeded`]
//! once the context is done; a traversal stops before its next page.
//!
//! # Configuration
//!
//! - `HARVEST_ACCESS_TOKEN` (required) - personal access token
//! - `HARVEST_ACCOUNT_ID` (required) - account ID sent as `Harvest-Account-Id`
//!
//! The user agent is always supplied by the caller, in the form
//! `"AppName (contact@example.com)"`.

mod classify;
mod client;
mod context;
pub mod dispatch;
mod error;
mod models;
pub mod pagination;
mod query;
mod rate;
mod traits;

pub mod cli;
pub mod output;

// Re-export core types
pub use client::{
    HarvestClient, RawResponse, ACCESS_TOKEN_ENV, ACCOUNT_ID_ENV, DEFAULT_API_URL,
};
pub use context::RequestContext;
pub use error::{ErrorResponse, FieldError, HarvestError, RateLimitError, Result};
pub use pagination::{
    fetch_all, fetch_page, Items, ListOptions, Listing, Page, Pages, Paginated, PaginationLinks,
    PaginationMode, DEFAULT_PER_PAGE,
};
pub use rate::Rate;

// Re-export traits
pub use traits::{Create, Delete, Get, List, Resource, Update};

// Re-export models and nested-resource functions
pub use models::*;
