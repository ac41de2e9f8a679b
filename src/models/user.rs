//! Users and their project assignments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::project::ProjectUserAssignment;
use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;
use crate::pagination::{
    fetch_all, fetch_page, impl_paginated, Items, ListOptions, Listing, Page, PaginationMode,
};
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// A person in the Harvest account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub has_access_to_all_future_projects: bool,
    #[serde(default)]
    pub is_contractor: bool,
    #[serde(default)]
    pub is_active: bool,
    /// Weekly capacity in seconds.
    #[serde(default)]
    pub weekly_capacity: Option<u32>,
    #[serde(default)]
    pub default_hourly_rate: Option<f64>,
    #[serde(default)]
    pub cost_rate: Option<f64>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub access_roles: Vec<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Fetch the user the access token belongs to.
    #[tracing::instrument(skip(client))]
    pub async fn me(client: &HarvestClient) -> Result<Self> {
        dispatch::get(client, "users/me").await
    }

    /// First and last name joined.
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// All project assignments of this user.
    pub async fn project_assignments(
        &self,
        client: &HarvestClient,
    ) -> Result<Vec<ProjectUserAssignment>> {
        list_user_project_assignments(client, self.id, &ListOptions::default()).await
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Fields for creating or updating a user.
///
/// `first_name`, `last_name` and `email` are required on create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_access_to_all_future_projects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_contractor: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_roles: Option<Vec<String>>,
}

impl Resource for User {
    const PATH: &'static str = "users";
}

impl Get for User {}

impl List for User {
    type Query = UserListOptions;
    const COLLECTION: &'static str = "users";
    const MODE: PaginationMode = PaginationMode::Cursor;
}

impl Create for User {
    type Params = UserParams;
}

impl Update for User {
    type Params = UserParams;
}

impl Delete for User {}

impl_paginated!(UserListOptions);

// Project assignments of a user (cursor paginated)

fn project_assignments_listing(user: &str) -> Listing {
    Listing::cursor(format!("users/{user}/project_assignments"), "project_assignments")
}

/// Fetch one page of a user's project assignments.
pub async fn user_project_assignments_page(
    client: &HarvestClient,
    user_id: u64,
    opts: &ListOptions,
) -> Result<Page<ProjectUserAssignment>> {
    fetch_page(client, &project_assignments_listing(&user_id.to_string()), opts).await
}

/// Fetch every project assignment of a user.
pub async fn list_user_project_assignments(
    client: &HarvestClient,
    user_id: u64,
    opts: &ListOptions,
) -> Result<Vec<ProjectUserAssignment>> {
    fetch_all(client, project_assignments_listing(&user_id.to_string()), opts).await
}

/// Lazily iterate over a user's project assignments.
pub fn iter_user_project_assignments(
    client: &HarvestClient,
    user_id: u64,
    opts: &ListOptions,
) -> Items<ProjectUserAssignment, ListOptions> {
    Items::new(
        client.clone(),
        project_assignments_listing(&user_id.to_string()),
        opts.clone(),
    )
}

/// Fetch one page of the authenticated user's project assignments.
pub async fn my_project_assignments_page(
    client: &HarvestClient,
    opts: &ListOptions,
) -> Result<Page<ProjectUserAssignment>> {
    fetch_page(client, &project_assignments_listing("me"), opts).await
}

/// Fetch every project assignment of the authenticated user.
///
/// Each assignment carries the project's client and task assignments, which
/// makes this the usual starting point for building a timesheet.
pub async fn list_my_project_assignments(
    client: &HarvestClient,
    opts: &ListOptions,
) -> Result<Vec<ProjectUserAssignment>> {
    fetch_all(client, project_assignments_listing("me"), opts).await
}
