//! Projects and their user and task assignments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{ClientRef, NamedRef, ProjectRef};
use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;
use crate::pagination::{fetch_all, fetch_page, impl_paginated, Items, ListOptions, Listing, Page};
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// A Harvest project.
///
/// Projects belong to a client. Time and expenses are tracked against a
/// project through its user and task assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub client: Option<ClientRef>,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_billable: bool,
    #[serde(default)]
    pub is_fixed_fee: bool,
    /// `"Project"`, `"Tasks"`, `"People"` or `"none"`.
    #[serde(default)]
    pub bill_by: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    /// `"project"`, `"project_cost"`, `"task"`, `"task_fees"`, `"person"` or `"none"`.
    #[serde(default)]
    pub budget_by: Option<String>,
    #[serde(default)]
    pub budget_is_monthly: bool,
    #[serde(default)]
    pub notify_when_over_budget: bool,
    #[serde(default)]
    pub over_budget_notification_percentage: Option<f64>,
    #[serde(default)]
    pub show_budget_to_all: bool,
    #[serde(default)]
    pub cost_budget: Option<f64>,
    #[serde(default)]
    pub cost_budget_include_expenses: bool,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub fee: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// All user assignments of this project.
    pub async fn user_assignments(
        &self,
        client: &HarvestClient,
    ) -> Result<Vec<ProjectUserAssignment>> {
        list_user_assignments(client, self.id, &UserAssignmentListOptions::default()).await
    }

    /// All task assignments of this project.
    pub async fn task_assignments(
        &self,
        client: &HarvestClient,
    ) -> Result<Vec<ProjectTaskAssignment>> {
        list_task_assignments(client, self.id, &TaskAssignmentListOptions::default()).await
    }
}

/// Filters for listing projects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
}

/// Fields for creating or updating a project.
///
/// `client_id`, `name`, `is_billable`, `bill_by` and `budget_by` are
/// required on create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fixed_fee: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_is_monthly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_when_over_budget: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_budget_notification_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_budget_to_all: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_budget_include_expenses: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
}

impl Resource for Project {
    const PATH: &'static str = "projects";
}

impl Get for Project {}

impl List for Project {
    type Query = ProjectListOptions;
    const COLLECTION: &'static str = "projects";
}

impl Create for Project {
    type Params = ProjectParams;
}

impl Update for Project {
    type Params = ProjectParams;
}

impl Delete for Project {}

/// A user's membership in a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectUserAssignment {
    pub id: u64,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub user: Option<NamedRef>,
    /// Present on the `users/{id}/project_assignments` listings.
    #[serde(default)]
    pub client: Option<ClientRef>,
    /// Present on the `users/{id}/project_assignments` listings.
    #[serde(default)]
    pub task_assignments: Vec<ProjectTaskAssignment>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_project_manager: bool,
    #[serde(default)]
    pub use_default_rates: bool,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A task made available on a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTaskAssignment {
    pub id: u64,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub task: Option<NamedRef>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub billable: Option<bool>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Filters for listing a project's user assignments.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserAssignmentListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Fields for creating or updating a user assignment.
///
/// `user_id` is required on create and ignored on update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserAssignmentParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_project_manager: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_default_rates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

/// Filters for listing a project's task assignments.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskAssignmentListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Fields for creating or updating a task assignment.
///
/// `task_id` is required on create and ignored on update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskAssignmentParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl_paginated!(
    ProjectListOptions,
    UserAssignmentListOptions,
    TaskAssignmentListOptions
);

// Project user assignments (cursor paginated)

fn user_assignments_path(project_id: u64) -> String {
    format!("projects/{project_id}/user_assignments")
}

fn user_assignments_listing(project_id: u64) -> Listing {
    Listing::cursor(user_assignments_path(project_id), "user_assignments")
}

/// Fetch one page of a project's user assignments.
pub async fn user_assignments_page(
    client: &HarvestClient,
    project_id: u64,
    opts: &UserAssignmentListOptions,
) -> Result<Page<ProjectUserAssignment>> {
    fetch_page(client, &user_assignments_listing(project_id), opts).await
}

/// Fetch every user assignment of a project.
///
/// # Example
///
/// ```ignore
/// use harvestapi::{list_user_assignments, HarvestClient, UserAssignmentListOptions};
///
/// let client = HarvestClient::from_env("MyApp (ops@example.com)")?;
/// let members = list_user_assignments(
///     &client,
///     14308069,
///     &UserAssignmentListOptions::default(),
/// ).await?;
/// ```
pub async fn list_user_assignments(
    client: &HarvestClient,
    project_id: u64,
    opts: &UserAssignmentListOptions,
) -> Result<Vec<ProjectUserAssignment>> {
    fetch_all(client, user_assignments_listing(project_id), opts).await
}

/// Lazily iterate over a project's user assignments.
pub fn iter_user_assignments(
    client: &HarvestClient,
    project_id: u64,
    opts: &UserAssignmentListOptions,
) -> Items<ProjectUserAssignment, UserAssignmentListOptions> {
    Items::new(client.clone(), user_assignments_listing(project_id), opts.clone())
}

#[tracing::instrument(skip(client))]
pub async fn get_user_assignment(
    client: &HarvestClient,
    project_id: u64,
    assignment_id: u64,
) -> Result<ProjectUserAssignment> {
    let path = format!("{}/{assignment_id}", user_assignments_path(project_id));
    dispatch::get(client, &path).await
}

#[tracing::instrument(skip(client, params))]
pub async fn create_user_assignment(
    client: &HarvestClient,
    project_id: u64,
    params: &UserAssignmentParams,
) -> Result<ProjectUserAssignment> {
    dispatch::create(client, &user_assignments_path(project_id), params).await
}

#[tracing::instrument(skip(client, params))]
pub async fn update_user_assignment(
    client: &HarvestClient,
    project_id: u64,
    assignment_id: u64,
    params: &UserAssignmentParams,
) -> Result<ProjectUserAssignment> {
    let path = format!("{}/{assignment_id}", user_assignments_path(project_id));
    dispatch::update(client, &path, Some(params)).await
}

#[tracing::instrument(skip(client))]
pub async fn delete_user_assignment(
    client: &HarvestClient,
    project_id: u64,
    assignment_id: u64,
) -> Result<()> {
    let path = format!("{}/{assignment_id}", user_assignments_path(project_id));
    dispatch::delete(client, &path).await
}

// Project task assignments (cursor paginated)

fn task_assignments_path(project_id: u64) -> String {
    format!("projects/{project_id}/task_assignments")
}

fn task_assignments_listing(project_id: u64) -> Listing {
    Listing::cursor(task_assignments_path(project_id), "task_assignments")
}

/// Fetch one page of a project's task assignments.
pub async fn task_assignments_page(
    client: &HarvestClient,
    project_id: u64,
    opts: &TaskAssignmentListOptions,
) -> Result<Page<ProjectTaskAssignment>> {
    fetch_page(client, &task_assignments_listing(project_id), opts).await
}

/// Fetch every task assignment of a project.
pub async fn list_task_assignments(
    client: &HarvestClient,
    project_id: u64,
    opts: &TaskAssignmentListOptions,
) -> Result<Vec<ProjectTaskAssignment>> {
    fetch_all(client, task_assignments_listing(project_id), opts).await
}

/// Lazily iterate over a project's task assignments.
pub fn iter_task_assignments(
    client: &HarvestClient,
    project_id: u64,
    opts: &TaskAssignmentListOptions,
) -> Items<ProjectTaskAssignment, TaskAssignmentListOptions> {
    Items::new(client.clone(), task_assignments_listing(project_id), opts.clone())
}

#[tracing::instrument(skip(client))]
pub async fn get_task_assignment(
    client: &HarvestClient,
    project_id: u64,
    assignment_id: u64,
) -> Result<ProjectTaskAssignment> {
    let path = format!("{}/{assignment_id}", task_assignments_path(project_id));
    dispatch::get(client, &path).await
}

#[tracing::instrument(skip(client, params))]
pub async fn create_task_assignment(
    client: &HarvestClient,
    project_id: u64,
    params: &TaskAssignmentParams,
) -> Result<ProjectTaskAssignment> {
    dispatch::create(client, &task_assignments_path(project_id), params).await
}

#[tracing::instrument(skip(client, params))]
pub async fn update_task_assignment(
    client: &HarvestClient,
    project_id: u64,
    assignment_id: u64,
    params: &TaskAssignmentParams,
) -> Result<ProjectTaskAssignment> {
    let path = format!("{}/{assignment_id}", task_assignments_path(project_id));
    dispatch::update(client, &path, Some(params)).await
}

#[tracing::instrument(skip(client))]
pub async fn delete_task_assignment(
    client: &HarvestClient,
    project_id: u64,
    assignment_id: u64,
) -> Result<()> {
    let path = format!("{}/{assignment_id}", task_assignments_path(project_id));
    dispatch::delete(client, &path).await
}
