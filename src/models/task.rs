//! Tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::{impl_paginated, ListOptions};
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// A kind of work that time can be tracked against (e.g. "Design").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub billable_by_default: bool,
    #[serde(default)]
    pub default_hourly_rate: Option<f64>,
    /// Whether the task is added to new projects automatically.
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Fields for creating or updating a task. `name` is required on create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable_by_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Resource for Task {
    const PATH: &'static str = "tasks";
}

impl Get for Task {}

impl List for Task {
    type Query = TaskListOptions;
    const COLLECTION: &'static str = "tasks";
}

impl Create for Task {
    type Params = TaskParams;
}

impl Update for Task {
    type Params = TaskParams;
}

impl Delete for Task {}

impl_paginated!(TaskListOptions);
