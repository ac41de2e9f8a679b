//! Roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::ListOptions;
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// A named group of users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub user_ids: Vec<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for creating or updating a role.
///
/// On update, `user_ids` replaces the role's members.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<Vec<u64>>,
}

impl Resource for Role {
    const PATH: &'static str = "roles";
}

impl Get for Role {}

// Roles take no filters beyond pagination.
impl List for Role {
    type Query = ListOptions;
    const COLLECTION: &'static str = "roles";
}

impl Create for Role {
    type Params = RoleParams;
}

impl Update for Role {
    type Params = RoleParams;
}

impl Delete for Role {}
