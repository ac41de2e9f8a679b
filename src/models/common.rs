//! Abbreviated records embedded in other resources.
//!
//! Harvest nests a few identifying fields of related records (a time entry's
//! project, an invoice's client) rather than the full record.

use serde::{Deserialize, Serialize};

/// A related record identified by ID and name (users, tasks, categories).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Client summary embedded in projects, invoices, estimates and entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Project summary embedded in assignments, entries and line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Invoice summary embedded in billed time entries and expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRef {
    pub id: u64,
    #[serde(default)]
    pub number: Option<String>,
}

/// Assignment summary embedded in time entries and expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRef {
    pub id: u64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_project_manager: Option<bool>,
    #[serde(default)]
    pub billable: Option<bool>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
}
