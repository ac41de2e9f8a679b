//! Time entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{AssignmentRef, ClientRef, InvoiceRef, NamedRef, ProjectRef};
use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;
use crate::pagination::{impl_paginated, ListOptions};
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// Time tracked by a user against a project task on a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: u64,
    pub spent_date: NaiveDate,
    #[serde(default)]
    pub user: Option<NamedRef>,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub task: Option<NamedRef>,
    #[serde(default)]
    pub user_assignment: Option<AssignmentRef>,
    #[serde(default)]
    pub task_assignment: Option<AssignmentRef>,
    /// Set once the entry has been invoiced.
    #[serde(default)]
    pub invoice: Option<InvoiceRef>,
    #[serde(default)]
    pub external_reference: Option<ExternalReference>,
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub hours_without_timer: Option<f64>,
    #[serde(default)]
    pub rounded_hours: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub locked_reason: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub is_billed: bool,
    #[serde(default)]
    pub timer_started_at: Option<DateTime<Utc>>,
    /// Start time for accounts tracking via start and end times (e.g. `"8:00am"`).
    #[serde(default)]
    pub started_time: Option<String>,
    #[serde(default)]
    pub ended_time: Option<String>,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub billable: bool,
    #[serde(default)]
    pub budgeted: bool,
    #[serde(default)]
    pub billable_rate: Option<f64>,
    #[serde(default)]
    pub cost_rate: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A link from a time entry to an item in another service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalReference {
    pub id: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default, skip_serializing)]
    pub service: Option<String>,
    #[serde(default, skip_serializing)]
    pub service_icon_url: Option<String>,
}

impl TimeEntry {
    /// Restart a stopped time entry's timer.
    #[tracing::instrument(skip(client))]
    pub async fn restart(client: &HarvestClient, id: u64) -> Result<Self> {
        let body = serde_json::json!({ "id": id });
        dispatch::update(client, &format!("{}/restart", Self::item_path(id)), Some(&body)).await
    }

    /// Stop a running time entry's timer.
    #[tracing::instrument(skip(client))]
    pub async fn stop(client: &HarvestClient, id: u64) -> Result<Self> {
        dispatch::update(client, &format!("{}/stop", Self::item_path(id)), None::<&()>).await
    }

    /// Remove the external reference of a time entry.
    #[tracing::instrument(skip(client))]
    pub async fn delete_external_reference(client: &HarvestClient, id: u64) -> Result<()> {
        dispatch::delete(client, &format!("{}/external_reference", Self::item_path(id))).await
    }
}

/// Filters for listing time entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimeEntryListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    /// `"unsubmitted"`, `"submitted"` or `"approved"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// Fields for creating or updating a time entry.
///
/// Accounts track time either by duration (`hours`) or by start and end
/// time; use [`TimeEntryParams::duration`] or [`TimeEntryParams::start_end`]
/// to build a create request of the right shape.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimeEntryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<ExternalReference>,
}

impl TimeEntryParams {
    /// A create request for duration-tracking accounts.
    ///
    /// Omitting `hours` starts a running timer.
    pub fn duration(project_id: u64, task_id: u64, spent_date: NaiveDate, hours: Option<f64>) -> Self {
        Self {
            project_id: Some(project_id),
            task_id: Some(task_id),
            spent_date: Some(spent_date),
            hours,
            ..Default::default()
        }
    }

    /// A create request for start/end-time tracking accounts.
    pub fn start_end(
        project_id: u64,
        task_id: u64,
        spent_date: NaiveDate,
        started_time: impl Into<String>,
        ended_time: Option<String>,
    ) -> Self {
        Self {
            project_id: Some(project_id),
            task_id: Some(task_id),
            spent_date: Some(spent_date),
            started_time: Some(started_time.into()),
            ended_time,
            ..Default::default()
        }
    }
}

impl Resource for TimeEntry {
    const PATH: &'static str = "time_entries";
}

impl Get for TimeEntry {}

impl List for TimeEntry {
    type Query = TimeEntryListOptions;
    const COLLECTION: &'static str = "time_entries";
}

impl Create for TimeEntry {
    type Params = TimeEntryParams;
}

impl Update for TimeEntry {
    type Params = TimeEntryParams;
}

impl Delete for TimeEntry {}

impl_paginated!(TimeEntryListOptions);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_entry_deserialize() {
        let json = r#"{
            "id": 636709355,
            "spent_date": "2017-03-02",
            "user": {"id": 1782959, "name": "Kim Allen"},
            "client": {"id": 5735774, "name": "ABC Corp", "currency": "USD"},
            "project": {"id": 14307913, "name": "Marketing Website", "code": "MW"},
            "task": {"id": 8083365, "name": "Graphic Design"},
            "user_assignment": {"id": 125068553, "is_project_manager": true, "is_active": true, "budget": null, "hourly_rate": 100.0},
            "task_assignment": {"id": 155502709, "billable": true, "is_active": true, "hourly_rate": 100.0, "budget": null},
            "hours": 2.11,
            "hours_without_timer": 2.11,
            "rounded_hours": 2.25,
            "notes": "Adding CSS styling",
            "is_locked": true,
            "locked_reason": "Item Invoiced and Approved",
            "is_closed": true,
            "is_billed": true,
            "timer_started_at": null,
            "started_time": "3:00pm",
            "ended_time": "5:00pm",
            "is_running": false,
            "invoice": {"id": 13150403, "number": "1001"},
            "external_reference": null,
            "billable": true,
            "budgeted": true,
            "billable_rate": 100.0,
            "cost_rate": 50.0,
            "created_at": "2017-06-27T15:50:15Z",
            "updated_at": "2017-06-27T16:47:14Z"
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.spent_date, NaiveDate::from_ymd_opt(2017, 3, 2).unwrap());
        assert_eq!(entry.invoice.and_then(|i| i.number).as_deref(), Some("1001"));
        assert_eq!(entry.task.map(|t| t.name).as_deref(), Some("Graphic Design"));
        assert!(entry.external_reference.is_none());
        assert!((entry.hours - 2.11).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duration_params_body() {
        let date = NaiveDate::from_ymd_opt(2017, 3, 21).unwrap();
        let params = TimeEntryParams::duration(14307913, 8083365, date, Some(1.5));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({
                "project_id": 14307913,
                "task_id": 8083365,
                "spent_date": "2017-03-21",
                "hours": 1.5
            })
        );
    }

    #[test]
    fn test_start_end_params_body() {
        let date = NaiveDate::from_ymd_opt(2017, 3, 21).unwrap();
        let params = TimeEntryParams::start_end(1, 2, date, "8:00am", Some("9:00am".to_string()));
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body["started_time"], "8:00am");
        assert_eq!(body["ended_time"], "9:00am");
        assert!(body.get("hours").is_none());
    }

    #[test]
    fn test_list_options_dates() {
        let opts = TimeEntryListOptions {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: NaiveDate::from_ymd_opt(2024, 1, 31),
            is_running: Some(false),
            ..Default::default()
        };
        let pairs = crate::query::to_pairs(&opts).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("from".to_string(), "2024-01-01".to_string()),
                ("is_running".to_string(), "false".to_string()),
                ("to".to_string(), "2024-01-31".to_string()),
            ]
        );
    }
}
