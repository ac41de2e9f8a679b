//! Reports.
//!
//! Report rows come back under a `results` key and are paginated by page
//! number. The time, expense and uninvoiced reports cover a date range, so
//! their options are built with [`new`](TimeReportOptions::new) rather than
//! `Default`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::HarvestClient;
use crate::error::Result;
use crate::pagination::{fetch_all, fetch_page, impl_paginated, ListOptions, Listing, Page};

const RESULTS: &str = "results";

/// Hours and billable amounts for one user over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeReportResult {
    #[serde(default)]
    pub client_id: Option<u64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub task_id: Option<u64>,
    #[serde(default)]
    pub task_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub weekly_capacity: Option<u32>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_contractor: bool,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub billable_hours: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub billable_amount: f64,
}

/// Expense totals for one user over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseReportResult {
    #[serde(default)]
    pub client_id: Option<u64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub expense_category_id: Option<u64>,
    #[serde(default)]
    pub expense_category_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub is_contractor: bool,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub billable_amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Work not yet invoiced on one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UninvoicedReportResult {
    #[serde(default)]
    pub client_id: Option<u64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub uninvoiced_hours: f64,
    #[serde(default)]
    pub uninvoiced_expenses: f64,
    #[serde(default)]
    pub uninvoiced_amount: f64,
}

/// Budget use of one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectBudgetReportResult {
    #[serde(default)]
    pub client_id: Option<u64>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_code: Option<String>,
    #[serde(default)]
    pub project_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub project_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_billable: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub budget_by: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub budget_spent: f64,
    #[serde(default)]
    pub budget_remaining: Option<f64>,
}

/// Options for the team time report.
#[derive(Debug, Clone, Serialize)]
pub struct TimeReportOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_billable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_unbillable: Option<bool>,
}

impl TimeReportOptions {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            pagination: ListOptions::default(),
            from,
            to,
            client_id: None,
            project_id: None,
            task_id: None,
            user_id: None,
            is_billed: None,
            is_running: None,
            only_billable: None,
            only_unbillable: None,
        }
    }
}

/// Options for the team expense report.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseReportOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billed: Option<bool>,
}

impl ExpenseReportOptions {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            pagination: ListOptions::default(),
            from,
            to,
            client_id: None,
            project_id: None,
            user_id: None,
            is_billed: None,
        }
    }
}

/// Options for the uninvoiced report.
#[derive(Debug, Clone, Serialize)]
pub struct UninvoicedReportOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
}

impl UninvoicedReportOptions {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            pagination: ListOptions::default(),
            from,
            to,
            client_id: None,
            project_id: None,
        }
    }
}

/// Options for the project budget report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectBudgetReportOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
}

impl_paginated!(
    TimeReportOptions,
    ExpenseReportOptions,
    UninvoicedReportOptions,
    ProjectBudgetReportOptions,
);

fn team_time() -> Listing {
    Listing::pages("reports/time/team", RESULTS)
}

fn team_expenses() -> Listing {
    Listing::pages("reports/expenses/team", RESULTS)
}

fn uninvoiced() -> Listing {
    Listing::pages("reports/uninvoiced", RESULTS)
}

fn project_budget() -> Listing {
    Listing::pages("reports/project_budget", RESULTS)
}

/// Fetch one page of the team time report.
pub async fn time_report_page(
    client: &HarvestClient,
    opts: &TimeReportOptions,
) -> Result<Page<TimeReportResult>> {
    fetch_page(client, &team_time(), opts).await
}

/// Fetch the whole team time report.
///
/// # Example
///
/// ```ignore
/// use chrono::NaiveDate;
/// use harvestapi::{time_report, HarvestClient, TimeReportOptions};
///
/// let client = HarvestClient::from_env("MyApp (ops@example.com)")?;
/// let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let to = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// for row in time_report(&client, &TimeReportOptions::new(from, to)).await? {
///     println!("{:?}: {}h", row.user_name, row.total_hours);
/// }
/// ```
pub async fn time_report(
    client: &HarvestClient,
    opts: &TimeReportOptions,
) -> Result<Vec<TimeReportResult>> {
    fetch_all(client, team_time(), opts).await
}

/// Fetch one page of the team expense report.
pub async fn expense_report_page(
    client: &HarvestClient,
    opts: &ExpenseReportOptions,
) -> Result<Page<ExpenseReportResult>> {
    fetch_page(client, &team_expenses(), opts).await
}

/// Fetch the whole team expense report.
pub async fn expense_report(
    client: &HarvestClient,
    opts: &ExpenseReportOptions,
) -> Result<Vec<ExpenseReportResult>> {
    fetch_all(client, team_expenses(), opts).await
}

/// Fetch one page of the uninvoiced report.
pub async fn uninvoiced_report_page(
    client: &HarvestClient,
    opts: &UninvoicedReportOptions,
) -> Result<Page<UninvoicedReportResult>> {
    fetch_page(client, &uninvoiced(), opts).await
}

/// Fetch the whole uninvoiced report.
pub async fn uninvoiced_report(
    client: &HarvestClient,
    opts: &UninvoicedReportOptions,
) -> Result<Vec<UninvoicedReportResult>> {
    fetch_all(client, uninvoiced(), opts).await
}

/// Fetch one page of the project budget report.
pub async fn project_budget_report_page(
    client: &HarvestClient,
    opts: &ProjectBudgetReportOptions,
) -> Result<Page<ProjectBudgetReportResult>> {
    fetch_page(client, &project_budget(), opts).await
}

/// Fetch the whole project budget report.
pub async fn project_budget_report(
    client: &HarvestClient,
    opts: &ProjectBudgetReportOptions,
) -> Result<Vec<ProjectBudgetReportResult>> {
    fetch_all(client, project_budget(), opts).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_is_always_sent() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let pairs = crate::query::to_pairs(&UninvoicedReportOptions::new(from, to)).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("from".to_string(), "2024-01-01".to_string()),
                ("to".to_string(), "2024-03-31".to_string()),
            ]
        );
    }

    #[test]
    fn test_budget_report_row() {
        let json = r#"{
            "project_id": 14308069,
            "project_name": "Online Store - Phase 1",
            "client_id": 5735776,
            "client_name": "123 Industries",
            "budget_is_monthly": false,
            "budget_by": "project",
            "is_active": true,
            "budget": 200.0,
            "budget_spent": 4.0,
            "budget_remaining": 196.0
        }"#;
        let row: ProjectBudgetReportResult = serde_json::from_str(json).unwrap();
        assert_eq!(row.budget_remaining, Some(196.0));
        assert!(row.project_start_date.is_none());
    }

    #[test]
    fn test_report_listings() {
        for listing in [team_time(), team_expenses(), uninvoiced(), project_budget()] {
            assert_eq!(listing.collection, "results");
            assert!(listing.path.starts_with("reports/"));
        }
    }
}
