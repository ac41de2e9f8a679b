//! Expenses and expense categories.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{AssignmentRef, ClientRef, InvoiceRef, NamedRef, ProjectRef};
use crate::pagination::{impl_paginated, ListOptions};
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// A cost incurred on a project, such as travel or materials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: u64,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub expense_category: Option<ExpenseCategoryRef>,
    #[serde(default)]
    pub user: Option<NamedRef>,
    #[serde(default)]
    pub user_assignment: Option<AssignmentRef>,
    #[serde(default)]
    pub invoice: Option<InvoiceRef>,
    #[serde(default)]
    pub receipt: Option<Receipt>,
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
    pub billable: bool,
    pub spent_date: NaiveDate,
    #[serde(default)]
    pub total_cost: f64,
    /// Quantity for unit-priced categories (e.g. miles).
    #[serde(default)]
    pub units: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Category summary embedded in an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategoryRef {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unit_name: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
}

/// A receipt attached to an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_billed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// Fields for creating or updating an expense.
///
/// `project_id`, `expense_category_id` and `spent_date` are required on
/// create, along with `total_cost` or `units` depending on the category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable: Option<bool>,
}

impl Resource for Expense {
    const PATH: &'static str = "expenses";
}

impl Get for Expense {}

impl List for Expense {
    type Query = ExpenseListOptions;
    const COLLECTION: &'static str = "expenses";
}

impl Create for Expense {
    type Params = ExpenseParams;
}

impl Update for Expense {
    type Params = ExpenseParams;
}

impl Delete for Expense {}

/// A kind of expense, optionally priced per unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub unit_name: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseCategoryListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Fields for creating or updating an expense category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseCategoryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Resource for ExpenseCategory {
    const PATH: &'static str = "expense_categories";
}

impl Get for ExpenseCategory {}

impl List for ExpenseCategory {
    type Query = ExpenseCategoryListOptions;
    const COLLECTION: &'static str = "expense_categories";
}

impl Create for ExpenseCategory {
    type Params = ExpenseCategoryParams;
}

impl Update for ExpenseCategory {
    type Params = ExpenseCategoryParams;
}

impl Delete for ExpenseCategory {}

impl_paginated!(ExpenseListOptions, ExpenseCategoryListOptions);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_deserialize() {
        let json = r#"{
            "id": 15296442,
            "notes": "Lunch with client",
            "total_cost": 33.35,
            "units": 1.0,
            "is_closed": false,
            "is_locked": true,
            "is_billed": true,
            "locked_reason": "Expense is invoiced.",
            "spent_date": "2017-03-03",
            "created_at": "2017-06-27T15:09:54Z",
            "updated_at": "2017-06-27T16:47:14Z",
            "billable": true,
            "receipt": {
                "url": "https://{ACCOUNT_SUBDOMAIN}.harvestapp.com/expenses/15296442/receipt",
                "file_name": "lunch_receipt.gif",
                "file_size": 39410,
                "content_type": "image/gif"
            },
            "user": {"id": 1782959, "name": "Kim Allen"},
            "user_assignment": {"id": 125068553, "is_project_manager": true, "is_active": true, "budget": null, "hourly_rate": 100.0},
            "project": {"id": 14307913, "name": "Marketing Website", "code": "MW"},
            "expense_category": {"id": 4195926, "name": "Meals", "unit_price": null, "unit_name": null},
            "client": {"id": 5735774, "name": "ABC Corp", "currency": "USD"},
            "invoice": {"id": 13150403, "number": "1001"}
        }"#;

        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.total_cost, 33.35);
        assert_eq!(
            expense.expense_category.map(|c| c.name).as_deref(),
            Some("Meals")
        );
        assert_eq!(expense.receipt.and_then(|r| r.file_size), Some(39410));
    }
}
