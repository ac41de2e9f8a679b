//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use chrono::{DateTime, Utc};

use crate::{
    Client, Company, Contact, Estimate, Expense, ExpenseCategory, Invoice, Project, Role, Task,
    TimeEntry, User,
};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn field(lines: &mut Vec<String>, label: &str, value: impl std::fmt::Display) {
    lines.push(format!("{:<16}{}", format!("{label}:"), value));
}

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn money(amount: f64, currency: Option<&str>) -> String {
    match currency {
        Some(code) => format!("{amount:.2} {code}"),
        None => format!("{amount:.2}"),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl PrettyPrint for Company {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Company: {}", self.name));
        field(&mut lines, "Domain", &self.full_domain);
        if let Some(ref plan) = self.plan_type {
            field(&mut lines, "Plan", plan);
        }
        if let Some(hours) = self.weekly_capacity_hours() {
            field(&mut lines, "Capacity", format!("{hours:.1}h/week"));
        }
        let features: Vec<&str> = [
            ("expenses", self.expense_feature),
            ("invoices", self.invoice_feature),
            ("estimates", self.estimate_feature),
            ("approvals", self.approval_feature),
        ]
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect();
        field(&mut lines, "Features", features.join(", "));
        lines.join("\n")
    }
}

impl PrettyPrint for Client {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Client #{}", self.id));
        field(&mut lines, "Name", &self.name);
        field(&mut lines, "Active", yes_no(self.is_active));
        if let Some(ref currency) = self.currency {
            field(&mut lines, "Currency", currency);
        }
        if let Some(ref address) = self.address {
            field(&mut lines, "Address", address.replace("\r\n", ", "));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for Contact {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Contact #{}", self.id));
        field(&mut lines, "Name", self.full_name());
        if let Some(ref client) = self.client {
            field(&mut lines, "Client", &client.name);
        }
        if let Some(ref email) = self.email {
            field(&mut lines, "Email", email);
        }
        if let Some(ref phone) = self.phone_office {
            field(&mut lines, "Phone", phone);
        }
        lines.join("\n")
    }
}

impl PrettyPrint for Project {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Project #{}", self.id));
        field(&mut lines, "Name", &self.name);
        if let Some(ref code) = self.code {
            field(&mut lines, "Code", code);
        }
        if let Some(ref client) = self.client {
            field(&mut lines, "Client", &client.name);
        }
        field(&mut lines, "Active", yes_no(self.is_active));
        field(&mut lines, "Billable", yes_no(self.is_billable));
        if let Some(budget) = self.budget {
            let by = self.budget_by.as_deref().unwrap_or("project");
            field(&mut lines, "Budget", format!("{budget} (by {by})"));
        }
        if let (Some(start), end) = (self.starts_on, self.ends_on) {
            let end = end.map(|d| d.to_string()).unwrap_or_else(|| "open".to_string());
            field(&mut lines, "Runs", format!("{start} to {end}"));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for Task {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Task #{}", self.id));
        field(&mut lines, "Name", &self.name);
        field(&mut lines, "Billable", yes_no(self.billable_by_default));
        if let Some(rate) = self.default_hourly_rate {
            field(&mut lines, "Rate", format!("{rate:.2}/h"));
        }
        field(&mut lines, "Active", yes_no(self.is_active));
        lines.join("\n")
    }
}

impl PrettyPrint for TimeEntry {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Time Entry #{}", self.id));
        field(&mut lines, "Date", self.spent_date);
        field(&mut lines, "Hours", format!("{:.2}", self.hours));
        if let Some(ref user) = self.user {
            field(&mut lines, "User", &user.name);
        }
        if let Some(ref project) = self.project {
            field(&mut lines, "Project", &project.name);
        }
        if let Some(ref task) = self.task {
            field(&mut lines, "Task", &task.name);
        }
        if let Some(ref notes) = self.notes {
            field(&mut lines, "Notes", notes);
        }
        if self.is_running {
            let since = self
                .timer_started_at
                .as_ref()
                .map(timestamp)
                .unwrap_or_default();
            field(&mut lines, "Running", format!("since {since}"));
        }
        if let Some(ref invoice) = self.invoice {
            let number = invoice.number.as_deref().unwrap_or("?");
            field(&mut lines, "Invoiced", format!("#{number}"));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("User #{}", self.id));
        field(&mut lines, "Name", self.full_name());
        field(&mut lines, "Email", &self.email);
        if let Some(ref tz) = self.timezone {
            field(&mut lines, "Timezone", tz);
        }
        if !self.roles.is_empty() {
            field(&mut lines, "Roles", self.roles.join(", "));
        }
        field(&mut lines, "Contractor", yes_no(self.is_contractor));
        field(&mut lines, "Active", yes_no(self.is_active));
        lines.join("\n")
    }
}

impl PrettyPrint for Role {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Role #{}", self.id));
        field(&mut lines, "Name", &self.name);
        field(&mut lines, "Members", self.user_ids.len());
        lines.join("\n")
    }
}

impl PrettyPrint for Invoice {
    fn pretty_print(&self) -> String {
        let number = self.number.as_deref().unwrap_or("(draft)");
        let mut lines = header(format!("Invoice {number}"));
        if let Some(ref client) = self.client {
            field(&mut lines, "Client", &client.name);
        }
        field(&mut lines, "State", &self.state);
        let currency = self.currency.as_deref();
        field(&mut lines, "Amount", money(self.amount, currency));
        field(&mut lines, "Due", money(self.due_amount, currency));
        if let Some(date) = self.issue_date {
            field(&mut lines, "Issued", date);
        }
        if let Some(date) = self.due_date {
            field(&mut lines, "Due Date", date);
        }
        if let Some(ref sent) = self.sent_at {
            field(&mut lines, "Sent", timestamp(sent));
        }
        field(&mut lines, "Lines", self.line_items.len());
        lines.join("\n")
    }
}

impl PrettyPrint for Estimate {
    fn pretty_print(&self) -> String {
        let number = self.number.as_deref().unwrap_or("(draft)");
        let mut lines = header(format!("Estimate {number}"));
        if let Some(ref client) = self.client {
            field(&mut lines, "Client", &client.name);
        }
        field(&mut lines, "State", &self.state);
        field(&mut lines, "Amount", money(self.amount, self.currency.as_deref()));
        if let Some(date) = self.issue_date {
            field(&mut lines, "Issued", date);
        }
        lines.join("\n")
    }
}

impl PrettyPrint for Expense {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Expense #{}", self.id));
        field(&mut lines, "Date", self.spent_date);
        let currency = self.client.as_ref().and_then(|c| c.currency.as_deref());
        field(&mut lines, "Total", money(self.total_cost, currency));
        if let Some(ref category) = self.expense_category {
            field(&mut lines, "Category", &category.name);
        }
        if let Some(ref project) = self.project {
            field(&mut lines, "Project", &project.name);
        }
        if let Some(ref notes) = self.notes {
            field(&mut lines, "Notes", notes);
        }
        field(&mut lines, "Billable", yes_no(self.billable));
        lines.join("\n")
    }
}

impl PrettyPrint for ExpenseCategory {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Expense Category #{}", self.id));
        field(&mut lines, "Name", &self.name);
        if let (Some(unit), Some(price)) = (self.unit_name.as_ref(), self.unit_price) {
            field(&mut lines, "Unit", format!("{price:.2} per {unit}"));
        }
        field(&mut lines, "Active", yes_no(self.is_active));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_pretty_print_format() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": 14308069,
            "name": "Online Store - Phase 1",
            "code": "OS1",
            "is_active": true,
            "is_billable": true,
            "client": {"id": 5735776, "name": "123 Industries"}
        }))
        .unwrap();

        let output = project.pretty_print();
        assert!(output.starts_with("Project #14308069"));
        assert!(output.contains("Client:         123 Industries"));
        assert!(output.contains("Code:           OS1"));
    }

    #[test]
    fn test_invoice_pretty_print_amounts() {
        let invoice: Invoice = serde_json::from_value(serde_json::json!({
            "id": 13150403,
            "number": "1001",
            "amount": 288.9,
            "due_amount": 0.0,
            "state": "paid",
            "currency": "EUR",
            "line_items": []
        }))
        .unwrap();

        let output = invoice.pretty_print();
        assert!(output.starts_with("Invoice 1001"));
        assert!(output.contains("288.90 EUR"));
        assert!(output.contains("0.00 EUR"));
    }
}
