//! Invoices, invoice messages and invoice item categories.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{ClientRef, NamedRef, ProjectRef};
use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;
use crate::pagination::{
    fetch_all, fetch_page, impl_paginated, ListOptions, Listing, Page, PaginationMode,
};
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// An invoice sent to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: u64,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub line_items: Vec<InvoiceLineItem>,
    /// The estimate this invoice was created from.
    #[serde(default)]
    pub estimate: Option<NamedRef>,
    #[serde(default)]
    pub retainer: Option<NamedRef>,
    #[serde(default)]
    pub creator: Option<NamedRef>,
    #[serde(default)]
    pub client_key: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub purchase_order: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub due_amount: f64,
    /// Tax percentage.
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub tax_amount: Option<f64>,
    #[serde(default)]
    pub tax2: Option<f64>,
    #[serde(default)]
    pub tax2_amount: Option<f64>,
    /// Discount percentage.
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    /// `"draft"`, `"open"`, `"paid"` or `"closed"`.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_term: Option<String>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurring_invoice_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A line on an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub id: u64,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    /// Name of an invoice item category.
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub taxed: bool,
    #[serde(default)]
    pub taxed2: bool,
}

impl Invoice {
    /// Whether anything is left to pay.
    pub fn is_outstanding(&self) -> bool {
        self.due_amount > 0.0 && self.state != "closed"
    }

    /// Mark a draft invoice as sent without emailing it.
    #[tracing::instrument(skip(client))]
    pub async fn mark_as_sent(client: &HarvestClient, id: u64) -> Result<InvoiceMessage> {
        create_invoice_message(client, id, &InvoiceMessageParams::event("send")).await
    }

    /// Return an open invoice to draft.
    #[tracing::instrument(skip(client))]
    pub async fn mark_as_draft(client: &HarvestClient, id: u64) -> Result<InvoiceMessage> {
        create_invoice_message(client, id, &InvoiceMessageParams::event("draft")).await
    }

    /// Close an open invoice.
    #[tracing::instrument(skip(client))]
    pub async fn close(client: &HarvestClient, id: u64) -> Result<Self> {
        dispatch::update(client, &format!("{}/close", Self::item_path(id)), None::<&()>).await
    }

    /// Reopen a closed invoice.
    #[tracing::instrument(skip(client))]
    pub async fn reopen(client: &HarvestClient, id: u64) -> Result<Self> {
        dispatch::update(client, &format!("{}/reopen", Self::item_path(id)), None::<&()>).await
    }
}

/// Filters for listing invoices.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// Fields for creating or updating an invoice. `client_id` is required on create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retainer_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItemParams>>,
}

/// A line item in an invoice or estimate request.
///
/// On update, set `id` to change an existing line; lines without one are added.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LineItemParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxed2: Option<bool>,
}

impl Resource for Invoice {
    const PATH: &'static str = "invoices";
}

impl Get for Invoice {}

impl List for Invoice {
    type Query = InvoiceListOptions;
    const COLLECTION: &'static str = "invoices";
}

impl Create for Invoice {
    type Params = InvoiceParams;
}

impl Update for Invoice {
    type Params = InvoiceParams;
}

impl Delete for Invoice {}

/// A message sent for an invoice, or a state change recorded as one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceMessage {
    pub id: u64,
    #[serde(default)]
    pub sent_by: Option<String>,
    #[serde(default)]
    pub sent_by_email: Option<String>,
    #[serde(default)]
    pub sent_from: Option<String>,
    #[serde(default)]
    pub sent_from_email: Option<String>,
    #[serde(default)]
    pub recipients: Vec<MessageRecipient>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub include_link_to_client_invoice: bool,
    #[serde(default)]
    pub attach_pdf: bool,
    #[serde(default)]
    pub send_me_a_copy: bool,
    #[serde(default)]
    pub thank_you: bool,
    /// `"send"`, `"draft"`, `"close"` or `"re-open"` for state changes.
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub reminder: bool,
    #[serde(default)]
    pub send_reminder_on: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecipient {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

/// Body of an invoice message request.
///
/// Either an email (`recipients` and text) or a bare `event_type`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceMessageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<MessageRecipient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_link_to_client_invoice: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_pdf: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_me_a_copy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thank_you: Option<bool>,
}

impl InvoiceMessageParams {
    /// A state-change message carrying only `event_type`.
    pub fn event(event_type: &str) -> Self {
        Self {
            event_type: Some(event_type.to_string()),
            ..Default::default()
        }
    }
}

fn messages_path(invoice_id: u64) -> String {
    format!("invoices/{invoice_id}/messages")
}

fn messages_listing(invoice_id: u64) -> Listing {
    Listing::pages(messages_path(invoice_id), "invoice_messages")
}

/// Fetch one page of an invoice's messages.
pub async fn invoice_messages_page(
    client: &HarvestClient,
    invoice_id: u64,
    opts: &ListOptions,
) -> Result<Page<InvoiceMessage>> {
    fetch_page(client, &messages_listing(invoice_id), opts).await
}

/// Fetch every message of an invoice.
pub async fn list_invoice_messages(
    client: &HarvestClient,
    invoice_id: u64,
    opts: &ListOptions,
) -> Result<Vec<InvoiceMessage>> {
    fetch_all(client, messages_listing(invoice_id), opts).await
}

/// Send an invoice message or record a state change.
#[tracing::instrument(skip(client, params))]
pub async fn create_invoice_message(
    client: &HarvestClient,
    invoice_id: u64,
    params: &InvoiceMessageParams,
) -> Result<InvoiceMessage> {
    dispatch::create(client, &messages_path(invoice_id), params).await
}

/// A category for invoice line items (the `kind` of a line).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItemCategory {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub use_as_service: bool,
    #[serde(default)]
    pub use_as_expense: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for creating or renaming an item category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemCategoryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Resource for InvoiceItemCategory {
    const PATH: &'static str = "invoice_item_categories";
}

impl Get for InvoiceItemCategory {}

impl List for InvoiceItemCategory {
    type Query = ListOptions;
    const COLLECTION: &'static str = "invoice_item_categories";
    const MODE: PaginationMode = PaginationMode::Cursor;
}

impl Create for InvoiceItemCategory {
    type Params = ItemCategoryParams;
}

impl Update for InvoiceItemCategory {
    type Params = ItemCategoryParams;
}

impl Delete for InvoiceItemCategory {}

impl_paginated!(InvoiceListOptions);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_deserialize() {
        let json = r#"{
            "id": 13150403,
            "client_key": "21312da13d457947a217da6775477afee8c2eba8",
            "number": "1001",
            "purchase_order": "",
            "amount": 288.9,
            "due_amount": 288.9,
            "tax": 5.0,
            "tax_amount": 13.5,
            "tax2": 2.0,
            "tax2_amount": 5.4,
            "discount": 10.0,
            "discount_amount": 30.0,
            "subject": "Online Store - Phase 1",
            "notes": "Some notes about the invoice.",
            "state": "open",
            "period_start": "2017-03-01",
            "period_end": "2017-03-01",
            "issue_date": "2017-04-01",
            "due_date": "2017-04-01",
            "payment_term": "upon receipt",
            "sent_at": "2017-08-23T22:25:59Z",
            "paid_at": null,
            "closed_at": null,
            "recurring_invoice_id": null,
            "created_at": "2017-06-27T16:27:16Z",
            "updated_at": "2017-08-23T22:25:59Z",
            "paid_date": null,
            "currency": "EUR",
            "client": {"id": 5735776, "name": "123 Industries"},
            "estimate": null,
            "retainer": null,
            "creator": {"id": 1782884, "name": "Bob Powell"},
            "line_items": [{
                "id": 53341602,
                "kind": "Service",
                "description": "03/01/2017 - Project Management: [9:00am - 11:00am] Planning meetings",
                "quantity": 2.0,
                "unit_price": 100.0,
                "amount": 200.0,
                "taxed": true,
                "taxed2": true,
                "project": {"id": 14308069, "name": "Online Store - Phase 1", "code": "OS1"}
            }]
        }"#;

        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.number.as_deref(), Some("1001"));
        assert_eq!(invoice.line_items.len(), 1);
        assert_eq!(invoice.line_items[0].kind, "Service");
        assert!(invoice.is_outstanding());
        assert!(invoice.paid_date.is_none());
    }

    #[test]
    fn test_event_message_body() {
        let body = serde_json::to_value(InvoiceMessageParams::event("send")).unwrap();
        assert_eq!(body, serde_json::json!({"event_type": "send"}));
    }

    #[test]
    fn test_listings() {
        let messages = messages_listing(13150403);
        assert_eq!(messages.path, "invoices/13150403/messages");
        assert_eq!(messages.collection, "invoice_messages");
        assert_eq!(messages.mode, PaginationMode::PageNumber);
        assert_eq!(InvoiceItemCategory::listing().mode, PaginationMode::Cursor);
    }
}
