//! Estimates and estimate item categories.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{ClientRef, NamedRef};
use super::invoice::{ItemCategoryParams, LineItemParams};
use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;
use crate::pagination::{impl_paginated, ListOptions, PaginationMode};
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// A quote sent to a client before work starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    pub id: u64,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub line_items: Vec<EstimateLineItem>,
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
    pub tax: Option<f64>,
    #[serde(default)]
    pub tax_amount: Option<f64>,
    #[serde(default)]
    pub tax2: Option<f64>,
    #[serde(default)]
    pub tax2_amount: Option<f64>,
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
    /// `"draft"`, `"sent"`, `"accepted"` or `"declined"`.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub declined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A line on an estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateLineItem {
    pub id: u64,
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

impl Estimate {
    async fn transition(client: &HarvestClient, id: u64, action: &str) -> Result<Self> {
        let path = format!("{}/{action}", Self::item_path(id));
        dispatch::update(client, &path, None::<&()>).await
    }

    /// Mark a draft estimate as sent.
    #[tracing::instrument(skip(client))]
    pub async fn mark_as_sent(client: &HarvestClient, id: u64) -> Result<Self> {
        Self::transition(client, id, "messages").await
    }

    /// Mark a sent estimate as accepted.
    #[tracing::instrument(skip(client))]
    pub async fn accept(client: &HarvestClient, id: u64) -> Result<Self> {
        Self::transition(client, id, "accept").await
    }

    /// Mark a sent estimate as declined.
    #[tracing::instrument(skip(client))]
    pub async fn decline(client: &HarvestClient, id: u64) -> Result<Self> {
        Self::transition(client, id, "decline").await
    }

    /// Reopen an accepted or declined estimate.
    #[tracing::instrument(skip(client))]
    pub async fn reopen(client: &HarvestClient, id: u64) -> Result<Self> {
        Self::transition(client, id, "reopen").await
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EstimateListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// Fields for creating or updating an estimate. `client_id` is required on create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EstimateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
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
    pub line_items: Option<Vec<LineItemParams>>,
}

impl Resource for Estimate {
    const PATH: &'static str = "estimates";
}

impl Get for Estimate {}

impl List for Estimate {
    type Query = EstimateListOptions;
    const COLLECTION: &'static str = "estimates";
}

impl Create for Estimate {
    type Params = EstimateParams;
}

impl Update for Estimate {
    type Params = EstimateParams;
}

impl Delete for Estimate {}

/// A category for estimate line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateItemCategory {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for EstimateItemCategory {
    const PATH: &'static str = "estimate_item_categories";
}

impl Get for EstimateItemCategory {}

impl List for EstimateItemCategory {
    type Query = ListOptions;
    const COLLECTION: &'static str = "estimate_item_categories";
    const MODE: PaginationMode = PaginationMode::Cursor;
}

impl Create for EstimateItemCategory {
    type Params = ItemCategoryParams;
}

impl Update for EstimateItemCategory {
    type Params = ItemCategoryParams;
}

impl Delete for EstimateItemCategory {}

impl_paginated!(EstimateListOptions);
