//! The authenticated account's company settings.

use serde::{Deserialize, Serialize};

use crate::client::HarvestClient;
use crate::dispatch;
use crate::error::Result;

/// Company settings of the account the client is authenticated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub base_uri: String,
    #[serde(default)]
    pub full_domain: String,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub week_start_day: Option<String>,
    #[serde(default)]
    pub wants_timestamp_timers: bool,
    #[serde(default)]
    pub time_format: Option<String>,
    #[serde(default)]
    pub date_format: Option<String>,
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub clock: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub decimal_symbol: Option<String>,
    #[serde(default)]
    pub thousands_separator: Option<String>,
    #[serde(default)]
    pub color_scheme: Option<String>,
    /// Weekly capacity in seconds.
    #[serde(default)]
    pub weekly_capacity: Option<u32>,
    #[serde(default)]
    pub expense_feature: bool,
    #[serde(default)]
    pub invoice_feature: bool,
    #[serde(default)]
    pub estimate_feature: bool,
    #[serde(default)]
    pub approval_feature: bool,
}

impl Company {
    /// Fetch the company of the authenticated account.
    #[tracing::instrument(skip(client))]
    pub async fn current(client: &HarvestClient) -> Result<Self> {
        dispatch::get(client, "company").await
    }

    /// Weekly capacity in hours, if set.
    pub fn weekly_capacity_hours(&self) -> Option<f64> {
        self.weekly_capacity.map(|secs| f64::from(secs) / 3600.0)
    }
}
