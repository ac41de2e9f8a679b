//! Clients and client contacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::ClientRef;
use crate::pagination::{impl_paginated, ListOptions};
use crate::traits::{Create, Delete, Get, List, Resource, Update};

/// A client: the party projects are done for and invoices are sent to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub statement_key: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Filters for listing clients.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Fields for creating or updating a client. `name` is required on create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Resource for Client {
    const PATH: &'static str = "clients";
}

impl Get for Client {}

impl List for Client {
    type Query = ClientListOptions;
    const COLLECTION: &'static str = "clients";
}

impl Create for Client {
    type Params = ClientParams;
}

impl Update for Client {
    type Params = ClientParams;
}

impl Delete for Client {}

/// A contact person at a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub title: Option<String>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_office: Option<String>,
    #[serde(default)]
    pub phone_mobile: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Contact {
    /// First and last name joined.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().filter(|l| !l.is_empty()) {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }
}

/// Filters for listing contacts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactListOptions {
    #[serde(flatten)]
    pub pagination: ListOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
}

/// Fields for creating or updating a contact.
///
/// `client_id` and `first_name` are required on create.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_office: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
}

impl Resource for Contact {
    const PATH: &'static str = "contacts";
}

impl Get for Contact {}

impl List for Contact {
    type Query = ContactListOptions;
    const COLLECTION: &'static str = "contacts";
}

impl Create for Contact {
    type Params = ContactParams;
}

impl Update for Contact {
    type Params = ContactParams;
}

impl Delete for Contact {}

impl_paginated!(ClientListOptions, ContactListOptions);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_deserialize() {
        let json = r#"{
            "id": 5735776,
            "name": "123 Industries",
            "is_active": true,
            "address": "123 Main St.\r\nAnytown, LA 71223",
            "statement_key": "0a39d3e33c8058cf7c3f8097d854c64e",
            "created_at": "2017-06-26T21:02:12Z",
            "updated_at": "2017-06-26T21:34:11Z",
            "currency": "EUR"
        }"#;

        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.id, 5735776);
        assert_eq!(client.currency.as_deref(), Some("EUR"));
        assert!(client.created_at.is_some());
    }

    #[test]
    fn test_params_omit_unset_fields() {
        let params = ClientParams {
            name: Some("ABC Corp".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"name": "ABC Corp"}));
    }

    #[test]
    fn test_contact_full_name() {
        let json = r#"{"id": 1, "first_name": "George", "last_name": "Frank"}"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.full_name(), "George Frank");

        let json = r#"{"id": 2, "first_name": "Cher", "last_name": null}"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.full_name(), "Cher");
    }

    #[test]
    fn test_list_options_query() {
        let opts = ContactListOptions {
            client_id: Some(42),
            ..Default::default()
        };
        let pairs = crate::query::to_pairs(&opts).unwrap();
        assert_eq!(pairs, vec![("client_id".to_string(), "42".to_string())]);
    }
}
