//! Query-string encoding for option structs.
//!
//! Option structs are serialized through `serde_json` so that flattened
//! pagination options and resource filters land in one flat map. Keys are
//! emitted in sorted order, giving a canonical query string for a given value.

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::Result;

/// Encode `opts` as sorted `(key, value)` pairs.
///
/// Used instead of `RequestBuilder::query` so that list-valued filters are
/// supported and the key order is the same on every call.
///
/// `None` fields are omitted, booleans and numbers use their JSON text,
/// sequences are joined with commas.
pub fn to_pairs<O: Serialize + ?Sized>(opts: &O) -> Result<Vec<(String, String)>> {
    let map = match serde_json::to_value(opts)? {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(serde_json::Error::custom(format!(
                "query options must serialize to a map, got {other}"
            ))
            .into())
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        if let Some(encoded) = scalar(&key, value)? {
            pairs.push((key, encoded));
        }
    }
    pairs.sort();
    Ok(pairs)
}

/// Append the encoded options to `url`'s query string.
pub fn append<O: Serialize + ?Sized>(url: &mut Url, opts: &O) -> Result<()> {
    let pairs = to_pairs(opts)?;
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(())
}

fn scalar(key: &str, value: Value) -> Result<Option<String>> {
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts = items
                .into_iter()
                .map(|item| scalar(key, item))
                .collect::<Result<Vec<_>>>()?;
            let parts: Vec<String> = parts.into_iter().flatten().collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(","))
            }
        }
        Value::Object(_) => {
            return Err(serde_json::Error::custom(format!(
                "query option `{key}` is a nested object; flatten it instead"
            ))
            .into())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::ListOptions;
    use chrono::{TimeZone, Utc};

    #[derive(Serialize, Default)]
    struct Filters {
        #[serde(flatten)]
        pagination: ListOptions,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_active: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        client_id: Option<u64>,
        user_ids: Vec<u64>,
    }

    #[test]
    fn test_flattened_and_sorted() {
        let filters = Filters {
            pagination: ListOptions {
                page: Some(2),
                per_page: Some(50),
                updated_since: None,
            },
            is_active: Some(true),
            client_id: Some(9),
            user_ids: vec![3, 4],
        };

        let pairs = to_pairs(&filters).unwrap();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["client_id", "is_active", "page", "per_page", "user_ids"]);
        assert!(pairs.contains(&("user_ids".to_string(), "3,4".to_string())));
        assert!(pairs.contains(&("is_active".to_string(), "true".to_string())));
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let pairs = to_pairs(&Filters::default()).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_timestamps_use_rfc3339() {
        let opts = ListOptions {
            updated_since: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            ..Default::default()
        };
        let pairs = to_pairs(&opts).unwrap();
        assert_eq!(
            pairs,
            vec![("updated_since".to_string(), "2024-01-02T03:04:05Z".to_string())]
        );
    }

    #[test]
    fn test_append_keeps_existing_query() {
        let mut url = Url::parse("https://api.harvestapp.com/v2/reports/time/team?from=20240101").unwrap();
        append(
            &mut url,
            &ListOptions {
                page: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(url.query(), Some("from=20240101&page=1"));
    }

    #[test]
    fn test_unit_encodes_nothing() {
        let mut url = Url::parse("https://api.harvestapp.com/v2/company").unwrap();
        append(&mut url, &()).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_non_map_is_rejected() {
        assert!(to_pairs(&42).is_err());
    }
}
