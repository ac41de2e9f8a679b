//! Multi-page traversal tests.
//!
//! Covers page-number and cursor endpoints, the lazy item iterator and
//! cancellation between pages.

use harvestapi::{
    Client, ClientListOptions, HarvestClient, HarvestError, List, ListOptions, RequestContext,
    User, UserListOptions,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HarvestClient {
    HarvestClient::with_base_url(
        "test-token",
        "12345",
        "harvestapi tests (dev@example.com)",
        &server.uri(),
    )
    .unwrap()
}

fn clients(ids: &[u64]) -> Vec<Value> {
    ids.iter()
        .map(|id| json!({ "id": id, "name": format!("Client {id}"), "is_active": true }))
        .collect()
}

/// A page-number envelope without `links.next`.
fn clients_page(page: u32, total_pages: u32, ids: &[u64]) -> Value {
    json!({
        "clients": clients(ids),
        "per_page": 2,
        "total_pages": total_pages,
        "total_entries": total_pages * 2,
        "next_page": if page < total_pages { json!(page + 1) } else { Value::Null },
        "previous_page": if page > 1 { json!(page - 1) } else { Value::Null },
        "page": page,
        "links": {}
    })
}

async fn mount_clients_page(server: &MockServer, page: u32, total_pages: u32, ids: &[u64], hits: u64) {
    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(clients_page(page, total_pages, ids)))
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_all_walks_page_numbers() {
    let mock_server = MockServer::start().await;
    mount_clients_page(&mock_server, 1, 2, &[1, 2], 1).await;
    mount_clients_page(&mock_server, 2, 2, &[3, 4], 1).await;

    let query = ClientListOptions {
        pagination: ListOptions {
            per_page: Some(2),
            ..Default::default()
        },
        ..Default::default()
    };
    let all = Client::list_all(&client_for(&mock_server), &query)
        .await
        .unwrap();

    let ids: Vec<u64> = all.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_unset_pagination_defaults_and_query_is_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2000"))
        .and(query_param("is_active", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clients_page(1, 1, &[1])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let query = ClientListOptions {
        is_active: Some(true),
        ..Default::default()
    };
    let client = client_for(&mock_server);

    let page = Client::list_page(&client, &query).await.unwrap();
    assert_eq!(page.page, Some(1));
    assert!(!page.has_next_page());

    let all = Client::list_all(&client, &query).await.unwrap();
    assert_eq!(all.len(), 1);

    assert_eq!(query.pagination, ListOptions::default());
}

#[tokio::test]
async fn test_zero_page_size_means_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("per_page", "2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clients_page(1, 1, &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = ClientListOptions {
        pagination: ListOptions {
            page: Some(0),
            per_page: Some(0),
            ..Default::default()
        },
        ..Default::default()
    };
    let all = Client::list_all(&client_for(&mock_server), &query)
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_cursor_link_is_followed_verbatim() {
    let mock_server = MockServer::start().await;
    let next = format!("{}/users?cursor=eyJhZnRlciI6MTB9%3D%3D&per_page=2", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param_is_missing("cursor"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                { "id": 1, "first_name": "Ann" },
                { "id": 2, "first_name": "Ben" }
            ],
            "per_page": 2,
            "total_pages": 2,
            "total_entries": 3,
            "next_page": null,
            "previous_page": null,
            "links": { "next": next }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("cursor", "eyJhZnRlciI6MTB9=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": 3, "first_name": "Cat" }],
            "per_page": 2,
            "total_pages": 2,
            "total_entries": 3,
            "next_page": null,
            "previous_page": null,
            "links": { "next": null }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let users = User::list_all(&client_for(&mock_server), &UserListOptions::default())
        .await
        .unwrap();
    assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2, 3]);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.query(), Some("per_page=2000"));
    assert_eq!(
        requests[1].url.query(),
        Some("cursor=eyJhZnRlciI6MTB9%3D%3D&per_page=2")
    );
}

#[tokio::test]
async fn test_link_wins_over_page_number() {
    let mock_server = MockServer::start().await;
    let next = format!("{}/clients?page=2&per_page=2&marker=from-link", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param_is_missing("marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clients": clients(&[1, 2]),
            "per_page": 2,
            "total_pages": 2,
            "total_entries": 4,
            "next_page": 2,
            "previous_page": null,
            "page": 1,
            "links": { "next": next }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("marker", "from-link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clients_page(2, 2, &[3, 4])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let all = Client::list_all(&client_for(&mock_server), &ClientListOptions::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_iterator_fetches_pages_on_demand() {
    let mock_server = MockServer::start().await;
    mount_clients_page(&mock_server, 1, 3, &[1, 2], 1).await;
    mount_clients_page(&mock_server, 2, 3, &[3, 4], 1).await;
    mount_clients_page(&mock_server, 3, 3, &[5, 6], 0).await;

    let mut iter = Client::iter(&client_for(&mock_server), &ClientListOptions::default());

    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(iter.next().await.unwrap().unwrap().id);
    }
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_iterator_ends_after_last_page() {
    let mock_server = MockServer::start().await;
    mount_clients_page(&mock_server, 1, 3, &[1, 2], 1).await;
    mount_clients_page(&mock_server, 2, 3, &[3, 4], 1).await;
    mount_clients_page(&mock_server, 3, 3, &[5, 6], 1).await;

    let mut iter = Client::iter(&client_for(&mock_server), &ClientListOptions::default());
    let mut ids = Vec::new();
    while let Some(client) = iter.next().await.unwrap() {
        ids.push(client.id);
    }

    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert!(iter.next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_page_fails_whole_listing() {
    let mock_server = MockServer::start().await;
    mount_clients_page(&mock_server, 1, 3, &[1, 2], 1).await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_clients_page(&mock_server, 3, 3, &[5, 6], 0).await;

    let err = Client::list_all(&client_for(&mock_server), &ClientListOptions::default())
        .await
        .unwrap_err();
    match err {
        HarvestError::UnexpectedStatus(e) => {
            assert_eq!(e.status.as_u16(), 500);
            assert_eq!(e.message, "Unexpected status code: 500");
        }
        other => panic!("expected unexpected status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_collection_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [],
            "per_page": 2000,
            "total_pages": 1,
            "total_entries": 0
        })))
        .mount(&mock_server)
        .await;

    let err = Client::list_page(&client_for(&mock_server), &ClientListOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::Decode { .. }));
}

#[tokio::test]
async fn test_cancel_between_pages_stops_traversal() {
    let mock_server = MockServer::start().await;
    mount_clients_page(&mock_server, 1, 2, &[1, 2], 1).await;
    mount_clients_page(&mock_server, 2, 2, &[3, 4], 0).await;

    let ctx = RequestContext::new();
    let client = client_for(&mock_server).with_context(ctx.clone());
    let mut iter = Client::iter(&client, &ClientListOptions::default());

    let first = iter.next_page().await.unwrap().unwrap();
    assert_eq!(first.len(), 2);

    ctx.cancel();
    let err = iter.next_page().await.unwrap_err();
    assert!(matches!(err, HarvestError::Cancelled));

    // Still cancelled: the pending page is neither dropped nor requested
    let err = iter.next().await.unwrap_err();
    assert!(matches!(err, HarvestError::Cancelled));
}

#[tokio::test]
async fn test_iterator_resumes_after_failed_page() {
    let mock_server = MockServer::start().await;
    mount_clients_page(&mock_server, 1, 2, &[1, 2], 1).await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(429).insert_header("X-RateLimit-Limit", "100"))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clients_page(2, 2, &[3, 4])))
        .with_priority(2)
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut iter = Client::iter(&client_for(&mock_server), &ClientListOptions::default());
    assert_eq!(iter.next().await.unwrap().map(|c| c.id), Some(1));
    assert_eq!(iter.next().await.unwrap().map(|c| c.id), Some(2));

    let err = iter.next().await.unwrap_err();
    assert!(matches!(err, HarvestError::RateLimited(_)));

    assert_eq!(iter.next().await.unwrap().map(|c| c.id), Some(3));
    assert_eq!(iter.next().await.unwrap().map(|c| c.id), Some(4));
    assert!(iter.next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_cursor_traversal_retries_same_link() {
    let mock_server = MockServer::start().await;
    let next = format!("{}/users?cursor=abc", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": 1, "first_name": "Ann" }],
            "per_page": 1,
            "total_pages": 2,
            "total_entries": 2,
            "links": { "next": next }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("cursor", "abc"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("cursor", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": 2, "first_name": "Ben" }],
            "per_page": 1,
            "total_pages": 2,
            "total_entries": 2,
            "links": {}
        })))
        .with_priority(2)
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut iter = User::iter(&client_for(&mock_server), &UserListOptions::default());
    assert_eq!(iter.next_page().await.unwrap().unwrap().len(), 1);
    assert!(iter.next_page().await.is_err());

    let second = iter.next_page().await.unwrap().unwrap();
    assert_eq!(second.items[0].id, 2);
    assert!(iter.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_deadline_sends_nothing() {
    let mock_server = MockServer::start().await;
    mount_clients_page(&mock_server, 1, 1, &[1], 0).await;

    let ctx = RequestContext::new().with_timeout(std::time::Duration::ZERO);
    let client = client_for(&mock_server).with_context(ctx);

    let err = Client::list_all(&client, &ClientListOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::DeadlineExceeded));
    assert!(err.is_cancellation());
}
