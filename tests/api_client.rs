//! Remote data client tests against a scripted transport

mod common;

use common::{client, episode, location, page, url, FakeTransport};
use rmx::error::ApiError;
use rmx::filter::FilterCriteria;
use rmx::types::{AnyEntity, Character, Episode, Location};

#[tokio::test]
async fn fetch_page_sends_page_and_non_empty_filters() {
    let fake = FakeTransport::new();
    fake.ok(
        &url("/character?page=2&gender=female&name=summer&status=alive"),
        page(common::characters(1..=3), Some("/character?page=3")),
    );
    let api = client(&fake);

    let filters = FilterCriteria::with_name("summer")
        .with("status", "alive")
        .with("gender", "female")
        .with("species", "");
    let p = api.fetch_page::<Character>(2, &filters).await.unwrap();

    assert_eq!(p.results.len(), 3);
    assert!(p.has_next());
    assert_eq!(fake.request_count(), 1, "one round trip per page");
}

#[tokio::test]
async fn non_success_status_reads_something_went_wrong() {
    let fake = FakeTransport::new();
    let api = client(&fake);

    let err = api.get_character(9999).await.unwrap_err();
    assert_eq!(err, ApiError::RequestFailed { status: 404 });
    assert_eq!(err.to_string(), "Something went wrong: 404");

    fake.status(&url("/location?page=1"), 500);
    let err = api.get_locations(1, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Something went wrong: 500");
}

#[tokio::test]
async fn empty_batch_makes_no_request() {
    let fake = FakeTransport::new();
    let api = client(&fake);

    let out = api.get_multiple_episodes(&[]).await.unwrap();
    assert!(out.is_empty());
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn single_id_batch_uses_single_endpoint() {
    let fake = FakeTransport::new();
    fake.ok(&url("/episode/28"), episode(28));
    let api = client(&fake);

    let out = api
        .get_multiple_episodes(&[url("/episode/28")])
        .await
        .unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, 28);
    assert_eq!(fake.requests(), vec![url("/episode/28")]);
}

#[tokio::test]
async fn multi_id_batch_is_one_request() {
    let fake = FakeTransport::new();
    fake.ok(
        &url("/episode/1,2,3"),
        serde_json::json!([episode(1), episode(2), episode(3)]),
    );
    let api = client(&fake);

    let out: Vec<Episode> = api.fetch_batch(&[1, 2, 3]).await.unwrap();
    assert_eq!(out.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(out[1].episode, "S01E02");
    assert_eq!(fake.request_count(), 1);
}

#[tokio::test]
async fn batch_by_urls_rejects_bad_reference_without_request() {
    let fake = FakeTransport::new();
    let api = client(&fake);

    let err = api
        .get_multiple_episodes(&[url("/episode/1"), url("/episode/pilot")])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidReference { .. }));
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn fetch_by_url_decodes_reference() {
    let fake = FakeTransport::new();
    fake.ok(&url("/location/3"), location(3));
    let api = client(&fake);

    let loc = api.get_location_by_url(&url("/location/3")).await.unwrap();
    assert_eq!(loc.id, 3);
    assert_eq!(loc.residents.len(), 2);
}

#[tokio::test]
async fn fetch_any_by_url_follows_kind_in_url() {
    let fake = FakeTransport::new();
    fake.ok(&url("/episode/7"), episode(7));
    let api = client(&fake);

    let any = api.fetch_any_by_url(&url("/episode/7")).await.unwrap();
    assert!(matches!(any, AnyEntity::Episode(ref e) if e.id == 7));
    assert_eq!(any.name(), "Episode 7");

    let err = api
        .fetch_any_by_url("https://example.com/api/planet/1")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidReference { .. }));
}

#[tokio::test]
async fn network_failure_is_transport_error() {
    let fake = FakeTransport::new();
    fake.network_error(&url("/character/1"), "connection refused");
    let api = client(&fake);

    let err = api.get_character(1).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch data: connection refused");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let fake = FakeTransport::new();
    fake.raw(&url("/location/1"), 200, "{\"id\": \"one\"}");
    let api = client(&fake);

    let err = api.fetch_by_id::<Location>(1).await.unwrap_err();
    assert!(matches!(err, ApiError::DecodeFailed { .. }));
    assert!(err.to_string().starts_with("Failed to parse response"));
}

#[tokio::test]
async fn typed_wrappers_search_by_name() {
    let fake = FakeTransport::new();
    fake.ok(
        &url("/episode?page=1&name=pilot"),
        page(vec![episode(1)], None),
    );
    let api = client(&fake);

    let p = api.get_episodes(1, Some("pilot")).await.unwrap();
    assert_eq!(p.results[0].name, "Episode 1");
    assert!(!p.has_next());
}
