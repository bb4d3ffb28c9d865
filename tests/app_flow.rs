//! App event loop: spawned fetches, routing and snapshots

mod common;

use common::{character, characters, client, episode, location, page, url, FakeTransport};
use rmx::app::App;
use rmx::filter::FilterCriteria;
use rmx::router::{self, Route};
use rmx::types::AppEvent;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

async fn drain(app: &mut App, rx: &mut UnboundedReceiver<AppEvent>) {
    while !app.is_idle() {
        let ev = rx.recv().await.expect("event channel closed");
        app.on_event(ev);
    }
}

fn scripted() -> std::sync::Arc<FakeTransport> {
    let fake = FakeTransport::new();
    fake.ok(
        &url("/character?page=1"),
        page(characters(1..=20), Some("/character?page=2")),
    );
    fake.ok(&url("/character?page=2"), page(characters(21..=22), None));
    fake.ok(
        &url("/character?page=1&name=rick"),
        page(characters(1..=2), None),
    );
    fake.ok(&url("/character/1"), character(1, Some(1), Some(3), &[1]));
    fake.ok(&url("/character/2"), character(2, None, Some(3), &[1]));
    fake.ok(&url("/location/1"), location(1));
    fake.ok(&url("/location/3"), location(3));
    fake.ok(&url("/episode/1"), episode(1));
    fake
}

#[tokio::test]
async fn list_route_loads_and_scrolls() {
    let fake = scripted();
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(client(&fake), tx);

    app.navigate(Route::Characters);
    assert!(!app.is_idle(), "mount starts a fetch");
    drain(&mut app, &mut rx).await;
    assert_eq!(app.characters().items().len(), 20);

    app.on_scroll_proximity(5000.0);
    assert!(app.is_idle(), "far from the end: nothing to do");

    app.on_scroll_proximity(10.0);
    app.on_scroll_proximity(10.0);
    drain(&mut app, &mut rx).await;
    assert_eq!(app.characters().items().len(), 22);
    assert_eq!(fake.request_count(), 2);

    let snap = serde_json::to_value(app.snapshot()).unwrap();
    assert_eq!(snap["route"], "/");
    assert_eq!(snap["view"], "list");
    assert_eq!(snap["rows"].as_array().unwrap().len(), 22);
    assert_eq!(snap["end_message"], "You've seen all characters!");
    assert_eq!(snap["rows"][0]["link"], "/character/1");
    assert_eq!(snap["rows"][0]["status"]["class"], "alive");
}

#[tokio::test]
async fn criteria_change_while_loading_is_deferred() {
    let fake = scripted();
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(client(&fake), tx);

    app.navigate(Route::Characters);
    app.on_criteria_change(FilterCriteria::with_name("rick"));
    assert!(app.characters().items().is_empty());
    drain(&mut app, &mut rx).await;

    let ids: Vec<u32> = app.characters().items().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2], "only the filtered page survives");
    assert_eq!(
        fake.requests(),
        vec![url("/character?page=1"), url("/character?page=1&name=rick")]
    );
}

#[tokio::test]
async fn detail_route_composes_character() {
    let fake = scripted();
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(client(&fake), tx);

    app.navigate(router::parse("#/character/1").unwrap());
    let snap = serde_json::to_value(app.snapshot()).unwrap();
    assert_eq!(snap["state"], "loading");

    drain(&mut app, &mut rx).await;
    let snap = serde_json::to_value(app.snapshot()).unwrap();
    assert_eq!(snap["view"], "detail");
    assert_eq!(snap["state"], "ready");
    assert_eq!(snap["name"], "Character 1");
    assert_eq!(snap["origin"]["heading"], "Origin: Location 1");
    assert_eq!(snap["episode_count"], 1);
}

#[tokio::test]
async fn navigating_away_discards_stale_detail() {
    let fake = scripted();
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(client(&fake), tx);

    app.navigate(Route::Character {
        id: Some("1".into()),
    });
    app.navigate(Route::Character {
        id: Some("2".into()),
    });
    drain(&mut app, &mut rx).await;

    assert_eq!(app.detail().character().map(|c| c.id), Some(2));
}

#[tokio::test]
async fn detail_without_id_is_not_found() {
    let fake = scripted();
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(client(&fake), tx);

    app.navigate(router::parse("/character/").unwrap());
    drain(&mut app, &mut rx).await;

    let snap = serde_json::to_value(app.snapshot()).unwrap();
    assert_eq!(snap["state"], "not_found");
    assert_eq!(snap["title"], "Character Not Found");
    assert_eq!(snap["message"], "No character ID provided");
    assert_eq!(fake.request_count(), 0);
}

#[tokio::test]
async fn lists_keep_state_across_navigation() {
    let fake = scripted();
    fake.ok(&url("/location?page=1"), page(vec![location(1)], None));
    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(client(&fake), tx);

    app.navigate(Route::Locations);
    drain(&mut app, &mut rx).await;
    app.navigate(Route::Character {
        id: Some("1".into()),
    });
    drain(&mut app, &mut rx).await;
    app.navigate(Route::Locations);

    assert!(app.is_idle(), "returning to a mounted list does not refetch");
    assert_eq!(app.locations().items().len(), 1);
    assert!(!app.wants_next_page(2));
}
