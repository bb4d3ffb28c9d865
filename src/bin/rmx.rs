// Native binary for rmx - loads one route and prints its snapshot as JSON

use anyhow::{Context, Result};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use rmx::{
    api::ApiClient, app::App, config::load, constants::output::MAX_SNAPSHOT_BYTES, json_pretty,
    types::AppEvent,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = load().context("Failed to load configuration")?;
    cfg.print_summary();

    let client = ApiClient::with_reqwest(cfg.api_base.as_str())
        .context("Failed to build HTTP client")?;

    let (tx, rx) = unbounded_channel::<AppEvent>();
    let mut app = App::new(client, tx);
    app.open(cfg.route.clone(), cfg.criteria.clone());

    run_loop(&mut app, rx, cfg.pages).await;

    let snapshot = app.snapshot();
    let out = json_pretty::pretty_safe(&snapshot, MAX_SNAPSHOT_BYTES)
        .context("Failed to serialize snapshot")?;
    println!("{out}");
    Ok(())
}

/// Apply events until nothing is in flight, scrolling the list to the end
/// until `pages` pages are in.
async fn run_loop(app: &mut App, mut rx: UnboundedReceiver<AppEvent>, pages: u32) {
    loop {
        if app.is_idle() {
            if !app.wants_next_page(pages) {
                break;
            }
            // Same as the view reporting it reached the bottom
            app.on_scroll_proximity(0.0);
            if app.is_idle() {
                break;
            }
        }

        match rx.recv().await {
            Some(ev) => app.on_event(ev),
            None => break,
        }
    }
}
