//! rmx - Rick and Morty API browser
//!
//! Headless core of a browsing client for the public Rick and Morty REST API:
//! characters, locations and episodes, searched, filtered and paged for
//! infinite scroll, plus a character detail view that composes several
//! dependent lookups.
//!
//! ## Architecture
//!
//! - [`api`]: typed REST client over an injectable [`api::Transport`]
//! - [`paged_list`]: one incremental list state machine shared by all kinds
//! - [`detail`]: character detail fan-out with partial-failure tolerance
//! - [`app`]: routes inputs to the above and runs their fetches on tokio
//! - [`ui_snapshot`]: serializable view state for whatever renders it
//!
//! ## Usage
//!
//! ```bash
//! rmx characters "rick status:alive" --pages 2
//! rmx character 1
//! rmx open "#/locations"
//! ```

// Core modules
pub mod constants;
pub mod error;
pub mod filter;
pub mod json_pretty;
pub mod types;

// Remote data client
pub mod api;

// View-state controllers
pub mod detail;
pub mod paged_list;

pub mod app;
pub mod config;

// Route parser (paths, hash routes, rmx:// deep links)
pub mod router;

// Renderable snapshots
pub mod ui_snapshot;

// Re-export commonly used types
pub use api::{ApiClient, Transport, TransportResponse};
pub use app::App;
pub use config::Config;
pub use error::ApiError;
pub use types::{AppEvent, Character, EntityKind, Episode, Location, Page};
