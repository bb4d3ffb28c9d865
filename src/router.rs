//! Route parser for the browser's pages
//!
//! ## Supported Routes
//!
//! - `/` or `/characters` - Character list
//! - `/character/<id>` - Character detail
//! - `/locations` - Location list
//! - `/episodes` - Episode list
//!
//! ## Accepted Forms
//!
//! Each route may be written as a plain path (`/character/1`), a hash route
//! (`#/character/1`) or a deep link (`rmx://v1/character/1`). Parsing is
//! lenient about the details:
//! - Case-insensitive scheme: `RMX://`, `rmx://`, `Rmx://`
//! - Single-slash and repeated-slash variants: `rmx:/v1/...`, `rmx:////v1/...`
//! - Query and fragment stripping: `/character/1?utm=1#top`
//! - Optional `v1/` version prefix on paths
//!
//! ## Example
//!
//! ```rust
//! use rmx::router::{parse, Route};
//!
//! assert_eq!(parse("#/character/42"), Some(Route::Character { id: Some("42".into()) }));
//! ```

use crate::api::strip_query_frag;
use crate::types::EntityKind;

/// Extract path after the rmx scheme (case-insensitive, handles slash variants)
#[inline]
fn after_rmx_scheme(raw: &str) -> Option<&str> {
    let s = raw.trim();
    let rest = if let Some(pos) = s.find("://") {
        if !s[..pos].eq_ignore_ascii_case("rmx") {
            return None;
        }
        &s[pos + 3..]
    } else {
        let pos = s.find(':')?;
        if !s[..pos].eq_ignore_ascii_case("rmx") {
            return None;
        }
        &s[pos + 1..]
    };
    Some(rest.trim_start_matches('/'))
}

/// A page of the browser
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Route {
    /// Character list (the home page)
    #[default]
    Characters,
    /// Character detail; the raw id segment is kept as-is and validated on load
    Character { id: Option<String> },
    Locations,
    Episodes,
}

impl Route {
    /// Kind of the list shown on this route, `None` for detail pages
    pub fn list_kind(&self) -> Option<EntityKind> {
        match self {
            Route::Characters => Some(EntityKind::Character),
            Route::Locations => Some(EntityKind::Location),
            Route::Episodes => Some(EntityKind::Episode),
            Route::Character { .. } => None,
        }
    }

    /// Canonical path form, e.g. `/character/1`
    pub fn to_path(&self) -> String {
        match self {
            Route::Characters => "/".to_string(),
            Route::Character { id: Some(id) } => format!("/character/{id}"),
            Route::Character { id: None } => "/character".to_string(),
            Route::Locations => "/locations".to_string(),
            Route::Episodes => "/episodes".to_string(),
        }
    }
}

/// Parse a route from any accepted form.
///
/// Returns `None` for unknown pages and unsupported deep-link versions.
pub fn parse(raw: &str) -> Option<Route> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(Route::Characters);
    }

    let (path, from_scheme) = if let Some(rest) = after_rmx_scheme(s) {
        (rest, true)
    } else if let Some(rest) = s.strip_prefix("#/") {
        (rest, false)
    } else if let Some(rest) = s.strip_prefix('/') {
        (rest, false)
    } else {
        (s, false)
    };

    let path = strip_query_frag(path);
    let mut segments = path.split('/').filter(|seg| !seg.is_empty()).peekable();

    // Deep links are versioned; paths may carry the version or not
    match segments.peek() {
        Some(v) if v.eq_ignore_ascii_case("v1") => {
            segments.next();
        }
        _ if from_scheme => return None,
        _ => {}
    }

    let page = segments.next().unwrap_or("").to_ascii_lowercase();
    match page.as_str() {
        "" | "home" | "characters" => Some(Route::Characters),
        "character" => Some(Route::Character {
            id: segments.next().map(str::to_string),
        }),
        "locations" => Some(Route::Locations),
        "episodes" => Some(Route::Episodes),
        _ => None,
    }
}
