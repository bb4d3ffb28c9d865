//! Application constants
//!
//! Centralized defaults, thresholds and user-facing strings.

/// Remote API defaults
pub mod api {
    /// Public base URL of the Rick and Morty REST API
    pub const DEFAULT_BASE: &str = "https://rickandmortyapi.com/api";

    /// Idle connections kept per host by the reqwest pool
    pub const POOL_MAX_IDLE_PER_HOST: usize = 8;
}

/// Incremental list loading
pub mod list {
    /// First page of every list endpoint (pages are 1-based)
    pub const FIRST_PAGE: u32 = 1;

    /// Distance to the end of the rendered list at which the next page is requested
    ///
    /// The view reports its remaining scroll distance; anything at or below this
    /// is treated as "near the end".
    pub const SCROLL_PROXIMITY: f64 = 1000.0;

    /// Upper bound for `--pages` / `RMX_PAGES`
    pub const MAX_PAGES: u32 = 50;
}

/// User-facing message strings
pub mod messages {
    /// Detail view opened without a usable id
    pub const NOT_FOUND_TITLE: &str = "Character Not Found";

    /// Shown when the detail primary fetch failed with no further message
    pub const NOT_FOUND_BODY: &str = "The character you are looking for does not exist.";

    pub const LOADING_DETAIL: &str = "Loading character...";

    /// Heading above a list error
    pub const LIST_ERROR_TITLE: &str = "Something went wrong!";

    pub const NO_RESULTS_HINT: &str = "Try different search terms or filters";
}

/// Terminal output
pub mod output {
    /// Snapshot JSON beyond this size is truncated when printed
    pub const MAX_SNAPSHOT_BYTES: usize = 512 * 1024;
}
