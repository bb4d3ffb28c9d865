//! Incremental "page N of filtered results" state for infinite scroll.
//!
//! [`PagedList`] never performs I/O. Every input goes through
//! [`PagedList::dispatch`], which mutates state and may hand back a
//! [`FetchRequest`] for the owner to execute. The result comes back as
//! [`ListEvent::PageLoaded`] carrying the request's ticket; results for any
//! other ticket are dropped.
//!
//! At most one fetch is outstanding per list. A criteria change while a fetch
//! is in flight resets state right away and queues the page-1 fetch until the
//! in-flight one settles (its result is discarded).

use crate::api::ApiClient;
use crate::constants::list::{FIRST_PAGE, SCROLL_PROXIMITY};
use crate::error::ApiError;
use crate::filter::FilterCriteria;
use crate::types::{Entity, EntityKind, Page};

/// A page fetch the owner of the list must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub page: u32,
    pub criteria: FilterCriteria,
    /// Replace accumulated entities instead of appending
    pub reset: bool,
    pub ticket: u64,
}

#[derive(Debug, Clone)]
pub enum ListEvent<E> {
    /// The view was shown; loads page 1 the first time only
    Mount,
    /// New search text / filters
    SetCriteria(FilterCriteria),
    NextPage,
    /// Remaining distance to the end of the rendered list
    ScrollProximity(f64),
    PageLoaded {
        ticket: u64,
        result: Result<Page<E>, ApiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    ticket: u64,
    reset: bool,
}

#[derive(Debug, Clone)]
pub struct PagedList<E: Entity> {
    items: Vec<E>,
    page: u32,
    has_more: bool,
    error: Option<String>,
    criteria: FilterCriteria,

    in_flight: Option<InFlight>,
    next_ticket: u64,
    reset_pending: bool,
    mounted: bool,
}

impl<E: Entity> Default for PagedList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> PagedList<E> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            page: FIRST_PAGE,
            has_more: true,
            error: None,
            criteria: FilterCriteria::default(),
            in_flight: None,
            next_ticket: 1,
            reset_pending: false,
            mounted: false,
        }
    }

    pub fn kind(&self) -> EntityKind {
        E::KIND
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Last requested page (1-based)
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Apply one event. Returns the fetch to perform, if any.
    pub fn dispatch(&mut self, event: ListEvent<E>) -> Option<FetchRequest> {
        match event {
            ListEvent::Mount => {
                if self.mounted {
                    return None;
                }
                let criteria = self.criteria.clone();
                self.set_filter_criteria(criteria)
            }
            ListEvent::SetCriteria(criteria) => self.set_filter_criteria(criteria),
            ListEvent::NextPage => self.request_next_page(),
            ListEvent::ScrollProximity(distance) => self.on_scroll_proximity(distance),
            ListEvent::PageLoaded { ticket, result } => self.on_page_loaded(ticket, result),
        }
    }

    /// Replace the criteria and start over from page 1
    pub fn set_filter_criteria(&mut self, criteria: FilterCriteria) -> Option<FetchRequest> {
        self.mounted = true;
        self.criteria = criteria;
        self.page = FIRST_PAGE;
        self.items.clear();
        self.error = None;

        if self.is_loading() {
            log::debug!("[list] {} criteria changed mid-fetch, page 1 queued", E::KIND);
            self.reset_pending = true;
            return None;
        }
        Some(self.start_fetch(true))
    }

    pub fn request_next_page(&mut self) -> Option<FetchRequest> {
        if self.is_loading() || !self.has_more {
            return None;
        }
        self.page += 1;
        Some(self.start_fetch(false))
    }

    /// Scroll hint from the view; only acts when within [`SCROLL_PROXIMITY`]
    pub fn on_scroll_proximity(&mut self, distance: f64) -> Option<FetchRequest> {
        if distance > SCROLL_PROXIMITY {
            return None;
        }
        self.request_next_page()
    }

    fn start_fetch(&mut self, reset: bool) -> FetchRequest {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(InFlight { ticket, reset });
        self.error = None;

        log::debug!(
            "[list] {} fetch page {} (reset={reset}, ticket={ticket})",
            E::KIND,
            self.page
        );
        FetchRequest {
            page: self.page,
            criteria: self.criteria.clone(),
            reset,
            ticket,
        }
    }

    fn on_page_loaded(
        &mut self,
        ticket: u64,
        result: Result<Page<E>, ApiError>,
    ) -> Option<FetchRequest> {
        let flight = match self.in_flight {
            Some(f) if f.ticket == ticket => f,
            _ => {
                log::debug!("[list] {} ignoring stale result (ticket={ticket})", E::KIND);
                return None;
            }
        };
        self.in_flight = None;

        if self.reset_pending {
            self.reset_pending = false;
            return Some(self.start_fetch(true));
        }

        match result {
            Ok(page) => {
                self.has_more = page.has_next();
                if flight.reset {
                    self.items = page.results;
                } else {
                    self.items.extend(page.results);
                }
                log::info!(
                    "[list] {} page {} loaded, {} total, has_more={}",
                    E::KIND,
                    self.page,
                    self.items.len(),
                    self.has_more
                );
            }
            Err(e) => {
                log::warn!("[list] {} page {} failed: {e}", E::KIND, self.page);
                self.error = Some(format!("Failed to load {}", E::KIND.plural()));
                if flight.reset {
                    self.items.clear();
                } else {
                    // Retry asks for the same page again
                    self.page -= 1;
                }
            }
        }
        None
    }

    /// Execute a fetch request against `client` and apply its result.
    ///
    /// Returns a follow-up request (a queued reset) if one became due.
    pub async fn run(&mut self, client: &ApiClient, request: FetchRequest) -> Option<FetchRequest> {
        let result = client
            .fetch_page::<E>(request.page, &request.criteria)
            .await;
        self.dispatch(ListEvent::PageLoaded {
            ticket: request.ticket,
            result,
        })
    }

    /// Dispatch `event` and run fetches until the list is idle again
    pub async fn settle(&mut self, client: &ApiClient, event: ListEvent<E>) {
        let mut next = self.dispatch(event);
        while let Some(request) = next {
            next = self.run(client, request).await;
        }
    }
}
