//! Character detail view: one primary fetch, then a concurrent fan-out over
//! the character's origin, current location and episodes.
//!
//! Only the primary fetch can fail the view. Each dependent lookup settles on
//! its own; a failed one leaves its field empty and is logged.

use futures::future::join_all;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::types::{Character, EntityKind, Episode, Location};

/// A lookup derived from the primary character
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependentRequest {
    Origin(String),
    CurrentLocation(String),
    Episodes(Vec<String>),
}

/// Settled result of a [`DependentRequest`], keyed by what it was for
#[derive(Debug, Clone)]
pub enum DependentOutcome {
    Origin(Result<Location, ApiError>),
    CurrentLocation(Result<Location, ApiError>),
    Episodes(Result<Vec<Episode>, ApiError>),
}

impl DependentRequest {
    /// Requests for `character`, in order: origin, current location, episodes.
    /// References without a URL (and an empty episode list) produce nothing.
    pub fn derive(character: &Character) -> Vec<DependentRequest> {
        let mut out = Vec::with_capacity(3);
        if let Some(url) = &character.origin.url {
            out.push(DependentRequest::Origin(url.clone()));
        }
        if let Some(url) = &character.location.url {
            out.push(DependentRequest::CurrentLocation(url.clone()));
        }
        if !character.episode.is_empty() {
            out.push(DependentRequest::Episodes(character.episode.clone()));
        }
        out
    }
}

/// Composed state of the detail view
#[derive(Debug, Clone, Default)]
pub struct CharacterDetail {
    seq: u64,
    loading: bool,
    error: Option<String>,
    character: Option<Character>,
    origin: Option<Location>,
    location: Option<Location>,
    episodes: Vec<Episode>,
}

impl CharacterDetail {
    /// Start a new load. Everything from an earlier load is dropped and its
    /// late results will be ignored.
    pub fn begin(&mut self) -> u64 {
        let seq = self.seq + 1;
        *self = CharacterDetail {
            seq,
            loading: true,
            ..Default::default()
        };
        seq
    }

    /// Apply the primary fetch result; returns the dependent lookups to issue.
    pub fn apply_primary(
        &mut self,
        seq: u64,
        result: Result<Character, ApiError>,
    ) -> Vec<DependentRequest> {
        if seq != self.seq {
            log::debug!("[detail] dropping stale primary (seq={seq})");
            return Vec::new();
        }
        match result {
            Ok(character) => {
                let requests = DependentRequest::derive(&character);
                log::info!(
                    "[detail] loaded #{} {}, {} dependent lookups",
                    character.id,
                    character.name,
                    requests.len()
                );
                self.character = Some(character);
                requests
            }
            Err(e) => {
                log::warn!("[detail] primary fetch failed: {e}");
                self.error = Some(e.to_string());
                self.loading = false;
                Vec::new()
            }
        }
    }

    pub fn apply_dependent(&mut self, seq: u64, outcome: DependentOutcome) {
        if seq != self.seq {
            return;
        }
        match outcome {
            DependentOutcome::Origin(Ok(l)) => self.origin = Some(l),
            DependentOutcome::CurrentLocation(Ok(l)) => self.location = Some(l),
            DependentOutcome::Episodes(Ok(eps)) => self.episodes = eps,
            DependentOutcome::Origin(Err(e)) => log::warn!("[detail] origin lookup failed: {e}"),
            DependentOutcome::CurrentLocation(Err(e)) => {
                log::warn!("[detail] location lookup failed: {e}")
            }
            DependentOutcome::Episodes(Err(e)) => log::warn!("[detail] episodes lookup failed: {e}"),
        }
    }

    /// All dependents settled
    pub fn finish(&mut self, seq: u64) {
        if seq == self.seq {
            self.loading = false;
        }
    }

    /// Take over a load that ran elsewhere, if it is still the current one
    pub fn adopt(&mut self, seq: u64, loaded: CharacterDetail) -> bool {
        if seq != self.seq {
            log::debug!("[detail] dropping stale load (seq={seq}, current={})", self.seq);
            return false;
        }
        *self = CharacterDetail { seq, ..loaded };
        true
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    pub fn origin(&self) -> Option<&Location> {
        self.origin.as_ref()
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    /// Primary settled and, on success, every dependent too
    pub fn is_ready(&self) -> bool {
        !self.loading && (self.character.is_some() || self.error.is_some())
    }
}

/// Runs detail loads against an [`ApiClient`]
#[derive(Debug, Clone)]
pub struct DetailAggregator {
    client: ApiClient,
}

impl DetailAggregator {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Load the character named by the raw route id
    pub async fn load(&self, id: Option<&str>) -> CharacterDetail {
        let mut detail = CharacterDetail::default();
        let seq = detail.begin();
        self.load_into(&mut detail, seq, id).await;
        detail
    }

    pub async fn load_into(&self, detail: &mut CharacterDetail, seq: u64, id: Option<&str>) {
        let primary = match parse_id(id) {
            Ok(id) => self.client.get_character(id).await,
            Err(e) => Err(e),
        };

        let requests = detail.apply_primary(seq, primary);
        let outcomes = join_all(requests.into_iter().map(|r| self.resolve(r))).await;
        for outcome in outcomes {
            detail.apply_dependent(seq, outcome);
        }
        detail.finish(seq);
    }

    pub async fn resolve(&self, request: DependentRequest) -> DependentOutcome {
        match request {
            DependentRequest::Origin(url) => {
                DependentOutcome::Origin(self.client.get_location_by_url(&url).await)
            }
            DependentRequest::CurrentLocation(url) => {
                DependentOutcome::CurrentLocation(self.client.get_location_by_url(&url).await)
            }
            DependentRequest::Episodes(urls) => {
                DependentOutcome::Episodes(self.client.get_multiple_episodes(&urls).await)
            }
        }
    }
}

/// Absent, blank or non-numeric ids are all "no id"
fn parse_id(id: Option<&str>) -> Result<u32, ApiError> {
    id.map(str::trim)
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|id| *id > 0)
        .ok_or(ApiError::MissingIdentifier {
            kind: EntityKind::Character,
        })
}
