//! REST client for the Rick and Morty API.
//!
//! Every public operation maps to exactly one HTTP GET (an empty batch maps to
//! none). There is no retry and no caching: callers decide when to ask again.
//! The transport is injected so tests can script responses without a network.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::filter::FilterCriteria;
use crate::types::{AnyEntity, Character, Entity, EntityKind, Episode, Location, Page};

/// Raw response as seen by the client: status + body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform an HTTP GET.
///
/// A non-2xx status is NOT an error at this layer; only failures that
/// produce no response at all are.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, ApiError>;
}

/// Production transport backed by a pooled [`reqwest::Client`]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(crate::constants::api::POOL_MAX_IDLE_PER_HOST)
            .tcp_nodelay(true)
            .user_agent(concat!("rmx/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Reuse an existing client (shares its connection pool)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, ApiError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

/// Typed client for one API base (e.g. `https://rickandmortyapi.com/api`).
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct ApiClient {
    base: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base", &self.base).finish()
    }
}

impl ApiClient {
    pub fn new(base: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, transport }
    }

    /// Client over the default reqwest transport
    pub fn with_reqwest(base: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self::new(base, Arc::new(ReqwestTransport::new()?)))
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// `{base}/{kind}?page={page}&{filters...}`, skipping empty filter values
    pub fn page_url(&self, kind: EntityKind, page: u32, filters: &FilterCriteria) -> String {
        let mut url = format!("{}/{}?page={}", self.base, kind.path(), page);
        for (k, v) in filters.query_pairs(kind) {
            url.push('&');
            url.push_str(k);
            url.push('=');
            url.push_str(&urlencoding::encode(v));
        }
        url
    }

    fn entity_url(&self, kind: EntityKind, id: u32) -> String {
        format!("{}/{}/{}", self.base, kind.path(), id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        log::debug!("[api] GET {url}");

        let response = match self.transport.get(url).await {
            Ok(r) => r,
            Err(e) => {
                log::error!("[api] Failed to fetch data from {url}: {e}");
                return Err(e);
            }
        };

        if !response.is_success() {
            log::warn!("[api] {url} answered {}", response.status);
            return Err(ApiError::RequestFailed {
                status: response.status,
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            log::error!("[api] Failed to parse response from {url}: {e}");
            ApiError::from(e)
        })
    }

    /// One page of `E`'s list endpoint
    pub async fn fetch_page<E: Entity>(
        &self,
        page: u32,
        filters: &FilterCriteria,
    ) -> Result<Page<E>, ApiError> {
        let url = self.page_url(E::KIND, page, filters);
        let page: Page<E> = self.get_json(&url).await?;
        log::debug!(
            "[api] {} page: {} results, next={}",
            E::KIND,
            page.results.len(),
            page.info.next.is_some()
        );
        Ok(page)
    }

    pub async fn fetch_by_id<E: Entity>(&self, id: u32) -> Result<E, ApiError> {
        self.get_json(&self.entity_url(E::KIND, id)).await
    }

    /// Fetch an absolute reference URL as found inside another entity.
    ///
    /// A URL that names a different kind than `E` is rejected without a request.
    pub async fn fetch_by_url<E: Entity>(&self, url: &str) -> Result<E, ApiError> {
        match EntityKind::from_url(url) {
            Some(kind) if kind != E::KIND => Err(ApiError::InvalidReference {
                url: url.to_string(),
            }),
            _ => self.get_json(url).await,
        }
    }

    /// Fetch a reference URL whose kind is only known from the URL itself
    pub async fn fetch_any_by_url(&self, url: &str) -> Result<AnyEntity, ApiError> {
        let kind = EntityKind::from_url(url).ok_or_else(|| ApiError::InvalidReference {
            url: url.to_string(),
        })?;
        Ok(match kind {
            EntityKind::Character => AnyEntity::Character(self.get_json(url).await?),
            EntityKind::Location => AnyEntity::Location(self.get_json(url).await?),
            EntityKind::Episode => AnyEntity::Episode(self.get_json(url).await?),
        })
    }

    /// Fetch several entities of one kind in a single request.
    ///
    /// The batch endpoint answers a single id with a bare object rather than
    /// an array, so one id goes through [`fetch_by_id`](Self::fetch_by_id).
    pub async fn fetch_batch<E: Entity>(&self, ids: &[u32]) -> Result<Vec<E>, ApiError> {
        match ids {
            [] => Ok(Vec::new()),
            [id] => Ok(vec![self.fetch_by_id(*id).await?]),
            _ => {
                let joined = ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                let url = format!("{}/{}/{}", self.base, E::KIND.path(), joined);
                self.get_json(&url).await
            }
        }
    }

    /// [`fetch_batch`](Self::fetch_batch) over embedded reference URLs
    pub async fn fetch_batch_by_urls<E: Entity>(&self, urls: &[String]) -> Result<Vec<E>, ApiError> {
        let ids = urls
            .iter()
            .map(|u| id_from_url(u))
            .collect::<Result<Vec<_>, _>>()?;
        self.fetch_batch(&ids).await
    }

    // ----- typed wrappers -----

    pub async fn get_characters(
        &self,
        page: u32,
        filters: &FilterCriteria,
    ) -> Result<Page<Character>, ApiError> {
        self.fetch_page(page, filters).await
    }

    pub async fn get_character(&self, id: u32) -> Result<Character, ApiError> {
        self.fetch_by_id(id).await
    }

    pub async fn get_multiple_characters(&self, ids: &[u32]) -> Result<Vec<Character>, ApiError> {
        self.fetch_batch(ids).await
    }

    pub async fn get_locations(
        &self,
        page: u32,
        search_name: Option<&str>,
    ) -> Result<Page<Location>, ApiError> {
        let filters = search_name.map(FilterCriteria::with_name).unwrap_or_default();
        self.fetch_page(page, &filters).await
    }

    pub async fn get_location(&self, id: u32) -> Result<Location, ApiError> {
        self.fetch_by_id(id).await
    }

    pub async fn get_location_by_url(&self, url: &str) -> Result<Location, ApiError> {
        self.fetch_by_url(url).await
    }

    pub async fn get_episodes(
        &self,
        page: u32,
        search_name: Option<&str>,
    ) -> Result<Page<Episode>, ApiError> {
        let filters = search_name.map(FilterCriteria::with_name).unwrap_or_default();
        self.fetch_page(page, &filters).await
    }

    pub async fn get_episode(&self, id: u32) -> Result<Episode, ApiError> {
        self.fetch_by_id(id).await
    }

    pub async fn get_multiple_episodes(&self, episode_urls: &[String]) -> Result<Vec<Episode>, ApiError> {
        self.fetch_batch_by_urls(episode_urls).await
    }
}

/// Entity id from its canonical URL (`https://host/api/character/1` -> 1)
pub fn id_from_url(url: &str) -> Result<u32, ApiError> {
    strip_query_frag(url)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|seg| seg.parse::<u32>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::InvalidReference {
            url: url.to_string(),
        })
}

/// Strip query and fragment from a URL
#[inline]
pub(crate) fn strip_query_frag(s: &str) -> &str {
    match s.find(['?', '#']) {
        Some(i) => &s[..i],
        None => s,
    }
}
