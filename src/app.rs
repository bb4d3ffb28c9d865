use tokio::sync::mpsc::UnboundedSender;

use crate::api::ApiClient;
use crate::detail::{CharacterDetail, DetailAggregator};
use crate::error::ApiError;
use crate::filter::FilterCriteria;
use crate::paged_list::{FetchRequest, ListEvent, PagedList};
use crate::router::Route;
use crate::types::{AppEvent, Character, Entity, EntityKind, Episode, Location, Page};
use crate::ui_snapshot::{DetailSnapshot, ListSnapshot, UiSnapshot, View};

/// List input that is not tied to an entity type yet
#[derive(Debug, Clone)]
enum ListInput {
    Mount,
    Criteria(FilterCriteria),
    Scroll(f64),
}

impl ListInput {
    fn event<E>(self) -> ListEvent<E> {
        match self {
            ListInput::Mount => ListEvent::Mount,
            ListInput::Criteria(c) => ListEvent::SetCriteria(c),
            ListInput::Scroll(d) => ListEvent::ScrollProximity(d),
        }
    }
}

/// Headless browser state: one list per kind plus the character detail view.
///
/// Fetches run as spawned tasks on the current tokio runtime and report back
/// through the [`AppEvent`] channel; [`App::on_event`] applies them one at a
/// time.
pub struct App {
    client: ApiClient,
    tx: UnboundedSender<AppEvent>,
    route: Route,

    characters: PagedList<Character>,
    locations: PagedList<Location>,
    episodes: PagedList<Episode>,

    detail: CharacterDetail,
}

impl App {
    pub fn new(client: ApiClient, tx: UnboundedSender<AppEvent>) -> Self {
        Self {
            client,
            tx,
            route: Route::default(),
            characters: PagedList::new(),
            locations: PagedList::new(),
            episodes: PagedList::new(),
            detail: CharacterDetail::default(),
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn characters(&self) -> &PagedList<Character> {
        &self.characters
    }

    pub fn locations(&self) -> &PagedList<Location> {
        &self.locations
    }

    pub fn episodes(&self) -> &PagedList<Episode> {
        &self.episodes
    }

    pub fn detail(&self) -> &CharacterDetail {
        &self.detail
    }

    /// Show `route`. Lists load page 1 the first time they are shown; the
    /// detail page loads on every visit.
    pub fn navigate(&mut self, route: Route) {
        self.open(route, None);
    }

    /// Show `route`, starting its list with `criteria` when given
    pub fn open(&mut self, route: Route, criteria: Option<FilterCriteria>) {
        log::info!("[app] open {}", route.to_path());
        self.route = route.clone();

        match route {
            Route::Character { id } => self.load_detail(id),
            _ => self.dispatch_list(criteria.map_or(ListInput::Mount, ListInput::Criteria)),
        }
    }

    /// Search text / filters changed on the current list page
    pub fn on_criteria_change(&mut self, criteria: FilterCriteria) {
        self.dispatch_list(ListInput::Criteria(criteria));
    }

    /// Scroll position report from the current list page
    pub fn on_scroll_proximity(&mut self, distance: f64) {
        self.dispatch_list(ListInput::Scroll(distance));
    }

    fn dispatch_list(&mut self, input: ListInput) {
        match self.route.list_kind() {
            Some(EntityKind::Character) => {
                let req = self.characters.dispatch(input.event());
                self.spawn_characters(req);
            }
            Some(EntityKind::Location) => {
                let req = self.locations.dispatch(input.event());
                self.spawn_locations(req);
            }
            Some(EntityKind::Episode) => {
                let req = self.episodes.dispatch(input.event());
                self.spawn_episodes(req);
            }
            None => log::debug!("[app] list input ignored on {}", self.route.to_path()),
        }
    }

    fn load_detail(&mut self, id: Option<String>) {
        let seq = self.detail.begin();
        let aggregator = DetailAggregator::new(self.client.clone());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let detail = aggregator.load(id.as_deref()).await;
            let _ = tx.send(AppEvent::DetailLoaded {
                seq,
                detail: Box::new(detail),
            });
        });
    }

    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::CharactersLoaded { ticket, result } => {
                let req = self.characters.dispatch(ListEvent::PageLoaded { ticket, result });
                self.spawn_characters(req);
            }
            AppEvent::LocationsLoaded { ticket, result } => {
                let req = self.locations.dispatch(ListEvent::PageLoaded { ticket, result });
                self.spawn_locations(req);
            }
            AppEvent::EpisodesLoaded { ticket, result } => {
                let req = self.episodes.dispatch(ListEvent::PageLoaded { ticket, result });
                self.spawn_episodes(req);
            }
            AppEvent::DetailLoaded { seq, detail } => {
                self.detail.adopt(seq, *detail);
            }
        }
    }

    fn spawn_characters(&self, req: Option<FetchRequest>) {
        self.spawn_fetch::<Character>(req, |ticket, result| AppEvent::CharactersLoaded { ticket, result });
    }

    fn spawn_locations(&self, req: Option<FetchRequest>) {
        self.spawn_fetch::<Location>(req, |ticket, result| AppEvent::LocationsLoaded { ticket, result });
    }

    fn spawn_episodes(&self, req: Option<FetchRequest>) {
        self.spawn_fetch::<Episode>(req, |ticket, result| AppEvent::EpisodesLoaded { ticket, result });
    }

    fn spawn_fetch<E: Entity>(
        &self,
        req: Option<FetchRequest>,
        wrap: fn(u64, Result<Page<E>, ApiError>) -> AppEvent,
    ) {
        let Some(req) = req else { return };
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_page::<E>(req.page, &req.criteria).await;
            if tx.send(wrap(req.ticket, result)).is_err() {
                log::debug!("[app] event channel closed, dropping {} page {}", E::KIND, req.page);
            }
        });
    }

    /// Nothing in flight for any list or the detail view
    pub fn is_idle(&self) -> bool {
        !self.characters.is_loading()
            && !self.locations.is_loading()
            && !self.episodes.is_loading()
            && !self.detail.is_loading()
    }

    /// Whether the list on the current route has loaded fewer than `pages`
    /// pages and can still load more without a pending error
    pub fn wants_next_page(&self, pages: u32) -> bool {
        fn check<E: Entity>(list: &PagedList<E>, pages: u32) -> bool {
            list.page() < pages && list.has_more() && list.error().is_none() && !list.is_loading()
        }
        match self.route.list_kind() {
            Some(EntityKind::Character) => check(&self.characters, pages),
            Some(EntityKind::Location) => check(&self.locations, pages),
            Some(EntityKind::Episode) => check(&self.episodes, pages),
            None => false,
        }
    }

    pub fn snapshot(&self) -> UiSnapshot {
        let view = match &self.route {
            Route::Characters => View::List(ListSnapshot::from_list(&self.characters)),
            Route::Locations => View::List(ListSnapshot::from_list(&self.locations)),
            Route::Episodes => View::List(ListSnapshot::from_list(&self.episodes)),
            Route::Character { .. } => View::Detail(DetailSnapshot::from_detail(&self.detail)),
        };
        UiSnapshot {
            route: self.route.to_path(),
            view,
        }
    }
}
