//! Renderable snapshots of the list and detail views
//!
//! This module is the boundary between the headless [`App`](crate::app::App)
//! and whatever draws it. Snapshots are plain data (`Serialize`), already
//! reduced to what a page shows: card rows, status badge classes, formatted
//! dates and the per-kind empty / loading / end-of-list messages.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::messages;
use crate::detail::CharacterDetail;
use crate::paged_list::PagedList;
use crate::router::Route;
use crate::types::{Character, CharacterStatus, Entity, EntityKind, Episode, Location};

/// Whole-screen snapshot
#[derive(Debug, Clone, Serialize)]
pub struct UiSnapshot {
    /// Canonical path of the current route
    pub route: String,
    #[serde(flatten)]
    pub view: View,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    List(ListSnapshot),
    Detail(DetailSnapshot),
}

#[derive(Debug, Clone, Serialize)]
pub struct ListSnapshot {
    pub kind: EntityKind,
    /// Active filters as `(key, value)` pairs
    pub criteria: Vec<(String, String)>,
    pub rows: Vec<CardRow>,
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    /// "Loading more characters..." while a fetch is outstanding
    pub loading_message: Option<String>,
    pub error: Option<ErrorBox>,
    /// Shown when nothing matched and nothing is loading or failed
    pub empty: Option<ErrorBox>,
    /// Shown once the last page is in
    pub end_message: Option<String>,
}

/// Heading + body pair used for errors and empty states
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBox {
    pub title: String,
    pub message: String,
}

/// One card in a list
#[derive(Debug, Clone, Serialize)]
pub struct CardRow {
    pub id: u32,
    pub name: String,
    /// Secondary line (type, episode code...)
    pub subtitle: String,
    pub facts: Vec<(&'static str, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusBadge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Route opened when the card is activated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    /// `alive`, `dead` or `unknown`
    pub class: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailSnapshot {
    Loading { message: &'static str },
    NotFound(ErrorBox),
    Ready(Box<CharacterView>),
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterView {
    pub id: u32,
    pub name: String,
    pub image: String,
    pub status: StatusBadge,
    pub species: String,
    /// Omitted when the character has no type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub gender: String,
    pub created: String,
    pub origin: Option<LocationCard>,
    pub location: Option<LocationCard>,
    pub episode_count: usize,
    pub episodes: Vec<EpisodeItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationCard {
    /// "Origin: Earth (C-137)" / "Current: Citadel of Ricks"
    pub heading: String,
    pub kind: String,
    pub dimension: String,
    pub residents: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeItem {
    pub name: String,
    pub code: String,
}

/// Badge class for a status string: `alive`, `dead`, anything else `unknown`
pub fn status_class(status: &str) -> &'static str {
    match status.to_ascii_lowercase().as_str() {
        "alive" => "alive",
        "dead" => "dead",
        _ => "unknown",
    }
}

pub fn status_badge(status: CharacterStatus) -> StatusBadge {
    let label = status.to_string();
    StatusBadge {
        class: status_class(&label),
        label,
    }
}

/// Short date as shown on detail pages (`11/4/2017`)
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%-m/%-d/%Y").to_string()
}

/// Card rendering per entity kind
pub trait CardSource: Entity {
    fn card(&self) -> CardRow;
}

impl CardSource for Character {
    fn card(&self) -> CardRow {
        CardRow {
            id: self.id,
            name: self.name.clone(),
            subtitle: self.species.clone(),
            facts: vec![
                ("Species", self.species.clone()),
                ("Gender", self.gender.clone()),
                ("Location", self.location.name.clone()),
            ],
            status: Some(status_badge(self.status)),
            image: Some(self.image.clone()).filter(|s| !s.is_empty()),
            link: Some(Route::Character {
                id: Some(self.id.to_string()),
            }
            .to_path()),
        }
    }
}

impl CardSource for Location {
    fn card(&self) -> CardRow {
        CardRow {
            id: self.id,
            name: self.name.clone(),
            subtitle: self.kind.clone(),
            facts: vec![
                ("Dimension", self.dimension.clone()),
                ("ID", format!("#{}", self.id)),
                ("Residents", self.residents.len().to_string()),
            ],
            status: None,
            image: None,
            link: None,
        }
    }
}

impl CardSource for Episode {
    fn card(&self) -> CardRow {
        CardRow {
            id: self.id,
            name: self.name.clone(),
            subtitle: self.episode.clone(),
            facts: vec![
                ("Air Date", self.air_date.clone()),
                ("Episode", self.episode.clone()),
                ("Characters", self.characters.len().to_string()),
            ],
            status: None,
            image: None,
            link: None,
        }
    }
}

impl ListSnapshot {
    pub fn from_list<E: CardSource>(list: &PagedList<E>) -> Self {
        let plural = E::KIND.plural();
        let loading = list.is_loading();
        let error = list.error().map(|e| ErrorBox {
            title: messages::LIST_ERROR_TITLE.to_string(),
            message: e.to_string(),
        });
        let empty = (list.items().is_empty() && !loading && error.is_none() && list.is_mounted())
            .then(|| ErrorBox {
                title: format!("No {plural} found"),
                message: messages::NO_RESULTS_HINT.to_string(),
            });
        let end_message = (!list.has_more() && !list.items().is_empty())
            .then(|| format!("You've seen all {plural}!"));

        ListSnapshot {
            kind: E::KIND,
            criteria: list
                .criteria()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            rows: list.items().iter().map(|e| e.card()).collect(),
            page: list.page(),
            has_more: list.has_more(),
            loading,
            loading_message: loading.then(|| format!("Loading more {plural}...")),
            error,
            empty,
            end_message,
        }
    }
}

impl DetailSnapshot {
    pub fn from_detail(detail: &CharacterDetail) -> Self {
        if detail.is_loading() {
            return DetailSnapshot::Loading {
                message: messages::LOADING_DETAIL,
            };
        }

        let character = match (detail.character(), detail.error()) {
            (Some(c), None) => c,
            (_, err) => {
                return DetailSnapshot::NotFound(ErrorBox {
                    title: messages::NOT_FOUND_TITLE.to_string(),
                    message: err.unwrap_or(messages::NOT_FOUND_BODY).to_string(),
                })
            }
        };

        DetailSnapshot::Ready(Box::new(CharacterView {
            id: character.id,
            name: character.name.clone(),
            image: character.image.clone(),
            status: status_badge(character.status),
            species: character.species.clone(),
            kind: Some(character.kind.clone()).filter(|k| !k.is_empty()),
            gender: character.gender.clone(),
            created: format_date(&character.created),
            origin: detail.origin().map(|l| location_card("Origin", l)),
            location: detail.location().map(|l| location_card("Current", l)),
            episode_count: detail.episodes().len(),
            episodes: detail
                .episodes()
                .iter()
                .map(|e| EpisodeItem {
                    name: e.name.clone(),
                    code: e.episode.clone(),
                })
                .collect(),
        }))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DetailSnapshot::Ready(_))
    }
}

fn location_card(label: &str, l: &Location) -> LocationCard {
    LocationCard {
        heading: format!("{label}: {}", l.name),
        kind: l.kind.clone(),
        dimension: l.dimension.clone(),
        residents: l.residents.len(),
    }
}
