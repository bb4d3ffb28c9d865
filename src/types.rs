use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::detail::CharacterDetail;
use crate::error::ApiError;

/// The three resource collections exposed by the API.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Character,
    Location,
    Episode,
}

impl EntityKind {
    /// Path segment used by the API (`/character`, `/location`, `/episode`)
    pub fn path(self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Location => "location",
            EntityKind::Episode => "episode",
        }
    }

    /// Plural noun used in user-facing messages
    pub fn plural(self) -> &'static str {
        match self {
            EntityKind::Character => "characters",
            EntityKind::Location => "locations",
            EntityKind::Episode => "episodes",
        }
    }

    /// Filter keys the list endpoint of this kind understands.
    pub fn filter_keys(self) -> &'static [&'static str] {
        match self {
            EntityKind::Character => &["name", "status", "species", "type", "gender"],
            EntityKind::Location => &["name", "type", "dimension"],
            EntityKind::Episode => &["name", "episode"],
        }
    }

    /// Recognize the kind named by a reference URL (`.../api/location/3` -> Location).
    ///
    /// The kind is the path segment immediately before the trailing id.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = crate::api::strip_query_frag(url).trim_end_matches('/');
        let mut segments = path.rsplit('/');
        let _id = segments.next()?;
        match segments.next()? {
            "character" => Some(EntityKind::Character),
            "location" => Some(EntityKind::Location),
            "episode" => Some(EntityKind::Episode),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Common surface of every record the API returns.
pub trait Entity: DeserializeOwned + Serialize + Clone + std::fmt::Debug + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> u32;
    fn name(&self) -> &str;
    fn url(&self) -> &str;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum CharacterStatus {
    Alive,
    Dead,
    #[serde(rename = "unknown")]
    Unknown,
}

impl From<String> for CharacterStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "alive" => CharacterStatus::Alive,
            "dead" => CharacterStatus::Dead,
            _ => CharacterStatus::Unknown,
        }
    }
}

impl std::fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CharacterStatus::Alive => write!(f, "Alive"),
            CharacterStatus::Dead => write!(f, "Dead"),
            CharacterStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Lightweight pointer to another entity (a character's origin or location)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: String,
    pub origin: EntityRef,
    pub location: EntityRef,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
    pub url: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub dimension: String,
    #[serde(default)]
    pub residents: Vec<String>,
    pub url: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    pub air_date: String,
    /// Season/episode code, e.g. "S01E01"
    pub episode: String,
    #[serde(default)]
    pub characters: Vec<String>,
    pub url: String,
    pub created: DateTime<Utc>,
}

macro_rules! impl_entity {
    ($ty:ty, $kind:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> u32 {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn url(&self) -> &str {
                &self.url
            }
        }
    };
}

impl_entity!(Character, EntityKind::Character);
impl_entity!(Location, EntityKind::Location);
impl_entity!(Episode, EntityKind::Episode);

/// An entity whose kind is only known at runtime (resolved from its URL)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnyEntity {
    Character(Character),
    Location(Location),
    Episode(Episode),
}

impl AnyEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            AnyEntity::Character(_) => EntityKind::Character,
            AnyEntity::Location(_) => EntityKind::Location,
            AnyEntity::Episode(_) => EntityKind::Episode,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            AnyEntity::Character(c) => c.id,
            AnyEntity::Location(l) => l.id,
            AnyEntity::Episode(e) => e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AnyEntity::Character(c) => &c.name,
            AnyEntity::Location(l) => &l.name,
            AnyEntity::Episode(e) => &e.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of a list endpoint: `{ info: {...}, results: [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<E> {
    pub info: PageInfo,
    pub results: Vec<E>,
}

impl<E> Page<E> {
    /// `next` is null on the last page
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }
}

/// Results delivered back to the [`App`](crate::app::App) by spawned fetch tasks
#[derive(Debug)]
pub enum AppEvent {
    CharactersLoaded {
        ticket: u64,
        result: Result<Page<Character>, ApiError>,
    },
    LocationsLoaded {
        ticket: u64,
        result: Result<Page<Location>, ApiError>,
    },
    EpisodesLoaded {
        ticket: u64,
        result: Result<Page<Episode>, ApiError>,
    },
    DetailLoaded {
        seq: u64,
        detail: Box<CharacterDetail>,
    },
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Option<String> = Option::deserialize(deserializer)?;
    Ok(v.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_decodes_api_shape() {
        let json = r#"{
            "id": 2,
            "name": "Morty Smith",
            "status": "Alive",
            "species": "Human",
            "type": "",
            "gender": "Male",
            "origin": { "name": "unknown", "url": "" },
            "location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
            "image": "https://rickandmortyapi.com/api/character/avatar/2.jpeg",
            "episode": ["https://rickandmortyapi.com/api/episode/1"],
            "url": "https://rickandmortyapi.com/api/character/2",
            "created": "2017-11-04T18:50:21.651Z"
        }"#;

        let c: Character = serde_json::from_str(json).unwrap();
        assert_eq!(c.id, 2);
        assert_eq!(c.status, CharacterStatus::Alive);
        assert!(c.kind.is_empty());
        // Empty reference URL means "no reference"
        assert_eq!(c.origin.url, None);
        assert_eq!(
            c.location.url.as_deref(),
            Some("https://rickandmortyapi.com/api/location/3")
        );
        assert_eq!(c.episode.len(), 1);
    }

    #[test]
    fn test_status_is_case_insensitive() {
        let s: CharacterStatus = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(s, CharacterStatus::Unknown);
        let s: CharacterStatus = serde_json::from_str("\"Dead\"").unwrap();
        assert_eq!(s, CharacterStatus::Dead);
        let s: CharacterStatus = serde_json::from_str("\"something else\"").unwrap();
        assert_eq!(s, CharacterStatus::Unknown);
    }

    #[test]
    fn test_kind_from_url() {
        assert_eq!(
            EntityKind::from_url("https://rickandmortyapi.com/api/location/3"),
            Some(EntityKind::Location)
        );
        assert_eq!(
            EntityKind::from_url("https://host/api/episode/28/"),
            Some(EntityKind::Episode)
        );
        assert_eq!(EntityKind::from_url("https://host/api/planet/1"), None);
        assert_eq!(EntityKind::from_url("1"), None);
    }
}
