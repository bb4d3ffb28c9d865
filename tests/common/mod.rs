//! Scripted transport and API fixtures shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use rmx::api::{ApiClient, Transport, TransportResponse};
use rmx::error::ApiError;

pub const BASE: &str = "https://rickandmortyapi.com/api";

#[derive(Clone, Debug)]
enum Reply {
    Body(u16, String),
    NetworkError(String),
}

/// Answers GETs from a URL -> reply table and records every request.
///
/// Unscripted URLs answer 404 like the real API does.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ok(&self, url: &str, body: Value) {
        self.reply(url, Reply::Body(200, body.to_string()));
    }

    pub fn status(&self, url: &str, status: u16) {
        self.reply(url, Reply::Body(status, json!({"error": "nope"}).to_string()));
    }

    pub fn raw(&self, url: &str, status: u16, body: &str) {
        self.reply(url, Reply::Body(status, body.to_string()));
    }

    pub fn network_error(&self, url: &str, reason: &str) {
        self.reply(url, Reply::NetworkError(reason.to_string()));
    }

    fn reply(&self, url: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(url.to_string(), reply);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, ApiError> {
        self.requests.lock().unwrap().push(url.to_string());
        let reply = self.replies.lock().unwrap().get(url).cloned();
        match reply {
            Some(Reply::Body(status, body)) => Ok(TransportResponse::new(status, body)),
            Some(Reply::NetworkError(reason)) => Err(ApiError::Transport { reason }),
            None => Ok(TransportResponse::new(
                404,
                json!({"error": "There is nothing here"}).to_string(),
            )),
        }
    }
}

pub fn client(fake: &Arc<FakeTransport>) -> ApiClient {
    ApiClient::new(BASE, fake.clone())
}

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

// ----- fixtures -----

pub fn character(id: u32, origin: Option<u32>, location: Option<u32>, episodes: &[u32]) -> Value {
    let reference = |loc: Option<u32>, name: &str| match loc {
        Some(l) => json!({"name": name, "url": url(&format!("/location/{l}"))}),
        None => json!({"name": "unknown", "url": ""}),
    };
    json!({
        "id": id,
        "name": format!("Character {id}"),
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": reference(origin, "Earth (C-137)"),
        "location": reference(location, "Citadel of Ricks"),
        "image": url(&format!("/character/avatar/{id}.jpeg")),
        "episode": episodes.iter().map(|e| url(&format!("/episode/{e}"))).collect::<Vec<_>>(),
        "url": url(&format!("/character/{id}")),
        "created": "2017-11-04T18:48:46.250Z"
    })
}

pub fn location(id: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Location {id}"),
        "type": "Planet",
        "dimension": "Dimension C-137",
        "residents": [url("/character/1"), url("/character/2")],
        "url": url(&format!("/location/{id}")),
        "created": "2017-11-10T12:42:04.162Z"
    })
}

pub fn episode(id: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Episode {id}"),
        "air_date": "December 2, 2013",
        "episode": format!("S01E{id:02}"),
        "characters": [url("/character/1")],
        "url": url(&format!("/episode/{id}")),
        "created": "2017-11-10T12:56:33.798Z"
    })
}

/// List envelope; `next` names the following page when given
pub fn page(results: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "info": {
            "count": results.len(),
            "pages": 1,
            "next": next.map(url),
            "prev": null
        },
        "results": results
    })
}

pub fn characters(ids: std::ops::RangeInclusive<u32>) -> Vec<Value> {
    ids.map(|id| character(id, Some(1), Some(3), &[1])).collect()
}
