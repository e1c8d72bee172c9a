use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::surveys::{Clock, InboundEvent, SessionStore, SurveyCatalog, SurveyService};

/// Clock that only moves when a test advances it.
#[derive(Debug)]
pub(super) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(super) fn new() -> Self {
        Self {
            now: Mutex::new(
                Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0)
                    .single()
                    .expect("valid timestamp"),
            ),
        }
    }

    pub(super) fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(super) fn catalog() -> Arc<SurveyCatalog> {
    Arc::new(SurveyCatalog::standard().expect("standard catalog"))
}

pub(super) fn build_service() -> (Arc<SurveyService>, Arc<SessionStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let store = Arc::new(SessionStore::new(clock.clone()));
    let service = Arc::new(SurveyService::new(catalog(), store.clone()));
    (service, store, clock)
}

pub(super) fn event(user: &str, utterance: &str) -> InboundEvent {
    InboundEvent::new(user, utterance)
}

pub(super) fn skill_payload(user: &str, utterance: &str) -> Value {
    serde_json::json!({
        "userRequest": {
            "utterance": utterance,
            "user": { "id": user, "properties": {} }
        }
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) fn reply_text(payload: &Value) -> &str {
    payload["template"]["outputs"][0]["simpleText"]["text"]
        .as_str()
        .unwrap_or_default()
}

pub(super) fn reply_tokens(payload: &Value) -> Vec<String> {
    payload["template"]["quickReplies"]
        .as_array()
        .map(|replies| {
            replies
                .iter()
                .filter_map(|reply| reply["messageText"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
