use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::domain::SurveyKind;
use super::service::{InboundEvent, SkillScope, SurveyService};
use super::skill::{SkillRequest, SkillResponse};

/// Router builder exposing the chat-bot skill webhooks.
pub fn skill_router(service: Arc<SurveyService>) -> Router {
    Router::new()
        .route("/skill", post(skill_handler))
        .route("/skill/:survey", post(survey_skill_handler))
        .with_state(service)
}

// A body that is not a skill payload is answered like an empty request so
// the chat client still receives a fallback reply.
pub(crate) async fn skill_handler(
    State(service): State<Arc<SurveyService>>,
    payload: Option<Json<SkillRequest>>,
) -> Response {
    respond(&service, payload, SkillScope::AllSurveys)
}

pub(crate) async fn survey_skill_handler(
    State(service): State<Arc<SurveyService>>,
    Path(survey): Path<String>,
    payload: Option<Json<SkillRequest>>,
) -> Response {
    match survey.parse::<SurveyKind>() {
        Ok(kind) => respond(&service, payload, SkillScope::Survey(kind)),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

fn respond(
    service: &SurveyService,
    payload: Option<Json<SkillRequest>>,
    scope: SkillScope,
) -> Response {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let event = InboundEvent::from(request);
    let message = service.handle(&event, scope);
    (StatusCode::OK, Json(SkillResponse::from(message))).into_response()
}
