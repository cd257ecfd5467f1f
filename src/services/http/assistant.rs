use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{dispatch, error_response, rejection_response, AppState};
use crate::services::assistant::AssistantRequest;

#[derive(Deserialize)]
pub struct SendMessage {
    conversation_id: Option<Uuid>,
    text: String,
}

pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessage>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => return rejection_response(rejection),
    };

    let result = dispatch(&state.assistant_channel, |response| {
        AssistantRequest::SendMessage {
            conversation_id: req.conversation_id,
            text: req.text,
            response,
        }
    })
    .await;

    match result {
        Ok(exchange) => (StatusCode::OK, Json(json!(exchange))),
        Err(e) => error_response(e),
    }
}

pub async fn get_transcript(
    State(state): State<AppState>,
    Path(conversation_id): Path<Uuid>,
) -> impl IntoResponse {
    let result = dispatch(&state.assistant_channel, |response| {
        AssistantRequest::GetTranscript {
            conversation_id,
            response,
        }
    })
    .await;

    match result {
        Ok(messages) => (
            StatusCode::OK,
            Json(json!({
                "conversation_id": conversation_id,
                "messages": messages
            })),
        ),
        Err(e) => error_response(e),
    }
}

pub async fn recommend(State(state): State<AppState>) -> impl IntoResponse {
    let result = dispatch(&state.assistant_channel, |response| {
        AssistantRequest::Recommend { response }
    })
    .await;

    match result {
        Ok(profile) => (StatusCode::OK, Json(json!(profile))),
        Err(e) => error_response(e),
    }
}
