use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tower_http::trace::TraceLayer;

use super::{assistant::AssistantRequest, donations::DonationServiceRequest, ServiceError};
use crate::models::content::SiteContent;
use crate::models::donations::PaymentMethod;
use crate::models::payments::PaymentError;

mod assistant;
mod payments;

#[derive(Clone)]
pub struct AppState {
    donation_channel: mpsc::Sender<DonationServiceRequest>,
    assistant_channel: mpsc::Sender<AssistantRequest>,
    content: Arc<SiteContent>,
}

impl AppState {
    pub fn new(
        donation_channel: mpsc::Sender<DonationServiceRequest>,
        assistant_channel: mpsc::Sender<AssistantRequest>,
        methods: &[PaymentMethod],
    ) -> Self {
        Self {
            donation_channel,
            assistant_channel,
            content: Arc::new(SiteContent::new(methods)),
        }
    }
}

/// Sends a request to a service and waits for its reply.
async fn dispatch<T, R, F>(channel: &mpsc::Sender<T>, request: F) -> Result<R, ServiceError>
where
    F: FnOnce(oneshot::Sender<Result<R, ServiceError>>) -> T,
{
    let (response_tx, response_rx) = oneshot::channel();

    channel
        .send(request(response_tx))
        .await
        .map_err(|e| ServiceError::Communication("HTTP".to_string(), e.to_string()))?;

    response_rx
        .await
        .map_err(|e| ServiceError::Communication("HTTP".to_string(), e.to_string()))?
}

fn error_response(error: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, title) = match &error {
        ServiceError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.title()),
        ServiceError::EmptyMessage => (StatusCode::UNPROCESSABLE_ENTITY, "Empty Message"),
        ServiceError::Payment(PaymentError::UnknownBank(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "Invalid Payment Details")
        }
        ServiceError::Payment(_) => (StatusCode::CONFLICT, "Payment Not Ready"),
        ServiceError::NotFound(..) => (StatusCode::NOT_FOUND, "Not Found"),
        ServiceError::Internal(_) | ServiceError::Communication(..) => {
            log::error!("Request failed: {}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    };

    (
        status,
        Json(json!({
            "title": title,
            "description": error.to_string()
        })),
    )
}

/// Body for a request whose JSON could not be read into the expected shape.
fn rejection_response(rejection: JsonRejection) -> (StatusCode, Json<Value>) {
    log::debug!("Rejected request body: {}", rejection.body_text());

    (
        rejection.status(),
        Json(json!({
            "title": "Invalid Request",
            "description": rejection.body_text()
        })),
    )
}

async fn get_content(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.content.as_ref().clone())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/content", get(get_content))
        .route("/api/recommendation", get(assistant::recommend))
        .route("/api/donations", post(payments::start_donation))
        .route(
            "/api/payments/{id}",
            get(payments::get_payment).delete(payments::discard_payment),
        )
        .route("/api/payments/{id}/details", put(payments::update_details))
        .route("/api/payments/{id}/submit", post(payments::submit_payment))
        .route("/api/payments/{id}/close", post(payments::close_payment))
        .route("/api/payments/{id}/qr", get(payments::get_qr_code))
        .route("/api/payments/{id}/summary", get(payments::get_summary))
        .route("/api/chat", post(assistant::send_message))
        .route("/api/chat/{id}", get(assistant::get_transcript))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_http_server(listen: &str, state: AppState) -> Result<(), anyhow::Error> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
