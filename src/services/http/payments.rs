use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use super::{dispatch, error_response, rejection_response, AppState};
use crate::models::donations::DonationForm;
use crate::models::payments::PaymentDetails;
use crate::services::donations::DonationServiceRequest;

pub async fn start_donation(
    State(state): State<AppState>,
    payload: Result<Json<DonationForm>, JsonRejection>,
) -> impl IntoResponse {
    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => return rejection_response(rejection),
    };

    let result = dispatch(&state.donation_channel, |response| {
        DonationServiceRequest::StartDonation { form, response }
    })
    .await;

    match result {
        Ok(payment) => (StatusCode::CREATED, Json(json!(payment))),
        Err(e) => error_response(e),
    }
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let result = dispatch(&state.donation_channel, |response| {
        DonationServiceRequest::GetPayment { id, response }
    })
    .await;

    match result {
        Ok(payment) => (StatusCode::OK, Json(json!(payment))),
        Err(e) => error_response(e),
    }
}

pub async fn update_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<PaymentDetails>, JsonRejection>,
) -> impl IntoResponse {
    let Json(details) = match payload {
        Ok(details) => details,
        Err(rejection) => return rejection_response(rejection),
    };

    let result = dispatch(&state.donation_channel, |response| {
        DonationServiceRequest::UpdateDetails {
            id,
            details,
            response,
        }
    })
    .await;

    match result {
        Ok(payment) => (StatusCode::OK, Json(json!(payment))),
        Err(e) => error_response(e),
    }
}

pub async fn submit_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let result = dispatch(&state.donation_channel, |response| {
        DonationServiceRequest::SubmitPayment { id, response }
    })
    .await;

    match result {
        Ok(payment) => (StatusCode::ACCEPTED, Json(json!(payment))),
        Err(e) => error_response(e),
    }
}

pub async fn close_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let result = dispatch(&state.donation_channel, |response| {
        DonationServiceRequest::ClosePayment { id, response }
    })
    .await;

    match result {
        Ok(payment) => (StatusCode::OK, Json(json!(payment))),
        Err(e) => error_response(e),
    }
}

pub async fn discard_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let result = dispatch(&state.donation_channel, |response| {
        DonationServiceRequest::DiscardPayment { id, response }
    })
    .await;

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

pub async fn get_qr_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Response {
    let result = dispatch(&state.donation_channel, |response| {
        DonationServiceRequest::GetQrCode { id, response }
    })
    .await;

    match result {
        Ok(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let result = dispatch(&state.donation_channel, |response| {
        DonationServiceRequest::GetSummary { id, response }
    })
    .await;

    match result {
        Ok(summary) => (StatusCode::OK, Json(json!(summary))),
        Err(e) => error_response(e),
    }
}
