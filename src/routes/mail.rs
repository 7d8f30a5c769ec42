use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    appstate::AppState,
    domain::{validate, ErrorMap, FormFieldSet},
    mailer::{MailError, RideNotification},
};

/// Body of every answer from this route.
#[derive(Debug, Serialize, Deserialize)]
pub struct MailReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "ErrorMap::is_empty")]
    pub errors: ErrorMap,
}

impl MailReply {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: ErrorMap::new(),
        }
    }
}

/// Validates a ride request and emails the confirmation to the rider.
#[instrument(name = "Send a ride request", skip_all, fields(rider_email = tracing::field::Empty))]
pub async fn send_ride_request(
    State(app_state): State<AppState>,
    body: Result<Json<FormFieldSet>, JsonRejection>,
) -> Result<Json<MailReply>, MailRouteError> {
    let Json(form) = body?;
    let request = validate(&form).map_err(MailRouteError::Validation)?;
    tracing::Span::current().record("rider_email", tracing::field::display(request.email()));

    let notification = RideNotification::for_request(&request);
    let message = app_state.mailer.send(&notification).await?;

    tracing::info!(%message, "Ride notification sent");
    Ok(Json(MailReply::message(message)))
}

#[derive(thiserror::Error, Debug)]
pub enum MailRouteError {
    #[error("Malformed request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
    #[error("Invalid ride request: {0}")]
    Validation(ErrorMap),
    #[error(transparent)]
    Delivery(#[from] MailError),
}

impl IntoResponse for MailRouteError {
    fn into_response(self) -> Response {
        tracing::warn!("{:?}", self);
        let message = self.to_string();
        match self {
            Self::InvalidBody(_) => {
                (StatusCode::BAD_REQUEST, Json(MailReply::message(message))).into_response()
            }
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(MailReply { message, errors }),
            )
                .into_response(),
            Self::Delivery(_) => {
                (StatusCode::BAD_GATEWAY, Json(MailReply::message(message))).into_response()
            }
        }
    }
}
