mod mail;

use axum::{extract::OriginalUri, response::IntoResponse, Json};
use hyper::StatusCode;
use tracing::instrument;

pub use mail::{send_ride_request, MailReply, MailRouteError};

#[instrument(name = "Health check")]
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

#[instrument(name = "Route not found", skip_all, fields(uri = %uri))]
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": format!("No route for {}", uri.path()) })),
    )
}
