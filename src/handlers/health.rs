//! Health check endpoint handler.

use crate::models::HealthResponse;
use actix_web::web;

/// Health check endpoint
///
/// Returns the current health status of the server. Security headers are
/// applied to this response like any other.
pub async fn health() -> web::Json<HealthResponse> {
    web::Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
