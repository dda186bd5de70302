//! API response models for standard endpoints.

use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
