//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::{WebResult, error::AppError};
use axum::{Json, http::StatusCode};
use event_registration_core::StorageError;
use serde::Serialize;

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Service version
    pub version: &'static str,
}

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check dependencies (database, etc.).
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {"status":"ok","version":"0.1.0"}
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Readiness response.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Storage backend connectivity
    pub storage: bool,
}

/// Turn a storage ping into a readiness response.
///
/// # Errors
///
/// Returns a 503 `SERVICE_UNAVAILABLE` error carrying the storage message
/// when the ping failed.
pub fn readiness(ping: Result<(), StorageError>) -> WebResult<Json<ReadinessResponse>> {
    match ping {
        Ok(()) => Ok(Json(ReadinessResponse {
            ready: true,
            storage: true,
        })),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            Err(AppError::unavailable(err.to_string()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simple_health_check() {
        let (status, Json(body)) = health_check().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_readiness() {
        assert!(readiness(Ok(())).unwrap().ready);

        let err = readiness(Err(StorageError::backend("pool timed out"))).unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "SERVICE_UNAVAILABLE");
        assert_eq!(err.message(), "pool timed out");
    }
}
