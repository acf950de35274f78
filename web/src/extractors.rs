//! Custom Axum extractors.
//!
//! This module contains custom extractors for common HTTP patterns:
//! - `ApiJson`: JSON body whose rejections render as [`AppError`] bodies
//! - `RequestId`: the request id assigned by [`crate::middleware::request_id_layer`]
//!
//! # Examples
//!
//! ```ignore
//! use event_registration_web::extractors::{ApiJson, RequestId};
//!
//! async fn handler(
//!     request_id: RequestId,
//!     ApiJson(body): ApiJson<CreateUser>,
//! ) -> WebResult<Json<User>> {
//!     tracing::debug!(request_id = %request_id.0, "Creating user");
//!     Ok(Json(create(body).await?))
//! }
//! ```

use crate::error::AppError;
use crate::middleware::REQUEST_ID_HEADER;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

/// JSON request body.
///
/// Same as [`axum::Json`], except a malformed or mistyped body is rejected
/// with the usual `{code, message}` error body. The status code and text of
/// axum's own rejection are kept.
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Request id for log correlation.
///
/// Read from request extensions when the request id middleware is installed,
/// otherwise from the `x-request-id` header, otherwise freshly generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }

        let id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(id))
    }
}
