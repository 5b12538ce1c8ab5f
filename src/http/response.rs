//! Error-to-response mapping.
//!
//! # Responsibilities
//! - Map each failure class to its status code and body shape
//! - Keep upstream error details in the logs, never in the response
//! - Turn a panic caught at the outer boundary into a plain 500

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::launches::query::{FieldError, QueryError};
use crate::launches::transform::TransformError;
use crate::upstream::UpstreamError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Error Interno del Servidor";

/// `{ "message": ... }`
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// `{ "errors": [...] }`
#[derive(Debug, Serialize)]
pub struct ValidationBody {
    pub errors: Vec<FieldError>,
}

/// Every way a `/launches` request can fail after the rate limiter.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("failed to fetch {resource}: {source}")]
    Upstream {
        resource: &'static str,
        #[source]
        source: UpstreamError,
    },

    #[error(transparent)]
    Internal(#[from] TransformError),
}

impl ApiError {
    pub fn upstream(resource: &'static str, source: UpstreamError) -> Self {
        ApiError::Upstream { resource, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Query(err @ QueryError::UnexpectedParameters(_)) => {
                tracing::debug!(error = %err, "Rejected unexpected query parameters");
                (status, Json(MessageBody { message: err.to_string() })).into_response()
            }
            ApiError::Query(QueryError::Invalid(errors)) => {
                tracing::debug!(fields = errors.len(), "Rejected invalid query values");
                (status, Json(ValidationBody { errors })).into_response()
            }
            ApiError::Upstream { resource, source } => {
                tracing::error!(resource, error = %source, "Error al obtener los datos de {}", resource);
                let message = format!("Error al obtener los datos de {resource}");
                (status, Json(MessageBody { message })).into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Unexpected error while building response");
                (status, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launches::query::parse_page;
    use crate::launches::transform::decode_list;
    use crate::launches::model::Rocket;
    use serde_json::{json, Value};

    async fn body_of(response: Response) -> (StatusCode, Vec<u8>) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_unexpected_parameters_body() {
        let err = ApiError::from(parse_page(Some("a=1&b=2"), 200).unwrap_err());
        let (status, body) = body_of(err.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            json!({ "message": "Los siguientes parámetros no están permitidos: a, b" })
        );
    }

    #[tokio::test]
    async fn test_validation_body() {
        let err = ApiError::from(parse_page(Some("offset=-1"), 200).unwrap_err());
        let (status, body) = body_of(err.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            json!({ "errors": [{
                "value": "-1",
                "msg": "Offset debe ser un entero mayor o igual a 0.",
                "param": "offset",
                "location": "query"
            }]})
        );
    }

    #[tokio::test]
    async fn test_internal_error_is_plain_text() {
        let err = ApiError::from(decode_list::<Rocket>("rockets", json!(null)).unwrap_err());
        let (status, body) = body_of(err.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, INTERNAL_ERROR_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_panic_response() {
        let (status, body) = body_of(panic_response(Box::new("boom"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, INTERNAL_ERROR_MESSAGE.as_bytes());
    }
}
