//! Path and query extractors that reject with the API error body

use axum::{
    extract::{rejection, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::{ApiErrorResponse, ApiErrorType};

/// `axum::extract::Path` wrapper
#[derive(Debug)]
pub struct Path<T>(pub T);

/// `axum::extract::Query` wrapper
#[derive(Debug)]
pub struct Query<T>(pub T);

/// Rejection raised when a path segment or query string does not parse
#[derive(Debug)]
pub struct ExtractRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ExtractRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            detail: self.message,
            error_type: ApiErrorType::InvalidRequestError,
        };

        (self.status, AxumJson(response)).into_response()
    }
}

impl From<rejection::PathRejection> for ExtractRejection {
    fn from(rejection: rejection::PathRejection) -> Self {
        Self {
            status: rejection.status(),
            message: format!("Invalid path parameter: {}", rejection.body_text()),
        }
    }
}

impl From<rejection::QueryRejection> for ExtractRejection {
    fn from(rejection: rejection::QueryRejection) -> Self {
        Self {
            status: rejection.status(),
            message: format!("Invalid query string: {}", rejection.body_text()),
        }
    }
}

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ExtractRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Path(value))
    }
}

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ExtractRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(Query(value))
    }
}
