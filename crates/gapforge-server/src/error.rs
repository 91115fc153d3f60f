//! Error responses: `{ error, kind, hint?, excerpt? }` with a status per kind.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gapforge_core::Error;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

/// Client closed the request before a response was ready.
const CLIENT_CLOSED_REQUEST: u16 = 499;

pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Config(_) | Error::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Quota { .. } => StatusCode::PAYMENT_REQUIRED,
            Error::Upstream { .. } | Error::Parse { .. } => StatusCode::BAD_GATEWAY,
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::Cancelled => {
                StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Error::Io(_) | Error::Json(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self.0);
        } else {
            warn!("{}", self.0);
        }

        let mut body = serde_json::json!({
            "error": self.0.to_string(),
            "kind": self.0.kind().as_str(),
        });
        match &self.0 {
            Error::Quota { hint, .. } => body["hint"] = serde_json::json!(hint),
            Error::Parse { excerpt, .. } => body["excerpt"] = serde_json::json!(excerpt),
            _ => {}
        }
        (status, Json(body)).into_response()
    }
}

/// JSON body extractor whose rejections use the error body shape.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_error(rejection)),
        }
    }
}

fn rejection_error(rejection: JsonRejection) -> ApiError {
    ApiError(Error::Validation(rejection.body_text()))
}
