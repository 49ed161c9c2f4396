//! Turning an authentication failure into a response.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

use crate::SessionError;

/// Builds the response sent when the authentication middleware refuses a
/// request.
///
/// The error tells you why: [`SessionError::CookieMissing`],
/// [`SessionError::Unauthorized`], or [`SessionError::Store`]. Any
/// `Fn(SessionError) -> Response` closure implements this trait:
///
/// ```rust
/// use axum::response::{IntoResponse, Response};
/// use http::StatusCode;
/// use sessionup::{Manager, MemoryStore, SessionError};
///
/// let manager = Manager::builder(MemoryStore::new())
///     .reject(|err: SessionError| -> Response {
///         match err {
///             SessionError::Store(_) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
///             _ => StatusCode::UNAUTHORIZED.into_response(),
///         }
///     })
///     .build();
/// # let _ = manager;
/// ```
pub trait Reject: Send + Sync + 'static {
    /// Produces the terminal response for `err`.
    fn reject(&self, err: SessionError) -> Response;
}

impl<F> Reject for F
where
    F: Fn(SessionError) -> Response + Send + Sync + 'static,
{
    fn reject(&self, err: SessionError) -> Response {
        self(err)
    }
}

/// The default rejection: `401 Unauthorized` with a JSON body
/// `{"error": "<message>"}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReject;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl Reject for JsonReject {
    fn reject(&self, err: SessionError) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error: err.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use http::header::CONTENT_TYPE;
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn test_json_reject_writes_401_json_error() {
        let response = JsonReject.reject(SessionError::Unauthorized);

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "unauthorized" }));
    }

    #[test]
    fn test_closure_is_rejector() {
        let reject = |_: SessionError| StatusCode::FORBIDDEN.into_response();
        let response = Reject::reject(&reject, SessionError::Unauthorized);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
