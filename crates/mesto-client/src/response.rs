//! Response checking shared by every endpoint.
//!
//! # Design
//! - Any non-2xx status becomes `ApiError::Http`; a failed request never
//!   resolves as an empty success.
//! - The backend reports errors as `{"message": "..."}`; other bodies fall
//!   back to their trimmed text or the status reason.

use mesto_core::{ApiError, ApiResult};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Decode a successful JSON body, or classify the failure.
///
/// # Errors
///
/// Returns [`ApiError::Http`] for non-2xx statuses, [`ApiError::Network`] when
/// the body cannot be read, and [`ApiError::Decode`] when it does not match `T`.
pub async fn check_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(network_error)?;
    if !status.is_success() {
        return Err(classify(status, &bytes));
    }
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode {
        detail: err.to_string(),
    })
}

/// Accept any successful response, ignoring the body.
///
/// # Errors
///
/// Returns [`ApiError::Http`] for non-2xx statuses.
pub async fn check_empty(response: Response) -> ApiResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let bytes = response.bytes().await.unwrap_or_default();
    Err(classify(status, &bytes))
}

/// Map a failed response to [`ApiError::Http`].
#[must_use]
pub fn classify(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
    ApiError::Http {
        status: status.as_u16(),
        message,
    }
}

/// Map a transport failure to [`ApiError::Network`].
#[must_use]
pub fn network_error(err: reqwest::Error) -> ApiError {
    ApiError::Network {
        detail: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_preferred() {
        let err = classify(
            StatusCode::CONFLICT,
            br#"{"message":"user with this email already exists"}"#,
        );
        assert_eq!(
            err,
            ApiError::Http {
                status: 409,
                message: "user with this email already exists".into(),
            }
        );
    }

    #[test]
    fn plain_text_and_empty_bodies_fall_back() {
        let err = classify(StatusCode::BAD_GATEWAY, b"  upstream down \n");
        assert_eq!(err.to_string(), "request failed with status 502: upstream down");

        let err = classify(StatusCode::NOT_FOUND, b"");
        assert_eq!(
            err,
            ApiError::Http {
                status: 404,
                message: "Not Found".into(),
            }
        );

        let err = classify(StatusCode::UNAUTHORIZED, br#"{"message":""}"#);
        assert_eq!(err.status(), Some(401));
    }
}
