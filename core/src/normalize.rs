//! Failure classification.
//!
//! Every failure between the backend and a namespace method passes through
//! one of these functions, so callers only ever see an `ApiError`.

use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{ApiError, Result};
use crate::http::{BackendError, HttpResponse};

/// Longest response body kept in an `HttpStatus` error.
const MAX_ERROR_BODY: usize = 4096;

/// Backend failure with no HTTP response.
pub(crate) fn transport_failure(err: BackendError) -> ApiError {
    ApiError::Transport {
        kind: err.kind,
        message: err.message,
    }
}

/// Map a non-2xx response to `HttpStatus`.
pub(crate) fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    let mut body = response.body;
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body,
    })
}

/// Decode a JSON body and run the model's validation rules.
pub(crate) fn decode<T>(response: &HttpResponse) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_str(&response.body).map_err(|e| {
        ApiError::validation(format!("malformed response body (status {}): {e}", response.status))
    })?;
    value
        .validate()
        .map_err(|e| ApiError::validation(format!("response failed validation: {e}")))?;
    Ok(value)
}
