//! Endpoint operations grouped by API area.
//!
//! Each namespace borrows the client's `TransportClient`. Operations check
//! their input before anything is sent, so invalid input never reaches the
//! network, and decode their response through `normalize::decode`.

mod examples;
mod health;

pub use examples::Examples;
pub use health::Health;

use serde::Serialize;

use crate::error::{ApiError, Result};

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| ApiError::validation(format!("request body could not be serialized: {e}")))
}
