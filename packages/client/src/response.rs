//! Response normalization: raw HTTP response → [`ApiResponse`] or error.

use bytes::Bytes;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::ClientError;

/// A successful outcome of a dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// `204 No Content`.
    Empty,
    /// A 2xx JSON body.
    Json(Value),
    /// A 2xx body fetched with the binary flag set.
    Binary(Bytes),
}

impl ApiResponse {
    /// Decode into `T`. [`Empty`](ApiResponse::Empty) decodes as JSON `null`,
    /// so `()` and `Option<_>` accept it.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        let value = match self {
            ApiResponse::Empty => Value::Null,
            ApiResponse::Json(value) => value,
            ApiResponse::Binary(bytes) => serde_json::from_slice(&bytes)?,
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Raw body bytes. [`Empty`](ApiResponse::Empty) yields an empty buffer.
    pub fn into_bytes(self) -> Result<Bytes, ClientError> {
        match self {
            ApiResponse::Empty => Ok(Bytes::new()),
            ApiResponse::Binary(bytes) => Ok(bytes),
            ApiResponse::Json(value) => Ok(Bytes::from(serde_json::to_vec(&value)?)),
        }
    }
}

/// Interpret a response according to its status and the binary flag.
///
/// - `204` → [`ApiResponse::Empty`] without reading the body.
/// - non-2xx → [`ClientError::Http`] carrying the body text.
/// - other 2xx → JSON value, or raw bytes when `binary` is set. An empty
///   body is not valid JSON and fails with [`ClientError::Decode`].
pub async fn normalize(response: Response, binary: bool) -> Result<ApiResponse, ClientError> {
    let status = response.status();

    if status == StatusCode::NO_CONTENT {
        return Ok(ApiResponse::Empty);
    }

    if !status.is_success() {
        let message = response.text().await?;
        warn!(status = status.as_u16(), "request failed: {message}");
        return Err(ClientError::Http {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.bytes().await?;
    if binary {
        Ok(ApiResponse::Binary(body))
    } else {
        Ok(ApiResponse::Json(serde_json::from_slice(&body)?))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_decodes_as_unit_and_none() {
        ApiResponse::Empty.into_json::<()>().unwrap();
        let none: Option<Vec<String>> = ApiResponse::Empty.into_json().unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn empty_is_not_a_list() {
        let err = ApiResponse::Empty.into_json::<Vec<String>>().unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn json_into_typed() {
        let names: Vec<String> = ApiResponse::Json(json!(["a", "b"])).into_json().unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn empty_into_bytes() {
        assert!(ApiResponse::Empty.into_bytes().unwrap().is_empty());
    }
}
