//! Request descriptors and the builder that turns them into wire requests.
//!
//! An [`ApiRequest`] says *what* to call: method, path relative to the API
//! base, optional JSON body, query parameters, header overrides, and whether
//! the answer is binary. [`ApiRequest::prepare`] resolves it against an API
//! base into a [`PreparedRequest`] with a full URL, merged headers and a
//! serialized body. Preparing is pure, so endpoint shapes are testable
//! without a server.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use urlencoding::encode;

use crate::error::ClientError;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const AUTHORIZATION: &str = "Authorization";
pub const ACCEPT: &str = "Accept";

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// The HTTP methods the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A logical API call, independent of where the API lives.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,

    /// Path below the API base, starting with `/`, e.g. `/repository/{id}`.
    pub path: String,

    pub body: Option<Value>,

    /// Query parameters; serialized in key order.
    pub params: BTreeMap<String, String>,

    /// Header overrides, applied on top of `Content-Type: application/json`.
    pub headers: Vec<(String, String)>,

    /// Decode the response as raw bytes instead of JSON.
    pub binary: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            params: BTreeMap::new(),
            headers: Vec::new(),
            binary: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach any serializable value as the JSON body.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self, ClientError> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    /// Resolve against `api_base` (e.g. `https://host/dev`) into a
    /// ready-to-send request. The `Authorization` header is not added here.
    pub fn prepare(&self, api_base: &str) -> Result<PreparedRequest, ClientError> {
        let base = api_base.trim_end_matches('/');
        let mut url = if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        };

        let query = encode_query(&self.params);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let mut prepared = PreparedRequest {
            method: self.method,
            url,
            headers: vec![(CONTENT_TYPE.to_string(), DEFAULT_CONTENT_TYPE.to_string())],
            body: None,
        };
        for (name, value) in &self.headers {
            prepared.set_header(name, value);
        }
        if let Some(body) = &self.body {
            prepared.body = Some(serde_json::to_string(body)?);
        }
        Ok(prepared)
    }
}

/// `k1=v1&k2=v2`, with every key and value percent-encoded. Empty when there
/// are no parameters.
pub fn encode_query(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// A fully resolved request: absolute URL, final headers, JSON text body.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Set a header, replacing any existing one with the same
    /// (case-insensitive) name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn with_authorization(mut self, value: &str) -> Self {
        self.set_header(AUTHORIZATION, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const BASE: &str = "https://api.example.com/dev";

    #[test]
    fn plain_get() {
        let req = ApiRequest::get("/repository").prepare(BASE).unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.url, "https://api.example.com/dev/repository");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(req.body.is_none());
        assert!(req.header(AUTHORIZATION).is_none());
    }

    #[test]
    fn base_trailing_slash_and_relative_path() {
        let req = ApiRequest::get("image/1").prepare("https://h/dev/").unwrap();
        assert_eq!(req.url, "https://h/dev/image/1");
    }

    #[test]
    fn query_appended_only_when_present() {
        let req = ApiRequest::get("/import")
            .with_param("limit", "10")
            .with_param("after", "abc")
            .prepare(BASE)
            .unwrap();
        assert_eq!(req.url, "https://api.example.com/dev/import?after=abc&limit=10");
    }

    #[test]
    fn query_is_percent_encoded() {
        let query = encode_query(&BTreeMap::from([
            ("q".to_string(), "a&b=c d".to_string()),
            ("x y".to_string(), "1".to_string()),
        ]));
        assert_eq!(query, "q=a%26b%3Dc%20d&x%20y=1");
    }

    #[test]
    fn header_override_replaces_default_case_insensitively() {
        let req = ApiRequest::get("/image/1/render-tile/0/0/0/0/0/x")
            .with_header("content-type", "text/plain")
            .with_header(ACCEPT, "image/jpeg")
            .prepare(BASE)
            .unwrap();
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.header(CONTENT_TYPE), Some("text/plain"));
        assert_eq!(req.header("accept"), Some("image/jpeg"));
    }

    #[test]
    fn authorization_wins_over_caller_header() {
        let req = ApiRequest::get("/repository")
            .with_header(AUTHORIZATION, "Bearer forged")
            .prepare(BASE)
            .unwrap()
            .with_authorization("Bearer real");
        assert_eq!(req.header(AUTHORIZATION), Some("Bearer real"));
        assert_eq!(
            req.headers
                .iter()
                .filter(|(n, _)| n.eq_ignore_ascii_case(AUTHORIZATION))
                .count(),
            1
        );
    }

    #[test]
    fn body_is_json_text() {
        let body = json!({"name": "demo", "tags": [1, 2]});
        let req = ApiRequest::post("/repository")
            .with_body(body.clone())
            .prepare(BASE)
            .unwrap();
        let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn binary_flag_does_not_change_wire_request() {
        let a = ApiRequest::get("/x").prepare(BASE).unwrap();
        let b = ApiRequest::get("/x").binary().prepare(BASE).unwrap();
        assert_eq!(a, b);
    }
}
