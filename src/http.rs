//! Outbound HTTP through the host.
//!
//! The guest cannot open sockets; it describes a request as a JSON
//! descriptor in shared memory and the host performs it. The host holds the
//! status code and response headers of the most recent request in separate
//! slots, queried right after the call (invocations are single-threaded and
//! run to completion, so the pairing cannot be interleaved).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::memory::{Memory, MemoryHandle};
use crate::{Result, abi};

/// Request descriptor handed to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpRequest {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl HttpRequest {
    /// A GET request for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        HttpRequest {
            url: url.into(),
            method: "GET".to_string(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Response to an [`HttpRequest`].
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: i32,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl HttpResponse {
    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// A single response header by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Decode the body as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Utf8`] if the body is not valid UTF-8.
    pub fn into_string(self) -> Result<String> {
        Ok(String::from_utf8(self.body)?)
    }
}

/// Perform `request`, optionally sending `body`.
///
/// Non-2xx statuses are not errors; callers inspect
/// [`HttpResponse::status`]. An absent response body yields an empty body.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if the request descriptor cannot be
/// encoded or the host's response-header block is not a valid JSON map.
pub fn request(request: &HttpRequest, body: Option<&[u8]>) -> Result<HttpResponse> {
    let descriptor = serde_json::to_vec(request)?;
    let request_mem = Memory::from_bytes(&descriptor);
    let body_mem = body.map(Memory::from_bytes);

    let body_offset = body_mem.as_ref().map_or(0, Memory::offset);
    let handle = MemoryHandle(abi::http_request(request_mem.offset(), body_offset));
    let status = abi::http_status_code();

    request_mem.free();
    if let Some(mem) = body_mem {
        mem.free();
    }

    // The host serializes the response headers of the last request as a
    // JSON map in a fresh block; a null handle means no headers.
    let headers = match Memory::from_handle(MemoryHandle(abi::http_headers())) {
        Some(mem) => {
            let bytes = mem.to_vec();
            mem.free();
            serde_json::from_slice(&bytes)?
        }
        None => BTreeMap::new(),
    };

    let body = match Memory::from_handle(handle) {
        Some(mem) => {
            let bytes = mem.to_vec();
            mem.free();
            bytes
        }
        None => Vec::new(),
    };

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn get_request_round_trips_status_and_body() {
        testing::reset();
        testing::push_http_response(200, br#"{"ok":true}"#);

        let response = request(&HttpRequest::new("https://example.com/api"), None).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), br#"{"ok":true}"#);

        let (descriptor, body) = testing::last_http_request().unwrap();
        let parsed: HttpRequest = serde_json::from_str(&descriptor).unwrap();
        assert_eq!(parsed.url, "https://example.com/api");
        assert_eq!(parsed.method, "GET");
        assert!(body.is_none());
    }

    #[test]
    fn post_sends_the_body_region() {
        testing::reset();
        testing::push_http_response(201, b"");

        let req = HttpRequest::new("https://example.com/items")
            .with_method("POST")
            .with_header("content-type", "application/json");
        let response = request(&req, Some(br#"{"name":"widget"}"#)).unwrap();
        assert_eq!(response.status(), 201);
        assert!(response.body().is_empty());

        let (descriptor, body) = testing::last_http_request().unwrap();
        let parsed: HttpRequest = serde_json::from_str(&descriptor).unwrap();
        assert_eq!(parsed.method, "POST");
        assert_eq!(
            parsed.headers.get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(body.unwrap(), br#"{"name":"widget"}"#);
    }

    #[test]
    fn response_headers_are_decoded_into_a_map() {
        testing::reset();
        testing::push_http_response_with_headers(
            200,
            &[
                ("content-type", "application/json"),
                ("x-request-id", "req-7f3a"),
            ],
            br#"{"ok":true}"#,
        );

        let response = request(&HttpRequest::new("https://example.com/api"), None).unwrap();
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("x-request-id"), Some("req-7f3a"));
        assert_eq!(response.headers().len(), 2);
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn headerless_response_yields_an_empty_map() {
        testing::reset();
        testing::push_http_response(204, b"");
        let response = request(&HttpRequest::new("https://example.com"), None).unwrap();
        assert!(response.headers().is_empty());
    }

    #[test]
    fn error_status_is_not_an_sdk_error() {
        testing::reset();
        testing::push_http_response(503, b"unavailable");
        let response = request(&HttpRequest::new("https://example.com"), None).unwrap();
        assert_eq!(response.status(), 503);
        assert_eq!(response.into_string().unwrap(), "unavailable");
    }
}
