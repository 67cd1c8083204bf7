//! Response transport abstraction.
//!
//! The dispatcher writes through a minimal HTTP-response surface: a header
//! map, a status code, and a single-shot body write. The hosting endpoint
//! adapts this onto its actual server stack; [`RecordedResponse`] is an
//! in-memory implementation for tests and for hosts that buffer responses.

use http::header::{CACHE_CONTROL, PRAGMA};
use http::{HeaderMap, HeaderValue, StatusCode};

/// A minimal, synchronous HTTP response writer.
///
/// Writes are single-shot and non-resumable: headers must be complete before
/// the status is written, and the body is written in full.
pub trait ResponseTransport {
    /// Returns the mutable response header map.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Writes the response status code.
    fn write_status(&mut self, status: StatusCode);

    /// Writes the full response body.
    fn write_body(&mut self, body: &[u8]);
}

/// Inserts the cache-suppression directives every authorization response
/// must carry, overwriting any caller-supplied values.
pub fn set_cache_suppression_headers(headers: &mut HeaderMap) {
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
}

/// An in-memory [`ResponseTransport`].
#[derive(Debug, Clone, Default)]
pub struct RecordedResponse {
    /// Response headers.
    pub headers: HeaderMap,
    /// Response status, once written.
    pub status: Option<StatusCode>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl RecordedResponse {
    /// Creates an empty response recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the header value for `name` as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Returns the body as UTF-8 text (empty on invalid UTF-8).
    #[must_use]
    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or("")
    }

    /// Converts the recording into an [`http::Response`].
    #[must_use]
    pub fn into_http_response(self) -> http::Response<Vec<u8>> {
        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseTransport for RecordedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn write_body(&mut self, body: &[u8]) {
        self.body.extend_from_slice(body);
    }
}
