//! Router output, independent of the HTTP server.

use std::path::PathBuf;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CACHE_CONTROL: &str = "Cache-Control";

/// Response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    /// Transcoded image bytes.
    Bytes(Vec<u8>),
    /// Stored file, streamed verbatim.
    File(PathBuf),
}

/// A complete response for a matched asset route.
///
/// Once the router hands one back, the request is finished: the host writes
/// it out and does nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Body,
}

impl AssetResponse {
    pub fn not_found() -> Self {
        Self {
            status: 404,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn ok(content_type: &str, cache_control: String, body: Body) -> Self {
        Self {
            status: 200,
            headers: vec![
                (CONTENT_TYPE, content_type.to_string()),
                (CACHE_CONTROL, cache_control),
            ],
            body,
        }
    }

    /// First header value named `name` (case-insensitive).
    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
