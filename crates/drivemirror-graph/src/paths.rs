//! Typed Graph path builder
//!
//! Every segment is percent-encoded on its own, so identifiers and folder
//! names containing reserved characters (`:`, `#`, `%`, spaces) can never
//! change the shape of the request URL.
//!
//! ```rust
//! use drivemirror_graph::paths::GraphPath;
//!
//! let path = GraphPath::new()
//!     .segment("drives")
//!     .segment("b!abc")
//!     .segment("root")
//!     .relative_path("Reports/Q1: draft");
//! assert_eq!(path.as_str(), "/drives/b!abc/root:/Reports/Q1%3A%20draft");
//! ```

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode one path segment
pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// Decode one percent-encoded path segment
pub fn decode_segment(encoded: &str) -> Result<String, std::str::Utf8Error> {
    percent_decode_str(encoded).decode_utf8().map(|s| s.into_owned())
}

/// A Graph API path relative to the base URL, always starting with `/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphPath {
    encoded: String,
}

impl GraphPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one segment, escaping everything that is not a plain character
    #[must_use]
    pub fn segment(mut self, raw: &str) -> Self {
        self.encoded.push('/');
        self.encoded.push_str(&encode_segment(raw));
        self
    }

    /// Append a path-based address (`:/a/b`) to the last segment
    ///
    /// `relative` is split on `/`; empty components are dropped. When nothing
    /// remains the path is left unchanged.
    #[must_use]
    pub fn relative_path(mut self, relative: &str) -> Self {
        let parts: Vec<String> = relative
            .split('/')
            .filter(|p| !p.is_empty())
            .map(encode_segment)
            .collect();
        if !parts.is_empty() {
            self.encoded.push_str(":/");
            self.encoded.push_str(&parts.join("/"));
        }
        self
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// The path with a query string appended
    pub fn with_query(&self, query: &str) -> String {
        format!("{}?{}", self.encoded, query)
    }
}

impl fmt::Display for GraphPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}
