//! Typed payloads for drops that originate outside the list.

/// Data carried by a drag that did not start inside the source list.
///
/// The payload uses a MIME-like kind string for matching against the kinds a
/// model declares via
/// [`external_payload_kinds`](crate::adapter::SourceModel::external_payload_kinds)
/// and raw bytes for the data itself. This keeps the drag source and the
/// model decoupled; they only need to agree on the kind string and byte
/// format.
///
/// # Example
///
/// ```
/// use sourcelist_core::DragPayload;
///
/// let payload = DragPayload::text("https://example.com/feed.xml");
/// assert_eq!(payload.kind, "text/plain");
/// assert!(payload.matches_kind("text/*"));
/// assert_eq!(payload.as_text(), Some("https://example.com/feed.xml"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragPayload {
    /// MIME-like kind identifier, e.g. `"text/plain"` or `"application/x-bookmark"`.
    pub kind: String,
    /// Raw serialized data.
    pub data: Vec<u8>,
    /// Human-readable preview text shown during the drag, if any.
    pub display_text: Option<String>,
}

impl DragPayload {
    /// Create a payload with raw bytes.
    #[must_use]
    pub fn new(kind: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            kind: kind.into(),
            data,
            display_text: None,
        }
    }

    /// Create a plain-text payload (`text/plain`).
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        let s: String = text.into();
        let data = s.as_bytes().to_vec();
        Self {
            kind: "text/plain".to_string(),
            data,
            display_text: Some(s),
        }
    }

    /// Set the preview text.
    #[must_use]
    pub fn with_display_text(mut self, text: impl Into<String>) -> Self {
        self.display_text = Some(text.into());
        self
    }

    /// Attempt to decode the data as a UTF-8 string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    /// Whether the payload kind matches the given pattern.
    ///
    /// Supports exact match and wildcard suffix (e.g. `"text/*"`); `"*"` and
    /// `"*/*"` match everything.
    #[must_use]
    pub fn matches_kind(&self, pattern: &str) -> bool {
        if pattern == "*" || pattern == "*/*" {
            return true;
        }
        if let Some(prefix) = pattern.strip_suffix("/*") {
            self.kind.starts_with(prefix) && self.kind.as_bytes().get(prefix.len()) == Some(&b'/')
        } else {
            self.kind == pattern
        }
    }

    /// Whether the payload kind matches any of the given patterns.
    #[must_use]
    pub fn matches_any<S: AsRef<str>>(&self, patterns: &[S]) -> bool {
        patterns.iter().any(|p| self.matches_kind(p.as_ref()))
    }
}
