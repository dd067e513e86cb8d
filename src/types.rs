//! Core data model for documentation example checking
//!
//! Types flow through the pipeline in one direction:
//! documentation text → [`RawExample`] → [`ParseOutcome`] → [`Category`] →
//! [`TestResult`] → report. Everything here is plain data; the modules that
//! produce these values hold the behavior.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One unparsed command example extracted from documentation, in source order.
///
/// Immutable once extracted. The extractor never interprets the text beyond
/// joining continuation lines; rejecting malformed commands is the parser's
/// job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExample {
    /// Ordinal position in the source document (0-based)
    pub index: usize,
    /// Original command text with continuation lines already joined
    pub text: String,
    /// 1-based inclusive line range in the source text, when known
    pub source_location: Option<(usize, usize)>,
}

/// HTTP method of a reconstructed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    /// Returns the canonical uppercase method name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    /// Parse a method name, case-insensitively
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            _ => None,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body reconstructed from a command example.
///
/// `Json` is used whenever the payload text deserializes as JSON; `Raw`
/// carries anything else byte-for-byte. Multipart content lives in
/// [`RequestDescriptor::attached_files`] and
/// [`RequestDescriptor::form_fields`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    None,
    Json(serde_json::Value),
    Raw(Vec<u8>),
}

impl Body {
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// One `-F field=@path;type=mime` style attachment.
///
/// The parser records only the *path reference*; bytes are read from disk by
/// the executor at send time. A path that does not exist on disk is therefore
/// not a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub field_name: String,
    pub file_name: String,
    /// Path reference as written in the example; never resolved by the parser
    pub path: String,
    pub content_type: Option<String>,
}

/// Structured representation of an HTTP request reconstructed from one
/// command example. Immutable after parsing.
///
/// Header keys are stored lowercased so duplicate `-H` flags that differ only
/// in case overwrite each other (last write wins). `query_params` mirrors the
/// URL's query string; the `url` field keeps the original token untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Absolute or relative URL exactly as written in the example
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    pub body: Body,
    /// Plain `-F field=value` multipart fields, in flag order
    pub form_fields: Vec<(String, String)>,
    /// `-F field=@path` attachments, in flag order
    pub attached_files: Vec<FileAttachment>,
}

impl RequestDescriptor {
    /// Whether this request carries any multipart content
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        !self.attached_files.is_empty() || !self.form_fields.is_empty()
    }
}

/// Result of attempting to convert a [`RawExample`] into a
/// [`RequestDescriptor`].
///
/// `Failed` means *structurally* invalid (bad quoting, missing URL). A URL
/// pointing at a nonexistent path or a body with out-of-range values still
/// parses; semantic oddities are the classifier's and executor's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParseOutcome {
    Parsed(RequestDescriptor),
    Failed { reason: String },
}

impl ParseOutcome {
    #[must_use]
    pub const fn descriptor(&self) -> Option<&RequestDescriptor> {
        match self {
            Self::Parsed(d) => Some(d),
            Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }
}

/// Semantic category of an example, assigned independently of parse success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Health,
    Tts,
    Vc,
    VoiceMgmt,
    FileOps,
    ErrorDemo,
    Other,
}

impl Category {
    /// All categories, in report ordering
    pub const ALL: [Self; 7] = [
        Self::Health,
        Self::Tts,
        Self::Vc,
        Self::VoiceMgmt,
        Self::FileOps,
        Self::ErrorDemo,
        Self::Other,
    ];

    /// Returns the snake_case name used in reports and `--skip` flags
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Tts => "tts",
            Self::Vc => "vc",
            Self::VoiceMgmt => "voice_mgmt",
            Self::FileOps => "file_ops",
            Self::ErrorDemo => "error_demo",
            Self::Other => "other",
        }
    }

    /// Parse a category name as written in reports and CLI flags
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded outcome of executing (or attempting to parse) one example.
///
/// Created once per example, appended to the run log, never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Identifier derived from the example index and URL
    pub name: String,
    pub category: Category,
    pub success: bool,
    pub error: Option<String>,
    pub duration: Duration,
    /// Free-text annotations (e.g. file-reference warnings), in emit order
    pub notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!(Method::parse("get"), Some(Method::Get));
        assert_eq!(Method::parse("DELETE"), Some(Method::Delete));
        assert_eq!(Method::parse("Patch"), Some(Method::Patch));
        assert_eq!(Method::parse("TRACE"), None);
    }

    #[test]
    fn category_round_trips_through_name() {
        for cat in Category::ALL {
            assert_eq!(Category::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(Category::parse("bogus"), None);
    }

    #[test]
    fn descriptor_multipart_detection() {
        let mut d = RequestDescriptor {
            method: Method::Get,
            url: "/health".to_string(),
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            body: Body::None,
            form_fields: Vec::new(),
            attached_files: Vec::new(),
        };
        assert!(!d.is_multipart());
        d.form_fields.push(("text".to_string(), "hi".to_string()));
        assert!(d.is_multipart());
    }
}
