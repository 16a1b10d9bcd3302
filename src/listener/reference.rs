//! Resource reference payloads for links and images.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of resource a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A wiki document.
    Document,
    /// An attachment of a wiki document.
    Attachment,
    /// An absolute URL.
    Url,
    /// An email address.
    Mailto,
    /// A server-relative path.
    Path,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Document => "doc",
            Self::Attachment => "attach",
            Self::Url => "url",
            Self::Mailto => "mailto",
            Self::Path => "path",
        };
        f.write_str(name)
    }
}

/// The target of a link or image block.
///
/// The `reference` string is opaque to this crate; resolving it against a
/// wiki or URL space is renderer business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReference {
    /// The raw reference, e.g., `Space.Page@attachment` or a URL.
    pub reference: String,
    /// What the reference points at.
    pub resource_type: ResourceType,
    /// True when the source markup named the type explicitly (e.g.,
    /// `attach:file.png`) rather than leaving it to be inferred.
    pub typed: bool,
}

impl ResourceReference {
    /// Creates a reference of the given type, untyped in the source.
    pub fn new(reference: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            reference: reference.into(),
            resource_type,
            typed: false,
        }
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.typed {
            write!(f, "{}:{}", self.resource_type, self.reference)
        } else {
            f.write_str(&self.reference)
        }
    }
}
