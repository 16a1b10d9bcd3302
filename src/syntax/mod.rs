//! Syntax identifiers and scoped metadata.
//!
//! A [`MetaData`] map rides on [`BlockKind::MetaData`](crate::tree::BlockKind)
//! scope blocks and is visible to descendants through nearest-enclosing-scope
//! lookup: the innermost scope that defines a key wins. The best-known use is
//! the [`MetaData::SYNTAX`] key, recording which markup syntax a subtree was
//! parsed from.

use crate::query::Axis;
use crate::tree::{BlockId, BlockKind, Xdom};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A markup syntax identifier, e.g., `xwiki/2.1` or `plain/1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Syntax {
    /// The syntax family, e.g., `xwiki`.
    pub id: String,
    /// The syntax version, e.g., `2.1`.
    pub version: String,
}

impl Syntax {
    /// Creates a syntax identifier from id and version.
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.version)
    }
}

/// The error returned when a syntax string has no `id/version` shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid syntax identifier {0:?}, expected \"id/version\"")]
pub struct SyntaxParseError(pub String);

impl FromStr for Syntax {
    type Err = SyntaxParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The version is everything after the last '/', so syntax ids may
        // themselves contain slashes.
        match s.rsplit_once('/') {
            Some((id, version)) if !id.is_empty() && !version.is_empty() => {
                Ok(Self::new(id, version))
            }
            _ => Err(SyntaxParseError(s.to_string())),
        }
    }
}

/// Key/value metadata attached to a metadata-scope block.
///
/// Distinct from block attributes: metadata is part of the document content
/// (it survives cloning by value and is visible to renderers), while
/// attributes are internal working data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetaData {
    data: HashMap<String, String>,
}

impl MetaData {
    /// Well-known key: the syntax the scoped content was parsed from, in
    /// `id/version` form.
    pub const SYNTAX: &'static str = "syntax";
    /// Well-known key: the source reference the scoped content came from.
    pub const SOURCE: &'static str = "source";
    /// Well-known key: the base reference for resolving relative references.
    pub const BASE: &'static str = "base";

    /// Creates an empty metadata map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a metadata map holding a single entry.
    pub fn with(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut metadata = Self::new();
        metadata.add(key, value);
        metadata
    }

    /// Adds an entry, replacing any previous value for the key.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// True when the key is defined in this scope.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl Xdom {
    /// Looks up a metadata key from `ctx`: walks ANCESTOR_OR_SELF and
    /// returns the value from the nearest enclosing metadata scope that
    /// defines the key (lexical shadowing — an outer scope's value is hidden
    /// by an inner one).
    #[must_use]
    pub fn metadata_value(&self, ctx: BlockId, key: &str) -> Option<&str> {
        // The searcher yields the scope's id rather than the value itself so
        // the returned &str can borrow from self instead of the closure
        // argument.
        let scope = self.get(
            ctx,
            |dom, block| match dom.kind(block) {
                BlockKind::MetaData { metadata } if metadata.contains(key) => Some(block),
                _ => None,
            },
            Axis::AncestorOrSelf,
        )?;
        match self.kind(scope) {
            BlockKind::MetaData { metadata } => metadata.get(key),
            _ => None,
        }
    }

    /// Resolves the syntax of the content at `ctx` from its nearest
    /// enclosing metadata scope defining [`MetaData::SYNTAX`]. `None` when no
    /// scope declares a syntax or the declared value does not parse.
    #[must_use]
    pub fn syntax_metadata(&self, ctx: BlockId) -> Option<Syntax> {
        self.metadata_value(ctx, MetaData::SYNTAX)
            .and_then(|value| value.parse().ok())
    }
}
