//! The block matcher algebra.
//!
//! A matcher is a pure predicate over blocks, used to filter the results of
//! axis traversal ([`Xdom::get_blocks`](crate::tree::Xdom::get_blocks)) and
//! to decide inclusion during filtered cloning
//! ([`Xdom::clone_filtered`](crate::tree::Xdom::clone_filtered)). Matchers
//! never fail: a block of an unrecognized shape simply does not match.

use crate::tree::{BlockId, BlockKind, BlockType, Xdom};

/// A composable predicate selecting blocks.
pub trait BlockMatcher {
    /// Returns true when `block` is selected by this matcher.
    fn matches(&self, dom: &Xdom, block: BlockId) -> bool;
}

/// Matches every block.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyMatcher;

impl BlockMatcher for AnyMatcher {
    fn matches(&self, _dom: &Xdom, _block: BlockId) -> bool {
        true
    }
}

/// Matches blocks of a given [`BlockType`], regardless of payload.
#[derive(Debug, Clone, Copy)]
pub struct KindMatcher(pub BlockType);

impl BlockMatcher for KindMatcher {
    fn matches(&self, dom: &Xdom, block: BlockId) -> bool {
        dom.kind(block).block_type() == self.0
    }
}

/// Matches blocks selected by *any* of the sub-matchers. An empty set of
/// sub-matchers matches nothing.
pub struct OrMatcher(pub Vec<Box<dyn BlockMatcher>>);

impl OrMatcher {
    /// Builds an or-matcher from the given sub-matchers.
    #[must_use]
    pub fn new(matchers: Vec<Box<dyn BlockMatcher>>) -> Self {
        Self(matchers)
    }
}

impl BlockMatcher for OrMatcher {
    fn matches(&self, dom: &Xdom, block: BlockId) -> bool {
        self.0.iter().any(|m| m.matches(dom, block))
    }
}

/// Matches exactly one block, by identity.
#[derive(Debug, Clone, Copy)]
pub struct SameBlockMatcher(pub BlockId);

impl BlockMatcher for SameBlockMatcher {
    fn matches(&self, _dom: &Xdom, block: BlockId) -> bool {
        block == self.0
    }
}

/// Matches macro blocks, optionally restricted to one macro id.
#[derive(Debug, Clone)]
pub struct MacroMatcher {
    /// The macro id to match, or `None` for any macro block.
    pub id: Option<String>,
}

impl MacroMatcher {
    /// Matches any macro block.
    #[must_use]
    pub fn any() -> Self {
        Self { id: None }
    }

    /// Matches macro blocks invoking the named macro.
    pub fn named(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

impl BlockMatcher for MacroMatcher {
    fn matches(&self, dom: &Xdom, block: BlockId) -> bool {
        match dom.kind(block) {
            BlockKind::Macro { id, .. } => {
                self.id.as_deref().is_none_or(|wanted| wanted == id.as_str())
            }
            _ => false,
        }
    }
}

/// Matches metadata-scope blocks that define a given key.
#[derive(Debug, Clone)]
pub struct MetadataMatcher {
    /// The metadata key the scope must define.
    pub key: String,
}

impl MetadataMatcher {
    /// Matches metadata scopes defining `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl BlockMatcher for MetadataMatcher {
    fn matches(&self, dom: &Xdom, block: BlockId) -> bool {
        match dom.kind(block) {
            BlockKind::MetaData { metadata } => metadata.contains(&self.key),
            _ => false,
        }
    }
}
