//! Arena-based document block tree.
//!
//! This module implements the core tree representation using arena allocation
//! with typed indices. All blocks live in a contiguous `Vec<BlockData>` owned
//! by the `Xdom`, and are referenced by `BlockId` — a newtype over
//! `NonZeroU32`.
//!
//! This design provides O(1) block access, cache-friendly layout, and safe
//! bulk deallocation (drop the `Xdom` and everything is freed).
//!
//! # Architecture
//!
//! Instead of a web of parent/sibling object references, all navigation links
//! (parent, first\_child, last\_child, next\_sibling, prev\_sibling) are arena
//! indices. This avoids borrow checker issues, reference cycles, and per-block
//! heap allocation, and makes block identity trivial: two blocks are the same
//! block iff their `BlockId`s are equal, however similar their content.
//!
//! Every public mutation operation either fully succeeds — leaving the link
//! structure consistent (each child's `parent` points at its owner, the
//! forward and backward sibling chains agree, a detached block has no parent
//! and no sibling links) — or fails with a [`BlockError`] before touching
//! any link.

mod attribute;
mod block;

pub use attribute::{AttributeValue, CloneableValue};
pub use block::{BlockKind, BlockType, Format};

use crate::error::BlockError;
use crate::query::matcher::{AnyMatcher, BlockMatcher};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;
use tracing::trace;

/// A typed index into the document's block arena.
///
/// `BlockId` is a newtype over `NonZeroU32`, meaning it can never be zero and
/// `Option<BlockId>` has the same size as `BlockId` (niche optimization).
///
/// A `BlockId` is only meaningful together with the [`Xdom`] that allocated
/// it; ids are never reused within one `Xdom`, so a stale id keeps referring
/// to the same (possibly detached) block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BlockId(NonZeroU32);

impl BlockId {
    /// Creates a `BlockId` from a raw arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("BlockId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.get())
    }
}

/// Storage for a single block in the document arena.
///
/// Each block stores its kind (paragraph, word, image, etc.), navigation
/// links, and the two per-block maps: `parameters` (renderer-visible,
/// serializable strings) and `attributes` (internal working data, never
/// serialized). Access individual blocks via [`Xdom::block`].
#[derive(Debug, Clone)]
pub struct BlockData {
    /// What kind of block this is and its payload.
    pub kind: BlockKind,
    /// Parent block, if any. The document root block and detached blocks have
    /// no parent.
    pub parent: Option<BlockId>,
    /// First child block.
    pub first_child: Option<BlockId>,
    /// Last child block (for O(1) append).
    pub last_child: Option<BlockId>,
    /// Next sibling.
    pub next_sibling: Option<BlockId>,
    /// Previous sibling.
    pub prev_sibling: Option<BlockId>,
    /// Generic key/value metadata for renderers. The XHTML renderer, for
    /// example, emits these as element attributes.
    pub parameters: HashMap<String, String>,
    /// Internal key/value data, never serialized. See [`AttributeValue`] for
    /// the cloning contract.
    pub attributes: HashMap<String, AttributeValue>,
}

impl BlockData {
    fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
            parameters: HashMap::new(),
            attributes: HashMap::new(),
        }
    }
}

/// A document tree.
///
/// The `Xdom` owns all blocks in an arena and provides methods for tree
/// navigation and mutation. All tree operations go through `&Xdom`
/// (navigation, queries) or `&mut Xdom` (mutation) — which also makes
/// concurrent mutation impossible by construction.
///
/// # Examples
///
/// ```
/// use wikidom::tree::{BlockKind, Xdom};
///
/// let mut dom = Xdom::new();
/// let root = dom.root();
/// let para = dom.create_block(BlockKind::Paragraph);
/// let word = dom.create_block(BlockKind::word("hello"));
/// dom.add_child(root, para).unwrap();
/// dom.add_child(para, word).unwrap();
/// assert_eq!(dom.parent(word), Some(para));
/// ```
#[derive(Debug, Clone)]
pub struct Xdom {
    /// The block arena. Index 0 is unused (placeholder for `NonZeroU32`).
    blocks: Vec<BlockData>,
    /// The document root block id.
    root: BlockId,
}

impl Xdom {
    /// Creates a new document containing only the root [`BlockKind::Document`]
    /// block.
    #[must_use]
    pub fn new() -> Self {
        let mut blocks = Vec::with_capacity(16);
        // Index 0: placeholder (BlockId uses NonZeroU32)
        blocks.push(BlockData::new(BlockKind::Document));
        // Index 1: the document root block
        blocks.push(BlockData::new(BlockKind::Document));
        let root = BlockId::from_index(1);
        Self { blocks, root }
    }

    /// Returns the document root block id.
    #[must_use]
    pub fn root(&self) -> BlockId {
        self.root
    }

    /// Returns the top-level block reachable from `id` by walking parent
    /// links. Returns `id` itself when it has no parent (a detached block is
    /// its own root).
    #[must_use]
    pub fn root_of(&self, id: BlockId) -> BlockId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Returns a reference to the `BlockData` for the given block.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a valid block of this arena.
    #[must_use]
    pub fn block(&self, id: BlockId) -> &BlockData {
        &self.blocks[id.as_index()]
    }

    /// Returns a mutable reference to the `BlockData` for the given block.
    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut BlockData {
        &mut self.blocks[id.as_index()]
    }

    /// Returns the kind of a block.
    #[must_use]
    pub fn kind(&self, id: BlockId) -> &BlockKind {
        &self.block(id).kind
    }

    /// Returns the total number of blocks in the arena (including detached
    /// ones, excluding the placeholder).
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len() - 1
    }

    /// Returns an iterator over every block in the arena, attached or not,
    /// in allocation order.
    pub fn blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        (1..self.blocks.len()).map(BlockId::from_index)
    }

    // --- Parameters ---

    /// Returns the value of a parameter on a block.
    #[must_use]
    pub fn parameter(&self, id: BlockId, name: &str) -> Option<&str> {
        self.block(id).parameters.get(name).map(String::as_str)
    }

    /// Returns all parameters of a block.
    #[must_use]
    pub fn parameters(&self, id: BlockId) -> &HashMap<String, String> {
        &self.block(id).parameters
    }

    /// Sets a parameter on a block, replacing any previous value.
    pub fn set_parameter(
        &mut self,
        id: BlockId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.block_mut(id).parameters.insert(name.into(), value.into());
    }

    /// Replaces all parameters of a block.
    pub fn set_parameters(&mut self, id: BlockId, parameters: HashMap<String, String>) {
        self.block_mut(id).parameters = parameters;
    }

    // --- Attributes ---

    /// Returns an attribute value on a block.
    #[must_use]
    pub fn attribute(&self, id: BlockId, name: &str) -> Option<&AttributeValue> {
        self.block(id).attributes.get(name)
    }

    /// Returns all attributes of a block.
    #[must_use]
    pub fn attributes(&self, id: BlockId) -> &HashMap<String, AttributeValue> {
        &self.block(id).attributes
    }

    /// Sets an attribute on a block, replacing any previous value.
    pub fn set_attribute(&mut self, id: BlockId, name: impl Into<String>, value: AttributeValue) {
        self.block_mut(id).attributes.insert(name.into(), value);
    }

    /// Replaces all attributes of a block.
    pub fn set_attributes(&mut self, id: BlockId, attributes: HashMap<String, AttributeValue>) {
        self.block_mut(id).attributes = attributes;
    }

    // --- Navigation ---

    /// Returns the parent of a block.
    #[must_use]
    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.block(id).parent
    }

    /// Returns the first child of a block.
    #[must_use]
    pub fn first_child(&self, id: BlockId) -> Option<BlockId> {
        self.block(id).first_child
    }

    /// Returns the last child of a block.
    #[must_use]
    pub fn last_child(&self, id: BlockId) -> Option<BlockId> {
        self.block(id).last_child
    }

    /// Returns the next sibling of a block.
    #[must_use]
    pub fn next_sibling(&self, id: BlockId) -> Option<BlockId> {
        self.block(id).next_sibling
    }

    /// Returns the previous sibling of a block.
    #[must_use]
    pub fn prev_sibling(&self, id: BlockId) -> Option<BlockId> {
        self.block(id).prev_sibling
    }

    /// Returns an iterator over the children of a block, in document order.
    pub fn children(&self, id: BlockId) -> Children<'_> {
        Children {
            dom: self,
            next: self.block(id).first_child,
        }
    }

    /// Returns an iterator over `start` and its ancestors (walking up to the
    /// root). To iterate the ancestors only, seed with the parent:
    /// `dom.parent(id).map(|p| dom.ancestors(p))`.
    pub fn ancestors(&self, start: BlockId) -> Ancestors<'_> {
        Ancestors {
            dom: self,
            next: Some(start),
        }
    }

    /// Returns a depth-first (pre-order) iterator over all descendants of a
    /// block, excluding the block itself.
    pub fn descendants(&self, id: BlockId) -> Descendants<'_> {
        Descendants {
            dom: self,
            root: id,
            next: self.first_child(id),
        }
    }

    // --- Mutation ---

    /// Allocates a new detached block in the arena and returns its `BlockId`.
    pub fn create_block(&mut self, kind: BlockKind) -> BlockId {
        let index = self.blocks.len();
        self.blocks.push(BlockData::new(kind));
        BlockId::from_index(index)
    }

    /// Appends a child block to the end of a parent's child list.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::AlreadyAttached`] if `child` already has a
    /// parent (detach it first), or [`BlockError::WouldCycle`] if `parent`
    /// lives inside `child`'s subtree. The tree is unchanged on error.
    pub fn add_child(&mut self, parent: BlockId, child: BlockId) -> Result<(), BlockError> {
        self.ensure_attachable(parent, child)?;
        self.link_last(parent, child);
        Ok(())
    }

    /// Appends several child blocks, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::AlreadyAttached`] if any of the blocks has a
    /// parent or appears twice in `children`, or [`BlockError::WouldCycle`]
    /// if `parent` lives inside one of them. The tree is unchanged on error.
    pub fn add_children(&mut self, parent: BlockId, children: &[BlockId]) -> Result<(), BlockError> {
        self.ensure_all_attachable(parent, children)?;
        for &child in children {
            self.link_last(parent, child);
        }
        Ok(())
    }

    /// Atomically replaces the entire children sequence of `parent`.
    ///
    /// All current children are detached (parent and both sibling links
    /// cleared), then the new sequence is linked in order. The new children
    /// may include blocks that are currently children of `parent`; any other
    /// attached block is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::AlreadyAttached`] if any of the new children is
    /// attached to a different parent or appears twice in `children`, or
    /// [`BlockError::WouldCycle`] if `parent` lives inside one of them. The
    /// tree is unchanged on error.
    pub fn set_children(&mut self, parent: BlockId, children: &[BlockId]) -> Result<(), BlockError> {
        for (i, &child) in children.iter().enumerate() {
            let attached_elsewhere =
                self.parent(child).is_some_and(|current| current != parent);
            if attached_elsewhere || children[..i].contains(&child) {
                return Err(BlockError::AlreadyAttached { block: child });
            }
            if self.root_of(parent) == child {
                return Err(BlockError::WouldCycle {
                    block: child,
                    parent,
                });
            }
        }

        while let Some(first) = self.first_child(parent) {
            self.detach(first);
        }
        for &child in children {
            self.link_last(parent, child);
        }
        Ok(())
    }

    /// Inserts `new_child` immediately before `anchor` in `parent`'s child
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ChildNotFound`] if `anchor` is not currently a
    /// child of `parent`, [`BlockError::AlreadyAttached`] if `new_child` has
    /// a parent, or [`BlockError::WouldCycle`] if `parent` lives inside
    /// `new_child`'s subtree. The tree is unchanged on error.
    pub fn insert_child_before(
        &mut self,
        parent: BlockId,
        new_child: BlockId,
        anchor: BlockId,
    ) -> Result<(), BlockError> {
        self.ensure_child(parent, anchor)?;
        self.ensure_attachable(parent, new_child)?;
        self.link_before(parent, new_child, anchor);
        Ok(())
    }

    /// Inserts `new_child` immediately after `anchor` in `parent`'s child
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ChildNotFound`] if `anchor` is not currently a
    /// child of `parent`, [`BlockError::AlreadyAttached`] if `new_child` has
    /// a parent, or [`BlockError::WouldCycle`] if `parent` lives inside
    /// `new_child`'s subtree. The tree is unchanged on error.
    pub fn insert_child_after(
        &mut self,
        parent: BlockId,
        new_child: BlockId,
        anchor: BlockId,
    ) -> Result<(), BlockError> {
        self.ensure_child(parent, anchor)?;
        self.ensure_attachable(parent, new_child)?;
        match self.next_sibling(anchor) {
            Some(next) => self.link_before(parent, new_child, next),
            None => self.link_last(parent, new_child),
        }
        Ok(())
    }

    /// Replaces the child `old` of `parent` with zero or more blocks spliced
    /// in at its former position. `old` is fully detached. An empty
    /// `replacements` slice behaves like [`remove_block`](Self::remove_block).
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ChildNotFound`] if `old` is not currently a
    /// child of `parent`, [`BlockError::AlreadyAttached`] if any replacement
    /// has a parent (other than being `old` itself) or appears twice, or
    /// [`BlockError::WouldCycle`] if `parent` lives inside a replacement's
    /// subtree. The tree is unchanged on error.
    pub fn replace_child(
        &mut self,
        parent: BlockId,
        replacements: &[BlockId],
        old: BlockId,
    ) -> Result<(), BlockError> {
        if self.parent(old) != Some(parent) {
            trace!(%old, %parent, "replace_child: old block is not a child");
            return Err(BlockError::ChildNotFound {
                child: old,
                parent,
            });
        }
        for (i, &block) in replacements.iter().enumerate() {
            let attached = block != old && self.parent(block).is_some();
            if attached || replacements[..i].contains(&block) {
                return Err(BlockError::AlreadyAttached { block });
            }
            if self.root_of(parent) == block {
                return Err(BlockError::WouldCycle { block, parent });
            }
        }

        let successor = self.next_sibling(old);
        self.detach(old);
        for &block in replacements {
            match successor {
                Some(next) => self.link_before(parent, block, next),
                None => self.link_last(parent, block),
            }
        }
        Ok(())
    }

    /// Removes the child `child` from `parent`. The removed block keeps its
    /// content but loses its parent and both sibling links; the former
    /// neighbors are linked to each other.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ChildNotFound`] if `child` is not currently a
    /// child of `parent`. The tree is unchanged on error.
    pub fn remove_block(&mut self, parent: BlockId, child: BlockId) -> Result<(), BlockError> {
        self.ensure_child(parent, child)?;
        self.detach(child);
        Ok(())
    }

    /// Detaches a block from its parent, wherever it is attached. No-op for a
    /// block that already has no parent.
    ///
    /// The block remains allocated in the arena; it simply becomes the root
    /// of its own (sub)tree.
    pub fn detach(&mut self, id: BlockId) {
        let Some(parent) = self.block(id).parent else {
            return;
        };

        let prev = self.block(id).prev_sibling;
        let next = self.block(id).next_sibling;

        match prev {
            Some(p) => self.block_mut(p).next_sibling = next,
            None => self.block_mut(parent).first_child = next,
        }

        match next {
            Some(n) => self.block_mut(n).prev_sibling = prev,
            None => self.block_mut(parent).last_child = prev,
        }

        self.block_mut(id).parent = None;
        self.block_mut(id).prev_sibling = None;
        self.block_mut(id).next_sibling = None;
    }

    // --- Clone ---

    /// Returns a new `Xdom` holding a deep copy of the subtree rooted at
    /// `root`, keeping only blocks accepted by `filter`.
    ///
    /// The copy is made in pre-order; a block rejected by the filter is
    /// dropped together with its entire subtree. The `root` block itself
    /// always survives (the filter applies to descendants). Parameters are
    /// copied by value; attribute values follow the [`AttributeValue`]
    /// contract — `Owned` values are deep-copied, `Shared` values are shared
    /// between original and clone. All navigation links in the clone are
    /// rebuilt from scratch for the (possibly thinner) children sequences.
    #[must_use]
    pub fn clone_filtered(&self, root: BlockId, filter: &dyn BlockMatcher) -> Xdom {
        trace!(%root, "cloning subtree with filter");
        let mut clone = Xdom::new();
        let cloned_root = clone.root;
        // The clone's arena root is always a Document block; when cloning a
        // non-root subtree, copy the source block's content onto it.
        clone.blocks[cloned_root.as_index()].kind = self.block(root).kind.clone();
        clone.blocks[cloned_root.as_index()].parameters = self.block(root).parameters.clone();
        clone.blocks[cloned_root.as_index()].attributes = self.block(root).attributes.clone();
        self.clone_children_into(root, &mut clone, cloned_root, filter);
        clone
    }

    /// Returns a new `Xdom` holding an unfiltered deep copy of the subtree
    /// rooted at `root`.
    #[must_use]
    pub fn clone_subtree(&self, root: BlockId) -> Xdom {
        self.clone_filtered(root, &AnyMatcher)
    }

    fn clone_children_into(
        &self,
        source: BlockId,
        clone: &mut Xdom,
        target: BlockId,
        filter: &dyn BlockMatcher,
    ) {
        for child in self.children(source) {
            if !filter.matches(self, child) {
                continue;
            }
            let data = self.block(child);
            let copied = clone.create_block(data.kind.clone());
            clone.blocks[copied.as_index()].parameters = data.parameters.clone();
            clone.blocks[copied.as_index()].attributes = data.attributes.clone();
            clone.link_last(target, copied);
            self.clone_children_into(child, clone, copied, filter);
        }
    }

    // --- Link plumbing ---
    //
    // The `link_*`/`detach` helpers are the only code that writes navigation
    // links. Each rewrites every affected link before returning, so the
    // public operations built on them cannot observe a half-linked state.

    fn ensure_attachable(&self, parent: BlockId, child: BlockId) -> Result<(), BlockError> {
        if self.parent(child).is_some() {
            return Err(BlockError::AlreadyAttached { block: child });
        }
        // A detached block is the root of its own subtree; if `parent` lives
        // inside it, attaching would make the parent chain cyclic.
        if self.root_of(parent) == child {
            trace!(%child, %parent, "structural precondition failed: would cycle");
            return Err(BlockError::WouldCycle {
                block: child,
                parent,
            });
        }
        Ok(())
    }

    fn ensure_all_attachable(&self, parent: BlockId, blocks: &[BlockId]) -> Result<(), BlockError> {
        for (i, &block) in blocks.iter().enumerate() {
            if blocks[..i].contains(&block) {
                return Err(BlockError::AlreadyAttached { block });
            }
            self.ensure_attachable(parent, block)?;
        }
        Ok(())
    }

    fn ensure_child(&self, parent: BlockId, child: BlockId) -> Result<(), BlockError> {
        if self.parent(child) != Some(parent) {
            trace!(%child, %parent, "structural precondition failed: not a child");
            return Err(BlockError::ChildNotFound { child, parent });
        }
        Ok(())
    }

    /// Links a detached block as the last child of `parent`.
    fn link_last(&mut self, parent: BlockId, child: BlockId) {
        self.block_mut(child).parent = Some(parent);

        if let Some(last) = self.block(parent).last_child {
            self.block_mut(last).next_sibling = Some(child);
            self.block_mut(child).prev_sibling = Some(last);
            self.block_mut(parent).last_child = Some(child);
        } else {
            self.block_mut(parent).first_child = Some(child);
            self.block_mut(parent).last_child = Some(child);
        }
    }

    /// Links a detached block immediately before `anchor`, a child of
    /// `parent`.
    fn link_before(&mut self, parent: BlockId, child: BlockId, anchor: BlockId) {
        self.block_mut(child).parent = Some(parent);

        if let Some(prev) = self.block(anchor).prev_sibling {
            self.block_mut(prev).next_sibling = Some(child);
            self.block_mut(child).prev_sibling = Some(prev);
        } else {
            self.block_mut(parent).first_child = Some(child);
        }

        self.block_mut(child).next_sibling = Some(anchor);
        self.block_mut(anchor).prev_sibling = Some(child);
    }
}

impl Default for Xdom {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a block.
pub struct Children<'a> {
    dom: &'a Xdom,
    next: Option<BlockId>,
}

impl Iterator for Children<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.dom.block(current).next_sibling;
        Some(current)
    }
}

/// Iterator over a block and its ancestors, nearest first.
pub struct Ancestors<'a> {
    dom: &'a Xdom,
    next: Option<BlockId>,
}

impl Iterator for Ancestors<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.dom.block(current).parent;
        Some(current)
    }
}

/// Depth-first (pre-order) iterator over all descendants of a block.
pub struct Descendants<'a> {
    dom: &'a Xdom,
    root: BlockId,
    next: Option<BlockId>,
}

impl Iterator for Descendants<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        // Try to go deeper first
        if let Some(child) = self.dom.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        // Try next sibling
        if let Some(sibling) = self.dom.next_sibling(current) {
            self.next = Some(sibling);
            return Some(current);
        }

        // Walk up to find an ancestor with a next sibling
        let mut ancestor = self.dom.parent(current);
        while let Some(anc) = ancestor {
            if anc == self.root {
                self.next = None;
                return Some(current);
            }
            if let Some(sibling) = self.dom.next_sibling(anc) {
                self.next = Some(sibling);
                return Some(current);
            }
            ancestor = self.dom.parent(anc);
        }

        self.next = None;
        Some(current)
    }
}
