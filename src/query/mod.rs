//! Axis-based tree traversal and queries.
//!
//! Queries are composed of an [`Axis`] — one of eleven orderings relative to
//! a context block, taken from the XPath axis vocabulary — and a
//! [`BlockMatcher`](matcher::BlockMatcher) filtering the blocks the axis
//! yields. Axis sequences are produced lazily wherever the ordering allows,
//! so a first-match query ([`Xdom::get_first_block`]) touches only as much of
//! the tree as it needs.

pub mod matcher;

use crate::tree::{Ancestors, BlockId, Children, Descendants, Xdom};
use matcher::BlockMatcher;

/// A traversal ordering relative to a context block.
///
/// The orderings mirror the XPath axes (minus the attribute and namespace
/// axes, which have no equivalent in a block tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Just the context block itself.
    Self_,
    /// The parent of the context block, if there is one.
    Parent,
    /// The ancestors of the context block, nearest first, up to and including
    /// the root.
    Ancestor,
    /// The context block, then its ancestors.
    AncestorOrSelf,
    /// The children of the context block, in document order.
    Child,
    /// All descendants of the context block in pre-order, excluding the
    /// context block itself.
    Descendant,
    /// The context block, then its descendants.
    DescendantOrSelf,
    /// All blocks after the context block in document order, excluding its
    /// own descendants.
    Following,
    /// The following siblings of the context block, nearest first.
    FollowingSibling,
    /// All blocks before the context block in document order, excluding its
    /// ancestors, nearest first (reverse document order).
    Preceding,
    /// The preceding siblings of the context block, nearest first.
    PrecedingSibling,
}

impl Axis {
    /// Returns the axis name in XPath spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Self_ => "self",
            Self::Parent => "parent",
            Self::Ancestor => "ancestor",
            Self::AncestorOrSelf => "ancestor-or-self",
            Self::Child => "child",
            Self::Descendant => "descendant",
            Self::DescendantOrSelf => "descendant-or-self",
            Self::Following => "following",
            Self::FollowingSibling => "following-sibling",
            Self::Preceding => "preceding",
            Self::PrecedingSibling => "preceding-sibling",
        }
    }

    /// Parses an axis name into an `Axis` variant.
    ///
    /// Returns `None` if the string is not a recognized axis name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "self" => Some(Self::Self_),
            "parent" => Some(Self::Parent),
            "ancestor" => Some(Self::Ancestor),
            "ancestor-or-self" => Some(Self::AncestorOrSelf),
            "child" => Some(Self::Child),
            "descendant" => Some(Self::Descendant),
            "descendant-or-self" => Some(Self::DescendantOrSelf),
            "following" => Some(Self::Following),
            "following-sibling" => Some(Self::FollowingSibling),
            "preceding" => Some(Self::Preceding),
            "preceding-sibling" => Some(Self::PrecedingSibling),
            _ => None,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lazy iterator over the blocks an axis denotes, in axis order.
///
/// Returned by [`Xdom::axis`]. All axes except PRECEDING iterate without
/// materializing the sequence; PRECEDING (reverse document order) buffers
/// internally.
pub struct AxisIter<'a> {
    pending: Option<BlockId>,
    inner: Inner<'a>,
}

enum Inner<'a> {
    Empty,
    Children(Children<'a>),
    Ancestors(Ancestors<'a>),
    Descendants(Descendants<'a>),
    Siblings {
        dom: &'a Xdom,
        next: Option<BlockId>,
        forward: bool,
    },
    Following {
        dom: &'a Xdom,
        next: Option<BlockId>,
    },
    Buffered(std::vec::IntoIter<BlockId>),
}

impl Iterator for AxisIter<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(block) = self.pending.take() {
            return Some(block);
        }
        match &mut self.inner {
            Inner::Empty => None,
            Inner::Children(it) => it.next(),
            Inner::Ancestors(it) => it.next(),
            Inner::Descendants(it) => it.next(),
            Inner::Siblings { dom, next, forward } => {
                let current = (*next)?;
                *next = if *forward {
                    dom.next_sibling(current)
                } else {
                    dom.prev_sibling(current)
                };
                Some(current)
            }
            Inner::Following { dom, next } => {
                let current = (*next)?;
                *next = next_in_document_order(dom, current);
                Some(current)
            }
            Inner::Buffered(it) => it.next(),
        }
    }
}

/// The first block strictly after `id` in document order, or `None` at the
/// end of the tree.
fn next_in_document_order(dom: &Xdom, id: BlockId) -> Option<BlockId> {
    if let Some(child) = dom.first_child(id) {
        return Some(child);
    }
    next_skipping_subtree(dom, id)
}

/// The first block after `id`'s entire subtree in document order.
fn next_skipping_subtree(dom: &Xdom, id: BlockId) -> Option<BlockId> {
    if let Some(sibling) = dom.next_sibling(id) {
        return Some(sibling);
    }
    let mut ancestor = dom.parent(id);
    while let Some(anc) = ancestor {
        if let Some(sibling) = dom.next_sibling(anc) {
            return Some(sibling);
        }
        ancestor = dom.parent(anc);
    }
    None
}

/// All blocks before `ctx` in document order, excluding its ancestors, in
/// reverse document order (nearest first).
fn preceding_blocks(dom: &Xdom, ctx: BlockId) -> Vec<BlockId> {
    let mut result = Vec::new();
    let mut context = ctx;
    loop {
        // Preceding siblings and their subtrees; within each subtree the
        // deepest-last block is nearest to the context.
        let mut current = dom.prev_sibling(context);
        while let Some(sibling) = current {
            let descendants: Vec<BlockId> = dom.descendants(sibling).collect();
            result.extend(descendants.into_iter().rev());
            result.push(sibling);
            current = dom.prev_sibling(sibling);
        }
        // Ancestors themselves are excluded, but their preceding siblings
        // are not; continue the walk one level up.
        match dom.parent(context) {
            Some(parent) => context = parent,
            None => break,
        }
    }
    result
}

impl Xdom {
    /// Returns a lazy iterator over the blocks on `axis` relative to `ctx`,
    /// in axis order, before any matcher filtering.
    pub fn axis(&self, ctx: BlockId, axis: Axis) -> AxisIter<'_> {
        let (pending, inner) = match axis {
            Axis::Self_ => (Some(ctx), Inner::Empty),
            Axis::Parent => (self.parent(ctx), Inner::Empty),
            Axis::Ancestor => match self.parent(ctx) {
                Some(parent) => (None, Inner::Ancestors(self.ancestors(parent))),
                None => (None, Inner::Empty),
            },
            Axis::AncestorOrSelf => (None, Inner::Ancestors(self.ancestors(ctx))),
            Axis::Child => (None, Inner::Children(self.children(ctx))),
            Axis::Descendant => (None, Inner::Descendants(self.descendants(ctx))),
            Axis::DescendantOrSelf => (Some(ctx), Inner::Descendants(self.descendants(ctx))),
            Axis::Following => (
                None,
                Inner::Following {
                    dom: self,
                    next: next_skipping_subtree(self, ctx),
                },
            ),
            Axis::FollowingSibling => (
                None,
                Inner::Siblings {
                    dom: self,
                    next: self.next_sibling(ctx),
                    forward: true,
                },
            ),
            Axis::Preceding => (None, Inner::Buffered(preceding_blocks(self, ctx).into_iter())),
            Axis::PrecedingSibling => (
                None,
                Inner::Siblings {
                    dom: self,
                    next: self.prev_sibling(ctx),
                    forward: false,
                },
            ),
        };
        AxisIter { pending, inner }
    }

    /// Returns every block on `axis` that satisfies `matcher`, preserving
    /// axis order. Empty when nothing matches.
    #[must_use]
    pub fn get_blocks(
        &self,
        ctx: BlockId,
        matcher: &dyn BlockMatcher,
        axis: Axis,
    ) -> Vec<BlockId> {
        self.axis(ctx, axis)
            .filter(|&block| matcher.matches(self, block))
            .collect()
    }

    /// Returns the first block on `axis` that satisfies `matcher`, or `None`.
    ///
    /// Short-circuits: the axis sequence is only walked up to the match.
    #[must_use]
    pub fn get_first_block(
        &self,
        ctx: BlockId,
        matcher: &dyn BlockMatcher,
        axis: Axis,
    ) -> Option<BlockId> {
        self.axis(ctx, axis)
            .find(|&block| matcher.matches(self, block))
    }

    /// Walks `axis` in order, applying `searcher` to each block, and returns
    /// the first extracted value. The generic form behind nearest-enclosing
    /// scope lookups such as
    /// [`syntax_metadata`](crate::tree::Xdom::syntax_metadata).
    pub fn get<T>(
        &self,
        ctx: BlockId,
        searcher: impl Fn(&Xdom, BlockId) -> Option<T>,
        axis: Axis,
    ) -> Option<T> {
        self.axis(ctx, axis).find_map(|block| searcher(self, block))
    }

    /// Returns the pre-order index of `target` within the subtree rooted at
    /// `ctx`: 0 for `ctx` itself, then sequential indices over its
    /// descendants. Comparison is by identity (`BlockId` equality) — a
    /// structurally identical block elsewhere in the tree is not found.
    /// Returns `None` when `target` is not in the subtree.
    #[must_use]
    pub fn index_of(&self, ctx: BlockId, target: BlockId) -> Option<usize> {
        if target == ctx {
            return Some(0);
        }
        self.descendants(ctx)
            .position(|block| block == target)
            .map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::matcher::AnyMatcher;
    use crate::tree::BlockKind;

    /// Builds the reference tree used by the axis tests:
    ///
    /// ```text
    /// root
    /// ├── before
    /// ├── context
    /// │   ├── child1
    /// │   │   └── child11
    /// │   └── child2
    /// └── after
    ///     └── after1
    /// ```
    struct Fixture {
        dom: Xdom,
        before: BlockId,
        context: BlockId,
        child1: BlockId,
        child11: BlockId,
        child2: BlockId,
        after: BlockId,
        after1: BlockId,
    }

    fn fixture() -> Fixture {
        let mut dom = Xdom::new();
        let root = dom.root();
        let before = dom.create_block(BlockKind::Paragraph);
        let context = dom.create_block(BlockKind::Paragraph);
        let after = dom.create_block(BlockKind::Paragraph);
        dom.add_children(root, &[before, context, after]).unwrap();

        let child1 = dom.create_block(BlockKind::Group);
        let child2 = dom.create_block(BlockKind::word("c2"));
        dom.add_children(context, &[child1, child2]).unwrap();
        let child11 = dom.create_block(BlockKind::word("c11"));
        dom.add_child(child1, child11).unwrap();

        let after1 = dom.create_block(BlockKind::word("a1"));
        dom.add_child(after, after1).unwrap();

        Fixture {
            dom,
            before,
            context,
            child1,
            child11,
            child2,
            after,
            after1,
        }
    }

    fn axis_vec(f: &Fixture, ctx: BlockId, axis: Axis) -> Vec<BlockId> {
        f.dom.axis(ctx, axis).collect()
    }

    #[test]
    fn test_self_axis() {
        let f = fixture();
        assert_eq!(axis_vec(&f, f.context, Axis::Self_), vec![f.context]);
    }

    #[test]
    fn test_parent_axis() {
        let f = fixture();
        assert_eq!(axis_vec(&f, f.context, Axis::Parent), vec![f.dom.root()]);
        assert_eq!(axis_vec(&f, f.dom.root(), Axis::Parent), vec![]);
    }

    #[test]
    fn test_ancestor_axes_nearest_first() {
        let f = fixture();
        let root = f.dom.root();
        assert_eq!(
            axis_vec(&f, f.child11, Axis::Ancestor),
            vec![f.child1, f.context, root]
        );
        assert_eq!(
            axis_vec(&f, f.child11, Axis::AncestorOrSelf),
            vec![f.child11, f.child1, f.context, root]
        );
        assert_eq!(axis_vec(&f, root, Axis::Ancestor), vec![]);
        assert_eq!(axis_vec(&f, root, Axis::AncestorOrSelf), vec![root]);
    }

    #[test]
    fn test_child_axis() {
        let f = fixture();
        assert_eq!(
            axis_vec(&f, f.context, Axis::Child),
            vec![f.child1, f.child2]
        );
        assert_eq!(axis_vec(&f, f.child11, Axis::Child), vec![]);
    }

    #[test]
    fn test_descendant_axes_preorder() {
        let f = fixture();
        assert_eq!(
            axis_vec(&f, f.context, Axis::Descendant),
            vec![f.child1, f.child11, f.child2]
        );
        assert_eq!(
            axis_vec(&f, f.context, Axis::DescendantOrSelf),
            vec![f.context, f.child1, f.child11, f.child2]
        );
    }

    #[test]
    fn test_following_axis_excludes_own_descendants() {
        let f = fixture();
        assert_eq!(
            axis_vec(&f, f.context, Axis::Following),
            vec![f.after, f.after1]
        );
        // from a deeper context: aunts come after remaining siblings
        assert_eq!(
            axis_vec(&f, f.child11, Axis::Following),
            vec![f.child2, f.after, f.after1]
        );
        assert_eq!(axis_vec(&f, f.after1, Axis::Following), vec![]);
    }

    #[test]
    fn test_sibling_axes() {
        let f = fixture();
        assert_eq!(
            axis_vec(&f, f.before, Axis::FollowingSibling),
            vec![f.context, f.after]
        );
        assert_eq!(
            axis_vec(&f, f.after, Axis::PrecedingSibling),
            vec![f.context, f.before]
        );
        assert_eq!(axis_vec(&f, f.before, Axis::PrecedingSibling), vec![]);
    }

    #[test]
    fn test_preceding_axis_excludes_ancestors() {
        let f = fixture();
        // Reverse document order; child1/child11/child2 precede `after`, and
        // the root (an ancestor) never appears.
        assert_eq!(
            axis_vec(&f, f.after, Axis::Preceding),
            vec![f.child2, f.child11, f.child1, f.context, f.before]
        );
        assert_eq!(
            axis_vec(&f, f.child11, Axis::Preceding),
            vec![f.before]
        );
        assert_eq!(axis_vec(&f, f.dom.root(), Axis::Preceding), vec![]);
    }

    #[test]
    fn test_get_blocks_preserves_axis_order() {
        let f = fixture();
        assert_eq!(
            f.dom.get_blocks(f.child11, &AnyMatcher, Axis::Ancestor),
            vec![f.child1, f.context, f.dom.root()]
        );
    }

    #[test]
    fn test_get_first_block() {
        let f = fixture();
        assert_eq!(
            f.dom.get_first_block(f.child11, &AnyMatcher, Axis::Ancestor),
            Some(f.child1)
        );
        assert_eq!(
            f.dom
                .get_first_block(f.dom.root(), &AnyMatcher, Axis::Ancestor),
            None
        );
    }

    #[test]
    fn test_get_extracts_first_value() {
        let f = fixture();
        let found = f.dom.get(
            f.child11,
            |dom, block| match dom.kind(block) {
                BlockKind::Paragraph => Some(block),
                _ => None,
            },
            Axis::AncestorOrSelf,
        );
        assert_eq!(found, Some(f.context));
    }

    #[test]
    fn test_index_of_preorder_identity() {
        let f = fixture();
        assert_eq!(f.dom.index_of(f.context, f.context), Some(0));
        assert_eq!(f.dom.index_of(f.context, f.child1), Some(1));
        assert_eq!(f.dom.index_of(f.context, f.child11), Some(2));
        assert_eq!(f.dom.index_of(f.context, f.child2), Some(3));
        // outside the subtree
        assert_eq!(f.dom.index_of(f.context, f.after), None);
    }

    #[test]
    fn test_axis_name_roundtrip() {
        let axes = [
            Axis::Self_,
            Axis::Parent,
            Axis::Ancestor,
            Axis::AncestorOrSelf,
            Axis::Child,
            Axis::Descendant,
            Axis::DescendantOrSelf,
            Axis::Following,
            Axis::FollowingSibling,
            Axis::Preceding,
            Axis::PrecedingSibling,
        ];
        for axis in axes {
            assert_eq!(Axis::parse(axis.as_str()), Some(axis));
        }
        assert_eq!(Axis::parse("children"), None);
        assert_eq!(Axis::parse(""), None);
    }
}
