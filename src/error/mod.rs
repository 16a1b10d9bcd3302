//! Error types for structural tree mutation.
//!
//! Only structural-precondition violations are errors: calling a mutation
//! operation with a block that is not where the caller claimed it was. These
//! fail before any part of the tree is touched, so a returned error never
//! leaves the tree half-mutated.
//!
//! Lookup misses (`get_first_block`, `get`, `index_of`) are **not** errors —
//! "no match on this axis" is a routine outcome and is represented as
//! `Option::None` throughout the crate.

use crate::tree::BlockId;
use thiserror::Error;

/// The error type returned by structural mutation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockError {
    /// The operation named a block as a child of a parent it does not belong
    /// to (e.g., `replace_child` with an `old` block that was already removed,
    /// or an insert anchor living in a different subtree).
    #[error("block #{child} is not a child of block #{parent}")]
    ChildNotFound {
        /// The block that was expected to be a child.
        child: BlockId,
        /// The parent whose children were searched.
        parent: BlockId,
    },

    /// The operation tried to attach a block that already has a parent.
    /// Detach it first ([`Xdom::detach`](crate::tree::Xdom::detach)).
    #[error("block #{block} is already attached to a parent; detach it first")]
    AlreadyAttached {
        /// The block that is already attached.
        block: BlockId,
    },

    /// The operation tried to attach a block below one of its own
    /// descendants, which would make the parent chain cyclic.
    #[error("block #{block} is above block #{parent}; attaching it there would create a cycle")]
    WouldCycle {
        /// The block that was to be attached.
        block: BlockId,
        /// The prospective parent, which lives inside `block`'s subtree.
        parent: BlockId,
    },
}
