//! # wikidom
//!
//! A renderer-agnostic document tree engine for parsed wiki markup: a mutable
//! tree of typed blocks with XPath-style axis queries, invariant-preserving
//! structural mutation, filtered deep cloning, and a listener-based event
//! protocol for projecting a tree into any output format.
//!
//! Parsers build trees through the mutation API, transformations query and
//! rewrite them through the axis/matcher engine, and renderers consume them
//! through [`listener::traverse`] — this crate defines no markup grammar and
//! no output format of its own.
//!
//! ## Quick Start
//!
//! ```
//! use wikidom::query::matcher::KindMatcher;
//! use wikidom::tree::{BlockKind, BlockType, Xdom};
//! use wikidom::Axis;
//!
//! let mut dom = Xdom::new();
//! let root = dom.root();
//! let para = dom.create_block(BlockKind::Paragraph);
//! let word = dom.create_block(BlockKind::word("hello"));
//! dom.add_child(root, para).unwrap();
//! dom.add_child(para, word).unwrap();
//!
//! let words = dom.get_blocks(root, &KindMatcher(BlockType::Word), Axis::Descendant);
//! assert_eq!(words, vec![word]);
//! ```

pub mod error;
pub mod listener;
pub mod query;
pub mod syntax;
pub mod tree;

// Re-export primary types at the crate root for convenience.
pub use error::BlockError;
pub use query::Axis;
pub use tree::{BlockId, BlockKind, BlockType, Xdom};
