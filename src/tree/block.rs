//! Block type definitions.
//!
//! The `BlockKind` enum represents all block types in a document tree, from
//! the document root down to individual words. Each variant carries the
//! block-type-specific payload (e.g., a header's level, an image's resource
//! reference). Navigation links and the parameter/attribute maps are stored
//! in `BlockData`, not here.

use crate::listener::reference::ResourceReference;
use crate::syntax::MetaData;
use serde::{Deserialize, Serialize};

/// The kind of a block and its associated data.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// The document root — there is exactly one per [`Xdom`](super::Xdom).
    Document,

    /// A paragraph of inline content.
    Paragraph,

    /// A standalone group, used to wrap content without any output semantics
    /// of its own (e.g., the body produced by a macro).
    Group,

    /// A single word.
    Word {
        /// The word text, without surrounding whitespace.
        word: String,
    },

    /// A whitespace separator between inline blocks.
    Space,

    /// A line break inside a paragraph.
    NewLine,

    /// A single non-alphanumeric symbol, e.g., `!` or `€`.
    SpecialSymbol {
        /// The symbol character.
        symbol: char,
    },

    /// A section header.
    Header {
        /// The header level, 1 (largest) through 6.
        level: u8,
        /// A generated identifier usable as a link anchor, if one was assigned.
        id: Option<String>,
    },

    /// An inline formatting span (bold, italic, …) wrapping its children.
    Format {
        /// The formatting applied to the children.
        format: Format,
    },

    /// A link; the children are the label.
    Link {
        /// The link target.
        reference: ResourceReference,
        /// True when the link was written directly as a URI in the text,
        /// with no explicit label.
        freestanding: bool,
    },

    /// An image.
    Image {
        /// The image resource.
        reference: ResourceReference,
        /// True when the image was written directly as a URI in the text.
        freestanding: bool,
        /// A generated identifier for the image, if one was assigned.
        id: Option<String>,
    },

    /// An unexecuted macro invocation. The macro's parameters live in the
    /// block's parameter map; `content` is the raw body between the macro
    /// markers, if the macro has one.
    Macro {
        /// The macro name, e.g., `toc`.
        id: String,
        /// The raw macro body, if any.
        content: Option<String>,
        /// True when the macro appears inline in a paragraph rather than
        /// standalone.
        inline: bool,
    },

    /// Verbatim content rendered without any markup interpretation.
    Verbatim {
        /// The protected text.
        content: String,
        /// True when the verbatim span appears inline.
        inline: bool,
    },

    /// A metadata scope: attaches a key/value map visible to descendants via
    /// nearest-enclosing-scope lookup (see
    /// [`Xdom::syntax_metadata`](super::Xdom::syntax_metadata)).
    MetaData {
        /// The scoped metadata.
        metadata: MetaData,
    },
}

impl BlockKind {
    /// Returns the fieldless [`BlockType`] naming this variant.
    #[must_use]
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Document => BlockType::Document,
            Self::Paragraph => BlockType::Paragraph,
            Self::Group => BlockType::Group,
            Self::Word { .. } => BlockType::Word,
            Self::Space => BlockType::Space,
            Self::NewLine => BlockType::NewLine,
            Self::SpecialSymbol { .. } => BlockType::SpecialSymbol,
            Self::Header { .. } => BlockType::Header,
            Self::Format { .. } => BlockType::Format,
            Self::Link { .. } => BlockType::Link,
            Self::Image { .. } => BlockType::Image,
            Self::Macro { .. } => BlockType::Macro,
            Self::Verbatim { .. } => BlockType::Verbatim,
            Self::MetaData { .. } => BlockType::MetaData,
        }
    }

    /// Shorthand for a [`BlockKind::Word`] with the given text.
    pub fn word(word: impl Into<String>) -> Self {
        Self::Word { word: word.into() }
    }
}

/// The type of a block, without its payload.
///
/// Used by [`KindMatcher`](crate::query::matcher::KindMatcher) to select
/// blocks of a given variant regardless of payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    /// [`BlockKind::Document`].
    Document,
    /// [`BlockKind::Paragraph`].
    Paragraph,
    /// [`BlockKind::Group`].
    Group,
    /// [`BlockKind::Word`].
    Word,
    /// [`BlockKind::Space`].
    Space,
    /// [`BlockKind::NewLine`].
    NewLine,
    /// [`BlockKind::SpecialSymbol`].
    SpecialSymbol,
    /// [`BlockKind::Header`].
    Header,
    /// [`BlockKind::Format`].
    Format,
    /// [`BlockKind::Link`].
    Link,
    /// [`BlockKind::Image`].
    Image,
    /// [`BlockKind::Macro`].
    Macro,
    /// [`BlockKind::Verbatim`].
    Verbatim,
    /// [`BlockKind::MetaData`].
    MetaData,
}

/// An inline formatting style carried by [`BlockKind::Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Bold.
    Bold,
    /// Italic.
    Italic,
    /// Underlined.
    Underlined,
    /// Struck out.
    Strikedout,
    /// Superscript.
    Superscript,
    /// Subscript.
    Subscript,
    /// Monospace.
    Monospace,
    /// No styling of its own; used to carry parameters on a span.
    None,
}
