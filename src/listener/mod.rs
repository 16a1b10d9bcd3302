//! Listener-based event projection.
//!
//! [`traverse`] turns a subtree into an ordered sequence of callbacks on a
//! [`Listener`] — the push-based protocol renderers consume. No intermediate
//! event sequence is materialized: the traversal walks the tree depth-first
//! and calls straight into the listener, so rendering a large document costs
//! no more memory than the output itself.
//!
//! Container blocks (document, paragraph, group, header, format, link,
//! metadata scope) produce a `begin_*`/`end_*` pair around their children's
//! events; leaf blocks (word, space, symbols, image, macro, verbatim)
//! produce a single `on_*` event carrying their payload.
//!
//! Every callback returns `Result`; a listener stops the traversal early by
//! returning an error, which [`traverse`] propagates unmodified. The
//! traversal itself is read-only and never recovers or retries.
//!
//! # Examples
//!
//! ```
//! use wikidom::listener::{traverse, Listener};
//! use wikidom::tree::{BlockKind, Xdom};
//!
//! struct WordCounter {
//!     words: usize,
//! }
//!
//! impl Listener for WordCounter {
//!     type Error = std::convert::Infallible;
//!
//!     fn on_word(&mut self, _word: &str) -> Result<(), Self::Error> {
//!         self.words += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut dom = Xdom::new();
//! let root = dom.root();
//! let para = dom.create_block(BlockKind::Paragraph);
//! let hello = dom.create_block(BlockKind::word("hello"));
//! let world = dom.create_block(BlockKind::word("world"));
//! dom.add_child(root, para).unwrap();
//! dom.add_children(para, &[hello, world]).unwrap();
//!
//! let mut counter = WordCounter { words: 0 };
//! traverse(&dom, root, &mut counter).unwrap();
//! assert_eq!(counter.words, 2);
//! ```

pub mod reference;

use crate::syntax::MetaData;
use crate::tree::{BlockId, BlockKind, Format, Xdom};
use reference::ResourceReference;
use std::collections::HashMap;

/// Renderer-visible block parameters, as passed to listener callbacks.
pub type Parameters = HashMap<String, String>;

/// The rendering event protocol.
///
/// Implement the callbacks you care about; all methods have default no-op
/// implementations. `Error` is whatever failure type the consumer wants to
/// abort with; listeners that never fail can use
/// [`std::convert::Infallible`].
#[allow(unused_variables)]
pub trait Listener {
    /// The listener's failure type, propagated out of [`traverse`].
    type Error;

    /// Start of the document root.
    fn begin_document(&mut self, parameters: &Parameters) -> Result<(), Self::Error> {
        Ok(())
    }

    /// End of the document root.
    fn end_document(&mut self, parameters: &Parameters) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Start of a paragraph.
    fn begin_paragraph(&mut self, parameters: &Parameters) -> Result<(), Self::Error> {
        Ok(())
    }

    /// End of a paragraph.
    fn end_paragraph(&mut self, parameters: &Parameters) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Start of a standalone group.
    fn begin_group(&mut self, parameters: &Parameters) -> Result<(), Self::Error> {
        Ok(())
    }

    /// End of a standalone group.
    fn end_group(&mut self, parameters: &Parameters) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Start of a section header.
    fn begin_header(
        &mut self,
        level: u8,
        id: Option<&str>,
        parameters: &Parameters,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// End of a section header.
    fn end_header(
        &mut self,
        level: u8,
        id: Option<&str>,
        parameters: &Parameters,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Start of a formatting span.
    fn begin_format(&mut self, format: Format, parameters: &Parameters) -> Result<(), Self::Error> {
        Ok(())
    }

    /// End of a formatting span.
    fn end_format(&mut self, format: Format, parameters: &Parameters) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Start of a link; the enclosed events are the label.
    fn begin_link(
        &mut self,
        reference: &ResourceReference,
        freestanding: bool,
        parameters: &Parameters,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// End of a link.
    fn end_link(
        &mut self,
        reference: &ResourceReference,
        freestanding: bool,
        parameters: &Parameters,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Start of a metadata scope.
    fn begin_metadata(&mut self, metadata: &MetaData) -> Result<(), Self::Error> {
        Ok(())
    }

    /// End of a metadata scope.
    fn end_metadata(&mut self, metadata: &MetaData) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A single word.
    fn on_word(&mut self, word: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A whitespace separator.
    fn on_space(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A line break.
    fn on_new_line(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A non-alphanumeric symbol.
    fn on_special_symbol(&mut self, symbol: char) -> Result<(), Self::Error> {
        Ok(())
    }

    /// An image.
    fn on_image(
        &mut self,
        reference: &ResourceReference,
        freestanding: bool,
        id: Option<&str>,
        parameters: &Parameters,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// An unexecuted macro invocation.
    fn on_macro(
        &mut self,
        id: &str,
        parameters: &Parameters,
        content: Option<&str>,
        inline: bool,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Verbatim content.
    fn on_verbatim(
        &mut self,
        content: &str,
        inline: bool,
        parameters: &Parameters,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A no-op listener. Useful as a placeholder or a test double.
pub struct VoidListener;

impl Listener for VoidListener {
    type Error = std::convert::Infallible;
}

/// Sends the events for the subtree rooted at `block` to `listener`:
/// depth-first, pre-order, begin event → children in document order →
/// matching end event. Leaf variants emit their single `on_*` event before
/// their (normally absent) children are visited.
///
/// # Errors
///
/// Returns the first error a callback returns, unmodified. The tree is never
/// mutated, so an aborted traversal has no cleanup to do.
pub fn traverse<L: Listener>(
    dom: &Xdom,
    block: BlockId,
    listener: &mut L,
) -> Result<(), L::Error> {
    let data = dom.block(block);
    match &data.kind {
        BlockKind::Document => listener.begin_document(&data.parameters)?,
        BlockKind::Paragraph => listener.begin_paragraph(&data.parameters)?,
        BlockKind::Group => listener.begin_group(&data.parameters)?,
        BlockKind::Header { level, id } => {
            listener.begin_header(*level, id.as_deref(), &data.parameters)?;
        }
        BlockKind::Format { format } => listener.begin_format(*format, &data.parameters)?,
        BlockKind::Link {
            reference,
            freestanding,
        } => listener.begin_link(reference, *freestanding, &data.parameters)?,
        BlockKind::MetaData { metadata } => listener.begin_metadata(metadata)?,
        BlockKind::Word { word } => listener.on_word(word)?,
        BlockKind::Space => listener.on_space()?,
        BlockKind::NewLine => listener.on_new_line()?,
        BlockKind::SpecialSymbol { symbol } => listener.on_special_symbol(*symbol)?,
        BlockKind::Image {
            reference,
            freestanding,
            id,
        } => listener.on_image(reference, *freestanding, id.as_deref(), &data.parameters)?,
        BlockKind::Macro {
            id,
            content,
            inline,
        } => listener.on_macro(id, &data.parameters, content.as_deref(), *inline)?,
        BlockKind::Verbatim { content, inline } => {
            listener.on_verbatim(content, *inline, &data.parameters)?;
        }
    }

    for child in dom.children(block) {
        traverse(dom, child, listener)?;
    }

    let data = dom.block(block);
    match &data.kind {
        BlockKind::Document => listener.end_document(&data.parameters)?,
        BlockKind::Paragraph => listener.end_paragraph(&data.parameters)?,
        BlockKind::Group => listener.end_group(&data.parameters)?,
        BlockKind::Header { level, id } => {
            listener.end_header(*level, id.as_deref(), &data.parameters)?;
        }
        BlockKind::Format { format } => listener.end_format(*format, &data.parameters)?,
        BlockKind::Link {
            reference,
            freestanding,
        } => listener.end_link(reference, *freestanding, &data.parameters)?,
        BlockKind::MetaData { metadata } => listener.end_metadata(metadata)?,
        // Leaf variants have no end event.
        BlockKind::Word { .. }
        | BlockKind::Space
        | BlockKind::NewLine
        | BlockKind::SpecialSymbol { .. }
        | BlockKind::Image { .. }
        | BlockKind::Macro { .. }
        | BlockKind::Verbatim { .. } => {}
    }

    Ok(())
}
