#![forbid(unsafe_code)]

//! The deck document: ordered slides, block storage, and scoped queries.
//!
//! The document is the single owner of every [`CodeBlock`]. All outside
//! references go through [`BlockId`]/[`SlideId`] handles, so the document
//! can be shared behind `Rc<RefCell<..>>` by a host without handing out
//! aliasing references.

use ahash::AHashMap;
use tracing::warn;

use crate::block::{BlockId, CodeBlock, SlideId};
use crate::events::{ContentChange, ContentEvents};
use crate::selector::Selector;

/// A query/dispatch scope inside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every slide in the deck (the host's "slides element").
    Document,
    /// One slide's blocks.
    Slide(SlideId),
    /// A single block.
    Block(BlockId),
}

struct SlideEntry {
    id: SlideId,
    blocks: Vec<BlockId>,
}

/// The deck document model.
#[derive(Default)]
pub struct DeckDocument {
    slides: Vec<SlideEntry>,
    blocks: AHashMap<BlockId, CodeBlock>,
    owners: AHashMap<BlockId, SlideId>,
    next_slide: u32,
    next_block: u64,
    content_events: ContentEvents,
}

impl DeckDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide to the deck.
    pub fn add_slide(&mut self) -> SlideId {
        self.next_slide += 1;
        let id = SlideId::new(self.next_slide);
        self.slides.push(SlideEntry {
            id,
            blocks: Vec::new(),
        });
        id
    }

    /// Append a block to a slide. Returns `None` if the slide is unknown.
    pub fn add_block(&mut self, slide: SlideId, block: CodeBlock) -> Option<BlockId> {
        let entry = self.slides.iter_mut().find(|s| s.id == slide)?;
        self.next_block += 1;
        let id = BlockId::new(self.next_block);
        entry.blocks.push(id);
        self.blocks.insert(id, block);
        self.owners.insert(id, slide);
        Some(id)
    }

    /// Slide ids in deck order.
    pub fn slide_ids(&self) -> impl Iterator<Item = SlideId> + '_ {
        self.slides.iter().map(|s| s.id)
    }

    /// Number of slides.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Look up a block.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&CodeBlock> {
        self.blocks.get(&id)
    }

    /// Mutable block lookup.
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut CodeBlock> {
        self.blocks.get_mut(&id)
    }

    /// Slide owning a block.
    #[must_use]
    pub fn slide_of(&self, id: BlockId) -> Option<SlideId> {
        self.owners.get(&id).copied()
    }

    /// Blocks matching a selector within a scope, in document order.
    #[must_use]
    pub fn query(&self, scope: Scope, selector: &Selector) -> Vec<BlockId> {
        let candidates: Vec<BlockId> = match scope {
            Scope::Document => self
                .slides
                .iter()
                .flat_map(|s| s.blocks.iter().copied())
                .collect(),
            Scope::Slide(slide) => self
                .slides
                .iter()
                .find(|s| s.id == slide)
                .map(|s| s.blocks.clone())
                .unwrap_or_default(),
            Scope::Block(id) => vec![id],
        };
        candidates
            .into_iter()
            .filter(|id| self.blocks.get(id).is_some_and(|b| selector.matches(b)))
            .collect()
    }

    /// Handle to the bubbling content-change hub.
    #[must_use]
    pub fn content_events(&self) -> ContentEvents {
        self.content_events.clone()
    }

    /// Dispatch a content-change for a block, bubbling from the block to
    /// its slide to the document. Unknown blocks are dropped with a
    /// diagnostic.
    pub fn emit_content_change(&self, block: BlockId, text: impl Into<String>) {
        let Some(owner) = self.slide_of(block) else {
            warn!(block = block.get(), "content change for unknown block dropped");
            return;
        };
        self.content_events.emit(
            &ContentChange {
                block,
                text: text.into(),
            },
            owner,
        );
    }
}

impl std::fmt::Debug for DeckDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckDocument")
            .field("slides", &self.slides.len())
            .field("blocks", &self.blocks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn monaco_block(content: &str) -> CodeBlock {
        CodeBlock::new("code").class("monaco").content(content)
    }

    #[test]
    fn add_block_requires_known_slide() {
        let mut doc = DeckDocument::new();
        let slide = doc.add_slide();
        assert!(doc.add_block(slide, monaco_block("a")).is_some());
        assert!(doc.add_block(SlideId::new(999), monaco_block("b")).is_none());
    }

    #[test]
    fn query_document_scope_covers_all_slides_in_order() {
        let mut doc = DeckDocument::new();
        let s1 = doc.add_slide();
        let s2 = doc.add_slide();
        let b1 = doc.add_block(s1, monaco_block("one")).expect("block");
        let plain = doc
            .add_block(s1, CodeBlock::new("code").content("plain"))
            .expect("block");
        let b2 = doc.add_block(s2, monaco_block("two")).expect("block");

        let selector = Selector::parse("code.monaco").expect("selector");
        assert_eq!(doc.query(Scope::Document, &selector), vec![b1, b2]);
        assert_eq!(doc.query(Scope::Slide(s1), &selector), vec![b1]);
        assert_eq!(doc.query(Scope::Block(plain), &selector), Vec::new());
        assert_eq!(doc.query(Scope::Block(b2), &selector), vec![b2]);
    }

    #[test]
    fn query_unknown_slide_is_empty() {
        let doc = DeckDocument::new();
        let selector = Selector::parse("code").expect("selector");
        assert!(doc.query(Scope::Slide(SlideId::new(3)), &selector).is_empty());
    }

    #[test]
    fn slide_of_tracks_ownership() {
        let mut doc = DeckDocument::new();
        let s1 = doc.add_slide();
        let b1 = doc.add_block(s1, monaco_block("x")).expect("block");
        assert_eq!(doc.slide_of(b1), Some(s1));
        assert_eq!(doc.slide_of(BlockId::new(99)), None);
    }

    #[test]
    fn emit_content_change_bubbles_to_document_scope() {
        let mut doc = DeckDocument::new();
        let slide = doc.add_slide();
        let block = doc.add_block(slide, monaco_block("x")).expect("block");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = doc
            .content_events()
            .observe(Scope::Document, move |change| {
                s.borrow_mut().push((change.block, change.text.clone()));
            });

        doc.emit_content_change(block, "hello");
        assert_eq!(*seen.borrow(), vec![(block, "hello".to_string())]);
    }

    #[test]
    fn emit_content_change_unknown_block_is_dropped() {
        let doc = DeckDocument::new();
        let count = Rc::new(RefCell::new(0u32));
        let c = Rc::clone(&count);
        let _sub = doc
            .content_events()
            .observe(Scope::Document, move |_| *c.borrow_mut() += 1);
        doc.emit_content_change(BlockId::new(5), "ghost");
        assert_eq!(*count.borrow(), 0);
    }
}
