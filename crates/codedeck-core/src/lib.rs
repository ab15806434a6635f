#![forbid(unsafe_code)]

//! Core: deck document model, block selectors, and reactive deck events.
//!
//! A deck is an ordered list of slides; each slide owns editable code
//! blocks addressed by opaque [`BlockId`]s. Blocks carry markup-like
//! attributes, visible content, and an optional stored template text.
//! Event hubs ([`DeckEvents`], [`ContentEvents`]) provide single-threaded
//! subscription with RAII unsubscribe and bubbling content-change
//! dispatch.

pub mod block;
pub mod document;
pub mod events;
pub mod selector;

pub use block::{BlockId, CodeBlock, SlideId};
pub use document::{DeckDocument, Scope};
pub use events::{ContentChange, ContentEvents, DeckEvents, SlideChange, Subscription};
pub use selector::{Selector, SelectorError};
