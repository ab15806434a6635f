#![forbid(unsafe_code)]

//! The consumed host-deck interface.

use std::cell::RefCell;
use std::rc::Rc;

use codedeck_core::{DeckDocument, DeckEvents, SlideId};

use crate::options::BinderOverrides;

/// What the binder needs from the presentation host.
///
/// The binder only ever consumes this trait; it never drives navigation.
/// All methods are called from the host's event loop, one callback at a
/// time.
pub trait DeckHost {
    /// Binder options namespaced inside the host configuration, if any.
    fn binder_config(&self) -> Option<BinderOverrides>;

    /// The deck's document model.
    fn document(&self) -> Rc<RefCell<DeckDocument>>;

    /// Currently active slide.
    fn current_slide(&self) -> Option<SlideId>;

    /// Slide active before the last navigation.
    fn previous_slide(&self) -> Option<SlideId>;

    /// Whether the deck is rendered as a non-interactive full-document
    /// export.
    fn is_print_view(&self) -> bool;

    /// The host's lifecycle notification hub.
    fn events(&self) -> DeckEvents;
}
