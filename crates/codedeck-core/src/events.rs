#![forbid(unsafe_code)]

//! Reactive event hubs for deck lifecycle and block content changes.
//!
//! # Design
//!
//! Both hubs are cheap-to-clone handles over `Rc<RefCell<..>>` shared
//! state. Listeners are invoked in registration order; a [`Subscription`]
//! unsubscribes on drop. Dispatch snapshots the listener list before
//! invoking anything, so listeners may subscribe or unsubscribe during a
//! notification without poisoning a borrow.
//!
//! # Invariants
//!
//! 1. Listeners fire in registration order within a scope ring.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    dispatch.
//! 3. [`ContentEvents::emit`] bubbles: block-scope listeners fire first,
//!    then the owning slide's, then document-scope listeners.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::block::{BlockId, SlideId};
use crate::document::Scope;

/// Payload of a slide-change notification.
///
/// Hosts may carry explicit previous/current references in the payload;
/// consumers fall back to the deck accessors when a side is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlideChange {
    /// Slide being left, if any.
    pub previous: Option<SlideId>,
    /// Slide being entered, if any.
    pub current: Option<SlideId>,
}

/// Payload of a bubbling block content-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentChange {
    /// Block whose editor content changed.
    pub block: BlockId,
    /// Latest full text of the editor.
    pub text: String,
}

/// RAII guard for an event listener. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Keep the listener registered for the rest of the hub's lifetime.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

type Token = u64;

// ─── Deck lifecycle events ───────────────────────────────────────────────────

#[derive(Default)]
struct DeckEventsInner {
    next_token: Token,
    ready: Vec<(Token, Rc<dyn Fn()>)>,
    slide_changed: Vec<(Token, Rc<dyn Fn(&SlideChange)>)>,
}

/// Hub for the host deck's `ready` and `slidechanged` notifications.
#[derive(Clone, Default)]
pub struct DeckEvents {
    inner: Rc<RefCell<DeckEventsInner>>,
}

impl DeckEvents {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the initial `ready` notification.
    pub fn on_ready(&self, listener: impl Fn() + 'static) -> Subscription {
        let token = self.next_token();
        self.inner
            .borrow_mut()
            .ready
            .push((token, Rc::new(listener)));
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().ready.retain(|(t, _)| *t != token);
            }
        })
    }

    /// Subscribe to slide-change notifications.
    pub fn on_slide_changed(&self, listener: impl Fn(&SlideChange) + 'static) -> Subscription {
        let token = self.next_token();
        self.inner
            .borrow_mut()
            .slide_changed
            .push((token, Rc::new(listener)));
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().slide_changed.retain(|(t, _)| *t != token);
            }
        })
    }

    /// Emit `ready` to all listeners.
    pub fn emit_ready(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self
            .inner
            .borrow()
            .ready
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Emit a slide-change to all listeners.
    pub fn emit_slide_changed(&self, change: &SlideChange) {
        let listeners: Vec<Rc<dyn Fn(&SlideChange)>> = self
            .inner
            .borrow()
            .slide_changed
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }

    fn next_token(&self) -> Token {
        let mut inner = self.inner.borrow_mut();
        inner.next_token += 1;
        inner.next_token
    }
}

impl std::fmt::Debug for DeckEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DeckEvents")
            .field("ready_listeners", &inner.ready.len())
            .field("slide_changed_listeners", &inner.slide_changed.len())
            .finish()
    }
}

// ─── Bubbling content-change events ──────────────────────────────────────────

struct ContentListener {
    token: Token,
    scope: Scope,
    listener: Rc<dyn Fn(&ContentChange)>,
}

#[derive(Default)]
struct ContentEventsInner {
    next_token: Token,
    listeners: Vec<ContentListener>,
}

/// Hub for bubbling block content-change notifications.
#[derive(Clone, Default)]
pub struct ContentEvents {
    inner: Rc<RefCell<ContentEventsInner>>,
}

impl ContentEvents {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe content changes at a scope: a single block, a slide's
    /// blocks, or every block in the document.
    pub fn observe(
        &self,
        scope: Scope,
        listener: impl Fn(&ContentChange) + 'static,
    ) -> Subscription {
        let token = {
            let mut inner = self.inner.borrow_mut();
            inner.next_token += 1;
            let token = inner.next_token;
            inner.listeners.push(ContentListener {
                token,
                scope,
                listener: Rc::new(listener),
            });
            token
        };
        let weak: Weak<RefCell<ContentEventsInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|l| l.token != token);
            }
        })
    }

    /// Dispatch a content change for a block owned by `owner`.
    ///
    /// Bubbling order: block scope, then the owning slide, then document
    /// scope; registration order within each ring.
    pub fn emit(&self, change: &ContentChange, owner: SlideId) {
        let snapshot: Vec<(Scope, Rc<dyn Fn(&ContentChange)>)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|l| (l.scope, Rc::clone(&l.listener)))
            .collect();

        let bubble = [Scope::Block(change.block), Scope::Slide(owner), Scope::Document];
        for ring in bubble {
            for (_, listener) in snapshot.iter().filter(|(scope, _)| *scope == ring) {
                listener(change);
            }
        }
    }
}

impl std::fmt::Debug for ContentEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentEvents")
            .field("listeners", &self.inner.borrow().listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn change(block: BlockId, text: &str) -> ContentChange {
        ContentChange {
            block,
            text: text.to_string(),
        }
    }

    #[test]
    fn ready_listeners_fire_in_registration_order() {
        let events = DeckEvents::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o1 = Rc::clone(&order);
        let _s1 = events.on_ready(move || o1.borrow_mut().push(1));
        let o2 = Rc::clone(&order);
        let _s2 = events.on_ready(move || o2.borrow_mut().push(2));

        events.emit_ready();
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let events = DeckEvents::new();
        let count = Rc::new(RefCell::new(0u32));

        let c = Rc::clone(&count);
        let sub = events.on_ready(move || *c.borrow_mut() += 1);
        events.emit_ready();
        drop(sub);
        events.emit_ready();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn detach_keeps_listener_alive() {
        let events = DeckEvents::new();
        let count = Rc::new(RefCell::new(0u32));

        let c = Rc::clone(&count);
        events.on_ready(move || *c.borrow_mut() += 1).detach();
        events.emit_ready();
        events.emit_ready();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn slide_change_payload_reaches_listeners() {
        let events = DeckEvents::new();
        let seen = Rc::new(RefCell::new(None));

        let s = Rc::clone(&seen);
        let _sub = events.on_slide_changed(move |c| *s.borrow_mut() = Some(*c));
        let change = SlideChange {
            previous: Some(SlideId::new(1)),
            current: Some(SlideId::new(2)),
        };
        events.emit_slide_changed(&change);
        assert_eq!(*seen.borrow(), Some(change));
    }

    #[test]
    fn subscribing_during_dispatch_does_not_panic() {
        let events = DeckEvents::new();
        let events_again = events.clone();
        let late = Rc::new(RefCell::new(Vec::new()));

        let l = Rc::clone(&late);
        let _sub = events.on_ready(move || {
            let l2 = Rc::clone(&l);
            events_again.on_ready(move || l2.borrow_mut().push(())).detach();
        });
        events.emit_ready();
        // The listener added mid-dispatch only fires on the next emit.
        assert!(late.borrow().is_empty());
        events.emit_ready();
        assert_eq!(late.borrow().len(), 1);
    }

    #[test]
    fn content_change_bubbles_block_then_slide_then_document() {
        let events = ContentEvents::new();
        let slide = SlideId::new(7);
        let block = BlockId::new(42);
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = Rc::clone(&order);
        let _doc = events.observe(Scope::Document, move |_| o.borrow_mut().push("document"));
        let o = Rc::clone(&order);
        let _blk = events.observe(Scope::Block(block), move |_| o.borrow_mut().push("block"));
        let o = Rc::clone(&order);
        let _sld = events.observe(Scope::Slide(slide), move |_| o.borrow_mut().push("slide"));

        events.emit(&change(block, "text"), slide);
        assert_eq!(*order.borrow(), vec!["block", "slide", "document"]);
    }

    #[test]
    fn content_change_skips_unrelated_scopes() {
        let events = ContentEvents::new();
        let count = Rc::new(RefCell::new(0u32));

        let c = Rc::clone(&count);
        let _other_block = events.observe(Scope::Block(BlockId::new(1)), move |_| {
            *c.borrow_mut() += 1;
        });
        let c = Rc::clone(&count);
        let _other_slide = events.observe(Scope::Slide(SlideId::new(1)), move |_| {
            *c.borrow_mut() += 1;
        });

        events.emit(&change(BlockId::new(2), "text"), SlideId::new(2));
        assert_eq!(*count.borrow(), 0);
    }
}
