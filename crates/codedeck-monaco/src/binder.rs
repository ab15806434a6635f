#![forbid(unsafe_code)]

//! The slide editor binder: attach/detach state machine.
//!
//! # Design
//!
//! The binder owns the only mapping from blocks to live editors. It is a
//! cheap-to-clone handle over `Rc<RefCell<..>>` shared state; deck-event
//! listeners hold a `Weak` to that state so a dropped binder leaves no
//! callbacks behind.
//!
//! # Invariants
//!
//! 1. A block has a live editor iff its slide is current (print view:
//!    always, once bound at ready).
//! 2. At most one live editor per block. The entry path rejects an
//!    already-bound block with a diagnostic; it never replaces or
//!    disposes the existing editor.
//! 3. Disposal always precedes re-initialization: the exit sweep runs
//!    before the entry path within one slide-change notification.
//! 4. No editor is created before both widget bootstrap stages complete.
//!
//! # Failure Modes
//!
//! - **Bootstrap failure**: [`EditorBinder::init`] returns the error;
//!   nothing is subscribed, no editor is ever created.
//! - **Double bind**: skipped, logged, counted. Dispose/create/query are
//!   trusted to succeed; there is no retry or partial-failure recovery.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;
use codedeck_core::{
    BlockId, ContentChange, Scope, Selector, SlideChange, SlideId, Subscription,
};
use tracing::{debug, warn};

use crate::error::BinderError;
use crate::host::DeckHost;
use crate::options::BinderOptions;
use crate::runtime::{
    AMD_SHIM_PATH, EDITOR_MODULE, EditorInstance, EditorRuntime, EditorSpec, MonacoLoader,
};

struct BoundEditor {
    editor: Box<dyn EditorInstance>,
    slide: SlideId,
}

struct BinderInner {
    deck: Rc<dyn DeckHost>,
    runtime: Rc<dyn EditorRuntime>,
    options: BinderOptions,
    selector: Selector,
    editors: AHashMap<BlockId, BoundEditor>,
    double_binds: u64,
    /// Deck-event listeners kept alive for the binder's lifetime.
    _subscriptions: Vec<Subscription>,
}

/// Binds code editors to the active slide's blocks as the deck navigates.
///
/// Cloning yields another handle to the same binder.
#[derive(Clone)]
pub struct EditorBinder {
    inner: Rc<RefCell<BinderInner>>,
}

impl EditorBinder {
    /// Initialize the binder against a host deck.
    ///
    /// Merges host configuration over the defaults, parses the block
    /// selector, runs both widget bootstrap stages in order, and
    /// subscribes to the deck's `ready` notification. Bootstrap failure
    /// is fatal and propagated; no slide handling is registered in that
    /// case.
    pub fn init(
        deck: Rc<dyn DeckHost>,
        loader: &mut dyn MonacoLoader,
    ) -> Result<Self, BinderError> {
        let options = BinderOptions::with_overrides(deck.binder_config());
        let selector =
            Selector::parse(&options.selector).map_err(|source| BinderError::InvalidSelector {
                selector: options.selector.clone(),
                source,
            })?;

        let shim_url = format!("{}/{}", options.base_url.trim_end_matches('/'), AMD_SHIM_PATH);
        loader.load_amd_shim(&shim_url)?;
        let runtime = loader.load_editor_module(EDITOR_MODULE)?;
        debug!(base_url = %options.base_url, "editor runtime loaded");

        let events = deck.events();
        let binder = Self {
            inner: Rc::new(RefCell::new(BinderInner {
                deck,
                runtime,
                options,
                selector,
                editors: AHashMap::new(),
                double_binds: 0,
                _subscriptions: Vec::new(),
            })),
        };

        let weak = Rc::downgrade(&binder.inner);
        let ready = events.on_ready(move || {
            if let Some(inner) = weak.upgrade() {
                EditorBinder { inner }.on_ready();
            }
        });
        binder.inner.borrow_mut()._subscriptions.push(ready);
        Ok(binder)
    }

    // ── Notification handlers ────────────────────────────────────────

    fn on_ready(&self) {
        let deck = Rc::clone(&self.inner.borrow().deck);
        if deck.is_print_view() {
            // Full-document export: bind everything, never tear down.
            self.bind_scope(Scope::Document);
            return;
        }

        if let Some(current) = deck.current_slide() {
            self.bind_scope(Scope::Slide(current));
        }

        let weak = Rc::downgrade(&self.inner);
        let sub = deck.events().on_slide_changed(move |change| {
            if let Some(inner) = weak.upgrade() {
                EditorBinder { inner }.on_slide_changed(change);
            }
        });
        self.inner.borrow_mut()._subscriptions.push(sub);
    }

    fn on_slide_changed(&self, change: &SlideChange) {
        let (deck, log) = {
            let inner = self.inner.borrow();
            (Rc::clone(&inner.deck), inner.options.debug)
        };
        let current = change.current.or_else(|| deck.current_slide());
        let previous = change.previous.or_else(|| deck.previous_slide());
        if log {
            debug!(
                previous = ?previous.map(SlideId::get),
                current = ?current.map(SlideId::get),
                "slide change"
            );
        }

        // Exit sweep: release every slide that still holds editors and is
        // not the one being entered. A superset of the reported previous
        // slide, so skipped notifications cannot leak editors.
        let mut stale: Vec<SlideId> = self
            .inner
            .borrow()
            .editors
            .values()
            .map(|bound| bound.slide)
            .filter(|slide| Some(*slide) != current)
            .collect();
        stale.sort_unstable();
        stale.dedup();
        for slide in stale {
            self.release_slide(slide);
        }

        if let Some(current) = current {
            self.bind_scope(Scope::Slide(current));
        }
    }

    // ── Entry path ───────────────────────────────────────────────────

    fn bind_scope(&self, scope: Scope) {
        let (doc, selector) = {
            let inner = self.inner.borrow();
            (inner.deck.document(), inner.selector.clone())
        };
        let blocks = doc.borrow().query(scope, &selector);
        for block in blocks {
            self.bind_block(block);
        }
    }

    fn bind_block(&self, id: BlockId) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.editors.contains_key(&id) {
                inner.double_binds += 1;
                warn!(block = id.get(), "tried to initialize an already-bound block");
                return;
            }
        }

        let (deck, runtime, default_language, theme, editor_options) = {
            let inner = self.inner.borrow();
            (
                Rc::clone(&inner.deck),
                Rc::clone(&inner.runtime),
                inner.options.default_language.clone(),
                inner.options.theme.clone(),
                inner.options.editor_options.clone(),
            )
        };

        let doc = deck.document();
        let (seed, language, owner, events) = {
            let mut doc = doc.borrow_mut();
            let Some(owner) = doc.slide_of(id) else {
                warn!(block = id.get(), "cannot bind block without an owning slide");
                return;
            };
            let events = doc.content_events();
            let Some(block) = doc.block_mut(id) else {
                warn!(block = id.get(), "cannot bind unknown block");
                return;
            };
            let seed = block.source_text().trim_start().to_string();
            let language = block
                .language_attribute()
                .map_or(default_language, str::to_string);
            block.clear_content();
            (seed, language, owner, events)
        };

        runtime.set_theme(&theme);
        let mut editor = runtime.create(
            id,
            EditorSpec {
                text: seed,
                language,
                options: editor_options,
            },
        );

        let relay = events.clone();
        editor.on_contents_changed(Box::new(move |text| {
            relay.emit(
                &ContentChange {
                    block: id,
                    text: text.to_string(),
                },
                owner,
            );
        }));

        let initial = editor.contents();
        self.inner
            .borrow_mut()
            .editors
            .insert(id, BoundEditor { editor, slide: owner });

        // Observers see the initial content without needing an edit.
        events.emit(
            &ContentChange {
                block: id,
                text: initial,
            },
            owner,
        );
    }

    // ── Exit path ────────────────────────────────────────────────────

    fn release_slide(&self, slide: SlideId) {
        let bound: Vec<BlockId> = self
            .inner
            .borrow()
            .editors
            .iter()
            .filter(|(_, b)| b.slide == slide)
            .map(|(id, _)| *id)
            .collect();
        for id in bound {
            self.unbind_block(id);
        }
    }

    fn unbind_block(&self, id: BlockId) {
        let (bound, deck) = {
            let mut inner = self.inner.borrow_mut();
            let Some(bound) = inner.editors.remove(&id) else {
                return;
            };
            (bound, Rc::clone(&inner.deck))
        };

        let text = bound.editor.contents().trim_start().to_string();
        bound.editor.dispose();

        let doc = deck.document();
        let mut doc = doc.borrow_mut();
        if let Some(block) = doc.block_mut(id) {
            block.set_template(text);
        }
    }

    // ── On-demand entry/exit ─────────────────────────────────────────

    /// Run the entry path against the deck's current slide.
    pub fn bind_current_slide(&self) {
        let deck = Rc::clone(&self.inner.borrow().deck);
        if let Some(current) = deck.current_slide() {
            self.bind_scope(Scope::Slide(current));
        }
    }

    /// Run the exit path against the deck's current slide.
    pub fn release_current_slide(&self) {
        let deck = Rc::clone(&self.inner.borrow().deck);
        if let Some(current) = deck.current_slide() {
            self.release_slide(current);
        }
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Whether a block currently has a live editor.
    #[must_use]
    pub fn is_bound(&self, block: BlockId) -> bool {
        self.inner.borrow().editors.contains_key(&block)
    }

    /// Number of live editors.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.inner.borrow().editors.len()
    }

    /// Blocks with live editors, in arbitrary order.
    #[must_use]
    pub fn bound_blocks(&self) -> Vec<BlockId> {
        self.inner.borrow().editors.keys().copied().collect()
    }

    /// How many double-initialization attempts were rejected.
    #[must_use]
    pub fn double_bind_count(&self) -> u64 {
        self.inner.borrow().double_binds
    }

    /// The merged configuration the binder runs with.
    #[must_use]
    pub fn options(&self) -> BinderOptions {
        self.inner.borrow().options.clone()
    }
}

impl std::fmt::Debug for EditorBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EditorBinder")
            .field("bound", &inner.editors.len())
            .field("double_binds", &inner.double_binds)
            .finish()
    }
}
