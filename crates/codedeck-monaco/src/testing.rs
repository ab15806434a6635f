#![forbid(unsafe_code)]

//! Deterministic in-process fakes for the host deck and the widget.
//!
//! Everything here is single-threaded and records what the binder did:
//! requested resources, applied themes, creation specs, typed text, and
//! disposals. Intended for this crate's tests and for downstream crates
//! exercising binder-driven flows without a real host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use codedeck_core::{BlockId, CodeBlock, DeckDocument, DeckEvents, SlideChange, SlideId};

use crate::host::DeckHost;
use crate::options::BinderOverrides;
use crate::runtime::{
    EditorInstance, EditorRuntime, EditorSpec, MonacoLoader, RuntimeLoadError,
};

// ─── ScriptedDeck ────────────────────────────────────────────────────────────

/// A scriptable host deck: owns a document and fires lifecycle events on
/// demand.
pub struct ScriptedDeck {
    document: Rc<RefCell<DeckDocument>>,
    events: DeckEvents,
    current: Cell<Option<SlideId>>,
    previous: Cell<Option<SlideId>>,
    print_view: Cell<bool>,
    config: RefCell<Option<BinderOverrides>>,
}

impl ScriptedDeck {
    /// Empty deck with default binder configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: Rc::new(RefCell::new(DeckDocument::new())),
            events: DeckEvents::new(),
            current: Cell::new(None),
            previous: Cell::new(None),
            print_view: Cell::new(false),
            config: RefCell::new(None),
        }
    }

    /// Empty deck carrying binder overrides.
    #[must_use]
    pub fn with_config(config: BinderOverrides) -> Self {
        let deck = Self::new();
        *deck.config.borrow_mut() = Some(config);
        deck
    }

    /// Toggle print/export mode.
    pub fn set_print_view(&self, print_view: bool) {
        self.print_view.set(print_view);
    }

    /// Append a slide.
    pub fn add_slide(&self) -> SlideId {
        self.document.borrow_mut().add_slide()
    }

    /// Append a block to a slide.
    ///
    /// # Panics
    ///
    /// Panics if the slide is unknown (scripts build their own slides).
    pub fn add_block(&self, slide: SlideId, block: CodeBlock) -> BlockId {
        self.document
            .borrow_mut()
            .add_block(slide, block)
            .expect("slide was added to this deck")
    }

    /// Set the current slide without emitting a notification.
    pub fn set_current(&self, slide: SlideId) {
        self.current.set(Some(slide));
    }

    /// Emit the initial `ready` notification.
    pub fn fire_ready(&self) {
        self.events.emit_ready();
    }

    /// Navigate: shift current to previous, make `slide` current, and
    /// emit a slide-change carrying both references.
    pub fn navigate_to(&self, slide: SlideId) {
        self.previous.set(self.current.get());
        self.current.set(Some(slide));
        self.events.emit_slide_changed(&SlideChange {
            previous: self.previous.get(),
            current: self.current.get(),
        });
    }

    /// Emit a raw slide-change without touching deck state. For testing
    /// payload fallback and misbehaving-host cases.
    pub fn emit_slide_change(&self, change: SlideChange) {
        self.events.emit_slide_changed(&change);
    }
}

impl Default for ScriptedDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckHost for ScriptedDeck {
    fn binder_config(&self) -> Option<BinderOverrides> {
        self.config.borrow().clone()
    }

    fn document(&self) -> Rc<RefCell<DeckDocument>> {
        Rc::clone(&self.document)
    }

    fn current_slide(&self) -> Option<SlideId> {
        self.current.get()
    }

    fn previous_slide(&self) -> Option<SlideId> {
        self.previous.get()
    }

    fn is_print_view(&self) -> bool {
        self.print_view.get()
    }

    fn events(&self) -> DeckEvents {
        self.events.clone()
    }
}

// ─── FakeLoader ──────────────────────────────────────────────────────────────

/// Records bootstrap requests; either stage can be scripted to fail.
pub struct FakeLoader {
    runtime: Rc<FakeRuntime>,
    requests: RefCell<Vec<String>>,
    fail_shim: bool,
    fail_module: bool,
}

impl FakeLoader {
    /// A loader whose stages both succeed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime: Rc::new(FakeRuntime::new()),
            requests: RefCell::new(Vec::new()),
            fail_shim: false,
            fail_module: false,
        }
    }

    /// A loader whose first stage fails.
    #[must_use]
    pub fn failing_shim() -> Self {
        Self {
            fail_shim: true,
            ..Self::new()
        }
    }

    /// A loader whose second stage fails.
    #[must_use]
    pub fn failing_module() -> Self {
        Self {
            fail_module: true,
            ..Self::new()
        }
    }

    /// The runtime this loader hands out.
    #[must_use]
    pub fn runtime(&self) -> Rc<FakeRuntime> {
        Rc::clone(&self.runtime)
    }

    /// Resources requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Default for FakeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MonacoLoader for FakeLoader {
    fn load_amd_shim(&mut self, url: &str) -> Result<(), RuntimeLoadError> {
        self.requests.borrow_mut().push(url.to_string());
        if self.fail_shim {
            Err(RuntimeLoadError::new(url, "script load failed"))
        } else {
            Ok(())
        }
    }

    fn load_editor_module(
        &mut self,
        module: &str,
    ) -> Result<Rc<dyn EditorRuntime>, RuntimeLoadError> {
        self.requests.borrow_mut().push(module.to_string());
        if self.fail_module {
            Err(RuntimeLoadError::new(module, "module resolution failed"))
        } else {
            Ok(Rc::clone(&self.runtime) as Rc<dyn EditorRuntime>)
        }
    }
}

// ─── FakeRuntime / FakeEditor ────────────────────────────────────────────────

struct FakeEditorState {
    value: String,
    disposed: bool,
    listener: Option<Rc<dyn Fn(&str)>>,
}

struct Creation {
    block: BlockId,
    spec: EditorSpec,
    state: Rc<RefCell<FakeEditorState>>,
}

/// Records themes and editor creations; hands out inspectable editors.
#[derive(Default)]
pub struct FakeRuntime {
    themes: RefCell<Vec<String>>,
    creations: RefCell<Vec<Creation>>,
}

impl FakeRuntime {
    /// Empty runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Themes applied so far, in order.
    #[must_use]
    pub fn themes(&self) -> Vec<String> {
        self.themes.borrow().clone()
    }

    /// Total editors created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.creations.borrow().len()
    }

    /// How many editors were created for one block.
    #[must_use]
    pub fn creations_for(&self, block: BlockId) -> usize {
        self.creations
            .borrow()
            .iter()
            .filter(|c| c.block == block)
            .count()
    }

    /// The [`EditorSpec`] of the most recent creation for a block.
    #[must_use]
    pub fn last_spec_for(&self, block: BlockId) -> Option<EditorSpec> {
        self.creations
            .borrow()
            .iter()
            .rev()
            .find(|c| c.block == block)
            .map(|c| c.spec.clone())
    }

    /// Handle to the most recently created editor for a block.
    #[must_use]
    pub fn editor(&self, block: BlockId) -> Option<FakeEditorHandle> {
        self.creations
            .borrow()
            .iter()
            .rev()
            .find(|c| c.block == block)
            .map(|c| FakeEditorHandle {
                state: Rc::clone(&c.state),
            })
    }
}

impl EditorRuntime for FakeRuntime {
    fn set_theme(&self, theme: &str) {
        self.themes.borrow_mut().push(theme.to_string());
    }

    fn create(&self, block: BlockId, spec: EditorSpec) -> Box<dyn EditorInstance> {
        let state = Rc::new(RefCell::new(FakeEditorState {
            value: spec.text.clone(),
            disposed: false,
            listener: None,
        }));
        self.creations.borrow_mut().push(Creation {
            block,
            spec,
            state: Rc::clone(&state),
        });
        Box::new(FakeEditor { state })
    }
}

struct FakeEditor {
    state: Rc<RefCell<FakeEditorState>>,
}

impl EditorInstance for FakeEditor {
    fn contents(&self) -> String {
        self.state.borrow().value.clone()
    }

    fn on_contents_changed(&mut self, listener: Box<dyn Fn(&str)>) {
        self.state.borrow_mut().listener = Some(Rc::from(listener));
    }

    fn dispose(self: Box<Self>) {
        let mut state = self.state.borrow_mut();
        state.disposed = true;
        state.listener = None;
    }
}

/// Inspection/typing handle to a fake editor, valid past disposal.
pub struct FakeEditorHandle {
    state: Rc<RefCell<FakeEditorState>>,
}

impl FakeEditorHandle {
    /// Replace the buffer, firing the content-change listener.
    pub fn replace_text(&self, text: &str) {
        let listener = {
            let mut state = self.state.borrow_mut();
            state.value = text.to_string();
            state.listener.clone()
        };
        if let Some(listener) = listener {
            listener(text);
        }
    }

    /// Current buffer.
    #[must_use]
    pub fn text(&self) -> String {
        self.state.borrow().value.clone()
    }

    /// Whether the editor was disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }
}
