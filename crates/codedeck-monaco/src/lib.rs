#![forbid(unsafe_code)]

//! Slide-driven code-editor binding for presentation decks.
//!
//! As the host deck navigates, the [`EditorBinder`] tears down editors on
//! the slide being left (capturing their text back into the blocks) and
//! creates editors on the slide being entered (seeded from the captured
//! text or the original markup). The host deck and the editor widget are
//! consumed through the [`DeckHost`], [`MonacoLoader`], and
//! [`EditorRuntime`] seams; deterministic fakes for all three live in
//! [`testing`] behind the `test-helpers` feature.

pub mod binder;
pub mod error;
pub mod host;
pub mod options;
pub mod runtime;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use binder::EditorBinder;
pub use error::BinderError;
pub use host::DeckHost;
pub use options::{BinderOptions, BinderOverrides, EditorOptions, OptionValue};
pub use runtime::{
    EditorInstance, EditorRuntime, EditorSpec, MonacoLoader, RuntimeLoadError,
};
