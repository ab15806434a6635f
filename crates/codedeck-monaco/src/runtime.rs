#![forbid(unsafe_code)]

//! The consumed editor-widget interface: bootstrap, creation, disposal.
//!
//! The runtime handle returned by the loader is stored on the binder and
//! threaded explicitly; nothing in this crate reaches for an ambient
//! global after load.

use std::rc::Rc;

use codedeck_core::BlockId;
use thiserror::Error;

use crate::options::EditorOptions;

/// Loader-relative path of the AMD shim fetched first.
pub const AMD_SHIM_PATH: &str = "min/vs/loader.js";

/// Module name of the editor main bundle loaded second.
pub const EDITOR_MODULE: &str = "vs/editor/editor.main";

/// A widget bootstrap stage failed. Fatal for binder initialization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load `{resource}`: {reason}")]
pub struct RuntimeLoadError {
    /// Resource that failed to load.
    pub resource: String,
    /// Loader-reported reason.
    pub reason: String,
}

impl RuntimeLoadError {
    /// Create a load error.
    pub fn new(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

/// Everything an editor is created with.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSpec {
    /// Seed text (already trimmed of leading whitespace).
    pub text: String,
    /// Language tag.
    pub language: String,
    /// Pass-through options, forwarded verbatim.
    pub options: EditorOptions,
}

/// A live editor instance bound to exactly one block.
pub trait EditorInstance {
    /// Current full text of the editor buffer.
    fn contents(&self) -> String;

    /// Register the content-change listener. Called with the latest full
    /// text after every edit. At most one listener is registered per
    /// instance.
    fn on_contents_changed(&mut self, listener: Box<dyn Fn(&str)>);

    /// Tear the widget down. The instance is gone afterwards.
    fn dispose(self: Box<Self>);
}

/// Handle to the loaded widget runtime.
pub trait EditorRuntime {
    /// Global theme setter.
    fn set_theme(&self, theme: &str);

    /// Create an editor inside a block's region.
    fn create(&self, block: BlockId, spec: EditorSpec) -> Box<dyn EditorInstance>;
}

/// Two-stage widget bootstrap. Both stages must complete, in order,
/// before any editor can be created; either failure aborts binder
/// initialization.
pub trait MonacoLoader {
    /// Fetch the AMD shim from `{base_url}/min/vs/loader.js`.
    fn load_amd_shim(&mut self, url: &str) -> Result<(), RuntimeLoadError>;

    /// Load the editor main module and hand back the runtime.
    fn load_editor_module(
        &mut self,
        module: &str,
    ) -> Result<Rc<dyn EditorRuntime>, RuntimeLoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_display_names_resource_and_reason() {
        let err = RuntimeLoadError::new("min/vs/loader.js", "network unreachable");
        assert_eq!(
            err.to_string(),
            "failed to load `min/vs/loader.js`: network unreachable"
        );
    }
}
