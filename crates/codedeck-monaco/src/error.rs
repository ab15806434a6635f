#![forbid(unsafe_code)]

//! Binder error types.

use codedeck_core::SelectorError;
use thiserror::Error;

use crate::runtime::RuntimeLoadError;

/// Fatal binder initialization errors.
///
/// The only fatal failures are configured-selector parse errors and
/// widget bootstrap failures; everything past initialization is either
/// trusted or handled locally (the double-bind guard).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BinderError {
    /// The configured block selector did not parse.
    #[error("invalid block selector `{selector}`: {source}")]
    InvalidSelector {
        /// The selector as configured.
        selector: String,
        /// Parse failure detail.
        source: SelectorError,
    },

    /// The widget runtime failed to become available.
    #[error("editor runtime failed to load: {0}")]
    RuntimeLoad(#[from] RuntimeLoadError),
}
