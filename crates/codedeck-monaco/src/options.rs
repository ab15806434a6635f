#![forbid(unsafe_code)]

//! Binder configuration: defaults, host-provided overrides, and the
//! opaque editor-option bag forwarded verbatim to widget creation.

use ahash::AHashMap;

/// Default location the widget runtime is fetched from.
pub const DEFAULT_BASE_URL: &str = "https://cdn.jsdelivr.net/npm/monaco-editor@0.33.0";

/// Default selector naming editable blocks.
pub const DEFAULT_SELECTOR: &str = "code.monaco";

/// Default language for blocks without an explicit attribute.
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Default editor theme, applied through the runtime's global setter.
pub const DEFAULT_THEME: &str = "vs-dark";

/// Fully-resolved binder configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinderOptions {
    /// Where the widget runtime is fetched from.
    pub base_url: String,
    /// Which blocks are treated as editable.
    pub selector: String,
    /// Language used when a block specifies none.
    pub default_language: String,
    /// Editor theme.
    pub theme: String,
    /// Gates diagnostic navigation logging.
    pub debug: bool,
    /// Opaque pass-through bag forwarded to widget creation.
    pub editor_options: EditorOptions,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            selector: DEFAULT_SELECTOR.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            theme: DEFAULT_THEME.to_string(),
            debug: false,
            editor_options: EditorOptions::new(),
        }
    }
}

impl BinderOptions {
    /// Overlay host-provided overrides on the defaults. Set fields win;
    /// unset fields keep their default.
    #[must_use]
    pub fn with_overrides(overrides: Option<BinderOverrides>) -> Self {
        let mut options = Self::default();
        if let Some(overrides) = overrides {
            options.apply(overrides);
        }
        options
    }

    /// Apply overrides in place.
    pub fn apply(&mut self, overrides: BinderOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(selector) = overrides.selector {
            self.selector = selector;
        }
        if let Some(default_language) = overrides.default_language {
            self.default_language = default_language;
        }
        if let Some(theme) = overrides.theme {
            self.theme = theme;
        }
        if let Some(debug) = overrides.debug {
            self.debug = debug;
        }
        if let Some(editor_options) = overrides.editor_options {
            self.editor_options = editor_options;
        }
    }
}

/// Partial counterpart of [`BinderOptions`], as a host supplies it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinderOverrides {
    /// Override the runtime location.
    pub base_url: Option<String>,
    /// Override the block selector.
    pub selector: Option<String>,
    /// Override the fallback language.
    pub default_language: Option<String>,
    /// Override the theme.
    pub theme: Option<String>,
    /// Override diagnostic logging.
    pub debug: Option<bool>,
    /// Replace the pass-through bag.
    pub editor_options: Option<EditorOptions>,
}

/// A value in the pass-through bag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionValue {
    /// Boolean flag.
    Bool(bool),
    /// Numeric setting.
    Number(f64),
    /// Textual setting.
    Text(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Opaque, string-keyed editor options. The binder never interprets the
/// contents; they are handed to the widget as-is at creation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditorOptions {
    values: AHashMap<String, OptionValue>,
}

impl EditorOptions {
    /// Empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Option lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate options in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = BinderOptions::default();
        assert_eq!(options.base_url, DEFAULT_BASE_URL);
        assert_eq!(options.selector, "code.monaco");
        assert_eq!(options.default_language, "javascript");
        assert_eq!(options.theme, "vs-dark");
        assert!(!options.debug);
        assert!(options.editor_options.is_empty());
    }

    #[test]
    fn overrides_win_field_wise() {
        let overrides = BinderOverrides {
            selector: Some(".editable".to_string()),
            default_language: Some("python".to_string()),
            debug: Some(true),
            ..BinderOverrides::default()
        };
        let options = BinderOptions::with_overrides(Some(overrides));
        assert_eq!(options.selector, ".editable");
        assert_eq!(options.default_language, "python");
        assert!(options.debug);
        // Unset fields fall back to defaults.
        assert_eq!(options.base_url, DEFAULT_BASE_URL);
        assert_eq!(options.theme, DEFAULT_THEME);
    }

    #[test]
    fn no_overrides_yields_defaults() {
        assert_eq!(BinderOptions::with_overrides(None), BinderOptions::default());
    }

    #[test]
    fn editor_options_bag_round_trips_values() {
        let bag = EditorOptions::new()
            .with("minimap", false)
            .with("fontSize", 14)
            .with("wordWrap", "on");
        assert_eq!(bag.len(), 3);
        assert_eq!(bag.get("minimap"), Some(&OptionValue::Bool(false)));
        assert_eq!(bag.get("fontSize"), Some(&OptionValue::Number(14.0)));
        assert_eq!(
            bag.get("wordWrap"),
            Some(&OptionValue::Text("on".to_string()))
        );
        assert_eq!(bag.get("missing"), None);
    }

    #[test]
    fn editor_options_iter_visits_every_entry() {
        let bag = EditorOptions::new()
            .with("minimap", false)
            .with("fontSize", 14);
        let mut seen: Vec<&str> = bag.iter().map(|(name, _)| name).collect();
        seen.sort_unstable();
        assert_eq!(seen, ["fontSize", "minimap"]);
        assert!(
            bag.iter()
                .any(|(name, value)| name == "minimap" && *value == OptionValue::Bool(false))
        );
    }

    #[test]
    fn editor_options_override_replaces_whole_bag() {
        let overrides = BinderOverrides {
            editor_options: Some(EditorOptions::new().with("readOnly", true)),
            ..BinderOverrides::default()
        };
        let options = BinderOptions::with_overrides(Some(overrides));
        assert_eq!(options.editor_options.len(), 1);
        assert_eq!(
            options.editor_options.get("readOnly"),
            Some(&OptionValue::Bool(true))
        );
    }
}
