//! Assembly options

use serde::{Deserialize, Serialize};

/// Options controlling how named exports are wired into the host environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Name of a host object to attach named exports to. When set, an export
    /// `A` of module `0` is wired as `target["A"] = require(0);`. When unset
    /// (or empty), exports are plain variables instead: `var A;` hoisted to
    /// the top of the wrapper, then `A = require(0);`.
    pub globalize: Option<String>,
}

impl Options {
    /// Create options with default settings.
    pub fn new() -> Self {
        Options::default()
    }

    /// Attach named exports to properties of `target` instead of variables.
    #[must_use]
    pub fn globalize(mut self, target: impl Into<String>) -> Self {
        self.globalize = Some(target.into());
        self
    }

    /// The effective globalize target. An empty string means the caller
    /// passed a value through from an unset setting, so it counts as absent.
    pub fn globalize_target(&self) -> Option<&str> {
        self.globalize.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_globalize_counts_as_absent() {
        assert_eq!(Options::new().globalize_target(), None);
        assert_eq!(Options::new().globalize("").globalize_target(), None);
        assert_eq!(
            Options::new().globalize("window").globalize_target(),
            Some("window")
        );
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(options, Options::default());

        let options: Options = serde_json::from_str(r#"{"globalize": "this"}"#).unwrap();
        assert_eq!(options.globalize_target(), Some("this"));
    }
}
