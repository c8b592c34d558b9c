//! Binder options.

use csz_common::limits::MAX_EXPR_BIND_DEPTH;
use serde::{Deserialize, Serialize};

/// Options that stay fixed for the lifetime of a [`crate::Binder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BinderOptions {
    /// Checked arithmetic context for constant conversions.
    pub checked: bool,
    /// Compilation-wide permission to use pointer types.
    pub allow_unsafe: bool,
    /// Emit the unimported-namespace hint for well-known extension methods.
    pub report_suggestions: bool,
    pub max_expression_depth: u32,
    /// Report array initializers whose length differs from a constant size.
    pub strict_array_initializer_lengths: bool,
}

impl Default for BinderOptions {
    fn default() -> Self {
        BinderOptions {
            checked: false,
            allow_unsafe: false,
            report_suggestions: true,
            max_expression_depth: MAX_EXPR_BIND_DEPTH,
            strict_array_initializer_lengths: true,
        }
    }
}

impl BinderOptions {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
