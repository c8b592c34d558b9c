//! Loading [`BinderOptions`] from disk.
//!
//! An options file is a JSON object using the camelCase field names of
//! [`BinderOptions`]; unknown fields are ignored and missing ones keep
//! their defaults.

use anyhow::{Context, Result, bail};
use csz_binder::BinderOptions;
use std::path::Path;
use tracing::debug;

pub fn parse_options(source: &str) -> Result<BinderOptions> {
    let options = BinderOptions::from_json_str(source).context("failed to parse binder options JSON")?;
    if options.max_expression_depth == 0 {
        bail!("maxExpressionDepth must be at least 1");
    }
    Ok(options)
}

/// Read and parse an options file.
pub fn load_options(path: &Path) -> Result<BinderOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read binder options: {}", path.display()))?;
    let options =
        parse_options(&source).with_context(|| format!("failed to parse binder options: {}", path.display()))?;
    debug!(path = %path.display(), ?options, "loaded binder options");
    Ok(options)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
