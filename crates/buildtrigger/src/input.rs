//! Reading raw build requests from disk or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use trigger_core::BuildRequestFields;

/// Read request fields from `path`, or from stdin when `path` is `-`.
pub fn read_request(path: &Path) -> Result<BuildRequestFields> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read build request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read build request {:?}", path))?
    };
    parse_request(&raw)
}

/// Parse request fields from JSON.
pub fn parse_request(raw: &str) -> Result<BuildRequestFields> {
    serde_json::from_str(raw).context("Build request is not valid JSON")
}
