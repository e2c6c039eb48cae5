//! Static gate script, embedded at compile time.

use axum::{
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};

/// Path the gate script is served under.
pub const GATE_SCRIPT_PATH: &str = "/assets/country_blocker.js";

/// Content hash of the gate script, computed by the build script.
pub const ASSET_HASH: &str = env!("ASSET_HASH");

const GATE_SCRIPT: &str = include_str!("../../static/js/country_blocker.js");

/// Script URL with a cache-busting version parameter.
#[must_use]
pub fn gate_script_src() -> String {
    if ASSET_HASH.is_empty() {
        GATE_SCRIPT_PATH.to_string()
    } else {
        format!("{GATE_SCRIPT_PATH}?v={ASSET_HASH}")
    }
}

/// Serve the client-side gate script.
pub async fn gate_script() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (CACHE_CONTROL, "public, max-age=86400"),
        ],
        GATE_SCRIPT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_script_src_is_versioned() {
        let src = gate_script_src();
        assert!(src.starts_with(GATE_SCRIPT_PATH));
        if !ASSET_HASH.is_empty() {
            assert!(src.ends_with(ASSET_HASH));
        }
    }

    #[test]
    fn test_embedded_script_targets_snippet_ids() {
        assert!(GATE_SCRIPT.contains("blocked-countries"));
        assert!(GATE_SCRIPT.contains("blocker-div"));
    }
}
