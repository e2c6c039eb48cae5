//! Blocker snippet route handler.
//!
//! Renders the markup a theme embeds: the blocked list injected as a JSON
//! `data-countries` attribute, the hidden overlay and the gate script tag.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use country_blocker_core::Selection;
use tracing::instrument;

use crate::error::Result;
use crate::routes::assets::gate_script_src;
use crate::state::AppState;

/// Text shown inside the overlay when a visitor is blocked.
pub const BLOCKED_MESSAGE: &str = "This store is not available in your country.";

/// Blocker snippet template.
#[derive(Template, WebTemplate)]
#[template(path = "blocker.html")]
pub struct BlockerTemplate {
    /// JSON array of blocked codes. Escaped by the template engine.
    pub countries_json: String,
    pub geolocation_url: String,
    pub script_src: String,
    pub message: &'static str,
}

impl BlockerTemplate {
    /// Build the snippet for `blocked`.
    #[must_use]
    pub fn new(blocked: &Selection, geolocation_url: &str) -> Self {
        Self {
            countries_json: blocked.to_metafield_value(),
            geolocation_url: geolocation_url.to_string(),
            script_src: gate_script_src(),
            message: BLOCKED_MESSAGE,
        }
    }
}

/// Render the blocker snippet with the current blocked list.
#[instrument(skip(state))]
pub async fn snippet(State(state): State<AppState>) -> Result<BlockerTemplate> {
    let blocked = state.blocklist().load().await?;
    tracing::debug!(count = blocked.len(), "Rendering blocker snippet");

    Ok(BlockerTemplate::new(
        &blocked,
        state.config().geolocation.url.as_str(),
    ))
}
