//! Active plan inspection.
//!
//! ```bash
//! cb-cli plan
//! ```

use std::fmt::Write as _;

use country_blocker_admin::services::ShortcutStatus;
use country_blocker_admin::{AdminConfig, AppState};
use country_blocker_core::{Selection, SelectionPolicy};

use super::CliError;

/// Render plan details for the current selection size.
#[must_use]
pub fn render(status: &ShortcutStatus, selection: &Selection, pricing_url: &str) -> String {
    let plan = status.plan;
    let mut out = String::new();

    let _ = writeln!(out, "Plan: {}", plan.tier);
    let _ = if plan.has_plan() {
        match (plan.limit, SelectionPolicy::new(plan.limit).remaining(selection.len())) {
            (Some(limit), Some(remaining)) => writeln!(
                out,
                "Blocked: {} of {limit} ({remaining} remaining)",
                selection.len()
            ),
            _ => writeln!(out, "Blocked: {} (unlimited)", selection.len()),
        }
    } else {
        writeln!(out, "Country blocking: disabled")
    };
    let _ = writeln!(
        out,
        "Shortcut suppression: {}{}",
        if status.is_enabled { "on" } else { "off" },
        if plan.can_toggle_shortcuts() { "" } else { " (premium only)" }
    );
    let _ = writeln!(out, "Pricing: {pricing_url}");

    out
}

/// Print the active plan, its limit and the shortcut setting.
///
/// # Errors
///
/// Returns an error if configuration is invalid or Shopify cannot be reached.
#[allow(clippy::print_stdout)]
pub async fn show() -> Result<(), CliError> {
    let state = AppState::new(AdminConfig::from_env()?);

    let shortcuts = state.shortcuts();
    let selection_store = state.selection();
    let (status, selection) =
        futures::try_join!(shortcuts.status(), selection_store.load())?;

    print!("{}", render(&status, &selection, &state.config().pricing_url()));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use country_blocker_core::{CountryCode, PlanState, PlanTier};

    use super::*;

    fn selection(codes: &[&str]) -> Selection {
        Selection::from(
            codes
                .iter()
                .map(|c| CountryCode::parse(c).unwrap())
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_render_free_plan() {
        let status = ShortcutStatus {
            is_enabled: false,
            plan: PlanState::from_tier(PlanTier::Free),
        };
        let out = render(&status, &selection(&["DE", "FR"]), "https://example.test/pricing");

        assert!(out.contains("Plan: free"));
        assert!(out.contains("Blocked: 2 of 5 (3 remaining)"));
        assert!(out.contains("Shortcut suppression: off (premium only)"));
        assert!(out.contains("Pricing: https://example.test/pricing"));
    }

    #[test]
    fn test_render_without_plan() {
        let status = ShortcutStatus {
            is_enabled: false,
            plan: PlanState::from_tier(PlanTier::None),
        };
        let out = render(&status, &Selection::new(), "https://example.test/pricing");
        assert!(out.contains("Country blocking: disabled"));
    }

    #[test]
    fn test_render_premium_plan() {
        let status = ShortcutStatus {
            is_enabled: true,
            plan: PlanState::from_tier(PlanTier::Premium),
        };
        let out = render(&status, &selection(&["DE"]), "https://example.test/pricing");
        assert!(out.contains("Blocked: 1 (unlimited)"));
        assert!(out.contains("Shortcut suppression: on\n"));
    }
}
