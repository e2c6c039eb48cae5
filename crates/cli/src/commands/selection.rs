//! Blocked-country selection commands.
//!
//! These go through the same service layer as the admin API, so plan limits
//! apply exactly as they do in the embedded app.
//!
//! # Usage
//!
//! ```bash
//! cb-cli selection show
//! cb-cli selection pick ALL_EUROPE
//! cb-cli selection pick DE
//! cb-cli selection remove DE
//! cb-cli selection clear
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPIFY_STORE` - Shop domain (e.g. `my-shop.myshopify.com`)
//! - `SHOPIFY_ADMIN_ACCESS_TOKEN` - Admin API access token

use std::fmt::Write as _;

use country_blocker_admin::services::{MutationReport, SelectionSnapshot};
use country_blocker_admin::{AdminConfig, AppState};
use country_blocker_core::{Catalog, CountryCode, SelectorValue};

use super::CliError;

fn state() -> Result<AppState, CliError> {
    Ok(AppState::new(AdminConfig::from_env()?))
}

fn plan_line(out: &mut String, tier: impl std::fmt::Display, limit: Option<usize>) {
    let _ = match limit {
        Some(limit) => writeln!(out, "Plan: {tier} (limit {limit})"),
        None => writeln!(out, "Plan: {tier}"),
    };
}

/// Render the persisted selection grouped by continent.
#[must_use]
pub fn render_snapshot(snapshot: &SelectionSnapshot, catalog: &Catalog) -> String {
    let mut out = String::new();
    plan_line(&mut out, snapshot.plan.tier, snapshot.plan.limit);
    let _ = writeln!(out, "Blocked: {} countries", snapshot.selection.len());

    let grouped = snapshot.selection.grouped_by_continent(catalog);
    for group in &grouped.groups {
        let _ = writeln!(out, "{}", group.continent.display_name());
        for country in &group.countries {
            let _ = writeln!(out, "  {}  {}", country.code, country.label);
        }
    }
    if !grouped.unknown.is_empty() {
        let _ = writeln!(out, "Unknown");
        for country in &grouped.unknown {
            let _ = writeln!(out, "  {}", country.code);
        }
    }

    out
}

/// Render the result of one mutation.
#[must_use]
pub fn render_report(report: &MutationReport) -> String {
    let mut out = String::new();
    let mutation = &report.mutation;

    match mutation.no_change() {
        Some(reason) => {
            let _ = writeln!(out, "Unchanged: {}", reason.message());
        }
        None => {
            let _ = writeln!(out, "Saved {} blocked countries", mutation.selection().len());
        }
    }

    let rejected = mutation.rejected();
    if !rejected.is_empty() {
        let codes: Vec<&str> = rejected.iter().map(CountryCode::as_str).collect();
        let _ = writeln!(out, "Over plan limit, not added: {}", codes.join(", "));
    }
    if let Some(warning) = &report.warning {
        let _ = writeln!(out, "Warning: {warning}");
    }

    let codes: Vec<&str> = mutation.selection().iter().map(CountryCode::as_str).collect();
    let _ = writeln!(out, "Blocked: [{}]", codes.join(", "));
    out
}

#[allow(clippy::print_stdout)]
fn print_report(report: &MutationReport) {
    print!("{}", render_report(report));
}

/// Print the persisted selection.
///
/// # Errors
///
/// Returns an error if configuration is invalid or Shopify cannot be reached.
#[allow(clippy::print_stdout)]
pub async fn show() -> Result<(), CliError> {
    let state = state()?;
    let snapshot = state.selection().snapshot().await?;
    print!("{}", render_snapshot(&snapshot, state.catalog()));
    Ok(())
}

/// Add a country code or an `ALL_*` group.
///
/// # Errors
///
/// Returns an error if `value` is not a selector value, or if loading or
/// resolving the plan fails.
pub async fn pick(value: &str) -> Result<(), CliError> {
    let value = SelectorValue::parse(value)?;
    let state = state()?;
    tracing::info!(?value, "Adding to blocked countries");
    print_report(&state.selection().pick(&value).await?);
    Ok(())
}

/// Remove one country.
///
/// # Errors
///
/// Returns an error if `code` is not a country code, or if loading or
/// resolving the plan fails.
pub async fn remove(code: &str) -> Result<(), CliError> {
    let code = CountryCode::parse(code)?;
    let state = state()?;
    tracing::info!(%code, "Removing from blocked countries");
    print_report(&state.selection().remove(&code).await?);
    Ok(())
}

/// Remove every country.
///
/// # Errors
///
/// Returns an error if loading or resolving the plan fails.
pub async fn clear() -> Result<(), CliError> {
    let state = state()?;
    tracing::info!("Clearing blocked countries");
    print_report(&state.selection().clear().await?);
    Ok(())
}
