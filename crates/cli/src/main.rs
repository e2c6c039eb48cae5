//! Country Blocker CLI - Inspect and edit the blocked-country list.
//!
//! # Usage
//!
//! ```bash
//! # List the country catalog
//! cb-cli catalog --continent europe
//!
//! # Show the persisted selection
//! cb-cli selection show
//!
//! # Block a country or a whole group
//! cb-cli selection pick ALL_SOUTH_AMERICA
//!
//! # Show the active plan
//! cb-cli plan
//! ```
//!
//! # Commands
//!
//! - `catalog` - List countries by continent (no Shopify access needed)
//! - `selection` - Show, pick, remove or clear blocked countries
//! - `plan` - Show the active plan and its country limit

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use country_blocker_core::Continent;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "cb-cli")]
#[command(author, version, about = "Country Blocker CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the country catalog
    Catalog {
        /// Only list one continent (e.g. `europe`, `north-america`)
        #[arg(short, long)]
        continent: Option<Continent>,
    },
    /// Manage the blocked-country list
    Selection {
        #[command(subcommand)]
        action: SelectionAction,
    },
    /// Show the active plan
    Plan,
}

#[derive(Subcommand)]
enum SelectionAction {
    /// Show blocked countries grouped by continent
    Show,
    /// Block a country code, `ALL_COUNTRIES` or `ALL_<CONTINENT>`
    Pick {
        /// Selector value
        value: String,
    },
    /// Unblock one country
    Remove {
        /// Two-letter country code
        code: String,
    },
    /// Unblock every country
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "country_blocker_admin=warn,cb_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Catalog { continent } => commands::catalog::list(continent),
        Commands::Selection { action } => match action {
            SelectionAction::Show => commands::selection::show().await?,
            SelectionAction::Pick { value } => commands::selection::pick(&value).await?,
            SelectionAction::Remove { code } => commands::selection::remove(&code).await?,
            SelectionAction::Clear => commands::selection::clear().await?,
        },
        Commands::Plan => commands::plan::show().await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_continent_flag() {
        let cli = Cli::try_parse_from(["cb-cli", "catalog", "--continent", "north-america"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Catalog {
                continent: Some(Continent::NorthAmerica)
            })
        ));
    }
}
