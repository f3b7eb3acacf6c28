use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kinder_db::dao::{CategoryDao, ChildDao};
use kinder_db::{ConnectionProvider, ScriptRunner};

/// Operator tool for the kinder database.
///
/// Credentials come from `KINDER_DB_URL`, `KINDER_DB_USER` and
/// `KINDER_DB_PASSWORD` (a `.env` file is honored).
#[derive(Debug, Parser)]
#[command(name = "kinder", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Execute a SQL script statement by statement, stopping at the first error.
    Run {
        /// Path to the script.
        file: PathBuf,
    },
    /// List categories whose title contains PART (case-insensitive).
    Categories {
        part: String,
    },
    /// List children by age threshold or missing birth date.
    #[command(group(ArgGroup::new("filter").required(true).args(["min_age", "no_birth_date"])))]
    Children {
        /// Only children at least this many years old this year.
        #[arg(long, value_parser = clap::value_parser!(i32).range(0..))]
        min_age: Option<i32>,
        /// Only children without a birth date.
        #[arg(long)]
        no_birth_date: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kinder_db=info,kinder_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // --- Configuration ---
    let provider = ConnectionProvider::from_env().context("Database credentials are incomplete")?;
    tracing::debug!(url = %provider.config().url, "Loaded database configuration");

    match cli.command {
        Command::Run { file } => {
            let report = ScriptRunner::run_file_with(&provider, &file)
                .await
                .with_context(|| format!("Script {} did not complete", file.display()))?;
            tracing::info!(executed = report.executed, "Script finished");
        }
        Command::Categories { part } => {
            let categories = CategoryDao::new(provider).title_part(&part).await?;
            print_json(&categories)?;
        }
        // The required `filter` group guarantees `--no-birth-date` when no age is given.
        Command::Children {
            min_age,
            no_birth_date: _,
        } => {
            let dao = ChildDao::new(provider);
            let children = match min_age {
                Some(age) => dao.all_at_least_age(age).await?,
                None => dao.all_without_birth_date().await?,
            };
            print_json(&children)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run() {
        let cli = Cli::try_parse_from(["kinder", "run", "sql/init.sql"]).unwrap();
        assert!(matches!(cli.command, Command::Run { file } if file == PathBuf::from("sql/init.sql")));
    }

    #[test]
    fn children_requires_a_filter() {
        assert!(Cli::try_parse_from(["kinder", "children"]).is_err());
    }

    #[test]
    fn children_filters_are_exclusive() {
        let parsed =
            Cli::try_parse_from(["kinder", "children", "--min-age", "10", "--no-birth-date"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn negative_min_age_is_rejected() {
        let parsed = Cli::try_parse_from(["kinder", "children", "--min-age=-2147483648"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_min_age() {
        let cli = Cli::try_parse_from(["kinder", "children", "--min-age", "10"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Children { min_age: Some(10), no_birth_date: false }
        ));
    }
}
