//! Ember - terminal driver for conversation card sessions.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use ember_cards::cli::{self, Cli, Command};
use ember_cards::{FileStore, SessionMachine, StaticDeckProvider, ThemeRegistry};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;
    let data_dir = cli::data_dir(cli.data_dir);
    info!(data_dir = %data_dir.display(), "opening store");

    let store = FileStore::open(&data_dir)
        .with_context(|| format!("opening data directory {}", data_dir.display()))?;
    let registry = ThemeRegistry::builtin();
    let provider = StaticDeckProvider::from_config(registry.clone(), &config);
    let mut machine = SessionMachine::open(store, config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Play => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            cli::play(&mut machine, &provider, &registry, &mut input, &mut out).await?;
        }
        Command::History => cli::print_history(machine.history(), &mut out)?,
        Command::Review { id } => match machine.review(&id) {
            Some(session) => cli::print_review(session, &mut out)?,
            None => anyhow::bail!("no archived session with id {}", id),
        },
        Command::ClearHistory { yes } => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            cli::clear_history(&mut machine, yes, &mut input, &mut out)?;
        }
        Command::Themes => cli::print_themes(&registry, &mut out)?,
    }

    Ok(())
}
