//! Command-line interface for ember.
//!
//! The `ember` binary parses a `Cli`, opens a `SessionMachine` over a
//! `FileStore` in the data directory and runs one `Command`. Command
//! bodies take their input and output streams as parameters so they can
//! be driven from tests.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::cards::{CardId, ThemeRegistry};
use crate::core::{PlayerId, Responder, SessionConfig, Status, VisualTheme};
use crate::deck::DeckProvider;
use crate::error::SessionError;
use crate::history::{HistoryArchive, PastSession};
use crate::session::SessionMachine;
use crate::storage::KeyValueStore;

/// Ember - conversation cards for two
#[derive(Parser, Debug)]
#[command(name = "ember")]
#[command(about = "Two-player conversation card sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding the saved session and history
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON file with session settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play a session, resuming the saved one if present
    Play,

    /// List archived sessions, newest first
    History,

    /// Show one archived session
    Review {
        /// Session ID as shown by `history`
        id: String,
    },

    /// Delete every archived session
    ClearHistory {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// List content and visual themes
    Themes,
}

/// Resolve the data directory: the flag, else the platform data dir, else
/// `.ember` in the working directory.
#[must_use]
pub fn data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| dirs::data_dir().map(|dir| dir.join("ember")))
        .unwrap_or_else(|| PathBuf::from(".ember"))
}

/// Load settings from `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = SessionConfig::from_json(&raw)
        .with_context(|| format!("parsing config {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Print the content and visual themes.
pub fn print_themes<W: Write>(registry: &ThemeRegistry, out: &mut W) -> Result<()> {
    writeln!(out, "Themes:")?;
    for (i, theme) in registry.themes().enumerate() {
        writeln!(out, "  {}. {}", i + 1, theme)?;
    }
    let visuals: Vec<_> = VisualTheme::ALL.iter().map(|v| v.name()).collect();
    writeln!(out, "Visual themes: {}", visuals.join(", "))?;
    Ok(())
}

/// Print one line per archived session.
pub fn print_history<W: Write>(history: &HistoryArchive, out: &mut W) -> Result<()> {
    if history.is_empty() {
        writeln!(out, "No past sessions yet.")?;
        return Ok(());
    }
    for session in history.iter() {
        writeln!(out, "[{}] {}", session.id, session.summary())?;
    }
    Ok(())
}

/// Print an archived session with its impactful prompts.
pub fn print_review<W: Write>(session: &PastSession, out: &mut W) -> Result<()> {
    writeln!(out, "{}", session.summary())?;
    if !session.has_highlights() {
        writeln!(out, "No prompts were marked impactful.")?;
        return Ok(());
    }
    writeln!(out, "Impactful prompts:")?;
    for prompt in &session.impactful_prompts {
        writeln!(out, "  * {}", prompt)?;
    }
    Ok(())
}

/// Clear the history after a y/N confirmation, unless `yes` is set.
///
/// Returns whether the history was cleared.
pub fn clear_history<S, R, W>(
    machine: &mut SessionMachine<S>,
    yes: bool,
    input: &mut R,
    out: &mut W,
) -> Result<bool>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    if machine.history().is_empty() {
        writeln!(out, "No past sessions yet.")?;
        return Ok(false);
    }
    if !yes {
        let label = format!(
            "Delete all {} past sessions? This cannot be undone. [y/N]: ",
            machine.history().len()
        );
        let answer = read_line(input, out, &label)?.unwrap_or_default();
        if !matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            writeln!(out, "History kept.")?;
            return Ok(false);
        }
    }
    machine.clear_history();
    writeln!(out, "History cleared.")?;
    Ok(true)
}

/// Run an interactive session until it finishes, the player quits, or
/// input ends. Progress is saved on every step, so quitting mid-session
/// resumes on the next `play`.
pub async fn play<S, P, R, W>(
    machine: &mut SessionMachine<S>,
    provider: &P,
    registry: &ThemeRegistry,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    S: KeyValueStore,
    P: DeckProvider + ?Sized,
    R: BufRead,
    W: Write,
{
    if machine.state().status() == Status::Finished {
        writeln!(out, "Last session was finished. Starting fresh.")?;
        machine.reset();
    }

    while !machine.state().is_playing() {
        if !setup(machine, provider, registry, input, out).await? {
            return Ok(());
        }
    }

    writeln!(
        out,
        "{} and {}, let's begin. [n]ext, [i]mpactful, [f]inish, [q]uit",
        machine.state().players.get(PlayerId::FIRST),
        machine.state().players.get(PlayerId::SECOND),
    )?;

    loop {
        show_card(machine, out)?;
        let Some(line) = read_line(input, out, "> ")? else {
            return Ok(());
        };
        match line.as_str() {
            "n" | "next" | "" => {
                if machine.state().is_deck_empty() {
                    return finish(machine, out);
                }
                machine.advance_turn();
            }
            "i" | "impactful" => {
                let current = machine.state().current_card().map(|card| card.id.clone());
                if let Some(id) = current {
                    toggle(machine, &id, out)?;
                }
            }
            "f" | "finish" => return finish(machine, out),
            "q" | "quit" => {
                writeln!(out, "Session saved. Run `ember play` to continue.")?;
                return Ok(());
            }
            other => writeln!(out, "Unknown command: {}", other)?,
        }
    }
}

/// Collect names and themes and start. Returns `false` on end of input.
async fn setup<S, P, R, W>(
    machine: &mut SessionMachine<S>,
    provider: &P,
    registry: &ThemeRegistry,
    input: &mut R,
    out: &mut W,
) -> Result<bool>
where
    S: KeyValueStore,
    P: DeckProvider + ?Sized,
    R: BufRead,
    W: Write,
{
    let Some(player1) = read_line(input, out, "Player 1 name: ")? else {
        return Ok(false);
    };
    let Some(player2) = read_line(input, out, "Player 2 name: ")? else {
        return Ok(false);
    };

    print_themes(registry, out)?;
    let default_theme = machine.state().theme.clone();
    let Some(choice) = read_line(input, out, &format!("Theme [{}]: ", default_theme))? else {
        return Ok(false);
    };
    let theme = pick_theme(registry, &choice).unwrap_or(default_theme);

    let current_visual = machine.state().visual_theme;
    let Some(choice) = read_line(input, out, &format!("Visual theme [{}]: ", current_visual))? else {
        return Ok(false);
    };
    let visual_theme = choice.parse().unwrap_or(current_visual);

    match machine
        .start(provider, &player1, &player2, &theme, visual_theme)
        .await
    {
        Ok(()) => {}
        Err(SessionError::EmptyPlayerName(player)) => {
            writeln!(out, "{} needs a name.", player)?;
            return Ok(true);
        }
    }

    if !machine.state().is_playing() {
        writeln!(out, "Could not prepare the {} deck. Try again.", theme)?;
    } else {
        info!(theme = %theme, "session started from terminal");
    }
    Ok(true)
}

/// Map a menu answer onto a theme name: a 1-based index or a name.
fn pick_theme(registry: &ThemeRegistry, choice: &str) -> Option<String> {
    let choice = choice.trim();
    if choice.is_empty() {
        return None;
    }
    if let Ok(index) = choice.parse::<usize>() {
        return registry
            .themes()
            .nth(index.checked_sub(1)?)
            .map(str::to_string);
    }
    Some(choice.to_string())
}

fn show_card<S: KeyValueStore, W: Write>(machine: &SessionMachine<S>, out: &mut W) -> Result<()> {
    let state = machine.state();
    let Some(card) = state.current_card() else {
        return Ok(());
    };
    let progress = state.progress();
    let marker = if state.is_impactful(&card.id) { " *" } else { "" };

    writeln!(out)?;
    writeln!(
        out,
        "Card {}/{} [{}]{}",
        progress.drawn + 1,
        progress.total,
        card.category,
        marker
    )?;
    writeln!(out, "{} asks: {}", state.active_player_name(), card.prompt)?;
    match state.responder() {
        Some(Responder::Both) => writeln!(out, "Both of you answer.")?,
        Some(Responder::Player(player)) => {
            writeln!(out, "{} answers.", state.players.get(player))?
        }
        None => {}
    }
    if state.is_deck_empty() {
        writeln!(out, "Last card. [n] or [f] to finish.")?;
    }
    Ok(())
}

fn toggle<S: KeyValueStore, W: Write>(
    machine: &mut SessionMachine<S>,
    id: &CardId,
    out: &mut W,
) -> Result<()> {
    machine.toggle_impactful(id);
    if machine.state().is_impactful(id) {
        writeln!(out, "Marked as impactful.")?;
    } else {
        writeln!(out, "Unmarked.")?;
    }
    Ok(())
}

fn finish<S: KeyValueStore, W: Write>(machine: &mut SessionMachine<S>, out: &mut W) -> Result<()> {
    let Some(record) = machine.finish() else {
        return Ok(());
    };
    writeln!(out)?;
    writeln!(out, "Session complete.")?;
    print_review(&record, out)?;
    machine.reset();
    Ok(())
}

/// Prompt and read one trimmed line; `None` on end of input.
fn read_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
