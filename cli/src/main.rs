//! Decryptor CLI - terminal demo for the decryptor minigame.
//!
//! ```text
//! main() -> request (config file, env, args) -> start_session() -> run_session()
//!                                                    |
//!                                 KeyPump -> ChannelInput    snapshots -> draw
//! ```
//!
//! Usage: `decryptor [--fight <enemy>] [--seconds <n>] [--variants a,b] [--json]`

mod input;
mod render;

use std::{
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use tokio::sync::mpsc;
use tokio::time::{Instant, interval};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use decryptor_config::{DecryptorConfig, apply_env_overrides, parse_variant_list};
use decryptor_engine::{
    ChannelInput, SessionHandle, SessionRequest, SessionSnapshot, start_session,
};
use decryptor_types::{ActionSymbol, SessionPhase};

use input::{KeyCommand, KeyPump};
use render::{FrameClock, draw, health_summary, render_lines};

const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Route tracing to a file. The board owns the terminal in raw mode, so
/// nothing may be written to stdout or stderr while a session runs.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let (opened, problems) = open_log_file();
    let Some((path, file)) = opened else {
        // No writable log file: events are discarded.
        registry.init();
        return;
    };

    registry
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    tracing::info!(path = %path.display(), "Decryptor log opened");
    for problem in problems {
        tracing::warn!("{problem}");
    }
}

/// First log file that can be opened for append, plus why earlier
/// candidates were skipped.
fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut problems = Vec::new();

    for path in log_file_candidates() {
        if let Some(dir) = path.parent()
            && let Err(e) = fs::create_dir_all(dir)
        {
            problems.push(format!("cannot create {}: {e}", dir.display()));
            continue;
        }
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => return (Some((path, file)), problems),
            Err(e) => problems.push(format!("cannot open {}: {e}", path.display())),
        }
    }

    (None, problems)
}

/// Next to the config file when there is a home directory, else under the
/// working directory.
fn log_file_candidates() -> Vec<PathBuf> {
    let local = PathBuf::from(".decryptor").join("logs").join("decryptor.log");
    DecryptorConfig::path()
        .as_deref()
        .and_then(Path::parent)
        .map(|dir| dir.join("logs").join("decryptor.log"))
        .into_iter()
        .chain([local])
        .collect()
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Default, PartialEq, Eq, Parser)]
#[command(name = "decryptor")]
#[command(about = "Match each glyph to its input before the countdown runs out")]
struct CliArgs {
    /// Fight the named enemy (turns on the battle variant)
    #[arg(long = "fight", value_name = "ENEMY")]
    enemy: Option<String>,
    /// Countdown per round, in seconds
    #[arg(long)]
    seconds: Option<u64>,
    /// Comma-separated variants, e.g. "blink,screen_shuffle"
    #[arg(long)]
    variants: Option<String>,
    /// Print the final snapshot as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl CliArgs {
    /// Layer the arguments over a request built from config and environment.
    fn apply(&self, mut request: SessionRequest) -> Result<SessionRequest> {
        if let Some(list) = &self.variants {
            request.variants = parse_variant_list(list)?;
        }
        if let Some(seconds) = self.seconds {
            request.duration_seconds = seconds;
        }
        if let Some(enemy) = &self.enemy {
            let fight = SessionRequest::fight(enemy.clone());
            request.enemy_name = fight.enemy_name;
            for flag in fight.variants {
                if !request.variants.contains(&flag) {
                    request.variants.push(flag);
                }
            }
        }
        Ok(request)
    }
}

fn build_request(args: &CliArgs) -> Result<SessionRequest> {
    let config = match DecryptorConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Ignoring config: {err}");
            None
        }
    };
    let request = config.map(|c| c.request()).unwrap_or_default();
    let request = apply_env_overrides(request)?;
    args.apply(request)
}

// ============================================================================
// Terminal
// ============================================================================

/// Raw mode and the alternate screen, restored on drop.
struct TerminalSession {
    out: Stdout,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        Ok(Self { out })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let request = build_request(&args)?;
    let legend = if request.enemy_name.is_some() {
        "arrows / 1-4 (a b x y) to strike, q to flee"
    } else {
        "arrows / 1-4 (a b x y) to decrypt, q to quit"
    };

    let (tx, input) = ChannelInput::channel();
    let mut session = start_session(request, input)?;

    let won = {
        let mut terminal = TerminalSession::new()?;
        let mut keys = KeyPump::new();
        let result = run_session(&mut terminal, &mut session, &mut keys, &tx, legend).await;
        keys.shutdown().await;
        result?
    };

    let last = session.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&last)?);
    } else {
        print_summary(won, &last);
    }
    Ok(())
}

async fn run_session(
    terminal: &mut TerminalSession,
    session: &mut SessionHandle,
    keys: &mut KeyPump,
    tx: &mpsc::Sender<ActionSymbol>,
    legend: &str,
) -> Result<bool> {
    let started = Instant::now();
    let mut snapshots = session.snapshots();
    let mut published_at = Instant::now();
    let mut frames = interval(FRAME_DURATION);

    loop {
        tokio::select! {
            won = session.outcome() => {
                let snapshot = snapshots.borrow().clone();
                draw_frame(terminal, &snapshot, published_at, started, legend)?;
                return Ok(won);
            }
            _ = frames.tick() => {
                if snapshots.has_changed().unwrap_or(false) {
                    snapshots.borrow_and_update();
                    published_at = Instant::now();
                }
                let snapshot = snapshots.borrow().clone();
                draw_frame(terminal, &snapshot, published_at, started, legend)?;
            }
            command = keys.recv() => match command {
                Some(KeyCommand::Action(action)) => {
                    if tx.send(action).await.is_err() {
                        tracing::debug!("Session no longer accepts input");
                    }
                }
                Some(KeyCommand::Quit) | None => session.shutdown(),
            },
        }
    }
}

fn draw_frame(
    terminal: &mut TerminalSession,
    snapshot: &SessionSnapshot,
    published_at: Instant,
    started: Instant,
    legend: &str,
) -> Result<()> {
    let since = published_at.elapsed().as_millis() as u64;
    let remaining_ms = if snapshot.phase == SessionPhase::Active {
        snapshot.remaining_ms.saturating_sub(since)
    } else {
        snapshot.remaining_ms
    };
    let clock = FrameClock {
        remaining_ms,
        now_ms: started.elapsed().as_millis() as u64,
    };
    draw(&mut terminal.out, &render_lines(snapshot, clock), legend)?;
    Ok(())
}

fn print_summary(won: bool, last: &SessionSnapshot) {
    let verdict = if won { "Decrypted" } else { "Failed" };
    match (&last.battle, last.outcome) {
        (Some(battle), Some(reason)) => println!(
            "{verdict}: {reason:?} against {} after {} round(s), you {} / enemy {}",
            battle.enemy_name,
            last.round,
            health_summary(battle.player_health),
            health_summary(battle.enemy_health),
        ),
        (None, Some(reason)) => println!("{verdict}: {reason:?}"),
        (_, None) => println!("{verdict}"),
    }
    let potions = last.consumed_potions;
    if potions.any() {
        println!(
            "Potions consumed: protection={} strength={}",
            potions.protection, potions.strength
        );
    }
}
