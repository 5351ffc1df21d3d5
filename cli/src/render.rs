//! Plain-text rendering of session snapshots.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

use decryptor_core::BOARD_COLUMNS;
use decryptor_types::{BattleView, Health, SessionPhase, SessionSnapshot, TipView};

const BAR_WIDTH: usize = 30;
const TILE_WIDTH: usize = 14;

/// Everything that changes between snapshots on its own.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    /// Countdown interpolated since the snapshot was published.
    pub remaining_ms: u64,
    /// Monotonic milliseconds, for blink phases.
    pub now_ms: u64,
}

#[must_use]
pub fn render_lines(snapshot: &SessionSnapshot, clock: FrameClock) -> Vec<String> {
    let mut lines = Vec::new();

    match &snapshot.battle {
        Some(battle) => lines.extend(battle_lines(battle, snapshot.round)),
        None => lines.push("DECRYPTION".to_string()),
    }
    lines.push(String::new());

    let ratio = if snapshot.duration_ms == 0 {
        0.0
    } else {
        clock.remaining_ms as f64 / snapshot.duration_ms as f64
    };
    lines.push(format!(
        "time   {} {:>5.1}s",
        bar(ratio),
        clock.remaining_ms as f64 / 1000.0
    ));
    lines.push(String::new());

    let targets: Vec<String> = snapshot
        .challenges
        .iter()
        .map(|challenge| {
            let glyph = challenge.glyph.symbol();
            if challenge.active {
                format!("[{glyph}]")
            } else if challenge.resolved {
                " · ".to_string()
            } else {
                format!(" {glyph} ")
            }
        })
        .collect();
    lines.push(format!("decrypt {}", targets.join(" ")));
    lines.push(String::new());

    let mut tips: Vec<&TipView> = snapshot.tips.iter().collect();
    tips.sort_by_key(|tip| tip.slot);
    for row in tips.chunks(BOARD_COLUMNS) {
        let cells: Vec<String> = row.iter().map(|tip| tile(tip, clock.now_ms)).collect();
        lines.push(cells.join(""));
    }

    if snapshot.phase == SessionPhase::Resolved
        && let Some(reason) = snapshot.outcome
    {
        lines.push(String::new());
        let verdict = if reason.is_win() { "WON" } else { "LOST" };
        lines.push(format!("{verdict} ({reason:?})"));
    }

    lines
}

pub fn draw(out: &mut impl Write, lines: &[String], legend: &str) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in lines.iter().enumerate() {
        queue!(out, MoveTo(0, row as u16), Print(line))?;
    }
    queue!(out, MoveTo(0, lines.len() as u16 + 1), Print(legend))?;
    out.flush()
}

fn battle_lines(battle: &BattleView, round: u32) -> [String; 3] {
    [
        format!("{}  (round {round})", battle.enemy_name),
        format!(
            "enemy  {} {:>5.1}",
            bar(battle.enemy_health.ratio()),
            battle.enemy_health.display()
        ),
        format!(
            "you    {} {:>5.1}",
            bar(battle.player_health.ratio()),
            battle.player_health.display()
        ),
    ]
}

fn tile(tip: &TipView, now_ms: u64) -> String {
    let visible = match tip.blink_period_ms {
        Some(period) if period > 0 => (now_ms / period) % 2 == 0,
        _ => true,
    };
    let glyph = if visible { tip.glyph.symbol() } else { ' ' };
    let label = format!("{glyph} {}", tip.action.display_name());
    format!("{label:<TILE_WIDTH$}")
}

fn bar(ratio: f64) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Health formatted for the final summary line.
#[must_use]
pub fn health_summary(health: Health) -> String {
    format!("{:.0}/100", health.display())
}
