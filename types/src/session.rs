//! Session lifecycle types and read-only snapshots.
//!
//! The controller never hands out references to its mapping or challenge
//! queue. Presentation code gets a [`SessionSnapshot`], an owned copy of
//! everything it may draw.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PotionEffects;
use crate::health::Health;
use crate::symbols::{ActionSymbol, Glyph};
use crate::variants::Variants;

/// Phase of the session state machine.
///
/// ```text
/// Init -> Active -> RoundComplete -> Active (battle only)
///                -> Won | Lost -> Resolved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Init,
    Active,
    RoundComplete,
    Won,
    Lost,
    Resolved,
}

impl SessionPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Init => "init",
            SessionPhase::Active => "active",
            SessionPhase::RoundComplete => "round_complete",
            SessionPhase::Won => "won",
            SessionPhase::Lost => "lost",
            SessionPhase::Resolved => "resolved",
        }
    }

    /// Won or Lost: an outcome exists but has not been reported yet.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Won | SessionPhase::Lost)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    /// Every challenge of a non-battle session was matched in time.
    Decrypted,
    /// Enemy health reached zero.
    EnemyDefeated,
    /// The deadline of a non-battle session passed.
    TimeExpired,
    /// Player health reached zero.
    HealthDepleted,
    /// The session was shut down before reaching an outcome.
    Abandoned,
}

impl OutcomeReason {
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, OutcomeReason::Decrypted | OutcomeReason::EnemyDefeated)
    }
}

/// Event kinds the controller reacts to, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Begin,
    Input(ActionSymbol),
    Expiry,
    NextRound,
    Resolve,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Begin => f.write_str("begin"),
            SessionEvent::Input(action) => write!(f, "input {action}"),
            SessionEvent::Expiry => f.write_str("expiry"),
            SessionEvent::NextRound => f.write_str("next round"),
            SessionEvent::Resolve => f.write_str("resolve"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{event} is not valid in phase {phase}")]
    InvalidTransition {
        phase: SessionPhase,
        event: SessionEvent,
    },
    #[error("session outcome was already resolved")]
    AlreadyResolved,
}

// ============================================================================
// Snapshots
// ============================================================================

/// One challenge as presentation sees it. The bound action is deliberately
/// absent: showing it would give the answer away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeView {
    pub glyph: Glyph,
    pub resolved: bool,
    pub active: bool,
}

/// One hint tile: which action shows which glyph, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipView {
    /// Grid slot, row-major on a 4x3 board.
    pub slot: u8,
    pub action: ActionSymbol,
    pub glyph: Glyph,
    /// Fade period for blinking variants.
    pub blink_period_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleView {
    pub enemy_name: String,
    pub player_health: Health,
    pub enemy_health: Health,
}

/// Owned copy of everything a renderer may show for the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub variants: Variants,
    /// Battle wave, starting at 1.
    pub round: u32,
    pub cursor: usize,
    pub challenges: Vec<ChallengeView>,
    pub tips: Vec<TipView>,
    pub remaining_ms: u64,
    pub duration_ms: u64,
    pub battle: Option<BattleView>,
    pub consumed_potions: PotionEffects,
    pub outcome: Option<OutcomeReason>,
}

impl SessionSnapshot {
    /// Glyph the player must match next, if a challenge is active.
    #[must_use]
    pub fn active_glyph(&self) -> Option<Glyph> {
        self.challenges
            .iter()
            .find(|challenge| challenge.active)
            .map(|challenge| challenge.glyph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_phases() {
        assert!(SessionPhase::Won.is_terminal());
        assert!(SessionPhase::Lost.is_terminal());
        assert!(!SessionPhase::Resolved.is_terminal());
        assert!(!SessionPhase::RoundComplete.is_terminal());
    }

    #[test]
    fn invalid_transition_message_names_event_and_phase() {
        let err = SessionError::InvalidTransition {
            phase: SessionPhase::Resolved,
            event: SessionEvent::Input(ActionSymbol::Button2),
        };
        assert_eq!(err.to_string(), "input 2 is not valid in phase resolved");
    }

    #[test]
    fn outcome_reason_win_split() {
        assert!(OutcomeReason::Decrypted.is_win());
        assert!(OutcomeReason::EnemyDefeated.is_win());
        assert!(!OutcomeReason::TimeExpired.is_win());
        assert!(!OutcomeReason::HealthDepleted.is_win());
        assert!(!OutcomeReason::Abandoned.is_win());
    }
}
