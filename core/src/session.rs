//! Session state machine.
//!
//! # Transitions
//!
//! ```text
//! Init --begin--> Active --hit (queue end, battle, enemy alive)--> RoundComplete
//!                   |  ^                                               |
//!                   |  +-----------------next_round--------------------+
//!                   |
//!                   +--hit (non-battle queue end | enemy down)--> Won  --resolve--> Resolved
//!                   +--expiry (non-battle | player down)-------> Lost --resolve--> Resolved
//! ```
//!
//! `shutdown` moves any phase to Resolved.
//!
//! The controller is synchronous and clock-free: the driver feeds it inputs
//! and elapsed time one event at a time, so no two transitions ever overlap.
//!
//! # Per-hit variant effects
//!
//! | Flag             | Effect after a hit that leaves the session Active      |
//! |------------------|--------------------------------------------------------|
//! | `ScreenShuffle`  | new tip layout                                         |
//! | `ActionShuffle`  | reshuffled mapping, refreshed challenges, new layout   |

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use decryptor_types::{
    ActionGlyphMapping, ActionSymbol, OutcomeReason, SessionConfig, SessionError, SessionEvent,
    SessionPhase, SessionSnapshot, VariantFlag,
};

use crate::battle::BattleResolver;
use crate::layout::TipLayout;
use crate::mapping;
use crate::queue::{Advance, Challenge, ChallengeQueue, QUEUE_LEN};
use crate::timer::{CountdownTimer, TimerStatus};

/// What a single event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Correct input; the next challenge is active.
    Hit,
    /// Wrong input; the penalty left `remaining` on the clock.
    Miss { remaining: Duration },
    /// A battle deadline passed; the player took damage and the clock restarted.
    DeadlineMissed,
    /// Battle wave cleared with the enemy still standing.
    RoundComplete,
    Won(OutcomeReason),
    Lost(OutcomeReason),
}

/// Mapping, queue and layout for the current round. Dropped on resolution.
#[derive(Debug)]
struct Board {
    mapping: ActionGlyphMapping,
    queue: ChallengeQueue,
    layout: TipLayout,
}

#[derive(Debug)]
pub struct SessionController<R = StdRng> {
    config: SessionConfig,
    rng: R,
    phase: SessionPhase,
    round: u32,
    board: Option<Board>,
    timer: CountdownTimer,
    battle: Option<BattleResolver>,
    outcome: Option<OutcomeReason>,
}

impl SessionController<StdRng> {
    /// Controller with an entropy-seeded generator.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(rand::random()))
    }

    /// Controller with a reproducible generator.
    #[must_use]
    pub fn seeded(config: SessionConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SessionController<R> {
    pub fn with_rng(config: SessionConfig, rng: R) -> Self {
        let battle = config.battle().map(BattleResolver::new);
        Self {
            config,
            rng,
            phase: SessionPhase::Init,
            round: 0,
            board: None,
            timer: CountdownTimer::new(),
            battle,
            outcome: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn outcome_reason(&self) -> Option<OutcomeReason> {
        self.outcome
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.timer.remaining()
    }

    /// Time until the next expiry, when a deadline is armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.timer.is_running().then(|| self.timer.remaining())
    }

    #[must_use]
    pub fn current_challenge(&self) -> Option<&Challenge> {
        self.board.as_ref().and_then(|board| board.queue.current())
    }

    #[must_use]
    pub fn mapping(&self) -> Option<&ActionGlyphMapping> {
        self.board.as_ref().map(|board| &board.mapping)
    }

    #[must_use]
    pub fn queue(&self) -> Option<&ChallengeQueue> {
        self.board.as_ref().map(|board| &board.queue)
    }

    #[must_use]
    pub fn battle(&self) -> Option<&BattleResolver> {
        self.battle.as_ref()
    }

    /// Init -> Active: deal the first round and arm the timer.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::Init, SessionEvent::Begin)?;
        self.deal();
        self.timer.start(self.config.duration());
        self.phase = SessionPhase::Active;
        info!(
            variants = %self.config.variants(),
            duration_secs = self.config.duration().as_secs(),
            enemy = self.battle.as_ref().map(BattleResolver::enemy_name),
            "Decryption session started"
        );
        Ok(())
    }

    /// RoundComplete -> Active: fresh mapping, queue and layout, full clock.
    pub fn next_round(&mut self) -> Result<(), SessionError> {
        self.expect_phase(SessionPhase::RoundComplete, SessionEvent::NextRound)?;
        self.deal();
        self.timer.reset(self.config.duration());
        self.phase = SessionPhase::Active;
        debug!(round = self.round, "Next battle round");
        Ok(())
    }

    pub fn handle_input(&mut self, action: ActionSymbol) -> Result<Step, SessionError> {
        self.expect_phase(SessionPhase::Active, SessionEvent::Input(action))?;
        let board = self.board.as_mut().expect("active session has a board");
        let expected = board
            .queue
            .current()
            .map(|challenge| challenge.action)
            .expect("active session has a current challenge");

        if action != expected {
            return Ok(match self.timer.penalize() {
                TimerStatus::Running { remaining } => {
                    debug!(%action, remaining_ms = self.timer.remaining_ms(), "Wrong input");
                    Step::Miss { remaining }
                }
                TimerStatus::Expired | TimerStatus::Stopped => {
                    debug!(%action, "Wrong input with too little time left");
                    self.on_expiry()
                }
            });
        }

        let advance = board.queue.advance();
        debug!(%action, cursor = board.queue.cursor(), "Challenge matched");

        if let Some(battle) = self.battle.as_mut()
            && battle.player_strikes()
        {
            return Ok(self.finish(SessionPhase::Won, OutcomeReason::EnemyDefeated));
        }

        match advance {
            Advance::End if self.battle.is_some() => {
                self.timer.stop();
                self.phase = SessionPhase::RoundComplete;
                debug!(round = self.round, "Battle round cleared");
                Ok(Step::RoundComplete)
            }
            Advance::End => Ok(self.finish(SessionPhase::Won, OutcomeReason::Decrypted)),
            Advance::Next(_) => {
                self.apply_hit_effects();
                Ok(Step::Hit)
            }
        }
    }

    /// The deadline passed.
    pub fn handle_expiry(&mut self) -> Result<Step, SessionError> {
        self.expect_phase(SessionPhase::Active, SessionEvent::Expiry)?;
        self.timer.stop();
        Ok(self.on_expiry())
    }

    /// Charge `elapsed` to the clock. Returns the expiry step if the deadline
    /// passed; `None` while time remains or outside the Active phase.
    pub fn advance_time(&mut self, elapsed: Duration) -> Option<Step> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        match self.timer.advance(elapsed) {
            TimerStatus::Expired => Some(self.on_expiry()),
            TimerStatus::Running { .. } | TimerStatus::Stopped => None,
        }
    }

    /// Won/Lost -> Resolved. Returns the outcome; a second call is rejected.
    pub fn resolve(&mut self) -> Result<bool, SessionError> {
        match self.phase {
            SessionPhase::Resolved => Err(SessionError::AlreadyResolved),
            SessionPhase::Won | SessionPhase::Lost => {
                let won = self.phase == SessionPhase::Won;
                self.release();
                info!(won, reason = ?self.outcome, round = self.round, "Decryption session resolved");
                Ok(won)
            }
            phase => Err(SessionError::InvalidTransition {
                phase,
                event: SessionEvent::Resolve,
            }),
        }
    }

    /// Any phase -> Resolved.
    ///
    /// Returns the outcome that still has to be reported: the pending result of
    /// a Won/Lost session, `false` for a session abandoned mid-play, and `None`
    /// when the outcome was already resolved.
    pub fn shutdown(&mut self) -> Option<bool> {
        let pending = match self.phase {
            SessionPhase::Resolved => None,
            SessionPhase::Won => Some(true),
            SessionPhase::Lost => Some(false),
            SessionPhase::Init | SessionPhase::Active | SessionPhase::RoundComplete => {
                self.outcome = Some(OutcomeReason::Abandoned);
                Some(false)
            }
        };
        self.release();
        if pending.is_some() {
            info!(reason = ?self.outcome, "Decryption session shut down");
        }
        pending
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let (cursor, challenges, tips) = match &self.board {
            Some(board) => (
                board.queue.cursor(),
                board.queue.views(),
                board.layout.views(&board.mapping),
            ),
            None => (0, Vec::new(), Vec::new()),
        };
        SessionSnapshot {
            phase: self.phase,
            variants: self.config.variants(),
            round: self.round,
            cursor,
            challenges,
            tips,
            remaining_ms: self.timer.remaining_ms(),
            duration_ms: u64::try_from(self.config.duration().as_millis()).unwrap_or(u64::MAX),
            battle: self.battle.as_ref().map(BattleResolver::view),
            consumed_potions: self.config.consumed_potions(),
            outcome: self.outcome,
        }
    }

    fn expect_phase(&self, phase: SessionPhase, event: SessionEvent) -> Result<(), SessionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                phase: self.phase,
                event,
            })
        }
    }

    fn deal(&mut self) {
        let mapping = mapping::generate(&mut self.rng);
        let queue = ChallengeQueue::build(&mapping, QUEUE_LEN, &mut self.rng);
        let layout = TipLayout::generate(self.config.variants().blink_mode(), &mut self.rng);
        self.board = Some(Board {
            mapping,
            queue,
            layout,
        });
        self.round += 1;
    }

    fn apply_hit_effects(&mut self) {
        let variants = self.config.variants();
        let action_shuffle = variants.contains(VariantFlag::ActionShuffle);
        let screen_shuffle = variants.contains(VariantFlag::ScreenShuffle);
        if !action_shuffle && !screen_shuffle {
            return;
        }
        let Some(board) = self.board.as_mut() else {
            return;
        };
        if action_shuffle {
            board.mapping = mapping::reshuffle(&board.mapping, &mut self.rng);
            board.queue.refresh_actions(&board.mapping);
        }
        board.layout = TipLayout::generate(variants.blink_mode(), &mut self.rng);
    }

    /// Expiry transition. The timer has already stopped.
    fn on_expiry(&mut self) -> Step {
        match self.battle.as_mut() {
            Some(battle) => {
                if battle.enemy_strikes() {
                    self.finish(SessionPhase::Lost, OutcomeReason::HealthDepleted)
                } else {
                    self.timer.reset(self.config.duration());
                    debug!(
                        player_health = battle.player_health().display(),
                        "Deadline missed"
                    );
                    Step::DeadlineMissed
                }
            }
            None => self.finish(SessionPhase::Lost, OutcomeReason::TimeExpired),
        }
    }

    fn finish(&mut self, phase: SessionPhase, reason: OutcomeReason) -> Step {
        self.timer.stop();
        self.phase = phase;
        self.outcome = Some(reason);
        debug!(%phase, ?reason, "Session reached an outcome");
        if phase == SessionPhase::Won {
            Step::Won(reason)
        } else {
            Step::Lost(reason)
        }
    }

    fn release(&mut self) {
        self.timer.stop();
        self.board = None;
        self.phase = SessionPhase::Resolved;
        debug_assert!(
            !self.timer.is_running(),
            "countdown still armed after resolution"
        );
    }
}
