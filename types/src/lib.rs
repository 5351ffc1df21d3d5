//! Core domain types for the decryptor minigame.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer: the state machine, the async
//! driver, and front-ends that only render snapshots.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod config;
mod health;
mod mapping;
mod session;
mod symbols;
mod variants;

pub use config::{
    BattleConfig, ConfigurationError, DEFAULT_DURATION_SECS, DEFAULT_ENEMY_HITS_TO_LOSE,
    DEFAULT_PLAYER_HITS_TO_WIN, MAX_LUCIDITY, PotionEffects, SessionConfig, SessionRequest,
    start_health_for_lucidity,
};
pub use health::{Health, MAX_HEALTH};
pub use mapping::{ActionGlyphMapping, MappingError};
pub use session::{
    BattleView, ChallengeView, OutcomeReason, SessionError, SessionEvent, SessionPhase,
    SessionSnapshot, TipView,
};
pub use symbols::{ActionSymbol, Glyph, PRIMARY_COUNT, SYMBOL_COUNT, UnknownActionError};
pub use variants::{BlinkMode, UnknownVariantError, VariantFlag, Variants};
