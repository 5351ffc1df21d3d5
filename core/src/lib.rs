//! Core domain logic for the decryptor minigame.
//!
//! Everything here is synchronous and clock-free. The session controller owns
//! one mapping, one challenge queue, one tip layout and one logical countdown;
//! the engine crate feeds it inputs and elapsed time.

mod battle;
mod layout;
pub mod mapping;
mod queue;
mod session;
mod timer;

pub use battle::BattleResolver;
pub use layout::{BOARD_COLUMNS, BOARD_ROWS, TipLayout};
pub use queue::{Advance, Challenge, ChallengeQueue, QUEUE_LEN};
pub use session::{SessionController, Step};
pub use timer::{CountdownTimer, TimerStatus, WRONG_INPUT_PENALTY};
