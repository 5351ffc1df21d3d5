//! Async runtime for decryptor sessions.
//!
//! [`start_session`] validates a request, starts the session and spawns its
//! driver task. The caller keeps a [`SessionHandle`] to await the outcome,
//! watch snapshots, or shut the session down.
//!
//! ```ignore
//! let (tx, input) = ChannelInput::channel();
//! let mut session = start_session(SessionRequest::fight("Cultist"), input)?;
//! let won = session.outcome().await;
//! ```

mod driver;
mod input;
mod reporter;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use decryptor_core::SessionController;
pub use decryptor_types::{ConfigurationError, SessionRequest, SessionSnapshot};

use driver::Driver;
pub use input::{ChannelInput, InputSource, ScriptedInput, StreamInput};
pub use reporter::OutcomeReporter;

// ============================================================================
// Entry points
// ============================================================================

/// Start a session fed by `input`.
///
/// Configuration errors are returned before anything is spawned. Must be
/// called from within a tokio runtime.
pub fn start_session<I: InputSource>(
    request: SessionRequest,
    input: I,
) -> Result<SessionHandle, ConfigurationError> {
    let config = request.validate()?;
    Ok(spawn(SessionController::new(config), input))
}

/// [`start_session`] with a fixed random seed, for reproducible boards.
pub fn start_seeded_session<I: InputSource>(
    request: SessionRequest,
    input: I,
    seed: u64,
) -> Result<SessionHandle, ConfigurationError> {
    let config = request.validate()?;
    Ok(spawn(SessionController::seeded(config, seed), input))
}

fn spawn<I: InputSource>(mut controller: SessionController, input: I) -> SessionHandle {
    controller
        .begin()
        .expect("fresh controller accepts begin");

    let (reporter, outcome_rx) = OutcomeReporter::new();
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let driver = Driver::new(controller, input, reporter, snapshot_tx, shutdown_rx);
    let task = tokio::spawn(driver.run());

    SessionHandle {
        outcome_rx,
        settled: None,
        snapshots: snapshot_rx,
        shutdown: shutdown_tx,
        task,
    }
}

// ============================================================================
// SessionHandle
// ============================================================================

/// Caller-side view of a running session.
///
/// Dropping the handle abandons the session.
#[derive(Debug)]
pub struct SessionHandle {
    outcome_rx: oneshot::Receiver<bool>,
    settled: Option<bool>,
    snapshots: watch::Receiver<SessionSnapshot>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Wait for the outcome: `true` when the player won.
    ///
    /// Settles exactly once; later calls return the same value.
    pub async fn outcome(&mut self) -> bool {
        if let Some(won) = self.settled {
            return won;
        }
        let won = (&mut self.outcome_rx).await.unwrap_or(false);
        self.settled = Some(won);
        won
    }

    /// Stop the session. Safe in any phase and more than once; an unfinished
    /// session settles as lost.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// A receiver that sees every published snapshot.
    #[must_use]
    pub fn snapshots(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Whether the driver task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
