//! The per-session event loop.
//!
//! One task owns the controller. Each loop iteration waits on three sources
//! with a fixed priority: shutdown, then the countdown deadline, then input.
//! Elapsed time is charged to the countdown on every wake-up before anything
//! else is applied, so an input arriving after the deadline can never beat
//! the expiry.

use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use decryptor_core::{SessionController, Step};
use decryptor_types::{ActionSymbol, SessionPhase, SessionSnapshot};

use crate::input::InputSource;
use crate::reporter::OutcomeReporter;

pub(crate) struct Driver<I> {
    controller: SessionController,
    input: I,
    input_open: bool,
    reporter: OutcomeReporter,
    snapshots: watch::Sender<SessionSnapshot>,
    shutdown: watch::Receiver<bool>,
    last_tick: Instant,
}

impl<I: InputSource> Driver<I> {
    /// `controller` must already be Active.
    pub(crate) fn new(
        controller: SessionController,
        input: I,
        reporter: OutcomeReporter,
        snapshots: watch::Sender<SessionSnapshot>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            controller,
            input,
            input_open: true,
            reporter,
            snapshots,
            shutdown,
            last_tick: Instant::now(),
        }
    }

    pub(crate) async fn run(mut self) {
        loop {
            // A countdown too long to land on the clock never fires.
            let deadline = self
                .controller
                .deadline()
                .and_then(|left| self.last_tick.checked_add(left));

            tokio::select! {
                biased;

                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        debug!("Session handle dropped; shutting down");
                    }
                    self.shut_down();
                    return;
                }

                () = sleep_until(deadline.unwrap_or(self.last_tick)), if deadline.is_some() => {
                    self.tick();
                }

                action = self.input.next_action(), if self.input_open => {
                    match action {
                        Some(action) => self.on_input(action),
                        None => {
                            debug!("Input source exhausted");
                            self.input_open = false;
                        }
                    }
                }
            }

            if self.controller.phase().is_terminal() {
                self.settle();
                return;
            }
        }
    }

    /// Charge wall time since the last wake-up.
    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        if let Some(step) = self.controller.advance_time(elapsed) {
            self.apply(step);
        }
    }

    fn on_input(&mut self, action: ActionSymbol) {
        self.tick();
        if self.controller.phase() != SessionPhase::Active {
            debug!(%action, phase = %self.controller.phase(), "Input dropped after expiry");
            return;
        }
        match self.controller.handle_input(action) {
            Ok(step) => self.apply(step),
            Err(err) => debug!(%err, "Input ignored"),
        }
    }

    fn apply(&mut self, step: Step) {
        if step == Step::RoundComplete
            && let Err(err) = self.controller.next_round()
        {
            warn!(%err, "Could not start next round");
        }
        self.publish();
    }

    fn settle(&mut self) {
        match self.controller.resolve() {
            Ok(won) => {
                let _ = self.reporter.resolve(won);
            }
            Err(err) => warn!(%err, "Resolve failed"),
        }
        self.publish();
    }

    fn shut_down(&mut self) {
        if let Some(won) = self.controller.shutdown() {
            let _ = self.reporter.resolve(won);
        }
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.controller.snapshot());
    }
}
