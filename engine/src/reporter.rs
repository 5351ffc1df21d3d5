//! One-shot delivery of the session outcome to the caller.

use tokio::sync::oneshot;
use tracing::{debug, warn};

use decryptor_types::SessionError;

/// Sending half of the caller's outcome future.
///
/// Holds the sender until the first [`OutcomeReporter::resolve`]. Dropping an
/// unresolved reporter settles the caller with `false`.
#[derive(Debug)]
pub struct OutcomeReporter {
    tx: Option<oneshot::Sender<bool>>,
}

impl OutcomeReporter {
    #[must_use]
    pub fn new() -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Settle the outcome. Only the first call has an effect.
    pub fn resolve(&mut self, won: bool) -> Result<(), SessionError> {
        let Some(tx) = self.tx.take() else {
            warn!(won, "Outcome reported twice; ignoring");
            return Err(SessionError::AlreadyResolved);
        };
        if tx.send(won).is_err() {
            debug!(won, "Outcome receiver already dropped");
        }
        Ok(())
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.tx.is_none()
    }
}

impl Drop for OutcomeReporter {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            warn!("Outcome reporter dropped unresolved; reporting a loss");
            let _ = tx.send(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_resolution_wins() {
        let (mut reporter, rx) = OutcomeReporter::new();
        assert!(!reporter.is_resolved());
        reporter.resolve(true).unwrap();
        assert!(reporter.is_resolved());
        assert_eq!(reporter.resolve(false), Err(SessionError::AlreadyResolved));
        assert!(rx.await.unwrap());
    }

    #[tokio::test]
    async fn dropping_unresolved_reports_loss() {
        let (reporter, rx) = OutcomeReporter::new();
        drop(reporter);
        assert!(!rx.await.unwrap());
    }

    #[tokio::test]
    async fn resolving_after_receiver_dropped_is_fine() {
        let (mut reporter, rx) = OutcomeReporter::new();
        drop(rx);
        assert_eq!(reporter.resolve(true), Ok(()));
    }
}
