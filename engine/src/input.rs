//! Sources of player actions.
//!
//! The driver polls an [`InputSource`] inside `tokio::select!`, so every
//! `next_action` future must be cancel-safe: dropping it before completion
//! loses no action.

use std::collections::VecDeque;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use decryptor_types::ActionSymbol;

const INPUT_CHANNEL_CAPACITY: usize = 64;

/// A lazy sequence of player actions.
pub trait InputSource: Send + 'static {
    /// Next action, or `None` once the source is exhausted. An exhausted
    /// source is not polled again; the session keeps running on its timer.
    fn next_action(&mut self) -> impl Future<Output = Option<ActionSymbol>> + Send;
}

/// Actions pushed through a bounded mpsc channel.
#[derive(Debug)]
pub struct ChannelInput {
    rx: mpsc::Receiver<ActionSymbol>,
}

impl ChannelInput {
    /// A connected sender/source pair.
    #[must_use]
    pub fn channel() -> (mpsc::Sender<ActionSymbol>, Self) {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        (tx, Self { rx })
    }

    #[must_use]
    pub fn new(rx: mpsc::Receiver<ActionSymbol>) -> Self {
        Self { rx }
    }
}

impl InputSource for ChannelInput {
    async fn next_action(&mut self) -> Option<ActionSymbol> {
        self.rx.recv().await
    }
}

/// Any unpinned stream of actions.
pub struct StreamInput<S> {
    stream: S,
}

impl<S> StreamInput<S>
where
    S: Stream<Item = ActionSymbol> + Unpin + Send + 'static,
{
    pub fn new(stream: S) -> Self {
        Self { stream }
    }
}

impl<S> InputSource for StreamInput<S>
where
    S: Stream<Item = ActionSymbol> + Unpin + Send + 'static,
{
    async fn next_action(&mut self) -> Option<ActionSymbol> {
        self.stream.next().await
    }
}

/// A fixed list of actions, each released after its delay.
///
/// Delays are measured from the previous release (or from the first poll).
/// The release instant is fixed on first poll, so a cancelled wait resumes
/// where it left off.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    steps: VecDeque<(Duration, ActionSymbol)>,
    due: Option<Instant>,
}

impl ScriptedInput {
    pub fn new(steps: impl IntoIterator<Item = (Duration, ActionSymbol)>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            due: None,
        }
    }

    /// The same delay before every action.
    pub fn evenly(delay: Duration, actions: impl IntoIterator<Item = ActionSymbol>) -> Self {
        Self::new(actions.into_iter().map(|action| (delay, action)))
    }

    /// A source with no actions; the session runs on its timer alone.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl InputSource for ScriptedInput {
    async fn next_action(&mut self) -> Option<ActionSymbol> {
        let (delay, action) = *self.steps.front()?;
        let due = *self.due.get_or_insert_with(|| Instant::now() + delay);
        sleep_until(due).await;
        self.steps.pop_front();
        self.due = None;
        Some(action)
    }
}
