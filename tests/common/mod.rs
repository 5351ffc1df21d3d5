//! Shared test utilities and fixtures
//!
//! A scripted player that reads the hint board from snapshots, the way a
//! person at the keyboard would.

#![allow(dead_code)]

use decryptor_engine::{
    ChannelInput, SessionHandle, SessionRequest, SessionSnapshot, start_session,
};
use decryptor_types::{ActionSymbol, SessionPhase};
use tokio::sync::{mpsc, watch};

pub struct Player {
    pub session: SessionHandle,
    tx: mpsc::Sender<ActionSymbol>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl Player {
    pub fn start(request: SessionRequest) -> Self {
        let (tx, input) = ChannelInput::channel();
        let session = start_session(request, input).expect("valid request");
        let snapshots = session.snapshots();
        Self {
            session,
            tx,
            snapshots,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Press `action` and return the snapshot the driver published for it.
    pub async fn press(&mut self, action: ActionSymbol) -> SessionSnapshot {
        self.snapshots.borrow_and_update();
        self.tx.send(action).await.expect("session accepts input");
        self.snapshots.changed().await.expect("driver publishes");
        self.snapshots.borrow_and_update().clone()
    }

    /// Press the action bound to the active glyph.
    pub async fn hit(&mut self) -> SessionSnapshot {
        let action = correct_action(&self.snapshot());
        self.press(action).await
    }

    /// Press a primary action that is not the right one.
    pub async fn miss(&mut self) -> SessionSnapshot {
        let right = correct_action(&self.snapshot());
        let wrong = ActionSymbol::PRIMARY
            .into_iter()
            .find(|action| *action != right)
            .expect("eight primary actions");
        self.press(wrong).await
    }

    /// Hit until the session leaves the Active phase or `limit` hits pass.
    pub async fn hit_until_done(&mut self, limit: usize) -> SessionSnapshot {
        let mut last = self.snapshot();
        for _ in 0..limit {
            if last.phase != SessionPhase::Active {
                break;
            }
            last = self.hit().await;
        }
        last
    }
}

pub fn correct_action(snapshot: &SessionSnapshot) -> ActionSymbol {
    let glyph = snapshot.active_glyph().expect("an active challenge");
    snapshot
        .tips
        .iter()
        .find(|tip| tip.glyph == glyph)
        .map(|tip| tip.action)
        .expect("every glyph has a tip")
}
