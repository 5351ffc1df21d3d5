//! Keyboard input for the terminal demo.
//!
//! A blocking thread polls crossterm and forwards translated keys over a
//! bounded channel, so the async loop never blocks on the terminal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, spawn_blocking};
use tokio::time::timeout;
use tracing::warn;

use decryptor_types::ActionSymbol;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Action(ActionSymbol),
    Quit,
}

/// Arrows and the four face buttons. `1`-`4` and `a`/`b`/`x`/`y` both reach
/// the buttons. Trick symbols have no key.
#[must_use]
pub fn command_for_key(key: KeyEvent) -> Option<KeyCommand> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'd')).then_some(KeyCommand::Quit);
    }
    let action = match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Some(KeyCommand::Quit),
        KeyCode::Up => ActionSymbol::Up,
        KeyCode::Down => ActionSymbol::Down,
        KeyCode::Left => ActionSymbol::Left,
        KeyCode::Right => ActionSymbol::Right,
        KeyCode::Char('1' | 'a' | 'A') => ActionSymbol::Button1,
        KeyCode::Char('2' | 'b' | 'B') => ActionSymbol::Button2,
        KeyCode::Char('3' | 'x' | 'X') => ActionSymbol::Button3,
        KeyCode::Char('4' | 'y' | 'Y') => ActionSymbol::Button4,
        _ => return None,
    };
    Some(KeyCommand::Action(action))
}

pub struct KeyPump {
    rx: mpsc::Receiver<KeyCommand>,
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl KeyPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    /// Next key command; `None` once the input thread has stopped.
    pub async fn recv(&mut self) -> Option<KeyCommand> {
        self.rx.recv().await
    }

    pub async fn shutdown(&mut self) {
        self.rx.close();
        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for KeyPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for KeyPump {
    fn drop(&mut self) {
        // Best-effort stop; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<KeyCommand>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(command) = command_for_key(key)
                        && tx.blocking_send(command).is_err()
                    {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Terminal read failed: {e}");
                    let _ = tx.blocking_send(KeyCommand::Quit);
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                warn!("Terminal poll failed: {e}");
                let _ = tx.blocking_send(KeyCommand::Quit);
                break;
            }
        }
    }
}
