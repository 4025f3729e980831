//! Process signal handling.
//!
//! A background thread turns SIGINT, SIGTERM and SIGHUP into a
//! [`SignalMessage::Shutdown`] on a channel and clears the shared `running`
//! flag. The showcase and simulation loops poll both; the signal thread never
//! touches carousel state.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalMessage {
    /// SIGINT, SIGTERM or SIGHUP.
    Shutdown,
}

/// Signal handling state shared between threads.
pub struct SignalState {
    /// Cleared once a shutdown signal arrives.
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
    /// Kept so loops can request their own shutdown (e.g. the `q` key).
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    /// State with no OS handlers attached.
    pub fn detached() -> Self {
        let (signal_sender, signal_receiver) = channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        let _ = self.signal_sender.send(SignalMessage::Shutdown);
        self.running.store(false, Ordering::SeqCst);
    }

    /// Drain pending messages; returns true if a shutdown was among them.
    pub fn shutdown_requested(&self) -> bool {
        let mut shutdown = !self.is_running();
        loop {
            match self.signal_receiver.try_recv() {
                Ok(SignalMessage::Shutdown) => shutdown = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        shutdown
    }
}

fn describe(signal: i32, debug_enabled: bool) -> &'static str {
    match signal {
        SIGINT if debug_enabled => "Received SIGINT (Ctrl+C), initiating graceful shutdown...",
        SIGINT => "Received interrupt signal, initiating graceful shutdown...",
        SIGTERM => "Received termination request, initiating graceful shutdown...",
        SIGHUP => "Received hangup signal, initiating graceful shutdown...",
        _ => "Received shutdown signal, initiating graceful shutdown...",
    }
}

/// Register SIGINT, SIGTERM and SIGHUP and spawn the listener thread.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let state = SignalState::detached();

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("failed to register signal handlers")?;

    let running = state.running.clone();
    let sender = state.signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            log_pipe!();
            log_info!("{}", describe(sig, debug_enabled));

            if let Err(e) = sender.send(SignalMessage::Shutdown) {
                log_warning!("Failed to send shutdown message: {e}");
            }
            running.store(false, Ordering::SeqCst);
        }
    });

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_state_runs_until_asked() {
        let state = SignalState::detached();
        assert!(state.is_running());
        assert!(!state.shutdown_requested());

        state.request_shutdown();
        assert!(!state.is_running());
        assert!(state.shutdown_requested());
    }

    #[test]
    fn test_message_alone_is_enough() {
        let state = SignalState::detached();
        state.signal_sender.send(SignalMessage::Shutdown).unwrap();
        assert!(state.shutdown_requested());
    }

    #[test]
    fn test_signal_descriptions() {
        assert!(describe(SIGINT, true).contains("SIGINT"));
        assert!(describe(SIGINT, false).contains("interrupt"));
        assert!(describe(SIGHUP, false).contains("hangup"));
    }
}
