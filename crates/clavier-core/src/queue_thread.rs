//! Background thread that drains device input and reports playback time.
//!
//! Cycle: `Idle -> Waiting -> Draining -> Idle`, ending in `Stopped`. The
//! wait ends on a [`QueueSignal`] or after the configured timeout, so
//! shutdown completes within one timeout even if nobody signals.

use crate::dispatch::{AppMessage, AppSender, PostError};
use crate::lockfree::AtomicFlag;
use crate::queue::QueueSet;
use crate::signal::QueueSignal;
use crate::timebase::TimebaseArbiter;
use crate::{Error, Result};
use clavier_midi::BackendClass;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum QueueThreadState {
    Idle = 0,
    Waiting = 1,
    Draining = 2,
    Stopped = 3,
}

impl QueueThreadState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Waiting,
            2 => Self::Draining,
            3 => Self::Stopped,
            _ => Self::Idle,
        }
    }
}

pub struct QueueThread {
    thread_handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicFlag>,
    state: Arc<AtomicU8>,
    signal: Arc<QueueSignal>,
}

impl QueueThread {
    /// Start the thread. Fails only if the OS refuses to create it.
    pub fn spawn(
        queues: Arc<QueueSet>,
        timebase: Arc<TimebaseArbiter>,
        signal: Arc<QueueSignal>,
        sender: AppSender,
        timeout: Duration,
    ) -> Result<Self> {
        let shutdown = Arc::new(AtomicFlag::new(false));
        let state = Arc::new(AtomicU8::new(QueueThreadState::Idle as u8));

        let start_time = timebase.get_time();
        let handle = {
            let shutdown = Arc::clone(&shutdown);
            let state = Arc::clone(&state);
            let signal = Arc::clone(&signal);
            thread::Builder::new()
                .name("clavier-queue".into())
                .spawn(move || {
                    queue_loop(
                        queues, timebase, signal, sender, shutdown, state, timeout, start_time,
                    )
                })
                .map_err(Error::ThreadSpawn)?
        };

        tracing::debug!(timeout_ms = timeout.as_millis() as u64, "queue thread started");

        Ok(Self {
            thread_handle: Some(handle),
            shutdown,
            state,
            signal,
        })
    }

    /// Wake the thread for an immediate drain.
    pub fn signal(&self) {
        self.signal.signal();
    }

    pub fn state(&self) -> QueueThreadState {
        QueueThreadState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Stop and join. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.thread_handle.take() else {
            return;
        };
        self.shutdown.set(true);
        self.signal.signal();
        if handle.join().is_err() {
            tracing::error!("queue thread panicked");
        }
        tracing::debug!("queue thread stopped");
    }
}

impl Drop for QueueThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[allow(clippy::too_many_arguments)]
fn queue_loop(
    queues: Arc<QueueSet>,
    timebase: Arc<TimebaseArbiter>,
    signal: Arc<QueueSignal>,
    sender: AppSender,
    shutdown: Arc<AtomicFlag>,
    state: Arc<AtomicU8>,
    timeout: Duration,
    mut last_time: f64,
) {
    let set_state = |s: QueueThreadState| state.store(s as u8, Ordering::Release);
    let mut dropping = false;
    let mut post = |message: AppMessage| match sender.post(message) {
        Ok(()) => dropping = false,
        Err(PostError::Full) => {
            if !dropping {
                tracing::warn!(
                    capacity = sender.capacity(),
                    "application is not dispatching, dropping messages"
                );
                dropping = true;
            }
        }
        Err(PostError::Disconnected) => {}
    };

    loop {
        set_state(QueueThreadState::Waiting);
        signal.wait(timeout);

        if shutdown.get() {
            break;
        }

        set_state(QueueThreadState::Draining);
        while let Some(event) = queues.read_input(BackendClass::Midi) {
            post(AppMessage::MidiInput(event));
        }

        let now = timebase.get_time();
        if now != last_time {
            last_time = now;
            post(AppMessage::PlaybackTime(now));
        }
        set_state(QueueThreadState::Idle);
    }

    set_state(QueueThreadState::Stopped);
}
