//! Test helpers and fixtures for clavier integration tests
//!
//! Drivers here stand in for real hardware:
//! - [`LoopbackBackend`]: audio driver with a render thread that drains the
//!   immediate queue and drives the playback clock
//! - [`VirtualMidiBackend`]: MIDI driver whose "device" is a
//!   [`VirtualKeyboard`] the test plays on
//! - [`FailingBackend`]: refuses to initialize

#![allow(dead_code)]

use clavier::prelude::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Wake interval used by tests that measure shutdown latency.
pub const TEST_QUEUE_TIMEOUT_MS: u64 = 100;

/// Render period of the loopback driver.
pub const RENDER_PERIOD: Duration = Duration::from_millis(1);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Config selecting the given drivers, everything else default.
pub fn config(audio: &str, midi: &str) -> AudioConfig {
    AudioConfig {
        audio_driver: audio.into(),
        midi_driver: midi.into(),
        queue_timeout_ms: TEST_QUEUE_TIMEOUT_MS,
        ..Default::default()
    }
}

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}

/// Everything the loopback render thread has played, in order.
pub type Rendered = Arc<Mutex<Vec<Vec<u8>>>>;

pub struct LoopbackBackend {
    class: BackendClass,
    rendered: Rendered,
    running: Arc<AtomicBool>,
    render_thread: Option<JoinHandle<()>>,
    playing: Arc<AtomicBool>,
}

impl LoopbackBackend {
    pub fn new(class: BackendClass, rendered: Rendered) -> Self {
        Self {
            class,
            rendered,
            running: Arc::new(AtomicBool::new(false)),
            render_thread: None,
            playing: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Backend for LoopbackBackend {
    fn name(&self) -> &str {
        "loopback"
    }

    fn initialize(&mut self, config: &AudioConfig, io: BackendIo) -> BackendResult {
        let class = self.class;
        let rendered = Arc::clone(&self.rendered);
        let running = Arc::clone(&self.running);
        let playing = Arc::clone(&self.playing);
        let period = config.period_duration();
        running.store(true, Ordering::Release);

        let handle = thread::Builder::new()
            .name("loopback-render".into())
            .spawn(move || {
                let mut time = 0.0;
                while running.load(Ordering::Acquire) {
                    while let Some(event) = io.read_event_from_queue(class, time + period) {
                        rendered.lock().push(event.bytes().to_vec());
                    }
                    if playing.load(Ordering::Acquire) {
                        time += period;
                        io.update_playback_time(TimebasePriority::AudioClock, time);
                    }
                    thread::sleep(RENDER_PERIOD);
                }
            })
            .map_err(|e| BackendError::Stream(e.to_string()))?;
        self.render_thread = Some(handle);
        Ok(())
    }

    fn destroy(&mut self) -> BackendResult {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.render_thread.take() {
            handle
                .join()
                .map_err(|_| BackendError::Failed("render thread panicked".into()))?;
        }
        Ok(())
    }

    fn reconfigure(&mut self, _config: &AudioConfig) -> BackendResult {
        Ok(())
    }

    fn start_playing(&mut self) -> BackendResult {
        self.playing.store(true, Ordering::Release);
        Ok(())
    }

    fn stop_playing(&mut self) -> BackendResult {
        self.playing.store(false, Ordering::Release);
        Ok(())
    }

    fn panic(&mut self) -> BackendResult {
        self.rendered.lock().push(vec![0xB0, 123, 0]);
        Ok(())
    }
}

impl Drop for LoopbackBackend {
    fn drop(&mut self) {
        let _ = self.destroy();
    }
}

/// The device side of a [`VirtualMidiBackend`]: plays notes into the input
/// queue the way a driver's polling thread would.
#[derive(Clone, Default)]
pub struct VirtualKeyboard {
    io: Arc<Mutex<Option<BackendIo>>>,
}

impl VirtualKeyboard {
    /// Returns false if the driver is not initialized or the queue is full.
    pub fn send(&self, port: u16, bytes: &[u8]) -> bool {
        match self.io.lock().as_ref() {
            Some(io) => io.input_midi_event(BackendClass::Midi, port, bytes),
            None => false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.io.lock().is_some()
    }
}

pub struct VirtualMidiBackend {
    keyboard: VirtualKeyboard,
}

impl VirtualMidiBackend {
    pub fn new(keyboard: VirtualKeyboard) -> Self {
        Self { keyboard }
    }
}

impl Backend for VirtualMidiBackend {
    fn name(&self) -> &str {
        "virtual"
    }

    fn initialize(&mut self, _config: &AudioConfig, io: BackendIo) -> BackendResult {
        *self.keyboard.io.lock() = Some(io);
        Ok(())
    }

    fn destroy(&mut self) -> BackendResult {
        *self.keyboard.io.lock() = None;
        Ok(())
    }

    fn reconfigure(&mut self, _config: &AudioConfig) -> BackendResult {
        Ok(())
    }

    fn start_playing(&mut self) -> BackendResult {
        Ok(())
    }

    fn stop_playing(&mut self) -> BackendResult {
        Ok(())
    }

    fn panic(&mut self) -> BackendResult {
        Ok(())
    }
}

pub struct FailingBackend;

impl Backend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    fn initialize(&mut self, _config: &AudioConfig, _io: BackendIo) -> BackendResult {
        Err(BackendError::Device("device unplugged".into()))
    }

    fn destroy(&mut self) -> BackendResult {
        Ok(())
    }

    fn reconfigure(&mut self, _config: &AudioConfig) -> BackendResult {
        Err(BackendError::Device("device unplugged".into()))
    }

    fn start_playing(&mut self) -> BackendResult {
        Ok(())
    }

    fn stop_playing(&mut self) -> BackendResult {
        Ok(())
    }

    fn panic(&mut self) -> BackendResult {
        Ok(())
    }
}

/// A subsystem with loopback audio, a virtual MIDI keyboard and a failing
/// driver registered, not yet initialized.
pub struct Rig {
    pub audio: AudioSubsystem,
    pub rendered: Rendered,
    pub keyboard: VirtualKeyboard,
}

pub fn rig() -> Rig {
    init_tracing();
    let rendered: Rendered = Arc::default();
    let keyboard = VirtualKeyboard::default();

    let audio = {
        let rendered = Arc::clone(&rendered);
        let keyboard = keyboard.clone();
        AudioSubsystem::builder()
            .driver(BackendClass::Audio, "loopback", move |class| {
                Box::new(LoopbackBackend::new(class, Arc::clone(&rendered)))
            })
            .driver(BackendClass::Midi, "virtual", move |_| {
                Box::new(VirtualMidiBackend::new(keyboard.clone()))
            })
            .driver(BackendClass::Audio, "failing", |_| Box::new(FailingBackend))
            .driver(BackendClass::Midi, "failing", |_| Box::new(FailingBackend))
            .build()
    };

    Rig {
        audio,
        rendered,
        keyboard,
    }
}

/// A rig already initialized with loopback audio and the virtual keyboard.
pub fn running_rig() -> Rig {
    let mut rig = rig();
    rig.audio
        .initialize(&config("loopback", "virtual"))
        .expect("Failed to initialize test rig");
    rig
}
