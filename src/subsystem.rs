//! The audio subsystem: both backend classes, their queues, the timebase and
//! the queue thread, started and stopped as a unit.

use crate::builder::AudioSubsystemBuilder;
use crate::{Error, Result};
use clavier_backend::{Backend, BackendIo, BackendRegistry, DriverTable};
use clavier_core::{
    app_channel, AppMessage, AppReceiver, AppSender, AudioConfig, QueueSet, QueueSignal,
    QueueThread, TimebaseArbiter, TimebasePriority,
};
use clavier_midi::{BackendClass, ImmediateEvent};
use std::sync::Arc;

/// Owns the backend bindings and everything they share.
///
/// Control methods (`initialize`, `shutdown`, `reconfigure`, `panic`, ...)
/// take `&mut self` and belong to one controlling thread. Queue and timebase
/// methods take `&self` and never block; drivers reach the same operations
/// through their [`BackendIo`].
///
/// # Example
///
/// ```ignore
/// use clavier::prelude::*;
///
/// let mut audio = AudioSubsystem::builder()
///     .driver(BackendClass::Audio, "loopback", |class| Box::new(Loopback::new(class)))
///     .build();
///
/// audio.initialize(&AudioConfig {
///     audio_driver: "loopback".into(),
///     ..Default::default()
/// })?;
///
/// audio.play_midi_event(BackendClass::Audio, 0, &[0x90, 60, 100]);
/// audio.dispatch_pending(|message| println!("{message:?}"));
/// audio.shutdown()?;
/// ```
pub struct AudioSubsystem {
    registry: BackendRegistry,
    queues: Arc<QueueSet>,
    timebase: Arc<TimebaseArbiter>,
    signal: Arc<QueueSignal>,
    queue_thread: Option<QueueThread>,
    app_tx: AppSender,
    app_rx: AppReceiver,
    config: Option<AudioConfig>,
}

impl AudioSubsystem {
    pub fn builder() -> AudioSubsystemBuilder {
        AudioSubsystemBuilder::default()
    }

    /// A subsystem with only the dummy driver available.
    pub fn new() -> Self {
        Self::with_drivers(DriverTable::new())
    }

    pub(crate) fn with_drivers(drivers: DriverTable) -> Self {
        let signal = Arc::new(QueueSignal::new());
        let queues = Arc::new(QueueSet::new());
        let timebase = Arc::new(TimebaseArbiter::new(Arc::clone(&signal)));
        let io = BackendIo::new(
            Arc::clone(&queues),
            Arc::clone(&timebase),
            Arc::clone(&signal),
        );
        let (app_tx, app_rx) = app_channel(AudioConfig::default().app_channel_capacity);

        Self {
            registry: BackendRegistry::new(drivers, io),
            queues,
            timebase,
            signal,
            queue_thread: None,
            app_tx,
            app_rx,
            config: None,
        }
    }

    /// Create both queues, bind both classes and start the queue thread.
    ///
    /// The audio class is initialized first; if it fails the MIDI class is not
    /// attempted. On any failure everything is torn down again and the error
    /// returned, so the subsystem is left stopped with both classes resolving
    /// to the dummy.
    pub fn initialize(&mut self, config: &AudioConfig) -> Result<()> {
        if self.config.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        config.validate()?;

        tracing::info!(
            audio_driver = %config.audio_driver,
            midi_driver = %config.midi_driver,
            sample_rate = config.sample_rate,
            period_size = config.period_size,
            "initializing audio subsystem"
        );

        for class in BackendClass::ALL {
            self.queues.create(class, config.queue_capacity(class));
        }
        let (app_tx, app_rx) = app_channel(config.app_channel_capacity);
        self.app_tx = app_tx;
        self.app_rx = app_rx;

        match self.start(config) {
            Ok(()) => {
                self.config = Some(config.clone());
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "audio subsystem failed to initialize");
                let _ = self.shutdown();
                Err(e)
            }
        }
    }

    fn start(&mut self, config: &AudioConfig) -> Result<()> {
        self.registry
            .select_and_initialize(BackendClass::Audio, config)?;
        self.registry
            .select_and_initialize(BackendClass::Midi, config)?;

        let thread = QueueThread::spawn(
            Arc::clone(&self.queues),
            Arc::clone(&self.timebase),
            Arc::clone(&self.signal),
            self.app_tx.clone(),
            config.queue_timeout(),
        )?;
        self.queue_thread = Some(thread);
        Ok(())
    }

    /// Stop the queue thread and tear down both classes.
    ///
    /// Safe from any state, including a partial or failed initialization.
    /// Every step runs even if an earlier one fails; the first failure is
    /// returned.
    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(mut thread) = self.queue_thread.take() {
            thread.shutdown();
        }

        let result = self.for_each_class(BackendRegistry::teardown);

        if self.config.take().is_some() {
            tracing::info!("audio subsystem shut down");
        }
        result
    }

    /// Apply a changed configuration to both classes.
    ///
    /// Same driver name: the bound backend reconfigures in place. Different
    /// name: that class is torn down and selected again. Initializes instead
    /// if the subsystem is not running.
    pub fn reconfigure(&mut self, config: &AudioConfig) -> Result<()> {
        if self.config.is_none() {
            return self.initialize(config);
        }
        config.validate()?;

        let result = self.for_each_class(|registry, class| registry.reconfigure(class, config));
        self.config = Some(config.clone());
        result
    }

    /// Normalize `buffer` and queue it for immediate playback on `class`.
    ///
    /// Returns false if it was malformed or the queue is full.
    #[inline]
    pub fn play_midi_event(&self, class: BackendClass, port: u16, buffer: &[u8]) -> bool {
        self.queues.play_midi_event(class, port, buffer)
    }

    /// Queue a device event as if `class`'s backend had received it.
    #[inline]
    pub fn input_midi_event(&self, class: BackendClass, port: u16, buffer: &[u8]) -> bool {
        self.registry.io().input_midi_event(class, port, buffer)
    }

    /// Pop the next immediate event for `class`'s render callback.
    #[inline]
    pub fn read_event_from_queue(
        &self,
        class: BackendClass,
        until_time: f64,
    ) -> Option<ImmediateEvent> {
        self.queues.read_event_from_queue(class, until_time)
    }

    #[inline]
    pub fn update_playback_time(&self, priority: TimebasePriority, time: f64) -> bool {
        self.timebase.update(priority, time)
    }

    #[inline]
    pub fn get_playback_time(&self) -> f64 {
        self.timebase.get_time()
    }

    /// Jump to `time`; the next clock update is ignored.
    pub fn reset_playback_time(&self, time: f64) {
        self.timebase.reset(time);
    }

    pub fn panic(&mut self, class: BackendClass) -> Result<()> {
        Ok(self.registry.panic(class)?)
    }

    /// Tell both bound backends that playback started.
    pub fn start_playing(&mut self) -> Result<()> {
        self.for_each_class(BackendRegistry::start_playing)
    }

    /// Tell both bound backends that playback stopped.
    pub fn stop_playing(&mut self) -> Result<()> {
        self.for_each_class(BackendRegistry::stop_playing)
    }

    fn for_each_class(
        &mut self,
        mut op: impl FnMut(&mut BackendRegistry, BackendClass) -> clavier_backend::Result<()>,
    ) -> Result<()> {
        let mut result = Ok(());
        for class in BackendClass::ALL {
            if let Err(e) = op(&mut self.registry, class) {
                if result.is_ok() {
                    result = Err(e.into());
                }
            }
        }
        result
    }

    /// Backend bound to `class`; the dummy when none is.
    pub fn backend(&self, class: BackendClass) -> &dyn Backend {
        self.registry.get(class)
    }

    /// Registered name of the driver bound to `class`.
    pub fn driver_name(&self, class: BackendClass) -> &str {
        self.registry.driver_name(class)
    }

    /// Handle for code that acts like a driver, e.g. a render callback
    /// living outside the registry.
    pub fn io(&self) -> BackendIo {
        self.registry.io().clone()
    }

    /// Receiver for messages posted by the queue thread.
    ///
    /// Each [`initialize`](Self::initialize) opens a new channel holding at
    /// most `app_channel_capacity` messages; take the receiver after it.
    /// Messages posted while the channel is full are dropped.
    pub fn app_receiver(&self) -> AppReceiver {
        self.app_rx.clone()
    }

    /// Run `handler` on every message the queue thread has posted so far.
    pub fn dispatch_pending(&self, handler: impl FnMut(AppMessage)) -> usize {
        self.app_rx.dispatch_pending(handler)
    }

    pub fn is_running(&self) -> bool {
        self.queue_thread
            .as_ref()
            .is_some_and(QueueThread::is_running)
    }

    pub fn config(&self) -> Option<&AudioConfig> {
        self.config.as_ref()
    }
}

impl Default for AudioSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioSubsystem {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
