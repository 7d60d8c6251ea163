//! Subsystem lifecycle: initialize, failover, shutdown and reconfigure.

use crate::helpers::*;
use clavier::backend::Error as BackendRegistryError;
use clavier::prelude::*;
use std::time::{Duration, Instant};

#[test]
fn test_initialize_binds_registered_drivers() {
    let rig = running_rig();
    assert!(rig.audio.is_running());
    assert_eq!(rig.audio.backend(BackendClass::Audio).name(), "loopback");
    assert_eq!(rig.audio.backend(BackendClass::Default).name(), "loopback");
    assert_eq!(rig.audio.backend(BackendClass::Midi).name(), "virtual");
    assert_eq!(rig.audio.driver_name(BackendClass::Midi), "virtual");
    assert!(rig.keyboard.is_connected());
}

#[test]
fn test_unknown_drivers_fail_and_resolve_to_dummy() {
    let mut rig = rig();
    let err = rig
        .audio
        .initialize(&config("nonexistent", "nonexistent"))
        .unwrap_err();

    assert!(err.is_driver_failure());
    assert!(matches!(
        err,
        Error::Backend(BackendRegistryError::UnknownDriver {
            class: BackendClass::Audio,
            ..
        })
    ));
    assert!(!rig.audio.is_running());
    assert!(rig.audio.backend(BackendClass::Audio).is_dummy());
    assert!(rig.audio.backend(BackendClass::Midi).is_dummy());
}

#[test]
fn test_failing_audio_driver_tears_everything_down() {
    let mut rig = rig();
    let err = rig
        .audio
        .initialize(&config("failing", "virtual"))
        .unwrap_err();

    match err {
        Error::Backend(BackendRegistryError::Initialize { class, driver, .. }) => {
            assert_eq!(class, BackendClass::Audio);
            assert_eq!(driver, "failing");
        }
        other => panic!("unexpected error: {other}"),
    }
    // MIDI is never attempted after the audio class fails.
    assert!(!rig.keyboard.is_connected());
    assert!(!rig.audio.is_running());
    assert!(rig.audio.config().is_none());
    assert!(!rig.audio.play_midi_event(BackendClass::Audio, 0, &[0x90, 60, 100]));
}

#[test]
fn test_failing_midi_driver_releases_audio_driver() {
    let mut rig = rig();
    assert!(rig.audio.initialize(&config("loopback", "failing")).is_err());
    assert!(rig.audio.backend(BackendClass::Audio).is_dummy());
    assert!(rig.audio.backend(BackendClass::Midi).is_dummy());

    // The subsystem can be initialized again after a failure.
    rig.audio.initialize(&config("loopback", "virtual")).unwrap();
    assert!(rig.audio.is_running());
}

#[test]
fn test_disabled_driver_name_reported() {
    let mut rig = rig();
    let err = rig.audio.initialize(&config("portaudio", "dummy")).unwrap_err();
    assert!(err.to_string().contains("not enabled"));
}

#[test]
fn test_shutdown_joins_within_one_timeout() {
    let mut rig = running_rig();
    // Let the queue thread settle into its wait.
    std::thread::sleep(Duration::from_millis(20));

    let start = Instant::now();
    rig.audio.shutdown().unwrap();
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_millis(TEST_QUEUE_TIMEOUT_MS * 3),
        "shutdown took {elapsed:?}"
    );
    assert!(!rig.audio.is_running());
    assert!(!rig.keyboard.is_connected());
    assert!(rig.audio.backend(BackendClass::Audio).is_dummy());
}

#[test]
fn test_shutdown_while_draining() {
    let mut rig = running_rig();
    for i in 0..200u8 {
        rig.keyboard.send(0, &[0x90, i % 128, 100]);
    }
    let start = Instant::now();
    rig.audio.shutdown().unwrap();
    assert!(start.elapsed() < Duration::from_millis(TEST_QUEUE_TIMEOUT_MS * 3));
}

#[test]
fn test_shutdown_is_idempotent() {
    let mut rig = running_rig();
    rig.audio.shutdown().unwrap();
    rig.audio.shutdown().unwrap();
    assert!(!rig.audio.is_running());
}

#[test]
fn test_reconfigure_switches_midi_driver() {
    let mut rig = running_rig();
    rig.audio.reconfigure(&config("loopback", "dummy")).unwrap();
    assert!(!rig.keyboard.is_connected());
    assert!(rig.audio.backend(BackendClass::Midi).is_dummy());
    assert_eq!(rig.audio.backend(BackendClass::Audio).name(), "loopback");
    assert_eq!(rig.audio.config().unwrap().midi_driver, "dummy");

    rig.audio.reconfigure(&config("loopback", "virtual")).unwrap();
    assert!(rig.keyboard.is_connected());
    assert!(rig.keyboard.send(0, &[0x90, 60, 100]));
}

#[test]
fn test_reconfigure_before_initialize_initializes() {
    let mut rig = rig();
    rig.audio.reconfigure(&config("loopback", "virtual")).unwrap();
    assert!(rig.audio.is_running());
}

#[test]
fn test_panic_forwards_to_bound_backend() {
    let mut rig = running_rig();
    rig.audio.panic(BackendClass::Audio).unwrap();
    assert!(rig.rendered.lock().contains(&vec![0xB0, 123, 0]));
    rig.audio.panic(BackendClass::Midi).unwrap();
}

#[test]
fn test_builder_initialize() {
    let audio = AudioSubsystem::builder()
        .initialize(&AudioConfig::default())
        .unwrap();
    assert!(audio.is_running());
    assert!(audio.backend(BackendClass::Audio).is_dummy());
    // Dropping shuts down.
}
