//! Playback clock arbitration across bound drivers.

use crate::helpers::*;
use approx::assert_relative_eq;
use clavier::prelude::*;
use std::time::Duration;

#[test]
fn test_midi_clock_ignored_while_real_audio_bound() {
    let rig = running_rig();
    assert!(rig.audio.update_playback_time(TimebasePriority::AudioClock, 1.0));
    assert!(!rig.audio.update_playback_time(TimebasePriority::MidiClock, 7.0));
    assert!(!rig.audio.update_playback_time(TimebasePriority::DummyClock, 7.0));
    assert_relative_eq!(rig.audio.get_playback_time(), 1.0);
}

#[test]
fn test_midi_clock_drives_time_with_dummy_audio() {
    let mut rig = rig();
    rig.audio.initialize(&config("dummy", "virtual")).unwrap();
    assert!(rig.audio.update_playback_time(TimebasePriority::MidiClock, 3.5));
    assert!(!rig.audio.update_playback_time(TimebasePriority::DummyClock, 9.0));
    assert_relative_eq!(rig.audio.get_playback_time(), 3.5);
}

#[test]
fn test_dummy_clock_accepted_when_all_dummy() {
    let mut rig = rig();
    rig.audio.initialize(&config("dummy", "dummy")).unwrap();
    assert!(rig.audio.update_playback_time(TimebasePriority::DummyClock, 0.5));
    assert_relative_eq!(rig.audio.get_playback_time(), 0.5);
}

#[test]
fn test_reset_absorbs_one_stale_update() {
    let rig = running_rig();
    rig.audio.update_playback_time(TimebasePriority::AudioClock, 30.0);
    rig.audio.reset_playback_time(0.0);
    assert!(!rig.audio.update_playback_time(TimebasePriority::AudioClock, 30.005));
    assert_relative_eq!(rig.audio.get_playback_time(), 0.0);
    assert!(rig.audio.update_playback_time(TimebasePriority::AudioClock, 0.005));
}

#[test]
fn test_render_thread_advances_clock_while_playing() {
    let mut rig = running_rig();
    assert_relative_eq!(rig.audio.get_playback_time(), 0.0);

    rig.audio.start_playing().unwrap();
    assert!(wait_until(Duration::from_secs(2), || {
        rig.audio.get_playback_time() > 0.0
    }));

    rig.audio.stop_playing().unwrap();
    std::thread::sleep(Duration::from_millis(10));
    let stopped_at = rig.audio.get_playback_time();
    std::thread::sleep(Duration::from_millis(20));
    assert_relative_eq!(rig.audio.get_playback_time(), stopped_at);
}

#[test]
fn test_time_change_posted_to_application() {
    let rig = running_rig();
    let receiver = rig.audio.app_receiver();
    rig.audio.update_playback_time(TimebasePriority::AudioClock, 4.25);

    let mut seen = None;
    while let Some(message) = receiver.recv_timeout(Duration::from_secs(2)) {
        if let AppMessage::PlaybackTime(t) = message {
            seen = Some(t);
            break;
        }
    }
    assert_eq!(seen, Some(4.25));
}

#[test]
fn test_undispatched_time_updates_stay_bounded() {
    let mut rig = rig();
    let mut cfg = config("loopback", "virtual");
    cfg.app_channel_capacity = 16;
    rig.audio.initialize(&cfg).unwrap();
    let receiver = rig.audio.app_receiver();

    rig.audio.start_playing().unwrap();
    assert!(wait_until(Duration::from_secs(2), || receiver.len() == 16));
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(receiver.len(), 16);

    // Draining makes room for the clock again.
    assert_eq!(rig.audio.dispatch_pending(|_| {}), 16);
    assert!(wait_until(Duration::from_secs(2), || !receiver.is_empty()));
    rig.audio.stop_playing().unwrap();
}
