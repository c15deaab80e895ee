mod common;

use common::{DeadCamera, StillCamera, jpg_count};
use memory::{RECORDING_PREFIX, SequenceRecord, create_session};
use motor::{Actuator, Level, Line, MemoryLines};
use rover::{LoopError, Recorder, RecorderConfig, spawn_key_reader};
use sensor::Camera;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

fn quick() -> RecorderConfig {
    RecorderConfig {
        forward_hold: Duration::from_millis(2),
        turn_hold: Duration::from_millis(1),
        ..RecorderConfig::default()
    }
}

fn recorder<C: Camera>(dir: &std::path::Path, camera: C, lines: MemoryLines) -> Recorder<C> {
    let session = create_session(&dir.join("sequences"), RECORDING_PREFIX).unwrap();
    Recorder::new(camera, Actuator::new(lines), session, quick())
}

#[test]
fn keys_become_labeled_entries_until_z() {
    let dir = tempfile::tempdir().unwrap();
    let lines = MemoryLines::new();
    let mut rec = recorder(dir.path(), StillCamera::new(), lines.clone());
    let running = AtomicBool::new(true);

    let path = rec.run(Cursor::new("w\nd\nz\nw\n"), &running).unwrap();
    assert_eq!(path, dir.path().join("sequences/sequence_1/sequence.json"));

    let saved = SequenceRecord::load(&path).unwrap();
    let actions: Vec<_> = saved.entries().iter().map(|e| e.action.as_deref()).collect();
    assert_eq!(actions, vec![Some("forward"), Some("right")]);
    // the z frame is captured but not recorded
    assert_eq!(jpg_count(&rec.session().path), 3);
    assert!(saved.entries().iter().all(|e| e.photo.exists()));
    assert!(lines.levels().is_idle());
}

#[test]
fn stop_and_unknown_keys_record_photo_only() {
    let dir = tempfile::tempdir().unwrap();
    let lines = MemoryLines::new();
    let mut rec = recorder(dir.path(), StillCamera::new(), lines.clone());
    let running = AtomicBool::new(true);

    let path = rec.run(Cursor::new("x\nq\n  s  \nz\n"), &running).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let entries = value["sequence"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries[0].get("action").is_none());
    assert!(entries[1].get("action").is_none());
    assert_eq!(entries[2]["action"], "backward");

    let backward_drive = lines
        .writes()
        .iter()
        .any(|&(line, level)| line == Line::In1 && level == Level::High);
    assert!(backward_drive);
}

#[test]
fn end_of_input_still_flushes() {
    let dir = tempfile::tempdir().unwrap();
    let mut rec = recorder(dir.path(), StillCamera::new(), MemoryLines::new());
    let running = AtomicBool::new(true);

    let path = rec.run(Cursor::new("a\n"), &running).unwrap();
    let saved = SequenceRecord::load(&path).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved.entries()[0].action.as_deref(), Some("left"));
}

#[test]
fn cleared_flag_writes_an_empty_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let mut rec = recorder(dir.path(), StillCamera::new(), MemoryLines::new());
    let running = AtomicBool::new(false);

    let path = rec.run(Cursor::new("w\n"), &running).unwrap();
    assert!(SequenceRecord::load(&path).unwrap().is_empty());
    assert_eq!(jpg_count(&rec.session().path), 0);
}

#[test]
fn dead_camera_fails_but_sequence_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let mut rec = recorder(dir.path(), DeadCamera, MemoryLines::new());
    let running = AtomicBool::new(true);

    let err = rec.run(Cursor::new("w\nw\nw\n"), &running).unwrap_err();
    assert!(matches!(err, LoopError::Capture(_)));
    assert!(rec.session().path.join("sequence.json").exists());
    assert!(rec.record().is_empty());
}

#[test]
fn forward_holds_longer_than_turns() {
    let config = RecorderConfig::default();
    assert_eq!(config.hold_for(motor::Command::Forward), Duration::from_secs(1));
    assert_eq!(config.hold_for(motor::Command::Left), Duration::from_millis(500));
    assert_eq!(config.hold_for(motor::Command::Backward), Duration::from_millis(500));
    assert_eq!(config.hold_for(motor::Command::Stop), Duration::ZERO);
}

#[test]
fn undecodable_key_records_photo_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut rec = recorder(dir.path(), StillCamera::new(), MemoryLines::new());
    let running = AtomicBool::new(true);

    let input: &[u8] = &[0xff, b'\n', b'w', b'\n', b'd', b'\n', b'z', b'\n'];
    let path = rec.run(Cursor::new(input), &running).unwrap();
    let saved = SequenceRecord::load(&path).unwrap();
    let actions: Vec<_> = saved.entries().iter().map(|e| e.action.as_deref()).collect();
    assert_eq!(actions, vec![None, Some("forward"), Some("right")]);
}

#[test]
fn keys_from_reader_thread() {
    let dir = tempfile::tempdir().unwrap();
    let mut rec = recorder(dir.path(), StillCamera::new(), MemoryLines::new());
    let running = AtomicBool::new(true);

    let keys = spawn_key_reader(Cursor::new(b"a\nx\nz\n".to_vec()));
    let path = rec.run_keys(&keys, &running).unwrap();
    let saved = SequenceRecord::load(&path).unwrap();
    let actions: Vec<_> = saved.entries().iter().map(|e| e.action.as_deref()).collect();
    assert_eq!(actions, vec![Some("left"), None]);
}

#[test]
fn cleared_flag_ends_a_wait_for_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut rec = recorder(dir.path(), StillCamera::new(), MemoryLines::new());
    let running = Arc::new(AtomicBool::new(true));
    let (tx, keys) = mpsc::channel::<Vec<u8>>();
    tx.send(b"w\n".to_vec()).unwrap();

    let flag = running.clone();
    let interrupt = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        flag.store(false, Ordering::SeqCst);
    });

    let started = Instant::now();
    // tx stays alive: only the cleared flag can end the second wait
    let path = rec.run_keys(&keys, &running).unwrap();
    interrupt.join().unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));

    let saved = SequenceRecord::load(&path).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved.entries()[0].action.as_deref(), Some("forward"));
    drop(tx);
}
