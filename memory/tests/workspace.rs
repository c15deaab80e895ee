use memory::{create_session, DebugDir, StorageError, DRIVE_PREFIX, RECORDING_PREFIX};
use std::fs;

#[test]
fn sessions_are_numbered_sequentially() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("sequences");

    for expected in 1..=4 {
        let session = create_session(&base, RECORDING_PREFIX).unwrap();
        assert_eq!(session.ordinal, expected);
        assert_eq!(session.path, base.join(format!("sequence_{expected}")));
        assert!(session.path.is_dir());
    }
}

#[test]
fn loose_files_do_not_count_as_sessions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"").unwrap();
    fs::create_dir(dir.path().join("drive_1")).unwrap();

    let session = create_session(dir.path(), DRIVE_PREFIX).unwrap();
    assert_eq!(session.ordinal, 2);
    assert!(dir.path().join("drive_2").is_dir());
}

#[test]
fn existing_target_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    // one directory present, so the next ordinal is 2; make that name a file
    fs::create_dir(dir.path().join("other")).unwrap();
    fs::write(dir.path().join("drive_2"), b"").unwrap();

    let err = create_session(dir.path(), DRIVE_PREFIX).unwrap_err();
    match err {
        StorageError::Io { path, .. } => assert_eq!(path, dir.path().join("drive_2")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn debug_counter_continues_after_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let debug = dir.path().join("debug");
    fs::create_dir(&debug).unwrap();
    fs::write(debug.join("1_forward_1.jpg"), b"a").unwrap();
    fs::write(debug.join("2_left_2.jpg"), b"b").unwrap();

    let frame = dir.path().join("frame.jpg");
    fs::write(&frame, b"pixels").unwrap();

    let mut dbg = DebugDir::open(&debug).unwrap();
    assert_eq!(dbg.next_index(), 3);
    let first = dbg.persist(&frame, "right", 3).unwrap();
    let second = dbg.persist(&frame, "unmapped", 3).unwrap();
    assert_eq!(first, debug.join("3_right_3.jpg"));
    assert_eq!(second, debug.join("4_unmapped_3.jpg"));
    assert_eq!(fs::read(&first).unwrap(), b"pixels");
    assert!(frame.exists());
}

#[test]
fn failed_persist_keeps_the_index() {
    let dir = tempfile::tempdir().unwrap();
    let mut dbg = DebugDir::open(dir.path().join("debug")).unwrap();
    assert_eq!(dbg.next_index(), 1);
    assert!(dbg.persist(&dir.path().join("missing.jpg"), "forward", 1).is_err());
    assert_eq!(dbg.next_index(), 1);
}
