use attic_snapshot::{
    load_state, save_state, BasicVariant, EmulatorState, MountedDiskReference, ReplMode,
    StateMetadata, HEADER_LEN, STATE_MAGIC, STATE_VERSION_V1,
};

fn sample_metadata() -> StateMetadata {
    StateMetadata {
        timestamp: "2026-08-31T09:30:00Z".to_owned(),
        repl_mode: ReplMode::Basic(BasicVariant::Atari),
        mounted_disks: vec![
            MountedDiskReference {
                drive: 1,
                path: "/images/games.atr".to_owned(),
                disk_type: "SS/SD".to_owned(),
                read_only: false,
            },
            MountedDiskReference {
                drive: 2,
                path: "/images/data.atr".to_owned(),
                disk_type: "DS/DD".to_owned(),
                read_only: true,
            },
        ],
        note: Some("level 3".to_owned()),
        app_version: "1.4.0".to_owned(),
    }
}

fn patterned_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

#[test]
fn roundtrip_across_payload_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machine.state");
    let metadata = sample_metadata();

    for len in [0usize, 1, 19, 256, 4096, 10_000] {
        let payload = patterned_payload(len);
        save_state(&path, &metadata, &EmulatorState::from_raw(payload.clone())).unwrap();
        let (read_metadata, read_state) = load_state(&path).unwrap();
        assert_eq!(read_metadata, metadata);
        assert_eq!(read_state.as_bytes(), payload.as_slice());
    }
}

#[test]
fn written_header_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machine.state");
    save_state(&path, &sample_metadata(), &EmulatorState::from_raw(vec![7; 3])).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], STATE_MAGIC);
    assert_eq!(bytes[4], STATE_VERSION_V1);
    assert_eq!(bytes[5], 0);
    assert_eq!(&bytes[6..HEADER_LEN], &[0u8; 10]);
}

#[test]
fn length_field_matches_metadata_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machine.state");
    let payload = patterned_payload(64);
    save_state(
        &path,
        &sample_metadata(),
        &EmulatorState::from_raw(payload.clone()),
    )
    .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let len = u32::from_le_bytes(bytes[16..20].try_into().unwrap()) as usize;
    assert_eq!(bytes.len(), 20 + len + payload.len());

    // The framed section alone must be a valid record.
    let record: serde_json::Value = serde_json::from_slice(&bytes[20..20 + len]).unwrap();
    assert_eq!(record["mode"], "basic");
    assert_eq!(record["basicVariant"], "atari");
    assert_eq!(record["appVersion"], "1.4.0");
    assert_eq!(record["mountedDisks"].as_array().unwrap().len(), 2);
}

#[test]
fn dos_scenario_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dos.state");
    let metadata = StateMetadata {
        timestamp: "2026-08-31T10:00:00Z".to_owned(),
        repl_mode: ReplMode::Dos,
        mounted_disks: vec![MountedDiskReference {
            drive: 1,
            path: "/d1.atr".to_owned(),
            disk_type: "SS/SD".to_owned(),
            read_only: false,
        }],
        note: None,
        app_version: "1.4.0".to_owned(),
    };

    save_state(&path, &metadata, &EmulatorState::from_raw(vec![1, 2, 3, 4, 5])).unwrap();
    let (read_metadata, read_state) = load_state(&path).unwrap();
    assert_eq!(read_metadata, metadata);
    assert_eq!(read_state.as_bytes(), &[1, 2, 3, 4, 5]);
}

#[test]
fn overwrite_replaces_file_and_leaves_no_temp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machine.state");
    let metadata = sample_metadata();

    save_state(&path, &metadata, &EmulatorState::from_raw(vec![0xaa; 100])).unwrap();
    save_state(&path, &metadata, &EmulatorState::from_raw(vec![0x55; 8])).unwrap();

    let (_, state) = load_state(&path).unwrap();
    assert_eq!(state.as_bytes(), &[0x55; 8]);
    assert!(!dir.path().join("machine.state.tmp").exists());
}

#[test]
fn write_failure_leaves_target_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machine.state");
    let metadata = sample_metadata();
    save_state(&path, &metadata, &EmulatorState::from_raw(vec![9; 16])).unwrap();

    // Pointing the writer at a directory that does not exist fails the
    // temp-file creation; the earlier file must be untouched.
    let bad = dir.path().join("missing-dir").join("machine.state");
    let err = save_state(&bad, &metadata, &EmulatorState::from_raw(vec![1])).unwrap_err();
    assert!(matches!(err, attic_snapshot::StateFileError::Write(_)));

    let (_, state) = load_state(&path).unwrap();
    assert_eq!(state.as_bytes(), &[9; 16]);
}
