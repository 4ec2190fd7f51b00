use infinistream::{
    load_checkpoint_bincode, load_checkpoint_json, save_checkpoint_bincode, save_checkpoint_json,
    CheckpointableIterator, InfinitePermutation,
};

#[test]
fn json_round_trip_resumes_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoint.json");

    let mut original = InfinitePermutation::new((0..30).collect(), Some(11), true, 1, 0).unwrap();
    for _ in 0..12 {
        original.next();
    }
    let state = original.get_state();
    save_checkpoint_json(&path, &state).unwrap();

    let restored_state = load_checkpoint_json(&path).unwrap();
    let mut restored = InfinitePermutation::new((0..30).collect(), Some(11), true, 1, 0).unwrap();
    restored.set_state(Some(restored_state));

    let expected: Vec<u64> = (0..5).filter_map(|_| original.next()).collect();
    let actual: Vec<u64> = (0..5).filter_map(|_| restored.next()).collect();
    assert_eq!(expected, actual);
}

#[test]
fn bincode_round_trip_resumes_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoint.bin");

    let mut original = InfinitePermutation::new((0..30).collect(), Some(4), false, 1, 0).unwrap();
    for _ in 0..40 {
        original.next();
    }
    let state = original.get_state();
    save_checkpoint_bincode(&path, &state).unwrap();

    let restored_state = load_checkpoint_bincode(&path).unwrap();
    let mut restored = InfinitePermutation::new((0..30).collect(), Some(4), false, 1, 0).unwrap();
    restored.set_state(Some(restored_state));

    let expected: Vec<u64> = (0..8).filter_map(|_| original.next()).collect();
    let actual: Vec<u64> = (0..8).filter_map(|_| restored.next()).collect();
    assert_eq!(expected, actual);
}
