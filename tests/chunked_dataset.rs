#[path = "common/mod.rs"]
mod common;

use std::collections::HashSet;
use std::path::PathBuf;

use common::{expected_basic_corpus_lines, make_basic_corpus, make_large_corpus, write_gz_raw};
use infinistream::{chunked_dataset_iterator, CheckpointableIterator, ChunkedDatasetConfig, LineResult};

fn identity_transform() -> Option<fn(LineResult) -> LineResult> {
    None
}

#[test]
fn no_shuffle_round_trip() {
    let base = make_basic_corpus();
    let cfg = ChunkedDatasetConfig::default()
        .with_paths([base])
        .with_shuffle(false);
    let mut ds = chunked_dataset_iterator(cfg, identity_transform()).unwrap();

    let expected = expected_basic_corpus_lines();
    for _ in 0..2 {
        for want in &expected {
            let got = ds.next().unwrap().unwrap();
            assert_eq!(&got, want);
        }
    }
}

#[test]
fn shuffle_preserves_multiset() {
    let base = make_basic_corpus();
    let cfg = ChunkedDatasetConfig::default()
        .with_paths([base])
        .with_shuffle(true)
        .with_seed(42);
    let mut ds = chunked_dataset_iterator(cfg, identity_transform()).unwrap();

    let mut got: Vec<String> = Vec::new();
    for _ in 0..14 {
        got.push(ds.next().unwrap().unwrap());
    }
    let got_set: HashSet<_> = got.into_iter().collect();
    let expected_set: HashSet<_> = expected_basic_corpus_lines().into_iter().map(String::from).collect();
    assert_eq!(got_set, expected_set);
}

#[test]
fn mixed_line_endings_match() {
    let lf_dir = tempfile::tempdir().unwrap();
    write_gz_raw(&lf_dir.path().join("a.gz"), b"alpha\nbeta\ngamma\n");

    let crlf_dir = tempfile::tempdir().unwrap();
    write_gz_raw(&crlf_dir.path().join("a.gz"), b"alpha\r\nbeta\r\ngamma\r\n");

    let read_all = |dir: PathBuf| {
        let cfg = ChunkedDatasetConfig::default().with_paths([dir]).with_shuffle(false);
        let mut ds = chunked_dataset_iterator(cfg, identity_transform()).unwrap();
        (0..3).map(|_| ds.next().unwrap().unwrap()).collect::<Vec<_>>()
    };

    assert_eq!(read_all(lf_dir.into_path()), read_all(crlf_dir.into_path()));
}

#[test]
fn foreign_file_is_ignored() {
    let base = make_basic_corpus();
    std::fs::write(base.join("README.txt"), b"not a chunk").unwrap();

    let cfg = ChunkedDatasetConfig::default()
        .with_paths([base])
        .with_shuffle(false);
    let mut ds = chunked_dataset_iterator(cfg, identity_transform()).unwrap();

    let expected = expected_basic_corpus_lines();
    for want in &expected {
        assert_eq!(&ds.next().unwrap().unwrap(), want);
    }
}

#[test]
fn transform_is_applied() {
    let base = make_basic_corpus();
    let cfg = ChunkedDatasetConfig::default()
        .with_paths([base])
        .with_shuffle(false);
    let transform: fn(LineResult) -> LineResult = |r| r.map(|s| format!("{s}!"));
    let mut ds = chunked_dataset_iterator(cfg, Some(transform)).unwrap();

    for want in expected_basic_corpus_lines() {
        assert_eq!(ds.next().unwrap().unwrap(), format!("{want}!"));
    }
}

#[test]
fn sharded_instances_partition_a_full_pass() {
    let base = make_large_corpus(8, 25); // 200 lines total across 8 chunks
    let num_instances = 4u64;

    let mut seen = HashSet::new();
    for rank in 0..num_instances {
        let cfg = ChunkedDatasetConfig::default()
            .with_paths([base.clone()])
            .with_shuffle(false)
            .with_sharding(num_instances, rank);
        let mut ds = chunked_dataset_iterator(cfg, identity_transform()).unwrap();
        for _ in 0..50 {
            let line = ds.next().unwrap().unwrap();
            assert!(seen.insert(line), "line served by more than one shard");
        }
    }
    assert_eq!(seen.len(), 200);
}

#[test]
fn checkpoint_mid_stream_matches() {
    let base = make_basic_corpus();
    let make = || {
        let cfg = ChunkedDatasetConfig::default()
            .with_paths([base.clone()])
            .with_shuffle(true)
            .with_seed(1);
        chunked_dataset_iterator(cfg, identity_transform()).unwrap()
    };

    let mut a = make();
    for _ in 0..23 {
        a.next().unwrap().unwrap();
    }
    let checkpoint = a.get_state();
    let tail_a: Vec<String> = (0..7).map(|_| a.next().unwrap().unwrap()).collect();

    let mut b = make();
    b.set_state(Some(checkpoint));
    let tail_b: Vec<String> = (0..7).map(|_| b.next().unwrap().unwrap()).collect();

    assert_eq!(tail_a, tail_b);
}
