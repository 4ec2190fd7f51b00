use infinistream::{
    sampling_random_map, CheckpointableIterator, InfinitePermutation, Map, Prefetch, SelectMany,
    Zip, Zip2,
};
use std::time::Duration;

fn drain_n<I: CheckpointableIterator>(it: &mut I, n: usize) -> Vec<I::Item> {
    (0..n).filter_map(|_| it.next()).collect()
}

fn naturals(n: u64) -> InfinitePermutation<u64> {
    InfinitePermutation::new((0..n).collect(), None, false, 1, 0).unwrap()
}

#[test]
fn map_passes_through_upstream_state() {
    let upstream = naturals(10);
    let mut mapped = Map::new(upstream, |x: u64| x * 2);
    assert_eq!(drain_n(&mut mapped, 5), vec![0, 2, 4, 6, 8]);

    let checkpoint = mapped.get_state();
    let mut resumed = Map::new(naturals(10), |x: u64| x * 2);
    resumed.set_state(Some(checkpoint));
    assert_eq!(drain_n(&mut resumed, 3), vec![10, 12, 14]);
}

#[test]
fn select_many_flattens_and_checkpoints() {
    let upstream = naturals(4); // 0,1,2,3,0,1,2,3,...
    let mut expanded = SelectMany::new(upstream, |x: &u64| vec![*x; *x as usize]);
    // 0 -> [], 1 -> [1], 2 -> [2,2], 3 -> [3,3,3], then wraps
    let out = drain_n(&mut expanded, 6);
    assert_eq!(out, vec![1, 2, 2, 3, 3, 3]);

    let checkpoint = expanded.get_state();
    let mut resumed = SelectMany::new(naturals(4), |x: &u64| vec![*x; *x as usize]);
    resumed.set_state(Some(checkpoint));
    let tail_a = drain_n(&mut expanded, 4);
    let tail_b = drain_n(&mut resumed, 4);
    assert_eq!(tail_a, tail_b);
}

#[test]
fn zip_ends_with_shortest_upstream() {
    let a = naturals(3);
    let b = naturals(100);
    let mut zipped = Zip2::new(a, b);
    let out = drain_n(&mut zipped, 10);
    // naturals(3) repeats forever (0,1,2,0,1,2,...), so zipping it against a
    // longer-period upstream never ends on its own; this just checks pairing.
    assert_eq!(out[0], (0, 0));
    assert_eq!(out[3], (0, 3));
}

#[test]
fn homogeneous_zip_combines_n_upstreams() {
    let upstreams = vec![naturals(5), naturals(5), naturals(5)];
    let mut zipped = Zip::new(upstreams);
    let first = zipped.next().unwrap();
    assert_eq!(first, vec![0, 0, 0]);
}

#[test]
fn sampling_random_map_is_checkpointable() {
    let upstream = naturals(1000);
    let mut mapped = sampling_random_map(upstream, 123, |rng, x: u64| {
        x + infinistream::uniform_below(rng, 10)
    });
    let a = drain_n(&mut mapped, 20);
    let checkpoint = mapped.get_state();
    let tail_a = drain_n(&mut mapped, 15);

    let mut resumed = sampling_random_map(naturals(1000), 123, |rng, x: u64| {
        x + infinistream::uniform_below(rng, 10)
    });
    resumed.set_state(Some(checkpoint));
    let tail_b = drain_n(&mut resumed, 15);

    assert_eq!(tail_a, tail_b);
    assert_eq!(a.len(), 20);
}

#[test]
fn prefetch_preserves_order_and_checkpoints() {
    let upstream = naturals(500);
    let mut prefetch = Prefetch::new(upstream, 16, Duration::from_millis(20)).unwrap();

    let head = drain_n(&mut prefetch, 50);
    assert_eq!(head, (0..50).map(|x| x % 500).collect::<Vec<_>>());

    let checkpoint = prefetch.get_state();
    let tail_a = drain_n(&mut prefetch, 30);

    let mut resumed = Prefetch::new(naturals(500), 16, Duration::from_millis(20)).unwrap();
    resumed.set_state(Some(checkpoint));
    let tail_b = drain_n(&mut resumed, 30);

    assert_eq!(tail_a, tail_b);
}
