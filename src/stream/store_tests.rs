use super::*;
use std::vec::Vec;

/// Clocks `ticks` values through lane A and lane B of a store and records what
/// comes out, reading each lane before writing it.
fn drive<S: BackingStore<u32>>(store: &mut S, ticks: u32) -> Vec<(u32, u32)> {
    (0..ticks)
        .map(|t| {
            let out = (store.read(Lane::A), store.read(Lane::B));
            store.write(Lane::A, t + 1);
            store.write(Lane::B, 1000 + t);
            out
        })
        .collect()
}

#[test]
fn test_ring_store_delays_by_depth() {
    let mut store = RingStore::new(3);
    let out = drive(&mut store, 8);

    assert_eq!(&out[..3], &[(0, 0), (0, 0), (0, 0)]);
    assert_eq!(out[3], (1, 1000));
    assert_eq!(out[7], (5, 1004));
}

#[test]
fn test_ping_pong_store_delays_by_depth() {
    let mut store = PingPongStore::new(4);
    let out = drive(&mut store, 12);

    for (t, &pair) in out.iter().enumerate() {
        let expected = if t < 4 { (0, 0) } else { (t as u32 - 3, 1000 + t as u32 - 4) };
        assert_eq!(pair, expected, "tick {}", t);
    }
}

#[test]
fn test_strategies_are_indistinguishable() {
    for depth in [1, 2, 8, 64] {
        let ring = drive(&mut RingStore::new(depth), 5 * depth as u32 + 3);
        let ping_pong = drive(&mut PingPongStore::new(depth), 5 * depth as u32 + 3);
        assert_eq!(ring, ping_pong, "depth {}", depth);
    }
}

#[test]
fn test_lanes_do_not_share_slots() {
    let mut store = PingPongStore::new(2);
    for t in 0..2 {
        store.write(Lane::A, 7 + t);
        store.write(Lane::B, 70 + t);
    }
    assert_eq!(store.read(Lane::A), 7);
    assert_eq!(store.read(Lane::B), 70);
}

#[test]
fn test_reset_clears_contents_and_cursors() {
    let mut store = DelayStore::for_depth(4, 2);
    drive(&mut store, 6);
    store.reset();

    let out = drive(&mut store, 5);
    assert_eq!(&out[..4], &[(0, 0); 4]);
    assert_eq!(out[4], (1, 1000));
}

#[test]
fn test_threshold_selects_strategy() {
    assert_eq!(DelayStore::<u32>::for_depth(255, 256).strategy(), Strategy::Shallow);
    assert_eq!(DelayStore::<u32>::for_depth(256, 256).strategy(), Strategy::Deep);
    assert_eq!(DelayStore::<u32>::for_depth(1, DEFAULT_DEEP_THRESHOLD).depth(), 1);
}

#[test]
fn test_delay_line_shift() {
    let mut line = DelayLine::new(2);
    assert_eq!(line.shift(true), false);
    assert_eq!(line.shift(false), false);
    assert_eq!(line.shift(false), true);

    let mut wire = DelayLine::new(0);
    assert_eq!(wire.shift(5u8), 5);
}
