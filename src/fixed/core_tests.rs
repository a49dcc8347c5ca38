use super::*;

fn close(value: Twiddle, re: f64, im: f64) -> bool {
    let c = value.to_complex();
    (c.re - re).abs() < 1e-9 && (c.im - im).abs() < 1e-9
}

#[test]
fn test_precompute_bitrev() {
    let n = 8;
    let mut bitrev = std::vec![0; n];
    precompute_bitrev(&mut bitrev, n);

    assert_eq!(bitrev, [0, 4, 2, 6, 1, 5, 3, 7]);
}

#[test]
fn test_twiddle_quarter_turn() {
    // N = 4: W^0 = 1, W^1 = -j
    assert!(close(twiddle(0, 4, Direction::Forward), 1.0, 0.0));
    assert!(close(twiddle(1, 4, Direction::Forward), 0.0, -1.0));
    assert!(close(twiddle(1, 4, Direction::Inverse), 0.0, 1.0));
}

#[test]
fn test_stage_twiddles_n16() {
    let n = 16;

    // Rank 0 walks the whole half circle
    let rank0 = stage_twiddles(n, 0, Direction::Forward);
    assert_eq!(rank0.len(), 8);
    for (t, w) in rank0.iter().enumerate() {
        assert_eq!(*w, twiddle(t, n, Direction::Forward));
    }

    // Rank 1 repeats W^0, W^2, W^4, W^6 twice
    let rank1 = stage_twiddles(n, 1, Direction::Forward);
    let expected: std::vec::Vec<_> = [0, 2, 4, 6, 0, 2, 4, 6]
        .iter()
        .map(|&k| twiddle(k, n, Direction::Forward))
        .collect();
    assert_eq!(rank1, expected);

    // Rank 2 alternates W^0, W^4
    let rank2 = stage_twiddles(n, 2, Direction::Forward);
    assert!(close(rank2[0], 1.0, 0.0));
    assert!(close(rank2[1], 0.0, -1.0));
    assert_eq!(rank2[6], rank2[0]);
    assert_eq!(rank2[7], rank2[1]);
}
