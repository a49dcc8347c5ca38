use super::*;
use crate::fixed::core::precompute_bitrev;
use crate::fixed::ComplexFixed;
use crate::stream::store::Strategy;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::vec::Vec;

type IndexPipeline = Pipeline<FixedButterfly<0>, TableTwiddles>;
type Q15Pipeline = Pipeline<FixedButterfly<15>, TableTwiddles>;

fn idx(i: usize) -> ComplexFixed<0> {
    ComplexFixed::from_bits(i as i32, 0)
}

fn index_block(n: usize, offset: usize) -> (Vec<ComplexFixed<0>>, Vec<ComplexFixed<0>>) {
    let a = (0..n / 2).map(|i| idx(offset + i)).collect();
    let b = (n / 2..n).map(|i| idx(offset + i)).collect();
    (a, b)
}

fn dft(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len();
    (0..n)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(i, x)| {
                    let angle = -2.0 * core::f64::consts::PI * ((i * k) % n) as f64 / n as f64;
                    x * Complex64::new(angle.cos(), angle.sin())
                })
                .sum()
        })
        .collect()
}

fn random_frame(rng: &mut StdRng, n: usize) -> Vec<Complex64> {
    (0..n)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect()
}

#[test]
fn test_config_validation() {
    assert_eq!(
        PipelineConfig::new(1, 16).validate(),
        Err(ConfigError::TransformTooSmall { nfft: 1 })
    );
    assert_eq!(
        PipelineConfig::new(25, 16).validate(),
        Err(ConfigError::TransformTooLarge { nfft: 25 })
    );
    assert_eq!(
        PipelineConfig::new(4, 32).validate(),
        Err(ConfigError::InvalidSampleWidth { bits: 32 })
    );
    assert!(Q15Pipeline::new(PipelineConfig::new(0, 16)).is_err());
    assert!(PipelineConfig::new(2, 2).validate().is_ok());
}

#[test]
fn test_stage_depths_and_latency() {
    let config = PipelineConfig::new(4, 24);
    let depths: Vec<usize> = (0..config.stage_count()).map(|i| config.stage_depth(i)).collect();
    assert_eq!(depths, [4, 2, 1]);

    // Three stages of (1 + 1 + 1 + depth), plus a terminal rank of 3
    let pipeline = Q15Pipeline::new(config).unwrap();
    assert_eq!(pipeline.latency(), (3 + 4) + (3 + 2) + (3 + 1) + 3);

    let pipeline = Q15Pipeline::new(config.with_latencies(2, 3, 0)).unwrap();
    assert_eq!(pipeline.latency(), 3 * 5 + (4 + 2 + 1) + 5);
}

#[test]
fn test_unit_count_must_match_transform_size() {
    let config = PipelineConfig::new(4, 24);
    let units: Vec<_> = (0..3)
        .map(|rank| {
            (
                FixedButterfly::<15>::new(1, 24, Scaling::None),
                TableTwiddles::for_stage(4, rank, Direction::Forward, 1),
            )
        })
        .collect();

    assert_eq!(
        Pipeline::with_units(config, units).err(),
        Some(ConfigError::StageCountMismatch { expected: 4, found: 3 })
    );
}

#[test]
fn test_bypass_reproduces_dif_position_order() {
    for nfft in 2..=8 {
        let config = PipelineConfig::new(nfft, 31);
        let n = config.transform_len();
        let mut pipeline = IndexPipeline::new(config).unwrap();
        let (a, b) = index_block(n, 0);

        let (out_a, out_b) = pipeline.process_block(&a, &b, true).unwrap();
        let expected_a: Vec<_> = (0..n / 2).map(|t| idx(2 * t)).collect();
        let expected_b: Vec<_> = (0..n / 2).map(|t| idx(2 * t + 1)).collect();
        assert_eq!(out_a, expected_a, "nfft {}", nfft);
        assert_eq!(out_b, expected_b, "nfft {}", nfft);
    }
}

#[test]
fn test_commutator_chain_matches_literal_trace() {
    // N = 16: the three commutators advanced in lockstep, one tick at a time
    let mut chain: Vec<CommutatorBuffer<u32>> =
        [4, 2, 1].iter().map(|&d| CommutatorBuffer::new(d).unwrap()).collect();

    let mut out = (Vec::new(), Vec::new());
    for tick in 0..8 + 7 {
        let (mut a, mut b, mut en) = if tick < 8 { (tick, tick + 8, true) } else { (0, 0, false) };
        for comm in &mut chain {
            let beat = comm.push(a, b, en);
            (a, b, en) = (beat.a, beat.b, beat.valid);
        }
        if en {
            out.0.push(a);
            out.1.push(b);
        }
    }
    assert_eq!(out.0, [0, 2, 4, 6, 8, 10, 12, 14]);
    assert_eq!(out.1, [1, 3, 5, 7, 9, 11, 13, 15]);
}

#[test]
fn test_deep_stages_in_large_transform() {
    let config = PipelineConfig::new(16, 31);
    let n = config.transform_len();
    let mut pipeline = IndexPipeline::new(config).unwrap();

    let strategies: Vec<_> = pipeline
        .stages()
        .iter()
        .map(|s| s.commutator().unwrap().store().strategy())
        .collect();
    // Depths 16384 down to 256 are deep, 128 and below are shallow
    assert_eq!(strategies.iter().filter(|&&s| s == Strategy::Deep).count(), 7);
    assert_eq!(strategies.last(), Some(&Strategy::Shallow));

    let (a, b) = index_block(n, 0);
    let (out_a, out_b) = pipeline.process_block(&a, &b, true).unwrap();
    assert_eq!(out_a.len(), n / 2);
    assert!(out_a.iter().enumerate().all(|(t, &v)| v == idx(2 * t)));
    assert!(out_b.iter().enumerate().all(|(t, &v)| v == idx(2 * t + 1)));
}

#[test]
fn test_forward_transform_matches_dft() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut bitrev = std::vec![0; 64];
    precompute_bitrev(&mut bitrev, 64);

    let mut pipeline = Q15Pipeline::new(PipelineConfig::new(6, 31)).unwrap();
    for _ in 0..3 {
        let frame = random_frame(&mut rng, 64);
        let expected = dft(&frame);

        let quantised: Vec<_> = frame.iter().map(|&x| ComplexFixed::<15>::from_complex(x)).collect();
        let (out_a, out_b) = pipeline.process_block(&quantised[..32], &quantised[32..], false).unwrap();

        for t in 0..32 {
            for (pos, value) in [(2 * t, out_a[t]), (2 * t + 1, out_b[t])] {
                let err = (value.to_complex() - expected[bitrev[pos]]).l1_norm();
                assert!(err < 5e-3, "bin {} off by {}", bitrev[pos], err);
            }
        }
    }
}

#[test]
fn test_scaled_transform_divides_by_n() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 256;
    let mut bitrev = std::vec![0; n];
    precompute_bitrev(&mut bitrev, n);

    // 16-bit registers only fit because every rank halves its outputs
    let config = PipelineConfig::new(8, 16).with_scaling(Scaling::HalfPerStage);
    let mut pipeline = Q15Pipeline::new(config).unwrap();

    let frame = random_frame(&mut rng, n);
    let expected = dft(&frame);
    let quantised: Vec<_> = frame.iter().map(|&x| ComplexFixed::<15>::from_complex(x * 0.5)).collect();
    let (out_a, out_b) = pipeline.process_block(&quantised[..n / 2], &quantised[n / 2..], false).unwrap();

    for t in 0..n / 2 {
        for (pos, value) in [(2 * t, out_a[t]), (2 * t + 1, out_b[t])] {
            let reference = expected[bitrev[pos]] * 0.5 / n as f64;
            assert!((value.to_complex() - reference).l1_norm() < 1e-3);
        }
    }
}

/// Streams several blocks with gaps and returns the enabled input ticks and
/// the valid output ticks, plus the bypassed output values.
fn stream_with_gaps(
    pipeline: &mut IndexPipeline,
    gaps: &[usize],
) -> (Vec<usize>, Vec<usize>, Vec<(ComplexFixed<0>, ComplexFixed<0>)>) {
    let n = pipeline.config().transform_len();
    let mut inputs = Vec::new();
    for (block, &gap) in gaps.iter().enumerate() {
        let (a, b) = index_block(n, block * n);
        inputs.extend(a.into_iter().zip(b).map(|(x, y)| PipelineInput::sample(x, y).bypassed()));
        inputs.extend(core::iter::repeat(PipelineInput::idle()).take(gap));
    }
    inputs.extend(core::iter::repeat(PipelineInput::idle()).take(pipeline.latency()));

    let mut enabled = Vec::new();
    let mut valid = Vec::new();
    let mut values = Vec::new();
    for (tick, input) in inputs.into_iter().enumerate() {
        if input.enable {
            enabled.push(tick);
        }
        let out = pipeline.tick(input);
        if out.valid {
            valid.push(tick);
            values.push((out.a, out.b));
        }
    }
    (enabled, valid, values)
}

#[test]
fn test_valid_window_and_latency_determinism() {
    let config = PipelineConfig::new(4, 31).with_latencies(1, 2, 3);
    let mut pipeline = IndexPipeline::new(config).unwrap();
    let latency = pipeline.latency();

    let (enabled, valid, values) = stream_with_gaps(&mut pipeline, &[0, 1, 13, 5, 0, 40]);

    assert_eq!(valid.len(), enabled.len());
    for (e, v) in enabled.iter().zip(&valid) {
        assert_eq!(v - e, latency);
    }

    // Every block comes out in DIF position order
    for (block, chunk) in values.chunks(8).enumerate() {
        for (t, &(a, b)) in chunk.iter().enumerate() {
            assert_eq!(a, idx(block * 16 + 2 * t));
            assert_eq!(b, idx(block * 16 + 2 * t + 1));
        }
    }
    assert_eq!(pipeline.strobe_violations(), 0);
}

#[test]
fn test_reset_suppresses_valid_until_refilled() {
    let config = PipelineConfig::new(3, 31);
    let mut pipeline = IndexPipeline::new(config).unwrap();
    let latency = pipeline.latency();

    // Half a block, then a synchronous reset
    for i in 0..2 {
        pipeline.tick(PipelineInput::sample(idx(i), idx(i + 4)));
    }
    assert!(!pipeline.tick(PipelineInput::reset()).valid);
    for _ in 0..3 * latency {
        assert!(!pipeline.tick(PipelineInput::idle()).valid);
    }

    let (a, b) = index_block(8, 0);
    let mut first_valid = None;
    for tick in 0..4 + latency {
        let input = if tick < 4 {
            PipelineInput::sample(a[tick], b[tick]).bypassed()
        } else {
            PipelineInput::idle()
        };
        if pipeline.tick(input).valid {
            first_valid.get_or_insert(tick);
        }
    }
    assert_eq!(first_valid, Some(latency));
}

#[test]
fn test_process_block_rejects_wrong_length() {
    let mut pipeline = IndexPipeline::new(PipelineConfig::new(3, 31)).unwrap();
    let (a, b) = index_block(8, 0);

    assert_eq!(
        pipeline.process_block(&a[..3], &b, false),
        Err(ConfigError::FrameSizeMismatch { expected: 4, found: 3 })
    );
}

#[cfg(debug_assertions)]
#[test]
fn test_broken_enable_is_reported() {
    let mut pipeline = IndexPipeline::new(PipelineConfig::new(3, 31)).unwrap();
    for i in 0..3 {
        pipeline.tick(PipelineInput::sample(idx(i), idx(i)));
    }
    pipeline.tick(PipelineInput::idle());
    assert_eq!(pipeline.strobe_violations(), 1);

    // Two whole blocks back to back are fine
    for i in 0..8 {
        pipeline.tick(PipelineInput::sample(idx(i), idx(i)));
    }
    pipeline.tick(PipelineInput::idle());
    assert_eq!(pipeline.strobe_violations(), 1);
}
