// src/fixed/core.rs

use super::types::ComplexFixed;
use crate::common::Direction;
use alloc::vec::Vec;
use core::f64::consts::PI;
use num_complex::Complex64;

/// Fractional bits for twiddle factors (high precision).
/// Using Q31 format for maximum precision in twiddle factors.
pub const TWIDDLE_FRAC: u32 = 31;

pub type Twiddle = ComplexFixed<TWIDDLE_FRAC>;

/// Computes the rotation factor W_n^k = e^(-2*pi*i*k/n), conjugated for the
/// inverse direction.
pub(crate) fn twiddle(k: usize, n: usize, direction: Direction) -> Twiddle {
    let sign = match direction {
        Direction::Forward => -1.0,
        Direction::Inverse => 1.0,
    };
    let angle = sign * 2.0 * PI * (k as f64) / (n as f64);
    let (sin, cos) = sin_cos(angle);
    ComplexFixed::from_complex(Complex64::new(cos, sin))
}

/// Twiddle sequence for DIF butterfly rank `stage` of an `n`-point transform,
/// in the order the rank consumes it: one entry per tick of an N/2-tick block.
///
/// Rank `stage` pairs samples at distance `n >> (stage + 1)`. Within a block
/// the A-lane index taken modulo that distance equals the tick index modulo
/// the same distance, so entry `t` is `W_n^((t mod distance) << stage)`.
pub(crate) fn stage_twiddles(n: usize, stage: u32, direction: Direction) -> Vec<Twiddle> {
    let distance = n >> (stage + 1);
    (0..n / 2)
        .map(|t| twiddle((t % distance) << stage, n, direction))
        .collect()
}

/// Fills the bit-reversal table.
pub(crate) fn precompute_bitrev(bitrev: &mut [usize], n: usize) {
    bitrev[0] = 0;
    let mut j = 0;
    for i in 1..n {
        let mut k = n >> 1;
        while j >= k {
            j -= k;
            k >>= 1;
        }
        j += k;
        bitrev[i] = j;
    }
}

fn sin_cos(angle: f64) -> (f64, f64) {
    #[cfg(feature = "std")]
    return (angle.sin(), angle.cos());

    #[cfg(not(feature = "std"))]
    return (libm::sin(angle), libm::cos(angle));
}

#[cfg(test)]
#[path = "core_tests.rs"]
mod tests;
