// src/stream/butterfly.rs

use super::store::DelayLine;
use crate::common::Tick;
use crate::fixed::core::Twiddle;
use crate::fixed::ComplexFixed;

/// Per-rank output scaling of the default butterfly.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Scaling {
    /// Full growth; the caller must leave headroom of one bit per rank.
    #[default]
    None,
    /// Halve both outputs of every rank, for an overall 1/N.
    HalfPerStage,
}

/// Radix-2 combine unit with a fixed number of pipeline registers.
pub trait ButterflyUnit {
    type Sample: Copy + Default;

    /// Ticks between an operand pair entering and its results leaving.
    fn latency(&self) -> usize;

    /// Advances the unit by one tick.
    fn combine(&mut self, a: Self::Sample, b: Self::Sample, twiddle: Twiddle, enable: bool)
        -> Tick<Self::Sample>;

    /// Clears every pipeline register.
    fn reset(&mut self);
}

/// Decimation-in-frequency butterfly on fixed-point samples:
/// `a' = a + b`, `b' = (a - b) * w`.
///
/// Results are optionally halved and then saturated to the configured
/// register width before entering the output registers.
pub struct FixedButterfly<const FRAC: u32> {
    registers: DelayLine<Tick<ComplexFixed<FRAC>>>,
    width: u32,
    scaling: Scaling,
}

impl<const FRAC: u32> FixedButterfly<FRAC> {
    pub fn new(latency: usize, width: u32, scaling: Scaling) -> Self {
        Self { registers: DelayLine::new(latency), width, scaling }
    }

    #[inline]
    fn evaluate(
        &self,
        a: ComplexFixed<FRAC>,
        b: ComplexFixed<FRAC>,
        twiddle: Twiddle,
    ) -> (ComplexFixed<FRAC>, ComplexFixed<FRAC>) {
        let (mut sum, mut diff) = (a + b, (a - b) * twiddle);
        if self.scaling == Scaling::HalfPerStage {
            sum = sum.scale_half();
            diff = diff.scale_half();
        }
        (sum.saturate(self.width), diff.saturate(self.width))
    }
}

impl<const FRAC: u32> ButterflyUnit for FixedButterfly<FRAC> {
    type Sample = ComplexFixed<FRAC>;

    fn latency(&self) -> usize {
        self.registers.depth()
    }

    fn combine(
        &mut self,
        a: Self::Sample,
        b: Self::Sample,
        twiddle: Twiddle,
        enable: bool,
    ) -> Tick<Self::Sample> {
        // Idle beats still shift the registers, but carry zeros.
        let result = if enable {
            let (sum, diff) = self.evaluate(a, b, twiddle);
            Tick::new(sum, diff, true)
        } else {
            Tick::idle()
        };
        self.registers.shift(result)
    }

    fn reset(&mut self) {
        self.registers.clear();
    }
}
