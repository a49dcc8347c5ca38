// src/stream/twiddle.rs

use super::store::DelayLine;
use crate::common::Direction;
use crate::fixed::core::{stage_twiddles, Twiddle};
use alloc::vec::Vec;

/// One beat from a twiddle source.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct TwiddleOut {
    pub coeff: Twiddle,
    pub valid: bool,
}

/// Per-rank coefficient generator with fixed latency.
pub trait TwiddleSource {
    fn latency(&self) -> usize;

    /// Advances by one tick. The table position only moves on enabled ticks.
    fn next(&mut self, enable: bool) -> TwiddleOut;

    fn reset(&mut self);
}

/// Table-driven source: walks a precomputed length-N/2 table, one entry per
/// enabled tick, wrapping at the block boundary.
pub struct TableTwiddles {
    table: Vec<Twiddle>,
    pos: usize,
    registers: DelayLine<TwiddleOut>,
}

impl TableTwiddles {
    /// Table for DIF rank `stage` of a `2^nfft`-point transform.
    pub fn for_stage(nfft: u32, stage: u32, direction: Direction, latency: usize) -> Self {
        Self::from_table(stage_twiddles(1 << nfft, stage, direction), latency)
    }

    pub fn from_table(table: Vec<Twiddle>, latency: usize) -> Self {
        Self { table, pos: 0, registers: DelayLine::new(latency) }
    }

    pub fn table(&self) -> &[Twiddle] {
        &self.table
    }
}

impl TwiddleSource for TableTwiddles {
    fn latency(&self) -> usize {
        self.registers.depth()
    }

    fn next(&mut self, enable: bool) -> TwiddleOut {
        let beat = if enable {
            let coeff = self.table[self.pos];
            self.pos += 1;
            if self.pos == self.table.len() {
                self.pos = 0;
            }
            TwiddleOut { coeff, valid: true }
        } else {
            TwiddleOut::default()
        };
        self.registers.shift(beat)
    }

    fn reset(&mut self) {
        self.pos = 0;
        self.registers.clear();
    }
}
