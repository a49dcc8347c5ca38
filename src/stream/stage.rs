// src/stream/stage.rs

use super::butterfly::ButterflyUnit;
use super::commutator::CommutatorBuffer;
use super::store::DelayLine;
use super::twiddle::TwiddleSource;
use crate::common::Tick;

/// What travels between stages on every tick.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Beat<T> {
    pub a: T,
    pub b: T,
    pub enable: bool,
    pub bypass: bool,
}

impl<T> Beat<T> {
    pub fn new(a: T, b: T, enable: bool, bypass: bool) -> Self {
        Self { a, b, enable, bypass }
    }
}

/// One rank of the pipeline:
///
/// ```text
/// in ─ align ─┬─ twiddle source ────────┐
///             └─ match delay ─┬─ butterfly ─┬─ commutator ─ out
///                             └─ bypass ────┘
/// ```
///
/// The twiddle source is clocked by the aligned enable and the data waits in
/// the match delay so that operands and coefficient meet at the butterfly.
/// The bypass path has the butterfly's latency, so the stage latency does not
/// depend on the bypass flag. The terminal rank has no commutator.
pub struct Stage<B: ButterflyUnit, W> {
    align: DelayLine<Beat<B::Sample>>,
    twiddle_match: DelayLine<Beat<B::Sample>>,
    bypass_path: DelayLine<Beat<B::Sample>>,
    twiddles: W,
    butterfly: B,
    commutator: Option<CommutatorBuffer<B::Sample>>,
    // Carries the bypass flag alongside the commutator's own valid line
    commutator_bypass: DelayLine<bool>,
}

impl<B: ButterflyUnit, W: TwiddleSource> Stage<B, W> {
    pub fn new(
        butterfly: B,
        twiddles: W,
        align_latency: usize,
        commutator: Option<CommutatorBuffer<B::Sample>>,
    ) -> Self {
        let comm_depth = commutator.as_ref().map_or(0, |c| c.depth());
        Self {
            align: DelayLine::new(align_latency),
            twiddle_match: DelayLine::new(twiddles.latency()),
            bypass_path: DelayLine::new(butterfly.latency()),
            twiddles,
            butterfly,
            commutator,
            commutator_bypass: DelayLine::new(comm_depth),
        }
    }

    /// Advances every unit of the stage by one tick.
    pub fn tick(&mut self, input: Beat<B::Sample>) -> Beat<B::Sample> {
        let aligned = self.align.shift(input);
        let coeff = self.twiddles.next(aligned.enable);
        let operands = self.twiddle_match.shift(aligned);

        // Both paths are clocked every tick; the flag picks one.
        let run_butterfly = operands.enable && !operands.bypass;
        let computed = self.butterfly.combine(operands.a, operands.b, coeff.coeff, run_butterfly);
        let passed = self.bypass_path.shift(operands);

        let combined = if passed.bypass {
            Beat::new(passed.a, passed.b, passed.enable, true)
        } else {
            Beat::new(computed.a, computed.b, computed.valid, false)
        };

        match &mut self.commutator {
            Some(comm) => {
                let Tick { a, b, valid } = comm.push(combined.a, combined.b, combined.enable);
                let bypass = self.commutator_bypass.shift(combined.bypass);
                Beat::new(a, b, valid, bypass)
            }
            None => combined,
        }
    }

    pub fn reset(&mut self) {
        self.align.clear();
        self.twiddle_match.clear();
        self.bypass_path.clear();
        self.twiddles.reset();
        self.butterfly.reset();
        if let Some(comm) = &mut self.commutator {
            comm.reset();
        }
        self.commutator_bypass.clear();
    }

    /// Align + twiddle + butterfly + commutator latency.
    pub fn latency(&self) -> usize {
        self.align.depth()
            + self.twiddle_match.depth()
            + self.bypass_path.depth()
            + self.commutator_depth()
    }

    /// Span of this stage's commutator, 0 for the terminal rank.
    pub fn commutator_depth(&self) -> usize {
        self.commutator.as_ref().map_or(0, |c| c.depth())
    }

    pub fn commutator(&self) -> Option<&CommutatorBuffer<B::Sample>> {
        self.commutator.as_ref()
    }
}
