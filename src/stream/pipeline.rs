// src/stream/pipeline.rs

use super::butterfly::{ButterflyUnit, FixedButterfly, Scaling};
use super::commutator::CommutatorBuffer;
use super::stage::{Beat, Stage};
use super::store::DEFAULT_DEEP_THRESHOLD;
use super::twiddle::{TableTwiddles, TwiddleSource};
use crate::common::{ConfigError, Direction, Tick};
use alloc::vec::Vec;
use log::{debug, trace};

/// Build-time parameters of a pipeline. Transform size cannot change once a
/// pipeline has been built from it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PipelineConfig {
    /// log2 of the transform length.
    pub nfft: u32,
    /// Register width of each sample part, in bits.
    pub sample_bits: u32,
    pub direction: Direction,
    pub scaling: Scaling,
    pub align_latency: usize,
    pub butterfly_latency: usize,
    pub twiddle_latency: usize,
    /// Commutator depth from which ping-pong banks replace ring queues.
    pub deep_threshold: usize,
}

impl PipelineConfig {
    pub const MIN_NFFT: u32 = 2;
    pub const MAX_NFFT: u32 = 24;

    pub fn new(nfft: u32, sample_bits: u32) -> Self {
        Self {
            nfft,
            sample_bits,
            direction: Direction::Forward,
            scaling: Scaling::None,
            align_latency: 1,
            butterfly_latency: 1,
            twiddle_latency: 1,
            deep_threshold: DEFAULT_DEEP_THRESHOLD,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_scaling(mut self, scaling: Scaling) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_latencies(mut self, align: usize, butterfly: usize, twiddle: usize) -> Self {
        self.align_latency = align;
        self.butterfly_latency = butterfly;
        self.twiddle_latency = twiddle;
        self
    }

    pub fn with_deep_threshold(mut self, deep_threshold: usize) -> Self {
        self.deep_threshold = deep_threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nfft < Self::MIN_NFFT {
            return Err(ConfigError::TransformTooSmall { nfft: self.nfft });
        }
        if self.nfft > Self::MAX_NFFT {
            return Err(ConfigError::TransformTooLarge { nfft: self.nfft });
        }
        if !(2..=31).contains(&self.sample_bits) {
            return Err(ConfigError::InvalidSampleWidth { bits: self.sample_bits });
        }
        Ok(())
    }

    /// Transform length N.
    pub fn transform_len(&self) -> usize {
        1 << self.nfft
    }

    /// Enabled ticks per block, N/2.
    pub fn block_len(&self) -> usize {
        self.transform_len() / 2
    }

    /// Number of commutator stages, NFFT - 1.
    pub fn stage_count(&self) -> usize {
        self.nfft as usize - 1
    }

    /// Commutator depth of stage `i`. Stage 0 reorders pairs at distance
    /// N/2 into pairs at distance N/4, the last stage works at distance 1.
    pub fn stage_depth(&self, stage: usize) -> usize {
        1 << (self.stage_count() - 1 - stage)
    }
}

/// Pipeline boundary inputs for one tick.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct PipelineInput<T> {
    pub a: T,
    pub b: T,
    pub enable: bool,
    pub bypass: bool,
    pub reset: bool,
}

impl<T: Copy + Default> PipelineInput<T> {
    pub fn sample(a: T, b: T) -> Self {
        Self { a, b, enable: true, ..Self::default() }
    }

    pub fn idle() -> Self {
        Self::default()
    }

    pub fn reset() -> Self {
        Self { reset: true, ..Self::default() }
    }

    pub fn bypassed(mut self) -> Self {
        self.bypass = true;
        self
    }
}

/// Debug-build check of the enable contract: every run of enabled ticks must
/// be a whole number of blocks. Release builds never count anything.
#[derive(Debug, Clone)]
#[cfg_attr(not(debug_assertions), allow(dead_code))]
pub struct StrobeMonitor {
    block_len: usize,
    run: usize,
    violations: usize,
}

impl StrobeMonitor {
    pub fn new(block_len: usize) -> Self {
        Self { block_len, run: 0, violations: 0 }
    }

    #[inline]
    pub fn observe(&mut self, enable: bool) {
        #[cfg(debug_assertions)]
        {
            if enable {
                self.run += 1;
            } else if self.run > 0 {
                if self.run % self.block_len != 0 {
                    self.violations += 1;
                    log::warn!(
                        "enable held for {} ticks, not a multiple of the {}-tick block",
                        self.run, self.block_len
                    );
                }
                self.run = 0;
            }
        }
        #[cfg(not(debug_assertions))]
        let _ = enable;
    }

    pub fn violations(&self) -> usize {
        self.violations
    }

    pub fn reset(&mut self) {
        self.run = 0;
    }
}

/// Streaming N-point DIF transform: NFFT-1 stages with commutators followed
/// by a terminal butterfly rank, all advanced in lockstep by [`Pipeline::tick`].
///
/// Input block: lane A carries x[0..N/2), lane B carries x[N/2..N), one pair
/// per tick with `enable` high for N/2 consecutive ticks. Output block: lane A
/// at the t-th valid tick carries DIF position 2t, lane B position 2t+1, i.e.
/// bins `bitrev(2t)` and `bitrev(2t+1)`.
pub struct Pipeline<B: ButterflyUnit, W> {
    config: PipelineConfig,
    stages: Vec<Stage<B, W>>,
    terminal: Stage<B, W>,
    latency: usize,
    monitor: StrobeMonitor,
}

impl<const FRAC: u32> Pipeline<FixedButterfly<FRAC>, TableTwiddles> {
    /// Builds a pipeline from the default fixed-point butterfly and
    /// table-driven twiddle units.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let units = (0..config.nfft)
            .map(|rank| {
                (
                    FixedButterfly::new(config.butterfly_latency, config.sample_bits, config.scaling),
                    TableTwiddles::for_stage(
                        config.nfft,
                        rank,
                        config.direction,
                        config.twiddle_latency,
                    ),
                )
            })
            .collect();
        Self::with_units(config, units)
    }
}

impl<B: ButterflyUnit, W: TwiddleSource> Pipeline<B, W> {
    /// Builds a pipeline from caller-provided units: one (butterfly, twiddle)
    /// pair per butterfly rank, i.e. NFFT pairs. The last pair drives the
    /// terminal rank.
    pub fn with_units(config: PipelineConfig, units: Vec<(B, W)>) -> Result<Self, ConfigError> {
        config.validate()?;
        let expected = config.stage_count() + 1;
        if units.len() != expected {
            return Err(ConfigError::StageCountMismatch { expected, found: units.len() });
        }

        let mut stages = Vec::with_capacity(config.stage_count());
        let mut units = units.into_iter();
        for i in 0..config.stage_count() {
            let depth = config.stage_depth(i);
            let commutator =
                CommutatorBuffer::<B::Sample>::with_threshold(depth, config.deep_threshold)?;
            debug!(
                "stage {}: commutator depth {} ({:?} store)",
                i,
                depth,
                commutator.store().strategy()
            );
            let (butterfly, twiddles) = units.next().ok_or(ConfigError::StageCountMismatch {
                expected,
                found: i,
            })?;
            stages.push(Stage::new(butterfly, twiddles, config.align_latency, Some(commutator)));
        }
        let (butterfly, twiddles) = units.next().ok_or(ConfigError::StageCountMismatch {
            expected,
            found: config.stage_count(),
        })?;
        let terminal = Stage::new(butterfly, twiddles, config.align_latency, None);

        let latency = stages.iter().map(|s| s.latency()).sum::<usize>() + terminal.latency();
        debug!(
            "pipeline: N = {}, {} stages, {} ticks of latency",
            config.transform_len(),
            config.stage_count(),
            latency
        );

        Ok(Self { config, stages, terminal, latency, monitor: StrobeMonitor::new(config.block_len()) })
    }

    /// Advances every stage by one tick. Stage `i + 1` sees the beat stage
    /// `i` produced during this same tick.
    pub fn tick(&mut self, input: PipelineInput<B::Sample>) -> Tick<B::Sample> {
        if input.reset {
            self.reset();
            return Tick::idle();
        }
        self.monitor.observe(input.enable);

        let mut beat = Beat::new(input.a, input.b, input.enable, input.bypass);
        for stage in &mut self.stages {
            beat = stage.tick(beat);
        }
        let out = self.terminal.tick(beat);
        Tick::new(out.a, out.b, out.enable)
    }

    /// Feeds one block, then idles until the block has fully drained.
    /// Returns the valid output lanes.
    pub fn process_block(
        &mut self,
        a: &[B::Sample],
        b: &[B::Sample],
        bypass: bool,
    ) -> Result<(Vec<B::Sample>, Vec<B::Sample>), ConfigError> {
        let block = self.config.block_len();
        for lane in [a, b] {
            if lane.len() != block {
                return Err(ConfigError::FrameSizeMismatch { expected: block, found: lane.len() });
            }
        }

        let mut out_a = Vec::with_capacity(block);
        let mut out_b = Vec::with_capacity(block);
        let feed = a.iter().zip(b).map(|(&x, &y)| PipelineInput::sample(x, y));
        let drain = core::iter::repeat(PipelineInput::idle()).take(self.latency);
        for mut input in feed.chain(drain) {
            input.bypass = bypass;
            let out = self.tick(input);
            if out.valid {
                out_a.push(out.a);
                out_b.push(out.b);
            }
        }
        Ok((out_a, out_b))
    }

    /// Synchronous global reset of every stage.
    pub fn reset(&mut self) {
        trace!("pipeline reset");
        for stage in &mut self.stages {
            stage.reset();
        }
        self.terminal.reset();
        self.monitor.reset();
    }

    /// Ticks from a pair entering to its output leaving:
    /// sum over stages of align + twiddle + butterfly + commutator latency.
    pub fn latency(&self) -> usize {
        self.latency
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stages(&self) -> &[Stage<B, W>] {
        &self.stages
    }

    /// Broken enable runs seen so far; always 0 in release builds.
    pub fn strobe_violations(&self) -> usize {
        self.monitor.violations()
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
