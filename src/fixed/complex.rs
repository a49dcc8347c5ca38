use super::core::precompute_bitrev;
use super::types::ComplexFixed;
use crate::common::{ConfigError, FftProcess};
use crate::stream::{FixedButterfly, Pipeline, PipelineConfig, TableTwiddles};
use alloc::vec;
use alloc::vec::Vec;

/// Frame-at-a-time front end for the streaming pipeline.
///
/// Each call to [`StreamingFft::process`] streams one N-sample frame through
/// the pipeline (first half on lane A, second half on lane B), drains it, and
/// writes the bins back in natural frequency order.
pub struct StreamingFft<const FRAC: u32> {
    pipeline: Pipeline<FixedButterfly<FRAC>, TableTwiddles>,
    bitrev: Vec<usize>,
}

impl<const FRAC: u32> StreamingFft<FRAC> {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        let pipeline = Pipeline::new(config)?;
        let n = config.transform_len();
        let mut bitrev = vec![0; n];
        precompute_bitrev(&mut bitrev, n);
        Ok(Self { pipeline, bitrev })
    }

    /// Transforms `buffer` in place.
    pub fn process(&mut self, buffer: &mut [ComplexFixed<FRAC>]) -> Result<(), ConfigError> {
        let n = self.bitrev.len();
        if buffer.len() != n {
            return Err(ConfigError::FrameSizeMismatch { expected: n, found: buffer.len() });
        }

        let (lower, upper) = buffer.split_at(n / 2);
        let (out_a, out_b) = self.pipeline.process_block(lower, upper, false)?;

        // Stream position 2t / 2t+1 holds bin bitrev(2t) / bitrev(2t+1)
        for (t, (a, b)) in out_a.into_iter().zip(out_b).enumerate() {
            buffer[self.bitrev[2 * t]] = a;
            buffer[self.bitrev[2 * t + 1]] = b;
        }
        Ok(())
    }

    pub fn pipeline(&self) -> &Pipeline<FixedButterfly<FRAC>, TableTwiddles> {
        &self.pipeline
    }
}

impl<const FRAC: u32> FftProcess<ComplexFixed<FRAC>> for StreamingFft<FRAC> {
    fn process(&mut self, buffer: &mut [ComplexFixed<FRAC>]) -> Result<(), ConfigError> {
        StreamingFft::process(self, buffer)
    }
}

#[cfg(test)]
#[path = "complex_tests.rs"]
mod tests;
