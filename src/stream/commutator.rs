// src/stream/commutator.rs

use super::store::{BackingStore, DelayLine, DelayStore, DEFAULT_DEEP_THRESHOLD};
use crate::common::{ConfigError, Lane, Tick};

/// Reorder buffer between two butterfly ranks of a two-lane DIF pipeline.
///
/// A commutator of depth `d` takes pairs at distance `2d` on its input bus
/// and emits pairs at distance `d`. It is built from two delay lines of `d`
/// ticks and a cross switch between them:
///
/// ```text
///  A ───────────────┬─╲╱─┬── [ d ] ── A'
///  B ── [ d ] ──────┴─╱╲─┴─────────── B'
/// ```
///
/// The switch is driven by `crx`, the upper bit of a counter that runs modulo
/// `2d` and only advances on enabled ticks. While `crx` is low the switch is
/// straight; while high, the delayed B sample is routed into the A delay line
/// and the live A sample leaves on B'.
///
/// Output is delayed by exactly `d` ticks and `valid` mirrors `enable` with
/// the same delay. The input contract is a multiple of `2d` consecutive
/// enabled ticks per block; anything else produces well-defined but wrong
/// pairings.
pub struct CommutatorBuffer<T, S = DelayStore<T>> {
    store: S,
    valid: DelayLine<bool>,
    depth: usize,
    counter: usize,
    crx: bool,
    _sample: core::marker::PhantomData<T>,
}

impl<T: Copy + Default> CommutatorBuffer<T> {
    /// Creates a commutator with the default storage threshold.
    pub fn new(depth: usize) -> Result<Self, ConfigError> {
        Self::with_threshold(depth, DEFAULT_DEEP_THRESHOLD)
    }

    /// Creates a commutator that uses ping-pong banks once `depth` reaches
    /// `deep_threshold`.
    pub fn with_threshold(depth: usize, deep_threshold: usize) -> Result<Self, ConfigError> {
        check_depth(depth)?;
        Self::with_store(DelayStore::for_depth(depth, deep_threshold))
    }
}

impl<T: Copy + Default, S: BackingStore<T>> CommutatorBuffer<T, S> {
    /// Wraps an explicit store. Its depth becomes the commutator's depth.
    pub fn with_store(store: S) -> Result<Self, ConfigError> {
        let depth = store.depth();
        check_depth(depth)?;
        Ok(Self {
            store,
            valid: DelayLine::new(depth),
            depth,
            counter: 0,
            crx: false,
            _sample: core::marker::PhantomData,
        })
    }

    /// Advances the commutator by one tick.
    pub fn push(&mut self, a: T, b: T, enable: bool) -> Tick<T> {
        // Read both lanes before either is written
        let delayed_a = self.store.read(Lane::A);
        let delayed_b = self.store.read(Lane::B);

        let (into_a, out_b) = if self.crx { (delayed_b, a) } else { (a, delayed_b) };
        self.store.write(Lane::A, into_a);
        self.store.write(Lane::B, b);

        let valid = self.valid.shift(enable);

        if enable {
            self.counter += 1;
            if self.counter == 2 * self.depth {
                self.counter = 0;
            }
            self.crx = self.counter >= self.depth;
        }

        Tick { a: delayed_a, b: out_b, valid }
    }

    /// Zeroes the counter, the switch, the valid line and every stored sample.
    pub fn reset(&mut self) {
        self.store.reset();
        self.valid.clear();
        self.counter = 0;
        self.crx = false;
    }

    /// Delay of each lane; also the distance of the pairs it emits.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Ticks from an input pair entering to its reordered pair leaving.
    pub fn latency(&self) -> usize {
        self.depth
    }

    pub fn crx(&self) -> bool {
        self.crx
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    /// True when the enabled ticks seen since reset form whole swap cycles.
    pub fn is_block_aligned(&self) -> bool {
        self.counter == 0
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn check_depth(depth: usize) -> Result<(), ConfigError> {
    if depth == 0 {
        return Err(ConfigError::ZeroDepth);
    }
    if !depth.is_power_of_two() {
        return Err(ConfigError::DepthNotPowerOfTwo { depth });
    }
    Ok(())
}

#[cfg(test)]
#[path = "commutator_tests.rs"]
mod tests;
