// src/common.rs

use core::fmt;

/// Configuration errors. Raised eagerly by constructors, never while streaming.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfigError {
    ZeroDepth,
    DepthNotPowerOfTwo { depth: usize },
    TransformTooSmall { nfft: u32 },
    TransformTooLarge { nfft: u32 },
    InvalidSampleWidth { bits: u32 },
    StageCountMismatch { expected: usize, found: usize },
    FrameSizeMismatch { expected: usize, found: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroDepth => write!(f, "Commutator depth must be at least 1"),
            ConfigError::DepthNotPowerOfTwo { depth } => {
                write!(f, "Commutator depth {} is not a power of 2", depth)
            }
            ConfigError::TransformTooSmall { nfft } => {
                write!(f, "NFFT = {} is too small, at least 2 stages are required", nfft)
            }
            ConfigError::TransformTooLarge { nfft } => {
                write!(f, "NFFT = {} exceeds the supported transform size", nfft)
            }
            ConfigError::InvalidSampleWidth { bits } => {
                write!(f, "Sample width of {} bits is outside 2..=31", bits)
            }
            ConfigError::StageCountMismatch { expected, found } => write!(
                f,
                "Transform needs {} stage units but {} were supplied",
                expected, found
            ),
            ConfigError::FrameSizeMismatch { expected, found } => write!(
                f,
                "Frame holds {} samples but the pipeline transforms {}",
                found, expected
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// One of the two parallel lanes of the streaming bus.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Lane {
    /// Even / upper lane.
    A,
    /// Odd / lower lane.
    B,
}

impl Lane {
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Lane::A => 0,
            Lane::B => 1,
        }
    }
}

/// One beat of the two-lane bus: a sample pair and its strobe.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Tick<T> {
    pub a: T,
    pub b: T,
    pub valid: bool,
}

impl<T: Copy + Default> Tick<T> {
    pub fn new(a: T, b: T, valid: bool) -> Self {
        Self { a, b, valid }
    }

    /// An idle beat: zeroed lanes, strobe low.
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Transform direction. Inverse conjugates every twiddle factor.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Direction {
    #[default]
    Forward,
    Inverse,
}

/// Frame-level transform over a buffer of samples.
pub trait FftProcess<T> {
    fn process(&mut self, buffer: &mut [T]) -> Result<(), ConfigError>;
}
