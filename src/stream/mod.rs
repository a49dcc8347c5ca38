//! Tick-driven model of the two-lane streaming DIF pipeline.

pub mod butterfly;
pub mod commutator;
pub mod pipeline;
pub mod stage;
pub mod store;
pub mod twiddle;

pub use butterfly::{ButterflyUnit, FixedButterfly, Scaling};
pub use commutator::CommutatorBuffer;
pub use pipeline::{Pipeline, PipelineConfig, PipelineInput, StrobeMonitor};
pub use stage::{Beat, Stage};
pub use store::{BackingStore, DelayLine, DelayStore, PingPongStore, RingStore, Strategy};
pub use twiddle::{TableTwiddles, TwiddleOut, TwiddleSource};
