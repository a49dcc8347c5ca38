#![no_std]

extern crate alloc;

// The standard library backs the float math and `std::error::Error` when the
// "std" feature is on, and is always available to `cargo test`.
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod common;
pub mod fixed;
pub mod stream;

pub use common::{ConfigError, Direction, FftProcess, Lane, Tick};
pub use fixed::{ComplexFixed, Fixed, StreamingFft};
pub use stream::{CommutatorBuffer, Pipeline, PipelineConfig, PipelineInput};
