pub mod types;
pub(crate) mod core;
pub mod complex;

pub use complex::StreamingFft;
pub use self::core::{Twiddle, TWIDDLE_FRAC};
pub use types::{ComplexFixed, Fixed};
