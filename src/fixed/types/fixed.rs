// src/fixed/types/fixed.rs
/// Generic fixed-point structure based on the number of fractional bits (FRAC).
/// The internal value is stored as a signed 32-bit integer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[repr(transparent)]
pub struct Fixed<const FRAC: u32>(i32);

impl<const FRAC: u32> Fixed<FRAC> {
    /// Creates a Fixed from the raw integer value (without shift).
    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Creates a Fixed from an integer, applying the necessary shift.
    /// E.g.: Fixed::<8>::from_int(1) will result in internal value 256.
    #[inline]
    pub fn from_int(value: i32) -> Self {
        Self(value << FRAC)
    }

    /// Converts an f64 to Fixed with round-to-nearest.
    /// Out-of-range values saturate to `i32::MIN`/`i32::MAX`.
    pub fn from_f64(value: f64) -> Self {
        let scaling_factor = (1u64 << FRAC) as f64;
        Self::from_bits(round(value * scaling_factor) as i32)
    }

    /// Converts back to f64. Only used at the edges of the datapath.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1u64 << FRAC) as f64
    }

    /// Returns the stored raw value.
    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Scales the value by 0.5 (shifts right by 1).
    #[inline]
    pub fn scale_half(self) -> Self {
        Self(self.0 >> 1)
    }

    /// Clamps the raw value into the signed range of a `bits`-wide register.
    #[inline]
    pub fn saturate(self, bits: u32) -> Self {
        let max = (1i32 << (bits - 1)) - 1;
        let min = -(1i32 << (bits - 1));
        Self(self.0.clamp(min, max))
    }

    #[inline]
    pub fn convert<const TO_FRAC: u32>(self) -> Fixed<TO_FRAC> {
        if TO_FRAC > FRAC {
            Fixed::from_bits(self.0 << (TO_FRAC - FRAC))
        } else {
            Fixed::from_bits(self.0 >> (FRAC - TO_FRAC))
        }
    }
}

#[cfg(feature = "std")]
#[inline]
fn round(x: f64) -> f64 {
    x.round()
}

#[cfg(not(feature = "std"))]
#[inline]
fn round(x: f64) -> f64 {
    libm::round(x)
}

use core::ops::{Add, Mul, Neg, Sub};

// Register arithmetic wraps like the hardware adder it models; width
// limiting happens explicitly through `saturate`.
impl<const F1: u32, const F2: u32> Add<Fixed<F2>> for Fixed<F1> {
    type Output = Fixed<F1>;

    #[inline]
    fn add(self, rhs: Fixed<F2>) -> Self::Output {
        let rhs_converted: Fixed<F1> = rhs.convert();
        Fixed(self.0.wrapping_add(rhs_converted.0))
    }
}

impl<const F1: u32, const F2: u32> Sub<Fixed<F2>> for Fixed<F1> {
    type Output = Fixed<F1>;

    #[inline]
    fn sub(self, rhs: Fixed<F2>) -> Self::Output {
        let rhs_converted: Fixed<F1> = rhs.convert();
        Fixed(self.0.wrapping_sub(rhs_converted.0))
    }
}

impl<const FRAC: u32> Neg for Fixed<FRAC> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Fixed(self.0.saturating_neg())
    }
}

impl<const F1: u32, const F2: u32> Mul<Fixed<F2>> for Fixed<F1> {
    type Output = Fixed<F1>;

    #[inline]
    fn mul(self, rhs: Fixed<F2>) -> Self::Output {
        let product = self.0 as i64 * rhs.0 as i64;

        // Add 2^(F2-1) before the shift for round-half-up
        let rounded = if F2 > 0 {
            let offset = 1i64 << (F2 - 1);
            (product + offset) >> F2
        } else {
            product
        };

        Fixed::from_bits(rounded.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }
}

use core::fmt;

impl<const FRAC: u32> fmt::Display for Fixed<FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.to_f64())
    }
}

impl<const FRAC: u32> fmt::Debug for Fixed<FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // In Debug, show both the decimal value and the raw value in parentheses
        write!(f, "{:.6} (raw: {})", self.to_f64(), self.0)
    }
}
