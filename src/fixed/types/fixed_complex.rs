use super::fixed::Fixed;
use num_complex::Complex64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct ComplexFixed<const FRAC: u32> {
    pub re: Fixed<FRAC>,
    pub im: Fixed<FRAC>,
}

impl<const FRAC: u32> ComplexFixed<FRAC> {
    pub fn new(re: Fixed<FRAC>, im: Fixed<FRAC>) -> Self {
        Self { re, im }
    }

    /// Builds a value straight from raw register contents.
    pub fn from_bits(re: i32, im: i32) -> Self {
        Self::new(Fixed::from_bits(re), Fixed::from_bits(im))
    }

    /// Quantises a floating-point complex value (round-to-nearest, saturating).
    pub fn from_complex(value: Complex64) -> Self {
        Self::new(Fixed::from_f64(value.re), Fixed::from_f64(value.im))
    }

    pub fn to_complex(self) -> Complex64 {
        Complex64::new(self.re.to_f64(), self.im.to_f64())
    }

    /// Returns the complex conjugate (a - bi)
    #[inline]
    pub fn conj(self) -> Self {
        ComplexFixed { re: self.re, im: -self.im }
    }

    /// Scales both real and imaginary parts by 0.5 (right shift by 1).
    #[inline]
    pub fn scale_half(self) -> Self {
        ComplexFixed { re: self.re.scale_half(), im: self.im.scale_half() }
    }

    /// Saturates both parts to a `bits`-wide signed register.
    #[inline]
    pub fn saturate(self, bits: u32) -> Self {
        ComplexFixed { re: self.re.saturate(bits), im: self.im.saturate(bits) }
    }
}

use core::ops::{Add, Mul, Sub};

// Addition: ComplexFixed<F1> + ComplexFixed<F2> -> ComplexFixed<F1>
impl<const F1: u32, const F2: u32> Add<ComplexFixed<F2>> for ComplexFixed<F1> {
    type Output = ComplexFixed<F1>;

    #[inline]
    fn add(self, rhs: ComplexFixed<F2>) -> Self::Output {
        ComplexFixed { re: self.re + rhs.re, im: self.im + rhs.im }
    }
}

impl<const F1: u32, const F2: u32> Sub<ComplexFixed<F2>> for ComplexFixed<F1> {
    type Output = ComplexFixed<F1>;

    #[inline]
    fn sub(self, rhs: ComplexFixed<F2>) -> Self::Output {
        ComplexFixed { re: self.re - rhs.re, im: self.im - rhs.im }
    }
}

// Multiplication keeps the left operand's format, so a Q15 sample times a
// Q31 twiddle stays Q15.
impl<const F1: u32, const F2: u32> Mul<ComplexFixed<F2>> for ComplexFixed<F1> {
    type Output = ComplexFixed<F1>;

    #[inline]
    fn mul(self, rhs: ComplexFixed<F2>) -> Self::Output {
        // (ac - bd)
        let re = (self.re * rhs.re) - (self.im * rhs.im);
        // (ad + bc)
        let im = (self.re * rhs.im) + (self.im * rhs.re);

        ComplexFixed { re, im }
    }
}
