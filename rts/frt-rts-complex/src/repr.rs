//! The two representations of a complex value.
//!
//! - [`Complex<T>`] (from `num-complex`) is the native complex value. It is
//!   `#[repr(C)]` with the layout of `[T; 2]`, which is how C lays out
//!   `T _Complex`.
//! - [`CppComplex<T>`] is the aggregate the numeric kernel fills: a plain
//!   `{ r, i }` struct, matching `struct CppComplexFloat { float r, i; }`
//!   and friends.
//!
//! For every component type the two are bit-identical. The assertions at
//! the bottom of this module fail the build otherwise.

use std::mem::{align_of, offset_of, size_of};

use num_complex::Complex;

use crate::construct::cmplx;
use crate::extended::{Binary128, X87Extended};
use crate::Precision;

/// Component type of a bridged complex value.
///
/// # Safety
///
/// Implementors must be plain floating-point storage:
/// - `Copy`, no drop glue, no pointers
/// - a fixed C layout, identical to the C type named by `C_TYPE_NAME`
/// - every bit pattern of that C type is a valid value
pub unsafe trait ComplexPart: Copy + Default + Send + Sync + 'static {
    /// The C spelling of the component type.
    const C_TYPE_NAME: &'static str;

    /// The complex precision built from two of these.
    const PRECISION: Precision;

    /// The component's encoding, zero-extended. Padding is excluded.
    fn bit_pattern(self) -> u128;
}

unsafe impl ComplexPart for f32 {
    const C_TYPE_NAME: &'static str = "float";
    const PRECISION: Precision = Precision::Complex4;

    fn bit_pattern(self) -> u128 {
        u128::from(self.to_bits())
    }
}

unsafe impl ComplexPart for f64 {
    const C_TYPE_NAME: &'static str = "double";
    const PRECISION: Precision = Precision::Complex8;

    fn bit_pattern(self) -> u128 {
        u128::from(self.to_bits())
    }
}

unsafe impl ComplexPart for X87Extended {
    const C_TYPE_NAME: &'static str = "long double";
    const PRECISION: Precision = Precision::Complex10;

    fn bit_pattern(self) -> u128 {
        self.to_bits()
    }
}

unsafe impl ComplexPart for Binary128 {
    const C_TYPE_NAME: &'static str = "long double";
    const PRECISION: Precision = Precision::Complex16;

    fn bit_pattern(self) -> u128 {
        self.to_bits()
    }
}

/// Aggregate complex value: the kernel's result slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CppComplex<T> {
    /// Real part.
    pub r: T,
    /// Imaginary part.
    pub i: T,
}

impl<T> CppComplex<T> {
    /// Create an aggregate from its parts.
    #[inline]
    pub const fn new(r: T, i: T) -> Self {
        Self { r, i }
    }
}

impl<T: ComplexPart> CppComplex<T> {
    /// Convert to the native representation using the build's constructor.
    #[inline(always)]
    #[must_use]
    pub fn into_native(self) -> Complex<T> {
        cmplx(self.r, self.i)
    }

    /// Bit patterns of both parts, `(real, imaginary)`.
    #[must_use]
    pub fn bit_patterns(&self) -> (u128, u128) {
        (self.r.bit_pattern(), self.i.bit_pattern())
    }
}

impl<T> From<Complex<T>> for CppComplex<T> {
    fn from(value: Complex<T>) -> Self {
        Self::new(value.re, value.im)
    }
}

/// Bit patterns of both parts of a native value, `(real, imaginary)`.
#[must_use]
pub fn native_bit_patterns<T: ComplexPart>(value: &Complex<T>) -> (u128, u128) {
    (value.re.bit_pattern(), value.im.bit_pattern())
}

macro_rules! assert_same_layout {
    ($($t:ty),* $(,)?) => {
        $(
            const _: () = {
                assert!(size_of::<CppComplex<$t>>() == size_of::<Complex<$t>>());
                assert!(align_of::<CppComplex<$t>>() == align_of::<Complex<$t>>());
                assert!(size_of::<CppComplex<$t>>() == 2 * size_of::<$t>());
                assert!(offset_of!(CppComplex<$t>, r) == offset_of!(Complex<$t>, re));
                assert!(offset_of!(CppComplex<$t>, i) == offset_of!(Complex<$t>, im));
                assert!(offset_of!(CppComplex<$t>, i) == size_of::<$t>());
            };
        )*
    };
}

assert_same_layout!(f32, f64, X87Extended, Binary128);
