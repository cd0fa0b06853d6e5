//! Building a native complex value from two scalars.
//!
//! Two constructions exist and return bit-identical values:
//!
//! - [`construct_native`]: `Complex::new`, the library constructor.
//! - [`construct_punned`]: store the aggregate, read the native value back
//!   through a union. Valid only because the two layouts are identical
//!   (asserted in [`crate::repr`]).
//!
//! [`cmplx`] is the one the bridge uses. The `type-punning` cargo feature
//! selects the punned path at build time; there is no runtime switch.

use num_complex::Complex;

use crate::repr::{ComplexPart, CppComplex};

/// Which native construction a build uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Construction {
    /// `Complex::new`.
    Native,
    /// Reinterpretation of the aggregate's memory.
    Punned,
}

impl Construction {
    /// Short name for reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Punned => "type-punning",
        }
    }
}

/// The construction compiled into this build.
pub const CONSTRUCTION: Construction = if cfg!(feature = "type-punning") {
    Construction::Punned
} else {
    Construction::Native
};

/// Overlapping storage of the two representations.
#[repr(C)]
union Punned<T: Copy> {
    aggregate: CppComplex<T>,
    native: Complex<T>,
}

/// Build a native complex value with the library constructor.
#[inline(always)]
#[must_use]
pub const fn construct_native<T: ComplexPart>(r: T, i: T) -> Complex<T> {
    Complex::new(r, i)
}

/// Build a native complex value by reinterpreting an aggregate.
#[inline(always)]
#[must_use]
pub fn construct_punned<T: ComplexPart>(r: T, i: T) -> Complex<T> {
    let storage = Punned {
        aggregate: CppComplex::new(r, i),
    };
    // SAFETY: `CppComplex<T>` and `Complex<T>` are both `#[repr(C)]` pairs
    // of `T` with identical size, alignment and field offsets, and every bit
    // pattern of a `ComplexPart` is a valid value.
    unsafe { storage.native }
}

/// Build a native complex value the way this build was configured to.
#[inline(always)]
#[must_use]
pub fn cmplx<T: ComplexPart>(r: T, i: T) -> Complex<T> {
    #[cfg(feature = "type-punning")]
    {
        construct_punned(r, i)
    }
    #[cfg(not(feature = "type-punning"))]
    {
        construct_native(r, i)
    }
}
