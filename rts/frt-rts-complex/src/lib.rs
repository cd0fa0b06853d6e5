//! # FRT Complex Reduction Bridge
//!
//! C ABI entry points for the `SUM` and `PRODUCT` intrinsics over `COMPLEX`
//! arrays. Compiled Fortran code calls these with the platform's native
//! complex return convention (`float _Complex`, `double _Complex`,
//! `long double _Complex`). The numeric kernel that performs the reduction
//! was written against a different convention: it returns its result in a
//! two-field struct through a hidden output pointer. This crate sits in
//! between.
//!
//! ## Call Path
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │            compiled code: z = _FortranASumComplex8(x, ...)       │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  bridge::sum_complex8                                            │
//! │    let mut r = CppComplex::<f64>::default();   // stack slot     │
//! │    _FortranACppSumComplex8(&mut r, x, ...);    // kernel fills r │
//! │    cmplx(r.r, r.i)                             // native value   │
//! ├──────────────────────────────────────────────────────────────────┤
//! │            numeric kernel (external, aggregate convention)       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bridge holds no state, validates nothing, and adds no failure modes:
//! whatever the kernel does on bad input (abort, unwind) reaches the caller
//! unchanged.
//!
//! ## Precisions
//!
//! | Precision | Component | Built when |
//! |-----------|-----------|------------|
//! | `COMPLEX(4)` | `f32` | always |
//! | `COMPLEX(8)` | `f64` | always |
//! | `COMPLEX(10)` | [`X87Extended`] | `long double` is x87 80-bit |
//! | `COMPLEX(16)` | [`Binary128`] | `long double` is binary128 |
//!
//! The extended row is decided by the build script from Cargo's target
//! configuration (override with `FRT_LONG_DOUBLE=64|80|128`). Entry points
//! for the other extended format are not compiled at all.
//!
//! The extended C symbols are compiled from `native/extended.c`, since only
//! the C compiler knows how the target returns `long double _Complex`. The
//! Rust functions in [`bridge`] cover the same rows for Rust callers.
//!
//! ## Linking
//!
//! The kernel symbols (`_FortranACpp*`) are declared, not defined, here.
//! Any final link that pulls in the bridge must provide them. The
//! `staticlib` bundles the native shim, so C callers link one archive.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::module_name_repetitions)]

pub mod bridge;
pub mod construct;
pub mod extended;
pub mod kernel;
pub mod repr;

pub use construct::{cmplx, construct_native, construct_punned, Construction, CONSTRUCTION};
pub use extended::{Binary128, X87Extended};
pub use frt_abi::{AbiError, AbiResult, EntryPoint, LongDoubleFormat, Precision, ReductionKind};
pub use kernel::{adapt_reduction, Descriptor, ReductionArgs, ReductionKernel};
pub use num_complex::Complex;
pub use repr::{ComplexPart, CppComplex};

/// Scalar type of the extended precision this build exports.
#[cfg(frt_long_double = "80")]
pub type LongDouble = X87Extended;

/// Scalar type of the extended precision this build exports.
#[cfg(frt_long_double = "128")]
pub type LongDouble = Binary128;

/// The `long double` format of the target this crate was built for.
///
/// This is the detected (or overridden) format even when the matching
/// extended entry points could not be built; see [`extended_precision`].
#[must_use]
pub fn built_long_double() -> LongDoubleFormat {
    match env!("FRT_LONG_DOUBLE_BITS") {
        "80" => LongDoubleFormat::X87Extended80,
        "128" => LongDoubleFormat::Binary128,
        _ => LongDoubleFormat::Double64,
    }
}

/// The extended precision exported by this build, if any.
#[must_use]
pub const fn extended_precision() -> Option<Precision> {
    if cfg!(frt_long_double = "80") {
        Some(Precision::Complex10)
    } else if cfg!(frt_long_double = "128") {
        Some(Precision::Complex16)
    } else {
        None
    }
}

/// Entry points exported by this build, in symbol table order.
pub fn entry_points() -> impl Iterator<Item = &'static EntryPoint> {
    let extended = extended_precision();
    frt_abi::ALL_ENTRY_POINTS
        .iter()
        .filter(move |entry| !entry.precision.is_extended() || Some(entry.precision) == extended)
}

/// Find the exported entry point for `kind` at `precision`.
///
/// # Errors
///
/// Returns [`AbiError::Unavailable`] if this build has no such symbol.
pub fn entry_point(kind: ReductionKind, precision: Precision) -> AbiResult<&'static EntryPoint> {
    entry_points()
        .find(|entry| entry.kind == kind && entry.precision == precision)
        .ok_or(AbiError::Unavailable {
            precision,
            format: built_long_double(),
        })
}
