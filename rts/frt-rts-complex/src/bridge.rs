//! Exported reduction entry points.
//!
//! One function per (reduction, precision) pair, each a direct call into
//! the matching kernel symbol through [`adapt_reduction`]. The set is fixed
//! at compile time: extended-precision entry points exist only when the
//! build script enabled them for the target's `long double`.
//!
//! # Calling Convention
//!
//! Entry points use the C calling convention (`C-unwind`, so kernel
//! failures that unwind are not turned into aborts here). `COMPLEX(4)` and
//! `COMPLEX(8)` are exported under their runtime symbol names with
//! `#[export_name]`: `Complex<f32>` and `Complex<f64>` are returned exactly
//! like `float _Complex` and `double _Complex`.
//!
//! The extended functions are not exported. No Rust type is returned the way
//! `long double _Complex` is, so `_FortranASumComplex10` and friends are
//! compiled from `native/extended.c` and call the same kernels. The Rust
//! functions here give Rust callers the same reduction.

use std::ffi::{c_char, c_int};

use num_complex::Complex;

#[cfg(frt_long_double = "128")]
use crate::extended::Binary128;
#[cfg(frt_long_double = "80")]
use crate::extended::X87Extended;
use crate::kernel::{adapt_reduction, Descriptor, ReductionArgs};
use crate::repr::CppComplex;

/// Declare a kernel symbol and the entry point that forwards to it.
///
/// `extern fn` rows are exported under `$symbol`; `native fn` rows leave
/// the symbol to the C shim.
macro_rules! bridge {
    (
        $(#[$attr:meta])*
        extern fn $name:ident -> Complex<$t:ty> = $symbol:literal;
        kernel $kernel:ident = $kernel_symbol:literal;
    ) => {
        bridge!(@define [#[export_name = $symbol]] $(#[$attr])* $name, $t, $kernel, $kernel_symbol);
    };
    (
        $(#[$attr:meta])*
        native fn $name:ident -> Complex<$t:ty> = $symbol:literal;
        kernel $kernel:ident = $kernel_symbol:literal;
    ) => {
        bridge!(
            @define []
            $(#[$attr])*
            #[doc = ""]
            #[doc = concat!("The C symbol `", $symbol, "` comes from `native/extended.c`.")]
            $name, $t, $kernel, $kernel_symbol
        );
    };
    (
        @define [$(#[$export:meta])*]
        $(#[$attr:meta])*
        $name:ident, $t:ty, $kernel:ident, $kernel_symbol:literal
    ) => {
        extern "C-unwind" {
            #[link_name = $kernel_symbol]
            fn $kernel(
                result: *mut CppComplex<$t>,
                x: *const Descriptor,
                source: *const c_char,
                line: c_int,
                dim: c_int,
                mask: *const Descriptor,
            );
        }

        $(#[$attr])*
        ///
        /// # Safety
        ///
        /// The arguments must satisfy the kernel's contract: `x` (and
        /// `mask`, when not null) must point to valid descriptors, and
        /// `source` must be null or a NUL-terminated string.
        $(#[$export])*
        pub unsafe extern "C-unwind" fn $name(
            x: *const Descriptor,
            source: *const c_char,
            line: c_int,
            dim: c_int,
            mask: *const Descriptor,
        ) -> Complex<$t> {
            let args = ReductionArgs {
                x,
                source,
                line,
                dim,
                mask,
            };
            // SAFETY: forwarded from our caller.
            unsafe { adapt_reduction($kernel, args) }
        }
    };
}

// ============================================================================
// SUM
// ============================================================================

bridge! {
    /// `SUM` of a `COMPLEX(4)` array.
    extern fn sum_complex4 -> Complex<f32> = "_FortranASumComplex4";
    kernel cpp_sum_complex4 = "_FortranACppSumComplex4";
}

bridge! {
    /// `SUM` of a `COMPLEX(8)` array.
    extern fn sum_complex8 -> Complex<f64> = "_FortranASumComplex8";
    kernel cpp_sum_complex8 = "_FortranACppSumComplex8";
}

#[cfg(frt_long_double = "80")]
bridge! {
    /// `SUM` of a `COMPLEX(10)` array.
    native fn sum_complex10 -> Complex<X87Extended> = "_FortranASumComplex10";
    kernel cpp_sum_complex10 = "_FortranACppSumComplex10";
}

#[cfg(frt_long_double = "128")]
bridge! {
    /// `SUM` of a `COMPLEX(16)` array.
    native fn sum_complex16 -> Complex<Binary128> = "_FortranASumComplex16";
    kernel cpp_sum_complex16 = "_FortranACppSumComplex16";
}

// ============================================================================
// PRODUCT
// ============================================================================

bridge! {
    /// `PRODUCT` of a `COMPLEX(4)` array.
    extern fn product_complex4 -> Complex<f32> = "_FortranAProductComplex4";
    kernel cpp_product_complex4 = "_FortranACppProductComplex4";
}

bridge! {
    /// `PRODUCT` of a `COMPLEX(8)` array.
    extern fn product_complex8 -> Complex<f64> = "_FortranAProductComplex8";
    kernel cpp_product_complex8 = "_FortranACppProductComplex8";
}

#[cfg(frt_long_double = "80")]
bridge! {
    /// `PRODUCT` of a `COMPLEX(10)` array.
    native fn product_complex10 -> Complex<X87Extended> = "_FortranAProductComplex10";
    kernel cpp_product_complex10 = "_FortranACppProductComplex10";
}

#[cfg(frt_long_double = "128")]
bridge! {
    /// `PRODUCT` of a `COMPLEX(16)` array.
    native fn product_complex16 -> Complex<Binary128> = "_FortranAProductComplex16";
    kernel cpp_product_complex16 = "_FortranACppProductComplex16";
}
