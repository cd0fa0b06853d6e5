//! The numeric kernel contract.
//!
//! A kernel entry point takes a hidden pointer to an aggregate result slot,
//! followed by the reduction arguments, and fills the slot:
//!
//! ```text
//! void _FortranACppSumComplex8(struct CppComplexDouble *result,
//!                              const struct CppDescriptor *x,
//!                              const char *source, int line,
//!                              int dim, const struct CppDescriptor *mask);
//! ```
//!
//! The bridge never looks at the arguments. Kernels report bad input in
//! their own way; the `C-unwind` ABI lets an unwinding failure travel back
//! through the bridge to the caller instead of aborting at the boundary.

use std::ffi::{c_char, c_int};
use std::marker::{PhantomData, PhantomPinned};
use std::ptr;

use num_complex::Complex;

use crate::repr::{ComplexPart, CppComplex};

/// Opaque array descriptor owned by the runtime.
#[repr(C)]
pub struct Descriptor {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Signature of a kernel entry point for component type `T`.
pub type ReductionKernel<T> = unsafe extern "C-unwind" fn(
    result: *mut CppComplex<T>,
    x: *const Descriptor,
    source: *const c_char,
    line: c_int,
    dim: c_int,
    mask: *const Descriptor,
);

/// The pass-through arguments of one reduction call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReductionArgs {
    /// The array being reduced.
    pub x: *const Descriptor,
    /// Source file name of the call, for diagnostics. May be null.
    pub source: *const c_char,
    /// Source line of the call.
    pub line: c_int,
    /// Dimension to reduce along; 0 reduces the whole array.
    pub dim: c_int,
    /// Optional `MASK=` array; null when absent.
    pub mask: *const Descriptor,
}

impl ReductionArgs {
    /// Arguments for a whole-array reduction without a mask.
    #[must_use]
    pub const fn whole_array(x: *const Descriptor, source: *const c_char, line: c_int) -> Self {
        Self {
            x,
            source,
            line,
            dim: 0,
            mask: ptr::null(),
        }
    }
}

/// Call `kernel` with a fresh result slot and return the slot as a native
/// complex value.
///
/// Every exported entry point is this function applied to its kernel.
///
/// # Safety
///
/// `kernel` must be safe to call with `args`, and must either fill the
/// result slot or not return normally.
#[inline(always)]
pub unsafe fn adapt_reduction<T: ComplexPart>(
    kernel: ReductionKernel<T>,
    args: ReductionArgs,
) -> Complex<T> {
    let mut result = CppComplex::<T>::default();
    // SAFETY: upheld by the caller; `result` outlives the call.
    unsafe {
        kernel(
            &mut result,
            args.x,
            args.source,
            args.line,
            args.dim,
            args.mask,
        );
    }
    result.into_native()
}
