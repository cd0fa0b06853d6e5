//! Reference kernels for the bridge integration tests.
//!
//! Every test binary that links `frt_rts_complex` must define the kernel
//! symbols for the precisions the build exports. These kernels treat a
//! descriptor as a [`TestArray`] (rank 1, contiguous) and an optional mask as
//! a [`TestMask`], and reduce in `f64`. A `dim` other than 0 or 1 panics,
//! which unwinds back through the bridge.

#![allow(dead_code)]

use std::ffi::{c_char, c_int, CStr};
use std::slice;

#[cfg(frt_long_double = "128")]
use frt_rts_complex::Binary128;
#[cfg(frt_long_double = "80")]
use frt_rts_complex::X87Extended;
use frt_rts_complex::{Complex, ComplexPart, CppComplex, Descriptor, ReductionKind};

/// A rank-1 array of complex elements.
#[repr(C)]
pub struct TestArray<T> {
    data: *const Complex<T>,
    len: usize,
}

impl<T> TestArray<T> {
    pub fn new(values: &[Complex<T>]) -> Self {
        Self {
            data: values.as_ptr(),
            len: values.len(),
        }
    }

    pub fn descriptor(&self) -> *const Descriptor {
        (self as *const Self).cast()
    }
}

/// A logical mask conforming to a [`TestArray`].
#[repr(C)]
pub struct TestMask {
    data: *const bool,
    len: usize,
}

impl TestMask {
    pub fn new(values: &[bool]) -> Self {
        Self {
            data: values.as_ptr(),
            len: values.len(),
        }
    }

    pub fn descriptor(&self) -> *const Descriptor {
        (self as *const Self).cast()
    }
}

/// A component type the reference kernels can reduce.
pub trait KernelScalar: ComplexPart {
    fn widen(self) -> f64;
    fn narrow(value: f64) -> Self;
}

impl KernelScalar for f32 {
    fn widen(self) -> f64 {
        f64::from(self)
    }

    fn narrow(value: f64) -> Self {
        value as f32
    }
}

impl KernelScalar for f64 {
    fn widen(self) -> f64 {
        self
    }

    fn narrow(value: f64) -> Self {
        value
    }
}

#[cfg(frt_long_double = "80")]
impl KernelScalar for X87Extended {
    fn widen(self) -> f64 {
        self.to_f64()
    }

    fn narrow(value: f64) -> Self {
        Self::from_f64(value)
    }
}

#[cfg(frt_long_double = "128")]
impl KernelScalar for Binary128 {
    fn widen(self) -> f64 {
        self.to_f64()
    }

    fn narrow(value: f64) -> Self {
        Self::from_f64(value)
    }
}

/// The reduction every kernel symbol performs.
///
/// # Safety
///
/// `x` must point to a live `TestArray<T>`, `mask` must be null or point to
/// a `TestMask` of the same length, and `source` must be null or a C string.
unsafe fn reduce<T: KernelScalar>(
    kind: ReductionKind,
    result: *mut CppComplex<T>,
    x: *const Descriptor,
    source: *const c_char,
    line: c_int,
    dim: c_int,
    mask: *const Descriptor,
) {
    if dim != 0 && dim != 1 {
        let file = if source.is_null() {
            "<unknown>"
        } else {
            unsafe { CStr::from_ptr(source) }
                .to_str()
                .unwrap_or("<invalid>")
        };
        panic!("{file}:{line}: {kind}: DIM={dim} is out of range for a rank-1 array");
    }

    let array = unsafe { &*x.cast::<TestArray<T>>() };
    let values = unsafe { slice::from_raw_parts(array.data, array.len) };
    let mask = (!mask.is_null()).then(|| {
        let mask = unsafe { &*mask.cast::<TestMask>() };
        assert_eq!(mask.len, array.len, "MASK does not conform to ARRAY");
        unsafe { slice::from_raw_parts(mask.data, mask.len) }
    });

    let selected = values
        .iter()
        .enumerate()
        .filter(|(n, _)| mask.map_or(true, |mask| mask[*n]))
        .map(|(_, z)| Complex::new(z.re.widen(), z.im.widen()));
    let value: Complex<f64> = match kind {
        ReductionKind::Sum => selected.sum(),
        ReductionKind::Product => selected.product(),
    };

    unsafe { *result = CppComplex::new(T::narrow(value.re), T::narrow(value.im)) };
}

macro_rules! reference_kernel {
    ($(#[$cfg:meta])* $name:ident: $kind:ident, $t:ty = $symbol:literal) => {
        $(#[$cfg])*
        #[export_name = $symbol]
        extern "C-unwind" fn $name(
            result: *mut CppComplex<$t>,
            x: *const Descriptor,
            source: *const c_char,
            line: c_int,
            dim: c_int,
            mask: *const Descriptor,
        ) {
            unsafe { reduce(ReductionKind::$kind, result, x, source, line, dim, mask) }
        }
    };
}

reference_kernel!(sum_complex4: Sum, f32 = "_FortranACppSumComplex4");
reference_kernel!(sum_complex8: Sum, f64 = "_FortranACppSumComplex8");
reference_kernel!(product_complex4: Product, f32 = "_FortranACppProductComplex4");
reference_kernel!(product_complex8: Product, f64 = "_FortranACppProductComplex8");
reference_kernel!(
    #[cfg(frt_long_double = "80")]
    sum_complex10: Sum, X87Extended = "_FortranACppSumComplex10"
);
reference_kernel!(
    #[cfg(frt_long_double = "80")]
    product_complex10: Product, X87Extended = "_FortranACppProductComplex10"
);
reference_kernel!(
    #[cfg(frt_long_double = "128")]
    sum_complex16: Sum, Binary128 = "_FortranACppSumComplex16"
);
reference_kernel!(
    #[cfg(frt_long_double = "128")]
    product_complex16: Product, Binary128 = "_FortranACppProductComplex16"
);
