//! Calls into the exported entry points from C.
//!
//! `libfrt_c_caller.a` (built from `native/c_caller.c`) calls each symbol
//! through its `_Complex` prototype, so the result travels through the C
//! compiler's own return convention before the parts are written back.
//! The reference kernels from `common` do the reduction.

#![cfg(not(target_env = "msvc"))]

mod common;

use std::ffi::{c_char, c_int};
use std::ptr;

use common::{TestArray, TestMask};
use frt_rts_complex::{Complex, Descriptor, ReductionKind};

#[link(name = "frt_c_caller", kind = "static")]
extern "C" {
    fn frt_c_reduce_complex4(
        is_product: c_int,
        x: *const Descriptor,
        source: *const c_char,
        line: c_int,
        dim: c_int,
        mask: *const Descriptor,
        out: *mut f32,
    );
    fn frt_c_reduce_complex8(
        is_product: c_int,
        x: *const Descriptor,
        source: *const c_char,
        line: c_int,
        dim: c_int,
        mask: *const Descriptor,
        out: *mut f64,
    );
    #[cfg(frt_long_double = "80")]
    fn frt_c_reduce_complex10(
        is_product: c_int,
        x: *const Descriptor,
        source: *const c_char,
        line: c_int,
        dim: c_int,
        mask: *const Descriptor,
        out: *mut frt_rts_complex::X87Extended,
    );
    #[cfg(frt_long_double = "128")]
    fn frt_c_reduce_complex16(
        is_product: c_int,
        x: *const Descriptor,
        source: *const c_char,
        line: c_int,
        dim: c_int,
        mask: *const Descriptor,
        out: *mut frt_rts_complex::Binary128,
    );
}

/// Generate a helper that reduces `values` through one C caller.
macro_rules! c_reduce {
    ($(#[$cfg:meta])* $name:ident: $t:ty => $caller:ident) => {
        $(#[$cfg])*
        fn $name(
            kind: ReductionKind,
            values: &[Complex<$t>],
            mask: Option<&[bool]>,
        ) -> Complex<$t> {
            let array = TestArray::new(values);
            let mask = mask.map(TestMask::new);
            let mask_ptr = mask.as_ref().map_or(ptr::null(), TestMask::descriptor);
            let is_product = c_int::from(kind == ReductionKind::Product);
            let mut out = [<$t as Default>::default(); 2];
            unsafe {
                $caller(
                    is_product,
                    array.descriptor(),
                    c"c_abi.f90".as_ptr(),
                    7,
                    0,
                    mask_ptr,
                    out.as_mut_ptr(),
                )
            };
            Complex::new(out[0], out[1])
        }
    };
}

c_reduce!(reduce4: f32 => frt_c_reduce_complex4);
c_reduce!(reduce8: f64 => frt_c_reduce_complex8);
c_reduce!(
    #[cfg(frt_long_double = "80")]
    reduce10: frt_rts_complex::X87Extended => frt_c_reduce_complex10
);
c_reduce!(
    #[cfg(frt_long_double = "128")]
    reduce16: frt_rts_complex::Binary128 => frt_c_reduce_complex16
);

#[test]
fn test_single_precision_from_c() {
    let values = [Complex::new(1.5f32, -1.0), Complex::new(0.5, 3.0)];
    assert_eq!(reduce4(ReductionKind::Sum, &values, None), Complex::new(2.0, 2.0));
    // (1.5 - i)(0.5 + 3i) = 3.75 + 4i
    assert_eq!(
        reduce4(ReductionKind::Product, &values, None),
        Complex::new(3.75, 4.0)
    );
}

#[test]
fn test_double_precision_from_c() {
    let values = [
        Complex::new(1.0, 2.0),
        Complex::new(3.0, 4.0),
        Complex::new(-0.5, 0.25),
    ];
    assert_eq!(
        reduce8(ReductionKind::Sum, &values, None),
        Complex::new(3.5, 6.25)
    );
    // (1 + 2i)(3 + 4i)(-0.5 + 0.25i) = (-5 + 10i)(-0.5 + 0.25i) = 0 - 6.25i
    assert_eq!(
        reduce8(ReductionKind::Product, &values, None),
        Complex::new(0.0, -6.25)
    );
}

#[test]
fn test_masked_reduction_from_c() {
    let values = [
        Complex::new(1.0, 1.0),
        Complex::new(10.0, 0.0),
        Complex::new(0.0, 2.0),
    ];
    let mask = [true, false, true];
    assert_eq!(
        reduce8(ReductionKind::Sum, &values, Some(&mask[..])),
        Complex::new(1.0, 3.0)
    );
    assert_eq!(
        reduce8(ReductionKind::Product, &values, Some(&mask[..])),
        Complex::new(-2.0, 2.0)
    );
    assert_eq!(
        reduce4(ReductionKind::Product, &[], None),
        Complex::new(1.0, 0.0)
    );
}

#[test]
fn test_c_and_rust_callers_agree() {
    use frt_rts_complex::bridge::{product_complex8, sum_complex8};

    for n in 1..32 {
        let values: Vec<Complex<f64>> = (0..n)
            .map(|k| Complex::new(f64::from(k) * 0.5, 1.0 - f64::from(k)))
            .collect();
        let array = TestArray::new(&values);
        let sum = unsafe { sum_complex8(array.descriptor(), ptr::null(), 7, 0, ptr::null()) };
        let product =
            unsafe { product_complex8(array.descriptor(), ptr::null(), 7, 0, ptr::null()) };
        assert_eq!(reduce8(ReductionKind::Sum, &values, None), sum);
        assert_eq!(reduce8(ReductionKind::Product, &values, None), product);
    }
}

#[cfg(frt_long_double = "80")]
#[test]
fn test_x87_from_c() {
    use frt_rts_complex::X87Extended;

    let x = |re: f64, im: f64| Complex::new(X87Extended::from_f64(re), X87Extended::from_f64(im));
    let values = [x(1.0, 2.0), x(3.0, 4.0), x(0.25, -8.0)];
    assert_eq!(reduce10(ReductionKind::Sum, &values, None), x(4.25, -2.0));
    // (-5 + 10i)(0.25 - 8i) = -1.25 + 40i + 2.5i + 80 = 78.75 + 42.5i
    assert_eq!(
        reduce10(ReductionKind::Product, &values, None),
        x(78.75, 42.5)
    );
    let mask = [false, true, false];
    assert_eq!(
        reduce10(ReductionKind::Sum, &values, Some(&mask[..])),
        x(3.0, 4.0)
    );
}

#[cfg(frt_long_double = "128")]
#[test]
fn test_binary128_from_c() {
    use frt_rts_complex::Binary128;

    let q = |re: f64, im: f64| Complex::new(Binary128::from_f64(re), Binary128::from_f64(im));
    let values = [q(1.0, 2.0), q(3.0, 4.0), q(0.25, -8.0)];
    assert_eq!(reduce16(ReductionKind::Sum, &values, None), q(4.25, -2.0));
    assert_eq!(
        reduce16(ReductionKind::Product, &values, None),
        q(78.75, 42.5)
    );
    let mask = [false, true, false];
    assert_eq!(
        reduce16(ReductionKind::Sum, &values, Some(&mask[..])),
        q(3.0, 4.0)
    );
}
