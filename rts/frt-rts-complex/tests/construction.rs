//! Property tests for native complex construction.
//!
//! The library constructor and the reinterpretation of an aggregate must
//! produce the same bits for every component pattern, NaN payloads and
//! signed zeros included.

mod common;

use frt_rts_complex::repr::native_bit_patterns;
use frt_rts_complex::{
    cmplx, construct_native, construct_punned, Binary128, Complex, CppComplex, X87Extended,
};
use proptest::prelude::*;

/// 80 significant bits of an x87 value.
const X87_MASK: u128 = (1 << 80) - 1;

proptest! {
    #[test]
    fn single_precision_paths_agree(re in any::<u32>(), im in any::<u32>()) {
        let (re, im) = (f32::from_bits(re), f32::from_bits(im));
        prop_assert_eq!(
            native_bit_patterns(&construct_native(re, im)),
            native_bit_patterns(&construct_punned(re, im))
        );
    }

    #[test]
    fn double_precision_paths_agree(re in any::<u64>(), im in any::<u64>()) {
        let (re, im) = (f64::from_bits(re), f64::from_bits(im));
        prop_assert_eq!(
            native_bit_patterns(&construct_native(re, im)),
            native_bit_patterns(&construct_punned(re, im))
        );
    }

    #[test]
    fn x87_paths_agree(re in any::<u128>(), im in any::<u128>()) {
        let (re, im) = (X87Extended::from_bits(re), X87Extended::from_bits(im));
        let native = native_bit_patterns(&construct_native(re, im));
        prop_assert_eq!(native, native_bit_patterns(&construct_punned(re, im)));
        prop_assert!(native.0 <= X87_MASK && native.1 <= X87_MASK);
    }

    #[test]
    fn binary128_paths_agree(re in any::<u128>(), im in any::<u128>()) {
        let (re, im) = (Binary128::from_bits(re), Binary128::from_bits(im));
        prop_assert_eq!(
            native_bit_patterns(&construct_native(re, im)),
            native_bit_patterns(&construct_punned(re, im))
        );
    }

    #[test]
    fn aggregate_round_trips_through_native(re in any::<u64>(), im in any::<u64>()) {
        let aggregate = CppComplex::new(f64::from_bits(re), f64::from_bits(im));
        let native = aggregate.into_native();
        prop_assert_eq!(native_bit_patterns(&native), (u128::from(re), u128::from(im)));
        prop_assert_eq!(CppComplex::from(native).bit_patterns(), aggregate.bit_patterns());
    }

    #[test]
    fn extended_conversions_are_exact_for_doubles(value in any::<f64>()) {
        prop_assume!(!value.is_nan());
        prop_assert_eq!(X87Extended::from_f64(value).to_f64().to_bits(), value.to_bits());
        prop_assert_eq!(Binary128::from_f64(value).to_f64().to_bits(), value.to_bits());
    }
}

#[test]
fn test_cmplx_agrees_with_both_paths() {
    let z: Complex<f32> = cmplx(-0.0, f32::NAN);
    assert_eq!(native_bit_patterns(&z), native_bit_patterns(&construct_native(-0.0f32, f32::NAN)));
    assert_eq!(native_bit_patterns(&z), native_bit_patterns(&construct_punned(-0.0f32, f32::NAN)));
}
