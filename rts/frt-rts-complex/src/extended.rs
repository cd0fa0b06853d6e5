//! Storage types for C `long double` components.
//!
//! Rust has no `long double`. The bridge never does arithmetic on extended
//! values, it only moves them, so these types are bit-exact containers with
//! the C layout of the format they model:
//!
//! | Type | Format | Size | Align |
//! |------|--------|------|-------|
//! | [`X87Extended`] | x87 80-bit (x86-64 layout) | 16 | 16 |
//! | [`Binary128`] | IEEE 754 binary128 | 16 | 16 |
//!
//! Conversions from `f64` are exact. Conversions to `f64` round to nearest,
//! ties to even, and saturate to infinity or flush to signed zero outside
//! the `f64` range. NaN payloads keep their high-order bits and stay quiet.
//!
//! Equality on both types is encoding equality: `-0.0 != 0.0` and a NaN
//! equals itself.

use std::fmt;
use std::hash::{Hash, Hasher};

const F64_SIGN: u64 = 1 << 63;
const F64_INFINITY: u64 = 0x7FF0_0000_0000_0000;
const F64_QUIET: u64 = 1 << 51;
const F64_FRACTION_MASK: u64 = (1 << 52) - 1;

/// Split an `f64` into (negative, biased exponent, fraction).
fn f64_fields(value: f64) -> (bool, u32, u64) {
    let bits = value.to_bits();
    (
        bits & F64_SIGN != 0,
        ((bits >> 52) & 0x7FF) as u32,
        bits & F64_FRACTION_MASK,
    )
}

/// Round `sig * 2^exp2` to the nearest `f64`, ties to even.
fn round_to_f64(negative: bool, sig: u128, exp2: i32) -> f64 {
    let sign = if negative { F64_SIGN } else { 0 };
    if sig == 0 {
        return f64::from_bits(sign);
    }

    // Put the leading one at bit 127.
    let lz = sig.leading_zeros();
    let sig = sig << lz;
    let biased = exp2 - lz as i32 + 127 + 1023;
    if biased >= 0x7FF {
        return f64::from_bits(sign | F64_INFINITY);
    }

    // 53 kept bits for normals; subnormals lose one more bit per binade.
    let shift = if biased >= 1 {
        75
    } else {
        75 + (1 - biased).unsigned_abs()
    };
    let (kept, round_up) = if shift < 128 {
        let kept = sig >> shift;
        let rest = sig & ((1u128 << shift) - 1);
        let half = 1u128 << (shift - 1);
        (kept, rest > half || (rest == half && kept & 1 == 1))
    } else if shift == 128 {
        (0, sig > 1u128 << 127)
    } else {
        (0, false)
    };

    // `kept` carries the hidden bit, so a rounding carry bumps the exponent
    // (and reaches infinity from the largest finite value).
    let mantissa = kept as u64 + u64::from(round_up);
    let exponent = if biased >= 1 { (biased - 1) as u64 } else { 0 };
    f64::from_bits(sign | ((exponent << 52) + mantissa))
}

fn nan_f64(negative: bool, payload: u64) -> f64 {
    let sign = if negative { F64_SIGN } else { 0 };
    f64::from_bits(sign | F64_INFINITY | F64_QUIET | (payload & F64_FRACTION_MASK))
}

// ============================================================================
// x87 extended precision
// ============================================================================

/// An x87 80-bit extended precision value in its x86-64 memory layout.
#[repr(C, align(16))]
#[derive(Clone, Copy, Default)]
pub struct X87Extended {
    /// 64-bit significand with an explicit integer bit.
    significand: u64,
    /// Sign bit and 15-bit exponent, bias 16383.
    sign_exponent: u16,
    padding: [u16; 3],
}

impl X87Extended {
    const INTEGER_BIT: u64 = 1 << 63;
    const EXPONENT_MASK: u16 = 0x7FFF;
    const BIAS: i32 = 16383;

    /// Positive zero.
    pub const ZERO: Self = Self::from_parts(0, 0);
    /// One.
    pub const ONE: Self = Self::from_parts(0x3FFF, Self::INTEGER_BIT);
    /// Positive infinity.
    pub const INFINITY: Self = Self::from_parts(0x7FFF, Self::INTEGER_BIT);
    /// Negative infinity.
    pub const NEG_INFINITY: Self = Self::from_parts(0xFFFF, Self::INTEGER_BIT);
    /// The default quiet NaN.
    pub const NAN: Self = Self::from_parts(0x7FFF, 0xC000_0000_0000_0000);

    /// Build from the sign+exponent word and the significand.
    #[must_use]
    pub const fn from_parts(sign_exponent: u16, significand: u64) -> Self {
        Self {
            significand,
            sign_exponent,
            padding: [0; 3],
        }
    }

    /// Build from the low 80 bits of `bits` (sign+exponent above significand).
    #[must_use]
    pub const fn from_bits(bits: u128) -> Self {
        Self::from_parts((bits >> 64) as u16, bits as u64)
    }

    /// The 80-bit encoding, zero-extended.
    #[must_use]
    pub const fn to_bits(self) -> u128 {
        ((self.sign_exponent as u128) << 64) | self.significand as u128
    }

    /// The significand, integer bit included.
    #[must_use]
    pub const fn significand(self) -> u64 {
        self.significand
    }

    /// The sign+exponent word.
    #[must_use]
    pub const fn sign_exponent(self) -> u16 {
        self.sign_exponent
    }

    /// Whether the sign bit is set.
    #[must_use]
    pub const fn is_sign_negative(self) -> bool {
        self.sign_exponent & 0x8000 != 0
    }

    /// Whether this encodes a NaN.
    #[must_use]
    pub const fn is_nan(self) -> bool {
        self.sign_exponent & Self::EXPONENT_MASK == Self::EXPONENT_MASK
            && self.significand & !Self::INTEGER_BIT != 0
    }

    /// Widen an `f64`. Exact.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        let (negative, exponent, fraction) = f64_fields(value);
        let sign = if negative { 0x8000 } else { 0 };
        match exponent {
            0x7FF => Self::from_parts(sign | 0x7FFF, Self::INTEGER_BIT | (fraction << 11)),
            0 if fraction == 0 => Self::from_parts(sign, 0),
            0 => {
                // Subnormal: normalise so the integer bit is set.
                let lz = fraction.leading_zeros();
                let exponent = (15372 - lz) as u16;
                Self::from_parts(sign | exponent, fraction << lz)
            }
            _ => Self::from_parts(
                sign | (exponent + 15360) as u16,
                Self::INTEGER_BIT | (fraction << 11),
            ),
        }
    }

    /// Narrow to `f64`, rounding to nearest even.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        let negative = self.is_sign_negative();
        let exponent = self.sign_exponent & Self::EXPONENT_MASK;
        if exponent == Self::EXPONENT_MASK {
            let payload = self.significand & !Self::INTEGER_BIT;
            if payload == 0 {
                let sign = if negative { F64_SIGN } else { 0 };
                return f64::from_bits(sign | F64_INFINITY);
            }
            return nan_f64(negative, payload >> 11);
        }
        // Denormals scale like exponent 1 without the integer bit.
        let exp2 = i32::from(exponent.max(1)) - Self::BIAS - 63;
        round_to_f64(negative, u128::from(self.significand), exp2)
    }
}

impl PartialEq for X87Extended {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for X87Extended {}

impl Hash for X87Extended {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl From<f64> for X87Extended {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl fmt::Debug for X87Extended {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("X87Extended")
            .field("approx", &self.to_f64())
            .field("bits", &format_args!("{:#022x}", self.to_bits()))
            .finish()
    }
}

// ============================================================================
// IEEE binary128
// ============================================================================

/// An IEEE 754 binary128 (quad precision) value.
#[repr(C, align(16))]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Binary128 {
    bits: u128,
}

impl Binary128 {
    const SIGN: u128 = 1 << 127;
    const EXPONENT_MASK: u32 = 0x7FFF;
    const FRACTION_BITS: u32 = 112;
    const FRACTION_MASK: u128 = (1 << 112) - 1;
    const BIAS: i32 = 16383;

    /// Positive zero.
    pub const ZERO: Self = Self::from_bits(0);
    /// One.
    pub const ONE: Self = Self::from_bits(0x3FFF << 112);
    /// Positive infinity.
    pub const INFINITY: Self = Self::from_bits(0x7FFF << 112);
    /// Negative infinity.
    pub const NEG_INFINITY: Self = Self::from_bits(Self::SIGN | 0x7FFF << 112);
    /// The default quiet NaN.
    pub const NAN: Self = Self::from_bits(0x7FFF_8000 << 96);

    /// Build from the raw encoding.
    #[must_use]
    pub const fn from_bits(bits: u128) -> Self {
        Self { bits }
    }

    /// The raw encoding.
    #[must_use]
    pub const fn to_bits(self) -> u128 {
        self.bits
    }

    /// Whether the sign bit is set.
    #[must_use]
    pub const fn is_sign_negative(self) -> bool {
        self.bits & Self::SIGN != 0
    }

    /// Whether this encodes a NaN.
    #[must_use]
    pub const fn is_nan(self) -> bool {
        self.exponent() == Self::EXPONENT_MASK && self.bits & Self::FRACTION_MASK != 0
    }

    const fn exponent(self) -> u32 {
        ((self.bits >> Self::FRACTION_BITS) as u32) & Self::EXPONENT_MASK
    }

    /// Widen an `f64`. Exact.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        let (negative, exponent, fraction) = f64_fields(value);
        let sign = if negative { Self::SIGN } else { 0 };
        let fraction = u128::from(fraction);
        let bits = match exponent {
            0x7FF => (0x7FFF << 112) | (fraction << 60),
            0 if fraction == 0 => 0,
            0 => {
                // Subnormal: the leading one becomes the hidden bit.
                let top = 127 - fraction.leading_zeros();
                let exponent = u128::from(top + 15309);
                (exponent << 112) | ((fraction ^ (1 << top)) << (112 - top))
            }
            _ => (u128::from(exponent + 15360) << 112) | (fraction << 60),
        };
        Self::from_bits(sign | bits)
    }

    /// Narrow to `f64`, rounding to nearest even.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        let negative = self.is_sign_negative();
        let exponent = self.exponent();
        let fraction = self.bits & Self::FRACTION_MASK;
        if exponent == Self::EXPONENT_MASK {
            if fraction == 0 {
                let sign = if negative { F64_SIGN } else { 0 };
                return f64::from_bits(sign | F64_INFINITY);
            }
            return nan_f64(negative, (fraction >> 60) as u64);
        }
        let sig = if exponent == 0 {
            fraction
        } else {
            fraction | (1 << Self::FRACTION_BITS)
        };
        let exp2 = exponent.max(1) as i32 - Self::BIAS - Self::FRACTION_BITS as i32;
        round_to_f64(negative, sig, exp2)
    }
}

impl From<f64> for Binary128 {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl fmt::Debug for Binary128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binary128")
            .field("approx", &self.to_f64())
            .field("bits", &format_args!("{:#034x}", self.bits))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const X87_PI: u128 = 0x4000_C90F_DAA2_2168_C235;
    const QUAD_PI: u128 = 0x4000_921F_B544_42D1_8469_898C_C517_01B8;

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<X87Extended>(), 16);
        assert_eq!(std::mem::align_of::<X87Extended>(), 16);
        assert_eq!(std::mem::size_of::<Binary128>(), 16);
        assert_eq!(std::mem::align_of::<Binary128>(), 16);
    }

    #[test]
    fn test_x87_known_encodings() {
        assert_eq!(X87Extended::from_f64(1.0), X87Extended::ONE);
        assert_eq!(X87Extended::from_f64(0.0), X87Extended::ZERO);
        assert_eq!(X87Extended::from_f64(-2.5).to_bits(), 0xC000_A000_0000_0000_0000);
        assert_eq!(X87Extended::from_f64(f64::INFINITY), X87Extended::INFINITY);
        assert_eq!(
            X87Extended::from_f64(f64::NEG_INFINITY),
            X87Extended::NEG_INFINITY
        );
        assert_eq!(X87Extended::from_f64(f64::NAN), X87Extended::NAN);
        // Smallest f64 subnormal, 2^-1074.
        assert_eq!(
            X87Extended::from_f64(5e-324).to_bits(),
            (15309u128 << 64) | (1 << 63)
        );
    }

    #[test]
    fn test_x87_narrowing() {
        assert_eq!(X87Extended::from_bits(X87_PI).to_f64(), PI);
        assert_eq!(X87Extended::ONE.to_f64(), 1.0);
        assert!(X87Extended::NAN.to_f64().is_nan());
        assert_eq!(X87Extended::NEG_INFINITY.to_f64(), f64::NEG_INFINITY);

        // Exactly half an ulp above one: ties to even.
        let tie = X87Extended::from_parts(0x3FFF, (1 << 63) | (1 << 10));
        assert_eq!(tie.to_f64(), 1.0);
        // One ulp plus a half: ties to even rounds up.
        let tie = X87Extended::from_parts(0x3FFF, (1 << 63) | (1 << 11) | (1 << 10));
        assert_eq!(tie.to_f64(), 1.0 + 2.0 * f64::EPSILON);
        // Just above half an ulp.
        let above = X87Extended::from_parts(0x3FFF, (1 << 63) | (1 << 10) | 1);
        assert_eq!(above.to_f64(), 1.0 + f64::EPSILON);
    }

    #[test]
    fn test_x87_out_of_range() {
        let huge = X87Extended::from_parts(0x7FFE, u64::MAX);
        assert_eq!(huge.to_f64(), f64::INFINITY);
        let tiny = X87Extended::from_parts(0x8001, 1 << 63);
        let narrowed = tiny.to_f64();
        assert_eq!(narrowed, 0.0);
        assert!(narrowed.is_sign_negative());
        // Largest finite f64 survives; one x87 ulp more still rounds down.
        let max = X87Extended::from_f64(f64::MAX);
        assert_eq!(max.to_f64(), f64::MAX);
        let bumped = X87Extended::from_parts(max.sign_exponent(), max.significand() | 1);
        assert_eq!(bumped.to_f64(), f64::MAX);
    }

    #[test]
    fn test_x87_subnormal_rounding() {
        // 2^-1075 is half the smallest subnormal: ties to even gives zero.
        let half = X87Extended::from_parts(16383 - 1075, 1 << 63);
        assert_eq!(half.to_f64(), 0.0);
        // 1.5 * 2^-1075 rounds up to the smallest subnormal.
        let above = X87Extended::from_parts(16383 - 1075, (1 << 63) | (1 << 62));
        assert_eq!(above.to_f64(), 5e-324);
    }

    #[test]
    fn test_x87_equality_ignores_padding() {
        let mut a = X87Extended::ONE;
        a.padding = [0xDEAD, 0xBEEF, 0x1234];
        assert_eq!(a, X87Extended::ONE);
        assert_ne!(X87Extended::from_f64(-0.0), X87Extended::ZERO);
    }

    #[test]
    fn test_binary128_known_encodings() {
        assert_eq!(Binary128::from_f64(1.0), Binary128::ONE);
        assert_eq!(
            Binary128::from_f64(-2.5).to_bits(),
            0xC000_4000_0000_0000_0000_0000_0000_0000
        );
        assert_eq!(Binary128::from_f64(f64::INFINITY), Binary128::INFINITY);
        assert_eq!(Binary128::from_f64(f64::NAN), Binary128::NAN);
        // 2^-1074: biased exponent 16383 - 1074, empty fraction.
        assert_eq!(Binary128::from_f64(5e-324).to_bits(), 15309u128 << 112);
        assert!(Binary128::NAN.is_nan());
        assert!(!Binary128::INFINITY.is_nan());
    }

    #[test]
    fn test_binary128_narrowing() {
        assert_eq!(Binary128::from_bits(QUAD_PI).to_f64(), PI);
        assert_eq!(Binary128::ONE.to_f64(), 1.0);
        assert!(Binary128::NAN.to_f64().is_nan());
        let huge = Binary128::from_bits(0x7FFE << 112);
        assert_eq!(huge.to_f64(), f64::INFINITY);
        let tiny = Binary128::from_bits(1);
        assert_eq!(tiny.to_f64(), 0.0);
    }

    #[test]
    fn test_roundtrip_through_f64() {
        let values = [
            0.0,
            -0.0,
            1.0,
            -1.0,
            PI,
            1e300,
            -1e-300,
            f64::MIN_POSITIVE,
            f64::MAX,
            f64::MIN,
            5e-324,
            2.2250738585072e-308,
            f64::INFINITY,
        ];
        for value in values {
            let x87 = X87Extended::from_f64(value).to_f64();
            let quad = Binary128::from_f64(value).to_f64();
            assert_eq!(x87.to_bits(), value.to_bits(), "x87 {value:e}");
            assert_eq!(quad.to_bits(), value.to_bits(), "binary128 {value:e}");
        }
    }

    #[test]
    fn test_nan_payload_survives_roundtrip() {
        let nan = f64::from_bits(0x7FF8_0000_0000_1234);
        assert_eq!(X87Extended::from_f64(nan).to_f64().to_bits(), nan.to_bits());
        assert_eq!(Binary128::from_f64(nan).to_f64().to_bits(), nan.to_bits());
    }
}
