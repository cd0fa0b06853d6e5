//! The fixed enumeration of bridged reductions.
//!
//! Each supported (reduction, precision) combination is one row of
//! [`ALL_ENTRY_POINTS`]. The table is data for tools; the runtime exports
//! one concrete function per row and never dispatches through it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AbiError, AbiResult, LongDoubleFormat};

/// Prefix applied to every runtime symbol.
pub const RTNAME_PREFIX: &str = "_FortranA";

/// A reduction intrinsic with a complex-valued result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReductionKind {
    /// `SUM(array [, dim] [, mask])`.
    Sum,
    /// `PRODUCT(array [, dim] [, mask])`.
    Product,
}

impl ReductionKind {
    /// Both reductions, in symbol table order.
    pub const ALL: [Self; 2] = [Self::Sum, Self::Product];

    /// The stem used in symbol names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sum => "Sum",
            Self::Product => "Product",
        }
    }

    /// The Fortran intrinsic name.
    #[must_use]
    pub const fn intrinsic(self) -> &'static str {
        match self {
            Self::Sum => "SUM",
            Self::Product => "PRODUCT",
        }
    }
}

impl fmt::Display for ReductionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.intrinsic())
    }
}

impl FromStr for ReductionKind {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "product" => Ok(Self::Product),
            _ => Err(AbiError::UnknownReduction(s.to_string())),
        }
    }
}

/// Precision of a complex value, named by its Fortran KIND.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Precision {
    /// `COMPLEX(4)`: two `float` components.
    Complex4,
    /// `COMPLEX(8)`: two `double` components.
    Complex8,
    /// `COMPLEX(10)`: two x87 80-bit `long double` components.
    Complex10,
    /// `COMPLEX(16)`: two binary128 `long double` components.
    Complex16,
}

impl Precision {
    /// Every precision, in symbol table order.
    pub const ALL: [Self; 4] = [
        Self::Complex4,
        Self::Complex8,
        Self::Complex10,
        Self::Complex16,
    ];

    /// The Fortran KIND number.
    #[must_use]
    pub const fn kind(self) -> u8 {
        match self {
            Self::Complex4 => 4,
            Self::Complex8 => 8,
            Self::Complex10 => 10,
            Self::Complex16 => 16,
        }
    }

    /// Look a precision up by its Fortran KIND number.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::UnknownKind`] for kinds other than 4, 8, 10, 16.
    /// `COMPLEX(2)` and `COMPLEX(3)` have no bridge.
    pub fn from_kind(kind: u8) -> AbiResult<Self> {
        match kind {
            4 => Ok(Self::Complex4),
            8 => Ok(Self::Complex8),
            10 => Ok(Self::Complex10),
            16 => Ok(Self::Complex16),
            other => Err(AbiError::UnknownKind(other)),
        }
    }

    /// Whether the components are C `long double`.
    #[must_use]
    pub const fn is_extended(self) -> bool {
        matches!(self, Self::Complex10 | Self::Complex16)
    }

    /// The `long double` format this precision requires, if any.
    #[must_use]
    pub const fn long_double(self) -> Option<LongDoubleFormat> {
        match self {
            Self::Complex4 | Self::Complex8 => None,
            Self::Complex10 => Some(LongDoubleFormat::X87Extended80),
            Self::Complex16 => Some(LongDoubleFormat::Binary128),
        }
    }

    /// Whether this precision is available when `long double` is `format`.
    #[must_use]
    pub fn supported_on(self, format: LongDoubleFormat) -> bool {
        self.long_double().map_or(true, |required| required == format)
    }

    /// The extended precision provided by `format`, if any.
    #[must_use]
    pub const fn for_long_double(format: LongDoubleFormat) -> Option<Self> {
        match format {
            LongDoubleFormat::Double64 => None,
            LongDoubleFormat::X87Extended80 => Some(Self::Complex10),
            LongDoubleFormat::Binary128 => Some(Self::Complex16),
        }
    }

    /// C spelling of one component.
    #[must_use]
    pub const fn component_c_type(self) -> &'static str {
        match self {
            Self::Complex4 => "float",
            Self::Complex8 => "double",
            Self::Complex10 | Self::Complex16 => "long double",
        }
    }

    /// C spelling of the native complex type.
    #[must_use]
    pub const fn c_type(self) -> &'static str {
        match self {
            Self::Complex4 => "float _Complex",
            Self::Complex8 => "double _Complex",
            Self::Complex10 | Self::Complex16 => "long double _Complex",
        }
    }

    /// Tag of the two-field aggregate struct the kernel fills.
    #[must_use]
    pub const fn aggregate_name(self) -> &'static str {
        match self {
            Self::Complex4 => "CppComplexFloat",
            Self::Complex8 => "CppComplexDouble",
            Self::Complex10 | Self::Complex16 => "CppComplexLongDouble",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "COMPLEX({})", self.kind())
    }
}

/// One bridged reduction entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct EntryPoint {
    /// The reduction performed.
    pub kind: ReductionKind,
    /// The precision of the operands and result.
    pub precision: Precision,
    /// Symbol exported by the bridge (native complex return).
    pub symbol: &'static str,
    /// Kernel symbol the bridge forwards to (aggregate out-parameter).
    pub kernel_symbol: &'static str,
}

impl EntryPoint {
    /// Whether this entry point exists when `long double` is `format`.
    #[must_use]
    pub fn available_on(&self, format: LongDoubleFormat) -> bool {
        self.precision.supported_on(format)
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.precision)
    }
}

macro_rules! entry {
    ($kind:ident, $precision:ident, $symbol:literal, $kernel:literal) => {
        EntryPoint {
            kind: ReductionKind::$kind,
            precision: Precision::$precision,
            symbol: $symbol,
            kernel_symbol: $kernel,
        }
    };
}

/// Every entry point any target can provide.
pub const ALL_ENTRY_POINTS: [EntryPoint; 8] = [
    entry!(Sum, Complex4, "_FortranASumComplex4", "_FortranACppSumComplex4"),
    entry!(Sum, Complex8, "_FortranASumComplex8", "_FortranACppSumComplex8"),
    entry!(Sum, Complex10, "_FortranASumComplex10", "_FortranACppSumComplex10"),
    entry!(Sum, Complex16, "_FortranASumComplex16", "_FortranACppSumComplex16"),
    entry!(Product, Complex4, "_FortranAProductComplex4", "_FortranACppProductComplex4"),
    entry!(Product, Complex8, "_FortranAProductComplex8", "_FortranACppProductComplex8"),
    entry!(Product, Complex10, "_FortranAProductComplex10", "_FortranACppProductComplex10"),
    entry!(Product, Complex16, "_FortranAProductComplex16", "_FortranACppProductComplex16"),
];

/// Entry points that exist when `long double` is `format`.
pub fn entry_points_for(format: LongDoubleFormat) -> impl Iterator<Item = &'static EntryPoint> {
    ALL_ENTRY_POINTS
        .iter()
        .filter(move |entry| entry.available_on(format))
}

/// Find the entry point for `kind` at `precision` under `format`.
///
/// # Errors
///
/// Returns [`AbiError::Unavailable`] when `precision` needs a different
/// `long double` format.
pub fn entry_point(
    kind: ReductionKind,
    precision: Precision,
    format: LongDoubleFormat,
) -> AbiResult<&'static EntryPoint> {
    entry_points_for(format)
        .find(|entry| entry.kind == kind && entry.precision == precision)
        .ok_or(AbiError::Unavailable { precision, format })
}
