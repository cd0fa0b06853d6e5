//! # FRT Complex Reduction ABI
//!
//! Describes the symbol-level surface of the runtime's complex reduction
//! bridge without linking against it. Compiler back ends, header
//! generators and diagnostic tools use this crate to answer questions like
//! "which `SUM` entry points exist for `aarch64-unknown-linux-gnu`?" for any
//! target, not only the one the runtime was built for.
//!
//! ## Overview
//!
//! - **ReductionKind**: the reduction intrinsics bridged (`SUM`, `PRODUCT`).
//! - **Precision**: the complex kinds (`COMPLEX(4)`, `(8)`, `(10)`, `(16)`).
//! - **EntryPoint**: one (kind, precision) pair, its exported symbol and the
//!   kernel symbol it forwards to.
//! - **Header**: renders the C declarations for a set of entry points.
//!
//! ## Symbol Scheme
//!
//! ```text
//!  caller (C _Complex ABI)                   numeric kernel (aggregate ABI)
//! ┌──────────────────────────┐             ┌───────────────────────────────┐
//! │ _FortranASumComplex8(..) │ ──forward─> │ _FortranACppSumComplex8(&r,..)│
//! │  -> double _Complex      │ <─(r.r,r.i)─│  fills struct CppComplexDouble│
//! └──────────────────────────┘             └───────────────────────────────┘
//! ```
//!
//! Every symbol starts with the runtime prefix [`RTNAME_PREFIX`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod header;

pub use catalog::{
    entry_point, entry_points_for, EntryPoint, Precision, ReductionKind, ALL_ENTRY_POINTS,
    RTNAME_PREFIX,
};
pub use frt_target::LongDoubleFormat;
pub use header::Header;

use thiserror::Error;

/// Errors raised when querying the reduction ABI catalog.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Not a complex KIND number this runtime knows.
    #[error("unknown complex kind: {0} (expected 4, 8, 10 or 16)")]
    UnknownKind(u8),

    /// Not the name of a bridged reduction.
    #[error("unknown reduction: {0:?} (expected \"sum\" or \"product\")")]
    UnknownReduction(String),

    /// The precision exists, but not for the requested `long double` format.
    #[error("{precision} is not available when long double is {format}")]
    Unavailable {
        /// The requested precision.
        precision: Precision,
        /// The `long double` format in effect.
        format: LongDoubleFormat,
    },
}

/// Result type for catalog queries.
pub type AbiResult<T> = Result<T, AbiError>;
