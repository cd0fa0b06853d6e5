//! Target specifications and floating-point ABI facts for FRT.
//!
//! This crate describes the target machine a runtime build is compiled
//! for: architecture, vendor, operating system and ABI, parsed from a
//! standard target triple. On top of that it answers the one question the
//! runtime's complex-number bridge cannot answer for itself: how wide is the
//! C `long double` on this target?
//!
//! # Target Triple Format
//!
//! Targets are specified using the standard triple format:
//! `<arch>-<vendor>-<os>-<abi>`
//!
//! For example:
//! - `x86_64-unknown-linux-gnu`
//! - `aarch64-apple-darwin`
//! - `riscv64gc-unknown-linux-gnu`
//!
//! Android triples leave the vendor out (`aarch64-linux-android`); they parse
//! with an unknown vendor and the [`Abi::Android`] environment.
//!
//! Build scripts should prefer [`TargetSpec::from_cfg`], which takes the
//! `CARGO_CFG_TARGET_*` values Cargo already split out of the triple.
//!
//! # Long Double Formats
//!
//! | Format | `LDBL_MANT_DIG` | Typical targets |
//! |--------|-----------------|-----------------|
//! | [`LongDoubleFormat::Double64`] | 53 | MSVC, Apple Silicon, 32-bit ARM, GPUs |
//! | [`LongDoubleFormat::X87Extended80`] | 64 | x86 and x86-64 (non-MSVC, non-Android) |
//! | [`LongDoubleFormat::Binary128`] | 113 | aarch64 Linux, x86-64 Android, RISC-V, s390x, wasm |
//!
//! Only the latter two provide an extended complex precision
//! (`COMPLEX(10)` and `COMPLEX(16)` respectively).

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target architecture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Arch {
    /// 32-bit x86.
    X86,
    /// x86-64 (AMD64).
    X86_64,
    /// 32-bit ARM.
    Arm,
    /// 64-bit ARM.
    Aarch64,
    /// 32-bit WebAssembly.
    Wasm32,
    /// 64-bit WebAssembly.
    Wasm64,
    /// 32-bit RISC-V.
    Riscv32,
    /// 64-bit RISC-V.
    Riscv64,
    /// IBM Z.
    S390x,
    /// NVIDIA PTX (64-bit).
    Nvptx64,
    /// AMD GCN/RDNA.
    Amdgcn,
}

impl Arch {
    /// Get the name of this architecture.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X86 => "i686",
            Self::X86_64 => "x86_64",
            Self::Arm => "arm",
            Self::Aarch64 => "aarch64",
            Self::Wasm32 => "wasm32",
            Self::Wasm64 => "wasm64",
            Self::Riscv32 => "riscv32",
            Self::Riscv64 => "riscv64",
            Self::S390x => "s390x",
            Self::Nvptx64 => "nvptx64",
            Self::Amdgcn => "amdgcn",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Target operating system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Os {
    /// Linux.
    Linux,
    /// macOS (Darwin).
    MacOs,
    /// iOS.
    Ios,
    /// Windows.
    Windows,
    /// FreeBSD.
    FreeBsd,
    /// WASI (WebAssembly System Interface).
    Wasi,
    /// CUDA driver environment.
    Cuda,
    /// AMD HSA environment.
    AmdHsa,
    /// Bare metal (no OS).
    None,
}

impl Os {
    /// Get the name of this OS.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "darwin",
            Self::Ios => "ios",
            Self::Windows => "windows",
            Self::FreeBsd => "freebsd",
            Self::Wasi => "wasi",
            Self::Cuda => "cuda",
            Self::AmdHsa => "amdhsa",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Target vendor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Vendor {
    /// Unknown vendor.
    Unknown,
    /// Apple.
    Apple,
    /// PC (generic).
    Pc,
    /// NVIDIA.
    Nvidia,
    /// AMD.
    Amd,
}

impl Vendor {
    /// Get the name of this vendor.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Apple => "apple",
            Self::Pc => "pc",
            Self::Nvidia => "nvidia",
            Self::Amd => "amd",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Target ABI (Application Binary Interface).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Abi {
    /// GNU ABI.
    Gnu,
    /// musl libc.
    Musl,
    /// MSVC.
    Msvc,
    /// Android (Bionic).
    Android,
    /// No specific ABI.
    None,
}

impl Abi {
    /// Get the name of this ABI.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gnu => "gnu",
            Self::Musl => "musl",
            Self::Msvc => "msvc",
            Self::Android => "android",
            Self::None => "",
        }
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Representation of the C `long double` type on a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LongDoubleFormat {
    /// `long double` is the same type as `double`.
    Double64,
    /// x87 80-bit extended precision.
    X87Extended80,
    /// IEEE 754 binary128 (quad precision).
    Binary128,
}

impl LongDoubleFormat {
    /// The width in bits used to name the format (64, 80 or 128).
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Double64 => 64,
            Self::X87Extended80 => 80,
            Self::Binary128 => 128,
        }
    }

    /// Build a format from its width in bits.
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::UnsupportedLongDouble`] for any width other
    /// than 64, 80 or 128.
    pub fn from_bits(bits: u32) -> Result<Self, TargetError> {
        match bits {
            64 => Ok(Self::Double64),
            80 => Ok(Self::X87Extended80),
            128 => Ok(Self::Binary128),
            other => Err(TargetError::UnsupportedLongDouble(other.to_string())),
        }
    }

    /// Number of significand digits, as C's `LDBL_MANT_DIG`.
    #[must_use]
    pub const fn mantissa_digits(self) -> u32 {
        match self {
            Self::Double64 => 53,
            Self::X87Extended80 => 64,
            Self::Binary128 => 113,
        }
    }

    /// Whether this format is wider than `double`.
    #[must_use]
    pub const fn is_extended(self) -> bool {
        !matches!(self, Self::Double64)
    }

    /// Size in bytes of one `long double` in memory on `arch`.
    #[must_use]
    pub const fn storage_bytes(self, arch: Arch) -> u32 {
        match (self, arch) {
            (Self::Double64, _) => 8,
            (Self::X87Extended80, Arch::X86) => 12,
            (Self::X87Extended80 | Self::Binary128, _) => 16,
        }
    }

    /// Alignment in bytes of one `long double` on `arch`.
    #[must_use]
    pub const fn alignment(self, arch: Arch) -> u32 {
        match (self, arch) {
            (Self::Double64, Arch::X86) => 4,
            (Self::Double64, _) => 8,
            (Self::X87Extended80, Arch::X86) => 4,
            (Self::Binary128, Arch::S390x) => 8,
            (Self::X87Extended80 | Self::Binary128, _) => 16,
        }
    }

    /// Whether an extended value on `arch` occupies a 16-byte slot with
    /// 16-byte alignment, the layout of the runtime's extended scalars.
    #[must_use]
    pub const fn has_padded_storage(self, arch: Arch) -> bool {
        self.is_extended() && self.storage_bytes(arch) == 16 && self.alignment(arch) == 16
    }

    /// The format whose complex entry points are built on `arch`.
    ///
    /// An extended format without padded storage falls back to
    /// [`LongDoubleFormat::Double64`]: only `COMPLEX(4)` and `COMPLEX(8)`.
    #[must_use]
    pub const fn bridged(self, arch: Arch) -> Self {
        if self.is_extended() && !self.has_padded_storage(arch) {
            Self::Double64
        } else {
            self
        }
    }
}

impl fmt::Display for LongDoubleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Double64 => write!(f, "double (64-bit)"),
            Self::X87Extended80 => write!(f, "x87 extended (80-bit)"),
            Self::Binary128 => write!(f, "binary128 (128-bit)"),
        }
    }
}

impl FromStr for LongDoubleFormat {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .trim()
            .parse::<u32>()
            .map_err(|_| TargetError::UnsupportedLongDouble(s.to_string()))?;
        Self::from_bits(bits)
    }
}

/// A complete target specification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Target architecture.
    pub arch: Arch,
    /// Target vendor.
    pub vendor: Vendor,
    /// Target operating system.
    pub os: Os,
    /// Target ABI.
    pub abi: Abi,
}

impl TargetSpec {
    /// Get the target triple string.
    #[must_use]
    pub fn triple(&self) -> String {
        if self.abi == Abi::None {
            format!("{}-{}-{}", self.arch, self.vendor, self.os)
        } else {
            format!("{}-{}-{}-{}", self.arch, self.vendor, self.os, self.abi)
        }
    }

    /// Build a target from the values Cargo gives a build script in
    /// `CARGO_CFG_TARGET_ARCH`, `_VENDOR`, `_OS` and `_ENV`.
    ///
    /// Rust spells Android as `target_os = "android"`; it maps to
    /// [`Os::Linux`] with [`Abi::Android`], as in the LLVM triple.
    /// Vendors this crate does not model become [`Vendor::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns an error for an architecture, OS or environment this crate
    /// does not know.
    pub fn from_cfg(arch: &str, vendor: &str, os: &str, env: &str) -> Result<Self, TargetError> {
        let arch = parse_arch(arch)?;
        let vendor = parse_vendor(vendor).unwrap_or(Vendor::Unknown);
        let (os, abi) = match os {
            "android" => (Os::Linux, Abi::Android),
            other => (parse_os(other)?, parse_abi(env)?),
        };
        Ok(Self {
            arch,
            vendor,
            os,
            abi,
        })
    }

    /// The representation of C `long double` on this target.
    ///
    /// Mirrors what clang picks for each target: MSVC and Apple's arm64
    /// ABI collapse `long double` onto `double`, x86 keeps the x87 format
    /// except on Android, and the remaining 64-bit RISC-style targets use
    /// binary128.
    #[must_use]
    pub const fn long_double(&self) -> LongDoubleFormat {
        match self.arch {
            Arch::X86 => match self.abi {
                Abi::Msvc | Abi::Android => LongDoubleFormat::Double64,
                _ => LongDoubleFormat::X87Extended80,
            },
            Arch::X86_64 => match self.abi {
                Abi::Msvc => LongDoubleFormat::Double64,
                Abi::Android => LongDoubleFormat::Binary128,
                _ => LongDoubleFormat::X87Extended80,
            },
            Arch::Aarch64 => match (self.os, self.vendor) {
                (Os::MacOs | Os::Ios | Os::Windows, _) | (_, Vendor::Apple) => {
                    LongDoubleFormat::Double64
                }
                _ => LongDoubleFormat::Binary128,
            },
            Arch::Riscv32 | Arch::Riscv64 | Arch::S390x | Arch::Wasm32 | Arch::Wasm64 => {
                LongDoubleFormat::Binary128
            }
            Arch::Arm | Arch::Nvptx64 | Arch::Amdgcn => LongDoubleFormat::Double64,
        }
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.triple())
    }
}

impl FromStr for TargetSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_triple(s)
    }
}

/// Errors that can occur when parsing target specifications.
#[derive(Debug, Error)]
pub enum TargetError {
    /// Unknown architecture.
    #[error("unknown architecture: {0}")]
    UnknownArch(String),
    /// Unknown operating system.
    #[error("unknown operating system: {0}")]
    UnknownOs(String),
    /// Unknown vendor.
    #[error("unknown vendor: {0}")]
    UnknownVendor(String),
    /// Unknown ABI.
    #[error("unknown ABI: {0}")]
    UnknownAbi(String),
    /// Invalid target triple format.
    #[error("invalid target triple: {0}")]
    InvalidTriple(String),
    /// A `long double` width other than 64, 80 or 128.
    #[error("unsupported long double width: {0} (expected 64, 80 or 128)")]
    UnsupportedLongDouble(String),
}

/// Parse an architecture from a string.
fn parse_arch(s: &str) -> Result<Arch, TargetError> {
    match s {
        "i386" | "i486" | "i586" | "i686" | "x86" => Ok(Arch::X86),
        "x86_64" | "amd64" => Ok(Arch::X86_64),
        "aarch64" | "arm64" => Ok(Arch::Aarch64),
        "arm" | "thumbv7neon" => Ok(Arch::Arm),
        "s390x" => Ok(Arch::S390x),
        "wasm32" => Ok(Arch::Wasm32),
        "wasm64" => Ok(Arch::Wasm64),
        "nvptx64" | "nvptx" => Ok(Arch::Nvptx64),
        "amdgcn" | "amdgpu" | "gcn" => Ok(Arch::Amdgcn),
        // RISC-V triples carry their ISA extensions: riscv64gc, riscv32imac...
        _ if s.starts_with("riscv64") => Ok(Arch::Riscv64),
        _ if s.starts_with("riscv32") => Ok(Arch::Riscv32),
        _ if s.starts_with("armv") => Ok(Arch::Arm),
        _ => Err(TargetError::UnknownArch(s.to_string())),
    }
}

/// Parse an OS from a string.
fn parse_os(s: &str) -> Result<Os, TargetError> {
    match s {
        "linux" => Ok(Os::Linux),
        "darwin" | "macos" => Ok(Os::MacOs),
        "ios" => Ok(Os::Ios),
        "windows" | "win32" => Ok(Os::Windows),
        "freebsd" => Ok(Os::FreeBsd),
        "wasi" | "wasip1" | "wasip2" => Ok(Os::Wasi),
        "cuda" => Ok(Os::Cuda),
        "amdhsa" => Ok(Os::AmdHsa),
        "none" => Ok(Os::None),
        _ => Err(TargetError::UnknownOs(s.to_string())),
    }
}

/// Parse a vendor from a string.
fn parse_vendor(s: &str) -> Result<Vendor, TargetError> {
    match s {
        "unknown" => Ok(Vendor::Unknown),
        "apple" => Ok(Vendor::Apple),
        "pc" => Ok(Vendor::Pc),
        "nvidia" => Ok(Vendor::Nvidia),
        "amd" => Ok(Vendor::Amd),
        _ => Err(TargetError::UnknownVendor(s.to_string())),
    }
}

/// Parse an ABI from a string.
fn parse_abi(s: &str) -> Result<Abi, TargetError> {
    match s {
        "gnu" | "gnueabihf" | "gnullvm" => Ok(Abi::Gnu),
        "musl" => Ok(Abi::Musl),
        "msvc" => Ok(Abi::Msvc),
        "android" | "androideabi" => Ok(Abi::Android),
        "" => Ok(Abi::None),
        _ => Err(TargetError::UnknownAbi(s.to_string())),
    }
}

/// Parse a target triple string into a target specification.
///
/// # Errors
///
/// Returns an error if the triple format is invalid or contains unknown components.
pub fn parse_triple(triple: &str) -> Result<TargetSpec, TargetError> {
    let parts: Vec<&str> = triple.split('-').collect();

    if parts.len() < 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(TargetError::InvalidTriple(triple.to_string()));
    }

    let arch = parse_arch(parts[0])?;

    // <arch>-<os>-<abi>, as in aarch64-linux-android.
    if parts.len() == 3 && parse_vendor(parts[1]).is_err() && parse_os(parts[1]).is_ok() {
        return Ok(TargetSpec {
            arch,
            vendor: Vendor::Unknown,
            os: parse_os(parts[1])?,
            abi: parse_abi(parts[2])?,
        });
    }

    let vendor = parse_vendor(parts[1])?;
    let os = parse_os(parts[2])?;
    let abi = if parts.len() > 3 {
        parse_abi(parts[3])?
    } else {
        Abi::None
    };

    Ok(TargetSpec {
        arch,
        vendor,
        os,
        abi,
    })
}

/// Get the target specification for the host machine.
#[must_use]
pub fn host_target() -> TargetSpec {
    #[cfg(target_arch = "x86")]
    let arch = Arch::X86;
    #[cfg(target_arch = "x86_64")]
    let arch = Arch::X86_64;
    #[cfg(target_arch = "arm")]
    let arch = Arch::Arm;
    #[cfg(target_arch = "aarch64")]
    let arch = Arch::Aarch64;
    #[cfg(target_arch = "riscv64")]
    let arch = Arch::Riscv64;
    #[cfg(target_arch = "s390x")]
    let arch = Arch::S390x;
    #[cfg(target_arch = "wasm32")]
    let arch = Arch::Wasm32;
    #[cfg(not(any(
        target_arch = "x86",
        target_arch = "x86_64",
        target_arch = "arm",
        target_arch = "aarch64",
        target_arch = "riscv64",
        target_arch = "s390x",
        target_arch = "wasm32"
    )))]
    let arch = Arch::X86_64; // Fallback

    #[cfg(any(target_os = "linux", target_os = "android"))]
    let os = Os::Linux;
    #[cfg(target_os = "macos")]
    let os = Os::MacOs;
    #[cfg(target_os = "ios")]
    let os = Os::Ios;
    #[cfg(target_os = "windows")]
    let os = Os::Windows;
    #[cfg(target_os = "freebsd")]
    let os = Os::FreeBsd;
    #[cfg(target_os = "wasi")]
    let os = Os::Wasi;
    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "windows",
        target_os = "freebsd",
        target_os = "wasi"
    )))]
    let os = Os::None;

    #[cfg(target_vendor = "apple")]
    let vendor = Vendor::Apple;
    #[cfg(target_vendor = "pc")]
    let vendor = Vendor::Pc;
    #[cfg(not(any(target_vendor = "apple", target_vendor = "pc")))]
    let vendor = Vendor::Unknown;

    #[cfg(target_env = "gnu")]
    let abi = Abi::Gnu;
    #[cfg(target_env = "musl")]
    let abi = Abi::Musl;
    #[cfg(target_env = "msvc")]
    let abi = Abi::Msvc;
    #[cfg(target_os = "android")]
    let abi = Abi::Android;
    #[cfg(not(any(
        target_env = "gnu",
        target_env = "musl",
        target_env = "msvc",
        target_os = "android"
    )))]
    let abi = Abi::None;

    TargetSpec {
        arch,
        vendor,
        os,
        abi,
    }
}

/// Pre-defined target specifications.
pub mod targets {
    use super::{Abi, Arch, Os, TargetSpec, Vendor};

    /// x86_64 Linux GNU target.
    #[must_use]
    pub const fn x86_64_linux_gnu() -> TargetSpec {
        TargetSpec {
            arch: Arch::X86_64,
            vendor: Vendor::Unknown,
            os: Os::Linux,
            abi: Abi::Gnu,
        }
    }

    /// x86_64 Windows MSVC target.
    #[must_use]
    pub const fn x86_64_windows_msvc() -> TargetSpec {
        TargetSpec {
            arch: Arch::X86_64,
            vendor: Vendor::Pc,
            os: Os::Windows,
            abi: Abi::Msvc,
        }
    }

    /// aarch64 Linux GNU target.
    #[must_use]
    pub const fn aarch64_linux_gnu() -> TargetSpec {
        TargetSpec {
            arch: Arch::Aarch64,
            vendor: Vendor::Unknown,
            os: Os::Linux,
            abi: Abi::Gnu,
        }
    }

    /// aarch64 macOS (Apple Silicon) target.
    #[must_use]
    pub const fn aarch64_macos() -> TargetSpec {
        TargetSpec {
            arch: Arch::Aarch64,
            vendor: Vendor::Apple,
            os: Os::MacOs,
            abi: Abi::None,
        }
    }

    /// 64-bit RISC-V Linux GNU target.
    #[must_use]
    pub const fn riscv64_linux_gnu() -> TargetSpec {
        TargetSpec {
            arch: Arch::Riscv64,
            vendor: Vendor::Unknown,
            os: Os::Linux,
            abi: Abi::Gnu,
        }
    }
}
