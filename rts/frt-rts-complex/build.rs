//! Decides which extended complex precision this build exports.
//!
//! The C `long double` of the target selects `COMPLEX(10)` (x87 80-bit) or
//! `COMPLEX(16)` (binary128). `FRT_LONG_DOUBLE=64|80|128` overrides the
//! detected format; an override must still match what the C compiler
//! thinks `long double` is, or `native/reduction.h` refuses to compile.
//!
//! The `long double _Complex` entry points are compiled from
//! `native/extended.c`. `native/c_caller.c` becomes `libfrt_c_caller.a`,
//! which only the C ABI tests link.

use std::env;
use std::path::PathBuf;

use frt_target::{LongDoubleFormat, TargetSpec};

const OVERRIDE_VAR: &str = "FRT_LONG_DOUBLE";

fn cfg(name: &str) -> String {
    env::var(format!("CARGO_CFG_TARGET_{name}")).unwrap_or_default()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=native");
    println!("cargo:rerun-if-env-changed={OVERRIDE_VAR}");
    println!("cargo:rustc-check-cfg=cfg(frt_long_double, values(\"80\", \"128\"))");

    let target = TargetSpec::from_cfg(&cfg("ARCH"), &cfg("VENDOR"), &cfg("OS"), &cfg("ENV"));

    let format = match env::var(OVERRIDE_VAR) {
        Ok(value) => value
            .parse::<LongDoubleFormat>()
            .unwrap_or_else(|e| panic!("invalid {OVERRIDE_VAR}={value:?}: {e}")),
        Err(_) => match &target {
            Ok(target) => target.long_double(),
            Err(e) => {
                println!(
                    "cargo:warning=cannot determine long double for {}: {e}; \
                     building without extended complex precision",
                    env::var("TARGET").unwrap_or_default()
                );
                LongDoubleFormat::Double64
            }
        },
    };

    println!("cargo:rustc-env=FRT_LONG_DOUBLE_BITS={}", format.bits());

    let bridged = match &target {
        Ok(target) => format.bridged(target.arch),
        Err(_) => format,
    };
    if let (Ok(target), true) = (&target, bridged != format) {
        // 32-bit x86 packs long double into 12 bytes.
        println!(
            "cargo:warning=extended complex precision is not bridged on {target}: \
             {} byte long double storage is unsupported",
            format.storage_bytes(target.arch)
        );
    }

    let bits = bridged.bits().to_string();
    if bridged.is_extended() {
        println!("cargo:rustc-cfg=frt_long_double=\"{bits}\"");
        let mut build = cc::Build::new();
        build
            .file("native/extended.c")
            .include("native")
            .define("FRT_LONG_DOUBLE", bits.as_str())
            .flag_if_supported("-fexceptions");
        if env::var_os("CARGO_FEATURE_TYPE_PUNNING").is_some() {
            build.define("FRT_TYPE_PUNNING", None);
        }
        build.compile("frt_complex_native");
    }

    // MSVC's C compiler has no `_Complex`.
    if cfg("ENV") != "msvc" {
        cc::Build::new()
            .file("native/c_caller.c")
            .include("native")
            .define("FRT_LONG_DOUBLE", bits.as_str())
            .cargo_metadata(false)
            .compile("frt_c_caller");
        let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap_or_default());
        println!("cargo:rustc-link-search=native={}", out_dir.display());
    }
}
