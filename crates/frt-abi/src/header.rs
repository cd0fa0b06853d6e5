//! C header rendering.
//!
//! Produces the declarations a C caller needs to use the bridge, and the
//! prototypes a kernel implementation must provide.

use std::fmt;

use crate::catalog::{EntryPoint, Precision};

/// Include guard of the generated header.
pub const INCLUDE_GUARD: &str = "FRT_COMPLEX_REDUCTION_H_";

/// A renderable C header for a set of entry points.
#[derive(Clone, Debug)]
pub struct Header<'a> {
    entries: Vec<&'a EntryPoint>,
}

impl<'a> Header<'a> {
    /// Build a header declaring `entries`, in the order given.
    pub fn new(entries: impl IntoIterator<Item = &'a EntryPoint>) -> Self {
        let entries: Vec<_> = entries.into_iter().collect();
        tracing::debug!(entries = entries.len(), "rendering complex reduction header");
        Self { entries }
    }

    /// The declared entry points.
    #[must_use]
    pub fn entries(&self) -> &[&'a EntryPoint] {
        &self.entries
    }

    /// Aggregate structs needed by the declared entry points, deduplicated.
    fn aggregates(&self) -> Vec<Precision> {
        let mut precisions: Vec<Precision> = self.entries.iter().map(|e| e.precision).collect();
        precisions.sort();
        precisions.dedup_by_key(|p| p.aggregate_name());
        precisions
    }
}

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/* Generated by frt-abidump. Do not edit. */")?;
        writeln!(f, "#ifndef {INCLUDE_GUARD}")?;
        writeln!(f, "#define {INCLUDE_GUARD}")?;
        writeln!(f)?;
        writeln!(f, "#include <complex.h>")?;
        writeln!(f)?;
        writeln!(f, "#ifdef __cplusplus")?;
        writeln!(f, "extern \"C\" {{")?;
        writeln!(f, "#endif")?;
        writeln!(f)?;
        writeln!(f, "struct CppDescriptor; /* opaque array descriptor */")?;
        writeln!(f)?;
        for precision in self.aggregates() {
            writeln!(
                f,
                "struct {} {{\n  {} r, i;\n}};",
                precision.aggregate_name(),
                precision.component_c_type()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "#define REDUCTION_ARGS \\")?;
        writeln!(
            f,
            "  const struct CppDescriptor *x, const char *source, int line, \\"
        )?;
        writeln!(
            f,
            "      int dim /*=0*/, const struct CppDescriptor *mask /*=NULL*/"
        )?;
        writeln!(f, "#define REDUCTION_ARG_NAMES x, source, line, dim, mask")?;

        for entry in &self.entries {
            let precision = entry.precision;
            writeln!(f)?;
            writeln!(f, "/* {} */", entry)?;
            writeln!(
                f,
                "void {}(struct {} *, REDUCTION_ARGS);",
                entry.kernel_symbol,
                precision.aggregate_name()
            )?;
            writeln!(f, "{} {}(REDUCTION_ARGS);", precision.c_type(), entry.symbol)?;
        }

        writeln!(f)?;
        writeln!(f, "#ifdef __cplusplus")?;
        writeln!(f, "}}")?;
        writeln!(f, "#endif")?;
        writeln!(f)?;
        writeln!(f, "#endif /* {INCLUDE_GUARD} */")
    }
}
