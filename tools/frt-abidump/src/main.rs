//! frt-abidump: inspect the complex reduction ABI of the FRT runtime.
//!
//! Lists the bridged `SUM`/`PRODUCT` entry points for a target, renders the
//! C header that declares them, and reports how the target's `long double`
//! decides the extended precision.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use frt_abi::{entry_points_for, Header, LongDoubleFormat, Precision, ReductionKind};
use frt_target::{host_target, TargetSpec};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "frt-abidump")]
#[command(author, version, about = "Inspect the FRT complex reduction ABI", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Target triple (defaults to the host)
    #[arg(long, value_name = "TRIPLE")]
    target: Option<TargetSpec>,

    /// Override the target's long double width (64, 80 or 128)
    #[arg(long, value_name = "BITS")]
    long_double: Option<LongDoubleFormat>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for listings and reports
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the entry points bridged on the target
    Symbols {
        /// Only list one reduction (sum or product)
        #[arg(long)]
        kind: Option<ReductionKind>,
    },

    /// Render the C header declaring the entry points and their kernels
    Header {
        /// Write the header to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show how the target's long double selects the extended precision
    Report,
}

/// The target and `long double` format a command works on.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Selection {
    target: TargetSpec,
    long_double: LongDoubleFormat,
    overridden: bool,
}

impl Selection {
    fn new(target: Option<TargetSpec>, long_double: Option<LongDoubleFormat>) -> Self {
        let target = target.unwrap_or_else(host_target);
        let overridden = long_double.is_some();
        let long_double = long_double.unwrap_or_else(|| target.long_double());
        Self {
            target,
            long_double,
            overridden,
        }
    }

    /// The format whose entry points are actually built.
    fn bridged(&self) -> LongDoubleFormat {
        self.long_double.bridged(self.target.arch)
    }
}

/// One row of the symbol listing.
#[derive(Clone, Debug, Serialize)]
struct SymbolRow {
    kind: ReductionKind,
    precision: Precision,
    symbol: &'static str,
    kernel_symbol: &'static str,
    c_type: &'static str,
}

fn symbol_rows(selection: &Selection, kind: Option<ReductionKind>) -> Vec<SymbolRow> {
    entry_points_for(selection.bridged())
        .filter(|entry| kind.map_or(true, |kind| entry.kind == kind))
        .map(|entry| SymbolRow {
            kind: entry.kind,
            precision: entry.precision,
            symbol: entry.symbol,
            kernel_symbol: entry.kernel_symbol,
            c_type: entry.precision.c_type(),
        })
        .collect()
}

/// Capability report for one target.
#[derive(Clone, Debug, Serialize)]
struct Report {
    triple: String,
    host: bool,
    long_double: LongDoubleFormat,
    long_double_source: &'static str,
    long_double_bits: u32,
    mantissa_digits: u32,
    storage_bytes: u32,
    alignment: u32,
    bridged_long_double: LongDoubleFormat,
    precisions: Vec<Precision>,
    entry_points: usize,
}

fn build_report(selection: &Selection) -> Report {
    let format = selection.long_double;
    let arch = selection.target.arch;
    let bridged = selection.bridged();
    if bridged != format {
        tracing::warn!(
            "{format} has {} byte storage on {arch}; extended precision is not bridged",
            format.storage_bytes(arch)
        );
    }

    let precisions: Vec<Precision> = Precision::ALL
        .into_iter()
        .filter(|precision| precision.supported_on(bridged))
        .collect();

    Report {
        triple: selection.target.triple(),
        host: selection.target == host_target(),
        long_double: format,
        long_double_source: if selection.overridden {
            "override"
        } else {
            "target"
        },
        long_double_bits: format.bits(),
        mantissa_digits: format.mantissa_digits(),
        storage_bytes: format.storage_bytes(arch),
        alignment: format.alignment(arch),
        bridged_long_double: bridged,
        entry_points: entry_points_for(bridged).count(),
        precisions,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let selection = Selection::new(cli.target.clone(), cli.long_double);
    tracing::debug!(
        target_triple = %selection.target,
        long_double = %selection.long_double,
        "selected target"
    );

    match cli.command {
        Commands::Symbols { kind } => print_symbols(&selection, kind, cli.format),
        Commands::Header { ref output } => write_header(&selection, output.as_deref()),
        Commands::Report => print_report(&selection, cli.format),
    }
}

fn print_symbols(
    selection: &Selection,
    kind: Option<ReductionKind>,
    format: OutputFormat,
) -> Result<()> {
    let rows = symbol_rows(selection, kind);
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for row in &rows {
                writeln!(
                    out,
                    "{:<26} {:<29} {:<12} {}",
                    row.symbol,
                    row.kernel_symbol,
                    row.precision.to_string(),
                    row.c_type
                )?;
            }
        }
    }
    Ok(())
}

fn write_header(selection: &Selection, output: Option<&Path>) -> Result<()> {
    let header = Header::new(entry_points_for(selection.bridged())).to_string();
    match output {
        Some(path) => {
            fs::write(path, &header)
                .with_context(|| format!("failed to write header to {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => io::stdout().lock().write_all(header.as_bytes())?,
    }
    Ok(())
}

fn print_report(selection: &Selection, format: OutputFormat) -> Result<()> {
    let report = build_report(selection);
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let precisions: Vec<String> =
                report.precisions.iter().map(ToString::to_string).collect();
            let host = if report.host { " (host)" } else { "" };
            writeln!(out, "target:       {}{host}", report.triple)?;
            writeln!(
                out,
                "long double:  {} [{}]",
                report.long_double, report.long_double_source
            )?;
            writeln!(out, "  digits:     {}", report.mantissa_digits)?;
            writeln!(
                out,
                "  storage:    {} bytes, {}-byte aligned",
                report.storage_bytes, report.alignment
            )?;
            writeln!(out, "bridged:      {}", report.bridged_long_double)?;
            writeln!(out, "precisions:   {}", precisions.join(", "))?;
            writeln!(out, "entry points: {}", report.entry_points)?;
        }
    }
    Ok(())
}
