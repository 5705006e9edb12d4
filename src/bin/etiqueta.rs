//! CLI binary for etiqueta.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GenerateConfig` and prints run summaries.

use anyhow::{Context, Result};
use clap::Parser;
use etiqueta::{generate, inspect, GenerateConfig, SheetSelection};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate labels with the default output name
  etiqueta reversa.xlsx

  # Choose the output file (parent directories are created)
  etiqueta reversa.xlsx -o etiquetas/marco.pdf

  # CSV manifest
  etiqueta reversa.csv -o etiquetas.pdf

  # Pick a worksheet by name or by 1-based position
  etiqueta reversa.xlsx --sheet "RETORNO MARCO"
  etiqueta reversa.xlsx --sheet 2

  # Preview what will print; no PDF is written
  etiqueta --inspect-only reversa.xlsx

  # Machine-readable run summary on stdout
  etiqueta --json reversa.xlsx > summary.json

REQUIRED COLUMNS (case-sensitive; extra columns are ignored):
  CAIXA  NOME  DATA  CD  CIDADE  COD._ITEM  DESCRICAO  N._Nfe  LOTE  SERIAL

LABEL LAYOUT (US Letter, one page per box):
  11-row table   CLARO header, shipment metadata, QUANTIDADE = rows in the box
  QR code        every SERIAL of the box, one per line, in manifest order

ENVIRONMENT VARIABLES:
  ETIQUETA_OUTPUT   Default output path (same as -o)
  ETIQUETA_SHEET    Default worksheet (same as --sheet)
  RUST_LOG          Tracing filter, e.g. RUST_LOG=etiqueta=debug
"#;

/// Generate printable return labels from a reverse-logistics manifest.
#[derive(Parser, Debug)]
#[command(
    name = "etiqueta",
    version,
    about = "Generate printable return labels (PDF + QR) from a reverse-logistics manifest",
    long_about = "Read a reverse-logistics manifest (XLSX/CSV, one row per serialized unit) and \
produce a printable PDF: one US-Letter page per box, each with an 11-row summary table and a \
QR code holding every serial packed in that box.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Manifest file (.xlsx, .xls, .xlsb, .ods or .csv).
    input: PathBuf,

    /// Write the PDF to this path.
    #[arg(
        short,
        long,
        env = "ETIQUETA_OUTPUT",
        default_value = "etiquetas_saida.pdf"
    )]
    output: PathBuf,

    /// Worksheet to read: a name or a 1-based position.
    #[arg(
        long,
        env = "ETIQUETA_SHEET",
        long_help = "Worksheet holding the manifest. A positive integer selects by 1-based \
position, anything else matches the sheet name exactly. Defaults to the first sheet. \
Ignored for CSV input."
    )]
    sheet: Option<String>,

    /// Print what would be generated (boxes, counts, dates), no PDF.
    #[arg(long)]
    inspect_only: bool,

    /// Output the run summary as JSON on stdout.
    #[arg(long, env = "ETIQUETA_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ETIQUETA_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "ETIQUETA_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The CLI prints its own per-box summary, so INFO-level library logs
    // would only duplicate it. WARN still surfaces fallback dates.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut config = GenerateConfig::new();
    if let Some(ref sheet) = cli.sheet {
        config = config.with_sheet(SheetSelection::parse(sheet));
    }

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let summary = inspect(&cli.input, &config)
            .with_context(|| format!("Failed to inspect '{}'", cli.input.display()))?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
            );
        } else {
            println!("Arquivo:  {}", cli.input.display());
            println!("Linhas:   {}", summary.rows);
            println!("Caixas:   {}", summary.box_count());
            for b in &summary.boxes {
                println!(
                    "  {:<24} {:>5} un.  {}{}",
                    b.caixa,
                    b.quantity,
                    b.data,
                    if b.date_fallback { "  (data original)" } else { "" },
                );
            }
        }
        return Ok(());
    }

    // ── Run generation ───────────────────────────────────────────────────
    let summary = generate(&cli.input, &cli.output, &config)
        .with_context(|| format!("Failed to generate labels from '{}'", cli.input.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
        return Ok(());
    }

    if !cli.quiet {
        for b in &summary.manifest.boxes {
            eprintln!(
                "  {} {:<24} {:>5} un.  {}{}",
                green("✓"),
                b.caixa,
                b.quantity,
                b.data,
                if b.date_fallback {
                    dim("  (data original)")
                } else {
                    String::new()
                },
            );
        }
        let fallbacks = summary.manifest.fallback_count();
        if fallbacks > 0 {
            eprintln!(
                "  {} {fallbacks} caixa(s) com DATA sem formato reconhecido, impressa como está",
                cyan("⚠"),
            );
        }

        println!(
            "{}",
            green(&format!(
                "PDF gerado com sucesso: {}",
                summary.output.display()
            ))
        );
        eprintln!(
            "   {}",
            dim(&format!(
                "{} páginas / {} unidades / {} bytes em {}ms",
                summary.pages, summary.manifest.rows, summary.bytes, summary.elapsed_ms
            )),
        );
    }

    Ok(())
}
