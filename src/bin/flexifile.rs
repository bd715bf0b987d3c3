//! CLI binary for flexifile.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `ConversionRequest`, runs it, and writes the packaged deliverable.

use anyhow::{bail, Context, Result};
use clap::Parser;
use flexifile::{
    domains, package, ConversionRequest, ConvertConfig, Converter, Format, FormatDomain,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Raster transcode (formats inferred from extensions)
  flexifile photo.png --to jpg

  # Word document to PDF (requires LibreOffice)
  flexifile report.docx --to pdf -o report.pdf

  # Slide deck to per-slide images (one zip out)
  flexifile deck.pptx --to png

  # Spreadsheet, explicit domain and input format
  flexifile data.txt --domain spreadsheet --from csv --to xlsx

  # Machine-readable report
  flexifile --json chart.svg --to pdf

  # What can be converted to what?
  flexifile --list-formats

ENVIRONMENT VARIABLES:
  FLEXIFILE_OFFICE_BIN   Path to the soffice binary used for Word → PDF
                         (default: `soffice` resolved via PATH)
  RUST_LOG               Tracing filter, e.g. RUST_LOG=flexifile=debug

NOTES:
  Presentation conversions are text-only: slide text is re-laid onto blank
  pages or canvases and the result carries an advisory, printed to stderr.
"#;

/// Convert files between formats: documents, presentations, spreadsheets,
/// raster images, and vector graphics.
#[derive(Parser, Debug)]
#[command(
    name = "flexifile",
    version,
    about = "Convert files between formats, one domain at a time",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file to convert.
    #[arg(required_unless_present = "list_formats")]
    input: Option<PathBuf>,

    /// Target format token: pdf, docx, png, jpg, csv, xlsx, svg, …
    #[arg(short = 't', long = "to", required_unless_present = "list_formats")]
    to: Option<String>,

    /// Input format token. Default: inferred from the input file extension.
    #[arg(short = 'f', long = "from")]
    from: Option<String>,

    /// Format domain: document, presentation, spreadsheet, raster, vector.
    /// Default: inferred when the (input, output) pair is legal in exactly
    /// one domain.
    #[arg(short = 'd', long)]
    domain: Option<String>,

    /// Write the deliverable to this path instead of the suggested filename.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Office engine invocation timeout, seconds.
    #[arg(long, default_value_t = 60)]
    office_timeout: u64,

    /// Print the deliverable as a data: URI on stdout; the file is only
    /// written when -o is also given.
    #[arg(long)]
    data_uri: bool,

    /// Print a JSON report to stdout instead of human-readable output.
    #[arg(long)]
    json: bool,

    /// List every domain with its legal conversion pairs, then exit.
    #[arg(long)]
    list_formats: bool,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── List mode ────────────────────────────────────────────────────────
    if cli.list_formats {
        print_format_listing(cli.json)?;
        return Ok(());
    }

    // clap guarantees these are present outside --list-formats
    let input_path = cli.input.clone().expect("input required by clap");
    let to_token = cli.to.clone().expect("--to required by clap");

    // ── Resolve the (domain, input, output) triple ───────────────────────
    let output_format = parse_format(&to_token)?;
    let input_format = match &cli.from {
        Some(token) => parse_format(token)?,
        None => infer_input_format(&input_path)?,
    };
    let domain = match &cli.domain {
        Some(token) => FormatDomain::parse_token(token)
            .with_context(|| format!("Unknown domain '{token}'"))?,
        None => infer_domain(input_format, output_format)?,
    };

    // ── Build request ────────────────────────────────────────────────────
    let bytes = std::fs::read(&input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;
    let filename = input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    let request = ConversionRequest::new(bytes, filename, domain, input_format, output_format);

    let config = ConvertConfig::builder()
        .office_timeout_secs(cli.office_timeout)
        .build()
        .context("Invalid configuration")?;
    let converter = Converter::new(config).context("Failed to initialise converter")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let spinner = if !cli.quiet && !cli.no_progress && !cli.json {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("{domain}: {input_format} → {output_format}"));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = converter.convert(&request);
    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }
    let conversion = result.context("Conversion failed")?;
    let deliverable = package(&conversion, &request.stem()).context("Packaging failed")?;

    // ── Write deliverable ────────────────────────────────────────────────
    let out_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&deliverable.filename));
    if cli.data_uri {
        // The original download mechanism: everything as octet-stream.
        println!(
            "{}",
            flexifile::data_uri(&deliverable.bytes, "application/octet-stream")
        );
    }
    let wrote_file = !cli.data_uri || cli.output.is_some();
    if wrote_file {
        std::fs::write(&out_path, &deliverable.bytes)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
    }

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        let report = serde_json::json!({
            "output": wrote_file.then(|| out_path.clone()),
            "artifact_count": deliverable.artifact_count,
            "advisory": deliverable.advisory,
            "stats": conversion.stats,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        if wrote_file {
            eprintln!(
                "{} {} {} ({} bytes, {}ms)",
                green("✔"),
                bold(&out_path.display().to_string()),
                if deliverable.artifact_count > 1 {
                    format!("[{} artifacts]", deliverable.artifact_count)
                } else {
                    String::new()
                },
                conversion.stats.output_bytes,
                conversion.stats.duration_ms,
            );
        }
        if let Some(advisory) = &deliverable.advisory {
            eprintln!("{} {}", yellow("⚠"), advisory);
        }
    }

    Ok(())
}

/// Parse a user-supplied format token with a CLI-friendly error.
fn parse_format(token: &str) -> Result<Format> {
    Format::parse_token(token).with_context(|| format!("Unknown format '{token}'"))
}

/// Infer the input format from the file extension.
fn infer_input_format(path: &std::path::Path) -> Result<Format> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    Format::parse_token(&ext).with_context(|| {
        format!(
            "Cannot infer the input format of {} — pass --from explicitly",
            path.display()
        )
    })
}

/// Infer the domain when exactly one domain calls the pair legal.
fn infer_domain(input: Format, output: Format) -> Result<FormatDomain> {
    let candidates: Vec<FormatDomain> = domains()
        .iter()
        .copied()
        .filter(|d| d.allows(input, output))
        .collect();
    match candidates.as_slice() {
        [one] => Ok(*one),
        [] => bail!("No domain can convert {input} to {output} (see --list-formats)"),
        many => bail!(
            "{input} to {output} is legal in more than one domain ({}) — pass --domain",
            many.iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Print the full catalog: every domain with its legal conversion pairs.
fn print_format_listing(json: bool) -> Result<()> {
    if json {
        let listing: Vec<serde_json::Value> = domains()
            .iter()
            .map(|d| {
                let pairs: Vec<serde_json::Value> = d
                    .input_formats()
                    .map(|input| {
                        serde_json::json!({
                            "input": input.to_string(),
                            "outputs": d
                                .outputs_for(input)
                                .iter()
                                .map(|o| o.to_string())
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                serde_json::json!({ "domain": d.to_string(), "pairs": pairs })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for domain in domains() {
        println!("{}", bold(&domain.to_string()));
        for input in domain.input_formats() {
            let outputs = domain
                .outputs_for(input)
                .iter()
                .map(|o| o.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {} {} {}", input, dim("→"), outputs);
        }
        println!();
    }
    Ok(())
}
