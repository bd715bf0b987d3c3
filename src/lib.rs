//! # flexifile
//!
//! Convert files between formats, one domain at a time: documents,
//! presentations, spreadsheets, raster images, and vector graphics.
//!
//! ## Why this crate?
//!
//! Format conversion tooling is usually either a grab-bag of shell scripts
//! around ImageMagick/LibreOffice or a single monolithic "convert anything"
//! function with untestable branching. This crate instead splits the problem
//! into a **catalog** (which pairs are legal, the product surface), a
//! **registry** (which pairs have handlers, the implementation surface), and
//! small per-domain handlers that each do exactly one transformation. The
//! catalog is authoritative: an illegal pair is rejected before any handler
//! runs, and a legal-but-unimplemented pair fails with a distinct error.
//!
//! ## Pipeline Overview
//!
//! ```text
//! bytes + (domain, input, output)
//!  │
//!  ├─ 1. Catalog   validate the pair is legal for the domain
//!  ├─ 2. Registry  exact (domain, input, output) → handler lookup
//!  ├─ 3. Stage     write input into a per-request temp scope
//!  ├─ 4. Handler   per-domain conversion (image / lopdf / calamine / …)
//!  └─ 5. Package   one artifact as-is, many artifacts → one zip
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flexifile::{
//!     package, ConversionRequest, Converter, ConvertConfig, Format, FormatDomain,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = Converter::new(ConvertConfig::default())?;
//!     let bytes = std::fs::read("photo.png")?;
//!     let request = ConversionRequest::new(
//!         bytes,
//!         "photo.png",
//!         FormatDomain::RasterImage,
//!         Format::Png,
//!         Format::Jpeg,
//!     );
//!     let conversion = converter.convert(&request)?;
//!     let deliverable = package(&conversion, &request.stem())?;
//!     std::fs::write(&deliverable.filename, &deliverable.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `flexifile` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! flexifile = { version = "0.3", default-features = false }
//! ```
//!
//! ## Degraded conversions
//!
//! Presentation conversions are text-only by design: slide text is re-laid
//! onto blank pages or canvases, and the result carries an advisory string
//! ([`Conversion::advisory`]) that callers should surface to the user.
//! Document PDF rendering shells out to LibreOffice (`soffice`, overridable
//! via `FLEXIFILE_OFFICE_BIN`); hosts without it get
//! [`FlexifileError::EngineUnavailable`] rather than a silent fallback.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod catalog;
pub mod config;
pub mod convert;
pub mod domains;
pub mod error;
pub mod output;
pub mod package;
pub mod registry;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use catalog::{domains, Format, FormatDomain};
pub use config::{ConvertConfig, ConvertConfigBuilder, OFFICE_BIN_ENV};
pub use convert::Converter;
pub use error::FlexifileError;
pub use output::{Artifact, Conversion, ConversionRequest, ConversionStats, Outcome};
pub use package::{data_uri, package, Deliverable};
pub use registry::{ConversionKey, Handler, Registry, Staged};
