//! Error types for the flexifile library.
//!
//! Every failure a conversion can produce is classified into one
//! [`FlexifileError`] variant and returned as a typed `Err` from the
//! orchestrator — nothing is allowed to escape as a panic or crash the host.
//!
//! The taxonomy the caller cares about:
//!
//! * [`FlexifileError::InvalidFormatPair`] — the catalog says the requested
//!   pair is not legal for the domain. Checked before any handler lookup.
//! * [`FlexifileError::UnsupportedConversion`] — legal pair, but no handler
//!   is registered ("not yet implemented").
//! * [`FlexifileError::ConversionFailed`] — an underlying library or tool
//!   failed mid-conversion; the underlying message is preserved.
//! * [`FlexifileError::MalformedInput`] — the input file was rejected by a
//!   parser before any partial output was produced.
//! * [`FlexifileError::EngineUnavailable`] — the external office-rendering
//!   engine is missing. A legitimate deployment-time failure on headless
//!   servers, deliberately distinct from `UnsupportedConversion`.
//!
//! The caller (UI collaborator) renders these as user-visible messages; the
//! library only classifies and describes.

use crate::catalog::{Format, FormatDomain};
use thiserror::Error;

/// All errors returned by the flexifile library.
#[derive(Debug, Error)]
pub enum FlexifileError {
    // ── Request errors ────────────────────────────────────────────────────
    /// The catalog does not list `output` as reachable from `input` in this
    /// domain. Authoritative over the registry: raised before any handler
    /// resolution is attempted.
    #[error("{domain}: converting {input} to {output} is not a legal pair for this domain")]
    InvalidFormatPair {
        domain: FormatDomain,
        input: Format,
        output: Format,
    },

    /// The pair is legal per the catalog but no handler is registered.
    #[error("{domain}: {input} to {output} is not implemented yet")]
    UnsupportedConversion {
        domain: FormatDomain,
        input: Format,
        output: Format,
    },

    // ── Handler errors ────────────────────────────────────────────────────
    /// The input file was rejected by a parser before producing any output.
    #[error("Malformed {format} input: {detail}")]
    MalformedInput { format: Format, detail: String },

    /// An underlying library or tool failed during conversion.
    #[error("Conversion failed: {detail}")]
    ConversionFailed { detail: String },

    /// The external office-rendering engine could not be found or started.
    #[error(
        "Office rendering engine '{engine}' is unavailable: {detail}\n\
         Install LibreOffice or point FLEXIFILE_OFFICE_BIN at an existing soffice binary."
    )]
    EngineUnavailable { engine: String, detail: String },

    // ── Registry errors ───────────────────────────────────────────────────
    /// A second handler was registered for an already-claimed key.
    /// At most one handler may exist per (domain, input, output) triple.
    #[error("{domain}: a handler for {input} to {output} is already registered")]
    DuplicateHandler {
        domain: FormatDomain,
        input: Format,
        output: Format,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (temp staging, artifact IO).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlexifileError {
    /// True when the failure came from the conversion stage itself rather
    /// than request validation — useful for callers that want to distinguish
    /// "pick a different pair" from "this file / this host is the problem".
    pub fn is_handler_failure(&self) -> bool {
        matches!(
            self,
            FlexifileError::MalformedInput { .. }
                | FlexifileError::ConversionFailed { .. }
                | FlexifileError::EngineUnavailable { .. }
        )
    }
}
