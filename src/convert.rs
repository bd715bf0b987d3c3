//! The conversion orchestrator.
//!
//! ## Why one entry point?
//!
//! Every conversion, regardless of domain, runs the same five steps:
//! validate against the catalog, resolve a handler, stage the input on disk,
//! invoke the handler, collect stats. Centralising those steps here keeps the
//! per-domain handlers free of policy — a handler never decides whether a
//! pair is legal, never creates its own temp scope, and never times itself.

use crate::config::ConvertConfig;
use crate::error::FlexifileError;
use crate::output::{Conversion, ConversionRequest, ConversionStats};
use crate::registry::{ConversionKey, Registry, Staged};
use std::time::Instant;
use tracing::{debug, info};

/// Stateless conversion engine: a handler registry plus configuration.
///
/// Construct once and reuse — the registry is immutable after construction
/// and [`convert`](Converter::convert) borrows `self` immutably, so one
/// `Converter` can serve concurrent requests from multiple threads.
pub struct Converter {
    registry: Registry,
    config: ConvertConfig,
}

impl Converter {
    /// A converter with every built-in handler and the given configuration.
    pub fn new(config: ConvertConfig) -> Result<Self, FlexifileError> {
        Ok(Self {
            registry: Registry::builtin()?,
            config,
        })
    }

    /// A converter over a caller-assembled registry. Used by tests and by
    /// embedders that add or replace handlers.
    pub fn with_registry(registry: Registry, config: ConvertConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Run one conversion request to completion.
    ///
    /// # Errors
    /// * [`FlexifileError::InvalidFormatPair`] — pair not legal per the
    ///   catalog. Raised before any handler lookup.
    /// * [`FlexifileError::UnsupportedConversion`] — legal pair, no handler.
    /// * Any handler error ([`FlexifileError::MalformedInput`],
    ///   [`FlexifileError::ConversionFailed`],
    ///   [`FlexifileError::EngineUnavailable`]), passed through unchanged.
    pub fn convert(&self, request: &ConversionRequest) -> Result<Conversion, FlexifileError> {
        let start = Instant::now();
        info!(
            "Converting '{}': {} / {} to {}",
            request.filename(),
            request.domain(),
            request.input(),
            request.output()
        );

        // ── Step 1: Catalog validation ───────────────────────────────────────
        // The catalog is authoritative over the registry: an illegal pair is
        // rejected here even if someone registered a handler for it.
        if !request.domain().allows(request.input(), request.output()) {
            return Err(FlexifileError::InvalidFormatPair {
                domain: request.domain(),
                input: request.input(),
                output: request.output(),
            });
        }

        // ── Step 2: Handler resolution ───────────────────────────────────────
        let key = ConversionKey::new(request.domain(), request.input(), request.output());
        let handler = self
            .registry
            .resolve(&key)
            .ok_or(FlexifileError::UnsupportedConversion {
                domain: request.domain(),
                input: request.input(),
                output: request.output(),
            })?;

        // ── Step 3: Stage input on disk ──────────────────────────────────────
        // One temp scope per request; dropped (and deleted) on every exit
        // path, success or error.
        let work_dir = tempfile::tempdir()
            .map_err(|e| FlexifileError::Internal(format!("temp staging: {e}")))?;
        let stem = request.stem();
        let input_path = work_dir
            .path()
            .join(format!("{}{}", sanitize_stem(&stem), request.input().extension()));
        std::fs::write(&input_path, request.bytes())
            .map_err(|e| FlexifileError::Internal(format!("staging write: {e}")))?;
        debug!("Staged {} bytes at {}", request.bytes().len(), input_path.display());

        // ── Step 4: Invoke handler ───────────────────────────────────────────
        let staged = Staged {
            bytes: request.bytes(),
            input_path: &input_path,
            work_dir: work_dir.path(),
            stem: &stem,
            input: request.input(),
            output: request.output(),
            config: &self.config,
        };
        let outcome = handler.convert(&staged)?;
        if outcome.artifacts.is_empty() {
            return Err(FlexifileError::Internal(
                "handler returned success with no artifacts".into(),
            ));
        }

        // ── Step 5: Stats ────────────────────────────────────────────────────
        let stats = ConversionStats {
            input_bytes: request.bytes().len(),
            output_bytes: outcome.artifacts.iter().map(|a| a.bytes.len()).sum(),
            artifact_count: outcome.artifacts.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Conversion complete: {} artifact(s), {} bytes, {}ms",
            stats.artifact_count, stats.output_bytes, stats.duration_ms
        );

        Ok(Conversion {
            artifacts: outcome.artifacts,
            advisory: outcome.advisory,
            stats,
        })
    }
}

/// Make a user-supplied stem safe to use as a file name inside the temp
/// scope. Path separators and parent references must not escape the scope;
/// everything else passes through so artifact names stay recognisable.
fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "converted".to_string()
    } else {
        cleaned
    }
}
