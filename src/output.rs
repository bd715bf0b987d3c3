//! Request and result types for a single conversion.
//!
//! A [`ConversionRequest`] is created per user action, consumed exactly once
//! by the orchestrator, and discarded after producing a [`Conversion`] (or
//! a typed error). Nothing here outlives the call — there is no persistent
//! store.

use crate::catalog::{Format, FormatDomain};
use serde::{Deserialize, Serialize};

/// One conversion request: input bytes, the original filename, and the
/// (domain, input format, output format) triple to run.
///
/// Immutable once constructed; fields are only reachable through accessors.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    bytes: Vec<u8>,
    filename: String,
    domain: FormatDomain,
    input: Format,
    output: Format,
}

impl ConversionRequest {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        domain: FormatDomain,
        input: Format,
        output: Format,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
            domain,
            input,
            output,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn domain(&self) -> FormatDomain {
        self.domain
    }

    pub fn input(&self) -> Format {
        self.input
    }

    pub fn output(&self) -> Format {
        self.output
    }

    /// Base filename without its final extension, used to name output
    /// artifacts. Falls back to `"converted"` for degenerate names like
    /// `".pdf"` or `""`.
    pub fn stem(&self) -> String {
        let base = match self.filename.rsplit_once('.') {
            Some((base, _)) => base,
            None => self.filename.as_str(),
        };
        if base.is_empty() {
            "converted".to_string()
        } else {
            base.to_string()
        }
    }
}

/// One produced output: final bytes plus a suggested filename.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Suggested download filename, extension included.
    pub filename: String,
    /// The artifact content, fully read into memory before the conversion's
    /// temp scope closes.
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// What a handler hands back on success: one or more artifacts, plus an
/// optional advisory for deliberately degraded conversions.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// At least one artifact. Multiple artifacts (per-slide images) are
    /// packaged into one archive by [`crate::package`].
    pub artifacts: Vec<Artifact>,
    /// Fixed user-facing notice accompanying a successful but
    /// fidelity-reduced result. Distinct from an error.
    pub advisory: Option<String>,
}

impl Outcome {
    pub fn single(artifact: Artifact) -> Self {
        Self {
            artifacts: vec![artifact],
            advisory: None,
        }
    }

    pub fn with_advisory(mut self, advisory: impl Into<String>) -> Self {
        self.advisory = Some(advisory.into());
        self
    }
}

/// A completed conversion: the handler's outcome plus orchestrator stats.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub artifacts: Vec<Artifact>,
    pub advisory: Option<String>,
    pub stats: ConversionStats,
}

impl Conversion {
    /// The first (usually only) artifact.
    pub fn primary(&self) -> &Artifact {
        &self.artifacts[0]
    }

    /// True when the result is a multi-artifact set (e.g. one image per slide).
    pub fn is_multi(&self) -> bool {
        self.artifacts.len() > 1
    }
}

/// Timing and size statistics for one conversion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub artifact_count: usize,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_one_extension() {
        let req = ConversionRequest::new(
            b"x".to_vec(),
            "report.final.docx",
            FormatDomain::Document,
            Format::Docx,
            Format::Pdf,
        );
        assert_eq!(req.stem(), "report.final");
    }

    #[test]
    fn stem_falls_back_for_degenerate_names() {
        for name in ["", ".pdf"] {
            let req = ConversionRequest::new(
                b"x".to_vec(),
                name,
                FormatDomain::Document,
                Format::Pdf,
                Format::Txt,
            );
            assert_eq!(req.stem(), "converted", "for {name:?}");
        }
    }

    #[test]
    fn outcome_advisory_attaches() {
        let o = Outcome::single(Artifact::new("a.pdf", vec![1])).with_advisory("degraded");
        assert_eq!(o.advisory.as_deref(), Some("degraded"));
        assert_eq!(o.artifacts.len(), 1);
    }
}
