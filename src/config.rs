//! Configuration for the converter.
//!
//! All knobs live in one [`ConvertConfig`] struct built via its builder, so
//! configs are trivial to share across threads and to log. Conversion
//! behaviour the original product fixed by design — JPEG quality, slide
//! canvas geometry, truncation widths — is deliberately *not* configurable
//! here; those constants live next to the handlers that use them.

use crate::error::FlexifileError;
use std::path::PathBuf;

/// Environment variable overriding the office engine binary path.
pub const OFFICE_BIN_ENV: &str = "FLEXIFILE_OFFICE_BIN";

/// Configuration for a [`crate::Converter`].
///
/// # Example
/// ```rust
/// use flexifile::ConvertConfig;
///
/// let config = ConvertConfig::builder()
///     .office_bin("/usr/bin/soffice")
///     .office_timeout_secs(120)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Path or name of the external office-rendering binary. Default:
    /// `$FLEXIFILE_OFFICE_BIN` if set, else `soffice` resolved via `PATH`.
    ///
    /// Word→PDF delegates to this engine. On headless deployments without
    /// LibreOffice the engine is simply absent and those conversions fail
    /// with [`FlexifileError::EngineUnavailable`] — a deployment property,
    /// not a bug.
    pub office_bin: PathBuf,

    /// Wall-clock limit for one office engine invocation, seconds. Default: 60.
    ///
    /// A wedged soffice process would otherwise block the conversion call
    /// forever; there is no retry, only a reported failure.
    pub office_timeout_secs: u64,

    /// Cap on either dimension when rasterising vector input, pixels.
    /// Default: 4096.
    ///
    /// SVG documents can declare arbitrarily large intrinsic sizes; the cap
    /// scales the render down proportionally so one request cannot exhaust
    /// memory.
    pub max_raster_pixels: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            office_bin: std::env::var_os(OFFICE_BIN_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("soffice")),
            office_timeout_secs: 60,
            max_raster_pixels: 4096,
        }
    }
}

impl ConvertConfig {
    /// Create a new builder for `ConvertConfig`.
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConvertConfig`].
#[derive(Debug)]
pub struct ConvertConfigBuilder {
    config: ConvertConfig,
}

impl ConvertConfigBuilder {
    pub fn office_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.config.office_bin = bin.into();
        self
    }

    pub fn office_timeout_secs(mut self, secs: u64) -> Self {
        self.config.office_timeout_secs = secs.max(1);
        self
    }

    pub fn max_raster_pixels(mut self, px: u32) -> Self {
        self.config.max_raster_pixels = px.clamp(16, 16_384);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConvertConfig, FlexifileError> {
        let c = &self.config;
        if c.office_bin.as_os_str().is_empty() {
            return Err(FlexifileError::InvalidConfig(
                "office_bin must not be empty".into(),
            ));
        }
        if c.office_timeout_secs == 0 {
            return Err(FlexifileError::InvalidConfig(
                "office_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
