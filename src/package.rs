//! Packaging: turn a [`Conversion`] into one downloadable deliverable.
//!
//! A single-artifact conversion is delivered as-is. A multi-artifact
//! conversion (per-slide images) is bundled into one zip archive so the
//! caller always hands the user exactly one file.

use crate::error::FlexifileError;
use crate::output::Conversion;
use base64::Engine as _;
use std::io::Write;
use tracing::debug;
use zip::write::SimpleFileOptions;

/// One downloadable file, plus what it contains.
#[derive(Debug, Clone)]
pub struct Deliverable {
    /// Suggested download filename.
    pub filename: String,
    pub bytes: Vec<u8>,
    /// How many conversion artifacts this file carries (1 for a direct
    /// artifact, N for an archive).
    pub artifact_count: usize,
    /// Advisory carried over from the conversion, if any.
    pub advisory: Option<String>,
}

/// Package a conversion result into a single deliverable.
///
/// Archive entries keep their artifact filenames and their order, so a
/// slide deck unpacks as `slide_1.png`, `slide_2.png`, … exactly as the
/// handler emitted them. The archive itself is named
/// `{stem}_{group}.zip`, e.g. `quarterly_slides.zip` for a deck called
/// `quarterly.pptx`.
pub fn package(conversion: &Conversion, stem: &str) -> Result<Deliverable, FlexifileError> {
    if !conversion.is_multi() {
        let artifact = conversion.primary();
        return Ok(Deliverable {
            filename: artifact.filename.clone(),
            bytes: artifact.bytes.clone(),
            artifact_count: 1,
            advisory: conversion.advisory.clone(),
        });
    }

    let failed = |e: zip::result::ZipError| FlexifileError::Internal(format!("packaging: {e}"));
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for artifact in &conversion.artifacts {
        writer
            .start_file(artifact.filename.as_str(), SimpleFileOptions::default())
            .map_err(failed)?;
        writer
            .write_all(&artifact.bytes)
            .map_err(|e| FlexifileError::Internal(format!("packaging: {e}")))?;
    }
    let bytes = writer.finish().map_err(failed)?.into_inner();

    let filename = format!("{stem}_{}.zip", artifact_group(conversion));
    debug!(
        "Packaged {} artifacts into {} ({} bytes)",
        conversion.artifacts.len(),
        filename,
        bytes.len()
    );
    Ok(Deliverable {
        filename,
        bytes,
        artifact_count: conversion.artifacts.len(),
        advisory: conversion.advisory.clone(),
    })
}

/// Render bytes as a `data:` URI for inline embedding. The original
/// download mechanism served everything as `application/octet-stream`;
/// callers wanting a browser-renderable link pass a real media type.
pub fn data_uri(bytes: &[u8], mime: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Derive a plural group name from the first artifact: `slide_1.png`
/// yields `slides`. Falls back to `files` when the artifacts do not follow
/// the `{name}_{counter}` convention.
fn artifact_group(conversion: &Conversion) -> String {
    let first = &conversion.primary().filename;
    let stem = match first.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => first.as_str(),
    };
    match stem.rsplit_once('_') {
        Some((base, counter)) if !base.is_empty() && counter.chars().all(|c| c.is_ascii_digit()) => {
            format!("{base}s")
        }
        _ => "files".to_string(),
    }
}
