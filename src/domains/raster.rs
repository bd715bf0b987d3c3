//! Raster image transcoding via the `image` crate.
//!
//! Mode conversion rules are explicit and fixed:
//!
//! * Converting **to PNG** upgrades to RGBA — the output always carries an
//!   alpha channel, even if the source had none.
//! * Converting **to JPEG or BMP** flattens to RGB — alpha is dropped, since
//!   neither encoder accepts it here.
//! * TIFF keeps the source's channel layout; WebP is encoded losslessly
//!   (the `image` WebP encoder has no lossy mode), so the quality constant
//!   applies to JPEG only.
//!
//! The quality constant is a product decision, not a knob: 95 for JPEG,
//! matching what the original converter always used.

use crate::catalog::Format;
use crate::error::FlexifileError;
use crate::output::{Artifact, Outcome};
use crate::registry::Staged;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Fixed JPEG encoder quality. Not user-configurable.
const JPEG_QUALITY: u8 = 95;

/// Handler for every raster pair in the catalog: decode, apply the mode
/// rule for the target format, encode.
pub fn transcode(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    let img = image::load_from_memory(staged.bytes).map_err(|e| {
        FlexifileError::MalformedInput {
            format: staged.input,
            detail: e.to_string(),
        }
    })?;
    debug!(
        "Decoded {} input: {}x{} px",
        staged.input,
        img.width(),
        img.height()
    );

    let bytes = encode(&img, staged.output)?;
    let filename = format!("{}{}", staged.stem, staged.output.extension());
    Ok(Outcome::single(Artifact::new(filename, bytes)))
}

/// Encode `img` into the target format, applying its mode rule.
/// Shared with the vector domain, which feeds rasterised SVG through the
/// same mode rules.
pub(crate) fn encode(img: &DynamicImage, output: Format) -> Result<Vec<u8>, FlexifileError> {
    let mut buf = Vec::new();
    let failed = |e: image::ImageError| FlexifileError::ConversionFailed {
        detail: format!("{output} encoding failed: {e}"),
    };

    match output {
        Format::Png => {
            // Alpha-capable target: upgrade to RGBA.
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .map_err(failed)?;
        }
        Format::Jpeg => {
            // No alpha support: flatten to RGB.
            let rgb = img.to_rgb8();
            JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
                .encode_image(&rgb)
                .map_err(failed)?;
        }
        Format::Bmp => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp)
                .map_err(failed)?;
        }
        Format::Tiff => {
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Tiff)
                .map_err(failed)?;
        }
        Format::WebP => {
            let rgba = img.to_rgba8();
            WebPEncoder::new_lossless(&mut buf)
                .encode(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(failed)?;
        }
        other => {
            return Err(FlexifileError::Internal(format!(
                "raster encoder has no rule for {other}"
            )))
        }
    }
    Ok(buf)
}
