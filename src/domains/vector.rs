//! Vector graphics: SVG → raster image or PDF.
//!
//! Strictly two stages. Stage one parses the SVG into a `usvg` tree and is
//! shared by every output; a parse failure short-circuits before any render
//! work starts. Stage two either rasterises the tree with `resvg` (PNG,
//! JPEG) or re-serialises it as a PDF page description with `svg2pdf`.
//!
//! JPEG has no transparency, so transparent regions are composited over
//! white — the same paper-like background the original renderer produced.

use crate::catalog::Format;
use crate::error::FlexifileError;
use crate::output::{Artifact, Outcome};
use crate::registry::Staged;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

/// Handler for SVG → PNG / JPEG.
pub fn rasterize(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    let tree = parse(staged.bytes)?;
    let pixmap = render(&tree, staged.config.max_raster_pixels)?;
    debug!("Rasterised SVG: {}x{} px", pixmap.width(), pixmap.height());

    let img = pixmap_to_image(&pixmap, staged.output == Format::Jpeg)?;
    let bytes = crate::domains::raster::encode(&img, staged.output)?;
    let filename = format!("{}{}", staged.stem, staged.output.extension());
    Ok(Outcome::single(Artifact::new(filename, bytes)))
}

/// Handler for SVG → PDF: parse, then re-serialise as a one-page PDF.
pub fn to_pdf(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    // svg2pdf re-exports its own usvg so tree and serialiser always agree.
    let options = svg2pdf::usvg::Options::default();
    let tree = svg2pdf::usvg::Tree::from_data(staged.bytes, &options).map_err(|e| {
        FlexifileError::MalformedInput {
            format: Format::Svg,
            detail: e.to_string(),
        }
    })?;

    let pdf = svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| FlexifileError::ConversionFailed {
        detail: format!("SVG to PDF: {e}"),
    })?;

    let filename = format!("{}{}", staged.stem, Format::Pdf.extension());
    Ok(Outcome::single(Artifact::new(filename, pdf)))
}

/// Stage one: parse the SVG description.
fn parse(bytes: &[u8]) -> Result<usvg::Tree, FlexifileError> {
    usvg::Tree::from_data(bytes, &usvg::Options::default()).map_err(|e| {
        FlexifileError::MalformedInput {
            format: Format::Svg,
            detail: e.to_string(),
        }
    })
}

/// Stage two (raster): render the tree at its intrinsic size, scaled down
/// if either dimension exceeds `max_pixels`.
fn render(tree: &usvg::Tree, max_pixels: u32) -> Result<tiny_skia::Pixmap, FlexifileError> {
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    let longest = w.max(h);
    let scale = if longest > max_pixels as f32 {
        max_pixels as f32 / longest
    } else {
        1.0
    };

    let pw = (w * scale).ceil().max(1.0) as u32;
    let ph = (h * scale).ceil().max(1.0) as u32;
    let mut pixmap =
        tiny_skia::Pixmap::new(pw, ph).ok_or_else(|| FlexifileError::ConversionFailed {
            detail: format!("cannot allocate {pw}x{ph} render target"),
        })?;

    resvg::render(
        tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

/// Convert a premultiplied-alpha pixmap into an `image` buffer, optionally
/// compositing over white for alpha-less targets.
fn pixmap_to_image(
    pixmap: &tiny_skia::Pixmap,
    white_background: bool,
) -> Result<DynamicImage, FlexifileError> {
    let mut rgba = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        if white_background {
            let a = c.alpha() as u16;
            let over = |ch: u8| ((ch as u16 * a + 255 * (255 - a)) / 255) as u8;
            rgba.extend_from_slice(&[over(c.red()), over(c.green()), over(c.blue()), 255]);
        } else {
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
    }

    let img = RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba).ok_or_else(|| {
        FlexifileError::Internal("pixmap buffer size mismatch".into())
    })?;
    Ok(DynamicImage::ImageRgba8(img))
}
