//! Presentation conversions: PowerPoint → PDF and PowerPoint → images.
//!
//! Both are *deliberately degraded*: only text survives. Each slide is laid
//! out on a fixed blank canvas — ordinal top-right, the title shape's text
//! large, remaining paragraphs as body lines stepping down a fixed line
//! height and stopping at the canvas bound (no wrapping onto another
//! page/image). Every successful result carries a fixed advisory string so
//! the caller can disclose the fidelity limitation; this is a documented
//! product decision, not a defect.
//!
//! PDF text is set with printpdf's builtin Helvetica (no font files to
//! ship); PNG text is drawn from the public-domain `font8x8` glyph set at
//! 2–3× scale for the same reason.

use crate::catalog::Format;
use crate::domains::pptx::{self, Slide};
use crate::error::FlexifileError;
use crate::output::{Artifact, Outcome};
use crate::registry::Staged;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::Cursor;
use tracing::{debug, info};

/// Advisory accompanying PowerPoint → PDF output.
pub const PDF_ADVISORY: &str = "Note: This is a basic text-only conversion. For full fidelity \
     PowerPoint to PDF conversion, consider using desktop software like \
     Microsoft PowerPoint or LibreOffice.";

/// Advisory accompanying PowerPoint → image output.
pub const IMAGE_ADVISORY: &str = "Note: This is a basic text-only conversion. For full fidelity \
     PowerPoint to image conversion, consider using desktop software.";

// US-letter page, coordinates in points from the bottom-left (as the
// original renderer used).
const PAGE_W_PT: f32 = 612.0;
const PAGE_H_PT: f32 = 792.0;
const PDF_TITLE_CHARS: usize = 50;
const PDF_BODY_CHARS: usize = 80;
const PDF_BODY_TOP_PT: f32 = 680.0;
const PDF_LINE_STEP_PT: f32 = 20.0;
const PDF_BOTTOM_MARGIN_PT: f32 = 72.0;

// Fixed image canvas.
const CANVAS_W: u32 = 1280;
const CANVAS_H: u32 = 720;
const IMG_BODY_TOP: u32 = 200;
const IMG_LINE_STEP: u32 = 30;
const IMG_BODY_BOTTOM: u32 = 650;

/// Handler for PowerPoint → PDF.
pub fn pptx_to_pdf(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    let slides = parse_non_empty(staged.bytes)?;
    let pdf = render_deck_pdf(&slides, staged.stem)?;
    info!("Rendered {} slides to text-only PDF", slides.len());

    let filename = format!("{}{}", staged.stem, Format::Pdf.extension());
    Ok(Outcome::single(Artifact::new(filename, pdf)).with_advisory(PDF_ADVISORY))
}

/// Handler for PowerPoint → per-slide PNG images (multi-artifact).
pub fn pptx_to_images(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    let slides = parse_non_empty(staged.bytes)?;

    let mut artifacts = Vec::with_capacity(slides.len());
    for (i, slide) in slides.iter().enumerate() {
        let ordinal = i + 1;
        let png = render_slide_png(slide, ordinal)?;
        artifacts.push(Artifact::new(format!("slide_{ordinal}.png"), png));
    }
    info!("Rendered {} slides to text-only images", artifacts.len());

    Ok(Outcome {
        artifacts,
        advisory: Some(IMAGE_ADVISORY.to_string()),
    })
}

fn parse_non_empty(bytes: &[u8]) -> Result<Vec<Slide>, FlexifileError> {
    let slides = pptx::parse_deck(bytes)?;
    if slides.is_empty() {
        return Err(FlexifileError::MalformedInput {
            format: Format::Pptx,
            detail: "presentation contains no slides".into(),
        });
    }
    Ok(slides)
}

// ── PDF rendering ────────────────────────────────────────────────────────

fn pt(v: f32) -> Mm {
    // 1 pt = 25.4/72 mm
    Mm(v * 25.4 / 72.0)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn render_deck_pdf(slides: &[Slide], title: &str) -> Result<Vec<u8>, FlexifileError> {
    let failed = |e: printpdf::Error| FlexifileError::ConversionFailed {
        detail: format!("PDF rendering: {e}"),
    };

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, pt(PAGE_W_PT), pt(PAGE_H_PT), "slide");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(failed)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(failed)?;

    for (i, slide) in slides.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(pt(PAGE_W_PT), pt(PAGE_H_PT), "slide");
            doc.get_page(page).get_layer(layer)
        };

        layer.use_text(format!("Slide {}", i + 1), 10.0, pt(500.0), pt(750.0), &regular);

        if let Some(slide_title) = slide.title() {
            layer.use_text(
                truncate(&slide_title, PDF_TITLE_CHARS),
                16.0,
                pt(72.0),
                pt(720.0),
                &bold,
            );
        }

        // Fixed line height, stop at the bottom margin — never spill onto
        // a second page for the same slide.
        let mut y = PDF_BODY_TOP_PT;
        for line in slide.body_lines() {
            if y < PDF_BOTTOM_MARGIN_PT {
                debug!("Slide {}: body truncated at page bound", i + 1);
                break;
            }
            layer.use_text(truncate(line, PDF_BODY_CHARS), 12.0, pt(72.0), pt(y), &regular);
            y -= PDF_LINE_STEP_PT;
        }
    }

    doc.save_to_bytes().map_err(failed)
}

// ── Image rendering ──────────────────────────────────────────────────────

fn render_slide_png(slide: &Slide, ordinal: usize) -> Result<Vec<u8>, FlexifileError> {
    let mut canvas = RgbImage::from_pixel(CANVAS_W, CANVAS_H, Rgb([255, 255, 255]));

    draw_text(&mut canvas, &format!("Slide {ordinal}"), 1150, 30, 2);

    if let Some(title) = slide.title() {
        draw_text(&mut canvas, &truncate(&title, PDF_TITLE_CHARS), 100, 100, 3);
    }

    let mut y = IMG_BODY_TOP;
    for line in slide.body_lines() {
        if y > IMG_BODY_BOTTOM {
            debug!("Slide {ordinal}: body truncated at canvas bound");
            break;
        }
        draw_text(&mut canvas, &truncate(line, PDF_BODY_CHARS), 100, y, 2);
        y += IMG_LINE_STEP;
    }

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(canvas)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| FlexifileError::ConversionFailed {
            detail: format!("slide PNG encoding: {e}"),
        })?;
    Ok(buf)
}

/// Draw `text` in black 8×8 bitmap glyphs scaled by `scale`, clipped at the
/// canvas edges. Glyphs missing from the basic set render as '?'.
fn draw_text(canvas: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32) {
    let advance = 8 * scale;
    let mut cx = x;
    for ch in text.chars() {
        if cx + advance > canvas.width() {
            break;
        }
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0u8; 8]);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8u32 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = cx + col * scale + dx;
                        let py = y + row as u32 * scale + dy;
                        if px < canvas.width() && py < canvas.height() {
                            canvas.put_pixel(px, py, Rgb([0, 0, 0]));
                        }
                    }
                }
            }
        }
        cx += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tests::{sample_pptx, staged_for};

    #[test]
    fn deck_renders_to_pdf_with_advisory() {
        let deck = sample_pptx(&[("Roadmap", &["q1", "q2"]), ("Risks", &[])]);
        let staged = staged_for(&deck, Format::Pptx, Format::Pdf);
        let outcome = pptx_to_pdf(&staged.as_staged()).unwrap();

        assert_eq!(outcome.artifacts.len(), 1);
        assert!(outcome.artifacts[0].bytes.starts_with(b"%PDF"));
        assert_eq!(outcome.advisory.as_deref(), Some(PDF_ADVISORY));
    }

    #[test]
    fn two_slides_produce_two_ordered_images() {
        let deck = sample_pptx(&[("One", &["alpha"]), ("Two", &["beta"])]);
        let staged = staged_for(&deck, Format::Pptx, Format::Png);
        let outcome = pptx_to_images(&staged.as_staged()).unwrap();

        let names: Vec<&str> = outcome
            .artifacts
            .iter()
            .map(|a| a.filename.as_str())
            .collect();
        assert_eq!(names, vec!["slide_1.png", "slide_2.png"]);
        assert_eq!(outcome.advisory.as_deref(), Some(IMAGE_ADVISORY));

        for artifact in &outcome.artifacts {
            let img = image::load_from_memory(&artifact.bytes).unwrap();
            assert_eq!((img.width(), img.height()), (CANVAS_W, CANVAS_H));
        }
    }

    #[test]
    fn rendered_slide_is_not_blank() {
        let deck = sample_pptx(&[("Visible Title", &["a body line"])]);
        let staged = staged_for(&deck, Format::Pptx, Format::Png);
        let outcome = pptx_to_images(&staged.as_staged()).unwrap();

        let img = image::load_from_memory(&outcome.artifacts[0].bytes)
            .unwrap()
            .to_rgb8();
        let black = img.pixels().filter(|p| p.0 == [0, 0, 0]).count();
        assert!(black > 50, "expected drawn glyph pixels, found {black}");
    }

    #[test]
    fn body_stops_at_canvas_bound() {
        let many: Vec<&str> = std::iter::repeat("line").take(64).collect();
        let deck = sample_pptx(&[("T", many.as_slice())]);
        let staged = staged_for(&deck, Format::Pptx, Format::Png);
        // Must not panic or wrap onto a second image.
        let outcome = pptx_to_images(&staged.as_staged()).unwrap();
        assert_eq!(outcome.artifacts.len(), 1);
    }

    #[test]
    fn empty_deck_is_malformed() {
        let deck = sample_pptx(&[]);
        let staged = staged_for(&deck, Format::Pptx, Format::Pdf);
        let err = pptx_to_pdf(&staged.as_staged()).unwrap_err();
        assert!(matches!(err, FlexifileError::MalformedInput { .. }));
    }
}
