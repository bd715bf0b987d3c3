//! Per-domain conversion handlers.
//!
//! One submodule per format domain, each exposing plain handler functions
//! of the [`Staged`] input. [`register_builtin`] wires them into a
//! [`Registry`] under their (domain, input, output) keys.
//!
//! ## Coverage
//!
//! The registry deliberately implements a subset of what the catalog calls
//! legal — the catalog is the product surface, the registry is what has
//! been built. Unregistered legal pairs surface as `UnsupportedConversion`.
//!
//! ```text
//! document      docx→pdf (office engine), pdf→docx, txt→docx, txt→pdf
//! presentation  pptx→pdf, pptx→png-per-slide        (text-only, advisory)
//! spreadsheet   xlsx↔csv/tsv, csv↔tsv, csv/tsv→xlsx (first sheet only)
//! raster        every catalog pair                   (mode rules)
//! vector        svg→png/jpeg, svg→pdf                (parse, then render)
//! ```

pub mod document;
pub(crate) mod office;
pub mod pptx;
pub mod presentation;
pub mod raster;
pub mod spreadsheet;
pub mod vector;

use crate::catalog::{Format, FormatDomain};
use crate::error::FlexifileError;
use crate::registry::{ConversionKey, Registry};

/// Install every built-in handler. Called once at startup by
/// [`Registry::builtin`]; fails only if a key is claimed twice, which is a
/// wiring bug, not a runtime condition.
pub(crate) fn register_builtin(reg: &mut Registry) -> Result<(), FlexifileError> {
    use Format::*;
    use FormatDomain::*;

    // Document
    reg.register(ConversionKey::new(Document, Docx, Pdf), document::docx_to_pdf)?;
    reg.register(ConversionKey::new(Document, Pdf, Docx), document::pdf_to_docx)?;
    reg.register(ConversionKey::new(Document, Txt, Docx), document::txt_to_docx)?;
    reg.register(ConversionKey::new(Document, Txt, Pdf), document::txt_to_pdf)?;

    // Presentation
    reg.register(
        ConversionKey::new(Presentation, Pptx, Pdf),
        presentation::pptx_to_pdf,
    )?;
    reg.register(
        ConversionKey::new(Presentation, Pptx, Png),
        presentation::pptx_to_images,
    )?;

    // Spreadsheet (xlsx→pdf stays catalog-only)
    for (input, output) in [
        (Xlsx, Csv),
        (Xlsx, Tsv),
        (Csv, Xlsx),
        (Csv, Tsv),
        (Tsv, Xlsx),
        (Tsv, Csv),
    ] {
        reg.register(
            ConversionKey::new(Spreadsheet, input, output),
            spreadsheet::reinterpret,
        )?;
    }

    // Raster: one transcoder covers every legal pair.
    let raster_inputs: Vec<Format> = RasterImage.input_formats().collect();
    for input in raster_inputs {
        for &output in RasterImage.outputs_for(input) {
            reg.register(
                ConversionKey::new(RasterImage, input, output),
                raster::transcode,
            )?;
        }
    }

    // Vector (eps and pdf inputs stay catalog-only)
    reg.register(
        ConversionKey::new(VectorGraphics, Svg, Png),
        vector::rasterize,
    )?;
    reg.register(
        ConversionKey::new(VectorGraphics, Svg, Jpeg),
        vector::rasterize,
    )?;
    reg.register(ConversionKey::new(VectorGraphics, Svg, Pdf), vector::to_pdf)?;

    Ok(())
}
