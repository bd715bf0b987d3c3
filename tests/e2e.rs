//! End-to-end integration tests for flexifile.
//!
//! Everything here runs against the public API with fixtures generated in
//! memory — no test asset files and no network. The only external
//! dependency a conversion can have is the LibreOffice binary for Word→PDF
//! rendering; tests touching that path accept `EngineUnavailable` so they
//! pass on hosts without it.

use flexifile::{
    domains, package, ConversionKey, ConversionRequest, ConvertConfig, Converter, FlexifileError,
    Format, FormatDomain, Outcome, Registry, Staged,
};
use std::io::{Read, Write};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn converter() -> Converter {
    Converter::new(ConvertConfig::default()).expect("built-in registry must build")
}

fn request(
    bytes: Vec<u8>,
    filename: &str,
    domain: FormatDomain,
    input: Format,
    output: Format,
) -> ConversionRequest {
    ConversionRequest::new(bytes, filename, domain, input, output)
}

/// 3×3 CSV table with commas-free cell text.
fn sample_csv() -> Vec<u8> {
    b"name,qty,code\nbolt m3,12,a-77\nwasher,304,b-9\n".to_vec()
}

/// A 6×4 RGBA PNG with a semi-transparent pixel.
fn sample_png_with_alpha() -> Vec<u8> {
    let mut img = image::RgbaImage::from_pixel(6, 4, image::Rgba([10, 200, 30, 255]));
    img.put_pixel(2, 1, image::Rgba([255, 0, 0, 128]));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A minimal .pptx: one slide part per (title, body lines) entry.
fn sample_pptx(slides: &[(&str, &[&str])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (i, (title, body)) in slides.iter().enumerate() {
        let mut xml = String::from(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>"#,
        );
        xml.push_str(&format!(
            "<p:sp><p:txBody><a:p><a:r><a:t>{title}</a:t></a:r></a:p></p:txBody></p:sp>"
        ));
        for line in *body {
            xml.push_str(&format!(
                "<p:sp><p:txBody><a:p><a:r><a:t>{line}</a:t></a:r></a:p></p:txBody></p:sp>"
            ));
        }
        xml.push_str("</p:spTree></p:cSld></p:sld>");
        writer
            .start_file(
                format!("ppt/slides/slide{}.xml", i + 1),
                zip::write::SimpleFileOptions::default(),
            )
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

const RED_SQUARE_SVG: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30"><rect width="40" height="30" fill="red"/></svg>"#;

// ── Catalog totality ─────────────────────────────────────────────────────────

#[test]
fn every_catalog_pair_converts_or_fails_cleanly() {
    let converter = converter();
    for domain in domains() {
        for input in domain.input_formats() {
            for &output in domain.outputs_for(input) {
                // Garbage bytes: success is not expected, but the error must
                // be a typed classification, never a catalog rejection (the
                // pair *is* legal) and never a panic.
                let req = request(b"x".to_vec(), "probe.bin", *domain, input, output);
                match converter.convert(&req) {
                    Ok(_) => {}
                    Err(FlexifileError::InvalidFormatPair { .. }) => {
                        panic!("catalog-legal pair {domain}/{input}->{output} rejected as invalid")
                    }
                    Err(_) => {}
                }
            }
        }
    }
}

#[test]
fn every_catalog_format_has_an_extension() {
    for domain in domains() {
        for input in domain.input_formats() {
            assert!(input.extension().starts_with('.'), "for {input}");
            for output in domain.outputs_for(input) {
                assert!(output.extension().starts_with('.'), "for {output}");
            }
        }
    }
}

#[test]
fn illegal_pair_is_rejected_before_any_handler_runs() {
    // A probe handler that must never be reached.
    let mut reg = Registry::new();
    reg.register(
        ConversionKey::new(FormatDomain::Spreadsheet, Format::Csv, Format::Png),
        |_: &Staged<'_>| -> Result<Outcome, FlexifileError> {
            panic!("handler ran for a catalog-illegal pair")
        },
    )
    .unwrap();
    let converter = Converter::with_registry(reg, ConvertConfig::default());

    let err = converter
        .convert(&request(
            sample_csv(),
            "t.csv",
            FormatDomain::Spreadsheet,
            Format::Csv,
            Format::Png,
        ))
        .unwrap_err();
    assert!(matches!(err, FlexifileError::InvalidFormatPair { .. }));
}

// ── Spreadsheet pipeline ─────────────────────────────────────────────────────

#[test]
fn csv_to_xlsx_to_csv_roundtrips() {
    let converter = converter();

    let to_xlsx = converter
        .convert(&request(
            sample_csv(),
            "parts.csv",
            FormatDomain::Spreadsheet,
            Format::Csv,
            Format::Xlsx,
        ))
        .unwrap();
    assert_eq!(to_xlsx.primary().filename, "parts.xlsx");

    let back = converter
        .convert(&request(
            to_xlsx.primary().bytes.clone(),
            "parts.xlsx",
            FormatDomain::Spreadsheet,
            Format::Xlsx,
            Format::Csv,
        ))
        .unwrap();
    assert_eq!(back.primary().bytes, sample_csv());
}

#[test]
fn csv_to_tsv_to_csv_is_content_lossless() {
    let converter = converter();

    let tsv = converter
        .convert(&request(
            sample_csv(),
            "parts.csv",
            FormatDomain::Spreadsheet,
            Format::Csv,
            Format::Tsv,
        ))
        .unwrap();
    assert!(tsv.primary().bytes.contains(&b'\t'));

    let csv_again = converter
        .convert(&request(
            tsv.primary().bytes.clone(),
            "parts.tsv",
            FormatDomain::Spreadsheet,
            Format::Tsv,
            Format::Csv,
        ))
        .unwrap();
    assert_eq!(csv_again.primary().bytes, sample_csv());
}

// ── Raster pipeline ──────────────────────────────────────────────────────────

#[test]
fn png_with_alpha_becomes_rgb_jpeg_of_same_size() {
    let conv = converter()
        .convert(&request(
            sample_png_with_alpha(),
            "photo.png",
            FormatDomain::RasterImage,
            Format::Png,
            Format::Jpeg,
        ))
        .unwrap();
    assert_eq!(conv.primary().filename, "photo.jpg");

    let out = image::load_from_memory(&conv.primary().bytes).unwrap();
    assert_eq!((out.width(), out.height()), (6, 4));
    assert_eq!(
        image::guess_format(&conv.primary().bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
    // JPEG has no alpha channel; the decode must not report one.
    assert!(!out.color().has_alpha());
}

#[test]
fn garbage_raster_input_is_malformed_not_a_crash() {
    let err = converter()
        .convert(&request(
            b"definitely not an image".to_vec(),
            "x.png",
            FormatDomain::RasterImage,
            Format::Png,
            Format::Jpeg,
        ))
        .unwrap_err();
    assert!(matches!(err, FlexifileError::MalformedInput { .. }));
}

// ── Presentation pipeline ────────────────────────────────────────────────────

#[test]
fn two_slide_deck_packages_as_two_entry_archive() {
    let deck = sample_pptx(&[("Intro", &["hello"][..]), ("Close", &["bye"][..])]);
    let req = request(
        deck,
        "quarterly.pptx",
        FormatDomain::Presentation,
        Format::Pptx,
        Format::Png,
    );
    let conv = converter().convert(&req).unwrap();
    assert_eq!(conv.artifacts.len(), 2);
    assert!(conv.advisory.is_some(), "degraded conversion needs advisory");

    let deliverable = package(&conv, &req.stem()).unwrap();
    assert_eq!(deliverable.filename, "quarterly_slides.zip");
    assert_eq!(deliverable.artifact_count, 2);

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(deliverable.bytes)).unwrap();
    assert_eq!(archive.len(), 2);
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, ["slide_1.png", "slide_2.png"]);

    let mut body = Vec::new();
    archive
        .by_name("slide_1.png")
        .unwrap()
        .read_to_end(&mut body)
        .unwrap();
    let img = image::load_from_memory(&body).unwrap();
    assert_eq!((img.width(), img.height()), (1280, 720));
}

#[test]
fn deck_to_pdf_is_a_pdf_with_advisory() {
    let deck = sample_pptx(&[("Only slide", &[][..])]);
    let conv = converter()
        .convert(&request(
            deck,
            "deck.pptx",
            FormatDomain::Presentation,
            Format::Pptx,
            Format::Pdf,
        ))
        .unwrap();
    assert!(conv.primary().bytes.starts_with(b"%PDF"));
    assert!(conv.advisory.is_some());
    assert_eq!(conv.primary().filename, "deck.pdf");
}

// ── Document pipeline ────────────────────────────────────────────────────────

#[test]
fn txt_to_docx_contains_the_text() {
    let conv = converter()
        .convert(&request(
            b"first line\nsecond line\n".to_vec(),
            "notes.txt",
            FormatDomain::Document,
            Format::Txt,
            Format::Docx,
        ))
        .unwrap();
    assert_eq!(conv.primary().filename, "notes.docx");

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(&conv.primary().bytes)).unwrap();
    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut document_xml)
        .unwrap();
    assert!(document_xml.contains("first line"));
    assert!(document_xml.contains("second line"));
}

#[test]
fn txt_to_pdf_is_never_reported_as_unsupported() {
    // This path needs LibreOffice; hosts without it must get a deployment
    // error, not "not implemented".
    let result = converter().convert(&request(
        b"hello".to_vec(),
        "notes.txt",
        FormatDomain::Document,
        Format::Txt,
        Format::Pdf,
    ));
    match result {
        Ok(conv) => assert!(conv.primary().bytes.starts_with(b"%PDF")),
        Err(FlexifileError::EngineUnavailable { .. })
        | Err(FlexifileError::ConversionFailed { .. }) => {}
        Err(other) => panic!("unexpected error class: {other}"),
    }
}

// ── Vector pipeline ──────────────────────────────────────────────────────────

#[test]
fn svg_renders_to_png_at_intrinsic_size() {
    let conv = converter()
        .convert(&request(
            RED_SQUARE_SVG.to_vec(),
            "chart.svg",
            FormatDomain::VectorGraphics,
            Format::Svg,
            Format::Png,
        ))
        .unwrap();
    let img = image::load_from_memory(&conv.primary().bytes).unwrap();
    assert_eq!((img.width(), img.height()), (40, 30));
}

#[test]
fn svg_converts_to_pdf() {
    let conv = converter()
        .convert(&request(
            RED_SQUARE_SVG.to_vec(),
            "chart.svg",
            FormatDomain::VectorGraphics,
            Format::Svg,
            Format::Pdf,
        ))
        .unwrap();
    assert!(conv.primary().bytes.starts_with(b"%PDF"));
    assert_eq!(conv.primary().filename, "chart.pdf");
}

// ── Unimplemented-but-legal pairs ────────────────────────────────────────────

#[test]
fn legal_unregistered_pair_reports_unsupported() {
    // EPS input is legal per the catalog but has no built-in handler.
    let err = converter()
        .convert(&request(
            b"%!PS-Adobe-3.0 EPSF-3.0".to_vec(),
            "figure.eps",
            FormatDomain::VectorGraphics,
            Format::Eps,
            Format::Pdf,
        ))
        .unwrap_err();
    assert!(matches!(err, FlexifileError::UnsupportedConversion { .. }));
}
