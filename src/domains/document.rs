//! Document conversions: Word, PDF, and plain text.
//!
//! Three mechanisms cover the registered pairs:
//!
//! * **Word→PDF** delegates to the external office engine
//!   ([`crate::domains::office`]). Full-fidelity rendering is exactly what
//!   this library does not reimplement.
//! * **PDF→Word** is page-by-page *text* extraction via `lopdf`. Images,
//!   tables and layout are dropped. Every page emits a paragraph, even when
//!   its extracted text is empty — page count in, paragraph count out.
//! * **Text→Word** wraps the raw text as a single paragraph in a minimal
//!   OOXML package. **Text→PDF** is defined compositionally: Text→Word
//!   followed by Word→PDF, surfacing the first stage's failure if any.
//!
//! The OOXML writer below emits the smallest well-formed .docx a consumer
//! (Word, LibreOffice, the office engine itself) will open: content types,
//! the package relationship, and `word/document.xml`.

use crate::catalog::Format;
use crate::domains::office;
use crate::error::FlexifileError;
use crate::output::{Artifact, Outcome};
use crate::registry::Staged;
use lopdf::Document as PdfDocument;
use std::io::{Cursor, Write};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Handler for Word → PDF (external office engine).
pub fn docx_to_pdf(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    let pdf = office::render_pdf(staged.input_path, staged.work_dir, staged.config)?;
    let filename = format!("{}{}", staged.stem, Format::Pdf.extension());
    Ok(Outcome::single(Artifact::new(filename, pdf)))
}

/// Handler for PDF → Word (text-only extraction).
pub fn pdf_to_docx(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    let doc = PdfDocument::load_mem(staged.bytes).map_err(|e| FlexifileError::MalformedInput {
        format: Format::Pdf,
        detail: e.to_string(),
    })?;

    let mut paragraphs = Vec::new();
    for (page_num, _) in doc.get_pages() {
        // A page whose extraction fails or yields nothing still emits its
        // paragraph — no silent page skipping.
        let text = match doc.extract_text(&[page_num]) {
            Ok(t) => t,
            Err(e) => {
                warn!("Page {page_num}: text extraction failed: {e}");
                String::new()
            }
        };
        paragraphs.push(text.trim_end().to_string());
    }
    debug!("Extracted text from {} pages", paragraphs.len());

    let docx = write_docx(&paragraphs)?;
    let filename = format!("{}{}", staged.stem, Format::Docx.extension());
    Ok(Outcome::single(Artifact::new(filename, docx)))
}

/// Handler for Plain Text → Word.
pub fn txt_to_docx(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    let docx = txt_bytes_to_docx(staged.bytes)?;
    let filename = format!("{}{}", staged.stem, Format::Docx.extension());
    Ok(Outcome::single(Artifact::new(filename, docx)))
}

/// Handler for Plain Text → PDF: Text→Word, then Word→PDF. The first
/// stage's failure (bad encoding) surfaces before the engine is touched.
pub fn txt_to_pdf(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    let docx = txt_bytes_to_docx(staged.bytes)?;

    let docx_path = staged.work_dir.join(format!("{}.docx", staged.stem));
    std::fs::write(&docx_path, &docx)
        .map_err(|e| FlexifileError::Internal(format!("staging intermediate docx: {e}")))?;

    let pdf = office::render_pdf(&docx_path, staged.work_dir, staged.config)?;
    let filename = format!("{}{}", staged.stem, Format::Pdf.extension());
    Ok(Outcome::single(Artifact::new(filename, pdf)))
}

/// Decode the text strictly and wrap it as a one-paragraph document.
fn txt_bytes_to_docx(bytes: &[u8]) -> Result<Vec<u8>, FlexifileError> {
    let text = std::str::from_utf8(bytes).map_err(|e| FlexifileError::MalformedInput {
        format: Format::Txt,
        detail: format!("input is not valid UTF-8: {e}"),
    })?;
    write_docx(&[text.to_string()])
}

// ── Minimal OOXML writer ─────────────────────────────────────────────────

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Build a .docx package with one `<w:p>` per entry in `paragraphs`.
pub(crate) fn write_docx(paragraphs: &[String]) -> Result<Vec<u8>, FlexifileError> {
    let mut body = String::new();
    for text in paragraphs {
        if text.is_empty() {
            body.push_str("<w:p/>");
        } else {
            body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
            body.push_str(&xml_escape(text));
            body.push_str("</w:t></w:r></w:p>");
        }
    }
    let document_xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let failed = |e: zip::result::ZipError| FlexifileError::ConversionFailed {
        detail: format!("docx packaging: {e}"),
    };
    let io_failed = |e: std::io::Error| FlexifileError::ConversionFailed {
        detail: format!("docx packaging: {e}"),
    };

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("[Content_Types].xml", options)
        .map_err(failed)?;
    writer
        .write_all(CONTENT_TYPES_XML.as_bytes())
        .map_err(io_failed)?;
    writer.start_file("_rels/.rels", options).map_err(failed)?;
    writer
        .write_all(PACKAGE_RELS_XML.as_bytes())
        .map_err(io_failed)?;
    writer
        .start_file("word/document.xml", options)
        .map_err(failed)?;
    writer
        .write_all(document_xml.as_bytes())
        .map_err(io_failed)?;

    Ok(writer.finish().map_err(failed)?.into_inner())
}

/// Escape text for XML content, dropping control characters XML 1.0 forbids.
fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}
