//! PowerPoint deck parsing: pull the text content out of a .pptx package.
//!
//! A .pptx is a zip of XML parts; each slide lives at
//! `ppt/slides/slideN.xml`. Only text survives this parser by design — the
//! presentation converters are documented text-only degradations. The
//! traversal mirrors the slide part structure: shapes (`p:sp`) in slide
//! order, paragraphs (`a:p`) in shape order, runs (`a:t`) joined with a
//! single space into one paragraph line.

use crate::catalog::Format;
use crate::error::FlexifileError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

/// Text content of one slide: shapes in slide order, each shape a list of
/// paragraph lines.
#[derive(Debug, Clone, Default)]
pub(crate) struct Slide {
    pub shapes: Vec<Vec<String>>,
}

impl Slide {
    /// Index of the title shape: the first shape in slide order with any
    /// non-empty text.
    fn title_shape(&self) -> Option<usize> {
        self.shapes
            .iter()
            .position(|shape| shape.iter().any(|p| !p.trim().is_empty()))
    }

    /// The slide title, if any shape has text.
    pub fn title(&self) -> Option<String> {
        let idx = self.title_shape()?;
        let joined = self.shapes[idx]
            .iter()
            .filter(|p| !p.trim().is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        Some(joined)
    }

    /// Body lines: every non-empty paragraph of every shape except the
    /// title shape, in shape order.
    pub fn body_lines(&self) -> Vec<&str> {
        let title_idx = self.title_shape();
        self.shapes
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != title_idx)
            .flat_map(|(_, shape)| shape.iter())
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
            .collect()
    }
}

/// Parse every slide of a .pptx, ordered by slide number.
pub(crate) fn parse_deck(bytes: &[u8]) -> Result<Vec<Slide>, FlexifileError> {
    let malformed = |detail: String| FlexifileError::MalformedInput {
        format: Format::Pptx,
        detail,
    };

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| malformed(format!("not a pptx package: {e}")))?;

    // Slide parts are not stored in order; sort by their number.
    let mut slide_names: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let num = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((num, name.to_string()))
        })
        .collect();
    slide_names.sort_unstable_by_key(|(num, _)| *num);

    let mut slides = Vec::with_capacity(slide_names.len());
    for (num, name) in slide_names {
        let mut xml = String::new();
        archive
            .by_name(&name)
            .map_err(|e| malformed(format!("slide {num}: {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| malformed(format!("slide {num}: {e}")))?;
        slides.push(parse_slide(&xml).map_err(|e| malformed(format!("slide {num}: {e}")))?);
    }
    Ok(slides)
}

/// Walk one slide part, collecting shape/paragraph/run text.
fn parse_slide(xml: &str) -> Result<Slide, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut slide = Slide::default();

    let mut shape: Option<Vec<String>> = None;
    let mut runs: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"p:sp" => shape = Some(Vec::new()),
                b"a:p" => runs.clear(),
                b"a:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                if e.name().as_ref() == b"a:p" {
                    if let Some(paragraphs) = shape.as_mut() {
                        paragraphs.push(String::new());
                    }
                }
            }
            Event::Text(t) => {
                if in_text {
                    runs.push(t.unescape()?.into_owned());
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" => {
                    if let Some(paragraphs) = shape.as_mut() {
                        paragraphs.push(runs.join(" "));
                        runs.clear();
                    }
                }
                b"p:sp" => {
                    if let Some(paragraphs) = shape.take() {
                        slide.shapes.push(paragraphs);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(slide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_first_shape_with_text() {
        let slide = parse_slide(
            r#"<p:sld><p:cSld><p:spTree>
                <p:sp><p:txBody><a:p/></p:txBody></p:sp>
                <p:sp><p:txBody><a:p><a:r><a:t>Quarterly</a:t></a:r><a:r><a:t>Review</a:t></a:r></a:p></p:txBody></p:sp>
                <p:sp><p:txBody><a:p><a:r><a:t>revenue up</a:t></a:r></a:p><a:p><a:r><a:t>costs flat</a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#,
        )
        .unwrap();

        assert_eq!(slide.title().as_deref(), Some("Quarterly Review"));
        assert_eq!(slide.body_lines(), vec!["revenue up", "costs flat"]);
    }

    #[test]
    fn textless_slide_has_no_title() {
        let slide = parse_slide(
            r#"<p:sld><p:cSld><p:spTree><p:sp><p:txBody><a:p/></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
        )
        .unwrap();
        assert_eq!(slide.title(), None);
        assert!(slide.body_lines().is_empty());
    }

    #[test]
    fn deck_orders_slides_numerically_not_lexically() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        // slide10 stored before slide2: numeric order must win.
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, title) in [
            ("ppt/slides/slide10.xml", "Tenth"),
            ("ppt/slides/slide2.xml", "Second"),
        ] {
            writer
                .start_file(name, SimpleFileOptions::default())
                .unwrap();
            writer
                .write_all(crate::domains::tests::slide_xml(title, &[]).as_bytes())
                .unwrap();
        }
        let deck = writer.finish().unwrap().into_inner();

        let slides = parse_deck(&deck).unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title().as_deref(), Some("Second"));
        assert_eq!(slides[1].title().as_deref(), Some("Tenth"));
    }

    #[test]
    fn not_a_zip_is_malformed() {
        let err = parse_deck(b"plain bytes").unwrap_err();
        assert!(matches!(
            err,
            FlexifileError::MalformedInput {
                format: Format::Pptx,
                ..
            }
        ));
    }
}
