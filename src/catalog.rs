//! Static format catalog: domains, formats, extensions, and legal pairs.
//!
//! The catalog is the authoritative answer to "may this conversion be
//! requested at all?". It captures the same matrix a UI presents to the
//! user — pick a domain, pick an input format, see which outputs are
//! reachable — as `const` tables rather than scattered string comparisons.
//! The [`crate::registry::Registry`] may implement fewer pairs than the
//! catalog lists; the orchestrator consults the catalog first and only then
//! resolves a handler.
//!
//! All data here is compile-time constant, shared freely across threads, and
//! has no side effects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category of file formats grouping related conversions.
///
/// Ordered as presented to users: documents first, vector graphics last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatDomain {
    Document,
    Presentation,
    Spreadsheet,
    RasterImage,
    VectorGraphics,
}

/// Canonical identifier for a file format.
///
/// Several informal names ("Microsoft Word", "Word document", ".doc") funnel
/// into one `Format`, and every `Format` has exactly one canonical extension
/// (see [`Format::extension`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    // Documents
    Docx,
    Odt,
    Rtf,
    Txt,
    Pdf,
    Html,
    // Presentations
    Pptx,
    Odp,
    // Spreadsheets
    Xlsx,
    Ods,
    Csv,
    Tsv,
    // Raster images
    Png,
    Jpeg,
    Bmp,
    Tiff,
    Gif,
    WebP,
    // Vector graphics
    Svg,
    Eps,
}

impl Format {
    /// The canonical file extension, dot included. Total over every format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Docx => ".docx",
            Format::Odt => ".odt",
            Format::Rtf => ".rtf",
            Format::Txt => ".txt",
            Format::Pdf => ".pdf",
            Format::Html => ".html",
            Format::Pptx => ".pptx",
            Format::Odp => ".odp",
            Format::Xlsx => ".xlsx",
            Format::Ods => ".ods",
            Format::Csv => ".csv",
            Format::Tsv => ".tsv",
            Format::Png => ".png",
            Format::Jpeg => ".jpg",
            Format::Bmp => ".bmp",
            Format::Tiff => ".tiff",
            Format::Gif => ".gif",
            Format::WebP => ".webp",
            Format::Svg => ".svg",
            Format::Eps => ".eps",
        }
    }

    /// Parse a user-supplied token: an extension with or without the dot,
    /// case-insensitive, accepting the common aliases ("jpeg", "htm", "tif").
    pub fn parse_token(token: &str) -> Option<Format> {
        let t = token.trim().trim_start_matches('.').to_ascii_lowercase();
        Some(match t.as_str() {
            "docx" | "doc" => Format::Docx,
            "odt" => Format::Odt,
            "rtf" => Format::Rtf,
            "txt" | "text" => Format::Txt,
            "pdf" => Format::Pdf,
            "html" | "htm" => Format::Html,
            "pptx" | "ppt" => Format::Pptx,
            "odp" => Format::Odp,
            "xlsx" | "xls" => Format::Xlsx,
            "ods" => Format::Ods,
            "csv" => Format::Csv,
            "tsv" => Format::Tsv,
            "png" => Format::Png,
            "jpg" | "jpeg" => Format::Jpeg,
            "bmp" => Format::Bmp,
            "tiff" | "tif" => Format::Tiff,
            "gif" => Format::Gif,
            "webp" => Format::WebP,
            "svg" => Format::Svg,
            "eps" => Format::Eps,
            _ => return None,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Docx => "Microsoft Word",
            Format::Odt => "OpenDocument Text",
            Format::Rtf => "Rich Text Format",
            Format::Txt => "Plain Text",
            Format::Pdf => "PDF",
            Format::Html => "HTML",
            Format::Pptx => "Microsoft PowerPoint",
            Format::Odp => "OpenDocument Presentation",
            Format::Xlsx => "Microsoft Excel",
            Format::Ods => "OpenDocument Spreadsheet",
            Format::Csv => "CSV",
            Format::Tsv => "TSV",
            Format::Png => "PNG",
            Format::Jpeg => "JPEG",
            Format::Bmp => "BMP",
            Format::Tiff => "TIFF",
            Format::Gif => "GIF",
            Format::WebP => "WebP",
            Format::Svg => "SVG",
            Format::Eps => "EPS",
        };
        write!(f, "{name} ({})", self.extension())
    }
}

impl fmt::Display for FormatDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormatDomain::Document => "Document",
            FormatDomain::Presentation => "Presentation",
            FormatDomain::Spreadsheet => "Spreadsheet",
            FormatDomain::RasterImage => "Raster Image",
            FormatDomain::VectorGraphics => "Vector Graphics",
        })
    }
}

// ── Legal-pair tables ────────────────────────────────────────────────────

use Format::*;

const DOCUMENT_PAIRS: &[(Format, &[Format])] = &[
    (Docx, &[Pdf, Rtf, Txt]),
    (Odt, &[Pdf, Docx]),
    (Rtf, &[Docx, Pdf]),
    (Txt, &[Docx, Pdf]),
    (Pdf, &[Docx, Txt]),
    (Html, &[Docx, Pdf]),
];

const PRESENTATION_PAIRS: &[(Format, &[Format])] = &[
    (Pptx, &[Pdf, Png]),
    (Odp, &[Pptx, Pdf]),
    (Pdf, &[Pptx, Png]),
];

const SPREADSHEET_PAIRS: &[(Format, &[Format])] = &[
    (Xlsx, &[Csv, Tsv, Pdf]),
    (Ods, &[Xlsx, Csv]),
    (Csv, &[Xlsx, Tsv]),
    (Tsv, &[Xlsx, Csv]),
];

const RASTER_PAIRS: &[(Format, &[Format])] = &[
    (Png, &[Jpeg, Bmp, Tiff, WebP]),
    (Jpeg, &[Png, Bmp, Tiff, WebP]),
    (Bmp, &[Png, Jpeg, Tiff]),
    (Tiff, &[Png, Jpeg, Bmp]),
    (Gif, &[Png, Jpeg]),
    (WebP, &[Png, Jpeg]),
];

const VECTOR_PAIRS: &[(Format, &[Format])] = &[
    (Svg, &[Png, Jpeg, Pdf]),
    (Eps, &[Pdf, Png]),
    (Pdf, &[Png, Jpeg]),
];

impl FormatDomain {
    /// Every domain, in presentation order.
    pub const ALL: [FormatDomain; 5] = [
        FormatDomain::Document,
        FormatDomain::Presentation,
        FormatDomain::Spreadsheet,
        FormatDomain::RasterImage,
        FormatDomain::VectorGraphics,
    ];

    fn pairs(self) -> &'static [(Format, &'static [Format])] {
        match self {
            FormatDomain::Document => DOCUMENT_PAIRS,
            FormatDomain::Presentation => PRESENTATION_PAIRS,
            FormatDomain::Spreadsheet => SPREADSHEET_PAIRS,
            FormatDomain::RasterImage => RASTER_PAIRS,
            FormatDomain::VectorGraphics => VECTOR_PAIRS,
        }
    }

    /// Valid input formats for this domain, in presentation order.
    pub fn input_formats(self) -> impl Iterator<Item = Format> {
        self.pairs().iter().map(|(input, _)| *input)
    }

    /// Output formats legally reachable from `input` in this domain.
    ///
    /// Empty when `input` has no defined outputs here — "no compatible
    /// formats", which the caller renders as such rather than an error.
    pub fn outputs_for(self, input: Format) -> &'static [Format] {
        self.pairs()
            .iter()
            .find(|(i, _)| *i == input)
            .map(|(_, outs)| *outs)
            .unwrap_or(&[])
    }

    /// True when (input → output) is a legal pair in this domain.
    pub fn allows(self, input: Format, output: Format) -> bool {
        self.outputs_for(input).contains(&output)
    }

    /// Parse a user-supplied domain name, case- and separator-insensitive.
    pub fn parse_token(token: &str) -> Option<FormatDomain> {
        let t: String = token
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Some(match t.as_str() {
            "document" | "documents" | "doc" => FormatDomain::Document,
            "presentation" | "presentations" | "slides" => FormatDomain::Presentation,
            "spreadsheet" | "spreadsheets" | "sheet" => FormatDomain::Spreadsheet,
            "rasterimage" | "raster" | "image" | "images" => FormatDomain::RasterImage,
            "vectorgraphics" | "vector" | "svg" => FormatDomain::VectorGraphics,
            _ => return None,
        })
    }
}

/// Ordered sequence of all domains.
pub fn domains() -> &'static [FormatDomain] {
    &FormatDomain::ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every format referenced anywhere in the catalog — inputs and outputs.
    fn referenced_formats() -> Vec<Format> {
        let mut all = Vec::new();
        for domain in domains() {
            for (input, outputs) in domain.pairs() {
                all.push(*input);
                all.extend_from_slice(outputs);
            }
        }
        all
    }

    #[test]
    fn extension_is_total_over_catalog() {
        for fmt in referenced_formats() {
            let ext = fmt.extension();
            assert!(ext.starts_with('.'), "{fmt:?}: bad extension {ext:?}");
            assert!(ext.len() >= 4, "{fmt:?}: bad extension {ext:?}");
        }
    }

    #[test]
    fn every_output_is_a_recognised_format_in_its_domain() {
        for domain in domains() {
            let recognised: Vec<Format> = domain
                .pairs()
                .iter()
                .flat_map(|(i, outs)| std::iter::once(*i).chain(outs.iter().copied()))
                .collect();
            for (input, outputs) in domain.pairs() {
                for out in *outputs {
                    assert!(
                        recognised.contains(out),
                        "{domain}: {input:?} lists unrecognised output {out:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn domains_are_ordered_and_stable() {
        let names: Vec<String> = domains().iter().map(|d| d.to_string()).collect();
        assert_eq!(
            names,
            [
                "Document",
                "Presentation",
                "Spreadsheet",
                "Raster Image",
                "Vector Graphics"
            ]
        );
    }

    #[test]
    fn unknown_input_has_no_compatible_formats() {
        assert!(FormatDomain::Document.outputs_for(Format::Png).is_empty());
        assert!(FormatDomain::Spreadsheet.outputs_for(Format::Svg).is_empty());
    }

    #[test]
    fn allows_matches_pair_tables() {
        assert!(FormatDomain::Document.allows(Format::Docx, Format::Pdf));
        assert!(!FormatDomain::Document.allows(Format::Docx, Format::Png));
        assert!(FormatDomain::RasterImage.allows(Format::Gif, Format::Png));
        assert!(!FormatDomain::RasterImage.allows(Format::Gif, Format::Tiff));
    }

    #[test]
    fn token_parsing_accepts_aliases() {
        assert_eq!(Format::parse_token(".JPEG"), Some(Format::Jpeg));
        assert_eq!(Format::parse_token("doc"), Some(Format::Docx));
        assert_eq!(Format::parse_token("exe"), None);
        assert_eq!(
            FormatDomain::parse_token("raster image"),
            Some(FormatDomain::RasterImage)
        );
        assert_eq!(FormatDomain::parse_token("nope"), None);
    }
}
