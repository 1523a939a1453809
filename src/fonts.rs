//! Font registration and text measurement.
//!
//! Captions are centered horizontally, which needs the rendered width of the
//! caption string. For fonts registered from TTF files the widths come from the
//! font's own glyph metrics; for the built-in Times-Roman default they come
//! from the standard Adobe AFM width table, since the PDF built-in carries no
//! embedded metrics.

use crate::config::FontRegistration;
use anyhow::{anyhow, Context, Result};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use printpdf::{BuiltinFont, IndirectFontRef, PdfDocumentReference};
use std::collections::HashMap;

/// A font usable for captions: its PDF resource handle plus enough metric
/// information to measure text.
pub struct BookFont {
    pub font_ref: IndirectFontRef,
    metrics: Metrics,
}

enum Metrics {
    /// Built-in Times-Roman, measured from the AFM width table below.
    TimesRoman,
    /// An embedded TTF, measured from its glyph advances.
    Face(OwnedFace),
}

/// All fonts registered with the document, addressable by config name.
pub struct FontCatalog {
    fonts: HashMap<String, BookFont>,
}

impl FontCatalog {
    /// Register the built-in Times-Roman plus every configured TTF with `doc`.
    pub fn load(
        doc: &PdfDocumentReference,
        registrations: &[FontRegistration],
    ) -> Result<FontCatalog> {
        let mut fonts = HashMap::new();

        let times = doc
            .add_builtin_font(BuiltinFont::TimesRoman)
            .with_context(|| "Failed to register built-in Times-Roman")?;
        fonts.insert(
            "Times-Roman".to_string(),
            BookFont {
                font_ref: times,
                metrics: Metrics::TimesRoman,
            },
        );

        for registration in registrations {
            let data = std::fs::read(&registration.file).with_context(|| {
                format!("Failed to read font file {}", registration.file.display())
            })?;
            let font_ref = doc.add_external_font(data.as_slice()).with_context(|| {
                format!("Failed to embed font file {}", registration.file.display())
            })?;
            let face = OwnedFace::from_vec(data, 0).with_context(|| {
                format!("Failed to parse font file {}", registration.file.display())
            })?;
            fonts.insert(
                registration.name.clone(),
                BookFont {
                    font_ref,
                    metrics: Metrics::Face(face),
                },
            );
        }

        Ok(FontCatalog { fonts })
    }

    pub fn get(&self, name: &str) -> Result<&BookFont> {
        self.fonts.get(name).ok_or_else(|| {
            anyhow!("Unknown caption font \"{name}\" (register it under the `fonts:` config key)")
        })
    }
}

impl BookFont {
    /// Width of `text` at `size` points.
    pub fn width_of_text(&self, text: &str, size: f32) -> f32 {
        match &self.metrics {
            Metrics::TimesRoman => {
                let advances: f32 = text.chars().map(times_roman_advance).sum();
                advances / 1000.0 * size
            }
            Metrics::Face(face) => {
                let face = face.as_face_ref();
                let upem = f32::from(face.units_per_em());
                let advances: f32 = text
                    .chars()
                    .map(|ch| {
                        face.glyph_index(ch)
                            .and_then(|gid| face.glyph_hor_advance(gid))
                            .map(f32::from)
                            // missing glyph: assume half an em
                            .unwrap_or(upem * 0.5)
                    })
                    .sum();
                advances / upem * size
            }
        }
    }
}

/// Times-Roman AFM advance widths (per 1000 units of em) for ASCII 0x20-0x7E.
#[rustfmt::skip]
const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

fn times_roman_advance(ch: char) -> f32 {
    let code = ch as usize;
    if (0x20..=0x7e).contains(&code) {
        f32::from(TIMES_ROMAN_WIDTHS[code - 0x20])
    } else {
        // outside the ASCII range; assume half an em
        500.0
    }
}
