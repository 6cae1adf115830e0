//! Single-page PDF drawing surface.
//!
//! A `Surface` is created at the start of one document, receives every
//! drawing call, and is consumed by [`Surface::finish`] which returns the
//! encoded PDF. Coordinates are page units (points) measured from the
//! top-left corner; the surface flips them into PDF space.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::collections::BTreeSet;
use thiserror::Error;

use super::template::{Color, PAGE_HEIGHT, PAGE_WIDTH};

/// Upper bound on content operations for a single page.
pub const MAX_OPERATIONS: usize = 200_000;

/// Bezier control-point factor for quarter circles.
const KAPPA: f32 = 0.552_284_8;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("text contains control characters: {0:?}")]
    InvalidText(String),
    #[error("page exceeds {MAX_OPERATIONS} drawing operations")]
    CapacityExceeded,
    #[error("failed to encode page content: {0}")]
    Encode(String),
    #[error("failed to write PDF: {0}")]
    Write(String),
}

/// Base-14 fonts registered on every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Sans,
    SansBold,
    SansOblique,
    Serif,
    SerifBold,
    SerifItalic,
}

impl Font {
    const ALL: [Font; 6] = [
        Font::Sans,
        Font::SansBold,
        Font::SansOblique,
        Font::Serif,
        Font::SerifBold,
        Font::SerifItalic,
    ];

    fn resource_name(&self) -> &'static str {
        match self {
            Font::Sans => "F1",
            Font::SansBold => "F2",
            Font::SansOblique => "F3",
            Font::Serif => "F4",
            Font::SerifBold => "F5",
            Font::SerifItalic => "F6",
        }
    }

    fn base_font(&self) -> &'static str {
        match self {
            Font::Sans => "Helvetica",
            Font::SansBold => "Helvetica-Bold",
            Font::SansOblique => "Helvetica-Oblique",
            Font::Serif => "Times-Roman",
            Font::SerifBold => "Times-Bold",
            Font::SerifItalic => "Times-Italic",
        }
    }

    /// Width scale relative to regular Helvetica.
    fn width_factor(&self) -> f32 {
        match self {
            Font::Sans | Font::SansOblique => 1.0,
            Font::SansBold => 1.06,
            Font::Serif | Font::SerifItalic => 0.9,
            Font::SerifBold => 0.96,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
    FillStroke,
}

impl Paint {
    fn operator(&self) -> &'static str {
        match self {
            Paint::Fill => "f",
            Paint::Stroke => "S",
            Paint::FillStroke => "B",
        }
    }
}

// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Approximate rendered width of `text` in points.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|ch| match ch as u32 {
            code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize] as u32,
            _ => 556,
        })
        .sum();
    units as f32 / 1000.0 * size * font.width_factor()
}

/// Largest size in `min..=size` at which `text` fits in `max_width`.
pub fn fit_font_size(text: &str, font: Font, size: f32, min: f32, max_width: f32) -> f32 {
    let width = text_width(text, font, size);
    if width <= max_width || width <= 0.0 {
        return size;
    }
    (size * max_width / width).max(min)
}

/// Encode text to WinAnsi bytes; unsupported characters become `?`.
fn encode_win_ansi(text: &str) -> Result<Vec<u8>, SurfaceError> {
    if text.chars().any(char::is_control) {
        return Err(SurfaceError::InvalidText(text.to_string()));
    }

    Ok(text
        .chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{A0}'..='\u{FF}' => ch as u32 as u8,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect())
}

/// Drawing surface for one certificate page.
#[derive(Debug, Default)]
pub struct Surface {
    operations: Vec<Operation>,
    alpha_states: BTreeSet<u8>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> f32 {
        PAGE_WIDTH
    }

    pub fn height(&self) -> f32 {
        PAGE_HEIGHT
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) -> Result<(), SurfaceError> {
        if self.operations.len() >= MAX_OPERATIONS {
            return Err(SurfaceError::CapacityExceeded);
        }
        self.operations.push(Operation::new(operator, operands));
        Ok(())
    }

    fn flip(y: f32) -> f32 {
        PAGE_HEIGHT - y
    }

    pub fn save(&mut self) -> Result<(), SurfaceError> {
        self.push("q", vec![])
    }

    pub fn restore(&mut self) -> Result<(), SurfaceError> {
        self.push("Q", vec![])
    }

    pub fn set_fill(&mut self, color: Color) -> Result<(), SurfaceError> {
        let [r, g, b] = color.components();
        self.push("rg", vec![r.into(), g.into(), b.into()])
    }

    pub fn set_stroke(&mut self, color: Color) -> Result<(), SurfaceError> {
        let [r, g, b] = color.components();
        self.push("RG", vec![r.into(), g.into(), b.into()])
    }

    pub fn set_line_width(&mut self, width: f32) -> Result<(), SurfaceError> {
        self.push("w", vec![width.into()])
    }

    /// Set fill and stroke opacity until the enclosing `restore`.
    pub fn set_alpha(&mut self, alpha: f32) -> Result<(), SurfaceError> {
        let percent = (alpha.clamp(0.0, 1.0) * 100.0).round() as u8;
        self.alpha_states.insert(percent);
        self.push("gs", vec![format!("GA{percent}").as_str().into()])
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) -> Result<(), SurfaceError> {
        self.push(
            "re",
            vec![x.into(), Self::flip(y + h).into(), w.into(), h.into()],
        )?;
        self.push(paint.operator(), vec![])
    }

    pub fn rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        paint: Paint,
    ) -> Result<(), SurfaceError> {
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        let k = r * KAPPA;
        let (left, right, top, bottom) = (x, x + w, y, y + h);

        self.move_to(left + r, top)?;
        self.line_to(right - r, top)?;
        self.curve_to(right - r + k, top, right, top + r - k, right, top + r)?;
        self.line_to(right, bottom - r)?;
        self.curve_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom)?;
        self.line_to(left + r, bottom)?;
        self.curve_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r)?;
        self.line_to(left, top + r)?;
        self.curve_to(left, top + r - k, left + r - k, top, left + r, top)?;
        self.push("h", vec![])?;
        self.push(paint.operator(), vec![])
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Result<(), SurfaceError> {
        self.move_to(x1, y1)?;
        self.line_to(x2, y2)?;
        self.push("S", vec![])
    }

    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32, paint: Paint) -> Result<(), SurfaceError> {
        let k = radius * KAPPA;
        self.move_to(cx + radius, cy)?;
        self.curve_to(cx + radius, cy + k, cx + k, cy + radius, cx, cy + radius)?;
        self.curve_to(cx - k, cy + radius, cx - radius, cy + k, cx - radius, cy)?;
        self.curve_to(cx - radius, cy - k, cx - k, cy - radius, cx, cy - radius)?;
        self.curve_to(cx + k, cy - radius, cx + radius, cy - k, cx + radius, cy)?;
        self.push("h", vec![])?;
        self.push(paint.operator(), vec![])
    }

    /// Closed polygon through `points`.
    pub fn polygon(&mut self, points: &[(f32, f32)], paint: Paint) -> Result<(), SurfaceError> {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return Ok(());
        };
        self.move_to(x0, y0)?;
        for &(x, y) in rest {
            self.line_to(x, y)?;
        }
        self.push("h", vec![])?;
        self.push(paint.operator(), vec![])
    }

    fn move_to(&mut self, x: f32, y: f32) -> Result<(), SurfaceError> {
        self.push("m", vec![x.into(), Self::flip(y).into()])
    }

    fn line_to(&mut self, x: f32, y: f32) -> Result<(), SurfaceError> {
        self.push("l", vec![x.into(), Self::flip(y).into()])
    }

    fn curve_to(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
    ) -> Result<(), SurfaceError> {
        self.push(
            "c",
            vec![
                x1.into(),
                Self::flip(y1).into(),
                x2.into(),
                Self::flip(y2).into(),
                x3.into(),
                Self::flip(y3).into(),
            ],
        )
    }

    /// Draw `text` with its baseline at `y`, anchored at `x` per `align`.
    pub fn text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        align: Align,
    ) -> Result<(), SurfaceError> {
        let encoded = encode_win_ansi(text)?;
        let width = text_width(text, font, size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };

        self.push("BT", vec![])?;
        self.push("Tf", vec![font.resource_name().into(), size.into()])?;
        self.push("Td", vec![left.into(), Self::flip(y).into()])?;
        self.push("Tj", vec![Object::string_literal(encoded)])?;
        self.push("ET", vec![])
    }

    /// Encode the page into a complete PDF document.
    pub fn finish(self, title: &str) -> Result<Vec<u8>, SurfaceError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            fonts.set(
                font.resource_name(),
                dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => font.base_font(),
                    "Encoding" => "WinAnsiEncoding",
                },
            );
        }

        let mut resources = dictionary! { "Font" => fonts };
        if !self.alpha_states.is_empty() {
            let mut states = Dictionary::new();
            for percent in &self.alpha_states {
                let alpha = *percent as f32 / 100.0;
                states.set(
                    format!("GA{percent}"),
                    dictionary! {
                        "Type" => "ExtGState",
                        "ca" => alpha,
                        "CA" => alpha,
                    },
                );
            }
            resources.set("ExtGState", states);
        }

        let content = Content {
            operations: self.operations,
        };
        let encoded = content
            .encode()
            .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                PAGE_WIDTH.into(),
                PAGE_HEIGHT.into(),
            ],
            "Contents" => content_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(title)?),
            "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| SurfaceError::Write(e.to_string()))?;
        Ok(buffer)
    }
}
