//! Decorative routines: edge patterns, corner emblems, and seals.
//!
//! Each layout variant maps to exactly one pattern routine and one seal
//! routine through [`routines_for`]. Templates that are not part of the
//! built-in catalog get the dotted pattern.

use super::surface::{Align, Font, Paint, Surface, SurfaceError};
use super::template::{find_template, CertificateTemplate, Color, LayoutVariant};

/// Distance of the ornament band from the page edge.
const PATTERN_INSET: f32 = 38.0;
/// Edge length kept free of pattern marks near each corner.
const CORNER_CLEARANCE: f32 = 78.0;
/// Distance of corner emblems from the page edge.
const CORNER_INSET: f32 = 48.0;

pub type PatternFn = fn(&mut Surface, &CertificateTemplate) -> Result<(), SurfaceError>;
pub type SealFn = fn(&mut Surface, &CertificateTemplate, f32, f32, &str) -> Result<(), SurfaceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternStyle {
    Laurel,
    Geometric,
    Flourish,
    Dotted,
}

#[derive(Debug, Clone, Copy)]
pub struct Routines {
    pub pattern_style: PatternStyle,
    pub pattern: PatternFn,
    pub seal: SealFn,
}

const VARIANT_ROUTINES: [(LayoutVariant, Routines); 3] = [
    (
        LayoutVariant::Standard,
        Routines {
            pattern_style: PatternStyle::Laurel,
            pattern: laurel_pattern,
            seal: classic_seal,
        },
    ),
    (
        LayoutVariant::Modern,
        Routines {
            pattern_style: PatternStyle::Geometric,
            pattern: geometric_pattern,
            seal: banded_seal,
        },
    ),
    (
        LayoutVariant::Elegant,
        Routines {
            pattern_style: PatternStyle::Flourish,
            pattern: flourish_pattern,
            seal: beaded_seal,
        },
    ),
];

const DEFAULT_ROUTINES: Routines = Routines {
    pattern_style: PatternStyle::Dotted,
    pattern: dotted_pattern,
    seal: classic_seal,
};

/// Routines used to ornament `template`.
pub fn routines_for(template: &CertificateTemplate) -> Routines {
    if find_template(&template.id).is_none() {
        return DEFAULT_ROUTINES;
    }

    VARIANT_ROUTINES
        .iter()
        .find(|(variant, _)| *variant == template.layout_variant)
        .map(|(_, routines)| *routines)
        .unwrap_or(DEFAULT_ROUTINES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Call `mark` at evenly spaced points along all four edges.
fn tile_edges<F>(surface: &mut Surface, spacing: f32, mut mark: F) -> Result<(), SurfaceError>
where
    F: FnMut(&mut Surface, f32, f32, Edge, usize) -> Result<(), SurfaceError>,
{
    let (width, height) = (surface.width(), surface.height());

    let horizontal = marks_between(CORNER_CLEARANCE, width - CORNER_CLEARANCE, spacing);
    for (index, x) in horizontal.iter().enumerate() {
        mark(surface, *x, PATTERN_INSET, Edge::Top, index)?;
        mark(surface, *x, height - PATTERN_INSET, Edge::Bottom, index)?;
    }

    let vertical = marks_between(CORNER_CLEARANCE, height - CORNER_CLEARANCE, spacing);
    for (index, y) in vertical.iter().enumerate() {
        mark(surface, PATTERN_INSET, *y, Edge::Left, index)?;
        mark(surface, width - PATTERN_INSET, *y, Edge::Right, index)?;
    }

    Ok(())
}

/// Positions from `start` to `end`, centred so both ends get equal margin.
fn marks_between(start: f32, end: f32, spacing: f32) -> Vec<f32> {
    if end <= start || spacing <= 0.0 {
        return Vec::new();
    }
    let count = ((end - start) / spacing).floor() as usize + 1;
    let used = (count - 1) as f32 * spacing;
    let offset = start + (end - start - used) / 2.0;
    (0..count).map(|i| offset + i as f32 * spacing).collect()
}

fn star_points(cx: f32, cy: f32, outer: f32, inner: f32) -> Vec<(f32, f32)> {
    (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = -std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 5.0;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

fn diamond_points(cx: f32, cy: f32, rx: f32, ry: f32) -> Vec<(f32, f32)> {
    vec![(cx, cy - ry), (cx + rx, cy), (cx, cy + ry), (cx - rx, cy)]
}

fn laurel_pattern(surface: &mut Surface, template: &CertificateTemplate) -> Result<(), SurfaceError> {
    surface.set_fill(template.secondary_color)?;
    tile_edges(surface, 26.0, |s, x, y, edge, _| {
        // Leaves lean along the edge they sit on.
        let (dx, dy) = match edge {
            Edge::Top | Edge::Bottom => (3.5, 0.0),
            Edge::Left | Edge::Right => (0.0, 3.5),
        };
        s.polygon(&diamond_points(x - dx, y - dy, 3.0, 1.6), Paint::Fill)?;
        s.polygon(&diamond_points(x + dx, y + dy, 3.0, 1.6), Paint::Fill)
    })
}

fn geometric_pattern(surface: &mut Surface, template: &CertificateTemplate) -> Result<(), SurfaceError> {
    let primary = template.primary_color;
    let secondary = template.secondary_color;
    surface.set_line_width(0.8)?;
    tile_edges(surface, 22.0, |s, x, y, _, index| {
        if index % 2 == 0 {
            s.set_fill(secondary)?;
            s.polygon(&diamond_points(x, y, 3.5, 3.5), Paint::Fill)
        } else {
            s.set_stroke(primary)?;
            s.rect(x - 2.5, y - 2.5, 5.0, 5.0, Paint::Stroke)
        }
    })
}

fn flourish_pattern(surface: &mut Surface, template: &CertificateTemplate) -> Result<(), SurfaceError> {
    let primary = template.primary_color;
    let secondary = template.secondary_color;
    surface.set_line_width(0.6)?;
    tile_edges(surface, 30.0, |s, x, y, _, index| {
        s.set_stroke(secondary)?;
        s.circle(x, y, 4.0, Paint::Stroke)?;
        s.set_fill(if index % 3 == 0 { primary } else { secondary })?;
        s.circle(x, y, 1.4, Paint::Fill)
    })
}

fn dotted_pattern(surface: &mut Surface, template: &CertificateTemplate) -> Result<(), SurfaceError> {
    surface.set_fill(template.secondary_color)?;
    tile_edges(surface, 18.0, |s, x, y, _, _| s.circle(x, y, 1.8, Paint::Fill))
}

/// Concentric circles with a star glyph in each corner.
pub fn corner_decorations(
    surface: &mut Surface,
    template: &CertificateTemplate,
) -> Result<(), SurfaceError> {
    let (width, height) = (surface.width(), surface.height());
    let corners = [
        (CORNER_INSET, CORNER_INSET),
        (width - CORNER_INSET, CORNER_INSET),
        (CORNER_INSET, height - CORNER_INSET),
        (width - CORNER_INSET, height - CORNER_INSET),
    ];

    for (cx, cy) in corners {
        surface.set_line_width(1.4)?;
        surface.set_stroke(template.primary_color)?;
        surface.circle(cx, cy, 17.0, Paint::Stroke)?;
        surface.set_line_width(0.8)?;
        surface.set_stroke(template.secondary_color)?;
        surface.circle(cx, cy, 12.0, Paint::Stroke)?;
        surface.set_fill(template.secondary_color)?;
        surface.polygon(&star_points(cx, cy, 7.0, 3.0), Paint::Fill)?;
    }

    Ok(())
}

fn monogram(
    surface: &mut Surface,
    cx: f32,
    cy: f32,
    text: &str,
    color: Color,
) -> Result<(), SurfaceError> {
    surface.set_fill(color)?;
    surface.text(text, cx, cy + 7.0, Font::SerifBold, 20.0, Align::Center)
}

fn classic_seal(
    surface: &mut Surface,
    template: &CertificateTemplate,
    cx: f32,
    cy: f32,
    text: &str,
) -> Result<(), SurfaceError> {
    surface.set_fill(template.primary_color)?;
    surface.circle(cx, cy, 34.0, Paint::Fill)?;
    surface.set_line_width(1.5)?;
    surface.set_stroke(template.secondary_color)?;
    surface.circle(cx, cy, 29.0, Paint::Stroke)?;
    monogram(surface, cx, cy, text, Color::WHITE)
}

fn banded_seal(
    surface: &mut Surface,
    template: &CertificateTemplate,
    cx: f32,
    cy: f32,
    text: &str,
) -> Result<(), SurfaceError> {
    surface.set_fill(template.secondary_color)?;
    surface.circle(cx, cy, 36.0, Paint::Fill)?;
    surface.set_fill(template.primary_color)?;
    surface.circle(cx, cy, 30.0, Paint::Fill)?;
    surface.set_line_width(0.8)?;
    surface.set_stroke(Color::WHITE)?;
    surface.circle(cx, cy, 25.0, Paint::Stroke)?;
    monogram(surface, cx, cy, text, Color::WHITE)
}

fn beaded_seal(
    surface: &mut Surface,
    template: &CertificateTemplate,
    cx: f32,
    cy: f32,
    text: &str,
) -> Result<(), SurfaceError> {
    surface.set_fill(template.secondary_color)?;
    for i in 0..16 {
        let angle = i as f32 * std::f32::consts::TAU / 16.0;
        surface.circle(cx + 38.0 * angle.cos(), cy + 38.0 * angle.sin(), 1.8, Paint::Fill)?;
    }
    surface.set_fill(template.background_color)?;
    surface.set_stroke(template.primary_color)?;
    surface.set_line_width(2.0)?;
    surface.circle(cx, cy, 33.0, Paint::FillStroke)?;
    surface.set_line_width(0.8)?;
    surface.circle(cx, cy, 28.0, Paint::Stroke)?;
    monogram(surface, cx, cy, text, template.primary_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::template::list_templates;

    #[test]
    fn test_each_variant_has_distinct_pattern() {
        let styles: Vec<_> = VARIANT_ROUTINES.iter().map(|(_, r)| r.pattern_style).collect();
        assert_eq!(
            styles,
            vec![
                PatternStyle::Laurel,
                PatternStyle::Geometric,
                PatternStyle::Flourish
            ]
        );
    }

    #[test]
    fn test_registry_templates_use_variant_routines() {
        for template in list_templates() {
            let routines = routines_for(template);
            assert_ne!(routines.pattern_style, PatternStyle::Dotted, "{}", template.id);
        }
    }

    #[test]
    fn test_unknown_template_uses_dotted_pattern() {
        let mut template = list_templates()[1].clone();
        template.id = "custom-unlisted".into();
        assert_eq!(routines_for(&template).pattern_style, PatternStyle::Dotted);
    }

    #[test]
    fn test_marks_between_is_centred() {
        let marks = marks_between(0.0, 100.0, 30.0);
        assert_eq!(marks.len(), 4);
        assert!((marks[0] - 5.0).abs() < 0.001);
        assert!((marks[3] - 95.0).abs() < 0.001);
        assert!(marks_between(10.0, 5.0, 3.0).is_empty());
    }

    #[test]
    fn test_every_pattern_draws() {
        let template = &list_templates()[0];
        let routines = VARIANT_ROUTINES
            .iter()
            .map(|(_, r)| *r)
            .chain(std::iter::once(DEFAULT_ROUTINES));

        for r in routines {
            let mut surface = Surface::new();
            (r.pattern)(&mut surface, template).unwrap();
            (r.seal)(&mut surface, template, 421.0, 470.0, "VH").unwrap();
            assert!(surface.operation_count() > 50, "{:?}", r.pattern_style);
        }
    }
}
