//! Built-in certificate templates.
//!
//! The catalog is fixed at build time. Callers select a template by id; an
//! omitted or unknown id resolves to the first entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use utoipa::ToSchema;

use super::data::CertificateKind;

/// Page width in points (A4 landscape).
pub const PAGE_WIDTH: f32 = 842.0;
/// Page height in points (A4 landscape).
pub const PAGE_HEIGHT: f32 = 595.0;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xFFFFFF);

    /// Build a color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Components scaled to the 0..=1 range used by PDF color operators.
    pub fn components(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Mix this color towards white; `amount` of 1.0 yields white.
    pub fn lighten(&self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount).round() as u8;
        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Anchor position in page units, measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Ornamentation family of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    Standard,
    Modern,
    Elegant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificateTemplate {
    pub id: String,
    pub name: String,
    pub kind: CertificateKind,
    pub background_color: Color,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub logo_position: Point,
    pub title_position: Point,
    pub layout_variant: LayoutVariant,
}

/// Template as exposed to API clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CertificateKind,
    pub background_color: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub logo_position: Point,
    pub title_position: Point,
    pub layout_variant: LayoutVariant,
}

impl From<&CertificateTemplate> for TemplateSummary {
    fn from(template: &CertificateTemplate) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            kind: template.kind,
            background_color: template.background_color.to_string(),
            primary_color: template.primary_color.to_string(),
            secondary_color: template.secondary_color.to_string(),
            logo_position: template.logo_position,
            title_position: template.title_position,
            layout_variant: template.layout_variant,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn template(
    id: &str,
    name: &str,
    kind: CertificateKind,
    background: u32,
    primary: u32,
    secondary: u32,
    title_y: f32,
    layout_variant: LayoutVariant,
) -> CertificateTemplate {
    CertificateTemplate {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        background_color: Color::hex(background),
        primary_color: Color::hex(primary),
        secondary_color: Color::hex(secondary),
        logo_position: Point::new(PAGE_WIDTH / 2.0, 72.0),
        title_position: Point::new(PAGE_WIDTH / 2.0, title_y),
        layout_variant,
    }
}

static TEMPLATES: OnceLock<Vec<CertificateTemplate>> = OnceLock::new();

/// All built-in templates, in display order.
pub fn list_templates() -> &'static [CertificateTemplate] {
    TEMPLATES.get_or_init(|| {
        vec![
            template(
                "classic-participation",
                "Classic Participation",
                CertificateKind::Participation,
                0xFFFDF7,
                0x1E3A8A,
                0xD4A017,
                168.0,
                LayoutVariant::Standard,
            ),
            template(
                "modern-achievement",
                "Modern Achievement",
                CertificateKind::Achievement,
                0xF8FAFC,
                0x0F766E,
                0xF59E0B,
                168.0,
                LayoutVariant::Modern,
            ),
            template(
                "elegant-leadership",
                "Elegant Leadership",
                CertificateKind::Leadership,
                0xFDF8F3,
                0x7C2D12,
                0xB45309,
                170.0,
                LayoutVariant::Elegant,
            ),
            template(
                "milestone-celebration",
                "Milestone Celebration",
                CertificateKind::Milestone,
                0xF5F3FF,
                0x5B21B6,
                0xEAB308,
                168.0,
                LayoutVariant::Modern,
            ),
            template(
                "community-heart",
                "Community Heart",
                CertificateKind::Participation,
                0xFFF7F7,
                0xBE123C,
                0xFB923C,
                170.0,
                LayoutVariant::Elegant,
            ),
        ]
    })
}

/// Look up a built-in template by id.
pub fn find_template(id: &str) -> Option<&'static CertificateTemplate> {
    list_templates().iter().find(|t| t.id == id)
}

/// Resolve a template selection, falling back to the first catalog entry.
pub fn resolve_template(id: Option<&str>) -> &'static CertificateTemplate {
    let templates = list_templates();
    id.and_then(find_template).unwrap_or(&templates[0])
}
