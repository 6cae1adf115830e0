//! Certificate compositor.
//!
//! Draws one landscape page from a template and a [`CertificateData`]
//! record. Regions are drawn in a fixed order, later regions on top of
//! earlier ones:
//!
//! 1. background, borders, edge pattern, corner emblems
//! 2. logo emblem with organization name and tagline
//! 3. title heading
//! 4. body panel (recipient, achievement sentence, details)
//! 5. signature block with seal
//! 6. footer with id, issue date, verification URL and QR glyph
//!
//! Every render builds a fresh [`Surface`]; nothing is kept between calls.

use std::sync::Arc;

use super::data::{CertificateData, CertificateKind};
use super::ornament::{corner_decorations, routines_for};
use super::surface::{fit_font_size, text_width, Align, Font, Paint, Surface, SurfaceError};
use super::template::{CertificateTemplate, Color};
use crate::export::preview_data_uri;

pub const DEFAULT_EVENT_NAME: &str = "Community Service";
pub const DEFAULT_LOCATION: &str = "Various Locations";
pub const DEFAULT_ORGANIZER: &str = "Volunteer Coordinator";
pub const DEFAULT_BADGE: &str = "Outstanding Volunteer";

const TEXT_DARK: Color = Color::hex(0x1F2937);
const TEXT_MUTED: Color = Color::hex(0x6B7280);

const PANEL_X: f32 = 110.0;
const PANEL_Y: f32 = 196.0;
const PANEL_WIDTH: f32 = 622.0;
const PANEL_HEIGHT: f32 = 212.0;

const SIGNATURE_LINE_Y: f32 = 462.0;
const SEAL_Y: f32 = 460.0;

const FOOTER_X: f32 = 70.0;
const FOOTER_Y: f32 = 508.0;
const FOOTER_HEIGHT: f32 = 36.0;

const QR_CELLS: usize = 7;
const QR_CELL: f32 = 4.0;

/// Organization details printed on every certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct Branding {
    pub organization_name: String,
    pub tagline: String,
    /// Two-letter monogram drawn inside the seal.
    pub monogram: String,
    pub verify_base_url: String,
    pub representative_name: String,
    pub representative_title: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            organization_name: "Volunteer Hub".to_string(),
            tagline: "Making a Difference Together".to_string(),
            monogram: "VH".to_string(),
            verify_base_url: "https://volunteerhub.org".to_string(),
            representative_name: "Dr. Sarah Johnson".to_string(),
            representative_title: "Executive Director".to_string(),
        }
    }
}

impl Branding {
    pub fn verify_url(&self) -> String {
        format!("{}/verify", self.verify_base_url.trim_end_matches('/'))
    }
}

/// Stateless certificate drawer.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    branding: Arc<Branding>,
}

impl Compositor {
    pub fn new(branding: Branding) -> Self {
        Self {
            branding: Arc::new(branding),
        }
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    /// Bind a template and data record into a document handle.
    ///
    /// Drawing happens when the handle's bytes or preview are requested.
    pub fn compose(&self, template: &CertificateTemplate, data: CertificateData) -> DocumentHandle {
        DocumentHandle {
            template: template.clone(),
            data,
            branding: Arc::clone(&self.branding),
        }
    }
}

/// A composed certificate ready to be rendered.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    template: CertificateTemplate,
    data: CertificateData,
    branding: Arc<Branding>,
}

impl DocumentHandle {
    pub fn data(&self) -> &CertificateData {
        &self.data
    }

    pub fn template(&self) -> &CertificateTemplate {
        &self.template
    }

    pub fn into_data(self) -> CertificateData {
        self.data
    }

    /// Render the full page to PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut surface = Surface::new();
        let page = Page {
            template: &self.template,
            data: &self.data,
            branding: &self.branding,
        };

        page.background(&mut surface)?;
        page.logo(&mut surface)?;
        page.title(&mut surface)?;
        page.body(&mut surface)?;
        page.signatures(&mut surface)?;
        page.footer(&mut surface)?;

        surface.finish(&format!("Certificate {}", self.data.certificate_id))
    }

    /// Render the page as an inline `data:` URI.
    pub fn to_preview_data_uri(&self) -> Result<String, SurfaceError> {
        self.to_bytes().map(|pdf| preview_data_uri(&pdf))
    }
}

/// Format hours without a trailing `.0` for whole numbers.
pub fn format_hours(hours: f64) -> String {
    let hours = hours.max(0.0);
    if hours.fract() == 0.0 {
        format!("{hours:.0}")
    } else {
        format!("{hours:.1}")
    }
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Sentence describing what the certificate recognises.
pub fn achievement_sentence(kind: CertificateKind, data: &CertificateData) -> String {
    let ranked = |sentence: String| match data.rank {
        Some(rank) => format!("{sentence}, ranking #{rank} among our volunteers"),
        None => sentence,
    };

    match kind {
        CertificateKind::Participation => format!(
            "for outstanding participation in {}",
            or_fallback(&data.event_name, DEFAULT_EVENT_NAME)
        ),
        CertificateKind::Achievement => ranked(format!(
            "for earning the {} badge through exceptional dedication",
            data.badge_type
                .as_deref()
                .map(|badge| or_fallback(badge, DEFAULT_BADGE))
                .unwrap_or(DEFAULT_BADGE)
        )),
        CertificateKind::Leadership => {
            "for exemplary leadership and for inspiring others in service to the community"
                .to_string()
        }
        CertificateKind::Milestone => ranked(format!(
            "for reaching the milestone of {} volunteer hours",
            format_hours(data.total_hours.unwrap_or(data.hours_contributed))
        )),
    }
}

struct Page<'a> {
    template: &'a CertificateTemplate,
    data: &'a CertificateData,
    branding: &'a Branding,
}

impl Page<'_> {
    fn center_x(&self, surface: &Surface) -> f32 {
        surface.width() / 2.0
    }

    fn background(&self, s: &mut Surface) -> Result<(), SurfaceError> {
        let t = self.template;
        let (width, height) = (s.width(), s.height());

        s.set_fill(t.background_color)?;
        s.rect(0.0, 0.0, width, height, Paint::Fill)?;

        s.set_stroke(t.primary_color)?;
        s.set_line_width(3.0)?;
        s.rect(15.0, 15.0, width - 30.0, height - 30.0, Paint::Stroke)?;
        s.set_stroke(t.secondary_color)?;
        s.set_line_width(1.0)?;
        s.rect(27.0, 27.0, width - 54.0, height - 54.0, Paint::Stroke)?;

        let routines = routines_for(t);
        (routines.pattern)(s, t)?;
        corner_decorations(s, t)
    }

    fn logo(&self, s: &mut Surface) -> Result<(), SurfaceError> {
        let t = self.template;
        let b = self.branding;
        let (cx, cy) = (t.logo_position.x, t.logo_position.y);

        s.set_fill(t.secondary_color)?;
        s.circle(cx, cy, 22.0, Paint::Fill)?;
        s.set_fill(t.primary_color)?;
        s.circle(cx, cy, 18.0, Paint::Fill)?;
        s.set_stroke(Color::WHITE)?;
        s.set_line_width(1.0)?;
        s.circle(cx, cy, 13.0, Paint::Stroke)?;
        s.set_fill(Color::WHITE)?;
        s.text(&b.monogram, cx, cy + 4.0, Font::SansBold, 11.0, Align::Center)?;

        let name_width = text_width(&b.organization_name, Font::SansBold, 12.0)
            .max(text_width(&b.tagline, Font::SansOblique, 8.0));
        let half_rule = name_width / 2.0 + 20.0;
        s.set_stroke(t.secondary_color)?;
        s.set_line_width(0.8)?;
        s.line(cx - half_rule, cy + 29.0, cx + half_rule, cy + 29.0)?;
        s.line(cx - half_rule, cy + 56.0, cx + half_rule, cy + 56.0)?;

        s.set_fill(t.primary_color)?;
        s.text(&b.organization_name, cx, cy + 41.0, Font::SansBold, 12.0, Align::Center)?;
        s.set_fill(TEXT_MUTED)?;
        s.text(&b.tagline, cx, cy + 51.0, Font::SansOblique, 8.0, Align::Center)
    }

    fn title(&self, s: &mut Surface) -> Result<(), SurfaceError> {
        let t = self.template;
        let (cx, y) = (t.title_position.x, t.title_position.y);
        let heading = t.kind.heading();
        let size = fit_font_size(&heading, Font::SerifBold, 28.0, 18.0, 560.0);
        let half_rule = (text_width(&heading, Font::SerifBold, size) / 2.0 + 30.0).min(320.0);

        s.set_stroke(t.secondary_color)?;
        s.set_line_width(1.2)?;
        s.set_fill(t.secondary_color)?;
        for rule_y in [y - 28.0, y + 12.0] {
            s.line(cx - half_rule, rule_y, cx + half_rule, rule_y)?;
            for end_x in [cx - half_rule, cx + half_rule] {
                s.polygon(
                    &[
                        (end_x, rule_y - 3.0),
                        (end_x + 3.0, rule_y),
                        (end_x, rule_y + 3.0),
                        (end_x - 3.0, rule_y),
                    ],
                    Paint::Fill,
                )?;
            }
        }

        s.set_fill(t.primary_color)?;
        s.text(&heading, cx, y, Font::SerifBold, size, Align::Center)
    }

    fn body(&self, s: &mut Surface) -> Result<(), SurfaceError> {
        let t = self.template;
        let d = self.data;
        let cx = self.center_x(s);

        s.save()?;
        s.set_alpha(0.8)?;
        s.set_fill(Color::WHITE)?;
        s.set_stroke(t.secondary_color.lighten(0.4))?;
        s.set_line_width(1.0)?;
        s.rounded_rect(PANEL_X, PANEL_Y, PANEL_WIDTH, PANEL_HEIGHT, 12.0, Paint::FillStroke)?;
        s.restore()?;

        s.set_fill(TEXT_MUTED)?;
        s.text(
            "This certificate is proudly presented to",
            cx,
            PANEL_Y + 22.0,
            Font::SansOblique,
            11.0,
            Align::Center,
        )?;

        s.set_fill(t.primary_color.lighten(0.85))?;
        s.rect(cx - 231.0, PANEL_Y + 32.0, 462.0, 38.0, Paint::Fill)?;
        let name = or_fallback(&d.volunteer_name, "Volunteer");
        let name_size = fit_font_size(name, Font::SerifBold, 28.0, 14.0, 440.0);
        s.set_fill(t.primary_color)?;
        s.text(name, cx, PANEL_Y + 59.0, Font::SerifBold, name_size, Align::Center)?;

        let sentence = achievement_sentence(t.kind, d);
        let sentence_size = fit_font_size(&sentence, Font::Sans, 12.0, 8.0, 580.0);
        s.set_fill(TEXT_DARK)?;
        s.text(&sentence, cx, PANEL_Y + 90.0, Font::Sans, sentence_size, Align::Center)?;

        self.detail_strip(s, cx)?;

        s.set_fill(TEXT_MUTED)?;
        s.text(
            "Your dedication and service make our community a better place.",
            cx,
            PANEL_Y + 190.0,
            Font::SerifItalic,
            11.0,
            Align::Center,
        )
    }

    fn detail_strip(&self, s: &mut Surface, cx: f32) -> Result<(), SurfaceError> {
        let t = self.template;
        let d = self.data;
        let top = PANEL_Y + 106.0;
        let left_x = cx - 131.0;
        let right_x = cx + 131.0;

        s.set_stroke(t.secondary_color.lighten(0.3))?;
        s.set_line_width(0.6)?;
        s.line(cx, top, cx, top + 56.0)?;

        let hours = format!("{} hours", format_hours(d.hours_contributed));
        let cells = [
            (left_x, top + 8.0, "EVENT", or_fallback(&d.event_name, DEFAULT_EVENT_NAME)),
            (left_x, top + 38.0, "DATE", d.event_date.as_str()),
            (right_x, top + 8.0, "LOCATION", or_fallback(&d.location, DEFAULT_LOCATION)),
            (right_x, top + 38.0, "HOURS CONTRIBUTED", hours.as_str()),
        ];

        for (x, y, label, value) in cells {
            s.set_fill(t.secondary_color)?;
            s.text(label, x, y, Font::SansBold, 7.5, Align::Center)?;
            let size = fit_font_size(value, Font::Sans, 11.0, 7.0, 240.0);
            s.set_fill(TEXT_DARK)?;
            s.text(value, x, y + 13.0, Font::Sans, size, Align::Center)?;
        }

        Ok(())
    }

    fn signatures(&self, s: &mut Surface) -> Result<(), SurfaceError> {
        let t = self.template;
        let b = self.branding;
        let cx = self.center_x(s);

        let columns = [
            (
                cx - 186.0,
                or_fallback(&self.data.organizer_name, DEFAULT_ORGANIZER),
                "Event Organizer",
            ),
            (
                cx + 186.0,
                b.representative_name.as_str(),
                b.representative_title.as_str(),
            ),
        ];

        for (x, name, title) in columns {
            s.set_stroke(TEXT_DARK)?;
            s.set_line_width(0.8)?;
            s.line(x - 95.0, SIGNATURE_LINE_Y, x + 95.0, SIGNATURE_LINE_Y)?;
            let size = fit_font_size(name, Font::SansBold, 11.0, 7.0, 190.0);
            s.set_fill(TEXT_DARK)?;
            s.text(name, x, SIGNATURE_LINE_Y + 14.0, Font::SansBold, size, Align::Center)?;
            s.set_fill(TEXT_MUTED)?;
            s.text(title, x, SIGNATURE_LINE_Y + 26.0, Font::Sans, 9.0, Align::Center)?;
        }

        (routines_for(t).seal)(s, t, cx, SEAL_Y, &b.monogram)
    }

    fn footer(&self, s: &mut Surface) -> Result<(), SurfaceError> {
        let t = self.template;
        let d = self.data;
        let b = self.branding;
        let width = s.width() - FOOTER_X * 2.0;
        let right = FOOTER_X + width;

        s.set_fill(t.primary_color)?;
        s.rect(FOOTER_X, FOOTER_Y, width, FOOTER_HEIGHT, Paint::Fill)?;

        s.set_fill(Color::WHITE)?;
        s.text(
            &format!("Certificate ID: {}", d.certificate_id),
            FOOTER_X + 14.0,
            FOOTER_Y + 15.0,
            Font::SansBold,
            8.0,
            Align::Left,
        )?;
        s.text(
            &format!("Issued: {}", d.issue_date),
            FOOTER_X + 14.0,
            FOOTER_Y + 27.0,
            Font::Sans,
            8.0,
            Align::Left,
        )?;
        s.text(
            &format!("Verify at {}", b.verify_url()),
            self.center_x(s),
            FOOTER_Y + 21.0,
            Font::Sans,
            8.0,
            Align::Center,
        )?;

        let qr_size = QR_CELLS as f32 * QR_CELL;
        let qr_x = right - qr_size - 6.0;
        let qr_y = FOOTER_Y + (FOOTER_HEIGHT - qr_size) / 2.0;
        s.text(
            &format!("Powered by {}", b.organization_name),
            qr_x - 10.0,
            FOOTER_Y + 21.0,
            Font::SansOblique,
            7.0,
            Align::Right,
        )?;
        self.qr_glyph(s, qr_x, qr_y)
    }

    /// Fixed checkerboard glyph standing in for a QR code.
    fn qr_glyph(&self, s: &mut Surface, x: f32, y: f32) -> Result<(), SurfaceError> {
        let size = QR_CELLS as f32 * QR_CELL;
        s.set_fill(Color::WHITE)?;
        s.rect(x, y, size, size, Paint::Fill)?;

        s.set_fill(TEXT_DARK)?;
        for row in 0..QR_CELLS {
            for col in 0..QR_CELLS {
                if (row + col) % 2 == 0 {
                    s.rect(
                        x + col as f32 * QR_CELL,
                        y + row as f32 * QR_CELL,
                        QR_CELL,
                        QR_CELL,
                        Paint::Fill,
                    )?;
                }
            }
        }
        Ok(())
    }
}
