//! Records consumed and produced by certificate generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::validation::{validate_milestone_hours, validate_required, ValidationErrors};

/// Kind of recognition a certificate expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CertificateKind {
    #[serde(alias = "event")]
    Participation,
    Achievement,
    Leadership,
    Milestone,
}

impl CertificateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participation => "participation",
            Self::Achievement => "achievement",
            Self::Leadership => "leadership",
            Self::Milestone => "milestone",
        }
    }

    /// Heading drawn in the title block.
    pub fn heading(&self) -> String {
        format!("Certificate of {}", self.as_str()).to_uppercase()
    }
}

impl fmt::Display for CertificateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Volunteer record supplied by the CRUD layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub total_hours: f64,
    /// Earned badge names, oldest first.
    #[serde(default)]
    pub badges: Vec<String>,
}

impl Volunteer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Event record supplied by the CRUD layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
}

/// Settings shared by every certificate in a single or batch request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateConfig {
    pub certificate_type: CertificateKind,
    /// Event the certificates refer to; only used for participation.
    #[serde(default)]
    pub event: Option<Event>,
    #[serde(default)]
    pub organizer_name: String,
    #[serde(default)]
    pub location: String,
    /// Required for milestone certificates.
    #[serde(default)]
    pub milestone_hours: Option<u32>,
    /// Badge named on achievement certificates.
    #[serde(default)]
    pub badge_type: Option<String>,
}

impl CertificateConfig {
    pub fn new(certificate_type: CertificateKind) -> Self {
        Self {
            certificate_type,
            event: None,
            organizer_name: String::new(),
            location: String::new(),
            milestone_hours: None,
            badge_type: None,
        }
    }

    pub(crate) fn collect_errors(&self, errors: &mut ValidationErrors) {
        if self.certificate_type == CertificateKind::Milestone {
            validate_milestone_hours(self.milestone_hours, "milestoneHours", errors);
        }
        if self.certificate_type == CertificateKind::Participation {
            if let Some(event) = &self.event {
                validate_required(&event.name, "event.name", "Event name", errors);
            }
        }
    }
}

/// Everything drawn onto one certificate.
///
/// `certificate_id` and `issue_date` are fixed when the record is built, so
/// rendering the same record twice yields the same document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CertificateData {
    pub volunteer_name: String,
    pub event_name: String,
    pub event_date: String,
    pub location: String,
    pub organizer_name: String,
    pub hours_contributed: f64,
    pub certificate_id: String,
    pub issue_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}
