//! Certificate module - template-driven certificate documents and batch runs.
//!
//! This module contains:
//! - `template` - the built-in template catalog
//! - `ornament` - decorative routines dispatched by layout variant
//! - `compositor` - draws one certificate page from a template and a data record
//! - `batch` - drives the compositor over a list of recipients
//! - `service` - resolves requests into certificate data and documents

pub mod batch;
pub mod common;
pub mod compositor;
pub mod data;
pub mod handlers;
pub mod ornament;
pub mod service;
pub mod surface;
pub mod template;
pub mod traits;
pub mod validation;

pub use batch::{prepare, BatchEvent, BatchProgress, BatchRun, CertificateJob, JobId, JobStatus};
pub use compositor::{Branding, Compositor, DocumentHandle};
pub use data::{CertificateConfig, CertificateData, CertificateKind, Event, Volunteer};
pub use service::CertificateService;
pub use surface::SurfaceError;
pub use template::{
    find_template, list_templates, resolve_template, CertificateTemplate, LayoutVariant,
};
pub use traits::Renderer;

use thiserror::Error;

/// Errors that can occur while preparing or generating certificates.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("{0}")]
    Validation(String),
    #[error("drawing surface failed: {0}")]
    Surface(#[from] SurfaceError),
    #[error("job {job} cannot move from {from} to {to}")]
    InvalidTransition {
        job: usize,
        from: JobStatus,
        to: JobStatus,
    },
    #[error("job {0} does not exist in this batch")]
    UnknownJob(usize),
}

impl CertificateError {
    /// Whether the error was caused by caller input rather than by drawing.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result of a successful certificate generation.
#[derive(Debug, Clone)]
pub struct GeneratedCertificate {
    pub filename: String,
    pub data: CertificateData,
    pub pdf: Vec<u8>,
}
