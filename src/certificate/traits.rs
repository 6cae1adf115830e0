//! Traits for the certificate pipeline seams.

use super::compositor::Compositor;
use super::data::CertificateData;
use super::template::CertificateTemplate;
use super::CertificateError;

/// Trait for anything that turns a template and data record into a document.
pub trait Renderer {
    /// Render one document.
    fn render(
        &self,
        template: &CertificateTemplate,
        data: &CertificateData,
    ) -> Result<Vec<u8>, CertificateError>;
}

impl Renderer for Compositor {
    fn render(
        &self,
        template: &CertificateTemplate,
        data: &CertificateData,
    ) -> Result<Vec<u8>, CertificateError> {
        Ok(self.compose(template, data.clone()).to_bytes()?)
    }
}
