//! Request-level façade over the compositor and the batch orchestrator.

use log::info;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::batch::{prepare, BatchProgress, BatchRun, JobStatus};
use super::compositor::{Branding, Compositor};
use super::data::{CertificateConfig, CertificateData, Volunteer};
use super::template::resolve_template;
use super::{CertificateError, GeneratedCertificate};
use crate::export::ExportFile;

/// Request body for a single certificate or preview.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SingleCertificateRequest {
    /// Template id; unknown or missing ids use the first built-in template.
    #[serde(default)]
    pub template_id: Option<String>,
    pub volunteer: Volunteer,
    #[serde(flatten)]
    pub config: CertificateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchCertificateRequest {
    #[serde(default)]
    pub template_id: Option<String>,
    /// Recipients, in the order their certificates are generated.
    pub volunteers: Vec<Volunteer>,
    /// Wider volunteer list used for ranking; the selection is always included.
    #[serde(default)]
    pub roster: Vec<Volunteer>,
    #[serde(flatten)]
    pub config: CertificateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDocument {
    pub certificate_id: String,
    pub filename: String,
    /// `data:application/pdf;base64,...`
    pub data_uri: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub index: usize,
    pub recipient_id: String,
    pub volunteer_name: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<ExportFile>,
}

/// Summary of a finished batch.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub template_id: String,
    pub progress: BatchProgress,
    pub jobs: Vec<JobReport>,
    /// Suggested pause between consecutive downloads on the client.
    pub download_stagger_ms: u64,
}

impl BatchReport {
    fn from_run(template_id: &str, run: BatchRun, download_stagger_ms: u64) -> Self {
        let progress = run.progress();
        let jobs = run
            .jobs()
            .iter()
            .map(|job| {
                let result = job.result();
                JobReport {
                    index: job.id().index(),
                    recipient_id: job.recipient.id.clone(),
                    volunteer_name: job.recipient.full_name(),
                    status: job.status(),
                    certificate_id: result.map(|r| r.data.certificate_id.clone()),
                    error: job.error().map(String::from),
                    file: result.map(|r| ExportFile::pdf(r.filename.clone(), &r.pdf)),
                }
            })
            .collect();

        Self {
            template_id: template_id.to_string(),
            progress,
            jobs,
            download_stagger_ms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CertificateService {
    compositor: Compositor,
    download_stagger_ms: u64,
}

impl Default for CertificateService {
    fn default() -> Self {
        Self::new(Branding::default(), crate::config::DEFAULT_DOWNLOAD_STAGGER_MS)
    }
}

impl CertificateService {
    pub fn new(branding: Branding, download_stagger_ms: u64) -> Self {
        Self {
            compositor: Compositor::new(branding),
            download_stagger_ms,
        }
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Validate the request and build the record one certificate would carry.
    fn single_data(
        &self,
        request: &SingleCertificateRequest,
    ) -> Result<(String, CertificateData), CertificateError> {
        let run = prepare(
            std::slice::from_ref(&request.volunteer),
            &request.config,
            &[],
        )?;
        let job = run
            .jobs()
            .first()
            .ok_or(CertificateError::UnknownJob(0))?;
        Ok((job.filename(), job.certificate_data(&request.config)))
    }

    /// Generate one certificate as PDF bytes.
    pub fn generate(
        &self,
        request: &SingleCertificateRequest,
    ) -> Result<GeneratedCertificate, CertificateError> {
        let template = resolve_template(request.template_id.as_deref());
        let (filename, data) = self.single_data(request)?;

        let handle = self.compositor.compose(template, data);
        let pdf = handle.to_bytes()?;
        info!(
            "generated certificate {} with template '{}'",
            handle.data().certificate_id,
            template.id
        );

        Ok(GeneratedCertificate {
            filename,
            data: handle.into_data(),
            pdf,
        })
    }

    /// Render one certificate as an inline preview.
    pub fn preview(
        &self,
        request: &SingleCertificateRequest,
    ) -> Result<PreviewDocument, CertificateError> {
        let template = resolve_template(request.template_id.as_deref());
        let (filename, data) = self.single_data(request)?;

        let handle = self.compositor.compose(template, data);
        let data_uri = handle.to_preview_data_uri()?;

        Ok(PreviewDocument {
            certificate_id: handle.data().certificate_id.clone(),
            filename,
            data_uri,
        })
    }

    /// Generate a certificate for every selected volunteer.
    ///
    /// Per-job drawing failures are reported inside the result; only an
    /// invalid configuration fails the whole call.
    pub async fn run_batch(
        &self,
        request: &BatchCertificateRequest,
    ) -> Result<BatchReport, CertificateError> {
        let template = resolve_template(request.template_id.as_deref());
        let mut run = prepare(&request.volunteers, &request.config, &request.roster)?;

        run.run(template, &self.compositor).await?;

        Ok(BatchReport::from_run(
            &template.id,
            run,
            self.download_stagger_ms,
        ))
    }
}
