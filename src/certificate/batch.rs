//! Batch certificate generation.
//!
//! [`prepare`] turns a recipient selection into a [`BatchRun`] holding one
//! pending job per recipient. [`BatchRun::run`] then renders the jobs one at
//! a time, in selection order:
//!
//! ```text
//! pending -> processing -> completed
//!                       -> error
//! ```
//!
//! A failed job is recorded and the run moves on; nothing aborts the batch.
//! Progress is published after every job on a watch channel and through the
//! optional event observer.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use utoipa::ToSchema;

use super::common::{certificate_filename, format_long_date, generate_certificate_id, today_long_date};
use super::compositor::{DEFAULT_BADGE, DEFAULT_EVENT_NAME, DEFAULT_LOCATION, DEFAULT_ORGANIZER};
use super::data::{CertificateConfig, CertificateData, CertificateKind, Event, Volunteer};
use super::template::CertificateTemplate;
use super::traits::Renderer;
use super::validation::{validate_selection, ValidationErrors};
use super::{CertificateError, GeneratedCertificate};

/// Stable address of a job inside its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct JobId(pub usize);

impl JobId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    fn can_move_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Error)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
enum JobState {
    Pending,
    Processing,
    Completed(Box<GeneratedCertificate>),
    Error(String),
}

impl JobState {
    fn status(&self) -> JobStatus {
        match self {
            JobState::Pending => JobStatus::Pending,
            JobState::Processing => JobStatus::Processing,
            JobState::Completed(_) => JobStatus::Completed,
            JobState::Error(_) => JobStatus::Error,
        }
    }
}

/// One recipient's certificate within a batch.
#[derive(Debug, Clone)]
pub struct CertificateJob {
    id: JobId,
    pub recipient: Volunteer,
    pub event: Option<Event>,
    pub certificate_type: CertificateKind,
    pub milestone_hours: Option<u32>,
    /// Position by total hours across the roster, 1 = most hours.
    pub rank: Option<u32>,
    state: JobState,
}

impl CertificateJob {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn status(&self) -> JobStatus {
        self.state.status()
    }

    /// The generated document; present only once the job completed.
    pub fn result(&self) -> Option<&GeneratedCertificate> {
        match &self.state {
            JobState::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// Failure reason; present only when the job ended in error.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            JobState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn filename(&self) -> String {
        certificate_filename(&self.recipient.first_name, &self.recipient.last_name)
    }

    /// Build the data record for this job.
    ///
    /// A new certificate id and issue date are generated on every call, so
    /// this runs right before the job is rendered.
    pub fn certificate_data(&self, config: &CertificateConfig) -> CertificateData {
        let issue_date = today_long_date();
        let kind = self.certificate_type;
        let event = self.event.as_ref();

        let location = event
            .and_then(|e| e.location.as_deref())
            .filter(|l| !l.trim().is_empty())
            .or(Some(config.location.as_str()).filter(|l| !l.trim().is_empty()))
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();

        let organizer_name = if config.organizer_name.trim().is_empty() {
            DEFAULT_ORGANIZER.to_string()
        } else {
            config.organizer_name.trim().to_string()
        };

        let hours_contributed = match (kind, event.and_then(|e| e.duration_hours)) {
            (CertificateKind::Milestone, _) => self.milestone_hours.unwrap_or_default() as f64,
            (CertificateKind::Participation, Some(duration)) => duration,
            _ => self.recipient.total_hours,
        };

        let badge_type = (kind == CertificateKind::Achievement).then(|| {
            config
                .badge_type
                .clone()
                .filter(|b| !b.trim().is_empty())
                .or_else(|| self.recipient.badges.last().cloned())
                .unwrap_or_else(|| DEFAULT_BADGE.to_string())
        });

        let total_hours = match kind {
            CertificateKind::Milestone => self.milestone_hours.map(f64::from),
            CertificateKind::Achievement => Some(self.recipient.total_hours),
            _ => None,
        };

        let rank = matches!(kind, CertificateKind::Achievement | CertificateKind::Milestone)
            .then_some(self.rank)
            .flatten();

        CertificateData {
            volunteer_name: self.recipient.full_name(),
            event_name: event
                .map(|e| e.name.clone())
                .unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string()),
            event_date: event
                .map(|e| format_long_date(e.date))
                .unwrap_or_else(|| issue_date.clone()),
            location,
            organizer_name,
            hours_contributed,
            certificate_id: generate_certificate_id(),
            issue_date,
            badge_type,
            total_hours,
            rank,
        }
    }
}

/// Aggregate progress of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    /// Jobs that left `pending` and `processing`.
    pub processed: usize,
    pub completed: usize,
    pub failed: usize,
    /// Finished jobs as a percentage of all jobs, rounded down.
    pub percent: u8,
}

impl BatchProgress {
    fn from_jobs(jobs: &[CertificateJob]) -> Self {
        let mut progress = BatchProgress {
            total: jobs.len(),
            ..Default::default()
        };
        for job in jobs {
            match job.status() {
                JobStatus::Pending => progress.pending += 1,
                JobStatus::Processing => progress.processing += 1,
                JobStatus::Completed => progress.completed += 1,
                JobStatus::Error => progress.failed += 1,
            }
        }
        progress.processed = progress.completed + progress.failed;
        progress.percent = if progress.total == 0 {
            100
        } else {
            (progress.processed * 100 / progress.total) as u8
        };
        progress
    }

    pub fn is_finished(&self) -> bool {
        self.processed == self.total
    }
}

/// Notification emitted after each job transition.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    JobStarted { job: JobId },
    JobCompleted { job: JobId },
    JobFailed { job: JobId, error: String },
    Progress(BatchProgress),
}

/// Competition ranking by total hours (1, 2, 2, 4), keyed by volunteer id.
pub fn rank_by_hours(volunteers: &[Volunteer]) -> HashMap<String, u32> {
    let mut sorted: Vec<&Volunteer> = volunteers.iter().collect();
    sorted.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));

    let mut ranks = HashMap::with_capacity(sorted.len());
    let mut previous: Option<(f64, u32)> = None;
    for (position, volunteer) in sorted.into_iter().enumerate() {
        let rank = match previous {
            Some((hours, rank)) if hours == volunteer.total_hours => rank,
            _ => position as u32 + 1,
        };
        previous = Some((volunteer.total_hours, rank));
        ranks.entry(volunteer.id.clone()).or_insert(rank);
    }
    ranks
}

/// Create a run with one pending job per selected volunteer.
///
/// Ranks are computed once here over the selection plus `roster`.
/// Configuration problems reject the whole batch before any job exists.
pub fn prepare(
    selection: &[Volunteer],
    config: &CertificateConfig,
    roster: &[Volunteer],
) -> Result<BatchRun, CertificateError> {
    let mut errors = ValidationErrors::new();
    validate_selection(selection, "volunteers", &mut errors);
    config.collect_errors(&mut errors);
    errors.into_result().map_err(CertificateError::Validation)?;

    let mut seen = HashSet::new();
    let everyone: Vec<Volunteer> = selection
        .iter()
        .chain(roster)
        .filter(|v| seen.insert(v.id.clone()))
        .cloned()
        .collect();
    let ranks = rank_by_hours(&everyone);

    let event = match config.certificate_type {
        CertificateKind::Participation => config.event.clone(),
        _ => None,
    };
    let milestone_hours = match config.certificate_type {
        CertificateKind::Milestone => config.milestone_hours,
        _ => None,
    };

    let jobs = selection
        .iter()
        .enumerate()
        .map(|(index, volunteer)| CertificateJob {
            id: JobId(index),
            recipient: volunteer.clone(),
            event: event.clone(),
            certificate_type: config.certificate_type,
            milestone_hours,
            rank: ranks.get(&volunteer.id).copied(),
            state: JobState::Pending,
        })
        .collect::<Vec<_>>();

    debug!("prepared {} certificate job(s)", jobs.len());
    Ok(BatchRun::new(config.clone(), jobs))
}

/// The jobs of one batch run and their shared configuration.
#[derive(Debug)]
pub struct BatchRun {
    config: CertificateConfig,
    jobs: Vec<CertificateJob>,
    progress: watch::Sender<BatchProgress>,
}

impl BatchRun {
    fn new(config: CertificateConfig, jobs: Vec<CertificateJob>) -> Self {
        let (progress, _) = watch::channel(BatchProgress::from_jobs(&jobs));
        Self {
            config,
            jobs,
            progress,
        }
    }

    pub fn config(&self) -> &CertificateConfig {
        &self.config
    }

    pub fn jobs(&self) -> &[CertificateJob] {
        &self.jobs
    }

    pub fn job(&self, id: JobId) -> Option<&CertificateJob> {
        self.jobs.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn progress(&self) -> BatchProgress {
        BatchProgress::from_jobs(&self.jobs)
    }

    pub fn is_finished(&self) -> bool {
        self.progress().is_finished()
    }

    /// Receiver that always holds the latest published progress.
    pub fn watch(&self) -> watch::Receiver<BatchProgress> {
        self.progress.subscribe()
    }

    /// Progress updates as a stream.
    pub fn subscribe(&self) -> WatchStream<BatchProgress> {
        WatchStream::new(self.progress.subscribe())
    }

    pub fn completed(&self) -> impl Iterator<Item = &CertificateJob> {
        self.jobs
            .iter()
            .filter(|job| job.status() == JobStatus::Completed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &CertificateJob> {
        self.jobs.iter().filter(|job| job.status() == JobStatus::Error)
    }

    pub fn into_jobs(self) -> Vec<CertificateJob> {
        self.jobs
    }

    fn transition(&mut self, id: JobId, next: JobState) -> Result<(), CertificateError> {
        let job = self
            .jobs
            .get_mut(id.0)
            .ok_or(CertificateError::UnknownJob(id.0))?;

        let from = job.status();
        let to = next.status();
        if !from.can_move_to(to) {
            return Err(CertificateError::InvalidTransition { job: id.0, from, to });
        }

        job.state = next;
        self.progress.send_replace(BatchProgress::from_jobs(&self.jobs));
        Ok(())
    }

    /// Move a pending job to `processing`.
    pub fn begin(&mut self, id: JobId) -> Result<(), CertificateError> {
        self.transition(id, JobState::Processing)
    }

    /// Attach the generated document to a processing job.
    pub fn complete(&mut self, id: JobId, result: GeneratedCertificate) -> Result<(), CertificateError> {
        self.transition(id, JobState::Completed(Box::new(result)))
    }

    /// Record why a processing job failed.
    pub fn fail(&mut self, id: JobId, message: impl Into<String>) -> Result<(), CertificateError> {
        self.transition(id, JobState::Error(message.into()))
    }

    /// Render every pending job in order.
    pub async fn run<R: Renderer>(
        &mut self,
        template: &CertificateTemplate,
        renderer: &R,
    ) -> Result<BatchProgress, CertificateError> {
        self.run_with(template, renderer, |_| {}).await
    }

    /// Render every pending job in order, reporting each transition.
    ///
    /// Control is yielded to the runtime once a job is marked `processing`
    /// and again after it finishes. A single document is always drawn in
    /// one piece.
    pub async fn run_with<R, F>(
        &mut self,
        template: &CertificateTemplate,
        renderer: &R,
        mut on_event: F,
    ) -> Result<BatchProgress, CertificateError>
    where
        R: Renderer,
        F: FnMut(&BatchEvent),
    {
        info!(
            "starting certificate batch: {} job(s), template '{}'",
            self.jobs.len(),
            template.id
        );

        for index in 0..self.jobs.len() {
            let id = JobId(index);
            if self.jobs[index].status() != JobStatus::Pending {
                continue;
            }

            self.begin(id)?;
            on_event(&BatchEvent::JobStarted { job: id });
            tokio::task::yield_now().await;

            let job = &self.jobs[index];
            let data = job.certificate_data(&self.config);
            let filename = job.filename();

            match renderer.render(template, &data) {
                Ok(pdf) => {
                    debug!("job {} rendered {} bytes", index, pdf.len());
                    self.complete(id, GeneratedCertificate { filename, data, pdf })?;
                    on_event(&BatchEvent::JobCompleted { job: id });
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!("certificate job {} failed: {}", index, message);
                    self.fail(id, message.clone())?;
                    on_event(&BatchEvent::JobFailed {
                        job: id,
                        error: message,
                    });
                }
            }

            let progress = self.progress();
            on_event(&BatchEvent::Progress(progress));
            info!(
                "certificate batch progress: {}/{} ({}%)",
                progress.processed,
                progress.total,
                progress.percent
            );

            tokio::task::yield_now().await;
        }

        let progress = self.progress();
        info!(
            "certificate batch finished: {} completed, {} failed",
            progress.completed, progress.failed
        );
        Ok(progress)
    }
}
