mod common;

#[cfg(test)]
mod batch_tests {
    use crate::common::{cleanup_drive, drawn_text, volunteer};
    use tokio_stream::StreamExt;
    use volunteer_certificates::certificate::{
        prepare, BatchEvent, CertificateConfig, CertificateError, CertificateKind, Compositor,
        JobId, JobStatus, list_templates,
    };

    fn participation_config() -> CertificateConfig {
        CertificateConfig {
            event: Some(cleanup_drive()),
            organizer_name: "Marcus Reed".to_string(),
            ..CertificateConfig::new(CertificateKind::Participation)
        }
    }

    #[tokio::test]
    async fn test_cleanup_drive_batch_completes() {
        let selection = vec![
            volunteer("v-1", "Ana", "Lopez", 12.0),
            volunteer("v-2", "Ben", "Okafor", 30.0),
            volunteer("v-3", "Chloe", "Nguyen", 8.5),
        ];
        let config = participation_config();
        let mut run = prepare(&selection, &config, &[]).unwrap();

        let progress = run.run(&list_templates()[0], &Compositor::default()).await.unwrap();

        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 3);
        assert_eq!(progress.failed, 0);
        assert_eq!(progress.percent, 100);

        for (job, recipient) in run.jobs().iter().zip(&selection) {
            let result = job.result().unwrap();
            assert_eq!(result.data.volunteer_name, recipient.full_name());
            assert_eq!(result.data.event_name, "Cleanup Drive");
            assert_eq!(result.data.event_date, "January 15, 2024");
            assert_eq!(result.data.location, "Riverside Park");
            assert_eq!(result.data.organizer_name, "Marcus Reed");
            assert_eq!(result.data.hours_contributed, 4.0);
            assert!(result.pdf.starts_with(b"%PDF"));

            let text = drawn_text(&result.pdf);
            let has = |needle: &str| text.iter().any(|line| line.contains(needle));
            assert!(has(&recipient.full_name()), "name missing from {:?}", text);
            assert!(has("Cleanup Drive"));
            assert!(has("January 15, 2024"));
            assert!(has(&result.data.certificate_id));
        }

        let ids: std::collections::HashSet<_> = run
            .jobs()
            .iter()
            .map(|j| j.result().unwrap().data.certificate_id.clone())
            .collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(
            run.jobs()[1].result().unwrap().filename,
            "certificate-ben-okafor.pdf"
        );
    }

    #[tokio::test]
    async fn test_one_bad_recipient_does_not_stop_the_batch() {
        let selection = vec![
            volunteer("v-1", "Ana", "Lopez", 12.0),
            volunteer("v-2", "Ben", "Okafor", 30.0),
            volunteer("v-3", "Bad\u{7}", "Record", 1.0),
            volunteer("v-4", "Dee", "Park", 4.0),
            volunteer("v-5", "Eli", "Stone", 5.0),
        ];
        let mut run = prepare(&selection, &participation_config(), &[]).unwrap();

        let mut failures = Vec::new();
        let progress = run
            .run_with(&list_templates()[0], &Compositor::default(), |event| {
                if let BatchEvent::JobFailed { job, .. } = event {
                    failures.push(*job);
                }
            })
            .await
            .unwrap();

        assert_eq!(failures, vec![JobId(2)]);
        assert_eq!(progress.completed, 4);
        assert_eq!(progress.failed, 1);
        assert_eq!(progress.percent, 100);
        assert_eq!(run.jobs()[2].status(), JobStatus::Error);
        assert!(run.jobs()[2].error().is_some());
        assert_eq!(run.failed().count(), 1);
        assert_eq!(run.completed().count(), 4);
    }

    #[tokio::test]
    async fn test_progress_stream_reaches_completion() {
        let selection = vec![
            volunteer("v-1", "Ana", "Lopez", 12.0),
            volunteer("v-2", "Ben", "Okafor", 30.0),
        ];
        let mut run = prepare(&selection, &participation_config(), &[]).unwrap();
        let mut stream = run.subscribe();

        let first = stream.next().await.unwrap();
        assert_eq!(first.percent, 0);
        assert_eq!(first.pending, 2);

        run.run(&list_templates()[1], &Compositor::default()).await.unwrap();

        let last = stream.next().await.unwrap();
        assert_eq!(last.percent, 100);
        assert_eq!(last.completed, 2);
    }

    #[test]
    fn test_milestone_without_hours_rejected_before_jobs() {
        let selection = vec![volunteer("v-1", "Ana", "Lopez", 12.0)];
        let err = prepare(
            &selection,
            &CertificateConfig::new(CertificateKind::Milestone),
            &[],
        )
        .unwrap_err();

        assert!(matches!(err, CertificateError::Validation(_)));
        assert!(err.to_string().contains("milestoneHours"));
    }

    #[tokio::test]
    async fn test_milestone_carries_hours_and_rank() {
        let selection = vec![volunteer("v-1", "Ana", "Lopez", 120.0)];
        let roster = vec![
            volunteer("v-7", "Top", "Helper", 300.0),
            volunteer("v-8", "Other", "Helper", 10.0),
        ];
        let config = CertificateConfig {
            milestone_hours: Some(100),
            event: Some(cleanup_drive()),
            ..CertificateConfig::new(CertificateKind::Milestone)
        };
        let mut run = prepare(&selection, &config, &roster).unwrap();
        run.run(&list_templates()[3], &Compositor::default()).await.unwrap();

        let data = &run.jobs()[0].result().unwrap().data;
        assert_eq!(data.hours_contributed, 100.0);
        assert_eq!(data.total_hours, Some(100.0));
        assert_eq!(data.rank, Some(2));
        assert_eq!(data.event_name, "Community Service");
        assert_eq!(data.location, "Various Locations");
        assert_eq!(data.organizer_name, "Volunteer Coordinator");
    }
}
