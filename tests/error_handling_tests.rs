#[cfg(test)]
mod error_handling_tests {
    use volunteer_certificates::certificate::{CertificateError, JobStatus, SurfaceError};
    use volunteer_certificates::config::{AppConfig, ConfigError};
    use volunteer_certificates::ErrorResponse;

    #[test]
    fn test_error_response_envelope() {
        let error_response = ErrorResponse::bad_request("No recipients selected");
        assert_eq!(error_response.error, "BadRequest");
        assert_eq!(error_response.message, "No recipients selected");
        assert!(chrono::DateTime::parse_from_rfc3339(&error_response.timestamp).is_ok());

        let json = serde_json::to_value(ErrorResponse::internal_error("boom")).unwrap();
        assert_eq!(json["error"], "InternalServerError");
    }

    #[test]
    fn test_certificate_error_messages() {
        let err = CertificateError::InvalidTransition {
            job: 3,
            from: JobStatus::Completed,
            to: JobStatus::Processing,
        };
        assert_eq!(err.to_string(), "job 3 cannot move from completed to processing");
        assert!(!err.is_validation());

        let err: CertificateError = SurfaceError::InvalidText("Ana\u{7}".into()).into();
        assert!(matches!(err, CertificateError::Surface(_)));
    }

    #[test]
    fn test_malformed_stagger_is_config_error() {
        let err = AppConfig::from_lookup(|key| {
            (key == "DOWNLOAD_STAGGER_MS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: "DOWNLOAD_STAGGER_MS", .. }));
    }
}
