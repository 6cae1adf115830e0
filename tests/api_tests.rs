#[cfg(test)]
mod api_integration_tests {
    use actix_web::{http::header, http::StatusCode, test, web, App};
    use serde_json::{json, Value};
    use volunteer_certificates::certificate::handlers;
    use volunteer_certificates::{AppState, ErrorResponse};

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::default()))
                    .service(web::scope("/api").configure(handlers::config)),
            )
            .await
        };
    }

    fn single_body(first_name: &str, certificate_type: &str) -> Value {
        json!({
            "templateId": "classic-participation",
            "volunteer": {
                "id": "v-1",
                "firstName": first_name,
                "lastName": "Lopez",
                "totalHours": 12.5
            },
            "certificateType": certificate_type,
            "event": {
                "id": "evt-1",
                "name": "Cleanup Drive",
                "date": "2024-01-15"
            },
            "organizerName": "Marcus Reed"
        })
    }

    #[actix_web::test]
    async fn test_list_templates() {
        let app = init_app!();
        let req = test::TestRequest::get()
            .uri("/api/certificates/templates")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let templates = body.as_array().unwrap();
        assert_eq!(templates.len(), 5);
        assert_eq!(templates[0]["id"], "classic-participation");
        assert_eq!(templates[0]["type"], "participation");
        assert_eq!(templates[0]["layoutVariant"], "standard");
        assert!(templates[0]["primaryColor"].as_str().unwrap().starts_with('#'));
    }

    #[actix_web::test]
    async fn test_create_certificate_returns_pdf_attachment() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/certificates")
            .set_json(single_body("Ana", "participation"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"certificate-ana-lopez.pdf\""
        );

        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"%PDF"));
    }

    #[actix_web::test]
    async fn test_preview_returns_data_uri() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/certificates/preview")
            .set_json(single_body("Ana", "event"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert!(body["dataUri"]
            .as_str()
            .unwrap()
            .starts_with("data:application/pdf;base64,"));
        assert_eq!(body["filename"], "certificate-ana-lopez.pdf");
        assert!(body["certificateId"].as_str().unwrap().starts_with("VOL-"));
    }

    #[actix_web::test]
    async fn test_milestone_without_hours_is_bad_request() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/certificates")
            .set_json(single_body("Ana", "milestone"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let error: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(error.error, "BadRequest");
        assert!(error.message.contains("milestoneHours"));
        assert!(!error.timestamp.is_empty());
    }

    #[actix_web::test]
    async fn test_drawing_failure_is_server_error() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/certificates")
            .set_json(single_body("Ana\u{1b}", "participation"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_batch_reports_each_job() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/certificates/batch")
            .set_json(json!({
                "templateId": "unknown-template",
                "certificateType": "leadership",
                "volunteers": [
                    { "id": "v-1", "firstName": "Ana", "lastName": "Lopez" },
                    { "id": "v-2", "firstName": "Bad\u{7}", "lastName": "Record" },
                    { "id": "v-3", "firstName": "Chloe", "lastName": "Nguyen" }
                ]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["templateId"], "classic-participation");
        assert_eq!(body["progress"]["percent"], 100);
        assert_eq!(body["progress"]["completed"], 2);
        assert_eq!(body["progress"]["failed"], 1);
        assert_eq!(body["downloadStaggerMs"], 500);

        let jobs = body["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0]["status"], "completed");
        assert_eq!(
            jobs[0]["file"]["metadata"]["filename"],
            "certificate-ana-lopez.pdf"
        );
        assert_eq!(jobs[1]["status"], "error");
        assert!(jobs[1].get("file").is_none());
        assert_eq!(jobs[2]["status"], "completed");
    }

    #[actix_web::test]
    async fn test_empty_batch_is_bad_request() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/api/certificates/batch")
            .set_json(json!({ "certificateType": "leadership", "volunteers": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
