use actix_web::{http::header, web, HttpResponse, Responder};

use crate::certificate::service::{
    BatchCertificateRequest, BatchReport, PreviewDocument, SingleCertificateRequest,
};
use crate::certificate::template::{list_templates, TemplateSummary};
use crate::certificate::CertificateError;
use crate::export::{attachment_disposition, PDF_MIME_TYPE};
use crate::{AppState, ErrorResponse};

fn error_response(err: &CertificateError) -> HttpResponse {
    if err.is_validation() {
        log::info!("rejected certificate request: {}", err);
        HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()))
    } else {
        log::error!("certificate generation failed: {}", err);
        HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&err.to_string()))
    }
}

#[utoipa::path(
    get,
    path = "/api/certificates/templates",
    tag = "Certificates",
    responses(
        (status = 200, description = "Built-in certificate templates", body = Vec<TemplateSummary>)
    )
)]
pub async fn get_templates() -> impl Responder {
    let templates: Vec<TemplateSummary> = list_templates().iter().map(TemplateSummary::from).collect();
    HttpResponse::Ok().json(templates)
}

#[utoipa::path(
    post,
    path = "/api/certificates",
    tag = "Certificates",
    request_body = SingleCertificateRequest,
    responses(
        (status = 200, description = "Certificate PDF", content_type = "application/pdf"),
        (status = 400, description = "Invalid certificate configuration", body = ErrorResponse),
        (status = 500, description = "Certificate could not be drawn", body = ErrorResponse)
    )
)]
pub async fn create_certificate(
    state: web::Data<AppState>,
    item: web::Json<SingleCertificateRequest>,
) -> impl Responder {
    match state.certificates.generate(&item) {
        Ok(generated) => HttpResponse::Ok()
            .content_type(PDF_MIME_TYPE)
            .insert_header((
                header::CONTENT_DISPOSITION,
                attachment_disposition(&generated.filename),
            ))
            .insert_header(("X-Certificate-Id", generated.data.certificate_id.clone()))
            .body(generated.pdf),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/certificates/preview",
    tag = "Certificates",
    request_body = SingleCertificateRequest,
    responses(
        (status = 200, description = "Inline preview of the certificate", body = PreviewDocument),
        (status = 400, description = "Invalid certificate configuration", body = ErrorResponse),
        (status = 500, description = "Certificate could not be drawn", body = ErrorResponse)
    )
)]
pub async fn preview_certificate(
    state: web::Data<AppState>,
    item: web::Json<SingleCertificateRequest>,
) -> impl Responder {
    match state.certificates.preview(&item) {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/certificates/batch",
    tag = "Certificates",
    request_body = BatchCertificateRequest,
    responses(
        (status = 200, description = "Batch finished; failed jobs are listed with their error", body = BatchReport),
        (status = 400, description = "Invalid batch configuration", body = ErrorResponse)
    )
)]
pub async fn create_batch(
    state: web::Data<AppState>,
    item: web::Json<BatchCertificateRequest>,
) -> impl Responder {
    log::info!(
        "batch certificate request for {} volunteer(s)",
        item.volunteers.len()
    );
    match state.certificates.run_batch(&item).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(&e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/certificates").route(web::post().to(create_certificate)))
        .service(web::resource("/certificates/templates").route(web::get().to(get_templates)))
        .service(web::resource("/certificates/preview").route(web::post().to(preview_certificate)))
        .service(web::resource("/certificates/batch").route(web::post().to(create_batch)));
}
