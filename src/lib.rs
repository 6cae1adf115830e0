use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod certificate;
pub mod config;
pub mod export;

use crate::certificate::CertificateService;
use crate::config::AppConfig;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

/// Shared state handed to every request handler.
#[derive(Clone, Default)]
pub struct AppState {
    pub certificates: CertificateService,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            certificates: CertificateService::new(
                config.branding.clone(),
                config.download_stagger_ms,
            ),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::certificate::handlers::get_templates,
        crate::certificate::handlers::create_certificate,
        crate::certificate::handlers::preview_certificate,
        crate::certificate::handlers::create_batch
    ),
    components(
        schemas(
            certificate::template::TemplateSummary,
            certificate::template::Point,
            certificate::template::LayoutVariant,
            certificate::CertificateKind,
            certificate::Volunteer,
            certificate::Event,
            certificate::CertificateConfig,
            certificate::CertificateData,
            certificate::JobStatus,
            certificate::BatchProgress,
            certificate::service::SingleCertificateRequest,
            certificate::service::BatchCertificateRequest,
            certificate::service::PreviewDocument,
            certificate::service::JobReport,
            certificate::service::BatchReport,
            export::ExportFile,
            export::FileMetadata,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Certificates", description = "Volunteer certificate generation endpoints.")
    )
)]
pub struct ApiDoc;

fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600)
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let app_state = web::Data::new(AppState::from_config(&config));
    let allowed_origins = config.allowed_origins.clone();

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(cors(&allowed_origins))
            .app_data(app_state.clone())
            .service(web::scope("/api").configure(certificate::handlers::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(config.bind_address())?
    .run()
    .await?;

    Ok(())
}
