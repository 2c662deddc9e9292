use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use log::{error, info, warn};
use shared::{AnalyzeResponse, ConnectionResponse, ErrorResponse, UploadTestResponse};
use uuid::Uuid;

use crate::config::Config;
use crate::inference::InferenceClient;
use crate::upload::{UploadError, read_image};

pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    config: web::Data<Config>,
    client: web::Data<dyn InferenceClient>,
) {
    let frontend_dir = config.frontend_dir.clone();

    cfg.app_data(config)
        .app_data(client)
        .service(web::resource("/api/test-hf-connection").route(web::get().to(test_connection)))
        .service(web::resource("/api/test-upload").route(web::post().to(test_upload)))
        .service(web::resource("/api/analyze-image").route(web::post().to(analyze_image)));

    if frontend_dir.is_dir() {
        cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
    } else {
        warn!(
            "Frontend directory {} not found, serving API only",
            frontend_dir.display()
        );
    }
}

async fn test_connection(client: web::Data<dyn InferenceClient>) -> HttpResponse {
    match client.check_connection().await {
        Ok(()) => {
            info!("HuggingFace connection test passed");
            HttpResponse::Ok().json(ConnectionResponse {
                message: "HuggingFace API connection successful".into(),
            })
        }
        Err(e) => {
            error!("HuggingFace connection test error: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::with_details(
                "HuggingFace API connection failed",
                e.to_string(),
            ))
        }
    }
}

async fn test_upload(
    req: HttpRequest,
    payload: Multipart,
    config: web::Data<Config>,
) -> HttpResponse {
    let request_id = Uuid::new_v4();

    match read_image(&req, payload, config.max_upload_bytes).await {
        Ok(image) => {
            info!(
                "[{}] Upload test received {} ({} bytes, {})",
                request_id,
                image.filename,
                image.size(),
                image.mimetype
            );
            HttpResponse::Ok().json(UploadTestResponse {
                message: "Image uploaded successfully".into(),
                file_info: image.file_info(),
            })
        }
        Err(e) => upload_error_response(request_id, "Upload test failed", e),
    }
}

async fn analyze_image(
    req: HttpRequest,
    payload: Multipart,
    config: web::Data<Config>,
    client: web::Data<dyn InferenceClient>,
) -> HttpResponse {
    let request_id = Uuid::new_v4();

    let image = match read_image(&req, payload, config.max_upload_bytes).await {
        Ok(image) => image,
        Err(e) => return upload_error_response(request_id, "Image analysis failed", e),
    };

    info!(
        "[{}] Analyzing {} ({} bytes) with {}",
        request_id,
        image.filename,
        image.size(),
        config.model
    );

    match client.classify(&image.bytes).await {
        Ok(analysis) => {
            info!("[{}] Analysis completed", request_id);
            HttpResponse::Ok().json(AnalyzeResponse {
                message: "Analysis completed successfully".into(),
                analysis,
            })
        }
        Err(e) => {
            error!("[{}] Image analysis error: {}", request_id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::with_details("Image analysis failed", e.to_string()))
        }
    }
}

fn upload_error_response(request_id: Uuid, failure: &str, err: UploadError) -> HttpResponse {
    match &err {
        UploadError::MissingFile => {
            warn!("[{}] Rejected request without an image file", request_id);
            HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()))
        }
        UploadError::TooLarge { .. } => {
            warn!("[{}] {}", request_id, err);
            HttpResponse::PayloadTooLarge()
                .json(ErrorResponse::with_details("Image file too large", err.to_string()))
        }
        UploadError::Multipart(_) => {
            error!("[{}] {}: {}", request_id, failure, err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::with_details(failure, err.to_string()))
        }
    }
}
