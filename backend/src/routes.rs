use actix_web::{HttpResponse, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::error;
use serde::Serialize;
use serde_json::json;
use shared::AnalyzeRequest;

use crate::inference::{AnalysisError, Analyzer};

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/api/health").route(web::get().to(health_check)))
        .service(web::resource("/api/analyze").route(web::post().to(handle_analyze)));
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "running",
        "routes": ["/api/health", "/api/analyze"],
    }))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "online" }))
}

async fn handle_analyze(
    analyzer: web::Data<Analyzer>,
    request: web::Json<AnalyzeRequest>,
) -> HttpResponse {
    // Data-URL payloads carry a "data:image/...;base64," prefix; the base64
    // body is whatever follows the last comma.
    let encoded = request.image.rsplit(',').next().unwrap_or(&request.image);
    let image_bytes = match STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Rejected request with invalid base64 payload: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: format!("Invalid base64 image payload: {}", e),
            });
        }
    };

    match analyzer.analyze(&image_bytes) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e @ AnalysisError::Decode(_)) => {
            error!("Rejected undecodable image: {}", e);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: format!("Error processing image: {}", e),
            })
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Error processing image: {}", e),
            })
        }
    }
}
