mod inference;
mod report;
mod routes;

use std::env;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};

use inference::{Analyzer, TorchModel};
use routes::configure_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    }

    let model_path = env::var("MODEL_PATH").unwrap_or_else(|_| "neoscan_model.pt".to_string());
    log::info!("Loading scoring model from {}", model_path);
    let model = match TorchModel::load(&model_path) {
        Ok(model) => model,
        Err(e) => {
            log::error!("Failed to load model at startup: {:?}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Model loading failed: {:?}", e),
            ));
        }
    };
    log::info!("Model loaded successfully");

    let analyzer = web::Data::new(Analyzer::new(Arc::new(model)));

    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let bind_address = format!("0.0.0.0:{}", port);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::JsonConfig::default().limit(20 * 1024 * 1024))
            .app_data(analyzer.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
