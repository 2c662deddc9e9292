mod config;
mod inference;
mod routes;
mod upload;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use config::Config;
use inference::{HuggingFaceClient, InferenceClient};
use routes::configure_routes;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    if !config.has_api_key() {
        log::warn!("HF_API_KEY is not set. Requests to the inference API will be unauthenticated.");
    }

    let client = HuggingFaceClient::new(&config).map_err(|e| {
        log::error!("Failed to create inference client: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    log::info!("Proxying classification requests to {}", client.model_url());

    let client: Arc<dyn InferenceClient> = Arc::new(client);
    let client = web::Data::from(client);
    let bind_address = config.bind_address();
    let config = web::Data::new(config);

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::AUTHORIZATION,
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .configure(|cfg| configure_routes(cfg, config.clone(), client.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
