mod clients;
mod config;
mod errors;
mod handlers;
mod models;
mod services;
mod utils;

use actix_web::{web, App, HttpServer};
use actix_web::middleware::Logger;
use actix_web_prom::PrometheusMetricsBuilder;
use dotenv::dotenv;
use env_logger::Env;
use log::{info, warn};
use std::collections::HashMap;
use std::io;
use crate::clients::build_http_client;
use crate::clients::gemini::GeminiClient;
use crate::clients::pexels::PexelsClient;
use crate::config::AppConfig;
use crate::services::store::FitnessStore;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    info!("Loaded configuration: {:?}", config);

    if config.gemini.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set, plans and quotes will use the fallback content");
    }
    if config.pexels.api_key.is_none() {
        warn!("PEXELS_API_KEY is not set, image lookups will return the placeholder");
    }

    // One connection pool shared by both upstream clients
    let http = build_http_client(config.upstream_timeout)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    let gemini = web::Data::new(GeminiClient::new(http.clone(), &config.gemini));
    let pexels = web::Data::new(PexelsClient::new(http, &config.pexels));
    let store = web::Data::new(FitnessStore::new(config.store_capacity, config.store_ttl));
    info!("Using Gemini model {}", gemini.model());

    // Set up Prometheus metrics
    let mut labels = HashMap::new();
    labels.insert("app".to_string(), "fitgen_backend".to_string());
    let prometheus = PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .const_labels(labels)
        .build()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

    info!("Starting server at {} with {} workers", config.bind_address, config.workers);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .app_data(gemini.clone())
            .app_data(pexels.clone())
            .app_data(store.clone())
            .configure(handlers::configure)
    })
    .workers(config.workers)
    .bind(&config.bind_address)?
    .run()
    .await
}
