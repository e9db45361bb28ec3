// src/main.rs

pub mod db;
pub mod reply;
pub mod webhook;

use actix_web::{get, middleware, web, App, HttpServer, Responder};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
//
use crate::db::{Config, DB};
//

#[get("/health")]
async fn health() -> impl Responder {
    web::Json(serde_json::json!({ "status": "ok" }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish()
        .try_init();

    let config = Config::new()?;
    let db = DB::new(&config).await.context("mongodb client init failed")?;

    info!("webhook listening on {}", config.bind);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::QueryConfig::default().error_handler(webhook::query_error_handler))
            .wrap(middleware::Logger::default())
            .service(health)
            .service(webhook::update_collection)
    })
    .bind(&config.bind)?
    .workers(2)
    .run()
    .await?;

    Ok(())
}
