mod api;
mod config;
mod database;
mod models;
mod services;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Settings;
use crate::database::{MongoDB, MongoUserStore, UserStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("🚀 Starting User Registry...");

    let db = match MongoDB::connect(&settings).await {
        Ok(db) => db,
        Err(e) => {
            log::error!("❌ MongoDB connection error: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("✅ Connected to MongoDB");

    let store: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(&db));
    let store_data = web::Data::from(store);

    log::info!("🌐 Server starting on {}:{}", settings.host, settings.port);
    log::info!(
        "📚 Swagger UI available at: http://{}:{}/swagger-ui/",
        settings.host, settings.port
    );

    let openapi = api::swagger::ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            .app_data(store_data.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            .configure(api::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await?;

    db.shutdown().await;

    Ok(())
}
