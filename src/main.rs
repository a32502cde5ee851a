use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use kindred::config::{Settings, StoreBackend};
use kindred::routes::{self, AppState};
use kindred::services::{InMemoryProfileStore, PostgresProfileStore, ProfileStore};
use kindred::ProfileService;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // KINDRED_CONFIG points at an explicit config file instead of config/
    let settings = match std::env::var("KINDRED_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    }
    .map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Kindred profile service...");

    let store: Arc<dyn ProfileStore> = match settings.store.backend {
        StoreBackend::Postgres => {
            let db = &settings.database;
            let postgres = PostgresProfileStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e)
            })?;

            info!(
                "PostgreSQL store initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Arc::new(postgres)
        }
        StoreBackend::Memory => {
            warn!("Using in-memory profile store; data is lost on exit");
            Arc::new(InMemoryProfileStore::new())
        }
    };

    let app_state = AppState {
        service: ProfileService::new(store)
            .with_deliverability_check(settings.validation.check_deliverability),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure_extractors)
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
