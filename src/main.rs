use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use std::sync::Arc;

use formforge::{
    auth::AuthMode,
    config::Config,
    rate_limit::{RateLimitMiddleware, RateLimiter},
    routes::{self, health},
    security,
    store::{MemoryStore, PgStore, Store},
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(
            PgStore::connect(url)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
        ),
        None => {
            log::warn!("DATABASE_URL not set; users and forms are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };
    let store = web::Data::from(store);

    let auth_mode = AuthMode::from_config(&config);
    let limiter = config.rate_limit.as_ref().map(RateLimiter::from_settings);

    log::info!(
        "Starting formforge at {} (storage: {}, jwt: {}, rate limit: {})",
        config.server_url(),
        store.backend(),
        auth_mode.tokens().is_some(),
        limiter.is_some()
    );

    let auth_data = web::Data::new(auth_mode);
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(auth_data.clone())
            .wrap(RateLimitMiddleware::new(limiter.clone()))
            .wrap(security::security_headers())
            .wrap(security::cors())
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
