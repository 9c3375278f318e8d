use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use devfolio_backend::auth::jwks::JwksCache;
use devfolio_backend::cache::RedisCache;
use devfolio_backend::config::AppConfig;
use devfolio_backend::create_pool;
use devfolio_backend::db::portfolio::SeaOrmPortfolioStore;
use devfolio_backend::github::GithubClient;
use devfolio_backend::handlers;
use devfolio_backend::wizard::WizardSessions;
use devfolio_backend::wizard::importer::RepositoryImporter;
use migration::{Migrator, MigratorTrait};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        io::Error::other(e)
    })?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(io::Error::other)?;
    Migrator::up(&db, None).await.map_err(io::Error::other)?;
    tracing::info!("Database migrations applied");

    // Initialize Redis cache
    let redis_cache = RedisCache::new(&config.redis_url)
        .await
        .map_err(io::Error::other)?;
    let redis_data = web::Data::new(Arc::new(redis_cache));
    let cache_config = web::Data::new(config.cache.clone());
    tracing::info!("Connected to Redis");

    let jwks_cache = web::Data::new(Arc::new(JwksCache::new(
        &config.supabase_project_ref,
        &config.supabase_anon_key,
        config.supabase_jwt_secret.clone(),
    )));

    let github = GithubClient::new(&config.github).map_err(io::Error::other)?;
    let importer = Arc::new(RepositoryImporter::from_config(
        Arc::new(github),
        &config.github,
    ));
    let store = Arc::new(SeaOrmPortfolioStore::new(db.clone()));
    let sessions = web::Data::new(Arc::new(WizardSessions::new(store, importer)));

    let db_data = web::Data::new(db);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(cache_config.clone())
            .app_data(jwks_cache.clone())
            .app_data(sessions.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
