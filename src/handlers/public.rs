use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;

use crate::cache::{CacheConfig, CacheData, keys};
use crate::db::portfolio as portfolio_db;
use crate::github::is_valid_handle;
use crate::models::portfolio::PortfolioRecord;
use crate::models::published::PublishedPortfolio;

/// GET /api/public/{github_handle} — the published portfolio of a GitHub user.
///
/// Only selected projects are shown, each with a stable placeholder description.
pub async fn get_published_portfolio(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    cache_config: web::Data<CacheConfig>,
    path: web::Path<String>,
) -> impl Responder {
    let handle = path.into_inner();
    if !is_valid_handle(&handle) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("{handle:?} is not a valid GitHub handle"),
        }));
    }

    let cache_key = keys::public_portfolio(&handle);
    match cache.get::<serde_json::Value>(&cache_key).await {
        Ok(Some(cached)) => return HttpResponse::Ok().json(cached),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache error: {}", e),
    }

    let item = match portfolio_db::get_portfolio_by_github_handle(db.get_ref(), &handle).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("No portfolio published for {handle}"),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    };

    let id = item.id;
    match PortfolioRecord::try_from(item) {
        Ok(record) => {
            let published = PublishedPortfolio::from(record);
            let _ = cache
                .set(&cache_key, &published, cache_config.public_portfolio_ttl)
                .await;
            HttpResponse::Ok().json(published)
        }
        Err(e) => {
            tracing::error!("Portfolio {id} has malformed content: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Stored portfolio {id} is malformed"),
            }))
        }
    }
}
