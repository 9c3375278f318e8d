use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::verify_portfolio_owner;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, CacheData, keys};
use crate::db::portfolio as portfolio_db;
use crate::models::PaginationQuery;
use crate::models::portfolio::{Model, PortfolioRecord};

fn to_record(model: Model) -> Result<PortfolioRecord, HttpResponse> {
    let id = model.id;
    PortfolioRecord::try_from(model).map_err(|e| {
        tracing::error!("Portfolio {id} has malformed content: {e}");
        HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Stored portfolio {id} is malformed"),
        }))
    })
}

/// GET /api/portfolios?page=1&limit=20 — list portfolios, most recently updated first.
pub async fn get_portfolios(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> impl Responder {
    let page = query.page();
    let limit = query.limit();

    let items = match portfolio_db::get_portfolios_paginated(db.get_ref(), page, limit).await {
        Ok(items) => items,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to fetch portfolios: {e}"),
            }));
        }
    };

    let records: Result<Vec<_>, _> = items.into_iter().map(to_record).collect();
    match records {
        Ok(records) => HttpResponse::Ok().json(serde_json::json!({
            "page": page,
            "limit": limit,
            "items": records,
        })),
        Err(resp) => resp,
    }
}

/// GET /api/portfolios/me — the caller's own portfolio.
pub async fn get_my_portfolio(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    cache_config: web::Data<CacheConfig>,
) -> impl Responder {
    let user_id = user.0.id;
    let cache_key = keys::owner_portfolio(&user_id.to_string());

    match cache.get::<serde_json::Value>(&cache_key).await {
        Ok(Some(cached)) => return HttpResponse::Ok().json(cached),
        Ok(None) => {}
        // Cache error - fall back to the database.
        Err(e) => tracing::warn!("Cache error: {}", e),
    }

    match portfolio_db::get_portfolio_by_user(db.get_ref(), user_id).await {
        Ok(Some(item)) => match to_record(item) {
            Ok(record) => {
                let _ = cache
                    .set(&cache_key, &record, cache_config.owner_portfolio_ttl)
                    .await;
                HttpResponse::Ok().json(record)
            }
            Err(resp) => resp,
        },
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "You have not created a portfolio yet",
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/portfolios/{id} — get a single portfolio (requires authentication).
pub async fn get_portfolio(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match portfolio_db::get_portfolio_by_id(db.get_ref(), id).await {
        Ok(Some(item)) => match to_record(item) {
            Ok(record) => HttpResponse::Ok().json(record),
            Err(resp) => resp,
        },
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Portfolio {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// DELETE /api/portfolios/{id} — delete the caller's portfolio.
pub async fn delete_portfolio(
    auth_user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    if let Err(resp) = verify_portfolio_owner(db.get_ref(), id, auth_user.0.id).await {
        return resp;
    }

    match portfolio_db::delete_portfolio(db.get_ref(), id).await {
        Ok(result) if result.rows_affected > 0 => {
            let _ = cache
                .delete(&keys::owner_portfolio(&auth_user.0.id.to_string()))
                .await;
            if let Some(handle) = &auth_user.0.github_handle {
                let _ = cache.delete(&keys::public_portfolio(handle)).await;
            }
            HttpResponse::Ok().json(serde_json::json!({
                "message": format!("Portfolio {id} deleted"),
            }))
        }
        Ok(_) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Portfolio {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to delete portfolio: {e}"),
        })),
    }
}
