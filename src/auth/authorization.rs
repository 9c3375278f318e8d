use actix_web::HttpResponse;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::portfolio as portfolio_db;
use crate::models::portfolio::Model;

/// Load portfolio `portfolio_id` and check that `user_id` owns it.
pub async fn verify_portfolio_owner(
    db: &DatabaseConnection,
    portfolio_id: Uuid,
    user_id: Uuid,
) -> Result<Model, HttpResponse> {
    match portfolio_db::get_portfolio_by_id(db, portfolio_id).await {
        Ok(Some(item)) if item.user_id == user_id => Ok(item),
        Ok(Some(_)) => Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You can only manage your own portfolio",
        }))),
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Portfolio {portfolio_id} not found"),
        }))),
        Err(e) => Err(HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        }))),
    }
}
