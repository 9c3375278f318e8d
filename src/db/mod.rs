pub mod portfolio;
pub mod users;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Open a SeaORM connection pool.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
