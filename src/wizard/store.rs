use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::portfolio::{PortfolioPatch, PortfolioPayload, PortfolioRecord};

/// Persistence seam used by the wizard. The database is responsible for the
/// one-portfolio-per-owner rule and for serialising concurrent writes.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn create(
        &self,
        owner_id: Uuid,
        payload: PortfolioPayload,
    ) -> Result<PortfolioRecord, StoreError>;

    /// Apply `patch` to portfolio `id`. Fails with [`StoreError::NotFound`] if it does not exist.
    async fn update(&self, id: Uuid, patch: PortfolioPatch) -> Result<PortfolioRecord, StoreError>;

    async fn fetch_by_owner(&self, owner_id: Uuid) -> Result<Option<PortfolioRecord>, StoreError>;

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<PortfolioRecord>, StoreError>;
}
