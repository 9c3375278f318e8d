use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::*;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::portfolio::{self, PortfolioPatch, PortfolioPayload, PortfolioRecord};
use crate::models::users;
use crate::wizard::store::PortfolioStore;

/// Insert a new portfolio for `owner_id`.
pub async fn insert_portfolio(
    db: &DatabaseConnection,
    owner_id: Uuid,
    input: PortfolioPayload,
) -> Result<portfolio::Model, StoreError> {
    let now = chrono::Utc::now();
    let new_portfolio = portfolio::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner_id),
        personal: Set(serde_json::to_value(&input.personal)?),
        skills: Set(serde_json::to_value(&input.skills)?),
        projects: Set(serde_json::to_value(&input.projects)?),
        socials: Set(serde_json::to_value(&input.socials)?),
        experience: Set(serde_json::to_value(&input.experience)?),
        theme: Set(input.theme.name().to_string()),
        link: Set(input.link),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(new_portfolio.insert(db).await?)
}

/// Fetch one page of portfolios, most recently updated first.
pub async fn get_portfolios_paginated(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<Vec<portfolio::Model>, DbErr> {
    portfolio::Entity::find()
        .order_by_desc(portfolio::Column::UpdatedAt)
        .offset(page.saturating_sub(1) * limit)
        .limit(limit)
        .all(db)
        .await
}

/// Fetch a single portfolio by ID.
pub async fn get_portfolio_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio::Entity::find_by_id(id).one(db).await
}

/// Fetch the portfolio owned by `user_id`, if any.
pub async fn get_portfolio_by_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio::Entity::find()
        .filter(portfolio::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Portfolios joined to their owner, matched on the GitHub login without regard to case.
pub(crate) fn portfolio_by_github_handle(handle: &str) -> Select<portfolio::Entity> {
    portfolio::Entity::find()
        .inner_join(users::Entity)
        .filter(
            Expr::expr(Func::lower(Expr::col((
                users::Entity,
                users::Column::GithubHandle,
            ))))
            .eq(handle.to_lowercase()),
        )
}

/// Fetch the portfolio of the user with the given GitHub login.
///
/// GitHub logins are case-insensitive, so `Octocat` and `octocat` find the same row.
pub async fn get_portfolio_by_github_handle(
    db: &DatabaseConnection,
    handle: &str,
) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio_by_github_handle(handle).one(db).await
}

/// Update an existing portfolio.
pub async fn update_portfolio(
    db: &DatabaseConnection,
    id: Uuid,
    input: PortfolioPatch,
) -> Result<portfolio::Model, StoreError> {
    let item = portfolio::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound(id))?;

    let mut active: portfolio::ActiveModel = item.into();

    if let Some(personal) = input.personal {
        active.personal = Set(serde_json::to_value(personal)?);
    }
    if let Some(skills) = input.skills {
        active.skills = Set(serde_json::to_value(skills)?);
    }
    if let Some(projects) = input.projects {
        active.projects = Set(serde_json::to_value(projects)?);
    }
    if let Some(socials) = input.socials {
        active.socials = Set(serde_json::to_value(socials)?);
    }
    if let Some(experience) = input.experience {
        active.experience = Set(serde_json::to_value(experience)?);
    }
    if let Some(theme) = input.theme {
        active.theme = Set(theme.name().to_string());
    }
    if let Some(link) = input.link {
        active.link = Set(link);
    }
    active.updated_at = Set(chrono::Utc::now());

    Ok(active.update(db).await?)
}

/// Delete a portfolio by ID.
pub async fn delete_portfolio(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    portfolio::Entity::delete_by_id(id).exec(db).await
}

/// [`PortfolioStore`] backed by Postgres.
#[derive(Clone)]
pub struct SeaOrmPortfolioStore {
    db: DatabaseConnection,
}

impl SeaOrmPortfolioStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PortfolioStore for SeaOrmPortfolioStore {
    async fn create(
        &self,
        owner_id: Uuid,
        payload: PortfolioPayload,
    ) -> Result<PortfolioRecord, StoreError> {
        let model = insert_portfolio(&self.db, owner_id, payload).await?;
        Ok(PortfolioRecord::try_from(model)?)
    }

    async fn update(&self, id: Uuid, patch: PortfolioPatch) -> Result<PortfolioRecord, StoreError> {
        let model = update_portfolio(&self.db, id, patch).await?;
        Ok(PortfolioRecord::try_from(model)?)
    }

    async fn fetch_by_owner(&self, owner_id: Uuid) -> Result<Option<PortfolioRecord>, StoreError> {
        get_portfolio_by_user(&self.db, owner_id)
            .await?
            .map(PortfolioRecord::try_from)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<PortfolioRecord>, StoreError> {
        get_portfolio_by_id(&self.db, id)
            .await?
            .map(PortfolioRecord::try_from)
            .transpose()
            .map_err(StoreError::from)
    }
}
