use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, CreateUserFromAuth};

/// Clear `handle` from every user other than `owner`.
///
/// GitHub logins get renamed and reused, so another row may still hold the
/// login that now belongs to `owner`. The unique index would reject the write.
pub(crate) fn release_github_handle(handle: &str, owner: Uuid) -> UpdateMany<users::Entity> {
    users::Entity::update_many()
        .col_expr(
            users::Column::GithubHandle,
            Expr::value(Option::<String>::None),
        )
        .filter(
            Expr::expr(Func::lower(Expr::col(users::Column::GithubHandle)))
                .eq(handle.to_lowercase()),
        )
        .filter(users::Column::Id.ne(owner))
}

/// Find the user behind a verified token, creating the row on first login.
///
/// GitHub logins can be renamed and avatars change, so an existing row is
/// refreshed when the claims disagree with it.
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        let handle_changed =
            input.github_handle.is_some() && existing.github_handle != input.github_handle;
        let stale =
            handle_changed || (input.avatar_url.is_some() && existing.avatar_url != input.avatar_url);
        if !stale {
            return Ok(existing);
        }

        if handle_changed && let Some(handle) = &input.github_handle {
            release_github_handle(handle, input.id).exec(db).await?;
        }

        let mut active: users::ActiveModel = existing.into();
        if input.github_handle.is_some() {
            active.github_handle = Set(input.github_handle);
        }
        if input.avatar_url.is_some() {
            active.avatar_url = Set(input.avatar_url);
        }
        active.updated_at = Set(Some(chrono::Utc::now()));
        return active.update(db).await;
    }

    if let Some(handle) = &input.github_handle {
        release_github_handle(handle, input.id).exec(db).await?;
    }

    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        display_name: Set(input.display_name),
        bio: Set(input.bio),
        avatar_url: Set(input.avatar_url),
        github_handle: Set(input.github_handle),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}
