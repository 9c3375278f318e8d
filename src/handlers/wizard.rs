use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::verify_portfolio_owner;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheData, keys};
use crate::error::WizardError;
use crate::models::portfolio::{NewExperience, PersonalPatch, PortfolioRecord, SocialKey};
use crate::models::theme::Theme;
use crate::wizard::{WizardAggregator, WizardMode, WizardSessions};

type Sessions = web::Data<Arc<WizardSessions>>;

#[derive(Debug, Deserialize)]
pub struct SkillInput {
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct SocialInput {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ThemeInput {
    pub theme: Theme,
}

fn wizard_error(e: WizardError) -> HttpResponse {
    HttpResponse::build(e.status()).json(serde_json::json!({
        "error": e.to_string(),
    }))
}

/// Apply `edit` to the caller's session and respond with the resulting view.
///
/// Edits that don't apply (empty skill, out-of-range index...) leave the view unchanged.
async fn with_session<F>(sessions: &WizardSessions, user_id: Uuid, edit: F) -> HttpResponse
where
    F: FnOnce(&mut WizardAggregator),
{
    match sessions.get(user_id).await {
        Ok(wizard) => {
            let mut wizard = wizard.lock().await;
            edit(&mut wizard);
            HttpResponse::Ok().json(wizard.view())
        }
        Err(e) => wizard_error(e),
    }
}

// ── Session lifecycle ──

/// POST /api/wizard — start building a new portfolio.
///
/// The draft is prefilled from the GitHub identity before responding. Repositories
/// are imported in the background; poll `GET /api/wizard` for progress.
pub async fn open_create(user: AuthenticatedUser, sessions: Sessions) -> impl Responder {
    match sessions.store().fetch_by_owner(user.0.id).await {
        Ok(Some(existing)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "You already have a portfolio; edit it instead",
                "portfolioId": existing.id,
            }));
        }
        Ok(None) => {}
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string(),
            }));
        }
    }

    let ctx = user.context();
    let wizard = sessions.open_create(&ctx).await;
    let view = wizard.lock().await.view();

    let sessions = sessions.get_ref().clone();
    actix_web::rt::spawn(async move {
        sessions
            .loader()
            .import_after_seed(&wizard, &ctx, Vec::new())
            .await;
    });

    HttpResponse::Accepted().json(view)
}

/// POST /api/wizard/edit/{id} — edit an existing portfolio, loading it in the background.
pub async fn open_edit(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    sessions: Sessions,
    path: web::Path<Uuid>,
) -> impl Responder {
    let portfolio_id = path.into_inner();
    if let Err(resp) = verify_portfolio_owner(db.get_ref(), portfolio_id, user.0.id).await {
        return resp;
    }

    let ctx = user.context();
    let wizard = sessions
        .open(ctx.user_id, WizardMode::Edit { portfolio_id })
        .await;
    wizard.lock().await.begin_seeding();

    let sessions = sessions.get_ref().clone();
    let task_wizard = wizard.clone();
    actix_web::rt::spawn(async move {
        // Failures are logged by the loader; the session stays open with nothing loaded.
        let _ = sessions
            .loader()
            .load_edit_by_id(&task_wizard, &ctx, portfolio_id)
            .await;
    });

    let view = wizard.lock().await.view();
    HttpResponse::Accepted().json(view)
}

/// POST /api/wizard/edit — edit a portfolio the client already holds.
///
/// Every slice is seeded before responding; only the repository import runs afterwards.
pub async fn open_edit_with_record(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    sessions: Sessions,
    body: web::Json<PortfolioRecord>,
) -> impl Responder {
    let record = body.into_inner();
    if let Err(resp) = verify_portfolio_owner(db.get_ref(), record.id, user.0.id).await {
        return resp;
    }

    let ctx = user.context();
    let (wizard, previous) = sessions.open_with_record(ctx.user_id, &record).await;
    let view = wizard.lock().await.view();

    let sessions = sessions.get_ref().clone();
    actix_web::rt::spawn(async move {
        sessions
            .loader()
            .import_after_seed(&wizard, &ctx, previous)
            .await;
    });

    HttpResponse::Accepted().json(view)
}

/// GET /api/wizard — the caller's session.
pub async fn get_session(user: AuthenticatedUser, sessions: Sessions) -> impl Responder {
    with_session(&sessions, user.0.id, |_| {}).await
}

/// DELETE /api/wizard — abandon the caller's session.
pub async fn discard_session(user: AuthenticatedUser, sessions: Sessions) -> impl Responder {
    if sessions.discard(user.0.id).await {
        HttpResponse::Ok().json(serde_json::json!({
            "message": "Wizard session discarded",
        }))
    } else {
        wizard_error(WizardError::NoSession)
    }
}

// ── Navigation ──

/// POST /api/wizard/next
pub async fn next_step(user: AuthenticatedUser, sessions: Sessions) -> impl Responder {
    with_session(&sessions, user.0.id, |w| {
        w.advance();
    })
    .await
}

/// POST /api/wizard/back
pub async fn previous_step(user: AuthenticatedUser, sessions: Sessions) -> impl Responder {
    with_session(&sessions, user.0.id, |w| {
        w.retreat();
    })
    .await
}

// ── Draft edits ──

/// PATCH /api/wizard/personal
pub async fn set_personal(
    user: AuthenticatedUser,
    sessions: Sessions,
    body: web::Json<PersonalPatch>,
) -> impl Responder {
    let patch = body.into_inner();
    with_session(&sessions, user.0.id, |w| w.set_personal(patch)).await
}

/// POST /api/wizard/skills — add a custom skill.
pub async fn add_skill(
    user: AuthenticatedUser,
    sessions: Sessions,
    body: web::Json<SkillInput>,
) -> impl Responder {
    with_session(&sessions, user.0.id, |w| {
        w.add_custom_skill(&body.label);
    })
    .await
}

/// POST /api/wizard/skills/toggle — pick or unpick a suggested skill.
pub async fn toggle_skill(
    user: AuthenticatedUser,
    sessions: Sessions,
    body: web::Json<SkillInput>,
) -> impl Responder {
    with_session(&sessions, user.0.id, |w| w.toggle_skill(&body.label)).await
}

/// DELETE /api/wizard/skills/{label}
pub async fn remove_skill(
    user: AuthenticatedUser,
    sessions: Sessions,
    path: web::Path<String>,
) -> impl Responder {
    let label = path.into_inner();
    with_session(&sessions, user.0.id, |w| {
        w.remove_skill(&label);
    })
    .await
}

/// POST /api/wizard/projects/{index}/toggle
pub async fn toggle_project(
    user: AuthenticatedUser,
    sessions: Sessions,
    path: web::Path<usize>,
) -> impl Responder {
    let index = path.into_inner();
    with_session(&sessions, user.0.id, |w| {
        w.toggle_project_selected(index);
    })
    .await
}

/// POST /api/wizard/projects/refresh — re-import repositories, keeping selections.
pub async fn refresh_projects(user: AuthenticatedUser, sessions: Sessions) -> impl Responder {
    let ctx = user.context();
    match sessions.refresh_projects(&ctx).await {
        Ok(_) => with_session(&sessions, ctx.user_id, |_| {}).await,
        Err(e) => wizard_error(e),
    }
}

/// PUT /api/wizard/experience/scratch — the entry being typed, before it is added.
pub async fn set_scratch_experience(
    user: AuthenticatedUser,
    sessions: Sessions,
    body: web::Json<NewExperience>,
) -> impl Responder {
    let entry = body.into_inner();
    with_session(&sessions, user.0.id, |w| w.set_scratch_experience(entry)).await
}

/// POST /api/wizard/experience
pub async fn add_experience(
    user: AuthenticatedUser,
    sessions: Sessions,
    body: web::Json<NewExperience>,
) -> impl Responder {
    let entry = body.into_inner();
    with_session(&sessions, user.0.id, |w| {
        w.add_experience(entry);
    })
    .await
}

/// PUT /api/wizard/experience/{index}
pub async fn update_experience(
    user: AuthenticatedUser,
    sessions: Sessions,
    path: web::Path<usize>,
    body: web::Json<NewExperience>,
) -> impl Responder {
    let index = path.into_inner();
    let entry = body.into_inner();
    with_session(&sessions, user.0.id, |w| {
        w.update_experience(index, entry);
    })
    .await
}

/// DELETE /api/wizard/experience/{index}
pub async fn delete_experience(
    user: AuthenticatedUser,
    sessions: Sessions,
    path: web::Path<usize>,
) -> impl Responder {
    let index = path.into_inner();
    with_session(&sessions, user.0.id, |w| {
        w.delete_experience(index);
    })
    .await
}

/// PUT /api/wizard/socials/{key} — `github`, `linkedin` or `twitter`; blank clears it.
pub async fn set_social(
    user: AuthenticatedUser,
    sessions: Sessions,
    path: web::Path<SocialKey>,
    body: web::Json<SocialInput>,
) -> impl Responder {
    let key = path.into_inner();
    with_session(&sessions, user.0.id, |w| w.set_social(key, &body.value)).await
}

/// PUT /api/wizard/theme — unknown names fall back to the light theme.
pub async fn set_theme(
    user: AuthenticatedUser,
    sessions: Sessions,
    body: web::Json<ThemeInput>,
) -> impl Responder {
    let theme = body.theme;
    with_session(&sessions, user.0.id, |w| w.set_theme(theme)).await
}

// ── Submit ──

/// POST /api/wizard/submit — save the draft and close the session.
pub async fn submit(
    user: AuthenticatedUser,
    sessions: Sessions,
    cache: web::Data<CacheData>,
) -> impl Responder {
    let user_id = user.0.id;
    match sessions.submit(user_id).await {
        Ok(record) => {
            let _ = cache.delete(&keys::owner_portfolio(&user_id.to_string())).await;
            if let Some(handle) = &user.0.github_handle {
                let _ = cache.delete(&keys::public_portfolio(handle)).await;
            }
            HttpResponse::Ok().json(serde_json::json!({
                "portfolio": record,
                "redirect": "/dashboard",
            }))
        }
        Err(e) => wizard_error(e),
    }
}
