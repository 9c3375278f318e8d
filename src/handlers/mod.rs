pub mod auth;
pub mod portfolio;
pub mod public;
pub mod wizard;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Portfolio routes (all protected — require valid JWT) ──
    cfg.service(
        web::scope("/portfolios")
            .route("", web::get().to(portfolio::get_portfolios))
            .route("/me", web::get().to(portfolio::get_my_portfolio))
            .route("/{id}", web::get().to(portfolio::get_portfolio))
            .route("/{id}", web::delete().to(portfolio::delete_portfolio)),
    );

    // ── Published portfolios (no authentication) ──
    cfg.service(
        web::resource("/public/{github_handle}")
            .route(web::get().to(public::get_published_portfolio)),
    );

    // ── Wizard session routes (all protected — require valid JWT) ──
    cfg.service(
        web::scope("/wizard")
            .route("", web::post().to(wizard::open_create))
            .route("", web::get().to(wizard::get_session))
            .route("", web::delete().to(wizard::discard_session))
            .route("/edit", web::post().to(wizard::open_edit_with_record))
            .route("/edit/{id}", web::post().to(wizard::open_edit))
            .route("/next", web::post().to(wizard::next_step))
            .route("/back", web::post().to(wizard::previous_step))
            .route("/personal", web::patch().to(wizard::set_personal))
            .route("/skills", web::post().to(wizard::add_skill))
            .route("/skills/toggle", web::post().to(wizard::toggle_skill))
            .route("/skills/{label}", web::delete().to(wizard::remove_skill))
            .route("/projects/refresh", web::post().to(wizard::refresh_projects))
            .route("/projects/{index}/toggle", web::post().to(wizard::toggle_project))
            .route("/experience", web::post().to(wizard::add_experience))
            .route("/experience/scratch", web::put().to(wizard::set_scratch_experience))
            .route("/experience/{index}", web::put().to(wizard::update_experience))
            .route("/experience/{index}", web::delete().to(wizard::delete_experience))
            .route("/socials/{key}", web::put().to(wizard::set_social))
            .route("/theme", web::put().to(wizard::set_theme))
            .route("/submit", web::post().to(wizard::submit)),
    );
}
