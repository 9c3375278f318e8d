//! End-to-end wizard flow over in-memory fakes: create, submit, edit, resubmit.
//!
//! Run with: `cargo test --test wizard_flow_test`
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use devfolio_backend::error::{ImportError, StoreError, WizardError};
use devfolio_backend::github::{RepoSource, RepoSummary};
use devfolio_backend::models::portfolio::{
    NewExperience, PersonalPatch, PortfolioPatch, PortfolioPayload, PortfolioRecord, SocialKey,
};
use devfolio_backend::models::published::PublishedPortfolio;
use devfolio_backend::models::theme::Theme;
use devfolio_backend::wizard::importer::RepositoryImporter;
use devfolio_backend::wizard::store::PortfolioStore;
use devfolio_backend::wizard::{SessionContext, WizardMode, WizardSessions};

/// Serves a fixed repository list as a single page.
struct FixedRepos {
    names: Mutex<Vec<&'static str>>,
}

impl FixedRepos {
    fn new(names: Vec<&'static str>) -> Self {
        Self {
            names: Mutex::new(names),
        }
    }

    fn replace(&self, names: Vec<&'static str>) {
        *self.names.lock().unwrap() = names;
    }
}

#[async_trait]
impl RepoSource for FixedRepos {
    async fn list_repos(
        &self,
        handle: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<RepoSummary>, ImportError> {
        if page > 1 {
            return Ok(Vec::new());
        }
        Ok(self
            .names
            .lock()
            .unwrap()
            .iter()
            .map(|name| RepoSummary {
                name: name.to_string(),
                homepage: None,
                html_url: format!("https://github.com/{handle}/{name}"),
            })
            .collect())
    }
}

#[derive(Default)]
struct InMemoryStore {
    records: Mutex<HashMap<Uuid, PortfolioRecord>>,
}

#[async_trait]
impl PortfolioStore for InMemoryStore {
    async fn create(
        &self,
        owner_id: Uuid,
        payload: PortfolioPayload,
    ) -> Result<PortfolioRecord, StoreError> {
        let now = chrono::Utc::now();
        let record = PortfolioRecord {
            id: Uuid::new_v4(),
            user_id: owner_id,
            personal: payload.personal,
            skills: payload.skills,
            projects: payload.projects,
            socials: payload.socials,
            experience: payload.experience,
            theme: payload.theme,
            link: payload.link,
            created_at: now,
            updated_at: now,
        };
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: PortfolioPatch) -> Result<PortfolioRecord, StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(personal) = patch.personal {
            record.personal = personal;
        }
        if let Some(skills) = patch.skills {
            record.skills = skills;
        }
        if let Some(projects) = patch.projects {
            record.projects = projects;
        }
        if let Some(socials) = patch.socials {
            record.socials = socials;
        }
        if let Some(experience) = patch.experience {
            record.experience = experience;
        }
        if let Some(theme) = patch.theme {
            record.theme = theme;
        }
        if let Some(link) = patch.link {
            record.link = link;
        }
        record.updated_at = chrono::Utc::now();
        Ok(record.clone())
    }

    async fn fetch_by_owner(&self, owner_id: Uuid) -> Result<Option<PortfolioRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.user_id == owner_id)
            .cloned())
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<PortfolioRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }
}

fn identity() -> SessionContext {
    SessionContext {
        user_id: Uuid::new_v4(),
        display_name: Some("Ada Lovelace".into()),
        bio: Some("First programmer".into()),
        avatar_url: Some("https://avatars.example/ada.png".into()),
        github_handle: Some("ada".into()),
    }
}

fn setup(repos: Vec<&'static str>) -> (WizardSessions, Arc<InMemoryStore>, Arc<FixedRepos>) {
    let store = Arc::new(InMemoryStore::default());
    let source = Arc::new(FixedRepos::new(repos));
    let importer = Arc::new(RepositoryImporter::new(source.clone(), 100, 20));
    (WizardSessions::new(store.clone(), importer), store, source)
}

#[tokio::test]
async fn create_then_edit_round_trip() {
    let (sessions, store, source) = setup(vec!["engine", "notes", "site"]);
    let ctx = identity();

    // ── Create ──
    let wizard = sessions
        .open(ctx.user_id, WizardMode::Create { owner_id: ctx.user_id })
        .await;
    assert!(sessions.loader().seed_create(&wizard, &ctx).await);
    {
        let mut w = wizard.lock().await;
        assert_eq!(w.draft().personal.name, "Ada Lovelace");
        assert_eq!(w.draft().projects.len(), 3);

        w.set_personal(PersonalPatch {
            role: Some("Engineer".into()),
            ..Default::default()
        });
        w.advance();
        w.toggle_skill("Rust");
        assert!(w.add_custom_skill("  Analytical Engines "));
        assert!(!w.add_custom_skill("Rust"));
        w.advance();
        assert!(w.toggle_project_selected(0));
        assert!(w.toggle_project_selected(2));
        assert!(!w.toggle_project_selected(3));
        w.advance();
        assert!(!w.add_experience(NewExperience {
            company: "Babbage & Co".into(),
            ..Default::default()
        }));
        assert!(w.add_experience(NewExperience {
            company: "Babbage & Co".into(),
            role: "Programmer".into(),
            start_date: "1842-01".into(),
            end_date: "1843-09".into(),
            current: true,
            description: "Notes on the engine".into(),
        }));
        w.set_social(SocialKey::Twitter, "@ada");
        w.set_theme(Theme::Gradient);
    }

    let created = sessions.submit(ctx.user_id).await.unwrap();
    assert_eq!(created.user_id, ctx.user_id);
    assert_eq!(created.link, "ada-lovelace-portfolio");
    assert_eq!(created.skills, vec!["Rust", "Analytical Engines"]);
    let names: Vec<&str> = created.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["engine", "site"]);
    assert_eq!(created.experience.len(), 1);
    assert!(created.experience[0].end_date.is_empty());
    assert!(matches!(
        sessions.get(ctx.user_id).await,
        Err(WizardError::NoSession)
    ));

    // ── Edit ──
    source.replace(vec!["site", "engine", "compiler"]);
    let wizard = sessions
        .open(
            ctx.user_id,
            WizardMode::Edit {
                portfolio_id: created.id,
            },
        )
        .await;
    sessions
        .loader()
        .load_edit_by_id(&wizard, &ctx, created.id)
        .await
        .unwrap();
    {
        let mut w = wizard.lock().await;
        assert!(!w.is_loading());
        assert_eq!(w.draft().theme, Theme::Gradient);
        let projects: Vec<(&str, bool)> = w
            .draft()
            .projects
            .iter()
            .map(|p| (p.name.as_str(), p.selected))
            .collect();
        assert_eq!(
            projects,
            vec![("site", true), ("engine", true), ("compiler", false)]
        );

        assert!(w.remove_skill("Rust"));
        w.set_theme(Theme::from_name("cyan"));
    }

    let updated = sessions.submit(ctx.user_id).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.skills, vec!["Analytical Engines"]);
    assert_eq!(updated.theme, Theme::Cyan);
    assert_eq!(store.records.lock().unwrap().len(), 1);

    // ── Publish ──
    let published = PublishedPortfolio::from(updated);
    assert_eq!(published.projects.len(), 2);
    assert!(published.projects.iter().all(|p| !p.description.is_empty()));
}

#[tokio::test]
async fn refresh_keeps_selection_and_reports_missing_handle() {
    let (sessions, _store, source) = setup(vec!["engine", "notes"]);
    let ctx = identity();
    let wizard = sessions
        .open(ctx.user_id, WizardMode::Create { owner_id: ctx.user_id })
        .await;
    sessions.loader().seed_create(&wizard, &ctx).await;
    wizard.lock().await.toggle_project_selected(1);

    source.replace(vec!["notes", "site"]);
    assert_eq!(sessions.refresh_projects(&ctx).await.unwrap(), 2);
    {
        let w = wizard.lock().await;
        let projects: Vec<(&str, bool)> = w
            .draft()
            .projects
            .iter()
            .map(|p| (p.name.as_str(), p.selected))
            .collect();
        assert_eq!(projects, vec![("notes", true), ("site", false)]);
    }

    let anonymous = SessionContext {
        github_handle: None,
        ..ctx.clone()
    };
    let err = sessions.refresh_projects(&anonymous).await.unwrap_err();
    assert!(matches!(err, WizardError::Import(ImportError::MissingHandle)));
    assert!(!wizard.lock().await.is_importing());
}

#[tokio::test]
async fn edit_of_a_missing_portfolio_cannot_be_submitted() {
    let (sessions, store, _source) = setup(vec![]);
    let ctx = identity();
    let missing = Uuid::new_v4();
    let wizard = sessions
        .open(ctx.user_id, WizardMode::Edit { portfolio_id: missing })
        .await;

    let err = sessions
        .loader()
        .load_edit_by_id(&wizard, &ctx, missing)
        .await
        .unwrap_err();
    assert!(matches!(err, WizardError::Store(StoreError::NotFound(_))));

    let err = sessions.submit(ctx.user_id).await.unwrap_err();
    assert!(matches!(err, WizardError::NothingLoaded));
    assert!(store.records.lock().unwrap().is_empty());
}
