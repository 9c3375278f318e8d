//! Brings a fresh wizard session to its starting draft.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use super::SharedWizard;
use super::aggregator::InitState;
use super::context::SessionContext;
use super::importer::RepositoryImporter;
use super::store::PortfolioStore;
use crate::error::{StoreError, WizardError};
use crate::models::portfolio::{PortfolioRecord, Project};

pub struct ProfileLoader {
    store: Arc<dyn PortfolioStore>,
    importer: Arc<RepositoryImporter>,
}

impl ProfileLoader {
    pub fn new(store: Arc<dyn PortfolioStore>, importer: Arc<RepositoryImporter>) -> Self {
        Self { store, importer }
    }

    /// Create mode: prefill from the identity once, then import repositories.
    ///
    /// Calling this again on the same session does nothing.
    pub async fn seed_create(&self, wizard: &SharedWizard, ctx: &SessionContext) -> bool {
        if !wizard.lock().await.seed_from_identity(ctx) {
            return false;
        }
        self.import_after_seed(wizard, ctx, Vec::new()).await;
        true
    }

    /// Edit mode with the record already in hand.
    pub async fn seed_edit_from_record(
        &self,
        wizard: &SharedWizard,
        ctx: &SessionContext,
        record: &PortfolioRecord,
    ) -> bool {
        let previous = wizard.lock().await.seed_from_record(record);
        match previous {
            Some(previous) => {
                self.import_after_seed(wizard, ctx, previous).await;
                true
            }
            None => false,
        }
    }

    /// Edit mode by id: shows the loading state, fetches once, then seeds and imports.
    ///
    /// On failure the session leaves the loading state with an empty draft.
    pub async fn load_edit_by_id(
        &self,
        wizard: &SharedWizard,
        ctx: &SessionContext,
        portfolio_id: Uuid,
    ) -> Result<(), WizardError> {
        {
            let mut wizard = wizard.lock().await;
            if wizard.init_state() == InitState::Ready {
                return Ok(());
            }
            // Callers may already have entered the loading state to report it.
            wizard.begin_seeding();
        }

        let fetched = match self.store.fetch_by_id(portfolio_id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(StoreError::NotFound(portfolio_id)),
            Err(e) => Err(e),
        };

        let record = match fetched {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to fetch portfolio {portfolio_id}: {e}");
                wizard.lock().await.abandon_seeding();
                return Err(e.into());
            }
        };

        info!("Loaded portfolio {portfolio_id} for editing");
        self.seed_edit_from_record(wizard, ctx, &record).await;
        Ok(())
    }

    /// Import repositories into a freshly seeded session, merging against `previous`.
    ///
    /// Does nothing when the identity has no GitHub handle. Failures leave the
    /// seeded projects in place.
    pub async fn import_after_seed(
        &self,
        wizard: &SharedWizard,
        ctx: &SessionContext,
        previous: Vec<Project>,
    ) {
        let Some(handle) = ctx.github_handle() else {
            return;
        };
        match self.importer.import_into(wizard, handle, previous).await {
            Ok(_) => {}
            // Fetch failures are already logged by the importer.
            Err(WizardError::Import(_)) => {}
            Err(e) => warn!("Repository import for {handle} did not run: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::aggregator::{InitState, WizardAggregator, WizardMode};
    use crate::wizard::test_support::{MemoryStore, ScriptedSource, sample_record};
    use tokio::sync::Mutex;

    fn ctx(handle: Option<&str>) -> SessionContext {
        SessionContext {
            user_id: Uuid::new_v4(),
            display_name: Some("Ada Lovelace".into()),
            bio: Some("Analyst".into()),
            avatar_url: Some("https://avatars.example/ada.png".into()),
            github_handle: handle.map(str::to_string),
        }
    }

    fn loader(store: Arc<MemoryStore>, source: Arc<ScriptedSource>) -> ProfileLoader {
        ProfileLoader::new(store, Arc::new(RepositoryImporter::new(source, 100, 20)))
    }

    fn edit_wizard(id: Uuid) -> SharedWizard {
        Arc::new(Mutex::new(WizardAggregator::new(WizardMode::Edit {
            portfolio_id: id,
        })))
    }

    #[tokio::test]
    async fn create_seeding_runs_once_and_imports() {
        let source = Arc::new(ScriptedSource::pages(vec![Some(2), Some(0)]));
        let loader = loader(Arc::new(MemoryStore::default()), source.clone());
        let ctx = ctx(Some("ada"));
        let wizard = Arc::new(Mutex::new(WizardAggregator::new(WizardMode::Create {
            owner_id: ctx.user_id,
        })));

        assert!(loader.seed_create(&wizard, &ctx).await);
        assert!(!loader.seed_create(&wizard, &ctx).await);

        assert_eq!(source.calls(), 2);
        let w = wizard.lock().await;
        assert_eq!(w.draft().personal.name, "Ada Lovelace");
        assert_eq!(w.draft().socials.github.as_deref(), Some("ada"));
        assert_eq!(w.draft().projects.len(), 2);
        assert!(w.draft().projects.iter().all(|p| !p.selected));
    }

    #[tokio::test]
    async fn create_without_handle_skips_import() {
        let source = Arc::new(ScriptedSource::pages(vec![Some(2)]));
        let loader = loader(Arc::new(MemoryStore::default()), source.clone());
        let ctx = ctx(None);
        let wizard = Arc::new(Mutex::new(WizardAggregator::new(WizardMode::Create {
            owner_id: ctx.user_id,
        })));

        assert!(loader.seed_create(&wizard, &ctx).await);
        assert_eq!(source.calls(), 0);
        assert_eq!(wizard.lock().await.draft().socials.github, None);
    }

    #[tokio::test]
    async fn direct_record_seeds_every_slice_and_merges_selection() {
        let source = Arc::new(ScriptedSource::pages(vec![Some(3), Some(0)]));
        let loader = loader(Arc::new(MemoryStore::default()), source);
        let ctx = ctx(Some("ada"));
        let record = sample_record(ctx.user_id);
        let wizard = edit_wizard(record.id);

        assert!(loader.seed_edit_from_record(&wizard, &ctx, &record).await);

        let w = wizard.lock().await;
        assert_eq!(w.draft().personal, record.personal);
        assert_eq!(w.draft().skills, record.skills);
        assert_eq!(w.draft().theme, record.theme);
        let names: Vec<(&str, bool)> = w
            .draft()
            .projects
            .iter()
            .map(|p| (p.name.as_str(), p.selected))
            .collect();
        assert_eq!(
            names,
            vec![("repo-1-0", true), ("repo-1-1", false), ("repo-1-2", false)]
        );
    }

    #[tokio::test]
    async fn load_by_id_fetches_exactly_once() {
        let store = Arc::new(MemoryStore::default());
        let ctx = ctx(Some("ada"));
        let record = sample_record(ctx.user_id);
        store.insert(record.clone());
        let loader = loader(store.clone(), Arc::new(ScriptedSource::pages(vec![])));
        let wizard = edit_wizard(record.id);

        loader.load_edit_by_id(&wizard, &ctx, record.id).await.unwrap();
        loader.load_edit_by_id(&wizard, &ctx, record.id).await.unwrap();

        assert_eq!(store.reads(), 1);
        let w = wizard.lock().await;
        assert_eq!(w.init_state(), InitState::Ready);
        assert_eq!(w.draft().personal.name, "Ada Lovelace");
        // The listing came back empty, so every stored project was dropped.
        assert!(w.draft().projects.is_empty());
    }

    #[tokio::test]
    async fn missing_record_leaves_defaults_and_clears_loading() {
        let store = Arc::new(MemoryStore::default());
        let source = Arc::new(ScriptedSource::pages(vec![Some(1)]));
        let loader = loader(store, source.clone());
        let id = Uuid::new_v4();
        let wizard = edit_wizard(id);

        let err = loader
            .load_edit_by_id(&wizard, &ctx(Some("ada")), id)
            .await
            .unwrap_err();

        assert!(matches!(err, WizardError::Store(StoreError::NotFound(_))));
        assert_eq!(source.calls(), 0);
        let w = wizard.lock().await;
        assert!(!w.is_loading());
        assert_eq!(w.draft(), &Default::default());
    }

    #[tokio::test]
    async fn load_by_id_proceeds_when_already_marked_loading() {
        let store = Arc::new(MemoryStore::default());
        let ctx = ctx(None);
        let record = sample_record(ctx.user_id);
        store.insert(record.clone());
        let loader = loader(store.clone(), Arc::new(ScriptedSource::pages(vec![])));
        let wizard = edit_wizard(record.id);
        assert!(wizard.lock().await.begin_seeding());

        loader.load_edit_by_id(&wizard, &ctx, record.id).await.unwrap();

        assert_eq!(store.reads(), 1);
        let w = wizard.lock().await;
        assert!(!w.is_loading());
        assert_eq!(w.draft().skills, record.skills);
    }

    #[tokio::test]
    async fn import_after_seed_skips_while_another_import_runs() {
        let source = Arc::new(ScriptedSource::pages(vec![Some(2)]));
        let loader = loader(Arc::new(MemoryStore::default()), source.clone());
        let ctx = ctx(Some("ada"));
        let wizard = Arc::new(Mutex::new(WizardAggregator::new(WizardMode::Create {
            owner_id: ctx.user_id,
        })));
        let ticket = wizard.lock().await.begin_import(Vec::new()).unwrap();

        loader.import_after_seed(&wizard, &ctx, Vec::new()).await;

        assert_eq!(source.calls(), 0);
        let mut w = wizard.lock().await;
        assert!(w.is_importing());
        assert!(w.draft().projects.is_empty());
        assert!(w.finish_import(ticket, Ok(Vec::new())).is_ok());
    }
}
