use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use super::SharedWizard;
use super::aggregator::{self, WizardAggregator, WizardMode};
use super::context::SessionContext;
use super::importer::RepositoryImporter;
use super::loader::ProfileLoader;
use super::store::PortfolioStore;
use crate::error::WizardError;
use crate::models::portfolio::{PortfolioRecord, Project};

/// Live wizard sessions, one per owner.
///
/// Each session is an independently locked aggregator; the map lock is only
/// held to look sessions up or swap them.
pub struct WizardSessions {
    sessions: RwLock<HashMap<Uuid, SharedWizard>>,
    store: Arc<dyn PortfolioStore>,
    importer: Arc<RepositoryImporter>,
    loader: ProfileLoader,
}

impl WizardSessions {
    pub fn new(store: Arc<dyn PortfolioStore>, importer: Arc<RepositoryImporter>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            loader: ProfileLoader::new(store.clone(), importer.clone()),
            store,
            importer,
        }
    }

    pub fn store(&self) -> &Arc<dyn PortfolioStore> {
        &self.store
    }

    pub fn loader(&self) -> &ProfileLoader {
        &self.loader
    }

    /// Start a fresh session for `user_id`, replacing any open one.
    pub async fn open(&self, user_id: Uuid, mode: WizardMode) -> SharedWizard {
        let wizard = Arc::new(Mutex::new(WizardAggregator::new(mode)));
        let replaced = self
            .sessions
            .write()
            .await
            .insert(user_id, wizard.clone())
            .is_some();
        info!("Opened {mode:?} wizard for user {user_id} (replaced existing: {replaced})");
        wizard
    }

    /// Open a create session already prefilled from the identity.
    ///
    /// Repositories are not imported yet; follow up with
    /// [`ProfileLoader::import_after_seed`].
    pub async fn open_create(&self, ctx: &SessionContext) -> SharedWizard {
        let wizard = self
            .open(ctx.user_id, WizardMode::Create { owner_id: ctx.user_id })
            .await;
        wizard.lock().await.seed_from_identity(ctx);
        wizard
    }

    /// Open an edit session seeded from `record`. Returns the record's projects,
    /// which the follow-up import merges against.
    pub async fn open_with_record(
        &self,
        user_id: Uuid,
        record: &PortfolioRecord,
    ) -> (SharedWizard, Vec<Project>) {
        let wizard = self
            .open(
                user_id,
                WizardMode::Edit {
                    portfolio_id: record.id,
                },
            )
            .await;
        let previous = wizard
            .lock()
            .await
            .seed_from_record(record)
            .unwrap_or_default();
        (wizard, previous)
    }

    pub async fn get(&self, user_id: Uuid) -> Result<SharedWizard, WizardError> {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(WizardError::NoSession)
    }

    pub async fn discard(&self, user_id: Uuid) -> bool {
        self.sessions.write().await.remove(&user_id).is_some()
    }

    /// Re-import repositories for the owner's session, keeping current selections.
    pub async fn refresh_projects(&self, ctx: &SessionContext) -> Result<usize, WizardError> {
        let wizard = self.get(ctx.user_id).await?;
        self.importer.refresh(&wizard, ctx.github_handle()).await
    }

    /// Submit the owner's draft. A successful write ends the session.
    pub async fn submit(&self, user_id: Uuid) -> Result<PortfolioRecord, WizardError> {
        let wizard = self.get(user_id).await?;
        let record = aggregator::submit(&wizard, self.store.as_ref()).await?;

        let mut sessions = self.sessions.write().await;
        if sessions
            .get(&user_id)
            .is_some_and(|current| Arc::ptr_eq(current, &wizard))
        {
            sessions.remove(&user_id);
        }
        Ok(record)
    }
}
