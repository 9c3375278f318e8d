//! Pulls an account's repositories from GitHub into the wizard's project list.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::SharedWizard;
use super::aggregator::ImportTicket;
use crate::config::GithubConfig;
use crate::error::{ImportError, WizardError};
use crate::github::{RepoSource, RepoSummary};
use crate::models::portfolio::Project;

/// Carry selections over from `previous` onto a freshly fetched list.
///
/// The fetched list is authoritative: projects that disappeared upstream are
/// dropped, new ones start unselected, and a name listed twice keeps its first
/// occurrence.
pub fn merge_projects(previous: &[Project], fetched: Vec<Project>) -> Vec<Project> {
    let selected: HashMap<&str, bool> = previous
        .iter()
        .map(|p| (p.name.as_str(), p.selected))
        .collect();
    let mut seen = HashSet::new();

    fetched
        .into_iter()
        .filter(|p| seen.insert(p.name.clone()))
        .map(|mut p| {
            p.selected = selected.get(p.name.as_str()).copied().unwrap_or(false);
            p
        })
        .collect()
}

pub struct RepositoryImporter {
    source: Arc<dyn RepoSource>,
    page_size: u32,
    max_pages: u32,
}

impl RepositoryImporter {
    pub fn new(source: Arc<dyn RepoSource>, page_size: u32, max_pages: u32) -> Self {
        Self {
            source,
            page_size,
            max_pages,
        }
    }

    pub fn from_config(source: Arc<dyn RepoSource>, config: &GithubConfig) -> Self {
        Self::new(source, config.page_size, config.max_pages)
    }

    /// Walk the listing one page at a time until an empty page (or the page cap).
    pub async fn fetch_all(&self, handle: &str) -> Result<Vec<Project>, ImportError> {
        let mut projects = Vec::new();

        for page in 1..=self.max_pages {
            let repos = self.source.list_repos(handle, page, self.page_size).await?;
            if repos.is_empty() {
                return Ok(projects);
            }
            debug!("Page {page} for {handle}: {} repositories", repos.len());
            projects.extend(repos.into_iter().map(RepoSummary::into_project));
        }

        warn!(
            "Stopped listing repositories for {handle} after {} pages ({} collected)",
            self.max_pages,
            projects.len()
        );
        Ok(projects)
    }

    /// Import into `wizard`, merging selections from `previous`.
    pub async fn import_into(
        &self,
        wizard: &SharedWizard,
        handle: &str,
        previous: Vec<Project>,
    ) -> Result<usize, WizardError> {
        let ticket = wizard.lock().await.begin_import(previous)?;
        self.run(wizard, handle, ticket).await
    }

    /// User-triggered re-import that keeps the selections currently in the draft.
    pub async fn refresh(
        &self,
        wizard: &SharedWizard,
        handle: Option<&str>,
    ) -> Result<usize, WizardError> {
        let handle = handle.ok_or(ImportError::MissingHandle)?;
        let ticket = wizard.lock().await.begin_refresh()?;
        self.run(wizard, handle, ticket).await
    }

    async fn run(
        &self,
        wizard: &SharedWizard,
        handle: &str,
        ticket: ImportTicket,
    ) -> Result<usize, WizardError> {
        let fetched = self.fetch_all(handle).await;
        if let Err(e) = &fetched {
            error!("Failed to fetch GitHub repos for {handle}: {e}");
        }

        let count = wizard.lock().await.finish_import(ticket, fetched)?;
        info!("Imported {count} repositories for {handle}");
        Ok(count)
    }
}
