//! In-memory fakes for wizard unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use super::store::PortfolioStore;
use crate::error::{ImportError, StoreError};
use crate::github::{RepoSource, RepoSummary};
use crate::models::portfolio::{
    PersonalInfo, PortfolioPatch, PortfolioPayload, PortfolioRecord, Project, Socials,
};
use crate::models::theme::Theme;

/// Answers calls in order from a script: `Some(n)` yields `n` repositories,
/// `None` fails with HTTP 502. Once the script runs out every page is empty.
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Option<usize>>>,
    endless: Option<usize>,
    requested: Mutex<Vec<u32>>,
}

impl ScriptedSource {
    pub(crate) fn pages(script: Vec<Option<usize>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            endless: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Every page holds `per_page` repositories; the listing never ends.
    pub(crate) fn endless(per_page: usize) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            endless: Some(per_page),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }

    pub(crate) fn requested_pages(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepoSource for ScriptedSource {
    async fn list_repos(
        &self,
        handle: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<RepoSummary>, ImportError> {
        self.requested.lock().unwrap().push(page);
        let next = match self.endless {
            Some(n) => Some(n),
            None => self.script.lock().unwrap().pop_front().unwrap_or(Some(0)),
        };
        let count = next.ok_or(ImportError::Status(502))?;
        Ok((0..count)
            .map(|i| RepoSummary {
                name: format!("repo-{page}-{i}"),
                homepage: None,
                html_url: format!("https://github.com/{handle}/repo-{page}-{i}"),
            })
            .collect())
    }
}

/// A [`PortfolioStore`] over a hash map. Writes can be held back on a gate
/// or made to fail.
#[derive(Default)]
pub(crate) struct MemoryStore {
    records: Mutex<HashMap<Uuid, PortfolioRecord>>,
    writes: AtomicUsize,
    reads: AtomicUsize,
    fail_writes: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl MemoryStore {
    pub(crate) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub(crate) fn insert(&self, record: PortfolioRecord) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<PortfolioRecord> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    async fn before_write(&self) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sea_orm::DbErr::Custom(
                "write rejected".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn create(
        &self,
        owner_id: Uuid,
        payload: PortfolioPayload,
    ) -> Result<PortfolioRecord, StoreError> {
        self.before_write().await?;
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
        self.insert(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: PortfolioPatch) -> Result<PortfolioRecord, StoreError> {
        self.before_write().await?;
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
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.user_id == owner_id)
            .cloned())
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<PortfolioRecord>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(id))
    }
}

/// A stored portfolio with two projects, one of them selected.
pub(crate) fn sample_record(owner_id: Uuid) -> PortfolioRecord {
    let now = chrono::Utc::now();
    PortfolioRecord {
        id: Uuid::new_v4(),
        user_id: owner_id,
        personal: PersonalInfo {
            name: "Ada Lovelace".into(),
            bio: "Analyst".into(),
            role: "Engineer".into(),
            location: "London".into(),
            image: String::new(),
        },
        skills: vec!["Rust".into(), "Math".into()],
        projects: vec![
            Project {
                name: "repo-1-0".into(),
                url: "https://github.com/ada/repo-1-0".into(),
                selected: true,
            },
            Project {
                name: "retired".into(),
                url: "https://github.com/ada/retired".into(),
                selected: true,
            },
        ],
        socials: Socials {
            github: Some("ada".into()),
            ..Default::default()
        },
        experience: Vec::new(),
        theme: Theme::Dark,
        link: "ada-lovelace-portfolio".into(),
        created_at: now,
        updated_at: now,
    }
}
