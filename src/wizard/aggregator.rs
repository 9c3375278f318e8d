//! The in-memory draft a user edits across the wizard steps, and its single submit.

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use super::SharedWizard;
use super::context::SessionContext;
use super::importer::merge_projects;
use super::step::Step;
use super::store::PortfolioStore;
use crate::error::{ImportError, StoreError, WizardError};
use crate::models::portfolio::{
    ExperienceEntry, NewExperience, PersonalInfo, PersonalPatch, PortfolioPatch,
    PortfolioPayload, PortfolioRecord, Project, SocialKey, Socials,
};
use crate::models::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    Create { owner_id: Uuid },
    Edit { portfolio_id: Uuid },
}

/// One-way initialisation state. Seeding happens at most once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitState {
    Uninitialized,
    Seeding,
    Ready,
}

/// The record being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub personal: PersonalInfo,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub experience: Vec<ExperienceEntry>,
    pub socials: Socials,
    pub theme: Theme,
}

/// The store call a submit resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRequest {
    Create {
        owner_id: Uuid,
        payload: PortfolioPayload,
    },
    Update {
        portfolio_id: Uuid,
        patch: PortfolioPatch,
    },
}

impl SubmitRequest {
    pub async fn dispatch(self, store: &dyn PortfolioStore) -> Result<PortfolioRecord, StoreError> {
        match self {
            SubmitRequest::Create { owner_id, payload } => store.create(owner_id, payload).await,
            SubmitRequest::Update {
                portfolio_id,
                patch,
            } => store.update(portfolio_id, patch).await,
        }
    }
}

/// Proof that an import was started; hand it back to [`WizardAggregator::finish_import`].
#[derive(Debug)]
pub struct ImportTicket {
    previous: Vec<Project>,
}

/// Public link slug: lower-cased name, whitespace runs joined by `-`, plus `-portfolio`.
pub fn shareable_link(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "user-portfolio".to_string()
    } else {
        format!("{slug}-portfolio")
    }
}

#[derive(Debug)]
pub struct WizardAggregator {
    mode: WizardMode,
    step: Step,
    init: InitState,
    draft: Draft,
    scratch_experience: NewExperience,
    seeded_from_record: bool,
    submitting: bool,
    importing: bool,
}

/// Serializable snapshot of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub mode: &'static str,
    pub portfolio_id: Option<Uuid>,
    pub step: Step,
    pub step_number: u8,
    pub loading: bool,
    pub importing: bool,
    pub submitting: bool,
    pub draft: Draft,
    pub scratch_experience: NewExperience,
}

impl WizardAggregator {
    pub fn new(mode: WizardMode) -> Self {
        Self {
            mode,
            step: Step::default(),
            init: InitState::Uninitialized,
            draft: Draft::default(),
            scratch_experience: NewExperience::default(),
            seeded_from_record: false,
            submitting: false,
            importing: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn init_state(&self) -> InitState {
        self.init
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn scratch_experience(&self) -> &NewExperience {
        &self.scratch_experience
    }

    pub fn is_loading(&self) -> bool {
        self.init == InitState::Seeding
    }

    pub fn is_importing(&self) -> bool {
        self.importing
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn view(&self) -> WizardView {
        let (mode, portfolio_id) = match self.mode {
            WizardMode::Create { .. } => ("create", None),
            WizardMode::Edit { portfolio_id } => ("edit", Some(portfolio_id)),
        };
        WizardView {
            mode,
            portfolio_id,
            step: self.step,
            step_number: self.step.number(),
            loading: self.is_loading(),
            importing: self.importing,
            submitting: self.submitting,
            draft: self.draft.clone(),
            scratch_experience: self.scratch_experience.clone(),
        }
    }

    // ── Navigation ──

    pub fn advance(&mut self) -> Step {
        self.step = self.step.next();
        self.step
    }

    pub fn retreat(&mut self) -> Step {
        self.step = self.step.prev();
        self.step
    }

    // ── Slice edits ──

    pub fn set_personal(&mut self, patch: PersonalPatch) {
        self.draft.personal.apply(patch);
    }

    /// Add the skill if absent, remove it if present.
    pub fn toggle_skill(&mut self, label: &str) {
        if label.is_empty() {
            return;
        }
        if let Some(pos) = self.draft.skills.iter().position(|s| s == label) {
            self.draft.skills.remove(pos);
        } else {
            self.draft.skills.push(label.to_string());
        }
    }

    /// Returns `false` when the trimmed label is empty or already present.
    pub fn add_custom_skill(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.draft.skills.iter().any(|s| s == label) {
            return false;
        }
        self.draft.skills.push(label.to_string());
        true
    }

    pub fn remove_skill(&mut self, label: &str) -> bool {
        let before = self.draft.skills.len();
        self.draft.skills.retain(|s| s != label);
        self.draft.skills.len() != before
    }

    pub fn toggle_project_selected(&mut self, index: usize) -> bool {
        match self.draft.projects.get_mut(index) {
            Some(project) => {
                project.selected = !project.selected;
                true
            }
            None => false,
        }
    }

    pub fn set_scratch_experience(&mut self, entry: NewExperience) {
        self.scratch_experience = entry;
    }

    /// Append `entry` if it names both a company and a role.
    ///
    /// The entry is kept as the scratch input either way; only a successful add clears it.
    pub fn add_experience(&mut self, entry: NewExperience) -> bool {
        self.scratch_experience = entry;
        if !self.scratch_experience.is_complete() {
            return false;
        }
        let entry = std::mem::take(&mut self.scratch_experience);
        self.draft
            .experience
            .push(entry.into_entry(Uuid::new_v4().to_string()));
        true
    }

    /// Replace the entry at `index`, keeping its id.
    pub fn update_experience(&mut self, index: usize, entry: NewExperience) -> bool {
        match self.draft.experience.get_mut(index) {
            Some(existing) => {
                let id = std::mem::take(&mut existing.id);
                let id = if id.is_empty() { Uuid::new_v4().to_string() } else { id };
                *existing = entry.into_entry(id);
                true
            }
            None => false,
        }
    }

    pub fn delete_experience(&mut self, index: usize) -> bool {
        if index < self.draft.experience.len() {
            self.draft.experience.remove(index);
            true
        } else {
            false
        }
    }

    pub fn set_social(&mut self, key: SocialKey, value: &str) {
        self.draft.socials.set(key, value);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.draft.theme = theme;
    }

    // ── Seeding ──

    /// Enter the loading state ahead of an asynchronous fetch.
    pub fn begin_seeding(&mut self) -> bool {
        if self.init != InitState::Uninitialized {
            return false;
        }
        self.init = InitState::Seeding;
        true
    }

    /// Copy every slice from a stored record. Returns the record's projects, which
    /// the follow-up import merges against, or `None` if the session was already seeded.
    pub fn seed_from_record(&mut self, record: &PortfolioRecord) -> Option<Vec<Project>> {
        if self.init == InitState::Ready {
            return None;
        }
        self.draft = Draft {
            personal: record.personal.clone(),
            skills: record.skills.clone(),
            projects: record.projects.clone(),
            experience: record.experience.clone(),
            socials: record.socials.clone(),
            theme: record.theme,
        };
        self.mode = WizardMode::Edit {
            portfolio_id: record.id,
        };
        self.seeded_from_record = true;
        self.init = InitState::Ready;
        Some(record.projects.clone())
    }

    /// Prefill a new portfolio from the signed-in identity. Runs at most once.
    pub fn seed_from_identity(&mut self, ctx: &SessionContext) -> bool {
        if self.init != InitState::Uninitialized {
            return false;
        }
        self.draft.personal = PersonalInfo {
            name: ctx.display_name.clone().unwrap_or_default(),
            bio: ctx.bio.clone().unwrap_or_default(),
            role: String::new(),
            location: String::new(),
            image: ctx.avatar_url.clone().unwrap_or_default(),
        };
        self.draft
            .socials
            .set(SocialKey::Github, ctx.github_handle().unwrap_or_default());
        self.init = InitState::Ready;
        true
    }

    /// Leave the loading state without data, e.g. after a failed fetch.
    pub fn abandon_seeding(&mut self) {
        if self.init == InitState::Seeding {
            self.init = InitState::Ready;
        }
    }

    // ── Import ──

    pub fn begin_import(&mut self, previous: Vec<Project>) -> Result<ImportTicket, WizardError> {
        if self.importing {
            return Err(WizardError::ImportInFlight);
        }
        self.importing = true;
        Ok(ImportTicket { previous })
    }

    /// Start an import that preserves the selections currently in the draft.
    pub fn begin_refresh(&mut self) -> Result<ImportTicket, WizardError> {
        let previous = self.draft.projects.clone();
        self.begin_import(previous)
    }

    /// Always clears the busy flag. On success the merged list replaces the
    /// draft's projects; on failure they are left as they were.
    pub fn finish_import(
        &mut self,
        ticket: ImportTicket,
        fetched: Result<Vec<Project>, ImportError>,
    ) -> Result<usize, ImportError> {
        self.importing = false;
        let fetched = fetched?;
        self.draft.projects = merge_projects(&ticket.previous, fetched);
        Ok(self.draft.projects.len())
    }

    // ── Submit ──

    pub fn payload(&self) -> PortfolioPayload {
        PortfolioPayload {
            personal: self.draft.personal.clone(),
            skills: self.draft.skills.clone(),
            projects: self
                .draft
                .projects
                .iter()
                .filter(|p| p.selected)
                .cloned()
                .collect(),
            socials: self.draft.socials.clone(),
            experience: self.draft.experience.clone(),
            theme: self.draft.theme,
            link: shareable_link(&self.draft.personal.name),
        }
    }

    /// Validate and mark a submit as outstanding.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, WizardError> {
        if self.submitting {
            return Err(WizardError::SubmitInFlight);
        }
        if self.init == InitState::Seeding {
            return Err(WizardError::StillLoading);
        }
        if matches!(self.mode, WizardMode::Edit { .. }) && !self.seeded_from_record {
            return Err(WizardError::NothingLoaded);
        }

        let payload = self.payload();
        self.submitting = true;
        Ok(match self.mode {
            WizardMode::Create { owner_id } => SubmitRequest::Create { owner_id, payload },
            WizardMode::Edit { portfolio_id } => SubmitRequest::Update {
                portfolio_id,
                patch: payload.into(),
            },
        })
    }

    /// Clear the outstanding submit. The draft is never modified here, so a
    /// failed submit can simply be retried.
    pub fn finish_submit(
        &mut self,
        result: Result<PortfolioRecord, StoreError>,
    ) -> Result<PortfolioRecord, WizardError> {
        self.submitting = false;
        let record = result?;
        self.mode = WizardMode::Edit {
            portfolio_id: record.id,
        };
        self.seeded_from_record = true;
        Ok(record)
    }
}

/// Run one submit against `store` without holding the wizard lock across the write.
pub async fn submit(
    wizard: &SharedWizard,
    store: &dyn PortfolioStore,
) -> Result<PortfolioRecord, WizardError> {
    let request = wizard.lock().await.begin_submit()?;
    let result = request.dispatch(store).await;
    if let Err(e) = &result {
        error!("Failed to save portfolio: {e}");
    }
    let record = wizard.lock().await.finish_submit(result)?;
    info!("Saved portfolio {} for user {}", record.id, record.user_id);
    Ok(record)
}
