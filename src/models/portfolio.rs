use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::theme::Theme;

/// SeaORM entity for the `portfolios` table.
///
/// The profile slices are JSON documents; [`PortfolioRecord`] is the typed view.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub personal: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub skills: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub projects: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub socials: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub experience: Json,
    pub theme: String,
    pub link: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── Profile slices ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub bio: String,
    pub role: String,
    pub location: String,
    pub image: String,
}

/// Partial update of [`PersonalInfo`]; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonalPatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

impl PersonalInfo {
    pub fn apply(&mut self, patch: PersonalPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
    }
}

/// A GitHub repository offered for (or chosen for) the portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: String,
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

/// An experience entry as typed by the user, before it gets an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewExperience {
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
}

impl NewExperience {
    pub fn is_complete(&self) -> bool {
        !self.company.trim().is_empty() && !self.role.trim().is_empty()
    }

    /// Build a stored entry. A current position never carries an end date.
    pub fn into_entry(self, id: String) -> ExperienceEntry {
        ExperienceEntry {
            id,
            company: self.company,
            role: self.role,
            start_date: self.start_date,
            end_date: if self.current { String::new() } else { self.end_date },
            current: self.current,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Socials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialKey {
    Github,
    Linkedin,
    Twitter,
}

impl Socials {
    /// Set one link; blank values clear it.
    pub fn set(&mut self, key: SocialKey, value: &str) {
        let value = Some(value.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        match key {
            SocialKey::Github => self.github = value,
            SocialKey::Linkedin => self.linkedin = value,
            SocialKey::Twitter => self.twitter = value,
        }
    }
}

// ── Records ──

/// A persisted portfolio with typed slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub personal: PersonalInfo,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub socials: Socials,
    pub experience: Vec<ExperienceEntry>,
    pub theme: Theme,
    pub link: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl TryFrom<Model> for PortfolioRecord {
    type Error = serde_json::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            user_id: m.user_id,
            personal: serde_json::from_value(m.personal)?,
            skills: serde_json::from_value(m.skills)?,
            projects: serde_json::from_value(m.projects)?,
            socials: serde_json::from_value(m.socials)?,
            experience: serde_json::from_value(m.experience)?,
            theme: Theme::from_name(&m.theme),
            link: m.link,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// Everything a create writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioPayload {
    pub personal: PersonalInfo,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub socials: Socials,
    pub experience: Vec<ExperienceEntry>,
    pub theme: Theme,
    pub link: String,
}

/// Partial update; absent fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioPatch {
    pub personal: Option<PersonalInfo>,
    pub skills: Option<Vec<String>>,
    pub projects: Option<Vec<Project>>,
    pub socials: Option<Socials>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub theme: Option<Theme>,
    pub link: Option<String>,
}

impl From<PortfolioPayload> for PortfolioPatch {
    fn from(p: PortfolioPayload) -> Self {
        Self {
            personal: Some(p.personal),
            skills: Some(p.skills),
            projects: Some(p.projects),
            socials: Some(p.socials),
            experience: Some(p.experience),
            theme: Some(p.theme),
            link: Some(p.link),
        }
    }
}
