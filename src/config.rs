use std::env;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::error::ConfigError;

/// Settings for the GitHub repository listing used by the importer.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_url: String,
    pub page_size: u32,
    /// Upper bound on pages requested per import.
    pub max_pages: u32,
    pub timeout: Duration,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            page_size: 100,
            max_pages: 20,
            timeout: Duration::from_secs(15),
        }
    }
}

impl GithubConfig {
    /// GitHub serves at most 100 repositories per page, and an import needs at least one page.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.page_size) {
            return Err(ConfigError::Invalid {
                key: "GITHUB_PAGE_SIZE".to_string(),
                message: "must be between 1 and 100".to_string(),
            });
        }
        if self.max_pages == 0 {
            return Err(ConfigError::Invalid {
                key: "GITHUB_MAX_PAGES".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub supabase_project_ref: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: Option<String>,
    pub port: u16,
    pub github: GithubConfig,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = required("SUPABASE_URL")?;
        let supabase_project_ref = project_ref(&supabase_url)?;

        let defaults = GithubConfig::default();
        let github = GithubConfig {
            api_url: env::var("GITHUB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            page_size: parsed("GITHUB_PAGE_SIZE", defaults.page_size)?,
            max_pages: parsed("GITHUB_MAX_PAGES", defaults.max_pages)?,
            timeout: Duration::from_secs(parsed("GITHUB_TIMEOUT_SECS", 15)?),
        };

        github.validate()?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            supabase_project_ref,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            port: parsed("PORT", 8080)?,
            github,
            cache: CacheConfig::from_env(),
        })
    }
}

fn required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            message: format!("could not parse {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}

/// Extract `PROJECT` from `https://PROJECT.supabase.co`.
pub fn project_ref(supabase_url: &str) -> Result<String, ConfigError> {
    supabase_url
        .trim_end_matches('/')
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Invalid {
            key: "SUPABASE_URL".to_string(),
            message: "expected https://PROJECT.supabase.co".to_string(),
        })
}
