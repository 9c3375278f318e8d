use uuid::Uuid;

use crate::models::users;

/// The authenticated identity a wizard session works on behalf of.
///
/// Built once per request from the verified user row and handed to the
/// wizard explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub github_handle: Option<String>,
}

impl SessionContext {
    /// The GitHub login, if the account has one.
    pub fn github_handle(&self) -> Option<&str> {
        self.github_handle.as_deref().filter(|h| !h.is_empty())
    }
}

impl From<&users::Model> for SessionContext {
    fn from(user: &users::Model) -> Self {
        Self {
            user_id: user.id,
            display_name: user.display_name.clone(),
            bio: user.bio.clone(),
            avatar_url: user.avatar_url.clone(),
            github_handle: user.github_handle.clone(),
        }
    }
}
