//! Server-side portfolio wizard: draft state, repository import, loading and sessions.

pub mod aggregator;
pub mod context;
pub mod importer;
pub mod loader;
pub mod sessions;
pub mod step;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;
use tokio::sync::Mutex;

pub use aggregator::{WizardAggregator, WizardMode, WizardView};
pub use context::SessionContext;
pub use sessions::WizardSessions;

/// A wizard shared between request handlers and background tasks.
///
/// Never hold the lock across an `.await`.
pub type SharedWizard = Arc<Mutex<WizardAggregator>>;
