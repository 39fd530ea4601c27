//! Mutation coordinators.
//!
//! Each coordinator runs one user action through the same sequence:
//! local validation, the remote call, then a pure patch of the affected
//! cached listing. Nothing is applied before the backend confirms, so a
//! failure leaves the cache exactly as it was.

pub mod file;
pub mod folder;
pub mod trash;
pub mod upload;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use esbox_cache::{CacheKey, ListingCache, ListingPatch};
use esbox_core::error::AppError;
use esbox_core::result::AppResult;

use crate::notification::NotificationCenter;

pub use file::FileCoordinator;
pub use folder::FolderCoordinator;
pub use trash::TrashCoordinator;
pub use upload::{UploadCoordinator, UploadPhase, UploadProgress};

/// Where a coordinator is in its current action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationPhase {
    /// No action started yet.
    Idle,
    /// Checking input locally.
    Validating,
    /// Waiting for the backend.
    InFlight,
    /// Backend confirmed and the cache was patched.
    Applied,
    /// Nothing to do (e.g. rename to the same name).
    NoOp,
    /// Validation or the remote call failed; the cache is untouched.
    Failed,
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::InFlight => write!(f, "in_flight"),
            Self::Applied => write!(f, "applied"),
            Self::NoOp => write!(f, "no_op"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of a successful coordinator call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MutationOutcome {
    /// The mutation went through; `message` is what the toast showed.
    Applied {
        /// Success message.
        message: String,
    },
    /// Nothing needed doing; no request was sent.
    NoOp,
}

impl MutationOutcome {
    /// Whether the backend was changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// The success message, if applied.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Applied { message } => Some(message),
            Self::NoOp => None,
        }
    }
}

/// Plumbing shared by every coordinator: phase reporting, cache access, toasts.
#[derive(Debug, Clone)]
pub(crate) struct Mutations {
    cache: ListingCache,
    notifications: NotificationCenter,
    phase: Arc<watch::Sender<MutationPhase>>,
}

impl Mutations {
    pub(crate) fn new(cache: ListingCache, notifications: NotificationCenter) -> Self {
        let (tx, _rx) = watch::channel(MutationPhase::Idle);
        Self {
            cache,
            notifications,
            phase: Arc::new(tx),
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<MutationPhase> {
        self.phase.subscribe()
    }

    pub(crate) fn phase(&self) -> MutationPhase {
        *self.phase.borrow()
    }

    pub(crate) fn cache(&self) -> &ListingCache {
        &self.cache
    }

    fn enter(&self, op: &'static str, phase: MutationPhase) {
        self.phase.send_replace(phase);
        debug!(op, %phase, "Mutation phase");
    }

    pub(crate) fn validating(&self, op: &'static str) {
        self.enter(op, MutationPhase::Validating);
    }

    /// Local validation failed; the dialog shows the message inline.
    pub(crate) fn reject(&self, op: &'static str, err: AppError) -> AppError {
        self.enter(op, MutationPhase::Failed);
        debug!(op, error = %err.message, "Rejected before sending");
        err
    }

    pub(crate) fn no_op(&self, op: &'static str) -> MutationOutcome {
        self.enter(op, MutationPhase::NoOp);
        MutationOutcome::NoOp
    }

    /// Await the remote call; a failure raises an error toast and is returned as-is.
    pub(crate) async fn remote<T, Fut>(&self, op: &'static str, call: Fut) -> AppResult<T>
    where
        Fut: Future<Output = AppResult<T>>,
    {
        self.enter(op, MutationPhase::InFlight);
        match call.await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.enter(op, MutationPhase::Failed);
                warn!(op, kind = %err.kind, error = %err.message, "Mutation failed");
                self.notifications.error(err.message.clone());
                Err(err)
            }
        }
    }

    /// Patch `key` and filter it through the key's view predicate.
    pub(crate) async fn patch(&self, key: &CacheKey, patch: &ListingPatch) -> bool {
        self.cache
            .patch(key, |listing| patch.apply_in_view(key, listing))
            .await
    }

    /// Mark another listing stale unless it is the one just patched.
    pub(crate) fn invalidate_other(&self, patched: &CacheKey, key: &CacheKey) {
        if patched != key {
            self.cache.invalidate(key);
        }
    }

    pub(crate) fn applied(&self, op: &'static str, message: String) -> MutationOutcome {
        self.enter(op, MutationPhase::Applied);
        info!(op, %message, "Mutation applied");
        self.notifications.success(message.clone());
        MutationOutcome::Applied { message }
    }
}

/// Trim and require a non-empty name.
pub(crate) fn clean_name<'a>(raw: &'a str, what: &str) -> Result<&'a str, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation(format!("{what} name cannot be empty")));
    }
    Ok(name)
}
