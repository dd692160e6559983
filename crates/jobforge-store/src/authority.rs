//! Remote authority protocol
//!
//! The authority is the source of truth for persisted entities. The store
//! talks to it through [`RemoteAuthority`] at the JSON-value level so one
//! object-safe trait covers every group; typed encoding and decoding stays
//! in the store.

use async_trait::async_trait;
use jobforge_model::Group;
use serde::{Deserialize, Serialize};

/// Authoritative reply to a write operation
///
/// `config` is the entity as the authority persisted it, which may differ
/// from what was sent (server-assigned fields). For deletes it identifies
/// the removed entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteReply {
    /// Authoritative entity state
    pub config: serde_json::Value,
    /// Downstream job updates triggered by the write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_update_results: Option<JobUpdateResults>,
}

/// Downstream job updates triggered by a write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdateResults {
    /// Jobs newly generated
    #[serde(default)]
    pub jobs_created: Vec<JobUpdateResult>,
    /// Jobs whose definition was regenerated
    #[serde(default)]
    pub jobs_rewritten: Vec<JobUpdateResult>,
    /// Archived jobs brought back
    #[serde(default)]
    pub jobs_revived: Vec<JobUpdateResult>,
    /// Jobs no longer configured and archived
    #[serde(default)]
    pub jobs_archived: Vec<JobUpdateResult>,
}

impl JobUpdateResults {
    /// Whether the write touched no jobs at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs_created.is_empty()
            && self.jobs_rewritten.is_empty()
            && self.jobs_revived.is_empty()
            && self.jobs_archived.is_empty()
    }

    /// Every entry that reported a failure
    pub fn failures(&self) -> impl Iterator<Item = &JobUpdateResult> {
        self.jobs_created
            .iter()
            .chain(&self.jobs_rewritten)
            .chain(&self.jobs_revived)
            .chain(&self.jobs_archived)
            .filter(|entry| !entry.success)
    }
}

/// Outcome for one downstream job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdateResult {
    /// Affected job name
    pub job_name: String,
    /// Whether the update went through
    pub success: bool,
    /// Detail message from the job updater
    pub message: String,
}

/// Failures surfaced by an authority implementation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthorityError {
    /// The authority processed the request and said no
    #[error("{message}")]
    Rejected {
        /// Plain-text error body
        message: String,
        /// Job updates that happened despite the rejection
        job_update_results: Option<JobUpdateResults>,
    },

    /// The request never completed
    #[error("transport failure: {0}")]
    Transport(String),

    /// The reply body could not be decoded
    #[error("malformed reply: {0}")]
    Decode(String),
}

impl AuthorityError {
    /// Rejection without job updates
    #[inline]
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            job_update_results: None,
        }
    }

    /// Message to surface to the user
    ///
    /// Causes that carry no recognizable text normalize to `unknown error`.
    #[must_use]
    pub fn surface_message(&self) -> String {
        let raw = match self {
            AuthorityError::Rejected { message, .. } => message.as_str(),
            AuthorityError::Transport(message) | AuthorityError::Decode(message) => {
                message.as_str()
            }
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            "unknown error".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// The remote service persisting every configuration group
///
/// All replies are authoritative: the store overwrites its local state with
/// whatever comes back, never merging field by field.
#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    /// `GET /{group}` - every entity of a group
    async fn fetch_all(&self, group: Group) -> Result<Vec<serde_json::Value>, AuthorityError>;

    /// `POST /{group}` - persist a new entity
    async fn create(
        &self,
        group: Group,
        body: serde_json::Value,
    ) -> Result<WriteReply, AuthorityError>;

    /// `PUT /{group}/{id}` - replace an existing entity
    async fn update(
        &self,
        group: Group,
        id: &str,
        body: serde_json::Value,
    ) -> Result<WriteReply, AuthorityError>;

    /// `DELETE /{group}/{id}` - remove an entity
    async fn delete(&self, group: Group, id: &str) -> Result<WriteReply, AuthorityError>;
}
