//! Entity groups and shared entity plumbing
//!
//! Every configuration item lives in exactly one group and carries a string
//! identifier unique within that group. The identifier is chosen by the user
//! while the entity is being created and is pinned once the entity tracks a
//! remote counterpart.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Configuration groups known to the remote authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// External build services jobs are submitted to
    #[serde(rename = "buildProviders")]
    BuildProviders,
    /// OS/version/architecture combinations
    #[serde(rename = "platforms")]
    Platforms,
    /// Products (JDK version plus package name)
    #[serde(rename = "products")]
    Products,
    /// Declared build/test variant axes
    #[serde(rename = "taskVariants")]
    TaskVariants,
    /// Build and test task definitions
    #[serde(rename = "tasks")]
    Tasks,
    /// Projects embedding a job configuration tree
    #[serde(rename = "projects")]
    Projects,
}

impl Group {
    /// Every group, in fetch order
    pub const ALL: [Group; 6] = [
        Group::BuildProviders,
        Group::Platforms,
        Group::Products,
        Group::TaskVariants,
        Group::Tasks,
        Group::Projects,
    ];

    /// URL path segment used by the remote authority
    #[inline]
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Group::BuildProviders => "buildProviders",
            Group::Platforms => "platforms",
            Group::Products => "products",
            Group::TaskVariants => "taskVariants",
            Group::Tasks => "tasks",
            Group::Projects => "projects",
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Whether a task or variant axis belongs to the build or the test side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    /// Produces build artifacts
    #[default]
    Build,
    /// Exercises build artifacts
    Test,
}

/// Custom key/value variable attached to platforms and tasks
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Variable name as exposed to the job environment
    pub name: String,
    /// Literal value
    pub value: String,
    /// Optional free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Variable {
    /// Create a new variable
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comment: None,
        }
    }

    /// With a comment
    #[inline]
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Common behavior of every group member
///
/// Ties an entity type to its group and exposes identifier access for the
/// store's id-keyed collections.
pub trait ConfigEntity:
    Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Group this entity kind belongs to
    const GROUP: Group;

    /// Identifier, unique within the group
    fn id(&self) -> &str;

    /// Replace the identifier
    ///
    /// Only meaningful while the entity has no remote counterpart; the store
    /// rejects submits that would re-identify a tracked entity.
    fn set_id(&mut self, id: String);
}
