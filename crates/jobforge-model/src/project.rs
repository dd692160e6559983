//! Project entities
//!
//! A project ties a source repository to a product, the build providers its
//! jobs are submitted to, and the job configuration tree describing what
//! runs where. The repository clone state is assigned server-side and is
//! never authoritative locally.

use crate::entity::{ConfigEntity, Group};
use crate::tree::JobConfig;
use serde::{Deserialize, Serialize};

/// A configured project
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identifier, unique among projects
    pub id: String,
    /// Plain build project or build-plus-testing project
    #[serde(default)]
    pub kind: ProjectKind,
    /// Source repository URL
    pub url: String,
    /// Product id built by this project
    pub product: String,
    /// Build provider ids jobs are submitted to
    #[serde(default)]
    pub build_providers: Vec<String>,
    /// Server-assigned repository clone lifecycle state
    #[serde(default)]
    pub repo_state: RepoState,
    /// The job configuration tree
    #[serde(default)]
    pub job_configuration: JobConfig,
}

impl Project {
    /// Create a new project
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ProjectKind) -> Self {
        Self {
            id: id.into(),
            kind,
            ..Self::default()
        }
    }

    /// With the source repository URL
    #[inline]
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// With the built product
    #[inline]
    #[must_use]
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    /// With a build provider
    #[inline]
    #[must_use]
    pub fn with_build_provider(mut self, provider: impl Into<String>) -> Self {
        self.build_providers.push(provider.into());
        self
    }
}

impl ConfigEntity for Project {
    const GROUP: Group = Group::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Project flavour, selecting the applicable validation rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectKind {
    /// Builds only; tree roots are build-axis platforms
    #[default]
    Plain,
    /// Test-scoped project; tree roots are test-axis platforms
    WithTesting,
}

/// Repository clone lifecycle, owned by the remote authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepoState {
    /// Clone not yet started
    #[default]
    NotCloned,
    /// Repository cloned and ready
    Cloned,
    /// Clone attempt failed
    CloneError,
}
