//! Build provider entities

use crate::entity::{ConfigEntity, Group};
use serde::{Deserialize, Serialize};

/// External build service jobs are submitted to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildProvider {
    /// Identifier, unique among build providers
    pub id: String,
    /// Web UI entry point
    pub top_url: String,
    /// Artifact download endpoint
    pub download_url: String,
}

impl BuildProvider {
    /// Create a new build provider
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// With both endpoint URLs
    #[inline]
    #[must_use]
    pub fn with_urls(mut self, top_url: impl Into<String>, download_url: impl Into<String>) -> Self {
        self.top_url = top_url.into();
        self.download_url = download_url.into();
        self
    }
}

impl ConfigEntity for BuildProvider {
    const GROUP: Group = Group::BuildProviders;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
