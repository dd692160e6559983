//! Platform entities
//!
//! A platform is one OS/version/architecture combination together with the
//! execution providers (and their node pools) that can run jobs on it.

use crate::entity::{ConfigEntity, Group, Variable};
use serde::{Deserialize, Serialize};

/// One OS/version/architecture combination
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    /// Identifier, unique among platforms
    pub id: String,
    /// Operating system family, e.g. `el` or `f`
    pub os: String,
    /// OS version label, e.g. `8` or `rawhide`
    pub version: String,
    /// Numeric version used for ordering and comparisons
    pub version_number: String,
    /// CPU architecture, e.g. `x86_64`
    pub architecture: String,
    /// Free-form routing tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Execution providers able to run jobs on this platform
    #[serde(default)]
    pub providers: Vec<PlatformProvider>,
    /// Custom variables exported to jobs on this platform
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Platform {
    /// Create a new platform
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// With OS, version and architecture
    #[inline]
    #[must_use]
    pub fn with_os(
        mut self,
        os: impl Into<String>,
        version: impl Into<String>,
        architecture: impl Into<String>,
    ) -> Self {
        self.os = os.into();
        self.version = version.into();
        self.architecture = architecture.into();
        self
    }

    /// With the numeric version label
    #[inline]
    #[must_use]
    pub fn with_version_number(mut self, version_number: impl Into<String>) -> Self {
        self.version_number = version_number.into();
        self
    }

    /// With an execution provider
    #[inline]
    #[must_use]
    pub fn with_provider(mut self, provider: PlatformProvider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Look up a declared provider by id
    #[inline]
    #[must_use]
    pub fn provider(&self, id: &str) -> Option<&PlatformProvider> {
        self.providers.iter().find(|p| p.id == id)
    }
}

impl ConfigEntity for Platform {
    const GROUP: Group = Group::Platforms;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Execution provider declared on a platform, with its node pools
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformProvider {
    /// Provider identifier, unique within the platform
    pub id: String,
    /// Bare-metal node labels
    #[serde(default)]
    pub hw_nodes: Vec<String>,
    /// Virtual machine node labels
    #[serde(default)]
    pub vm_nodes: Vec<String>,
}

impl PlatformProvider {
    /// Create a new provider
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// With hardware node labels
    #[inline]
    #[must_use]
    pub fn with_hw_nodes(mut self, nodes: Vec<String>) -> Self {
        self.hw_nodes = nodes;
        self
    }

    /// With VM node labels
    #[inline]
    #[must_use]
    pub fn with_vm_nodes(mut self, nodes: Vec<String>) -> Self {
        self.vm_nodes = nodes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_lookup() {
        let platform = Platform::new("el8.x86_64")
            .with_os("el", "8", "x86_64")
            .with_provider(PlatformProvider::new("vagrant"))
            .with_provider(PlatformProvider::new("beaker"));

        assert!(platform.provider("vagrant").is_some());
        assert!(platform.provider("openstack").is_none());
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let platform = Platform::new("f39.aarch64").with_version_number("39");
        let json = serde_json::to_value(&platform).unwrap();
        assert!(json.get("versionNumber").is_some());
        assert!(json.get("version_number").is_none());
    }
}
