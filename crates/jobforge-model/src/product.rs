//! Product entities

use crate::entity::{ConfigEntity, Group};
use serde::{Deserialize, Serialize};

/// A buildable product: one JDK version and the package it ships as
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier, unique among products
    pub id: String,
    /// JDK version label, e.g. `11` or `17`
    pub version: String,
    /// Source package name, e.g. `java-11-openjdk`
    pub package_name: String,
}

impl Product {
    /// Create a new product
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// With version and package name
    #[inline]
    #[must_use]
    pub fn with_package(
        mut self,
        version: impl Into<String>,
        package_name: impl Into<String>,
    ) -> Self {
        self.version = version.into();
        self.package_name = package_name.into();
        self
    }
}

impl ConfigEntity for Product {
    const GROUP: Group = Group::Products;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
