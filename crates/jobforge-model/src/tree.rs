//! Job configuration tree
//!
//! The recursive shape describing which task runs on which platform under
//! which variant combination. The two structural roles a platform node can
//! play are distinct types: a build platform owns tasks, a test platform
//! owns variant selections directly, and only a build-side variant
//! combination may re-root into a nested test subtree. The test axis cannot
//! re-nest, so orphaned depth is impossible by construction.
//!
//! All mutation primitives are pure structural edits. Platform and task
//! inserts are guarded against duplicate ids even though callers normally
//! only offer not-yet-selected candidates; variant combinations are
//! positional and append unconditionally.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Structural mutation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Platform id already present at this level
    #[error("platform '{0}' is already configured")]
    DuplicatePlatform(String),

    /// Task id already present under this platform
    #[error("task '{0}' is already configured")]
    DuplicateTask(String),

    /// Platform id not present at this level
    #[error("platform '{0}' is not configured")]
    UnknownPlatform(String),

    /// Task id not present under this platform
    #[error("task '{0}' is not configured")]
    UnknownTask(String),

    /// Variant combination index past the end of the sequence
    #[error("variant combination {index} out of range ({len} configured)")]
    VariantOutOfRange {
        /// Requested index
        index: usize,
        /// Number of configured combinations
        len: usize,
    },

    /// Platform at this id plays the other structural role
    #[error("platform '{0}' is configured for the other axis")]
    WrongAxis(String),
}

/// Root of a job configuration
///
/// Owns the top-level platform nodes keyed by platform id. Key order is
/// insertion order and drives generated display order; it carries no build
/// selection semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    /// Platform id -> platform node
    #[serde(default)]
    pub platforms: IndexMap<String, PlatformConfig>,
}

impl JobConfig {
    /// Create an empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a build-axis platform
    ///
    /// # Errors
    /// `TreeError::DuplicatePlatform` if the id is already configured.
    pub fn add_build_platform(&mut self, id: impl Into<String>) -> Result<(), TreeError> {
        let id = id.into();
        if self.platforms.contains_key(&id) {
            return Err(TreeError::DuplicatePlatform(id));
        }
        self.platforms
            .insert(id, PlatformConfig::Build(BuildPlatformConfig::new()));
        Ok(())
    }

    /// Add a test-axis platform
    ///
    /// # Errors
    /// `TreeError::DuplicatePlatform` if the id is already configured.
    pub fn add_test_platform(&mut self, id: impl Into<String>) -> Result<(), TreeError> {
        let id = id.into();
        if self.platforms.contains_key(&id) {
            return Err(TreeError::DuplicatePlatform(id));
        }
        self.platforms
            .insert(id, PlatformConfig::Test(TestPlatformConfig::new()));
        Ok(())
    }

    /// Remove a platform and its whole subtree
    ///
    /// Remaining platforms keep their relative order.
    ///
    /// # Errors
    /// `TreeError::UnknownPlatform` if the id is not configured.
    pub fn remove_platform(&mut self, id: &str) -> Result<PlatformConfig, TreeError> {
        self.platforms
            .shift_remove(id)
            .ok_or_else(|| TreeError::UnknownPlatform(id.to_string()))
    }

    /// Look up a platform node
    #[inline]
    #[must_use]
    pub fn platform(&self, id: &str) -> Option<&PlatformConfig> {
        self.platforms.get(id)
    }

    /// Mutable access to a build platform
    ///
    /// # Errors
    /// `TreeError::UnknownPlatform` if absent, `TreeError::WrongAxis` if the
    /// node is test-scoped.
    pub fn build_platform_mut(&mut self, id: &str) -> Result<&mut BuildPlatformConfig, TreeError> {
        match self.platforms.get_mut(id) {
            Some(PlatformConfig::Build(node)) => Ok(node),
            Some(PlatformConfig::Test(_)) => Err(TreeError::WrongAxis(id.to_string())),
            None => Err(TreeError::UnknownPlatform(id.to_string())),
        }
    }

    /// Mutable access to a test platform
    ///
    /// # Errors
    /// `TreeError::UnknownPlatform` if absent, `TreeError::WrongAxis` if the
    /// node is build-scoped.
    pub fn test_platform_mut(&mut self, id: &str) -> Result<&mut TestPlatformConfig, TreeError> {
        match self.platforms.get_mut(id) {
            Some(PlatformConfig::Test(node)) => Ok(node),
            Some(PlatformConfig::Build(_)) => Err(TreeError::WrongAxis(id.to_string())),
            None => Err(TreeError::UnknownPlatform(id.to_string())),
        }
    }
}

/// Structural role of one configured platform
///
/// Exactly one of the two shapes exists per node; the axis is part of the
/// type, not a pair of optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlatformConfig {
    /// Build axis: the platform runs build tasks
    Build(BuildPlatformConfig),
    /// Test axis: the platform runs variant selections directly
    Test(TestPlatformConfig),
}

impl PlatformConfig {
    /// Selected execution provider, if any
    #[inline]
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            PlatformConfig::Build(node) => node.provider.as_deref(),
            PlatformConfig::Test(node) => node.provider.as_deref(),
        }
    }

    /// Whether this node plays the build role
    #[inline]
    #[must_use]
    pub fn is_build(&self) -> bool {
        matches!(self, PlatformConfig::Build(_))
    }

    /// Whether this node plays the test role
    #[inline]
    #[must_use]
    pub fn is_test(&self) -> bool {
        matches!(self, PlatformConfig::Test(_))
    }
}

/// Build-axis platform node: owns task nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlatformConfig {
    /// Selected execution provider among the platform's declared providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Task id -> task node, in display order
    pub tasks: IndexMap<String, TaskConfig>,
}

impl BuildPlatformConfig {
    /// Create an empty build platform node
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an execution provider
    #[inline]
    pub fn set_provider(&mut self, provider: Option<String>) {
        self.provider = provider;
    }

    /// Add a task node
    ///
    /// # Errors
    /// `TreeError::DuplicateTask` if the id is already configured.
    pub fn add_task(&mut self, id: impl Into<String>) -> Result<(), TreeError> {
        let id = id.into();
        if self.tasks.contains_key(&id) {
            return Err(TreeError::DuplicateTask(id));
        }
        self.tasks.insert(id, TaskConfig::new());
        Ok(())
    }

    /// Remove a task node and its whole subtree
    ///
    /// # Errors
    /// `TreeError::UnknownTask` if the id is not configured.
    pub fn remove_task(&mut self, id: &str) -> Result<TaskConfig, TreeError> {
        self.tasks
            .shift_remove(id)
            .ok_or_else(|| TreeError::UnknownTask(id.to_string()))
    }

    /// Mutable access to a task node
    ///
    /// # Errors
    /// `TreeError::UnknownTask` if the id is not configured.
    pub fn task_mut(&mut self, id: &str) -> Result<&mut TaskConfig, TreeError> {
        self.tasks
            .get_mut(id)
            .ok_or_else(|| TreeError::UnknownTask(id.to_string()))
    }
}

/// Task node: ordered build-side variant combinations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    /// Variant combinations, positional identity
    #[serde(default)]
    pub variants: Vec<VariantsConfig>,
}

impl TaskConfig {
    /// Create an empty task node
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variant combination
    #[inline]
    pub fn push_variant(&mut self, variant: VariantsConfig) {
        self.variants.push(variant);
    }

    /// Remove the combination at `index`
    ///
    /// # Errors
    /// `TreeError::VariantOutOfRange` if `index` is past the end.
    pub fn remove_variant(&mut self, index: usize) -> Result<VariantsConfig, TreeError> {
        if index >= self.variants.len() {
            return Err(TreeError::VariantOutOfRange {
                index,
                len: self.variants.len(),
            });
        }
        Ok(self.variants.remove(index))
    }

    /// Mutable access to the combination at `index`
    ///
    /// # Errors
    /// `TreeError::VariantOutOfRange` if `index` is past the end.
    pub fn variant_mut(&mut self, index: usize) -> Result<&mut VariantsConfig, TreeError> {
        let len = self.variants.len();
        self.variants
            .get_mut(index)
            .ok_or(TreeError::VariantOutOfRange { index, len })
    }
}

/// Build-side variant combination
///
/// Selects one value per applicable category. A non-empty `platforms` map
/// makes this combination a test scope root: the nested platforms are
/// test-axis nodes scoped to exactly this combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantsConfig {
    /// Category id -> selected value id
    #[serde(default)]
    pub map: IndexMap<String, String>,
    /// Nested test subtree, keyed by test platform id; empty = terminal
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub platforms: IndexMap<String, TestPlatformConfig>,
}

impl VariantsConfig {
    /// Create an empty combination
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a combination starting from a prepared category->value map
    #[inline]
    #[must_use]
    pub fn with_map(map: IndexMap<String, String>) -> Self {
        Self {
            map,
            platforms: IndexMap::new(),
        }
    }

    /// Select a value for a category
    #[inline]
    pub fn set_value(&mut self, category: impl Into<String>, value: impl Into<String>) {
        self.map.insert(category.into(), value.into());
    }

    /// Drop the selection for a category
    #[inline]
    pub fn clear_value(&mut self, category: &str) -> Option<String> {
        self.map.shift_remove(category)
    }

    /// Whether this combination roots a nested test subtree
    #[inline]
    #[must_use]
    pub fn is_test_scope_root(&self) -> bool {
        !self.platforms.is_empty()
    }

    /// Add a nested test platform, making this combination a test scope root
    ///
    /// # Errors
    /// `TreeError::DuplicatePlatform` if the id is already nested here.
    pub fn add_test_platform(&mut self, id: impl Into<String>) -> Result<(), TreeError> {
        let id = id.into();
        if self.platforms.contains_key(&id) {
            return Err(TreeError::DuplicatePlatform(id));
        }
        self.platforms.insert(id, TestPlatformConfig::new());
        Ok(())
    }

    /// Remove a nested test platform and its variant selections
    ///
    /// # Errors
    /// `TreeError::UnknownPlatform` if the id is not nested here.
    pub fn remove_test_platform(&mut self, id: &str) -> Result<TestPlatformConfig, TreeError> {
        self.platforms
            .shift_remove(id)
            .ok_or_else(|| TreeError::UnknownPlatform(id.to_string()))
    }

    /// Mutable access to a nested test platform
    ///
    /// # Errors
    /// `TreeError::UnknownPlatform` if the id is not nested here.
    pub fn test_platform_mut(&mut self, id: &str) -> Result<&mut TestPlatformConfig, TreeError> {
        self.platforms
            .get_mut(id)
            .ok_or_else(|| TreeError::UnknownPlatform(id.to_string()))
    }
}

/// Test-axis platform node: owns terminal variant selections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlatformConfig {
    /// Selected execution provider among the platform's declared providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Variant selections, positional identity
    pub variants: Vec<TestVariantsConfig>,
}

impl TestPlatformConfig {
    /// Create an empty test platform node
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an execution provider
    #[inline]
    pub fn set_provider(&mut self, provider: Option<String>) {
        self.provider = provider;
    }

    /// Append a variant selection
    #[inline]
    pub fn push_variant(&mut self, variant: TestVariantsConfig) {
        self.variants.push(variant);
    }

    /// Remove the selection at `index`
    ///
    /// # Errors
    /// `TreeError::VariantOutOfRange` if `index` is past the end.
    pub fn remove_variant(&mut self, index: usize) -> Result<TestVariantsConfig, TreeError> {
        if index >= self.variants.len() {
            return Err(TreeError::VariantOutOfRange {
                index,
                len: self.variants.len(),
            });
        }
        Ok(self.variants.remove(index))
    }

    /// Mutable access to the selection at `index`
    ///
    /// # Errors
    /// `TreeError::VariantOutOfRange` if `index` is past the end.
    pub fn variant_mut(&mut self, index: usize) -> Result<&mut TestVariantsConfig, TreeError> {
        let len = self.variants.len();
        self.variants
            .get_mut(index)
            .ok_or(TreeError::VariantOutOfRange { index, len })
    }
}

/// Terminal test-side variant selection
///
/// The test axis does not re-nest; this node carries only the
/// category->value selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestVariantsConfig {
    /// Category id -> selected value id
    #[serde(default)]
    pub map: IndexMap<String, String>,
}

impl TestVariantsConfig {
    /// Create an empty selection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection starting from a prepared category->value map
    #[inline]
    #[must_use]
    pub fn with_map(map: IndexMap<String, String>) -> Self {
        Self { map }
    }

    /// Select a value for a category
    #[inline]
    pub fn set_value(&mut self, category: impl Into<String>, value: impl Into<String>) {
        self.map.insert(category.into(), value.into());
    }

    /// Drop the selection for a category
    #[inline]
    pub fn clear_value(&mut self, category: &str) -> Option<String> {
        self.map.shift_remove(category)
    }
}
