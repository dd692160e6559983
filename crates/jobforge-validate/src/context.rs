//! Sibling lookup tables for referential checks

use indexmap::IndexMap;
use jobforge_model::{BuildProvider, Platform, Product, Task, TaskKind, TaskVariant};

/// Read-only view of the sibling collections an entity may reference
///
/// Borrowed from whoever owns the group collections (normally the store);
/// validation itself never mutates or fetches.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Known platforms by id
    pub platforms: &'a IndexMap<String, Platform>,
    /// Known products by id
    pub products: &'a IndexMap<String, Product>,
    /// Known tasks by id
    pub tasks: &'a IndexMap<String, Task>,
    /// Declared variant axes by id
    pub task_variants: &'a IndexMap<String, TaskVariant>,
    /// Known build providers by id
    pub build_providers: &'a IndexMap<String, BuildProvider>,
}

impl<'a> ValidationContext<'a> {
    /// Assemble a context from borrowed collections
    #[inline]
    #[must_use]
    pub fn new(
        platforms: &'a IndexMap<String, Platform>,
        products: &'a IndexMap<String, Product>,
        tasks: &'a IndexMap<String, Task>,
        task_variants: &'a IndexMap<String, TaskVariant>,
        build_providers: &'a IndexMap<String, BuildProvider>,
    ) -> Self {
        Self {
            platforms,
            products,
            tasks,
            task_variants,
            build_providers,
        }
    }

    /// Variant axes applicable to one side of the tree
    pub fn applicable_categories(&self, kind: TaskKind) -> impl Iterator<Item = &'a TaskVariant> {
        self.task_variants
            .values()
            .filter(move |axis| axis.kind == kind)
    }
}
