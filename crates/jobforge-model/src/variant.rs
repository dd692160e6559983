//! Task variant axes
//!
//! A task variant is one configuration axis (e.g. debug level, JVM flavour)
//! with a declared ordering, a default value and the set of selectable
//! values. Variant combinations in the job configuration tree select one
//! value per applicable axis.

use crate::entity::{ConfigEntity, Group, TaskKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One declared build/test variant axis
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskVariant {
    /// Identifier, unique among task variants; used as the category key in
    /// variant combinations
    pub id: String,
    /// Which side of the tree this axis applies to
    pub kind: TaskKind,
    /// Position in generated names, ascending
    pub order: u32,
    /// Value selected when a combination does not override this axis
    pub default_value: String,
    /// Selectable values
    #[serde(default)]
    pub variants: Vec<TaskVariantValue>,
    /// Whether subpackage-filtered jobs may vary along this axis
    #[serde(default)]
    pub supports_subpackages: bool,
}

impl TaskVariant {
    /// Create a new variant axis
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, kind: TaskKind, order: u32) -> Self {
        Self {
            id: id.into(),
            kind,
            order,
            ..Self::default()
        }
    }

    /// With the default value
    #[inline]
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// With a selectable value
    #[inline]
    #[must_use]
    pub fn with_value(mut self, id: impl Into<String>) -> Self {
        self.variants.push(TaskVariantValue { id: id.into() });
        self
    }

    /// Whether the given value id is declared on this axis
    #[inline]
    #[must_use]
    pub fn declares_value(&self, value: &str) -> bool {
        self.variants.iter().any(|v| v.id == value)
    }
}

impl ConfigEntity for TaskVariant {
    const GROUP: Group = Group::TaskVariants;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// One selectable value of a variant axis
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskVariantValue {
    /// Value identifier, unique within the axis
    pub id: String,
}

/// Build the default category->value selection for one task kind
///
/// Categories appear in declared order (ties break by category id), each
/// mapped to its declared default value. This is the map a freshly added
/// variant combination starts from.
#[must_use]
pub fn default_variant_map<'a, I>(categories: I, kind: TaskKind) -> IndexMap<String, String>
where
    I: IntoIterator<Item = &'a TaskVariant>,
{
    let mut applicable: Vec<&TaskVariant> =
        categories.into_iter().filter(|c| c.kind == kind).collect();
    applicable.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    applicable
        .into_iter()
        .map(|c| (c.id.clone(), c.default_value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_map_follows_declared_order() {
        let categories = [
            TaskVariant::new("jreSdk", TaskKind::Build, 3).with_default("sdk"),
            TaskVariant::new("debugMode", TaskKind::Build, 1).with_default("release"),
            TaskVariant::new("agent", TaskKind::Test, 1).with_default("noagent"),
            TaskVariant::new("jvm", TaskKind::Build, 2).with_default("hotspot"),
        ];

        let map = default_variant_map(&categories, TaskKind::Build);
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["debugMode", "jvm", "jreSdk"]);
        assert_eq!(map.get("debugMode").map(String::as_str), Some("release"));
    }

    #[test]
    fn default_map_breaks_order_ties_by_id() {
        let categories = [
            TaskVariant::new("zgc", TaskKind::Test, 5).with_default("off"),
            TaskVariant::new("agent", TaskKind::Test, 5).with_default("noagent"),
        ];

        let map = default_variant_map(&categories, TaskKind::Test);
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["agent", "zgc"]);
    }

    #[test]
    fn declares_value_checks_the_declared_list() {
        let axis = TaskVariant::new("debugMode", TaskKind::Build, 1)
            .with_default("release")
            .with_value("release")
            .with_value("fastdebug")
            .with_value("slowdebug");

        assert!(axis.declares_value("fastdebug"));
        assert!(!axis.declares_value("optimized"));
    }
}
