//! Deterministic job naming
//!
//! Derives the external job identifier for one configured combination from
//! the declared variant ordering metadata and the combination's position in
//! the tree. Naming is a pure derivation: the same tree and metadata always
//! produce the same string, independent of map iteration order.

use crate::variant::TaskVariant;
use indexmap::IndexMap;

/// Derive the variant segment for a selection
///
/// Keys sort ascending by the declared category `order`; categories missing
/// from the lookup sort as order 0. Ties (including between missing
/// categories) break by category id, so the segment is stable under any
/// insertion order. Selected values join with `.`.
#[must_use]
pub fn variant_string(
    categories: &IndexMap<String, TaskVariant>,
    selection: &IndexMap<String, String>,
) -> String {
    let mut keys: Vec<&str> = selection.keys().map(String::as_str).collect();
    keys.sort_by(|a, b| {
        let order_a = categories.get(*a).map_or(0, |c| c.order);
        let order_b = categories.get(*b).map_or(0, |c| c.order);
        order_a.cmp(&order_b).then_with(|| a.cmp(b))
    });
    let values: Vec<&str> = keys
        .iter()
        .filter_map(|key| selection.get(*key).map(String::as_str))
        .collect();
    values.join(".")
}

/// Build-scope prefix for a test job descending from a build combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildScope<'a> {
    /// Build platform id
    pub platform: &'a str,
    /// Variant segment of the build combination
    pub variants: &'a str,
}

/// Everything the namer needs to identify one runnable combination
#[derive(Debug, Clone, Copy)]
pub struct JobSpec<'a> {
    /// Task id; combinations with no task configured are never named
    pub task: Option<&'a str>,
    /// Product id
    pub product: &'a str,
    /// Project id
    pub project: &'a str,
    /// Build scope, present when naming a test job under a build combination
    pub scope: Option<BuildScope<'a>>,
    /// Platform id of the combination being named
    pub platform: &'a str,
    /// Selected execution provider id
    pub provider: &'a str,
    /// Variant segment of the combination being named
    pub variants: &'a str,
}

/// Pointer at a job on the external build system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    /// Generated job name
    pub name: String,
    /// Direct link to the job
    pub url: String,
}

/// Names jobs against a configured base URL
///
/// Without a base URL the namer is disabled and produces no descriptors at
/// all, which is distinct from producing empty names.
#[derive(Debug, Clone, Default)]
pub struct JobNamer {
    base_url: Option<String>,
}

impl JobNamer {
    /// Create a disabled namer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a namer pointing at the external build system
    #[inline]
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }

    /// Configured base URL, if any
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Produce the descriptor for one combination
    ///
    /// Returns `None` when naming is disabled or when the combination has no
    /// task configured.
    #[must_use]
    pub fn describe(&self, spec: &JobSpec<'_>) -> Option<JobDescriptor> {
        let base = self.base_url.as_deref()?;
        let task = spec.task?;

        let scope = match spec.scope {
            Some(build) => format!("-{}-{}-", build.platform, build.variants),
            None => "-".to_string(),
        };
        let name = format!(
            "{task}-{product}-{project}{scope}{platform}.{provider}-{variants}",
            product = spec.product,
            project = spec.project,
            platform = spec.platform,
            provider = spec.provider,
            variants = spec.variants,
        );
        let url = format!("{}/job/{}", base.trim_end_matches('/'), name);
        Some(JobDescriptor { name, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TaskKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn categories(pairs: &[(&str, u32)]) -> IndexMap<String, TaskVariant> {
        pairs
            .iter()
            .map(|(id, order)| {
                (
                    (*id).to_string(),
                    TaskVariant::new(*id, TaskKind::Build, *order),
                )
            })
            .collect()
    }

    #[test]
    fn variant_string_follows_declared_order() {
        let lookup = categories(&[("a", 2), ("b", 1)]);
        let mut selection = IndexMap::new();
        selection.insert("a".to_string(), "x".to_string());
        selection.insert("b".to_string(), "y".to_string());

        assert_eq!(variant_string(&lookup, &selection), "y.x");
    }

    #[test]
    fn missing_categories_sort_first_by_id() {
        let lookup = categories(&[("jvm", 4)]);
        let mut selection = IndexMap::new();
        selection.insert("jvm".to_string(), "hotspot".to_string());
        selection.insert("zz".to_string(), "late".to_string());
        selection.insert("aa".to_string(), "early".to_string());

        // Unknown categories take order 0 and tie-break lexicographically
        assert_eq!(variant_string(&lookup, &selection), "early.late.hotspot");
    }

    #[test]
    fn empty_selection_yields_empty_segment() {
        let lookup = categories(&[]);
        assert_eq!(variant_string(&lookup, &IndexMap::new()), "");
    }

    #[test]
    fn disabled_namer_produces_nothing() {
        let namer = JobNamer::new();
        let spec = JobSpec {
            task: Some("build"),
            product: "jdk17",
            project: "mainline",
            scope: None,
            platform: "el8.x86_64",
            provider: "vagrant",
            variants: "release.hotspot",
        };
        assert_eq!(namer.describe(&spec), None);
    }

    #[test]
    fn taskless_combination_is_never_named() {
        let namer = JobNamer::with_base_url("https://ci.example.org");
        let spec = JobSpec {
            task: None,
            product: "jdk17",
            project: "mainline",
            scope: None,
            platform: "el8.x86_64",
            provider: "vagrant",
            variants: "release",
        };
        assert_eq!(namer.describe(&spec), None);
    }

    #[test]
    fn build_job_name_uses_bare_separator() {
        let namer = JobNamer::with_base_url("https://ci.example.org/");
        let spec = JobSpec {
            task: Some("build"),
            product: "jdk17",
            project: "mainline",
            scope: None,
            platform: "el8.x86_64",
            provider: "vagrant",
            variants: "release.hotspot",
        };

        let descriptor = namer.describe(&spec).unwrap();
        assert_eq!(
            descriptor.name,
            "build-jdk17-mainline-el8.x86_64.vagrant-release.hotspot"
        );
        assert_eq!(
            descriptor.url,
            "https://ci.example.org/job/build-jdk17-mainline-el8.x86_64.vagrant-release.hotspot"
        );
    }

    #[test]
    fn test_job_name_embeds_the_build_scope() {
        let namer = JobNamer::with_base_url("https://ci.example.org");
        let spec = JobSpec {
            task: Some("tck"),
            product: "jdk17",
            project: "mainline",
            scope: Some(BuildScope {
                platform: "el8.x86_64",
                variants: "release.hotspot",
            }),
            platform: "f39.aarch64",
            provider: "beaker",
            variants: "noagent",
        };

        let descriptor = namer.describe(&spec).unwrap();
        assert_eq!(
            descriptor.name,
            "tck-jdk17-mainline-el8.x86_64-release.hotspot-f39.aarch64.beaker-noagent"
        );
    }

    proptest! {
        #[test]
        fn variant_string_is_insertion_order_independent(
            mut entries in proptest::collection::vec(("[a-z]{1,6}", "[a-z]{1,6}", 0u32..20), 1..8)
        ) {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries.dedup_by(|a, b| a.0 == b.0);

            let lookup: IndexMap<String, TaskVariant> = entries
                .iter()
                .map(|(id, _, order)| {
                    (id.clone(), TaskVariant::new(id.clone(), TaskKind::Build, *order))
                })
                .collect();

            let forward: IndexMap<String, String> = entries
                .iter()
                .map(|(id, value, _)| (id.clone(), value.clone()))
                .collect();
            let reversed: IndexMap<String, String> = entries
                .iter()
                .rev()
                .map(|(id, value, _)| (id.clone(), value.clone()))
                .collect();

            prop_assert_eq!(
                variant_string(&lookup, &forward),
                variant_string(&lookup, &reversed)
            );
        }
    }
}
