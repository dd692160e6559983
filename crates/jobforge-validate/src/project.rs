//! Rule sets and result trees for projects and their job configuration
//!
//! The job configuration walk mirrors the tree shape exactly: one result
//! node per tree node, keyed and ordered the same way, with a verdict for
//! every reference the node makes (platform id, provider, task id, variant
//! category and value). Applicable-but-unselected categories surface as
//! `Required` entries in the selection results, so a combination missing a
//! mandatory axis fails `is_valid` like any other leaf.

use crate::context::ValidationContext;
use crate::verdict::{required_list, required_text, Verdict};
use indexmap::IndexMap;
use jobforge_model::{
    BuildPlatformConfig, JobConfig, PlatformConfig, Project, ProjectKind, TaskKind,
    TestPlatformConfig,
};

/// Result tree for a [`Project`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectValidation {
    /// Identifier verdict
    pub id: Verdict,
    /// Repository URL verdict
    pub url: Verdict,
    /// Product reference verdict
    pub product: Verdict,
    /// Build provider references verdict
    pub build_providers: Verdict,
    /// Parallel result tree for the embedded job configuration
    pub job_configuration: JobConfigValidation,
}

impl ProjectValidation {
    /// Whether every leaf passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_ok()
            && self.url.is_ok()
            && self.product.is_ok()
            && self.build_providers.is_ok()
            && self.job_configuration.is_valid()
    }
}

/// Validate a project against the rule set for its kind
///
/// Plain projects must root build-axis platforms, with-testing projects
/// test-axis platforms; a root on the other axis is flagged `Invalid` at
/// that platform's result node.
#[must_use]
pub fn validate_project(project: &Project, context: &ValidationContext<'_>) -> ProjectValidation {
    let mut product = required_text(&project.product);
    if product.is_ok() && !context.products.contains_key(&project.product) {
        product = Verdict::Invalid;
    }

    let mut build_providers = required_list(&project.build_providers);
    if build_providers.is_ok()
        && !project
            .build_providers
            .iter()
            .all(|id| context.build_providers.contains_key(id))
    {
        build_providers = Verdict::Invalid;
    }

    ProjectValidation {
        id: required_text(&project.id),
        url: required_text(&project.url),
        product,
        build_providers,
        job_configuration: validate_job_config(&project.job_configuration, context, project.kind),
    }
}

/// Result tree for a [`JobConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobConfigValidation {
    /// Per-platform results, same keys and order as the tree
    pub platforms: IndexMap<String, PlatformConfigValidation>,
}

impl JobConfigValidation {
    /// Whether every node passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.platforms.values().all(PlatformConfigValidation::is_valid)
    }
}

/// Result node for one configured platform, tagged like the tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformConfigValidation {
    /// Result for a build-axis node
    Build(BuildPlatformConfigValidation),
    /// Result for a test-axis node
    Test(TestPlatformConfigValidation),
}

impl PlatformConfigValidation {
    /// Whether every leaf passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            PlatformConfigValidation::Build(node) => node.is_valid(),
            PlatformConfigValidation::Test(node) => node.is_valid(),
        }
    }
}

/// Result node for a build-axis platform
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildPlatformConfigValidation {
    /// Platform reference verdict (known id, correct axis for the project)
    pub platform: Verdict,
    /// Provider selection verdict
    pub provider: Verdict,
    /// Per-task results, same keys and order as the tree
    pub tasks: IndexMap<String, TaskConfigValidation>,
}

impl BuildPlatformConfigValidation {
    /// Whether every leaf passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.platform.is_ok()
            && self.provider.is_ok()
            && self.tasks.values().all(TaskConfigValidation::is_valid)
    }
}

/// Result node for one task under a build platform
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskConfigValidation {
    /// Task reference verdict (known id, build-side task)
    pub task: Verdict,
    /// Per-combination results, same order as the tree
    pub variants: Vec<VariantsConfigValidation>,
}

impl TaskConfigValidation {
    /// Whether every leaf passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.task.is_ok() && self.variants.iter().all(VariantsConfigValidation::is_valid)
    }
}

/// Result node for one build-side variant combination
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantsConfigValidation {
    /// Per-category verdicts: one entry per selected category plus a
    /// `Required` entry per applicable category with no selection
    pub selections: IndexMap<String, Verdict>,
    /// Results for the nested test subtree, same keys and order as the tree
    pub platforms: IndexMap<String, TestPlatformConfigValidation>,
}

impl VariantsConfigValidation {
    /// Whether every leaf passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.selections.values().all(|verdict| verdict.is_ok())
            && self
                .platforms
                .values()
                .all(TestPlatformConfigValidation::is_valid)
    }
}

/// Result node for a test-axis platform
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestPlatformConfigValidation {
    /// Platform reference verdict
    pub platform: Verdict,
    /// Provider selection verdict
    pub provider: Verdict,
    /// Per-selection results, same order as the tree
    pub variants: Vec<TestVariantsConfigValidation>,
}

impl TestPlatformConfigValidation {
    /// Whether every leaf passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.platform.is_ok()
            && self.provider.is_ok()
            && self
                .variants
                .iter()
                .all(TestVariantsConfigValidation::is_valid)
    }
}

/// Result node for one terminal test-side selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestVariantsConfigValidation {
    /// Per-category verdicts, as in [`VariantsConfigValidation`]
    pub selections: IndexMap<String, Verdict>,
}

impl TestVariantsConfigValidation {
    /// Whether every leaf passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.selections.values().all(|verdict| verdict.is_ok())
    }
}

/// Validate a job configuration tree
#[must_use]
pub fn validate_job_config(
    config: &JobConfig,
    context: &ValidationContext<'_>,
    kind: ProjectKind,
) -> JobConfigValidation {
    let platforms = config
        .platforms
        .iter()
        .map(|(platform_id, node)| {
            let result = match node {
                PlatformConfig::Build(build) => PlatformConfigValidation::Build(
                    validate_build_platform_node(platform_id, build, context, kind),
                ),
                PlatformConfig::Test(test) => PlatformConfigValidation::Test(
                    validate_test_platform_node(platform_id, test, context, kind),
                ),
            };
            (platform_id.clone(), result)
        })
        .collect();
    JobConfigValidation { platforms }
}

fn platform_reference(
    platform_id: &str,
    axis_allowed: bool,
    context: &ValidationContext<'_>,
) -> Verdict {
    if !axis_allowed || !context.platforms.contains_key(platform_id) {
        Verdict::Invalid
    } else {
        Verdict::Ok
    }
}

fn provider_reference(
    platform_id: &str,
    provider: Option<&str>,
    context: &ValidationContext<'_>,
) -> Verdict {
    match provider {
        None => Verdict::Ok,
        Some(provider_id) => match context.platforms.get(platform_id) {
            Some(platform) if platform.provider(provider_id).is_some() => Verdict::Ok,
            _ => Verdict::Invalid,
        },
    }
}

fn validate_build_platform_node(
    platform_id: &str,
    node: &BuildPlatformConfig,
    context: &ValidationContext<'_>,
    kind: ProjectKind,
) -> BuildPlatformConfigValidation {
    let tasks = node
        .tasks
        .iter()
        .map(|(task_id, task_config)| {
            let task = match context.tasks.get(task_id) {
                Some(task) if task.kind == TaskKind::Build => Verdict::Ok,
                _ => Verdict::Invalid,
            };
            let variants = task_config
                .variants
                .iter()
                .map(|combo| VariantsConfigValidation {
                    selections: validate_selection(&combo.map, TaskKind::Build, context),
                    platforms: combo
                        .platforms
                        .iter()
                        .map(|(test_id, test_node)| {
                            (
                                test_id.clone(),
                                validate_nested_test_platform(test_id, test_node, context),
                            )
                        })
                        .collect(),
                })
                .collect();
            (task_id.clone(), TaskConfigValidation { task, variants })
        })
        .collect();

    BuildPlatformConfigValidation {
        platform: platform_reference(platform_id, kind == ProjectKind::Plain, context),
        provider: provider_reference(platform_id, node.provider.as_deref(), context),
        tasks,
    }
}

fn validate_test_platform_node(
    platform_id: &str,
    node: &TestPlatformConfig,
    context: &ValidationContext<'_>,
    kind: ProjectKind,
) -> TestPlatformConfigValidation {
    let mut result = validate_nested_test_platform(platform_id, node, context);
    // A test-axis root is only legal on a with-testing project
    if kind != ProjectKind::WithTesting {
        result.platform = Verdict::Invalid;
    }
    result
}

fn validate_nested_test_platform(
    platform_id: &str,
    node: &TestPlatformConfig,
    context: &ValidationContext<'_>,
) -> TestPlatformConfigValidation {
    TestPlatformConfigValidation {
        platform: platform_reference(platform_id, true, context),
        provider: provider_reference(platform_id, node.provider.as_deref(), context),
        variants: node
            .variants
            .iter()
            .map(|selection| TestVariantsConfigValidation {
                selections: validate_selection(&selection.map, TaskKind::Test, context),
            })
            .collect(),
    }
}

fn validate_selection(
    map: &IndexMap<String, String>,
    kind: TaskKind,
    context: &ValidationContext<'_>,
) -> IndexMap<String, Verdict> {
    let mut selections: IndexMap<String, Verdict> = map
        .iter()
        .map(|(category, value)| {
            let verdict = match context.task_variants.get(category) {
                Some(axis) if axis.kind == kind => {
                    if axis.declares_value(value) {
                        Verdict::Ok
                    } else {
                        Verdict::Invalid
                    }
                }
                // Unknown category, or one from the other side of the tree
                _ => Verdict::Invalid,
            };
            (category.clone(), verdict)
        })
        .collect();

    for axis in context.applicable_categories(kind) {
        if !selections.contains_key(&axis.id) {
            selections.insert(axis.id.clone(), Verdict::Required);
        }
    }
    selections
}
