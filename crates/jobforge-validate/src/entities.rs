//! Rule sets and result trees for the flat entity groups
//!
//! One validator per group, declared once; each returns a result struct
//! mirroring the entity's shape with one [`Verdict`] per leaf field and a
//! nested result per child entity. These rule sets are the single source of
//! truth for whether an entity is submittable.

use crate::context::ValidationContext;
use crate::verdict::{decimal_text, optional_list, required_text, Verdict};
use jobforge_model::{
    BuildProvider, Limitation, Platform, PlatformProvider, Product, RpmLimitation, Task,
    TaskVariant, Variable,
};

/// Result tree for a [`BuildProvider`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildProviderValidation {
    /// Identifier verdict
    pub id: Verdict,
    /// Web UI endpoint verdict
    pub top_url: Verdict,
    /// Download endpoint verdict
    pub download_url: Verdict,
}

impl BuildProviderValidation {
    /// Whether every leaf passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_ok() && self.top_url.is_ok() && self.download_url.is_ok()
    }
}

/// Validate a build provider
#[must_use]
pub fn validate_build_provider(provider: &BuildProvider) -> BuildProviderValidation {
    BuildProviderValidation {
        id: required_text(&provider.id),
        top_url: required_text(&provider.top_url),
        download_url: required_text(&provider.download_url),
    }
}

/// Result tree for a [`Variable`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableValidation {
    /// Name verdict
    pub name: Verdict,
    /// Value verdict; empty values are deliberate and pass
    pub value: Verdict,
}

impl VariableValidation {
    /// Whether every leaf passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.name.is_ok() && self.value.is_ok()
    }
}

fn validate_variable(variable: &Variable) -> VariableValidation {
    VariableValidation {
        name: required_text(&variable.name),
        value: Verdict::Ok,
    }
}

/// Result tree for a [`PlatformProvider`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlatformProviderValidation {
    /// Identifier verdict
    pub id: Verdict,
    /// Hardware node list verdict
    pub hw_nodes: Verdict,
    /// VM node list verdict
    pub vm_nodes: Verdict,
}

impl PlatformProviderValidation {
    /// Whether every leaf passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_ok() && self.hw_nodes.is_ok() && self.vm_nodes.is_ok()
    }
}

fn validate_platform_provider(provider: &PlatformProvider) -> PlatformProviderValidation {
    PlatformProviderValidation {
        id: required_text(&provider.id),
        hw_nodes: optional_list(&provider.hw_nodes),
        vm_nodes: optional_list(&provider.vm_nodes),
    }
}

/// Result tree for a [`Platform`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlatformValidation {
    /// Identifier verdict
    pub id: Verdict,
    /// OS family verdict
    pub os: Verdict,
    /// Version label verdict
    pub version: Verdict,
    /// Numeric version verdict
    pub version_number: Verdict,
    /// Architecture verdict
    pub architecture: Verdict,
    /// Tag list verdict
    pub tags: Verdict,
    /// Provider-list emptiness verdict; a platform nothing can run on is
    /// not submittable
    pub providers_present: Verdict,
    /// Per-provider results, same order as the entity's list
    pub providers: Vec<PlatformProviderValidation>,
    /// Per-variable results, same order as the entity's list
    pub variables: Vec<VariableValidation>,
}

impl PlatformValidation {
    /// Whether every leaf passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_ok()
            && self.os.is_ok()
            && self.version.is_ok()
            && self.version_number.is_ok()
            && self.architecture.is_ok()
            && self.tags.is_ok()
            && self.providers_present.is_ok()
            && self.providers.iter().all(PlatformProviderValidation::is_valid)
            && self.variables.iter().all(VariableValidation::is_valid)
    }
}

/// Validate a platform
#[must_use]
pub fn validate_platform(platform: &Platform) -> PlatformValidation {
    PlatformValidation {
        id: required_text(&platform.id),
        os: required_text(&platform.os),
        version: required_text(&platform.version),
        version_number: decimal_text(&platform.version_number),
        architecture: required_text(&platform.architecture),
        tags: optional_list(&platform.tags),
        providers_present: if platform.providers.is_empty() {
            Verdict::Required
        } else {
            Verdict::Ok
        },
        providers: platform
            .providers
            .iter()
            .map(validate_platform_provider)
            .collect(),
        variables: platform.variables.iter().map(validate_variable).collect(),
    }
}

/// Result tree for a [`Product`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductValidation {
    /// Identifier verdict
    pub id: Verdict,
    /// JDK version verdict
    pub version: Verdict,
    /// Package name verdict
    pub package_name: Verdict,
}

impl ProductValidation {
    /// Whether every leaf passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_ok() && self.version.is_ok() && self.package_name.is_ok()
    }
}

/// Validate a product
#[must_use]
pub fn validate_product(product: &Product) -> ProductValidation {
    ProductValidation {
        id: required_text(&product.id),
        version: required_text(&product.version),
        package_name: required_text(&product.package_name),
    }
}

/// Result tree for a [`Limitation`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LimitationValidation {
    /// List verdict: blank entries, or entries referencing nothing known
    pub list: Verdict,
}

impl LimitationValidation {
    /// Whether every leaf passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.list.is_ok()
    }
}

fn validate_limitation<F>(limitation: &Limitation, mut exists: F) -> LimitationValidation
where
    F: FnMut(&str) -> bool,
{
    let mut list = optional_list(&limitation.list);
    if list.is_ok() && !limitation.list.iter().all(|id| exists(id)) {
        list = Verdict::Invalid;
    }
    LimitationValidation { list }
}

/// Result tree for an [`RpmLimitation`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RpmLimitationValidation {
    /// Allow-list verdict
    pub allow_list: Verdict,
    /// Deny-list verdict
    pub deny_list: Verdict,
}

impl RpmLimitationValidation {
    /// Whether every leaf passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.allow_list.is_ok() && self.deny_list.is_ok()
    }
}

fn validate_rpm_limitation(limitation: &RpmLimitation) -> RpmLimitationValidation {
    RpmLimitationValidation {
        allow_list: optional_list(&limitation.allow_list),
        deny_list: optional_list(&limitation.deny_list),
    }
}

/// Result tree for a [`Task`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskValidation {
    /// Identifier verdict
    pub id: Verdict,
    /// Entry-point script verdict
    pub script: Verdict,
    /// Poll schedule verdict; empty means no polling and passes
    pub scm_poll_schedule: Verdict,
    /// XML template verdict
    pub xml_template: Verdict,
    /// Per-variable results, same order as the entity's list
    pub variables: Vec<VariableValidation>,
    /// Platform restriction verdicts
    pub platform_limitation: LimitationValidation,
    /// Product restriction verdicts
    pub product_limitation: LimitationValidation,
    /// RPM filter verdicts
    pub rpm_limitation: RpmLimitationValidation,
}

impl TaskValidation {
    /// Whether every leaf passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_ok()
            && self.script.is_ok()
            && self.scm_poll_schedule.is_ok()
            && self.xml_template.is_ok()
            && self.variables.iter().all(VariableValidation::is_valid)
            && self.platform_limitation.is_valid()
            && self.product_limitation.is_valid()
            && self.rpm_limitation.is_valid()
    }
}

/// Validate a task
///
/// Limitation lists are checked against the sibling collections: an entry
/// referencing an unknown platform or product is flagged `Invalid`.
#[must_use]
pub fn validate_task(task: &Task, context: &ValidationContext<'_>) -> TaskValidation {
    TaskValidation {
        id: required_text(&task.id),
        script: required_text(&task.script),
        scm_poll_schedule: Verdict::Ok,
        xml_template: Verdict::Ok,
        variables: task.variables.iter().map(validate_variable).collect(),
        platform_limitation: validate_limitation(&task.platform_limitation, |id| {
            context.platforms.contains_key(id)
        }),
        product_limitation: validate_limitation(&task.product_limitation, |id| {
            context.products.contains_key(id)
        }),
        rpm_limitation: validate_rpm_limitation(&task.rpm_limitation),
    }
}

/// Result tree for a [`TaskVariant`] value entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskVariantValueValidation {
    /// Value identifier verdict
    pub id: Verdict,
}

impl TaskVariantValueValidation {
    /// Whether every leaf passes
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_ok()
    }
}

/// Result tree for a [`TaskVariant`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskVariantValidation {
    /// Identifier verdict
    pub id: Verdict,
    /// Default value verdict: required, and `Invalid` unless declared in
    /// the value list (which also rules out an empty list)
    pub default_value: Verdict,
    /// Per-value results, same order as the entity's list
    pub values: Vec<TaskVariantValueValidation>,
}

impl TaskVariantValidation {
    /// Whether every leaf passes, recursively
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_ok()
            && self.default_value.is_ok()
            && self.values.iter().all(TaskVariantValueValidation::is_valid)
    }
}

/// Validate a variant axis
#[must_use]
pub fn validate_task_variant(variant: &TaskVariant) -> TaskVariantValidation {
    let mut default_value = required_text(&variant.default_value);
    if default_value.is_ok() && !variant.declares_value(&variant.default_value) {
        default_value = Verdict::Invalid;
    }
    TaskVariantValidation {
        id: required_text(&variant.id),
        default_value,
        values: variant
            .variants
            .iter()
            .map(|value| TaskVariantValueValidation {
                id: required_text(&value.id),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use jobforge_model::{LimitationFlag, TaskKind};
    use pretty_assertions::assert_eq;

    fn empty_maps() -> (
        IndexMap<String, Platform>,
        IndexMap<String, Product>,
        IndexMap<String, Task>,
        IndexMap<String, TaskVariant>,
        IndexMap<String, BuildProvider>,
    ) {
        (
            IndexMap::new(),
            IndexMap::new(),
            IndexMap::new(),
            IndexMap::new(),
            IndexMap::new(),
        )
    }

    #[test]
    fn blank_build_provider_fails_everywhere() {
        let result = validate_build_provider(&BuildProvider::default());
        assert_eq!(result.id, Verdict::Required);
        assert_eq!(result.top_url, Verdict::Required);
        assert!(!result.is_valid());
    }

    #[test]
    fn platform_without_providers_is_not_submittable() {
        let platform = Platform::new("el8.x86_64")
            .with_os("el", "8", "x86_64")
            .with_version_number("8");
        let result = validate_platform(&platform);

        assert_eq!(result.providers_present, Verdict::Required);
        assert!(!result.is_valid());

        let platform = platform.with_provider(PlatformProvider::new("vagrant"));
        assert!(validate_platform(&platform).is_valid());
    }

    #[test]
    fn platform_version_number_must_be_decimal() {
        let platform = Platform::new("fXX.x86_64")
            .with_os("f", "rawhide", "x86_64")
            .with_version_number("rawhide")
            .with_provider(PlatformProvider::new("vagrant"));
        let result = validate_platform(&platform);

        assert_eq!(result.version_number, Verdict::Invalid);
        assert!(!result.is_valid());
    }

    #[test]
    fn task_limitations_must_reference_known_siblings() {
        let (mut platforms, products, tasks, task_variants, build_providers) = empty_maps();
        platforms.insert(
            "el8.x86_64".to_string(),
            Platform::new("el8.x86_64").with_provider(PlatformProvider::new("vagrant")),
        );
        let context =
            ValidationContext::new(&platforms, &products, &tasks, &task_variants, &build_providers);

        let mut task = Task::new("build", TaskKind::Build).with_script("build.sh");
        task.platform_limitation = Limitation {
            list: vec!["el8.x86_64".to_string()],
            flag: LimitationFlag::Allow,
        };
        assert!(validate_task(&task, &context).is_valid());

        task.platform_limitation.list.push("missing".to_string());
        let result = validate_task(&task, &context);
        assert_eq!(result.platform_limitation.list, Verdict::Invalid);
        assert!(!result.is_valid());
    }

    #[test]
    fn exactly_one_required_leaf_for_one_missing_field() {
        let (platforms, products, tasks, task_variants, build_providers) = empty_maps();
        let context =
            ValidationContext::new(&platforms, &products, &tasks, &task_variants, &build_providers);

        let task = Task::new("build", TaskKind::Build);
        let result = validate_task(&task, &context);

        assert_eq!(result.script, Verdict::Required);
        assert_eq!(result.id, Verdict::Ok);
        assert_eq!(result.scm_poll_schedule, Verdict::Ok);
        assert!(result.platform_limitation.is_valid());
        assert!(result.product_limitation.is_valid());
        assert!(result.rpm_limitation.is_valid());
    }

    #[test]
    fn task_variant_default_must_be_declared() {
        let variant = TaskVariant::new("debugMode", TaskKind::Build, 1)
            .with_default("release")
            .with_value("fastdebug");
        let result = validate_task_variant(&variant);

        assert_eq!(result.default_value, Verdict::Invalid);

        let variant = variant.with_value("release");
        assert!(validate_task_variant(&variant).is_valid());
    }

    #[test]
    fn task_variant_with_no_values_cannot_declare_its_default() {
        let variant = TaskVariant::new("debugMode", TaskKind::Build, 1).with_default("release");
        let result = validate_task_variant(&variant);
        assert_eq!(result.default_value, Verdict::Invalid);
        assert!(result.values.is_empty());
    }

    #[test]
    fn validation_is_deterministic() {
        let platform = Platform::new("el8.x86_64")
            .with_os("el", "8", "x86_64")
            .with_version_number("8")
            .with_provider(PlatformProvider::new("vagrant"));

        assert_eq!(validate_platform(&platform), validate_platform(&platform));
    }
}
