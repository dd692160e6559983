//! Property tests for the validation engine
//!
//! `is_valid` must behave exactly like a recursive AND over every leaf
//! verdict, and validation must be a pure function of its input.

use indexmap::IndexMap;
use jobforge_model::{
    BuildProvider, Platform, PlatformProvider, Product, Task, TaskKind, TaskVariant,
};
use jobforge_validate::{
    validate_platform, validate_task, PlatformProviderValidation, PlatformValidation,
    ValidationContext, VariableValidation, Verdict,
};
use proptest::prelude::*;

fn verdict_strategy() -> impl Strategy<Value = Verdict> {
    prop_oneof![
        Just(Verdict::Ok),
        Just(Verdict::Required),
        Just(Verdict::Whitespaces),
        Just(Verdict::Invalid),
    ]
}

fn platform_validation_strategy() -> impl Strategy<Value = PlatformValidation> {
    (
        proptest::collection::vec(verdict_strategy(), 7),
        proptest::collection::vec((verdict_strategy(), verdict_strategy(), verdict_strategy()), 0..4),
        proptest::collection::vec((verdict_strategy(), verdict_strategy()), 0..4),
    )
        .prop_map(|(scalars, providers, variables)| PlatformValidation {
            id: scalars[0],
            os: scalars[1],
            version: scalars[2],
            version_number: scalars[3],
            architecture: scalars[4],
            tags: scalars[5],
            providers_present: scalars[6],
            providers: providers
                .into_iter()
                .map(|(id, hw_nodes, vm_nodes)| PlatformProviderValidation {
                    id,
                    hw_nodes,
                    vm_nodes,
                })
                .collect(),
            variables: variables
                .into_iter()
                .map(|(name, value)| VariableValidation { name, value })
                .collect(),
        })
}

fn all_leaves(result: &PlatformValidation) -> Vec<Verdict> {
    let mut leaves = vec![
        result.id,
        result.os,
        result.version,
        result.version_number,
        result.architecture,
        result.tags,
        result.providers_present,
    ];
    for provider in &result.providers {
        leaves.extend([provider.id, provider.hw_nodes, provider.vm_nodes]);
    }
    for variable in &result.variables {
        leaves.extend([variable.name, variable.value]);
    }
    leaves
}

proptest! {
    #[test]
    fn is_valid_equals_and_over_all_leaves(result in platform_validation_strategy()) {
        let expected = all_leaves(&result).iter().all(|verdict| verdict.is_ok());
        prop_assert_eq!(result.is_valid(), expected);
    }

    #[test]
    fn platform_validation_is_pure(
        id in "[a-z0-9.]{0,8}",
        os in "[a-z]{0,4}",
        version_number in "[a-z0-9.]{0,6}",
    ) {
        let platform = Platform::new(id)
            .with_os(os, "8", "x86_64")
            .with_version_number(version_number)
            .with_provider(PlatformProvider::new("vagrant"));

        prop_assert_eq!(validate_platform(&platform), validate_platform(&platform));
    }
}

#[test]
fn one_missing_field_yields_exactly_one_required_leaf() {
    let platforms: IndexMap<String, Platform> = IndexMap::new();
    let products: IndexMap<String, Product> = IndexMap::new();
    let tasks: IndexMap<String, Task> = IndexMap::new();
    let task_variants: IndexMap<String, TaskVariant> = IndexMap::new();
    let build_providers: IndexMap<String, BuildProvider> = IndexMap::new();
    let context =
        ValidationContext::new(&platforms, &products, &tasks, &task_variants, &build_providers);

    let draft = Task::new("build", TaskKind::Build); // script left empty
    let result = validate_task(&draft, &context);

    assert_eq!(result.script, Verdict::Required);

    let other_leaves = [
        result.id,
        result.scm_poll_schedule,
        result.xml_template,
        result.platform_limitation.list,
        result.product_limitation.list,
        result.rpm_limitation.allow_list,
        result.rpm_limitation.deny_list,
    ];
    assert!(other_leaves.iter().all(|verdict| verdict.is_ok()));
}
