//! JobForge validation engine
//!
//! Pure, recursive validation of configuration entities. Each validator maps
//! an entity (plus the sibling lookup tables it may reference) to a result
//! tree mirroring the entity's shape, one [`Verdict`] per leaf field. The
//! whole-tree `is_valid` check is the recursive AND of every leaf; there is
//! no partial submit.
//!
//! Validation never mutates its input and performs no I/O, so callers are
//! free to re-run it on every keystroke.
//!
//! # Example
//!
//! ```rust
//! use jobforge_model::{Task, TaskKind};
//! use jobforge_validate::{validate_task, Verdict, ValidationContext};
//! use indexmap::IndexMap;
//!
//! let platforms = IndexMap::new();
//! let products = IndexMap::new();
//! let tasks = IndexMap::new();
//! let task_variants = IndexMap::new();
//! let build_providers = IndexMap::new();
//! let context = ValidationContext::new(
//!     &platforms, &products, &tasks, &task_variants, &build_providers,
//! );
//!
//! let draft = Task::new("build", TaskKind::Build);
//! let result = validate_task(&draft, &context);
//! assert_eq!(result.script, Verdict::Required);
//! assert!(!result.is_valid());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod context;
pub mod entities;
pub mod project;
pub mod verdict;

// Re-exports for convenience
pub use context::ValidationContext;
pub use entities::{
    validate_build_provider, validate_platform, validate_product, validate_task,
    validate_task_variant, BuildProviderValidation, LimitationValidation,
    PlatformProviderValidation, PlatformValidation, ProductValidation, RpmLimitationValidation,
    TaskValidation, TaskVariantValidation, TaskVariantValueValidation, VariableValidation,
};
pub use project::{
    validate_job_config, validate_project, BuildPlatformConfigValidation, JobConfigValidation,
    PlatformConfigValidation, ProjectValidation, TaskConfigValidation,
    TestPlatformConfigValidation, TestVariantsConfigValidation, VariantsConfigValidation,
};
pub use verdict::{
    align_results, decimal_text, optional_list, required_list, required_text, Verdict,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
