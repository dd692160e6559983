//! JobForge data model
//!
//! The shapes every other JobForge crate builds on:
//! - flat configuration entities grouped by kind (build providers,
//!   platforms, products, task variants, tasks, projects)
//! - the recursive job configuration tree with its structural mutation
//!   primitives
//! - deterministic variant ordering and job naming
//!
//! # Example
//!
//! ```rust
//! use jobforge_model::{JobConfig, VariantsConfig};
//!
//! let mut config = JobConfig::new();
//! config.add_build_platform("el8.x86_64")?;
//! let platform = config.build_platform_mut("el8.x86_64")?;
//! platform.add_task("build")?;
//! platform.task_mut("build")?.push_variant(VariantsConfig::new());
//! # Ok::<(), jobforge_model::TreeError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod entity;
pub mod naming;
pub mod platform;
pub mod product;
pub mod project;
pub mod provider;
pub mod task;
pub mod tree;
pub mod variant;

// Re-exports for convenience
pub use entity::{ConfigEntity, Group, TaskKind, Variable};
pub use naming::{variant_string, BuildScope, JobDescriptor, JobNamer, JobSpec};
pub use platform::{Platform, PlatformProvider};
pub use product::Product;
pub use project::{Project, ProjectKind, RepoState};
pub use provider::BuildProvider;
pub use task::{
    BinaryRequirement, FileRequirements, Limitation, LimitationFlag, MachinePreference,
    RpmLimitation, Task,
};
pub use tree::{
    BuildPlatformConfig, JobConfig, PlatformConfig, TaskConfig, TestPlatformConfig,
    TestVariantsConfig, TreeError, VariantsConfig,
};
pub use variant::{default_variant_map, TaskVariant, TaskVariantValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
