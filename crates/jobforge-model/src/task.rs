//! Task entities
//!
//! A task is one executable unit of work (a build or a test run) described
//! by its script, machine requirements and applicability limits. Tasks are
//! referenced by id from the job configuration tree.

use crate::entity::{ConfigEntity, Group, TaskKind, Variable};
use serde::{Deserialize, Serialize};

/// Build or test task definition
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier, unique among tasks
    pub id: String,
    /// Build-side or test-side task
    pub kind: TaskKind,
    /// Entry-point script executed by the job
    pub script: String,
    /// VM/bare-metal placement preference
    #[serde(default)]
    pub machine_preference: MachinePreference,
    /// Cron-style SCM polling schedule, empty = no polling
    #[serde(default)]
    pub scm_poll_schedule: String,
    /// Input artifacts the job needs staged
    #[serde(default)]
    pub file_requirements: FileRequirements,
    /// Subpackage filtering applied to produced/consumed RPMs
    #[serde(default)]
    pub rpm_limitation: RpmLimitation,
    /// Extra XML spliced into the generated job definition
    #[serde(default)]
    pub xml_template: String,
    /// Custom variables exported to the job environment
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// Restricts which platforms may run this task
    #[serde(default)]
    pub platform_limitation: Limitation,
    /// Restricts which products this task applies to
    #[serde(default)]
    pub product_limitation: Limitation,
}

impl Task {
    /// Create a new task
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id: id.into(),
            kind,
            ..Self::default()
        }
    }

    /// With the entry-point script
    #[inline]
    #[must_use]
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    /// With a machine placement preference
    #[inline]
    #[must_use]
    pub fn with_machine_preference(mut self, preference: MachinePreference) -> Self {
        self.machine_preference = preference;
        self
    }

    /// Whether this task may run on the given platform
    #[inline]
    #[must_use]
    pub fn applies_to_platform(&self, platform_id: &str) -> bool {
        self.platform_limitation.permits(platform_id)
    }

    /// Whether this task applies to the given product
    #[inline]
    #[must_use]
    pub fn applies_to_product(&self, product_id: &str) -> bool {
        self.product_limitation.permits(product_id)
    }
}

impl ConfigEntity for Task {
    const GROUP: Group = Group::Tasks;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// VM/bare-metal placement preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachinePreference {
    /// Prefer a VM, fall back to bare metal
    #[default]
    Vm,
    /// Require a VM
    VmOnly,
    /// Prefer bare metal, fall back to a VM
    Hw,
    /// Require bare metal
    HwOnly,
}

/// Input artifacts a task needs staged before it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRequirements {
    /// Needs the source tarball
    pub source: bool,
    /// Which built binaries are needed
    pub binary: BinaryRequirement,
}

/// Which built binaries a task consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinaryRequirement {
    /// No binaries needed
    #[default]
    None,
    /// The binary for the current platform
    Binary,
    /// Binaries for every configured platform
    Binaries,
}

/// Subpackage filtering applied to RPM lists
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpmLimitation {
    /// Glob patterns of subpackages to keep
    #[serde(default)]
    pub allow_list: Vec<String>,
    /// Glob patterns of subpackages to drop
    #[serde(default)]
    pub deny_list: Vec<String>,
}

impl RpmLimitation {
    /// Whether any filtering is configured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allow_list.is_empty() && self.deny_list.is_empty()
    }
}

/// Allow/deny restriction over a list of entity ids
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limitation {
    /// Referenced entity ids
    #[serde(default)]
    pub list: Vec<String>,
    /// How the list is interpreted
    #[serde(default)]
    pub flag: LimitationFlag,
}

impl Limitation {
    /// Whether the given id passes this restriction
    #[must_use]
    pub fn permits(&self, id: &str) -> bool {
        match self.flag {
            LimitationFlag::None => true,
            LimitationFlag::Allow => self.list.iter().any(|entry| entry == id),
            LimitationFlag::Deny => !self.list.iter().any(|entry| entry == id),
        }
    }
}

/// Interpretation of a [`Limitation`] list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitationFlag {
    /// List is ignored, everything passes
    #[default]
    None,
    /// Only listed ids pass
    Allow,
    /// Listed ids are excluded
    Deny,
}
