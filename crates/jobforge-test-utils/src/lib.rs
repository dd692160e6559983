//! Testing utilities for the JobForge workspace
//!
//! Shared fixtures and an in-memory authority for exercising the store
//! without a network.

#![allow(missing_docs)]

use async_trait::async_trait;
use indexmap::IndexMap;
use jobforge_model::{
    BuildProvider, Group, Platform, PlatformProvider, Product, Project, ProjectKind, Task,
    TaskKind, TaskVariant,
};
use jobforge_store::{AuthorityError, JobUpdateResults, RemoteAuthority, WriteReply};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

/// Initialize tracing for a test binary; safe to call repeatedly
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn sample_platform(id: &str) -> Platform {
    Platform::new(id)
        .with_os("el", "8", "x86_64")
        .with_version_number("8")
        .with_provider(
            PlatformProvider::new("vagrant").with_vm_nodes(vec!["vm-node-1".to_string()]),
        )
}

pub fn sample_product() -> Product {
    Product::new("jdk17").with_package("17", "java-17-openjdk")
}

pub fn sample_build_task(id: &str) -> Task {
    Task::new(id, TaskKind::Build).with_script("build.sh")
}

pub fn sample_test_task(id: &str) -> Task {
    Task::new(id, TaskKind::Test).with_script("run.sh")
}

pub fn sample_build_variant() -> TaskVariant {
    TaskVariant::new("debugMode", TaskKind::Build, 1)
        .with_default("release")
        .with_value("release")
        .with_value("fastdebug")
}

pub fn sample_build_provider() -> BuildProvider {
    BuildProvider::new("fakekoji").with_urls(
        "https://koji.example.org",
        "https://koji.example.org/download",
    )
}

pub fn sample_project(id: &str) -> Project {
    Project::new(id, ProjectKind::Plain)
        .with_url("https://git.example.org/jdk")
        .with_product("jdk17")
        .with_build_provider("fakekoji")
}

/// One request the in-memory authority saw, for assertions on the protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// HTTP-equivalent method
    pub method: &'static str,
    /// Target group
    pub group: Group,
    /// Entity id for update/delete
    pub id: Option<String>,
}

#[derive(Default)]
struct AuthorityState {
    groups: HashMap<Group, IndexMap<String, Value>>,
    requests: Vec<RecordedRequest>,
    next_failure: Option<AuthorityError>,
    next_job_results: Option<JobUpdateResults>,
    stamp_cloned_projects: bool,
}

/// In-memory stand-in for the remote authority
///
/// Persists JSON values per group, records every request, and can be
/// scripted to fail or to attach job-update results to the next call. With
/// project stamping enabled it emulates the server-assigned repository
/// clone state on project writes.
#[derive(Default)]
pub struct InMemoryAuthority {
    state: Mutex<AuthorityState>,
}

impl InMemoryAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emulate server-side repository cloning on project writes
    pub fn with_cloned_projects() -> Self {
        let authority = Self::new();
        authority.state.lock().stamp_cloned_projects = true;
        authority
    }

    /// Pre-populate a group
    pub fn seed(&self, group: Group, entities: Vec<Value>) {
        let mut state = self.state.lock();
        let collection = state.groups.entry(group).or_default();
        for entity in entities {
            if let Some(id) = entity.get("id").and_then(Value::as_str) {
                collection.insert(id.to_string(), entity.clone());
            }
        }
    }

    /// Fail the next call with the given error
    pub fn fail_next(&self, error: AuthorityError) {
        self.state.lock().next_failure = Some(error);
    }

    /// Attach job-update results to the next successful write
    pub fn job_results_on_next_write(&self, results: JobUpdateResults) {
        self.state.lock().next_job_results = Some(results);
    }

    /// Every request seen so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Current stored value for one entity
    pub fn stored(&self, group: Group, id: &str) -> Option<Value> {
        self.state
            .lock()
            .groups
            .get(&group)
            .and_then(|collection| collection.get(id))
            .cloned()
    }

    fn record(&self, method: &'static str, group: Group, id: Option<&str>) {
        self.state.lock().requests.push(RecordedRequest {
            method,
            group,
            id: id.map(str::to_string),
        });
    }

    fn take_failure(&self) -> Option<AuthorityError> {
        self.state.lock().next_failure.take()
    }

    fn write_reply(&self, config: Value) -> WriteReply {
        WriteReply {
            config,
            job_update_results: self.state.lock().next_job_results.take(),
        }
    }

    fn stamp(&self, group: Group, mut body: Value) -> Value {
        if group == Group::Projects && self.state.lock().stamp_cloned_projects {
            if let Some(object) = body.as_object_mut() {
                object.insert("repoState".to_string(), Value::String("CLONED".to_string()));
            }
        }
        body
    }
}

#[async_trait]
impl RemoteAuthority for InMemoryAuthority {
    async fn fetch_all(&self, group: Group) -> Result<Vec<Value>, AuthorityError> {
        self.record("GET", group, None);
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let state = self.state.lock();
        Ok(state
            .groups
            .get(&group)
            .map(|collection| collection.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn create(&self, group: Group, body: Value) -> Result<WriteReply, AuthorityError> {
        self.record("POST", group, None);
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let body = self.stamp(group, body);
        let id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthorityError::Decode("entity without id".to_string()))?
            .to_string();
        self.state
            .lock()
            .groups
            .entry(group)
            .or_default()
            .insert(id, body.clone());
        Ok(self.write_reply(body))
    }

    async fn update(
        &self,
        group: Group,
        id: &str,
        body: Value,
    ) -> Result<WriteReply, AuthorityError> {
        self.record("PUT", group, Some(id));
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let known = self
            .state
            .lock()
            .groups
            .get(&group)
            .is_some_and(|collection| collection.contains_key(id));
        if !known {
            return Err(AuthorityError::rejected(format!(
                "no such {} entry: {id}",
                group.path()
            )));
        }
        let body = self.stamp(group, body);
        self.state
            .lock()
            .groups
            .entry(group)
            .or_default()
            .insert(id.to_string(), body.clone());
        Ok(self.write_reply(body))
    }

    async fn delete(&self, group: Group, id: &str) -> Result<WriteReply, AuthorityError> {
        self.record("DELETE", group, Some(id));
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let removed = self
            .state
            .lock()
            .groups
            .get_mut(&group)
            .and_then(|collection| collection.shift_remove(id));
        match removed {
            Some(config) => Ok(self.write_reply(config)),
            None => Err(AuthorityError::rejected(format!(
                "no such {} entry: {id}",
                group.path()
            ))),
        }
    }
}
