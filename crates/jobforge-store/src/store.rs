//! Configuration synchronization store
//!
//! Owns one id-keyed collection per configuration group and mediates every
//! create/update/delete against the injected remote authority. Writes are
//! optimistic only in the draft the caller edits; the local collections
//! change exclusively on authoritative replies, which supersede local state
//! wholesale. Failures leave the collections untouched and land in the
//! error side channel instead.

use crate::authority::{AuthorityError, JobUpdateResults, RemoteAuthority, WriteReply};
use crate::error::StoreError;
use indexmap::IndexMap;
use jobforge_model::{
    BuildProvider, ConfigEntity, Group, Platform, Product, Project, Task, TaskVariant,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Load state of one group's collection
///
/// Kept per group so a failed fetch is distinguishable from a group that is
/// legitimately empty or was never asked for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// No fetch attempted yet
    #[default]
    NotLoaded,
    /// Collection mirrors the authority
    Loaded,
    /// Last fetch failed with this message
    Failed(String),
}

/// What a successful store operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEventKind {
    /// Entity created
    Created,
    /// Entity replaced
    Updated,
    /// Entity removed
    Deleted,
    /// Whole group re-fetched
    Refreshed,
}

/// Notification emitted after every successful write or refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    /// Affected group
    pub group: Group,
    /// Operation kind
    pub kind: StoreEventKind,
    /// Affected entity id; `None` for whole-group refreshes
    pub id: Option<String>,
}

/// Handle returned by [`ConfigStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

/// Ties an entity type to its collection inside [`ConfigStore`]
pub trait StoredEntity: ConfigEntity {
    /// Borrow the group collection
    fn collection(store: &ConfigStore) -> &IndexMap<String, Self>;

    /// Borrow the group collection mutably
    fn collection_mut(store: &mut ConfigStore) -> &mut IndexMap<String, Self>;
}

/// In-memory mirror of every configuration group
pub struct ConfigStore {
    authority: Arc<dyn RemoteAuthority>,
    build_providers: IndexMap<String, BuildProvider>,
    platforms: IndexMap<String, Platform>,
    products: IndexMap<String, Product>,
    task_variants: IndexMap<String, TaskVariant>,
    tasks: IndexMap<String, Task>,
    projects: IndexMap<String, Project>,
    fetch_status: IndexMap<Group, FetchStatus>,
    error: Option<String>,
    job_results: Option<JobUpdateResults>,
    listeners: Mutex<ListenerRegistry>,
}

impl ConfigStore {
    /// Create a store talking to the given authority
    #[must_use]
    pub fn new(authority: Arc<dyn RemoteAuthority>) -> Self {
        Self {
            authority,
            build_providers: IndexMap::new(),
            platforms: IndexMap::new(),
            products: IndexMap::new(),
            task_variants: IndexMap::new(),
            tasks: IndexMap::new(),
            projects: IndexMap::new(),
            fetch_status: Group::ALL
                .iter()
                .map(|group| (*group, FetchStatus::NotLoaded))
                .collect(),
            error: None,
            job_results: None,
            listeners: Mutex::new(ListenerRegistry::default()),
        }
    }

    /// Iterate a group's entities in display order
    pub fn list<E: StoredEntity>(&self) -> impl Iterator<Item = &E> {
        E::collection(self).values()
    }

    /// Look up one entity by id
    #[must_use]
    pub fn get<E: StoredEntity>(&self, id: &str) -> Option<&E> {
        E::collection(self).get(id)
    }

    /// Load state of a group
    #[must_use]
    pub fn fetch_status(&self, group: Group) -> FetchStatus {
        self.fetch_status
            .get(&group)
            .cloned()
            .unwrap_or(FetchStatus::NotLoaded)
    }

    /// Latest write failure message, if any
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drop the outstanding error message
    #[inline]
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Latest downstream job-update report, if any
    #[must_use]
    pub fn job_results(&self) -> Option<&JobUpdateResults> {
        self.job_results.as_ref()
    }

    /// Drop the outstanding job-update report
    #[inline]
    pub fn dismiss_job_results(&mut self) {
        self.job_results = None;
    }

    /// Register a listener for successful writes and refreshes
    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) -> SubscriptionId {
        let mut registry = self.listeners.lock();
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.listeners.lock();
        let before = registry.entries.len();
        registry.entries.retain(|(entry_id, _)| *entry_id != id);
        registry.entries.len() != before
    }

    fn emit(&self, event: &StoreEvent) {
        let registry = self.listeners.lock();
        for (_, listener) in &registry.entries {
            listener(event);
        }
    }

    /// Re-fetch one group, replacing the whole collection on success
    ///
    /// # Errors
    /// `StoreError::Authority` on fetch failure, `StoreError::Payload` when
    /// an entity does not decode; the previous collection stays in place and
    /// the group is marked [`FetchStatus::Failed`].
    pub async fn refresh<E: StoredEntity>(&mut self) -> Result<(), StoreError> {
        tracing::debug!(group = %E::GROUP, "refreshing group");
        match self.fetch_group::<E>().await {
            Ok(entries) => {
                let count = entries.len();
                *E::collection_mut(self) = entries;
                self.fetch_status.insert(E::GROUP, FetchStatus::Loaded);
                tracing::info!(group = %E::GROUP, count, "group refreshed");
                self.emit(&StoreEvent {
                    group: E::GROUP,
                    kind: StoreEventKind::Refreshed,
                    id: None,
                });
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(group = %E::GROUP, error = %message, "group refresh failed");
                self.fetch_status
                    .insert(E::GROUP, FetchStatus::Failed(message.clone()));
                self.error = Some(message);
                Err(err)
            }
        }
    }

    /// Re-fetch every group, continuing past per-group failures
    ///
    /// Failed groups are marked [`FetchStatus::Failed`]; the last failure
    /// message is left in the error side channel.
    pub async fn refresh_all(&mut self) {
        let _ = self.refresh::<BuildProvider>().await;
        let _ = self.refresh::<Platform>().await;
        let _ = self.refresh::<Product>().await;
        let _ = self.refresh::<TaskVariant>().await;
        let _ = self.refresh::<Task>().await;
        let _ = self.refresh::<Project>().await;
    }

    async fn fetch_group<E: StoredEntity>(&self) -> Result<IndexMap<String, E>, StoreError> {
        let values = self
            .authority
            .fetch_all(E::GROUP)
            .await
            .map_err(|err| StoreError::Authority(err.surface_message()))?;

        let mut entries = IndexMap::with_capacity(values.len());
        for value in values {
            let entity: E =
                serde_json::from_value(value).map_err(|err| StoreError::Payload(err.to_string()))?;
            entries.insert(entity.id().to_string(), entity);
        }
        Ok(entries)
    }

    /// Persist a new entity
    ///
    /// On success the authoritative copy replaces the local entry and is
    /// returned; the submitted draft is not what gets stored.
    ///
    /// # Errors
    /// `StoreError::Authority` on rejection or transport failure; the local
    /// collection is left untouched.
    pub async fn create<E: StoredEntity>(&mut self, draft: &E) -> Result<E, StoreError> {
        let body = encode(draft)?;
        tracing::info!(group = %E::GROUP, id = draft.id(), "creating entity");
        let reply = self.authority.create(E::GROUP, body).await;
        self.reconcile_upsert::<E>(reply, StoreEventKind::Created)
    }

    /// Persist changes to an existing entity
    ///
    /// # Errors
    /// Same contract as [`ConfigStore::create`].
    pub async fn update<E: StoredEntity>(&mut self, draft: &E) -> Result<E, StoreError> {
        let body = encode(draft)?;
        tracing::info!(group = %E::GROUP, id = draft.id(), "updating entity");
        let reply = self.authority.update(E::GROUP, draft.id(), body).await;
        self.reconcile_upsert::<E>(reply, StoreEventKind::Updated)
    }

    /// Remove an entity
    ///
    /// # Errors
    /// `StoreError::Authority` on rejection or transport failure; the local
    /// collection is left untouched.
    pub async fn delete<E: StoredEntity>(&mut self, id: &str) -> Result<(), StoreError> {
        tracing::info!(group = %E::GROUP, id, "deleting entity");
        let reply = self.authority.delete(E::GROUP, id).await;
        match reply {
            Ok(reply) => {
                self.absorb_job_results(reply.job_update_results);
                E::collection_mut(self).shift_remove(id);
                self.error = None;
                self.emit(&StoreEvent {
                    group: E::GROUP,
                    kind: StoreEventKind::Deleted,
                    id: Some(id.to_string()),
                });
                Ok(())
            }
            Err(err) => Err(self.record_write_failure(E::GROUP, err)),
        }
    }

    fn reconcile_upsert<E: StoredEntity>(
        &mut self,
        reply: Result<WriteReply, AuthorityError>,
        kind: StoreEventKind,
    ) -> Result<E, StoreError> {
        match reply {
            Ok(reply) => {
                self.absorb_job_results(reply.job_update_results);
                let entity: E = serde_json::from_value(reply.config).map_err(|err| {
                    let error = StoreError::Payload(err.to_string());
                    self.error = Some(error.to_string());
                    error
                })?;
                E::collection_mut(self).insert(entity.id().to_string(), entity.clone());
                self.error = None;
                self.emit(&StoreEvent {
                    group: E::GROUP,
                    kind,
                    id: Some(entity.id().to_string()),
                });
                Ok(entity)
            }
            Err(err) => Err(self.record_write_failure(E::GROUP, err)),
        }
    }

    fn record_write_failure(&mut self, group: Group, err: AuthorityError) -> StoreError {
        // Job updates may have happened before the rejection; surface them
        // regardless of the write's outcome
        if let AuthorityError::Rejected {
            job_update_results: Some(results),
            ..
        } = &err
        {
            self.job_results = Some(results.clone());
        }
        let message = err.surface_message();
        tracing::error!(group = %group, error = %message, "write failed");
        self.error = Some(message.clone());
        StoreError::Authority(message)
    }

    fn absorb_job_results(&mut self, results: Option<JobUpdateResults>) {
        if let Some(results) = results {
            self.job_results = Some(results);
        }
    }
}

impl StoredEntity for BuildProvider {
    fn collection(store: &ConfigStore) -> &IndexMap<String, Self> {
        &store.build_providers
    }

    fn collection_mut(store: &mut ConfigStore) -> &mut IndexMap<String, Self> {
        &mut store.build_providers
    }
}

impl StoredEntity for Platform {
    fn collection(store: &ConfigStore) -> &IndexMap<String, Self> {
        &store.platforms
    }

    fn collection_mut(store: &mut ConfigStore) -> &mut IndexMap<String, Self> {
        &mut store.platforms
    }
}

impl StoredEntity for Product {
    fn collection(store: &ConfigStore) -> &IndexMap<String, Self> {
        &store.products
    }

    fn collection_mut(store: &mut ConfigStore) -> &mut IndexMap<String, Self> {
        &mut store.products
    }
}

impl StoredEntity for TaskVariant {
    fn collection(store: &ConfigStore) -> &IndexMap<String, Self> {
        &store.task_variants
    }

    fn collection_mut(store: &mut ConfigStore) -> &mut IndexMap<String, Self> {
        &mut store.task_variants
    }
}

impl StoredEntity for Task {
    fn collection(store: &ConfigStore) -> &IndexMap<String, Self> {
        &store.tasks
    }

    fn collection_mut(store: &mut ConfigStore) -> &mut IndexMap<String, Self> {
        &mut store.tasks
    }
}

impl StoredEntity for Project {
    fn collection(store: &ConfigStore) -> &IndexMap<String, Self> {
        &store.projects
    }

    fn collection_mut(store: &mut ConfigStore) -> &mut IndexMap<String, Self> {
        &mut store.projects
    }
}

fn encode<E: ConfigEntity>(entity: &E) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(entity).map_err(|err| StoreError::Payload(err.to_string()))
}
