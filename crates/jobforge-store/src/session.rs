//! Edit sessions
//!
//! An edit session is a detached draft of one entity plus the state machine
//! deciding which write path a submit takes: `Create` until the authority
//! acknowledges the entity, `Update` afterwards. Edits never touch the
//! authoritative collections; only a successful submit reconciles them.

use crate::error::StoreError;
use crate::store::{ConfigStore, StoredEntity};
use jobforge_model::ConfigEntity;

/// Which write path a submit will take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// No remote counterpart yet; the id is still free to change
    Create,
    /// Tracks a remote counterpart by immutable id
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Create,
    Update { remote_id: String },
}

/// Detached draft of one entity being edited
#[derive(Debug, Clone)]
pub struct EditSession<E: ConfigEntity> {
    state: SessionState,
    draft: E,
}

impl<E: ConfigEntity> EditSession<E> {
    fn starting(draft: E) -> Self {
        Self {
            state: SessionState::Create,
            draft,
        }
    }

    fn tracking(entity: E) -> Self {
        Self {
            state: SessionState::Update {
                remote_id: entity.id().to_string(),
            },
            draft: entity,
        }
    }

    /// Current mode
    #[must_use]
    pub fn mode(&self) -> EditMode {
        match self.state {
            SessionState::Create => EditMode::Create,
            SessionState::Update { .. } => EditMode::Update,
        }
    }

    /// Read the draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &E {
        &self.draft
    }

    /// Edit the draft in place
    #[inline]
    pub fn draft_mut(&mut self) -> &mut E {
        &mut self.draft
    }

    /// Rename the draft
    ///
    /// # Errors
    /// `StoreError::IdChanged` in update mode; re-identifying a tracked
    /// entity would silently fork it.
    pub fn set_id(&mut self, id: impl Into<String>) -> Result<(), StoreError> {
        match &self.state {
            SessionState::Create => {
                self.draft.set_id(id.into());
                Ok(())
            }
            SessionState::Update { remote_id } => Err(StoreError::IdChanged {
                was: remote_id.clone(),
                now: id.into(),
            }),
        }
    }
}

impl ConfigStore {
    /// Start editing a brand-new entity of a group
    #[must_use]
    pub fn begin_create<E: StoredEntity>(&self) -> EditSession<E> {
        EditSession::starting(E::default())
    }

    /// Start editing an existing entity as a detached clone
    ///
    /// # Errors
    /// `StoreError::UnknownEntity` if the id is not in the local collection.
    pub fn begin_edit<E: StoredEntity>(&self, id: &str) -> Result<EditSession<E>, StoreError> {
        self.get::<E>(id)
            .cloned()
            .map(EditSession::tracking)
            .ok_or_else(|| StoreError::UnknownEntity {
                group: E::GROUP,
                id: id.to_string(),
            })
    }

    /// Submit a session's draft along its current write path
    ///
    /// A successful create pins the id and flips the session to update mode;
    /// either success replaces the draft with the authoritative copy.
    ///
    /// # Errors
    /// `StoreError::IdChanged` when an update-mode draft was re-identified;
    /// otherwise the contract of [`ConfigStore::create`] /
    /// [`ConfigStore::update`].
    pub async fn submit<E: StoredEntity>(
        &mut self,
        session: &mut EditSession<E>,
    ) -> Result<(), StoreError> {
        match session.state.clone() {
            SessionState::Create => {
                let entity = self.create(&session.draft).await?;
                session.state = SessionState::Update {
                    remote_id: entity.id().to_string(),
                };
                session.draft = entity;
                Ok(())
            }
            SessionState::Update { remote_id } => {
                if session.draft.id() != remote_id {
                    return Err(StoreError::IdChanged {
                        was: remote_id,
                        now: session.draft.id().to_string(),
                    });
                }
                let entity = self.update(&session.draft).await?;
                session.draft = entity;
                Ok(())
            }
        }
    }
}
