//! Error types for the synchronization store

use jobforge_model::Group;

/// Failures surfaced by store operations
///
/// Remote rejections and transport failures are deliberately not
/// distinguished here: both leave local state untouched and surface one
/// message, already normalized by the authority layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The authority rejected the write or the transport failed
    #[error("{0}")]
    Authority(String),

    /// A payload failed to encode or decode as the entity type
    #[error("malformed authority payload: {0}")]
    Payload(String),

    /// No entity with this id in the local collection
    #[error("no '{group}' entry with id '{id}'")]
    UnknownEntity {
        /// Group that was searched
        group: Group,
        /// Requested identifier
        id: String,
    },

    /// A tracked entity's id may not change after creation
    #[error("tracked entity id may not change (was '{was}', now '{now}')")]
    IdChanged {
        /// Identifier the remote counterpart is known under
        was: String,
        /// Identifier the draft tried to take
        now: String,
    },
}
