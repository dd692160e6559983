//! JobForge synchronization store
//!
//! The stateful side of JobForge: one in-memory collection per
//! configuration group, kept in sync with a remote authority through
//! create/update/delete round trips. The authority's replies always win;
//! local collections change only when a reply lands, and failed writes
//! leave them untouched with the failure parked in a dismissible side
//! channel. Downstream job updates reported by the authority travel the
//! same way.
//!
//! # Example
//!
//! ```rust,ignore
//! use jobforge_store::{ConfigStore, HttpAuthority};
//! use jobforge_model::Task;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let authority = Arc::new(HttpAuthority::new("https://config.example.org/api"));
//! let mut store = ConfigStore::new(authority);
//! store.refresh_all().await;
//!
//! let mut session = store.begin_create::<Task>();
//! session.set_id("build")?;
//! session.draft_mut().script = "build.sh".to_string();
//! store.submit(&mut session).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod authority;
pub mod error;
pub mod http;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use authority::{
    AuthorityError, JobUpdateResult, JobUpdateResults, RemoteAuthority, WriteReply,
};
pub use error::StoreError;
pub use http::HttpAuthority;
pub use session::{EditMode, EditSession};
pub use store::{
    ConfigStore, FetchStatus, StoreEvent, StoreEventKind, StoredEntity, SubscriptionId,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
