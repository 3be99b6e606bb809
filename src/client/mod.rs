//! Remote namespace client boundary.
//!
//! [`NamespaceClient`] is the seam between the shell core and whatever speaks
//! to the actual data grid. The shell is strictly sequential, so the trait is
//! synchronous; every call blocks until the remote operation completes.
//!
//! This build ships one implementation, [`memory::MemoryClient`], which backs
//! `mem://` sessions and every test. A network transport plugs in behind the
//! same trait.

pub mod memory;
pub mod session;

use std::path::Path;

use thiserror::Error;

use crate::models::{Collection, DataObject};

pub use memory::MemoryClient;
pub use session::{ServiceUrl, Session, SessionConfig, SessionError};

// =============================================================================
// Error Taxonomy
// =============================================================================

/// Errors surfaced by a namespace client.
///
/// `CollectionNotFound` and `DataObjectNotFound` drive the classifier's
/// collection-first fallback; `TargetNotFound` is its combined failure. All
/// other variants pass through the classifier unmodified.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("collection does not exist: {0}")]
    CollectionNotFound(String),
    #[error("data object does not exist: {0}")]
    DataObjectNotFound(String),
    #[error("collection or data object does not exist: {0}")]
    TargetNotFound(String),
    #[error("collection not empty: {0}")]
    NotEmpty(String),
    #[error("{0} already exists. Use --force to overwrite.")]
    OverwriteWithoutForce(String),
    #[error("permission denied: {0}")]
    Denied(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Protocol(String),
}

// =============================================================================
// Client Trait
// =============================================================================

/// Operations the shell needs from the remote namespace.
///
/// Paths are absolute remote paths as produced by [`crate::core::resolve`].
/// Fetches return fresh snapshots; nothing is cached between calls.
pub trait NamespaceClient {
    fn get_collection(&self, path: &str) -> Result<Collection, ClientError>;

    fn get_data_object(&self, path: &str) -> Result<DataObject, ClientError>;

    /// Children of a collection: subcollections first, then data objects.
    fn list_children(
        &self,
        collection: &Collection,
    ) -> Result<(Vec<Collection>, Vec<DataObject>), ClientError>;

    fn create_collection(&self, path: &str) -> Result<Collection, ClientError>;

    /// Fails with [`ClientError::NotEmpty`] unless `recursive` is set and the
    /// collection has children.
    fn remove_collection(
        &self,
        collection: &Collection,
        recursive: bool,
        force: bool,
    ) -> Result<(), ClientError>;

    /// `force` bypasses any trash or recovery step the backend offers.
    fn remove_data_object(&self, object: &DataObject, force: bool) -> Result<(), ClientError>;

    /// Download a data object's content to `local_path`. Fails with
    /// [`ClientError::OverwriteWithoutForce`] when the destination exists and
    /// `force` is not set.
    fn download(
        &self,
        remote_path: &str,
        local_path: &Path,
        force: bool,
    ) -> Result<DataObject, ClientError>;

    /// Upload a local file to `remote_path`, same overwrite contract as
    /// [`NamespaceClient::download`].
    fn upload(&self, local_path: &Path, remote_path: &str, force: bool)
    -> Result<(), ClientError>;

    fn checksum(&self, object: &DataObject) -> Result<String, ClientError>;
}
