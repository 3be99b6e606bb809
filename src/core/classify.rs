//! Target classification.
//!
//! A path names either a collection or a data object. Lookup order is fixed:
//! the collection is tried first, so a collection shadows a data object at
//! the same resolved path. The ordering lives here, in one place, instead of
//! being buried in error handling at call sites.

use crate::client::{ClientError, NamespaceClient};
use crate::core::path::resolve;
use crate::models::{Collection, DataObject};

/// What a path turned out to denote.
#[derive(Clone, Debug)]
pub enum Target {
    Collection(Collection),
    DataObject(DataObject),
}

/// Fetch the collection at `path` resolved against `base`.
pub fn collection_at(
    client: &dyn NamespaceClient,
    base: &Collection,
    path: &str,
) -> Result<Collection, ClientError> {
    client.get_collection(&resolve(path, Some(&base.path)))
}

/// Fetch the data object at `path` resolved against `base`.
pub fn data_object_at(
    client: &dyn NamespaceClient,
    base: &Collection,
    path: &str,
) -> Result<DataObject, ClientError> {
    client.get_data_object(&resolve(path, Some(&base.path)))
}

/// Classify `path` against `base`: collection first, then data object.
///
/// Both lookups missing collapses into [`ClientError::TargetNotFound`] naming
/// the path as given. Every other client error propagates unmodified.
pub fn classify(
    client: &dyn NamespaceClient,
    base: &Collection,
    path: &str,
) -> Result<Target, ClientError> {
    match collection_at(client, base, path) {
        Ok(collection) => Ok(Target::Collection(collection)),
        Err(ClientError::CollectionNotFound(_)) => match data_object_at(client, base, path) {
            Ok(object) => Ok(Target::DataObject(object)),
            Err(ClientError::DataObjectNotFound(_)) => {
                Err(ClientError::TargetNotFound(path.to_string()))
            }
            Err(err) => Err(err),
        },
        Err(err) => Err(err),
    }
}
