//! Rendering of listing entries and metadata records.

use crate::config::replica_status_word;
use crate::models::{Collection, DataObject};

/// One `ls` entry: the bare name, with a trailing `/` for collections when
/// classification is on.
pub fn entry_line(name: &str, is_collection: bool, classify: bool) -> String {
    if is_collection && classify {
        format!("{name}/")
    } else {
        name.to_string()
    }
}

/// `sysmeta` record for a collection.
pub fn collection_record(collection: &Collection, subcollections: usize) -> Vec<String> {
    vec![
        format!("id: {}", collection.id),
        format!("name: {}", collection.name),
        format!("path: {}", collection.path),
        format!("subcollections: {subcollections}"),
    ]
}

/// `sysmeta` record for a data object.
pub fn data_object_record(object: &DataObject) -> Vec<String> {
    let status_code = object.replica_status();
    let (resc_id, resource_name) = object
        .replicas
        .first()
        .map(|r| (r.resc_id, r.resource_name.as_str()))
        .unwrap_or((0, ""));
    vec![
        format!("path: {}", object.path),
        format!("name: {}", object.name),
        format!("id: {}", object.id),
        format!("owner: {}", object.owner()),
        format!("size: {}", object.size),
        format!("checksum: {}", object.checksum),
        format!("collection: {}", object.collection_id),
        format!("comments: {}", object.comments),
        format!("create: {}", object.create_time),
        format!("modify: {}", object.modify_time),
        format!("expiry: {}", object.expiry),
        format!("replica: {}", object.replica_number()),
        format!(
            "replica status: {} ({})",
            status_code,
            replica_status_word(status_code)
        ),
        format!("replicas: {}", object.replicas.len()),
        format!("resource hierarchy: {}", object.resc_hier()),
        format!("resource: {resc_id} ({resource_name})"),
        format!("status: {}", object.status),
        format!("type: {}", object.object_type),
        format!("version: {}", object.version),
    ]
}
