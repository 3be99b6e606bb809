//! Remote namespace node types.
//!
//! A [`Collection`] is a directory-like node; a [`DataObject`] is a leaf with
//! content metadata and one or more [`Replica`]s. Both are snapshots fetched
//! on demand from the namespace client and never cached across operations.

/// A collection (directory-like node) in the remote namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection {
    pub id: i64,
    /// Absolute path, first segment is the zone.
    pub path: String,
    /// Last path segment.
    pub name: String,
    pub owner: String,
    pub create_time: String,
    pub modify_time: String,
}

/// A physical copy of a data object's content on a storage resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replica {
    pub number: i32,
    /// Wire-level status code ("0", "1", "2", ...).
    pub status: String,
    pub resc_hier: String,
    pub resc_id: i64,
    pub resource_name: String,
}

/// A data object (file-like leaf) in the remote namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataObject {
    pub id: i64,
    /// Absolute path, first segment is the zone.
    pub path: String,
    /// Last path segment.
    pub name: String,
    pub size: u64,
    pub checksum: String,
    pub owner_name: String,
    pub owner_zone: String,
    /// Identifier of the parent collection.
    pub collection_id: i64,
    pub comments: String,
    pub create_time: String,
    pub modify_time: String,
    pub expiry: String,
    pub status: String,
    pub object_type: String,
    pub version: String,
    pub replicas: Vec<Replica>,
}

impl DataObject {
    /// `owner@zone` display form.
    pub fn owner(&self) -> String {
        format!("{}@{}", self.owner_name, self.owner_zone)
    }

    /// Number of the primary replica, or 0 when none is recorded.
    pub fn replica_number(&self) -> i32 {
        self.replicas.first().map(|r| r.number).unwrap_or(0)
    }

    /// Status code of the primary replica, or an empty string.
    pub fn replica_status(&self) -> &str {
        self.replicas.first().map(|r| r.status.as_str()).unwrap_or("")
    }

    /// Resource hierarchy of the primary replica.
    pub fn resc_hier(&self) -> &str {
        self.replicas
            .first()
            .map(|r| r.resc_hier.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_with_replicas(replicas: Vec<Replica>) -> DataObject {
        DataObject {
            id: 1,
            path: "/tZone/home/alice/a.txt".to_string(),
            name: "a.txt".to_string(),
            size: 3,
            checksum: "sha2:abc".to_string(),
            owner_name: "alice".to_string(),
            owner_zone: "tZone".to_string(),
            collection_id: 2,
            comments: String::new(),
            create_time: "0".to_string(),
            modify_time: "0".to_string(),
            expiry: "00000000000".to_string(),
            status: String::new(),
            object_type: "generic".to_string(),
            version: String::new(),
            replicas,
        }
    }

    #[test]
    fn test_owner_display() {
        let obj = object_with_replicas(vec![]);
        assert_eq!(obj.owner(), "alice@tZone");
    }

    #[test]
    fn test_primary_replica_accessors() {
        let obj = object_with_replicas(vec![
            Replica {
                number: 4,
                status: "1".to_string(),
                resc_hier: "demoResc".to_string(),
                resc_id: 10014,
                resource_name: "demoResc".to_string(),
            },
            Replica {
                number: 5,
                status: "0".to_string(),
                resc_hier: "archiveResc".to_string(),
                resc_id: 10015,
                resource_name: "archiveResc".to_string(),
            },
        ]);
        assert_eq!(obj.replica_number(), 4);
        assert_eq!(obj.replica_status(), "1");
        assert_eq!(obj.resc_hier(), "demoResc");
    }

    #[test]
    fn test_accessors_without_replicas() {
        let obj = object_with_replicas(vec![]);
        assert_eq!(obj.replica_number(), 0);
        assert_eq!(obj.replica_status(), "");
    }
}
