//! In-memory namespace backend.
//!
//! Stores one zone as a tree of nodes keyed by name. Backs `mem://` sessions
//! and the test suite. Checksums are `sha2:<base64(SHA-256)>` over the
//! object content, computed on every fetch.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{ClientError, NamespaceClient};
use crate::models::{Collection, DataObject, Manifest, Replica};

/// Storage resource reported for every replica.
const RESOURCE_NAME: &str = "demoResc";
const RESOURCE_ID: i64 = 10014;

// =============================================================================
// Node Tree
// =============================================================================

#[derive(Debug)]
enum Node {
    Collection(CollectionNode),
    Object(ObjectNode),
}

#[derive(Debug)]
struct CollectionNode {
    id: i64,
    create_time: String,
    modify_time: String,
    children: BTreeMap<String, Node>,
}

#[derive(Debug)]
struct ObjectNode {
    id: i64,
    create_time: String,
    modify_time: String,
    content: Vec<u8>,
    comments: String,
}

#[derive(Debug)]
struct State {
    root: CollectionNode,
    next_id: i64,
}

fn now_stamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

fn checksum_of(content: &[u8]) -> String {
    format!("sha2:{}", BASE64.encode(Sha256::digest(content)))
}

// =============================================================================
// Memory Client
// =============================================================================

/// A whole-zone namespace held in memory.
///
/// The shell is single threaded, so interior mutability via `RefCell` is
/// enough; no call re-enters the client.
pub struct MemoryClient {
    zone: String,
    user: String,
    state: RefCell<State>,
}

impl MemoryClient {
    pub fn new(zone: impl Into<String>, user: impl Into<String>) -> Self {
        let stamp = now_stamp();
        Self {
            zone: zone.into(),
            user: user.into(),
            state: RefCell::new(State {
                root: CollectionNode {
                    id: 10000,
                    create_time: stamp.clone(),
                    modify_time: stamp,
                    children: BTreeMap::new(),
                },
                next_id: 10001,
            }),
        }
    }

    /// Populate the namespace from a manifest. Collections named in the
    /// manifest and parents of seeded objects are created as needed.
    pub fn seed(&self, manifest: &Manifest) -> Result<(), ClientError> {
        for path in &manifest.collections {
            self.ensure_collection(path)?;
        }
        for object in &manifest.objects {
            let (parent, _) = split_parent(&object.path)
                .ok_or_else(|| ClientError::Protocol(format!("not an object path: {}", object.path)))?;
            self.ensure_collection(&parent)?;
            self.insert_object(&object.path, object.content.as_bytes(), &object.comments)?;
        }
        Ok(())
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Segments of `path` below the zone root, or `None` when the path is
    /// outside this zone.
    fn relative<'a>(&self, path: &'a str) -> Option<Vec<&'a str>> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        if segments.next() != Some(self.zone.as_str()) {
            return None;
        }
        Some(segments.collect())
    }

    fn canonical(&self, rel: &[&str]) -> String {
        if rel.is_empty() {
            format!("/{}", self.zone)
        } else {
            format!("/{}/{}", self.zone, rel.join("/"))
        }
    }

    fn make_collection(&self, path: String, node: &CollectionNode) -> Collection {
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Collection {
            id: node.id,
            path,
            name,
            owner: self.user.clone(),
            create_time: node.create_time.clone(),
            modify_time: node.modify_time.clone(),
        }
    }

    fn make_data_object(&self, path: String, node: &ObjectNode, collection_id: i64) -> DataObject {
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        DataObject {
            id: node.id,
            path,
            name,
            size: node.content.len() as u64,
            checksum: checksum_of(&node.content),
            owner_name: self.user.clone(),
            owner_zone: self.zone.clone(),
            collection_id,
            comments: node.comments.clone(),
            create_time: node.create_time.clone(),
            modify_time: node.modify_time.clone(),
            expiry: "00000000000".to_string(),
            status: String::new(),
            object_type: "generic".to_string(),
            version: String::new(),
            replicas: vec![Replica {
                number: 0,
                status: "1".to_string(),
                resc_hier: RESOURCE_NAME.to_string(),
                resc_id: RESOURCE_ID,
                resource_name: RESOURCE_NAME.to_string(),
            }],
        }
    }

    /// Create `path` and any missing intermediate collections; an already
    /// existing collection is returned as is.
    pub(crate) fn ensure_collection(&self, path: &str) -> Result<Collection, ClientError> {
        let rel = self
            .relative(path)
            .ok_or_else(|| ClientError::CollectionNotFound(path.to_string()))?;
        let canonical = self.canonical(&rel);

        let mut guard = self.state.borrow_mut();
        let State { root, next_id } = &mut *guard;
        let mut current = root;
        let mut walked = String::from("/") + &self.zone;
        for segment in &rel {
            walked.push('/');
            walked.push_str(segment);
            let stamp = now_stamp();
            let entry = current.children.entry((*segment).to_string()).or_insert_with(|| {
                let id = *next_id;
                *next_id += 1;
                Node::Collection(CollectionNode {
                    id,
                    create_time: stamp.clone(),
                    modify_time: stamp,
                    children: BTreeMap::new(),
                })
            });
            current = match entry {
                Node::Collection(node) => node,
                Node::Object(_) => {
                    return Err(ClientError::Protocol(format!("not a collection: {walked}")));
                }
            };
        }
        let collection = self.make_collection(canonical, current);
        Ok(collection)
    }

    fn insert_object(
        &self,
        path: &str,
        content: &[u8],
        comments: &str,
    ) -> Result<(), ClientError> {
        let rel = self
            .relative(path)
            .ok_or_else(|| ClientError::CollectionNotFound(path.to_string()))?;
        let Some((name, parent_rel)) = rel.split_last() else {
            return Err(ClientError::Protocol(format!("not an object path: {path}")));
        };

        let mut guard = self.state.borrow_mut();
        let State { root, next_id } = &mut *guard;
        let Some(parent) = descend_mut(root, parent_rel) else {
            return Err(ClientError::CollectionNotFound(
                self.canonical(parent_rel),
            ));
        };
        let stamp = now_stamp();
        match parent.children.get_mut(*name) {
            Some(Node::Collection(_)) => {
                Err(ClientError::Protocol(format!("not a data object: {path}")))
            }
            Some(Node::Object(node)) => {
                node.content = content.to_vec();
                node.comments = comments.to_string();
                node.modify_time = stamp;
                Ok(())
            }
            None => {
                let id = *next_id;
                *next_id += 1;
                parent.children.insert(
                    (*name).to_string(),
                    Node::Object(ObjectNode {
                        id,
                        create_time: stamp.clone(),
                        modify_time: stamp,
                        content: content.to_vec(),
                        comments: comments.to_string(),
                    }),
                );
                Ok(())
            }
        }
    }
}

/// Walk `rel` collection segments below `node`.
fn descend<'a>(node: &'a CollectionNode, rel: &[&str]) -> Option<&'a CollectionNode> {
    let mut current = node;
    for segment in rel {
        match current.children.get(*segment)? {
            Node::Collection(child) => current = child,
            Node::Object(_) => return None,
        }
    }
    Some(current)
}

fn descend_mut<'a>(node: &'a mut CollectionNode, rel: &[&str]) -> Option<&'a mut CollectionNode> {
    let mut current = node;
    for segment in rel {
        match current.children.get_mut(*segment)? {
            Node::Collection(child) => current = child,
            Node::Object(_) => return None,
        }
    }
    Some(current)
}

fn split_parent(path: &str) -> Option<(String, String)> {
    let trimmed = path.trim_end_matches('/');
    let (parent, name) = trimmed.rsplit_once('/')?;
    if parent.is_empty() || name.is_empty() {
        return None;
    }
    Some((parent.to_string(), name.to_string()))
}

impl NamespaceClient for MemoryClient {
    fn get_collection(&self, path: &str) -> Result<Collection, ClientError> {
        let rel = self
            .relative(path)
            .ok_or_else(|| ClientError::CollectionNotFound(path.to_string()))?;
        let canonical = self.canonical(&rel);
        let state = self.state.borrow();
        let node = descend(&state.root, &rel)
            .ok_or_else(|| ClientError::CollectionNotFound(canonical.clone()))?;
        Ok(self.make_collection(canonical, node))
    }

    fn get_data_object(&self, path: &str) -> Result<DataObject, ClientError> {
        let rel = self
            .relative(path)
            .ok_or_else(|| ClientError::DataObjectNotFound(path.to_string()))?;
        let canonical = self.canonical(&rel);
        let Some((name, parent_rel)) = rel.split_last() else {
            return Err(ClientError::DataObjectNotFound(canonical));
        };
        let state = self.state.borrow();
        let Some(parent) = descend(&state.root, parent_rel) else {
            return Err(ClientError::DataObjectNotFound(canonical));
        };
        match parent.children.get(*name) {
            Some(Node::Object(node)) => Ok(self.make_data_object(canonical, node, parent.id)),
            _ => Err(ClientError::DataObjectNotFound(canonical)),
        }
    }

    fn list_children(
        &self,
        collection: &Collection,
    ) -> Result<(Vec<Collection>, Vec<DataObject>), ClientError> {
        let rel = self
            .relative(&collection.path)
            .ok_or_else(|| ClientError::CollectionNotFound(collection.path.clone()))?;
        let state = self.state.borrow();
        let node = descend(&state.root, &rel)
            .ok_or_else(|| ClientError::CollectionNotFound(collection.path.clone()))?;

        let mut collections = Vec::new();
        let mut objects = Vec::new();
        for (name, child) in &node.children {
            let child_path = format!("{}/{}", self.canonical(&rel), name);
            match child {
                Node::Collection(c) => collections.push(self.make_collection(child_path, c)),
                Node::Object(o) => objects.push(self.make_data_object(child_path, o, node.id)),
            }
        }
        Ok((collections, objects))
    }

    fn create_collection(&self, path: &str) -> Result<Collection, ClientError> {
        if self.get_collection(path).is_ok() {
            return Err(ClientError::Protocol(format!(
                "collection already exists: {path}"
            )));
        }
        let collection = self.ensure_collection(path)?;
        debug!(path = %collection.path, "created collection");
        Ok(collection)
    }

    fn remove_collection(
        &self,
        collection: &Collection,
        recursive: bool,
        _force: bool,
    ) -> Result<(), ClientError> {
        let rel = self
            .relative(&collection.path)
            .ok_or_else(|| ClientError::CollectionNotFound(collection.path.clone()))?;
        let Some((name, parent_rel)) = rel.split_last() else {
            return Err(ClientError::Denied(format!(
                "cannot remove the zone root: {}",
                collection.path
            )));
        };

        let mut state = self.state.borrow_mut();
        let parent = descend_mut(&mut state.root, parent_rel)
            .ok_or_else(|| ClientError::CollectionNotFound(collection.path.clone()))?;
        match parent.children.get(*name) {
            Some(Node::Collection(node)) => {
                if !node.children.is_empty() && !recursive {
                    return Err(ClientError::NotEmpty(collection.path.clone()));
                }
            }
            _ => return Err(ClientError::CollectionNotFound(collection.path.clone())),
        }
        parent.children.remove(*name);
        debug!(path = %collection.path, "removed collection");
        Ok(())
    }

    fn remove_data_object(&self, object: &DataObject, _force: bool) -> Result<(), ClientError> {
        // No trash step in the memory backend; `force` only skips it.
        let rel = self
            .relative(&object.path)
            .ok_or_else(|| ClientError::DataObjectNotFound(object.path.clone()))?;
        let Some((name, parent_rel)) = rel.split_last() else {
            return Err(ClientError::DataObjectNotFound(object.path.clone()));
        };

        let mut state = self.state.borrow_mut();
        let parent = descend_mut(&mut state.root, parent_rel)
            .ok_or_else(|| ClientError::DataObjectNotFound(object.path.clone()))?;
        match parent.children.get(*name) {
            Some(Node::Object(_)) => {
                parent.children.remove(*name);
                debug!(path = %object.path, "removed data object");
                Ok(())
            }
            _ => Err(ClientError::DataObjectNotFound(object.path.clone())),
        }
    }

    fn download(
        &self,
        remote_path: &str,
        local_path: &Path,
        force: bool,
    ) -> Result<DataObject, ClientError> {
        let object = self.get_data_object(remote_path)?;
        if local_path.exists() && !force {
            return Err(ClientError::OverwriteWithoutForce(
                local_path.display().to_string(),
            ));
        }
        let rel = self
            .relative(&object.path)
            .ok_or_else(|| ClientError::DataObjectNotFound(object.path.clone()))?;
        let content = {
            let state = self.state.borrow();
            let Some((name, parent_rel)) = rel.split_last() else {
                return Err(ClientError::DataObjectNotFound(object.path.clone()));
            };
            let parent = descend(&state.root, parent_rel)
                .ok_or_else(|| ClientError::DataObjectNotFound(object.path.clone()))?;
            match parent.children.get(*name) {
                Some(Node::Object(node)) => node.content.clone(),
                _ => return Err(ClientError::DataObjectNotFound(object.path.clone())),
            }
        };
        std::fs::write(local_path, content)?;
        debug!(remote = %object.path, local = %local_path.display(), "downloaded");
        Ok(object)
    }

    fn upload(
        &self,
        local_path: &Path,
        remote_path: &str,
        force: bool,
    ) -> Result<(), ClientError> {
        if !force && self.get_data_object(remote_path).is_ok() {
            return Err(ClientError::OverwriteWithoutForce(remote_path.to_string()));
        }
        let content = std::fs::read(local_path)?;
        self.insert_object(remote_path, &content, "")?;
        debug!(local = %local_path.display(), remote = %remote_path, "uploaded");
        Ok(())
    }

    fn checksum(&self, object: &DataObject) -> Result<String, ClientError> {
        // Recomputed from a fresh fetch, not read off the snapshot.
        Ok(self.get_data_object(&object.path)?.checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryClient {
        let client = MemoryClient::new("tZone", "alice");
        client
            .seed(&Manifest {
                collections: vec!["/tZone/home/alice/sub".to_string()],
                objects: vec![crate::models::ObjectSeed {
                    path: "/tZone/home/alice/hello.txt".to_string(),
                    content: "hello".to_string(),
                    comments: String::new(),
                }],
            })
            .expect("seed");
        client
    }

    #[test]
    fn test_zone_root_exists() {
        let client = MemoryClient::new("tZone", "alice");
        let root = client.get_collection("/tZone").expect("zone root");
        assert_eq!(root.name, "tZone");
        assert_eq!(root.path, "/tZone");
    }

    #[test]
    fn test_lookup_outside_zone_fails() {
        let client = seeded();
        assert!(matches!(
            client.get_collection("/otherZone/home"),
            Err(ClientError::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_collection_is_not_a_data_object() {
        let client = seeded();
        assert!(matches!(
            client.get_data_object("/tZone/home/alice/sub"),
            Err(ClientError::DataObjectNotFound(_))
        ));
        assert!(matches!(
            client.get_collection("/tZone/home/alice/hello.txt"),
            Err(ClientError::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_list_children_collections_first() {
        let client = seeded();
        let home = client.get_collection("/tZone/home/alice").expect("home");
        let (collections, objects) = client.list_children(&home).expect("children");
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "sub");
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].name, "hello.txt");
        assert_eq!(objects[0].size, 5);
        assert_eq!(objects[0].collection_id, home.id);
    }

    #[test]
    fn test_known_checksum() {
        let client = seeded();
        let obj = client
            .get_data_object("/tZone/home/alice/hello.txt")
            .expect("object");
        // SHA-256 of "hello", base64.
        assert_eq!(
            obj.checksum,
            "sha2:LPJNul+wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ="
        );
        assert_eq!(client.checksum(&obj).expect("checksum"), obj.checksum);
    }

    #[test]
    fn test_create_collection_makes_parents() {
        let client = MemoryClient::new("tZone", "alice");
        let deep = client
            .create_collection("/tZone/home/alice/a/b")
            .expect("create");
        assert_eq!(deep.path, "/tZone/home/alice/a/b");
        assert!(client.get_collection("/tZone/home/alice/a").is_ok());
    }

    #[test]
    fn test_create_existing_collection_fails() {
        let client = seeded();
        assert!(matches!(
            client.create_collection("/tZone/home/alice/sub"),
            Err(ClientError::Protocol(_))
        ));
    }

    #[test]
    fn test_remove_collection_not_empty() {
        let client = seeded();
        let home = client.get_collection("/tZone/home/alice").expect("home");
        assert!(matches!(
            client.remove_collection(&home, false, false),
            Err(ClientError::NotEmpty(_))
        ));
        // Still there.
        assert!(client.get_collection("/tZone/home/alice").is_ok());

        client
            .remove_collection(&home, true, false)
            .expect("recursive remove");
        assert!(client.get_collection("/tZone/home/alice").is_err());
    }

    #[test]
    fn test_remove_zone_root_denied() {
        let client = seeded();
        let root = client.get_collection("/tZone").expect("root");
        assert!(matches!(
            client.remove_collection(&root, true, true),
            Err(ClientError::Denied(_))
        ));
    }

    #[test]
    fn test_remove_data_object() {
        let client = seeded();
        let obj = client
            .get_data_object("/tZone/home/alice/hello.txt")
            .expect("object");
        client.remove_data_object(&obj, false).expect("remove");
        assert!(client.get_data_object("/tZone/home/alice/hello.txt").is_err());
    }

    #[test]
    fn test_download_respects_force() {
        let client = seeded();
        let dir = tempfile::tempdir().expect("tempdir");
        let local = dir.path().join("hello.txt");

        client
            .download("/tZone/home/alice/hello.txt", &local, false)
            .expect("download");
        assert_eq!(std::fs::read_to_string(&local).expect("read"), "hello");

        assert!(matches!(
            client.download("/tZone/home/alice/hello.txt", &local, false),
            Err(ClientError::OverwriteWithoutForce(_))
        ));
        client
            .download("/tZone/home/alice/hello.txt", &local, true)
            .expect("forced download");
    }

    #[test]
    fn test_upload_respects_force() {
        let client = seeded();
        let dir = tempfile::tempdir().expect("tempdir");
        let local = dir.path().join("up.txt");
        std::fs::write(&local, "fresh").expect("write");

        client
            .upload(&local, "/tZone/home/alice/up.txt", false)
            .expect("upload");
        let obj = client
            .get_data_object("/tZone/home/alice/up.txt")
            .expect("uploaded");
        assert_eq!(obj.size, 5);

        assert!(matches!(
            client.upload(&local, "/tZone/home/alice/up.txt", false),
            Err(ClientError::OverwriteWithoutForce(_))
        ));
        client
            .upload(&local, "/tZone/home/alice/up.txt", true)
            .expect("forced upload");
    }

    #[test]
    fn test_upload_into_missing_collection_fails() {
        let client = seeded();
        let dir = tempfile::tempdir().expect("tempdir");
        let local = dir.path().join("up.txt");
        std::fs::write(&local, "x").expect("write");
        assert!(matches!(
            client.upload(&local, "/tZone/home/nobody/up.txt", false),
            Err(ClientError::CollectionNotFound(_))
        ));
    }
}
