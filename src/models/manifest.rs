//! Seed manifest for the in-memory backend.
//!
//! A manifest describes a namespace as a flat list of collection paths and
//! data objects with inline content. Tests build manifests directly; the
//! binary loads one from a JSON file via `--seed`.

use serde::{Deserialize, Serialize};

/// Flat description of a namespace.
///
/// All paths are absolute remote paths whose first segment is the zone,
/// e.g. `/tZone/home/alice/notes.txt`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Manifest {
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default)]
    pub objects: Vec<ObjectSeed>,
}

/// A single seeded data object.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ObjectSeed {
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub comments: String,
}

impl Manifest {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let manifest = Manifest::from_json(
            r#"{
                "collections": ["/tZone/home/alice/sub"],
                "objects": [
                    {"path": "/tZone/home/alice/a.txt", "content": "hello"},
                    {"path": "/tZone/home/alice/b.txt"}
                ]
            }"#,
        )
        .expect("valid manifest");
        assert_eq!(manifest.collections.len(), 1);
        assert_eq!(manifest.objects.len(), 2);
        assert_eq!(manifest.objects[0].content, "hello");
        assert_eq!(manifest.objects[1].content, "");
    }

    #[test]
    fn test_from_json_empty() {
        let manifest = Manifest::from_json("{}").expect("valid manifest");
        assert!(manifest.collections.is_empty());
        assert!(manifest.objects.is_empty());
    }
}
