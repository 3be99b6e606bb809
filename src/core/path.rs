//! Remote path resolution.
//!
//! A deliberately narrow normalizer: joining appends segments, walking
//! collapses `..` and nothing else. The first segment of the joined path is
//! the anchor (the zone for absolute remote paths) and is never popped.

/// Resolve `path` into an absolute remote path, optionally joined under
/// `base`.
///
/// Joining appends the segments of `path` after the segments of `base`; a
/// leading `/` on `path` does not re-root it, so the base's segments are
/// never discarded. The walk then treats the first segment as the anchor and
/// emits it unchanged; `..` pops the last accumulated segment but never the
/// anchor; every other segment, including `.`, is appended verbatim.
///
/// Never performs I/O and never fails.
pub fn resolve(path: &str, base: Option<&str>) -> String {
    let mut segments: Vec<&str> = Vec::new();
    if let Some(base) = base {
        segments.extend(base.split('/').filter(|s| !s.is_empty()));
    }
    segments.extend(path.split('/').filter(|s| !s.is_empty()));

    let mut resolved: Vec<&str> = Vec::new();
    for segment in segments {
        if segment == ".." {
            if resolved.len() > 1 {
                resolved.pop();
            }
        } else {
            resolved.push(segment);
        }
    }

    format!("/{}", resolved.join("/"))
}
