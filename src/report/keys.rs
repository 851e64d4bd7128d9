use crate::model::{Coordinate, Key};
use std::collections::BTreeMap;

/// Indexes coordinates by `(group, artifact)`.
///
/// A key that is already taken gets the artifact name suffixed with `[2]`,
/// `[3]`, ... using the first free slot, so no coordinate is overwritten.
/// Suffixes follow the iteration order of the input.
pub fn suffixed_keys<'a, I>(coordinates: I) -> BTreeMap<Key, Coordinate>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut map = BTreeMap::new();
    for coordinate in coordinates {
        let mut slot = 1usize;
        loop {
            let artifact = if slot == 1 {
                coordinate.artifact.clone()
            } else {
                format!("{}[{}]", coordinate.artifact, slot)
            };
            let key = Key::new(coordinate.group.clone(), artifact);
            if !map.contains_key(&key) {
                map.insert(key, coordinate.clone());
                break;
            }
            slot += 1;
        }
    }
    map
}

/// Removes a trailing `[N]` duplicate suffix from an artifact name.
pub fn strip_suffix(artifact: &str) -> &str {
    let Some(body) = artifact.strip_suffix(']') else {
        return artifact;
    };
    match body.rfind('[') {
        Some(open) => {
            let digits = &body[open + 1..];
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                &artifact[..open]
            } else {
                artifact
            }
        }
        None => artifact,
    }
}
