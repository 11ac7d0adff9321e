use crate::types::{Cast, CastId};
use indexmap::IndexMap;

/// Insertion-ordered feed, keyed by cast id.
pub type CastMap = IndexMap<CastId, Cast>;

/// Merge `incoming` into `existing` by id.
///
/// Ids already present keep their position and take the incoming content.
/// New ids are appended in the order they first appear in `incoming`.
pub fn merge(existing: Vec<Cast>, incoming: Vec<Cast>) -> Vec<Cast> {
    let mut map: CastMap = existing.into_iter().map(|cast| (cast.id.clone(), cast)).collect();
    merge_into(&mut map, incoming);
    map.into_values().collect()
}

/// In-place form of [`merge`]. Returns how many ids were new.
pub fn merge_into(map: &mut CastMap, incoming: Vec<Cast>) -> usize {
    let mut added = 0;
    for cast in incoming {
        // IndexMap::insert overwrites in place for known keys
        if map.insert(cast.id.clone(), cast).is_none() {
            added += 1;
        }
    }
    added
}
