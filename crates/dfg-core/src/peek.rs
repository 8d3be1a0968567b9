//! Neighbour lookups shared by the layout serializer and the plan resolver.
//!
//! Both walk an ordered collection and make decisions from the element next to
//! the current one. For sequences that is the previous/next element; for the
//! category-indexed action table it is the *exactly adjacent* key, because
//! category indices need not be contiguous.

use std::collections::BTreeMap;

/// One step of a walk over a slice, with its immediate neighbours.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a, T> {
    pub prev: Option<&'a T>,
    pub current: &'a T,
    pub next: Option<&'a T>,
}

/// Iterate `items` yielding each element together with its neighbours.
pub fn windows<T>(items: &[T]) -> impl Iterator<Item = Window<'_, T>> {
    items.iter().enumerate().map(move |(i, current)| Window {
        prev: i.checked_sub(1).and_then(|p| items.get(p)),
        current,
        next: items.get(i + 1),
    })
}

/// Value stored under `key + 1`, if that exact key is present.
pub fn successor<V>(map: &BTreeMap<u8, V>, key: u8) -> Option<&V> {
    key.checked_add(1).and_then(|k| map.get(&k))
}

/// Value stored under `key - 1`, if that exact key is present.
pub fn predecessor<V>(map: &BTreeMap<u8, V>, key: u8) -> Option<&V> {
    key.checked_sub(1).and_then(|k| map.get(&k))
}
