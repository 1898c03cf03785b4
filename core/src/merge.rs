//! Linear merges over ascending, duplicate-free postings lists.

use crate::DocId;
use std::cmp::Ordering;

/// Documents present in both lists.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    out
}

/// Documents present in either list.
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// `[0, universe) \ postings`, walking the id range alongside the list.
/// Entries at or beyond `universe` are ignored, and the range stops at
/// `DocId::MAX` since no larger id can exist.
pub fn complement(postings: &[DocId], universe: usize) -> Vec<DocId> {
    let mut out = Vec::with_capacity(universe.saturating_sub(postings.len()));
    let mut excluded = postings.iter().peekable();
    for id in (0..universe).map_while(|i| DocId::try_from(i).ok()) {
        while excluded.next_if(|&&p| p < id).is_some() {}
        if excluded.next_if_eq(&&id).is_none() {
            out.push(id);
        }
    }
    out
}
