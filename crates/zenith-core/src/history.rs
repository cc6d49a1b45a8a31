//! Linear undo/redo history over annotation-set snapshots
//!
//! Every change to the annotation set goes through [`HistoryStore::commit`]
//! with a freshly built sequence. Snapshots are shared immutably (`Arc`), so
//! a reader holding one (an export in flight, a pending render) can never
//! observe a later edit.

use crate::annotation::{Annotation, AnnotationId, AnnotationPatch};
use crate::error::EditorError;
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

/// One immutable, ordered annotation set. Order is paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Arc<[Annotation]>);

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Snapshot {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.0.iter().find(|a| a.id() == id)
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.get(id).is_some()
    }

    pub fn for_page(&self, page: u32) -> impl Iterator<Item = &Annotation> {
        self.0.iter().filter(move |a| a.page_index() == page)
    }

    /// New sequence with `added` painted on top.
    pub fn with_appended(&self, added: impl IntoIterator<Item = Annotation>) -> Vec<Annotation> {
        let mut next = self.0.to_vec();
        next.extend(added);
        next
    }

    /// New sequence with `id` patched in place, or `None` if absent.
    pub fn with_patched(
        &self,
        id: AnnotationId,
        patch: &AnnotationPatch,
    ) -> Option<Vec<Annotation>> {
        let pos = self.0.iter().position(|a| a.id() == id)?;
        let mut next = self.0.to_vec();
        next[pos] = next[pos].patched(patch);
        Some(next)
    }

    /// New sequence without `id`, or `None` if absent.
    pub fn without(&self, id: AnnotationId) -> Option<Vec<Annotation>> {
        if !self.contains(id) {
            return None;
        }
        Some(self.0.iter().filter(|a| a.id() != id).cloned().collect())
    }
}

impl Deref for Snapshot {
    type Target = [Annotation];

    fn deref(&self) -> &[Annotation] {
        &self.0
    }
}

impl From<Vec<Annotation>> for Snapshot {
    fn from(set: Vec<Annotation>) -> Self {
        Self(set.into())
    }
}

fn validate_set(set: &[Annotation]) -> Result<(), EditorError> {
    let mut seen = HashSet::with_capacity(set.len());
    for ann in set {
        if !seen.insert(ann.id()) {
            return Err(EditorError::InvalidSnapshot(format!(
                "duplicate annotation id {}",
                ann.id()
            )));
        }
        ann.validate().map_err(EditorError::InvalidSnapshot)?;
    }
    Ok(())
}

/// Snapshots plus a cursor. `entries[cursor]` is current; `entries` is never
/// empty.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: Vec<Snapshot>,
    cursor: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            entries: vec![Snapshot::empty()],
            cursor: 0,
        }
    }

    /// Drop the redo branch, append `set`, and make it current.
    ///
    /// A malformed set (duplicate ids, empty ink) is rejected and the store
    /// is left exactly as it was.
    pub fn commit(&mut self, set: Vec<Annotation>) -> Result<(), EditorError> {
        if let Err(e) = validate_set(&set) {
            tracing::error!("Rejected history commit: {}", e);
            return Err(e);
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(Snapshot::from(set));
        self.cursor = self.entries.len() - 1;
        tracing::debug!(
            "Committed snapshot {} ({} annotations)",
            self.cursor,
            self.entries[self.cursor].len()
        );
        Ok(())
    }

    /// Step back one snapshot. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one snapshot. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    /// Replace everything with a single entry. Used on document load.
    pub fn reset(&mut self, initial: Vec<Annotation>) -> Result<(), EditorError> {
        validate_set(&initial)?;
        self.entries = vec![Snapshot::from(initial)];
        self.cursor = 0;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
