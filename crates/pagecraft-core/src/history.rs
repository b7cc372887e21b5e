//! Linear snapshot history for undo/redo.

use crate::document::Document;
use log::debug;

/// Maximum retained snapshots; the oldest entry is dropped past this.
pub const MAX_HISTORY: usize = 50;

/// A bounded list of document snapshots with a cursor.
///
/// The entry at `cursor` is always the current state. Pushing a new snapshot
/// truncates everything after the cursor, so a divergent edit discards the
/// redo branch.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Document>,
    cursor: usize,
}

impl History {
    /// Start history at an initial state.
    pub fn new(initial: Document) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Record a new state after an edit.
    pub fn push(&mut self, state: Document) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(state);
        if self.snapshots.len() > MAX_HISTORY {
            self.snapshots.remove(0);
        } else {
            self.cursor += 1;
        }
        debug!(
            "history push: {} snapshots, cursor {}",
            self.snapshots.len(),
            self.cursor
        );
    }

    /// Step back one snapshot, returning the restored state.
    pub fn undo(&mut self) -> Option<Document> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    /// Step forward one snapshot, returning the restored state.
    pub fn redo(&mut self) -> Option<Document> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// The snapshot the cursor points at.
    pub fn current(&self) -> &Document {
        &self.snapshots[self.cursor]
    }

    /// Overwrite the current snapshot in place without creating an undo
    /// step (page-title keystrokes).
    pub fn amend(&mut self, state: Document) {
        self.snapshots[self.cursor] = state;
    }

    /// Forget everything and restart at `state` (used after loading).
    pub fn reset(&mut self, state: Document) {
        self.snapshots = vec![state];
        self.cursor = 0;
    }
}
