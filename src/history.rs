//! Linear undo history of play snapshots.
//!
//! The history always holds at least one snapshot and the displayed play is the
//! snapshot at the current index. Committing after an undo discards the undone
//! snapshots; there is no redo.

use crate::types::Play;

/// Ordered snapshots plus the index of the displayed one.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    snapshots: Vec<Play>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Play::new())
    }
}

impl History {
    /// Creates a history whose only snapshot is `initial`.
    pub fn new(initial: Play) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
        }
    }

    /// The displayed play.
    pub fn current(&self) -> &Play {
        &self.snapshots[self.index]
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; a history is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the displayed snapshot.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns true if there is an earlier snapshot to go back to.
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Records a new snapshot after the current one, dropping anything after it.
    pub fn commit(&mut self, play: Play) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(play);
        self.index = self.snapshots.len() - 1;
    }

    /// Steps back one snapshot. No-op at the first snapshot.
    ///
    /// # Returns
    ///
    /// `true` if the displayed play changed.
    pub fn undo(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Overwrites the displayed snapshot without creating a new entry.
    pub fn replace_current(&mut self, play: Play) {
        self.snapshots[self.index] = play;
    }
}
