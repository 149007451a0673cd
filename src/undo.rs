//! Snapshot-based undo history.
//!
//! The canvas stores a full copy of its shape collection AFTER every
//! structural change, not before. The newest entry is therefore always the
//! live state, and a step can only be undone while the previous state sits
//! right below it: two entries are the minimum for a restorable history.
//!
//! There is no redo. A popped snapshot is gone.

/// Default number of undo steps kept.
pub const DEFAULT_NUM_BACKUPS: usize = 10;

/// Bounded stack of post-mutation snapshots.
///
/// Holds at most `num_backups + 1` entries: the live state plus
/// `num_backups` earlier ones.
#[derive(Debug, Clone)]
pub struct SnapshotStack<T: Clone> {
    /// Snapshots, oldest first
    snapshots: Vec<T>,
    /// Number of restorable steps kept
    num_backups: usize,
}

impl<T: Clone> Default for SnapshotStack<T> {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_BACKUPS)
    }
}

impl<T: Clone> SnapshotStack<T> {
    /// Create an empty stack keeping `num_backups` undo steps.
    pub fn new(num_backups: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            num_backups,
        }
    }

    /// Record the state reached by a mutation that just happened.
    pub fn push(&mut self, state: T) {
        if self.snapshots.len() > self.num_backups {
            let excess = self.snapshots.len() - self.num_backups;
            self.snapshots.drain(..excess);
        }
        self.snapshots.push(state);
        log::debug!("Undo: stored snapshot ({} held)", self.snapshots.len());
    }

    /// True when both the live state and a previous state are held.
    pub fn is_restorable(&self) -> bool {
        self.snapshots.len() >= 2
    }

    /// Drop the live state and hand back the one before it.
    ///
    /// The returned state is removed as well; the caller re-pushes it once
    /// it has been adopted. Returns `None` (and changes nothing) when the
    /// history is not restorable.
    pub fn restore(&mut self) -> Option<T> {
        if !self.is_restorable() {
            return None;
        }
        self.snapshots.pop();
        let previous = self.snapshots.pop();
        log::debug!("Undo: restored snapshot ({} left)", self.snapshots.len());
        previous
    }

    /// The most recent snapshot, normally equal to the live state.
    pub fn latest(&self) -> Option<&T> {
        self.snapshots.last()
    }

    /// Remove the most recent snapshot without restoring anything.
    pub fn pop_latest(&mut self) -> Option<T> {
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn num_backups(&self) -> usize {
        self.num_backups
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.snapshots.clear();
        log::debug!("Undo history cleared");
    }
}
