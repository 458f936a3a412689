//! The one piece of genuinely mutable state: which snapshot is being shown,
//! and whether the view follows new arrivals or holds a user-chosen
//! position. One navigator per open timeline view; a single writer must own
//! it.

use serde::{Deserialize, Serialize};

use super::snapshot::ToolCallSnapshot;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Auto-follow the newest snapshot as lists arrive.
    Live,
    /// Hold a user-chosen position independent of new arrivals.
    Manual,
}

/// Identity of the held position. Keyed by snapshot id, which survives list
/// re-derivation; indices do not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub message_id: String,
    pub snapshot_id: String,
}

pub struct TimelineNavigator {
    mode: Mode,
    selection: Option<Selection>,
    current_index: usize,
    initialized: bool,
    snapshots: Vec<ToolCallSnapshot>,
}

impl TimelineNavigator {
    pub fn new() -> Self {
        Self {
            mode: Mode::Live,
            selection: None,
            current_index: 0,
            initialized: false,
            snapshots: Vec::new(),
        }
    }

    /// Reconcile the held position against a freshly derived list. Called
    /// once per history change, after the deriver has run.
    pub fn apply_snapshots(&mut self, snapshots: Vec<ToolCallSnapshot>) {
        self.snapshots = snapshots;

        if self.snapshots.is_empty() {
            // A transiently empty list must not force a re-initialization
            // storm; `initialized` is left as-is.
            self.selection = None;
            self.current_index = 0;
            return;
        }

        if !self.initialized {
            self.follow_last();
            self.initialized = true;
            return;
        }

        match self.mode {
            Mode::Live => self.follow_last(),
            Mode::Manual => {
                let held = self.selection.as_ref().and_then(|selection| {
                    self.snapshots
                        .iter()
                        .position(|s| s.id == selection.snapshot_id)
                });
                match held {
                    // Still present: track its new position, keep the
                    // selection and the manual mode.
                    Some(index) => self.current_index = index,
                    // The selected snapshot left the history: resume
                    // following the tip.
                    None => self.follow_last(),
                }
            }
        }
    }

    /// Explicit user selection by id. Choosing the newest snapshot is
    /// indistinguishable in intent from "keep following", so it resumes live
    /// mode; anything earlier holds. Unknown ids are ignored.
    pub fn select_snapshot(&mut self, id: &str) {
        if let Some(index) = self.snapshots.iter().position(|s| s.id == id) {
            self.select_index(index);
        }
    }

    /// Explicit user selection by position, clamped to the valid range.
    pub fn select_index(&mut self, index: usize) {
        if self.snapshots.is_empty() {
            return;
        }
        let last = self.snapshots.len() - 1;
        let index = index.min(last);
        self.current_index = index;
        self.selection = Some(selection_for(&self.snapshots[index]));
        self.mode = if index == last { Mode::Live } else { Mode::Manual };
        self.initialized = true;
    }

    /// Jump to the newest snapshot and resume live-follow, regardless of
    /// prior state. No-op while the list is empty.
    pub fn jump_to_latest(&mut self) {
        if self.snapshots.is_empty() {
            return;
        }
        self.follow_last();
        self.initialized = true;
    }

    /// What to show right now, if anything.
    pub fn current_snapshot(&self) -> Option<&ToolCallSnapshot> {
        self.selection.as_ref()?;
        self.snapshots.get(self.current_index)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn snapshots(&self) -> &[ToolCallSnapshot] {
        &self.snapshots
    }

    fn follow_last(&mut self) {
        let last = self.snapshots.len() - 1;
        self.current_index = last;
        self.selection = Some(selection_for(&self.snapshots[last]));
        self.mode = Mode::Live;
    }
}

impl Default for TimelineNavigator {
    fn default() -> Self {
        Self::new()
    }
}

fn selection_for(snapshot: &ToolCallSnapshot) -> Selection {
    Selection {
        message_id: snapshot.message_id.clone(),
        snapshot_id: snapshot.id.clone(),
    }
}
