//! # Undo/Redo Stack
//!
//! Snapshot history for page editing.
//!
//! ## Design
//!
//! - Before a structural edit the caller records the current page
//! - Undo swaps the current page for the last recorded one and keeps the
//!   current page for redo
//! - Recording clears the redo stack
//! - The undo stack is bounded; the oldest snapshot is dropped first
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = UndoStack::new();
//!
//! history.record(doc.clone(), "addSection");
//! mutation.apply(&mut doc, &mut ids);
//!
//! if let Some(previous) = history.undo(&doc) {
//!     doc = previous;
//! }
//! ```

use folio_document::PageContent;

pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// A page as it was before an edit
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub page: PageContent,

    /// Name of the edit that followed this snapshot
    pub description: Option<String>,
}

/// Undo/redo stack of page snapshots
#[derive(Debug)]
pub struct UndoStack {
    /// Pages before each edit (most recent last)
    undo_stack: Vec<Snapshot>,

    /// Pages replaced by undo (most recent last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Snapshot pushed out by the last `record`, kept until the next
    /// history change so `discard_last` can put it back
    evicted: Option<Snapshot>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_DEPTH)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            evicted: None,
        }
    }

    /// Record the page as it is right before an edit
    pub fn record(&mut self, page: PageContent, description: impl Into<String>) {
        self.undo_stack.push(Snapshot {
            page,
            description: Some(description.into()),
        });

        self.evicted = if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            Some(self.undo_stack.remove(0))
        } else {
            None
        };

        // New edit invalidates the undone future
        self.redo_stack.clear();
    }

    /// Drop the most recent snapshot without restoring it.
    ///
    /// Used when an edit that was recorded up front turned out to change
    /// nothing. A snapshot the recording pushed out of a full stack is
    /// put back, so the depth is as it was before.
    pub fn discard_last(&mut self) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        if let Some(evicted) = self.evicted.take() {
            self.undo_stack.insert(0, evicted);
        }
        Some(snapshot)
    }

    pub fn peek_undo(&self) -> Option<&PageContent> {
        self.undo_stack.last().map(|s| &s.page)
    }

    /// Step back. Returns the page to restore, or `None` with nothing to undo.
    pub fn undo(&mut self, current: &PageContent) -> Option<PageContent> {
        let snapshot = self.undo_stack.pop()?;
        self.evicted = None;
        self.redo_stack.push(Snapshot {
            page: current.clone(),
            description: snapshot.description.clone(),
        });
        Some(snapshot.page)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: &PageContent) -> Option<PageContent> {
        let snapshot = self.redo_stack.pop()?;
        self.evicted = None;
        self.undo_stack.push(Snapshot {
            page: current.clone(),
            description: snapshot.description.clone(),
        });
        Some(snapshot.page)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.evicted = None;
    }

    /// Name of the edit the next undo would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|snapshot| snapshot.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|snapshot| snapshot.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
