//! # Folio Editor
//!
//! Editing engine for block-built pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host UI: clicks, pointer events, key chords │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ EditSession                                 │
//! │  - Mutations addressed by id paths          │
//! │  - Snapshot undo/redo                       │
//! │  - Drag controller                          │
//! │  - Save status                              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ PageStore: documents or legacy HTML         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The session owns the page**: stores are mirrors, saves never roll back
//! 2. **Missing ids are harmless**: mutations on stale ids are no-ops
//! 3. **One undo step per structural action**: field edits are not recorded
//! 4. **A drag is one unit**: it undoes, or cancels, as a whole
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{EditSession, EditorConfig, FileStore, Mutation};
//!
//! let store = FileStore::new("pages");
//! let mut session = EditSession::open(&store, "home", EditorConfig::default()).await?;
//!
//! session.add_section(LayoutName::Halves, None);
//! session.undo();
//!
//! session.save(&store).await?;
//! ```

mod config;
mod drag;
mod errors;
mod mutations;
mod session;
mod shortcuts;
mod store;
mod undo_stack;

pub use config::{EditorConfig, Platform, DEFAULT_DRAG_ACTIVATION_DISTANCE};
pub use drag::{accepts, ActiveDrag, DragController, DragEnd, DragItem, DragState, DropTarget, Point};
pub use errors::{EditorError, EditorResult, StoreError, StoreResult};
pub use mutations::{ColumnPath, Mutation, MutationOutcome, NoopReason};
pub use session::{EditSession, PendingSave, SaveStatus};
pub use shortcuts::{EditorCommand, KeyChord, KeyOutcome};
pub use store::{
    validate_slug, FileStore, LoadedPage, MemoryStore, PageRecord, PageStore, RecordContent,
};
pub use undo_stack::{Snapshot, UndoStack, DEFAULT_HISTORY_DEPTH};

// Re-export the document model for convenience
pub use folio_document as document;
