//! # Edit Session
//!
//! One user's editing state for one page: the live document, its undo
//! history, the id generator, the drag controller and the save status.
//!
//! The session is the single writer. Structural edits go through
//! [`EditSession::apply`], which snapshots the page first; field edits
//! through [`EditSession::update_block`] skip history.

use crate::config::EditorConfig;
use crate::drag::{DragController, DragEnd, DragItem, DragState, DropTarget, Point};
use crate::errors::{EditorError, EditorResult, StoreResult};
use crate::mutations::{Mutation, MutationOutcome, NoopReason};
use crate::shortcuts::{EditorCommand, KeyChord, KeyOutcome};
use crate::store::{LoadedPage, PageStore};
use crate::undo_stack::UndoStack;
use chrono::{DateTime, Utc};
use folio_document::{
    create_empty_page_content, BlockKind, BlockPatch, IdGenerator, LayoutName, PageContent,
};
use folio_migrate::migrate_html_to_blocks;
use tracing::{debug, info, warn};

/// Where the last save stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved { at: DateTime<Utc> },
    Failed { message: String },
}

/// A save that has been started but not finished
#[derive(Debug, Clone)]
pub struct PendingSave {
    pub slug: String,
    pub page: PageContent,
}

/// Single-user edit session
pub struct EditSession {
    id: String,
    slug: String,
    document: PageContent,
    history: UndoStack,
    ids: IdGenerator,
    drag: DragController,
    save_status: SaveStatus,
    config: EditorConfig,
}

impl EditSession {
    pub fn new(slug: impl Into<String>, document: PageContent, config: EditorConfig) -> Self {
        Self::with_ids(slug, document, config, IdGenerator::new())
    }

    pub fn with_ids(
        slug: impl Into<String>,
        document: PageContent,
        config: EditorConfig,
        ids: IdGenerator,
    ) -> Self {
        Self {
            id: format!("session-{}", ids.seed()),
            slug: slug.into(),
            document,
            history: UndoStack::with_max_levels(config.history_depth),
            ids,
            drag: DragController::new(config.drag_activation_distance),
            save_status: SaveStatus::Idle,
            config,
        }
    }

    /// Session on a brand new page
    pub fn blank(slug: impl Into<String>, config: EditorConfig) -> Self {
        let mut ids = IdGenerator::new();
        let document = create_empty_page_content(&mut ids);
        Self::with_ids(slug, document, config, ids)
    }

    /// Open a stored page. Legacy HTML is migrated before editing starts.
    pub async fn open(
        store: &dyn PageStore,
        slug: &str,
        config: EditorConfig,
    ) -> EditorResult<Self> {
        let mut ids = IdGenerator::new();
        let document = match store.load(slug).await? {
            LoadedPage::Document(page) => {
                page.validate()?;
                page
            }
            LoadedPage::LegacyHtml(html) => {
                info!(slug, bytes = html.len(), "Migrating legacy page");
                migrate_html_to_blocks(&html, &mut ids)
            }
            LoadedPage::Empty => create_empty_page_content(&mut ids),
        };

        Ok(Self::with_ids(slug, document, config, ids))
    }

    /// Unique session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn document(&self) -> &PageContent {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Apply a mutation, recording an undo step if it is structural and
    /// changed something
    pub fn apply(&mut self, mutation: Mutation) -> MutationOutcome {
        if self.drag.is_dragging() && mutation.is_structural() {
            debug!(mutation = mutation.name(), "Rejected while dragging");
            return MutationOutcome::Noop(NoopReason::DragInProgress);
        }

        if !mutation.is_structural() {
            return mutation.apply(&mut self.document, &mut self.ids);
        }

        let before = self.document.clone();
        let outcome = mutation.apply(&mut self.document, &mut self.ids);
        if outcome.is_applied() {
            self.history.record(before, mutation.name());
        }
        outcome
    }

    pub fn add_section(&mut self, layout: LayoutName, index: Option<usize>) -> MutationOutcome {
        self.apply(Mutation::AddSection { layout, index })
    }

    pub fn remove_section(&mut self, section_id: &str) -> MutationOutcome {
        self.apply(Mutation::RemoveSection {
            section_id: section_id.to_string(),
        })
    }

    pub fn duplicate_section(&mut self, section_id: &str) -> MutationOutcome {
        self.apply(Mutation::DuplicateSection {
            section_id: section_id.to_string(),
        })
    }

    pub fn move_section_up(&mut self, section_id: &str) -> MutationOutcome {
        self.apply(Mutation::MoveSectionUp {
            section_id: section_id.to_string(),
        })
    }

    pub fn move_section_down(&mut self, section_id: &str) -> MutationOutcome {
        self.apply(Mutation::MoveSectionDown {
            section_id: section_id.to_string(),
        })
    }

    pub fn update_section_layout(&mut self, section_id: &str, layout: LayoutName) -> MutationOutcome {
        self.apply(Mutation::UpdateSectionLayout {
            section_id: section_id.to_string(),
            layout,
        })
    }

    pub fn add_block(&mut self, section_id: &str, column_id: &str, kind: BlockKind) -> MutationOutcome {
        self.apply(Mutation::AddBlock {
            section_id: section_id.to_string(),
            column_id: column_id.to_string(),
            kind,
        })
    }

    pub fn remove_block(&mut self, section_id: &str, column_id: &str, block_id: &str) -> MutationOutcome {
        self.apply(Mutation::RemoveBlock {
            section_id: section_id.to_string(),
            column_id: column_id.to_string(),
            block_id: block_id.to_string(),
        })
    }

    /// Field edit from a block editor. Never recorded in history.
    pub fn update_block(
        &mut self,
        section_id: &str,
        column_id: &str,
        block_id: &str,
        patch: BlockPatch,
    ) -> MutationOutcome {
        self.apply(Mutation::UpdateBlock {
            section_id: section_id.to_string(),
            column_id: column_id.to_string(),
            block_id: block_id.to_string(),
            patch,
        })
    }

    pub fn move_block_up(&mut self, section_id: &str, column_id: &str, block_id: &str) -> MutationOutcome {
        self.apply(Mutation::MoveBlockUp {
            section_id: section_id.to_string(),
            column_id: column_id.to_string(),
            block_id: block_id.to_string(),
        })
    }

    pub fn move_block_down(&mut self, section_id: &str, column_id: &str, block_id: &str) -> MutationOutcome {
        self.apply(Mutation::MoveBlockDown {
            section_id: section_id.to_string(),
            column_id: column_id.to_string(),
            block_id: block_id.to_string(),
        })
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.document) {
            Some(previous) => {
                self.document = previous;
                debug!(remaining = self.history.undo_levels(), "Undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.document) {
            Some(next) => {
                self.document = next;
                debug!(remaining = self.history.redo_levels(), "Redo");
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn pointer_down(&mut self, item: DragItem, at: Point) {
        self.drag.pointer_down(item, at);
    }

    pub fn pointer_move(&mut self, at: Point) -> bool {
        self.drag.pointer_move(at, &self.document, &mut self.history)
    }

    pub fn start_drag(&mut self, item: DragItem) -> bool {
        self.drag.start(item, &self.document, &mut self.history)
    }

    pub fn drag_over(&mut self, target: &DropTarget) {
        self.drag.drag_over(target, &mut self.document);
    }

    pub fn drop(&mut self, target: Option<&DropTarget>) -> DragEnd {
        self.drag.drop(target, &mut self.document, &mut self.history)
    }

    pub fn cancel_drag(&mut self) -> Option<DragEnd> {
        self.drag.cancel(&mut self.document, &mut self.history)
    }

    /// Run the command bound to a key chord
    pub fn handle_key(&mut self, chord: &KeyChord) -> KeyOutcome {
        let Some(command) = EditorCommand::from_chord(chord, self.config.platform) else {
            return KeyOutcome::ignored();
        };

        let ran = match command {
            // History stays frozen while a drag owns the page
            EditorCommand::Undo | EditorCommand::Redo if self.drag.is_dragging() => false,
            EditorCommand::Undo => {
                self.undo();
                true
            }
            EditorCommand::Redo => {
                self.redo();
                true
            }
            EditorCommand::CancelDrag => self.cancel_drag().is_some(),
        };

        KeyOutcome {
            command: ran.then_some(command),
            prevent_default: command != EditorCommand::CancelDrag || ran,
        }
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    /// Snapshot the page for saving. Editing may continue meanwhile.
    pub fn begin_save(&mut self) -> EditorResult<PendingSave> {
        if self.save_status == SaveStatus::Saving {
            return Err(EditorError::SaveInProgress);
        }
        self.save_status = SaveStatus::Saving;
        Ok(PendingSave {
            slug: self.slug.clone(),
            page: self.document.clone(),
        })
    }

    /// Record the result of a save. The document is never rolled back.
    pub fn finish_save(&mut self, result: StoreResult<()>) {
        self.save_status = match result {
            Ok(()) => {
                info!(slug = %self.slug, "Page saved");
                SaveStatus::Saved { at: Utc::now() }
            }
            Err(e) => {
                warn!(slug = %self.slug, error = %e, "Save failed");
                SaveStatus::Failed {
                    message: e.to_string(),
                }
            }
        };
    }

    /// Save the current page and wait for the store
    pub async fn save(&mut self, store: &dyn PageStore) -> EditorResult<&SaveStatus> {
        let pending = self.begin_save()?;
        let result = store.save(&pending.slug, &pending.page).await;
        self.finish_save(result);
        Ok(&self.save_status)
    }
}
