//! # Page Mutations
//!
//! Structural operations on a page, addressed by id paths:
//! `(section)`, `(section, column)` or `(section, column, block)`.
//!
//! ## Semantics
//!
//! - Every mutation is total. An id that does not resolve is a no-op that
//!   leaves the page untouched; the UI issuing the command may simply be a
//!   frame behind the document.
//! - Only the addressed branch changes. Siblings are left as they were.
//! - Moves at a boundary (first section up, last block down) are no-ops.
//! - `UpdateBlock` is a shallow field merge and is not recorded in history.

use folio_document::{
    create_block, create_section, redistribute_columns, BlockKind, BlockPatch, IdGenerator,
    LayoutName, PageContent,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Address of a column inside a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPath {
    pub section_id: String,
    pub column_id: String,
}

impl ColumnPath {
    pub fn new(section_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            column_id: column_id.into(),
        }
    }
}

/// Semantic page edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Insert a new section at `index`, or append when absent
    AddSection {
        layout: LayoutName,
        index: Option<usize>,
    },

    RemoveSection {
        section_id: String,
    },

    /// Insert a copy with fresh ids right after the original
    DuplicateSection {
        section_id: String,
    },

    MoveSectionUp {
        section_id: String,
    },

    MoveSectionDown {
        section_id: String,
    },

    /// Move a section to an absolute index (drag and drop)
    ReorderSection {
        section_id: String,
        to_index: usize,
    },

    /// Change layout, redistributing blocks across the new columns
    UpdateSectionLayout {
        section_id: String,
        layout: LayoutName,
    },

    AddBlock {
        section_id: String,
        column_id: String,
        kind: BlockKind,
    },

    RemoveBlock {
        section_id: String,
        column_id: String,
        block_id: String,
    },

    UpdateBlock {
        section_id: String,
        column_id: String,
        block_id: String,
        patch: BlockPatch,
    },

    MoveBlockUp {
        section_id: String,
        column_id: String,
        block_id: String,
    },

    MoveBlockDown {
        section_id: String,
        column_id: String,
        block_id: String,
    },

    /// Move a block within its column to an absolute index (drag and drop)
    ReorderBlock {
        section_id: String,
        column_id: String,
        block_id: String,
        to_index: usize,
    },

    /// Move a block into another column, before `before_block_id` or at the end
    TransferBlock {
        block_id: String,
        from: ColumnPath,
        to: ColumnPath,
        before_block_id: Option<String>,
    },
}

/// Why a mutation left the page unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoopReason {
    SectionNotFound(String),
    ColumnNotFound(String),
    BlockNotFound(String),
    AtBoundary,
    PatchDoesNotFit(BlockKind),
    Unchanged,
    DragInProgress,
}

impl fmt::Display for NoopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoopReason::SectionNotFound(id) => write!(f, "section {} not found", id),
            NoopReason::ColumnNotFound(id) => write!(f, "column {} not found", id),
            NoopReason::BlockNotFound(id) => write!(f, "block {} not found", id),
            NoopReason::AtBoundary => write!(f, "already at boundary"),
            NoopReason::PatchDoesNotFit(kind) => write!(f, "patch does not fit a {} block", kind),
            NoopReason::Unchanged => write!(f, "nothing to change"),
            NoopReason::DragInProgress => write!(f, "a drag is in progress"),
        }
    }
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Noop(NoopReason),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

pub(crate) type Step = Result<(), NoopReason>;

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddSection { .. } => "addSection",
            Mutation::RemoveSection { .. } => "removeSection",
            Mutation::DuplicateSection { .. } => "duplicateSection",
            Mutation::MoveSectionUp { .. } => "moveSectionUp",
            Mutation::MoveSectionDown { .. } => "moveSectionDown",
            Mutation::ReorderSection { .. } => "reorderSection",
            Mutation::UpdateSectionLayout { .. } => "updateSectionLayout",
            Mutation::AddBlock { .. } => "addBlock",
            Mutation::RemoveBlock { .. } => "removeBlock",
            Mutation::UpdateBlock { .. } => "updateBlock",
            Mutation::MoveBlockUp { .. } => "moveBlockUp",
            Mutation::MoveBlockDown { .. } => "moveBlockDown",
            Mutation::ReorderBlock { .. } => "reorderBlock",
            Mutation::TransferBlock { .. } => "transferBlock",
        }
    }

    /// Structural edits get an undo step; field edits do not
    pub fn is_structural(&self) -> bool {
        !matches!(self, Mutation::UpdateBlock { .. })
    }

    /// Apply in place. On a no-op the page is untouched.
    pub fn apply(&self, doc: &mut PageContent, ids: &mut IdGenerator) -> MutationOutcome {
        let step = match self {
            Mutation::AddSection { layout, index } => {
                Self::apply_add_section(doc, *layout, *index, ids)
            }
            Mutation::RemoveSection { section_id } => Self::apply_remove_section(doc, section_id),
            Mutation::DuplicateSection { section_id } => {
                Self::apply_duplicate_section(doc, section_id, ids)
            }
            Mutation::MoveSectionUp { section_id } => Self::apply_shift_section(doc, section_id, -1),
            Mutation::MoveSectionDown { section_id } => {
                Self::apply_shift_section(doc, section_id, 1)
            }
            Mutation::ReorderSection {
                section_id,
                to_index,
            } => Self::apply_reorder_section(doc, section_id, *to_index),
            Mutation::UpdateSectionLayout { section_id, layout } => {
                Self::apply_update_layout(doc, section_id, *layout, ids)
            }
            Mutation::AddBlock {
                section_id,
                column_id,
                kind,
            } => Self::apply_add_block(doc, section_id, column_id, *kind, ids),
            Mutation::RemoveBlock {
                section_id,
                column_id,
                block_id,
            } => Self::apply_remove_block(doc, section_id, column_id, block_id),
            Mutation::UpdateBlock {
                section_id,
                column_id,
                block_id,
                patch,
            } => Self::apply_update_block(doc, section_id, column_id, block_id, patch),
            Mutation::MoveBlockUp {
                section_id,
                column_id,
                block_id,
            } => Self::apply_shift_block(doc, section_id, column_id, block_id, -1),
            Mutation::MoveBlockDown {
                section_id,
                column_id,
                block_id,
            } => Self::apply_shift_block(doc, section_id, column_id, block_id, 1),
            Mutation::ReorderBlock {
                section_id,
                column_id,
                block_id,
                to_index,
            } => Self::apply_reorder_block(doc, section_id, column_id, block_id, *to_index),
            Mutation::TransferBlock {
                block_id,
                from,
                to,
                before_block_id,
            } => Self::apply_transfer_block(doc, block_id, from, to, before_block_id.as_deref()),
        };

        match step {
            Ok(()) => {
                debug!(mutation = self.name(), "Applied mutation");
                MutationOutcome::Applied
            }
            Err(reason) => {
                debug!(mutation = self.name(), %reason, "Mutation was a no-op");
                MutationOutcome::Noop(reason)
            }
        }
    }

    /// Copy-on-write form: returns the edited page, leaving `doc` as it was
    pub fn applied_to(&self, doc: &PageContent, ids: &mut IdGenerator) -> (PageContent, MutationOutcome) {
        let mut next = doc.clone();
        let outcome = self.apply(&mut next, ids);
        (next, outcome)
    }

    fn apply_add_section(
        doc: &mut PageContent,
        layout: LayoutName,
        index: Option<usize>,
        ids: &mut IdGenerator,
    ) -> Step {
        let section = create_section(layout, ids);
        let index = index.unwrap_or(doc.sections.len()).min(doc.sections.len());
        doc.sections.insert(index, section);
        Ok(())
    }

    fn apply_remove_section(doc: &mut PageContent, section_id: &str) -> Step {
        let index = section_index(doc, section_id)?;
        doc.sections.remove(index);
        Ok(())
    }

    fn apply_duplicate_section(doc: &mut PageContent, section_id: &str, ids: &mut IdGenerator) -> Step {
        let index = section_index(doc, section_id)?;
        let copy = doc.sections[index].duplicate(ids);
        doc.sections.insert(index + 1, copy);
        Ok(())
    }

    fn apply_shift_section(doc: &mut PageContent, section_id: &str, delta: isize) -> Step {
        let index = section_index(doc, section_id)?;
        let target = neighbor(index, delta, doc.sections.len()).ok_or(NoopReason::AtBoundary)?;
        doc.sections.swap(index, target);
        Ok(())
    }

    pub(crate) fn apply_reorder_section(doc: &mut PageContent, section_id: &str, to_index: usize) -> Step {
        let from = section_index(doc, section_id)?;
        array_move(&mut doc.sections, from, to_index)
    }

    fn apply_update_layout(
        doc: &mut PageContent,
        section_id: &str,
        layout: LayoutName,
        ids: &mut IdGenerator,
    ) -> Step {
        let section = doc
            .find_section_mut(section_id)
            .ok_or_else(|| NoopReason::SectionNotFound(section_id.to_string()))?;

        if section.layout == layout {
            return Err(NoopReason::Unchanged);
        }

        let columns = std::mem::take(&mut section.columns);
        section.columns = redistribute_columns(columns, layout, ids);
        section.layout = layout;
        Ok(())
    }

    fn apply_add_block(
        doc: &mut PageContent,
        section_id: &str,
        column_id: &str,
        kind: BlockKind,
        ids: &mut IdGenerator,
    ) -> Step {
        let column = column_mut(doc, section_id, column_id)?;
        column.blocks.push(create_block(kind, ids));
        Ok(())
    }

    fn apply_remove_block(doc: &mut PageContent, section_id: &str, column_id: &str, block_id: &str) -> Step {
        let column = column_mut(doc, section_id, column_id)?;
        let index = column
            .block_index(block_id)
            .ok_or_else(|| NoopReason::BlockNotFound(block_id.to_string()))?;
        column.blocks.remove(index);
        Ok(())
    }

    fn apply_update_block(
        doc: &mut PageContent,
        section_id: &str,
        column_id: &str,
        block_id: &str,
        patch: &BlockPatch,
    ) -> Step {
        let block = column_mut(doc, section_id, column_id)?
            .find_block_mut(block_id)
            .ok_or_else(|| NoopReason::BlockNotFound(block_id.to_string()))?;

        if block.apply_patch(patch) {
            Ok(())
        } else {
            Err(NoopReason::PatchDoesNotFit(block.kind()))
        }
    }

    fn apply_shift_block(
        doc: &mut PageContent,
        section_id: &str,
        column_id: &str,
        block_id: &str,
        delta: isize,
    ) -> Step {
        let column = column_mut(doc, section_id, column_id)?;
        let index = column
            .block_index(block_id)
            .ok_or_else(|| NoopReason::BlockNotFound(block_id.to_string()))?;
        let target = neighbor(index, delta, column.blocks.len()).ok_or(NoopReason::AtBoundary)?;
        column.blocks.swap(index, target);
        Ok(())
    }

    pub(crate) fn apply_reorder_block(
        doc: &mut PageContent,
        section_id: &str,
        column_id: &str,
        block_id: &str,
        to_index: usize,
    ) -> Step {
        let column = column_mut(doc, section_id, column_id)?;
        let from = column
            .block_index(block_id)
            .ok_or_else(|| NoopReason::BlockNotFound(block_id.to_string()))?;
        array_move(&mut column.blocks, from, to_index)
    }

    pub(crate) fn apply_transfer_block(
        doc: &mut PageContent,
        block_id: &str,
        from: &ColumnPath,
        to: &ColumnPath,
        before_block_id: Option<&str>,
    ) -> Step {
        if from == to {
            return Err(NoopReason::Unchanged);
        }

        // Resolve both ends before touching anything so a bad address
        // cannot drop the block.
        let source_index = column_ref(doc, &from.section_id, &from.column_id)?
            .block_index(block_id)
            .ok_or_else(|| NoopReason::BlockNotFound(block_id.to_string()))?;
        let destination = column_ref(doc, &to.section_id, &to.column_id)?;
        let insert_at = before_block_id
            .and_then(|before| destination.block_index(before))
            .unwrap_or(destination.blocks.len());

        let block = column_mut(doc, &from.section_id, &from.column_id)?
            .blocks
            .remove(source_index);
        column_mut(doc, &to.section_id, &to.column_id)?
            .blocks
            .insert(insert_at, block);
        Ok(())
    }
}

fn section_index(doc: &PageContent, section_id: &str) -> Result<usize, NoopReason> {
    doc.section_index(section_id)
        .ok_or_else(|| NoopReason::SectionNotFound(section_id.to_string()))
}

fn column_ref<'a>(
    doc: &'a PageContent,
    section_id: &str,
    column_id: &str,
) -> Result<&'a folio_document::Column, NoopReason> {
    doc.find_section(section_id)
        .ok_or_else(|| NoopReason::SectionNotFound(section_id.to_string()))?
        .find_column(column_id)
        .ok_or_else(|| NoopReason::ColumnNotFound(column_id.to_string()))
}

fn column_mut<'a>(
    doc: &'a mut PageContent,
    section_id: &str,
    column_id: &str,
) -> Result<&'a mut folio_document::Column, NoopReason> {
    doc.find_section_mut(section_id)
        .ok_or_else(|| NoopReason::SectionNotFound(section_id.to_string()))?
        .find_column_mut(column_id)
        .ok_or_else(|| NoopReason::ColumnNotFound(column_id.to_string()))
}

fn neighbor(index: usize, delta: isize, len: usize) -> Option<usize> {
    index.checked_add_signed(delta).filter(|target| *target < len)
}

/// Remove the item at `from` and reinsert it at `to` (clamped)
pub(crate) fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> Step {
    let to = to.min(items.len().saturating_sub(1));
    if from == to {
        return Err(NoopReason::Unchanged);
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_document::{create_empty_page_content, ContentBlock};

    fn setup() -> (PageContent, IdGenerator) {
        let mut ids = IdGenerator::from_seed("mut");
        let page = create_empty_page_content(&mut ids);
        (page, ids)
    }

    fn block_ids(doc: &PageContent, section: usize, column: usize) -> Vec<String> {
        doc.sections[section].columns[column]
            .blocks
            .iter()
            .map(|b| b.id().to_string())
            .collect()
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::UpdateSectionLayout {
            section_id: "s-1".to_string(),
            layout: LayoutName::Halves,
        };

        let json = serde_json::to_value(&mutation).unwrap();
        assert_eq!(json["op"], "updateSectionLayout");
        assert_eq!(json["sectionId"], "s-1");
        assert_eq!(json["layout"], "50-50");

        let back: Mutation = serde_json::from_value(json).unwrap();
        assert_eq!(back, mutation);
    }

    #[test]
    fn test_add_section_at_index_and_end() {
        let (mut doc, mut ids) = setup();
        let first = doc.sections[0].id.clone();

        Mutation::AddSection { layout: LayoutName::Thirds, index: Some(0) }.apply(&mut doc, &mut ids);
        Mutation::AddSection { layout: LayoutName::Halves, index: None }.apply(&mut doc, &mut ids);
        Mutation::AddSection { layout: LayoutName::Full, index: Some(99) }.apply(&mut doc, &mut ids);

        let layouts: Vec<LayoutName> = doc.sections.iter().map(|s| s.layout).collect();
        assert_eq!(
            layouts,
            vec![LayoutName::Thirds, LayoutName::Full, LayoutName::Halves, LayoutName::Full]
        );
        assert_eq!(doc.sections[1].id, first);
    }

    #[test]
    fn test_remove_last_section_leaves_empty_page() {
        let (mut doc, mut ids) = setup();
        let id = doc.sections[0].id.clone();

        let outcome = Mutation::RemoveSection { section_id: id }.apply(&mut doc, &mut ids);

        assert!(outcome.is_applied());
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let (mut doc, mut ids) = setup();
        let section_id = doc.sections[0].id.clone();
        let before = doc.clone();

        let mutations = vec![
            Mutation::RemoveSection { section_id: "missing".to_string() },
            Mutation::DuplicateSection { section_id: "missing".to_string() },
            Mutation::AddBlock {
                section_id: section_id.clone(),
                column_id: "missing".to_string(),
                kind: BlockKind::Text,
            },
            Mutation::RemoveBlock {
                section_id: section_id.clone(),
                column_id: doc.sections[0].columns[0].id.clone(),
                block_id: "missing".to_string(),
            },
            Mutation::UpdateSectionLayout {
                section_id: "missing".to_string(),
                layout: LayoutName::Halves,
            },
        ];

        for mutation in mutations {
            let outcome = mutation.apply(&mut doc, &mut ids);
            assert!(matches!(outcome, MutationOutcome::Noop(_)), "{} applied", mutation.name());
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn test_move_section_boundaries() {
        let (mut doc, mut ids) = setup();
        Mutation::AddSection { layout: LayoutName::Halves, index: None }.apply(&mut doc, &mut ids);
        let first = doc.sections[0].id.clone();
        let last = doc.sections[1].id.clone();
        let before = doc.clone();

        let up = Mutation::MoveSectionUp { section_id: first.clone() }.apply(&mut doc, &mut ids);
        let down = Mutation::MoveSectionDown { section_id: last.clone() }.apply(&mut doc, &mut ids);
        assert_eq!(up, MutationOutcome::Noop(NoopReason::AtBoundary));
        assert_eq!(down, MutationOutcome::Noop(NoopReason::AtBoundary));
        assert_eq!(doc, before);

        Mutation::MoveSectionDown { section_id: first.clone() }.apply(&mut doc, &mut ids);
        assert_eq!(doc.sections[0].id, last);
        assert_eq!(doc.sections[1].id, first);
    }

    #[test]
    fn test_block_moves_and_boundaries() {
        let (mut doc, mut ids) = setup();
        let section_id = doc.sections[0].id.clone();
        let column_id = doc.sections[0].columns[0].id.clone();
        for kind in [BlockKind::Text, BlockKind::Image, BlockKind::Spacer] {
            Mutation::AddBlock {
                section_id: section_id.clone(),
                column_id: column_id.clone(),
                kind,
            }
            .apply(&mut doc, &mut ids);
        }
        let original = block_ids(&doc, 0, 0);

        let up_first = Mutation::MoveBlockUp {
            section_id: section_id.clone(),
            column_id: column_id.clone(),
            block_id: original[0].clone(),
        }
        .apply(&mut doc, &mut ids);
        assert_eq!(up_first, MutationOutcome::Noop(NoopReason::AtBoundary));

        Mutation::MoveBlockDown {
            section_id: section_id.clone(),
            column_id: column_id.clone(),
            block_id: original[0].clone(),
        }
        .apply(&mut doc, &mut ids);
        assert_eq!(
            block_ids(&doc, 0, 0),
            vec![original[1].clone(), original[0].clone(), original[2].clone()]
        );
    }

    #[test]
    fn test_update_block_merges_fields() {
        let (mut doc, mut ids) = setup();
        let section_id = doc.sections[0].id.clone();
        let column_id = doc.sections[0].columns[0].id.clone();
        Mutation::AddBlock {
            section_id: section_id.clone(),
            column_id: column_id.clone(),
            kind: BlockKind::Text,
        }
        .apply(&mut doc, &mut ids);
        let block_id = block_ids(&doc, 0, 0)[0].clone();

        let outcome = Mutation::UpdateBlock {
            section_id: section_id.clone(),
            column_id: column_id.clone(),
            block_id: block_id.clone(),
            patch: BlockPatch::html("<p>Hello</p>"),
        }
        .apply(&mut doc, &mut ids);

        assert!(outcome.is_applied());
        assert_eq!(
            doc.find_block(&section_id, &column_id, &block_id).and_then(ContentBlock::content_html),
            Some("<p>Hello</p>")
        );

        let mismatch = Mutation::UpdateBlock {
            section_id,
            column_id,
            block_id,
            patch: BlockPatch::Spacer { height: 10 },
        }
        .apply(&mut doc, &mut ids);
        assert_eq!(mismatch, MutationOutcome::Noop(NoopReason::PatchDoesNotFit(BlockKind::Text)));
    }

    #[test]
    fn test_transfer_inserts_before_sibling() {
        let (mut doc, mut ids) = setup();
        let section_id = doc.sections[0].id.clone();
        Mutation::UpdateSectionLayout {
            section_id: section_id.clone(),
            layout: LayoutName::Halves,
        }
        .apply(&mut doc, &mut ids);
        let left = doc.sections[0].columns[0].id.clone();
        let right = doc.sections[0].columns[1].id.clone();

        for column_id in [&left, &right, &right] {
            Mutation::AddBlock {
                section_id: section_id.clone(),
                column_id: column_id.clone(),
                kind: BlockKind::Text,
            }
            .apply(&mut doc, &mut ids);
        }
        let moving = block_ids(&doc, 0, 0)[0].clone();
        let right_blocks = block_ids(&doc, 0, 1);

        let outcome = Mutation::TransferBlock {
            block_id: moving.clone(),
            from: ColumnPath::new(&section_id, &left),
            to: ColumnPath::new(&section_id, &right),
            before_block_id: Some(right_blocks[1].clone()),
        }
        .apply(&mut doc, &mut ids);

        assert!(outcome.is_applied());
        assert!(block_ids(&doc, 0, 0).is_empty());
        assert_eq!(
            block_ids(&doc, 0, 1),
            vec![right_blocks[0].clone(), moving, right_blocks[1].clone()]
        );
    }

    #[test]
    fn test_transfer_with_bad_destination_keeps_block() {
        let (mut doc, mut ids) = setup();
        let section_id = doc.sections[0].id.clone();
        let column_id = doc.sections[0].columns[0].id.clone();
        Mutation::AddBlock {
            section_id: section_id.clone(),
            column_id: column_id.clone(),
            kind: BlockKind::Code,
        }
        .apply(&mut doc, &mut ids);
        let before = doc.clone();

        let outcome = Mutation::TransferBlock {
            block_id: block_ids(&doc, 0, 0)[0].clone(),
            from: ColumnPath::new(&section_id, &column_id),
            to: ColumnPath::new(&section_id, "gone"),
            before_block_id: None,
        }
        .apply(&mut doc, &mut ids);

        assert_eq!(outcome, MutationOutcome::Noop(NoopReason::ColumnNotFound("gone".to_string())));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_applied_to_leaves_original() {
        let (doc, mut ids) = setup();
        let (next, outcome) =
            Mutation::AddSection { layout: LayoutName::Quarters, index: None }.applied_to(&doc, &mut ids);

        assert!(outcome.is_applied());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(next.sections.len(), 2);
        assert_eq!(next.sections[0], doc.sections[0]);
    }

    #[test]
    fn test_array_move() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        array_move(&mut items, 0, 2).unwrap();
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        array_move(&mut items, 3, 0).unwrap();
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
        assert_eq!(array_move(&mut items, 1, 1), Err(NoopReason::Unchanged));
    }
}
