//! # Drag and Drop
//!
//! Pointer driven reordering of sections and blocks.
//!
//! ```text
//! Idle ──pointer_down──▶ Pressed ──pointer_move past threshold──▶ Dragging
//!  ▲                        │                                        │
//!  └──────── drop (click) ──┘◀──────────── drop / cancel ────────────┘
//! ```
//!
//! Starting a drag records one undo snapshot, so a whole gesture undoes as a
//! single step. Blocks hovered over another column are transferred right
//! away; the drop then places the block in the column it was released over.
//! Cancelling restores the page as it was when the drag started.

use crate::mutations::{array_move, ColumnPath, Mutation};
use crate::undo_stack::UndoStack;
use folio_document::PageContent;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DragItem {
    Section { section_id: String },
    Block { block_id: String, column: ColumnPath },
}

/// What the pointer is over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DropTarget {
    Section { section_id: String },
    Block { block_id: String, column: ColumnPath },
    /// A column container, including an empty one
    Column { column: ColumnPath },
}

impl DropTarget {
    fn column(&self) -> Option<&ColumnPath> {
        match self {
            DropTarget::Section { .. } => None,
            DropTarget::Block { column, .. } | DropTarget::Column { column } => Some(column),
        }
    }
}

/// Sections only land on sections; blocks only on blocks and columns
pub fn accepts(item: &DragItem, target: &DropTarget) -> bool {
    matches!(
        (item, target),
        (DragItem::Section { .. }, DropTarget::Section { .. })
            | (DragItem::Block { .. }, DropTarget::Block { .. })
            | (DragItem::Block { .. }, DropTarget::Column { .. })
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    pub item: DragItem,

    /// Column the block was picked up from
    pub origin_column: Option<ColumnPath>,

    /// Column the block lives in now, after any drag-over transfers
    pub current_column: Option<ColumnPath>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Pressed { item: DragItem, origin: Point },
    Dragging(ActiveDrag),
}

/// How a drag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEnd {
    /// The page changed; one undo step covers the gesture
    Moved,
    /// Nothing changed and no undo step was left behind
    Unchanged,
    /// The page was restored to its state at drag start
    Reverted,
    /// The pointer never passed the threshold
    Click,
}

#[derive(Debug)]
pub struct DragController {
    state: DragState,
    activation_distance: f64,
}

impl DragController {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn pointer_down(&mut self, item: DragItem, at: Point) {
        if matches!(self.state, DragState::Idle) {
            self.state = DragState::Pressed { item, origin: at };
        }
    }

    /// Returns true when this move started the drag
    pub fn pointer_move(&mut self, at: Point, doc: &PageContent, history: &mut UndoStack) -> bool {
        let DragState::Pressed { item, origin } = &self.state else {
            return false;
        };
        if origin.distance_to(&at) < self.activation_distance {
            return false;
        }

        let item = item.clone();
        self.state = DragState::Idle;
        self.start(item, doc, history)
    }

    /// Start a drag directly, for hosts that do their own activation.
    ///
    /// Refuses items that are not in the page.
    pub fn start(&mut self, item: DragItem, doc: &PageContent, history: &mut UndoStack) -> bool {
        if self.is_dragging() {
            return false;
        }

        let exists = match &item {
            DragItem::Section { section_id } => doc.find_section(section_id).is_some(),
            DragItem::Block { block_id, column } => doc
                .find_block(&column.section_id, &column.column_id, block_id)
                .is_some(),
        };
        if !exists {
            debug!(?item, "Drag source not in page");
            self.state = DragState::Idle;
            return false;
        }

        history.record(doc.clone(), "drag");

        let column = match &item {
            DragItem::Block { column, .. } => Some(column.clone()),
            DragItem::Section { .. } => None,
        };
        debug!(?item, "Drag started");
        self.state = DragState::Dragging(ActiveDrag {
            item,
            origin_column: column.clone(),
            current_column: column,
        });
        true
    }

    /// Hovering a target. Blocks over a different column move there now.
    pub fn drag_over(&mut self, target: &DropTarget, doc: &mut PageContent) {
        let DragState::Dragging(active) = &mut self.state else {
            return;
        };
        if !accepts(&active.item, target) {
            return;
        }
        let (DragItem::Block { block_id, .. }, Some(current), Some(destination)) =
            (&active.item, &active.current_column, target.column())
        else {
            return;
        };
        if current == destination {
            return;
        }

        let before = match target {
            DropTarget::Block { block_id: hovered, .. } if hovered != block_id => Some(hovered.as_str()),
            _ => None,
        };

        match Mutation::apply_transfer_block(doc, block_id, current, destination, before) {
            Ok(()) => {
                debug!(
                    block_id = %block_id,
                    to_column = %destination.column_id,
                    "Transferred block during drag"
                );
                active.current_column = Some(destination.clone());
            }
            Err(reason) => debug!(%reason, "Drag-over transfer skipped"),
        }
    }

    /// Release the pointer. `None` means released outside any target.
    pub fn drop(
        &mut self,
        target: Option<&DropTarget>,
        doc: &mut PageContent,
        history: &mut UndoStack,
    ) -> DragEnd {
        let active = match std::mem::take(&mut self.state) {
            DragState::Dragging(active) => active,
            DragState::Pressed { .. } | DragState::Idle => return DragEnd::Click,
        };

        let target = match target {
            Some(target) if accepts(&active.item, target) => target,
            _ => return Self::revert(doc, history),
        };

        Self::finish_reorder(&active, target, doc);

        if history.peek_undo() == Some(&*doc) {
            history.discard_last();
            debug!("Drag ended without changes");
            DragEnd::Unchanged
        } else {
            debug!("Drag ended");
            DragEnd::Moved
        }
    }

    /// Abort the active drag, restoring the page from its start snapshot
    pub fn cancel(&mut self, doc: &mut PageContent, history: &mut UndoStack) -> Option<DragEnd> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(_) => Some(Self::revert(doc, history)),
            DragState::Pressed { .. } => Some(DragEnd::Click),
            DragState::Idle => None,
        }
    }

    fn revert(doc: &mut PageContent, history: &mut UndoStack) -> DragEnd {
        if let Some(snapshot) = history.discard_last() {
            *doc = snapshot.page;
        }
        debug!("Drag cancelled");
        DragEnd::Reverted
    }

    fn finish_reorder(active: &ActiveDrag, target: &DropTarget, doc: &mut PageContent) {
        match (&active.item, target) {
            (DragItem::Section { section_id }, DropTarget::Section { section_id: over }) => {
                if section_id == over {
                    return;
                }
                if let Some(to_index) = doc.section_index(over) {
                    let _ = Mutation::apply_reorder_section(doc, section_id, to_index);
                }
            }
            (DragItem::Block { block_id, .. }, _) => {
                let (Some(current), Some(destination)) = (&active.current_column, target.column()) else {
                    return;
                };
                let hovered = match target {
                    DropTarget::Block { block_id: over, .. } if over == block_id => return,
                    DropTarget::Block { block_id: over, .. } => Some(over.as_str()),
                    _ => None,
                };

                // Released over a column it was never hovered into
                if current != destination {
                    let _ = Mutation::apply_transfer_block(doc, block_id, current, destination, hovered);
                    return;
                }

                let Some(live) = doc.find_column_mut(&current.section_id, &current.column_id) else {
                    return;
                };
                let Some(from) = live.block_index(block_id) else {
                    return;
                };
                let transferred = active.current_column != active.origin_column;
                let to = match hovered.map(|over| live.block_index(over)) {
                    // A transferred block lands before the sibling it is dropped on
                    Some(Some(index)) if transferred && index > from => index - 1,
                    Some(Some(index)) => index,
                    Some(None) => return,
                    None => live.blocks.len() - 1,
                };
                let _ = array_move(&mut live.blocks, from, to);
            }
            _ => {}
        }
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_DRAG_ACTIVATION_DISTANCE)
    }
}
