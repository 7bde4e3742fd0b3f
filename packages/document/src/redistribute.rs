//! # Column Redistribution
//!
//! Runs when a section's layout changes in place.
//!
//! - Growing (or same count): existing columns keep their id and blocks and
//!   take the new widths; extra columns are created empty.
//! - Shrinking: the first `n` columns survive; blocks from every dropped
//!   column are appended, in order, to the last surviving column.
//!
//! A layout change never discards a block.

use crate::id_generator::IdGenerator;
use crate::layout::LayoutName;
use crate::section::{create_column, Column};
use tracing::debug;

pub fn redistribute_columns(
    existing: Vec<Column>,
    layout: LayoutName,
    ids: &mut IdGenerator,
) -> Vec<Column> {
    let widths = layout.widths();
    let new_count = widths.len();
    let existing_count = existing.len();

    if new_count >= existing_count {
        let mut columns: Vec<Column> = existing
            .into_iter()
            .zip(widths)
            .map(|(column, width)| Column {
                width_percent: *width,
                ..column
            })
            .collect();

        for width in &widths[existing_count..] {
            columns.push(create_column(*width, Vec::new(), ids));
        }

        debug!(from = existing_count, to = new_count, "Grew section columns");
        return columns;
    }

    let mut kept = existing;
    let overflow = kept.split_off(new_count);
    let folded: usize = overflow.iter().map(|c| c.blocks.len()).sum();

    for (column, width) in kept.iter_mut().zip(widths) {
        column.width_percent = *width;
    }

    if let Some(last) = kept.last_mut() {
        for column in overflow {
            last.blocks.extend(column.blocks);
        }
    }

    debug!(from = existing_count, to = new_count, folded, "Folded section columns");
    kept
}
