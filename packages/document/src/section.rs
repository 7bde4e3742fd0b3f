//! # Sections, Columns and Pages
//!
//! A page is an ordered list of sections; a section is a row split into
//! columns by its layout; a column holds an ordered list of blocks.
//!
//! All nodes are plain values. Editing code clones the page to keep an
//! undo snapshot, then edits its own copy.

use crate::block::{BlockKind, ContentBlock};
use crate::error::{DocumentError, DocumentResult};
use crate::id_generator::IdGenerator;
use crate::layout::LayoutName;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Schema tag written into every stored page
pub const CURRENT_VERSION: u32 = 1;

const WIDTH_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub width_percent: f64,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

impl Column {
    pub fn block_index(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == block_id)
    }

    pub fn find_block(&self, block_id: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.id() == block_id)
    }

    pub fn find_block_mut(&mut self, block_id: &str) -> Option<&mut ContentBlock> {
        self.blocks.iter_mut().find(|b| b.id() == block_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub layout: LayoutName,
    pub columns: Vec<Column>,
}

impl Section {
    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    pub fn find_column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn find_column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    /// Column currently holding the block
    pub fn column_of_block(&self, block_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.block_index(block_id).is_some())
    }

    pub fn block_count(&self) -> usize {
        self.columns.iter().map(|c| c.blocks.len()).sum()
    }

    /// Deep copy with new ids for the section, every column and every block.
    pub fn duplicate(&self, ids: &mut IdGenerator) -> Section {
        Section {
            id: ids.new_id(),
            layout: self.layout,
            columns: self
                .columns
                .iter()
                .map(|column| Column {
                    id: ids.new_id(),
                    width_percent: column.width_percent,
                    blocks: column.blocks.iter().map(|b| b.with_fresh_id(ids)).collect(),
                })
                .collect(),
        }
    }

    /// Check column count and widths against the layout table
    pub fn validate(&self) -> DocumentResult<()> {
        let widths = self.layout.widths();

        if widths.len() != self.columns.len() {
            return Err(DocumentError::ColumnCount {
                section_id: self.id.clone(),
                layout: self.layout.to_string(),
                expected: widths.len(),
                found: self.columns.len(),
            });
        }

        for (column, expected) in self.columns.iter().zip(widths) {
            if (column.width_percent - expected).abs() > WIDTH_TOLERANCE {
                return Err(DocumentError::ColumnWidth {
                    section_id: self.id.clone(),
                    column_id: column.id.clone(),
                    expected: *expected,
                    found: column.width_percent,
                });
            }
        }

        Ok(())
    }
}

/// A whole page: the unit of persistence and of undo snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub version: u32,
    pub sections: Vec<Section>,
}

impl PageContent {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            version: CURRENT_VERSION,
            sections,
        }
    }

    pub fn section_index(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }

    pub fn find_section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn find_section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    pub fn find_column(&self, section_id: &str, column_id: &str) -> Option<&Column> {
        self.find_section(section_id)?.find_column(column_id)
    }

    pub fn find_column_mut(&mut self, section_id: &str, column_id: &str) -> Option<&mut Column> {
        self.find_section_mut(section_id)?.find_column_mut(column_id)
    }

    pub fn find_block(&self, section_id: &str, column_id: &str, block_id: &str) -> Option<&ContentBlock> {
        self.find_column(section_id, column_id)?.find_block(block_id)
    }

    /// Every block in document order
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.sections
            .iter()
            .flat_map(|s| s.columns.iter())
            .flat_map(|c| c.blocks.iter())
    }

    pub fn count_blocks(&self, kind: BlockKind) -> usize {
        self.blocks().filter(|b| b.kind() == kind).count()
    }

    /// Check the layout invariant for every section and that ids are unique
    pub fn validate(&self) -> DocumentResult<()> {
        if self.version > CURRENT_VERSION {
            return Err(DocumentError::UnsupportedVersion(self.version));
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            section.validate()?;

            let ids = std::iter::once(section.id.as_str())
                .chain(section.columns.iter().map(|c| c.id.as_str()))
                .chain(section.columns.iter().flat_map(|c| c.blocks.iter().map(|b| b.id())));

            for id in ids {
                if !seen.insert(id) {
                    return Err(DocumentError::DuplicateId(id.to_string()));
                }
            }
        }

        Ok(())
    }
}

pub fn create_column(width_percent: f64, blocks: Vec<ContentBlock>, ids: &mut IdGenerator) -> Column {
    Column {
        id: ids.new_id(),
        width_percent,
        blocks,
    }
}

/// New section with one empty column per layout width
pub fn create_section(layout: LayoutName, ids: &mut IdGenerator) -> Section {
    Section {
        id: ids.new_id(),
        layout,
        columns: layout
            .widths()
            .iter()
            .map(|width| create_column(*width, Vec::new(), ids))
            .collect(),
    }
}

/// Section holding a single block in a full-width column
pub fn create_single_block_section(block: ContentBlock, ids: &mut IdGenerator) -> Section {
    let mut section = create_section(LayoutName::Full, ids);
    section.columns[0].blocks.push(block);
    section
}

/// Starting state for a brand new page
pub fn create_empty_page_content(ids: &mut IdGenerator) -> PageContent {
    PageContent::new(vec![create_section(LayoutName::Full, ids)])
}

pub fn clone_section(section: &Section, ids: &mut IdGenerator) -> Section {
    section.duplicate(ids)
}
