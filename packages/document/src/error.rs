//! Error types for the document model

use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Structural errors.
///
/// Missing ids are not errors; mutations treat them as no-ops. These cover
/// closed-enum misuse at parse boundaries and layout invariants broken by
/// data that did not come from the factories.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Unknown layout: {0}")]
    UnknownLayout(String),

    #[error("Unknown block type: {0}")]
    UnknownBlockKind(String),

    #[error("Section {section_id} has {found} columns, layout {layout} needs {expected}")]
    ColumnCount {
        section_id: String,
        layout: String,
        expected: usize,
        found: usize,
    },

    #[error("Column {column_id} in section {section_id} is {found}% wide, layout needs {expected}%")]
    ColumnWidth {
        section_id: String,
        column_id: String,
        expected: f64,
        found: f64,
    },

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(u32),
}
