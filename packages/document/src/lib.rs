//! # Folio Document
//!
//! Page-builder document model.
//!
//! ```text
//! PageContent
//!  └─ Section (layout: "50-50", "33-33-33", ...)
//!      └─ Column (widthPercent from the layout table)
//!          └─ ContentBlock (text | image | video | spacer | table | code)
//! ```
//!
//! Every node has a string id from the session's [`IdGenerator`]. The layout
//! table in [`layout`] is the single source of truth for how many columns a
//! section has and how wide they are.

pub mod block;
pub mod error;
pub mod id_generator;
pub mod layout;
pub mod redistribute;
pub mod section;

pub use block::{
    create_block, BlockKind, BlockPatch, ContentBlock, Emphasis, HtmlBlock, ImageBlock, ImagePatch,
    ImageSize, MediaAsset, SpacerBlock, VideoBlock, VideoPatch,
};
pub use error::{DocumentError, DocumentResult};
pub use id_generator::IdGenerator;
pub use layout::{get_column_count, get_column_widths, LayoutName};
pub use redistribute::redistribute_columns;
pub use section::{
    clone_section, create_column, create_empty_page_content, create_section,
    create_single_block_section, Column, PageContent, Section, CURRENT_VERSION,
};
