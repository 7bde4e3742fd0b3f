//! # Folio Migrate
//!
//! Imports pages written before the block model existed.
//!
//! ```text
//! legacy HTML ──tokenize──▶ tokens ──parse──▶ fragment tree ──migrate──▶ PageContent
//! ```

pub mod error;
pub mod migrate;
pub mod parser;
pub mod tokenizer;

pub use error::{MigrateError, MigrateResult};
pub use migrate::migrate_html_to_blocks;
pub use parser::{decode_entities, parse_fragment, Element, Fragment, Node};
pub use tokenizer::{tokenize, Token};
