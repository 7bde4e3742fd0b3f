//! # Page Stores
//!
//! The persistence collaborator. A store mirrors the editing session's
//! page; it never owns it, and a failed save leaves the session untouched.
//!
//! Stored pages are either a [`PageContent`] document or, for pages that
//! predate the block editor, a legacy HTML string that the session migrates
//! on open.

use crate::errors::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_document::PageContent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tracing::{debug, info};

/// What a store holds for a slug
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedPage {
    Document(PageContent),
    LegacyHtml(String),
    Empty,
}

#[async_trait]
pub trait PageStore: Send + Sync {
    async fn save(&self, slug: &str, page: &PageContent) -> StoreResult<()>;

    async fn load(&self, slug: &str) -> StoreResult<LoadedPage>;
}

/// Body of a stored page record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordContent {
    Document(PageContent),
    LegacyHtml(String),
}

/// On-disk envelope for a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
    pub content: RecordContent,
}

impl From<RecordContent> for LoadedPage {
    fn from(content: RecordContent) -> Self {
        match content {
            RecordContent::Document(page) => LoadedPage::Document(page),
            RecordContent::LegacyHtml(html) => LoadedPage::LegacyHtml(html),
        }
    }
}

/// Slugs become file names, so keep them to a safe alphabet
pub fn validate_slug(slug: &str) -> StoreResult<()> {
    let valid = !slug.is_empty()
        && !slug.starts_with('.')
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidSlug(slug.to_string()))
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: RwLock<HashMap<String, RecordContent>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_legacy_html(self, slug: impl Into<String>, html: impl Into<String>) -> Self {
        self.insert(slug, RecordContent::LegacyHtml(html.into()));
        self
    }

    pub fn with_document(self, slug: impl Into<String>, page: PageContent) -> Self {
        self.insert(slug, RecordContent::Document(page));
        self
    }

    /// Make every following save fail until switched off again
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// The stored document for a slug, if it holds one
    pub fn document(&self, slug: &str) -> Option<PageContent> {
        let pages = self.pages.read().ok()?;
        match pages.get(slug)? {
            RecordContent::Document(page) => Some(page.clone()),
            RecordContent::LegacyHtml(_) => None,
        }
    }

    fn insert(&self, slug: impl Into<String>, content: RecordContent) {
        if let Ok(mut pages) = self.pages.write() {
            pages.insert(slug.into(), content);
        }
    }
}

#[async_trait]
impl PageStore for MemoryStore {
    async fn save(&self, slug: &str, page: &PageContent) -> StoreResult<()> {
        validate_slug(slug)?;
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is set to fail".to_string()));
        }

        let mut pages = self
            .pages
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        pages.insert(slug.to_string(), RecordContent::Document(page.clone()));
        Ok(())
    }

    async fn load(&self, slug: &str) -> StoreResult<LoadedPage> {
        validate_slug(slug)?;
        let pages = self
            .pages
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        Ok(pages
            .get(slug)
            .cloned()
            .map(LoadedPage::from)
            .unwrap_or(LoadedPage::Empty))
    }
}

/// Directory of `{slug}.json` records and bare `{slug}.html` legacy pages
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slug))
    }

    pub fn legacy_path(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.html", slug))
    }

    /// Store a legacy HTML page inside a record
    pub async fn save_legacy_html(&self, slug: &str, html: &str) -> StoreResult<()> {
        validate_slug(slug)?;
        self.write_record(slug, RecordContent::LegacyHtml(html.to_string()))
            .await
    }

    /// Slugs of every stored page, sorted
    pub async fn list(&self) -> StoreResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut slugs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            let path = entry.path();
            let is_page = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("json") | Some("html")
            );
            if let (true, Some(stem)) = (is_page, path.file_stem().and_then(|s| s.to_str())) {
                slugs.push(stem.to_string());
            }
        }
        slugs.sort();
        slugs.dedup();
        Ok(slugs)
    }

    async fn write_record(&self, slug: &str, content: RecordContent) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;

        let record = PageRecord {
            slug: slug.to_string(),
            updated_at: Utc::now(),
            content,
        };
        let json = serde_json::to_string_pretty(&record).map_err(|source| StoreError::Json {
            slug: slug.to_string(),
            source,
        })?;

        let path = self.record_path(slug);
        let tmp = self.dir.join(format!(".{}.json.tmp", slug));
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        debug!(path = %path.display(), "Wrote page record");
        Ok(())
    }

    async fn read_optional(path: &Path) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

#[async_trait]
impl PageStore for FileStore {
    async fn save(&self, slug: &str, page: &PageContent) -> StoreResult<()> {
        validate_slug(slug)?;
        self.write_record(slug, RecordContent::Document(page.clone()))
            .await?;
        info!(slug, sections = page.sections.len(), "Saved page");
        Ok(())
    }

    async fn load(&self, slug: &str) -> StoreResult<LoadedPage> {
        validate_slug(slug)?;

        if let Some(json) = Self::read_optional(&self.record_path(slug)).await? {
            let record: PageRecord =
                serde_json::from_str(&json).map_err(|source| StoreError::Json {
                    slug: slug.to_string(),
                    source,
                })?;
            return Ok(record.content.into());
        }

        if let Some(html) = Self::read_optional(&self.legacy_path(slug)).await? {
            debug!(slug, "Found legacy HTML page");
            return Ok(LoadedPage::LegacyHtml(html));
        }

        Ok(LoadedPage::Empty)
    }
}
