//! # Content Blocks
//!
//! Tagged union over the block variants plus their factories and the
//! shallow patches used for in-place edits. Each variant carries only its
//! own fields, so a spacer can never hold a `src`.

use crate::error::DocumentError;
use crate::id_generator::IdGenerator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TEXT_HTML: &str = "<p></p>";
pub const DEFAULT_TABLE_HTML: &str = "<table><tbody><tr><td><p></p></td><td><p></p></td></tr><tr><td><p></p></td><td><p></p></td></tr></tbody></table>";
pub const DEFAULT_CODE_HTML: &str = "<pre><code></code></pre>";
pub const DEFAULT_SPACER_HEIGHT: u32 = 48;
pub const MIN_SPACER_HEIGHT: u32 = 8;
pub const MAX_SPACER_HEIGHT: u32 = 512;

/// Block discriminant, used when asking for a new block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Image,
    Video,
    Spacer,
    Table,
    Code,
}

impl BlockKind {
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Video,
        BlockKind::Spacer,
        BlockKind::Table,
        BlockKind::Code,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::Spacer => "spacer",
            BlockKind::Table => "table",
            BlockKind::Code => "code",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DocumentError::UnknownBlockKind(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Xl,
    #[default]
    L,
    M,
    S,
}

/// Shared scale for image corner rounding and drop shadow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    #[default]
    None,
    Sm,
    Md,
    Lg,
}

/// Rich text, table and code blocks all store editor-owned HTML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlBlock {
    pub id: String,
    pub content_html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub id: String,
    pub src: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub size: ImageSize,
    #[serde(default)]
    pub rounded: Emphasis,
    #[serde(default)]
    pub shadow: Emphasis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoBlock {
    pub id: String,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub muted: bool,
    pub controls: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacerBlock {
    pub id: String,
    pub height: u32,
}

/// Smallest unit of page content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text(HtmlBlock),
    Image(ImageBlock),
    Video(VideoBlock),
    Spacer(SpacerBlock),
    Table(HtmlBlock),
    Code(HtmlBlock),
}

impl ContentBlock {
    pub fn text(ids: &mut IdGenerator) -> Self {
        Self::text_with(ids, DEFAULT_TEXT_HTML)
    }

    pub fn text_with(ids: &mut IdGenerator, content_html: impl Into<String>) -> Self {
        ContentBlock::Text(HtmlBlock {
            id: ids.new_id(),
            content_html: content_html.into(),
        })
    }

    pub fn image(ids: &mut IdGenerator) -> Self {
        ContentBlock::Image(ImageBlock {
            id: ids.new_id(),
            src: String::new(),
            alt: String::new(),
            width: None,
            height: None,
            size: ImageSize::default(),
            rounded: Emphasis::default(),
            shadow: Emphasis::default(),
            caption: None,
        })
    }

    pub fn video(ids: &mut IdGenerator) -> Self {
        ContentBlock::Video(VideoBlock {
            id: ids.new_id(),
            src: String::new(),
            width: None,
            height: None,
            autoplay: false,
            looped: false,
            muted: false,
            controls: true,
        })
    }

    pub fn spacer(ids: &mut IdGenerator) -> Self {
        ContentBlock::Spacer(SpacerBlock {
            id: ids.new_id(),
            height: DEFAULT_SPACER_HEIGHT,
        })
    }

    pub fn table(ids: &mut IdGenerator) -> Self {
        Self::table_with(ids, DEFAULT_TABLE_HTML)
    }

    pub fn table_with(ids: &mut IdGenerator, content_html: impl Into<String>) -> Self {
        ContentBlock::Table(HtmlBlock {
            id: ids.new_id(),
            content_html: content_html.into(),
        })
    }

    pub fn code(ids: &mut IdGenerator) -> Self {
        Self::code_with(ids, DEFAULT_CODE_HTML)
    }

    pub fn code_with(ids: &mut IdGenerator, content_html: impl Into<String>) -> Self {
        ContentBlock::Code(HtmlBlock {
            id: ids.new_id(),
            content_html: content_html.into(),
        })
    }

    pub fn id(&self) -> &str {
        match self {
            ContentBlock::Text(b) | ContentBlock::Table(b) | ContentBlock::Code(b) => &b.id,
            ContentBlock::Image(b) => &b.id,
            ContentBlock::Video(b) => &b.id,
            ContentBlock::Spacer(b) => &b.id,
        }
    }

    fn id_mut(&mut self) -> &mut String {
        match self {
            ContentBlock::Text(b) | ContentBlock::Table(b) | ContentBlock::Code(b) => &mut b.id,
            ContentBlock::Image(b) => &mut b.id,
            ContentBlock::Video(b) => &mut b.id,
            ContentBlock::Spacer(b) => &mut b.id,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ContentBlock::Text(_) => BlockKind::Text,
            ContentBlock::Image(_) => BlockKind::Image,
            ContentBlock::Video(_) => BlockKind::Video,
            ContentBlock::Spacer(_) => BlockKind::Spacer,
            ContentBlock::Table(_) => BlockKind::Table,
            ContentBlock::Code(_) => BlockKind::Code,
        }
    }

    /// Editor-owned HTML, for the variants that have it
    pub fn content_html(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(b) | ContentBlock::Table(b) | ContentBlock::Code(b) => {
                Some(&b.content_html)
            }
            _ => None,
        }
    }

    /// Copy of this block under a new id
    pub fn with_fresh_id(&self, ids: &mut IdGenerator) -> Self {
        let mut copy = self.clone();
        *copy.id_mut() = ids.new_id();
        copy
    }

    /// Merge a patch into this block. Returns false when the patch does not
    /// fit this variant, in which case nothing changes.
    pub fn apply_patch(&mut self, patch: &BlockPatch) -> bool {
        match (self, patch) {
            (
                ContentBlock::Text(b) | ContentBlock::Table(b) | ContentBlock::Code(b),
                BlockPatch::Html { content_html },
            ) => {
                b.content_html = content_html.clone();
                true
            }
            (ContentBlock::Image(b), BlockPatch::Image(p)) => {
                p.merge_into(b);
                true
            }
            (ContentBlock::Video(b), BlockPatch::Video(p)) => {
                p.merge_into(b);
                true
            }
            (ContentBlock::Spacer(b), BlockPatch::Spacer { height }) => {
                b.height = (*height).clamp(MIN_SPACER_HEIGHT, MAX_SPACER_HEIGHT);
                true
            }
            (ContentBlock::Image(b), BlockPatch::Media(asset)) => {
                b.src = asset.url.clone();
                b.width = asset.width;
                b.height = asset.height;
                if let Some(alt) = &asset.alt {
                    b.alt = alt.clone();
                }
                true
            }
            (ContentBlock::Video(b), BlockPatch::Media(asset)) => {
                b.src = asset.url.clone();
                b.width = asset.width;
                b.height = asset.height;
                true
            }
            _ => false,
        }
    }
}

/// Build a default block of the given kind
pub fn create_block(kind: BlockKind, ids: &mut IdGenerator) -> ContentBlock {
    match kind {
        BlockKind::Text => ContentBlock::text(ids),
        BlockKind::Image => ContentBlock::image(ids),
        BlockKind::Video => ContentBlock::video(ids),
        BlockKind::Spacer => ContentBlock::spacer(ids),
        BlockKind::Table => ContentBlock::table(ids),
        BlockKind::Code => ContentBlock::code(ids),
    }
}

/// Asset chosen through the media picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePatch {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size: Option<ImageSize>,
    pub rounded: Option<Emphasis>,
    pub shadow: Option<Emphasis>,
    /// An empty caption clears it
    pub caption: Option<String>,
}

impl ImagePatch {
    fn merge_into(&self, block: &mut ImageBlock) {
        if let Some(src) = &self.src {
            block.src = src.clone();
        }
        if let Some(alt) = &self.alt {
            block.alt = alt.clone();
        }
        if let Some(width) = self.width {
            block.width = Some(width);
        }
        if let Some(height) = self.height {
            block.height = Some(height);
        }
        if let Some(size) = self.size {
            block.size = size;
        }
        if let Some(rounded) = self.rounded {
            block.rounded = rounded;
        }
        if let Some(shadow) = self.shadow {
            block.shadow = shadow;
        }
        if let Some(caption) = &self.caption {
            block.caption = (!caption.is_empty()).then(|| caption.clone());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoPatch {
    pub src: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub autoplay: Option<bool>,
    #[serde(rename = "loop")]
    pub looped: Option<bool>,
    pub muted: Option<bool>,
    pub controls: Option<bool>,
}

impl VideoPatch {
    fn merge_into(&self, block: &mut VideoBlock) {
        if let Some(src) = &self.src {
            block.src = src.clone();
        }
        if let Some(width) = self.width {
            block.width = Some(width);
        }
        if let Some(height) = self.height {
            block.height = Some(height);
        }
        if let Some(autoplay) = self.autoplay {
            block.autoplay = autoplay;
        }
        if let Some(looped) = self.looped {
            block.looped = looped;
        }
        if let Some(muted) = self.muted {
            block.muted = muted;
        }
        if let Some(controls) = self.controls {
            block.controls = controls;
        }
    }
}

/// Shallow field update for an existing block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockPatch {
    /// New content for a text, table or code block
    Html { content_html: String },
    Image(ImagePatch),
    Video(VideoPatch),
    Spacer { height: u32 },
    /// Media picker result for an image or video block
    Media(MediaAsset),
}

impl BlockPatch {
    pub fn html(content_html: impl Into<String>) -> Self {
        BlockPatch::Html {
            content_html: content_html.into(),
        }
    }
}
