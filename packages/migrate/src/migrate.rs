//! # Legacy HTML Migration
//!
//! One-way import of flat HTML into sections, columns and blocks.
//!
//! Plain top-level elements (paragraphs, headings, lists, quotes and anything
//! unrecognised) are buffered into one text block. Figures with images,
//! videos, tables and `<pre>` blocks each become their own block. Every
//! block lands alone in a full-width section, in source order.

use crate::parser::{parse_fragment, Element, Fragment, Node};
use folio_document::{
    create_empty_page_content, create_single_block_section, ContentBlock, Emphasis, IdGenerator,
    ImageBlock, ImageSize, PageContent, Section, VideoBlock,
};
use tracing::{debug, info, warn};

/// Convert a legacy HTML document into a page.
///
/// Never fails: input that cannot be tokenized becomes a single text block
/// holding the raw markup.
pub fn migrate_html_to_blocks(html: &str, ids: &mut IdGenerator) -> PageContent {
    let fragment = match parse_fragment(html) {
        Ok(fragment) => fragment,
        Err(e) => {
            warn!(error = %e, "Legacy HTML did not parse - keeping it as one text block");
            let block = ContentBlock::text_with(ids, html);
            return PageContent::new(vec![create_single_block_section(block, ids)]);
        }
    };

    let mut migrator = Migrator {
        fragment: &fragment,
        ids: &mut *ids,
        buffer: String::new(),
        sections: Vec::new(),
    };

    for node in &fragment.nodes {
        migrator.visit(node);
    }
    migrator.flush();

    let sections = migrator.sections;
    if sections.is_empty() {
        debug!("Legacy HTML had no content - starting from an empty page");
        return create_empty_page_content(ids);
    }

    let page = PageContent::new(sections);
    info!(
        sections = page.sections.len(),
        blocks = page.blocks().count(),
        "Migrated legacy HTML"
    );
    page
}

struct Migrator<'a, 'src> {
    fragment: &'a Fragment<'src>,
    ids: &'a mut IdGenerator,
    buffer: String,
    sections: Vec<Section>,
}

impl<'a, 'src> Migrator<'a, 'src> {
    fn visit(&mut self, node: &Node) {
        match node {
            Node::Text(span) => {
                let text = self.fragment.text(span);
                if !text.trim().is_empty() {
                    self.buffer.push_str(text);
                }
            }
            Node::Element(el) => match self.special_block(el) {
                Some(block) => {
                    self.flush();
                    self.emit(block);
                }
                None => self.buffer.push_str(self.fragment.outer_html(el)),
            },
        }
    }

    /// Emit buffered plain markup as one text block
    fn flush(&mut self) {
        if self.buffer.trim().is_empty() {
            self.buffer.clear();
            return;
        }
        let html = std::mem::take(&mut self.buffer);
        let block = ContentBlock::text_with(self.ids, html.trim());
        self.emit(block);
    }

    fn emit(&mut self, block: ContentBlock) {
        debug!(kind = %block.kind(), "Migrated block");
        let section = create_single_block_section(block, self.ids);
        self.sections.push(section);
    }

    fn special_block(&mut self, el: &Element) -> Option<ContentBlock> {
        match el.name.as_str() {
            "figure" => el.find("img").map(|img| self.image_block(img, el.find("figcaption"))),
            "img" => Some(self.image_block(el, None)),
            "video" => Some(self.video_block(el)),
            "table" => Some(ContentBlock::table_with(self.ids, self.fragment.outer_html(el))),
            "div" => table_in_wrapper(el)
                .map(|table| ContentBlock::table_with(self.ids, self.fragment.outer_html(table))),
            "pre" => Some(ContentBlock::code_with(self.ids, self.fragment.outer_html(el))),
            _ => None,
        }
    }

    fn image_block(&mut self, img: &Element, caption: Option<&Element>) -> ContentBlock {
        let caption = caption
            .map(|el| self.fragment.text_content(el))
            .filter(|text| !text.is_empty());

        ContentBlock::Image(ImageBlock {
            id: self.ids.new_id(),
            src: img.attr("src").unwrap_or_default().to_string(),
            alt: img.attr("alt").unwrap_or_default().to_string(),
            width: dimension(img, "width"),
            height: dimension(img, "height"),
            size: ImageSize::default(),
            rounded: Emphasis::default(),
            shadow: Emphasis::default(),
            caption,
        })
    }

    fn video_block(&mut self, video: &Element) -> ContentBlock {
        let src = video
            .attr("src")
            .or_else(|| video.find("source").and_then(|source| source.attr("src")))
            .unwrap_or_default();

        ContentBlock::Video(VideoBlock {
            id: self.ids.new_id(),
            src: src.to_string(),
            width: dimension(video, "width"),
            height: dimension(video, "height"),
            autoplay: video.has_attr("autoplay"),
            looped: video.has_attr("loop"),
            muted: video.has_attr("muted"),
            controls: video.has_attr("controls"),
        })
    }
}

/// Scroll wrapper: a div whose only element child is a table
fn table_in_wrapper(div: &Element) -> Option<&Element> {
    let mut children = div.child_elements();
    match (children.next(), children.next()) {
        (Some(table), None) if table.name == "table" => Some(table),
        _ => None,
    }
}

/// Numeric width/height attribute; `640px` and `640` both read as 640
fn dimension(el: &Element, name: &str) -> Option<u32> {
    el.attr(name)?.trim().trim_end_matches("px").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_document::{BlockKind, LayoutName};

    fn migrate(html: &str) -> PageContent {
        migrate_html_to_blocks(html, &mut IdGenerator::from_seed("mig"))
    }

    fn only_block(section: &Section) -> &ContentBlock {
        assert_eq!(section.layout, LayoutName::Full);
        assert_eq!(section.columns.len(), 1);
        assert_eq!(section.columns[0].blocks.len(), 1);
        &section.columns[0].blocks[0]
    }

    #[test]
    fn test_plain_markup_becomes_one_text_block() {
        let page = migrate("<h2>About</h2>\n<p>Hello</p>\n<ul><li>a</li></ul>");

        assert_eq!(page.sections.len(), 1);
        assert_eq!(
            only_block(&page.sections[0]).content_html(),
            Some("<h2>About</h2><p>Hello</p><ul><li>a</li></ul>")
        );
    }

    #[test]
    fn test_special_elements_split_text() {
        let html = r#"<p>Intro</p>
<figure><img src="/a.png" alt="A" width="800" height="600"><figcaption>Shot &amp; caption</figcaption></figure>
<p>Middle</p>
<pre><code>let x = 1;</code></pre>
<p>End</p>"#;
        let page = migrate(html);

        let kinds: Vec<BlockKind> = page.sections.iter().map(|s| only_block(s).kind()).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Text, BlockKind::Image, BlockKind::Text, BlockKind::Code, BlockKind::Text]
        );

        match only_block(&page.sections[1]) {
            ContentBlock::Image(img) => {
                assert_eq!(img.src, "/a.png");
                assert_eq!(img.alt, "A");
                assert_eq!(img.width, Some(800));
                assert_eq!(img.height, Some(600));
                assert_eq!(img.caption.as_deref(), Some("Shot & caption"));
            }
            other => panic!("Expected image, got {:?}", other),
        }

        assert_eq!(
            only_block(&page.sections[3]).content_html(),
            Some("<pre><code>let x = 1;</code></pre>")
        );
        assert_eq!(only_block(&page.sections[4]).content_html(), Some("<p>End</p>"));
    }

    #[test]
    fn test_video_flags_and_source_child() {
        let page = migrate(r#"<video autoplay loop muted playsinline><source src="/clip.mp4" type="video/mp4"></video>"#);

        match only_block(&page.sections[0]) {
            ContentBlock::Video(v) => {
                assert_eq!(v.src, "/clip.mp4");
                assert!(v.autoplay && v.looped && v.muted);
                assert!(!v.controls);
            }
            other => panic!("Expected video, got {:?}", other),
        }
    }

    #[test]
    fn test_wrapped_table_keeps_table_markup() {
        let table = "<table><tr><td>1</td><td>2</td></tr></table>";
        let page = migrate(&format!("<div class=\"tableWrapper\">\n  {}\n</div>", table));

        let block = only_block(&page.sections[0]);
        assert_eq!(block.kind(), BlockKind::Table);
        assert_eq!(block.content_html(), Some(table));
    }

    #[test]
    fn test_div_with_other_content_stays_text() {
        let page = migrate("<div><p>x</p><table></table></div>");
        assert_eq!(only_block(&page.sections[0]).kind(), BlockKind::Text);
    }

    #[test]
    fn test_figure_without_image_is_plain() {
        let page = migrate("<figure><blockquote>Quote</blockquote></figure>");
        assert_eq!(only_block(&page.sections[0]).kind(), BlockKind::Text);
    }

    #[test]
    fn test_empty_input_gives_default_page() {
        for html in ["", "   \n ", "<!-- only a comment -->"] {
            let page = migrate(html);
            assert_eq!(page.sections.len(), 1);
            assert_eq!(page.sections[0].layout, LayoutName::Full);
            assert_eq!(page.blocks().count(), 0);
        }
    }

    #[test]
    fn test_bare_text_is_kept() {
        let page = migrate("just words");
        assert_eq!(only_block(&page.sections[0]).content_html(), Some("just words"));
    }

    #[test]
    fn test_unparsable_input_falls_back_to_raw_text() {
        let html = "<p>fine</p><img src=\"broken.png\"";
        let page = migrate(html);

        assert_eq!(page.sections.len(), 1);
        assert_eq!(only_block(&page.sections[0]).content_html(), Some(html));
    }

    #[test]
    fn test_migrated_page_is_valid() {
        let page = migrate("<p>a</p><table></table><img src=x><p>b</p>");
        assert!(page.validate().is_ok());
        assert_eq!(page.sections.len(), 4);
    }
}
