//! Migration keeps every piece of content, in order

use folio_document::{BlockKind, ContentBlock, IdGenerator};
use folio_migrate::migrate_html_to_blocks;

fn legacy_page(images: usize, tables: usize) -> String {
    let mut html = String::from("<h1>Project</h1>\n");
    for i in 0..images.max(tables) {
        html.push_str(&format!("<p>Paragraph {}</p>\n", i));
        if i < images {
            html.push_str(&format!(
                "<figure><img src=\"/img/{i}.jpg\" alt=\"Shot {i}\"><figcaption>Caption {i}</figcaption></figure>\n"
            ));
        }
        if i < tables {
            html.push_str(&format!(
                "<div class=\"tableWrapper\"><table><tr><td>row {i}</td></tr></table></div>\n"
            ));
        }
    }
    html.push_str("<blockquote>Closing words</blockquote>");
    html
}

#[test]
fn test_counts_and_order_are_preserved() {
    let html = legacy_page(3, 2);
    let page = migrate_html_to_blocks(&html, &mut IdGenerator::new());

    assert_eq!(page.count_blocks(BlockKind::Image), 3);
    assert_eq!(page.count_blocks(BlockKind::Table), 2);

    let srcs: Vec<&str> = page
        .blocks()
        .filter_map(|b| match b {
            ContentBlock::Image(img) => Some(img.src.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(srcs, vec!["/img/0.jpg", "/img/1.jpg", "/img/2.jpg"]);

    let tables: Vec<&str> = page
        .blocks()
        .filter(|b| b.kind() == BlockKind::Table)
        .filter_map(|b| b.content_html())
        .collect();
    assert_eq!(tables[1], "<table><tr><td>row 1</td></tr></table>");

    // All running text is present, in order.
    let text: String = page
        .blocks()
        .filter(|b| b.kind() == BlockKind::Text)
        .filter_map(|b| b.content_html())
        .collect();
    let mut cursor = 0;
    for needle in ["<h1>Project</h1>", "Paragraph 0", "Paragraph 1", "Paragraph 2", "Closing words"] {
        let found = text[cursor..].find(needle).expect(needle);
        cursor += found + needle.len();
    }
}

#[test]
fn test_every_block_is_alone_in_its_section() {
    let page = migrate_html_to_blocks(&legacy_page(2, 2), &mut IdGenerator::new());

    for section in &page.sections {
        assert_eq!(section.columns.len(), 1);
        assert_eq!(section.columns[0].blocks.len(), 1);
    }
    assert!(page.validate().is_ok());
}

#[test]
fn test_output_serializes_as_plain_json() {
    let page = migrate_html_to_blocks(&legacy_page(1, 1), &mut IdGenerator::new());
    let json = serde_json::to_string(&page).unwrap();
    let back: folio_document::PageContent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, page);
}
