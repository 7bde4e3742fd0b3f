//! Tolerant HTML fragment parser.
//!
//! Builds just enough of a tree to find top-level elements and look inside
//! figures, videos and table wrappers. Every element remembers its source
//! span so plain markup can be re-emitted byte for byte.

use crate::error::MigrateResult;
use crate::tokenizer::{tokenize, Token};
use std::ops::Range;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Opening one of these implicitly closes an open `<p>`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "blockquote", "div", "figure", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "ol", "p",
    "pre", "table", "ul",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Range<usize>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lowercased tag name
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Outer HTML, from `<` of the opening tag to `>` of the closing tag
    pub span: Range<usize>,
}

impl Element {
    fn open(name: String, attrs: Vec<(String, String)>, span: Range<usize>) -> Self {
        Self {
            name,
            attrs,
            children: Vec::new(),
            span,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| key == name)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First descendant element with the given name, depth first
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.child_elements()
            .find_map(|el| if el.name == name { Some(el) } else { el.find(name) })
    }
}

/// Parsed fragment borrowing its source
#[derive(Debug)]
pub struct Fragment<'src> {
    pub source: &'src str,
    pub nodes: Vec<Node>,
}

impl<'src> Fragment<'src> {
    pub fn outer_html(&self, element: &Element) -> &'src str {
        &self.source[element.span.clone()]
    }

    pub fn text(&self, span: &Range<usize>) -> &'src str {
        &self.source[span.clone()]
    }

    /// Concatenated, entity-decoded text below an element, trimmed
    pub fn text_content(&self, element: &Element) -> String {
        let mut out = String::new();
        self.collect_text(element, &mut out);
        decode_entities(out.trim())
    }

    fn collect_text(&self, element: &Element, out: &mut String) {
        for child in &element.children {
            match child {
                Node::Text(span) => out.push_str(self.text(span)),
                Node::Element(el) => self.collect_text(el, out),
            }
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }
}

struct TreeBuilder {
    stack: Vec<Element>,
    roots: Vec<Node>,
}

impl TreeBuilder {
    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    /// Pop the innermost open element, ending it at `end`
    fn close_top(&mut self, end: usize) {
        if let Some(mut el) = self.stack.pop() {
            el.span.end = end;
            self.attach(Node::Element(el));
        }
    }

    fn close_named(&mut self, name: &str, span: Range<usize>) {
        let Some(pos) = self.stack.iter().rposition(|el| el.name == name) else {
            // Stray closing tag
            return;
        };

        while self.stack.len() > pos + 1 {
            self.close_top(span.start);
        }
        self.close_top(span.end);
    }
}

/// Parse an HTML fragment into a tolerant element tree
pub fn parse_fragment(source: &str) -> MigrateResult<Fragment<'_>> {
    let tokens = tokenize(source)?;
    let mut builder = TreeBuilder {
        stack: Vec::new(),
        roots: Vec::new(),
    };

    for (token, span) in tokens {
        match token {
            Token::Comment(_) | Token::Doctype(_) => {}
            Token::Text(_) | Token::StrayAngle(_) => builder.attach(Node::Text(span)),
            Token::OpenTag(head) => {
                let name = head.name.to_ascii_lowercase();

                if CLOSES_PARAGRAPH.contains(&name.as_str())
                    && builder.stack.last().is_some_and(|el| el.name == "p")
                {
                    builder.close_top(span.start);
                }

                let element = Element::open(name, parse_attributes(head.attrs), span);
                if head.self_closing || VOID_ELEMENTS.contains(&element.name.as_str()) {
                    builder.attach(Node::Element(element));
                } else {
                    builder.stack.push(element);
                }
            }
            Token::CloseTag(name) => {
                builder.close_named(&name.to_ascii_lowercase(), span);
            }
        }
    }

    while !builder.stack.is_empty() {
        builder.close_top(source.len());
    }

    Ok(Fragment {
        source,
        nodes: builder.roots,
    })
}

/// Parse raw attribute text like ` src="a.png" alt='x' controls`
pub fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut chars = raw.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace() || *c == '/').is_some() {}

        let Some(&(start, _)) = chars.peek() else {
            break;
        };
        let mut end = raw.len();
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' || c == '/' {
                end = i;
                break;
            }
            chars.next();
        }
        let name = raw[start..end].to_ascii_lowercase();

        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if(|(_, c)| *c == '=').is_some() {
            while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

            match chars.peek().map(|&(_, c)| c) {
                Some(quote @ ('"' | '\'')) => {
                    chars.next();
                    for (_, c) in chars.by_ref() {
                        if c == quote {
                            break;
                        }
                        value.push(c);
                    }
                }
                _ => {
                    while let Some((_, c)) = chars.next_if(|(_, c)| !c.is_whitespace()) {
                        value.push(c);
                    }
                }
            }
        }

        if !name.is_empty() {
            attrs.push((name, decode_entities(&value)));
        }
    }

    attrs
}

/// Decode the handful of entities that show up in attribute values and captions
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(fragment: &Fragment) -> Vec<String> {
        fragment.elements().map(|el| el.name.clone()).collect()
    }

    #[test]
    fn test_top_level_elements_and_spans() {
        let source = "<h2>Title</h2>\n<p>Body <em>text</em></p>";
        let fragment = parse_fragment(source).unwrap();

        assert_eq!(names(&fragment), vec!["h2", "p"]);
        let p = fragment.elements().nth(1).unwrap();
        assert_eq!(fragment.outer_html(p), "<p>Body <em>text</em></p>");
        assert_eq!(fragment.text_content(p), "Body text");
    }

    #[test]
    fn test_void_elements_do_not_nest() {
        let fragment = parse_fragment(r#"<figure><img src="a.png"><figcaption>Hi</figcaption></figure>"#).unwrap();
        let figure = fragment.elements().next().unwrap();

        let children: Vec<&str> = figure.child_elements().map(|el| el.name.as_str()).collect();
        assert_eq!(children, vec!["img", "figcaption"]);
        assert_eq!(figure.find("img").unwrap().attr("src"), Some("a.png"));
    }

    #[test]
    fn test_unclosed_paragraph_is_closed_by_block() {
        let fragment = parse_fragment("<p>one<p>two<table><tr><td>x</td></tr></table>").unwrap();
        assert_eq!(names(&fragment), vec!["p", "p", "table"]);
        assert_eq!(fragment.outer_html(fragment.elements().next().unwrap()), "<p>one");
    }

    #[test]
    fn test_stray_close_is_ignored_and_open_is_closed_at_eof() {
        let fragment = parse_fragment("</div><ul><li>a</li>").unwrap();
        assert_eq!(names(&fragment), vec!["ul"]);
        assert_eq!(fragment.outer_html(fragment.elements().next().unwrap()), "<ul><li>a</li>");
    }

    #[test]
    fn test_mismatched_close_closes_inner_elements() {
        let fragment = parse_fragment("<blockquote><p>quote</blockquote><p>after</p>").unwrap();
        assert_eq!(names(&fragment), vec!["blockquote", "p"]);
        let quote = fragment.elements().next().unwrap();
        assert_eq!(fragment.outer_html(quote), "<blockquote><p>quote</blockquote>");
    }

    #[test]
    fn test_attribute_forms() {
        let attrs = parse_attributes(r#" src="a b.png" alt='Tom &amp; Jerry' width=640 controls muted "#);
        assert_eq!(
            attrs,
            vec![
                ("src".to_string(), "a b.png".to_string()),
                ("alt".to_string(), "Tom & Jerry".to_string()),
                ("width".to_string(), "640".to_string()),
                ("controls".to_string(), String::new()),
                ("muted".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_decode_entities_order() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("a &quot;b&quot;"), "a \"b\"");
    }
}
