use crate::error::{MigrateError, MigrateResult};
use logos::{Lexer, Logos};
use std::fmt;

/// Opening tag as written: `<name attrs...>` or `<name attrs... />`
#[derive(Debug, Clone, PartialEq)]
pub struct TagHead<'src> {
    pub name: &'src str,
    /// Raw attribute text between the name and the closing `>`
    pub attrs: &'src str,
    pub self_closing: bool,
}

/// Token types for legacy HTML fragments
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[token("<!--", comment)]
    Comment(&'src str),

    #[regex(r"<![a-zA-Z][^>]*>", |lex| lex.slice())]
    Doctype(&'src str),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", close_tag)]
    CloseTag(&'src str),

    #[regex(r"<[a-zA-Z][a-zA-Z0-9-]*", open_tag)]
    OpenTag(TagHead<'src>),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    // `<` that does not start a tag, e.g. "a < b" written without escaping
    #[token("<", |lex| lex.slice())]
    #[token("</", |lex| lex.slice())]
    StrayAngle(&'src str),
}

fn comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let end = lex.remainder().find("-->")?;
    let body = &lex.remainder()[..end];
    lex.bump(end + 3);
    Some(body)
}

fn close_tag<'src>(lex: &mut Lexer<'src, Token<'src>>) -> &'src str {
    lex.slice()[2..].trim_end_matches('>').trim_end()
}

/// Scan past the attributes to the first unquoted `>`
fn open_tag<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<TagHead<'src>> {
    let name = &lex.slice()[1..];
    let rest = lex.remainder();
    let mut quote: Option<char> = None;

    for (i, ch) in rest.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '>' => {
                let attrs = &rest[..i];
                let self_closing = attrs.trim_end().ends_with('/');
                lex.bump(i + 1);
                return Some(TagHead {
                    name,
                    attrs: attrs.trim_end().trim_end_matches('/').trim_end(),
                    self_closing,
                });
            }
            None => {}
        }
    }

    None
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Comment(_) => write!(f, "comment"),
            Token::Doctype(d) => write!(f, "doctype {}", d),
            Token::CloseTag(name) => write!(f, "</{}>", name),
            Token::OpenTag(head) => write!(f, "<{}>", head.name),
            Token::Text(_) => write!(f, "text"),
            Token::StrayAngle(s) => write!(f, "stray '{}'", s),
        }
    }
}

/// Tokenize an HTML fragment. Fails on the first unterminated tag or comment.
pub fn tokenize(source: &str) -> MigrateResult<Vec<(Token<'_>, std::ops::Range<usize>)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(MigrateError::lex(source, lexer.span().start)),
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t.to_string())
            .collect()
    }

    #[test]
    fn test_tags_and_text() {
        assert_eq!(kinds("<p>Hello</p>"), vec!["<p>", "text", "</p>"]);
    }

    #[test]
    fn test_attributes_may_contain_angle_brackets() {
        let tokens = tokenize(r#"<img alt="a > b" src='x.png'>"#).unwrap();
        assert_eq!(tokens.len(), 1);
        match &tokens[0].0 {
            Token::OpenTag(head) => {
                assert_eq!(head.name, "img");
                assert_eq!(head.attrs, r#" alt="a > b" src='x.png'"#);
                assert!(!head.self_closing);
            }
            other => panic!("Expected open tag, got {:?}", other),
        }
    }

    #[test]
    fn test_self_closing() {
        let tokens = tokenize("<br/><img src=\"a.png\" />").unwrap();
        assert!(matches!(&tokens[0].0, Token::OpenTag(h) if h.self_closing && h.name == "br"));
        assert!(matches!(&tokens[1].0, Token::OpenTag(h) if h.self_closing && h.attrs == " src=\"a.png\""));
    }

    #[test]
    fn test_comments_and_doctype() {
        assert_eq!(
            kinds("<!DOCTYPE html><!-- <p>hidden</p> --><h1>T</h1>"),
            vec!["doctype <!DOCTYPE html>", "comment", "<h1>", "text", "</h1>"]
        );
    }

    #[test]
    fn test_stray_angle_is_not_an_error() {
        assert_eq!(kinds("<p>1 < 2</p>"), vec!["<p>", "text", "stray '<'", "text", "</p>"]);
    }

    #[test]
    fn test_unterminated_tag_fails() {
        let err = tokenize("<p>ok</p><img src=\"x.png\"").unwrap_err();
        assert_eq!(err.pos(), 9);
    }

    #[test]
    fn test_unterminated_comment_fails() {
        assert!(tokenize("<p>a</p><!-- never closed").is_err());
    }
}
