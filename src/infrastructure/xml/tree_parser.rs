// ============================================================
// XML TREE PARSER
// ============================================================
// Decode XML bytes and build an owned element tree

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use roxmltree::{Document, Node, ParsingOptions};

use crate::domain::error::{AppError, Result};
use crate::domain::source::XmlNode;
use crate::infrastructure::csv::decode_strict;

static DECLARED_ENCODING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#).unwrap()
});

/// Deepest element nesting accepted. Tree building and record lookup both
/// recurse per level, so deeper documents are refused before parsing.
pub const MAX_DEPTH: usize = 256;

pub struct XmlTreeParser;

impl XmlTreeParser {
    /// Parse a complete document. Any decoding or syntax problem is
    /// reported as `MalformedXml`.
    pub fn parse(bytes: &[u8]) -> Result<XmlNode> {
        let text = Self::decode(bytes)?;
        check_depth(&text)?;
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = Document::parse_with_options(&text, options)
            .map_err(|e| AppError::MalformedXml(e.to_string()))?;

        Ok(Self::convert(document.root_element()))
    }

    /// BOM first, then the `encoding` pseudo-attribute of the XML
    /// declaration, then UTF-8.
    fn decode(bytes: &[u8]) -> Result<String> {
        let encoding = match Encoding::for_bom(bytes) {
            Some((encoding, _)) => encoding,
            None => Self::declared_encoding(bytes).unwrap_or(UTF_8),
        };

        decode_strict(bytes, encoding).map_err(|e| AppError::MalformedXml(e.to_string()))
    }

    fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
        let prefix = &bytes[..bytes.len().min(256)];
        let captures = DECLARED_ENCODING.captures(prefix)?;
        let label = captures.get(1)?.as_bytes();
        Encoding::for_label(label)
    }

    fn convert(node: Node<'_, '_>) -> XmlNode {
        let tag_name = node.tag_name();
        let local_name = tag_name.name();
        let tag = match tag_name.namespace() {
            Some(namespace) => format!("{{{}}}{}", namespace, local_name),
            None => local_name.to_string(),
        };

        let text = node
            .first_child()
            .filter(|child| child.is_text())
            .and_then(|child| child.text())
            .map(str::to_string);

        let mut element = XmlNode::new(tag, local_name);
        element.text = text;
        element.children = node
            .children()
            .filter(|child| child.is_element())
            .map(Self::convert)
            .collect();
        element
    }
}

/// Scan markup and fail once element nesting passes `MAX_DEPTH`.
/// Comments, CDATA, processing instructions and declarations are skipped;
/// syntax errors are left for the parser to report.
fn check_depth(text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'<') {
        let start = pos + offset;
        let rest = &bytes[start..];

        let end = if rest.starts_with(b"<!--") {
            find(bytes, start + 4, b"-->").map(|i| i + 3)
        } else if rest.starts_with(b"<![CDATA[") {
            find(bytes, start + 9, b"]]>").map(|i| i + 3)
        } else if rest.starts_with(b"<?") {
            find(bytes, start + 2, b"?>").map(|i| i + 2)
        } else if rest.starts_with(b"<!") {
            tag_end(bytes, start + 2)
        } else if rest.starts_with(b"</") {
            depth = depth.saturating_sub(1);
            tag_end(bytes, start + 2)
        } else {
            let end = tag_end(bytes, start + 1);
            if let Some(end) = end {
                if bytes[end - 2] != b'/' {
                    depth += 1;
                    if depth > MAX_DEPTH {
                        return Err(AppError::MalformedXml(format!(
                            "element nesting exceeds {} levels",
                            MAX_DEPTH
                        )));
                    }
                }
            }
            end
        };

        match end {
            Some(end) => pos = end,
            None => break,
        }
    }
    Ok(())
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| from + i)
}

/// Index just past the `>` closing a tag, ignoring `>` inside quoted
/// attribute values and DOCTYPE internal subsets.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut brackets = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => quote = Some(b),
            (None, b'[') => brackets += 1,
            (None, b']') => brackets = brackets.saturating_sub(1),
            (None, b'>') if brackets == 0 => return Some(i + 1),
            _ => {}
        }
    }
    None
}
