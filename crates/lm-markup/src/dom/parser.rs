//! Lenient HTML reader built on `quick-xml`.
//!
//! Rendered lesson HTML is close to XML but not quite: void elements are
//! not self-closed, attributes may be unquoted or valueless and named
//! entities appear freely. The reader runs `quick-xml` with end-name checks
//! off and rebuilds nesting with an explicit stack of open elements.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::entities::convert_html_entities;
use super::{Node, is_void_element};
use crate::MarkupError;

/// Parse an HTML fragment into a tree rooted at a fragment node.
///
/// End tags close every element opened after the matching start tag; end
/// tags with no matching open element are ignored. Comments, doctypes and
/// processing instructions are dropped.
///
/// ```
/// let root = lm_markup::dom::parse("<p>a<br>b</p>").unwrap();
/// assert_eq!(root.children[0].children[0].tag, "br");
/// assert_eq!(root.children[0].children[0].tail, "b");
/// ```
pub fn parse(html: &str) -> Result<Node, MarkupError> {
    let html = convert_html_entities(html);

    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;

    let mut root = Node::fragment();
    let mut open: Vec<Node> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let node = element(&reader, &e)?;
                if is_void_element(&node.tag) {
                    attach(&mut root, &mut open, node);
                } else {
                    open.push(node);
                }
            }
            Event::Empty(e) => {
                let node = element(&reader, &e)?;
                attach(&mut root, &mut open, node);
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?;
                current(&mut root, &mut open).append_text(&text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?;
                current(&mut root, &mut open).append_text(&decode_entity(&entity));
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e);
                current(&mut root, &mut open).append_text(&text);
            }
            Event::End(e) => {
                let name = decode_name(&reader, e.name().as_ref());
                if let Some(pos) = open.iter().rposition(|node| node.tag == name) {
                    close_to(&mut root, &mut open, pos);
                }
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    close_to(&mut root, &mut open, 0);
    Ok(root)
}

fn current<'a>(root: &'a mut Node, open: &'a mut [Node]) -> &'a mut Node {
    match open.last_mut() {
        Some(node) => node,
        None => root,
    }
}

fn attach(root: &mut Node, open: &mut [Node], node: Node) {
    current(root, open).children.push(node);
}

/// Pop open elements until only `depth` remain, attaching each to its parent.
fn close_to(root: &mut Node, open: &mut Vec<Node>, depth: usize) {
    while open.len() > depth {
        if let Some(node) = open.pop() {
            attach(root, open, node);
        }
    }
}

fn element(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<Node, MarkupError> {
    let mut node = Node::new(decode_name(reader, e.name().as_ref()));
    for attr in e.html_attributes() {
        let attr = attr?;
        let key = decode_name(reader, attr.key.as_ref());
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        node.attrs.push((key, value));
    }
    Ok(node)
}

fn decode_name(reader: &Reader<&[u8]>, name: &[u8]) -> String {
    reader
        .decoder()
        .decode(name)
        .map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            std::borrow::Cow::into_owned,
        )
        .to_ascii_lowercase()
}

/// Decode an entity reference body (the part between `&` and `;`).
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}
