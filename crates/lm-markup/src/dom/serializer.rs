//! HTML serializer for the parse tree.

use std::fmt::Write;

use super::{Node, is_void_element};
use crate::escape::{escape_html, escape_text};

/// Serialize a tree to HTML.
///
/// A fragment root contributes only its content; any other node is written
/// with its own tags and tail.
pub fn serialize(node: &Node) -> String {
    if node.is_fragment() {
        serialize_inner(node)
    } else {
        let mut out = serialize_element(node);
        out.push_str(&escape_text(&node.tail));
        out
    }
}

pub(super) fn serialize_inner(node: &Node) -> String {
    let mut out = String::with_capacity(256);
    write_content(node, &mut out);
    out
}

pub(super) fn serialize_element(node: &Node) -> String {
    let mut out = String::with_capacity(256);
    write_element(node, &mut out);
    out
}

fn write_content(node: &Node, out: &mut String) {
    out.push_str(&escape_text(&node.text));
    for child in &node.children {
        write_element(child, out);
        out.push_str(&escape_text(&child.tail));
    }
}

fn write_element(node: &Node, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attrs {
        write!(out, r#" {key}="{}""#, escape_html(value)).unwrap();
    }
    out.push('>');

    if is_void_element(&node.tag) {
        return;
    }

    write_content(node, out);
    write!(out, "</{}>", node.tag).unwrap();
}
