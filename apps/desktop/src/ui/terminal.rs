//! Plain-text layout of view nodes for the terminal front end.

use crate::ui::{
    render::is_removal_control,
    view::{Element, Node},
};

const INDENT: &str = "  ";

/// One line per block element, nested blocks indented.
pub fn layout(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_block(node, 0, &mut out);
    }
    out
}

fn write_block(node: &Node, depth: usize, out: &mut String) {
    match node {
        Node::Element(element) if is_container(element) => {
            for child in &element.children {
                write_block(child, depth + 1, out);
            }
        }
        _ => {
            let mut line = String::new();
            write_inline(node, &mut line);
            let line = line.trim();
            if line.is_empty() {
                return;
            }
            out.push_str(&INDENT.repeat(depth.saturating_sub(1)));
            if matches!(node, Node::Element(element) if element.tag == "li") {
                out.push_str("- ");
            }
            out.push_str(line);
            out.push('\n');
        }
    }
}

fn write_inline(node: &Node, line: &mut String) {
    match node {
        Node::Element(element) if is_removal_control(element) => {
            line.push_str(if element.is_disabled() { " [...]" } else { " [x]" });
        }
        Node::Element(element) => {
            for child in &element.children {
                write_inline(child, line);
            }
        }
        text => line.push_str(&text.text_content()),
    }
}

fn is_container(element: &Element) -> bool {
    matches!(element.tag, "div" | "ul" | "select")
}
