use super::escape;
use crate::dom::{ContainerKind, ContainerNode, DomNode};

/// Render the tree below `root` as HTML.
///
/// Depth-first; every container renders as its canonical tag, the root renders only its
/// children, and links carry a single `href` attribute.
pub fn to_html(root: &ContainerNode) -> String {
    let mut out = String::new();
    write_container(root, &mut out);
    out
}

fn write_container(container: &ContainerNode, out: &mut String) {
    match &container.kind {
        ContainerKind::Generic => write_children(&container.children, out),
        ContainerKind::Link(url) => {
            out.push_str("<a href=\"");
            escape(url, out);
            out.push_str("\">");
            write_children(&container.children, out);
            out.push_str("</a>");
        }
        kind => {
            let tag = kind.tag();
            out.push('<');
            out.push_str(tag);
            out.push('>');
            write_children(&container.children, out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn write_children(children: &[DomNode], out: &mut String) {
    for child in children {
        match child {
            DomNode::Container(container) => write_container(container, out),
            DomNode::Text(text) => escape(text, out),
        }
    }
}
