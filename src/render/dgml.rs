use super::{Renderer, normalize_whitespace};
use crate::document::{Child, Node};
use quick_xml::escape::{escape, partial_escape};
use std::collections::BTreeSet;

/// Default renderer for DGML documents
#[derive(Debug, Clone, Copy, Default)]
pub struct DgmlRenderer;

impl Renderer for DgmlRenderer {
    fn render_full(&self, node: Node<'_>, normalize: bool) -> String {
        serialize(node, Style::Simplified { normalize })
    }

    fn render_table(&self, node: Node<'_>, normalize: bool) -> String {
        let rows: Vec<String> = node
            .descendants()
            .filter(|n| n.local_name() == "tr")
            .map(|row| {
                row.element_children()
                    .filter(|cell| matches!(cell.local_name(), "td" | "th"))
                    .map(|cell| self.render_plain(cell, normalize))
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect();

        if rows.is_empty() {
            // Not a row/cell table, treat as plain text
            return self.render_plain(node, normalize);
        }

        rows.join("\n")
    }

    /// Descendant text in document order
    ///
    /// When normalizing, text runs are joined with a space before whitespace
    /// is collapsed, so inline markup inside a word splits it
    /// (`Hel<b>lo</b>` becomes `Hel lo`). Without normalization the runs are
    /// concatenated as written.
    fn render_plain(&self, node: Node<'_>, normalize: bool) -> String {
        let pieces = node.text_pieces();
        if normalize {
            normalize_whitespace(&pieces.join(" "))
        } else {
            pieces.concat()
        }
    }

    fn raw(&self, node: Node<'_>) -> String {
        serialize(node, Style::Raw)
    }

    fn locate(&self, node: Node<'_>) -> String {
        super::locate(node)
    }

    fn clean_tag(&self, node: Node<'_>) -> String {
        node.local_name().to_string()
    }
}

#[derive(Clone, Copy)]
enum Style {
    /// Qualified names, attributes and text exactly as parsed
    Raw,
    /// Local names only, no attributes
    Simplified { normalize: bool },
}

enum Frame<'a> {
    Enter(Node<'a>),
    Text(&'a str),
    Leave(&'a str),
}

/// Serialize a subtree without recursion
fn serialize(top: Node<'_>, style: Style) -> String {
    let mut out = String::new();
    let mut stack = vec![Frame::Enter(top)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(node) => {
                let name = match style {
                    Style::Raw => node.tag_name(),
                    Style::Simplified { .. } => node.local_name(),
                };

                out.push('<');
                out.push_str(name);
                if let Style::Raw = style {
                    for (key, value) in node.attributes() {
                        push_attribute(&mut out, key, value);
                    }
                    if node == top {
                        for (key, value) in inherited_namespaces(top) {
                            push_attribute(&mut out, &key, &value);
                        }
                    }
                }

                let children = node.children();
                if children.iter().all(|child| is_dropped(child, style)) {
                    out.push_str("/>");
                    continue;
                }

                out.push('>');
                stack.push(Frame::Leave(name));
                for child in children.iter().rev() {
                    match child {
                        Child::Element(id) => stack.push(Frame::Enter(node.document().node(*id))),
                        Child::Text(text) => stack.push(Frame::Text(text.as_str())),
                    }
                }
            }
            Frame::Text(text) => match style {
                Style::Simplified { normalize: true } => {
                    if !text.trim().is_empty() {
                        out.push_str(&partial_escape(&collapse_whitespace(text)));
                    }
                }
                _ => out.push_str(&partial_escape(text)),
            },
            Frame::Leave(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }

    out
}

fn is_dropped(child: &Child, style: Style) -> bool {
    match (child, style) {
        (Child::Text(text), Style::Simplified { normalize: true }) => text.trim().is_empty(),
        _ => false,
    }
}

fn push_attribute(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

/// Collapse whitespace runs to one space, keeping a single space at either end
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Namespace declarations from ancestors that the subtree relies on and
/// does not declare at its top
fn inherited_namespaces(top: Node<'_>) -> Vec<(String, String)> {
    let mut used: BTreeSet<Option<&str>> = BTreeSet::new();
    for node in std::iter::once(top).chain(top.descendants()) {
        used.insert(node.prefix());
        for (key, _) in node.attributes() {
            if let Some((prefix, _)) = key.split_once(':') {
                if prefix != "xmlns" && prefix != "xml" {
                    used.insert(Some(prefix));
                }
            }
        }
    }

    used.into_iter()
        .filter_map(|prefix| {
            let key = match prefix {
                Some(p) => format!("xmlns:{}", p),
                None => "xmlns".to_string(),
            };
            if top.attribute(&key).is_some() {
                return None;
            }
            top.ancestors()
                .find_map(|a| a.attribute(&key))
                .map(|uri| (key, uri.to_string()))
        })
        .collect()
}
