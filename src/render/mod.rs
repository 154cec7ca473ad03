mod dgml;
mod locator;


pub use dgml::DgmlRenderer;
pub use locator::locate;

use crate::document::Node;

/// How a node is turned into chunk text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Simplified XML of the whole subtree
    Full,
    /// Row/cell flattening for tables
    Table,
    /// Descendant text only
    Plain,
}

impl RenderMode {
    /// Pick the mode for a node: full structure in xml mode, otherwise
    /// table flattening for tables and plain text for everything else
    pub fn for_node(node: Node<'_>, xml_mode: bool) -> Self {
        if xml_mode {
            RenderMode::Full
        } else if node.is_table() {
            RenderMode::Table
        } else {
            RenderMode::Plain
        }
    }
}

/// Capabilities the chunker needs to turn nodes into chunk fields
pub trait Renderer {
    /// Serialize the subtree with structure kept (simplified XML)
    fn render_full(&self, node: Node<'_>, normalize: bool) -> String;

    /// Flatten a table into text
    fn render_table(&self, node: Node<'_>, normalize: bool) -> String;

    /// Extract descendant text
    fn render_plain(&self, node: Node<'_>, normalize: bool) -> String;

    /// Faithful serialized form of the node
    fn raw(&self, node: Node<'_>) -> String;

    /// Stable path of the node within its document
    fn locate(&self, node: Node<'_>) -> String;

    /// Display label for the node (namespace stripped)
    fn clean_tag(&self, node: Node<'_>) -> String;

    /// Render using exactly one mode
    fn render(&self, node: Node<'_>, mode: RenderMode, normalize: bool) -> String {
        match mode {
            RenderMode::Full => self.render_full(node, normalize),
            RenderMode::Table => self.render_table(node, normalize),
            RenderMode::Plain => self.render_plain(node, normalize),
        }
    }
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
