use super::{Document, ElementData, LIST_ITEM_MARKER, NodeId, TABLE_LOCAL_NAME, XHTML_NS};

/// A child of an element: either a nested element or a run of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Element(NodeId),
    Text(String),
}

/// Read-only view of one element in a document
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> Node<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    fn data(&self) -> &'a ElementData {
        self.doc.data(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Qualified name as written in the source (e.g., "xhtml:table")
    pub fn tag_name(&self) -> &'a str {
        &self.data().name
    }

    /// Name without its namespace prefix
    pub fn local_name(&self) -> &'a str {
        let name = self.tag_name();
        name.split_once(':').map(|(_, local)| local).unwrap_or(name)
    }

    /// Prefix part of the qualified name, if any
    pub fn prefix(&self) -> Option<&'a str> {
        self.tag_name().split_once(':').map(|(prefix, _)| prefix)
    }

    /// Resolved namespace URI
    pub fn namespace(&self) -> Option<&'a str> {
        self.data().namespace.as_deref()
    }

    /// Attributes in source order
    pub fn attributes(&self) -> &'a [(String, String)] {
        &self.data().attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Structure marker value, if this element carries one
    pub fn structure(&self) -> Option<&'a str> {
        self.data().structure.as_deref()
    }

    pub fn is_structural(&self) -> bool {
        self.data().structure.is_some()
    }

    /// True if any element below this one (at any depth) carries a structure marker
    pub fn has_structural_descendant(&self) -> bool {
        self.data().has_structural_descendant
    }

    /// True if any ancestor carries a structure marker
    pub fn is_descendant_of_structural(&self) -> bool {
        self.data().inside_structural
    }

    /// True for list item markers, whose chunks always merge forward
    pub fn is_list_item_marker(&self) -> bool {
        self.structure() == Some(LIST_ITEM_MARKER)
    }

    /// True for XHTML tables
    pub fn is_table(&self) -> bool {
        self.local_name() == TABLE_LOCAL_NAME && self.namespace() == Some(XHTML_NS)
    }

    /// Mixed content children in document order
    pub fn children(&self) -> &'a [Child] {
        &self.data().children
    }

    /// Element children in document order
    pub fn element_children(&self) -> impl DoubleEndedIterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        self.data().children.iter().filter_map(move |child| match child {
            Child::Element(id) => Some(Node::new(doc, *id)),
            Child::Text(_) => None,
        })
    }

    /// Elements below this one, in document order
    pub fn descendants(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let mut stack: Vec<Node<'a>> = self.element_children().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.element_children().rev());
            Some(node)
        })
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node::new(self.doc, id))
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let mut current = self.parent();
        std::iter::from_fn(move || {
            let node = current?;
            current = node.parent();
            Some(node)
        })
    }

    /// The ancestor `n` levels up, clipped at the root
    ///
    /// `ancestor(0)` is the node itself.
    pub fn ancestor(&self, n: usize) -> Node<'a> {
        let mut node = *self;
        for _ in 0..n {
            match node.parent() {
                Some(parent) => node = parent,
                None => break,
            }
        }
        node
    }

    /// Number of ancestors (0 for the root)
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Descendant text runs in document order
    pub fn text_pieces(&self) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut stack: Vec<&'a [Child]> = vec![self.children()];

        while let Some(children) = stack.pop() {
            let Some((first, rest)) = children.split_first() else {
                continue;
            };
            stack.push(rest);
            match first {
                Child::Text(text) => pieces.push(text.as_str()),
                Child::Element(id) => stack.push(self.doc.node(*id).children()),
            }
        }

        pieces
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.tag_name())
            .field("structure", &self.structure())
            .finish()
    }
}
