mod error;
mod node;
mod reader;


pub use error::ParseError;
pub use node::{Child, Node};

/// Attribute holding the structure marker on DGML elements
pub const STRUCTURE_KEY: &str = "structure";

/// Structure marker value for list item markers (bullets, numbering)
pub const LIST_ITEM_MARKER: &str = "lim";

/// XHTML namespace, used by DGML for tables
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Local name of table elements (in the XHTML namespace)
pub const TABLE_LOCAL_NAME: &str = "table";

/// Well-known DGML namespace prefixes
pub const NAMESPACES: &[(&str, &str)] = &[
    ("docset", "http://www.docugami.com/2021/dgml/TaqiTest20231103/NDA"),
    (
        "addedChunks",
        "http://www.docugami.com/2021/dgml/TaqiTest20231103/NDA/addedChunks",
    ),
    ("dg", "http://www.docugami.com/2021/dgml"),
    ("dgc", "http://www.docugami.com/2021/dgml/docugami/contracts"),
    ("dgm", "http://www.docugami.com/2021/dgml/docugami/medical"),
    ("xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xhtml", XHTML_NS),
    ("cp", "http://classifyprocess.com/2018/07/"),
];

/// Namespace URI of a well-known DGML prefix
///
/// Used for prefixes that are never declared, as in fragments cut out of a
/// larger document.
pub fn well_known_namespace(prefix: &str) -> Option<&'static str> {
    NAMESPACES
        .iter()
        .find(|(known, _)| *known == prefix)
        .map(|(_, uri)| *uri)
}

/// Index of an element in the document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Storage for a single element
#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    /// Qualified name as written in the source (e.g., "dg:chunk")
    pub(crate) name: String,
    /// Resolved namespace URI, if any
    pub(crate) namespace: Option<String>,
    /// Attributes in source order, qualified names as written
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<Child>,
    pub(crate) parent: Option<NodeId>,
    /// Value of the structure attribute
    pub(crate) structure: Option<String>,
    /// True if any element below this one carries a structure marker
    pub(crate) has_structural_descendant: bool,
    /// True if any ancestor carries a structure marker
    pub(crate) inside_structural: bool,
}

/// Immutable, arena-backed element tree
///
/// Elements are stored in document (pre-order) order, so the root is always
/// the first entry of a non-empty document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<ElementData>,
}

impl Document {
    /// Parse DGML (or any well-formed XML) into a document
    pub fn parse(xml: &str) -> Result<Self, ParseError> {
        reader::read_document(xml)
    }

    /// The root element, or None for an empty document
    pub fn root(&self) -> Option<Node<'_>> {
        if self.elements.is_empty() {
            None
        } else {
            Some(Node::new(self, NodeId(0)))
        }
    }

    /// Get a view of the element with the given id
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node::new(self, id)
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True if any element in the document carries a structure marker
    pub fn has_structure(&self) -> bool {
        self.elements.iter().any(|e| e.structure.is_some())
    }

    /// Iterate all elements in document order
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.elements.len()).map(move |i| Node::new(self, NodeId(i)))
    }

    pub(crate) fn data(&self, id: NodeId) -> &ElementData {
        &self.elements[id.0]
    }
}

/// Mutable builder for assembling a document element by element
pub struct DocumentBuilder {
    elements: Vec<ElementData>,
    /// Currently open elements, innermost last
    open: Vec<NodeId>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Open a new element as the last child of the current one
    ///
    /// The namespace comes from the well-known DGML prefixes; use
    /// [`open_element_in`](Self::open_element_in) when it is already resolved.
    pub fn open_element<I, K, V>(&mut self, name: &str, attributes: I) -> Result<NodeId, ParseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let namespace = name
            .split_once(':')
            .and_then(|(prefix, _)| well_known_namespace(prefix))
            .map(str::to_string);
        self.open_element_in(name, namespace, attributes)
    }

    /// Open a new element with an already resolved namespace URI
    pub fn open_element_in<I, K, V>(
        &mut self,
        name: &str,
        namespace: Option<String>,
        attributes: I,
    ) -> Result<NodeId, ParseError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        if self.open.is_empty() && !self.elements.is_empty() {
            return Err(ParseError::MultipleRoots(name.to_string()));
        }

        let attributes: Vec<(String, String)> = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let structure = attributes
            .iter()
            .find(|(key, _)| key == STRUCTURE_KEY)
            .map(|(_, value)| value.clone());

        let id = NodeId(self.elements.len());
        let parent = self.open.last().copied();
        let mut inside_structural = false;
        if let Some(parent) = parent {
            let parent = &mut self.elements[parent.0];
            parent.children.push(Child::Element(id));
            inside_structural = parent.structure.is_some() || parent.inside_structural;
        }

        self.elements.push(ElementData {
            name: name.to_string(),
            namespace,
            attributes,
            children: Vec::new(),
            parent,
            structure,
            has_structural_descendant: false,
            inside_structural,
        });
        self.open.push(id);

        Ok(id)
    }

    /// Append text to the current element
    ///
    /// Text outside the root element is ignored.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let Some(&current) = self.open.last() else {
            return;
        };

        let children = &mut self.elements[current.0].children;
        if let Some(Child::Text(previous)) = children.last_mut() {
            previous.push_str(text);
        } else {
            children.push(Child::Text(text.to_string()));
        }
    }

    /// Close the current element, checking its name when one is given
    pub fn close_element(&mut self, name: Option<&str>) -> Result<NodeId, ParseError> {
        let id = self.open.pop().ok_or_else(|| {
            ParseError::UnexpectedClose(name.unwrap_or_default().to_string())
        })?;

        if let Some(found) = name {
            let expected = &self.elements[id.0].name;
            if expected != found {
                return Err(ParseError::MismatchedClose {
                    expected: expected.clone(),
                    found: found.to_string(),
                });
            }
        }

        let element = &self.elements[id.0];
        let marks_parent = element.structure.is_some() || element.has_structural_descendant;
        if let (Some(parent), true) = (element.parent, marks_parent) {
            self.elements[parent.0].has_structural_descendant = true;
        }

        Ok(id)
    }

    /// Build the immutable document
    pub fn build(self) -> Result<Document, ParseError> {
        if let Some(&open) = self.open.last() {
            return Err(ParseError::Unclosed(self.elements[open.0].name.clone()));
        }
        Ok(Document {
            elements: self.elements,
        })
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
