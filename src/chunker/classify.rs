use crate::document::Node;

/// Outcome of classifying a node during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Stop descending and emit chunks for this node
    Leaf,
    /// Recurse into element children
    Branch,
}

/// Decides where the traversal stops
///
/// Classification only looks at structure markers in the node, its
/// ancestors and its subtree, never at text length.
#[derive(Debug, Clone, Copy)]
pub struct LeafClassifier {
    sub_chunk_tables: bool,
}

impl LeafClassifier {
    pub fn new(sub_chunk_tables: bool) -> Self {
        Self { sub_chunk_tables }
    }

    pub fn classify(&self, node: Node<'_>) -> Classification {
        let is_table_leaf = node.is_table() && !self.sub_chunk_tables;

        // Innermost structural unit
        let is_text_leaf = node.is_structural() && !node.has_structural_descendant();

        // Unmarked element inside a structural unit, next to marked siblings
        let is_orphan = !node.has_structural_descendant() && node.is_descendant_of_structural();

        if is_table_leaf || is_text_leaf || is_orphan {
            Classification::Leaf
        } else {
            Classification::Branch
        }
    }

    /// True if the node's chunks must always merge into what follows
    pub fn is_force_merge(&self, node: Node<'_>) -> bool {
        node.is_list_item_marker()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    const XHTML: &str = r#"xmlns:xhtml="http://www.w3.org/1999/xhtml""#;

    fn classify_all(xml: &str, sub_chunk_tables: bool) -> Vec<(String, Classification)> {
        let doc = Document::parse(xml).unwrap();
        let classifier = LeafClassifier::new(sub_chunk_tables);
        doc.nodes()
            .map(|n| (n.tag_name().to_string(), classifier.classify(n)))
            .collect()
    }

    #[test]
    fn test_structural_leaf() {
        let result = classify_all(r#"<doc><p structure="p">x</p></doc>"#, false);
        assert_eq!(result[0].1, Classification::Branch);
        assert_eq!(result[1].1, Classification::Leaf);
    }

    #[test]
    fn test_structural_with_marked_descendant_is_branch() {
        let result = classify_all(
            r#"<doc><sec structure="div"><p structure="p">x</p><note>y</note></sec></doc>"#,
            false,
        );
        assert_eq!(result[1], ("sec".to_string(), Classification::Branch));
        assert_eq!(result[2], ("p".to_string(), Classification::Leaf));
        // Orphan next to a structural sibling
        assert_eq!(result[3], ("note".to_string(), Classification::Leaf));
    }

    #[test]
    fn test_unmarked_outside_structure_is_branch() {
        let result = classify_all(r#"<doc><wrapper><p structure="p">x</p></wrapper><loose/></doc>"#, false);
        assert_eq!(result[1].1, Classification::Branch);
        // Not inside any structural unit
        assert_eq!(result[3], ("loose".to_string(), Classification::Branch));
    }

    #[test]
    fn test_table_leaf_depends_on_sub_chunking() {
        let xml = format!(
            r#"<doc {}><xhtml:table><xhtml:tr><xhtml:td structure="p">a</xhtml:td></xhtml:tr></xhtml:table></doc>"#,
            XHTML
        );

        let whole = classify_all(&xml, false);
        assert_eq!(whole[1], ("xhtml:table".to_string(), Classification::Leaf));

        let split = classify_all(&xml, true);
        assert_eq!(split[1].1, Classification::Branch);
        assert_eq!(split[3], ("xhtml:td".to_string(), Classification::Leaf));
    }

    #[test]
    fn test_force_merge_marker() {
        let doc = Document::parse(r#"<l><m structure="lim">1.</m><p structure="p">x</p></l>"#).unwrap();
        let classifier = LeafClassifier::new(false);
        let flags: Vec<bool> = doc.nodes().map(|n| classifier.is_force_merge(n)).collect();

        assert_eq!(flags, vec![false, true, false]);
    }
}
