use super::{
    AncestorResolver, Chunk, ChunkBuilder, Classification, LeafClassifier, SmallChunkMerger,
    attach_neighbor_windows,
};
use crate::config::ChunkingConfig;
use crate::document::{Document, Node, NodeId, ParseError};
use crate::render::{DgmlRenderer, Renderer};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Chunk a document with the default DGML renderer
pub fn get_chunks(doc: &Document, config: &ChunkingConfig) -> Vec<Chunk> {
    get_chunks_with(doc, config, &DgmlRenderer)
}

/// Parse an XML string and chunk it
pub fn get_chunks_str(xml: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, ParseError> {
    let doc = Document::parse(xml)?;
    Ok(get_chunks(&doc, config))
}

/// Chunk a document with a custom renderer
///
/// The walk is pre-order over elements. Leaves are rendered, split and fed
/// through a single merger in document order; branches emit nothing
/// themselves.
pub fn get_chunks_with<R: Renderer>(doc: &Document, config: &ChunkingConfig, renderer: &R) -> Vec<Chunk> {
    let Some(root) = doc.root() else {
        return vec![];
    };

    let mut traversal = Traversal::new(renderer, config);

    if config.whole_document_fallback && !doc.has_structure() {
        debug!(
            elements = doc.len(),
            "no structure markers, chunking the whole document as one leaf"
        );
        traversal.visit_leaf(root);
    } else {
        traversal.walk(root);
    }

    traversal.finish()
}

/// State threaded through one traversal
struct Traversal<'r, R: Renderer> {
    classifier: LeafClassifier,
    builder: ChunkBuilder<'r, R>,
    resolver: AncestorResolver,
    merger: SmallChunkMerger,
    /// Ancestor contexts already rendered, shared by every leaf below them
    contexts: HashMap<NodeId, Option<Arc<Chunk>>>,
    xml_mode: bool,
    parent_hierarchy_levels: usize,
    leaves: usize,
}

impl<'r, R: Renderer> Traversal<'r, R> {
    fn new(renderer: &'r R, config: &ChunkingConfig) -> Self {
        let max_text_length = config.effective_max_text_length();
        Self {
            classifier: LeafClassifier::new(config.sub_chunk_tables),
            builder: ChunkBuilder::new(renderer, config),
            resolver: AncestorResolver::new(config.parent_hierarchy_levels),
            merger: SmallChunkMerger::new(config.min_text_length, max_text_length),
            contexts: HashMap::new(),
            xml_mode: config.xml_mode,
            parent_hierarchy_levels: config.parent_hierarchy_levels,
            leaves: 0,
        }
    }

    /// Pre-order walk with an explicit stack
    fn walk(&mut self, root: Node<'_>) {
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            match self.classifier.classify(node) {
                Classification::Leaf => self.visit_leaf(node),
                Classification::Branch => stack.extend(node.element_children().rev()),
            }
        }
    }

    fn visit_leaf(&mut self, node: Node<'_>) {
        self.leaves += 1;

        let sub_chunks = self.builder.build(node);
        if sub_chunks.is_empty() {
            return;
        }

        // Neighbour windows are attached once the output order is final
        let parent = if self.xml_mode {
            self.context(node)
        } else {
            None
        };

        let force_merge = self.classifier.is_force_merge(node);
        for mut chunk in sub_chunks {
            chunk.parent = parent.clone();
            self.merger.push(chunk, force_merge);
        }
    }

    fn context(&mut self, node: Node<'_>) -> Option<Arc<Chunk>> {
        let ancestor = self.resolver.ancestor(node)?;
        let (resolver, builder) = (&self.resolver, &self.builder);
        self.contexts
            .entry(ancestor.id())
            .or_insert_with(|| resolver.resolve(builder, node))
            .clone()
    }

    fn finish(self) -> Vec<Chunk> {
        let mut chunks = self.merger.finish();

        if !self.xml_mode && self.parent_hierarchy_levels > 0 {
            attach_neighbor_windows(
                &mut chunks,
                self.parent_hierarchy_levels,
                self.builder.max_text_length(),
            );
        }

        debug!(
            leaves = self.leaves,
            contexts = self.contexts.len(),
            chunks = chunks.len(),
            "chunked document"
        );
        chunks
    }
}
