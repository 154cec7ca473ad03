use super::Chunk;
use crate::config::ChunkingConfig;
use crate::document::Node;
use crate::render::{RenderMode, Renderer};

/// Renders leaf nodes and splits their text into bounded chunks
pub struct ChunkBuilder<'r, R: Renderer> {
    renderer: &'r R,
    xml_mode: bool,
    max_text_length: usize,
    whitespace_normalize_text: bool,
}

impl<'r, R: Renderer> ChunkBuilder<'r, R> {
    pub fn new(renderer: &'r R, config: &ChunkingConfig) -> Self {
        Self {
            renderer,
            xml_mode: config.xml_mode,
            max_text_length: config.effective_max_text_length(),
            whitespace_normalize_text: config.whitespace_normalize_text,
        }
    }

    /// Render a node and split the text into consecutive windows
    ///
    /// Every window becomes a chunk carrying the node's tag, structure,
    /// raw form and locator. Empty text produces no chunks.
    pub fn build(&self, node: Node<'_>) -> Vec<Chunk> {
        let windows = split_text(&self.render(node), self.max_text_length);
        if windows.is_empty() {
            return vec![];
        }

        let template = self.chunk(node, String::new());
        windows
            .into_iter()
            .map(|text| Chunk {
                text,
                ..template.clone()
            })
            .collect()
    }

    /// Only the first window of a node, or None if it renders empty
    pub fn build_first(&self, node: Node<'_>) -> Option<Chunk> {
        let mut text = self.render(node);
        if text.is_empty() {
            return None;
        }
        if let Some((end, _)) = text.char_indices().nth(self.max_text_length) {
            text.truncate(end);
        }
        Some(self.chunk(node, text))
    }

    fn render(&self, node: Node<'_>) -> String {
        let mode = RenderMode::for_node(node, self.xml_mode);
        self.renderer
            .render(node, mode, self.whitespace_normalize_text)
    }

    fn chunk(&self, node: Node<'_>, text: String) -> Chunk {
        Chunk {
            tag: self.renderer.clean_tag(node),
            text,
            raw: self.renderer.raw(node),
            structure: node.structure().unwrap_or_default().to_string(),
            locator: self.renderer.locate(node),
            parent: None,
        }
    }

    pub fn max_text_length(&self) -> usize {
        self.max_text_length
    }
}

/// Split text into consecutive, non-overlapping windows of at most
/// `max_chars` characters; the last window may be shorter
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut windows = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == max_chars {
            windows.push(text[start..offset].to_string());
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        windows.push(text[start..].to_string());
    }

    windows
}
