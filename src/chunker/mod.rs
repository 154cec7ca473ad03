mod classify;
mod context;
mod merge;
mod splitter;
mod traverse;


pub use classify::{Classification, LeafClassifier};
pub use context::{AncestorResolver, WINDOW_TAG, attach_neighbor_windows};
pub use merge::SmallChunkMerger;
pub use splitter::{ChunkBuilder, split_text};
pub use traverse::{get_chunks, get_chunks_str, get_chunks_with};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A bounded piece of document text ready for indexing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Element name without namespace prefix
    pub tag: String,
    /// Chunk text (never longer than the configured maximum)
    pub text: String,
    /// Serialized XML of the source element
    pub raw: String,
    /// Structure marker of the source element, empty if none
    pub structure: String,
    /// Path of the source element within the document
    pub locator: String,
    /// Context chunk: a rendered ancestor, or a window of neighbouring chunks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Arc<Chunk>>,
}

impl Chunk {
    /// Text length in characters
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}
