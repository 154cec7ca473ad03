// Public API exports
pub mod chunker;
pub mod config;
pub mod corpus;
pub mod document;
pub mod render;

// Re-export main types for convenience
pub use document::{Document, DocumentBuilder, Node, NodeId, ParseError};

pub use render::{DgmlRenderer, RenderMode, Renderer};

pub use chunker::{
    Chunk, ChunkBuilder, Classification, LeafClassifier, SmallChunkMerger, get_chunks,
    get_chunks_str, get_chunks_with,
};

pub use config::{ChunkingConfig, ConfigError};
