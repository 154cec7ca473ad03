use super::{Chunk, split_text};
use tracing::trace;

/// Carries undersized and list-marker chunks forward into the next chunk
///
/// Holds at most one pending chunk for the whole traversal. Text is only
/// ever concatenated, never dropped; if a merge grows a chunk past the
/// maximum, the full-size leading windows are emitted and only the tail is
/// considered for holding.
#[derive(Debug)]
pub struct SmallChunkMerger {
    min_text_length: usize,
    max_text_length: usize,
    pending: Option<Chunk>,
    emitted: Vec<Chunk>,
}

impl SmallChunkMerger {
    pub fn new(min_text_length: usize, max_text_length: usize) -> Self {
        Self {
            min_text_length,
            max_text_length: max_text_length.max(1),
            pending: None,
            emitted: Vec::new(),
        }
    }

    /// Feed the next provisional chunk in document order
    pub fn push(&mut self, mut chunk: Chunk, force_merge: bool) {
        if let Some(pending) = self.pending.take() {
            // The current chunk keeps its own metadata
            chunk.text = pending.text + &chunk.text;
        }

        if chunk.text_len() > self.max_text_length {
            let mut windows = split_text(&chunk.text, self.max_text_length);
            let tail = windows.pop().unwrap_or_default();
            for text in windows {
                self.emitted.push(Chunk {
                    text,
                    ..chunk.clone()
                });
            }
            chunk.text = tail;
        }

        if chunk.text_len() < self.min_text_length || force_merge {
            trace!(
                locator = %chunk.locator,
                len = chunk.text_len(),
                force_merge,
                "holding chunk for forward merge"
            );
            self.pending = Some(chunk);
        } else {
            self.emitted.push(chunk);
        }
    }

    /// Chunk currently held for merging, if any
    pub fn pending(&self) -> Option<&Chunk> {
        self.pending.as_ref()
    }

    /// Chunks emitted so far
    pub fn emitted(&self) -> &[Chunk] {
        &self.emitted
    }

    /// Flush the pending chunk (even if short) and return all chunks
    pub fn finish(mut self) -> Vec<Chunk> {
        if let Some(pending) = self.pending.take() {
            self.emitted.push(pending);
        }
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, locator: &str) -> Chunk {
        Chunk {
            tag: "p".to_string(),
            text: text.to_string(),
            raw: String::new(),
            structure: "p".to_string(),
            locator: locator.to_string(),
            parent: None,
        }
    }

    #[test]
    fn test_long_chunk_emitted_immediately() {
        let mut merger = SmallChunkMerger::new(8, 100);
        merger.push(chunk("long enough text", "/a"), false);

        assert_eq!(merger.emitted().len(), 1);
        assert!(merger.pending().is_none());
    }

    #[test]
    fn test_short_chunk_held_then_prepended() {
        let mut merger = SmallChunkMerger::new(8, 100);
        merger.push(chunk("Hi. ", "/a"), false);

        assert!(merger.emitted().is_empty());
        assert_eq!(merger.pending().map(|c| c.text.as_str()), Some("Hi. "));

        merger.push(chunk("Second paragraph", "/b"), false);
        let chunks = merger.finish();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hi. Second paragraph");
        // Metadata comes from the later chunk
        assert_eq!(chunks[0].locator, "/b");
    }

    #[test]
    fn test_short_chunks_accumulate() {
        let mut merger = SmallChunkMerger::new(8, 100);
        merger.push(chunk("ab", "/a"), false);
        merger.push(chunk("cd", "/b"), false);
        merger.push(chunk("ef", "/c"), false);
        merger.push(chunk("gh", "/d"), false);

        let chunks = merger.finish();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "abcdefgh");
        assert_eq!(chunks[0].locator, "/d");
    }

    #[test]
    fn test_force_merge_held_regardless_of_length() {
        let mut merger = SmallChunkMerger::new(8, 100);
        merger.push(chunk(&"x".repeat(50), "/lim"), true);

        assert!(merger.emitted().is_empty());
        assert!(merger.pending().is_some());
    }

    #[test]
    fn test_pending_flushed_at_finish() {
        let mut merger = SmallChunkMerger::new(8, 100);
        merger.push(chunk("long enough text", "/a"), false);
        merger.push(chunk("tiny", "/b"), false);

        let chunks = merger.finish();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].text, "tiny");
    }

    #[test]
    fn test_merge_overflow_is_resplit() {
        let mut merger = SmallChunkMerger::new(8, 10);
        merger.push(chunk("abc", "/a"), false);
        merger.push(chunk("0123456789", "/b"), false);

        let chunks = merger.finish();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abc0123456", "789"]);
        assert!(chunks.iter().all(|c| c.text_len() <= 10));
    }

    #[test]
    fn test_merge_overflow_tail_stays_pending_when_short() {
        let mut merger = SmallChunkMerger::new(8, 10);
        merger.push(chunk("abc", "/a"), false);
        merger.push(chunk("0123456789", "/b"), false);

        assert_eq!(merger.emitted().len(), 1);
        assert_eq!(merger.pending().map(|c| c.text.as_str()), Some("789"));
    }
}
