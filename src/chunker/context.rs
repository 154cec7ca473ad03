use super::{Chunk, ChunkBuilder, split_text};
use crate::document::Node;
use crate::render::Renderer;
use std::sync::Arc;

/// Tag given to synthesized neighbour-window context chunks
pub const WINDOW_TAG: &str = "window";

/// Attaches a fixed-depth ancestor as context in hierarchy mode
#[derive(Debug, Clone, Copy)]
pub struct AncestorResolver {
    levels: usize,
}

impl AncestorResolver {
    pub fn new(levels: usize) -> Self {
        Self { levels }
    }

    /// The ancestor `levels` up (clipped at the root), None when disabled
    pub fn ancestor<'a>(&self, node: Node<'a>) -> Option<Node<'a>> {
        (self.levels > 0).then(|| node.ancestor(self.levels))
    }

    /// Context chunk for a leaf: the first slice of its ancestor
    ///
    /// Ancestors longer than the maximum are truncated to their first slice.
    /// Returns None when disabled or when the ancestor renders empty.
    pub fn resolve<R: Renderer>(&self, builder: &ChunkBuilder<'_, R>, node: Node<'_>) -> Option<Arc<Chunk>> {
        let ancestor = self.ancestor(node)?;
        builder.build_first(ancestor).map(Arc::new)
    }
}

/// Give every chunk a context made of its neighbours in output order
///
/// The window spans `radius` chunks before and after each chunk (clipped at
/// both ends). Its text is the window's texts in order, cut to the first
/// `max_text_length` characters.
pub fn attach_neighbor_windows(chunks: &mut [Chunk], radius: usize, max_text_length: usize) {
    if radius == 0 {
        return;
    }

    let contexts: Vec<Arc<Chunk>> = (0..chunks.len())
        .map(|i| {
            let start = i.saturating_sub(radius);
            let end = (i + radius + 1).min(chunks.len());
            let window = &chunks[start..end];

            let text: String = window.iter().map(|c| c.text.as_str()).collect();
            let raw: String = window.iter().map(|c| c.raw.as_str()).collect();

            Arc::new(Chunk {
                tag: WINDOW_TAG.to_string(),
                text: split_text(&text, max_text_length)
                    .into_iter()
                    .next()
                    .unwrap_or_default(),
                raw,
                structure: String::new(),
                locator: chunks[i].locator.clone(),
                parent: None,
            })
        })
        .collect();

    for (chunk, context) in chunks.iter_mut().zip(contexts) {
        chunk.parent = Some(context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingConfig;
    use crate::document::Document;
    use crate::render::DgmlRenderer;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            tag: "p".to_string(),
            text: text.to_string(),
            raw: format!("<p>{}</p>", text),
            structure: "p".to_string(),
            locator: format!("/p/{}", text),
            parent: None,
        }
    }

    #[test]
    fn test_resolver_disabled() {
        let doc = Document::parse(r#"<doc><p structure="p">text</p></doc>"#).unwrap();
        let config = ChunkingConfig::default();
        let builder = ChunkBuilder::new(&DgmlRenderer, &config);
        let p = doc.nodes().nth(1).unwrap();

        assert!(AncestorResolver::new(0).resolve(&builder, p).is_none());
    }

    #[test]
    fn test_resolver_climbs_levels() {
        let doc = Document::parse(r#"<doc><sec structure="div"><p structure="p">text</p></sec></doc>"#).unwrap();
        let config = ChunkingConfig::default();
        let builder = ChunkBuilder::new(&DgmlRenderer, &config);
        let p = doc.nodes().nth(2).unwrap();

        let one = AncestorResolver::new(1).resolve(&builder, p).unwrap();
        assert_eq!(one.tag, "sec");
        assert_eq!(one.text, "<sec><p>text</p></sec>");

        let clipped = AncestorResolver::new(99).resolve(&builder, p).unwrap();
        assert_eq!(clipped.tag, "doc");
    }

    #[test]
    fn test_resolver_keeps_first_slice_only() {
        let body = "y".repeat(40);
        let xml = format!(r#"<doc><p structure="p">{}</p></doc>"#, body);
        let doc = Document::parse(&xml).unwrap();
        let config = ChunkingConfig::default().max_text_length(16);
        let builder = ChunkBuilder::new(&DgmlRenderer, &config);
        let p = doc.nodes().nth(1).unwrap();

        let context = AncestorResolver::new(1).resolve(&builder, p).unwrap();
        assert_eq!(context.text, "<doc><p>yyyyyyyy");
    }

    #[test]
    fn test_neighbor_windows() {
        let mut chunks = vec![chunk("a"), chunk("b"), chunk("c"), chunk("d")];
        attach_neighbor_windows(&mut chunks, 1, 100);

        let contexts: Vec<&str> = chunks
            .iter()
            .map(|c| c.parent.as_ref().map(|p| p.text.as_str()).unwrap_or(""))
            .collect();
        assert_eq!(contexts, vec!["ab", "abc", "bcd", "cd"]);

        let second = chunks[1].parent.as_ref().unwrap();
        assert_eq!(second.tag, WINDOW_TAG);
        assert_eq!(second.locator, "/p/b");
        assert!(second.parent.is_none());
    }

    #[test]
    fn test_neighbor_windows_clipped_to_max() {
        let mut chunks = vec![chunk("aaaa"), chunk("bbbb"), chunk("cccc")];
        attach_neighbor_windows(&mut chunks, 1, 6);

        assert_eq!(chunks[1].parent.as_ref().unwrap().text, "aaaabb");
    }

    #[test]
    fn test_neighbor_windows_disabled() {
        let mut chunks = vec![chunk("a"), chunk("b")];
        attach_neighbor_windows(&mut chunks, 0, 100);

        assert!(chunks.iter().all(|c| c.parent.is_none()));
    }
}
