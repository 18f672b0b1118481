//! Overlapping fixed-size chunking along semantic boundaries

use unicode_segmentation::UnicodeSegmentation;

/// A bounded span of normalized text, the atomic retrieval unit
///
/// Chunks have no identity beyond their sequence position and text.
/// `start`/`end` are byte offsets into the chunked text.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Sequence position within the corpus
    pub seq: u32,
    /// Text span
    pub text: String,
    /// Byte offset of the span start
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
}

/// Text chunker with configurable size and overlap
///
/// Paragraph breaks are hard split points. Within a paragraph, split points
/// are chosen at the highest-priority boundary available inside the target
/// window: sentence boundary, then whitespace, then an arbitrary character
/// boundary. Each chunk after the first within a paragraph overlaps the
/// previous chunk's tail by approximately the configured overlap.
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap: overlap.min(chunk_size.saturating_sub(1)),
        }
    }

    /// Split text into ordered, overlapping chunks
    ///
    /// Concatenating the chunks while de-duplicating the overlapped spans
    /// reconstructs the input exactly. Input shorter than the target size
    /// yields exactly one chunk.
    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        if text.trim().is_empty() {
            return chunks;
        }

        let mut seq = 0u32;
        // Paragraph segments keep their trailing separator so that the
        // chunk spans cover the input without gaps.
        let mut seg_start = 0usize;
        while seg_start < text.len() {
            let seg_end = match text[seg_start..].find("\n\n") {
                Some(pos) => seg_start + pos + 2,
                None => text.len(),
            };
            self.chunk_segment(text, seg_start, seg_end, &mut seq, &mut chunks);
            seg_start = seg_end;
        }

        chunks
    }

    /// Chunk one paragraph segment `text[seg_start..seg_end]`
    fn chunk_segment(
        &self,
        text: &str,
        seg_start: usize,
        seg_end: usize,
        seq: &mut u32,
        chunks: &mut Vec<Chunk>,
    ) {
        let mut start = seg_start;

        while start < seg_end {
            if seg_end - start <= self.chunk_size {
                chunks.push(Chunk {
                    seq: *seq,
                    text: text[start..seg_end].to_string(),
                    start,
                    end: seg_end,
                });
                *seq += 1;
                break;
            }

            let mut hard_end = start + self.chunk_size;
            while !text.is_char_boundary(hard_end) {
                hard_end -= 1;
            }

            let split = self.split_point(text, start, hard_end);
            chunks.push(Chunk {
                seq: *seq,
                text: text[start..split].to_string(),
                start,
                end: split,
            });
            *seq += 1;

            // Back up by the overlap so the next chunk repeats this one's tail.
            let mut next = split.saturating_sub(self.overlap).max(start + 1);
            while next < text.len() && !text.is_char_boundary(next) {
                next += 1;
            }
            start = next;
        }
    }

    /// Choose the best split point in `text[start..hard_end]`
    ///
    /// Prefers the latest sentence boundary, then the latest whitespace
    /// boundary, falling back to the hard window end. A boundary is only
    /// accepted if it leaves the chunk long enough to make forward progress
    /// past the overlap.
    fn split_point(&self, text: &str, start: usize, hard_end: usize) -> usize {
        let window = &text[start..hard_end];
        let min_len = (self.chunk_size / 2).max(self.overlap + 1).min(window.len());

        let mut sentence_cut = None;
        for (offset, _) in window.split_sentence_bound_indices() {
            if offset >= min_len && offset < window.len() {
                sentence_cut = Some(offset);
            }
        }
        if let Some(cut) = sentence_cut {
            return start + cut;
        }

        if let Some(pos) = window.rfind(char::is_whitespace) {
            let cut = pos + window[pos..].chars().next().map_or(1, char::len_utf8);
            if cut >= min_len {
                return start + cut;
            }
        }

        hard_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reconstruct the original text from chunks by dropping overlapped spans
    fn reconstruct(chunks: &[Chunk]) -> String {
        let mut out = String::new();
        let mut covered = 0usize;
        for chunk in chunks {
            assert!(chunk.start <= covered, "gap before chunk {}", chunk.seq);
            let skip = covered - chunk.start;
            out.push_str(&chunk.text[skip..]);
            covered = chunk.end;
        }
        out
    }

    fn sample_text() -> String {
        let mut text = String::new();
        for i in 0..12 {
            text.push_str(&format!(
                "Sentence number {i} talks about retrieval. It keeps going with more words \
                 so the paragraph grows well past a single chunk window. "
            ));
        }
        text.push_str("\n\nA short closing paragraph.");
        text
    }

    #[test]
    fn short_text_yields_single_chunk() {
        let chunker = TextChunker::new(500, 100);
        let chunks = chunker.chunk_text("Water boils at 100 degrees at sea level.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].seq, 0);
        assert_eq!(chunks[0].text, "Water boils at 100 degrees at sea level.");
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(500, 100);
        assert!(chunker.chunk_text("").is_empty());
        assert!(chunker.chunk_text("   \n  ").is_empty());
    }

    #[test]
    fn paragraphs_split_into_separate_chunks() {
        let chunker = TextChunker::new(500, 100);
        let chunks = chunker.chunk_text(
            "Water boils at 100 degrees at sea level.\n\nThe capital of France is Paris.",
        );
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.contains("Water boils"));
        assert!(chunks[1].text.contains("Paris"));
    }

    #[test]
    fn chunks_respect_target_size() {
        let chunker = TextChunker::new(200, 40);
        let text = sample_text();
        let chunks = chunker.chunk_text(&text);
        assert!(chunks.len() > 2);
        for chunk in &chunks {
            assert!(
                chunk.text.len() <= 200,
                "chunk {} has {} bytes",
                chunk.seq,
                chunk.text.len()
            );
        }
    }

    #[test]
    fn coverage_reconstructs_original() {
        let chunker = TextChunker::new(180, 50);
        let text = sample_text();
        let chunks = chunker.chunk_text(&text);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn adjacent_chunks_overlap_within_paragraphs() {
        let chunker = TextChunker::new(200, 60);
        let text = sample_text();
        let chunks = chunker.chunk_text(&text);
        for pair in chunks.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.start >= a.end {
                // Paragraph boundary: hard split, no overlap expected.
                assert_eq!(b.start, a.end);
                continue;
            }
            let shared = a.end - b.start;
            assert!(shared <= 60, "overlap {shared} exceeds configured length");
            assert!(shared > 0);
            assert_eq!(&a.text[a.text.len() - shared..], &b.text[..shared]);
        }
    }

    #[test]
    fn sequence_positions_are_ordered() {
        let chunker = TextChunker::new(150, 30);
        let chunks = chunker.chunk_text(&sample_text());
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.seq as usize, i);
        }
    }

    #[test]
    fn multibyte_input_splits_on_char_boundaries() {
        let chunker = TextChunker::new(50, 10);
        let text = "café näive résumé ".repeat(20);
        let chunks = chunker.chunk_text(&text);
        assert!(chunks.len() > 1);
        assert_eq!(reconstruct(&chunks), text);
    }
}
