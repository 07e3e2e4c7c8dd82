//! Document chunking for the size-limited entity service.
//!
//! Chunks are contiguous and non-overlapping; concatenating them in order
//! reproduces the input exactly. Sizes are counted in characters.

use summed_core::{Error, Result};

/// A slice of the input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    /// Zero-based chunk index; correlates request and response documents.
    pub id: usize,
    pub text: String,
    /// Character offset of the chunk start within the document.
    pub char_offset: usize,
}

/// Split `text` into chunks of at most `max_chunk_size` characters.
///
/// A chunk ends after the last whitespace inside its window when there is
/// one, so words are only cut when a window holds no whitespace at all.
pub fn chunk_document(text: &str, max_chunk_size: usize) -> Result<Vec<DocumentChunk>> {
    if max_chunk_size == 0 {
        return Err(Error::Config("max_chunk_size must be at least 1".into()));
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + max_chunk_size).min(chars.len());
        if end < chars.len() {
            if let Some(ws) = (start..end).rev().find(|&i| chars[i].1.is_whitespace()) {
                // Keep the whitespace in this chunk; never produce an empty chunk.
                end = ws + 1;
            }
        }

        let byte_start = chars[start].0;
        let byte_end = chars.get(end).map(|(b, _)| *b).unwrap_or(text.len());
        chunks.push(DocumentChunk {
            id: chunks.len(),
            text: text[byte_start..byte_end].to_string(),
            char_offset: start,
        });
        start = end;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(chunks: &[DocumentChunk]) -> String {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(chunk_document("", 10).unwrap().is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_document("Hello, world!", 5120).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, 0);
        assert_eq!(chunks[0].char_offset, 0);
        assert_eq!(chunks[0].text, "Hello, world!");
    }

    #[test]
    fn test_round_trip_and_size_bound() {
        let texts = [
            "The patient was given aspirin. Fever subsided after two days.",
            "averyveryverylongwordwithoutanyspaces and then some words",
            "Größe Übelkeit Ärztin Schmerz   mehrfach\n\nAbsatz",
            "a b c d e f g",
            "   ",
        ];
        for text in texts {
            for size in [1, 2, 3, 7, 16, 100] {
                let chunks = chunk_document(text, size).unwrap();
                assert_eq!(joined(&chunks), text, "size={}", size);
                assert!(chunks.iter().all(|c| c.text.chars().count() <= size));
                assert!(chunks.iter().all(|c| !c.text.is_empty()));
                for (i, c) in chunks.iter().enumerate() {
                    assert_eq!(c.id, i);
                }
            }
        }
    }

    #[test]
    fn test_offsets_in_characters() {
        let text = "Übelkeit und Schmerz";
        let chunks = chunk_document(text, 9).unwrap();
        assert_eq!(chunks[0].text, "Übelkeit ");
        for chunk in &chunks {
            let expected: String = text.chars().skip(chunk.char_offset).take(chunk.text.chars().count()).collect();
            assert_eq!(chunk.text, expected);
        }
    }

    #[test]
    fn test_prefers_whitespace_boundary() {
        let chunks = chunk_document("alpha beta gamma", 8).unwrap();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha ", "beta ", "gamma"]);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(chunk_document("text", 0).is_err());
    }
}
