//! Property tests for recursive chunking bounds and overlap.

use proptest::prelude::*;
use ragsearch_rag::{Chunker, Document, RecursiveChunker};

/// Longest suffix of `left` that is also a prefix of `right`, in characters.
fn shared_boundary(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    (1..=left.len().min(right.len()))
        .rev()
        .find(|&n| left[left.len() - n..] == right[..n])
        .unwrap_or(0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn split_never_panics(
        content in "\\PC{0,2000}",
        chunk_size in 1usize..400,
        overlap_ratio in 0.0f64..1.0,
    ) {
        let chunk_overlap = ((chunk_size as f64) * overlap_ratio) as usize;
        let chunker = RecursiveChunker::new(chunk_size, chunk_overlap.min(chunk_size - 1)).unwrap();
        let _ = chunker.chunk(&Document::new("doc", content));
    }

    #[test]
    fn chunks_respect_size_bound(
        content in "[a-zA-Z .!?\n]{0,3000}",
        chunk_size in 1usize..300,
    ) {
        let chunker = RecursiveChunker::new(chunk_size, chunk_size / 10).unwrap();
        for chunk in chunker.chunk(&Document::new("doc", content)) {
            prop_assert!(chunk.text.chars().count() <= chunk_size);
            prop_assert!(!chunk.text.trim().is_empty());
        }
    }

    #[test]
    fn long_documents_split_with_bounded_overlap(
        words in proptest::collection::vec("[a-z]{1,8}", 200..400),
    ) {
        let text = words.join(" ");
        let chunker = RecursiveChunker::new(500, 50).unwrap();
        let chunks = chunker.chunk(&Document::new("doc", text.clone()));

        prop_assume!(text.chars().count() > 500);
        prop_assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let shared = shared_boundary(&pair[0].text, &pair[1].text);
            prop_assert!(shared > 0, "consecutive chunks share no context");
            prop_assert!(shared <= 50, "overlap {} exceeds 50", shared);
        }
    }

    #[test]
    fn short_documents_pass_through_whole(
        content in "[a-z][a-z .]{0,98}[a-z.]",
    ) {
        let chunker = RecursiveChunker::new(100, 10).unwrap();
        let chunks = chunker.chunk(&Document::new("doc", content.clone()));
        prop_assert_eq!(chunks.len(), 1);
        prop_assert_eq!(&chunks[0].text, &content);
    }
}
