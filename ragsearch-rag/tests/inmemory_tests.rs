//! Ordering properties of `InMemorySimilarityIndex::search`.

use std::collections::HashMap;

use proptest::prelude::*;
use ragsearch_rag::document::{Chunk, IndexedEntry};
use ragsearch_rag::index::SimilarityIndex;
use ragsearch_rag::inmemory::InMemorySimilarityIndex;
use ragsearch_rag::l2_normalize;

/// Unit-length vectors; near-zero draws are rejected before normalizing.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim)
        .prop_filter("non-zero embedding", |v| v.iter().any(|x| x.abs() > 1e-4))
        .prop_map(|mut v| {
            l2_normalize(&mut v);
            v
        })
}

/// Generate an entry with a normalized embedding.
fn arb_entry(dim: usize) -> impl Strategy<Value = IndexedEntry> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| IndexedEntry {
            chunk: Chunk { id, text, metadata: HashMap::new(), document_id: "doc_1".to_string() },
            embedding,
        },
    )
}

mod search_properties {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn hits_are_sorted_and_capped_at_top_k(
            entries in proptest::collection::vec(arb_entry(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let count = entries.len();
            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let index = InMemorySimilarityIndex::new();
                index.insert_all(entries).await.unwrap();
                index.search(&query, top_k).await.unwrap()
            });

            prop_assert_eq!(results.len(), top_k.min(count));
            prop_assert!(
                results.windows(2).all(|pair| pair[0].score >= pair[1].score),
                "scores out of order: {:?}",
                results.iter().map(|r| r.score).collect::<Vec<_>>(),
            );
        }

        #[test]
        fn identical_embeddings_keep_insertion_order(
            count in 2usize..12,
            embedding in arb_normalized_embedding(DIM),
        ) {
            let entries: Vec<IndexedEntry> = (0..count)
                .map(|i| IndexedEntry {
                    chunk: Chunk {
                        id: format!("c{i}"),
                        text: String::new(),
                        metadata: HashMap::new(),
                        document_id: "doc".to_string(),
                    },
                    embedding: embedding.clone(),
                })
                .collect();

            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let index = InMemorySimilarityIndex::new();
                index.insert_all(entries).await.unwrap();
                index.search(&embedding, count).await.unwrap()
            });

            let ids: Vec<String> = results.into_iter().map(|r| r.chunk.id).collect();
            let expected: Vec<String> = (0..count).map(|i| format!("c{i}")).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
