//! Index writer queue
//!
//! All index mutations flow through one bounded channel consumed by a single
//! worker task. Routing every operation through the same ordered queue is what
//! guarantees that the unindex-old / index-new pair emitted by a person update
//! is applied in that order; general concurrent execution would not.
//!
//! Submission is fire-and-forget: the HTTP response for a person mutation
//! returns as soon as the store commit succeeds, and the index catches up
//! eventually. A full queue drops the operation with a warning; the index then
//! diverges from the store until the next full rebuild. No retries.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::search::SearchIndex;

/// Queued operations outstanding before submissions start being dropped
const QUEUE_CAPACITY: usize = 1024;

/// A single index mutation
#[derive(Debug, Clone)]
pub enum IndexOp {
    Index { text: String, id: i64 },
    Unindex { text: String, id: i64 },
}

/// Handle used by the person handlers to submit index mutations
#[derive(Clone)]
pub struct IndexWriter {
    tx: mpsc::Sender<IndexOp>,
}

impl IndexWriter {
    /// Spawn the worker task and return the submission handle
    pub fn spawn(index: Arc<SearchIndex>) -> Self {
        let (tx, mut rx) = mpsc::channel::<IndexOp>(QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(op) = rx.recv().await {
                match op {
                    IndexOp::Index { text, id } => index.index(&text, id),
                    IndexOp::Unindex { text, id } => index.unindex(&text, id),
                }
            }
            tracing::debug!("index writer channel closed; worker exiting");
        });

        Self { tx }
    }

    /// Submit an operation without waiting for it to be applied
    pub fn submit(&self, op: IndexOp) {
        if let Err(err) = self.tx.try_send(op) {
            tracing::warn!("index operation dropped: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn settle(index: &SearchIndex, term: &str, want_hit: bool) -> bool {
        for _ in 0..100 {
            if index.query(term).is_empty() != want_hit {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_submitted_index_op_becomes_visible() {
        let index = Arc::new(SearchIndex::default());
        let writer = IndexWriter::spawn(index.clone());

        writer.submit(IndexOp::Index {
            text: "Jane Archivist".to_string(),
            id: 1,
        });

        assert!(settle(&index, "jane", true).await);
        assert!(index.query("jane").contains(&1));
    }

    #[tokio::test]
    async fn test_unindex_then_index_applied_in_order() {
        let index = Arc::new(SearchIndex::default());
        let writer = IndexWriter::spawn(index.clone());

        writer.submit(IndexOp::Index {
            text: "Old Name".to_string(),
            id: 1,
        });
        writer.submit(IndexOp::Unindex {
            text: "Old Name".to_string(),
            id: 1,
        });
        writer.submit(IndexOp::Index {
            text: "New Name".to_string(),
            id: 1,
        });

        assert!(settle(&index, "new", true).await);
        assert!(index.query("old").is_empty());
        assert!(index.query("new").contains(&1));
    }
}
