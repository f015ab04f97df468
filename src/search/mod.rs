//! Full-text person search
//!
//! A derived, in-memory token index kept eventually consistent with the
//! person table. The index is not the source of truth: it is rebuilt from the
//! store at startup and tolerates a bounded staleness window while writer
//! operations drain.

pub mod index;
pub mod writer;

pub use index::SearchIndex;
pub use writer::{IndexOp, IndexWriter};
