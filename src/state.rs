use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::images::ImageStore;
use crate::search::{IndexWriter, SearchIndex};

/// Application state shared across handlers
///
/// Constructed once at startup and handed to every handler through axum's
/// `State` extractor; nothing in here is a package-level singleton.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// In-memory full-text index over person records
    pub index: Arc<SearchIndex>,
    /// Ordered queue feeding index mutations to the worker task
    pub index_writer: IndexWriter,
    /// List of uploaded image files
    pub images: Arc<ImageStore>,
    /// Application configuration
    pub config: Arc<Config>,
    /// Process start time, reported by the status endpoint
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state, spawning the index worker
    pub fn new(db: DatabaseConnection, index: Arc<SearchIndex>, config: Config) -> Self {
        let index_writer = IndexWriter::spawn(index.clone());
        let images = Arc::new(ImageStore::new(config.image_dir()));

        Self {
            db,
            index,
            index_writer,
            images,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
