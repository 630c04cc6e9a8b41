//! Application state management

use std::sync::Arc;

use image_storage::ObjectStore;

use crate::edge_cache::EdgeCache;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Blob store uploads are written to and served from
    pub image_storage: Arc<dyn ObjectStore>,
    /// Response cache consulted before the blob store
    pub edge_cache: Arc<dyn EdgeCache>,
}

impl AppState {
    /// Bundles the collaborators the handlers need
    #[must_use]
    pub const fn new(image_storage: Arc<dyn ObjectStore>, edge_cache: Arc<dyn EdgeCache>) -> Self {
        Self {
            image_storage,
            edge_cache,
        }
    }
}
