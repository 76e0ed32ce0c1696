use std::sync::Arc;

use crate::storage::ObjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Nothing in here is mutable: requests are fully independent of each other.
#[derive(Clone)]
pub struct AppState {
    /// Archive for generated PDFs. `DisabledStore` when no credentials are configured.
    pub storage: Arc<dyn ObjectStore>,
}
