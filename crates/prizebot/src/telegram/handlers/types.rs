//! Handler types and dependencies

use std::sync::Arc;

use prizecore::{AppResult, AssetStore, PrizeManager};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub manager: Arc<PrizeManager>,
    pub assets: Arc<AssetStore>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(manager: Arc<PrizeManager>, assets: Arc<AssetStore>) -> Self {
        Self { manager, assets }
    }
}

/// Runs blocking store/image work off the async runtime.
pub(super) async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
