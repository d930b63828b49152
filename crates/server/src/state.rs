use std::sync::Arc;

use truck_statement::StatementBuilder;

/// Shared application state accessible to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Renderer configured at startup; each request builds its own document from it.
    pub builder: Arc<StatementBuilder>,
}

impl AppState {
    pub fn new(builder: StatementBuilder) -> Self {
        Self {
            builder: Arc::new(builder),
        }
    }
}
