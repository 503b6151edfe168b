use std::sync::Arc;
use std::time::Instant;

use taskgen_core::SpecStore;
use taskgen_llm::Generator;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SpecStore>,
    pub generator: Arc<Generator>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn SpecStore>, generator: Generator) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
            started_at: Instant::now(),
        }
    }
}
