use std::sync::{Arc, OnceLock};

use docforge_core::{ConversionEngine, EngineOptions};
use docforge_mupdf::MupdfEngine;

/// Shared application state accessible from all handlers.
///
/// The engine is expensive and memory-heavy relative to an idle server, so
/// it is constructed on first use rather than at startup. `OnceLock`
/// synchronizes first access: concurrent first requests still construct
/// exactly one engine, and the configuration read from the environment at
/// that moment is fixed for the life of the process.
pub struct AppState {
    engine: OnceLock<Arc<dyn ConversionEngine>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            engine: OnceLock::new(),
        }
    }

    /// State with a pre-seeded engine, bypassing lazy construction.
    /// Used by tests to inject a mock.
    #[cfg(test)]
    pub fn with_engine(engine: Arc<dyn ConversionEngine>) -> Self {
        let lock = OnceLock::new();
        let _ = lock.set(engine);
        Self { engine: lock }
    }

    /// The process-wide engine, constructing it on first call.
    pub fn engine(&self) -> Arc<dyn ConversionEngine> {
        self.engine
            .get_or_init(|| Arc::new(MupdfEngine::new(EngineOptions::from_env())))
            .clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
