//! Pool runtime settings. None of them change what an operation computes.

/// Event retention and logging for one pool.
#[derive(Debug, Clone)]
pub struct PoolRuntimeConfig {
    /// Oldest events are dropped once the in-memory log grows past this.
    /// Drain them into an `EventSink` first to keep a full history.
    pub max_events: usize,
    /// Also emit every committed event as an `info!` record with its id,
    /// name and payload. Commit and rejection records are logged either way.
    pub verbose: bool,
}

impl Default for PoolRuntimeConfig {
    fn default() -> Self {
        Self {
            max_events: 100_000,
            verbose: false,
        }
    }
}
