use std::thread;

/// Limits for the closure-operator search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnumerationConfig {
    /// Maximum number of candidate assignments to try before aborting with
    /// [`Error::ResourceExhausted`](crate::error::Error::ResourceExhausted).
    /// `None` searches the whole tree.
    pub node_budget: Option<u64>,
}

impl EnumerationConfig {
    pub fn with_node_budget(mut self, budget: u64) -> Self {
        self.node_budget = Some(budget);
        self
    }
}

/// Worker pool settings for the parallel filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    /// Number of worker threads, at least one.
    pub workers: usize,
}

impl FilterConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

impl Default for FilterConfig {
    /// One worker per available hardware thread.
    fn default() -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self { workers }
    }
}
