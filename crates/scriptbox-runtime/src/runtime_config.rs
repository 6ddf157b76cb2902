//! Configuration for the script worker.

use scriptbox_lang::{Limits, DEFAULT_MAX_HEAP_SIZE, DEFAULT_MAX_STACK_SIZE};

/// Default capacity of the log buffer, counted over the worker's lifetime.
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 1000;

/// Configuration for the script worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Log entries accepted before further log calls are dropped.
    pub max_log_entries: usize,
    /// Native stack budget of one run, in bytes.
    pub max_stack_size: usize,
    /// Heap budget of one run, in bytes (0 = unbounded).
    pub max_heap_size: usize,
}

impl WorkerConfig {
    /// Engine limits derived from this configuration.
    pub fn limits(&self) -> Limits {
        Limits {
            max_stack_size: self.max_stack_size,
            max_heap_size: self.max_heap_size,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_log_entries: DEFAULT_MAX_LOG_ENTRIES,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            max_heap_size: DEFAULT_MAX_HEAP_SIZE,
        }
    }
}
