//! Bounded log capture.

/// Append-only log buffer with a lifetime capacity.
///
/// The capacity counts every entry the worker has ever accepted, across all
/// runs. Once it is reached, new entries are dropped without notice.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: Vec<String>,
    capacity: usize,
}

impl LogBuffer {
    /// Creates an empty buffer accepting up to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Appends `entry`. Returns `false` when the buffer is full and the
    /// entry was dropped.
    pub fn push(&mut self, entry: String) -> bool {
        if self.entries.len() >= self.capacity {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Every entry accepted so far.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
