//! Raw process events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw event from a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEvent {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The type of event
    pub kind: ProcessEventKind,
    /// Output chunk exactly as read from the pipe
    pub data: Option<Vec<u8>>,
}

impl ProcessEvent {
    /// Create a new process event
    pub fn new(kind: ProcessEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            data: None,
        }
    }

    /// Create a new output event carrying a chunk
    pub fn with_chunk(kind: ProcessEventKind, chunk: Vec<u8>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            data: Some(chunk),
        }
    }

    /// Output chunk decoded as text, replacing invalid UTF-8
    pub fn text(&self) -> Option<std::borrow::Cow<'_, str>> {
        self.data.as_deref().map(String::from_utf8_lossy)
    }
}

/// Types of raw process events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProcessEventKind {
    /// Process has started
    Started {
        /// OS process id
        pid: u32,
    },
    /// Chunk read from stdout
    Stdout,
    /// Chunk read from stderr
    Stderr,
}
