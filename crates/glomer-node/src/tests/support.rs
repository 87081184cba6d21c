//! Shared helpers for the crate's unit tests.

use std::io;
use std::sync::{Arc, Mutex};

/// In-memory log sink that a subscriber can write to from any thread.
#[derive(Debug, Clone, Default)]
pub(crate) struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Returns a `MakeWriter` that appends to this buffer.
    pub(crate) fn make_writer(&self) -> impl Fn() -> Self + Send + Sync + 'static {
        let logs = self.clone();
        move || logs.clone()
    }

    /// Returns everything written so far.
    pub(crate) fn contents(&self) -> String {
        let bytes = self.buffer.lock().expect("log buffer lock").clone();
        String::from_utf8(bytes).expect("logs should be utf8")
    }

    /// Parses each captured line as a JSON event.
    pub(crate) fn json_lines(&self) -> Vec<serde_json::Value> {
        self.contents()
            .lines()
            .map(|line| serde_json::from_str(line).expect("log line should be JSON"))
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("log buffer lock")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
