//! Capture of formatted `tracing` output in tests.

use std::io;
use std::sync::{Arc, Mutex};

/// An in-memory log sink usable as a `tracing-subscriber` writer.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Everything written so far.
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records every event on this thread.
///
/// Returns the closure's result together with the formatted log text.
///
/// # Example
///
/// ```
/// use test_utils::capture_logs;
///
/// let (value, logs) = capture_logs(|| {
///     tracing::warn!("something odd");
///     42
/// });
/// assert_eq!(value, 42);
/// assert!(logs.contains("something odd"));
/// ```
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_only_sees_closure_events() {
        tracing::warn!("before");
        let ((), logs) = capture_logs(|| tracing::info!(cells = 3, "inside"));
        tracing::warn!("after");

        assert!(logs.contains("inside"));
        assert!(logs.contains("cells=3"));
        assert!(!logs.contains("before"));
        assert!(!logs.contains("after"));
    }
}
