//! Cross-Runtime Log Bridge
//!
//! Forwards leveled log lines in both directions across the native/managed
//! boundary. Managed-side diagnostics flow through the `log` facade; when a
//! native sink is registered, [`BridgeLogger`] forwards every enabled record
//! to it. Lines arriving from native code re-enter through
//! [`LogBridge::log_from_native`] and are re-emitted on the `log` facade.
//!
//! Installing [`BridgeLogger`] (managed → native) while the native side's
//! own logger ships its lines back through `log_from_native` produces an
//! infinite loop. Pick one direction.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use gangway_sdk::LogLevel;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// Receives forwarded log lines on the native side of the boundary.
pub trait NativeLogSink: Send + Sync {
    /// Handle one forwarded line.
    fn log(&self, level: LogLevel, message: &str);
}

/// Default sink writing to standard error, for embedders that have not
/// registered their own.
#[derive(Debug, Default)]
pub struct StderrSink;

impl NativeLogSink for StderrSink {
    fn log(&self, level: LogLevel, message: &str) {
        eprintln!("[gangway {level}] {message}");
    }
}

/// Process-wide log forwarding state: the minimum severity that crosses the
/// boundary and the currently registered native sink.
pub struct LogBridge {
    min_level: AtomicU8,
    sink: RwLock<Option<Arc<dyn NativeLogSink>>>,
}

impl Default for LogBridge {
    fn default() -> Self {
        Self {
            min_level: AtomicU8::new(LogLevel::Debug.ordinal()),
            sink: RwLock::new(None),
        }
    }
}

impl LogBridge {
    /// Create a bridge with the default minimum level (`Debug`) and no sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide bridge used by [`BridgeLogger`] and the C surface.
    pub fn global() -> &'static LogBridge {
        static GLOBAL: Lazy<LogBridge> = Lazy::new(LogBridge::new);
        &GLOBAL
    }

    /// Set the minimum severity forwarded across the boundary. Out-of-range
    /// ordinals are clamped; ordinal 3 (`None`) disables forwarding.
    pub fn set_minimum_level(&self, ordinal: i32) {
        let level = LogLevel::from_ordinal(ordinal);
        self.min_level.store(level.ordinal(), Ordering::Relaxed);
    }

    /// Current minimum forwarded severity.
    pub fn minimum_level(&self) -> LogLevel {
        LogLevel::from_ordinal(self.min_level.load(Ordering::Relaxed) as i32)
    }

    /// Whether a line at `level` crosses the boundary under the current
    /// minimum.
    pub fn should_forward(&self, level: LogLevel) -> bool {
        level != LogLevel::None && self.minimum_level() <= level
    }

    /// Register the native sink, replacing any previous one.
    pub fn set_sink(&self, sink: Arc<dyn NativeLogSink>) {
        *self.sink.write() = Some(sink);
    }

    /// Remove the native sink; forwarding becomes a no-op.
    pub fn clear_sink(&self) {
        *self.sink.write() = None;
    }

    /// Forward one managed-side line to the native sink, subject to the
    /// minimum level.
    pub fn forward(&self, level: LogLevel, message: &str) {
        if !self.should_forward(level) {
            return;
        }
        if let Some(sink) = self.sink.read().as_ref() {
            sink.log(level, message);
        }
    }

    /// Re-emit a line arriving from native code on the managed-side `log`
    /// facade.
    pub fn log_from_native(&self, ordinal: i32, message: &str) {
        match LogLevel::from_ordinal(ordinal) {
            LogLevel::Debug => log::debug!("{message}"),
            LogLevel::Warning => log::warn!("{message}"),
            LogLevel::Error => log::error!("{message}"),
            LogLevel::None => {}
        }
    }
}

/// `log::Log` implementation forwarding every enabled record to the global
/// bridge's native sink.
#[derive(Debug, Default)]
pub struct BridgeLogger;

/// Map a `log` facade level onto the bridge's three forwarded severities.
fn bridge_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warning,
        _ => LogLevel::Debug,
    }
}

impl log::Log for BridgeLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        LogBridge::global().should_forward(bridge_level(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            LogBridge::global().forward(bridge_level(record.level()), &record.args().to_string());
        }
    }

    fn flush(&self) {}
}

/// Install [`BridgeLogger`] as the process logger. Fails if another logger
/// is already installed.
pub fn init() -> Result<(), log::SetLoggerError> {
    static LOGGER: BridgeLogger = BridgeLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Debug);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        lines: Mutex<Vec<(LogLevel, String)>>,
    }

    impl NativeLogSink for RecordingSink {
        fn log(&self, level: LogLevel, message: &str) {
            self.lines.lock().push((level, message.to_string()));
        }
    }

    #[test]
    fn test_forward_respects_minimum_level() {
        let bridge = LogBridge::new();
        let sink = Arc::new(RecordingSink::default());
        bridge.set_sink(sink.clone());

        bridge.set_minimum_level(LogLevel::Warning.ordinal() as i32);
        bridge.forward(LogLevel::Debug, "dropped");
        bridge.forward(LogLevel::Warning, "kept");
        bridge.forward(LogLevel::Error, "kept too");

        let lines = sink.lines.lock();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (LogLevel::Warning, "kept".to_string()));
        assert_eq!(lines[1], (LogLevel::Error, "kept too".to_string()));
    }

    #[test]
    fn test_minimum_level_clamped() {
        let bridge = LogBridge::new();
        bridge.set_minimum_level(-10);
        assert_eq!(bridge.minimum_level(), LogLevel::Debug);
        bridge.set_minimum_level(99);
        assert_eq!(bridge.minimum_level(), LogLevel::None);
    }

    #[test]
    fn test_none_disables_forwarding() {
        let bridge = LogBridge::new();
        let sink = Arc::new(RecordingSink::default());
        bridge.set_sink(sink.clone());

        bridge.set_minimum_level(LogLevel::None.ordinal() as i32);
        bridge.forward(LogLevel::Error, "dropped");
        assert!(sink.lines.lock().is_empty());

        // A line can never be forwarded *at* level None either.
        bridge.set_minimum_level(0);
        bridge.forward(LogLevel::None, "dropped");
        assert!(sink.lines.lock().is_empty());
    }

    #[test]
    fn test_forward_without_sink_is_noop() {
        let bridge = LogBridge::new();
        bridge.forward(LogLevel::Error, "nowhere to go");

        let sink = Arc::new(RecordingSink::default());
        bridge.set_sink(sink.clone());
        bridge.forward(LogLevel::Error, "recorded");
        bridge.clear_sink();
        bridge.forward(LogLevel::Error, "dropped again");

        assert_eq!(sink.lines.lock().len(), 1);
    }

    #[test]
    fn test_bridge_level_mapping() {
        assert_eq!(bridge_level(log::Level::Trace), LogLevel::Debug);
        assert_eq!(bridge_level(log::Level::Debug), LogLevel::Debug);
        assert_eq!(bridge_level(log::Level::Info), LogLevel::Debug);
        assert_eq!(bridge_level(log::Level::Warn), LogLevel::Warning);
        assert_eq!(bridge_level(log::Level::Error), LogLevel::Error);
    }

    #[test]
    fn test_log_from_native_does_not_panic() {
        let bridge = LogBridge::new();
        bridge.log_from_native(0, "debug line");
        bridge.log_from_native(2, "error line");
        bridge.log_from_native(3, "swallowed");
        bridge.log_from_native(-1, "clamped to debug");
    }
}
