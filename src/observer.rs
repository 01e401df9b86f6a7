//! Observability (C11): the `log`/`progress` callback pair from the
//! external-interfaces contract, implemented as a trait so a caller gets
//! both a push stream of events and ordinary `tracing` output without
//! double-instrumenting call sites.

#[derive(Debug, Clone)]
pub struct RunEvent {
    pub level: RunEventLevel,
    pub segment_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEventLevel {
    Debug,
    Info,
    Warn,
}

pub trait RunObserver: Send + Sync {
    fn log(&self, event: RunEvent) {
        match event.level {
            RunEventLevel::Debug => tracing::debug!(segment_id = ?event.segment_id, "{}", event.message),
            RunEventLevel::Info => tracing::info!(segment_id = ?event.segment_id, "{}", event.message),
            RunEventLevel::Warn => tracing::warn!(segment_id = ?event.segment_id, "{}", event.message),
        }
    }

    fn progress(&self, completed: usize, total: usize, description: &str) {
        tracing::info!(completed, total, "{}", description);
    }
}

/// Default observer: forwards everything into `tracing` and nowhere else.
pub struct TracingObserver;

impl RunObserver for TracingObserver {}

pub(crate) fn info(observer: &dyn RunObserver, segment_id: Option<&str>, message: impl Into<String>) {
    observer.log(RunEvent {
        level: RunEventLevel::Info,
        segment_id: segment_id.map(|s| s.to_string()),
        message: message.into(),
    });
}

pub(crate) fn warn(observer: &dyn RunObserver, segment_id: Option<&str>, message: impl Into<String>) {
    observer.log(RunEvent {
        level: RunEventLevel::Warn,
        segment_id: segment_id.map(|s| s.to_string()),
        message: message.into(),
    });
}
