use parking_lot::Mutex;

/// Receives the recoverable problems found while converting a batch.
pub trait WarningSink: Send + Sync {
    fn record(&self, message: &str);
}

/// Forwards warnings to the `log` facade.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn record(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Keeps warnings in memory so they can be inspected later.
#[derive(Debug, Default)]
pub struct CaptureSink {
    warnings: Mutex<Vec<String>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        CaptureSink::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    pub fn clear(&self) {
        self.warnings.lock().clear();
    }
}

impl WarningSink for CaptureSink {
    fn record(&self, message: &str) {
        self.warnings.lock().push(message.to_owned());
    }
}
