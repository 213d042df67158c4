use crate::library::logger::interface::{LogLevel, Logger};
use std::sync::{Arc, Mutex};

/// Collects log lines in memory so tests can assert on what was reported.
#[derive(Debug, Clone, Default)]
pub struct LoggerFake {
    namespace: Option<String>,
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl LoggerFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.lines().iter().filter(|(l, _)| *l == level).count()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, line)| line.contains(needle))
    }
}

impl Logger for LoggerFake {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let line = match &self.namespace {
            Some(namespace) => format!("{}: {}", namespace, message),
            None => message.to_string(),
        };
        self.lines
            .lock()
            .map_err(|_| "logger lock poisoned")?
            .push((level, line));
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let new_namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };

        Arc::new(LoggerFake {
            namespace: Some(new_namespace),
            lines: Arc::clone(&self.lines),
        })
    }
}
