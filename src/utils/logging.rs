use anyhow::Result;
use chrono::Local;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level,
            target: target.to_string(),
            message,
        }
    }

    /// Format for the diagnostics panel and the log file
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer of recent log entries
#[derive(Clone, Default)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    // A panic while holding the lock leaves the deque intact, so keep using it
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.lock();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Split a compact fmt line ("LEVEL target: message") into its parts.
/// Lines without a level prefix are reported as INFO from "general".
fn parse_line(line: &str) -> (Level, &str, &str) {
    let levels = [
        ("TRACE ", Level::TRACE),
        ("DEBUG ", Level::DEBUG),
        ("INFO ", Level::INFO),
        ("WARN ", Level::WARN),
        ("ERROR ", Level::ERROR),
    ];

    let Some((level, rest)) = levels
        .iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|rest| (*level, rest)))
    else {
        return (Level::INFO, "general", line);
    };

    match rest.split_once(':') {
        Some((target, message)) if !target.contains(' ') => (level, target, message.trim()),
        _ => (level, "general", rest.trim()),
    }
}

/// Writer handed to the fmt layer: every formatted line goes to the ring
/// buffer and, when one could be opened, to the log file.
#[derive(Clone)]
pub struct LogWriter {
    buffer: LogRingBuffer,
    file: Option<Arc<Mutex<File>>>,
}

impl LogWriter {
    pub fn new(buffer: LogRingBuffer, file: Option<File>) -> Self {
        Self {
            buffer,
            file: file.map(|f| Arc::new(Mutex::new(f))),
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (level, target, message) = parse_line(line);
            let entry = LogEntry::new(level, target, message.to_string());

            if let Some(file) = &self.file {
                if let Ok(mut file) = file.lock() {
                    writeln!(file, "{}", entry.format_for_display())?;
                }
            }
            self.buffer.push(entry);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                file.flush()?;
            }
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Global log buffer accessible throughout the application
static LOG_BUFFER: OnceLock<LogRingBuffer> = OnceLock::new();

pub fn get_log_buffer() -> Option<LogRingBuffer> {
    LOG_BUFFER.get().cloned()
}

fn open_log_file(log_dir: &Path) -> Result<(File, PathBuf)> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("todo-grid_{}.log", timestamp));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    Ok((file, log_path))
}

/// Install the global tracing subscriber. Output never goes to the terminal,
/// which belongs to the table UI. Returns the path of the log file, if one
/// could be created.
pub fn init_tracing(log_dir: Option<&Path>) -> Option<PathBuf> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = LOG_BUFFER.get_or_init(LogRingBuffer::new).clone();

    let (file, log_path) = match log_dir.map(open_log_file) {
        Some(Ok((file, path))) => (Some(file), Some(path)),
        _ => (None, None),
    };

    let fmt_layer = fmt::layer()
        .with_writer(LogWriter::new(buffer, file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // entries carry their own timestamps
        .compact();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, repeated runs in one process) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();

    tracing::info!(target: "logging", "Logging initialized");
    log_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_with_target() {
        assert_eq!(
            parse_line("ERROR api: fetch failed: timeout"),
            (Level::ERROR, "api", "fetch failed: timeout")
        );
    }

    #[test]
    fn test_parse_line_without_level() {
        assert_eq!(parse_line("plain text"), (Level::INFO, "general", "plain text"));
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let buffer = LogRingBuffer::new();
        for i in 0..MAX_LOG_ENTRIES + 5 {
            buffer.push(LogEntry::new(Level::INFO, "test", i.to_string()));
        }
        assert_eq!(buffer.len(), MAX_LOG_ENTRIES);
        let recent = buffer.get_recent(2);
        assert_eq!(recent[0].message, (MAX_LOG_ENTRIES + 3).to_string());
        assert_eq!(recent[1].message, (MAX_LOG_ENTRIES + 4).to_string());
    }

    #[test]
    fn test_writer_fans_out_lines() {
        let buffer = LogRingBuffer::new();
        let mut writer = LogWriter::new(buffer.clone(), None);
        writer
            .write_all(b" WARN state: first\nDEBUG columns: second\n")
            .unwrap();
        let entries = buffer.get_recent(10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, Level::WARN);
        assert_eq!(entries[1].target, "columns");
    }
}
