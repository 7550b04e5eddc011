use crate::chunk::{fill_tag_bytes, ChunkWriter, TagStorage, LOGGING_TAG_MAX_LEN};
use crate::{platform_write, Config, Priority};
use std::ffi::CStr;
use std::fmt::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Destination of emitted lines.
///
/// Implementations must tolerate concurrent calls from many emission tasks.
pub trait LogSink: Send + Sync {
    fn write(&self, priority: Priority, tag: &str, msg: &str);
}

/// Writes to the platform system log: logcat on Android, standard error in
/// logcat's brief format (`I/tag: text`) everywhere else.
#[derive(Clone, Debug, Default)]
pub struct SystemLog {
    config: Config,
}

impl SystemLog {
    pub fn new(config: Config) -> SystemLog {
        SystemLog { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Formats `args` straight into the chunk buffer without an intermediate
    /// `String`.
    pub fn write_args(&self, priority: Priority, tag: &str, args: fmt::Arguments<'_>) {
        if !self.config.allows(tag, priority) {
            return;
        }

        let mut tag_bytes: TagStorage = [0; LOGGING_TAG_MAX_LEN + 1];
        let tag = fill_tag_bytes(&mut tag_bytes, tag.as_bytes());

        let buf_id = self.config.buf_id;
        let mut writer = ChunkWriter::new(|chunk: &CStr| platform_write(buf_id, priority, tag, chunk));
        let _ = writer.write_fmt(args);
        writer.flush();
    }
}

impl LogSink for SystemLog {
    fn write(&self, priority: Priority, tag: &str, msg: &str) {
        self.write_args(priority, tag, format_args!("{msg}"));
    }
}

/// One line as seen by a [`MemorySink`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogLine {
    pub priority: Priority,
    pub tag: String,
    pub text: String,
}

/// Keeps every line in memory. Handy for dry runs and for asserting on what
/// a pipeline should have received.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<LogLine>>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }

    /// Snapshot of everything written so far, in arrival order.
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines written under `tag`, in arrival order.
    pub fn lines_tagged(&self, tag: &str) -> Vec<LogLine> {
        self.lines()
            .into_iter()
            .filter(|line| line.tag == tag)
            .collect()
    }

    pub fn take(&self) -> Vec<LogLine> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl LogSink for MemorySink {
    fn write(&self, priority: Priority, tag: &str, msg: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogLine {
                priority,
                tag: tag.to_owned(),
                text: msg.to_owned(),
            });
    }
}
