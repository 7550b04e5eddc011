use log::Level;
use std::fmt;

/// Severity of a single line written to the system log.
///
/// Discriminants match the values of `android_LogPriority` in liblog.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Verbose = 2,
    Debug = 3,
    Info = 4,
    Warn = 5,
    Error = 6,
    /// Reported by logcat as `F` (fatal).
    Assert = 7,
}

impl Priority {
    /// All concrete priorities, lowest first.
    pub const ALL: [Priority; 6] = [
        Priority::Verbose,
        Priority::Debug,
        Priority::Info,
        Priority::Warn,
        Priority::Error,
        Priority::Assert,
    ];

    /// Single-letter code used by logcat's brief format.
    pub const fn letter(self) -> char {
        match self {
            Priority::Verbose => 'V',
            Priority::Debug => 'D',
            Priority::Info => 'I',
            Priority::Warn => 'W',
            Priority::Error => 'E',
            Priority::Assert => 'F',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Priority::Verbose => "VERBOSE",
            Priority::Debug => "DEBUG",
            Priority::Info => "INFO",
            Priority::Warn => "WARN",
            Priority::Error => "ERROR",
            Priority::Assert => "ASSERT",
        }
    }

    /// Closest `log` level. `log` has nothing above `Error`, so `Assert`
    /// collapses into it.
    pub const fn to_level(self) -> Level {
        match self {
            Priority::Verbose => Level::Trace,
            Priority::Debug => Level::Debug,
            Priority::Info => Level::Info,
            Priority::Warn => Level::Warn,
            Priority::Error | Priority::Assert => Level::Error,
        }
    }

    #[cfg(target_os = "android")]
    pub(crate) const fn to_native(self) -> log_ffi::LogPriority {
        match self {
            Priority::Verbose => log_ffi::LogPriority::VERBOSE,
            Priority::Debug => log_ffi::LogPriority::DEBUG,
            Priority::Info => log_ffi::LogPriority::INFO,
            Priority::Warn => log_ffi::LogPriority::WARN,
            Priority::Error => log_ffi::LogPriority::ERROR,
            Priority::Assert => log_ffi::LogPriority::FATAL,
        }
    }
}

impl From<Level> for Priority {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => Priority::Verbose,
            Level::Debug => Priority::Debug,
            Level::Info => Priority::Info,
            Level::Warn => Priority::Warn,
            Level::Error => Priority::Error,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
