use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Buffer of the Android logging system that synthetic lines are written to.
///
/// Apps can normally only write to [`Main`](LogId::Main); the other buffers
/// are useful when the generator runs as a privileged process and the
/// pipeline under test reads e.g. the crash buffer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogId {
    #[default]
    Main,
    Radio,
    Events,
    System,
    Crash,
    Kernel,
    Security,
    Stats,
}

impl LogId {
    const NAMES: [(LogId, &'static str); 8] = [
        (LogId::Main, "main"),
        (LogId::Radio, "radio"),
        (LogId::Events, "events"),
        (LogId::System, "system"),
        (LogId::Crash, "crash"),
        (LogId::Kernel, "kernel"),
        (LogId::Security, "security"),
        (LogId::Stats, "stats"),
    ];

    /// Name as accepted by `logcat -b`.
    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(id, _)| *id == self)
            .map(|(_, name)| *name)
            .unwrap_or("main")
    }
}

#[cfg(target_os = "android")]
impl LogId {
    pub(crate) const fn to_native(log_id: Option<Self>) -> Option<log_ffi::log_id_t> {
        match log_id {
            Some(Self::Main) => Some(log_ffi::log_id_t::MAIN),
            Some(Self::Radio) => Some(log_ffi::log_id_t::RADIO),
            Some(Self::Events) => Some(log_ffi::log_id_t::EVENTS),
            Some(Self::System) => Some(log_ffi::log_id_t::SYSTEM),
            Some(Self::Crash) => Some(log_ffi::log_id_t::CRASH),
            Some(Self::Kernel) => Some(log_ffi::log_id_t::KERNEL),
            Some(Self::Security) => Some(log_ffi::log_id_t::SECURITY),
            Some(Self::Stats) => Some(log_ffi::log_id_t::STATS),
            None => None,
        }
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(id, _)| *id)
            .ok_or_else(|| Error::unknown("log buffer", s))
    }
}
