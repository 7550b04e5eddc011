use crate::{LogId, Priority};
use log::{LevelFilter, Record};
use std::fmt;
use std::time::Duration;

/// How long a one-shot emission task is given before its handle is cancelled.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(300);
/// How long [`SpecialAction::Anr`](crate::SpecialAction::Anr) blocks the calling thread.
pub const DEFAULT_ANR_DURATION: Duration = Duration::from_millis(5000);

/// Settings shared by the system log sink, the `log` facade integration and
/// the [`Generator`](crate::Generator).
#[derive(Clone, Default)]
pub struct Config {
    pub(crate) buf_id: Option<LogId>,
    pub(crate) filter: Option<std::sync::Arc<env_filter::Filter>>,
    pub(crate) log_level: Option<LevelFilter>,
    pub(crate) grace_period: Option<Duration>,
    pub(crate) anr_duration: Option<Duration>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("buf_id", &self.buf_id)
            .field("filter", &self.filter)
            .field("log_level", &self.log_level)
            .field("grace_period", &self.grace_period())
            .field("anr_duration", &self.anr_duration())
            .finish()
    }
}

#[cfg(all(target_os = "android", feature = "android-api-30"))]
fn android_is_loggable_len(prio: log_ffi::LogPriority, tag: &str) -> bool {
    // SAFETY: tag points to a valid string tag.len() bytes long.
    unsafe {
        log_ffi::__android_log_is_loggable_len(
            prio as log_ffi::c_int,
            tag.as_ptr() as *const log_ffi::c_char,
            tag.len() as log_ffi::c_size_t,
            log_ffi::LogPriority::VERBOSE as log_ffi::c_int,
        ) != 0
    }
}

/// Asks liblog whether system properties such as `log.tag.<TAG>` allow this line.
///
/// Synthetic lines are meant to reach the pipeline, so when no override is
/// set everything down to `VERBOSE` passes.
#[cfg(all(target_os = "android", feature = "android-api-30"))]
pub(crate) fn is_loggable(tag: &str, priority: Priority) -> bool {
    android_is_loggable_len(priority.to_native(), tag)
}

#[cfg(not(all(target_os = "android", feature = "android-api-30")))]
pub(crate) fn is_loggable(_tag: &str, _priority: Priority) -> bool {
    true
}

impl Config {
    /// Upper bound for the crate's own diagnostics going through the `log`
    /// facade. Synthetic lines are not affected.
    ///
    /// When unset, [`init_once`](crate::init_once) uses the filter's level or
    /// [`LevelFilter::Info`].
    pub fn with_max_level(mut self, level: LevelFilter) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Changes the Android logging system buffer to be used.
    ///
    /// By default, lines are sent to the [`Main`] log. Other logging buffers
    /// may only be accessible to certain processes.
    ///
    /// [`Main`]: LogId::Main
    pub fn with_log_buffer(mut self, buf_id: LogId) -> Self {
        self.buf_id = Some(buf_id);
        self
    }

    /// Drops lines whose tag and priority do not pass `filter`.
    ///
    /// The tag plays the role of the record target, so directives like
    /// `warn,ExampleTag3=trace` work per tag.
    pub fn with_filter(mut self, filter: env_filter::Filter) -> Self {
        self.filter = Some(std::sync::Arc::new(filter));
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = Some(grace_period);
        self
    }

    pub fn with_anr_duration(mut self, anr_duration: Duration) -> Self {
        self.anr_duration = Some(anr_duration);
        self
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period.unwrap_or(DEFAULT_GRACE_PERIOD)
    }

    pub fn anr_duration(&self) -> Duration {
        self.anr_duration.unwrap_or(DEFAULT_ANR_DURATION)
    }

    /// Level handed to `log::set_max_level` by [`init_once`](crate::init_once).
    pub(crate) fn facade_level(&self) -> LevelFilter {
        match (self.log_level, &self.filter) {
            (Some(level), _) => level,
            (None, Some(filter)) => filter.filter(),
            (None, None) => LevelFilter::Info,
        }
    }

    pub(crate) fn filter_matches(&self, tag: &str, priority: Priority) -> bool {
        match self.filter {
            Some(ref filter) => filter.matches(
                &Record::builder()
                    .target(tag)
                    .level(priority.to_level())
                    .build(),
            ),
            None => true,
        }
    }

    pub(crate) fn allows(&self, tag: &str, priority: Priority) -> bool {
        self.filter_matches(tag, priority) && is_loggable(tag, priority)
    }
}
