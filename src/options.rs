use crate::{Error, MessageKind, Priority};
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Requested severity of emitted lines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum LogLevel {
    #[default]
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    Assert,
    /// A concrete priority is drawn for every line.
    Random,
}

impl LogLevel {
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Verbose,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Assert,
        LogLevel::Random,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            LogLevel::Random => "RANDOM",
            LogLevel::Verbose => Priority::Verbose.name(),
            LogLevel::Debug => Priority::Debug.name(),
            LogLevel::Info => Priority::Info.name(),
            LogLevel::Warn => Priority::Warn.name(),
            LogLevel::Error => Priority::Error.name(),
            LogLevel::Assert => Priority::Assert.name(),
        }
    }

    /// Picks the priority for one line.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Priority {
        match self {
            LogLevel::Verbose => Priority::Verbose,
            LogLevel::Debug => Priority::Debug,
            LogLevel::Info => Priority::Info,
            LogLevel::Warn => Priority::Warn,
            LogLevel::Error => Priority::Error,
            LogLevel::Assert => Priority::Assert,
            LogLevel::Random => Priority::ALL[rng.gen_range(0..Priority::ALL.len())],
        }
    }
}

impl From<Priority> for LogLevel {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Verbose => LogLevel::Verbose,
            Priority::Debug => LogLevel::Debug,
            Priority::Info => LogLevel::Info,
            Priority::Warn => LogLevel::Warn,
            Priority::Error => LogLevel::Error,
            Priority::Assert => LogLevel::Assert,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LogLevel::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::unknown("log level", s))
    }
}

/// What a single emission task writes and how often.
///
/// Every `with_*` call returns an edited copy; a running task keeps the
/// options it was started with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogEmissionOptions {
    pub(crate) level: LogLevel,
    pub(crate) message_kind: MessageKind,
    pub(crate) tag: String,
    pub(crate) custom_message: String,
    pub(crate) random_message_length: usize,
    pub(crate) should_repeat: bool,
    pub(crate) repeat_interval: Duration,
    pub(crate) append_counter: bool,
}

impl Default for LogEmissionOptions {
    fn default() -> Self {
        LogEmissionOptions {
            level: LogLevel::Verbose,
            message_kind: MessageKind::String,
            tag: "UnspecifiedTag".to_owned(),
            custom_message: "Unspecified message string".to_owned(),
            random_message_length: 10,
            should_repeat: false,
            repeat_interval: Duration::from_secs(1),
            append_counter: true,
        }
    }
}

impl LogEmissionOptions {
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_message_kind(mut self, kind: MessageKind) -> Self {
        self.message_kind = kind;
        self
    }

    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_custom_message<S: Into<String>>(mut self, message: S) -> Self {
        self.custom_message = message.into();
        self
    }

    pub fn with_random_message_length(mut self, length: usize) -> Self {
        self.random_message_length = length;
        self
    }

    /// Like [`with_random_message_length`](Self::with_random_message_length)
    /// but from user input. Text that is not a non-negative integer leaves the
    /// length unchanged.
    pub fn with_random_length_text(self, text: &str) -> Self {
        match text.trim().parse() {
            Ok(length) => self.with_random_message_length(length),
            Err(_) => self,
        }
    }

    pub fn with_repeat(mut self, should_repeat: bool) -> Self {
        self.should_repeat = should_repeat;
        self
    }

    pub fn with_repeat_interval(mut self, interval: Duration) -> Self {
        self.repeat_interval = interval;
        self
    }

    /// Interval in whole milliseconds from user input. Unparsable text leaves
    /// the interval unchanged.
    pub fn with_repeat_interval_text(self, text: &str) -> Self {
        match text.trim().parse() {
            Ok(millis) => self.with_repeat_interval(Duration::from_millis(millis)),
            Err(_) => self,
        }
    }

    pub fn with_counter(mut self, append_counter: bool) -> Self {
        self.append_counter = append_counter;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message_kind(&self) -> MessageKind {
        self.message_kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn custom_message(&self) -> &str {
        &self.custom_message
    }

    pub fn random_message_length(&self) -> usize {
        self.random_message_length
    }

    pub fn should_repeat(&self) -> bool {
        self.should_repeat
    }

    pub fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }

    pub fn append_counter(&self) -> bool {
        self.append_counter
    }

    /// Human-readable name shown for a task started with these options.
    pub fn label(&self) -> String {
        if self.should_repeat {
            format!(
                "{} {} {}ms {}",
                self.level,
                self.message_kind,
                self.repeat_interval.as_millis(),
                self.tag
            )
        } else {
            format!("{} {} {}", self.level, self.message_kind, self.tag)
        }
    }
}

/// The built-in set of repeating jobs that exercise every message kind at
/// once.
pub fn presets() -> Vec<LogEmissionOptions> {
    let repeating = LogEmissionOptions::default().with_repeat(true);
    vec![
        repeating
            .clone()
            .with_level(LogLevel::Random)
            .with_message_kind(MessageKind::Random)
            .with_repeat_interval(Duration::from_millis(100))
            .with_random_message_length(1000),
        repeating
            .clone()
            .with_level(LogLevel::Warn)
            .with_message_kind(MessageKind::Json)
            .with_repeat_interval(Duration::from_millis(100)),
        repeating
            .clone()
            .with_level(LogLevel::Random)
            .with_message_kind(MessageKind::StackTrace)
            .with_repeat_interval(Duration::from_millis(10_000)),
        repeating
            .clone()
            .with_level(LogLevel::Info)
            .with_repeat_interval(Duration::from_millis(2000))
            .with_tag("Tag1")
            .with_custom_message("Custom message for ExampleCustomTag1"),
        repeating
            .clone()
            .with_level(LogLevel::Debug)
            .with_repeat_interval(Duration::from_millis(500))
            .with_tag("ExampleCustomTag2")
            .with_custom_message("Example Tag2 message"),
        repeating
            .with_level(LogLevel::Error)
            .with_repeat_interval(Duration::from_millis(200))
            .with_tag("ExampleTag3")
            .with_custom_message("Tag3 custom message"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn defaults() {
        let options = LogEmissionOptions::default();
        assert_eq!(options.level(), LogLevel::Verbose);
        assert_eq!(options.message_kind(), MessageKind::String);
        assert_eq!(options.tag(), "UnspecifiedTag");
        assert_eq!(options.random_message_length(), 10);
        assert_eq!(options.repeat_interval(), Duration::from_secs(1));
        assert!(!options.should_repeat());
        assert!(options.append_counter());
    }

    #[test]
    fn edits_leave_the_original_untouched() {
        let original = LogEmissionOptions::default();
        let edited = original.clone().with_tag("Other").with_level(LogLevel::Warn);
        assert_eq!(original.tag(), "UnspecifiedTag");
        assert_eq!(edited.tag(), "Other");
        assert_eq!(edited.level(), LogLevel::Warn);
    }

    #[test]
    fn bad_numeric_text_keeps_previous_value() {
        let options = LogEmissionOptions::default()
            .with_repeat_interval_text("250")
            .with_random_length_text("42");
        assert_eq!(options.repeat_interval(), Duration::from_millis(250));
        assert_eq!(options.random_message_length(), 42);

        let options = options
            .with_repeat_interval_text("fast")
            .with_random_length_text("-3");
        assert_eq!(options.repeat_interval(), Duration::from_millis(250));
        assert_eq!(options.random_message_length(), 42);
    }

    #[test]
    fn labels() {
        let options = LogEmissionOptions::default()
            .with_level(LogLevel::Warn)
            .with_message_kind(MessageKind::Json)
            .with_tag("Tag1");
        assert_eq!(options.label(), "WARN JSON Tag1");
        let options = options
            .with_repeat(true)
            .with_repeat_interval(Duration::from_millis(200));
        assert_eq!(options.label(), "WARN JSON 200ms Tag1");
    }

    #[test]
    fn random_level_covers_every_priority() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            seen.insert(LogLevel::Random.resolve(&mut rng));
        }
        assert_eq!(seen.len(), Priority::ALL.len());
        assert_eq!(LogLevel::Assert.resolve(&mut rng), Priority::Assert);
    }

    #[test]
    fn parses_level_names() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("RANDOM".parse::<LogLevel>().unwrap(), LogLevel::Random);
        assert!("fatal".parse::<LogLevel>().is_err());
    }

    #[test]
    fn presets_all_repeat() {
        let presets = presets();
        assert_eq!(presets.len(), 6);
        assert!(presets.iter().all(LogEmissionOptions::should_repeat));
        assert_eq!(presets[5].tag(), "ExampleTag3");
        assert_eq!(presets[0].random_message_length(), 1000);
    }
}
