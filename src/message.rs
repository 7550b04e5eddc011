//! Text of synthetic log lines.

use crate::Error;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::backtrace::Backtrace;
use std::fmt;
use std::str::FromStr;

/// Sample document for checking how a pipeline treats structured payloads.
pub const JSON_SAMPLE: &str = r#"{"random":"31","randomfloat":"100.997","bool":"true","date":"1991-02-16","regEx":"hellooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooworld","enum":"generator","firstname":"Lacie","lastname":"Codding","city":"Hiroshima","country":"NetherlandsAntilles","countryCode":"MN","emailusescurrentdata":"Lacie.Codding@gmail.com","emailfromexpression":"Lacie.Codding@yopmail.com","array":["Raf","Ursulina","Darci","Vere","Sharai"],"arrayofobjects":[{"index":"0","indexstartat5":"5"},{"index":"1","indexstartat5":"6"},{"index":"2","indexstartat5":"7"}],"Randa":{"age":"81"}}"#;

/// Probability that a character of a random string is a space.
pub const SPACE_PROBABILITY: f64 = 0.2;

/// First line of a synthetic stack trace, mimicking an exception header.
pub const STACK_TRACE_HEADER: &str = "test_logs_generator::SyntheticException: captured for a log line";

/// Shape of the text of one log line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum MessageKind {
    Json,
    #[default]
    String,
    RandomString,
    StackTrace,
    /// Resolved to one of the other kinds on every line.
    Random,
}

impl MessageKind {
    pub const CONCRETE: [MessageKind; 4] = [
        MessageKind::Json,
        MessageKind::String,
        MessageKind::RandomString,
        MessageKind::StackTrace,
    ];

    pub const ALL: [MessageKind; 5] = [
        MessageKind::Json,
        MessageKind::String,
        MessageKind::RandomString,
        MessageKind::StackTrace,
        MessageKind::Random,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            MessageKind::Json => "JSON",
            MessageKind::String => "STRING",
            MessageKind::RandomString => "RANDOM_STRING",
            MessageKind::StackTrace => "STACK_TRACE",
            MessageKind::Random => "RANDOM",
        }
    }

    /// Replaces the `Random` sentinel with a uniformly picked concrete kind.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> MessageKind {
        match self {
            MessageKind::Random => MessageKind::CONCRETE[rng.gen_range(0..MessageKind::CONCRETE.len())],
            kind => kind,
        }
    }

    /// Produces the text of one line using the thread-local generator.
    pub fn produce(self, length: usize, custom: &str) -> String {
        self.produce_with(&mut rand::thread_rng(), length, custom)
    }

    pub fn produce_with<R: Rng + ?Sized>(self, rng: &mut R, length: usize, custom: &str) -> String {
        match self.resolve(rng) {
            MessageKind::Json => JSON_SAMPLE.to_owned(),
            MessageKind::String => custom.to_owned(),
            MessageKind::RandomString => random_string(rng, length),
            MessageKind::StackTrace => stack_trace(),
            MessageKind::Random => unreachable!("resolve never returns the sentinel"),
        }
    }
}

/// `length` characters, each a space with [`SPACE_PROBABILITY`] and an ASCII
/// alphanumeric otherwise.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| {
            if rng.gen_bool(SPACE_PROBABILITY) {
                ' '
            } else {
                char::from(rng.sample(Alphanumeric))
            }
        })
        .collect()
}

/// A backtrace of the calling thread, captured regardless of `RUST_BACKTRACE`.
pub fn stack_trace() -> String {
    format!("{STACK_TRACE_HEADER}\n{}", Backtrace::force_capture())
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MessageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::unknown("message kind", s))
    }
}
