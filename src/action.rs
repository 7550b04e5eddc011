use crate::{Error, LogSink, Priority};
use std::backtrace::Backtrace;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Tag of the line recording a handled non-fatal failure.
pub const NON_FATAL_TAG: &str = "SpecialActionsExecutor";

/// Failure conditions a crash-reporting pipeline should pick up.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SpecialAction {
    /// Blocks the calling thread, which on the UI thread produces an
    /// "Application Not Responding" report.
    Anr,
    /// Unhandled panic.
    Crash,
    /// Unhandled panic from unwrapping a missing value.
    Npe,
    /// Failure that is handled and only logged.
    NonFatal,
}

/// Error value carried by the simulated failures.
#[derive(thiserror::Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum SimulatedFailure {
    #[error("This is a simulated crash")]
    Crash,
    #[error("This is a simulated NPE")]
    NullDereference,
    #[error("This is a simulated non-fatal exception")]
    NonFatal,
}

impl SpecialAction {
    pub const ALL: [SpecialAction; 4] = [
        SpecialAction::Anr,
        SpecialAction::Crash,
        SpecialAction::Npe,
        SpecialAction::NonFatal,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SpecialAction::Anr => "ANR",
            SpecialAction::Crash => "CRASH",
            SpecialAction::Npe => "NPE",
            SpecialAction::NonFatal => "NON_FATAL",
        }
    }

    /// Caption for a button triggering the action.
    pub const fn display_name(self) -> &'static str {
        match self {
            SpecialAction::Anr => "ANR (press twice)",
            SpecialAction::Crash => "Crash (Fatal Exception)",
            SpecialAction::Npe => "NullPointerException with Fatal Exception",
            SpecialAction::NonFatal => "Non-fatal exception",
        }
    }
}

impl fmt::Display for SpecialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpecialAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SpecialAction::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::unknown("special action", s))
    }
}

/// Carries out `action` on the calling thread.
///
/// `Crash` and `Npe` panic and are meant to take the process down when
/// nothing up the stack catches the unwind.
pub fn perform(action: SpecialAction, anr_duration: Duration, sink: &dyn LogSink) {
    match action {
        SpecialAction::Anr => std::thread::sleep(anr_duration),
        SpecialAction::Crash => panic!("{}", SimulatedFailure::Crash),
        SpecialAction::Npe => {
            let missing: Option<&str> = None;
            let _ = missing.unwrap_or_else(|| panic!("{}", SimulatedFailure::NullDereference));
        }
        SpecialAction::NonFatal => {
            if let Err(failure) = fail_softly() {
                report_non_fatal(sink, &failure);
            }
        }
    }
}

fn fail_softly() -> Result<(), SimulatedFailure> {
    Err(SimulatedFailure::NonFatal)
}

fn report_non_fatal(sink: &dyn LogSink, failure: &SimulatedFailure) {
    sink.write(
        Priority::Error,
        NON_FATAL_TAG,
        &format!("SimulatedFailure: {failure}\n{}", Backtrace::force_capture()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySink;
    use std::any::Any;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::time::Instant;

    fn panic_message(payload: Box<dyn Any + Send>) -> String {
        match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => payload
                .downcast::<&'static str>()
                .map(|message| (*message).to_owned())
                .unwrap_or_default(),
        }
    }

    #[test]
    fn non_fatal_is_handled_and_logged() {
        let sink = MemorySink::new();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            perform(SpecialAction::NonFatal, Duration::ZERO, &sink)
        }));

        assert!(outcome.is_ok());
        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].priority, Priority::Error);
        assert_eq!(lines[0].tag, NON_FATAL_TAG);
        assert!(lines[0]
            .text
            .starts_with("SimulatedFailure: This is a simulated non-fatal exception\n"));
    }

    #[test]
    fn crash_propagates() {
        let sink = MemorySink::new();

        let payload = catch_unwind(AssertUnwindSafe(|| {
            perform(SpecialAction::Crash, Duration::ZERO, &sink)
        }))
        .unwrap_err();

        assert_eq!(panic_message(payload), "This is a simulated crash");
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn npe_propagates() {
        let sink = MemorySink::new();

        let payload = catch_unwind(AssertUnwindSafe(|| {
            perform(SpecialAction::Npe, Duration::ZERO, &sink)
        }))
        .unwrap_err();

        assert_eq!(panic_message(payload), "This is a simulated NPE");
    }

    #[test]
    fn anr_blocks_the_calling_thread() {
        let sink = MemorySink::new();
        let started = Instant::now();

        perform(SpecialAction::Anr, Duration::from_millis(50), &sink);

        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn parses_action_names() {
        assert_eq!("non_fatal".parse::<SpecialAction>().unwrap(), SpecialAction::NonFatal);
        assert_eq!("ANR".parse::<SpecialAction>().unwrap(), SpecialAction::Anr);
        assert!("oom".parse::<SpecialAction>().is_err());
    }
}
