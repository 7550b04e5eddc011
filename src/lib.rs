// Copyright 2024 The test_logs_generator Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Synthetic log lines and simulated failures for exercising log-collection
//! and crash-reporting pipelines on Android.
//!
//! Lines go to logcat through liblog. On other hosts they are printed to
//! standard error in logcat's brief format, which is enough to try things out
//! on a workstation.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use test_logs_generator::{Config, Generator, LogEmissionOptions, LogLevel, MessageKind, SystemLog};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let config = Config::default();
//!     test_logs_generator::init_once(config.clone());
//!
//!     let mut generator = Generator::new(config.clone(), Arc::new(SystemLog::new(config)));
//!     let id = generator
//!         .start(
//!             LogEmissionOptions::default()
//!                 .with_level(LogLevel::Random)
//!                 .with_message_kind(MessageKind::Json)
//!                 .with_tag("PipelineCheck")
//!                 .with_repeat(true)
//!                 .with_repeat_interval(Duration::from_millis(200)),
//!         )
//!         .expect("repeating tasks are registered");
//!
//!     tokio::time::sleep(Duration::from_secs(2)).await;
//!     generator.stop(id);
//! }
//! ```
//!
//! ## Example with a per-tag filter
//!
//! Lines are filtered with `env_filter` directives, the tag taking the place
//! of the target:
//!
//! ```
//! use test_logs_generator::{Config, FilterBuilder, SystemLog};
//!
//! let sink = SystemLog::new(
//!     Config::default().with_filter(FilterBuilder::new().parse("warn,ExampleTag3=trace").build()),
//! );
//! ```

#[cfg(target_os = "android")]
extern crate android_log_sys as log_ffi;

use log::{Log, Metadata, Record};
use std::ffi::CStr;
use std::sync::OnceLock;

pub use action::{perform, SimulatedFailure, SpecialAction, NON_FATAL_TAG};
pub use config::{Config, DEFAULT_ANR_DURATION, DEFAULT_GRACE_PERIOD};
pub use env_filter::{Builder as FilterBuilder, Filter};
pub use error::{Error, Result};
pub use generator::{Generator, ACTIONS_TAG, STATE_TAG};
pub use history::{
    FileStore, KeyValueStore, LifecycleEvent, LifecycleRecorder, MemoryStore, HISTORY_KEY,
    LIFECYCLE_TAG,
};
pub use id::LogId;
pub use message::{MessageKind, JSON_SAMPLE};
pub use options::{presets, LogEmissionOptions, LogLevel};
pub use priority::Priority;
pub use registry::{RunningTask, TaskRegistry};
pub use sink::{LogLine, LogSink, MemorySink, SystemLog};
pub use task::{TaskHandle, TaskId};

mod action;
mod chunk;
mod config;
mod error;
mod generator;
pub mod history;
mod id;
pub mod message;
mod options;
mod priority;
mod registry;
mod sink;
pub mod task;

/// Outputs one chunk to the Android system log.
#[cfg(target_os = "android")]
fn platform_write(buf_id: Option<LogId>, priority: Priority, tag: &CStr, msg: &CStr) {
    let prio = priority.to_native() as log_ffi::c_int;
    if let Some(buf_id) = LogId::to_native(buf_id) {
        unsafe {
            log_ffi::__android_log_buf_write(
                buf_id as log_ffi::c_int,
                prio,
                tag.as_ptr() as *const log_ffi::c_char,
                msg.as_ptr() as *const log_ffi::c_char,
            );
        };
    } else {
        unsafe {
            log_ffi::__android_log_write(
                prio,
                tag.as_ptr() as *const log_ffi::c_char,
                msg.as_ptr() as *const log_ffi::c_char,
            );
        };
    }
}

/// Prints one chunk the way `logcat -v brief` would show it.
#[cfg(not(target_os = "android"))]
fn platform_write(_buf_id: Option<LogId>, priority: Priority, tag: &CStr, msg: &CStr) {
    eprintln!(
        "{}/{}: {}",
        priority.letter(),
        tag.to_string_lossy(),
        msg.to_string_lossy()
    );
}

/// `log` backend writing records to the system log, using the record target
/// as the tag.
///
/// The generator reports its own state this way under [`STATE_TAG`] and
/// [`ACTIONS_TAG`].
#[derive(Debug, Default)]
pub struct SystemLogger {
    system_log: OnceLock<SystemLog>,
}

impl SystemLogger {
    pub fn new(config: Config) -> SystemLogger {
        SystemLogger {
            system_log: OnceLock::from(SystemLog::new(config)),
        }
    }

    fn system_log(&self) -> &SystemLog {
        self.system_log.get_or_init(SystemLog::default)
    }
}

static SYSTEM_LOGGER: OnceLock<SystemLogger> = OnceLock::new();

impl Log for SystemLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let config = self.system_log().config();
        config.log_level.map_or(true, |level| metadata.level() <= level)
            && config.allows(metadata.target(), metadata.level().into())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        self.system_log()
            .write_args(record.level().into(), record.target(), *record.args());
    }

    fn flush(&self) {}
}

/// Sends a record to the system log without requiring [`init_once`].
pub fn log(record: &Record) {
    SYSTEM_LOGGER
        .get_or_init(SystemLogger::default)
        .log(record)
}

/// Installs [`SystemLogger`] as the global `log` backend.
///
/// Only the first call has any effect, and it never replaces a logger
/// installed by someone else, so it is fine to call on every activity
/// restart.
pub fn init_once(config: Config) {
    let log_level = config.facade_level();
    let logger = SYSTEM_LOGGER.get_or_init(|| SystemLogger::new(config));

    if let Err(err) = log::set_logger(logger) {
        log::debug!("test_logs_generator: log::set_logger failed: {}", err);
    } else {
        log::set_max_level(log_level);
    }
}
