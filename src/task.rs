use crate::{LogEmissionOptions, LogSink};
use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an emission task, unique for the lifetime of the process.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> TaskId {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cancellable reference to a spawned emission task.
///
/// Dropping the handle detaches the task; only [`cancel`](Self::cancel) stops it.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Stops the task at its next wait. Calling it again, or on a finished
    /// task, does nothing.
    pub fn cancel(&self) {
        self.join.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Spawns an emission task on `runtime`.
///
/// A one-shot task writes its single line right away. A repeating task
/// sleeps for the interval before every line and runs until cancelled.
pub fn start(options: LogEmissionOptions, sink: Arc<dyn LogSink>, runtime: &Handle) -> TaskHandle {
    TaskHandle {
        id: TaskId::next(),
        join: runtime.spawn(run(options, sink)),
    }
}

async fn run(options: LogEmissionOptions, sink: Arc<dyn LogSink>) {
    if !options.should_repeat {
        emit(&options, sink.as_ref(), 1);
        return;
    }

    let mut counter: u64 = 1;
    loop {
        tokio::time::sleep(options.repeat_interval).await;
        emit(&options, sink.as_ref(), counter);
        counter += 1;
    }
}

/// Writes one line. Random level and message kind are drawn anew on each call.
pub(crate) fn emit(options: &LogEmissionOptions, sink: &dyn LogSink, counter: u64) {
    let mut rng = rand::thread_rng();
    let priority = options.level.resolve(&mut rng);
    let mut text = options.message_kind.produce_with(
        &mut rng,
        options.random_message_length,
        &options.custom_message,
    );
    if options.append_counter {
        let _ = write!(text, " {counter}");
    }
    sink.write(priority, &options.tag, &text);
}
