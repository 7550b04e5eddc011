use crate::options::presets;
use crate::{action, task, Config, LogEmissionOptions, LogSink, RunningTask, SpecialAction, TaskId, TaskRegistry};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Tag of the generator's own state messages.
pub const STATE_TAG: &str = "AppStates";
/// Tag of messages describing what the user triggered.
pub const ACTIONS_TAG: &str = "UserActions";

/// Starts, tracks and stops emission tasks and runs special actions.
///
/// Methods take `&mut self`: the registry is meant to be driven from a single
/// owner, typically the UI thread. Background tasks only share the sink.
pub struct Generator {
    config: Config,
    sink: Arc<dyn LogSink>,
    runtime: Handle,
    registry: TaskRegistry,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}

impl Generator {
    /// Creates a generator that spawns onto the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime; use
    /// [`with_runtime`](Self::with_runtime) from other threads.
    pub fn new(config: Config, sink: Arc<dyn LogSink>) -> Generator {
        Generator::with_runtime(config, sink, Handle::current())
    }

    pub fn with_runtime(config: Config, sink: Arc<dyn LogSink>, runtime: Handle) -> Generator {
        Generator {
            config,
            sink,
            runtime,
            registry: TaskRegistry::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts emitting according to `options`.
    ///
    /// Repeating tasks are registered and their id returned. A one-shot task
    /// is never registered; its handle is cancelled once the grace period is
    /// over.
    pub fn start(&mut self, options: LogEmissionOptions) -> Option<TaskId> {
        log::info!(target: ACTIONS_TAG, "Start custom job button has been pushed");
        self.launch(options)
    }

    fn launch(&mut self, options: LogEmissionOptions) -> Option<TaskId> {
        let label = options.label();
        let repeating = options.should_repeat();
        let handle = task::start(options, self.sink.clone(), &self.runtime);

        if repeating {
            let id = handle.id();
            self.registry.register(handle, label.clone());
            log::info!(target: STATE_TAG, "[startLogGenerator] Repeated Job \"{label}\" has been started");
            return Some(id);
        }

        let grace_period = self.config.grace_period();
        self.runtime.spawn(async move {
            tokio::time::sleep(grace_period).await;
            handle.cancel();
            log::info!(target: STATE_TAG, "[startLogGenerator] One time Job \"{label}\" has been performed");
        });
        None
    }

    /// Starts every built-in preset, returning their ids in preset order.
    pub fn start_presets(&mut self) -> Vec<TaskId> {
        log::info!(target: ACTIONS_TAG, "Start presets button has been pushed");
        presets()
            .into_iter()
            .filter_map(|options| self.launch(options))
            .collect()
    }

    /// Cancels a running task. Unknown ids are ignored.
    pub fn stop(&mut self, id: TaskId) -> bool {
        if let Some(task) = self.registry.get(id) {
            log::info!(target: ACTIONS_TAG, "Stop job \"{}\" button has been pushed", task.label());
        }
        match self.registry.cancel(id) {
            Some(task) => {
                log::info!(target: STATE_TAG, "[stopJob] Job \"{}\" has been stopped", task.label());
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&mut self) {
        log::info!(target: ACTIONS_TAG, "Stop all jobs button has been pushed");
        for task in self.registry.cancel_all() {
            log::info!(target: STATE_TAG, "[stopJob] Job \"{}\" has been stopped", task.label());
        }
        log::info!(target: STATE_TAG, "[stopAllJobs] All jobs have been stopped");
    }

    /// Runs `action` on the calling thread. See [`perform`](crate::perform).
    pub fn perform(&self, action: SpecialAction) {
        log::info!(target: ACTIONS_TAG, "Button {action} has been pushed");
        action::perform(action, self.config.anr_duration(), self.sink.as_ref());
    }

    pub fn running(&self) -> impl Iterator<Item = &RunningTask> + '_ {
        self.registry.iter()
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }
}

impl Drop for Generator {
    fn drop(&mut self) {
        self.registry.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogLevel, MemorySink, MessageKind, Priority};
    use std::time::Duration;

    fn generator(sink: &Arc<MemorySink>) -> Generator {
        Generator::new(Config::default(), sink.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_is_never_registered() {
        let sink = Arc::new(MemorySink::new());
        let mut generator = generator(&sink);

        let id = generator.start(LogEmissionOptions::default().with_tag("Once"));
        assert!(id.is_none());
        assert_eq!(generator.registry().len(), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(generator.registry().len(), 0);
        assert_eq!(sink.lines_tagged("Once").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_is_registered_until_stopped() {
        let sink = Arc::new(MemorySink::new());
        let mut generator = generator(&sink);
        let options = LogEmissionOptions::default()
            .with_level(LogLevel::Error)
            .with_message_kind(MessageKind::Json)
            .with_tag("Json")
            .with_repeat(true)
            .with_repeat_interval(Duration::from_millis(200));

        let id = generator.start(options).unwrap();
        assert_eq!(
            generator.running().map(RunningTask::label).collect::<Vec<_>>(),
            vec!["ERROR JSON 200ms Json"]
        );

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(generator.stop(id));
        assert!(!generator.stop(id));
        tokio::time::sleep(Duration::from_millis(1000)).await;

        let lines = sink.lines_tagged("Json");
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.priority == Priority::Error));
        assert!(lines[1].text.ends_with(" 2"));
        assert!(generator.registry().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn presets_register_six_tasks_and_stop_all_clears_them() {
        let sink = Arc::new(MemorySink::new());
        let mut generator = generator(&sink);

        let ids = generator.start_presets();
        assert_eq!(ids.len(), 6);
        assert_eq!(generator.registry().ids().collect::<Vec<_>>(), ids);

        tokio::time::sleep(Duration::from_millis(250)).await;
        generator.stop_all();
        assert!(generator.registry().is_empty());

        let emitted = sink.lines().len();
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(sink.lines().len(), emitted);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_generator_stops_its_tasks() {
        let sink = Arc::new(MemorySink::new());
        let mut generator = generator(&sink);
        generator.start(
            LogEmissionOptions::default()
                .with_repeat(true)
                .with_repeat_interval(Duration::from_millis(10)),
        );

        drop(generator);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(sink.lines().is_empty());
    }

    #[tokio::test]
    async fn non_fatal_goes_through_the_sink() {
        let sink = Arc::new(MemorySink::new());
        let generator = generator(&sink);

        generator.perform(SpecialAction::NonFatal);

        assert_eq!(sink.lines_tagged(crate::NON_FATAL_TAG).len(), 1);
    }
}
