use std::sync::Arc;
use std::time::Duration;
use test_logs_generator::{
    Config, Generator, LogEmissionOptions, LogLevel, MemorySink, MessageKind, Priority,
    SpecialAction, JSON_SAMPLE, NON_FATAL_TAG,
};

fn repeating(tag: &str, interval_ms: u64) -> LogEmissionOptions {
    LogEmissionOptions::default()
        .with_tag(tag)
        .with_repeat(true)
        .with_repeat_interval(Duration::from_millis(interval_ms))
}

#[tokio::test(start_paused = true)]
async fn counters_are_ordered_per_task() {
    let sink = Arc::new(MemorySink::new());
    let mut generator = Generator::new(Config::default(), sink.clone());

    generator.start(repeating("Fast", 100).with_custom_message("fast"));
    generator.start(repeating("Slow", 250).with_custom_message("slow"));

    tokio::time::sleep(Duration::from_millis(1010)).await;
    generator.stop_all();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let fast: Vec<String> = sink.lines_tagged("Fast").into_iter().map(|l| l.text).collect();
    let slow: Vec<String> = sink.lines_tagged("Slow").into_iter().map(|l| l.text).collect();
    assert_eq!(fast, (1..=10).map(|n| format!("fast {n}")).collect::<Vec<_>>());
    assert_eq!(slow, (1..=4).map(|n| format!("slow {n}")).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn random_level_and_kind_vary_between_ticks() {
    let sink = Arc::new(MemorySink::new());
    let mut generator = Generator::new(Config::default(), sink.clone());

    let id = generator
        .start(
            repeating("Chaos", 10)
                .with_level(LogLevel::Random)
                .with_message_kind(MessageKind::Random)
                .with_random_message_length(30)
                .with_counter(false),
        )
        .unwrap();
    tokio::time::sleep(Duration::from_millis(2005)).await;
    generator.stop(id);

    let lines = sink.lines_tagged("Chaos");
    assert_eq!(lines.len(), 200);
    let priorities: std::collections::HashSet<Priority> = lines.iter().map(|l| l.priority).collect();
    assert_eq!(priorities.len(), Priority::ALL.len());
    assert!(lines.iter().any(|l| l.text == JSON_SAMPLE));
    assert!(lines.iter().any(|l| l.text.len() == 30 && l.text != JSON_SAMPLE));
}

#[tokio::test(start_paused = true)]
async fn one_shot_with_custom_text() {
    let sink = Arc::new(MemorySink::new());
    let mut generator = Generator::new(Config::default(), sink.clone());

    generator.start(
        LogEmissionOptions::default()
            .with_level(LogLevel::Assert)
            .with_tag("Single")
            .with_custom_message("X")
            .with_counter(false),
    );
    tokio::time::sleep(Duration::from_secs(1)).await;

    let lines = sink.lines_tagged("Single");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "X");
    assert_eq!(lines[0].priority, Priority::Assert);
    assert!(generator.registry().is_empty());
}

#[test]
fn generator_outside_async_context() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .unwrap();
    let sink = Arc::new(MemorySink::new());
    let mut generator =
        Generator::with_runtime(Config::default(), sink.clone(), runtime.handle().clone());

    let id = generator.start(repeating("Threaded", 5)).unwrap();
    std::thread::sleep(Duration::from_millis(200));
    assert!(generator.stop(id));

    assert!(!sink.lines_tagged("Threaded").is_empty());
    generator.perform(SpecialAction::NonFatal);
    assert_eq!(sink.lines_tagged(NON_FATAL_TAG).len(), 1);
}

#[test]
fn crash_escapes_the_generator() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let generator = Generator::with_runtime(
        Config::default(),
        Arc::new(MemorySink::new()),
        runtime.handle().clone(),
    );

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        generator.perform(SpecialAction::Crash)
    }));
    assert!(outcome.is_err());
}
