use log::LevelFilter;

#[test]
fn multiple_init() {
    test_logs_generator::init_once(test_logs_generator::Config::default().with_max_level(LevelFilter::Trace));

    // Second initialization should be silently ignored
    test_logs_generator::init_once(test_logs_generator::Config::default().with_max_level(LevelFilter::Error));

    assert_eq!(log::max_level(), LevelFilter::Trace);
}
