#[test]
fn default_init() {
    test_logs_generator::init_once(Default::default());

    // diagnostics of the generator itself are logged at info
    assert_eq!(log::max_level(), log::LevelFilter::Info);
}
