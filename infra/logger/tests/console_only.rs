use cdmi_logger::{LevelFilter, Logger};

#[test]
fn init_console_only_has_no_file_sink() {
    let logger = Logger::builder()
        .name("integration-console-only")
        .console(true)
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    assert!(!logger.has_file_sink(), "console-only logger should not create a file guard");
}
