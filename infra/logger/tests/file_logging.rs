use cdmi_logger::{LevelFilter, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn file_logging_creates_log_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder()
        .name("integration-file-logging")
        .console(false)
        .directory(&log_dir)
        .json(true)
        .level(LevelFilter::INFO)
        .init()?;

    assert!(logger.has_file_sink());
    tracing::info!(object = "docs/readme.txt", "hello from integration test");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    assert!(contents.contains("docs/readme.txt"), "structured field should be logged");
    Ok(())
}
