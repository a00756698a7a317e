use std::fs;

use citypulse_logging::{initialize, pulse_info, LogDestination};
use log::LevelFilter;
use tempfile::TempDir;

#[test]
fn file_destination_receives_messages() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("pipeline.log");

    initialize(LogDestination::TerminalAndFile(path.clone()), LevelFilter::Info);
    pulse_info!("harvest stopped: {}", "exhausted");
    log::logger().flush();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("harvest stopped: exhausted"));
}
