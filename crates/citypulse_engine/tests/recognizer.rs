#![cfg(unix)]

use citypulse_core::Entity;
use citypulse_engine::{EntityRecognizer, ProcessRecognizer, RecognizerError};
use pretty_assertions::assert_eq;

fn shell(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

#[tokio::test]
async fn process_answers_one_line_per_request() {
    let reply = r#"[{"label":"GPE","text":"Lisbon","start":0,"end":6}]"#;
    let script = format!("while read -r line; do echo '{reply}'; done");
    let mut recognizer = ProcessRecognizer::spawn(&shell(&script)).unwrap();

    for _ in 0..2 {
        let entities = recognizer.annotate("Lisbon in spring").await.unwrap();
        assert_eq!(
            entities,
            vec![Entity {
                label: "GPE".to_string(),
                text: "Lisbon".to_string(),
                start: 0,
                end: 6,
            }]
        );
    }
}

#[tokio::test]
async fn process_that_exits_is_reported_closed() {
    let mut recognizer = ProcessRecognizer::spawn(&shell("read -r line; exit 0")).unwrap();
    let err = recognizer.annotate("hello").await.unwrap_err();
    assert!(matches!(err, RecognizerError::Closed | RecognizerError::Io(_)));
}

#[tokio::test]
async fn garbage_reply_is_a_protocol_error() {
    let script = "while read -r line; do echo 'not json'; done";
    let mut recognizer = ProcessRecognizer::spawn(&shell(script)).unwrap();
    let err = recognizer.annotate("hello").await.unwrap_err();
    assert!(matches!(err, RecognizerError::Protocol(_)));
}

#[test]
fn empty_command_is_rejected() {
    assert!(matches!(
        ProcessRecognizer::spawn(&[]),
        Err(RecognizerError::EmptyCommand)
    ));
}
