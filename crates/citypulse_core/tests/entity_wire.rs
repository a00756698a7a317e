use citypulse_core::Entity;

#[test]
fn entity_reads_recognizer_json() {
    let line = r#"[{"label":"GPE","text":"Lisbon","start":12,"end":18}]"#;
    let entities: Vec<Entity> = serde_json::from_str(line).unwrap();

    assert_eq!(
        entities,
        vec![Entity {
            label: "GPE".to_string(),
            text: "Lisbon".to_string(),
            start: 12,
            end: 18,
        }]
    );
}
