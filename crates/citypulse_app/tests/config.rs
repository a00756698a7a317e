use citypulse_app::config::{ConfigError, Environment};
use pretty_assertions::assert_eq;

#[test]
fn providers_default_to_public_endpoints() {
    let env = Environment::default();
    assert_eq!(
        env.pushshift_url().unwrap().as_str(),
        "https://api.pushshift.io/reddit/search/comment"
    );
    assert_eq!(env.subreddit(), "digitalnomad");
    assert_eq!(
        env.geonames_url().unwrap().as_str(),
        "http://api.geonames.org/searchJSON"
    );
    assert_eq!(
        env.wikipedia_url().unwrap().as_str(),
        "https://en.wikipedia.org/api/rest_v1/"
    );
}

#[test]
fn endpoints_can_be_overridden() {
    let env = Environment::from_pairs([
        ("PUSHSHIFT_URL", "http://localhost:9000/search"),
        ("PUSHSHIFT_SUBREDDIT", "solotravel"),
    ]);
    assert_eq!(
        env.pushshift_url().unwrap().as_str(),
        "http://localhost:9000/search"
    );
    assert_eq!(env.subreddit(), "solotravel");
}

#[test]
fn malformed_override_names_the_variable() {
    let env = Environment::from_pairs([("GEONAMES_URL", "geonames")]);
    match env.geonames_url() {
        Err(ConfigError::InvalidUrl { name, .. }) => assert_eq!(name, "GEONAMES_URL"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn missing_credentials_are_reported_by_name() {
    let env = Environment::from_pairs([("GEONAMES_USERNAME", "  ")]);
    let err = env.require("GEONAMES_USERNAME").unwrap_err();
    assert!(err.to_string().starts_with("GEONAMES_USERNAME is not set"));
}

#[test]
fn summaries_need_an_identifying_agent() {
    assert!(Environment::default().identified_http_settings().is_err());

    let env = Environment::from_pairs([("USER_AGENT", "citypulse-test (ops@example.org)")]);
    let settings = env.identified_http_settings().unwrap();
    assert_eq!(settings.user_agent, "citypulse-test (ops@example.org)");
}

#[test]
fn recognizer_command_gets_the_model_appended() {
    let env = Environment::from_pairs([("NER_COMMAND", "python3 scripts/ner.py")]);
    assert_eq!(
        env.ner_command("en_core_web_lg").unwrap(),
        vec!["python3", "scripts/ner.py", "--model", "en_core_web_lg"]
    );
    assert!(Environment::default().ner_command("en_core_web_lg").is_err());
}
