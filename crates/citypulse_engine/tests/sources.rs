use citypulse_core::{Cursor, Summary};
use citypulse_engine::{
    parse_base_url, CommentSource, FailureKind, GeoNamesClient, Geocoder, HttpSettings,
    JsonClient, PageSummary, PushshiftSource, SummaryLookup, WikipediaClient,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> JsonClient {
    JsonClient::new(&HttpSettings::default()).expect("client")
}

fn pushshift(server: &MockServer) -> PushshiftSource {
    let base = parse_base_url(&format!("{}/reddit/search/comment", server.uri())).unwrap();
    PushshiftSource::new(client(), base, "digitalnomad")
}

#[tokio::test]
async fn comment_page_is_requested_below_the_cursor_and_sorted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reddit/search/comment"))
        .and(query_param("subreddit", "digitalnomad"))
        .and(query_param("before", "90"))
        .and(query_param("size", "100"))
        .and(query_param("sort", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "x2", "created_utc": 80, "body": "Bali" },
                { "id": "x1", "created_utc": 89.0, "body": "Lisbon" },
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = pushshift(&server)
        .fetch_page(Some(Cursor::new(89)), 100)
        .await
        .unwrap();

    let keys: Vec<_> = records.iter().map(|r| (r.id.as_str(), r.sort_key)).collect();
    assert_eq!(keys, vec![("x1", 89), ("x2", 80)]);
    let payload: serde_json::Value = serde_json::from_str(&records[0].payload).unwrap();
    assert_eq!(payload["body"], "Lisbon");
}

#[tokio::test]
async fn first_page_has_no_before_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reddit/search/comment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let source = pushshift(&server);
    assert!(source.fetch_page(None, 100).await.unwrap().is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query_pairs().all(|(key, _)| key != "before"));
}

#[tokio::test]
async fn unexpected_page_shape_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "error": "shard failure",
        })))
        .mount(&server)
        .await;

    let err = pushshift(&server).fetch_page(None, 100).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn remaining_count_comes_from_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("metadata", "true"))
        .and(query_param("size", "0"))
        .and(query_param("before", "1601"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "metadata": { "total_results": 1234 }
        })))
        .mount(&server)
        .await;

    let count = pushshift(&server)
        .count_before(Some(Cursor::new(1600)))
        .await
        .unwrap();
    assert_eq!(count, 1234);
}

#[tokio::test]
async fn server_errors_carry_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = pushshift(&server).fetch_page(None, 100).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(429));
}

fn geonames(server: &MockServer) -> GeoNamesClient {
    let base = parse_base_url(&format!("{}/searchJSON", server.uri())).unwrap();
    GeoNamesClient::new(client(), base, "demo")
}

#[tokio::test]
async fn geocoder_keeps_the_best_match_verbatim() {
    let server = MockServer::start().await;
    let paris = json!({
        "geonameId": 2988507,
        "name": "Paris",
        "countryName": "France",
        "lat": "48.85341",
        "lng": "2.3488",
        "fcl": "P"
    });
    Mock::given(method("GET"))
        .and(path("/searchJSON"))
        .and(query_param("q", "Paris"))
        .and(query_param("maxRows", "1"))
        .and(query_param("username", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalResultsCount": 3,
            "geonames": [paris.clone()]
        })))
        .mount(&server)
        .await;

    let hit = geonames(&server).geocode("Paris").await.unwrap().unwrap();
    assert_eq!(hit.id, "2988507");
    let raw: serde_json::Value = serde_json::from_str(&hit.raw).unwrap();
    assert_eq!(raw, paris);
}

#[tokio::test]
async fn geocoder_without_matches_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalResultsCount": 0,
            "geonames": []
        })))
        .mount(&server)
        .await;

    assert_eq!(geonames(&server).geocode("Nowhere").await.unwrap(), None);
}

#[tokio::test]
async fn geocoder_status_body_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": {
                "message": "the hourly limit of 1000 credits has been exceeded",
                "value": 19
            }
        })))
        .mount(&server)
        .await;

    let err = geonames(&server).geocode("Paris").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Provider { code: Some(19) });
    assert!(err.message.contains("hourly limit"));
}

fn wikipedia(server: &MockServer) -> WikipediaClient {
    let base = parse_base_url(&format!("{}/api/rest_v1/", server.uri())).unwrap();
    WikipediaClient::new(client(), base)
}

#[tokio::test]
async fn standard_summary_yields_extract_and_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Chiang_Mai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "standard",
            "title": "Chiang Mai",
            "extract_html": "<p><b>Chiang Mai</b> is a city in Thailand.</p>",
            "content_urls": {
                "desktop": { "page": "https://en.wikipedia.org/wiki/Chiang_Mai" },
                "mobile": { "page": "https://en.m.wikipedia.org/wiki/Chiang_Mai" }
            }
        })))
        .mount(&server)
        .await;

    let summary = wikipedia(&server).summarize("Chiang Mai").await.unwrap();
    assert_eq!(
        summary,
        PageSummary::Standard(Summary {
            html: "<p><b>Chiang Mai</b> is a city in Thailand.</p>".to_string(),
            link: "https://en.wikipedia.org/wiki/Chiang_Mai".to_string(),
        })
    );
}

#[tokio::test]
async fn disambiguation_page_is_reported_as_other() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Georgia"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "disambiguation",
            "title": "Georgia"
        })))
        .mount(&server)
        .await;

    let summary = wikipedia(&server).summarize("Georgia").await.unwrap();
    assert_eq!(
        summary,
        PageSummary::Other {
            kind: "disambiguation".to_string()
        }
    );
}

#[tokio::test]
async fn missing_article_is_an_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = wikipedia(&server).summarize("Atlantis").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(2048)))
        .mount(&server)
        .await;

    let settings = HttpSettings {
        max_bytes: 1024,
        ..HttpSettings::default()
    };
    let base = parse_base_url(&format!("{}/api/rest_v1/", server.uri())).unwrap();
    let client = WikipediaClient::new(JsonClient::new(&settings).unwrap(), base);
    let err = client.summarize("Paris").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 1024, .. }));
}

#[test]
fn malformed_base_url_is_rejected() {
    let err = parse_base_url("not a url").unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
