use std::fs;

use citypulse_engine::{export_points, points, City, Store};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

fn city(id: &str, name: &str, mentions: u64) -> City {
    City {
        id: id.to_string(),
        city: name.to_string(),
        country_name: Some("Portugal".to_string()),
        lat: Some(38.7),
        lng: Some(-9.1),
        mentions,
        wiki_summary: None,
        wiki_link: None,
    }
}

#[test]
fn popularity_is_relative_to_the_most_mentioned_city() {
    let points = points(vec![city("1", "Lisbon", 8), city("2", "Porto", 2)]);
    assert_eq!(points[0].popularity_index, 1.0);
    assert_eq!(points[1].popularity_index, 0.25);
}

#[test]
fn no_mentions_yield_zero_popularity() {
    let points = points(vec![city("1", "Lisbon", 0)]);
    assert_eq!(points[0].popularity_index, 0.0);
}

#[test]
fn points_serialize_with_camel_case_keys() {
    let value = serde_json::to_value(&points(vec![city("1", "Lisbon", 3)])).unwrap();
    assert_eq!(
        value,
        json!([{
            "id": "1",
            "city": "Lisbon",
            "countryName": "Portugal",
            "lat": 38.7,
            "lng": -9.1,
            "mentions": 3,
            "popularityIndex": 1.0,
            "wikiSummary": null,
            "wikiLink": null
        }])
    );
}

#[test]
fn empty_store_exports_an_empty_array() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("web").join("points.json");
    let store = Store::in_memory().unwrap();

    let summary = export_points(&store, &output).unwrap();
    assert_eq!(summary.points, 0);
    assert_eq!(summary.output_path, output);
    let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, json!([]));
}
