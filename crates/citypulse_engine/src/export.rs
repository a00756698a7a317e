use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::persist::{write_atomic, PersistError};
use crate::store::{City, Store, StoreError};

pub const DEFAULT_POINTS_PATH: &str = "data/points.json";

/// One map marker, as consumed by the front end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: String,
    pub city: String,
    pub country_name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub mentions: u64,
    /// Mentions relative to the most mentioned city, in `0.0..=1.0`.
    pub popularity_index: f64,
    pub wiki_summary: Option<String>,
    pub wiki_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub points: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn points(cities: Vec<City>) -> Vec<Point> {
    let max = cities.iter().map(|city| city.mentions).max().unwrap_or(0);
    cities
        .into_iter()
        .map(|city| Point {
            popularity_index: if max == 0 {
                0.0
            } else {
                city.mentions as f64 / max as f64
            },
            id: city.id,
            city: city.city,
            country_name: city.country_name,
            lat: city.lat,
            lng: city.lng,
            mentions: city.mentions,
            wiki_summary: city.wiki_summary,
            wiki_link: city.wiki_link,
        })
        .collect()
}

/// Write every stored city as a JSON array of [`Point`]s, replacing `output` atomically.
pub fn export_points(store: &Store, output: &Path) -> Result<ExportSummary, ExportError> {
    let points = points(store.list_cities()?);
    let body = serde_json::to_vec_pretty(&points)?;
    let output_path = write_atomic(output, &body)?;
    Ok(ExportSummary {
        points: points.len(),
        output_path,
    })
}
