//! FRED API client.
//!
//! Implements `SeriesProvider` over three endpoints:
//! - `category/children`
//! - `category/series`
//! - `series/observations`
//!
//! Requests are blocking and sequential. Bodies are read as text and parsed
//! with `serde_json`, so a payload of the wrong shape surfaces as
//! `ProviderError::Malformed` rather than a transport error.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::data::provider::{ProviderError, SeriesProvider};
use crate::domain::{Category, IndicatorSeries, SeriesMeta};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

pub struct FredClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FredClient {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let api_key = config.api_key()?.to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T, ProviderError> {
        let url = format!("{}/{endpoint}", self.base_url);
        log::debug!("GET {url} {params:?}");

        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("file_type", "json")])
            .query(params)
            .send()
            // Strip the URL: it carries the API key.
            .map_err(|e| ProviderError::Request(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status(resp.status().as_u16()));
        }

        let body = resp
            .text()
            .map_err(|e| ProviderError::Request(e.without_url().to_string()))?;
        parse_json(&body)
    }
}

impl SeriesProvider for FredClient {
    fn child_categories(&self, category_id: u32) -> Result<Vec<Category>, ProviderError> {
        let body: CategoriesResponse =
            self.get_json("category/children", &[("category_id", category_id.to_string())])?;
        Ok(body.categories)
    }

    fn series_in_category(&self, category_id: u32, limit: usize) -> Result<Vec<SeriesMeta>, ProviderError> {
        let body: SeriesListResponse = self.get_json(
            "category/series",
            &[
                ("category_id", category_id.to_string()),
                ("limit", limit.to_string()),
            ],
        )?;
        Ok(body.seriess)
    }

    fn series_observations(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<IndicatorSeries, ProviderError> {
        let body: ObservationsResponse = self.get_json(
            "series/observations",
            &[
                ("series_id", code.to_string()),
                ("observation_start", start.format("%Y-%m-%d").to_string()),
                ("observation_end", end.format("%Y-%m-%d").to_string()),
            ],
        )?;
        observations_to_series(code, body)
    }
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct SeriesListResponse {
    seriess: Vec<SeriesMeta>,
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))
}

fn observations_to_series(code: &str, body: ObservationsResponse) -> Result<IndicatorSeries, ProviderError> {
    let mut observations = Vec::with_capacity(body.observations.len());
    for obs in body.observations {
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| ProviderError::Malformed(format!("invalid date '{}': {e}", obs.date)))?;
        observations.push((date, parse_value(&obs.value)));
    }
    Ok(IndicatorSeries {
        code: code.to_string(),
        observations,
    })
}

/// FRED reports missing observations as `"."`; anything non-numeric is missing.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
