//! FRED API integration for the liquidity, dollar, credit and market series.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{RawSeries, Symbol};
use crate::error::{AppError, EXIT_CONFIG, EXIT_SERVICE};

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 100_000;

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::new(EXIT_CONFIG, "Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Fetch every known symbol from `start` onwards, one request per series.
    pub fn fetch_all(&self, start: NaiveDate) -> Result<Vec<RawSeries>, AppError> {
        Symbol::ALL
            .iter()
            .map(|&symbol| self.fetch_symbol(symbol, start))
            .collect()
    }

    pub fn fetch_symbol(&self, symbol: Symbol, start: NaiveDate) -> Result<RawSeries, AppError> {
        let observations = self.fetch_series(symbol.series_id(), start)?;
        if observations.is_empty() {
            return Err(AppError::new(
                EXIT_SERVICE,
                format!("No observations returned for series {}.", symbol.series_id()),
            ));
        }
        info!(
            series = symbol.series_id(),
            column = symbol.column(),
            n_obs = observations.len(),
            "fetched FRED series"
        );
        Ok(RawSeries::new(symbol.column(), observations))
    }

    fn fetch_series(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Option<f64>)>, AppError> {
        debug!(series = series_id, %start, "requesting FRED observations");
        let start = start.to_string();
        let limit = OBS_LIMIT.to_string();
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "asc"),
                ("observation_start", start.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .map_err(|e| AppError::new(EXIT_SERVICE, format!("FRED request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                EXIT_SERVICE,
                format!("FRED request for {series_id} failed with status {}.", resp.status()),
            ));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::new(EXIT_SERVICE, format!("Failed to parse FRED response: {e}")))?;

        parse_observations(body.observations)
    }
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

fn parse_observations(observations: Vec<Observation>) -> Result<Vec<(NaiveDate, Option<f64>)>, AppError> {
    observations
        .into_iter()
        .map(|obs| {
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d").map_err(|e| {
                AppError::new(EXIT_SERVICE, format!("Invalid FRED date '{}': {e}", obs.date))
            })?;
            // Missing values stay in the series so the aligner sees the date.
            Ok((date, parse_value(&obs.value)))
        })
        .collect()
}

/// FRED marks missing observations with `"."`.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_treats_dot_as_missing() {
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("  "), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("4.12"), Some(4.12));
        assert_eq!(parse_value(" 6891234 "), Some(6_891_234.0));
    }

    #[test]
    fn observations_keep_missing_dates() {
        let body: ObservationsResponse = serde_json::from_str(
            r#"{"observations":[
                {"realtime_start":"2025-01-06","date":"2025-01-02","value":"3.01"},
                {"realtime_start":"2025-01-06","date":"2025-01-03","value":"."}
            ]}"#,
        )
        .unwrap();
        let obs = parse_observations(body.observations).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].1, Some(3.01));
        assert_eq!(obs[1], (NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(), None));
    }

    #[test]
    fn bad_date_is_a_service_error() {
        let err = parse_observations(vec![Observation {
            date: "2025/01/02".to_string(),
            value: "1".to_string(),
        }])
        .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_SERVICE);
    }
}
