//! wttr.in client
//!
//! Uses the `format=j1` JSON endpoint. Numeric fields arrive as strings.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{CurrentConditions, WeatherClient};
use crate::error::{AdvisorError, Result};

const DEFAULT_BASE_URL: &str = "https://wttr.in";
const TIMEOUT: Duration = Duration::from_secs(6);
const USER_AGENT: &str = "Mozilla/5.0";

pub struct WttrClient {
    client: reqwest::Client,
    base_url: String,
}

impl WttrClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl WeatherClient for WttrClient {
    async fn current(&self, city: &str) -> Result<CurrentConditions> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), city.trim());
        let response = self
            .client
            .get(url)
            .query(&[("format", "j1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::WeatherUnavailable {
                city: city.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let report: Report = response.json().await?;
        report.into_conditions(city)
    }

    fn source(&self) -> &str {
        "wttr.in (live)"
    }
}

#[derive(Debug, Deserialize)]
struct Report {
    #[serde(default)]
    current_condition: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Condition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    humidity: String,
    #[serde(default)]
    weather_desc: Vec<Description>,
}

#[derive(Debug, Deserialize)]
struct Description {
    value: String,
}

impl Report {
    fn into_conditions(self, city: &str) -> Result<CurrentConditions> {
        let unavailable = |reason: String| AdvisorError::WeatherUnavailable {
            city: city.to_string(),
            reason,
        };

        let current = self
            .current_condition
            .into_iter()
            .next()
            .ok_or_else(|| unavailable("no current_condition in report".into()))?;

        let temperature_c = current
            .temp_c
            .trim()
            .parse()
            .map_err(|_| unavailable(format!("bad temp_C '{}'", current.temp_c)))?;
        let humidity_pct = current
            .humidity
            .trim()
            .parse()
            .map_err(|_| unavailable(format!("bad humidity '{}'", current.humidity)))?;

        Ok(CurrentConditions {
            temperature_c,
            humidity_pct,
            description: current
                .weather_desc
                .into_iter()
                .next()
                .map(|d| d.value.trim().to_string())
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(value: serde_json::Value) -> Report {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_j1_report() {
        let conditions = report(json!({
            "current_condition": [{
                "temp_C": "31",
                "humidity": "79",
                "weatherDesc": [{"value": "Partly cloudy "}],
                "windspeedKmph": "11"
            }],
            "nearest_area": []
        }))
        .into_conditions("Mumbai")
        .unwrap();

        assert_eq!(
            conditions,
            CurrentConditions {
                temperature_c: 31,
                humidity_pct: 79,
                description: "Partly cloudy".into(),
            }
        );
    }

    #[test]
    fn test_negative_temperature() {
        let conditions = report(json!({
            "current_condition": [{"temp_C": "-3", "humidity": "40", "weatherDesc": []}]
        }))
        .into_conditions("Shimla")
        .unwrap();
        assert_eq!(conditions.temperature_c, -3);
        assert!(conditions.description.is_empty());
    }

    #[test]
    fn test_empty_report_is_unavailable() {
        let err = report(json!({})).into_conditions("Atlantis").unwrap_err();
        assert!(matches!(err, AdvisorError::WeatherUnavailable { .. }));
    }

    #[test]
    fn test_bad_humidity_is_unavailable() {
        let err = report(json!({
            "current_condition": [{"temp_C": "20", "humidity": "n/a"}]
        }))
        .into_conditions("Pune")
        .unwrap_err();
        assert!(err.to_string().contains("bad humidity"));
    }
}
