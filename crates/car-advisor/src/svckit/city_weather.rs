//! City Weather Tool
//!
//! Current temperature, humidity and terrain for an Indian city. Tries the
//! live weather source first and falls back to the city's climate profile.

use std::sync::Arc;

use agent_core::{ParameterSchema, ParameterType, Result as CoreResult, Tool, ToolArgs, ToolSchema, tool::parse_arguments};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog;
use crate::model::{AcImportance, Humidity, Terrain};
use crate::weather::WeatherClient;

pub const NAME: &str = "get_city_weather";

/// Source label for profile-based estimates
pub const FALLBACK_SOURCE: &str = "city_profile_fallback";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Args {
    city: String,
}

/// Weather summary handed back to the model
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub temperature_c: i32,
    pub humidity_pct: u8,
    pub description: String,
    pub terrain: Terrain,
    pub ac_importance: AcImportance,
    pub source: String,
}

/// Tool for looking up city weather
pub struct CityWeatherTool {
    weather: Arc<dyn WeatherClient>,
}

impl CityWeatherTool {
    pub fn new(weather: Arc<dyn WeatherClient>) -> Self {
        Self { weather }
    }

    pub async fn report(&self, city: &str) -> WeatherReport {
        let profile = catalog::city_profile(city);
        let terrain = profile.map_or(Terrain::Flat, |p| p.terrain);

        match self.weather.current(city).await {
            Ok(live) => {
                tracing::debug!(city, temp = live.temperature_c, humidity = live.humidity_pct, "live weather");
                WeatherReport {
                    city: city.to_string(),
                    temperature_c: live.temperature_c,
                    humidity_pct: live.humidity_pct,
                    description: live.description,
                    terrain,
                    ac_importance: AcImportance::from_conditions(live.temperature_c, live.humidity_pct),
                    source: self.weather.source().to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(city, error = %e, "live weather failed, using city profile");
                let humidity = profile.map_or(Humidity::Moderate, |p| p.humidity);
                WeatherReport {
                    city: city.to_string(),
                    temperature_c: humidity.typical_temperature_c(),
                    humidity_pct: humidity.percent(),
                    description: "Estimated from city climate profile".into(),
                    terrain,
                    ac_importance: humidity.ac_importance(),
                    source: FALLBACK_SOURCE.into(),
                }
            }
        }
    }
}

#[async_trait]
impl Tool for CityWeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Get current temperature, humidity and terrain for an Indian city. \
                          Use it to judge how much AC performance and ground clearance matter."
                .into(),
            parameters: vec![ParameterSchema::required(
                "city",
                ParameterType::String,
                "Indian city name, e.g. 'Mumbai', 'Delhi', 'Shimla'",
            )],
        }
    }

    async fn execute(&self, args: &ToolArgs) -> CoreResult<Value> {
        let args: Args = parse_arguments(args)?;
        Ok(serde_json::to_value(self.report(&args.city).await)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::StaticWeatherClient;

    fn tool(client: StaticWeatherClient) -> CityWeatherTool {
        CityWeatherTool::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_live_conditions() {
        let tool = tool(StaticWeatherClient::default().with_city("Pune", 30, 45, "Sunny"));
        let report = tool.report("Pune").await;

        assert_eq!(report.temperature_c, 30);
        assert_eq!(report.terrain, Terrain::Hilly);
        assert_eq!(report.ac_importance, AcImportance::Moderate);
        assert_eq!(report.source, "static");
    }

    #[tokio::test]
    async fn test_profile_fallback() {
        let report = tool(StaticWeatherClient::unavailable()).report("Mumbai").await;

        assert_eq!(report.temperature_c, 32);
        assert_eq!(report.humidity_pct, 85);
        assert_eq!(report.ac_importance, AcImportance::High);
        assert_eq!(report.source, FALLBACK_SOURCE);
    }

    #[tokio::test]
    async fn test_unknown_city_fallback() {
        let report = tool(StaticWeatherClient::unavailable()).report("Atlantis").await;

        assert_eq!(report.humidity_pct, 55);
        assert_eq!(report.temperature_c, 25);
        assert_eq!(report.terrain, Terrain::Flat);
        assert_eq!(report.ac_importance, AcImportance::Moderate);
    }

    #[tokio::test]
    async fn test_execute_serializes_report() {
        let mut args = ToolArgs::new();
        args.insert("city".into(), "Shimla".into());

        let value = tool(StaticWeatherClient::unavailable()).execute(&args).await.unwrap();
        assert_eq!(value["terrain"], "steep_hills");
        assert_eq!(value["ac_importance"], "LOW");
        assert_eq!(value["humidity_pct"], 35);
    }
}
