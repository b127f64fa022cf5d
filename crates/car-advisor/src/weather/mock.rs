//! Static Weather Client
//!
//! For testing and offline demos. Answers from a fixed table and reports
//! every other city as unavailable.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{CurrentConditions, WeatherClient};
use crate::error::{AdvisorError, Result};

/// Weather client with canned conditions
#[derive(Default)]
pub struct StaticWeatherClient {
    conditions: HashMap<String, CurrentConditions>,
}

impl StaticWeatherClient {
    /// A client that never has live data, forcing the profile fallback
    pub fn unavailable() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_city(
        mut self,
        city: &str,
        temperature_c: i32,
        humidity_pct: u8,
        description: impl Into<String>,
    ) -> Self {
        self.conditions.insert(
            city.to_lowercase(),
            CurrentConditions {
                temperature_c,
                humidity_pct,
                description: description.into(),
            },
        );
        self
    }
}

#[async_trait]
impl WeatherClient for StaticWeatherClient {
    async fn current(&self, city: &str) -> Result<CurrentConditions> {
        self.conditions
            .get(&city.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| AdvisorError::WeatherUnavailable {
                city: city.to_string(),
                reason: "no static conditions".into(),
            })
    }

    fn source(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_lookup() {
        let client = StaticWeatherClient::default().with_city("Chennai", 33, 78, "Humid");

        let conditions = client.current("chennai").await.unwrap();
        assert_eq!(conditions.humidity_pct, 78);
        assert!(client.current("Delhi").await.is_err());
    }
}
