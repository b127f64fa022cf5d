//! Weather Integration
//!
//! Live current-conditions lookup behind a trait, so the weather tool can be
//! tested without the network.

mod mock;
mod wttr;

pub use mock::StaticWeatherClient;
pub use wttr::WttrClient;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Current conditions reported by a live source
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrentConditions {
    pub temperature_c: i32,
    pub humidity_pct: u8,
    pub description: String,
}

/// Weather client trait (Strategy pattern)
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current conditions for a city
    async fn current(&self, city: &str) -> Result<CurrentConditions>;

    /// Label reported as the data source
    fn source(&self) -> &str;
}
