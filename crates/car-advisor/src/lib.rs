//! # car-advisor
//!
//! Tata Motors car-buying advisor: reference data, the four agent tools
//! and the system prompt that drives them.
//!
//! ## Tools
//!
//! ```text
//! ┌────────────────────┬──────────────────────────────────────────────┐
//! │ get_city_weather   │ live wttr.in, city climate profile fallback  │
//! │ get_tata_cars      │ budget overlap + fuel + seats filter         │
//! │ get_fuel_price     │ reference price per litre, monthly estimate  │
//! │ calculate_tco      │ EMI + fuel + insurance + maintenance         │
//! └────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = car_advisor::build_registry(Arc::new(WttrClient::new()?));
//! let agent = AgentBuilder::new()
//!     .provider(provider)
//!     .tools(Arc::new(registry))
//!     .system_prompt(car_advisor::CAR_ADVISOR_PROMPT)
//!     .build()?;
//! ```

pub mod args;
pub mod catalog;
pub mod error;
pub mod guardrail;
pub mod model;
pub mod svckit;
pub mod weather;

use std::sync::Arc;

use agent_core::ToolRegistry;

pub use error::{AdvisorError, Result};
pub use guardrail::{Guardrail, Refusal};
pub use model::{AcImportance, AcQuality, CarSpec, CityProfile, FuelKind, Humidity, Terrain};
pub use weather::{StaticWeatherClient, WeatherClient, WttrClient};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{CarFilterTool, CityWeatherTool, FuelPriceTool, TcoCalculatorTool};
}

/// Registry holding the four advisor tools
pub fn build_registry(weather: Arc<dyn WeatherClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(tools::CityWeatherTool::new(weather));
    registry.register(tools::CarFilterTool);
    registry.register(tools::FuelPriceTool);
    registry.register(tools::TcoCalculatorTool);
    registry
}

/// System prompt for the car advisor agent
pub const CAR_ADVISOR_PROMPT: &str = r"You are the Tata Car Buying Advisor, an expert helping Indian customers choose the right Tata Motors car.

## Scope

You ONLY advise on Tata Motors passenger vehicles. Politely decline questions about other manufacturers or unrelated topics.

## Workflow

For every recommendation request:

1. Call `get_city_weather` for the buyer's city to judge AC needs and terrain
2. Call `get_tata_cars` with the buyer's budget range (in lakhs), fuel preference and seat needs
3. Call `get_fuel_price` for the buyer's city and preferred fuel
4. Call `calculate_tco` for the strongest one or two candidates using the buyer's daily driving
5. Synthesize a recommendation

You may call several tools in the same turn when their inputs are already known. If a detail is missing, assume a sensible default (4 seats, 30 km/day, any fuel) and say so.

## Answer Format

- Lead with the recommended model and variant range
- Explain why it fits the city climate, terrain and budget
- Show the monthly cost breakdown from `calculate_tco`
- Mention one alternative and its trade-off

Only quote prices, specs and costs returned by the tools. Respond warmly and clearly.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_four_tools() {
        let registry = build_registry(Arc::new(StaticWeatherClient::unavailable()));
        assert_eq!(
            registry.names(),
            ["calculate_tco", "get_city_weather", "get_fuel_price", "get_tata_cars"]
        );
    }

    #[test]
    fn test_prompt_names_every_tool() {
        let registry = build_registry(Arc::new(StaticWeatherClient::unavailable()));
        for name in registry.names() {
            assert!(CAR_ADVISOR_PROMPT.contains(name), "prompt missing {name}");
        }
    }
}
