//! Error Types for Car Advisor

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Weather unavailable for {city}: {reason}")]
    WeatherUnavailable { city: String, reason: String },

    #[error("Car '{name}' not found. Available: {available:?}")]
    UnknownCar {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<AdvisorError> for AgentError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::Serialization(e) => Self::Json(e),
            other => Self::ToolExecution(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_car_lists_names() {
        let err = AdvisorError::UnknownCar {
            name: "Swift".into(),
            available: vec!["Tata Punch", "Tata Nexon"],
        };
        assert_eq!(
            err.to_string(),
            r#"Car 'Swift' not found. Available: ["Tata Punch", "Tata Nexon"]"#
        );
    }

    #[test]
    fn test_into_agent_error() {
        let err: AgentError = AdvisorError::InvalidInput("daily_km must not be negative".into()).into();
        assert!(matches!(err, AgentError::ToolExecution(_)));
        assert_eq!(err.to_string(), "Invalid input: daily_km must not be negative");
    }
}
