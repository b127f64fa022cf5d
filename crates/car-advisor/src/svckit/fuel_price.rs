//! Fuel Price Tool
//!
//! Reference petrol, diesel and CNG prices with a monthly running-cost
//! estimate at typical Indian usage.

use agent_core::{ParameterSchema, ParameterType, Result as CoreResult, Tool, ToolArgs, ToolSchema, tool::parse_arguments};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::whole_rupees;
use crate::catalog;
use crate::model::FuelKind;

pub const NAME: &str = "get_fuel_price";

pub const SOURCE: &str = "reference_data_feb2026";

/// Assumed distance driven per month
const MONTHLY_KM: Decimal = dec!(1500);

fn petrol() -> String {
    FuelKind::Petrol.as_str().into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Args {
    city: String,
    #[serde(default = "petrol")]
    fuel_type: String,
}

/// Price and running-cost estimate for one fuel in one city
#[derive(Clone, Debug, Serialize)]
pub struct FuelQuote {
    pub city: String,
    pub fuel_type: FuelKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_per_litre: Decimal,
    pub currency: &'static str,
    pub source: &'static str,
    pub monthly_cost_estimate: i64,
    pub annual_cost_estimate: i64,
    pub assumptions: String,
}

/// Fleet-average mileage used for the estimate
const fn average_mileage(fuel: FuelKind) -> Decimal {
    match fuel {
        FuelKind::Cng => dec!(26.0),
        FuelKind::Diesel => dec!(18.0),
        FuelKind::Petrol | FuelKind::Ev => dec!(17.0),
    }
}

/// Quote `fuel_type` in `city`. Unknown fuel names price as petrol; cities
/// without a listed price use the national default.
pub fn quote(city: &str, fuel_type: &str) -> FuelQuote {
    let fuel = FuelKind::priced(fuel_type);
    let (matched, price) = catalog::fuel_price(city, fuel);
    let mileage = average_mileage(fuel);
    let monthly = MONTHLY_KM / mileage * price;

    tracing::debug!(city, fuel = %fuel, matched, %price, "fuel price");

    FuelQuote {
        city: city.to_string(),
        fuel_type: fuel,
        price_per_litre: price,
        currency: "INR",
        source: SOURCE,
        monthly_cost_estimate: whole_rupees(monthly),
        annual_cost_estimate: whole_rupees(monthly * dec!(12)),
        assumptions: format!("{MONTHLY_KM} km/month, {mileage} kmpl avg"),
    }
}

/// Tool for reference fuel prices
pub struct FuelPriceTool;

#[async_trait]
impl Tool for FuelPriceTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Get today's petrol, diesel or CNG price per litre in an Indian city, \
                          with a monthly cost estimate at 1,500 km/month."
                .into(),
            parameters: vec![
                ParameterSchema::required("city", ParameterType::String, "Indian city name"),
                ParameterSchema::optional(
                    "fuel_type",
                    ParameterType::String,
                    "'Petrol', 'Diesel' or 'CNG'",
                    json!("Petrol"),
                ),
            ],
        }
    }

    async fn execute(&self, args: &ToolArgs) -> CoreResult<Value> {
        let args: Args = parse_arguments(args)?;
        Ok(serde_json::to_value(quote(&args.city, &args.fuel_type))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyderabad_petrol() {
        let quote = quote("Hyderabad", "Petrol");

        assert_eq!(quote.price_per_litre, dec!(107.41));
        assert_eq!(quote.monthly_cost_estimate, 9477);
        assert_eq!(quote.annual_cost_estimate, 113_728);
        assert_eq!(quote.assumptions, "1500 km/month, 17.0 kmpl avg");
    }

    #[test]
    fn test_partial_city_and_lowercase_fuel() {
        let quote = quote("Navi Mumbai", "cng");

        assert_eq!(quote.fuel_type, FuelKind::Cng);
        assert_eq!(quote.price_per_litre, dec!(73.00));
        assert_eq!(quote.monthly_cost_estimate, 4212);
        assert_eq!(quote.annual_cost_estimate, 50_538);
    }

    #[test]
    fn test_unknown_city_and_fuel_use_defaults() {
        let quote = quote("Goa", "Electric");

        assert_eq!(quote.fuel_type, FuelKind::Petrol);
        assert_eq!(quote.price_per_litre, dec!(100.00));
        assert_eq!(quote.monthly_cost_estimate, 8824);
    }

    #[tokio::test]
    async fn test_execute_defaults_to_petrol() {
        let args = json!({"city": "Delhi"});
        let value = FuelPriceTool.execute(args.as_object().unwrap()).await.unwrap();

        assert_eq!(value["fuel_type"], "Petrol");
        assert_eq!(value["price_per_litre"], 94.72);
        assert_eq!(value["currency"], "INR");
        assert_eq!(value["source"], SOURCE);
    }
}
