//! Car Filter Tool
//!
//! Filters the Tata line-up by budget overlap, fuel and seating. Also used
//! directly by the HTTP layer for LLM-free search.

use agent_core::{ParameterSchema, ParameterType, Result as CoreResult, Tool, ToolArgs, ToolSchema, tool::parse_arguments};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::catalog;
use crate::model::{AcQuality, CarSpec, FuelKind};

pub const NAME: &str = "get_tata_cars";

pub const ANY_FUEL: &str = "any";
pub const DEFAULT_MIN_SEATS: u8 = 4;

fn any_fuel() -> String {
    ANY_FUEL.into()
}

const fn default_min_seats() -> u8 {
    DEFAULT_MIN_SEATS
}

/// Search criteria, in lakhs
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CarSearch {
    pub budget_min_lakhs: Decimal,
    pub budget_max_lakhs: Decimal,

    /// Fuel name or fragment; `any` or `no preference` disables the filter
    #[serde(default = "any_fuel")]
    pub fuel_preference: String,

    #[serde(default = "default_min_seats", deserialize_with = "crate::args::whole_number")]
    pub min_seats: u8,
}

impl CarSearch {
    pub fn new(budget_min_lakhs: Decimal, budget_max_lakhs: Decimal) -> Self {
        Self {
            budget_min_lakhs,
            budget_max_lakhs,
            fuel_preference: any_fuel(),
            min_seats: DEFAULT_MIN_SEATS,
        }
    }

    #[must_use]
    pub fn fuel(mut self, preference: impl Into<String>) -> Self {
        self.fuel_preference = preference.into();
        self
    }

    #[must_use]
    pub const fn min_seats(mut self, seats: u8) -> Self {
        self.min_seats = seats;
        self
    }

    fn wants_fuel(&self, car: &CarSpec) -> bool {
        let preference = self.fuel_preference.trim().to_lowercase();
        matches!(preference.as_str(), "any" | "no preference") || car.matches_fuel(&preference)
    }

    pub fn matches(&self, car: &CarSpec) -> bool {
        car.overlaps_budget(self.budget_min_lakhs, self.budget_max_lakhs)
            && self.wants_fuel(car)
            && car.seats >= self.min_seats
    }

    /// Matching cars in catalogue order
    pub fn run(&self) -> SearchResults {
        let matching_cars: Vec<CarMatch> = catalog::cars()
            .iter()
            .filter(|car| self.matches(car))
            .map(CarMatch::from)
            .collect();

        tracing::debug!(
            budget_min = %self.budget_min_lakhs,
            budget_max = %self.budget_max_lakhs,
            fuel = %self.fuel_preference,
            min_seats = self.min_seats,
            matches = matching_cars.len(),
            "car search"
        );

        SearchResults {
            total_matches: matching_cars.len(),
            search_criteria: SearchCriteria {
                budget: format!("{}–{} Lakhs", self.budget_min_lakhs, self.budget_max_lakhs),
                fuel: self.fuel_preference.clone(),
                min_seats: self.min_seats,
            },
            matching_cars,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResults {
    pub total_matches: usize,
    pub search_criteria: SearchCriteria,
    pub matching_cars: Vec<CarMatch>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchCriteria {
    pub budget: String,
    pub fuel: String,
    pub min_seats: u8,
}

/// One matching car as shown to the model and the search UI
#[derive(Clone, Debug, Serialize)]
pub struct CarMatch {
    pub name: &'static str,
    pub segment: &'static str,
    pub price_range: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_min: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_max: Decimal,
    pub fuel_types: &'static [FuelKind],
    #[serde(with = "rust_decimal::serde::float_option")]
    pub mileage_kmpl: Option<Decimal>,
    pub ev_range_km: Option<u32>,
    pub power_ps: u32,
    pub boot_litres: u32,
    pub seats: u8,
    pub ground_clearance: u32,
    pub safety_stars: u8,
    pub ac_quality: AcQuality,
    pub best_for: &'static [&'static str],
    pub not_good_for: &'static [&'static str],
    pub emi_approx: u32,
    pub usp: &'static str,
}

impl From<&CarSpec> for CarMatch {
    fn from(car: &CarSpec) -> Self {
        Self {
            name: car.name,
            segment: car.segment,
            price_range: format!("₹{}–{} Lakhs", car.price_min, car.price_max),
            price_min: car.price_min,
            price_max: car.price_max,
            fuel_types: car.fuel_types,
            mileage_kmpl: car.mileage_kmpl,
            ev_range_km: car.ev_range_km,
            power_ps: car.power_ps,
            boot_litres: car.boot_litres,
            seats: car.seats,
            ground_clearance: car.ground_clearance,
            safety_stars: car.safety_rating,
            ac_quality: car.ac_quality,
            best_for: car.best_for,
            not_good_for: car.not_good_for,
            emi_approx: car.emi_min,
            usp: car.usp,
        }
    }
}

/// Tool for filtering the Tata line-up
pub struct CarFilterTool;

#[async_trait]
impl Tool for CarFilterTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Filter Tata cars by budget (in lakhs), fuel type and minimum seats. \
                          Returns full specs for every car with a variant inside the budget."
                .into(),
            parameters: vec![
                ParameterSchema::required("budget_min_lakhs", ParameterType::Number, "Minimum budget in lakhs, e.g. 8.0"),
                ParameterSchema::required("budget_max_lakhs", ParameterType::Number, "Maximum budget in lakhs, e.g. 16.0"),
                ParameterSchema::optional(
                    "fuel_preference",
                    ParameterType::String,
                    "'Petrol', 'Diesel', 'CNG', 'EV' or 'any'",
                    json!(ANY_FUEL),
                ),
                ParameterSchema::optional(
                    "min_seats",
                    ParameterType::Integer,
                    "Minimum seats required",
                    json!(DEFAULT_MIN_SEATS),
                ),
            ],
        }
    }

    async fn execute(&self, args: &ToolArgs) -> CoreResult<Value> {
        let search: CarSearch = parse_arguments(args)?;
        Ok(serde_json::to_value(search.run())?)
    }
}
