//! Domain Models
//!
//! Reference records for cars, cities and fuels.
//! Prices use `rust_decimal`; never use f64 for money.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fuel or powertrain a car is sold with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelKind {
    Petrol,
    Diesel,
    #[serde(rename = "CNG")]
    Cng,
    #[serde(rename = "EV")]
    Ev,
}

impl FuelKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Petrol => "Petrol",
            Self::Diesel => "Diesel",
            Self::Cng => "CNG",
            Self::Ev => "EV",
        }
    }

    /// Liquid fuels with a per-litre price. Unknown names map to petrol.
    pub fn priced(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "diesel" => Self::Diesel,
            "cng" => Self::Cng,
            _ => Self::Petrol,
        }
    }
}

impl fmt::Display for FuelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Air-conditioning performance class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcQuality {
    Standard,
    Good,
    Excellent,
}

/// Typical humidity band of a city
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Humidity {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
}

impl Humidity {
    /// Representative relative humidity for the band
    pub const fn percent(self) -> u8 {
        match self {
            Self::VeryHigh => 85,
            Self::High => 70,
            Self::Moderate => 55,
            Self::Low => 35,
            Self::VeryLow => 20,
        }
    }

    pub const fn is_humid(self) -> bool {
        matches!(self, Self::VeryHigh | Self::High)
    }

    /// Estimated daytime temperature for the band
    pub const fn typical_temperature_c(self) -> i32 {
        if self.is_humid() { 32 } else { 25 }
    }

    pub const fn ac_importance(self) -> AcImportance {
        match self {
            Self::VeryHigh | Self::High => AcImportance::High,
            Self::Moderate => AcImportance::Moderate,
            Self::Low | Self::VeryLow => AcImportance::Low,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Flat,
    Hilly,
    SteepHills,
}

/// How much the cabin AC matters for a buyer in given conditions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AcImportance {
    High,
    Moderate,
    Low,
}

impl AcImportance {
    /// Classify from observed conditions
    pub const fn from_conditions(temperature_c: i32, humidity_pct: u8) -> Self {
        if humidity_pct > 70 || temperature_c > 35 {
            Self::High
        } else if temperature_c > 28 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// Climate profile of an Indian city
#[derive(Clone, Debug, Serialize)]
pub struct CityProfile {
    pub name: &'static str,
    pub humidity: Humidity,
    pub terrain: Terrain,
    /// Geography class, e.g. `coastal` or `desert`
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Reference data for one Tata passenger car
#[derive(Clone, Debug, Serialize)]
pub struct CarSpec {
    pub name: &'static str,
    pub segment: &'static str,

    /// Ex-showroom price of the base variant, in lakhs
    pub price_min: Decimal,

    /// Ex-showroom price of the top variant, in lakhs
    pub price_max: Decimal,

    pub fuel_types: &'static [FuelKind],

    /// ARAI mileage; `None` for EV-only models
    pub mileage_kmpl: Option<Decimal>,
    pub engine_cc: Option<u32>,
    pub power_ps: u32,
    pub boot_litres: u32,
    pub seats: u8,

    /// Millimetres
    pub ground_clearance: u32,

    /// Global NCAP stars
    pub safety_rating: u8,
    pub ac_quality: AcQuality,
    pub best_for: &'static [&'static str],
    pub not_good_for: &'static [&'static str],

    /// Approximate EMI at the base price, INR per month
    pub emi_min: u32,
    pub ev_range_km: Option<u32>,
    pub usp: &'static str,
}

impl CarSpec {
    /// Case-insensitive substring match of `preference` against the fuel names
    pub fn matches_fuel(&self, preference: &str) -> bool {
        let preference = preference.to_lowercase();
        self.fuel_types
            .iter()
            .any(|f| f.as_str().to_lowercase().contains(&preference))
    }

    /// Whether any variant falls inside `[min, max]` lakhs
    pub fn overlaps_budget(&self, min: Decimal, max: Decimal) -> bool {
        self.price_min <= max && self.price_max >= min
    }
}
