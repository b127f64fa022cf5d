//! Total Cost of Ownership Tool
//!
//! Monthly and N-year cost of owning the base variant of a Tata car:
//! loan EMI, fuel or charging, insurance and maintenance, plus a 5-year
//! resale estimate.
//!
//! ```text
//! EMI          = P·r·(1+r)^n / ((1+r)^n − 1)   P = 80% of price, r = 8.5%/12, n = 84
//! Charging     = km/100 · 15 kWh · ₹7
//! Fuel         = km / mileage · price per litre
//! Insurance    = 3% of price per year
//! Maintenance  = ₹10,000 per 10,000 km, at least one service a year
//! Resale (5y)  = price · 0.80 · 0.85 · 0.85 · 0.90 · 0.90
//! ```

use agent_core::{ParameterSchema, ParameterType, Result as CoreResult, Tool, ToolArgs, ToolSchema, tool::parse_arguments};
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{fuel_price, group_thousands, whole_rupees};
use crate::catalog;
use crate::error::{AdvisorError, Result};

pub const NAME: &str = "calculate_tco";

pub const DEFAULT_OWNERSHIP_YEARS: u32 = 5;

const RUPEES_PER_LAKH: Decimal = dec!(100000);
const DOWN_PAYMENT_SHARE: Decimal = dec!(0.20);
const ANNUAL_INTEREST: Decimal = dec!(0.085);
const LOAN_MONTHS: u64 = 84;
const EV_KWH_PER_100KM: Decimal = dec!(15);
const EV_RUPEES_PER_KWH: Decimal = dec!(7);
const INSURANCE_SHARE: Decimal = dec!(0.03);
const SERVICE_INTERVAL_KM: Decimal = dec!(10000);
const SERVICE_COST: Decimal = dec!(10000);
const FALLBACK_MILEAGE: Decimal = dec!(18.0);

/// Upper bound on `daily_km`; keeps every cost product inside `Decimal` range
pub const MAX_DAILY_KM: Decimal = dec!(2000);
pub const MAX_OWNERSHIP_YEARS: u32 = 50;

const fn default_years() -> u32 {
    DEFAULT_OWNERSHIP_YEARS
}

fn petrol() -> String {
    "Petrol".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Args {
    car_name: String,
    city: String,
    daily_km: Decimal,
    #[serde(default = "default_years", deserialize_with = "crate::args::whole_number")]
    ownership_years: u32,
    #[serde(default = "petrol")]
    fuel_type: String,
}

/// Monthly costs in whole rupees
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyBreakdown {
    #[serde(rename = "emi_7yr_8.5pct")]
    pub emi: i64,
    pub fuel_cost: i64,
    pub insurance: i64,
    pub maintenance: i64,
    pub total_monthly: i64,
}

#[derive(Clone, Debug)]
pub struct TcoReport {
    pub car: &'static str,
    pub ex_showroom_lakhs: Decimal,
    pub down_payment: i64,
    pub monthly: MonthlyBreakdown,
    pub annual_total: i64,
    pub ownership_years: u32,
    pub total_cost: i64,
    pub resale_5yr_lakhs: Decimal,
    pub fuel_note: String,
    pub daily_km: Decimal,
}

impl TcoReport {
    /// JSON payload; the total's key carries the ownership period
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "car": self.car,
            "variant": "Base variant",
            "ex_showroom_price": format!("₹{:.2} Lakhs", self.ex_showroom_lakhs),
            "down_payment": format!("₹{}", group_thousands(self.down_payment)),
            "monthly_breakdown": self.monthly,
            "annual_total": self.annual_total,
            "estimated_resale_5yr": format!("₹{:.2} Lakhs", self.resale_5yr_lakhs),
            "fuel_note": self.fuel_note,
            "daily_km_assumption": self.daily_km.to_f64(),
        });
        if let Some(map) = value.as_object_mut() {
            map.insert(format!("total_{}yr_cost", self.ownership_years), json!(self.total_cost));
        }
        value
    }
}

/// Equated monthly instalment for `principal`
fn emi(principal: Decimal) -> Decimal {
    let rate = ANNUAL_INTEREST / dec!(12);
    let growth = (Decimal::ONE + rate).powu(LOAN_MONTHS);
    principal * rate * growth / (growth - Decimal::ONE)
}

/// Cost of owning the base variant of `car_name`
pub fn calculate(
    car_name: &str,
    city: &str,
    daily_km: Decimal,
    ownership_years: u32,
    fuel_type: &str,
) -> Result<TcoReport> {
    if daily_km.is_sign_negative() || daily_km > MAX_DAILY_KM {
        return Err(AdvisorError::InvalidInput(format!(
            "daily_km must be between 0 and {MAX_DAILY_KM}, got {daily_km}"
        )));
    }
    if !(1..=MAX_OWNERSHIP_YEARS).contains(&ownership_years) {
        return Err(AdvisorError::InvalidInput(format!(
            "ownership_years must be between 1 and {MAX_OWNERSHIP_YEARS}, got {ownership_years}"
        )));
    }

    let car = catalog::find_car(car_name)?;
    let price = car.price_min * RUPEES_PER_LAKH;

    let down_payment = price * DOWN_PAYMENT_SHARE;
    let emi = emi(price - down_payment);

    let monthly_km = daily_km * dec!(30);
    let (fuel_cost, fuel_note) = if fuel_type.trim().eq_ignore_ascii_case("ev") {
        (
            monthly_km / dec!(100) * EV_KWH_PER_100KM * EV_RUPEES_PER_KWH,
            format!("EV: ₹{EV_RUPEES_PER_KWH}/kWh home charging, {EV_KWH_PER_100KM} kWh/100 km"),
        )
    } else {
        let quote = fuel_price::quote(city, fuel_type);
        let mileage = car.mileage_kmpl.unwrap_or(FALLBACK_MILEAGE);
        (
            monthly_km / mileage * quote.price_per_litre,
            format!("₹{}/L at {mileage} kmpl", quote.price_per_litre),
        )
    };

    let insurance = price * INSURANCE_SHARE / dec!(12);

    let services_per_year = (daily_km * dec!(365) / SERVICE_INTERVAL_KM).max(Decimal::ONE);
    let maintenance = services_per_year * SERVICE_COST / dec!(12);

    let monthly_total = emi + fuel_cost + insurance + maintenance;
    let annual_total = monthly_total * dec!(12);
    let total_cost = annual_total * Decimal::from(ownership_years) + down_payment;

    let resale = price * dec!(0.80) * dec!(0.85) * dec!(0.85) * dec!(0.90) * dec!(0.90);

    tracing::debug!(car = car.name, city, %daily_km, total_monthly = %monthly_total.round(), "tco");

    Ok(TcoReport {
        car: car.name,
        ex_showroom_lakhs: car.price_min,
        down_payment: whole_rupees(down_payment),
        monthly: MonthlyBreakdown {
            emi: whole_rupees(emi),
            fuel_cost: whole_rupees(fuel_cost),
            insurance: whole_rupees(insurance),
            maintenance: whole_rupees(maintenance),
            total_monthly: whole_rupees(monthly_total),
        },
        annual_total: whole_rupees(annual_total),
        ownership_years,
        total_cost: whole_rupees(total_cost),
        resale_5yr_lakhs: resale / RUPEES_PER_LAKH,
        fuel_note,
        daily_km,
    })
}

/// Tool for total cost of ownership
pub struct TcoCalculatorTool;

#[async_trait]
impl Tool for TcoCalculatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NAME.into(),
            description: "Calculate the N-year total cost of ownership for a Tata car: EMI \
                          (8.5%, 7-year loan, 20% down), fuel, insurance and maintenance."
                .into(),
            parameters: vec![
                ParameterSchema::required("car_name", ParameterType::String, "Tata car name, e.g. 'Tata Nexon'"),
                ParameterSchema::required("city", ParameterType::String, "City for the fuel price lookup"),
                ParameterSchema::required("daily_km", ParameterType::Number, "Average km driven per day"),
                ParameterSchema::optional(
                    "ownership_years",
                    ParameterType::Integer,
                    "Years to project",
                    json!(DEFAULT_OWNERSHIP_YEARS),
                ),
                ParameterSchema::optional(
                    "fuel_type",
                    ParameterType::String,
                    "'Petrol', 'Diesel', 'CNG' or 'EV'",
                    json!("Petrol"),
                ),
            ],
        }
    }

    async fn execute(&self, args: &ToolArgs) -> CoreResult<Value> {
        let args: Args = parse_arguments(args)?;

        match calculate(&args.car_name, &args.city, args.daily_km, args.ownership_years, &args.fuel_type) {
            Ok(report) => Ok(report.to_json()),
            Err(e @ AdvisorError::UnknownCar { .. }) => Ok(json!({ "error": e.to_string() })),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nexon_bangalore_petrol() {
        let report = calculate("Tata Nexon", "Bangalore", dec!(35), 5, "Petrol").unwrap();

        assert_eq!(report.car, "Tata Nexon");
        assert_eq!(report.down_payment, 162_000);
        assert_eq!(
            report.monthly,
            MonthlyBreakdown {
                emi: 10_262,
                fuel_cost: 6_349,
                insurance: 2_025,
                maintenance: 1_065,
                total_monthly: 19_701,
            }
        );
        assert_eq!(report.annual_total, 236_412);
        assert_eq!(report.total_cost, 1_344_061);
        assert_eq!(report.fuel_note, "₹102.86/L at 17.01 kmpl");
    }

    #[test]
    fn test_ev_charging_costs() {
        let report = calculate("Sierra", "Delhi", dec!(40), 3, "EV").unwrap();

        assert_eq!(report.car, "Tata Sierra EV");
        assert_eq!(report.monthly.emi, 31_673);
        assert_eq!(report.monthly.fuel_cost, 1_260);
        assert_eq!(report.monthly.insurance, 6_250);
        assert_eq!(report.monthly.maintenance, 1_217);
        assert_eq!(report.total_cost, 1_954_387);
        assert_eq!(report.fuel_note, "EV: ₹7/kWh home charging, 15 kWh/100 km");
    }

    #[test]
    fn test_low_mileage_still_services_yearly() {
        let report = calculate("Tiago", "Pune", dec!(5), 5, "CNG").unwrap();
        assert_eq!(report.monthly.maintenance, 833);
    }

    #[test]
    fn test_negative_distance_rejected() {
        assert!(matches!(
            calculate("Nexon", "Pune", dec!(-1), 5, "Petrol"),
            Err(AdvisorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_out_of_range_inputs_rejected() {
        assert!(matches!(
            calculate("Nexon", "Pune", dec!(2000.5), 5, "Petrol"),
            Err(AdvisorError::InvalidInput(_))
        ));
        assert!(matches!(
            calculate("Nexon", "Pune", dec!(30), 0, "Petrol"),
            Err(AdvisorError::InvalidInput(_))
        ));
        assert!(matches!(
            calculate("Nexon", "Pune", dec!(30), 51, "Petrol"),
            Err(AdvisorError::InvalidInput(_))
        ));
        assert!(calculate("Safari", "Pune", MAX_DAILY_KM, MAX_OWNERSHIP_YEARS, "Diesel").is_ok());
    }

    #[test]
    fn test_json_payload() {
        let value = calculate("Nexon", "Bangalore", dec!(35), 5, "Petrol").unwrap().to_json();

        assert_eq!(value["ex_showroom_price"], "₹8.10 Lakhs");
        assert_eq!(value["down_payment"], "₹162,000");
        assert_eq!(value["monthly_breakdown"]["emi_7yr_8.5pct"], 10_262);
        assert_eq!(value["total_5yr_cost"], 1_344_061);
        assert_eq!(value["estimated_resale_5yr"], "₹3.79 Lakhs");
        assert_eq!(value["variant"], "Base variant");
    }

    #[tokio::test]
    async fn test_unknown_car_is_payload() {
        let args = json!({"car_name": "Maruti Swift", "city": "Delhi", "daily_km": 20});
        let value = TcoCalculatorTool.execute(args.as_object().unwrap()).await.unwrap();

        let error = value["error"].as_str().unwrap();
        assert!(error.starts_with("Car 'Maruti Swift' not found. Available: "));
        assert!(error.contains("Tata Curvv"));
    }

    #[tokio::test]
    async fn test_years_key_follows_argument() {
        let args = json!({"car_name": "Punch", "city": "Mumbai", "daily_km": "25", "ownership_years": "7"});
        let value = TcoCalculatorTool.execute(args.as_object().unwrap()).await.unwrap();

        assert!(value.get("total_7yr_cost").is_some());
        assert!(value.get("total_5yr_cost").is_none());
    }
}
