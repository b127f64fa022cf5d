//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the car advisor.

pub mod car_filter;
pub mod city_weather;
pub mod fuel_price;
pub mod tco_calculator;

pub use car_filter::{CarFilterTool, CarSearch, SearchResults};
pub use city_weather::{CityWeatherTool, WeatherReport};
pub use fuel_price::{FuelPriceTool, FuelQuote};
pub use tco_calculator::{TcoCalculatorTool, TcoReport};

use rust_decimal::Decimal;

/// Round to whole rupees, ties to even
pub(crate) fn whole_rupees(amount: Decimal) -> i64 {
    i64::try_from(amount.round()).unwrap_or(if amount.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// `1344061` -> `1,344,061`
pub(crate) fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
