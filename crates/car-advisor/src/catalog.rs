//! Reference Data
//!
//! Read-only tables for the Tata line-up (Feb 2026 ex-showroom prices),
//! city climate profiles and reference fuel prices. Built once on first use
//! and shared by every request.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{AdvisorError, Result};
use crate::model::{AcQuality, CarSpec, CityProfile, FuelKind, Humidity, Terrain};

use FuelKind::{Cng, Diesel, Ev, Petrol};

/// Key reported when no city-specific fuel price exists
pub const DEFAULT_PRICE_KEY: &str = "DEFAULT";

static CARS: LazyLock<Vec<CarSpec>> = LazyLock::new(|| {
    vec![
        CarSpec {
            name: "Tata Punch",
            segment: "Micro SUV",
            price_min: dec!(6.13),
            price_max: dec!(9.99),
            fuel_types: &[Petrol, Cng, Ev],
            mileage_kmpl: Some(dec!(18.82)),
            engine_cc: Some(1199),
            power_ps: 86,
            boot_litres: 366,
            seats: 5,
            ground_clearance: 190,
            safety_rating: 5,
            ac_quality: AcQuality::Standard,
            best_for: &["City commute", "First car", "Budget buyers"],
            not_good_for: &["Long highway runs", "Hills at speed"],
            emi_min: 8500,
            ev_range_km: Some(315),
            usp: "5-star safety in segment, rugged SUV stance",
        },
        CarSpec {
            name: "Tata Tiago",
            segment: "Hatchback",
            price_min: dec!(5.60),
            price_max: dec!(8.49),
            fuel_types: &[Petrol, Cng, Ev],
            mileage_kmpl: Some(dec!(19.80)),
            engine_cc: Some(1199),
            power_ps: 86,
            boot_litres: 242,
            seats: 5,
            ground_clearance: 165,
            safety_rating: 4,
            ac_quality: AcQuality::Standard,
            best_for: &["Tight budget", "City parking", "CNG savings"],
            not_good_for: &["Rough roads", "Large families"],
            emi_min: 7800,
            ev_range_km: Some(250),
            usp: "Most fuel-efficient Tata, lowest price of entry",
        },
        CarSpec {
            name: "Tata Tigor",
            segment: "Compact Sedan",
            price_min: dec!(7.99),
            price_max: dec!(11.29),
            fuel_types: &[Petrol, Cng, Ev],
            mileage_kmpl: Some(dec!(19.85)),
            engine_cc: Some(1199),
            power_ps: 86,
            boot_litres: 316,
            seats: 5,
            ground_clearance: 170,
            safety_rating: 4,
            ac_quality: AcQuality::Standard,
            best_for: &["Executive look", "CNG savings", "Sedan lovers"],
            not_good_for: &["Rough roads", "Hills"],
            emi_min: 11100,
            ev_range_km: Some(306),
            usp: "Only EV sedan in India under ₹12 lakhs",
        },
        CarSpec {
            name: "Tata Nexon",
            segment: "Compact SUV",
            price_min: dec!(8.10),
            price_max: dec!(15.50),
            fuel_types: &[Petrol, Diesel, Ev],
            mileage_kmpl: Some(dec!(17.01)),
            engine_cc: Some(1497),
            power_ps: 115,
            boot_litres: 382,
            seats: 5,
            ground_clearance: 208,
            safety_rating: 5,
            ac_quality: AcQuality::Good,
            best_for: &["City + highway", "Young families", "EV early adopters"],
            not_good_for: &["Large families needing 7 seats"],
            emi_min: 11200,
            ev_range_km: Some(465),
            usp: "India's #1 selling EV, 5-star safety, highly versatile",
        },
        CarSpec {
            name: "Tata Altroz",
            segment: "Premium Hatchback",
            price_min: dec!(6.60),
            price_max: dec!(10.89),
            fuel_types: &[Petrol, Diesel, Cng],
            mileage_kmpl: Some(dec!(19.38)),
            engine_cc: Some(1199),
            power_ps: 100,
            boot_litres: 345,
            seats: 5,
            ground_clearance: 165,
            safety_rating: 5,
            ac_quality: AcQuality::Excellent,
            best_for: &["Urban comfort", "Hot humid cities", "City professionals"],
            not_good_for: &["Bad roads", "Off-road use"],
            emi_min: 9200,
            ev_range_km: None,
            usp: "Best AC in class, 5-star safety, premium cabin feel",
        },
        CarSpec {
            name: "Tata Harrier",
            segment: "Midsize SUV",
            price_min: dec!(15.49),
            price_max: dec!(26.44),
            fuel_types: &[Diesel],
            mileage_kmpl: Some(dec!(16.35)),
            engine_cc: Some(1956),
            power_ps: 170,
            boot_litres: 425,
            seats: 5,
            ground_clearance: 205,
            safety_rating: 5,
            ac_quality: AcQuality::Excellent,
            best_for: &["Highway cruising", "Family trips", "Hilly terrain", "Status"],
            not_good_for: &["Tight city parking", "Petrol preference"],
            emi_min: 21500,
            ev_range_km: None,
            usp: "ADAS safety features, most powerful Tata, commanding presence",
        },
        CarSpec {
            name: "Tata Safari",
            segment: "Full-size SUV",
            price_min: dec!(16.19),
            price_max: dec!(27.34),
            fuel_types: &[Diesel],
            mileage_kmpl: Some(dec!(14.69)),
            engine_cc: Some(1956),
            power_ps: 170,
            boot_litres: 447,
            seats: 7,
            ground_clearance: 205,
            safety_rating: 5,
            ac_quality: AcQuality::Excellent,
            best_for: &["Large families", "7-seater need", "Long highway trips"],
            not_good_for: &["City parking", "Tight budgets"],
            emi_min: 22500,
            ev_range_km: None,
            usp: "Only 7-seater in Tata lineup, massive presence, highway master",
        },
        CarSpec {
            name: "Tata Curvv",
            segment: "Coupe SUV",
            price_min: dec!(10.00),
            price_max: dec!(19.00),
            fuel_types: &[Petrol, Diesel, Ev],
            mileage_kmpl: Some(dec!(18.01)),
            engine_cc: Some(1497),
            power_ps: 125,
            boot_litres: 500,
            seats: 5,
            ground_clearance: 200,
            safety_rating: 5,
            ac_quality: AcQuality::Excellent,
            best_for: &["Style seekers", "Tech lovers", "EV transition"],
            not_good_for: &["Rear legroom sensitive buyers", "Very tight budgets"],
            emi_min: 13900,
            ev_range_km: Some(502),
            usp: "Largest boot in segment, best EV range, futuristic design",
        },
        CarSpec {
            name: "Tata Sierra EV",
            segment: "Electric SUV",
            price_min: dec!(25.00),
            price_max: dec!(30.00),
            fuel_types: &[Ev],
            mileage_kmpl: None,
            engine_cc: None,
            power_ps: 200,
            boot_litres: 510,
            seats: 5,
            ground_clearance: 210,
            safety_rating: 5,
            ac_quality: AcQuality::Excellent,
            best_for: &["EV enthusiasts", "Premium segment", "Green buyers"],
            not_good_for: &["Long trips without chargers", "Budget buyers"],
            emi_min: 34700,
            ev_range_km: Some(420),
            usp: "Iconic nameplate reborn as EV, most powerful Tata passenger car",
        },
    ]
});

static CITIES: LazyLock<Vec<CityProfile>> = LazyLock::new(|| {
    use Humidity::{High, Low, Moderate, VeryHigh, VeryLow};
    use Terrain::{Flat, Hilly, SteepHills};

    let city = |name: &'static str, humidity: Humidity, terrain: Terrain, kind: &'static str| CityProfile {
        name,
        humidity,
        terrain,
        kind,
    };

    vec![
        city("Mumbai", VeryHigh, Flat, "coastal"),
        city("Chennai", VeryHigh, Flat, "coastal"),
        city("Kochi", VeryHigh, Flat, "coastal"),
        city("Kolkata", High, Flat, "plains"),
        city("Bangalore", Moderate, Flat, "highland"),
        city("Pune", Moderate, Hilly, "highland"),
        city("Delhi", Low, Flat, "plains"),
        city("Lucknow", Moderate, Flat, "plains"),
        city("Hyderabad", Low, Flat, "semi-arid"),
        city("Ahmedabad", Low, Flat, "semi-arid"),
        city("Jaipur", VeryLow, Flat, "desert"),
        city("Shimla", Low, SteepHills, "mountain"),
    ]
});

/// Per-city price list for one fuel, in INR per litre (or per kg for CNG)
struct PriceList {
    cities: Vec<(&'static str, Decimal)>,
    default: Decimal,
}

static PETROL: LazyLock<PriceList> = LazyLock::new(|| PriceList {
    cities: vec![
        ("Mumbai", dec!(104.21)),
        ("Delhi", dec!(94.72)),
        ("Chennai", dec!(100.29)),
        ("Bangalore", dec!(102.86)),
        ("Kolkata", dec!(105.41)),
        ("Hyderabad", dec!(107.41)),
        ("Pune", dec!(104.29)),
        ("Ahmedabad", dec!(96.63)),
        ("Kochi", dec!(107.71)),
        ("Jaipur", dec!(99.72)),
        ("Lucknow", dec!(94.76)),
        ("Shimla", dec!(103.42)),
    ],
    default: dec!(100.00),
});

static DIESEL: LazyLock<PriceList> = LazyLock::new(|| PriceList {
    cities: vec![
        ("Mumbai", dec!(92.15)),
        ("Delhi", dec!(87.62)),
        ("Chennai", dec!(92.44)),
        ("Bangalore", dec!(88.94)),
        ("Kolkata", dec!(92.76)),
        ("Hyderabad", dec!(95.65)),
        ("Pune", dec!(91.42)),
        ("Ahmedabad", dec!(89.33)),
        ("Kochi", dec!(96.26)),
        ("Jaipur", dec!(90.21)),
        ("Lucknow", dec!(87.61)),
        ("Shimla", dec!(91.10)),
    ],
    default: dec!(91.00),
});

static CNG: LazyLock<PriceList> = LazyLock::new(|| PriceList {
    cities: vec![
        ("Mumbai", dec!(73.00)),
        ("Delhi", dec!(74.09)),
        ("Pune", dec!(75.50)),
        ("Ahmedabad", dec!(68.15)),
    ],
    default: dec!(74.00),
});

/// Every car, in catalogue order
pub fn cars() -> &'static [CarSpec] {
    &CARS
}

pub fn car_names() -> Vec<&'static str> {
    CARS.iter().map(|c| c.name).collect()
}

/// First car whose name contains the query or is contained in it,
/// ignoring case. `"nexon"` and `"Tata Nexon XZ+"` both find the Nexon.
pub fn find_car(query: &str) -> Result<&'static CarSpec> {
    let needle = query.trim().to_lowercase();

    CARS.iter()
        .find(|car| {
            let name = car.name.to_lowercase();
            !needle.is_empty() && (name.contains(&needle) || needle.contains(&name))
        })
        .ok_or_else(|| AdvisorError::UnknownCar {
            name: query.to_string(),
            available: car_names(),
        })
}

/// Climate profile by exact city name, ignoring case
pub fn city_profile(city: &str) -> Option<&'static CityProfile> {
    let city = city.trim();
    CITIES.iter().find(|p| p.name.eq_ignore_ascii_case(city))
}

pub fn cities() -> &'static [CityProfile] {
    &CITIES
}

/// Reference price for `fuel` in the first listed city whose name occurs in
/// `city` (so `"Navi Mumbai"` prices as Mumbai). Returns the matched key,
/// or [`DEFAULT_PRICE_KEY`], with the price.
pub fn fuel_price(city: &str, fuel: FuelKind) -> (&'static str, Decimal) {
    let list: &PriceList = match fuel {
        Diesel => &DIESEL,
        Cng => &CNG,
        Petrol | Ev => &PETROL,
    };
    let city = city.to_lowercase();

    list.cities
        .iter()
        .find(|(name, _)| city.contains(&name.to_lowercase()))
        .map_or((DEFAULT_PRICE_KEY, list.default), |&(name, price)| (name, price))
}
