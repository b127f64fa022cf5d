//! Scope guardrail
//!
//! Optional pre-check applied before a query reaches any provider. It scans
//! for other manufacturers and clearly unrelated topics and returns a
//! refusal instead of spending provider quota.

/// Message returned for out-of-scope queries
pub const REFUSAL: &str = "I can only help with buying a Tata Motors car. \
    Tell me your budget, city, fuel preference or daily driving and I'll suggest a Tata model.";

const OTHER_BRANDS: &[&str] = &[
    "maruti", "suzuki", "hyundai", "mahindra", "kia", "toyota", "honda", "mg", "skoda",
    "volkswagen", "vw", "renault", "nissan", "citroen", "jeep", "byd", "bmw", "audi",
    "mercedes",
];

const OFF_TOPIC: &[&str] = &[
    "recipe", "cricket", "movie", "movies", "politics", "election", "bitcoin", "crypto",
    "stock", "stocks", "homework", "poem", "song",
];

/// Why a query was refused
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Refusal {
    /// Keyword that triggered the refusal
    pub keyword: &'static str,
    pub message: &'static str,
}

/// Keyword-based scope filter
#[derive(Clone, Debug)]
pub struct Guardrail {
    blocked: Vec<&'static str>,
}

impl Default for Guardrail {
    fn default() -> Self {
        Self {
            blocked: OTHER_BRANDS.iter().chain(OFF_TOPIC).copied().collect(),
        }
    }
}

impl Guardrail {
    /// Filter with a custom keyword list
    pub fn new(blocked: Vec<&'static str>) -> Self {
        Self { blocked }
    }

    /// `Err` with the refusal when the query mentions a blocked keyword as a
    /// whole word, ignoring case
    pub fn check(&self, query: &str) -> Result<(), Refusal> {
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        match self.blocked.iter().copied().find(|k| words.contains(k)) {
            Some(keyword) => {
                tracing::info!(keyword, "query refused by guardrail");
                Err(Refusal {
                    keyword,
                    message: REFUSAL,
                })
            }
            None => Ok(()),
        }
    }
}
