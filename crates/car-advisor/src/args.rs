//! Lenient argument parsing
//!
//! Models sometimes send `"5"` or `5.0` where an integer is declared. These
//! helpers accept both as long as the value is a whole number in range.

use serde::de::{self, Deserializer, Unexpected, Visitor};
use std::fmt;

/// Deserialize an unsigned integer from an integer, integral float or
/// numeric string
pub fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = deserializer.deserialize_any(WholeNumber)?;
    T::try_from(value).map_err(|_| de::Error::invalid_value(Unexpected::Unsigned(value), &"a smaller whole number"))
}

struct WholeNumber;

impl Visitor<'_> for WholeNumber {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative whole number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX.into() {
            Ok(v as u64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        let trimmed = v.trim();
        if let Ok(n) = trimmed.parse::<u64>() {
            return Ok(n);
        }
        trimmed
            .parse::<f64>()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
            .and_then(|f| self.visit_f64(f))
    }
}
