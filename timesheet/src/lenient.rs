//! Deserializers for the numeric form fields.
//!
//! Stored entries come from HTML number inputs, so a value may arrive as a
//! JSON number, a numeric string, an empty string or `null`.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<NumberOrText>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrText::Number(n)) => n,
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("'{s}' is not a number")))?,
    };

    if !value.is_finite() {
        return Err(de::Error::custom("number must be finite"));
    }
    Ok(Some(value))
}

pub(crate) fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_number(deserializer)?.unwrap_or(0.0))
}

pub(crate) fn minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = optional_number(deserializer)?.unwrap_or(0.0);
    if value < 0.0 {
        return Err(de::Error::custom("minutes cannot be negative"));
    }
    if value > f64::from(u32::MAX) {
        return Err(de::Error::custom("minutes out of range"));
    }
    Ok(value.round() as u32)
}
