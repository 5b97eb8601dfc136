use serde::{Deserialize, Deserializer, de};
use std::fmt;

/// Custom deserializer that accepts strings, numbers, booleans or null and
/// yields their display text. SDK dumps are inconsistent about whether sizes
/// and offsets are emitted as `"0x10"`, `16` or `null`.
pub fn deserialize_string_from_anything<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Visitor;

    struct StringVisitor;

    impl<'de> Visitor<'de> for StringVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, boolean or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(StringVisitor)
}

/// Custom deserializer for byte sizes: accepts a number, a decimal string, a
/// `0x` hex string, or null (treated as zero).
pub fn deserialize_size_from_anything<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let text = deserialize_string_from_anything(deserializer)?;
    parse_size(&text).map_err(de::Error::custom)
}

/// Parse a size that may be decimal or `0x`-prefixed hexadecimal.
pub fn parse_size(text: &str) -> Result<u64, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .map_err(|e| format!("cannot parse '{text}' as a hex size: {e}"));
    }
    if let Ok(value) = trimmed.parse::<u64>() {
        return Ok(value);
    }
    // Some dumps write sizes as floats ("4.0").
    match trimmed.parse::<f64>() {
        Ok(value) if value >= 0.0 => Ok(value as u64),
        _ => Err(format!("cannot parse '{text}' as a size")),
    }
}

/// A string field that tolerates numbers and null in the source JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LooseString(pub String);

impl<'de> Deserialize<'de> for LooseString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_string_from_anything(deserializer).map(LooseString)
    }
}

impl From<LooseString> for String {
    fn from(value: LooseString) -> Self {
        value.0
    }
}
