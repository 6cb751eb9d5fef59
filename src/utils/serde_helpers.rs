use serde::{Deserialize, Deserializer};

/// Deserializes an optional string, treating empty or whitespace-only
/// strings as None. Config files generated from environment templates
/// often carry `""` for unset values.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Deserializes a list of HTTP status codes, rejecting anything outside 100..=599.
pub fn status_codes<'de, D>(deserializer: D) -> Result<Vec<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let codes = Vec::<u16>::deserialize(deserializer)?;
    if let Some(code) = codes.iter().find(|code| !(100..=599).contains(*code)) {
        return Err(serde::de::Error::custom(format!(
            "invalid HTTP status code: {code}"
        )));
    }
    Ok(codes)
}
