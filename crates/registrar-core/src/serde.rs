use serde::{Deserialize, Deserializer};

/// Deserializes an optional query value into an `Option<i64>`.
///
/// Query strings send empty values as `""`, which is treated as absent.
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
    }
}

pub fn deserialize_optional_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<i32>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Trims an optional query string, mapping blank values to `None`.
pub fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        page: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_i32")]
        angkatan: Option<i32>,
        #[serde(default, deserialize_with = "deserialize_trimmed_string")]
        q: Option<String>,
    }

    #[test]
    fn test_empty_values_are_none() {
        let q: Query = serde_json::from_str(r#"{"page":"","angkatan":" ","q":"   "}"#).unwrap();
        assert_eq!(q.page, None);
        assert_eq!(q.angkatan, None);
        assert_eq!(q.q, None);
    }

    #[test]
    fn test_values_are_parsed() {
        let q: Query = serde_json::from_str(r#"{"page":"3","angkatan":"2023","q":" budi "}"#).unwrap();
        assert_eq!(q.page, Some(3));
        assert_eq!(q.angkatan, Some(2023));
        assert_eq!(q.q.as_deref(), Some("budi"));
    }

    #[test]
    fn test_non_numeric_is_rejected() {
        let q: Result<Query, _> = serde_json::from_str(r#"{"page":"abc"}"#);
        assert!(q.is_err());
    }
}
