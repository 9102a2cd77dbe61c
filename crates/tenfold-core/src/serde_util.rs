use serde::{Deserialize, Deserializer};

/// Deserialize a privilege flag that must not be trusted by default.
///
/// Only the literal boolean `true` maps to `true`; `false`, `null`, numbers
/// and strings (including `"true"`) all collapse to `false`. Combined with
/// `#[serde(default)]`, an absent field is `false` as well.
pub(crate) fn strictly_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(matches!(value, serde_json::Value::Bool(true)))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Flagged {
        #[serde(default, deserialize_with = "super::strictly_true")]
        flag: bool,
    }

    fn parse(json: &str) -> bool {
        serde_json::from_str::<Flagged>(json).expect("valid json").flag
    }

    #[test]
    fn only_literal_true_is_true() {
        assert!(parse(r#"{"flag": true}"#));
        assert!(!parse(r#"{"flag": false}"#));
        assert!(!parse(r#"{"flag": "true"}"#));
        assert!(!parse(r#"{"flag": 1}"#));
        assert!(!parse(r#"{"flag": null}"#));
        assert!(!parse(r#"{}"#));
    }
}
