use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

/// HTML forms submit empty inputs as `""`; optional fields want `None`.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => T::from_str(s).map(Some).map_err(de::Error::custom),
    }
}
