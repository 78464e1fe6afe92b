//! Serde helpers

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use together with `#[serde(default)]`: a missing key stays `None`,
/// `null` becomes `Some(None)` and a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
