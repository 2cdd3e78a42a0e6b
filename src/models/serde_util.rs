//! Lenient numeric decoding and three-state field helpers
//!
//! Editors send line numbers, versions and enum values as plain JSON numbers
//! without any guarantee of integer formatting (`3` and `3.0` both occur).
//! The helpers here accept every JSON number, truncate fractional parts toward
//! zero and reject values outside the target integer range instead of wrapping.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};
use serde_json::Value;

/// Integer types that may be decoded from any JSON number.
pub(crate) trait WireInt: Sized + Copy {
    const EXPECTING: &'static str;

    fn from_i64(v: i64) -> Option<Self>;
    fn from_u64(v: u64) -> Option<Self>;
}

impl WireInt for i32 {
    const EXPECTING: &'static str = "a number within the 32-bit signed integer range";

    fn from_i64(v: i64) -> Option<Self> {
        i32::try_from(v).ok()
    }

    fn from_u64(v: u64) -> Option<Self> {
        i32::try_from(v).ok()
    }
}

impl WireInt for u32 {
    const EXPECTING: &'static str = "a non-negative number within the 32-bit unsigned range";

    fn from_i64(v: i64) -> Option<Self> {
        u32::try_from(v).ok()
    }

    fn from_u64(v: u64) -> Option<Self> {
        u32::try_from(v).ok()
    }
}

struct IntVisitor<T>(PhantomData<T>);

impl<'de, T: WireInt> Visitor<'de> for IntVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::EXPECTING)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        T::from_u64(v).ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        T::from_i64(v).ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
        let truncated = v.trunc();
        if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
            return Err(E::invalid_value(Unexpected::Float(v), &self));
        }
        T::from_i64(truncated as i64).ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
    }
}

/// Newtype that routes an integer through [`IntVisitor`] so it can sit inside
/// `Option`, `Vec` and friends.
pub(crate) struct Lenient<T>(pub T);

impl<'de, T: WireInt> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(IntVisitor(PhantomData))
            .map(Lenient)
    }
}

pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: WireInt,
{
    Lenient::<T>::deserialize(deserializer).map(|v| v.0)
}

/// LSP `uinteger`.
pub fn uinteger<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient(deserializer)
}

/// LSP `integer`.
pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    lenient(deserializer)
}

/// Optional (or nullable) `uinteger`; pair with `#[serde(default)]` for optional fields.
pub fn opt_uinteger<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Lenient<u32>>::deserialize(deserializer)?.map(|v| v.0))
}

/// Optional (or nullable) `integer`; without `#[serde(default)]` the key stays
/// mandatory and only `null` maps to `None`.
pub fn opt_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    Ok(Option::<Lenient<i32>>::deserialize(deserializer)?.map(|v| v.0))
}

/// Mandatory key whose value may be `null`. Serde fills a missing `Option`
/// field with `None` on its own; routing through `deserialize_with` keeps the
/// key mandatory.
pub fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Three-state field: `None` = key absent, `Some(None)` = explicit `null`,
/// `Some(Some(v))` = value. Use with `#[serde(default)]` and
/// `skip_serializing_if = "Option::is_none"`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Opaque JSON that keeps an explicit `null` apart from an absent key:
/// `null` decodes to `Some(Value::Null)` and is written back as `null`.
/// Use with `#[serde(default)]` and `skip_serializing_if = "Option::is_none"`.
pub fn opaque<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "uinteger")]
        line: u32,
        #[serde(default, deserialize_with = "opt_integer", skip_serializing_if = "Option::is_none")]
        version: Option<i32>,
        #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
        root: Option<Option<String>>,
    }

    #[test]
    fn test_accepts_integral_float() {
        let s: Sample = serde_json::from_value(json!({"line": 3.0})).unwrap();
        assert_eq!(s.line, 3);
        assert_eq!(s.version, None);
    }

    #[test]
    fn test_truncates_fraction() {
        let s: Sample = serde_json::from_str(r#"{"line": 7.9, "version": -2.5}"#).unwrap();
        assert_eq!(s.line, 7);
        assert_eq!(s.version, Some(-2));
    }

    #[test]
    fn test_rejects_negative_unsigned() {
        let err = serde_json::from_str::<Sample>(r#"{"line": -1}"#).unwrap_err();
        assert!(err.to_string().contains("32-bit unsigned"));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(serde_json::from_str::<Sample>(r#"{"line": 4294967296}"#).is_err());
        assert!(serde_json::from_str::<Sample>(r#"{"line": 1e300}"#).is_err());
    }

    #[test]
    fn test_rejects_string_number() {
        assert!(serde_json::from_str::<Sample>(r#"{"line": "3"}"#).is_err());
    }

    #[test]
    fn test_nullable_three_states() {
        let absent: Sample = serde_json::from_str(r#"{"line": 0}"#).unwrap();
        let null: Sample = serde_json::from_str(r#"{"line": 0, "root": null}"#).unwrap();
        let value: Sample = serde_json::from_str(r#"{"line": 0, "root": "/w"}"#).unwrap();

        assert_eq!(absent.root, None);
        assert_eq!(null.root, Some(None));
        assert_eq!(value.root, Some(Some("/w".to_string())));

        assert_eq!(serde_json::to_value(&absent).unwrap(), json!({"line": 0}));
        assert_eq!(
            serde_json::to_value(&null).unwrap(),
            json!({"line": 0, "root": null})
        );
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"line": 0, "root": "/w"})
        );
    }
}
