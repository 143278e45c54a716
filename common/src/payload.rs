// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Native notification values and their normalized, channel-ready form

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Value as handed over by the platform notification APIs.
///
/// Dictionaries may use arbitrary values as keys, and some values (binary data, platform objects)
/// have no counterpart on the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(DateTime<Utc>),
    Data(Vec<u8>),
    Array(Vec<NativeValue>),
    Dictionary(Vec<(NativeValue, NativeValue)>),
    /// A platform object without a plain representation; only its type name is known.
    Opaque(String),
}

impl NativeValue {
    pub fn dictionary<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<NativeValue>,
        V: Into<NativeValue>,
    {
        Self::Dictionary(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Converts the value into a plain JSON value.
    ///
    /// Returns `None` for values which can't be represented: binary data, opaque objects and
    /// non-finite floats. Such values are also removed from nested arrays and dictionaries.
    pub fn normalize(&self) -> Option<Value> {
        match self {
            Self::Null => Some(Value::Null),
            Self::Bool(value) => Some(Value::Bool(*value)),
            Self::Integer(value) => Some(Value::Number((*value).into())),
            Self::Float(value) => Number::from_f64(*value).map(Value::Number),
            Self::String(value) => Some(Value::String(value.clone())),
            Self::Date(date) => Some(Value::String(
                date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )),
            Self::Data(_) | Self::Opaque(_) => None,
            Self::Array(items) => Some(Value::Array(
                items.iter().filter_map(Self::normalize).collect(),
            )),
            Self::Dictionary(entries) => Some(Value::Object(normalize_entries(entries))),
        }
    }

    fn normalized_key(&self) -> Option<String> {
        match self {
            Self::String(key) => Some(key.clone()),
            Self::Integer(key) => Some(key.to_string()),
            Self::Float(key) if key.is_finite() => Some(key.to_string()),
            Self::Bool(key) => Some(key.to_string()),
            _ => None,
        }
    }
}

fn normalize_entries(entries: &[(NativeValue, NativeValue)]) -> Map<String, Value> {
    entries
        .iter()
        .filter_map(|(key, value)| Some((key.normalized_key()?, value.normalize()?)))
        .collect()
}

impl From<Value> for NativeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => Self::Integer(value),
                None => number.as_f64().map(Self::Float).unwrap_or(Self::Null),
            },
            Value::String(value) => Self::String(value),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Dictionary(
                map.into_iter()
                    .map(|(key, value)| (Self::String(key), value.into()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for NativeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for NativeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for NativeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for NativeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for NativeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Notification payload normalized into a string-keyed JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationPayload(Map<String, Value>);

impl NotificationPayload {
    /// Normalizes the user info dictionary of a notification.
    ///
    /// Anything other than a dictionary results in an empty payload.
    pub fn normalize(user_info: &NativeValue) -> Self {
        match user_info {
            NativeValue::Dictionary(entries) => Self(normalize_entries(entries)),
            _ => Self::default(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<NotificationPayload> for Value {
    fn from(payload: NotificationPayload) -> Self {
        Value::Object(payload.0)
    }
}

impl From<NotificationPayload> for NativeValue {
    fn from(payload: NotificationPayload) -> Self {
        Value::from(payload).into()
    }
}

impl From<Map<String, Value>> for NotificationPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use serde_json::json;

    use super::*;

    const MAX_DEPTH: usize = 3;

    impl Arbitrary for NativeValue {
        fn arbitrary(g: &mut Gen) -> Self {
            arbitrary_value(g, MAX_DEPTH)
        }
    }

    fn arbitrary_value(g: &mut Gen, depth: usize) -> NativeValue {
        let variants = if depth == 0 { 8 } else { 10 };
        match usize::arbitrary(g) % variants {
            0 => NativeValue::Null,
            1 => NativeValue::Bool(bool::arbitrary(g)),
            2 => NativeValue::Integer(i64::arbitrary(g)),
            3 => NativeValue::Float(f64::arbitrary(g)),
            4 => NativeValue::String(String::arbitrary(g)),
            5 => NativeValue::Date(
                DateTime::from_timestamp(u32::arbitrary(g).into(), 0).unwrap_or_default(),
            ),
            6 => NativeValue::Data(Vec::arbitrary(g)),
            7 => NativeValue::Opaque(String::arbitrary(g)),
            8 => NativeValue::Array(
                (0..usize::arbitrary(g) % 4)
                    .map(|_| arbitrary_value(g, depth - 1))
                    .collect(),
            ),
            _ => NativeValue::Dictionary(
                (0..usize::arbitrary(g) % 4)
                    .map(|_| (arbitrary_value(g, 0), arbitrary_value(g, depth - 1)))
                    .collect(),
            ),
        }
    }

    #[test]
    fn normalize_nested_payload() {
        let date = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let user_info = NativeValue::dictionary([
            (
                NativeValue::from("aps"),
                NativeValue::dictionary([
                    ("alert", NativeValue::from("Hello")),
                    ("badge", NativeValue::from(3_i64)),
                ]),
            ),
            (NativeValue::from(7_i64), NativeValue::from(true)),
            (NativeValue::from("sent"), NativeValue::Date(date)),
            (NativeValue::from("blob"), NativeValue::Data(vec![1, 2, 3])),
            (NativeValue::Data(vec![0]), NativeValue::from("dropped key")),
            (
                NativeValue::from("list"),
                NativeValue::Array(vec![
                    NativeValue::from(1.5),
                    NativeValue::Opaque("UIImage".to_owned()),
                    NativeValue::Float(f64::NAN),
                    NativeValue::Null,
                ]),
            ),
        ]);

        let payload = NotificationPayload::normalize(&user_info);
        assert_eq!(
            Value::from(payload),
            json!({
                "aps": { "alert": "Hello", "badge": 3 },
                "7": true,
                "sent": "2023-11-14T22:13:20Z",
                "list": [1.5, null],
            })
        );
    }

    #[test]
    fn normalize_non_dictionary() {
        assert!(NotificationPayload::normalize(&NativeValue::from("aps")).is_empty());
    }

    #[quickcheck]
    fn normalize_is_idempotent(entries: Vec<(NativeValue, NativeValue)>) -> bool {
        let once = NotificationPayload::normalize(&NativeValue::Dictionary(entries));
        let twice = NotificationPayload::normalize(&once.clone().into());
        once == twice
    }
}
