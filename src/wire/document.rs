//! Inbound command document
//!
//! A decoded command is a JSON object with a `mode` string and a `payload`
//! object. Field access is lenient: a missing key, a wrong type or an
//! out-of-range number all read as `None`, and the caller keeps whatever value
//! it had before.
//!
//! Decoding keeps only the fields the modes read and borrows the mode name
//! from the received bytes, so a command never touches the heap. Unknown keys
//! and values of the wrong shape are skipped in place. A string containing
//! escape sequences cannot be borrowed and reads as absent.

use crate::error::{Error, Result};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// Maximum size of one inbound message in bytes
pub const DOCUMENT_CAPACITY: usize = 256;

/// Components of the `linear` / `angular` arrays
const AXES: usize = 3;

/// Decoded inbound command, borrowing from the message bytes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Document<'a> {
    mode: Option<&'a str>,
    payload: Payload,
}

impl<'a> Document<'a> {
    /// Decode one message
    ///
    /// Fails with [`Error::MessageTooLarge`] above [`DOCUMENT_CAPACITY`],
    /// [`Error::Json`] on malformed JSON and [`Error::InvalidMessage`] when
    /// the top level is not an object.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() > DOCUMENT_CAPACITY {
            return Err(Error::MessageTooLarge {
                len: bytes.len(),
                max: DOCUMENT_CAPACITY,
            });
        }

        if bytes.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{') {
            return Ok(serde_json::from_slice(bytes)?);
        }

        // Malformed input is a JSON error, anything well-formed is the wrong shape
        serde_json::from_slice::<IgnoredAny>(bytes)?;
        Err(Error::InvalidMessage("expected JSON object".to_string()))
    }

    /// Decode one message held as text
    pub fn from_json(text: &'a str) -> Result<Self> {
        Self::from_slice(text.as_bytes())
    }

    /// Requested mode name, if present and a string
    pub fn mode(&self) -> Option<&'a str> {
        self.mode
    }

    /// The `payload` object (empty if absent or not an object)
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// JSON number as received
#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::UInt(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(n),
            Number::UInt(n) => i64::try_from(n).ok(),
            Number::Float(_) => None,
        }
    }
}

/// Payload fields the modes understand
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Payload {
    present: bool,
    fl: Option<Number>,
    fr: Option<Number>,
    rl: Option<Number>,
    rr: Option<Number>,
    linear: [Option<Number>; AXES],
    angular: [Option<Number>; AXES],
}

impl Payload {
    /// Whether the document carried a payload object at all
    pub fn is_present(&self) -> bool {
        self.present
    }

    fn get(&self, key: &str) -> Option<Number> {
        match key {
            "fl" => self.fl,
            "fr" => self.fr,
            "rl" => self.rl,
            "rr" => self.rr,
            _ => None,
        }
    }

    /// Any JSON number as `f64`
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).map(Number::as_f64)
    }

    /// Number at `index` of the array under `key`
    pub fn element(&self, key: &str, index: usize) -> Option<f64> {
        let axes = match key {
            "linear" => &self.linear,
            "angular" => &self.angular,
            _ => return None,
        };
        axes.get(index).copied().flatten().map(Number::as_f64)
    }

    /// Integer narrowed to `T`
    ///
    /// Fractional numbers are truncated toward zero. Values that do not fit
    /// `T` read as `None`.
    pub fn integer<T: TryFrom<i64>>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        let whole = match value.as_i64() {
            Some(n) => n,
            None => {
                let f = value.as_f64().trunc();
                if !(i64::MIN as f64..=i64::MAX as f64).contains(&f) {
                    return None;
                }
                f as i64
            }
        };
        T::try_from(whole).ok()
    }
}

// ============================================================================
// Deserialization
// ============================================================================

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum DocumentKey {
    Mode,
    Payload,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(field_identifier, rename_all = "lowercase")]
enum PayloadKey {
    Fl,
    Fr,
    Rl,
    Rr,
    Linear,
    Angular,
    #[serde(other)]
    Other,
}

/// Any JSON value, reduced to what a command field can use
enum Scalar<'a> {
    Number(Number),
    Str(&'a str),
    Other,
}

impl<'a> Scalar<'a> {
    fn into_number(self) -> Option<Number> {
        match self {
            Scalar::Number(n) => Some(n),
            _ => None,
        }
    }

    fn into_str(self) -> Option<&'a str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Fixed-length array of optional numbers (`linear` / `angular`)
#[derive(Default)]
struct Axes([Option<Number>; AXES]);

/// Accept every remaining scalar type and yield the default value
macro_rules! skip_scalars {
    () => {
        fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<Self::Value, E> {
            Ok(Default::default())
        }

        fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<Self::Value, E> {
            Ok(Default::default())
        }

        fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<Self::Value, E> {
            Ok(Default::default())
        }

        fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<Self::Value, E> {
            Ok(Default::default())
        }

        fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<Self::Value, E> {
            Ok(Default::default())
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Default::default())
        }
    };
}

fn drain_seq<'de, A: SeqAccess<'de>>(mut seq: A) -> std::result::Result<(), A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}

fn drain_map<'de, M: MapAccess<'de>>(mut map: M) -> std::result::Result<(), M::Error> {
    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
    Ok(())
}

impl<'de> Deserialize<'de> for Document<'de> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document<'de>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a command object")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> std::result::Result<Self::Value, M::Error> {
        let mut doc = Document::default();
        while let Some(key) = map.next_key::<DocumentKey>()? {
            match key {
                DocumentKey::Mode => doc.mode = map.next_value::<Scalar<'de>>()?.into_str(),
                DocumentKey::Payload => doc.payload = map.next_value()?,
                DocumentKey::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(doc)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(PayloadVisitor)
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = Payload;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a payload object")
    }

    skip_scalars!();

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> std::result::Result<Self::Value, A::Error> {
        drain_seq(seq)?;
        Ok(Payload::default())
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> std::result::Result<Self::Value, M::Error> {
        let mut payload = Payload {
            present: true,
            ..Payload::default()
        };
        while let Some(key) = map.next_key::<PayloadKey>()? {
            match key {
                PayloadKey::Fl => payload.fl = map.next_value::<Scalar<'de>>()?.into_number(),
                PayloadKey::Fr => payload.fr = map.next_value::<Scalar<'de>>()?.into_number(),
                PayloadKey::Rl => payload.rl = map.next_value::<Scalar<'de>>()?.into_number(),
                PayloadKey::Rr => payload.rr = map.next_value::<Scalar<'de>>()?.into_number(),
                PayloadKey::Linear => payload.linear = map.next_value::<Axes>()?.0,
                PayloadKey::Angular => payload.angular = map.next_value::<Axes>()?.0,
                PayloadKey::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(payload)
    }
}

impl<'de> Deserialize<'de> for Axes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(AxesVisitor)
    }
}

struct AxesVisitor;

impl<'de> Visitor<'de> for AxesVisitor {
    type Value = Axes;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of numbers")
    }

    skip_scalars!();

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut axes = Axes::default();
        for slot in axes.0.iter_mut() {
            match seq.next_element::<Scalar<'de>>()? {
                Some(value) => *slot = value.into_number(),
                None => return Ok(axes),
            }
        }
        drain_seq(seq)?;
        Ok(axes)
    }

    fn visit_map<M: MapAccess<'de>>(self, map: M) -> std::result::Result<Self::Value, M::Error> {
        drain_map(map)?;
        Ok(Axes::default())
    }
}

impl<'de> Deserialize<'de> for Scalar<'de> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar<'de>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<Self::Value, E> {
        Ok(Scalar::Other)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(Scalar::Number(Number::Int(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(Scalar::Number(Number::UInt(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(Scalar::Number(Number::Float(v)))
    }

    fn visit_borrowed_str<E: de::Error>(self, v: &'de str) -> std::result::Result<Self::Value, E> {
        Ok(Scalar::Str(v))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<Self::Value, E> {
        Ok(Scalar::Other)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(Scalar::Other)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> std::result::Result<Self::Value, A::Error> {
        drain_seq(seq)?;
        Ok(Scalar::Other)
    }

    fn visit_map<M: MapAccess<'de>>(self, map: M) -> std::result::Result<Self::Value, M::Error> {
        drain_map(map)?;
        Ok(Scalar::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> Document<'_> {
        Document::from_json(json).unwrap()
    }

    #[test]
    fn test_mode_and_payload() {
        let doc = doc(r#"{"mode":"cfl","payload":{"fl":1.5}}"#);
        assert_eq!(doc.mode(), Some("cfl"));
        assert!(doc.payload().is_present());
        assert_eq!(doc.payload().number("fl"), Some(1.5));
        assert_eq!(doc.payload().number("fr"), None);
    }

    #[test]
    fn test_mode_wrong_type_is_absent() {
        let doc = doc(r#"{"mode":7}"#);
        assert_eq!(doc.mode(), None);
        assert!(!doc.payload().is_present());
    }

    #[test]
    fn test_mode_borrows_from_input() {
        let text = String::from(r#"{"mode":"ROS"}"#);
        let doc = Document::from_json(&text).unwrap();
        let mode = doc.mode().unwrap();
        assert!(text.as_bytes().as_ptr_range().contains(&mode.as_ptr()));
    }

    #[test]
    fn test_escaped_mode_is_absent() {
        let doc = doc(r#"{"mode":"p\u0077m"}"#);
        assert_eq!(doc.mode(), None);
    }

    #[test]
    fn test_payload_not_object() {
        let doc = doc(r#"{"mode":"pwm","payload":[1,2,3]}"#);
        assert!(!doc.payload().is_present());
        assert_eq!(doc.payload().integer::<i16>("fl"), None);
    }

    #[test]
    fn test_unknown_and_nested_fields_skipped() {
        let doc = doc(
            r#"{"id":{"a":[1,{"b":null}]},"mode":"pwm","payload":{"x":[true],"fl":{"v":1},"fr":2}}"#,
        );
        assert_eq!(doc.mode(), Some("pwm"));
        assert_eq!(doc.payload().integer::<i16>("fl"), None);
        assert_eq!(doc.payload().integer::<i16>("fr"), Some(2));
    }

    #[test]
    fn test_integer_narrowing() {
        let doc = doc(r#"{"payload":{"fl":-300,"fr":40000,"rl":12.9,"rr":-12.9}}"#);
        let payload = doc.payload();
        assert_eq!(payload.integer::<i16>("fl"), Some(-300));
        assert_eq!(payload.integer::<i16>("fr"), None);
        assert_eq!(payload.integer::<i16>("rl"), Some(12));
        assert_eq!(payload.integer::<i16>("rr"), Some(-12));

        let doc = self::doc(r#"{"payload":{"fl":"5","fr":true,"rl":1e30,"rr":18446744073709551615}}"#);
        let payload = doc.payload();
        assert_eq!(payload.integer::<i16>("fl"), None);
        assert_eq!(payload.integer::<i16>("fr"), None);
        assert_eq!(payload.integer::<i16>("rl"), None);
        assert_eq!(payload.integer::<i16>("rr"), None);
    }

    #[test]
    fn test_number_accepts_integers() {
        let doc = doc(r#"{"payload":{"fl":3}}"#);
        assert_eq!(doc.payload().number("fl"), Some(3.0));
    }

    #[test]
    fn test_array_elements() {
        let doc = doc(r#"{"payload":{"linear":[1.0,"x"],"angular":5}}"#);
        let payload = doc.payload();
        assert_eq!(payload.element("linear", 0), Some(1.0));
        assert_eq!(payload.element("linear", 1), None);
        assert_eq!(payload.element("linear", 2), None);
        assert_eq!(payload.element("angular", 0), None);
        assert_eq!(payload.element("fl", 0), None);
    }

    #[test]
    fn test_long_array_keeps_first_three() {
        let doc = doc(r#"{"payload":{"angular":[1,2,3,4,[5]]}}"#);
        let payload = doc.payload();
        assert_eq!(payload.element("angular", 2), Some(3.0));
        assert_eq!(payload.element("angular", 3), None);
    }

    #[test]
    fn test_malformed_json() {
        let result = Document::from_slice(br#"{"mode":"PWM","payload":{"fl":1"#);
        assert!(matches!(result, Err(Error::Json(_))));

        let result = Document::from_slice(b"\x01\x02not json");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_non_object_rejected() {
        let inputs: [&[u8]; 4] = [b"[1,2,3]", b"42", b"\"pwm\"", b"null"];
        for input in inputs {
            let result = Document::from_slice(input);
            assert!(matches!(result, Err(Error::InvalidMessage(_))));
        }
    }

    #[test]
    fn test_capacity_limit() {
        let padding = "x".repeat(DOCUMENT_CAPACITY);
        let message = format!(r#"{{"mode":"{}"}}"#, padding);
        let result = Document::from_slice(message.as_bytes());
        assert!(matches!(
            result,
            Err(Error::MessageTooLarge { max: DOCUMENT_CAPACITY, .. })
        ));
    }
}
