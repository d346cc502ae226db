//! Serialization contract between a value and its stored text
//!
//! A codec is a pair of pure functions. The binding never checks that
//! `deserialize(serialize(v))` reproduces `v`; a codec that breaks the round
//! trip shows up as a decode error on the next load.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;

/// Converts values of type `V` to and from a storable string
pub trait Codec<V> {
    fn serialize(&self, value: &V) -> Result<String, CodecError>;

    fn deserialize(&self, text: &str) -> Result<V, CodecError>;

    /// Identity used to detect that a binding's codec was swapped.
    ///
    /// Two codecs with the same id are assumed to produce the same text.
    fn id(&self) -> Cow<'_, str>;
}

/// Compact JSON, the default policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl<V: Serialize + DeserializeOwned> Codec<V> for JsonCodec {
    fn serialize(&self, value: &V) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }

    fn deserialize(&self, text: &str) -> Result<V, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    fn id(&self) -> Cow<'_, str> {
        Cow::Borrowed("json")
    }
}

/// Indented JSON; reads anything [`JsonCodec`] reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrettyJsonCodec;

impl<V: Serialize + DeserializeOwned> Codec<V> for PrettyJsonCodec {
    fn serialize(&self, value: &V) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn deserialize(&self, text: &str) -> Result<V, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    fn id(&self) -> Cow<'_, str> {
        Cow::Borrowed("json-pretty")
    }
}

/// Codec built from a caller-supplied function pair
pub struct FnCodec<S, D> {
    id: String,
    serialize: S,
    deserialize: D,
}

impl<S, D> FnCodec<S, D> {
    pub fn new(id: impl Into<String>, serialize: S, deserialize: D) -> Self {
        Self {
            id: id.into(),
            serialize,
            deserialize,
        }
    }
}

impl<S, D> fmt::Debug for FnCodec<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCodec").field("id", &self.id).finish()
    }
}

impl<V, S, D> Codec<V> for FnCodec<S, D>
where
    S: Fn(&V) -> Result<String, CodecError>,
    D: Fn(&str) -> Result<V, CodecError>,
{
    fn serialize(&self, value: &V) -> Result<String, CodecError> {
        (self.serialize)(value)
    }

    fn deserialize(&self, text: &str) -> Result<V, CodecError> {
        (self.deserialize)(text)
    }

    fn id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }
}

impl<V, C: Codec<V> + ?Sized> Codec<V> for Box<C> {
    fn serialize(&self, value: &V) -> Result<String, CodecError> {
        (**self).serialize(value)
    }

    fn deserialize(&self, text: &str) -> Result<V, CodecError> {
        (**self).deserialize(text)
    }

    fn id(&self) -> Cow<'_, str> {
        (**self).id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        visits: u32,
        tags: Vec<String>,
    }

    #[test]
    fn test_json_string_is_quoted() {
        let text = Codec::<String>::serialize(&JsonCodec, &"Kent".to_string()).unwrap();
        assert_eq!(text, "\"Kent\"");
    }

    #[test]
    fn test_json_rejects_garbage() {
        let result: Result<Profile, _> = JsonCodec.deserialize("{not json");
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[test]
    fn test_pretty_output_readable_by_compact() {
        let profile = Profile {
            name: "Kent".into(),
            visits: 3,
            tags: vec!["a".into()],
        };
        let text = PrettyJsonCodec.serialize(&profile).unwrap();
        assert!(text.contains('\n'));
        let back: Profile = JsonCodec.deserialize(&text).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_fn_codec_uses_supplied_functions() {
        let codec = FnCodec::new(
            "upper",
            |v: &String| -> Result<String, CodecError> { Ok(v.to_uppercase()) },
            |s: &str| -> Result<String, CodecError> { Ok(s.to_lowercase()) },
        );
        assert_eq!(codec.serialize(&"kent".to_string()).unwrap(), "KENT");
        let back: String = codec.deserialize("KENT").unwrap();
        assert_eq!(back, "kent");
        assert_eq!(Codec::<String>::id(&codec), "upper");
    }

    #[test]
    fn test_fn_codec_error_passes_through() {
        let codec = FnCodec::new(
            "strict",
            |_: &u8| -> Result<String, CodecError> { Err(CodecError::custom("nope")) },
            |s: &str| -> Result<u8, CodecError> {
                s.parse::<u8>().map_err(|e| CodecError::custom(e.to_string()))
            },
        );
        assert!(codec.serialize(&1u8).is_err());
        assert!(Codec::<u8>::deserialize(&codec, "300").is_err());
    }

    proptest! {
        #[test]
        fn prop_json_round_trip(
            name in ".*",
            visits in any::<u32>(),
            tags in prop::collection::vec(".*", 0..4)
        ) {
            let profile = Profile { name, visits, tags };
            let text = JsonCodec.serialize(&profile).unwrap();
            let back: Profile = JsonCodec.deserialize(&text).unwrap();
            prop_assert_eq!(back, profile);
        }
    }
}
