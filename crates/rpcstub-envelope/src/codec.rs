//! Typed value ↔ JSON payload conversion.
//!
//! Typed structs are the only representation outside the validation boundary;
//! [`reparse`] exists so freshly encoded bytes can be checked against a schema,
//! which operates on generic JSON values.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{CodecError, Result};

/// Serialize a typed value into a JSON payload.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(CodecError::Encode)
}

/// Deserialize a JSON payload into a typed value.
///
/// An absent payload (empty or whitespace only) decodes to `T::default()`,
/// meaning "nothing provided".
pub fn decode<T: DeserializeOwned + Default>(payload: &[u8]) -> Result<T> {
    if is_absent(payload) {
        return Ok(T::default());
    }
    serde_json::from_slice(payload).map_err(CodecError::Decode)
}

/// Parse a payload into a generic JSON value for schema validation.
pub fn reparse(payload: &[u8]) -> Result<Value> {
    serde_json::from_slice(payload).map_err(CodecError::Reparse)
}

/// True when a payload carries no JSON value at all.
pub fn is_absent(payload: &[u8]) -> bool {
    payload.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Probe {
        #[serde(skip_serializing_if = "Option::is_none")]
        addr: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        len: Option<i64>,
    }

    #[test]
    fn absent_fields_are_omitted_not_zeroed() {
        let bytes = encode(&Probe {
            addr: Some(0),
            len: None,
        })
        .unwrap();
        assert_eq!(bytes.as_ref(), br#"{"addr":0}"#);

        let back: Probe = decode(&bytes).unwrap();
        assert_eq!(back.addr, Some(0));
        assert_eq!(back.len, None);
    }

    #[test]
    fn empty_payload_decodes_to_default() {
        assert_eq!(decode::<Probe>(b"").unwrap(), Probe::default());
        assert_eq!(decode::<Probe>(b"  \n").unwrap(), Probe::default());
        decode::<()>(b"").unwrap();
    }

    #[test]
    fn decode_reports_structural_mismatch() {
        assert!(matches!(
            decode::<Probe>(br#"{"addr":"eighty"}"#),
            Err(CodecError::Decode(_))
        ));
        assert!(matches!(
            decode::<Vec<i64>>(br#""not-an-array""#),
            Err(CodecError::Decode(_))
        ));
    }

    #[test]
    fn reparse_yields_generic_value() {
        let bytes = encode(&vec![80, 96]).unwrap();
        assert_eq!(reparse(&bytes).unwrap(), json!([80, 96]));
        assert!(matches!(reparse(b"{"), Err(CodecError::Reparse(_))));
        assert!(reparse(b"").is_err());
    }

    #[test]
    fn encode_rejects_non_string_map_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![1u8], 1);
        assert!(matches!(encode(&map), Err(CodecError::Encode(_))));
    }
}
