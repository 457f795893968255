//! Body encoding and decoding
//!
//! Models are camelCase in memory; the backend speaks snake_case. Keys are
//! rewritten recursively on a `serde_json::Value` between the model and the
//! wire, so models need nothing beyond `rename_all = "camelCase"`.
//! Endpoints declaring [`WireKeys::Verbatim`] skip the rewrite.

use beautywiki_common::utils::{to_camel_case, to_snake_case};
use beautywiki_domain::{BodyEncoding, WireKeys};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encoded request body with its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Serialize a request body
///
/// # Errors
/// Returns `ApiError::Encoding` if the model cannot be serialized, or if a
/// form body is not a flat object
pub fn encode_body<T>(
    body: &T,
    keys: WireKeys,
    encoding: BodyEncoding,
) -> Result<EncodedBody, ApiError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(body).map_err(|e| ApiError::Encoding(e.to_string()))?;
    let value = match keys {
        WireKeys::SnakeCase => rewrite_keys(value, &to_snake_case),
        WireKeys::Verbatim => value,
    };

    match encoding {
        BodyEncoding::Json => {
            let bytes =
                serde_json::to_vec(&value).map_err(|e| ApiError::Encoding(e.to_string()))?;
            Ok(EncodedBody { bytes, content_type: JSON_CONTENT_TYPE })
        }
        BodyEncoding::Form => {
            let pairs = form_pairs(value)?;
            let bytes = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish()
                .into_bytes();
            Ok(EncodedBody { bytes, content_type: FORM_CONTENT_TYPE })
        }
    }
}

/// Decode a response body
///
/// An empty body decodes as JSON `null`, so `()` and `Option` responses
/// accept `204 No Content`.
///
/// # Errors
/// Returns `ApiError::DecodingError` if the body is not JSON or does not
/// match `T` (including malformed backend timestamps)
pub fn decode_body<T>(bytes: &[u8], keys: WireKeys) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(bytes).map_err(|e| ApiError::DecodingError(e.to_string()))?
    };

    let value = match keys {
        WireKeys::SnakeCase => rewrite_keys(value, &to_camel_case),
        WireKeys::Verbatim => value,
    };

    serde_json::from_value(value).map_err(|e| ApiError::DecodingError(e.to_string()))
}

/// Rename every object key, recursively
fn rewrite_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| (rename(&key), rewrite_keys(v, rename)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| rewrite_keys(v, rename)).collect())
        }
        other => other,
    }
}

/// Flatten a top-level object into form pairs
///
/// Strings are sent as-is, `null` fields are omitted and any other value is
/// sent as its JSON text.
fn form_pairs(value: Value) -> Result<Vec<(String, String)>, ApiError> {
    let Value::Object(map) = value else {
        return Err(ApiError::Encoding("form body must be an object".to_string()));
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, v)| match v {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}
