//! Value decoding
//!
//! Filter values travel URL- or Base64-encoded inside a query parameter.
//! A [`Decoder`] strips that transport encoding before the value is checked
//! against its field's kind. Date-time values are additionally normalised
//! to UTC using the per-call [`DecodeContext`].

use std::fmt;

use base64::prelude::*;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kind::ValueKind;
use crate::utils::time::normalize_to_utc;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("decoded value is not valid UTF-8")]
    InvalidUtf8,
}

/// Per-call decoding context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    /// Timezone for date-times that carry no offset
    pub timezone: Tz,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
        }
    }
}

impl DecodeContext {
    pub fn with_timezone(timezone: Tz) -> Self {
        Self { timezone }
    }
}

/// Turns a raw wire value into the decoded value consumed by `build`
pub trait Decoder: Send + Sync {
    fn decode(
        &self,
        raw: &str,
        kind: ValueKind,
        ctx: &DecodeContext,
    ) -> Result<String, DecodeError>;
}

/// Transport encoding applied to filter values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueEncoding {
    #[default]
    Plain,
    Url,
    Base64,
}

impl fmt::Display for ValueEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueEncoding::Plain => write!(f, "plain"),
            ValueEncoding::Url => write!(f, "url"),
            ValueEncoding::Base64 => write!(f, "base64"),
        }
    }
}

/// Built-in decoder for the [`ValueEncoding`] schemes
#[derive(Debug, Clone, Copy, Default)]
pub struct WireDecoder {
    encoding: ValueEncoding,
}

impl WireDecoder {
    pub fn new(encoding: ValueEncoding) -> Self {
        Self { encoding }
    }
}

impl Decoder for WireDecoder {
    fn decode(
        &self,
        raw: &str,
        kind: ValueKind,
        ctx: &DecodeContext,
    ) -> Result<String, DecodeError> {
        let text = match self.encoding {
            ValueEncoding::Plain => raw.to_string(),
            ValueEncoding::Url => decode_url(raw)?,
            ValueEncoding::Base64 => decode_base64(raw)?,
        };

        if kind == ValueKind::DateTime
            && let Some(normalized) = normalize_to_utc(&text, ctx.timezone)
        {
            return Ok(normalized);
        }
        Ok(text)
    }
}

/// Form-style URL decoding (`+` is a space)
fn decode_url(raw: &str) -> Result<String, DecodeError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Standard alphabet first, then URL-safe; padding optional for both
fn decode_base64(raw: &str) -> Result<String, DecodeError> {
    let raw = raw.trim();
    let bytes = BASE64_STANDARD
        .decode(raw)
        .or_else(|_| BASE64_STANDARD_NO_PAD.decode(raw))
        .or_else(|_| BASE64_URL_SAFE.decode(raw))
        .or_else(|_| BASE64_URL_SAFE_NO_PAD.decode(raw))
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(encoding: ValueEncoding, raw: &str, kind: ValueKind) -> Result<String, DecodeError> {
        WireDecoder::new(encoding).decode(raw, kind, &DecodeContext::default())
    }

    #[test]
    fn plain_passes_through() {
        assert_eq!(
            decode(ValueEncoding::Plain, "a%20b", ValueKind::String).unwrap(),
            "a%20b"
        );
    }

    #[test]
    fn url_decoding() {
        assert_eq!(
            decode(ValueEncoding::Url, "gpt-4%20turbo", ValueKind::String).unwrap(),
            "gpt-4 turbo"
        );
        assert_eq!(
            decode(ValueEncoding::Url, "hello+world", ValueKind::String).unwrap(),
            "hello world"
        );
        assert_eq!(
            decode(ValueEncoding::Url, "100%25", ValueKind::String).unwrap(),
            "100%"
        );
    }

    #[test]
    fn url_decoding_invalid_utf8() {
        assert_eq!(
            decode(ValueEncoding::Url, "%FF%FE", ValueKind::String),
            Err(DecodeError::InvalidUtf8)
        );
    }

    #[test]
    fn base64_standard_and_url_safe() {
        let standard = BASE64_STANDARD.encode("draft");
        assert_eq!(
            decode(ValueEncoding::Base64, &standard, ValueKind::String).unwrap(),
            "draft"
        );

        // "YT4_Yg": only valid in the URL-safe alphabet
        let url_safe = BASE64_URL_SAFE_NO_PAD.encode("a>?b");
        assert_eq!(
            decode(ValueEncoding::Base64, &url_safe, ValueKind::String).unwrap(),
            "a>?b"
        );
    }

    #[test]
    fn base64_invalid() {
        let result = decode(ValueEncoding::Base64, "not-valid-base64!!!", ValueKind::String);
        assert!(matches!(result, Err(DecodeError::InvalidBase64(_))));
    }

    #[test]
    fn base64_non_utf8_payload() {
        let encoded = BASE64_STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert_eq!(
            decode(ValueEncoding::Base64, &encoded, ValueKind::String),
            Err(DecodeError::InvalidUtf8)
        );
    }

    #[test]
    fn date_time_is_normalised_in_context_timezone() {
        let ctx = DecodeContext::with_timezone(chrono_tz::Europe::Berlin);
        let decoded = WireDecoder::new(ValueEncoding::Plain)
            .decode("2024-01-15T10:30:00", ValueKind::DateTime, &ctx)
            .unwrap();
        assert_eq!(decoded, "2024-01-15T09:30:00Z");
    }

    #[test]
    fn unparseable_date_time_is_left_for_validation() {
        assert_eq!(
            decode(ValueEncoding::Plain, "yesterday", ValueKind::DateTime).unwrap(),
            "yesterday"
        );
    }

    #[test]
    fn encoding_serde() {
        let e: ValueEncoding = serde_json::from_str(r#""base64""#).unwrap();
        assert_eq!(e, ValueEncoding::Base64);
        assert_eq!(e.to_string(), "base64");
    }
}
