//! Hex/UTF-8/SHA-256 codec and data-URI canonicalization.
//!
//! Identity for an ethscription is `sha256(canonical_uri)`; canonicalization
//! strips the ESIP-7 `gzip` data-URI parameter after successful inflation.
//! Canonicalize before hashing, and before the ESIP-6 uniqueness check.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("hex string missing 0x prefix")]
    MissingPrefix,
    #[error("empty hex string")]
    Empty,
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Strictly decodes a `0x`-prefixed hex string. Rejects empty input or a bare
/// `0x` with no digits.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, CodecError> {
    let stripped = s.strip_prefix("0x").ok_or(CodecError::MissingPrefix)?;
    if stripped.is_empty() {
        return Err(CodecError::Empty);
    }
    Ok(hex::decode(stripped)?)
}

/// Strict UTF-8 decode; `None` on any invalid sequence.
pub fn to_utf8(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(str::to_owned)
}

/// `0x` + lowercase hex SHA-256 digest.
pub fn sha256_lower_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(Sha256::digest(bytes)))
}

/// A parsed `data:[mime][;params],body` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Mime type exactly as it appeared before the first `;` or `,`, which
    /// may be empty.
    pub raw_mime: String,
    /// Effective content type: `raw_mime`, or `text/plain` if absent.
    pub content_type: String,
    /// Parameter tokens between the first `;` and the `,`, in order.
    pub params: Vec<String>,
    pub body: String,
    pub is_base64: bool,
}

impl DataUri {
    /// Re-serializes this URI. Used to produce the canonical form over which
    /// identity is computed once the `gzip` parameter has been stripped.
    pub fn to_canonical_string(&self) -> String {
        let mut header = self.raw_mime.clone();
        for param in &self.params {
            header.push(';');
            header.push_str(param);
        }
        format!("data:{},{}", header, self.body)
    }
}

/// Parses a data URI. Returns `None` if `s` does not start with `data:` or
/// has no `,` separating header from body.
pub fn parse_data_uri(s: &str) -> Option<DataUri> {
    let rest = s.strip_prefix("data:")?;
    let comma = rest.find(',')?;
    let header = &rest[..comma];
    let body = &rest[comma + 1..];

    let mut parts = header.split(';');
    let raw_mime = parts.next().unwrap_or("").to_string();
    let params: Vec<String> = parts.map(str::to_owned).collect();
    let is_base64 = params.iter().any(|p| p == "base64");
    let content_type = if raw_mime.is_empty() {
        "text/plain".to_string()
    } else {
        raw_mime.clone()
    };

    Some(DataUri {
        raw_mime,
        content_type,
        params,
        body: body.to_string(),
        is_base64,
    })
}

/// Literal substring check for ESIP-6 opt-in, performed on the *original*
/// URI, before gzip canonicalization.
pub fn has_rule_esip6(s: &str) -> bool {
    s.contains("rule=esip6")
}

/// If `s` is a `gzip`-tagged data URI, base64-decodes and inflates the body,
/// then re-serializes without the `gzip` and `base64` parameters — the body
/// is plain text at that point, so neither param still applies. Falls
/// through to `s` unchanged if the URI doesn't parse, isn't tagged `gzip`, or
/// inflation fails for any reason (bad base64, corrupt gzip stream, non-UTF-8
/// output).
pub fn inflate_gzip(s: &str) -> String {
    let Some(uri) = parse_data_uri(s) else {
        return s.to_string();
    };
    if !uri.params.iter().any(|p| p == "gzip") {
        return s.to_string();
    }
    match try_inflate(&uri.body) {
        Some(inflated) => {
            let canonical = DataUri {
                raw_mime: uri.raw_mime,
                content_type: uri.content_type,
                params: uri
                    .params
                    .into_iter()
                    .filter(|p| p != "gzip" && p != "base64")
                    .collect(),
                body: inflated,
                is_base64: false,
            };
            canonical.to_canonical_string()
        }
        None => s.to_string(),
    }
}

fn try_inflate(body: &str) -> Option<String> {
    let compressed = STANDARD.decode(body).ok()?;
    let mut decoder = GzDecoder::new(&compressed[..]);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).ok()?;
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn gzip_base64(s: &str) -> String {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(s.as_bytes()).unwrap();
        let bytes = encoder.finish().unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn hex_to_bytes_rejects_empty_and_bare_prefix() {
        assert!(hex_to_bytes("").is_err());
        assert!(hex_to_bytes("0x").is_err());
        assert!(hex_to_bytes("abcd").is_err()); // missing prefix
    }

    #[test]
    fn hex_to_bytes_decodes_valid_hex() {
        assert_eq!(hex_to_bytes("0xdeadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn to_utf8_rejects_invalid_sequences() {
        assert!(to_utf8(&[0xff, 0xfe]).is_none());
        assert_eq!(to_utf8(b"hello").unwrap(), "hello");
    }

    #[test]
    fn sha256_matches_known_vector() {
        // sha256("") == e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(
            sha256_lower_hex(b""),
            "0xe3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn parse_data_uri_defaults_mime_to_text_plain() {
        let uri = parse_data_uri("data:,hello").unwrap();
        assert_eq!(uri.raw_mime, "");
        assert_eq!(uri.content_type, "text/plain");
        assert_eq!(uri.body, "hello");
        assert!(uri.params.is_empty());
    }

    #[test]
    fn parse_data_uri_collects_params_between_semicolon_and_comma() {
        let uri = parse_data_uri("data:text/plain;rule=esip6;gzip,xyz").unwrap();
        assert_eq!(uri.content_type, "text/plain");
        assert_eq!(uri.params, vec!["rule=esip6", "gzip"]);
        assert_eq!(uri.body, "xyz");
    }

    #[test]
    fn parse_data_uri_rejects_non_data_uri() {
        assert!(parse_data_uri("hello world").is_none());
        assert!(parse_data_uri("data:no-comma-here").is_none());
    }

    #[test]
    fn has_rule_esip6_checks_full_uri() {
        assert!(has_rule_esip6("data:,foo;rule=esip6"));
        assert!(!has_rule_esip6("data:,foo"));
    }

    #[test]
    fn inflate_gzip_canonicalizes_and_strips_param() {
        let payload = gzip_base64("hello world");
        let uri = format!("data:text/plain;gzip;base64,{payload}");
        let canonical = inflate_gzip(&uri);
        assert_eq!(canonical, "data:text/plain,hello world");
    }

    #[test]
    fn inflate_gzip_is_idempotent() {
        let payload = gzip_base64("hello world");
        let uri = format!("data:text/plain;gzip;base64,{payload}");
        let once = inflate_gzip(&uri);
        let twice = inflate_gzip(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn inflate_gzip_falls_through_on_bad_payload() {
        let uri = "data:text/plain;gzip;base64,not-valid-base64!!!";
        assert_eq!(inflate_gzip(uri), uri);
    }

    #[test]
    fn inflate_gzip_passes_through_non_gzip_uri_unchanged() {
        let uri = "data:text/plain;rule=esip6,foo";
        assert_eq!(inflate_gzip(uri), uri);
    }

    #[test]
    fn identity_over_canonicalized_form() {
        let payload = gzip_base64("hello world");
        let uri = format!("data:text/plain;gzip;base64,{payload}");
        let canonical = inflate_gzip(&uri);
        let plain_uri = "data:text/plain,hello world";
        assert_eq!(
            sha256_lower_hex(canonical.as_bytes()),
            sha256_lower_hex(plain_uri.as_bytes())
        );
    }
}
