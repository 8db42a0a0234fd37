//! Binary payload wrappers for the `byte` and `binary` formats.
//!
//! Both wrappers keep only the stored text. [`Base64Encoding::bytes`] and
//! [`OctetEncoding::bytes`] decode on every call, so a read never observes a
//! buffer cached before the backing text was replaced.

use crate::error::FormatError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Base64 text holding a binary payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Base64Encoding {
    encoded: String,
}

impl Base64Encoding {
    /// Wraps already-encoded base64 text.
    #[must_use]
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// Encodes raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            encoded: STANDARD.encode(bytes),
        }
    }

    /// Returns the stored base64 text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Decodes the payload.
    ///
    /// # Errors
    /// Returns `FormatError::Malformed` if the text is not valid base64.
    pub fn bytes(&self) -> Result<Vec<u8>, FormatError> {
        STANDARD
            .decode(&self.encoded)
            .map_err(|e| FormatError::malformed("byte", self.encoded.as_str(), e))
    }
}

impl fmt::Display for Base64Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// Text holding one code unit per byte (U+0000 to U+00FF).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OctetEncoding {
    encoded: String,
}

impl OctetEncoding {
    /// Wraps already-encoded octet text.
    #[must_use]
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// Encodes raw bytes, one `char` per byte.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            encoded: bytes.iter().map(|&b| char::from(b)).collect(),
        }
    }

    /// Returns the stored octet text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Decodes the payload.
    ///
    /// # Errors
    /// Returns `FormatError::Malformed` if a character lies above U+00FF.
    pub fn bytes(&self) -> Result<Vec<u8>, FormatError> {
        self.encoded
            .chars()
            .map(|c| {
                u8::try_from(u32::from(c)).map_err(|_| {
                    FormatError::malformed(
                        "binary",
                        self.encoded.as_str(),
                        format!("character U+{:04X} is not an octet", u32::from(c)),
                    )
                })
            })
            .collect()
    }
}

impl fmt::Display for OctetEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "The quick brown fox jumps over the lazy dog 0123456789 ;.,!@#$%^&*()_+=-\\|][{}\":?/><`~";
    const BASE64: &str = "VGhlIHF1aWNrIGJyb3duIGZveCBqdW1wcyBvdmVyIHRoZSBsYXp5IGRvZyAwMTIzNDU2Nzg5IDsuLCFAIyQlXiYqKClfKz0tXHxdW3t9Ijo/Lz48YH4=";

    #[test]
    fn test_base64_known_payload() {
        let enc = Base64Encoding::from_encoded(BASE64);
        assert_eq!(enc.as_str(), BASE64);
        assert_eq!(enc.bytes().unwrap(), TEXT.as_bytes());
        assert_eq!(Base64Encoding::from_bytes(TEXT.as_bytes()), enc);
    }

    #[test]
    fn test_base64_repeat_read() {
        let enc = Base64Encoding::from_encoded(BASE64);
        let first = enc.bytes().unwrap();
        let second = enc.bytes().unwrap();
        assert_eq!(first, second);
        assert_eq!(enc.to_string(), BASE64);
    }

    #[test]
    fn test_base64_malformed() {
        let enc = Base64Encoding::from_encoded("not base64!");
        assert!(matches!(enc.bytes(), Err(FormatError::Malformed { .. })));
    }

    #[test]
    fn test_octet_is_not_base64() {
        let enc = OctetEncoding::from_bytes(&[0x00, 0x41, 0xFF]);
        assert_eq!(enc.as_str().chars().count(), 3);
        assert_eq!(enc.as_str(), "\u{0}A\u{FF}");
        assert_eq!(enc.bytes().unwrap(), vec![0x00, 0x41, 0xFF]);
        assert_eq!(enc.bytes().unwrap(), enc.bytes().unwrap());
    }

    #[test]
    fn test_octet_rejects_wide_chars() {
        let enc = OctetEncoding::from_encoded("a\u{263A}");
        assert!(enc.bytes().is_err());
    }
}
