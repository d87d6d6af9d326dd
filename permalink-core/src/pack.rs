use std::string::FromUtf8Error;

use thiserror::Error;

use crate::deflate::{self, CorruptStreamError};
use crate::token::{self, MalformedTokenError};

/// Why a query parameter value could not be turned back into text.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Token(#[from] MalformedTokenError),
    #[error(transparent)]
    Stream(#[from] CorruptStreamError),
    #[error("decompressed payload is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Text <-> token conversion at a fixed compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packer {
    level: u32,
}

impl Default for Packer {
    fn default() -> Self {
        Self::new(deflate::DEFAULT_LEVEL)
    }
}

impl Packer {
    pub fn new(level: u32) -> Self {
        Self { level: level.min(9) }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// UTF-8 encode, deflate, then token-encode `text`.
    pub fn pack(&self, text: &str) -> String {
        token::encode_token(&deflate::compress_with_level(text.as_bytes(), self.level))
    }

    /// Inverse of [`Packer::pack`]. The compression level plays no part in decoding.
    pub fn unpack(&self, token: &str) -> Result<String, DecodeError> {
        let compressed = token::decode_token(token)?;
        let bytes = deflate::decompress(&compressed)?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Pack `text` at the default compression level.
pub fn pack(text: &str) -> String {
    Packer::default().pack(text)
}

/// Inverse of [`pack`]. The compression level doesn't matter when decoding,
/// so this accepts tokens from any [`Packer`].
pub fn unpack(token: &str) -> Result<String, DecodeError> {
    Packer::default().unpack(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_source_text() {
        let text = "fn main() {}";
        assert_eq!(unpack(&pack(text)).unwrap(), text);
    }

    #[test]
    fn roundtrip_empty() {
        assert_eq!(unpack(&pack("")).unwrap(), "");
    }

    #[test]
    fn roundtrip_multibyte() {
        let text = "emoji: 🔥";
        assert_eq!(unpack(&pack(text)).unwrap(), text);
    }

    #[test]
    fn packed_text_is_url_safe() {
        let token = pack("let x = a + b / c; // ?&=#");
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn level_does_not_affect_decoding() {
        let text = "fx::sequence(&[fx::fade_to_fg(Color::Black, 300)])".repeat(8);
        let fast = Packer::new(1).pack(&text);
        let best = Packer::new(9).pack(&text);
        assert_eq!(Packer::new(9).unpack(&fast).unwrap(), text);
        assert_eq!(Packer::new(1).unpack(&best).unwrap(), text);
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(Packer::new(42).level(), 9);
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(matches!(
            unpack("not-valid-base64-!!!"),
            Err(DecodeError::Token(_))
        ));
    }

    #[test]
    fn valid_token_with_garbage_payload_is_rejected() {
        // Decodes as base64 but the bytes are a reserved deflate block type
        let token = token::encode_token(&[0x07, 0x00]);
        assert!(matches!(unpack(&token), Err(DecodeError::Stream(_))));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let token = token::encode_token(&deflate::compress(&[0xC3, 0x28]));
        assert!(matches!(unpack(&token), Err(DecodeError::Utf8(_))));
    }
}
