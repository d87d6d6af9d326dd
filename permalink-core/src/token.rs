use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("malformed token: {0}")]
pub struct MalformedTokenError(#[from] pub base64::DecodeError);

/// Encode bytes as a URL-safe token.
///
/// The token uses `-` and `_` in place of `+` and `/` and carries no `=`
/// padding, so it can sit unescaped inside a query component.
pub fn encode_token(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a token produced by [`encode_token`].
///
/// Padding is restored from the token length, so tokens with or without
/// trailing `=` both decode. Standard-alphabet `+` and `/` are accepted too.
pub fn decode_token(token: &str) -> Result<Vec<u8>, MalformedTokenError> {
    let mut standard: String = token
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    let padding = (4 - standard.len() % 4) % 4;
    standard.extend(std::iter::repeat('=').take(padding));

    Ok(STANDARD.decode(standard)?)
}
