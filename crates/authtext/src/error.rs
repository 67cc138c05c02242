//! Error types for token encryption and decryption.

use thiserror::Error;

/// Errors produced by the cipher layer.
///
/// No variant is retried internally; every failure is surfaced to the
/// caller, and no partial plaintext is ever returned alongside one.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key length does not select any AES variant (must be 16, 24, or
    /// 32 bytes). Raised at construction, never at first use.
    #[error("invalid key size: {len} bytes (expected 16, 24, or 32)")]
    InvalidKeySize {
        /// Length of the rejected key.
        len: usize,
    },

    /// The OS random source could not supply IV bytes. Encryption aborts
    /// rather than falling back to a weaker source.
    #[error("secure random source unavailable")]
    RandomSource(#[from] rand::Error),

    /// The token is not valid standard base64 (non-alphabet characters or
    /// bad padding).
    #[error("token is not valid base64")]
    Decoding(#[from] base64::DecodeError),

    /// The decoded token is too short to contain an IV and a MAC.
    #[error("malformed ciphertext: decoded to {len} bytes, shorter than IV plus MAC")]
    MalformedCiphertext {
        /// Length of the decoded token.
        len: usize,
    },

    /// The MAC did not verify. A wrong key, corruption, and forgery are
    /// deliberately indistinguishable through this variant.
    #[error("ciphertext failed authentication")]
    AuthenticationFailed,
}
