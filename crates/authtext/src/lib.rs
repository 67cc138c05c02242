//! Authenticated symmetric encryption of byte payloads into transport-safe
//! base64 tokens.
//!
//! [`AuthenticatedCipher`] is constructed once from a raw AES key
//! (16/24/32 bytes) and then encrypts arbitrary byte payloads into
//! self-contained base64 strings: a fresh random IV, AES-CFB encryption, and
//! an HMAC-SHA-512 tag over the IV and the ciphertext (encrypt-then-MAC).
//! Decryption verifies the tag in constant time and rejects any tampered,
//! truncated, or mis-encoded token before decrypting a single byte.
//!
//! Key management, transport, and persistence are the caller's problem;
//! this crate is a pure in-memory transform.
//!
//! # Ciphertext format
//!
//! ```text
//! base64( IV (16 bytes) || MAC (64 bytes) || ciphertext (len(plaintext) bytes) )
//! ```
//!
//! Standard base64 alphabet with `=` padding. There is no version tag and no
//! algorithm negotiation; both ends agree on cipher, mode, and MAC
//! out-of-band.
//!
//! # Example
//!
//! ```
//! use authtext::{AuthenticatedCipher, Cipher};
//!
//! let cipher = AuthenticatedCipher::new(b"0123456789123456")?;
//! let token = cipher.encrypt(b"payload")?;
//! assert_eq!(cipher.decrypt(&token)?, b"payload");
//! # Ok::<(), authtext::CipherError>(())
//! ```

pub mod cipher;
pub mod error;

pub use cipher::{AuthenticatedCipher, Cipher, BLOCK_SIZE, MAC_SIZE, OVERHEAD};
pub use error::CipherError;
