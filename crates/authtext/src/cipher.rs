//! AES-CFB encryption with HMAC-SHA-512 authentication of byte payloads.
//!
//! **Algorithm choice:** encrypt-then-MAC. The MAC is computed over the IV
//! and the ciphertext, never the plaintext, and decryption verifies it in
//! constant time before a single byte of payload is decrypted. A forged or
//! corrupted token is rejected without any decryption work and without
//! leaking which of the three inputs (key, IV, payload) was wrong.
//!
//! **Do NOT reorder the decrypt checks.** Decoding, the length check, and
//! MAC verification must all pass before the CFB decryptor runs; decrypting
//! unauthenticated data would hand an attacker a padding/keystream oracle.

use aes::{
    cipher::{generic_array::GenericArray, AsyncStreamCipher, InnerIvInit, KeyInit},
    Aes128, Aes192, Aes256,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cfb_mode::{Decryptor, Encryptor};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;

use crate::error::CipherError;

/// Byte length of an AES block; also the IV length. Depends on the block
/// size only, not on the key size.
pub const BLOCK_SIZE: usize = 16;

/// Byte length of the HMAC-SHA-512 authentication tag.
pub const MAC_SIZE: usize = 64;

/// Minimum decoded length of any well-formed token (IV plus MAC).
pub const OVERHEAD: usize = BLOCK_SIZE + MAC_SIZE;

type HmacSha512 = Hmac<Sha512>;

/// Capability interface for the encrypt/decrypt pair.
///
/// Call sites depend on this trait (as a generic bound or `&dyn Cipher`)
/// rather than on [`AuthenticatedCipher`] directly, so the concrete
/// construction can be swapped without touching them.
pub trait Cipher: Send + Sync {
    /// Encrypt `plaintext` (may be empty) into a transport-safe token.
    ///
    /// Each call draws a fresh random IV, so encrypting the same plaintext
    /// twice yields different tokens.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomSource`] if the OS random source cannot
    /// supply IV bytes. No other failure exists once the key was accepted.
    fn encrypt(&self, plaintext: &[u8]) -> Result<String, CipherError>;

    /// Recover the plaintext from a token produced by [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Decoding`] if the token is not valid base64,
    /// [`CipherError::MalformedCiphertext`] if the decoded bytes cannot
    /// hold an IV and a MAC, and [`CipherError::AuthenticationFailed`] if
    /// the MAC does not verify — whether from tampering, corruption, or a
    /// wrong key.
    fn decrypt(&self, token: &str) -> Result<Vec<u8>, CipherError>;
}

/// AES instance keyed at construction time; the variant is selected by the
/// key length.
#[derive(Clone)]
enum AesBlock {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

/// Authenticated symmetric cipher over a single shared key.
///
/// Holds the keyed AES and HMAC instances built from the key; the raw key
/// bytes are not retained separately. The instance is immutable after
/// construction, and every call clones the keyed primitives into its own
/// mode object, so `encrypt` and `decrypt` may run concurrently on one
/// shared instance.
#[derive(Clone)]
pub struct AuthenticatedCipher {
    block: AesBlock,
    mac: HmacSha512,
}

impl AuthenticatedCipher {
    /// Build a cipher from a raw key.
    ///
    /// The key length selects the AES variant: 16 bytes for AES-128, 24 for
    /// AES-192, 32 for AES-256. The same bytes key the HMAC.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeySize`] for any other key length.
    /// There is no deferred fallible setup after this point.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKeySize { len: key.len() };
        let block = match key.len() {
            16 => AesBlock::Aes128(Aes128::new_from_slice(key).map_err(invalid)?),
            24 => AesBlock::Aes192(Aes192::new_from_slice(key).map_err(invalid)?),
            32 => AesBlock::Aes256(Aes256::new_from_slice(key).map_err(invalid)?),
            len => return Err(CipherError::InvalidKeySize { len }),
        };
        // HMAC accepts any key length, so this cannot fail once the AES
        // key-size check has passed.
        let mac = <HmacSha512 as Mac>::new_from_slice(key).map_err(invalid)?;
        Ok(Self { block, mac })
    }

    /// HMAC-SHA-512 state keyed from the instance key and fed `iv || payload`.
    fn mac_for(&self, iv: &[u8], payload: &[u8]) -> HmacSha512 {
        let mut mac = self.mac.clone();
        mac.update(iv);
        mac.update(payload);
        mac
    }

    /// Run the CFB encryptor over `buf` in place under `iv`.
    fn keystream_encrypt(&self, iv: &[u8; BLOCK_SIZE], buf: &mut [u8]) {
        let iv = GenericArray::from_slice(iv);
        match &self.block {
            AesBlock::Aes128(c) => Encryptor::inner_iv_init(c.clone(), iv).encrypt(buf),
            AesBlock::Aes192(c) => Encryptor::inner_iv_init(c.clone(), iv).encrypt(buf),
            AesBlock::Aes256(c) => Encryptor::inner_iv_init(c.clone(), iv).encrypt(buf),
        }
    }

    /// Run the CFB decryptor over `buf` in place under `iv`.
    fn keystream_decrypt(&self, iv: &[u8; BLOCK_SIZE], buf: &mut [u8]) {
        let iv = GenericArray::from_slice(iv);
        match &self.block {
            AesBlock::Aes128(c) => Decryptor::inner_iv_init(c.clone(), iv).decrypt(buf),
            AesBlock::Aes192(c) => Decryptor::inner_iv_init(c.clone(), iv).decrypt(buf),
            AesBlock::Aes256(c) => Decryptor::inner_iv_init(c.clone(), iv).decrypt(buf),
        }
    }
}

impl Cipher for AuthenticatedCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<String, CipherError> {
        let mut buf = vec![0u8; OVERHEAD + plaintext.len()];

        // Fresh IV from the OS CSPRNG; abort on failure rather than fall
        // back to a weaker source.
        let mut iv = [0u8; BLOCK_SIZE];
        OsRng.try_fill_bytes(&mut iv)?;
        buf[..BLOCK_SIZE].copy_from_slice(&iv);

        buf[OVERHEAD..].copy_from_slice(plaintext);
        self.keystream_encrypt(&iv, &mut buf[OVERHEAD..]);

        let tag = self.mac_for(&iv, &buf[OVERHEAD..]).finalize().into_bytes();
        buf[BLOCK_SIZE..OVERHEAD].copy_from_slice(&tag);

        Ok(STANDARD.encode(&buf))
    }

    fn decrypt(&self, token: &str) -> Result<Vec<u8>, CipherError> {
        let mut data = STANDARD.decode(token)?;
        if data.len() < OVERHEAD {
            return Err(CipherError::MalformedCiphertext { len: data.len() });
        }

        let (header, payload) = data.split_at_mut(OVERHEAD);
        let (iv_bytes, tag) = header.split_at(BLOCK_SIZE);
        let mut iv = [0u8; BLOCK_SIZE];
        iv.copy_from_slice(iv_bytes);

        // Constant-time verification, before any decryption of the payload.
        self.mac_for(&iv, payload)
            .verify_slice(tag)
            .map_err(|_| CipherError::AuthenticationFailed)?;

        self.keystream_decrypt(&iv, payload);
        Ok(data.split_off(OVERHEAD))
    }
}

impl std::fmt::Debug for AuthenticatedCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("AuthenticatedCipher([REDACTED])")
    }
}
