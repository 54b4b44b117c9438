//! Per-object encryption applied while objects are serialized.

use md5::{Digest, Md5};

use super::rc4::rc4_crypt;

/// Encrypts strings and streams with object-salted RC4 keys.
///
/// Every object is encrypted independently: the keystream restarts for each
/// string and each stream, keyed by the object's own derived key.
#[derive(Clone)]
pub struct EncryptionWriteHandler {
    /// The document key (5 bytes for 40-bit, 16 for 128-bit)
    encryption_key: Vec<u8>,
}

impl EncryptionWriteHandler {
    /// Create a handler from an already computed document key.
    pub fn from_key(encryption_key: Vec<u8>) -> Self {
        Self { encryption_key }
    }

    /// The document key.
    pub fn key(&self) -> &[u8] {
        &self.encryption_key
    }

    /// Derive the object-specific key (Algorithm 1).
    ///
    /// MD5 over the document key, the low 3 bytes of the object number and
    /// the 2 generation bytes (all little-endian), truncated to
    /// `min(n + 5, 16)` bytes.
    pub fn derive_object_key(&self, obj_num: u32, gen_num: u16) -> Vec<u8> {
        let mut hasher = Md5::new();
        hasher.update(&self.encryption_key);
        hasher.update(&obj_num.to_le_bytes()[..3]);
        hasher.update(gen_num.to_le_bytes());
        let hash = hasher.finalize();

        let key_length = (self.encryption_key.len() + 5).min(16);
        hash[..key_length].to_vec()
    }

    /// Encrypt a string belonging to object `obj_num`.
    pub fn encrypt_string(&self, data: &[u8], obj_num: u32, gen_num: u16) -> Vec<u8> {
        rc4_crypt(&self.derive_object_key(obj_num, gen_num), data)
    }

    /// Encrypt a stream payload belonging to object `obj_num`.
    pub fn encrypt_stream(&self, data: &[u8], obj_num: u32, gen_num: u16) -> Vec<u8> {
        rc4_crypt(&self.derive_object_key(obj_num, gen_num), data)
    }
}

impl std::fmt::Debug for EncryptionWriteHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionWriteHandler")
            .field("key_length", &self.encryption_key.len())
            .finish()
    }
}
