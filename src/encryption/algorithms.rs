//! Standard security handler algorithms (revisions 2 and 3).
//!
//! ISO 32000-1: Section 7.6.3 - Standard Security Handler

use md5::{Digest, Md5};

use super::rc4::rc4_crypt;

/// Padding string used in PDF encryption (32 bytes).
///
/// ISO 32000-1: Algorithm 2, step 1
pub const PADDING: &[u8; 32] = b"\x28\xBF\x4E\x5E\x4E\x75\x8A\x41\
                                  \x64\x00\x4E\x56\xFF\xFA\x01\x08\
                                  \x2E\x2E\x00\xB6\xD0\x68\x3E\x80\
                                  \x2F\x0C\xA9\xFE\x64\x53\x69\x7A";

/// Pad or truncate a password to 32 bytes using the standard padding.
pub fn pad_password(password: &[u8]) -> [u8; 32] {
    let mut padded = [0u8; 32];
    let pass_len = password.len().min(32);
    padded[..pass_len].copy_from_slice(&password[..pass_len]);
    padded[pass_len..].copy_from_slice(&PADDING[..(32 - pass_len)]);
    padded
}

/// MD5 of the first `key_length` bytes, repeated 50 times (revision 3 only).
fn strengthen(mut hash: Vec<u8>, key_length: usize) -> Vec<u8> {
    for _ in 0..50 {
        let mut hasher = Md5::new();
        hasher.update(&hash[..key_length]);
        hash = hasher.finalize().to_vec();
    }
    hash
}

/// Apply the 19 extra RC4 passes with XOR-ed keys (revision 3 only).
fn rc4_passes(key: &[u8], mut data: Vec<u8>) -> Vec<u8> {
    for i in 1..=19u8 {
        let modified: Vec<u8> = key.iter().map(|b| b ^ i).collect();
        data = rc4_crypt(&modified, &data);
    }
    data
}

/// Compute the /O value (Algorithm 3).
///
/// An empty owner password falls back to the user password.
pub fn compute_owner_password_hash(
    owner_password: &[u8],
    user_password: &[u8],
    revision: u32,
    key_length: usize,
) -> Vec<u8> {
    let password = if owner_password.is_empty() {
        user_password
    } else {
        owner_password
    };

    let mut hasher = Md5::new();
    hasher.update(pad_password(password));
    let mut hash = hasher.finalize().to_vec();
    let key_length = key_length.min(16);
    if revision >= 3 {
        hash = strengthen(hash, key_length);
    }
    let rc4_key = &hash[..key_length];

    let result = rc4_crypt(rc4_key, &pad_password(user_password));
    if revision >= 3 {
        rc4_passes(rc4_key, result)
    } else {
        result
    }
}

/// Compute the document encryption key (Algorithm 2).
///
/// `permissions` is the signed /P value; it is hashed as 4 little-endian bytes.
pub fn compute_encryption_key(
    user_password: &[u8],
    owner_hash: &[u8],
    permissions: i32,
    file_id: &[u8],
    revision: u32,
    key_length: usize,
) -> Vec<u8> {
    let key_length = key_length.min(16);
    let mut hasher = Md5::new();
    hasher.update(pad_password(user_password));
    hasher.update(owner_hash);
    hasher.update(permissions.to_le_bytes());
    hasher.update(file_id);
    let mut hash = hasher.finalize().to_vec();
    if revision >= 3 {
        hash = strengthen(hash, key_length);
    }
    hash.truncate(key_length);
    hash
}

/// Compute the /U value (Algorithm 4 for R=2, Algorithm 5 for R=3).
pub fn compute_user_password_hash(encryption_key: &[u8], file_id: &[u8], revision: u32) -> Vec<u8> {
    if revision >= 3 {
        let mut hasher = Md5::new();
        hasher.update(PADDING);
        hasher.update(file_id);
        let hash = rc4_crypt(encryption_key, &hasher.finalize());
        let mut result = rc4_passes(encryption_key, hash);
        // 16 arbitrary bytes complete the 32-byte value
        result.extend_from_slice(&[0u8; 16]);
        result
    } else {
        rc4_crypt(encryption_key, PADDING)
    }
}
