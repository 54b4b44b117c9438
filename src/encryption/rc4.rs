//! RC4 stream cipher used by the standard security handler.
//!
//! ISO 32000-1: Section 7.6.2 - General Encryption Algorithm

/// RC4 cipher state: the 256-byte permutation plus the two stream indices.
///
/// The key schedule runs once in [`Rc4Cipher::new`]; each call to
/// [`Rc4Cipher::apply_keystream`] continues the same keystream.
#[derive(Clone)]
pub struct Rc4Cipher {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4Cipher {
    /// Run the key-scheduling algorithm for `key`.
    ///
    /// PDF keys are 5 to 16 bytes. An empty key degrades to the identity
    /// permutation rather than dividing by zero.
    pub fn new(key: &[u8]) -> Self {
        let mut s = [0u8; 256];
        for (i, val) in s.iter_mut().enumerate() {
            *val = i as u8;
        }

        if !key.is_empty() {
            let mut j = 0u8;
            for i in 0..256 {
                j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
                s.swap(i, j as usize);
            }
        }

        Self { s, i: 0, j: 0 }
    }

    /// The current permutation table.
    pub fn permutation(&self) -> &[u8; 256] {
        &self.s
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let k = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[k as usize]
    }

    /// XOR the keystream into `data` in place.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte ^= self.next_byte();
        }
    }
}

impl std::fmt::Debug for Rc4Cipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Rc4Cipher").finish_non_exhaustive()
    }
}

/// Encrypt or decrypt `data` with a fresh cipher keyed by `key`.
///
/// RC4 is symmetric, so encryption and decryption are the same operation.
pub fn rc4_crypt(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut cipher = Rc4Cipher::new(key);
    let mut result = data.to_vec();
    cipher.apply_keystream(&mut result);
    result
}
