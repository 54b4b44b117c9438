//! PDF encryption support (standard security handler, RC4).
//!
//! Writing encrypted documents needs three things, all computed once when
//! encryption is switched on:
//!
//! - the /O value, derived from the owner password
//! - the document key, derived from the user password, /O, /P and the file id
//! - the /U value, which lets a reader verify the user password
//!
//! During output every string and stream of every object (except the
//! encryption dictionary itself) is RC4-encrypted with a key salted by the
//! object number; see [`EncryptionWriteHandler`].
//!
//! # References
//!
//! - ISO 32000-1 Section 7.6.2: General Encryption Algorithm
//! - ISO 32000-1 Section 7.6.3: Standard Security Handler

pub mod algorithms;
pub mod rc4;
mod write_handler;

pub use write_handler::EncryptionWriteHandler;

/// Encryption algorithm used in the PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
pub enum Algorithm {
    /// RC4 with 40-bit key (V=1, R=2)
    #[default]
    #[serde(rename = "rc4-40")]
    Rc4_40,
    /// RC4 with 128-bit key (V=2, R=3)
    #[serde(rename = "rc4-128")]
    Rc4_128,
}

impl Algorithm {
    /// Get the key length in bytes for this algorithm.
    pub fn key_length(&self) -> usize {
        match self {
            Algorithm::Rc4_40 => 5,
            Algorithm::Rc4_128 => 16,
        }
    }

    /// The (V, R) version/revision pair written to the encryption dictionary.
    pub fn version_revision(&self) -> (u32, u32) {
        match self {
            Algorithm::Rc4_40 => (1, 2),
            Algorithm::Rc4_128 => (2, 3),
        }
    }
}

bitflags::bitflags! {
    /// User access permissions granted when the document is opened with the
    /// user password.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u8 {
        /// Print the document
        const PRINT = 4;
        /// Modify the contents
        const MODIFY = 8;
        /// Copy or extract text and graphics
        const COPY = 16;
        /// Add or modify annotations
        const ANNOTATE = 32;
    }
}

impl Permissions {
    /// The permission byte: bits 7 and 8 are always set.
    pub fn p_byte(&self) -> u8 {
        0xC0 | self.bits()
    }

    /// The signed /P value: the permission byte with all upper bits set,
    /// i.e. `-((p ^ 255) + 1)`.
    pub fn p_value(&self) -> i32 {
        i32::from_le_bytes([self.p_byte(), 0xFF, 0xFF, 0xFF])
    }
}

/// Passwords and permissions requested by the caller.
#[derive(Debug, Clone)]
pub struct EncryptionSettings {
    /// User password (may be empty)
    pub user_password: Vec<u8>,
    /// Owner password; empty falls back to the user password
    pub owner_password: Vec<u8>,
    /// Granted permissions
    pub permissions: Permissions,
    /// Key strength
    pub algorithm: Algorithm,
}

impl EncryptionSettings {
    /// Settings with the given passwords, all permissions denied, 40-bit RC4.
    pub fn new(user_password: impl AsRef<[u8]>, owner_password: impl AsRef<[u8]>) -> Self {
        Self {
            user_password: user_password.as_ref().to_vec(),
            owner_password: owner_password.as_ref().to_vec(),
            permissions: Permissions::empty(),
            algorithm: Algorithm::Rc4_40,
        }
    }

    /// Grant permissions.
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Select the key strength.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Values derived by the standard security handler.
#[derive(Debug, Clone)]
pub struct SecurityValues {
    /// /O entry (32 bytes)
    pub owner_hash: Vec<u8>,
    /// /U entry (32 bytes)
    pub user_hash: Vec<u8>,
    /// /P entry
    pub permissions: i32,
    /// Document key
    pub key: Vec<u8>,
}

impl SecurityValues {
    /// Run Algorithms 2 to 5 for `settings` against the first file id.
    pub fn compute(settings: &EncryptionSettings, file_id: &[u8]) -> Self {
        let (_, revision) = settings.algorithm.version_revision();
        let key_length = settings.algorithm.key_length();
        let permissions = settings.permissions.p_value();

        let owner_hash = algorithms::compute_owner_password_hash(
            &settings.owner_password,
            &settings.user_password,
            revision,
            key_length,
        );
        let key = algorithms::compute_encryption_key(
            &settings.user_password,
            &owner_hash,
            permissions,
            file_id,
            revision,
            key_length,
        );
        let user_hash = algorithms::compute_user_password_hash(&key, file_id, revision);

        Self {
            owner_hash,
            user_hash,
            permissions,
            key,
        }
    }
}
