//! The standard security handler dictionary.

use crate::encryption::{Algorithm, SecurityValues};
use crate::object::{Dict, Object};

/// /Encrypt dictionary. Written in the clear.
#[derive(Debug, Clone)]
pub struct EncryptionDict {
    /// Key strength
    pub algorithm: Algorithm,
    /// /O
    pub owner_hash: Vec<u8>,
    /// /U
    pub user_hash: Vec<u8>,
    /// /P
    pub permissions: i32,
}

impl EncryptionDict {
    /// Dictionary for computed security values.
    pub fn new(algorithm: Algorithm, values: &SecurityValues) -> Self {
        Self {
            algorithm,
            owner_hash: values.owner_hash.clone(),
            user_hash: values.user_hash.clone(),
            permissions: values.permissions,
        }
    }

    /// Build the encryption dictionary.
    pub fn to_object(&self) -> Object {
        let (version, revision) = self.algorithm.version_revision();
        let mut dict = Dict::new();
        dict.insert("Filter".into(), Object::name("Standard"));
        dict.insert("V".into(), Object::Integer(i64::from(version)));
        dict.insert("R".into(), Object::Integer(i64::from(revision)));
        if revision == 3 {
            dict.insert(
                "Length".into(),
                Object::Integer(self.algorithm.key_length() as i64 * 8),
            );
        }
        dict.insert("O".into(), Object::String(self.owner_hash.clone()));
        dict.insert("U".into(), Object::String(self.user_hash.clone()));
        dict.insert("P".into(), Object::Integer(i64::from(self.permissions)));
        Object::Dictionary(dict)
    }
}
