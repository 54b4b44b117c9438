//! Content streams.

use bytes::Bytes;

use super::{compress_data, OutContext};
use crate::error::Result;
use crate::object::{Dict, Object};
use crate::store::ObjectId;

/// A content stream: page drawing operators, a loose object, or raw side
/// data such as an image palette.
#[derive(Debug, Clone, Default)]
pub struct Contents {
    /// Plaintext payload
    pub data: Vec<u8>,
    /// Page whose primary stream this is
    pub on_page: Option<ObjectId>,
    /// Emit the payload as is, never compressed
    pub raw: bool,
}

impl Contents {
    /// Primary stream of `page`.
    pub fn for_page(page: ObjectId) -> Self {
        Self {
            on_page: Some(page),
            ..Self::default()
        }
    }

    /// Stream whose payload is written untouched.
    pub fn raw(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            raw: true,
            ..Self::default()
        }
    }

    /// Append operator text.
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Build the stream, compressing unless raw.
    pub fn to_object(&self, ctx: &OutContext<'_>) -> Result<Object> {
        let mut dict = Dict::new();
        let data = if ctx.compress && !self.raw {
            dict.insert("Filter".into(), Object::name("FlateDecode"));
            compress_data(&self.data)?
        } else {
            self.data.clone()
        };
        Ok(Object::Stream {
            dict,
            data: Bytes::from(data),
        })
    }
}
