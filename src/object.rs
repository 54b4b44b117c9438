//! Generic PDF value model.
//!
//! Typed document objects (see [`crate::store::PdfObject`]) lower themselves
//! into these values at output time; the serializer only ever sees `Object`.

use indexmap::IndexMap;

/// Dictionary with stable insertion order, so output is byte-reproducible.
pub type Dict = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (starting with /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dict),
    /// Stream (dictionary + data)
    Stream {
        /// Stream dictionary
        dict: Dict,
        /// Stream data
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Name object.
    pub fn name(name: impl Into<String>) -> Self {
        Object::Name(name.into())
    }

    /// Generation-0 reference to `id`.
    pub fn reference(id: u32) -> Self {
        Object::Reference(ObjectRef::new(id, 0))
    }

    /// String object from raw bytes.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Object::String(bytes.into())
    }

    /// Array of real numbers.
    pub fn reals(values: &[f32]) -> Self {
        Object::Array(values.iter().map(|v| Object::Real(f64::from(*v))).collect())
    }

    /// Array of integers.
    pub fn integers<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Object::Array(values.into_iter().map(Object::Integer).collect())
    }

    /// Array of names.
    pub fn names<S: AsRef<str>>(values: &[S]) -> Self {
        Object::Array(values.iter().map(|v| Object::name(v.as_ref())).collect())
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to string bytes (test helper).
    #[cfg(test)]
    pub(crate) fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Stream payload, if this is a stream.
    pub fn stream_data(&self) -> Option<&[u8]> {
        match self {
            Object::Stream { data, .. } => Some(data),
            _ => None,
        }
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Object::Boolean(value)
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<f32> for Object {
    fn from(value: f32) -> Self {
        Object::Real(f64::from(value))
    }
}

impl From<Dict> for Object {
    fn from(value: Dict) -> Self {
        Object::Dictionary(value)
    }
}
