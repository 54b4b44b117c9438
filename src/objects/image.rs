//! Image XObjects.

use bytes::Bytes;

use super::{compress_data, OutContext};
use crate::error::Result;
use crate::object::{Dict, Object};
use crate::store::ObjectId;

/// Image color space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    /// `[/Indexed /DeviceRGB hival palette]`
    Indexed {
        /// Highest palette index
        hival: u8,
        /// Raw Contents object holding the palette bytes
        palette: ObjectId,
    },
}

impl ImageColorSpace {
    /// Color components per pixel of the base space.
    pub fn components(&self) -> u8 {
        match self {
            ImageColorSpace::DeviceGray | ImageColorSpace::Indexed { .. } => 1,
            ImageColorSpace::DeviceRgb => 3,
            ImageColorSpace::DeviceCmyk => 4,
        }
    }

    fn to_object(&self) -> Object {
        match self {
            ImageColorSpace::DeviceGray => Object::name("DeviceGray"),
            ImageColorSpace::DeviceRgb => Object::name("DeviceRGB"),
            ImageColorSpace::DeviceCmyk => Object::name("DeviceCMYK"),
            ImageColorSpace::Indexed { hival, palette } => Object::Array(vec![
                Object::name("Indexed"),
                Object::name("DeviceRGB"),
                Object::Integer(i64::from(*hival)),
                Object::reference(*palette),
            ]),
        }
    }
}

/// How the payload is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    /// JPEG passthrough
    Dct,
    /// PNG IDAT passthrough with a PNG predictor
    FlatePng {
        /// Components per pixel
        colors: u8,
        /// Pixels per row
        columns: u32,
    },
    /// Plain pixel rows, compressed at output
    Pixels,
}

/// An image XObject.
#[derive(Debug, Clone)]
pub struct Image {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// /BitsPerComponent
    pub bits_per_component: u8,
    /// /ColorSpace
    pub color_space: ImageColorSpace,
    /// Encoding of `data`
    pub filter: ImageFilter,
    /// /Decode array
    pub decode: Option<Vec<f32>>,
    /// Color key /Mask ranges
    pub mask: Option<Vec<i64>>,
    /// /SMask image
    pub smask: Option<ObjectId>,
    /// Payload
    pub data: Bytes,
}

impl Image {
    /// An uncompressed 8-bit image.
    pub fn pixels(width: u32, height: u32, color_space: ImageColorSpace, data: impl Into<Bytes>) -> Self {
        Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            filter: ImageFilter::Pixels,
            decode: None,
            mask: None,
            smask: None,
            data: data.into(),
        }
    }

    /// Build the XObject stream.
    pub fn to_object(&self, ctx: &OutContext<'_>) -> Result<Object> {
        let mut dict = Dict::new();
        dict.insert("Type".into(), Object::name("XObject"));
        dict.insert("Subtype".into(), Object::name("Image"));
        dict.insert("Width".into(), Object::Integer(i64::from(self.width)));
        dict.insert("Height".into(), Object::Integer(i64::from(self.height)));
        dict.insert("ColorSpace".into(), self.color_space.to_object());
        dict.insert(
            "BitsPerComponent".into(),
            Object::Integer(i64::from(self.bits_per_component)),
        );
        if let Some(decode) = &self.decode {
            dict.insert("Decode".into(), Object::reals(decode));
        }
        if let Some(mask) = &self.mask {
            dict.insert("Mask".into(), Object::integers(mask.iter().copied()));
        }
        if let Some(id) = self.smask {
            dict.insert("SMask".into(), Object::reference(id));
        }

        let data = match self.filter {
            ImageFilter::Dct => {
                dict.insert("Filter".into(), Object::name("DCTDecode"));
                self.data.clone()
            }
            ImageFilter::FlatePng { colors, columns } => {
                dict.insert("Filter".into(), Object::name("FlateDecode"));
                let mut parms = Dict::new();
                parms.insert("Predictor".into(), Object::Integer(15));
                parms.insert("Colors".into(), Object::Integer(i64::from(colors)));
                parms.insert("Columns".into(), Object::Integer(i64::from(columns)));
                parms.insert(
                    "BitsPerComponent".into(),
                    Object::Integer(i64::from(self.bits_per_component)),
                );
                dict.insert("DecodeParms".into(), Object::Dictionary(parms));
                self.data.clone()
            }
            ImageFilter::Pixels if ctx.compress => {
                dict.insert("Filter".into(), Object::name("FlateDecode"));
                Bytes::from(compress_data(&self.data)?)
            }
            ImageFilter::Pixels => self.data.clone(),
        };

        Ok(Object::Stream { dict, data })
    }
}
