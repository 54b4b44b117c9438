//! Image embedding.
//!
//! Images are XObjects registered once per source key (a file path or a
//! caller-chosen key for buffers) and painted with
//! `q w 0 0 h x y cm /I<n> Do Q`.
//!
//! # Supported Formats
//!
//! - **JPEG**: passed through with DCTDecode
//! - **PNG**: IDAT data passed through with a PNG predictor; palettes and
//!   tRNS color keys are kept
//! - **PNG with alpha**: decoded with the `image` crate (feature
//!   `png-alpha`) into pixels plus a soft mask
//! - **Pixels**: raw 8-bit Gray, RGB or CMYK rows

use std::path::Path;

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;

use super::content_stream::ContentStreamOp;
use super::pdf_writer::{PdfWriter, PROCSET_ID};
use crate::error::{Error, Result};
use crate::objects::contents::Contents;
use crate::objects::image::{Image, ImageColorSpace, ImageFilter};
use crate::store::{ObjectId, PdfObject};

const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Image decoding error.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Not a PNG file, or a broken chunk
    #[error("Malformed PNG: {0}")]
    MalformedPng(String),

    /// A valid PNG this writer cannot embed
    #[error("Unsupported PNG: {0}")]
    UnsupportedPng(String),

    /// Not a JPEG file, or no frame header
    #[error("Invalid JPEG: {0}")]
    InvalidJpeg(String),

    /// Failed to decode image
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    /// Pixel buffer does not match the dimensions
    #[error("Expected {expected} bytes of pixel data, got {actual}")]
    PixelCount { expected: usize, actual: usize },
}

/// Layout of raw pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    Rgb,
    Cmyk,
}

impl PixelFormat {
    fn color_space(self) -> ImageColorSpace {
        match self {
            PixelFormat::Gray => ImageColorSpace::DeviceGray,
            PixelFormat::Rgb => ImageColorSpace::DeviceRgb,
            PixelFormat::Cmyk => ImageColorSpace::DeviceCmyk,
        }
    }
}

/// A registered image.
#[derive(Debug, Clone)]
pub(crate) struct ImageEntry {
    /// XObject resource name, `I<n>`
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub id: ObjectId,
}

/// Header fields and payload chunks of a PNG file.
#[derive(Debug, Clone)]
pub struct PngInfo {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub interlace: u8,
    /// PLTE bytes
    pub palette: Vec<u8>,
    /// tRNS bytes
    pub transparency: Vec<u8>,
    /// Concatenated IDAT data
    pub data: Vec<u8>,
}

impl PngInfo {
    /// Walk the chunks of a PNG file.
    pub fn parse(buf: &[u8]) -> std::result::Result<Self, ImageError> {
        if buf.len() < 8 || &buf[..8] != PNG_SIGNATURE {
            return Err(ImageError::MalformedPng("bad signature".into()));
        }
        let mut info = PngInfo {
            width: 0,
            height: 0,
            bit_depth: 0,
            color_type: 0,
            interlace: 0,
            palette: Vec::new(),
            transparency: Vec::new(),
            data: Vec::new(),
        };
        let mut seen_header = false;
        let mut pos = 8;
        while pos + 8 <= buf.len() {
            let length = BigEndian::read_u32(&buf[pos..pos + 4]) as usize;
            let kind = &buf[pos + 4..pos + 8];
            let start = pos + 8;
            let end = start
                .checked_add(length)
                .filter(|&end| end <= buf.len())
                .ok_or_else(|| ImageError::MalformedPng("truncated chunk".into()))?;
            let body = &buf[start..end];
            match kind {
                b"IHDR" => {
                    if body.len() < 13 {
                        return Err(ImageError::MalformedPng("short IHDR".into()));
                    }
                    info.width = BigEndian::read_u32(&body[0..4]);
                    info.height = BigEndian::read_u32(&body[4..8]);
                    info.bit_depth = body[8];
                    info.color_type = body[9];
                    info.interlace = body[12];
                    seen_header = true;
                }
                b"PLTE" => info.palette = body.to_vec(),
                b"tRNS" => info.transparency = body.to_vec(),
                b"IDAT" => info.data.extend_from_slice(body),
                b"IEND" => break,
                _ => {}
            }
            // skip the CRC
            pos = end + 4;
        }
        if !seen_header {
            return Err(ImageError::MalformedPng("missing IHDR".into()));
        }
        Ok(info)
    }

    fn has_alpha(&self) -> bool {
        matches!(self.color_type, 4 | 6)
    }

    /// Check what the pass-through path can embed.
    fn check_supported(&self) -> std::result::Result<(), ImageError> {
        if self.bit_depth > 8 {
            return Err(ImageError::UnsupportedPng(format!("bit depth {}", self.bit_depth)));
        }
        if self.interlace != 0 {
            return Err(ImageError::UnsupportedPng("interlaced".into()));
        }
        if !matches!(self.color_type, 0 | 2 | 3 | 4 | 6) {
            return Err(ImageError::UnsupportedPng(format!("color type {}", self.color_type)));
        }
        Ok(())
    }

    /// Color-key /Mask ranges from tRNS.
    fn mask(&self) -> Option<Vec<i64>> {
        let t = &self.transparency;
        match self.color_type {
            // first fully transparent palette entry
            3 => t.iter().position(|&a| a == 0).map(|i| vec![i as i64, i as i64]),
            0 if t.len() >= 2 => {
                let g = i64::from(BigEndian::read_u16(&t[0..2]));
                Some(vec![g, g])
            }
            2 if t.len() >= 6 => {
                let r = i64::from(BigEndian::read_u16(&t[0..2]));
                let g = i64::from(BigEndian::read_u16(&t[2..4]));
                let b = i64::from(BigEndian::read_u16(&t[4..6]));
                Some(vec![r, r, g, g, b, b])
            }
            _ => None,
        }
    }
}

/// Width, height and component count from a JPEG frame header.
pub fn parse_jpeg_header(data: &[u8]) -> std::result::Result<(u32, u32, u8), ImageError> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::InvalidJpeg("missing SOI marker".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        pos += 2;

        // Skip padding
        if marker == 0xFF || marker == 0x00 {
            continue;
        }

        // SOF markers (Start of Frame)
        if matches!(
            marker,
            0xC0 | 0xC1 | 0xC2 | 0xC3 | 0xC5 | 0xC6 | 0xC7 | 0xC9 | 0xCA | 0xCB | 0xCD | 0xCE | 0xCF
        ) {
            if pos + 8 > data.len() {
                return Err(ImageError::InvalidJpeg("truncated frame header".to_string()));
            }
            let height = u32::from(BigEndian::read_u16(&data[pos + 3..pos + 5]));
            let width = u32::from(BigEndian::read_u16(&data[pos + 5..pos + 7]));
            let components = data[pos + 7];
            return Ok((width, height, components));
        }

        if pos + 2 > data.len() {
            break;
        }
        let length = usize::from(BigEndian::read_u16(&data[pos..pos + 2]));
        pos += length;
    }

    Err(ImageError::InvalidJpeg("no frame header".to_string()))
}

/// Display size; a non-positive side follows the aspect ratio.
fn display_size(width: u32, height: u32, w: f32, h: f32) -> (f32, f32) {
    let (pw, ph) = (width.max(1) as f32, height.max(1) as f32);
    match (w > 0.0, h > 0.0) {
        (true, true) => (w, h),
        (true, false) => (w, w * ph / pw),
        (false, true) => (h * pw / ph, h),
        (false, false) => (pw, ph),
    }
}

impl PdfWriter {
    /// Whether an image was registered under `key`.
    pub fn image_is_cached(&self, key: &str) -> bool {
        self.state.images.contains_key(key)
    }

    fn paint_image(&mut self, key: &str, x: f32, y: f32, w: f32, h: f32) -> Result<Option<ObjectId>> {
        let Some(entry) = self.state.images.get(key).cloned() else {
            return Ok(None);
        };
        let (w, h) = display_size(entry.width, entry.height, w, h);
        self.emit([
            ContentStreamOp::SaveState,
            ContentStreamOp::Transform(w, 0.0, 0.0, h, x, y),
            ContentStreamOp::PaintXObject(entry.label),
            ContentStreamOp::RestoreState,
        ])?;
        Ok(Some(entry.id))
    }

    fn register_image(&mut self, key: &str, image: Image) -> Result<()> {
        let procset = match image.color_space {
            ImageColorSpace::DeviceGray => "ImageB",
            ImageColorSpace::Indexed { .. } => "ImageI",
            ImageColorSpace::DeviceRgb | ImageColorSpace::DeviceCmyk => "ImageC",
        };
        self.state.store.procset_mut(PROCSET_ID)?.add(procset);

        let label = format!("I{}", self.state.images.len() + 1);
        let (width, height) = (image.width, image.height);
        let id = self.state.store.insert(PdfObject::Image(image));
        self.pages_mut()?.resources.xobjects.insert(label.clone(), id);
        log::debug!("Image {} as /{} in object {}", key, label, id);
        self.state.images.insert(
            key.to_string(),
            ImageEntry {
                label,
                width,
                height,
                id,
            },
        );
        Ok(())
    }

    fn read_image_file(&mut self, path: &Path) -> Option<Vec<u8>> {
        match std::fs::read(path) {
            Ok(data) => Some(data),
            Err(e) => {
                self.warn(format!("Image file {} not readable: {}", path.display(), e));
                None
            }
        }
    }

    /// Place a JPEG file; the file is embedded once per path.
    pub fn add_jpeg_from_file(&mut self, path: impl AsRef<Path>, x: f32, y: f32, w: f32, h: f32) -> Result<Option<ObjectId>> {
        let path = path.as_ref();
        let key = path.to_string_lossy().into_owned();
        if self.image_is_cached(&key) {
            return self.paint_image(&key, x, y, w, h);
        }
        let Some(data) = self.read_image_file(path) else {
            return Ok(None);
        };
        self.add_jpeg_from_buffer(data, &key, x, y, w, h)
    }

    /// Place JPEG data registered under `key`.
    pub fn add_jpeg_from_buffer(
        &mut self,
        data: impl Into<Bytes>,
        key: &str,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Result<Option<ObjectId>> {
        if !self.image_is_cached(key) {
            let data = data.into();
            let (width, height, components) = match parse_jpeg_header(&data) {
                Ok(header) => header,
                Err(e) => {
                    self.warn(format!("Image {} skipped: {}", key, e));
                    return Ok(None);
                }
            };
            let (color_space, decode) = match components {
                1 => (ImageColorSpace::DeviceGray, None),
                4 => (
                    ImageColorSpace::DeviceCmyk,
                    Some(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]),
                ),
                _ => (ImageColorSpace::DeviceRgb, None),
            };
            let image = Image {
                filter: ImageFilter::Dct,
                decode,
                ..Image::pixels(width, height, color_space, data)
            };
            self.register_image(key, image)?;
        }
        self.paint_image(key, x, y, w, h)
    }

    /// Place a PNG file; the file is embedded once per path.
    pub fn add_png_from_file(&mut self, path: impl AsRef<Path>, x: f32, y: f32, w: f32, h: f32) -> Result<Option<ObjectId>> {
        let path = path.as_ref();
        let key = path.to_string_lossy().into_owned();
        if self.image_is_cached(&key) {
            return self.paint_image(&key, x, y, w, h);
        }
        let Some(data) = self.read_image_file(path) else {
            return Ok(None);
        };
        self.add_png_from_buffer(&data, &key, x, y, w, h)
    }

    /// Place PNG data registered under `key`.
    ///
    /// PNGs with an alpha channel need the `png-alpha` feature.
    pub fn add_png_from_buffer(&mut self, data: &[u8], key: &str, x: f32, y: f32, w: f32, h: f32) -> Result<Option<ObjectId>> {
        if self.image_is_cached(key) {
            return self.paint_image(key, x, y, w, h);
        }
        let info = match PngInfo::parse(data).and_then(|info| info.check_supported().map(|()| info)) {
            Ok(info) => info,
            Err(e) => {
                self.warn(format!("Image {} skipped: {}", key, e));
                return Ok(None);
            }
        };

        if info.has_alpha() {
            return self.add_alpha_png(data, key, x, y, w, h);
        }

        let (color_space, colors) = match info.color_type {
            3 => {
                if info.palette.len() < 3 {
                    self.warn(format!("Image {} skipped: palette missing", key));
                    return Ok(None);
                }
                let hival = (info.palette.len() / 3 - 1).min(255) as u8;
                let palette = self
                    .state
                    .store
                    .insert(PdfObject::Contents(Contents::raw(info.palette.clone())));
                (ImageColorSpace::Indexed { hival, palette }, 1)
            }
            2 => (ImageColorSpace::DeviceRgb, 3),
            _ => (ImageColorSpace::DeviceGray, 1),
        };
        let image = Image {
            bits_per_component: info.bit_depth,
            filter: ImageFilter::FlatePng {
                colors,
                columns: info.width,
            },
            mask: info.mask(),
            ..Image::pixels(info.width, info.height, color_space, info.data.clone())
        };
        self.register_image(key, image)?;
        self.paint_image(key, x, y, w, h)
    }

    #[cfg(feature = "png-alpha")]
    fn add_alpha_png(&mut self, data: &[u8], key: &str, x: f32, y: f32, w: f32, h: f32) -> Result<Option<ObjectId>> {
        let decoded = match image::load_from_memory_with_format(data, image::ImageFormat::Png) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.warn(format!("Image {} skipped: {}", key, ImageError::DecodeError(e.to_string())));
                return Ok(None);
            }
        };
        let (width, height) = (decoded.width(), decoded.height());
        let pixels = width as usize * height as usize;

        let (format, color, alpha) = match decoded.color() {
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = decoded.to_luma_alpha8();
                let mut gray = Vec::with_capacity(pixels);
                let mut alpha = Vec::with_capacity(pixels);
                for pixel in la.pixels() {
                    gray.push(pixel.0[0]);
                    alpha.push(pixel.0[1]);
                }
                (PixelFormat::Gray, gray, alpha)
            }
            _ => {
                let rgba = decoded.to_rgba8();
                let mut rgb = Vec::with_capacity(pixels * 3);
                let mut alpha = Vec::with_capacity(pixels);
                for pixel in rgba.pixels() {
                    rgb.extend_from_slice(&pixel.0[..3]);
                    alpha.push(pixel.0[3]);
                }
                (PixelFormat::Rgb, rgb, alpha)
            }
        };
        self.add_image_pixels(key, width, height, format, color, Some(alpha), x, y, w, h)
    }

    #[cfg(not(feature = "png-alpha"))]
    fn add_alpha_png(&mut self, _data: &[u8], _key: &str, _x: f32, _y: f32, _w: f32, _h: f32) -> Result<Option<ObjectId>> {
        Err(Error::MissingCapability("PNG alpha channels need the png-alpha feature".into()))
    }

    /// Place raw 8-bit pixels, with an optional 8-bit alpha plane that
    /// becomes a soft mask.
    #[allow(clippy::too_many_arguments)]
    pub fn add_image_pixels(
        &mut self,
        key: &str,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
        alpha: Option<Vec<u8>>,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Result<Option<ObjectId>> {
        if self.image_is_cached(key) {
            return self.paint_image(key, x, y, w, h);
        }
        let color_space = format.color_space();
        let pixels = width as usize * height as usize;
        let expected = pixels * usize::from(color_space.components());
        if data.len() != expected {
            return Err(Error::Image(ImageError::PixelCount {
                expected,
                actual: data.len(),
            }));
        }
        let smask = match alpha {
            Some(alpha) if alpha.len() != pixels => {
                return Err(Error::Image(ImageError::PixelCount {
                    expected: pixels,
                    actual: alpha.len(),
                }));
            }
            Some(alpha) => Some(self.state.store.insert(PdfObject::Image(Image::pixels(
                width,
                height,
                ImageColorSpace::DeviceGray,
                alpha,
            )))),
            None => None,
        };
        let image = Image {
            smask,
            ..Image::pixels(width, height, color_space, data)
        };
        self.register_image(key, image)?;
        self.paint_image(key, x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ObjectKind;

    pub(crate) fn png_chunk(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut chunk = (body.len() as u32).to_be_bytes().to_vec();
        chunk.extend_from_slice(kind);
        chunk.extend_from_slice(body);
        chunk.extend_from_slice(&[0, 0, 0, 0]);
        chunk
    }

    fn png(width: u32, height: u32, bit_depth: u8, color_type: u8, extra: &[Vec<u8>]) -> Vec<u8> {
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
        let mut out = PNG_SIGNATURE.to_vec();
        out.extend(png_chunk(b"IHDR", &ihdr));
        for chunk in extra {
            out.extend_from_slice(chunk);
        }
        out.extend(png_chunk(b"IDAT", &[0x78, 0x9C, 0x03, 0x00]));
        out.extend(png_chunk(b"IEND", &[]));
        out
    }

    fn jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xC0, 0x00, 0x0B, 8];
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.push(components);
        data.extend_from_slice(&[0, 0, 0, 0xFF, 0xD9]);
        data
    }

    fn drawn(writer: &PdfWriter) -> String {
        String::from_utf8(writer.store().contents(writer.current_contents()).unwrap().data.clone()).unwrap()
    }

    #[test]
    fn test_parse_jpeg_header() {
        assert_eq!(parse_jpeg_header(&jpeg(640, 480, 3)).unwrap(), (640, 480, 3));
        assert!(parse_jpeg_header(b"not a jpeg").is_err());
    }

    #[test]
    fn test_jpeg_cmyk_gets_decode_array() {
        let mut writer = PdfWriter::new();
        let id = writer
            .add_jpeg_from_buffer(jpeg(10, 20, 4), "cmyk", 0.0, 0.0, 100.0, 0.0)
            .unwrap()
            .unwrap();
        let image = writer.store().image(id).unwrap();
        assert_eq!(image.color_space, ImageColorSpace::DeviceCmyk);
        assert!(image.decode.is_some());
        assert_eq!(drawn(&writer), "\nq\n100 0 0 200 0 0 cm\n/I1 Do\nQ");
        assert!(writer.store().procset(PROCSET_ID).unwrap().names().contains(&"ImageC".to_string()));
    }

    #[test]
    fn test_same_key_embeds_once() {
        let mut writer = PdfWriter::new();
        writer.add_jpeg_from_buffer(jpeg(4, 4, 1), "logo", 0.0, 0.0, 10.0, 10.0).unwrap();
        writer.add_jpeg_from_buffer(jpeg(4, 4, 1), "logo", 50.0, 0.0, 10.0, 10.0).unwrap();
        assert_eq!(writer.store().count_kind(ObjectKind::Image), 1);
        assert_eq!(drawn(&writer).matches("/I1 Do").count(), 2);
        assert!(writer.image_is_cached("logo"));
    }

    #[test]
    fn test_png_palette_and_mask() {
        let mut writer = PdfWriter::new();
        let plte = png_chunk(b"PLTE", &[255, 0, 0, 0, 255, 0, 0, 0, 255]);
        let trns = png_chunk(b"tRNS", &[255, 0]);
        let id = writer
            .add_png_from_buffer(&png(3, 2, 8, 3, &[plte, trns]), "pal", 0.0, 0.0, 0.0, 0.0)
            .unwrap()
            .unwrap();
        let image = writer.store().image(id).unwrap();
        let ImageColorSpace::Indexed { hival, palette } = image.color_space else {
            panic!("expected an indexed image");
        };
        assert_eq!(hival, 2);
        assert!(palette < id);
        assert_eq!(image.mask, Some(vec![1, 1]));
        assert_eq!(image.filter, ImageFilter::FlatePng { colors: 1, columns: 3 });
        assert!(drawn(&writer).contains("\n3 0 0 2 0 0 cm"));
    }

    #[test]
    fn test_png_rgb_color_key() {
        let info = PngInfo::parse(&png(1, 1, 8, 2, &[png_chunk(b"tRNS", &[0, 1, 0, 2, 0, 3])])).unwrap();
        assert_eq!(info.mask(), Some(vec![1, 1, 2, 2, 3, 3]));
    }

    #[test]
    fn test_unsupported_pngs_are_skipped() {
        let mut writer = PdfWriter::new();
        assert!(writer.add_png_from_buffer(b"garbage", "a", 0.0, 0.0, 1.0, 1.0).unwrap().is_none());
        assert!(writer.add_png_from_buffer(&png(1, 1, 16, 2, &[]), "b", 0.0, 0.0, 1.0, 1.0).unwrap().is_none());
        let mut interlaced = png(1, 1, 8, 2, &[]);
        interlaced[8 + 8 + 12] = 1;
        assert!(writer.add_png_from_buffer(&interlaced, "c", 0.0, 0.0, 1.0, 1.0).unwrap().is_none());
        assert!(writer.add_png_from_buffer(&png(1, 1, 8, 5, &[]), "d", 0.0, 0.0, 1.0, 1.0).unwrap().is_none());
        assert_eq!(writer.messages().len(), 4);
        assert_eq!(writer.store().count_kind(ObjectKind::Image), 0);
    }

    #[test]
    fn test_missing_file_is_a_message() {
        let mut writer = PdfWriter::new();
        assert!(writer.add_png_from_file("/no/such/image.png", 0.0, 0.0, 1.0, 1.0).unwrap().is_none());
        assert!(writer.messages()[0].contains("/no/such/image.png"));
    }

    #[test]
    fn test_pixels_with_alpha_allocate_smask_first() {
        let mut writer = PdfWriter::new();
        let id = writer
            .add_image_pixels("px", 2, 1, PixelFormat::Rgb, vec![0; 6], Some(vec![255, 0]), 0.0, 0.0, 2.0, 1.0)
            .unwrap()
            .unwrap();
        let image = writer.store().image(id).unwrap();
        assert_eq!(image.smask, Some(id - 1));
        assert_eq!(writer.store().image(id - 1).unwrap().color_space, ImageColorSpace::DeviceGray);
    }

    #[test]
    fn test_pixel_count_mismatch_is_an_error() {
        let mut writer = PdfWriter::new();
        let err = writer
            .add_image_pixels("px", 2, 2, PixelFormat::Gray, vec![0; 3], None, 0.0, 0.0, 1.0, 1.0)
            .unwrap_err();
        assert!(matches!(err, Error::Image(ImageError::PixelCount { expected: 4, actual: 3 })));
    }

    #[test]
    fn test_display_size_keeps_aspect() {
        assert_eq!(display_size(100, 50, 0.0, 0.0), (100.0, 50.0));
        assert_eq!(display_size(100, 50, 20.0, 0.0), (20.0, 10.0));
        assert_eq!(display_size(100, 50, 0.0, 20.0), (40.0, 20.0));
    }
}
