//! Header-only image decoding

use std::sync::Arc;

use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::{ImageDecoder, ImageError, ImageFormat, ImageReader, ImageResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::config::ImageConfig;
use crate::fs::BufReadSeek;

/// Formats with a codec compiled in.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    Gif,
    Jpeg,
    Png,
    WebP,
}

impl Format {
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

impl From<Format> for ImageFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Gif => ImageFormat::Gif,
            Format::Jpeg => ImageFormat::Jpeg,
            Format::Png => ImageFormat::Png,
            Format::WebP => ImageFormat::WebP,
        }
    }
}

/// Reads an image header into an [`ImageConfig`].
pub trait ConfigDecoder: Send + Sync {
    fn decode_config(
        &self,
        source: Box<dyn BufReadSeek>,
    ) -> ImageResult<(ImageConfig, ImageFormat)>;
}

impl<D: ConfigDecoder + ?Sized> ConfigDecoder for Arc<D> {
    fn decode_config(
        &self,
        source: Box<dyn BufReadSeek>,
    ) -> ImageResult<(ImageConfig, ImageFormat)> {
        (**self).decode_config(source)
    }
}

/// Sniffs the format from the leading bytes and reads only the header.
///
/// Formats not in the enabled set are rejected as unsupported even when the
/// `image` crate could read them.
#[derive(Debug, Clone)]
pub struct SniffingDecoder {
    formats: Vec<ImageFormat>,
}

impl Default for SniffingDecoder {
    fn default() -> Self {
        Self::from_formats(Format::iter())
    }
}

impl SniffingDecoder {
    pub fn from_formats(formats: impl IntoIterator<Item = Format>) -> Self {
        Self {
            formats: formats.into_iter().map(ImageFormat::from).collect(),
        }
    }

    /// Enable another format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        if !self.formats.contains(&format) {
            self.formats.push(format);
        }
        self
    }

    pub fn formats(&self) -> &[ImageFormat] {
        &self.formats
    }

    pub fn supports(&self, format: ImageFormat) -> bool {
        self.formats.contains(&format)
    }
}

impl ConfigDecoder for SniffingDecoder {
    fn decode_config(
        &self,
        source: Box<dyn BufReadSeek>,
    ) -> ImageResult<(ImageConfig, ImageFormat)> {
        let reader = ImageReader::new(source).with_guessed_format()?;

        let format = match reader.format() {
            Some(format) if self.supports(format) => format,
            Some(format) => return Err(unsupported(ImageFormatHint::Exact(format))),
            None => return Err(unsupported(ImageFormatHint::Unknown)),
        };

        let decoder = reader.into_decoder()?;
        let (width, height) = decoder.dimensions();
        let config = ImageConfig::new(width, height, decoder.color_type().into());

        log::trace!("Decoded {format:?} header: {width}x{height}");
        Ok((config, format))
    }
}

fn unsupported(hint: ImageFormatHint) -> ImageError {
    ImageError::Unsupported(UnsupportedError::from_format_and_kind(
        hint.clone(),
        UnsupportedErrorKind::Format(hint),
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, RgbImage, RgbaImage};

    use super::*;
    use crate::config::ColorModel;

    const GIF_1X1: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
        0x00, 0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00,
        0x3b,
    ];

    fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn source(data: Vec<u8>) -> Box<dyn BufReadSeek> {
        Box::new(Cursor::new(data))
    }

    #[test]
    fn reads_png_header() {
        let png = encode(&DynamicImage::ImageRgba8(RgbaImage::new(10, 20)), ImageFormat::Png);
        let (config, format) = SniffingDecoder::default().decode_config(source(png)).unwrap();

        assert_eq!(config, ImageConfig::new(10, 20, ColorModel::Rgba));
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn reads_jpeg_and_gif_headers() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(32, 16));
        let decoder = SniffingDecoder::default();

        let (config, format) = decoder
            .decode_config(source(encode(&rgb, ImageFormat::Jpeg)))
            .unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
        assert_eq!(config.dimensions(), (32, 16));
        assert_eq!(config.color_model, ColorModel::Rgb);

        let (config, format) = decoder.decode_config(source(GIF_1X1.to_vec())).unwrap();
        assert_eq!(format, ImageFormat::Gif);
        assert_eq!(config.dimensions(), (1, 1));
    }

    #[test]
    fn truncated_header_fails() {
        let png = encode(&DynamicImage::ImageRgba8(RgbaImage::new(10, 20)), ImageFormat::Png);
        let truncated = png[..20].to_vec();

        assert!(SniffingDecoder::default()
            .decode_config(source(truncated))
            .is_err());
    }

    #[test]
    fn unknown_content_is_unsupported() {
        let err = SniffingDecoder::default()
            .decode_config(source(b"definitely not an image".to_vec()))
            .unwrap_err();
        assert!(matches!(err, ImageError::Unsupported(_)));
    }

    #[test]
    fn disabled_format_is_unsupported() {
        let png = encode(&DynamicImage::ImageRgba8(RgbaImage::new(4, 4)), ImageFormat::Png);
        let decoder = SniffingDecoder::from_formats([Format::Gif, Format::Jpeg]);
        assert!(!decoder.supports(ImageFormat::Png));

        let err = decoder.decode_config(source(png.clone())).unwrap_err();
        assert!(matches!(err, ImageError::Unsupported(_)));

        let decoder = decoder.with_format(ImageFormat::Png);
        assert!(decoder.decode_config(source(png)).is_ok());
        assert_eq!(decoder.formats().len(), 3);
    }

    #[test]
    fn format_names() {
        assert_eq!(Format::WebP.to_string(), "webp");
        assert_eq!("jpeg".parse::<Format>().unwrap(), Format::Jpeg);
        assert_eq!(Format::all().len(), 4);
    }
}
