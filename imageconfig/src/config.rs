use image::ColorType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Pixel layout reported by an image header.
#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum ColorModel {
    #[strum(serialize = "Gray")]
    #[serde(rename = "Gray")]
    Gray,
    #[strum(serialize = "GrayAlpha")]
    #[serde(rename = "GrayAlpha")]
    GrayAlpha,
    #[strum(serialize = "RGB")]
    #[serde(rename = "RGB")]
    Rgb,
    #[strum(serialize = "RGBA")]
    #[serde(rename = "RGBA")]
    Rgba,
    #[strum(serialize = "Gray16")]
    #[serde(rename = "Gray16")]
    Gray16,
    #[strum(serialize = "GrayAlpha16")]
    #[serde(rename = "GrayAlpha16")]
    GrayAlpha16,
    #[strum(serialize = "RGB16")]
    #[serde(rename = "RGB16")]
    Rgb16,
    #[strum(serialize = "RGBA16")]
    #[serde(rename = "RGBA16")]
    Rgba16,
    #[strum(serialize = "RGB32F")]
    #[serde(rename = "RGB32F")]
    Rgb32F,
    #[strum(serialize = "RGBA32F")]
    #[serde(rename = "RGBA32F")]
    Rgba32F,
    // zero value, and anything the decoder has no name for
    #[default]
    #[strum(serialize = "Unknown")]
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ColorModel {
    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            ColorModel::GrayAlpha
                | ColorModel::Rgba
                | ColorModel::GrayAlpha16
                | ColorModel::Rgba16
                | ColorModel::Rgba32F
        )
    }
}

impl From<ColorType> for ColorModel {
    fn from(color: ColorType) -> Self {
        match color {
            ColorType::L8 => ColorModel::Gray,
            ColorType::La8 => ColorModel::GrayAlpha,
            ColorType::Rgb8 => ColorModel::Rgb,
            ColorType::Rgba8 => ColorModel::Rgba,
            ColorType::L16 => ColorModel::Gray16,
            ColorType::La16 => ColorModel::GrayAlpha16,
            ColorType::Rgb16 => ColorModel::Rgb16,
            ColorType::Rgba16 => ColorModel::Rgba16,
            ColorType::Rgb32F => ColorModel::Rgb32F,
            ColorType::Rgba32F => ColorModel::Rgba32F,
            _ => ColorModel::Unknown,
        }
    }
}

/// Dimensions and color model of an image, read from its header.
///
/// The default value (`0x0`, [`ColorModel::Unknown`]) is what a failed
/// decode leaves behind.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub color_model: ColorModel,
}

impl ImageConfig {
    pub fn new(width: u32, height: u32, color_model: ColorModel) -> Self {
        Self {
            width,
            height,
            color_model,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
