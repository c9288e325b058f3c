use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use strum::{Display, EnumString};

use crate::error::Result;

/// Codec used for the pixel data embedded in the `image` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    #[default]
    Png,
    Jpeg,
}

impl ImageEncoding {
    const fn format(self) -> ImageFormat {
        match self {
            ImageEncoding::Png => ImageFormat::Png,
            ImageEncoding::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Image pixels stored inline in a dataset row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    /// Channel count of the decoded source image
    pub channels: u8,
    pub encoding: ImageEncoding,
    /// Base64 of the encoded file bytes
    pub data: String,
}

impl EncodedImage {
    pub fn encode(image: &DynamicImage, encoding: ImageEncoding) -> Result<Self> {
        let mut bytes = Cursor::new(Vec::new());
        match encoding {
            // PNG stores 8/16-bit integer channels only
            ImageEncoding::Png => match image {
                DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(image.to_rgb16())
                    .write_to(&mut bytes, encoding.format())?,
                DynamicImage::ImageLuma8(_)
                | DynamicImage::ImageLumaA8(_)
                | DynamicImage::ImageRgb8(_)
                | DynamicImage::ImageRgba8(_)
                | DynamicImage::ImageLuma16(_)
                | DynamicImage::ImageLumaA16(_)
                | DynamicImage::ImageRgb16(_)
                | DynamicImage::ImageRgba16(_) => image.write_to(&mut bytes, encoding.format())?,
                _ => DynamicImage::ImageRgba16(image.to_rgba16())
                    .write_to(&mut bytes, encoding.format())?,
            },
            // JPEG has no alpha or 16-bit support
            ImageEncoding::Jpeg => match image {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => {
                    image.write_to(&mut bytes, encoding.format())?
                }
                _ => DynamicImage::ImageRgb8(image.to_rgb8())
                    .write_to(&mut bytes, encoding.format())?,
            },
        }

        Ok(Self {
            width: image.width(),
            height: image.height(),
            channels: image.color().channel_count(),
            encoding,
            data: STANDARD.encode(bytes.into_inner()),
        })
    }

    pub fn decode(&self) -> Result<DynamicImage> {
        let bytes = STANDARD.decode(&self.data)?;
        let image = image::load_from_memory_with_format(&bytes, self.encoding.format())?;
        Ok(image)
    }
}
