use image::{DynamicImage, ImageBuffer, Pixel, Primitive};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Axis-aligned box in pixel coordinates, described by its center and extent.
///
/// `width`/`height` are the distance between the first and last non-zero column/row, so a box
/// around a single pixel has zero size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

impl Bbox {
    fn from_extremes(x0: u32, x1: u32, y0: u32, y1: u32) -> Self {
        Self {
            x: (f64::from(x0) + f64::from(x1)) / 2.0,
            y: (f64::from(y0) + f64::from(y1)) / 2.0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }
}

/// One labeled box in a sample's annotation list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub label: String,
    pub coordinates: Bbox,
}

/// Tight bounding box of the non-zero pixels of a mask.
///
/// A pixel counts as non-zero when any of its channels is. Returns `None` for an all-zero mask.
pub fn mask_to_bbox(mask: &DynamicImage) -> Option<Bbox> {
    match mask {
        DynamicImage::ImageLuma8(buf) => buffer_bbox(buf),
        DynamicImage::ImageLumaA8(buf) => buffer_bbox(buf),
        DynamicImage::ImageRgb8(buf) => buffer_bbox(buf),
        DynamicImage::ImageRgba8(buf) => buffer_bbox(buf),
        DynamicImage::ImageLuma16(buf) => buffer_bbox(buf),
        DynamicImage::ImageLumaA16(buf) => buffer_bbox(buf),
        DynamicImage::ImageRgb16(buf) => buffer_bbox(buf),
        DynamicImage::ImageRgba16(buf) => buffer_bbox(buf),
        DynamicImage::ImageRgb32F(buf) => buffer_bbox(buf),
        DynamicImage::ImageRgba32F(buf) => buffer_bbox(buf),
        other => buffer_bbox(&other.to_rgba32f()),
    }
}

fn buffer_bbox<P, C>(buf: &ImageBuffer<P, C>) -> Option<Bbox>
where
    P: Pixel,
    C: Deref<Target = [P::Subpixel]>,
{
    let zero = <P::Subpixel as Primitive>::DEFAULT_MIN_VALUE;
    let mut extremes: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in buf.enumerate_pixels() {
        if pixel.channels().iter().all(|&c| c == zero) {
            continue;
        }
        extremes = Some(match extremes {
            None => (x, x, y, y),
            Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        });
    }

    extremes.map(|(x0, x1, y0, y1)| Bbox::from_extremes(x0, x1, y0, y1))
}
