//! Signature images as PDF image XObjects.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::{Stream, dictionary};

use crate::error::RenderError;

/// A decoded signature ready to be placed on a page.
pub struct SignatureImage {
    pub width_px: u32,
    pub height_px: u32,
    jpeg: Vec<u8>,
}

impl SignatureImage {
    /// Decode any supported image, flatten transparency onto white and
    /// re-encode as JPEG for a `DCTDecode` stream.
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| RenderError::SignatureEmbedding(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width_px, height_px) = rgba.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(RenderError::SignatureEmbedding("empty image".to_string()));
        }

        let flattened = RgbImage::from_fn(width_px, height_px, |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            let blend = |c: u8| {
                let alpha = u16::from(a);
                ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8
            };
            Rgb([blend(r), blend(g), blend(b)])
        });

        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(flattened)
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .map_err(|e| RenderError::SignatureEmbedding(e.to_string()))?;

        Ok(Self {
            width_px,
            height_px,
            jpeg,
        })
    }

    pub fn to_xobject(&self) -> Stream {
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(self.width_px),
                "Height" => i64::from(self.height_px),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            self.jpeg.clone(),
        )
    }

    /// The re-encoded JPEG bytes.
    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    /// Size in points when scaled to fit the box, keeping aspect ratio.
    pub fn fit_within(&self, box_width: f32, box_height: f32) -> (f32, f32) {
        fit_within(self.width_px, self.height_px, box_width, box_height)
    }
}

pub fn fit_within(width_px: u32, height_px: u32, box_width: f32, box_height: f32) -> (f32, f32) {
    let (w, h) = (width_px as f32, height_px as f32);
    let scale = (box_width / w).min(box_height / h);
    (w * scale, h * scale)
}
