//! PNG to RGB565 bitmap encoder
//!
//! Resamples to a square with Lanczos3 (premultiplied alpha), composites translucent pixels on
//! black and packs each pixel little-endian in row-major order.

use image::{
    imageops::{self, FilterType},
    DynamicImage, RgbaImage,
};
use weather_icon_format::{
    encode_pixel, pixel_crc, premultiply, unpremultiply, ImageHeader, MAX_DIMENSION,
};

use crate::error::EncodeError;

/// A square RGB565 bitmap ready to embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    header: ImageHeader,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        self.header.width as u32
    }

    pub fn height(&self) -> u32 {
        self.header.height as u32
    }

    /// Bytes per row, always `width * 2`
    pub fn stride(&self) -> u32 {
        self.header.stride as u32
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn crc(&self) -> u16 {
        pixel_crc(&self.data)
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }
}

/// Decode any format the `image` crate recognises
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, EncodeError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Encode `image` as a `target_size` x `target_size` RGB565 bitmap
pub fn encode(image: &DynamicImage, target_size: u32) -> Result<Bitmap, EncodeError> {
    let header = checked_header(target_size)?;

    let rgba = resample(image, target_size);

    let mut data = Vec::with_capacity(header.data_size());
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        data.extend_from_slice(&encode_pixel(r, g, b, a).to_le_bytes());
    }

    Ok(Bitmap { header, data })
}

/// Lanczos3 in premultiplied alpha, so transparent neighbours neither
/// darken nor tint anti-aliased edges
fn resample(image: &DynamicImage, target_size: u32) -> RgbaImage {
    let mut rgba = image.to_rgba8();
    if rgba.dimensions() == (target_size, target_size) {
        return rgba;
    }

    for pixel in rgba.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = premultiply(r, g, b, a);
    }
    let mut resized = imageops::resize(&rgba, target_size, target_size, FilterType::Lanczos3);
    for pixel in resized.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = unpremultiply(r, g, b, a);
    }
    resized
}

fn checked_header(target_size: u32) -> Result<ImageHeader, EncodeError> {
    if target_size == 0 || target_size > MAX_DIMENSION {
        return Err(EncodeError::InvalidSize(target_size));
    }
    let edge = target_size as u16;
    ImageHeader::rgb565(edge, edge).ok_or(EncodeError::InvalidSize(target_size))
}

/// Reject edges `encode` cannot produce
pub fn check_size(target_size: u32) -> Result<(), EncodeError> {
    checked_header(target_size).map(|_| ())
}

/// Decode then encode in one step
pub fn encode_bytes(bytes: &[u8], target_size: u32) -> Result<Bitmap, EncodeError> {
    check_size(target_size)?;
    encode(&decode(bytes)?, target_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba};
    use std::io::Cursor;

    fn checkerboard(size: u32) -> DynamicImage {
        let image = RgbaImage::from_fn(size, size, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([250, 180, 20, 255])
            } else {
                Rgba([20, 90, 230, 128])
            }
        });
        DynamicImage::ImageRgba8(image)
    }

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_dimension_invariant() {
        let source = checkerboard(64);
        for size in [56, 32, 28, 1, 7] {
            let bitmap = encode(&source, size).unwrap();
            assert_eq!(bitmap.width(), size);
            assert_eq!(bitmap.height(), size);
            assert_eq!(bitmap.stride(), size * 2);
            assert_eq!(bitmap.data().len(), (bitmap.stride() * bitmap.height()) as usize);
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let bytes = png_bytes(&checkerboard(64));
        let first = encode_bytes(&bytes, 28).unwrap();
        let second = encode_bytes(&bytes, 28).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.crc(), second.crc());
    }

    #[test]
    fn test_transparent_image_is_black() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 0])));
        let bitmap = encode(&source, 32).unwrap();
        assert!(bitmap.data().iter().all(|&byte| byte == 0));
    }

    fn edge_pair(transparent: [u8; 4]) -> DynamicImage {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba(transparent));
        image.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        DynamicImage::ImageRgba8(image)
    }

    fn single_pixel(bitmap: &Bitmap) -> u16 {
        u16::from_le_bytes([bitmap.data()[0], bitmap.data()[1]])
    }

    #[test]
    fn test_half_covered_edge_keeps_its_brightness() {
        let value = single_pixel(&encode(&edge_pair([0, 0, 0, 0]), 1).unwrap());

        // ~0x8000: red at half strength, not quartered by a double alpha multiply
        let red5 = value >> 11;
        assert!((15..=16).contains(&red5), "0x{value:04x}");
        assert_eq!(value & 0x07FF, 0, "0x{value:04x}");
    }

    #[test]
    fn test_transparent_neighbour_color_does_not_bleed() {
        let black = single_pixel(&encode(&edge_pair([0, 0, 0, 0]), 1).unwrap());
        let white = single_pixel(&encode(&edge_pair([255, 255, 255, 0]), 1).unwrap());
        assert_eq!(white, black);
        assert_eq!(white & 0x07FF, 0, "0x{white:04x}");
    }

    #[test]
    fn test_same_size_is_not_resampled() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0xFF, 0x00, 0x00, 0xFF]));
        image.put_pixel(0, 1, Rgba([0x00, 0x00, 0xFF, 0xFF]));
        let bitmap = encode(&DynamicImage::ImageRgba8(image), 4).unwrap();

        // pixel (1, 0): red 0xF800, low byte first
        assert_eq!(&bitmap.data()[2..4], &[0x00, 0xF8]);
        // pixel (0, 1) starts the second row: blue 0x001F
        assert_eq!(&bitmap.data()[8..10], &[0x1F, 0x00]);
        assert_eq!(&bitmap.data()[0..2], &[0x00, 0x00]);
    }

    #[test]
    fn test_rgb_source_gets_opaque_alpha() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([0xFF, 0xFF, 0xFF])));
        let bitmap = encode(&source, 2).unwrap();
        assert!(bitmap.data().iter().all(|&byte| byte == 0xFF));
    }

    #[test]
    fn test_header_matches_bitmap() {
        let bitmap = encode(&checkerboard(64), 56).unwrap();
        let header = bitmap.header();
        assert_eq!(header.width, 56);
        assert_eq!(header.stride, 112);
        assert_eq!(header.data_size(), bitmap.data().len());
    }

    #[test]
    fn test_invalid_size() {
        let source = checkerboard(8);
        assert!(matches!(encode(&source, 0), Err(EncodeError::InvalidSize(0))));
        assert!(matches!(
            encode(&source, MAX_DIMENSION + 1),
            Err(EncodeError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let result = encode_bytes(b"definitely not a png", 32);
        assert!(matches!(result, Err(EncodeError::Decode(_))));
    }
}
