#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

use crc::{Crc, CRC_16_IBM_SDLC};

mod catalog;
mod classify;
mod color;
mod header;

pub use catalog::{Beaufort, IconId, InfoIcon, WeatherIcon};
pub use classify::{
    select_weather_icon, select_wind_icon, weather_family, CodeMatch, WeatherRule,
    BEAUFORT_UPPER_MPH, CALM_BELOW_MPH, WEATHER_FALLBACK, WEATHER_RULES,
};
pub use color::{
    composite_on_black, encode_pixel, premultiply, rgb565_to_rgb888, rgb888_to_rgb565,
    unpremultiply,
};
pub use header::{ColorFormat, ImageHeader, HEADER_SIZE, LV_IMAGE_HEADER_MAGIC};

/// CRC-16 calculator used to fingerprint pixel data
pub const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_SDLC);

/// RGB565 = 2 bytes per pixel
pub const BYTES_PER_PIXEL: usize = 2;

/// Full-size weather icon edge in pixels
pub const ICON_SIZE_LARGE: u32 = 56;

/// Small weather icon edge (forecast rows)
pub const ICON_SIZE_SMALL: u32 = 28;

/// Edge of the info line icons (sunset, wind)
pub const ICON_SIZE_INFO: u32 = 32;

/// Largest edge whose stride still fits the 16-bit header field
pub const MAX_DIMENSION: u32 = (u16::MAX as u32) / BYTES_PER_PIXEL as u32;

/// Checksum over a bitmap's raw pixel bytes
pub fn pixel_crc(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_crc_detects_single_bit_flip() {
        let mut data = [0x12u8, 0x34, 0x56, 0x78];
        let before = pixel_crc(&data);
        data[2] ^= 0x01;
        assert_ne!(before, pixel_crc(&data));
    }

    #[test]
    fn test_max_dimension_stride_fits_header() {
        assert!(MAX_DIMENSION as usize * BYTES_PER_PIXEL <= u16::MAX as usize);
        assert!((MAX_DIMENSION as usize + 1) * BYTES_PER_PIXEL > u16::MAX as usize);
    }
}
