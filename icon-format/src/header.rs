//! LVGL v9 image descriptor header.
//!
//! Layout (little-endian, 12 bytes):
//! magic u8 | cf u8 | flags u16 | w u16 | h u16 | stride u16 | reserved u16

use crate::BYTES_PER_PIXEL;

/// Magic byte at the start of every image header
pub const LV_IMAGE_HEADER_MAGIC: u8 = 0x19;

/// Serialized header length
pub const HEADER_SIZE: usize = 12;

/// Pixel formats understood by the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorFormat {
    /// 16-bit 5/6/5, no alpha
    Rgb565 = 0x12,
}

impl ColorFormat {
    /// Name of the matching LVGL constant
    pub const fn lvgl_name(self) -> &'static str {
        match self {
            ColorFormat::Rgb565 => "LV_COLOR_FORMAT_RGB565",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub magic: u8,
    pub color_format: ColorFormat,
    pub flags: u16,
    pub width: u16,
    pub height: u16,
    /// Bytes per row
    pub stride: u16,
    pub reserved: u16,
}

impl ImageHeader {
    /// Header for an RGB565 bitmap; `None` if the stride overflows 16 bits
    pub fn rgb565(width: u16, height: u16) -> Option<Self> {
        let stride = width.checked_mul(BYTES_PER_PIXEL as u16)?;
        Some(Self {
            magic: LV_IMAGE_HEADER_MAGIC,
            color_format: ColorFormat::Rgb565,
            flags: 0,
            width,
            height,
            stride,
            reserved: 0,
        })
    }

    /// Number of pixel bytes that follow the header
    pub fn data_size(&self) -> usize {
        self.stride as usize * self.height as usize
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0] = self.magic;
        bytes[1] = self.color_format as u8;
        bytes[2..4].copy_from_slice(&self.flags.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.width.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.height.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.stride.to_le_bytes());
        bytes[10..12].copy_from_slice(&self.reserved.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        if bytes.len() < HEADER_SIZE {
            return Err("Header too short");
        }

        if bytes[0] != LV_IMAGE_HEADER_MAGIC {
            return Err("Invalid magic number");
        }

        let color_format = match bytes[1] {
            0x12 => ColorFormat::Rgb565,
            _ => return Err("Unsupported color format"),
        };

        let header = Self {
            magic: bytes[0],
            color_format,
            flags: u16::from_le_bytes([bytes[2], bytes[3]]),
            width: u16::from_le_bytes([bytes[4], bytes[5]]),
            height: u16::from_le_bytes([bytes[6], bytes[7]]),
            stride: u16::from_le_bytes([bytes[8], bytes[9]]),
            reserved: u16::from_le_bytes([bytes[10], bytes[11]]),
        };

        if header.stride as usize != header.width as usize * BYTES_PER_PIXEL {
            return Err("Stride does not match width");
        }

        Ok(header)
    }
}
