//! RGB565 quantization.
//!
//! The target format has no alpha channel, so translucent pixels are
//! composited against black before packing.

/// Convert RGB888 to RGB565
pub const fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    let r5 = (r >> 3) as u16;
    let g6 = (g >> 2) as u16;
    let b5 = (b >> 3) as u16;
    (r5 << 11) | (g6 << 5) | b5
}

/// Expand RGB565 to RGB888, replicating the high bits into the low ones
pub const fn rgb565_to_rgb888(value: u16) -> (u8, u8, u8) {
    let r5 = ((value >> 11) & 0x1F) as u8;
    let g6 = ((value >> 5) & 0x3F) as u8;
    let b5 = (value & 0x1F) as u8;
    (
        (r5 << 3) | (r5 >> 2),
        (g6 << 2) | (g6 >> 4),
        (b5 << 3) | (b5 >> 2),
    )
}

/// Pre-multiply a pixel by its alpha, truncating.
///
/// Opaque pixels pass through untouched.
pub const fn composite_on_black(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8) {
    if a == u8::MAX {
        return (r, g, b);
    }
    let a = a as u16;
    (
        (r as u16 * a / 255) as u8,
        (g as u16 * a / 255) as u8,
        (b as u16 * a / 255) as u8,
    )
}

/// Straight to premultiplied alpha, rounding to nearest
pub const fn premultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let a16 = a as u16;
    [
        ((r as u16 * a16 + 127) / 255) as u8,
        ((g as u16 * a16 + 127) / 255) as u8,
        ((b as u16 * a16 + 127) / 255) as u8,
        a,
    ]
}

/// Premultiplied back to straight alpha; fully transparent becomes black
pub fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let a32 = a as u32;
    let restore = |c: u8| {
        let value = (c as u32 * 255 + a32 / 2) / a32;
        if value > 255 { 255 } else { value as u8 }
    };
    [restore(r), restore(g), restore(b), a]
}

/// Composite then quantize one RGBA8 pixel
pub const fn encode_pixel(r: u8, g: u8, b: u8, a: u8) -> u16 {
    let (r, g, b) = composite_on_black(r, g, b, a);
    rgb888_to_rgb565(r, g, b)
}
