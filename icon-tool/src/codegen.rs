//! C header/source emission for LVGL v9 and the LVGL `.bin` image file.

use std::collections::HashSet;
use std::fmt::{self, Write};

use bytes::{BufMut, Bytes, BytesMut};
use weather_icon_format::{
    Beaufort, CodeMatch, IconId, WeatherIcon, BEAUFORT_UPPER_MPH, CALM_BELOW_MPH, HEADER_SIZE,
    WEATHER_FALLBACK, WEATHER_RULES,
};

use crate::encoder::Bitmap;

/// Bytes per line in the emitted data arrays
const BYTES_PER_LINE: usize = 32;

#[derive(Debug, Clone)]
pub struct GeneratedIcon {
    pub id: IconId,
    pub bitmap: Bitmap,
}

pub fn render_header(stem: &str, icons: &[GeneratedIcon]) -> Result<String, fmt::Error> {
    let guard = format!("{}_H", stem.to_ascii_uppercase());
    let mut out = String::new();

    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;
    writeln!(out, "#include \"lvgl.h\"")?;
    writeln!(out)?;
    writeln!(out, "#ifdef __cplusplus")?;
    writeln!(out, "extern \"C\" {{")?;
    writeln!(out, "#endif")?;
    writeln!(out)?;

    for icon in icons {
        writeln!(out, "extern const lv_image_dsc_t {};", icon.id)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "const lv_image_dsc_t* get_weather_icon(int wmo_code, bool is_day, bool small_size);"
    )?;
    writeln!(out, "const lv_image_dsc_t* get_wind_icon(int wind_speed_mph);")?;
    writeln!(out)?;
    writeln!(out, "#ifdef __cplusplus")?;
    writeln!(out, "}}")?;
    writeln!(out, "#endif")?;
    writeln!(out)?;
    writeln!(out, "#endif")?;

    Ok(out)
}

pub fn render_source(stem: &str, icons: &[GeneratedIcon]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "#include \"{stem}.h\"")?;
    writeln!(out)?;

    for icon in icons {
        render_bitmap(&mut out, icon)?;
    }

    let available: HashSet<IconId> = icons.iter().map(|icon| icon.id).collect();
    render_weather_lookup(&mut out, &available)?;
    writeln!(out)?;
    render_wind_lookup(&mut out, &available)?;

    Ok(out)
}

fn render_bitmap(out: &mut String, icon: &GeneratedIcon) -> fmt::Result {
    let symbol = icon.id;
    let bitmap = &icon.bitmap;
    let header = bitmap.header();

    writeln!(
        out,
        "/* {symbol}: {}x{} {}, crc16 0x{:04x} */",
        header.width,
        header.height,
        header.color_format.lvgl_name(),
        bitmap.crc()
    )?;
    writeln!(out, "static const uint8_t {symbol}_data[] = {{")?;
    for line in bitmap.data().chunks(BYTES_PER_LINE) {
        out.push_str("    ");
        for (i, byte) in line.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write!(out, "0x{byte:02x}")?;
        }
        out.push_str(",\n");
    }
    writeln!(out, "}};")?;
    writeln!(out)?;

    writeln!(out, "const lv_image_dsc_t {symbol} = {{")?;
    writeln!(out, "    .header = {{")?;
    writeln!(out, "        .magic = LV_IMAGE_HEADER_MAGIC,")?;
    writeln!(out, "        .cf = {},", header.color_format.lvgl_name())?;
    writeln!(out, "        .flags = {},", header.flags)?;
    writeln!(out, "        .w = {},", header.width)?;
    writeln!(out, "        .h = {},", header.height)?;
    writeln!(out, "        .stride = {},", header.stride)?;
    writeln!(out, "        .reserved_2 = {},", header.reserved)?;
    writeln!(out, "    }},")?;
    writeln!(out, "    .data_size = sizeof({symbol}_data),")?;
    writeln!(out, "    .data = {symbol}_data,")?;
    writeln!(out, "}};")?;
    writeln!(out)?;

    Ok(())
}

/// `&symbol`, or `NULL` when the icon was skipped
fn reference(id: IconId, available: &HashSet<IconId>) -> String {
    if available.contains(&id) {
        format!("&{id}")
    } else {
        "NULL".to_string()
    }
}

fn sized(icon: WeatherIcon, available: &HashSet<IconId>) -> String {
    format!(
        "small_size ? {} : {}",
        reference(IconId::Weather { icon, small: true }, available),
        reference(IconId::Weather { icon, small: false }, available)
    )
}

fn render_weather_lookup(out: &mut String, available: &HashSet<IconId>) -> fmt::Result {
    writeln!(
        out,
        "const lv_image_dsc_t* get_weather_icon(int wmo_code, bool is_day, bool small_size)"
    )?;
    writeln!(out, "{{")?;

    for rule in WEATHER_RULES {
        let condition = match rule.when {
            CodeMatch::Equals(value) => format!("wmo_code == {value}"),
            CodeMatch::AtMost(value) => format!("wmo_code <= {value}"),
            CodeMatch::AtLeast(value) => format!("wmo_code >= {value}"),
        };
        writeln!(out, "    if ({condition}) {{")?;
        if rule.day == rule.night {
            writeln!(out, "        return {};", sized(rule.day, available))?;
        } else {
            writeln!(out, "        return is_day ? ({})", sized(rule.day, available))?;
            writeln!(out, "                      : ({});", sized(rule.night, available))?;
        }
        writeln!(out, "    }}")?;
    }

    writeln!(out, "    return {};", sized(WEATHER_FALLBACK, available))?;
    writeln!(out, "}}")?;
    Ok(())
}

fn render_wind_lookup(out: &mut String, available: &HashSet<IconId>) -> fmt::Result {
    let levels = Beaufort::MAX as usize + 1;

    writeln!(out, "const lv_image_dsc_t* get_wind_icon(int wind_speed_mph)")?;
    writeln!(out, "{{")?;
    writeln!(out, "    static const lv_image_dsc_t* const wind_icons[{levels}] = {{")?;
    for level in Beaufort::all() {
        writeln!(out, "        {},", reference(IconId::Wind(level), available))?;
    }
    writeln!(out, "    }};")?;
    writeln!(out)?;

    writeln!(out, "    int beaufort = {};", Beaufort::MAX)?;
    writeln!(out, "    if (wind_speed_mph < {CALM_BELOW_MPH}) beaufort = 0;")?;
    for (index, limit) in BEAUFORT_UPPER_MPH.iter().enumerate() {
        writeln!(out, "    else if (wind_speed_mph <= {limit}) beaufort = {};", index + 1)?;
    }
    writeln!(out)?;
    writeln!(out, "    return wind_icons[beaufort];")?;
    writeln!(out, "}}")?;
    Ok(())
}

/// LVGL binary image file: 12-byte header followed by the pixel data
pub fn render_bin(bitmap: &Bitmap) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + bitmap.data().len());
    buf.put_slice(&bitmap.header().to_bytes());
    buf.put_slice(bitmap.data());
    buf.freeze()
}
