//! Which icons get baked, from which files, at which sizes.

use std::path::{Path, PathBuf};

use weather_icon_format::{
    Beaufort, IconId, InfoIcon, WeatherIcon, ICON_SIZE_INFO, ICON_SIZE_LARGE, ICON_SIZE_SMALL,
};

use crate::encoder;
use crate::error::ConvertError;

/// Source resolutions, tried in this order
pub const SOURCE_RESOLUTIONS: [u32; 3] = [64, 128, 256];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSizes {
    pub large: u32,
    pub small: u32,
    pub info: u32,
}

impl Default for IconSizes {
    fn default() -> Self {
        Self {
            large: ICON_SIZE_LARGE,
            small: ICON_SIZE_SMALL,
            info: ICON_SIZE_INFO,
        }
    }
}

impl IconSizes {
    /// A bad size is a defect in the configuration, fatal even if no icon uses it
    pub fn validate(&self) -> Result<(), ConvertError> {
        for (name, size) in [("large", self.large), ("small", self.small), ("info", self.info)] {
            encoder::check_size(size).map_err(|_| ConvertError::InvalidSize {
                name: name.to_string(),
                size,
            })?;
        }
        Ok(())
    }
}

/// One source file and the bitmaps produced from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry {
    pub name: String,
    pub file_name: String,
    pub outputs: Vec<(IconId, u32)>,
}

pub fn weather_file_name(icon: WeatherIcon) -> &'static str {
    match icon {
        WeatherIcon::ClearDay => "clear-day.png",
        WeatherIcon::ClearNight => "clear-night.png",
        WeatherIcon::PartlyCloudyDay => "partly-cloudy-day.png",
        WeatherIcon::PartlyCloudyNight => "partly-cloudy-night.png",
        WeatherIcon::Cloudy => "cloudy.png",
        WeatherIcon::Fog => "fog.png",
        WeatherIcon::Drizzle => "drizzle.png",
        WeatherIcon::Rain => "rain.png",
        WeatherIcon::Snow => "snow.png",
        WeatherIcon::Thunderstorm => "thunderstorms.png",
    }
}

pub fn info_file_name(icon: InfoIcon) -> &'static str {
    match icon {
        InfoIcon::Sunset => "sunset.png",
    }
}

pub fn wind_file_name(level: Beaufort) -> String {
    format!("wind-beaufort-{}.png", level.level())
}

/// The full job list: weather (full + small), then info, then wind 0..=12
pub fn entries(sizes: &IconSizes) -> Vec<IconEntry> {
    let weather = WeatherIcon::ALL.iter().map(|&icon| IconEntry {
        name: icon.name().to_string(),
        file_name: weather_file_name(icon).to_string(),
        outputs: vec![
            (IconId::Weather { icon, small: false }, sizes.large),
            (IconId::Weather { icon, small: true }, sizes.small),
        ],
    });

    let info = InfoIcon::ALL.iter().map(|&icon| IconEntry {
        name: icon.name().to_string(),
        file_name: info_file_name(icon).to_string(),
        outputs: vec![(IconId::Info(icon), sizes.info)],
    });

    let wind = Beaufort::all().map(|level| IconEntry {
        name: format!("wind_{}", level.level()),
        file_name: wind_file_name(level),
        outputs: vec![(IconId::Wind(level), sizes.info)],
    });

    weather.chain(info).chain(wind).collect()
}

/// First existing `<icons_dir>/<resolution>/<file_name>`
pub async fn resolve_source(
    icons_dir: &Path,
    file_name: &str,
) -> Result<Option<PathBuf>, ConvertError> {
    for resolution in SOURCE_RESOLUTIONS {
        let candidate = icons_dir.join(resolution.to_string()).join(file_name);
        let exists = tokio::fs::try_exists(&candidate)
            .await
            .map_err(ConvertError::io(&candidate))?;
        if exists {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}
