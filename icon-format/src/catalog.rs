use core::fmt;

/// Weather families, each baked at a full and a small size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    ClearDay,
    ClearNight,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
}

impl WeatherIcon {
    pub const ALL: [WeatherIcon; 10] = [
        WeatherIcon::ClearDay,
        WeatherIcon::ClearNight,
        WeatherIcon::PartlyCloudyDay,
        WeatherIcon::PartlyCloudyNight,
        WeatherIcon::Cloudy,
        WeatherIcon::Fog,
        WeatherIcon::Drizzle,
        WeatherIcon::Rain,
        WeatherIcon::Snow,
        WeatherIcon::Thunderstorm,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            WeatherIcon::ClearDay => "clear_day",
            WeatherIcon::ClearNight => "clear_night",
            WeatherIcon::PartlyCloudyDay => "partly_cloudy_day",
            WeatherIcon::PartlyCloudyNight => "partly_cloudy_night",
            WeatherIcon::Cloudy => "cloudy",
            WeatherIcon::Fog => "fog",
            WeatherIcon::Drizzle => "drizzle",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Snow => "snow",
            WeatherIcon::Thunderstorm => "thunderstorm",
        }
    }
}

/// Single-size icons for the info line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoIcon {
    Sunset,
}

impl InfoIcon {
    pub const ALL: [InfoIcon; 1] = [InfoIcon::Sunset];

    pub const fn name(self) -> &'static str {
        match self {
            InfoIcon::Sunset => "sunset",
        }
    }
}

/// Beaufort wind force, always within 0..=12
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Beaufort(pub(crate) u8);

impl Beaufort {
    pub const MAX: u8 = 12;

    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX {
            Some(Self(level))
        } else {
            None
        }
    }

    pub const fn level(self) -> u8 {
        self.0
    }

    /// Every level, calm first
    pub fn all() -> impl Iterator<Item = Beaufort> {
        (0..=Self::MAX).map(Beaufort)
    }
}

/// One generated bitmap constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconId {
    Weather { icon: WeatherIcon, small: bool },
    Info(InfoIcon),
    Wind(Beaufort),
}

/// Formats as the C symbol of the constant, e.g. `weather_icon_rain_small`
impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconId::Weather { icon, small: false } => write!(f, "weather_icon_{}", icon.name()),
            IconId::Weather { icon, small: true } => {
                write!(f, "weather_icon_{}_small", icon.name())
            }
            IconId::Info(icon) => write!(f, "icon_{}", icon.name()),
            IconId::Wind(level) => write!(f, "icon_wind_{}", level.0),
        }
    }
}
