//! Runtime icon selection.
//!
//! Both selectors are table driven so the generator can emit C lookup
//! functions that agree with them exactly.

use crate::catalog::{Beaufort, IconId, WeatherIcon};

/// Predicate on a WMO condition code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeMatch {
    Equals(i32),
    AtMost(i32),
    AtLeast(i32),
}

impl CodeMatch {
    pub const fn matches(self, code: i32) -> bool {
        match self {
            CodeMatch::Equals(value) => code == value,
            CodeMatch::AtMost(value) => code <= value,
            CodeMatch::AtLeast(value) => code >= value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherRule {
    pub when: CodeMatch,
    pub day: WeatherIcon,
    pub night: WeatherIcon,
}

const fn rule(when: CodeMatch, day: WeatherIcon, night: WeatherIcon) -> WeatherRule {
    WeatherRule { when, day, night }
}

const fn always(when: CodeMatch, icon: WeatherIcon) -> WeatherRule {
    rule(when, icon, icon)
}

/// Tested in order, first match wins. The bands overlap on purpose.
pub const WEATHER_RULES: [WeatherRule; 9] = [
    rule(CodeMatch::Equals(0), WeatherIcon::ClearDay, WeatherIcon::ClearNight),
    rule(CodeMatch::AtMost(3), WeatherIcon::PartlyCloudyDay, WeatherIcon::PartlyCloudyNight),
    always(CodeMatch::AtMost(48), WeatherIcon::Fog),
    always(CodeMatch::AtMost(57), WeatherIcon::Drizzle),
    always(CodeMatch::AtMost(67), WeatherIcon::Rain),
    always(CodeMatch::AtMost(77), WeatherIcon::Snow),
    always(CodeMatch::AtMost(82), WeatherIcon::Rain),
    always(CodeMatch::AtMost(86), WeatherIcon::Snow),
    always(CodeMatch::AtLeast(95), WeatherIcon::Thunderstorm),
];

/// Chosen when no rule matches (87..=94)
pub const WEATHER_FALLBACK: WeatherIcon = WeatherIcon::Cloudy;

/// Speeds strictly below this are calm (force 0)
pub const CALM_BELOW_MPH: f32 = 1.0;

/// Inclusive upper bounds for forces 1..=11; anything above is force 12
pub const BEAUFORT_UPPER_MPH: [f32; 11] = [
    3.0, 7.0, 12.0, 18.0, 24.0, 31.0, 38.0, 46.0, 54.0, 63.0, 72.0,
];

/// Weather family for a condition code, ignoring size
pub fn weather_family(code: i32, is_day: bool) -> WeatherIcon {
    WEATHER_RULES
        .iter()
        .find(|rule| rule.when.matches(code))
        .map_or(WEATHER_FALLBACK, |rule| if is_day { rule.day } else { rule.night })
}

pub fn select_weather_icon(code: i32, is_day: bool, small: bool) -> IconId {
    IconId::Weather { icon: weather_family(code, is_day), small }
}

impl Beaufort {
    /// Classify a wind speed in mph. NaN counts as calm.
    pub fn from_mph(mph: f32) -> Self {
        if !(mph >= CALM_BELOW_MPH) {
            return Beaufort(0);
        }
        let level = BEAUFORT_UPPER_MPH
            .iter()
            .position(|&limit| mph <= limit)
            .map_or(Beaufort::MAX, |index| index as u8 + 1);
        Beaufort(level)
    }
}

pub fn select_wind_icon(mph: f32) -> IconId {
    IconId::Wind(Beaufort::from_mph(mph))
}
