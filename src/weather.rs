//! Weather samples and locations as delivered by the data collaborators.

use chrono::{Local, TimeZone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Windy,
    Unknown,
}

impl WeatherCondition {
    #[cfg(test)]
    pub const ALL: [WeatherCondition; 5] = [
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::Windy,
        WeatherCondition::Unknown,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Windy => "Windy",
            WeatherCondition::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: f64,
    pub pressure_hpa: f64,
    pub visibility_km: f64,
    pub condition: WeatherCondition,
    pub timestamp_millis: i64,
}

impl WeatherSample {
    /// Fold the numeric fields into their documented ranges.
    pub fn normalized(mut self) -> Self {
        self.humidity_pct = self.humidity_pct.clamp(0.0, 100.0);
        self.wind_speed_mps = self.wind_speed_mps.max(0.0);
        self.wind_direction_deg = self.wind_direction_deg.rem_euclid(360.0);
        self.visibility_km = self.visibility_km.max(0.0);
        self
    }

    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed_mps * 3.6
    }

    /// "Updated 4:30 PM" style timestamp in local time.
    pub fn observed_at(&self) -> String {
        match Local.timestamp_millis_opt(self.timestamp_millis).single() {
            Some(t) => t.format("%-I:%M %p").to_string(),
            None => "--:--".to_string(),
        }
    }
}

/// Arrow pointing where the wind blows *from*, in 45° sectors.
pub fn wind_arrow(direction_deg: f64) -> char {
    match direction_deg.rem_euclid(360.0) as i32 {
        0..=22 | 338..=360 => '↑',
        23..=67 => '↗',
        68..=112 => '→',
        113..=157 => '↘',
        158..=202 => '↓',
        203..=247 => '↙',
        248..=292 => '←',
        293..=337 => '↖',
        _ => '?',
    }
}

/// A place the user picked or the locator reported. City and country are
/// opaque display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(city: &str, country: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            city: city.to_string(),
            country: country.to_string(),
            latitude,
            longitude,
        }
    }

    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.country)
        }
    }

    pub fn coordinates(&self) -> String {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        format!("{:.4}°{} {:.4}°{}", self.latitude.abs(), ns, self.longitude.abs(), ew)
    }
}

#[cfg(test)]
pub(crate) fn sample(temperature_c: f64, condition: WeatherCondition) -> WeatherSample {
    WeatherSample {
        temperature_c,
        humidity_pct: 55.0,
        wind_speed_mps: 4.0,
        wind_direction_deg: 90.0,
        pressure_hpa: 1013.0,
        visibility_km: 10.0,
        condition,
        timestamp_millis: 1_700_000_000_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_arrow_sectors() {
        assert_eq!(wind_arrow(0.0), '↑');
        assert_eq!(wind_arrow(90.0), '→');
        assert_eq!(wind_arrow(180.0), '↓');
        assert_eq!(wind_arrow(270.0), '←');
        assert_eq!(wind_arrow(359.9), '↑');
        assert_eq!(wind_arrow(-90.0), '←');
    }

    #[test]
    fn normalized_clamps_ranges() {
        let mut s = sample(20.0, WeatherCondition::Sunny);
        s.humidity_pct = 140.0;
        s.wind_speed_mps = -3.0;
        s.wind_direction_deg = 450.0;
        let n = s.normalized();
        assert_eq!(n.humidity_pct, 100.0);
        assert_eq!(n.wind_speed_mps, 0.0);
        assert_eq!(n.wind_direction_deg, 90.0);
    }

    #[test]
    fn location_formatting() {
        let loc = Location::new("Lima", "Peru", -12.0464, -77.0428);
        assert_eq!(loc.label(), "Lima, Peru");
        assert_eq!(loc.coordinates(), "12.0464°S 77.0428°W");
    }
}
