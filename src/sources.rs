//! Synthetic data collaborators driving the dashboard: a drifting weather
//! feed, a simulated or replayed GPS route, and a network probe.

use crate::error::{Result, SkytraceError};
use crate::geo::{GeoPoint, TimedSample};
use crate::quality::{NetworkInfo, NetworkQuality};
use crate::weather::{Location, WeatherCondition, WeatherSample};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

const METERS_PER_DEG_LAT: f64 = 111_320.0;

const PRESETS: [(&str, &str, f64, f64); 6] = [
    ("San Francisco", "United States", 37.7749, -122.4194),
    ("London", "United Kingdom", 51.5074, -0.1278),
    ("Tokyo", "Japan", 35.6762, 139.6503),
    ("Sydney", "Australia", -33.8688, 151.2093),
    ("Reykjavik", "Iceland", 64.1466, -21.9426),
    ("Nairobi", "Kenya", -1.2921, 36.8219),
];

pub fn preset_locations() -> Vec<Location> {
    PRESETS
        .iter()
        .map(|&(city, country, lat, lng)| Location::new(city, country, lat, lng))
        .collect()
}

/// The preset after `current` (by city), wrapping around; the first preset
/// when `current` is not one of them.
pub fn next_preset(current: Option<&Location>) -> Location {
    let presets = preset_locations();
    let next = current
        .and_then(|c| presets.iter().position(|p| p.city == c.city))
        .map(|i| (i + 1) % presets.len())
        .unwrap_or(0);
    presets[next].clone()
}

/// Seeded random walk of weather conditions for one location at a time.
pub struct WeatherFeed {
    rng: StdRng,
    current: Option<WeatherSample>,
}

impl WeatherFeed {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            current: None,
        }
    }

    /// Forget the running state so the next sample starts from the new
    /// location's climate.
    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn next_sample(&mut self, location: &Location, now_millis: i64) -> WeatherSample {
        let sample = match self.current {
            None => self.baseline(location, now_millis),
            Some(prev) => self.drift(prev, now_millis),
        };
        self.current = Some(sample);
        sample
    }

    fn baseline(&mut self, location: &Location, now_millis: i64) -> WeatherSample {
        let conditions = [
            WeatherCondition::Sunny,
            WeatherCondition::Cloudy,
            WeatherCondition::Rainy,
            WeatherCondition::Windy,
        ];
        WeatherSample {
            temperature_c: 28.0 - location.latitude.abs() * 0.45 + self.rng.gen_range(-3.0..3.0),
            humidity_pct: self.rng.gen_range(30.0..90.0),
            wind_speed_mps: self.rng.gen_range(0.5..9.0),
            wind_direction_deg: self.rng.gen_range(0.0..360.0),
            pressure_hpa: self.rng.gen_range(995.0..1030.0),
            visibility_km: self.rng.gen_range(4.0..20.0),
            condition: conditions[self.rng.gen_range(0..conditions.len())],
            timestamp_millis: now_millis,
        }
        .normalized()
    }

    fn drift(&mut self, prev: WeatherSample, now_millis: i64) -> WeatherSample {
        let mut next = WeatherSample {
            temperature_c: prev.temperature_c + self.rng.gen_range(-0.6..0.6),
            humidity_pct: prev.humidity_pct + self.rng.gen_range(-3.0..3.0),
            wind_speed_mps: prev.wind_speed_mps + self.rng.gen_range(-0.8..0.8),
            wind_direction_deg: prev.wind_direction_deg + self.rng.gen_range(-15.0..15.0),
            pressure_hpa: prev.pressure_hpa + self.rng.gen_range(-1.0..1.0),
            visibility_km: prev.visibility_km + self.rng.gen_range(-0.5..0.5),
            condition: prev.condition,
            timestamp_millis: now_millis,
        };
        if self.rng.gen_bool(0.1) {
            next.condition = if next.humidity_pct > 75.0 {
                WeatherCondition::Rainy
            } else if next.wind_speed_mps > 7.0 {
                WeatherCondition::Windy
            } else if next.humidity_pct > 55.0 {
                WeatherCondition::Cloudy
            } else {
                WeatherCondition::Sunny
            };
        }
        next.normalized()
    }
}

/// Random-walk GPS track: heading and speed wander, position integrates.
pub struct RouteSimulator {
    rng: StdRng,
    position: GeoPoint,
    heading_rad: f64,
    speed_mps: f64,
    interval_secs: f64,
    started: bool,
}

impl RouteSimulator {
    pub fn new(seed: u64, origin: GeoPoint, interval_secs: f64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let heading_rad = rng.gen_range(0.0..std::f64::consts::TAU);
        Self {
            rng,
            position: origin,
            heading_rad,
            speed_mps: 4.0,
            interval_secs: interval_secs.max(0.1),
            started: false,
        }
    }

    /// Restart the walk from a new origin.
    pub fn relocate(&mut self, origin: GeoPoint) {
        self.position = origin;
        self.started = false;
    }

    pub fn next_sample(&mut self, now_millis: i64) -> TimedSample {
        if self.started {
            self.heading_rad += self.rng.gen_range(-0.4..0.4);
            self.speed_mps = (self.speed_mps + self.rng.gen_range(-1.5..1.5)).clamp(0.5, 12.0);

            let distance = self.speed_mps * self.interval_secs;
            let lat_scale = self.position.latitude.to_radians().cos().max(0.01);
            self.position.latitude += distance * self.heading_rad.cos() / METERS_PER_DEG_LAT;
            self.position.longitude += distance * self.heading_rad.sin() / (METERS_PER_DEG_LAT * lat_scale);
        }
        self.started = true;
        TimedSample::new(self.position.latitude, self.position.longitude, now_millis).with_speed(self.speed_mps)
    }
}

/// Replays a recorded route, one sample per call, then stops.
pub struct RouteReplay {
    samples: Vec<TimedSample>,
    cursor: usize,
}

impl RouteReplay {
    pub fn new(samples: Vec<TimedSample>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Load a JSON array of samples (`latitude`, `longitude`,
    /// `timestamp_millis`, optional `speed_mps`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SkytraceError::RouteRead {
            path: path.to_path_buf(),
            source,
        })?;
        let samples: Vec<TimedSample> = serde_json::from_str(&content).map_err(|source| SkytraceError::RouteParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(samples))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn next_sample(&mut self) -> Option<TimedSample> {
        let sample = self.samples.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(sample)
    }
}

/// Where route samples come from.
pub enum RouteFeed {
    Simulated(RouteSimulator),
    Replay(RouteReplay),
}

impl RouteFeed {
    pub fn next_sample(&mut self, now_millis: i64) -> Option<TimedSample> {
        match self {
            RouteFeed::Simulated(sim) => Some(sim.next_sample(now_millis)),
            RouteFeed::Replay(replay) => replay.next_sample(),
        }
    }

    /// Move to a newly selected location. A replay restarts from its beginning.
    pub fn relocate(&mut self, origin: GeoPoint) {
        match self {
            RouteFeed::Simulated(sim) => sim.relocate(origin),
            RouteFeed::Replay(replay) => replay.rewind(),
        }
    }
}

/// Typical downlink for a connection class.
pub fn typical_downlink(quality: NetworkQuality) -> Option<f64> {
    match quality {
        NetworkQuality::Unknown => None,
        NetworkQuality::Slow2g => Some(0.05),
        NetworkQuality::TwoG => Some(0.25),
        NetworkQuality::ThreeG => Some(1.5),
        NetworkQuality::FourG => Some(10.0),
    }
}

/// Reports the current network classification; the user can step it.
#[derive(Debug, Clone, Copy)]
pub struct NetworkProbe {
    info: NetworkInfo,
}

impl NetworkProbe {
    pub fn new(info: NetworkInfo) -> Self {
        Self { info }
    }

    pub fn current(&self) -> NetworkInfo {
        self.info
    }

    /// Step to the next classification and report it.
    pub fn cycle(&mut self) -> NetworkInfo {
        let quality = self.info.quality.cycle();
        self.info = NetworkInfo::new(quality, typical_downlink(quality));
        self.info
    }
}
