//! Bounded, time-ordered sample history with trend and sparkline helpers.

use crate::weather::WeatherSample;

/// Samples kept for the weather trend.
pub const WEATHER_HISTORY_LIMIT: usize = 24;
/// Samples drawn by the weather sparkline.
pub const SPARKLINE_LEN: usize = 20;
/// Route samples drawn while the route surface is off screen.
pub const ROUTE_HIDDEN_WINDOW: usize = 50;

/// Append-only buffer that evicts from the oldest end once `limit` is exceeded.
#[derive(Debug, Clone)]
pub struct History<T> {
    samples: Vec<T>,
    limit: Option<usize>,
}

impl<T> History<T> {
    pub fn bounded(limit: usize) -> Self {
        Self {
            samples: Vec::with_capacity(limit),
            limit: Some(limit.max(1)),
        }
    }

    pub fn unbounded() -> Self {
        Self { samples: Vec::new(), limit: None }
    }

    pub fn push(&mut self, sample: T) {
        self.samples.push(sample);
        if let Some(limit) = self.limit {
            if self.samples.len() > limit {
                let excess = self.samples.len() - limit;
                self.samples.drain(..excess);
            }
        }
    }

    /// Drop everything (explicit location change).
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.last()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.samples
    }

    /// The newest `n` samples, oldest first.
    pub fn tail(&self, n: usize) -> &[T] {
        let start = self.samples.len().saturating_sub(n);
        &self.samples[start..]
    }
}

/// How a location update affects the histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationUpdate {
    /// The user chose a different place: histories start over.
    Selected,
    /// Auto-refresh or GPS re-poll of the same place: keep appending.
    Refreshed,
}

/// Change between the newest sample and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Trend {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
}

pub fn trend(history: &History<WeatherSample>) -> Option<Trend> {
    let [prev, last] = history.tail(2) else {
        return None;
    };
    Some(Trend {
        temperature_c: last.temperature_c - prev.temperature_c,
        humidity_pct: last.humidity_pct - prev.humidity_pct,
        pressure_hpa: last.pressure_hpa - prev.pressure_hpa,
        wind_speed_mps: last.wind_speed_mps - prev.wind_speed_mps,
    })
}

/// Arrow for a signed delta; changes under `epsilon` read as steady.
pub fn trend_arrow(delta: f64, epsilon: f64) -> char {
    if delta > epsilon {
        '▲'
    } else if delta < -epsilon {
        '▼'
    } else {
        '•'
    }
}

/// Min-max normalized values (0 = lowest, 1 = highest) of `field` over the
/// newest `len` samples. Empty when fewer than two samples exist; a flat
/// series sits at 0.5.
pub fn sparkline<F>(history: &History<WeatherSample>, field: F, len: usize) -> Vec<f64>
where
    F: Fn(&WeatherSample) -> f64,
{
    let window = history.tail(len);
    if window.len() < 2 {
        return Vec::new();
    }
    let values: Vec<f64> = window.iter().map(|s| field(s)).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    values
        .iter()
        .map(|v| if range > f64::EPSILON { (v - min) / range } else { 0.5 })
        .collect()
}
