use crate::error::{Result, SkytraceError};
use crate::history::{ROUTE_HIDDEN_WINDOW, SPARKLINE_LEN, WEATHER_HISTORY_LIMIT};
use crate::surface::route::DEFAULT_PADDING;
use crate::visibility::DEFAULT_THRESHOLD;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub display: DisplaySettings,
    pub history: HistorySettings,
    pub location: LocationSettings,
    pub network: NetworkSettings,
    pub refresh: RefreshSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    pub device_pixel_ratio: u32,
    /// Animation time advanced per frame, seconds.
    pub frame_step: f64,
    /// Wall-clock sleep between frames, seconds.
    pub frame_interval: f32,
    pub visibility_threshold: f64,
    pub route_padding: f64,
    /// Rows per pane including its border.
    pub pane_height: u16,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 2,
            frame_step: crate::clock::DEFAULT_STEP,
            frame_interval: 0.03,
            visibility_threshold: DEFAULT_THRESHOLD,
            route_padding: DEFAULT_PADDING,
            pane_height: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySettings {
    pub weather_limit: usize,
    pub route_window: usize,
    pub sparkline_len: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            weather_limit: WEATHER_HISTORY_LIMIT,
            route_window: ROUTE_HIDDEN_WINDOW,
            sparkline_len: SPARKLINE_LEN,
        }
    }
}

/// Starting location. Without coordinates the first preset is used.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocationSettings {
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSettings {
    /// Effective connection type label: slow-2g, 2g, 3g or 4g.
    pub quality: Option<String>,
    pub downlink_mbps: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefreshSettings {
    pub weather_secs: u64,
    pub route_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self { weather_secs: 300, route_secs: 1 }
    }
}

impl Settings {
    /// Load from the default location. A missing file gives defaults; a
    /// broken one is reported and ignored.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!(%err, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Load an explicitly named file. Any failure is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SkytraceError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&content).map_err(|source| SkytraceError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(settings)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skytrace")
            .join("config.toml")
    }
}
