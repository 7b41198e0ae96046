use crate::error::{Result, SkytraceError};
use crate::quality::{NetworkInfo, NetworkQuality};
use crate::settings::Settings;
use crate::sources::preset_locations;
use crate::surface::SurfaceOptions;
use crate::weather::Location;
use std::path::PathBuf;
use std::time::Duration;

/// Longest refresh interval accepted from the config file: one day.
pub const MAX_REFRESH_SECS: u64 = 86_400;

/// Values given on the command line; each one beats the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub network: Option<String>,
    pub downlink: Option<f64>,
    pub seed: Option<u64>,
    pub route_file: Option<PathBuf>,
    pub device_pixel_ratio: Option<u32>,
    pub frame_interval: Option<f32>,
}

/// Resolved runtime configuration for the dashboard
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub surface: SurfaceOptions,
    pub frame_interval: f32,
    pub route_padding: f64,
    pub pane_height: u16,
    pub weather_limit: usize,
    pub sparkline_len: usize,
    pub location: Location,
    pub network: NetworkInfo,
    pub seed: u64,
    pub route_file: Option<PathBuf>,
    pub weather_refresh: Duration,
    pub route_refresh: Duration,
}

impl DashboardConfig {
    pub fn resolve(settings: &Settings, cli: &CliOverrides) -> Result<Self> {
        let display = &settings.display;

        let dpr = cli.device_pixel_ratio.unwrap_or(display.device_pixel_ratio);
        if !(1..=4).contains(&dpr) {
            return Err(invalid(format!("device pixel ratio must be 1-4, got {}", dpr)));
        }

        let frame_interval = cli.frame_interval.unwrap_or(display.frame_interval);
        if !(frame_interval.is_finite() && frame_interval >= 0.0) {
            return Err(invalid(format!("frame interval must be non-negative, got {}", frame_interval)));
        }

        if !(0.0..=1.0).contains(&display.visibility_threshold) {
            return Err(invalid(format!(
                "visibility threshold must be within 0-1, got {}",
                display.visibility_threshold
            )));
        }

        if display.pane_height < 6 {
            return Err(invalid(format!("pane height must be at least 6 rows, got {}", display.pane_height)));
        }

        let downlink = cli.downlink.or(settings.network.downlink_mbps);
        if let Some(mbps) = downlink {
            if !(mbps.is_finite() && mbps >= 0.0) {
                return Err(invalid(format!("downlink must be non-negative, got {}", mbps)));
            }
        }
        let quality = cli
            .network
            .as_deref()
            .or(settings.network.quality.as_deref())
            .map(NetworkQuality::parse)
            .unwrap_or_default();

        Ok(Self {
            surface: SurfaceOptions {
                device_pixel_ratio: dpr,
                visibility_threshold: display.visibility_threshold,
                frame_step: display.frame_step,
                hidden_route_window: settings.history.route_window.max(1),
            },
            frame_interval,
            route_padding: display.route_padding,
            pane_height: display.pane_height,
            weather_limit: settings.history.weather_limit.max(2),
            sparkline_len: settings.history.sparkline_len,
            location: resolve_location(settings)?,
            network: NetworkInfo::new(quality, downlink),
            seed: cli.seed.unwrap_or_else(rand::random),
            route_file: cli.route_file.clone(),
            weather_refresh: refresh_interval(settings.refresh.weather_secs),
            route_refresh: refresh_interval(settings.refresh.route_secs),
        })
    }
}

fn resolve_location(settings: &Settings) -> Result<Location> {
    let loc = &settings.location;
    match (loc.latitude, loc.longitude) {
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                return Err(invalid(format!("location {}, {} is out of range", lat, lng)));
            }
            Ok(Location::new(
                loc.city.as_deref().unwrap_or("Custom"),
                loc.country.as_deref().unwrap_or(""),
                lat,
                lng,
            ))
        }
        (None, None) => {
            // A city alone picks the matching preset.
            let presets = preset_locations();
            let by_name = loc
                .city
                .as_deref()
                .and_then(|city| presets.iter().find(|p| p.city.eq_ignore_ascii_case(city)));
            Ok(by_name.unwrap_or(&presets[0]).clone())
        }
        _ => Err(invalid("location needs both latitude and longitude".to_string())),
    }
}

fn refresh_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(1, MAX_REFRESH_SECS))
}

fn invalid(message: String) -> SkytraceError {
    SkytraceError::InvalidArgument(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let config = DashboardConfig::resolve(&Settings::default(), &CliOverrides::default()).unwrap();
        assert_eq!(config.surface.device_pixel_ratio, 2);
        assert_eq!(config.surface.hidden_route_window, 50);
        assert_eq!(config.weather_limit, 24);
        assert_eq!(config.network.quality, NetworkQuality::Unknown);
        assert_eq!(config.location, preset_locations()[0]);
    }

    #[test]
    fn cli_beats_file() {
        let mut settings = Settings::default();
        settings.network.quality = Some("4g".into());
        settings.network.downlink_mbps = Some(20.0);
        let cli = CliOverrides {
            network: Some("2g".into()),
            seed: Some(9),
            device_pixel_ratio: Some(1),
            ..Default::default()
        };
        let config = DashboardConfig::resolve(&settings, &cli).unwrap();
        assert_eq!(config.network.quality, NetworkQuality::TwoG);
        assert_eq!(config.network.downlink_mbps, Some(20.0));
        assert_eq!(config.seed, 9);
        assert_eq!(config.surface.device_pixel_ratio, 1);
    }

    #[test]
    fn explicit_coordinates_and_city_lookup() {
        let mut settings = Settings::default();
        settings.location.latitude = Some(-34.6);
        settings.location.longitude = Some(-58.38);
        settings.location.city = Some("Buenos Aires".into());
        let config = DashboardConfig::resolve(&settings, &CliOverrides::default()).unwrap();
        assert_eq!(config.location.city, "Buenos Aires");
        assert_eq!(config.location.latitude, -34.6);

        let mut settings = Settings::default();
        settings.location.city = Some("tokyo".into());
        let config = DashboardConfig::resolve(&settings, &CliOverrides::default()).unwrap();
        assert_eq!(config.location.country, "Japan");
    }

    #[test]
    fn refresh_intervals_are_clamped() {
        let mut settings = Settings::default();
        settings.refresh.weather_secs = u64::MAX;
        settings.refresh.route_secs = 0;
        let config = DashboardConfig::resolve(&settings, &CliOverrides::default()).unwrap();
        assert_eq!(config.weather_refresh, Duration::from_secs(MAX_REFRESH_SECS));
        assert_eq!(config.route_refresh, Duration::from_secs(1));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cli = CliOverrides { device_pixel_ratio: Some(0), ..Default::default() };
        assert!(matches!(
            DashboardConfig::resolve(&Settings::default(), &cli),
            Err(SkytraceError::InvalidArgument(_))
        ));

        let mut settings = Settings::default();
        settings.location.latitude = Some(95.0);
        settings.location.longitude = Some(0.0);
        assert!(DashboardConfig::resolve(&settings, &CliOverrides::default()).is_err());

        let mut settings = Settings::default();
        settings.location.latitude = Some(10.0);
        assert!(DashboardConfig::resolve(&settings, &CliOverrides::default()).is_err());

        let cli = CliOverrides { downlink: Some(-1.0), ..Default::default() };
        assert!(DashboardConfig::resolve(&Settings::default(), &cli).is_err());
    }
}
