use crate::weather::WeatherCondition;
use crossterm::style::Color;

/// 24-bit color used by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Composite `self` over `base` with opacity `alpha`.
    pub fn over(self, base: Rgb, alpha: f64) -> Rgb {
        base.lerp(self, alpha)
    }

    pub fn to_term(self) -> Color {
        Color::Rgb { r: self.r, g: self.g, b: self.b }
    }
}

pub const WHITE: Rgb = Rgb::new(255, 255, 255);

// Map/route backdrop
pub const GROUND: Rgb = Rgb::new(0x1a, 0x23, 0x32);
pub const GRID_LINE: Rgb = Rgb::new(0x2c, 0x3a, 0x4f);
pub const CAPTION: Rgb = Rgb::new(0xb0, 0xbe, 0xc5);
pub const PLACEHOLDER: Rgb = Rgb::new(0x90, 0xa4, 0xae);

// Route
pub const ROUTE_START: Rgb = Rgb::new(0x00, 0xe6, 0x76);
pub const ROUTE_END: Rgb = Rgb::new(0x29, 0x79, 0xff);
pub const MARKER: Rgb = Rgb::new(0xff, 0x52, 0x52);
pub const MARKER_HIGHLIGHT: Rgb = Rgb::new(0xff, 0xcd, 0xd2);
pub const SHADOW: Rgb = Rgb::new(0x05, 0x08, 0x0c);

// Speed classes
pub const SPEED_SLOW: Rgb = Rgb::new(0x4c, 0xaf, 0x50);
pub const SPEED_MEDIUM: Rgb = Rgb::new(0xff, 0x98, 0x00);
pub const SPEED_FAST: Rgb = Rgb::new(0xf4, 0x43, 0x36);

// Weather effects
pub const SUN: Rgb = Rgb::new(0xff, 0xd5, 0x4f);
pub const SUN_RAY: Rgb = Rgb::new(0xff, 0xe0, 0x82);
pub const RAIN: Rgb = Rgb::new(0xae, 0xc6, 0xcf);
pub const CLOUD: Rgb = Rgb::new(0xec, 0xef, 0xf1);
pub const WIND: Rgb = Rgb::new(0xe1, 0xf5, 0xfe);

// Readouts
pub const BAR_TRACK: Rgb = Rgb::new(0x26, 0x32, 0x38);
pub const HUMIDITY: Rgb = Rgb::new(0x4f, 0xc3, 0xf7);
pub const SPARKLINE: Rgb = Rgb::new(0xff, 0xf5, 0x9d);
pub const TEXT: Rgb = Rgb::new(0xfa, 0xfa, 0xfa);

/// Top and bottom stops of the sky gradient for a condition.
pub fn sky_gradient(condition: WeatherCondition) -> (Rgb, Rgb) {
    match condition {
        WeatherCondition::Sunny => (Rgb::new(0x4a, 0x90, 0xe2), Rgb::new(0x87, 0xce, 0xeb)),
        WeatherCondition::Rainy => (Rgb::new(0x2c, 0x3e, 0x50), Rgb::new(0x4a, 0x62, 0x74)),
        WeatherCondition::Cloudy => (Rgb::new(0x6b, 0x7b, 0x8c), Rgb::new(0xa9, 0xb6, 0xc2)),
        WeatherCondition::Windy | WeatherCondition::Unknown => {
            (Rgb::new(0x5b, 0x86, 0xe5), Rgb::new(0x36, 0xd1, 0xdc))
        }
    }
}

/// Speed class color over half-open bands: `[0, 15)` slow, `[15, 25)` medium,
/// `[25, inf)` fast.
pub fn speed_color(speed_kmh: f64) -> Rgb {
    if speed_kmh < 15.0 {
        SPEED_SLOW
    } else if speed_kmh < 25.0 {
        SPEED_MEDIUM
    } else {
        SPEED_FAST
    }
}

/// Temperature color scale (Celsius), blue through green to red.
pub fn temperature_color(temp_c: f64) -> Rgb {
    const STOPS: [(f64, Rgb); 6] = [
        (-20.0, Rgb::new(0x3f, 0x51, 0xb5)),
        (0.0, Rgb::new(0x00, 0xbc, 0xd4)),
        (10.0, Rgb::new(0x4c, 0xaf, 0x50)),
        (20.0, Rgb::new(0xff, 0xeb, 0x3b)),
        (30.0, Rgb::new(0xff, 0x98, 0x00)),
        (40.0, Rgb::new(0xf4, 0x43, 0x36)),
    ];

    if temp_c <= STOPS[0].0 {
        return STOPS[0].1;
    }
    for pair in STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if temp_c <= t1 {
            return c0.lerp(c1, (temp_c - t0) / (t1 - t0));
        }
    }
    STOPS[STOPS.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_class_bounds() {
        assert_eq!(speed_color(0.0), SPEED_SLOW);
        assert_eq!(speed_color(14.99), SPEED_SLOW);
        assert_eq!(speed_color(15.0), SPEED_MEDIUM);
        assert_eq!(speed_color(24.99), SPEED_MEDIUM);
        assert_eq!(speed_color(25.0), SPEED_FAST);
        assert_eq!(speed_color(90.0), SPEED_FAST);
    }

    #[test]
    fn lerp_endpoints_and_clamp() {
        let a = Rgb::new(0, 100, 200);
        let b = Rgb::new(200, 0, 100);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 50, 150));
    }

    #[test]
    fn temperature_scale_is_clamped() {
        assert_eq!(temperature_color(-50.0), temperature_color(-20.0));
        assert_eq!(temperature_color(55.0), temperature_color(40.0));
        assert_eq!(temperature_color(10.0), Rgb::new(0x4c, 0xaf, 0x50));
    }

    #[test]
    fn every_condition_has_a_gradient() {
        for c in WeatherCondition::ALL {
            let (top, bottom) = sky_gradient(c);
            assert_ne!(top, bottom);
        }
    }
}
