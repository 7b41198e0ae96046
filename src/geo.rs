//! Geographic samples and their projection onto a drawing surface.
//!
//! Longitude maps linearly to X (west on the left), latitude maps linearly to
//! Y with the northernmost sample at the top, since screen Y grows downward.

use serde::{Deserialize, Serialize};

/// Smallest span (degrees) used on an axis with no spread.
pub const MIN_SPAN_DEG: f64 = 0.001;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// A route fix as delivered by the location collaborator, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSample {
    #[serde(flatten)]
    pub point: GeoPoint,
    pub timestamp_millis: i64,
    #[serde(default)]
    pub speed_mps: Option<f64>,
}

impl TimedSample {
    pub fn new(latitude: f64, longitude: f64, timestamp_millis: i64) -> Self {
        Self {
            point: GeoPoint::new(latitude, longitude),
            timestamp_millis,
            speed_mps: None,
        }
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps.max(0.0));
        self
    }

    pub fn speed_kmh(&self) -> Option<f64> {
        self.speed_mps.map(|s| s * 3.6)
    }
}

/// Total path length of a sample sequence, in meters.
pub fn path_length_m(samples: &[TimedSample]) -> f64 {
    samples
        .windows(2)
        .map(|w| w[0].point.distance_m(&w[1].point))
        .fold(0.0, |acc, d| acc + d)
}

/// Logical size of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width_px: u32,
    pub height_px: u32,
}

impl SurfaceSize {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self { width_px, height_px }
    }

    pub fn is_empty(&self) -> bool {
        self.width_px == 0 || self.height_px == 0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width_px as f64 / 2.0, self.height_px as f64 / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    /// Bounds of the given points, with each axis widened to at least
    /// [`MIN_SPAN_DEG`] around its midpoint. `None` for an empty input.
    pub fn enclosing<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        };
        for p in iter {
            bounds.min_lat = bounds.min_lat.min(p.latitude);
            bounds.max_lat = bounds.max_lat.max(p.latitude);
            bounds.min_lng = bounds.min_lng.min(p.longitude);
            bounds.max_lng = bounds.max_lng.max(p.longitude);
        }

        let (min_lat, max_lat) = widen(bounds.min_lat, bounds.max_lat);
        let (min_lng, max_lng) = widen(bounds.min_lng, bounds.max_lng);
        Some(Self { min_lat, max_lat, min_lng, max_lng })
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }
}

fn widen(min: f64, max: f64) -> (f64, f64) {
    if max - min >= MIN_SPAN_DEG {
        return (min, max);
    }
    let mid = (min + max) / 2.0;
    (mid - MIN_SPAN_DEG / 2.0, mid + MIN_SPAN_DEG / 2.0)
}

/// A fixed mapping from geographic to surface coordinates.
///
/// Positions are only stable across frames while the bounds are; callers
/// that need stability must project from a stable sample window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    bounds: Option<GeoBounds>,
    size: SurfaceSize,
    padding: f64,
}

impl Projection {
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    pub fn to_xy(&self, point: &GeoPoint) -> Point {
        let Some(b) = self.bounds else {
            return self.size.center();
        };
        let usable_w = self.size.width_px as f64 - 2.0 * self.padding;
        let usable_h = self.size.height_px as f64 - 2.0 * self.padding;

        let x = self.padding + (point.longitude - b.min_lng) / b.lng_span() * usable_w;
        let y = self.padding + (b.max_lat - point.latitude) / b.lat_span() * usable_h;
        Point::new(x, y)
    }
}

/// Build a projection framing `samples` inside `size` with `padding_px` on
/// every side.
pub fn project(samples: &[GeoPoint], size: SurfaceSize, padding_px: f64) -> Projection {
    let max_padding = (size.width_px.min(size.height_px) as f64 / 2.0).max(0.0);
    Projection {
        bounds: GeoBounds::enclosing(samples),
        size,
        padding: padding_px.clamp(0.0, max_padding),
    }
}

/// Projection over the points of a route.
pub fn project_route(samples: &[TimedSample], size: SurfaceSize, padding_px: f64) -> Projection {
    let points: Vec<GeoPoint> = samples.iter().map(|s| s.point).collect();
    project(&points, size, padding_px)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<GeoPoint> {
        raw.iter().map(|&(lat, lng)| GeoPoint::new(lat, lng)).collect()
    }

    #[test]
    fn three_point_route_corners() {
        let route = pts(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let proj = project(&route, SurfaceSize::new(400, 300), 40.0);

        assert_eq!(proj.to_xy(&route[0]), Point::new(40.0, 260.0));
        assert_eq!(proj.to_xy(&route[1]), Point::new(360.0, 260.0));
        assert_eq!(proj.to_xy(&route[2]), Point::new(360.0, 40.0));
    }

    #[test]
    fn projected_points_stay_on_surface() {
        let route = pts(&[
            (51.5007, -0.1246),
            (51.5033, -0.1195),
            (51.5014, -0.1419),
            (51.5081, -0.0759),
            (51.4995, -0.1248),
        ]);
        for &(w, h, pad) in &[(400, 300, 40.0), (80, 40, 4.0), (10, 10, 30.0), (1, 1, 0.0)] {
            let proj = project(&route, SurfaceSize::new(w, h), pad);
            for p in &route {
                let xy = proj.to_xy(p);
                assert!(xy.x >= 0.0 && xy.x <= w as f64, "x {} outside 0..{}", xy.x, w);
                assert!(xy.y >= 0.0 && xy.y <= h as f64, "y {} outside 0..{}", xy.y, h);
            }
        }
    }

    #[test]
    fn single_point_is_centered() {
        let one = pts(&[(40.7128, -74.0060)]);
        let proj = project(&one, SurfaceSize::new(200, 100), 10.0);
        let xy = proj.to_xy(&one[0]);
        assert!(xy.x.is_finite() && xy.y.is_finite());
        assert!((xy.x - 100.0).abs() < 1e-6);
        assert!((xy.y - 50.0).abs() < 1e-6);
    }

    #[test]
    fn zero_spread_axis_uses_minimum_span() {
        let flat = pts(&[(10.0, 1.0), (10.0, 2.0), (10.0, 3.0)]);
        let b = GeoBounds::enclosing(&flat).unwrap();
        assert!((b.lat_span() - MIN_SPAN_DEG).abs() < 1e-12);
        assert!((b.lng_span() - 2.0).abs() < 1e-12);

        let proj = project(&flat, SurfaceSize::new(100, 100), 0.0);
        let mid = proj.to_xy(&flat[1]);
        assert!((mid.y - 50.0).abs() < 1e-6);
        assert!((mid.x - 50.0).abs() < 1e-6);
    }

    #[test]
    fn empty_input_projects_to_center() {
        let proj = project(&[], SurfaceSize::new(120, 80), 5.0);
        assert!(proj.bounds().is_none());
        assert_eq!(proj.to_xy(&GeoPoint::new(3.0, 4.0)), Point::new(60.0, 40.0));
    }

    #[test]
    fn same_bounds_give_same_pixels() {
        let route = pts(&[(0.0, 0.0), (2.0, 2.0)]);
        let mut superset = route.clone();
        superset.insert(1, GeoPoint::new(1.0, 1.0));
        let size = SurfaceSize::new(300, 300);
        let a = project(&route, size, 20.0);
        let b = project(&superset, size, 20.0);
        assert_eq!(a.bounds(), b.bounds());
        assert_eq!(a.to_xy(&route[1]), b.to_xy(&route[1]));
    }

    #[test]
    fn short_routes_have_positive_zero_length() {
        let one = [TimedSample::new(48.85, 2.35, 0)];
        for samples in [&one[..0], &one[..]] {
            let d = path_length_m(samples);
            assert_eq!(d, 0.0);
            assert!(d.is_sign_positive(), "length of {} samples was {}", samples.len(), d);
        }
        assert_eq!(format!("{:.2}", path_length_m(&one) / 1000.0), "0.00");
    }

    #[test]
    fn haversine_one_degree_of_latitude() {
        let d = GeoPoint::new(0.0, 0.0).distance_m(&GeoPoint::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }

    #[test]
    fn route_file_shape_deserializes() {
        let json = r#"[{"latitude":1.0,"longitude":2.0,"timestamp_millis":5,"speed_mps":3.5},
                      {"latitude":1.5,"longitude":2.5,"timestamp_millis":6}]"#;
        let samples: Vec<TimedSample> = serde_json::from_str(json).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].speed_mps, Some(3.5));
        assert_eq!(samples[1].speed_mps, None);
        assert_eq!(samples[1].point, GeoPoint::new(1.5, 2.5));
    }
}
