use super::{
    draw_grid, draw_network_caption, draw_placeholder, pulse_radius, FrameState, SurfaceData, SurfaceKind,
    SurfaceRenderer, STROKE_SCALE,
};
use crate::canvas::Canvas;
use crate::colors::{self, temperature_color};
use crate::geo::{project, GeoPoint, Point};
use std::f64::consts::PI;

/// Temperature used for the zones when no weather sample exists yet.
const FALLBACK_TEMPERATURE_C: f64 = 15.0;

/// Decorative zones around the marker: offset, radius and temperature delta.
/// Offsets are fixed in canvas space, independent of geography.
const TEMPERATURE_ZONES: [(f64, f64, f64, f64); 4] = [
    (-18.0, -8.0, 9.0, -2.0),
    (16.0, -6.0, 8.0, 1.5),
    (-10.0, 9.0, 7.0, 3.0),
    (20.0, 8.0, 6.0, -1.0),
];

/// Anchor offsets for the wind arrows.
const WIND_ANCHORS: [(f64, f64); 4] = [(-26.0, 0.0), (26.0, 0.0), (0.0, -13.0), (0.0, 13.0)];

/// The current location as a marker on a gridded backdrop.
pub struct MapSurface;

impl SurfaceRenderer for MapSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Map
    }

    fn paint(&self, canvas: &mut Canvas, data: &SurfaceData<'_>, frame: &FrameState) {
        draw_grid(canvas, frame.quality.grid_size_px);

        let Some(location) = data.location else {
            draw_placeholder(canvas, "Locating...");
            draw_network_caption(canvas, &frame.network);
            return;
        };

        // A single point always frames at the center of the surface.
        let here = GeoPoint::new(location.latitude, location.longitude);
        let center = project(&[here], canvas.size(), 0.0).to_xy(&here);
        let weather = data.weather();

        if frame.quality.show_secondary_overlays {
            let base = weather.map(|w| w.temperature_c).unwrap_or(FALLBACK_TEMPERATURE_C);
            for (dx, dy, radius, delta) in TEMPERATURE_ZONES {
                canvas.fill_circle(center.offset(dx, dy), radius, temperature_color(base + delta), 0.3);
            }
            if let Some(w) = weather {
                let line_width = frame.quality.line_width * STROKE_SCALE;
                for (dx, dy) in WIND_ANCHORS {
                    draw_wind_arrow(
                        canvas,
                        center.offset(dx, dy),
                        w.wind_direction_deg,
                        w.wind_speed_mps,
                        frame.elapsed,
                        line_width,
                    );
                }
            }
        }

        let ring = pulse_radius(frame.elapsed, 6.0, 1.5);
        canvas.stroke_arc(center, ring, 0.0, 2.0 * PI, 0.5, colors::MARKER_HIGHLIGHT);

        canvas.fill_circle(center.offset(1.0, 1.0), 3.0, colors::SHADOW, 0.5);
        canvas.fill_circle(center, 3.0, colors::MARKER, 1.0);
        canvas.fill_circle(center.offset(-1.0, -1.0), 1.0, colors::MARKER_HIGHLIGHT, 1.0);

        canvas.fill_text_centered(0.0, &location.label(), colors::TEXT);
        canvas.fill_text_centered(2.0, &location.coordinates(), colors::CAPTION);
        if let Some(w) = weather {
            let line = format!("{:.1}°C · {}", w.temperature_c, w.condition.description());
            let y = ((canvas.height() - 3.0) / 2.0).floor() * 2.0 - 2.0;
            canvas.fill_text_centered(y.max(4.0), &line, temperature_color(w.temperature_c));
        }
        draw_network_caption(canvas, &frame.network);
    }
}

/// Arrow pointing where the wind blows toward, swaying slightly.
fn draw_wind_arrow(canvas: &mut Canvas, at: Point, from_deg: f64, speed_mps: f64, elapsed: f64, width: f64) {
    // Screen angle: 0 = east, clockwise. Compass 0 = north.
    let toward = (from_deg + 180.0 - 90.0).to_radians();
    let sway = (elapsed * 2.0).sin() * 0.15;
    let angle = toward + sway;
    let length = (3.0 + speed_mps * 0.5).min(9.0);

    let (dx, dy) = (angle.cos(), angle.sin());
    let tail = at.offset(-dx * length / 2.0, -dy * length / 2.0);
    let head = at.offset(dx * length / 2.0, dy * length / 2.0);
    canvas.stroke_line(tail, head, width, colors::WIND);

    for side in [-1.0, 1.0] {
        let barb = angle + PI - side * 0.5;
        canvas.stroke_line(head, head.offset(barb.cos() * 2.0, barb.sin() * 2.0), width, colors::WIND);
    }
}
