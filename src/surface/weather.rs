use super::effects::{effect_for, EffectParams};
use super::{draw_network_caption, draw_placeholder, FrameState, SurfaceData, SurfaceKind, SurfaceRenderer, STROKE_SCALE};
use crate::canvas::Canvas;
use crate::colors::{self, sky_gradient, temperature_color};
use crate::geo::Point;
use crate::history::{sparkline, trend, trend_arrow, SPARKLINE_LEN};
use crate::weather::{wind_arrow, WeatherSample};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Temperature range covered by the bar, Celsius.
const BAR_MIN_C: f64 = -20.0;
const BAR_MAX_C: f64 = 40.0;

/// Animated sky for the latest weather sample plus its readouts.
pub struct WeatherSurface {
    sparkline_len: usize,
}

impl WeatherSurface {
    pub fn new(sparkline_len: usize) -> Self {
        Self { sparkline_len: sparkline_len.max(2) }
    }
}

impl Default for WeatherSurface {
    fn default() -> Self {
        Self::new(SPARKLINE_LEN)
    }
}

impl SurfaceRenderer for WeatherSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Weather
    }

    fn paint(&self, canvas: &mut Canvas, data: &SurfaceData<'_>, frame: &FrameState) {
        let Some(sample) = data.weather() else {
            canvas.fill(colors::GROUND);
            draw_placeholder(canvas, "Fetching weather...");
            draw_network_caption(canvas, &frame.network);
            return;
        };

        let (top, bottom) = sky_gradient(sample.condition);
        canvas.fill_vertical_gradient(top, bottom);

        let line_width = frame.quality.line_width * STROKE_SCALE;
        let effect = effect_for(sample.condition);
        effect(
            canvas,
            &EffectParams {
                elapsed: frame.elapsed,
                particles: frame.quality.particle_count,
                line_width,
                wind_speed_mps: sample.wind_speed_mps,
                wind_direction_deg: sample.wind_direction_deg,
            },
        );

        draw_headline(canvas, data, sample);
        draw_temperature_bar(canvas, sample.temperature_c);
        draw_humidity_ring(canvas, sample.humidity_pct, line_width);
        draw_sparkline(canvas, data, self.sparkline_len, line_width);
        draw_network_caption(canvas, &frame.network);
    }
}

fn draw_headline(canvas: &mut Canvas, data: &SurfaceData<'_>, sample: &WeatherSample) {
    let place = data.location.map(|l| l.city.as_str()).unwrap_or("Current location");
    canvas.fill_text(1.0, 0.0, &format!("{} · {}", place, sample.condition.description()), colors::TEXT);

    let t = trend(data.weather_history).unwrap_or_default();
    canvas.fill_text(
        1.0,
        2.0,
        &format!("{:.1}°C {}", sample.temperature_c, trend_arrow(t.temperature_c, 0.1)),
        temperature_color(sample.temperature_c),
    );
    canvas.fill_text(
        1.0,
        4.0,
        &format!(
            "Wind {:.0} km/h {} {}",
            sample.wind_speed_kmh(),
            wind_arrow(sample.wind_direction_deg),
            trend_arrow(t.wind_speed_mps, 0.1)
        ),
        colors::TEXT,
    );
    canvas.fill_text(
        1.0,
        6.0,
        &format!("{:.0} hPa {}", sample.pressure_hpa, trend_arrow(t.pressure_hpa, 0.5)),
        colors::TEXT,
    );
    canvas.fill_text(
        1.0,
        8.0,
        &format!("Vis {:.0} km · {}", sample.visibility_km, sample.observed_at()),
        colors::CAPTION,
    );
}

/// Fraction of the bar filled for a temperature.
pub fn temperature_fill(temperature_c: f64) -> f64 {
    ((temperature_c - BAR_MIN_C) / (BAR_MAX_C - BAR_MIN_C)).clamp(0.0, 1.0)
}

fn draw_temperature_bar(canvas: &mut Canvas, temperature_c: f64) {
    let (w, h) = (canvas.width(), canvas.height());
    let x = 1.0;
    let y = (h - 6.0).max(0.0);
    let width = (w * 0.3).max(4.0);

    canvas.fill_rect(x, y, width, 2.0, colors::BAR_TRACK, 1.0);
    canvas.fill_rect(x, y, width * temperature_fill(temperature_c), 2.0, temperature_color(temperature_c), 1.0);
}

fn draw_humidity_ring(canvas: &mut Canvas, humidity_pct: f64, line_width: f64) {
    let (w, h) = (canvas.width(), canvas.height());
    let radius = (h * 0.15).clamp(2.0, 8.0);
    let center = Point::new(w - radius - 3.0, h - radius - 6.0);
    let sweep = TAU * (humidity_pct / 100.0).clamp(0.0, 1.0);

    canvas.stroke_arc(center, radius, 0.0, TAU, line_width, colors::BAR_TRACK);
    if sweep > 0.0 {
        canvas.stroke_arc(center, radius, -FRAC_PI_2, sweep, line_width, colors::HUMIDITY);
    }

    let label = format!("{:.0}%", humidity_pct);
    let label_x = center.x - label.chars().count() as f64 / 2.0;
    let label_y = (center.y / 2.0).floor() * 2.0;
    canvas.fill_text(label_x.round(), label_y, &label, colors::HUMIDITY);
}

fn draw_sparkline(canvas: &mut Canvas, data: &SurfaceData<'_>, len: usize, line_width: f64) {
    let values = sparkline(data.weather_history, |s| s.temperature_c, len);
    if values.len() < 2 {
        return;
    }
    let (w, h) = (canvas.width(), canvas.height());
    let left = w * 0.38;
    let width = w * 0.3;
    let bottom = h - 5.0;
    let height = (h * 0.2).max(3.0);

    let step = width / (values.len() - 1) as f64;
    let points: Vec<Point> = values
        .iter()
        .enumerate()
        .map(|(i, v)| Point::new(left + i as f64 * step, bottom - v * height))
        .collect();
    canvas.stroke_polyline(&points, line_width, colors::SPARKLINE);
}
