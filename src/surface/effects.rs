//! Animated weather effects, one per condition.
//!
//! Effects hold no particle state between frames. Each paint draws its
//! particle table from a freshly seeded `StdRng`, so a given
//! `(elapsed, tier)` pair always paints the same frame.

use crate::canvas::Canvas;
use crate::colors;
use crate::geo::Point;
use crate::weather::WeatherCondition;
use rand::prelude::*;
use std::f64::consts::TAU;

const EFFECT_SEED: u64 = 0x5ea7_e1f0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    pub elapsed: f64,
    pub particles: usize,
    pub line_width: f64,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: f64,
}

pub type EffectFn = fn(&mut Canvas, &EffectParams);

const EFFECTS: [(WeatherCondition, EffectFn); 5] = [
    (WeatherCondition::Sunny, draw_sun),
    (WeatherCondition::Cloudy, draw_clouds),
    (WeatherCondition::Rainy, draw_rain),
    (WeatherCondition::Windy, draw_wind),
    (WeatherCondition::Unknown, draw_nothing),
];

pub fn effect_for(condition: WeatherCondition) -> EffectFn {
    EFFECTS
        .iter()
        .find(|(c, _)| *c == condition)
        .map(|(_, f)| *f)
        .unwrap_or(draw_nothing)
}

/// Fixed attributes of one particle, each in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    lane: f64,
    phase: f64,
    speed: f64,
    size: f64,
}

/// Particle table for one effect. Particle `i` is the same whatever `count`
/// is, so a lower tier draws a subset of a higher one.
fn particles(count: usize, salt: u64) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(EFFECT_SEED ^ salt);
    (0..count)
        .map(|_| Particle {
            lane: rng.gen_range(0.0..1.0),
            phase: rng.gen_range(0.0..1.0),
            speed: rng.gen_range(0.0..1.0),
            size: rng.gen_range(0.0..1.0),
        })
        .collect()
}

/// Position of something moving at `speed` along a track of `span`,
/// wrapping around, starting from `phase * span`.
fn wrap(phase: f64, speed: f64, elapsed: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return 0.0;
    }
    (phase * span + speed * elapsed).rem_euclid(span)
}

fn draw_nothing(_canvas: &mut Canvas, _params: &EffectParams) {}

fn draw_sun(canvas: &mut Canvas, params: &EffectParams) {
    let (w, h) = (canvas.width(), canvas.height());
    let center = Point::new(w * 0.8, h * 0.3);
    let radius = (w.min(h) * 0.12).max(2.0);

    canvas.fill_circle(center, radius * 1.8, colors::SUN, 0.15);

    let rays = (params.particles / 6).max(4);
    let spin = params.elapsed * 0.2;
    for i in 0..rays {
        let angle = i as f64 * TAU / rays as f64 + spin;
        let reach = radius * (0.6 + 0.2 * (params.elapsed * 2.0 + i as f64).sin());
        let inner = radius * 1.3;
        let (dx, dy) = (angle.cos(), angle.sin());
        canvas.stroke_line(
            center.offset(dx * inner, dy * inner),
            center.offset(dx * (inner + reach), dy * (inner + reach)),
            params.line_width,
            colors::SUN_RAY,
        );
    }

    canvas.fill_circle(center, radius, colors::SUN, 1.0);
}

fn draw_cloud(canvas: &mut Canvas, at: Point, size: f64, alpha: f64) {
    canvas.fill_circle(at.offset(-size * 0.6, size * 0.2), size * 0.6, colors::CLOUD, alpha);
    canvas.fill_circle(at, size * 0.8, colors::CLOUD, alpha);
    canvas.fill_circle(at.offset(size * 0.7, size * 0.25), size * 0.55, colors::CLOUD, alpha);
}

fn draw_clouds(canvas: &mut Canvas, params: &EffectParams) {
    let (w, h) = (canvas.width(), canvas.height());
    let count = (params.particles / 10).max(2);
    for p in particles(count, 1) {
        let size = (h * 0.12).max(2.0) * (0.8 + 0.5 * p.size);
        let span = w + size * 4.0;
        let x = wrap(p.phase, 2.0 + 3.0 * p.speed, params.elapsed, span) - size * 2.0;
        let y = h * (0.12 + 0.3 * p.lane);
        draw_cloud(canvas, Point::new(x, y), size, 0.85);
    }
}

fn draw_rain(canvas: &mut Canvas, params: &EffectParams) {
    let (w, h) = (canvas.width(), canvas.height());
    for i in 0..2 {
        let size = (h * 0.14).max(2.0);
        draw_cloud(canvas, Point::new(w * (0.3 + 0.4 * i as f64), h * 0.12), size, 0.6);
    }

    let streak = (h * 0.08).max(2.0);
    let slant = streak * 0.3;
    for p in particles(params.particles, 2) {
        let x = p.lane * w;
        let speed = 20.0 + 30.0 * p.speed;
        let y = wrap(p.phase, speed, params.elapsed, h + streak) - streak;
        canvas.stroke_line(
            Point::new(x, y),
            Point::new(x - slant, y + streak),
            params.line_width * 0.5,
            colors::RAIN,
        );
    }
}

fn draw_wind(canvas: &mut Canvas, params: &EffectParams) {
    let (w, h) = (canvas.width(), canvas.height());
    // Meteorological direction is where the wind comes from.
    let heading = (params.wind_direction_deg + 180.0).to_radians();
    let sign = if heading.sin() >= 0.0 { 1.0 } else { -1.0 };
    let gust = 1.0 + params.wind_speed_mps / 5.0;
    let length = (w * 0.12).max(4.0);

    let count = (params.particles / 2).max(4);
    for p in particles(count, 3) {
        let speed = (12.0 + 18.0 * p.speed) * gust;
        let travel = wrap(p.phase, speed, params.elapsed, w + length);
        let x0 = if sign > 0.0 { travel - length } else { w - travel };
        let y0 = h * (0.1 + 0.8 * p.lane);
        let phase = p.size * TAU;

        let points: Vec<Point> = (0..=6)
            .map(|k| {
                let t = k as f64 / 6.0;
                let wobble = (phase + t * TAU + params.elapsed * 3.0).sin() * 0.8;
                Point::new(x0 + sign * t * length, y0 + wobble)
            })
            .collect();
        canvas.stroke_polyline(&points, params.line_width * 0.5, colors::WIND);
    }
}
