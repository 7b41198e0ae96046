use super::{
    draw_grid, draw_network_caption, draw_placeholder, draw_pulsing_marker, FrameState, SurfaceData, SurfaceKind,
    SurfaceRenderer, STROKE_SCALE,
};
use crate::canvas::Canvas;
use crate::colors::{self, speed_color};
use crate::geo::{path_length_m, project_route, Point, TimedSample};
use crate::quality::stride_indices;

/// Default margin kept around the projected route, in logical pixels.
pub const DEFAULT_PADDING: f64 = 4.0;

/// The recorded route as a gradient trail with markers.
pub struct RouteSurface {
    padding: f64,
}

impl RouteSurface {
    pub fn new(padding: f64) -> Self {
        Self { padding: padding.max(0.0) }
    }
}

impl Default for RouteSurface {
    fn default() -> Self {
        Self::new(DEFAULT_PADDING)
    }
}

impl SurfaceRenderer for RouteSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Route
    }

    fn paint(&self, canvas: &mut Canvas, data: &SurfaceData<'_>, frame: &FrameState) {
        draw_grid(canvas, frame.quality.grid_size_px);

        let route = data.route;
        if route.is_empty() {
            draw_placeholder(canvas, "Waiting for GPS fix...");
            draw_network_caption(canvas, &frame.network);
            return;
        }

        let projection = project_route(route, canvas.size(), self.padding);
        let indices = stride_indices(route.len(), frame.quality.detail_stride);
        let points: Vec<Point> = indices.iter().map(|&i| projection.to_xy(&route[i].point)).collect();
        let line_width = frame.quality.line_width * STROKE_SCALE;

        // Color runs from start to end over the whole route, not the
        // decimated subset, so strides do not shift the gradient.
        let last = (route.len() - 1).max(1) as f64;
        for (pair, idx) in points.windows(2).zip(indices.windows(2)) {
            let from = colors::ROUTE_START.lerp(colors::ROUTE_END, idx[0] as f64 / last);
            let to = colors::ROUTE_START.lerp(colors::ROUTE_END, idx[1] as f64 / last);
            canvas.stroke_line_gradient(pair[0], pair[1], line_width, from, to);
        }

        let start = points[0];
        canvas.fill_circle(start, 2.0, colors::ROUTE_START, 1.0);
        canvas.fill_text((start.x + 2.0).round(), (start.y / 2.0).floor() * 2.0, "START", colors::ROUTE_START);

        if frame.quality.show_secondary_overlays {
            for (&i, p) in indices.iter().zip(&points) {
                if let Some(kmh) = route[i].speed_kmh() {
                    canvas.fill_circle(*p, 1.0, speed_color(kmh), 0.9);
                }
            }
        }

        let current = points[points.len() - 1];
        draw_pulsing_marker(canvas, current, frame.elapsed, colors::MARKER);

        canvas.fill_text(1.0, 0.0, &summary(route), colors::TEXT);
        if frame.quality.show_secondary_overlays {
            draw_speed_legend(canvas);
        }
        draw_network_caption(canvas, &frame.network);
    }
}

/// "12 pts · 1.84 km · 18 km/h" style summary of the drawn samples.
pub fn summary(route: &[TimedSample]) -> String {
    let km = path_length_m(route) / 1000.0;
    match route.last().and_then(TimedSample::speed_kmh) {
        Some(kmh) => format!("{} pts · {:.2} km · {:.0} km/h", route.len(), km, kmh),
        None => format!("{} pts · {:.2} km", route.len(), km),
    }
}

fn draw_speed_legend(canvas: &mut Canvas) {
    let entries = [("<15", colors::SPEED_SLOW), ("15-25", colors::SPEED_MEDIUM), ("25+", colors::SPEED_FAST)];
    let total: usize = entries.iter().map(|(label, _)| label.len() + 3).sum();
    let mut x = (canvas.width() - total as f64).max(0.0);
    for (label, color) in entries {
        canvas.fill_text(x, 2.0, &format!("● {}", label), color);
        x += label.len() as f64 + 3.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::SurfaceSize;
    use crate::history::History;
    use crate::quality::{NetworkInfo, NetworkQuality};
    use crate::surface::testing::render;

    const SIZE: SurfaceSize = SurfaceSize { width_px: 80, height_px: 40 };

    fn walk(n: usize) -> Vec<TimedSample> {
        (0..n)
            .map(|i| TimedSample::new(52.0 + i as f64 * 0.0005, 13.0 + i as f64 * 0.0007, i as i64 * 5_000).with_speed(4.0))
            .collect()
    }

    fn paint(route: &[TimedSample], quality: NetworkQuality, elapsed: f64) -> Canvas {
        let history = History::bounded(1);
        let data = SurfaceData { weather_history: &history, location: None, route };
        render(&RouteSurface::default(), &data, NetworkInfo::new(quality, None), SIZE, elapsed)
    }

    #[test]
    fn empty_route_shows_placeholder() {
        let canvas = paint(&[], NetworkQuality::FourG, 0.0);
        assert!(canvas.text_content().contains("Waiting for GPS fix..."));
        assert!(!canvas.text_content().contains("START"));
    }

    #[test]
    fn decimation_follows_tier() {
        let route = walk(10);
        let grid_strokes = |c: &Canvas, spacing: u32| {
            let (w, h) = (c.width() as u32, c.height() as u32);
            ((w - 1) / spacing + (h - 1) / spacing) as usize
        };

        let high = paint(&route, NetworkQuality::FourG, 0.0);
        assert_eq!(high.stats().strokes - grid_strokes(&high, 20), 9);

        // stride 3 over 10 samples visits 0, 3, 6, 9
        let low = paint(&route, NetworkQuality::TwoG, 0.0);
        assert_eq!(low.stats().strokes - grid_strokes(&low, 40), 3);
    }

    #[test]
    fn legend_only_with_overlays() {
        let route = walk(5);
        assert!(paint(&route, NetworkQuality::FourG, 0.0).text_content().contains("15-25"));
        assert!(!paint(&route, NetworkQuality::Slow2g, 0.0).text_content().contains("15-25"));
    }

    #[test]
    fn start_marker_sits_on_first_sample() {
        let route = walk(6);
        let canvas = paint(&route, NetworkQuality::Slow2g, 0.0);
        let projection = project_route(&route, SIZE, DEFAULT_PADDING);
        let start = projection.to_xy(&route[0].point);
        assert_eq!(canvas.logical_pixel(start.x as u32, start.y as u32), Some(colors::ROUTE_START));
        assert!(canvas.text_content().contains("START"));
    }

    #[test]
    fn speed_dots_layer_over_start_marker() {
        let route = walk(6);
        let canvas = paint(&route, NetworkQuality::FourG, 0.0);
        let start = project_route(&route, SIZE, DEFAULT_PADDING).to_xy(&route[0].point);
        // 4 m/s is 14.4 km/h, the slow class
        let dot_over_start = colors::SPEED_SLOW.over(colors::ROUTE_START, 0.9);
        assert_eq!(canvas.logical_pixel(start.x as u32, start.y as u32), Some(dot_over_start));
    }

    #[test]
    fn single_sample_is_centered_without_trail() {
        let route = walk(1);
        let canvas = paint(&route, NetworkQuality::FourG, 0.0);
        let grid = (79 / 20 + 39 / 20) as usize;
        assert_eq!(canvas.stats().strokes, grid);
        assert!(canvas.text_content().contains("1 pts · 0.00 km · 14 km/h"));
    }

    #[test]
    fn pulse_changes_between_frames() {
        let route = walk(4);
        let a = paint(&route, NetworkQuality::FourG, 0.0);
        let b = paint(&route, NetworkQuality::FourG, 0.5);
        assert_ne!(a.pixels(), b.pixels());
    }

    #[test]
    fn summary_without_speed() {
        let route = vec![TimedSample::new(0.0, 0.0, 0), TimedSample::new(0.0, 0.01, 1000)];
        assert_eq!(summary(&route), "2 pts · 1.11 km");
    }
}
