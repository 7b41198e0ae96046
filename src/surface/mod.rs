//! Drawing surfaces: the three renderers and the controller that owns a
//! surface's canvas, visibility gate and animation clock.
//!
//! Each renderer is a pure function of the data snapshot and frame state;
//! all per-surface state lives in [`Surface`].

pub mod effects;
pub mod map;
pub mod route;
pub mod weather;

use crate::canvas::Canvas;
use crate::clock::AnimationClock;
use crate::colors::{self, Rgb};
use crate::geo::{Point, SurfaceSize, TimedSample};
use crate::history::History;
use crate::quality::{select_tier, NetworkInfo, RenderQuality};
use crate::terminal::Terminal;
use crate::visibility::{Rect, Transition, VisibilityGate};
use crate::weather::{Location, WeatherSample};
use std::fmt;
use tracing::{debug, trace};

pub use map::MapSurface;
pub use route::RouteSurface;
pub use weather::WeatherSurface;

/// Terminal pixels are about twice as coarse as screen pixels, so tier line
/// widths are halved when stroking.
pub const STROKE_SCALE: f64 = 0.5;

/// Angular speed of the pulsing position marker, radians per second.
const PULSE_RATE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Weather,
    Route,
    Map,
}

impl SurfaceKind {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "weather" => Some(SurfaceKind::Weather),
            "route" | "trace" => Some(SurfaceKind::Route),
            "map" | "location" => Some(SurfaceKind::Map),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SurfaceKind::Weather => "WEATHER",
            SurfaceKind::Route => "ROUTE",
            SurfaceKind::Map => "MAP",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Everything a renderer may read about the world for one frame.
#[derive(Clone, Copy)]
pub struct SurfaceData<'a> {
    pub weather_history: &'a History<WeatherSample>,
    pub location: Option<&'a Location>,
    pub route: &'a [TimedSample],
}

impl<'a> SurfaceData<'a> {
    pub fn weather(&self) -> Option<&'a WeatherSample> {
        self.weather_history.latest()
    }
}

/// Per-frame rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub size: SurfaceSize,
    pub quality: RenderQuality,
    pub network: NetworkInfo,
    pub elapsed: f64,
    pub visible: bool,
}

pub trait SurfaceRenderer {
    fn kind(&self) -> SurfaceKind;

    /// Paint one complete frame onto `canvas`.
    fn paint(&self, canvas: &mut Canvas, data: &SurfaceData<'_>, frame: &FrameState);
}

/// Which part of the route a surface draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderWindow {
    Full,
    Tail(usize),
}

impl RenderWindow {
    pub fn apply<'a, T>(&self, samples: &'a [T]) -> &'a [T] {
        match *self {
            RenderWindow::Full => samples,
            RenderWindow::Tail(n) => &samples[samples.len().saturating_sub(n)..],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    pub device_pixel_ratio: u32,
    pub visibility_threshold: f64,
    pub frame_step: f64,
    pub hidden_route_window: usize,
}

/// One mounted surface: its renderer plus the state it renders from.
pub struct Surface {
    renderer: Box<dyn SurfaceRenderer>,
    options: SurfaceOptions,
    canvas: Option<Canvas>,
    gate: VisibilityGate,
    clock: AnimationClock,
    window: RenderWindow,
}

impl Surface {
    pub fn new(renderer: Box<dyn SurfaceRenderer>, options: SurfaceOptions) -> Self {
        Self {
            renderer,
            options,
            canvas: None,
            gate: VisibilityGate::new(options.visibility_threshold),
            clock: AnimationClock::new(options.frame_step),
            window: RenderWindow::Full,
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        self.renderer.kind()
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn size(&self) -> Option<SurfaceSize> {
        self.canvas.as_ref().map(|c| c.size())
    }

    pub fn is_visible(&self) -> bool {
        self.gate.is_visible()
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    pub fn window(&self) -> RenderWindow {
        self.window
    }

    #[cfg(test)]
    pub fn is_frame_pending(&self) -> bool {
        self.clock.is_pending()
    }

    /// Allocate the drawing surface.
    pub fn attach(&mut self, size: SurfaceSize) {
        if self.clock.is_detached() {
            return;
        }
        debug!(surface = %self.kind(), width = size.width_px, height = size.height_px, "attach");
        self.canvas = Some(Canvas::new(size, self.options.device_pixel_ratio));
    }

    /// Reallocate for a new size and repaint once at the current time.
    pub fn resize(&mut self, size: SurfaceSize, data: &SurfaceData<'_>, network: &NetworkInfo) {
        let kind = self.kind();
        let Some(canvas) = self.canvas.as_mut() else {
            trace!(surface = %kind, "resize before attach ignored");
            return;
        };
        debug!(surface = %kind, width = size.width_px, height = size.height_px, "resize");
        canvas.resize(size, self.options.device_pixel_ratio);
        paint_frame(
            self.canvas.as_mut(),
            self.renderer.as_ref(),
            self.window,
            data,
            network,
            self.clock.elapsed(),
            self.gate.is_visible(),
        );
    }

    /// Feed a viewport intersection ratio (`None` when it cannot be measured).
    pub fn observe_visibility(&mut self, ratio: Option<f64>) -> Option<Transition> {
        let transition = self.gate.observe(ratio)?;
        match transition {
            Transition::Entered => {
                self.window = RenderWindow::Full;
                self.clock.start();
            }
            Transition::Left => {
                if self.kind() == SurfaceKind::Route {
                    self.window = RenderWindow::Tail(self.options.hidden_route_window);
                }
                self.clock.stop();
            }
        }
        debug!(surface = %self.kind(), ?transition, "visibility changed");
        Some(transition)
    }

    /// Service the pending animation frame. Returns whether a frame was painted.
    pub fn tick(&mut self, data: &SurfaceData<'_>, network: &NetworkInfo) -> bool {
        let visible = self.gate.is_visible();
        let Self { renderer, canvas, clock, window, .. } = self;
        clock.tick(visible, |elapsed| {
            paint_frame(canvas.as_mut(), renderer.as_ref(), *window, data, network, elapsed, visible);
        })
    }

    /// Halt animation without touching visibility (user pause).
    pub fn pause(&mut self) {
        self.clock.stop();
    }

    pub fn resume(&mut self) {
        if self.gate.is_visible() {
            self.clock.start();
        }
    }

    pub fn present(&self, term: &mut Terminal, x: i32, y: i32, clip: Rect) {
        if let Some(canvas) = &self.canvas {
            canvas.present(term, x, y, clip);
        }
    }

    /// Cancel the pending frame, unregister the gate and release the canvas.
    pub fn teardown(&mut self) {
        debug!(surface = %self.kind(), frames = self.clock.frames(), "teardown");
        self.clock.teardown();
        self.gate.teardown();
        self.canvas = None;
    }
}

fn paint_frame(
    canvas: Option<&mut Canvas>,
    renderer: &dyn SurfaceRenderer,
    window: RenderWindow,
    data: &SurfaceData<'_>,
    network: &NetworkInfo,
    elapsed: f64,
    visible: bool,
) {
    let Some(canvas) = canvas else {
        trace!(surface = %renderer.kind(), "no canvas attached, frame skipped");
        return;
    };
    canvas.begin_frame();
    let windowed = SurfaceData { route: window.apply(data.route), ..*data };
    let frame = FrameState {
        size: canvas.size(),
        quality: select_tier(Some(network)),
        network: *network,
        elapsed,
        visible,
    };
    renderer.paint(canvas, &windowed, &frame);
}

/// Grid lines every `spacing` logical pixels over a flat ground.
pub fn draw_grid(canvas: &mut Canvas, spacing: u32) {
    canvas.fill(colors::GROUND);
    let spacing = spacing.max(4) as f64;
    let (w, h) = (canvas.width(), canvas.height());
    let mut x = spacing;
    while x < w {
        canvas.stroke_line(Point::new(x, 0.0), Point::new(x, h), 0.5, colors::GRID_LINE);
        x += spacing;
    }
    let mut y = spacing;
    while y < h {
        canvas.stroke_line(Point::new(0.0, y), Point::new(w, y), 0.5, colors::GRID_LINE);
        y += spacing;
    }
}

/// Idle caption shown until the surface has data.
pub fn draw_placeholder(canvas: &mut Canvas, text: &str) {
    let y = (canvas.height() / 2.0 / 2.0).floor() * 2.0;
    canvas.fill_text_centered(y, text, colors::PLACEHOLDER);
}

/// Network caption on the last text row.
pub fn draw_network_caption(canvas: &mut Canvas, network: &NetworkInfo) {
    let y = ((canvas.height() - 1.0) / 2.0).floor() * 2.0;
    canvas.fill_text(1.0, y, &network.caption(), colors::CAPTION);
}

/// Radius of the pulsing marker at `elapsed` seconds.
pub fn pulse_radius(elapsed: f64, base: f64, amplitude: f64) -> f64 {
    base + amplitude * (elapsed * PULSE_RATE).sin()
}

/// Current-position dot with a breathing halo.
pub fn draw_pulsing_marker(canvas: &mut Canvas, at: Point, elapsed: f64, color: Rgb) {
    let halo = pulse_radius(elapsed, 3.0, 1.0);
    canvas.fill_circle(at, halo, color, 0.3);
    canvas.fill_circle(at, 1.5, color, 1.0);
    canvas.fill_circle(at.offset(-0.4, -0.4), 0.6, colors::WHITE, 0.8);
}

pub fn renderer_for(kind: SurfaceKind, route_padding: f64, sparkline_len: usize) -> Box<dyn SurfaceRenderer> {
    match kind {
        SurfaceKind::Weather => Box::new(WeatherSurface::new(sparkline_len)),
        SurfaceKind::Route => Box::new(RouteSurface::new(route_padding)),
        SurfaceKind::Map => Box::new(MapSurface),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::options;
    use super::*;
    use crate::quality::NetworkQuality;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts paints instead of drawing.
    struct Probe {
        painted: Rc<Cell<usize>>,
        last_route_len: Rc<Cell<usize>>,
    }

    impl SurfaceRenderer for Probe {
        fn kind(&self) -> SurfaceKind {
            SurfaceKind::Route
        }

        fn paint(&self, _canvas: &mut Canvas, data: &SurfaceData<'_>, _frame: &FrameState) {
            self.painted.set(self.painted.get() + 1);
            self.last_route_len.set(data.route.len());
        }
    }

    fn probe() -> (Surface, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let painted = Rc::new(Cell::new(0));
        let len = Rc::new(Cell::new(0));
        let renderer = Probe { painted: painted.clone(), last_route_len: len.clone() };
        (Surface::new(Box::new(renderer), options()), painted, len)
    }

    fn route(n: usize) -> Vec<TimedSample> {
        (0..n).map(|i| TimedSample::new(i as f64 * 0.001, 0.0, i as i64 * 1000)).collect()
    }

    #[test]
    fn animates_only_while_visible() {
        let (mut surface, painted, _) = probe();
        let history = History::bounded(4);
        let samples = route(3);
        let data = SurfaceData { weather_history: &history, location: None, route: &samples };
        let net = NetworkInfo::default();
        surface.attach(SurfaceSize::new(20, 10));

        assert!(!surface.tick(&data, &net));
        surface.observe_visibility(Some(1.0));
        assert!(surface.tick(&data, &net));
        assert!(surface.tick(&data, &net));
        assert_eq!(painted.get(), 2);

        surface.observe_visibility(Some(0.0));
        assert!(!surface.is_frame_pending());
        assert!(!surface.tick(&data, &net));
        assert_eq!(painted.get(), 2);
        assert_eq!(surface.elapsed(), 0.5);

        surface.observe_visibility(Some(0.5));
        assert!(surface.tick(&data, &net));
        assert_eq!(surface.elapsed(), 0.75);
    }

    #[test]
    fn no_paint_after_teardown() {
        let (mut surface, painted, _) = probe();
        let history = History::bounded(4);
        let data = SurfaceData { weather_history: &history, location: None, route: &[] };
        let net = NetworkInfo::default();
        surface.attach(SurfaceSize::new(20, 10));
        surface.observe_visibility(Some(1.0));
        surface.teardown();

        assert!(surface.canvas().is_none());
        assert!(surface.observe_visibility(Some(1.0)).is_none());
        assert!(!surface.tick(&data, &net));
        surface.resize(SurfaceSize::new(30, 10), &data, &net);
        surface.attach(SurfaceSize::new(30, 10));
        assert!(surface.canvas().is_none());
        assert_eq!(painted.get(), 0);
    }

    #[test]
    fn hidden_route_draws_tail_window_but_keeps_history() {
        let (mut surface, _, len) = probe();
        let history = History::bounded(4);
        let samples = route(120);
        let data = SurfaceData { weather_history: &history, location: None, route: &samples };
        let net = NetworkInfo::default();
        surface.attach(SurfaceSize::new(20, 10));

        surface.observe_visibility(Some(1.0));
        surface.tick(&data, &net);
        assert_eq!(len.get(), 120);

        surface.observe_visibility(Some(0.0));
        assert_eq!(surface.window(), RenderWindow::Tail(50));
        surface.resize(SurfaceSize::new(24, 10), &data, &net);
        assert_eq!(len.get(), 50);
        assert_eq!(samples.len(), 120);

        surface.observe_visibility(Some(1.0));
        assert_eq!(surface.window(), RenderWindow::Full);
    }

    #[test]
    fn unattached_surface_skips_frames_silently() {
        let (mut surface, painted, _) = probe();
        let history = History::bounded(4);
        let data = SurfaceData { weather_history: &history, location: None, route: &[] };
        surface.observe_visibility(Some(1.0));
        assert!(surface.tick(&data, &NetworkInfo::new(NetworkQuality::ThreeG, None)));
        assert_eq!(painted.get(), 0);
    }

    #[test]
    fn pause_and_resume() {
        let (mut surface, painted, _) = probe();
        let history = History::bounded(4);
        let data = SurfaceData { weather_history: &history, location: None, route: &[] };
        let net = NetworkInfo::default();
        surface.attach(SurfaceSize::new(10, 10));
        surface.observe_visibility(Some(1.0));
        surface.pause();
        assert!(!surface.tick(&data, &net));
        surface.resume();
        assert!(surface.tick(&data, &net));
        assert_eq!(painted.get(), 1);
    }

    #[test]
    fn repeated_resize_to_same_size_is_pixel_identical() {
        let history = History::bounded(4);
        let samples = route(30);
        let data = SurfaceData { weather_history: &history, location: None, route: &samples };
        let net = NetworkInfo::default();
        let size = SurfaceSize::new(40, 24);

        let mut surface = Surface::new(renderer_for(SurfaceKind::Route, 4.0, 20), options());
        surface.attach(size);
        surface.resize(size, &data, &net);
        let first = surface.canvas().unwrap().pixels().to_vec();
        surface.resize(size, &data, &net);
        assert_eq!(surface.canvas().unwrap().pixels(), first.as_slice());
        assert_eq!(surface.frames(), 0);
    }

    #[test]
    fn pulse_oscillates_around_base() {
        assert_eq!(pulse_radius(0.0, 3.0, 1.0), 3.0);
        let peak = std::f64::consts::FRAC_PI_2 / PULSE_RATE;
        assert!((pulse_radius(peak, 3.0, 1.0) - 4.0).abs() < 1e-9);
        for i in 0..100 {
            let r = pulse_radius(i as f64 * 0.1, 3.0, 1.0);
            assert!((2.0..=4.0).contains(&r));
        }
    }

    #[test]
    fn render_window_tail() {
        let v: Vec<u32> = (0..10).collect();
        assert_eq!(RenderWindow::Tail(3).apply(&v), &[7, 8, 9]);
        assert_eq!(RenderWindow::Tail(30).apply(&v).len(), 10);
        assert_eq!(RenderWindow::Full.apply(&v).len(), 10);
    }

    #[test]
    fn surface_kind_parse() {
        assert_eq!(SurfaceKind::parse("Route"), Some(SurfaceKind::Route));
        assert_eq!(SurfaceKind::parse("radar"), None);
    }
}
