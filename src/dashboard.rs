//! The dashboard: three surfaces stacked in a scrollable column, fed by the
//! synthetic collaborators, plus the interactive loop and print mode.

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::geo::{GeoPoint, TimedSample};
use crate::help::{render_help_overlay, DASHBOARD_HELP};
use crate::history::{History, LocationUpdate};
use crate::layout::{stack, Panel};
use crate::quality::{select_tier, NetworkInfo, RenderQuality};
use crate::sources::{next_preset, NetworkProbe, RouteFeed, RouteReplay, RouteSimulator, WeatherFeed};
use crate::surface::{renderer_for, Surface, SurfaceData, SurfaceKind};
use crate::terminal::Terminal;
use crate::visibility::Rect;
use crate::weather::{Location, WeatherSample};
use chrono::Utc;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::style::Color;
use crossterm::terminal::size;
use std::time::Instant;
use tracing::{debug, info, warn};

const PANE_ORDER: [SurfaceKind; 3] = [SurfaceKind::Weather, SurfaceKind::Route, SurfaceKind::Map];

/// Weather samples generated before a print-mode snapshot.
const SNAPSHOT_WEATHER_SAMPLES: usize = 12;
/// Route samples generated before a print-mode snapshot.
const SNAPSHOT_ROUTE_SAMPLES: usize = 80;

pub struct Dashboard {
    config: DashboardConfig,
    surfaces: Vec<Surface>,
    weather_history: History<WeatherSample>,
    route_history: History<TimedSample>,
    location: Option<Location>,
    weather_feed: WeatherFeed,
    route_feed: RouteFeed,
    probe: NetworkProbe,
    tier: RenderQuality,
    scroll: u16,
    viewport: Rect,
    paused: bool,
    show_help: bool,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let route_feed = match &config.route_file {
            Some(path) => {
                let replay = RouteReplay::from_file(path)?;
                if replay.is_empty() {
                    warn!(path = %path.display(), "route file has no samples");
                }
                info!(path = %path.display(), samples = replay.len(), "replaying route file");
                RouteFeed::Replay(replay)
            }
            None => {
                let origin = GeoPoint::new(config.location.latitude, config.location.longitude);
                let interval = config.route_refresh.as_secs_f64();
                RouteFeed::Simulated(RouteSimulator::new(config.seed, origin, interval))
            }
        };

        let surfaces = PANE_ORDER
            .iter()
            .map(|&kind| Surface::new(renderer_for(kind, config.route_padding, config.sparkline_len), config.surface))
            .collect();

        Ok(Self {
            surfaces,
            weather_history: History::bounded(config.weather_limit),
            route_history: History::unbounded(),
            location: None,
            weather_feed: WeatherFeed::new(config.seed),
            route_feed,
            probe: NetworkProbe::new(config.network),
            tier: select_tier(Some(&config.network)),
            scroll: 0,
            viewport: Rect::default(),
            paused: false,
            show_help: false,
            config,
        })
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn network(&self) -> NetworkInfo {
        self.probe.current()
    }

    pub fn weather_history(&self) -> &History<WeatherSample> {
        &self.weather_history
    }

    pub fn route_history(&self) -> &History<TimedSample> {
        &self.route_history
    }

    pub fn surface(&self, kind: SurfaceKind) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.kind() == kind)
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Select the configured starting location and take first readings.
    pub fn start(&mut self, now_millis: i64) {
        let location = self.config.location.clone();
        self.apply_location(location, LocationUpdate::Selected, now_millis);
    }

    /// Handle a location report. An explicit selection starts both
    /// histories over; a refresh of the same place keeps appending.
    pub fn apply_location(&mut self, location: Location, update: LocationUpdate, now_millis: i64) {
        match update {
            LocationUpdate::Selected => {
                info!(location = %location.label(), "location selected");
                self.weather_history.reset();
                self.route_history.reset();
                self.weather_feed.reset();
                self.route_feed.relocate(GeoPoint::new(location.latitude, location.longitude));
            }
            LocationUpdate::Refreshed => {
                info!(location = %location.label(), samples = self.route_history.len(), "location refreshed");
            }
        }
        self.location = Some(location);
        self.poll_weather(now_millis);
        self.poll_route(now_millis);
    }

    pub fn poll_weather(&mut self, now_millis: i64) {
        if let Some(location) = &self.location {
            let sample = self.weather_feed.next_sample(location, now_millis);
            debug!(temperature = sample.temperature_c, condition = ?sample.condition, "weather sample");
            self.weather_history.push(sample);
        }
    }

    pub fn poll_route(&mut self, now_millis: i64) {
        if let Some(sample) = self.route_feed.next_sample(now_millis) {
            self.route_history.push(sample);
        }
    }

    #[cfg(test)]
    pub fn set_network(&mut self, network: NetworkInfo) {
        self.probe = NetworkProbe::new(network);
        self.note_tier();
    }

    fn note_tier(&mut self) {
        let network = self.probe.current();
        let tier = select_tier(Some(&network));
        if tier != self.tier {
            info!(network = %network.quality, stride = tier.detail_stride, particles = tier.particle_count, "render tier changed");
            self.tier = tier;
        }
    }

    fn content_height(&self) -> u16 {
        self.config.pane_height.saturating_mul(PANE_ORDER.len() as u16)
    }

    fn max_scroll(&self) -> u16 {
        self.content_height().saturating_sub(self.viewport.height)
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll as i32 + delta).clamp(0, self.max_scroll() as i32);
        self.scroll = next as u16;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        for surface in &mut self.surfaces {
            if self.paused {
                surface.pause();
            } else {
                surface.resume();
            }
        }
        info!(paused = self.paused, "animation toggled");
    }

    fn panels(&self) -> Vec<Panel> {
        stack(PANE_ORDER.len(), self.viewport.width, self.config.pane_height, self.scroll)
            .into_iter()
            .zip(&self.surfaces)
            .map(|(rect, surface)| {
                let status = if !surface.is_visible() {
                    "hidden"
                } else if self.paused {
                    "paused"
                } else {
                    "live"
                };
                Panel::new(rect, surface.kind().title()).with_status(status)
            })
            .collect()
    }

    /// Lay the panes out for a terminal of `width × height`: the last row is
    /// the status line, the rest is the viewport.
    pub fn sync_layout(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height.saturating_sub(1));
        self.scroll = self.scroll.min(self.max_scroll());

        let panes = stack(PANE_ORDER.len(), width, self.config.pane_height, self.scroll);
        let network = self.probe.current();
        let Self { surfaces, weather_history, route_history, location, viewport, paused, .. } = self;
        let data = SurfaceData {
            weather_history,
            location: location.as_ref(),
            route: route_history.as_slice(),
        };

        for (surface, rect) in surfaces.iter_mut().zip(panes) {
            let size = Panel::new(rect, "").surface_size();
            match surface.size() {
                None => surface.attach(size),
                Some(current) if current != size => surface.resize(size, &data, &network),
                Some(_) => {}
            }
            surface.observe_visibility(Some(rect.intersection_ratio(viewport)));
            if *paused {
                surface.pause();
            }
        }
    }

    /// Advance every visible surface by one frame.
    pub fn tick(&mut self) -> usize {
        let network = self.probe.current();
        let Self { surfaces, weather_history, route_history, location, .. } = self;
        let data = SurfaceData {
            weather_history,
            location: location.as_ref(),
            route: route_history.as_slice(),
        };
        surfaces
            .iter_mut()
            .map(|s| s.tick(&data, &network))
            .filter(|painted| *painted)
            .count()
    }

    pub fn render(&self, term: &mut Terminal) {
        term.clear();
        for (panel, surface) in self.panels().iter().zip(&self.surfaces) {
            panel.draw(term, self.viewport);
            let inner = panel.inner();
            if let Some(clip) = inner.intersection(&self.viewport) {
                surface.present(term, inner.x, inner.y, clip);
            }
        }
        self.draw_status(term);
        if self.show_help {
            render_help_overlay(term, DASHBOARD_HELP);
        }
    }

    fn draw_status(&self, term: &mut Terminal) {
        let y = self.viewport.height as i32;
        let place = self.location.as_ref().map(|l| l.label()).unwrap_or_else(|| "locating".to_string());
        let mut line = format!(
            " skytrace · {} · {} · {} route pts",
            place,
            self.probe.current().quality,
            self.route_history.len()
        );
        if self.paused {
            line.push_str(" · paused");
        }
        line.push_str(" · ? help");
        term.set_str(0, y, &line, Some(Color::Grey), false);
    }

    /// Returns false when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode, now_millis: i64) -> bool {
        if self.show_help {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => return false,
                _ => {
                    self.show_help = false;
                    return true;
                }
            }
        }

        let page = self.viewport.height.max(1) as i32;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::PageDown => self.scroll_by(page),
            KeyCode::Home => self.scroll = 0,
            KeyCode::Char(' ') => self.toggle_pause(),
            KeyCode::Char('n') => {
                self.probe.cycle();
                self.note_tier();
            }
            KeyCode::Char('r') => {
                if let Some(location) = self.location.clone() {
                    self.apply_location(location, LocationUpdate::Refreshed, now_millis);
                }
            }
            KeyCode::Char('l') => {
                let next = next_preset(self.location.as_ref());
                self.apply_location(next, LocationUpdate::Selected, now_millis);
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        true
    }

    pub fn teardown(&mut self) {
        for surface in &mut self.surfaces {
            surface.teardown();
        }
    }

    /// Render one surface on its own, `frames` ticks in, inside a bordered
    /// pane of `width × height` cells.
    pub fn snapshot(&self, kind: SurfaceKind, width: u16, height: u16, frames: u32) -> Terminal {
        let mut term = Terminal::headless(width, height);
        let panel = Panel::new(Rect::new(0, 0, width, height), kind.title());
        let network = self.probe.current();
        let data = SurfaceData {
            weather_history: &self.weather_history,
            location: self.location.as_ref(),
            route: self.route_history.as_slice(),
        };

        let mut surface = Surface::new(
            renderer_for(kind, self.config.route_padding, self.config.sparkline_len),
            self.config.surface,
        );
        surface.attach(panel.surface_size());
        surface.resize(panel.surface_size(), &data, &network);
        surface.observe_visibility(Some(1.0));
        for _ in 0..frames {
            surface.tick(&data, &network);
        }

        let full = Rect::new(0, 0, width, height);
        panel.draw(&mut term, full);
        let inner = panel.inner();
        surface.present(&mut term, inner.x, inner.y, inner);
        surface.teardown();
        term
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Interactive dashboard in the alternate screen.
pub fn run(config: DashboardConfig) -> Result<()> {
    let mut term = Terminal::new(true)?;
    let frame_interval = config.frame_interval;
    let weather_every = config.weather_refresh;
    let route_every = config.route_refresh;

    let mut dashboard = Dashboard::new(config)?;
    dashboard.start(now_millis());

    let (w, h) = term.size();
    dashboard.sync_layout(w, h);

    let mut last_weather = Instant::now();
    let mut last_route = Instant::now();

    loop {
        if let Some((code, modifiers)) = term.check_key()? {
            if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            if !dashboard.handle_key(code, now_millis()) {
                break;
            }
        }

        if last_weather.elapsed() >= weather_every {
            dashboard.poll_weather(now_millis());
            last_weather = Instant::now();
        }
        if last_route.elapsed() >= route_every {
            dashboard.poll_route(now_millis());
            last_route = Instant::now();
        }

        // Handle resize
        let (new_w, new_h) = size()?;
        if (new_w, new_h) != term.size() {
            term.resize(new_w, new_h);
            term.clear_screen()?;
        }
        let (w, h) = term.size();
        dashboard.sync_layout(w, h);

        dashboard.tick();
        dashboard.render(&mut term);
        term.present()?;

        term.sleep(frame_interval);
    }

    dashboard.teardown();
    Ok(())
}

/// Print mode: generate some history, render one surface and return it as
/// ANSI text.
pub fn render_frame(config: DashboardConfig, kind: SurfaceKind, width: u16, height: u16, frames: u32) -> Result<String> {
    let weather_step = i64::try_from(config.weather_refresh.as_millis()).unwrap_or(i64::MAX);
    let route_step = i64::try_from(config.route_refresh.as_millis()).unwrap_or(i64::MAX);
    let weather_n = SNAPSHOT_WEATHER_SAMPLES as i64;
    let route_n = SNAPSHOT_ROUTE_SAMPLES as i64;

    let mut dashboard = Dashboard::new(config)?;
    let start = now_millis();
    dashboard.start(start.saturating_sub(route_n.saturating_mul(route_step)));
    for i in 1..weather_n {
        dashboard.poll_weather(start.saturating_sub((weather_n - i).saturating_mul(weather_step)));
    }
    for i in 1..route_n {
        dashboard.poll_route(start.saturating_sub((route_n - i).saturating_mul(route_step)));
    }

    Ok(dashboard.snapshot(kind, width, height, frames).to_ansi_string())
}
