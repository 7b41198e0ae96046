//! Viewport visibility tracking for a surface container.

use tracing::debug;

/// Default fraction of a container that must be on screen to count as visible.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Axis-aligned rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width as i32).min(other.x + other.width as i32);
        let y1 = (self.y + self.height as i32).min(other.y + other.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, (x1 - x0) as u16, (y1 - y0) as u16))
    }

    /// Fraction of `self` covered by `viewport`, in `[0, 1]`.
    pub fn intersection_ratio(&self, viewport: &Rect) -> f64 {
        if self.area() == 0 {
            return 0.0;
        }
        self.intersection(viewport)
            .map(|r| r.area() as f64 / self.area() as f64)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Entered,
    Left,
}

/// Per-surface visibility state. Reports a [`Transition`] only when the state
/// flips; after [`VisibilityGate::teardown`] it reports nothing.
#[derive(Debug)]
pub struct VisibilityGate {
    threshold: f64,
    visible: bool,
    registered: bool,
    fallback_logged: bool,
}

impl VisibilityGate {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            visible: false,
            registered: true,
            fallback_logged: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.registered && self.visible
    }

    #[cfg(test)]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Feed one intersection measurement. `None` means no measurement could
    /// be taken; the surface is then treated as visible.
    pub fn observe(&mut self, ratio: Option<f64>) -> Option<Transition> {
        if !self.registered {
            return None;
        }

        let now_visible = match ratio {
            Some(r) => r > 0.0 && r >= self.threshold,
            None => {
                if !self.fallback_logged {
                    debug!("no intersection measurement, treating surface as visible");
                    self.fallback_logged = true;
                }
                true
            }
        };

        if now_visible == self.visible {
            return None;
        }
        self.visible = now_visible;
        Some(if now_visible { Transition::Entered } else { Transition::Left })
    }

    /// Unregister: the gate reads as invisible and stops reporting.
    pub fn teardown(&mut self) {
        self.registered = false;
        self.visible = false;
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}
