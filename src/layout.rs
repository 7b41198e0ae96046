use crate::geo::SurfaceSize;
use crate::terminal::Terminal;
use crate::visibility::Rect;
use crossterm::style::Color;

// Box drawing characters (rounded)
pub const BOX_TL: char = '╭';
pub const BOX_TR: char = '╮';
pub const BOX_BL: char = '╰';
pub const BOX_BR: char = '╯';
pub const BOX_H: char = '─';
pub const BOX_V: char = '│';
pub const BOX_TITLE_L: char = '┤';
pub const BOX_TITLE_R: char = '├';

/// A bordered pane with a title on the left and a status on the right
pub struct Panel {
    pub rect: Rect,
    pub title: String,
    pub status: String,
    pub title_color: Color,
    pub border_color: Color,
}

impl Panel {
    pub fn new(rect: Rect, title: &str) -> Self {
        Self {
            rect,
            title: title.to_string(),
            status: String::new(),
            title_color: Color::White,
            border_color: Color::DarkGrey,
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    /// Inner content area (excluding borders)
    pub fn inner(&self) -> Rect {
        Rect::new(
            self.rect.x + 1,
            self.rect.y + 1,
            self.rect.width.saturating_sub(2),
            self.rect.height.saturating_sub(2),
        )
    }

    /// Logical pixel size of the inner area: two pixels per cell row.
    pub fn surface_size(&self) -> SurfaceSize {
        let inner = self.inner();
        SurfaceSize::new(inner.width as u32, inner.height as u32 * 2)
    }

    /// Draw the border, writing only cells inside `clip`.
    pub fn draw(&self, term: &mut Terminal, clip: Rect) {
        let Rect { x, y, width, height } = self.rect;
        if width < 2 || height < 2 {
            return;
        }
        let (right, bottom) = (x + width as i32 - 1, y + height as i32 - 1);
        let bc = Some(self.border_color);
        let mut put = |cx: i32, cy: i32, ch: char, color: Option<Color>, bold: bool| {
            if contains(&clip, cx, cy) {
                term.set(cx, cy, ch, color, bold);
            }
        };

        put(x, y, BOX_TL, bc, false);
        put(right, y, BOX_TR, bc, false);
        put(x, bottom, BOX_BL, bc, false);
        put(right, bottom, BOX_BR, bc, false);
        for cx in x + 1..right {
            put(cx, y, BOX_H, bc, false);
            put(cx, bottom, BOX_H, bc, false);
        }
        for cy in y + 1..bottom {
            put(x, cy, BOX_V, bc, false);
            put(right, cy, BOX_V, bc, false);
        }

        let mut label = |start: i32, text: &str, color: Color, bold: bool| {
            put(start, y, BOX_TITLE_L, bc, false);
            put(start + 1, y, ' ', None, false);
            for (i, ch) in text.chars().enumerate() {
                put(start + 2 + i as i32, y, ch, Some(color), bold);
            }
            let end = start + 2 + text.chars().count() as i32;
            put(end, y, ' ', None, false);
            put(end + 1, y, BOX_TITLE_R, bc, false);
        };

        if !self.title.is_empty() {
            label(x + 2, &self.title, self.title_color, true);
        }
        if !self.status.is_empty() {
            let start = right - 5 - self.status.chars().count() as i32;
            if start > x + 6 + self.title.chars().count() as i32 {
                label(start, &self.status, Color::Grey, false);
            }
        }
    }
}

fn contains(rect: &Rect, x: i32, y: i32) -> bool {
    x >= rect.x && x < rect.x + rect.width as i32 && y >= rect.y && y < rect.y + rect.height as i32
}

/// Stack `count` panes of `pane_height` rows in a column scrolled by `scroll`.
pub fn stack(count: usize, width: u16, pane_height: u16, scroll: u16) -> Vec<Rect> {
    (0..count)
        .map(|i| Rect::new(0, i as i32 * pane_height as i32 - scroll as i32, width, pane_height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_area_and_pixel_size() {
        let panel = Panel::new(Rect::new(0, 0, 40, 12), "MAP");
        assert_eq!(panel.inner(), Rect::new(1, 1, 38, 10));
        assert_eq!(panel.surface_size(), SurfaceSize::new(38, 20));
    }

    #[test]
    fn border_and_title() {
        let mut term = Terminal::headless(30, 6);
        Panel::new(Rect::new(0, 0, 30, 6), "ROUTE")
            .with_status("live")
            .draw(&mut term, Rect::new(0, 0, 30, 6));
        let text = term.to_plain_string();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("╭─┤ ROUTE ├"));
        assert!(first.contains("┤ live ├"));
        assert!(first.ends_with('╮'));
        assert_eq!(term.cell(0, 5).unwrap().ch, BOX_BL);
    }

    #[test]
    fn clipped_rows_are_left_alone() {
        let mut term = Terminal::headless(10, 6);
        Panel::new(Rect::new(0, -2, 10, 6), "").draw(&mut term, Rect::new(0, 0, 10, 3));
        assert_eq!(term.cell(0, 0).unwrap().ch, BOX_V);
        assert_eq!(term.cell(0, 3).unwrap().ch, ' ');
    }

    #[test]
    fn stacked_panes_scroll_together() {
        let panes = stack(3, 80, 20, 5);
        assert_eq!(panes[0].y, -5);
        assert_eq!(panes[2].y, 35);
    }
}
