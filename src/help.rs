use crate::terminal::Terminal;
use crossterm::style::Color;

pub const DASHBOARD_HELP: &str = "\
SKYTRACE
q / Esc     quit
↑ ↓ / k j   scroll one row
PgUp PgDn   scroll one page
Space       pause / resume animation
n           next network class
r           refresh location (keep history)
l           next preset location (reset history)
?           toggle this help";

/// Render a centered help overlay box with the provided text.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    if help_text.is_empty() {
        return;
    }
    let (width, height) = term.size();

    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4;
    let box_height = lines.len() + 2;

    let start_x = ((width as usize).saturating_sub(box_width) / 2) as i32;
    let start_y = ((height as usize).saturating_sub(box_height) / 2) as i32;
    let right = start_x + box_width as i32 - 1;
    let bottom = start_y + box_height as i32 - 1;

    let border = Some(Color::White);
    let text = Some(Color::Grey);

    term.set(start_x, start_y, '┌', border, false);
    term.set(right, start_y, '┐', border, false);
    term.set(start_x, bottom, '└', border, false);
    term.set(right, bottom, '┘', border, false);
    for x in start_x + 1..right {
        term.set(x, start_y, '─', border, false);
        term.set(x, bottom, '─', border, false);
    }

    for (i, line) in lines.iter().enumerate() {
        let y = start_y + 1 + i as i32;
        term.set(start_x, y, '│', border, false);
        let padding = max_width.saturating_sub(line.chars().count());
        let padded = format!(" {}{} ", line, " ".repeat(padding));
        // The title line is bold.
        term.set_str(start_x + 1, y, &padded, text, i == 0);
        term.set(right, y, '│', border, false);
    }
}
