//! Horizontal bar widget for base stats

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::data::format::stat_fill_ratio;

/// Eighth-width block characters for the partially filled cell
const PARTIAL_BLOCKS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];
const FULL_BLOCK: char = '█';
const TRACK: char = '·';

/// A bar filled in proportion to a base stat out of 255
pub struct StatBar {
    base_stat: u32,
    style: Style,
    track_style: Style,
}

impl StatBar {
    pub fn new(base_stat: u32) -> Self {
        Self {
            base_stat,
            style: Style::default().fg(stat_color(base_stat)),
            track_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Number of whole cells and the eighths of the next one to fill
    fn fill(&self, width: u16) -> (u16, usize) {
        let eighths = (stat_fill_ratio(self.base_stat) * width as f64 * 8.0).round() as u32;
        let full = (eighths / 8) as u16;
        (full.min(width), (eighths % 8) as usize)
    }
}

/// Bar color by stat value, red for low through green for high
pub fn stat_color(base_stat: u32) -> Color {
    match base_stat {
        0..=49 => Color::Red,
        50..=79 => Color::LightRed,
        80..=99 => Color::Yellow,
        100..=129 => Color::LightGreen,
        _ => Color::Green,
    }
}

impl Widget for StatBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (full, partial) = self.fill(area.width);
        let y = area.y;

        for i in 0..area.width {
            let (symbol, style) = if i < full {
                (FULL_BLOCK, self.style)
            } else if i == full && partial > 0 {
                (PARTIAL_BLOCKS[partial], self.style)
            } else {
                (TRACK, self.track_style)
            };

            if let Some(cell) = buf.cell_mut((area.x + i, y)) {
                cell.set_char(symbol).set_style(style);
            }
        }
    }
}
