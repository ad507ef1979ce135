//! Split-button grid widget for ratatui

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Paragraph, Widget},
};

use super::pad::{Half, TriggerPad};
use crate::chords::{key_for, ChordSet, Side, Tint};

/// The areas of every button half, in slot order
pub fn half_areas(area: Rect) -> Vec<(Half, Rect)> {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut halves = Vec::with_capacity(8);
    for (row_idx, row) in rows.iter().enumerate() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);

        for (col_idx, column) in columns.iter().enumerate() {
            let slot = row_idx * 2 + col_idx;
            let sides = Layout::default()
                .direction(Direction::Horizontal)
                .margin(1)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*column);

            halves.push(((slot, Side::Call), sides[0]));
            halves.push(((slot, Side::Response), sides[1]));
        }
    }
    halves
}

/// The half under a terminal cell, if any
pub fn hit_test(area: Rect, column: u16, row: u16) -> Option<Half> {
    half_areas(area)
        .into_iter()
        .find(|(_, r)| {
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        })
        .map(|(half, _)| half)
}

fn tint_color(tint: Tint, lit: bool) -> Color {
    match (tint, lit) {
        (Tint::Yellow, false) => Color::Rgb(234, 179, 8),
        (Tint::Yellow, true) => Color::Rgb(253, 224, 71),
        (Tint::Red, false) => Color::Rgb(220, 38, 38),
        (Tint::Red, true) => Color::Rgb(248, 113, 113),
        (Tint::Orange, false) => Color::Rgb(249, 115, 22),
        (Tint::Orange, true) => Color::Rgb(253, 186, 116),
        (Tint::Blue, false) => Color::Rgb(37, 99, 235),
        (Tint::Blue, true) => Color::Rgb(147, 197, 253),
        (Tint::Teal, false) => Color::Rgb(20, 184, 166),
        (Tint::Teal, true) => Color::Rgb(94, 234, 212),
    }
}

/// A widget drawing the current chord set as split buttons
pub struct PadGrid<'a> {
    set: &'a ChordSet,
    pad: &'a TriggerPad,
    block: Option<Block<'a>>,
}

impl<'a> PadGrid<'a> {
    pub fn new(pad: &'a TriggerPad) -> Self {
        Self {
            set: pad.current_set(),
            pad,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn render_half(&self, (slot, side): Half, area: Rect, buf: &mut Buffer) {
        let chord = self.set[slot].chord(side);
        let lit = self.pad.is_held(slot, side);

        let mut style = Style::default()
            .bg(tint_color(chord.tint, lit))
            .fg(Color::White);
        if lit {
            style = style.fg(Color::Black).add_modifier(Modifier::BOLD);
        }

        let top_pad = area.height.saturating_sub(2) / 2;
        let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::raw("")).collect();
        lines.push(Line::styled(chord.name, Style::default().add_modifier(Modifier::BOLD)));
        lines.push(Line::raw(format!("[{}]", key_for(slot, side))));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(style)
            .render(area, buf);
    }
}

impl Widget for PadGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        if inner_area.width < 4 || inner_area.height < 4 {
            return;
        }

        for (half, rect) in half_areas(inner_area) {
            self.render_half(half, rect, buf);
        }
    }
}
