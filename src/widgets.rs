//! Clickable list component: rendered lines paired with click actions.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;
use ratzilla::ratatui::widgets::{Paragraph, Wrap};

use crate::input::ClickState;

/// Lines for a wrapped `Paragraph`, some of them bound to an action ID.
///
/// Targets follow their line: pushing extra lines above a clickable one moves
/// its hit row with it. Call [`register_targets`](Self::register_targets)
/// with the same area the paragraph is rendered into.
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Rows the lines take once wrapped at `width`.
    pub fn visual_height(&self, width: u16) -> u16 {
        if width == 0 {
            return self.lines.len() as u16;
        }
        self.lines
            .iter()
            .map(|line| {
                let rows = Paragraph::new(line.clone())
                    .wrap(Wrap { trim: false })
                    .line_count(width);
                rows.max(1) as u16
            })
            .sum()
    }

    /// Register a row target for every visual row of every clickable line.
    ///
    /// `top_offset`/`bottom_offset` are the border rows of the block, `width`
    /// is the inner width the paragraph wraps at.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        let mut starts = Vec::with_capacity(self.lines.len());
        let mut heights = Vec::with_capacity(self.lines.len());
        let mut cumulative: u16 = 0;
        for line in &self.lines {
            let w = line.width();
            let h = if width == 0 || w <= width as usize {
                1
            } else {
                w.div_ceil(width as usize) as u16
            };
            starts.push(cumulative);
            heights.push(h);
            cumulative = cumulative.saturating_add(h);
        }

        for &(idx, action_id) in &self.actions {
            for r in 0..heights[idx] {
                let row = content_y.saturating_add(starts[idx] + r);
                if row >= content_end {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}
