//! Drawing surface the renderer's commands are painted onto.

use crate::cell::fit;
use crate::render::Frame;
use crate::style::{Role, Theme};
use ratatui::buffer::Buffer;

/// Styled text output at character positions.
pub trait Surface {
    /// `(rows, cols)`.
    fn size(&self) -> (u16, u16);

    /// Writes `text` at `(row, col)`. Positions outside the surface are
    /// ignored and text is cut at the right edge, never wrapped.
    fn write_styled_text(&mut self, row: u16, col: u16, text: &str, role: Role);
}

/// Part of `text` that fits from `col` in a surface `cols` columns wide.
pub fn clip(text: &str, col: u16, cols: u16) -> Option<String> {
    if col >= cols {
        return None;
    }
    Some(fit(text, usize::from(cols - col), false))
}

pub fn paint(frame: &Frame, surface: &mut impl Surface) {
    for cmd in &frame.commands {
        surface.write_styled_text(cmd.row, cmd.col, &cmd.text, cmd.role);
    }
}

/// Surface over a ratatui buffer.
pub struct BufferSurface<'a> {
    buffer: &'a mut Buffer,
    theme: &'a Theme,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buffer: &'a mut Buffer, theme: &'a Theme) -> Self {
        BufferSurface { buffer, theme }
    }
}

impl Surface for BufferSurface<'_> {
    fn size(&self) -> (u16, u16) {
        (self.buffer.area.height, self.buffer.area.width)
    }

    fn write_styled_text(&mut self, row: u16, col: u16, text: &str, role: Role) {
        let (rows, cols) = self.size();
        if row >= rows {
            return;
        }
        let Some(visible) = clip(text, col, cols) else {
            return;
        };
        let area = self.buffer.area;
        self.buffer.set_stringn(
            area.x + col,
            area.y + row,
            visible,
            usize::from(cols - col),
            self.theme.style(role),
        );
    }
}
