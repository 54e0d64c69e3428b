use ndarray::ArrayView2;

use crate::*;

/// External view of the board, fed a read-only copy of the visibility grid.
pub trait RenderHook {
    fn render(&mut self, view: ArrayView2<'_, i8>);
}

/// Draws the board as text, `#` for unopened cells and `.` for zeros.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextRenderer {
    frame: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rendered frame.
    pub fn frame(&self) -> &str {
        &self.frame
    }
}

impl RenderHook for TextRenderer {
    fn render(&mut self, view: ArrayView2<'_, i8>) {
        self.frame.clear();
        for row in view.rows() {
            for &cell in row {
                let glyph = match cell {
                    UNOPENED => '#',
                    0 => '.',
                    count @ 1..=8 => char::from(b'0' + count as u8),
                    _ => '?',
                };
                self.frame.push(glyph);
            }
            self.frame.push('\n');
        }
    }
}
