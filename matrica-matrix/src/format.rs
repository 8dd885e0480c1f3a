//! Bordered grid rendering

use std::fmt;
use matrica_core::{display_width, format_real, Real};
use crate::types::Matrix;

/// Running maximum of rendered widths, fed by the pass that writes entries
#[derive(Debug, Default)]
pub(crate) struct WidthTracker {
    max: Option<usize>,
}

impl WidthTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `value` and hand it back so writes can be chained
    pub(crate) fn observe(&mut self, value: Real) -> Real {
        let w = display_width(value);
        self.max = Some(self.max.map_or(w, |m| m.max(w)));
        value
    }

    pub(crate) fn finish(self) -> usize {
        self.max.unwrap_or(1)
    }
}

/// Each cell is `|`, the entry padded to `max_width`, then two spaces; rows
/// end in `|` and every row is followed by a dashed border.
///
/// ```text
/// ---------------
/// |1     |-2.5  |
/// ---------------
/// |30    |4     |
/// ---------------
/// ```
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_width;
        let border = "-".repeat((width + 2 + 1) * self.cols + 1);

        writeln!(f, "{}", border)?;
        for row in self.data.chunks(self.cols) {
            for &value in row {
                write!(f, "|{:<width$}  ", format_real(value), width = width)?;
            }
            writeln!(f, "|")?;
            writeln!(f, "{}", border)?;
        }
        Ok(())
    }
}

impl Matrix {
    /// Render as a bordered grid
    pub fn render(&self) -> String {
        self.to_string()
    }
}
