// Grid Display Module - centralized text formatting so demos, logs and test
// diagnostics all show the occupancy matrix the same way.

use std::fmt::Write;

use crate::grid::GridMatrix;

/// Standard grid display configuration
pub struct DisplayOptions {
    pub show_headers: bool,
    pub compact_format: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_headers: true,
            compact_format: false,
        }
    }
}

/// Render the occupancy matrix as text: column headers, dots for empty
/// cells, right-aligned ids for occupied ones.
pub fn render_grid(grid: &GridMatrix, options: &DisplayOptions) -> String {
    let mut out = String::new();

    if options.show_headers {
        if !options.compact_format {
            let _ = writeln!(out, "{}", "=".repeat(40));
        }
        let _ = writeln!(
            out,
            "Dashboard Grid - {}x{} ({} widgets)",
            grid.row_count(),
            grid.col_count(),
            grid.placements().len()
        );
        if !options.compact_format {
            let _ = writeln!(out, "{}", "=".repeat(40));
        }
    }

    let _ = write!(out, "    ");
    for col in 0..grid.col_count() {
        let _ = write!(out, " {:2}", col);
    }
    let _ = writeln!(out);

    for (row, cells) in grid.cells().iter().enumerate() {
        let _ = write!(out, "{:2}: ", row);
        for cell in cells.iter() {
            match cell.occupant() {
                // Two digits keep columns aligned; ids stay small in practice
                Some(item_id) => {
                    let _ = write!(out, " {:2}", item_id % 100);
                }
                None => {
                    let _ = write!(out, "  .");
                }
            }
        }
        let _ = writeln!(out);
    }

    out
}
