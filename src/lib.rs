// Dashboard grid engine - sparse occupancy matrix, first-fit block packing
// and the stateless layout operations that keep a widget dashboard valid
// while the user edits it.

pub mod config;
pub mod grid;
pub mod grid_display;
pub mod layout;

pub use config::{Breakpoint, WidgetSize};
pub use grid::{
    CellState, GridEntry, GridError, GridMatrix, GridResult, ItemId, Placement, Position, Scale,
};
pub use grid_display::{render_grid, DisplayOptions};
pub use layout::{
    add_widget, initialize_grid, move_widget, refresh_entries, remove_widget, resize_widget,
    widgets_from_json, ChartType, DashboardEntry, InitializedGrid, LayoutError, LayoutResult,
    WidgetData,
};
