// Layout operations - the stateless layer between UI events and the grid.
// Every operation mutates the shared grid in place and returns a freshly
// merged render list; the caller's previous list is never modified.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{Breakpoint, WidgetSize};
use crate::grid::{GridEntry, GridError, GridMatrix, ItemId, Position, Scale};

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors raised at the layout boundary. Structural no-ops (stale ids from
/// drag races) are not errors; data-contract violations are.
#[derive(Debug)]
pub enum LayoutError {
    /// The widget payload feed violated its data contract
    Payload(serde_json::Error),
    /// A placed scale belongs to no declared size class
    UnmappedScale(Scale),
    /// A placed item has no payload in the caller's list
    MissingWidget(ItemId),
    /// A slot index beyond the caller's list
    SlotOutOfRange { slot: usize, len: usize },
    /// A structural grid failure
    Grid(GridError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Payload(err) => write!(f, "Invalid widget payload: {}", err),
            LayoutError::UnmappedScale(scale) => {
                write!(f, "Scale {} belongs to no declared size class", scale)
            }
            LayoutError::MissingWidget(item_id) => {
                write!(f, "Placed item {} has no widget payload", item_id)
            }
            LayoutError::SlotOutOfRange { slot, len } => {
                write!(f, "Slot {} is outside the {}-entry list", slot, len)
            }
            LayoutError::Grid(err) => write!(f, "Grid operation failed: {}", err),
        }
    }
}

impl std::error::Error for LayoutError {}

impl From<GridError> for LayoutError {
    fn from(err: GridError) -> Self {
        LayoutError::Grid(err)
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        LayoutError::Payload(err)
    }
}

/// Chart variants the dashboard can draw. Anything else in a payload is a
/// contract violation from the remote source and fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartType {
    #[serde(rename = "BAR_CHART")]
    Bar,
    #[serde(rename = "PIE_CHART")]
    Pie,
    #[serde(rename = "LINE_CHART")]
    Line,
    #[serde(rename = "TABLE_CHART")]
    Table,
}

/// Caller-owned widget payload. The grid never stores any of this; the
/// layout layer merges it back onto structural entries by item id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetData {
    pub title: String,
    pub chart_type: ChartType,
    #[serde(default)]
    pub goal: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
    pub size: WidgetSize,
}

/// One entry of the merged render list the host draws in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DashboardEntry {
    Empty {
        position: Position,
    },
    Widget {
        item_id: ItemId,
        scale: Scale,
        position: Position,
        widget: WidgetData,
    },
}

impl DashboardEntry {
    pub fn position(&self) -> Position {
        match self {
            DashboardEntry::Empty { position } | DashboardEntry::Widget { position, .. } => {
                *position
            }
        }
    }

    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            DashboardEntry::Widget { item_id, .. } => Some(*item_id),
            DashboardEntry::Empty { .. } => None,
        }
    }

    pub fn widget(&self) -> Option<&WidgetData> {
        match self {
            DashboardEntry::Widget { widget, .. } => Some(widget),
            DashboardEntry::Empty { .. } => None,
        }
    }
}

/// A freshly built dashboard: the merged render list plus the grid that
/// subsequent operations mutate.
#[derive(Debug, Clone)]
pub struct InitializedGrid {
    pub entries: Vec<DashboardEntry>,
    pub grid: GridMatrix,
}

/// Parse the remote source's widget feed. Unknown size-class or chart-type
/// discriminants are a data-contract violation and fail hard.
pub fn widgets_from_json(feed: &str) -> LayoutResult<Vec<WidgetData>> {
    serde_json::from_str(feed).map_err(LayoutError::Payload)
}

/// Build a grid at the breakpoint's column count and place every widget in
/// list order, each at its size class translated for that breakpoint.
pub fn initialize_grid(
    widgets: &[WidgetData],
    breakpoint: Breakpoint,
) -> LayoutResult<InitializedGrid> {
    let mut grid = GridMatrix::new(breakpoint.col_count());
    let mut payloads = HashMap::new();

    for widget in widgets {
        let scale = widget.size.scale_at(breakpoint);
        let placement = grid.insert(scale, None)?;
        payloads.insert(placement.item_id, widget.clone());
    }

    let entries = merge_entries(&grid, &payloads)?;
    debug!(
        "initialized {} widgets at {} ({} columns)",
        widgets.len(),
        breakpoint,
        grid.col_count()
    );
    Ok(InitializedGrid { entries, grid })
}

/// Drop an existing widget onto a cell. Landing on another widget swaps the
/// two footprints and the moved widget adopts the destination's former size
/// class; landing on an empty cell moves the whole rectangle there.
pub fn move_widget(
    source_id: ItemId,
    dest: Position,
    entries: &[DashboardEntry],
    grid: &mut GridMatrix,
) -> LayoutResult<Vec<DashboardEntry>> {
    let mut payloads = payload_map(entries);

    match grid.occupant(dest) {
        Some(dest_id) if dest_id != source_id => {
            let dest_scale = grid.scale_of(dest_id).unwrap_or(Scale::new(1, 1));
            let adopted = WidgetSize::from_scale(dest_scale)
                .ok_or(LayoutError::UnmappedScale(dest_scale))?;
            grid.swap(source_id, dest_id);
            if let Some(widget) = payloads.get_mut(&source_id) {
                widget.size = adopted;
            }
        }
        _ => grid.move_to(source_id, dest)?,
    }

    merge_entries(grid, &payloads)
}

/// Drop a brand-new widget onto the dashboard: a 1x1 placeholder cell is
/// allocated (the real footprint arrives with the follow-up resize) and the
/// widget replaces the entry at the slot it was dropped on.
pub fn add_widget(
    widget: WidgetData,
    slot: usize,
    entries: &[DashboardEntry],
    grid: &mut GridMatrix,
) -> LayoutResult<Vec<DashboardEntry>> {
    if slot >= entries.len() {
        return Err(LayoutError::SlotOutOfRange {
            slot,
            len: entries.len(),
        });
    }

    let placement = grid.insert(Scale::new(1, 1), None)?;
    let mut updated = entries.to_vec();
    updated[slot] = DashboardEntry::Widget {
        item_id: placement.item_id,
        scale: placement.scale,
        position: placement.position,
        widget,
    };
    Ok(updated)
}

/// Remove a widget and re-merge the remaining payloads. Stale ids from drag
/// races are a silent no-op.
pub fn remove_widget(
    item_id: ItemId,
    entries: &[DashboardEntry],
    grid: &mut GridMatrix,
) -> LayoutResult<Vec<DashboardEntry>> {
    grid.remove(item_id);
    let payloads = payload_map(entries);
    merge_entries(grid, &payloads)
}

/// Resize a widget to a new size class at the current breakpoint and update
/// its stored class to match.
pub fn resize_widget(
    item_id: ItemId,
    new_size: WidgetSize,
    entries: &[DashboardEntry],
    grid: &mut GridMatrix,
    breakpoint: Breakpoint,
) -> LayoutResult<Vec<DashboardEntry>> {
    let scale = new_size.scale_at(breakpoint);
    grid.resize(item_id, scale)?;

    let mut payloads = payload_map(entries);
    if let Some(widget) = payloads.get_mut(&item_id) {
        widget.size = new_size;
    }
    merge_entries(grid, &payloads)
}

/// Re-merge the caller's payloads onto the grid's current ordered list
/// without mutating anything. Used after grid-level reconciliation when the
/// column count changes.
pub fn refresh_entries(
    entries: &[DashboardEntry],
    grid: &GridMatrix,
) -> LayoutResult<Vec<DashboardEntry>> {
    merge_entries(grid, &payload_map(entries))
}

fn payload_map(entries: &[DashboardEntry]) -> HashMap<ItemId, WidgetData> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            DashboardEntry::Widget {
                item_id, widget, ..
            } => Some((*item_id, widget.clone())),
            DashboardEntry::Empty { .. } => None,
        })
        .collect()
}

fn merge_entries(
    grid: &GridMatrix,
    payloads: &HashMap<ItemId, WidgetData>,
) -> LayoutResult<Vec<DashboardEntry>> {
    grid.ordered_list()
        .into_iter()
        .map(|entry| match entry {
            GridEntry::Empty { position } => Ok(DashboardEntry::Empty { position }),
            GridEntry::Item {
                item_id,
                scale,
                position,
            } => {
                let widget = payloads
                    .get(&item_id)
                    .cloned()
                    .ok_or(LayoutError::MissingWidget(item_id))?;
                Ok(DashboardEntry::Widget {
                    item_id,
                    scale,
                    position,
                    widget,
                })
            }
        })
        .collect()
}
