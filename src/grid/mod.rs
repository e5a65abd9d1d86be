// Grid module - the occupancy matrix and its mutation operations

pub mod matrix;

pub use matrix::{CellState, GridEntry, GridMatrix, ItemId, Placement, Position, Scale};

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur during grid operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A requested scale has a zero dimension
    InvalidScale { cols: usize, rows: usize },
    /// A requested scale is wider than the grid
    ScaleTooWide { cols: usize, col_count: usize },
    /// An explicit item id of zero was supplied
    InvalidItemId(ItemId),
    /// An explicit item id is already placed
    DuplicateItem(ItemId),
    /// A destination rectangle falls outside the grid columns
    OutOfBounds {
        row: usize,
        col: usize,
        col_count: usize,
    },
    /// A destination cell is already held by another item
    CellConflict {
        row: usize,
        col: usize,
        occupant: ItemId,
    },
    /// A column count of zero was requested
    InvalidColumnCount(usize),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::InvalidScale { cols, rows } => {
                write!(
                    f,
                    "Invalid scale {}x{}, both spans must be at least 1",
                    cols, rows
                )
            }
            GridError::ScaleTooWide { cols, col_count } => {
                write!(
                    f,
                    "Scale is {} columns wide but the grid only has {}",
                    cols, col_count
                )
            }
            GridError::InvalidItemId(item_id) => {
                write!(f, "Item id {} is not a valid id, ids start at 1", item_id)
            }
            GridError::DuplicateItem(item_id) => {
                write!(f, "Item {} is already placed", item_id)
            }
            GridError::OutOfBounds {
                row,
                col,
                col_count,
            } => {
                write!(
                    f,
                    "Destination ({}, {}) does not fit a grid {} columns wide",
                    row, col, col_count
                )
            }
            GridError::CellConflict { row, col, occupant } => {
                write!(
                    f,
                    "Cell ({}, {}) is already held by item {}",
                    row, col, occupant
                )
            }
            GridError::InvalidColumnCount(count) => {
                write!(
                    f,
                    "Invalid column count {}, grids need at least 1 column",
                    count
                )
            }
        }
    }
}

impl std::error::Error for GridError {}
