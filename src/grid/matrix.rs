// Occupancy matrix - which widget holds which cell, the first-fit allocator,
// and the mutation operations that keep the packing valid.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::grid::{GridError, GridResult};

/// Identifier of a placed widget. Ids are assigned monotonically, start at 1,
/// and are never reused after removal.
pub type ItemId = u32;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Occupied(ItemId),
}

impl CellState {
    pub fn occupant(self) -> Option<ItemId> {
        match self {
            CellState::Occupied(item_id) => Some(item_id),
            CellState::Empty => None,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, CellState::Empty)
    }
}

/// Footprint of a widget in cells: columns wide by rows tall.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Scale {
    pub cols: usize,
    pub rows: usize,
}

impl Scale {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Top-left cell coordinate of a placement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A placed widget as the grid sees it: id, footprint and anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub item_id: ItemId,
    pub scale: Scale,
    pub position: Position,
}

/// One entry of the ordered render list: either an empty cell or the
/// first-seen cell of a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridEntry {
    Empty {
        position: Position,
    },
    Item {
        item_id: ItemId,
        scale: Scale,
        position: Position,
    },
}

impl GridEntry {
    pub fn position(&self) -> Position {
        match self {
            GridEntry::Empty { position } | GridEntry::Item { position, .. } => *position,
        }
    }

    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            GridEntry::Item { item_id, .. } => Some(*item_id),
            GridEntry::Empty { .. } => None,
        }
    }
}

/// The occupancy matrix. Rows are appended as placements need them; every row
/// is always exactly `col_count` cells wide, so the grid stays rectangular
/// through every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMatrix {
    cells: Vec<Vec<CellState>>,
    col_count: usize,
    item_index: ItemId,
}

impl GridMatrix {
    /// Create an empty grid with no rows yet. Rows appear with the first
    /// placement.
    pub fn new(col_count: usize) -> Self {
        Self {
            cells: Vec::new(),
            col_count,
            item_index: 0,
        }
    }

    /// Wrap an existing cell matrix, deriving the id counter from the highest
    /// placed id. Used when rebuilding a sub-range of rows.
    fn from_cells(cells: Vec<Vec<CellState>>, col_count: usize) -> Self {
        let item_index = cells
            .iter()
            .flatten()
            .filter_map(|cell| cell.occupant())
            .max()
            .unwrap_or(0);
        Self {
            cells,
            col_count,
            item_index,
        }
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    /// Highest id ever assigned by this grid.
    pub fn last_item_id(&self) -> ItemId {
        self.item_index
    }

    pub fn cells(&self) -> &[Vec<CellState>] {
        &self.cells
    }

    /// Occupant of a cell, `None` for empty or out-of-range positions.
    pub fn occupant(&self, position: Position) -> Option<ItemId> {
        self.cells
            .get(position.row)?
            .get(position.col)?
            .occupant()
    }

    fn add_rows(&mut self, count: usize) {
        for _ in 0..count {
            self.cells.push(vec![CellState::Empty; self.col_count]);
        }
    }

    fn validate_scale(&self, scale: Scale) -> GridResult<()> {
        if scale.cols < 1 || scale.rows < 1 {
            return Err(GridError::InvalidScale {
                cols: scale.cols,
                rows: scale.rows,
            });
        }
        if scale.cols > self.col_count {
            return Err(GridError::ScaleTooWide {
                cols: scale.cols,
                col_count: self.col_count,
            });
        }
        Ok(())
    }

    /// Every column where `row` starts a run of at least `width` empty cells.
    /// A wider run contributes all of its start offsets.
    fn empty_run_starts(&self, row: usize, width: usize) -> Vec<usize> {
        let cells = &self.cells[row];
        let mut starts = Vec::new();
        if width > cells.len() {
            return starts;
        }
        for col in 0..=cells.len() - width {
            if cells[col..col + width].iter().all(|cell| cell.is_empty()) {
                starts.push(col);
            }
        }
        starts
    }

    /// First-fit search for a free `scale` rectangle in row-major order,
    /// extending the grid downward when nothing fits. Extension never
    /// relocates an existing placement.
    pub fn allocate(&mut self, scale: Scale) -> GridResult<Position> {
        self.validate_scale(scale)?;

        if self.cells.is_empty() {
            self.add_rows(scale.rows);
            return Ok(Position::new(0, 0));
        }

        for start_row in 0..self.cells.len() {
            if start_row + scale.rows > self.cells.len() {
                break;
            }
            // Candidate columns are the intersection of every band row's
            // empty runs; the top-most row then left-most column wins.
            let mut candidates = self.empty_run_starts(start_row, scale.cols);
            for row in start_row + 1..start_row + scale.rows {
                if candidates.is_empty() {
                    break;
                }
                let below = self.empty_run_starts(row, scale.cols);
                candidates.retain(|col| below.contains(col));
            }
            if let Some(&col) = candidates.first() {
                return Ok(Position::new(start_row, col));
            }
        }

        // Nothing fits in the existing rows. If the last row still has a wide
        // enough run, anchor there and grow only the rest of the band.
        let last_row = self.cells.len() - 1;
        if let Some(&col) = self.empty_run_starts(last_row, scale.cols).first() {
            self.add_rows(scale.rows - 1);
            return Ok(Position::new(last_row, col));
        }

        let first_new_row = self.cells.len();
        self.add_rows(scale.rows);
        Ok(Position::new(first_new_row, 0))
    }

    /// Allocate a rectangle and stamp an id into it. With no explicit id the
    /// counter advances and the new value is used; an explicit id (identity-
    /// preserving reinsertion) leaves fresh-id assignment monotone.
    pub fn insert(&mut self, scale: Scale, explicit_id: Option<ItemId>) -> GridResult<Placement> {
        if let Some(item_id) = explicit_id {
            if item_id == 0 {
                return Err(GridError::InvalidItemId(item_id));
            }
            if self.position_of(item_id).is_some() {
                return Err(GridError::DuplicateItem(item_id));
            }
        }

        let position = self.allocate(scale)?;
        let item_id = match explicit_id {
            Some(item_id) => {
                self.item_index = self.item_index.max(item_id);
                item_id
            }
            None => {
                self.item_index += 1;
                self.item_index
            }
        };

        self.fill_rect(position, scale, CellState::Occupied(item_id));
        debug!("placed item {} as {} at {}", item_id, scale, position);

        Ok(Placement {
            item_id,
            scale,
            position,
        })
    }

    /// Clear every cell held by `item_id`. Unknown ids are a no-op. The grid
    /// keeps its shape; only reconciliation recomputes it.
    pub fn remove(&mut self, item_id: ItemId) {
        let cleared = self.clear_item(item_id);
        if cleared > 0 {
            debug!("removed item {} ({} cells)", item_id, cleared);
        }
    }

    /// Move an item's whole rectangle so its anchor lands on `dest`. The
    /// destination must stay inside the columns and collide with nothing but
    /// the item itself; rows grow downward as needed. Unknown ids are a
    /// no-op. On error the grid is untouched.
    pub fn move_to(&mut self, item_id: ItemId, dest: Position) -> GridResult<()> {
        let Some((_, scale)) = self.rect_of(item_id) else {
            return Ok(());
        };

        if dest.col + scale.cols > self.col_count {
            return Err(GridError::OutOfBounds {
                row: dest.row,
                col: dest.col,
                col_count: self.col_count,
            });
        }
        for row in dest.row..(dest.row + scale.rows).min(self.row_count()) {
            for col in dest.col..dest.col + scale.cols {
                if let Some(occupant) = self.cells[row][col].occupant() {
                    if occupant != item_id {
                        return Err(GridError::CellConflict { row, col, occupant });
                    }
                }
            }
        }

        self.clear_item(item_id);
        let needed_rows = dest.row + scale.rows;
        if needed_rows > self.row_count() {
            let missing = needed_rows - self.row_count();
            self.add_rows(missing);
        }
        self.fill_rect(dest, scale, CellState::Occupied(item_id));
        debug!("moved item {} to {}", item_id, dest);
        Ok(())
    }

    /// Exchange the footprints of two items: each takes over the other's
    /// exact rectangle, so the placement invariant holds for any shape pair
    /// and equal scales swap positions exactly. A no-op unless both ids are
    /// placed.
    pub fn swap(&mut self, source_id: ItemId, dest_id: ItemId) {
        if source_id == dest_id {
            return;
        }
        let (Some((source_pos, source_scale)), Some((dest_pos, dest_scale))) =
            (self.rect_of(source_id), self.rect_of(dest_id))
        else {
            return;
        };

        self.clear_item(source_id);
        self.clear_item(dest_id);
        self.fill_rect(dest_pos, dest_scale, CellState::Occupied(source_id));
        self.fill_rect(source_pos, source_scale, CellState::Occupied(dest_id));
        debug!("swapped items {} and {}", source_id, dest_id);
    }

    /// Rebuild the layout from the item's anchor row downward with the item
    /// at `new_scale`. Rows above never reflow; items below shift only as far
    /// as the new size forces, because reinsertion replays the same first-fit
    /// order. Unknown ids are a no-op.
    pub fn resize(&mut self, item_id: ItemId, new_scale: Scale) -> GridResult<()> {
        self.validate_scale(new_scale)?;
        let Some(anchor) = self.position_of(item_id) else {
            return Ok(());
        };

        let lower = self.cells[anchor.row..].to_vec();
        let mut sub = GridMatrix::from_cells(lower, self.col_count);
        let items = sub.placements();
        sub.reset(self.col_count);
        for placement in &items {
            let scale = if placement.item_id == item_id {
                new_scale
            } else {
                placement.scale
            };
            sub.insert(scale, Some(placement.item_id))?;
        }

        self.cells.truncate(anchor.row);
        self.cells.append(&mut sub.cells);
        info!("resized item {} to {}", item_id, new_scale);
        Ok(())
    }

    /// Rebuild the whole layout from scratch, optionally at a new column
    /// count, preserving item identities and their discovery order. Running
    /// it twice at the same width yields an identical list.
    pub fn reconcile(&mut self, new_col_count: Option<usize>) -> GridResult<()> {
        let col_count = new_col_count.unwrap_or(self.col_count);
        if col_count == 0 {
            return Err(GridError::InvalidColumnCount(col_count));
        }

        let items = self.placements();
        for placement in &items {
            if placement.scale.cols > col_count {
                return Err(GridError::ScaleTooWide {
                    cols: placement.scale.cols,
                    col_count,
                });
            }
        }

        let mut rebuilt = GridMatrix::new(col_count);
        rebuilt.item_index = self.item_index;
        for placement in &items {
            rebuilt.insert(placement.scale, Some(placement.item_id))?;
        }

        *self = rebuilt;
        info!(
            "reconciled grid to {} columns ({} items)",
            col_count,
            items.len()
        );
        Ok(())
    }

    /// Bounding box of an item's cells. The placement invariant keeps every
    /// item an exact rectangle, so min/max row and column describe it fully.
    pub fn rect_of(&self, item_id: ItemId) -> Option<(Position, Scale)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if *cell == CellState::Occupied(item_id) {
                    bounds = Some(match bounds {
                        None => (row, col, row, col),
                        Some((min_row, min_col, max_row, max_col)) => (
                            min_row.min(row),
                            min_col.min(col),
                            max_row.max(row),
                            max_col.max(col),
                        ),
                    });
                }
            }
        }
        bounds.map(|(min_row, min_col, max_row, max_col)| {
            (
                Position::new(min_row, min_col),
                Scale::new(max_col - min_col + 1, max_row - min_row + 1),
            )
        })
    }

    pub fn scale_of(&self, item_id: ItemId) -> Option<Scale> {
        self.rect_of(item_id).map(|(_, scale)| scale)
    }

    pub fn position_of(&self, item_id: ItemId) -> Option<Position> {
        self.rect_of(item_id).map(|(position, _)| position)
    }

    /// The derived render list: a row-major scan emitting one entry per empty
    /// cell and one entry per item at its first-seen (top-left) cell.
    pub fn ordered_list(&self) -> Vec<GridEntry> {
        let rects = self.item_rects();
        let mut entries = Vec::new();
        let mut seen: HashSet<ItemId> = HashSet::new();

        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let position = Position::new(row, col);
                match cell.occupant() {
                    Some(item_id) => {
                        if seen.insert(item_id) {
                            if let Some(&(_, scale)) = rects.get(&item_id) {
                                entries.push(GridEntry::Item {
                                    item_id,
                                    scale,
                                    position,
                                });
                            }
                        }
                    }
                    None => entries.push(GridEntry::Empty { position }),
                }
            }
        }

        entries
    }

    /// Placed items in row-major discovery order.
    pub fn placements(&self) -> Vec<Placement> {
        self.ordered_list()
            .into_iter()
            .filter_map(|entry| match entry {
                GridEntry::Item {
                    item_id,
                    scale,
                    position,
                } => Some(Placement {
                    item_id,
                    scale,
                    position,
                }),
                GridEntry::Empty { .. } => None,
            })
            .collect()
    }

    fn item_rects(&self) -> HashMap<ItemId, (Position, Scale)> {
        let mut bounds: HashMap<ItemId, (usize, usize, usize, usize)> = HashMap::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(item_id) = cell.occupant() {
                    bounds
                        .entry(item_id)
                        .and_modify(|(min_row, min_col, max_row, max_col)| {
                            *min_row = (*min_row).min(row);
                            *min_col = (*min_col).min(col);
                            *max_row = (*max_row).max(row);
                            *max_col = (*max_col).max(col);
                        })
                        .or_insert((row, col, row, col));
                }
            }
        }
        bounds
            .into_iter()
            .map(|(item_id, (min_row, min_col, max_row, max_col))| {
                (
                    item_id,
                    (
                        Position::new(min_row, min_col),
                        Scale::new(max_col - min_col + 1, max_row - min_row + 1),
                    ),
                )
            })
            .collect()
    }

    fn fill_rect(&mut self, position: Position, scale: Scale, value: CellState) {
        for row in position.row..position.row + scale.rows {
            for col in position.col..position.col + scale.cols {
                self.cells[row][col] = value;
            }
        }
    }

    fn clear_item(&mut self, item_id: ItemId) -> usize {
        let mut cleared = 0;
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                if *cell == CellState::Occupied(item_id) {
                    *cell = CellState::Empty;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    fn reset(&mut self, col_count: usize) {
        self.cells.clear();
        self.col_count = col_count;
    }
}
