//! `Grid` — fixed-size, row-major cell storage with shared snapshots.

use std::sync::Arc;

use smallvec::SmallVec;
use soil_core::{
    CellIndex, CoreError, CoreResult, GridSize, MoistureDistribution, SimRng, SimulationSetup,
};

use crate::{Cell, GridError, GridResult};

/// Offsets of the 4-connected neighbourhood: up, down, left, right.
const NEIGHBOUR_OFFSETS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A `rows × cols` moisture grid.
///
/// Dimensions never change after construction.  Clones share the cell
/// buffer; the first mutation through [`cell_mut`](Self::cell_mut) on a
/// shared grid copies it (copy-on-write), leaving every other snapshot
/// untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows:  u32,
    cols:  u32,
    cells: Arc<Vec<Cell>>,
}

impl Grid {
    // ── Construction ──────────────────────────────────────────────────────

    /// Generate the initial grid for a fresh run.
    ///
    /// `Random` moisture is drawn from a [`SimRng`] seeded with
    /// `setup.seed`, so the same setup always yields the same grid.
    pub fn generate(setup: &SimulationSetup) -> GridResult<Grid> {
        setup.validate()?;
        let GridSize { rows, cols } = setup.grid_size;
        let threshold = setup.params.moisture_threshold;
        let mut rng = SimRng::new(setup.seed);

        let mut cells = Vec::with_capacity(setup.grid_size.cell_count());
        for row in 0..rows {
            for col in 0..cols {
                let moisture = match setup.initial_moisture {
                    MoistureDistribution::Uniform(m) => m,
                    MoistureDistribution::Random     => rng.unit(),
                };
                cells.push(Cell::new(row, col, moisture, threshold));
            }
        }
        Ok(Grid { rows, cols, cells: Arc::new(cells) })
    }

    /// Build a grid from rows of cells, e.g. a restored snapshot.
    ///
    /// Rejects empty or ragged input, cells whose stored coordinates
    /// disagree with their position, and moisture outside `[0, 1]`.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> GridResult<Grid> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, Vec::len);
        if row_count == 0 || col_count == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(row_count * col_count);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != col_count {
                return Err(GridError::Ragged { row: r, expected: col_count, got: row.len() });
            }
            for (c, cell) in row.into_iter().enumerate() {
                let (r, c) = (r as u32, c as u32);
                if cell.row != r || cell.col != c {
                    return Err(GridError::Coordinates {
                        row:         r,
                        col:         c,
                        claimed_row: cell.row,
                        claimed_col: cell.col,
                    });
                }
                let m = cell.moisture();
                if !(m.is_finite() && (0.0..=1.0).contains(&m)) {
                    return Err(GridError::MoistureOutOfRange { row: r, col: c, value: m });
                }
                for name in soil_core::ParamName::ALL {
                    if let Some(v) = cell.overrides.get(name) {
                        name.validate(v)?;
                    }
                }
                cells.push(cell);
            }
        }

        Ok(Grid {
            rows:  row_count as u32,
            cols:  col_count as u32,
            cells: Arc::new(cells),
        })
    }

    /// Internal constructor for the step rule.
    pub(crate) fn from_parts(rows: u32, cols: u32, cells: Vec<Cell>) -> Grid {
        debug_assert_eq!(cells.len(), rows as usize * cols as usize);
        Grid { rows, cols, cells: Arc::new(cells) }
    }

    // ── Shape ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        GridSize { rows: self.rows, cols: self.cols }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a grid has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounds-checked `(row, col)` → [`CellIndex`].
    pub fn index_of(&self, row: u32, col: u32) -> CoreResult<CellIndex> {
        if row < self.rows && col < self.cols {
            Ok(CellIndex::from_coords(row, col, self.cols))
        } else {
            Err(CoreError::CellOutOfBounds { row, col, rows: self.rows, cols: self.cols })
        }
    }

    /// Bounds-check a raw index, e.g. one read back from an action log.
    pub fn check_index(&self, idx: CellIndex) -> CoreResult<CellIndex> {
        if idx.index() < self.cells.len() {
            Ok(idx)
        } else {
            let (row, col) = idx.coords(self.cols);
            Err(CoreError::CellOutOfBounds { row, col, rows: self.rows, cols: self.cols })
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, idx: CellIndex) -> Option<&Cell> {
        self.cells.get(idx.index())
    }

    #[inline]
    pub fn get(&self, row: u32, col: u32) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(CellIndex::from_coords(row, col, self.cols).index())
        } else {
            None
        }
    }

    /// Iterate rows as slices, top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.cols as usize)
    }

    /// Flat indices of the existing 4-neighbours of cell `i`, in
    /// up/down/left/right order.  Edge cells have fewer.
    pub fn neighbours(&self, i: usize) -> SmallVec<[usize; 4]> {
        let (rows, cols) = (self.rows as i64, self.cols as i64);
        let (r, c) = (i as i64 / cols, i as i64 % cols);
        let mut out = SmallVec::new();
        for (dr, dc) in NEIGHBOUR_OFFSETS {
            let (nr, nc) = (r + dr, c + dc);
            if (0..rows).contains(&nr) && (0..cols).contains(&nc) {
                out.push((nr * cols + nc) as usize);
            }
        }
        out
    }

    /// `true` if `self` and `other` are backed by the same cell buffer.
    #[inline]
    pub fn shares_storage_with(&self, other: &Grid) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    /// Mean moisture across all cells.
    pub fn mean_moisture(&self) -> f64 {
        self.cells.iter().map(Cell::moisture).sum::<f64>() / self.cells.len() as f64
    }

    /// Number of cells with the tap on.
    pub fn irrigating_count(&self) -> usize {
        self.cells.iter().filter(|c| c.tap_status).count()
    }

    // ── Mutation (copy-on-write) ──────────────────────────────────────────

    /// Mutable access to one cell.  Copies the buffer first if another
    /// snapshot shares it.
    pub fn cell_mut(&mut self, idx: CellIndex) -> CoreResult<&mut Cell> {
        let idx = self.check_index(idx)?;
        Ok(&mut Arc::make_mut(&mut self.cells)[idx.index()])
    }

    /// Drop every per-cell parameter override.
    pub fn clear_all_overrides(&mut self) {
        for cell in Arc::make_mut(&mut self.cells).iter_mut() {
            cell.overrides.clear_all();
        }
    }
}
