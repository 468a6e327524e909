//! Grid and pixel coordinate spaces and the transform linking them.

use serde::{Deserialize, Serialize};

use crate::{SimulationError, ViewportConfig};

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Straight-line distance between two cells measured in cells.
    #[must_use]
    pub fn euclidean_distance(self, other: CellCoord) -> f32 {
        let columns = self.column.abs_diff(other.column) as f32;
        let rows = self.row.abs_diff(other.row) as f32;
        columns.hypot(rows)
    }
}

/// Cardinal movement directions. Rows grow downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in blast propagation order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset `(column, row)` of the direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Signed grid position produced by [`CoordinateModel::to_grid`].
///
/// Pixel positions left of or above the grid map to negative indices, so the
/// type is signed and bounds are checked separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPoint {
    /// Column index, possibly outside the grid.
    pub column: i64,
    /// Row index, possibly outside the grid.
    pub row: i64,
}

impl GridPoint {
    /// Creates a new signed grid point.
    #[must_use]
    pub const fn new(column: i64, row: i64) -> Self {
        Self { column, row }
    }

    /// Point one step away in `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (column, row) = direction.offset();
        Self {
            column: self.column + column,
            row: self.row + row,
        }
    }

    /// Converts to a cell when the point lies within `columns × rows`.
    #[must_use]
    pub fn to_cell(self, columns: u32, rows: u32) -> Option<CellCoord> {
        let column = u32::try_from(self.column).ok()?;
        let row = u32::try_from(self.row).ok()?;
        (column < columns && row < rows).then_some(CellCoord::new(column, row))
    }
}

impl From<CellCoord> for GridPoint {
    fn from(cell: CellCoord) -> Self {
        Self::new(i64::from(cell.column()), i64::from(cell.row()))
    }
}

/// Rendered position measured in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PixelPoint {
    /// Horizontal offset from the viewport's left edge.
    pub x: f32,
    /// Vertical offset from the viewport's top edge.
    pub y: f32,
}

impl PixelPoint {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Bidirectional mapping between pixel space and grid cells.
///
/// The grid is centred inside the viewport; a cell's pixel position is its
/// top-left corner. Pure: every method depends only on the dimensions captured
/// at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateModel {
    origin: PixelPoint,
    cell_extent: f32,
    columns: u32,
    rows: u32,
}

impl CoordinateModel {
    /// Builds the transform for a `columns × rows` grid inside `viewport`.
    pub fn new(viewport: &ViewportConfig, columns: u32, rows: u32) -> Result<Self, SimulationError> {
        if columns == 0 || rows == 0 {
            return Err(SimulationError::illegal(
                "grid dimensions",
                "columns and rows must be > 0",
            ));
        }
        let cell_extent = viewport.tile_size * viewport.scale;
        if !(cell_extent.is_finite() && cell_extent > 0.0) {
            return Err(SimulationError::illegal(
                "viewport.tile_size",
                "scaled tile size must be positive",
            ));
        }
        let grid_width = columns as f32 * cell_extent;
        let grid_height = rows as f32 * cell_extent;
        Ok(Self {
            origin: PixelPoint::new(
                (viewport.width - grid_width) / 2.0,
                (viewport.height - grid_height) / 2.0,
            ),
            cell_extent,
            columns,
            rows,
        })
    }

    /// Pixel position of the grid's top-left corner.
    #[must_use]
    pub const fn origin(&self) -> PixelPoint {
        self.origin
    }

    /// Side length of a cell on screen (tile size times scale).
    #[must_use]
    pub const fn cell_extent(&self) -> f32 {
        self.cell_extent
    }

    /// Grid dimensions captured by the transform.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Pixel position of the provided cell.
    #[must_use]
    pub fn to_pixel(&self, cell: CellCoord) -> PixelPoint {
        PixelPoint::new(
            self.origin.x + cell.column() as f32 * self.cell_extent,
            self.origin.y + cell.row() as f32 * self.cell_extent,
        )
    }

    /// Nearest grid point to the provided pixel position.
    ///
    /// Rounds rather than truncates so integer speed steps that drift by a
    /// fraction of a pixel still resolve to the intended cell.
    #[must_use]
    pub fn to_grid(&self, pixel: PixelPoint) -> GridPoint {
        GridPoint::new(
            ((pixel.x - self.origin.x) / self.cell_extent).round() as i64,
            ((pixel.y - self.origin.y) / self.cell_extent).round() as i64,
        )
    }

    /// Cell nearest to `pixel`, or `None` when it falls outside the grid.
    #[must_use]
    pub fn cell_at(&self, pixel: PixelPoint) -> Option<CellCoord> {
        self.to_grid(pixel).to_cell(self.columns, self.rows)
    }

    /// Pixel position reached by moving `speed` pixels in `direction`.
    #[must_use]
    pub fn step(&self, pixel: PixelPoint, direction: Direction, speed: u32) -> PixelPoint {
        let (column, row) = direction.offset();
        let distance = speed as f32;
        PixelPoint::new(
            pixel.x + column as f32 * distance,
            pixel.y + row as f32 * distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(columns: u32, rows: u32) -> CoordinateModel {
        CoordinateModel::new(&ViewportConfig::default(), columns, rows).expect("model")
    }

    #[test]
    fn grid_is_centred_in_viewport() {
        let model = model(5, 5);
        assert_eq!(model.origin(), PixelPoint::new(320.0, 220.0));
    }

    #[test]
    fn pixel_and_grid_round_trip_for_every_cell() {
        let model = model(13, 11);
        for row in 0..11 {
            for column in 0..13 {
                let cell = CellCoord::new(column, row);
                assert_eq!(model.cell_at(model.to_pixel(cell)), Some(cell));
            }
        }
    }

    #[test]
    fn to_grid_rounds_to_nearest_cell() {
        let model = model(5, 5);
        let pixel = model.to_pixel(CellCoord::new(2, 2));
        let nudged = PixelPoint::new(pixel.x + 17.0, pixel.y - 15.0);
        assert_eq!(model.to_grid(nudged), GridPoint::new(3, 2));
    }

    #[test]
    fn pixels_outside_grid_have_no_cell() {
        let model = model(5, 5);
        let origin = model.origin();
        let left = PixelPoint::new(origin.x - 20.0, origin.y);
        assert_eq!(model.to_grid(left), GridPoint::new(-1, 0));
        assert_eq!(model.cell_at(left), None);
    }

    #[test]
    fn scale_multiplies_cell_extent() {
        let viewport = ViewportConfig {
            scale: 2.0,
            ..ViewportConfig::default()
        };
        let model = CoordinateModel::new(&viewport, 4, 4).expect("model");
        assert!((model.cell_extent() - 64.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(CoordinateModel::new(&ViewportConfig::default(), 0, 3).is_err());
    }
}
