//! Tile grid owning every cell of the loaded level.

use bomb_arena_core::{
    CellCoord, CharacterId, Element, LevelLayout, LevelView, SimulationError, Square,
};

/// Rectangular grid of cells plus the registry of characters placed on it.
///
/// Dimensions are fixed at construction. The registry only records which
/// characters belong to the level; the world owns the characters themselves.
#[derive(Clone, Debug)]
pub struct LevelMap {
    columns: u32,
    rows: u32,
    squares: Vec<Square>,
    characters: Vec<CharacterId>,
}

impl LevelMap {
    /// Builds the grid from the map-load collaborator's layout.
    #[must_use]
    pub fn from_layout(layout: &LevelLayout) -> Self {
        Self {
            columns: layout.columns(),
            rows: layout.rows(),
            squares: layout.tiles().iter().copied().map(Square::from_tile).collect(),
            characters: Vec::new(),
        }
    }

    /// Dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Cell at `coord`.
    pub fn cell(&self, coord: CellCoord) -> Result<&Square, SimulationError> {
        let index = self.index(coord)?;
        Ok(&self.squares[index])
    }

    /// Mutable cell at `coord`.
    pub fn cell_mut(&mut self, coord: CellCoord) -> Result<&mut Square, SimulationError> {
        let index = self.index(coord)?;
        Ok(&mut self.squares[index])
    }

    /// Replaces the occupant of `coord` regardless of what was there.
    pub fn set_element(&mut self, coord: CellCoord, element: Element) -> Result<(), SimulationError> {
        self.cell_mut(coord)?.set_element(element);
        Ok(())
    }

    /// Removes the occupant of `coord`, if any.
    pub fn clear_element(&mut self, coord: CellCoord) -> Result<(), SimulationError> {
        let _ = self.cell_mut(coord)?.take_element();
        Ok(())
    }

    /// Whether a character may enter `coord`.
    pub fn is_walkable(&self, coord: CellCoord) -> Result<bool, SimulationError> {
        Ok(self.cell(coord)?.is_walkable())
    }

    /// Records that `character` lives on this level.
    pub fn register_character(&mut self, character: CharacterId) {
        if !self.characters.contains(&character) {
            self.characters.push(character);
        }
    }

    /// Snapshot of the registered characters in registration order.
    #[must_use]
    pub fn list_characters(&self) -> Vec<CharacterId> {
        self.characters.clone()
    }

    /// Read-only view used by renderers and systems.
    #[must_use]
    pub fn view(&self) -> LevelView<'_> {
        LevelView::new(&self.squares, self.columns, self.rows)
    }

    /// Iterates over every cell mutably, in row-major order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (CellCoord, &mut Square)> {
        let columns = self.columns;
        self.squares.iter_mut().enumerate().map(move |(index, square)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), square)
        })
    }

    fn index(&self, coord: CellCoord) -> Result<usize, SimulationError> {
        if coord.column() >= self.columns || coord.row() >= self.rows {
            return Err(SimulationError::OutOfBounds {
                column: i64::from(coord.column()),
                row: i64::from(coord.row()),
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(coord.row() as usize * self.columns as usize + coord.column() as usize)
    }
}
