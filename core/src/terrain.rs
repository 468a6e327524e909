//! Cell contents: terrain, bombs, explosions and bonuses.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, CharacterId, CoordinateModel, Direction, PixelPoint, SimulationError};

/// Opaque reference to a background texture, passed through for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(u32);

impl TextureId {
    /// Creates a texture reference with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the reference.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Terrain classification supplied by the map-load collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open floor.
    Empty,
    /// Wall that blasts destroy.
    Breakable,
    /// Permanent wall.
    Unbreakable,
}

/// Initial description of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    /// Terrain occupying the cell at load time.
    pub terrain: Terrain,
    /// Background texture drawn beneath any occupant.
    pub texture: TextureId,
}

impl TileSpec {
    /// Creates a new tile description.
    #[must_use]
    pub const fn new(terrain: Terrain, texture: TextureId) -> Self {
        Self { terrain, texture }
    }
}

/// Rectangular grid of tiles handed to the world when a level loads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    columns: u32,
    rows: u32,
    tiles: Vec<TileSpec>,
}

impl LevelLayout {
    /// Creates a layout from row-major tiles.
    ///
    /// Fails when either dimension is zero or the tile count does not match.
    pub fn new(columns: u32, rows: u32, tiles: Vec<TileSpec>) -> Result<Self, SimulationError> {
        if columns == 0 || rows == 0 {
            return Err(SimulationError::InvalidLayout(format!(
                "dimensions must be positive, got {columns}x{rows}"
            )));
        }
        let expected = u64::from(columns) * u64::from(rows);
        if tiles.len() as u64 != expected {
            return Err(SimulationError::InvalidLayout(format!(
                "expected {expected} tiles for {columns}x{rows}, got {}",
                tiles.len()
            )));
        }
        Ok(Self {
            columns,
            rows,
            tiles,
        })
    }

    /// Creates a layout from nested rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<TileSpec>>) -> Result<Self, SimulationError> {
        let row_count = u32::try_from(rows.len())
            .map_err(|_| SimulationError::InvalidLayout("too many rows".to_owned()))?;
        let width = rows.first().map_or(0, Vec::len);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            return Err(SimulationError::InvalidLayout(format!(
                "row {index} has {} tiles, expected {width}",
                row.len()
            )));
        }
        let columns = u32::try_from(width)
            .map_err(|_| SimulationError::InvalidLayout("too many columns".to_owned()))?;
        Self::new(columns, row_count, rows.into_iter().flatten().collect())
    }

    /// Creates a layout where every cell shares the same terrain and texture.
    pub fn filled(columns: u32, rows: u32, tile: TileSpec) -> Result<Self, SimulationError> {
        let count = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| SimulationError::InvalidLayout("layout too large".to_owned()))?;
        Self::new(columns, rows, vec![tile; count])
    }

    /// Overrides the terrain of a single cell.
    pub fn set_terrain(&mut self, cell: CellCoord, terrain: Terrain) -> Result<(), SimulationError> {
        let index = self.index(cell)?;
        self.tiles[index].terrain = terrain;
        Ok(())
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Row-major tile descriptions.
    #[must_use]
    pub fn tiles(&self) -> &[TileSpec] {
        &self.tiles
    }

    fn index(&self, cell: CellCoord) -> Result<usize, SimulationError> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return Err(SimulationError::OutOfBounds {
                column: i64::from(cell.column()),
                row: i64::from(cell.row()),
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(cell.row() as usize * self.columns as usize + cell.column() as usize)
    }
}

/// Kinds of wall occupying a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    /// Permanent: blocks movement and stops blasts without being affected.
    Unbreakable,
    /// Blocks movement; a blast destroys it and stops on it.
    Breakable,
}

/// One-shot effects granted to the player who picks them up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// Adds one bomb to the inventory.
    AddBomb,
    /// Adds one life.
    AddLife,
    /// Raises the movement speed.
    AddSpeed,
    /// Unlocks trigger bombs for the bomb-type selector.
    UnlockTriggerBomb,
}

impl BonusKind {
    /// Every bonus kind in a stable order.
    pub const ALL: [BonusKind; 4] = [
        BonusKind::AddBomb,
        BonusKind::AddLife,
        BonusKind::AddSpeed,
        BonusKind::UnlockTriggerBomb,
    ];
}

/// Unique identifier assigned to a bomb, increasing in drop order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BombId(u32);

impl BombId {
    /// Creates a new bomb identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Bomb types a player can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BombKind {
    /// Counts down every tick and detonates at zero.
    Time,
    /// Detonates only when its owner activates trigger bombs.
    Trigger,
}

/// Detonation mechanism of a placed bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fuse {
    /// Ticks left before the bomb detonates on its own.
    Timed {
        /// Remaining ticks; the bomb detonates on the tick this reaches zero.
        remaining_ticks: u32,
    },
    /// Armed until its owner sends the trigger.
    Trigger,
}

/// Lifecycle of a bomb. `Exploded` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BombState {
    /// Sitting on its cell waiting to detonate.
    Placed,
    /// Detonated; the bomb is discarded once its blast has run.
    Exploded,
}

/// Bomb sitting on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bomb {
    id: BombId,
    owner: CharacterId,
    power: u32,
    fuse: Fuse,
    state: BombState,
}

impl Bomb {
    /// Creates a bomb that detonates after `fuse_ticks` ticks.
    pub fn timed(
        id: BombId,
        owner: CharacterId,
        power: u32,
        fuse_ticks: u32,
    ) -> Result<Self, SimulationError> {
        if fuse_ticks == 0 {
            return Err(SimulationError::illegal("fuse_ticks", "must be > 0"));
        }
        Self::with_fuse(
            id,
            owner,
            power,
            Fuse::Timed {
                remaining_ticks: fuse_ticks,
            },
        )
    }

    /// Creates a bomb that waits for its owner's trigger.
    pub fn trigger(id: BombId, owner: CharacterId, power: u32) -> Result<Self, SimulationError> {
        Self::with_fuse(id, owner, power, Fuse::Trigger)
    }

    fn with_fuse(
        id: BombId,
        owner: CharacterId,
        power: u32,
        fuse: Fuse,
    ) -> Result<Self, SimulationError> {
        if power == 0 {
            return Err(SimulationError::illegal("bomb power", "must be > 0"));
        }
        Ok(Self {
            id,
            owner,
            power,
            fuse,
            state: BombState::Placed,
        })
    }

    /// Identifier of the bomb.
    #[must_use]
    pub const fn id(&self) -> BombId {
        self.id
    }

    /// Player the bomb is attributed to.
    #[must_use]
    pub const fn owner(&self) -> CharacterId {
        self.owner
    }

    /// Blast radius in cells.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.power
    }

    /// Current fuse.
    #[must_use]
    pub const fn fuse(&self) -> Fuse {
        self.fuse
    }

    /// Kind of bomb derived from the fuse.
    #[must_use]
    pub const fn kind(&self) -> BombKind {
        match self.fuse {
            Fuse::Timed { .. } => BombKind::Time,
            Fuse::Trigger => BombKind::Trigger,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BombState {
        self.state
    }

    /// Advances a timed fuse by one tick, reporting whether it just expired.
    ///
    /// Trigger bombs and exploded bombs never expire.
    pub fn tick(&mut self) -> bool {
        if self.state != BombState::Placed {
            return false;
        }
        match &mut self.fuse {
            Fuse::Timed { remaining_ticks } => {
                *remaining_ticks = remaining_ticks.saturating_sub(1);
                *remaining_ticks == 0
            }
            Fuse::Trigger => false,
        }
    }

    /// Transitions `Placed → Exploded`, returning `false` if already exploded.
    pub fn mark_exploded(&mut self) -> bool {
        if self.state == BombState::Exploded {
            return false;
        }
        self.state = BombState::Exploded;
        true
    }
}

/// Transient blast left behind on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Explosion {
    remaining_ticks: u32,
    reveal: Option<BonusKind>,
}

impl Explosion {
    /// Creates an explosion lasting `lifetime` ticks that leaves `reveal` behind.
    #[must_use]
    pub const fn new(lifetime: u32, reveal: Option<BonusKind>) -> Self {
        Self {
            remaining_ticks: lifetime,
            reveal,
        }
    }

    /// Ticks left before the explosion clears.
    #[must_use]
    pub const fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    /// Bonus uncovered when the explosion clears.
    #[must_use]
    pub const fn reveal(&self) -> Option<BonusKind> {
        self.reveal
    }

    /// Ages the explosion by one tick, reporting whether it has expired.
    pub fn tick(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks == 0
    }
}

/// Single occupant of a cell beyond its background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
    /// Breakable or unbreakable wall.
    Wall(WallKind),
    /// Placed bomb.
    Bomb(Bomb),
    /// Bonus waiting to be picked up.
    Bonus(BonusKind),
    /// Transient blast.
    Explosion(Explosion),
}

impl Element {
    /// Whether the element stops characters from entering its cell.
    #[must_use]
    pub const fn blocks_movement(&self) -> bool {
        match self {
            Self::Wall(_) | Self::Bomb(_) => true,
            Self::Bonus(_) | Self::Explosion(_) => false,
        }
    }
}

/// Grid cell: a background texture and at most one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    texture: TextureId,
    element: Option<Element>,
}

impl Square {
    /// Creates a cell with the given background and occupant.
    #[must_use]
    pub const fn new(texture: TextureId, element: Option<Element>) -> Self {
        Self { texture, element }
    }

    /// Creates a cell from the map-load description.
    #[must_use]
    pub const fn from_tile(tile: TileSpec) -> Self {
        let element = match tile.terrain {
            Terrain::Empty => None,
            Terrain::Breakable => Some(Element::Wall(WallKind::Breakable)),
            Terrain::Unbreakable => Some(Element::Wall(WallKind::Unbreakable)),
        };
        Self::new(tile.texture, element)
    }

    /// Background texture of the cell.
    #[must_use]
    pub const fn texture(&self) -> TextureId {
        self.texture
    }

    /// Current occupant, if any.
    #[must_use]
    pub const fn element(&self) -> Option<&Element> {
        self.element.as_ref()
    }

    /// Mutable access to the current occupant.
    pub fn element_mut(&mut self) -> Option<&mut Element> {
        self.element.as_mut()
    }

    /// Replaces the occupant without inspecting the previous one.
    pub fn set_element(&mut self, element: Element) {
        self.element = Some(element);
    }

    /// Removes and returns the occupant.
    pub fn take_element(&mut self) -> Option<Element> {
        self.element.take()
    }

    /// Whether the cell has no occupant.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.element.is_none()
    }

    /// Whether characters may enter the cell.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        match &self.element {
            Some(element) => !element.blocks_movement(),
            None => true,
        }
    }
}

/// Read-only view over the level grid used by renderers and systems.
#[derive(Clone, Copy, Debug)]
pub struct LevelView<'a> {
    squares: &'a [Square],
    columns: u32,
    rows: u32,
}

impl<'a> LevelView<'a> {
    /// Captures a view backed by the provided row-major cells.
    #[must_use]
    pub const fn new(squares: &'a [Square], columns: u32, rows: u32) -> Self {
        Self {
            squares,
            columns,
            rows,
        }
    }

    /// Dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Cell at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn square(&self, cell: CellCoord) -> Option<&'a Square> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.squares.get(index)
    }

    /// Whether `cell` lies in the grid and can be entered.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.square(cell).is_some_and(Square::is_walkable)
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &'a Square)> + 'a {
        let columns = self.columns.max(1);
        self.squares.iter().enumerate().map(move |(index, square)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), square)
        })
    }
}

/// Outcome of a movement step that the level accepts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepTarget {
    /// Pixel position after the step.
    pub pixel: PixelPoint,
    /// Cell the new pixel position maps to.
    pub cell: CellCoord,
}

/// Resolves a single movement step against the level.
///
/// The candidate position is `pixel` moved `speed` pixels in `direction`.
/// The step is accepted when the candidate maps to a cell inside the grid that
/// is either the mover's current cell or walkable; otherwise `None`.
#[must_use]
pub fn resolve_step(
    coordinates: &CoordinateModel,
    level: &LevelView<'_>,
    from_cell: CellCoord,
    pixel: PixelPoint,
    direction: Direction,
    speed: u32,
) -> Option<StepTarget> {
    let candidate = coordinates.step(pixel, direction, speed);
    let (columns, rows) = level.dimensions();
    let cell = coordinates.to_grid(candidate).to_cell(columns, rows)?;
    (cell == from_cell || level.is_walkable(cell)).then_some(StepTarget {
        pixel: candidate,
        cell,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> TileSpec {
        TileSpec::new(Terrain::Empty, TextureId::new(0))
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = LevelLayout::from_rows(vec![vec![floor(); 3], vec![floor(); 2]]);
        assert!(matches!(result, Err(SimulationError::InvalidLayout(_))));
    }

    #[test]
    fn empty_layout_is_rejected() {
        assert!(LevelLayout::from_rows(Vec::new()).is_err());
        assert!(LevelLayout::new(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn walls_and_bombs_block_movement() {
        let owner = CharacterId::new(0);
        let bomb = Bomb::trigger(BombId::new(0), owner, 1).expect("bomb");
        assert!(Element::Wall(WallKind::Breakable).blocks_movement());
        assert!(Element::Wall(WallKind::Unbreakable).blocks_movement());
        assert!(Element::Bomb(bomb).blocks_movement());
        assert!(!Element::Bonus(BonusKind::AddLife).blocks_movement());
        assert!(!Element::Explosion(Explosion::new(3, None)).blocks_movement());
    }

    #[test]
    fn timed_bomb_expires_on_final_tick() {
        let mut bomb = Bomb::timed(BombId::new(1), CharacterId::new(0), 2, 2).expect("bomb");
        assert!(!bomb.tick());
        assert!(bomb.tick());
        assert_eq!(bomb.kind(), BombKind::Time);
    }

    #[test]
    fn trigger_bomb_never_expires() {
        let mut bomb = Bomb::trigger(BombId::new(1), CharacterId::new(0), 2).expect("bomb");
        assert!((0..100).all(|_| !bomb.tick()));
    }

    #[test]
    fn exploding_twice_is_rejected() {
        let mut bomb = Bomb::trigger(BombId::new(1), CharacterId::new(0), 2).expect("bomb");
        assert!(bomb.mark_exploded());
        assert!(!bomb.mark_exploded());
        assert_eq!(bomb.state(), BombState::Exploded);
    }

    #[test]
    fn bomb_without_power_is_rejected() {
        assert!(Bomb::trigger(BombId::new(1), CharacterId::new(0), 0).is_err());
        assert!(Bomb::timed(BombId::new(1), CharacterId::new(0), 1, 0).is_err());
    }

    #[test]
    fn view_iterates_row_major() {
        let layout = LevelLayout::filled(3, 2, floor()).expect("layout");
        let squares: Vec<Square> = layout.tiles().iter().copied().map(Square::from_tile).collect();
        let view = LevelView::new(&squares, 3, 2);
        let cells: Vec<CellCoord> = view.iter().map(|(cell, _)| cell).collect();
        assert_eq!(cells[4], CellCoord::new(1, 1));
        assert!(view.square(CellCoord::new(3, 0)).is_none());
    }
}
