//! Plain-text level files.
//!
//! One character per cell: `#` unbreakable wall, `+` breakable wall, `.` open
//! floor and `S` open floor that doubles as a spawn point. Blank lines are
//! ignored and every remaining row must have the same width.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use bomb_arena_core::{CellCoord, LevelLayout, Terrain, TextureId, TileSpec};

const FLOOR_TEXTURE: TextureId = TextureId::new(0);
const BREAKABLE_TEXTURE: TextureId = TextureId::new(1);
const UNBREAKABLE_TEXTURE: TextureId = TextureId::new(2);

/// Arena used when no level file is supplied.
pub(crate) const DEFAULT_ARENA: &str = "\
#############
#S..+++++..S#
#.#+#+#+#+#.#
#.+++++++++.#
#+#+#+#+#+#+#
#+++++.+++++#
#+#+#+#+#+#+#
#.+++++++++.#
#.#+#+#+#+#.#
#S..+++++..S#
#############
";

/// Parsed level together with its spawn points in reading order.
#[derive(Clone, Debug)]
pub(crate) struct LevelFile {
    pub(crate) layout: LevelLayout,
    pub(crate) spawns: Vec<CellCoord>,
}

impl LevelFile {
    /// Reads and parses the level stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse level file at {}", path.display()))
    }

    /// Parses level text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let mut rows = Vec::new();
        let mut spawns = Vec::new();
        for line in contents.lines().map(str::trim_end) {
            if line.is_empty() {
                continue;
            }
            let row = u32::try_from(rows.len()).context("level has too many rows")?;
            let mut tiles = Vec::with_capacity(line.len());
            for (column, symbol) in line.chars().enumerate() {
                let column = u32::try_from(column).context("level row is too wide")?;
                let tile = match symbol {
                    '#' => TileSpec::new(Terrain::Unbreakable, UNBREAKABLE_TEXTURE),
                    '+' => TileSpec::new(Terrain::Breakable, BREAKABLE_TEXTURE),
                    '.' => TileSpec::new(Terrain::Empty, FLOOR_TEXTURE),
                    'S' => {
                        spawns.push(CellCoord::new(column, row));
                        TileSpec::new(Terrain::Empty, FLOOR_TEXTURE)
                    }
                    other => bail!("unknown tile `{other}` at row {row}, column {column}"),
                };
                tiles.push(tile);
            }
            rows.push(tiles);
        }

        let layout =
            LevelLayout::from_rows(rows).context("level rows must form a non-empty rectangle")?;
        Ok(Self { layout, spawns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arena_parses_with_four_spawns() {
        let level = LevelFile::parse(DEFAULT_ARENA).expect("default arena");
        assert_eq!(level.layout.columns(), 13);
        assert_eq!(level.layout.rows(), 11);
        assert_eq!(
            level.spawns,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(11, 1),
                CellCoord::new(1, 9),
                CellCoord::new(11, 9),
            ]
        );
    }

    #[test]
    fn symbols_map_to_terrain_and_textures() {
        let level = LevelFile::parse("#+.S\n").expect("level");
        let tiles = level.layout.tiles();
        assert_eq!(
            tiles,
            &[
                TileSpec::new(Terrain::Unbreakable, UNBREAKABLE_TEXTURE),
                TileSpec::new(Terrain::Breakable, BREAKABLE_TEXTURE),
                TileSpec::new(Terrain::Empty, FLOOR_TEXTURE),
                TileSpec::new(Terrain::Empty, FLOOR_TEXTURE),
            ]
        );
        assert_eq!(level.spawns, vec![CellCoord::new(3, 0)]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let level = LevelFile::parse("\n..\n\n..\n\n").expect("level");
        assert_eq!(level.layout.rows(), 2);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(LevelFile::parse("...\n..\n").is_err());
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        let error = LevelFile::parse("..x\n").expect_err("unknown symbol");
        assert!(error.to_string().contains("unknown tile `x`"));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(LevelFile::parse("\n\n").is_err());
    }
}
