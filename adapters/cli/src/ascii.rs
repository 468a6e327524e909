//! Text renderer reading the world's level and character views.

use bomb_arena_core::{BombKind, BonusKind, CharacterView, Element, LevelView, WallKind};

/// Draws one frame, one line per grid row.
///
/// Living characters are drawn as the last digit of their id on top of
/// whatever occupies their cell.
pub(crate) fn render(level: &LevelView<'_>, characters: &CharacterView) -> String {
    let (columns, rows) = level.dimensions();
    let mut grid: Vec<Vec<char>> = vec![vec!['.'; columns as usize]; rows as usize];

    for (cell, square) in level.iter() {
        grid[cell.row() as usize][cell.column() as usize] = square.element().map_or('.', glyph);
    }
    for character in characters.iter().filter(|character| character.alive) {
        let digit = char::from_digit(character.id.get() % 10, 10).unwrap_or('@');
        if let Some(slot) = grid
            .get_mut(character.cell.row() as usize)
            .and_then(|row| row.get_mut(character.cell.column() as usize))
        {
            *slot = digit;
        }
    }

    let mut frame = String::with_capacity((columns as usize + 1) * rows as usize);
    for row in grid {
        frame.extend(row);
        frame.push('\n');
    }
    frame
}

fn glyph(element: &Element) -> char {
    match element {
        Element::Wall(WallKind::Unbreakable) => '#',
        Element::Wall(WallKind::Breakable) => '+',
        Element::Bomb(bomb) => match bomb.kind() {
            BombKind::Time => 'o',
            BombKind::Trigger => 'T',
        },
        Element::Bonus(BonusKind::AddBomb) => 'b',
        Element::Bonus(BonusKind::AddLife) => 'l',
        Element::Bonus(BonusKind::AddSpeed) => 's',
        Element::Bonus(BonusKind::UnlockTriggerBomb) => 't',
        Element::Explosion(_) => '*',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomb_arena_core::{
        Bomb, BombId, CharacterId, Explosion, LevelLayout, Square, Terrain, TextureId, TileSpec,
    };

    #[test]
    fn renders_elements_row_by_row() {
        let layout = LevelLayout::from_rows(vec![
            vec![
                TileSpec::new(Terrain::Unbreakable, TextureId::new(2)),
                TileSpec::new(Terrain::Breakable, TextureId::new(1)),
            ],
            vec![
                TileSpec::new(Terrain::Empty, TextureId::new(0)),
                TileSpec::new(Terrain::Empty, TextureId::new(0)),
            ],
        ])
        .expect("layout");
        let mut squares: Vec<Square> = layout
            .tiles()
            .iter()
            .copied()
            .map(Square::from_tile)
            .collect();
        squares[2].set_element(Element::Explosion(Explosion::new(1, None)));
        let bomb = Bomb::timed(BombId::new(0), CharacterId::new(0), 1, 5).expect("bomb");
        squares[3].set_element(Element::Bomb(bomb));
        let level = LevelView::new(&squares, 2, 2);

        let frame = render(&level, &CharacterView::default());
        assert_eq!(frame, "#+\n*o\n");
    }
}
