use rand::Rng;

/// A cell on the board. Coordinates may briefly leave the board while the
/// snake moves; the game logic wraps them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn set_position(&mut self, position: Position) {
        self.x = position.x;
        self.y = position.y;
    }

    pub const fn offset(self, (dx, dy): (i32, i32)) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Food {
    position: Position,
}

impl Food {
    pub fn new(position: Position) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the food to a random cell in `[0, bound)` on both axes. Cells
    /// under the snake are not excluded.
    pub fn relocate<R: Rng + ?Sized>(&mut self, bound: u32, rng: &mut R) {
        let bound = bound.max(1) as i32;
        self.position
            .set_position(Position::new(rng.gen_range(0..bound), rng.gen_range(0..bound)));
    }
}
