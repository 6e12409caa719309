use std::collections::VecDeque;

use crate::actor::Position;

/// A turn request from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn heading(self) -> Heading {
        match self {
            Direction::Up => Heading::North,
            Direction::Down => Heading::South,
            Direction::Left => Heading::West,
            Direction::Right => Heading::East,
        }
    }
}

/// Where the snake is going. A new snake is `Stopped` until the first turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heading {
    #[default]
    Stopped,
    North,
    South,
    East,
    West,
}

impl Heading {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Heading::Stopped => (0, 0),
            Heading::North => (0, -1),
            Heading::South => (0, 1),
            Heading::East => (1, 0),
            Heading::West => (-1, 0),
        }
    }

    /// Whether a snake whose last step went `self` may head `requested`.
    /// Only the straight reversal is refused.
    pub const fn allows(self, requested: Heading) -> bool {
        !matches!(
            (self, requested),
            (Heading::North, Heading::South)
                | (Heading::South, Heading::North)
                | (Heading::East, Heading::West)
                | (Heading::West, Heading::East)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Snake {
    head: Position,
    heading: Heading,
    // Heading of the step from `segments[0]` to `head`.
    stepped: Heading,
    length: usize,
    // Nearest to the head first.
    segments: VecDeque<Position>,
}

impl Snake {
    pub fn new(head: Position, length: usize) -> Self {
        Snake {
            head,
            heading: Heading::Stopped,
            stepped: Heading::Stopped,
            length,
            // The length comes from user settings; let the trail grow on demand.
            segments: VecDeque::new(),
        }
    }

    pub fn head(&self) -> Position {
        self.head
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Target length, head included.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub fn set_position(&mut self, position: Position) {
        self.head.set_position(position);
    }

    /// Heading of the step from the first segment to the head, rather than
    /// the current heading, so two turns within one tick cannot fold the
    /// head back onto the neck. Recorded when the step is taken, so a wrap
    /// across the board edge still reads as a single cell.
    pub fn last_step(&self) -> Heading {
        if self.segments.is_empty() {
            Heading::Stopped
        } else {
            self.stepped
        }
    }

    /// Tries to head in `direction`. Returns `false` when that would reverse
    /// into the segment right behind the head.
    pub fn turn(&mut self, direction: Direction) -> bool {
        let requested = direction.heading();
        if !self.last_step().allows(requested) {
            return false;
        }
        self.heading = requested;
        true
    }

    /// Records the head in the trail, trims the trail to `length - 1` cells,
    /// then steps the head.
    pub fn advance(&mut self) {
        self.segments.push_front(self.head);
        self.segments.truncate(self.length.saturating_sub(1));
        self.head = self.head.offset(self.heading.delta());
        self.stepped = self.heading;
    }

    /// Raises the target length. The body catches up over the next moves.
    pub fn grow(&mut self, amount: usize) {
        self.length = self.length.saturating_add(amount);
    }

    /// Cuts the snake after biting the segment at `index`, never below
    /// `min_length`.
    pub fn truncate_at(&mut self, index: usize, min_length: usize) {
        self.length = index.saturating_sub(1).max(min_length);
        self.segments.truncate(self.length);
    }

    /// Index of the nearest segment under the head, if any.
    pub fn bitten_segment(&self) -> Option<usize> {
        self.segments.iter().position(|segment| *segment == self.head)
    }
}
