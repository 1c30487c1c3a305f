use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Which direction keys count as held right now.
///
/// Most terminals only report presses and auto-repeats, so a key stays held
/// for `hold` after its latest event unless an explicit release arrives.
#[derive(Debug, Clone)]
pub struct HeldKeys {
    last_seen: [Option<Instant>; 4],
    hold: Duration,
}

impl HeldKeys {
    pub fn new(hold: Duration) -> Self {
        Self {
            last_seen: [None; 4],
            hold,
        }
    }

    pub fn press(&mut self, dir: Direction, now: Instant) {
        self.last_seen[dir.index()] = Some(now);
    }

    pub fn release(&mut self, dir: Direction) {
        self.last_seen[dir.index()] = None;
    }

    pub fn release_all(&mut self) {
        self.last_seen = [None; 4];
    }

    pub fn is_held(&self, dir: Direction, now: Instant) -> bool {
        self.last_seen[dir.index()]
            .map(|t| now.saturating_duration_since(t) <= self.hold)
            .unwrap_or(false)
    }

    /// Per-frame displacement with each axis in `{-speed, 0, +speed}`.
    /// Opposite keys cancel.
    pub fn displacement(&self, speed: f32, now: Instant) -> (f32, f32) {
        let axis = |neg: Direction, pos: Direction| {
            let mut d = 0.0;
            if self.is_held(neg, now) {
                d -= speed;
            }
            if self.is_held(pos, now) {
                d += speed;
            }
            d
        };
        (
            axis(Direction::Left, Direction::Right),
            axis(Direction::Up, Direction::Down),
        )
    }
}
