use crate::collision::Aabb;
use crate::grid::CellPos;

/// The player-controlled entity. Position is the top-left of its box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Actor {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Actor {
    pub fn new(size: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            size,
        }
    }

    pub fn place_at(&mut self, cell: CellPos) {
        self.x = cell.col as f32 * self.size;
        self.y = cell.row as f32 * self.size;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.size, self.size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupKind {
    /// Reaching it ends the level.
    Objective,
    Collectible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupState {
    Active,
    /// Terminal; a collected pickup never collides again.
    Collected,
}

/// Something the actor can walk into, pinned to one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub cell: CellPos,
    state: PickupState,
    bounds: Aabb,
}

impl Pickup {
    pub fn new(kind: PickupKind, cell: CellPos, tile_px: f32) -> Self {
        Self {
            kind,
            cell,
            state: PickupState::Active,
            bounds: Aabb::new(
                cell.col as f32 * tile_px,
                cell.row as f32 * tile_px,
                tile_px,
                tile_px,
            ),
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn state(&self) -> PickupState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PickupState::Active
    }

    pub fn touches(&self, actor: &Actor) -> bool {
        self.is_active() && self.bounds.overlaps(&actor.bounds())
    }

    /// Moves `Active -> Collected`. Returns false if it was already collected.
    pub fn collect(&mut self) -> bool {
        match self.state {
            PickupState::Active => {
                self.state = PickupState::Collected;
                true
            }
            PickupState::Collected => false,
        }
    }
}
