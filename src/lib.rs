//! Procedural maze levels with grid collision and a following camera.
//!
//! [`LevelDirector`] ties the pieces together: [`MazeGenerator`] builds the
//! [`Grid`], [`reachable_from`] decides where things may be placed,
//! [`CollisionResolver`] moves the actor each frame and [`Camera`] tracks it.

pub mod camera;
pub mod collision;
pub mod components;
pub mod config;
pub mod error;
pub mod grid;
pub mod level;
pub mod maze;
pub mod player;
pub mod reachability;

pub use camera::Camera;
pub use collision::{Aabb, CollisionResolver};
pub use components::{Actor, Pickup, PickupKind, PickupState};
pub use config::{LevelPolicy, LevelShape, Settings, WorldConfig};
pub use error::{Error, Result};
pub use grid::{Cell, CellPos, Grid};
pub use level::{pick_start_cell, DirectorState, GameEvent, Level, LevelDirector, Tally};
pub use maze::{MazeGenerator, RoomShape, ROOM_SHAPES};
pub use player::{Direction, HeldKeys};
pub use reachability::{reachable_from, ReachableSet};
