//! Level orchestration.
//!
//! A level is built in a fixed order: carve the maze, carve rooms, pick a
//! start cell, flood the reachable set from it, then sample the objective and
//! collectibles from that set. Rooms go in before the flood so a placement can
//! never be cut off by a later change to the grid.
//!
//! Reaching the objective only raises a flag; the next level is generated at
//! the top of the following tick.

use log::{debug, info, warn};
use rand::Rng;

use crate::camera::Camera;
use crate::collision::CollisionResolver;
use crate::components::{Actor, Pickup, PickupKind};
use crate::config::{LevelPolicy, WorldConfig};
use crate::error::{Error, Result};
use crate::grid::{CellPos, Grid};
use crate::maze::MazeGenerator;
use crate::reachability::reachable_from;

const MAX_START_ATTEMPTS: usize = 1_000;

#[derive(Clone, Debug)]
pub struct Level {
    pub number: u32,
    pub grid: Grid,
    pub start: CellPos,
    /// Size of the flood the placements were sampled from.
    pub reachable: usize,
    /// Actor speed in world pixels per frame.
    pub speed: f32,
    pub actor: Actor,
    pub objective: Pickup,
    pub collectibles: Vec<Pickup>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { level: u32, rows: usize, cols: usize },
    CollectibleReached { level: u32, cell: CellPos },
    ObjectiveReached { level: u32 },
}

/// Running totals since the last `start`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub crosses: u32,
    pub candles: u32,
}

#[derive(Clone, Debug)]
pub enum DirectorState {
    Idle,
    Active(Level),
}

pub struct LevelDirector<R> {
    config: WorldConfig,
    policy: LevelPolicy,
    generator: MazeGenerator,
    resolver: CollisionResolver,
    camera: Camera,
    rng: R,
    state: DirectorState,
    pending_advance: bool,
    tally: Tally,
}

impl<R: Rng> LevelDirector<R> {
    pub fn new(config: WorldConfig, policy: LevelPolicy, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            policy,
            generator: MazeGenerator::default(),
            resolver: CollisionResolver::new(&config),
            camera: Camera::new(&config),
            rng,
            state: DirectorState::Idle,
            pending_advance: false,
            tally: Tally::default(),
        })
    }

    pub fn with_config(config: WorldConfig, rng: R) -> Result<Self> {
        let policy = LevelPolicy::for_world(&config);
        Self::new(config, policy, rng)
    }

    /// Begins a fresh run at level one.
    pub fn start(&mut self) -> Result<GameEvent> {
        self.tally = Tally::default();
        self.pending_advance = false;
        self.enter_level(1)
    }

    /// Drops the active level.
    pub fn stop(&mut self) {
        if let DirectorState::Active(level) = &self.state {
            info!("stopping at level {}", level.number);
        }
        self.state = DirectorState::Idle;
        self.pending_advance = false;
    }

    /// Runs one frame: any deferred level change, then collision, camera, pickups.
    pub fn tick(&mut self, displacement: (f32, f32)) -> Result<Vec<GameEvent>> {
        let mut events = Vec::new();

        if self.pending_advance {
            self.pending_advance = false;
            if let Some(number) = self.level().map(|l| l.number) {
                events.push(self.enter_level(number + 1)?);
            }
        }

        let DirectorState::Active(level) = &mut self.state else {
            return Ok(events);
        };

        let (dx, dy) = displacement;
        let (x, y) = self
            .resolver
            .resolve(&level.grid, level.actor.bounds(), dx, dy);
        level.actor.x = x;
        level.actor.y = y;
        self.camera
            .center_on((x, y), level.grid.cols(), level.grid.rows());

        for candle in level.collectibles.iter_mut() {
            if candle.touches(&level.actor) && candle.collect() {
                self.tally.candles += 1;
                debug!("candle at {:?} collected", candle.cell);
                events.push(GameEvent::CollectibleReached {
                    level: level.number,
                    cell: candle.cell,
                });
            }
        }

        if level.objective.touches(&level.actor) && level.objective.collect() {
            self.tally.crosses += 1;
            self.pending_advance = true;
            info!(
                "objective reached on level {} ({} collected)",
                level.number, self.tally.crosses
            );
            events.push(GameEvent::ObjectiveReached {
                level: level.number,
            });
        }

        Ok(events)
    }

    pub fn level(&self) -> Option<&Level> {
        match &self.state {
            DirectorState::Active(level) => Some(level),
            DirectorState::Idle => None,
        }
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        match &mut self.state {
            DirectorState::Active(level) => Some(level),
            DirectorState::Idle => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DirectorState::Active(_))
    }

    pub fn advance_pending(&self) -> bool {
        self.pending_advance
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Current actor speed, or zero with no active level.
    pub fn speed(&self) -> f32 {
        self.level().map(|l| l.speed).unwrap_or(0.0)
    }

    fn enter_level(&mut self, number: u32) -> Result<GameEvent> {
        let level = self.build_level(number)?;
        self.camera.center_on(
            (level.actor.x, level.actor.y),
            level.grid.cols(),
            level.grid.rows(),
        );
        let event = GameEvent::LevelStarted {
            level: number,
            rows: level.grid.rows(),
            cols: level.grid.cols(),
        };
        self.state = DirectorState::Active(level);
        Ok(event)
    }

    fn build_level(&mut self, number: u32) -> Result<Level> {
        let shape = self.policy.shape(number);
        let mut grid = self
            .generator
            .generate(shape.rows, shape.cols, &mut self.rng)?;
        let rooms = self.policy.room_count(number);
        if rooms > 0 {
            self.generator.carve_rooms(&mut grid, rooms, &mut self.rng);
        }

        let start = pick_start_cell(&grid, &mut self.rng)?;
        let reachable = reachable_from(&grid, start);
        debug_assert!(reachable.contains(start));

        let tile_px = self.config.tile_px();
        let objective_cell = reachable.sample(&mut self.rng).ok_or(Error::NoOpenCell {
            rows: grid.rows(),
            cols: grid.cols(),
        })?;
        let objective = Pickup::new(PickupKind::Objective, objective_cell, tile_px);
        let collectibles = (0..self.policy.collectible_count(number))
            .filter_map(|_| reachable.sample(&mut self.rng))
            .map(|cell| Pickup::new(PickupKind::Collectible, cell, tile_px))
            .collect::<Vec<_>>();

        let mut actor = Actor::new(tile_px);
        actor.place_at(start);

        info!(
            "level {number}: {}x{} grid, speed {:.2}, {} reachable cells, {} candles",
            shape.rows,
            shape.cols,
            shape.speed,
            reachable.len(),
            collectibles.len()
        );

        Ok(Level {
            number,
            reachable: reachable.len(),
            grid,
            start,
            speed: shape.speed,
            actor,
            objective,
            collectibles,
        })
    }
}

/// Picks a random open interior cell.
///
/// Rejection sampling is capped; past the cap the grid is scanned row-major.
/// A grid with no open interior cell is a configuration error.
pub fn pick_start_cell<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Result<CellPos> {
    let (rows, cols) = (grid.rows(), grid.cols());
    for _ in 0..MAX_START_ATTEMPTS {
        let pos = CellPos::new(rng.gen_range(1..=rows - 2), rng.gen_range(1..=cols - 2));
        if grid.is_open(pos) {
            return Ok(pos);
        }
    }
    warn!("no open start cell after {MAX_START_ATTEMPTS} samples, scanning");
    grid.open_cells()
        .find(|pos| grid.is_interior(*pos))
        .ok_or(Error::NoOpenCell { rows, cols })
}
