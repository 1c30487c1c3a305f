use endless_maze::{reachable_from, GameEvent, LevelDirector, WorldConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn director(seed: u64) -> LevelDirector<StdRng> {
    LevelDirector::with_config(WorldConfig::default(), StdRng::seed_from_u64(seed)).unwrap()
}

/// Moves exactly one level forward. The objective can spawn under the start
/// cell, in which case the advance is already pending.
fn advance(d: &mut LevelDirector<StdRng>) {
    if !d.advance_pending() {
        let level = d.level_mut().unwrap();
        let target = level.objective.cell;
        level.actor.place_at(target);
        d.tick((0.0, 0.0)).unwrap();
    }
    d.tick((0.0, 0.0)).unwrap();
}

fn camera_in_bounds(d: &LevelDirector<StdRng>) {
    let level = d.level().unwrap();
    let cam = d.camera();
    let max_x = (level.grid.cols() as f32 * 32.0 - cam.width).max(0.0);
    let max_y = (level.grid.rows() as f32 * 32.0 - cam.height).max(0.0);
    assert!(cam.x >= 0.0 && cam.x <= max_x, "camera x {} outside 0..={max_x}", cam.x);
    assert!(cam.y >= 0.0 && cam.y <= max_y, "camera y {} outside 0..={max_y}", cam.y);
}

#[test]
fn first_level_has_base_shape() {
    let mut d = director(11);
    assert_eq!(
        d.start().unwrap(),
        GameEvent::LevelStarted {
            level: 1,
            rows: 9,
            cols: 12
        }
    );
    assert!(d.is_active());
}

#[test]
fn placements_stay_reachable_across_levels() {
    let mut d = director(2024);
    d.start().unwrap();
    for expected in 1..=12 {
        let level = d.level().unwrap();
        assert_eq!(level.number, expected);
        assert!(level.grid.border_is_sealed(), "level {expected} border breached");

        let reachable = reachable_from(&level.grid, level.start);
        assert!(reachable.contains(level.start));
        assert!(reachable.contains(level.objective.cell));
        for candle in &level.collectibles {
            assert!(reachable.contains(candle.cell), "level {expected} candle cut off");
        }
        advance(&mut d);
    }
    assert_eq!(d.level().unwrap().number, 13);
    assert!(d.tally().crosses >= 12);
}

#[test]
fn levels_grow() {
    let mut d = director(5);
    d.start().unwrap();
    let first = d.level().unwrap().grid.rows() * d.level().unwrap().grid.cols();
    for _ in 0..4 {
        advance(&mut d);
    }
    let level = d.level().unwrap();
    assert_eq!(level.number, 5);
    assert!(level.grid.rows() * level.grid.cols() > first);
    assert!(level.speed > 0.0 && level.speed < 32.0 - 8.0);
}

#[test]
fn advance_waits_for_next_tick() {
    let mut d = director(31);
    d.start().unwrap();
    let level = d.level_mut().unwrap();
    let target = level.objective.cell;
    level.actor.place_at(target);

    let events = d.tick((0.0, 0.0)).unwrap();
    assert!(events.contains(&GameEvent::ObjectiveReached { level: 1 }));
    assert_eq!(d.level().unwrap().number, 1);

    let events = d.tick((0.0, 0.0)).unwrap();
    assert!(matches!(
        events.first(),
        Some(GameEvent::LevelStarted { level: 2, .. })
    ));
}

#[test]
fn candles_count_once() {
    let mut d = director(77);
    d.start().unwrap();
    advance(&mut d);
    while d.advance_pending() {
        d.tick((0.0, 0.0)).unwrap();
    }
    let level = d.level_mut().unwrap();
    let number = level.number;
    assert!(number >= 2);
    let candle = level.collectibles[0].cell;
    level.actor.place_at(candle);

    let before = d.tally().candles;
    let events = d.tick((0.0, 0.0)).unwrap();
    assert!(events.contains(&GameEvent::CollectibleReached {
        level: number,
        cell: candle
    }));
    let after = d.tally().candles;
    assert!(after > before);

    // Standing still on a collected candle adds nothing.
    let events = d.tick((0.0, 0.0)).unwrap();
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::CollectibleReached { level, .. } if *level == number)));
}

#[test]
fn start_resets_tally() {
    let mut d = director(9);
    d.start().unwrap();
    advance(&mut d);
    assert!(d.tally().crosses >= 1);
    d.stop();
    assert!(!d.is_active());
    assert!(d.tick((3.0, 3.0)).unwrap().is_empty());

    d.start().unwrap();
    assert_eq!(d.tally().crosses, 0);
    assert_eq!(d.level().unwrap().number, 1);
}

#[test]
fn same_seed_same_levels() {
    let mut a = director(123);
    let mut b = director(123);
    a.start().unwrap();
    b.start().unwrap();
    for _ in 0..4 {
        let (la, lb) = (a.level().unwrap(), b.level().unwrap());
        assert_eq!(la.grid, lb.grid);
        assert_eq!(la.start, lb.start);
        assert_eq!(la.objective.cell, lb.objective.cell);
        advance(&mut a);
        advance(&mut b);
    }
}

#[test]
fn camera_follows_within_world() {
    let mut d = director(64);
    d.start().unwrap();
    for _ in 0..6 {
        advance(&mut d);
    }
    camera_in_bounds(&d);
    let speed = d.speed();
    for step in 0..400 {
        let dir = match (step / 50) % 4 {
            0 => (speed, 0.0),
            1 => (0.0, speed),
            2 => (-speed, 0.0),
            _ => (0.0, -speed),
        };
        d.tick(dir).unwrap();
        if d.advance_pending() {
            d.tick((0.0, 0.0)).unwrap();
        }
        camera_in_bounds(&d);
        let level = d.level().unwrap();
        let (x, y) = (level.actor.x, level.actor.y);
        let corners = [
            (x + 4.0, y + 4.0),
            (x + 28.0, y + 4.0),
            (x + 4.0, y + 28.0),
            (x + 28.0, y + 28.0),
        ];
        for (cx, cy) in corners {
            assert!(!level
                .grid
                .is_blocked_at((cy / 32.0).floor() as i64, (cx / 32.0).floor() as i64));
        }
    }
}
