use std::fs::File;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use endless_maze::{Direction, GameEvent, HeldKeys, LevelDirector, Settings, WorldConfig};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod render;

use render::Renderer;

const INPUT_HOLD_MS: u64 = 160;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Scene {
    Title,
    Playing,
    End,
}

enum Flow {
    Stay,
    Goto(Scene),
    Exit,
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    init_logging(&settings)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;
    // Real key-up events where the terminal supports them; otherwise the hold window applies.
    let enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }

    let result = run(&mut stdout, &settings);

    if enhanced {
        stdout.execute(PopKeyboardEnhancementFlags)?;
    }
    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .write_style(env_logger::WriteStyle::Never)
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, settings: &Settings) -> anyhow::Result<()> {
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = WorldConfig::default();
    let mut director = LevelDirector::with_config(config, rng)?;
    let mut keys = HeldKeys::new(Duration::from_millis(INPUT_HOLD_MS));
    let mut renderer = Renderer::new(&config);
    let mut scene = Scene::Title;
    let mut status = String::new();
    info!("starting, seed {:?}", settings.seed);

    let tick_every = Duration::from_millis(settings.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let flow = match event::read()? {
                Event::Key(key) => on_key(key, scene, &mut keys),
                Event::Resize(..) => {
                    renderer.invalidate();
                    Flow::Stay
                }
                _ => Flow::Stay,
            };
            match flow {
                Flow::Stay => {}
                Flow::Exit => return Ok(()),
                Flow::Goto(next) => {
                    match next {
                        Scene::Playing => {
                            director.start()?;
                            status = "Level 1".to_string();
                            last_tick = Instant::now();
                        }
                        Scene::End => {
                            director.stop();
                            keys.release_all();
                        }
                        Scene::Title => {}
                    }
                    scene = next;
                    renderer.invalidate();
                }
            }
        }

        match scene {
            Scene::Title => renderer.draw_card(stdout, &render::title_card())?,
            Scene::End => renderer.draw_card(stdout, &render::end_card(director.tally()))?,
            Scene::Playing => {
                if last_tick.elapsed() >= tick_every {
                    let now = Instant::now();
                    last_tick = now;
                    let displacement = keys.displacement(director.speed(), now);
                    for event in director.tick(displacement)? {
                        status = describe(event);
                    }
                }
                if let Some(level) = director.level() {
                    renderer.draw_level(
                        stdout,
                        level,
                        director.camera(),
                        director.tally(),
                        &status,
                    )?;
                }
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn on_key(key: KeyEvent, scene: Scene, keys: &mut HeldKeys) -> Flow {
    if scene == Scene::Playing {
        if let Some(dir) = direction_for(key.code) {
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => keys.press(dir, Instant::now()),
                KeyEventKind::Release => keys.release(dir),
            }
            return Flow::Stay;
        }
    }
    if key.kind == KeyEventKind::Release {
        return Flow::Stay;
    }
    match (scene, key.code) {
        (Scene::Title, KeyCode::Enter | KeyCode::Char(' ')) => Flow::Goto(Scene::Playing),
        (Scene::Title, KeyCode::Char('q')) => Flow::Exit,
        (Scene::Playing, KeyCode::Char('q')) => Flow::Goto(Scene::End),
        (Scene::End, KeyCode::Enter | KeyCode::Char('r')) => Flow::Goto(Scene::Playing),
        (Scene::End, KeyCode::Char('q')) => Flow::Exit,
        _ => Flow::Stay,
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Direction::Right),
        _ => None,
    }
}

fn describe(event: GameEvent) -> String {
    match event {
        GameEvent::LevelStarted { level, rows, cols } => {
            format!("Level {level} ({cols}x{rows})")
        }
        GameEvent::CollectibleReached { .. } => "A candle flickers on".to_string(),
        GameEvent::ObjectiveReached { .. } => "✟ found, going deeper".to_string(),
    }
}
