use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use endless_maze::{Camera, Cell, CellPos, Level, Tally, WorldConfig};
use unicode_width::UnicodeWidthStr;

/// Terminal columns per grid cell.
const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Actor,
    Wall,
    Floor,
    Objective,
    Candle,
    /// Outside the world.
    Void,
}

impl Glyph {
    fn text(self) -> (&'static str, Color) {
        match self {
            Glyph::Actor => ("🧙", Color::Magenta),
            Glyph::Wall => ("██", Color::DarkGrey),
            Glyph::Floor => ("  ", Color::Reset),
            Glyph::Objective => ("✟", Color::Red),
            Glyph::Candle => ("🕯", Color::Yellow),
            Glyph::Void => ("  ", Color::Reset),
        }
    }
}

/// Redraws only the viewport cells that changed since the last frame.
pub struct Renderer {
    cols: usize,
    rows: usize,
    tile_px: f32,
    last: Vec<Glyph>,
    last_hud: String,
    last_card: Option<Vec<String>>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(config: &WorldConfig) -> Self {
        let tile_px = config.tile_px();
        let cols = (config.viewport_width / tile_px).ceil() as usize;
        let rows = (config.viewport_height / tile_px).ceil() as usize;
        Self {
            cols,
            rows,
            tile_px,
            last: vec![Glyph::Void; cols * rows],
            last_hud: String::new(),
            last_card: None,
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Forces the next draw to repaint everything.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
        self.last_card = None;
    }

    pub fn draw_level(
        &mut self,
        stdout: &mut Stdout,
        level: &Level,
        camera: &Camera,
        tally: Tally,
        status: &str,
    ) -> io::Result<()> {
        let needed_w = (self.cols * CELL_W) as u16;
        let needed_h = (self.rows + 2) as u16;
        if !self.fit(stdout, needed_w, needed_h)? {
            return Ok(());
        }

        let hud = format!(
            "Level: {}  ✟ collected: {}  Candles: {}  {}  (q to quit)",
            level.number, tally.crosses, tally.candles, status
        );
        if self.needs_full || hud != self.last_hud {
            stdout.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(&hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud;
        }

        let frame = self.compose(level, camera);
        for (idx, glyph) in frame.into_iter().enumerate() {
            if self.needs_full || glyph != self.last[idx] {
                self.last[idx] = glyph;
                self.draw_cell(stdout, idx % self.cols, idx / self.cols, glyph)?;
            }
        }
        self.needs_full = false;

        stdout.flush()
    }

    /// Draws a centered block of text, once per distinct content.
    pub fn draw_card(&mut self, stdout: &mut Stdout, lines: &[String]) -> io::Result<()> {
        if self.last_card.as_deref() == Some(lines) {
            return Ok(());
        }
        let (term_w, term_h) = terminal::size()?;
        stdout.queue(Clear(ClearType::All))?;
        let top = term_h.saturating_sub(lines.len() as u16) / 2;
        for (i, line) in lines.iter().enumerate() {
            let w = UnicodeWidthStr::width(line.as_str()) as u16;
            stdout.queue(MoveTo(term_w.saturating_sub(w) / 2, top + i as u16))?;
            stdout.queue(Print(line))?;
        }
        stdout.flush()?;
        self.last_card = Some(lines.to_vec());
        self.needs_full = true;
        Ok(())
    }

    /// Centers the viewport in the terminal. False when it doesn't fit.
    fn fit(&mut self, stdout: &mut Stdout, needed_w: u16, needed_h: u16) -> io::Result<bool> {
        stdout.queue(MoveTo(0, 0))?;
        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            stdout.queue(Print(msg))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(false);
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
        }
        Ok(true)
    }

    /// Samples the world at each viewport cell's center, then overlays entities.
    fn compose(&self, level: &Level, camera: &Camera) -> Vec<Glyph> {
        let half = self.tile_px / 2.0;
        let mut frame = Vec::with_capacity(self.cols * self.rows);
        for sr in 0..self.rows {
            for sc in 0..self.cols {
                let wx = camera.x + sc as f32 * self.tile_px + half;
                let wy = camera.y + sr as f32 * self.tile_px + half;
                let pos = CellPos::new(
                    (wy / self.tile_px).floor() as usize,
                    (wx / self.tile_px).floor() as usize,
                );
                frame.push(match level.grid.get(pos) {
                    Some(Cell::Open) => Glyph::Floor,
                    Some(Cell::Blocked) => Glyph::Wall,
                    None => Glyph::Void,
                });
            }
        }

        let candles = level
            .collectibles
            .iter()
            .filter(|c| c.is_active())
            .map(|c| (c.bounds().x, c.bounds().y, Glyph::Candle));
        let cross = level
            .objective
            .is_active()
            .then(|| {
                let b = level.objective.bounds();
                (b.x, b.y, Glyph::Objective)
            });
        let actor = (level.actor.x, level.actor.y, Glyph::Actor);

        for (x, y, glyph) in candles.chain(cross).chain(std::iter::once(actor)) {
            if let Some(idx) = self.screen_index(camera.to_view((x, y))) {
                frame[idx] = glyph;
            }
        }
        frame
    }

    /// Viewport cell under the center of a tile-sized box at `view`.
    fn screen_index(&self, view: (f32, f32)) -> Option<usize> {
        let half = self.tile_px / 2.0;
        let sc = ((view.0 + half) / self.tile_px).floor();
        let sr = ((view.1 + half) / self.tile_px).floor();
        if sc < 0.0 || sr < 0.0 || sc >= self.cols as f32 || sr >= self.rows as f32 {
            return None;
        }
        Some(sr as usize * self.cols + sc as usize)
    }

    fn draw_cell(&self, stdout: &mut Stdout, x: usize, y: usize, glyph: Glyph) -> io::Result<()> {
        let (text, color) = glyph.text();
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        stdout.queue(MoveTo(x_pos, y_pos))?;
        stdout.queue(SetForegroundColor(color))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                stdout.queue(Print(' '))?;
            }
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }
}

pub fn title_card() -> Vec<String> {
    vec![
        "The Endless Maze".to_string(),
        String::new(),
        "Find the ✟ to go deeper. Candles are a bonus.".to_string(),
        "Move with the arrow keys or h j k l.".to_string(),
        String::new(),
        "Enter to start, q to quit".to_string(),
    ]
}

pub fn end_card(tally: Tally) -> Vec<String> {
    vec![
        "YOU WIN, GAME OVER".to_string(),
        String::new(),
        format!("✟ collected: {}", tally.crosses),
        format!("Candles lit: {}", tally.candles),
        String::new(),
        "r to play again, q to quit".to_string(),
    ]
}
