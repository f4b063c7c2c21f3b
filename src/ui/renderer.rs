/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (a grid of Cells)
///   2. Compare each cell with `back` (the previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. Batch everything with `queue!`, flush once at the end
///   5. Swap front/back
///
/// The board is a fixed 16×16, so there is no camera: the whole level is
/// drawn every frame, two terminal columns per game cell, with the y axis
/// flipped so that (0,0) lands bottom-left on screen.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::board::{Coord, GRID};
use crate::domain::tile::{Orientation, PipeColor, TileKind};
use crate::sim::session::{Phase, Session};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// One explicit dark background everywhere, so inter-row gap pixels
    /// match the cell color on VTE-based terminals.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 28 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel that differs from any real cell, forcing a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Cell { ch, fg, bg: Cell::BASE_BG }
    }

    fn on(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg));
            cx += 1;
        }
    }
}

// ── Layout ──

/// Each game cell is two terminal columns wide.
const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const MSG_GAP: usize = 1;

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size();
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn sync_size(&mut self) {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
        }
    }

    pub fn render(&mut self, session: &Session) -> io::Result<()> {
        self.sync_size();
        self.front.clear();

        match session.phase {
            Phase::Title => self.compose_title(session),
            Phase::Playing => self.compose_playing(session),
            Phase::Victory => self.compose_victory(session),
        }

        self.flush_diff()
    }

    // ── Frame composition ──

    fn compose_title(&mut self, session: &Session) {
        let cx = self.term_w / 2;
        let rows = [
            "P I P E W A R P",
            "",
            "Ride the pipes. Sweep the coins. Corner the boss.",
            "",
            "arrows / wasd  move",
            "r              restart level",
            "q / esc        quit",
            "",
            "press enter to start",
        ];
        for (i, row) in rows.iter().enumerate() {
            let x = cx.saturating_sub(row.chars().count() / 2);
            let fg = if i == 0 { Color::Cyan } else { Color::Grey };
            self.front.put_str(x, 4 + i, row, fg);
        }
        let count = format!("{} sectors loaded", session.levels.len());
        let x = cx.saturating_sub(count.chars().count() / 2);
        self.front.put_str(x, 4 + rows.len() + 1, &count, Color::DarkGrey);
    }

    fn compose_victory(&mut self, session: &Session) {
        let cx = self.term_w / 2;
        let p = &session.player;
        let rows = [
            "THE BOSS IS DOWN".to_string(),
            String::new(),
            format!("coins banked: {}", p.coins),
            format!("steps taken:  {}", p.steps),
            String::new(),
            "press enter to leave".to_string(),
        ];
        for (i, row) in rows.iter().enumerate() {
            let x = cx.saturating_sub(row.chars().count() / 2);
            let fg = if i == 0 { Color::Yellow } else { Color::Grey };
            self.front.put_str(x, 6 + i, row, fg);
        }
    }

    fn compose_playing(&mut self, session: &Session) {
        self.compose_hud(session);
        self.compose_board(session);

        // Transient message under the board.
        if !session.message.is_empty() {
            let row = MAP_ROW + GRID as usize + MSG_GAP;
            self.front.put_str(2, row, &session.message, Color::Yellow);
        }
    }

    fn compose_hud(&mut self, session: &Session) {
        let p = &session.player;
        let total = session.levels.coin_total(p.level).unwrap_or(0);
        let mut hud = format!(
            "[{}] {}   coins {}/{}   steps {}",
            p.level + 1,
            session.current_level_name(),
            p.coins,
            total,
            p.steps
        );
        if let Some(boss) = &session.boss {
            hud.push_str(&format!("   boss {}", boss.health));
        }
        self.front.put_str(2, HUD_ROW, &hud, Color::White);

        if let Some(boss) = &session.boss {
            // Ten-notch health bar next to the HUD line.
            let notches = (boss.health as usize + 9) / 10;
            let x0 = 2 + hud.chars().count() + 1;
            for i in 0..10 {
                let (ch, fg) = if i < notches {
                    ('█', Color::Red)
                } else {
                    ('░', Color::DarkGrey)
                };
                self.front.set(x0 + i, HUD_ROW, Cell::new(ch, fg));
            }
        }
    }

    fn compose_board(&mut self, session: &Session) {
        for index in 0..(GRID * GRID) as usize {
            let tile = session.board.tile_at(index);
            let (glyphs, fg, bg) = tile_cells(tile.kind);
            self.draw_cell(tile.coord, glyphs, fg, bg);
        }

        if let Some(boss) = &session.boss {
            self.draw_cell(boss.pos, ['Ω', ' '], Color::Red, None);
        }
        self.draw_cell(session.player.pos, ['@', ' '], Color::White, None);
    }

    /// Paint one game cell (two terminal columns), flipping y for screen.
    fn draw_cell(&mut self, at: Coord, glyphs: [char; 2], fg: Color, bg: Option<Color>) {
        let sx = 2 + at.x as usize * CELL_W;
        let sy = MAP_ROW + (GRID - 1 - at.y) as usize;
        let bg = bg.unwrap_or(Cell::BASE_BG);
        self.front.set(sx, sy, Cell::on(glyphs[0], fg, bg));
        self.front.set(sx + 1, sy, Cell::on(glyphs[1], fg, bg));
    }

    // ── Diff flush ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let i = y * self.front.width + x;
                let cell = self.front.cells[i];
                if cell == self.back.cells[i] {
                    continue;
                }
                queue!(self.writer, MoveTo(x as u16, y as u16))?;
                if last_fg != Some(cell.fg) {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }

        self.writer.flush()?;
        std::mem::swap(&mut self.front.cells, &mut self.back.cells);
        Ok(())
    }
}

// ── Tile appearance ──

fn pipe_color(color: PipeColor) -> Color {
    match color {
        PipeColor::Green => Color::Green,
        PipeColor::Red => Color::Red,
        PipeColor::Gold => Color::Yellow,
        PipeColor::Blue => Color::Blue,
        PipeColor::Black => Color::DarkGrey,
    }
}

fn facing_glyph(orientation: Orientation) -> char {
    match orientation {
        Orientation::Left => '◀',
        Orientation::Right => '▶',
        Orientation::Up => '▲',
        Orientation::Down => '▼',
    }
}

fn tile_cells(kind: TileKind) -> ([char; 2], Color, Option<Color>) {
    match kind {
        TileKind::Wall => (['█', '█'], Color::Rgb { r: 70, g: 74, b: 94 }, None),
        TileKind::Empty => ([' ', ' '], Color::White, None),
        TileKind::Coin => (['●', ' '], Color::Yellow, None),
        TileKind::Item => (['◆', ' '], Color::Magenta, None),
        TileKind::Pipe { color, .. } => {
            (['(', facing_glyph(kind.orientation())], pipe_color(color), None)
        }
        TileKind::Entrance { .. } => {
            ([facing_glyph(kind.orientation()), '='], Color::Cyan, None)
        }
        TileKind::Exit { .. } => {
            (['=', facing_glyph(kind.orientation())], Color::Cyan, None)
        }
    }
}
