//! Terminal host built on crossterm
//!
//! Paints frames as coloured cell fills scaled from arena units onto the
//! terminal grid, with the score label on the top row. A dedicated thread does
//! the blocking event reads and forwards them over a channel, so the loop
//! never blocks on I/O.

use std::collections::HashMap;
use std::io::Write;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Print},
    terminal,
};

use crate::consts::SIM_DT;
use crate::game_loop::Host;
use crate::input::{InputAdapter, Key};
use crate::renderer::{Color, DrawCommand, Frame, TextAlign};

/// Without key-release reporting a movement key counts as held for this long
/// after its last press or auto-repeat.
const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// Rows reserved above the arena for the score label
const HUD_ROWS: u16 = 1;

const LABEL_COLOR: Color = Color::rgb(255, 255, 0);

/// What a raw terminal key event means to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyInput {
    Down(Key),
    Up(Key),
    Quit,
    Ignored,
}

fn map_key_event(event: &KeyEvent) -> KeyInput {
    let quit = matches!(event.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
        || (event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL));
    if quit && event.kind != KeyEventKind::Release {
        return KeyInput::Quit;
    }

    let key = match event.code {
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        _ => return KeyInput::Ignored,
    };

    match event.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => KeyInput::Down(key),
        KeyEventKind::Release => KeyInput::Up(key),
    }
}

fn is_movement(key: Key) -> bool {
    matches!(
        key,
        Key::ArrowLeft | Key::ArrowRight | Key::Char('a' | 'A' | 'd' | 'D')
    )
}

fn term_color(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Cell-space rectangle, end-exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRect {
    col: u16,
    row: u16,
    cols: u16,
    rows: u16,
}

/// Maps arena units onto the terminal grid below the HUD
#[derive(Debug, Clone, Copy)]
struct Viewport {
    cols: u16,
    rows: u16,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    fn new(term_cols: u16, term_rows: u16, arena_width: f32, arena_height: f32) -> Self {
        let rows = term_rows.saturating_sub(HUD_ROWS);
        Self {
            cols: term_cols,
            rows,
            scale_x: term_cols as f32 / arena_width,
            scale_y: rows as f32 / arena_height,
        }
    }

    /// Every rectangle covers at least one cell so small shots stay visible
    fn rect_cells(&self, x: f32, y: f32, w: f32, h: f32) -> Option<CellRect> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        let max_col = self.cols as f32;
        let max_row = self.rows as f32;

        let c0 = (x * self.scale_x).floor().clamp(0.0, max_col);
        let r0 = (y * self.scale_y).floor().clamp(0.0, max_row);
        let c1 = ((x + w) * self.scale_x).ceil().clamp(0.0, max_col).max(c0 + 1.0);
        let r1 = ((y + h) * self.scale_y).ceil().clamp(0.0, max_row).max(r0 + 1.0);
        if c0 >= max_col || r0 >= max_row {
            return None;
        }

        Some(CellRect {
            col: c0 as u16,
            row: r0 as u16 + HUD_ROWS,
            cols: (c1.min(max_col) - c0) as u16,
            rows: (r1.min(max_row) - r0) as u16,
        })
    }

    fn text_origin(&self, text: &str, x: f32, y: f32, align: TextAlign) -> (u16, u16) {
        let len = text.chars().count() as f32;
        let anchor = x * self.scale_x;
        let col = match align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor - len / 2.0,
            TextAlign::Right => anchor - len,
        };
        let row = (y * self.scale_y).floor().clamp(0.0, self.rows.saturating_sub(1) as f32);
        (col.max(0.0) as u16, row as u16 + HUD_ROWS)
    }
}

/// Full-screen raw-mode host
pub struct TerminalHost<W: Write> {
    out: W,
    rx: mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
    /// Movement keys and when they were last seen pressed
    held: HashMap<Key, Instant>,
    score_label: String,
    last_frame: Instant,
}

impl<W: Write> TerminalHost<W> {
    /// Enter raw mode and the alternate screen. The terminal is restored on drop.
    pub fn new(mut out: W) -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;

        // Terminals speaking the kitty protocol report key releases; others
        // fall back to the hold window.
        let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
            && out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        log::info!("Terminal host ready (key releases reported: {keyboard_enhanced})");

        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || {
            while let Ok(ev) = event::read() {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            out,
            rx,
            keyboard_enhanced,
            held: HashMap::new(),
            score_label: String::new(),
            last_frame: Instant::now(),
        })
    }

    fn release_stale_keys(&mut self, input: &mut InputAdapter) {
        if self.keyboard_enhanced {
            return;
        }
        let now = Instant::now();
        self.held.retain(|key, seen| {
            let fresh = now.duration_since(*seen) <= HOLD_WINDOW;
            if !fresh {
                input.key_up(*key);
            }
            fresh
        });
    }

    fn fill(&mut self, cells: CellRect, color: Color) -> std::io::Result<()> {
        let row_text = " ".repeat(cells.cols as usize);
        self.out.queue(style::SetBackgroundColor(term_color(color)))?;
        for row in cells.row..cells.row + cells.rows {
            self.out.queue(cursor::MoveTo(cells.col, row))?;
            self.out.queue(Print(&row_text))?;
        }
        Ok(())
    }
}

impl<W: Write> Host for TerminalHost<W> {
    type Error = std::io::Error;

    fn pump_input(&mut self, input: &mut InputAdapter) -> std::io::Result<bool> {
        while let Ok(ev) = self.rx.try_recv() {
            let Event::Key(key_event) = ev else {
                continue;
            };
            match map_key_event(&key_event) {
                KeyInput::Quit => return Ok(false),
                KeyInput::Down(key) => {
                    if is_movement(key) {
                        self.held.insert(key, Instant::now());
                    }
                    input.key_down(key);
                }
                KeyInput::Up(key) => {
                    self.held.remove(&key);
                    input.key_up(key);
                }
                KeyInput::Ignored => {}
            }
        }
        self.release_stale_keys(input);
        Ok(true)
    }

    fn present(&mut self, frame: &Frame) -> std::io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let viewport = Viewport::new(cols, rows, frame.width, frame.height);

        self.out.queue(style::ResetColor)?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        for command in &frame.commands {
            match command {
                DrawCommand::FillRect { x, y, w, h, color } => {
                    if let Some(cells) = viewport.rect_cells(*x, *y, *w, *h) {
                        self.fill(cells, *color)?;
                    }
                }
                DrawCommand::Text {
                    text,
                    x,
                    y,
                    align,
                    color,
                    ..
                } => {
                    let (col, row) = viewport.text_origin(text, *x, *y, *align);
                    self.out.queue(cursor::MoveTo(col, row))?;
                    self.out.queue(style::ResetColor)?;
                    self.out.queue(style::SetForegroundColor(term_color(*color)))?;
                    self.out.queue(Print(text))?;
                }
            }
        }

        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(term_color(LABEL_COLOR)))?;
        self.out.queue(Print(&self.score_label))?;
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }

    fn set_score_label(&mut self, text: &str) -> std::io::Result<()> {
        self.score_label = text.to_string();
        Ok(())
    }

    fn next_frame(&mut self) -> f32 {
        let frame = Duration::from_secs_f32(SIM_DT);
        let elapsed = self.last_frame.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt
    }
}

impl<W: Write> Drop for TerminalHost<W> {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(style::ResetColor);
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
