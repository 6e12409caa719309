//! Terminal drawing of a [`Snapshot`].

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, Stylize},
    terminal::{Clear, ClearType},
};

use crate::actor::Position;
use crate::error::SetupError;
use crate::logic::Snapshot;

/// Border thickness, in cell units.
pub const BORDER: u16 = 1;
/// Rows below the board for the score line and help.
pub const STATUS_ROWS: u16 = 2;
/// How long the settings text stays up before it has faded out.
pub const SETTINGS_TEXT_DISPLAY: Duration = Duration::from_secs(5);

const BORDER_COLOR: Color = Color::DarkGreen;
const SNAKE_HEAD_COLOR: Color = Color::Green;
const SNAKE_BODY_COLOR: Color = Color::DarkGreen;
const FOOD_COLOR: Color = Color::DarkRed;
const SCORE_COLOR: Color = Color::Grey;
const HIGH_SCORE_COLOR: Color = Color::Yellow;

/// Where the board sits on screen. A cell is `cell_size` rows tall and
/// twice as many columns wide so it looks square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    board_size: u32,
    cell_size: u16,
    /// Top-left corner of cell (0, 0), in cell units.
    start: u16,
    /// Side of the bordered square, in cell units.
    outer: u16,
}

impl Layout {
    pub fn new((columns, rows): (u16, u16), board_size: u32) -> Result<Layout, SetupError> {
        let side = (columns / 2).min(rows.saturating_sub(STATUS_ROWS));
        let usable = side.saturating_sub(2 * BORDER);
        let cell_size = u32::from(usable) / board_size.max(1);
        if cell_size < 1 {
            return Err(SetupError::BoardTooLarge { board_size, usable });
        }
        // cell_size <= usable, so it fits in u16 again.
        let cell_size = cell_size as u16;
        let remainder = usable - cell_size * board_size as u16;
        let left_margin = remainder / 2;

        Ok(Layout {
            board_size,
            cell_size,
            start: BORDER + left_margin,
            outer: side,
        })
    }

    pub fn cell_size(&self) -> u16 {
        self.cell_size
    }

    /// Screen (column, row) of the top-left character of a board cell, or
    /// `None` for a position off the board.
    pub fn cell_origin(&self, position: Position) -> Option<(u16, u16)> {
        let size = self.board_size as i32;
        if !(0..size).contains(&position.x) || !(0..size).contains(&position.y) {
            return None;
        }
        let col = self.start + position.x as u16 * self.cell_size;
        let row = self.start + position.y as u16 * self.cell_size;
        Some((col * 2, row))
    }

    fn status_row(&self) -> u16 {
        self.outer
    }
}

pub struct Renderer {
    layout: Layout,
    frame_time: Duration,
    settings_text_left: Duration,
}

impl Renderer {
    pub fn new(layout: Layout, frame_time: Duration) -> Self {
        Renderer {
            layout,
            frame_time,
            settings_text_left: SETTINGS_TEXT_DISPLAY,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// Opacity of the settings text, 1.0 when fresh and 0.0 once gone.
    pub fn text_opacity(&self) -> f32 {
        self.settings_text_left.as_secs_f32() / SETTINGS_TEXT_DISPLAY.as_secs_f32()
    }

    fn count_down_timers(&mut self) {
        self.settings_text_left = self.settings_text_left.saturating_sub(self.frame_time);
    }

    pub fn draw_frame<W: Write>(&mut self, out: &mut W, snapshot: &Snapshot<'_>) -> io::Result<()> {
        self.count_down_timers();

        queue!(out, Clear(ClearType::All))?;
        self.draw_border(out)?;

        for segment in snapshot.segments.iter() {
            self.fill_cell(out, *segment, "▓", SNAKE_BODY_COLOR)?;
        }
        self.fill_cell(out, snapshot.head, "█", SNAKE_HEAD_COLOR)?;
        self.fill_cell(out, snapshot.food, "●", FOOD_COLOR)?;

        if self.text_opacity() > 0.0 {
            self.draw_settings_text(out, snapshot)?;
        }
        self.draw_score(out, snapshot)?;

        out.flush()
    }

    fn draw_border<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let width = self.layout.outer * 2;
        let last_row = self.layout.outer - 1;
        let edge = "#".repeat(width as usize);

        queue!(out, MoveTo(0, 0), Print(edge.as_str().with(BORDER_COLOR)))?;
        for row in 1..last_row {
            queue!(
                out,
                MoveTo(0, row),
                Print("##".with(BORDER_COLOR)),
                MoveTo(width - 2, row),
                Print("##".with(BORDER_COLOR))
            )?;
        }
        queue!(out, MoveTo(0, last_row), Print(edge.as_str().with(BORDER_COLOR)))?;
        Ok(())
    }

    fn fill_cell<W: Write>(
        &self,
        out: &mut W,
        position: Position,
        glyph: &str,
        color: Color,
    ) -> io::Result<()> {
        let Some((col, row)) = self.layout.cell_origin(position) else {
            return Ok(());
        };
        let size = self.layout.cell_size;
        let line = glyph.repeat(size as usize * 2);
        for offset in 0..size {
            queue!(out, MoveTo(col, row + offset), Print(line.as_str().with(color)))?;
        }
        Ok(())
    }

    fn draw_settings_text<W: Write>(&self, out: &mut W, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let level = (255.0 * self.text_opacity()).round() as u8;
        let color = Color::Rgb {
            r: level,
            g: level,
            b: level,
        };
        let lines = [
            format!("Speed {}", snapshot.settings.game_speed),
            format!("Board size {}", snapshot.board_size()),
            format!("High score {}", snapshot.high_score),
        ];
        let width = self.layout.outer * 2;
        for (index, text) in lines.iter().enumerate() {
            let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
            let row = BORDER + 1 + 2 * index as u16;
            if row + 1 >= self.layout.outer {
                break;
            }
            queue!(out, MoveTo(col, row), Print(text.as_str().with(color)))?;
        }
        Ok(())
    }

    fn draw_score<W: Write>(&self, out: &mut W, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let row = self.layout.status_row();
        let score = format!("Score: {}", snapshot.score);
        if snapshot.new_high_score {
            queue!(out, MoveTo(0, row), Print(score.as_str().with(HIGH_SCORE_COLOR).bold()))?;
        } else {
            queue!(out, MoveTo(0, row), Print(score.as_str().with(SCORE_COLOR)))?;
        }
        queue!(
            out,
            MoveTo(0, row + 1),
            Print("Arrows/WASD or drag to steer, 'q' to quit")
        )
    }
}
