use crate::TermCoords;
use crate::render::{Paint, PixelCanvas};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style::{self, Color}, terminal, Result};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

const BOARD_CHAR: char = '█';

#[derive(Copy, Clone, PartialEq)]
struct Glyph {
    ch: char,
    color: Color,
}

const BLANK: Glyph = Glyph { ch: ' ', color: Color::Reset };

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<Glyph>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: TermCoords,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn size(&self) -> TermCoords {
        (self.width, self.height)
    }

    /// Frames an area of `inner_width` x `inner_height` whose border starts at `top_left`.
    pub fn draw_box(&mut self, top_left: TermCoords, inner_width: u16, inner_height: u16) -> Result<()> {
        let (x0, y0) = top_left;
        let (end_x, end_y) = (x0 + inner_width + 1, y0 + inner_height + 1);

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), ch, Color::Reset)?;
            self.print_at((x, end_y), ch, Color::Reset)?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), '|', Color::Reset)?;
            self.print_at((end_x, y), '|', Color::Reset)?;
        }

        Ok(())
    }

    /// Shows the canvas with each grid cell as two terminal columns, coloured
    /// by the paint at the cell's centre.
    pub fn draw_canvas(&mut self, canvas: &PixelCanvas, origin: TermCoords, cell_size: u32) -> Result<()> {
        let cols = canvas.width() / cell_size;
        let rows = canvas.height() / cell_size;
        let half = cell_size / 2;

        for cy in 0..rows {
            for cx in 0..cols {
                let glyph = glyph_for(canvas.pixel(cx * cell_size + half, cy * cell_size + half));
                let pos = (origin.0 + cx as u16 * 2, origin.1 + cy as u16);
                self.print_at(pos, glyph.ch, glyph.color)?;
                self.print_at((pos.0 + 1, pos.1), glyph.ch, glyph.color)?;
            }
        }

        Ok(())
    }

    /// Overwrites a whole row with `text`, padding with blanks.
    pub fn print_line(&mut self, row: u16, text: &str) -> Result<()> {
        let mut chars = text.chars();
        for x in 0..self.width {
            let ch = chars.next().unwrap_or(' ');
            self.print_at((x, row), ch, Color::Reset)?;
        }

        Ok(())
    }

    pub fn show_message(&mut self, center: TermCoords, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Restore the content from the screen buffer
        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            for x in msg.top_left.0..msg.top_left.0 + msg.width {
                if let Some(glyph) = self.glyph_at((x, y)) {
                    self.emit((x, y), glyph)?;
                }
            }
        }

        self.flush()
    }

    /// Draws and remembers a character. Unchanged cells are not re-sent.
    pub fn print_at(&mut self, pos: TermCoords, ch: char, color: Color) -> Result<()> {
        let idx = match self.index(pos) {
            Some(idx) => idx,
            None => return Ok(()),
        };

        let glyph = Glyph { ch, color };
        if self.screen[idx] == glyph {
            return Ok(());
        }

        self.screen[idx] = glyph;
        self.emit(pos, glyph)
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![BLANK; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at_no_save(&mut self, pos: TermCoords, ch: char) -> Result<()> {
        // Messages are drawn over the buffer without touching it, so hiding
        // one can put the board back.
        if self.index(pos).is_none() {
            return Ok(());
        }

        self.emit(pos, Glyph { ch, color: Color::Reset })
    }

    fn emit(&mut self, pos: TermCoords, glyph: Glyph) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(glyph.color),
            style::Print(glyph.ch),
            style::ResetColor
        )
    }

    fn index(&self, pos: TermCoords) -> Option<usize> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return None;
        }

        Some(self.width as usize * pos.1 as usize + pos.0 as usize)
    }

    fn glyph_at(&self, pos: TermCoords) -> Option<Glyph> {
        self.index(pos).map(|idx| self.screen[idx])
    }
}

fn glyph_for(paint: Paint) -> Glyph {
    match paint {
        Paint::Empty => BLANK,
        Paint::Snake => Glyph { ch: BOARD_CHAR, color: Color::Green },
        Paint::Food => Glyph { ch: BOARD_CHAR, color: Color::DarkYellow },
    }
}
