//! Terminal UI: raw mode, panel drawing and restore on drop

use std::io::{self, Write, stdout};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute, queue};

use crate::board::Board;
use crate::clock::Clock;
use crate::config::Resolution;
use crate::render::{self, FOOTER};
use crate::sampler::SamplingService;

/// Rows taken by the panel header, last lap, time, actions and "LAPS" title
const FIXED_ROWS: u16 = 6;

/// Owns the terminal while alive.
///
/// Creating it switches to raw mode on the alternate screen with mouse
/// capture; dropping it puts everything back.
pub struct Tui {
    resolution: Resolution,
}

impl Tui {
    pub fn new(resolution: Resolution) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let tui = Self { resolution };
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        Ok(tui)
    }

    pub fn restore(&self) -> io::Result<()> {
        execute!(
            stdout(),
            cursor::Show,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn size() -> (u16, u16) {
        terminal::size().unwrap_or((80, 24))
    }

    /// Redraw every panel and the footer
    pub fn draw<S, C>(&mut self, board: &Board<S, C>) -> io::Result<()>
    where
        S: SamplingService,
        C: Clock + Clone,
    {
        let mut out = stdout();
        let (width, height) = Self::size();
        let count = board.watches().len();
        let column_width = render::panel_width(width, count);
        let max_laps = height.saturating_sub(FIXED_ROWS + 2) as usize;

        queue!(out, terminal::Clear(ClearType::All))?;

        for (i, watch) in board.watches().iter().enumerate() {
            let selected = board.is_multi() && watch.id() == board.selected();
            let color = if selected { Color::White } else { Color::Grey };
            let x = column_width * i as u16;
            let inner = column_width.saturating_sub(1) as usize;

            let lines = render::panel_lines(watch, self.resolution, board.laps_enabled(), max_laps);
            for (row, line) in lines.iter().enumerate() {
                let row = row as u16;
                if row + 1 >= height {
                    break;
                }
                queue!(out, cursor::MoveTo(x, row), SetForegroundColor(color))?;
                // Row 2 is the main time readout
                if row == 2 || (row == 0 && selected) {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                if selected && row == 0 {
                    queue!(out, SetAttribute(Attribute::Reverse))?;
                }
                queue!(
                    out,
                    Print(render::center(line, inner)),
                    SetAttribute(Attribute::Reset)
                )?;
            }
        }

        queue!(
            out,
            cursor::MoveTo(0, height.saturating_sub(1)),
            SetForegroundColor(Color::DarkGrey),
            Print(render::center(FOOTER, width as usize)),
            SetAttribute(Attribute::Reset)
        )?;
        out.flush()
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
