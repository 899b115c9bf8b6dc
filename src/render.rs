use std::io;
use std::io::IsTerminal;
use std::io::Stdout;
use std::io::Write;

use crossterm::cursor;
use crossterm::execute;
use crossterm::queue;
use crossterm::style::Color;
use crossterm::style::Print;
use crossterm::style::ResetColor;
use crossterm::style::SetBackgroundColor;
use crossterm::style::SetForegroundColor;
use crossterm::terminal;
use crossterm::terminal::BeginSynchronizedUpdate;
use crossterm::terminal::Clear;
use crossterm::terminal::ClearType;
use crossterm::terminal::DisableLineWrap;
use crossterm::terminal::EnableLineWrap;
use crossterm::terminal::EndSynchronizedUpdate;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use tracing::warn;

use crate::CellOffset;
use crate::ScreenSize;
use crate::config::Border;
use crate::config::ColorScheme;
use crate::config::Config;
use crate::error::InitError;
use crate::world::World;

const TITLES: [&str; 2] = ["Conway's Game of Life", "---------------------"];

const INSTRUCTIONS: [&str; 8] = [
    "Controls:",
    "",
    "p    pause",
    "s    step",
    "r    randomize",
    "",
    "q    quit",
    "",
];

/// A grid of colored character cells that is shown a whole frame at a time.
pub trait Surface {
    /// Start a new frame, filled with `bg`
    fn clear(&mut self, bg: Color) -> io::Result<()>;

    fn set_cell(
        &mut self,
        x: ScreenSize,
        y: ScreenSize,
        glyph: char,
        fg: Color,
        bg: Color,
    ) -> io::Result<()>;

    /// Show everything drawn since the last `clear`
    fn flush(&mut self) -> io::Result<()>;
}

/// Draws a string starting at `(x, y)`, one cell per character
pub fn print<S: Surface + ?Sized>(
    surface: &mut S,
    x: ScreenSize,
    y: ScreenSize,
    fg: Color,
    bg: Color,
    msg: &str,
) -> io::Result<()> {
    let mut x = x;

    for c in msg.chars() {
        surface.set_cell(x, y, c, fg, bg)?;
        x = x.saturating_add(1);
    }

    Ok(())
}

/// Lays out the board and the side panel.
pub struct Renderer {
    border: Border,
    colors: ColorScheme,
}

impl Renderer {
    pub fn new(config: &Config) -> Self {
        Self {
            border: config.border,
            colors: config.colors,
        }
    }

    /// Draw a complete frame of `world`.
    ///
    /// Meant for boards accepted by [`Config::validate`]. Anything past the terminal's coordinate
    /// range is clipped rather than wrapped.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, world: &World) -> io::Result<()> {
        let Border { col, row } = self.border;
        let ColorScheme {
            text,
            background,
            cell,
            board,
        } = self.colors;

        let field = world.current();
        let w = ScreenSize::try_from(field.width()).unwrap_or(ScreenSize::MAX);
        let h = ScreenSize::try_from(field.height()).unwrap_or(ScreenSize::MAX);

        surface.clear(background)?;

        // side panel
        let title_x = w.saturating_add(col.saturating_mul(2));
        let title_y = row;
        for (i, t) in (0..).zip(TITLES) {
            print(surface, title_x, title_y.saturating_add(i), text, background, t)?;
        }

        let instruction_y = title_y.saturating_add(TITLES.len() as ScreenSize + 2);
        for (i, t) in (0..).zip(INSTRUCTIONS) {
            print(
                surface,
                title_x,
                instruction_y.saturating_add(i),
                text,
                background,
                t,
            )?;
        }

        let status_y = row.saturating_add(h).saturating_sub(2);
        let status = if world.is_paused() {
            "PAUSED"
        } else {
            "RUNNING"
        };
        print(surface, title_x, status_y, text, background, status)?;

        let generation = format!("Generation: {}", world.generation());
        let generation_y = status_y.saturating_add(1);
        print(surface, title_x, generation_y, text, background, &generation)?;

        // board, dead cells are painted too so nothing of the last frame survives
        for y in 0..h {
            for x in 0..w {
                let color = if field.alive(x as CellOffset, y as CellOffset) {
                    cell
                } else {
                    board
                };

                surface.set_cell(
                    x.saturating_add(col),
                    y.saturating_add(row),
                    ' ',
                    color,
                    color,
                )?;
            }
        }

        surface.flush()
    }
}

/// Exclusive control over the process' terminal.
///
/// Raw mode and the alternate screen are left again on drop.
pub struct Terminal {
    out: Stdout,
}

impl Terminal {
    pub fn acquire() -> Result<Self, InitError> {
        let mut out = io::stdout();

        if !out.is_terminal() {
            return Err(InitError::NotATerminal);
        }

        terminal::enable_raw_mode()?;

        if let Err(e) = execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e.into());
        }

        Ok(Self { out })
    }
}

impl Surface for Terminal {
    fn clear(&mut self, bg: Color) -> io::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            SetBackgroundColor(bg),
            Clear(ClearType::All)
        )
    }

    fn set_cell(
        &mut self,
        x: ScreenSize,
        y: ScreenSize,
        glyph: char,
        fg: Color,
        bg: Color,
    ) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(x, y),
            SetForegroundColor(fg),
            SetBackgroundColor(bg),
            Print(glyph)
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let res = execute!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )
        .and_then(|()| terminal::disable_raw_mode());

        if let Err(e) = res {
            warn!("failed to restore the terminal: {e}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

/// A surface that keeps its cells in memory. Writes outside of it are dropped.
pub struct MemorySurface {
    cells: Vec<MemoryCell>,
    w: ScreenSize,
    h: ScreenSize,

    /// Number of flushed frames
    frames: usize,
}

impl MemorySurface {
    pub fn new(w: ScreenSize, h: ScreenSize) -> Self {
        let blank = MemoryCell {
            glyph: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        };

        Self {
            cells: vec![blank; w as usize * h as usize],
            w,
            h,
            frames: 0,
        }
    }

    pub fn cell(&self, x: ScreenSize, y: ScreenSize) -> Option<MemoryCell> {
        if x < self.w && y < self.h {
            Some(self.cells[self.xy_from(x, y)])
        } else {
            None
        }
    }

    /// The glyphs of row `y`, trailing blanks removed
    pub fn row(&self, y: ScreenSize) -> String {
        (0..self.w)
            .filter_map(|x| self.cell(x, y))
            .map(|c| c.glyph)
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    fn xy_from(&self, x: ScreenSize, y: ScreenSize) -> usize {
        y as usize * self.w as usize + x as usize
    }
}

impl Surface for MemorySurface {
    fn clear(&mut self, bg: Color) -> io::Result<()> {
        self.cells.fill(MemoryCell { glyph: ' ', fg: bg, bg });
        Ok(())
    }

    fn set_cell(
        &mut self,
        x: ScreenSize,
        y: ScreenSize,
        glyph: char,
        fg: Color,
        bg: Color,
    ) -> io::Result<()> {
        if x < self.w && y < self.h {
            let i = self.xy_from(x, y);
            self.cells[i] = MemoryCell { glyph, fg, bg };
        }

        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.frames += 1;
        Ok(())
    }
}
