use std::time::Duration;

use crossterm::style::Color;

use crate::ScreenSize;
use crate::error::InitError;
use crate::world::DEFAULT_DENSITY;

/// Offset of the board from the top left corner of the terminal, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub col: ScreenSize,
    pub row: ScreenSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    /// Foreground of the side panel text
    pub text: Color,

    /// Fills the whole screen before anything else is drawn
    pub background: Color,

    /// Live cells
    pub cell: Color,

    /// Dead cells
    pub board: Color,
}

/// Settings for a game. Fixed once the game starts.
#[derive(Debug, Clone)]
pub struct Config {
    /// Board width in cells
    pub width: usize,

    /// Board height in cells
    pub height: usize,

    /// Time slept between two iterations of the game loop
    pub frame_interval: Duration,

    /// Where the board sits. The side panel starts `2 * border.col` cells right of the board.
    pub border: Border,

    pub colors: ColorScheme,

    /// Fraction of the board picked for life when randomizing
    pub density: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 80,
            height: 30,
            frame_interval: Duration::from_secs(1) / 30,
            border: Border { col: 2, row: 1 },
            colors: ColorScheme {
                text: Color::White,
                background: Color::Blue,
                cell: Color::White,
                board: Color::Black,
            },
            density: DEFAULT_DENSITY,
        }
    }
}

impl Config {
    /// Check that the board is non-empty and addressable with terminal coordinates, and that the
    /// density is a fraction
    pub fn validate(&self) -> Result<(), InitError> {
        let (width, height) = (self.width, self.height);

        if width == 0 || height == 0 {
            return Err(InitError::EmptyBoard { width, height });
        }

        let max = ScreenSize::MAX as usize;
        let right = width + 2 * self.border.col as usize;
        let bottom = height + self.border.row as usize;

        if right >= max || bottom >= max {
            return Err(InitError::BoardTooLarge { width, height });
        }

        // also catches NaN
        if !(0.0..=1.0).contains(&self.density) {
            return Err(InitError::InvalidDensity(self.density));
        }

        Ok(())
    }
}
