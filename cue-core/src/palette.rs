use std::fmt;

use crate::error::PaletteError;

/// A named, fully opaque screen color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CueColor {
    pub name: &'static str,
    pub rgb: [u8; 3],
}

impl CueColor {
    pub const fn new(name: &'static str, rgb: [u8; 3]) -> Self {
        Self { name, rgb }
    }

    pub fn rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.rgb;
        [r, g, b, 255]
    }
}

impl fmt::Display for CueColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb;
        write!(f, "{} (#{r:02X}{g:02X}{b:02X})", self.name)
    }
}

/// Screen color between cues.
pub const NEUTRAL: CueColor = CueColor::new("white", [255, 255, 255]);

pub const RED: CueColor = CueColor::new("red", [255, 0, 0]);
pub const BLUE: CueColor = CueColor::new("blue", [0, 0, 255]);
pub const GREEN: CueColor = CueColor::new("green", [0, 255, 0]);
pub const ORANGE: CueColor = CueColor::new("orange", [255, 165, 0]);
pub const PURPLE: CueColor = CueColor::new("purple", [160, 32, 240]);

/// Non-empty set of cue colors, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuePalette {
    colors: Vec<CueColor>,
}

impl CuePalette {
    pub fn new(colors: Vec<CueColor>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, wrapping around the palette.
    pub fn get(&self, index: usize) -> CueColor {
        self.colors[index % self.colors.len()]
    }

    pub fn colors(&self) -> &[CueColor] {
        &self.colors
    }

    pub fn contains(&self, color: &CueColor) -> bool {
        self.colors.contains(color)
    }
}

impl Default for CuePalette {
    fn default() -> Self {
        Self {
            colors: vec![RED, BLUE, GREEN, ORANGE, PURPLE],
        }
    }
}
