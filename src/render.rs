use crate::cell::CellState;
use crate::error::ConfigError;
use crate::layout;
use crate::search::StepObserver;
use crate::Grid;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::Color(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ConfigError::Color(hex.to_string()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Color lookup keyed by cell state
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub empty: Rgb,
    pub start: Rgb,
    pub end: Rgb,
    pub barrier: Rgb,
    pub frontier: Rgb,
    pub visited: Rgb,
    pub path: Rgb,
    pub grid_lines: Rgb,
}

impl Palette {
    pub fn color(&self, state: CellState) -> Rgb {
        match state {
            CellState::Empty => self.empty,
            CellState::Start => self.start,
            CellState::End => self.end,
            CellState::Barrier => self.barrier,
            CellState::Frontier => self.frontier,
            CellState::Visited => self.visited,
            CellState::Path => self.path,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        // Nord shades
        Self {
            empty: Rgb(0xec, 0xef, 0xf4),
            start: Rgb(0xa3, 0xbe, 0x8c),
            end: Rgb(0xbf, 0x61, 0x6a),
            barrier: Rgb(0x2e, 0x34, 0x40),
            frontier: Rgb(0x88, 0xc0, 0xd0),
            visited: Rgb(0xb4, 0x8e, 0xad),
            path: Rgb(0xeb, 0xcb, 0x8b),
            grid_lines: Rgb(0x4c, 0x56, 0x6a),
        }
    }
}

/// Paints a whole grid. Called once per frame and once per search step.
pub trait Renderer {
    fn render(&mut self, grid: &Grid);
}

/// Step observer that repaints through a renderer
pub struct RenderObserver<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    steps: usize,
}

impl<'a, R: Renderer + ?Sized> RenderObserver<'a, R> {
    pub fn new(renderer: &'a mut R) -> Self {
        RenderObserver { renderer, steps: 0 }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl<R: Renderer + ?Sized> StepObserver for RenderObserver<'_, R> {
    fn on_step(&mut self, grid: &Grid) {
        self.steps += 1;
        self.renderer.render(grid);
    }
}

/// Headless renderer that keeps every frame as layout text
#[derive(Debug, Default)]
pub struct TextRenderer {
    pub frames: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, grid: &Grid) {
        self.frames.push(layout::render(grid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(Rgb::from_hex("#88c0d0").unwrap(), Rgb(0x88, 0xc0, 0xd0));
        assert_eq!(Rgb::from_hex("FFFFFF").unwrap(), Rgb(255, 255, 255));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("#éé000").is_err());
        assert!(Rgb::from_hex("#+f+f+f").is_err());
    }

    #[test]
    fn every_state_has_a_distinct_color() {
        let palette = Palette::default();
        let colors: Vec<Rgb> = CellState::ALL.iter().map(|&s| palette.color(s)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
