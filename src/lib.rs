//! Circle Bounce - colliding circles on an HTML canvas
//!
//! Core modules:
//! - `sim`: Deterministic simulation (circles, collisions, exit rules)
//! - `render`: Drawing surfaces (Canvas 2D in the browser, recording headless)
//! - `clock`: Animation-frame to simulation-step mapping
//! - `config`: Layered run configuration

pub mod clock;
pub mod config;
pub mod render;
pub mod sim;

pub use clock::FrameClock;
pub use config::SimConfig;

/// Simulation configuration constants
pub mod consts {
    use crate::sim::Color;

    /// Circles spawned at startup
    pub const DEFAULT_CIRCLE_COUNT: usize = 10;
    /// Collision checks are O(n²); keep n modest
    pub const MAX_CIRCLE_COUNT: usize = 500;

    /// Radius range, `[min, max)` in canvas pixels
    pub const RADIUS_MIN: f32 = 20.0;
    pub const RADIUS_MAX: f32 = 50.0;

    /// Speed range, `[min, max)` in pixels per step
    pub const SPEED_MIN: f32 = 1.0;
    pub const SPEED_MAX: f32 = 5.0;

    /// Steps a collision highlight lasts
    pub const FLASH_FRAMES: u32 = 10;
    pub const HIGHLIGHT_COLOR: Color = Color::BLUE;

    pub const BACKGROUND_COLOR: Color = Color::LIGHT_GREEN;
    pub const LABEL_COLOR: Color = Color::BLACK;
    pub const LABEL_FONT: &str = "20px Arial";
    pub const LINE_WIDTH: f32 = 2.0;

    /// Maximum substeps per frame in fixed-rate mode
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap (seconds) fed to the fixed-rate accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Headless runner canvas and length
    pub const HEADLESS_WIDTH: f32 = 1280.0;
    pub const HEADLESS_HEIGHT: f32 = 720.0;
    pub const HEADLESS_FRAMES: u64 = 600;
}
