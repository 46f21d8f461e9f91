//! Deterministic simulation module
//!
//! All circle behavior lives here. This module must stay pure:
//! - One step per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod circle;
pub mod color;
pub mod state;
pub mod tick;

pub use circle::{Circle, FlashState};
pub use color::{Color, ColorParseError};
pub use state::{Bounds, Simulation, Variant};
pub use tick::{TickInput, TickReport, resolve_collisions, tick};
