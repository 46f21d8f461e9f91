//! One simulation step
//!
//! Order within a step:
//! 1. queued clicks (rising only), newest circle under the cursor first
//! 2. per circle: draw, advance, count down flash, mark if it left the top
//! 3. drop marked circles in one pass
//! 4. pairwise collisions in `i < j` order

use glam::Vec2;

use super::circle::Circle;
use super::color::Color;
use super::state::Simulation;

/// Input gathered between frames, applied atomically at the start of a step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Click positions in canvas coordinates, oldest first
    pub clicks: Vec<Vec2>,
}

impl TickInput {
    pub fn click(&mut self, point: Vec2) {
        self.clicks.push(point);
    }

    pub fn clear(&mut self) {
        self.clicks.clear();
    }
}

/// What happened during one or more steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Circles removed by clicks
    pub clicked: usize,
    /// Circles removed for leaving through the top edge
    pub exited: usize,
    /// Overlapping pairs resolved
    pub collisions: usize,
}

impl TickReport {
    pub fn merge(&mut self, other: TickReport) {
        self.clicked += other.clicked;
        self.exited += other.exited;
        self.collisions += other.collisions;
    }
}

/// Advance the simulation by one frame
///
/// `draw` sees every circle that survived the click pass, in collection
/// order, before it moves.
pub fn tick<F>(state: &mut Simulation, input: &TickInput, mut draw: F) -> TickReport
where
    F: FnMut(&Circle),
{
    let mut report = TickReport::default();
    let variant = state.variant();

    if variant.accepts_clicks() {
        for &point in &input.clicks {
            if let Some(circle) = state.remove_at(point) {
                log::debug!("{} removed by click at ({}, {})", circle.label, point.x, point.y);
                report.clicked += 1;
            }
        }
    }

    let bounds = state.bounds;
    let mut exited = Vec::with_capacity(state.circles.len());
    for circle in state.circles.iter_mut() {
        draw(circle);
        circle.advance(bounds, variant);
        circle.tick_flash();
        exited.push(variant.removes_exited() && circle.has_exited_top());
    }

    if exited.iter().any(|&gone| gone) {
        let mut marks = exited.into_iter();
        state.circles.retain(|circle| {
            let gone = marks.next().unwrap_or(false);
            if gone {
                log::debug!("{} left the canvas", circle.label);
                report.exited += 1;
            }
            !gone
        });
    }

    report.collisions = resolve_collisions(
        &mut state.circles,
        state.config.highlight_color,
        state.config.flash_frames,
        variant.separates_overlaps(),
    );

    state.frame += 1;
    report
}

/// Flash and resolve every intersecting pair, `i < j`, in collection order
///
/// Each pair sees the positions left by earlier pairs in the same pass, so
/// three or more simultaneous overlaps resolve order-dependently.
pub fn resolve_collisions(
    circles: &mut [Circle],
    highlight: Color,
    flash_frames: u32,
    separate: bool,
) -> usize {
    let mut hits = 0;
    for i in 0..circles.len() {
        let (head, tail) = circles.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if a.intersects(b) {
                a.apply_flash(highlight, flash_frames);
                b.apply_flash(highlight, flash_frames);
                a.resolve_collision(b, separate);
                hits += 1;
            }
        }
    }
    hits
}
