//! The circle entity and its per-frame geometry
//!
//! Everything here operates on one or two circles at a time; ordering across
//! the whole collection is the job of [`super::tick`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Color;
use super::state::{Bounds, Variant};

/// Collision highlight state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlashState {
    #[default]
    Idle,
    /// Highlighted; `frames_remaining` is always > 0
    Flashing { frames_remaining: u32 },
}

/// A moving, labelled circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: u32,
    pub label: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Color currently drawn (highlight while flashing)
    pub color: Color,
    original_color: Color,
    flash: FlashState,
}

impl Circle {
    pub fn new(id: u32, label: impl Into<String>, pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            id,
            label: label.into(),
            pos,
            vel,
            radius,
            color,
            original_color: color,
            flash: FlashState::Idle,
        }
    }

    /// Color assigned at spawn
    pub fn original_color(&self) -> Color {
        self.original_color
    }

    pub fn flash_state(&self) -> FlashState {
        self.flash
    }

    pub fn is_flashing(&self) -> bool {
        matches!(self.flash, FlashState::Flashing { .. })
    }

    pub fn flash_frames_remaining(&self) -> u32 {
        match self.flash {
            FlashState::Idle => 0,
            FlashState::Flashing { frames_remaining } => frames_remaining,
        }
    }

    /// Move one step, then reflect off the edges the variant confines
    ///
    /// Horizontal edges always reflect. Vertical edges only reflect in
    /// [`Variant::Enclosed`]; rising circles are free to leave through the top.
    pub fn advance(&mut self, bounds: Bounds, variant: Variant) {
        self.pos += self.vel;

        self.vel.x = reflect_axis(self.pos.x, self.radius, bounds.width, self.vel.x);
        if variant.reflects_vertically() {
            self.vel.y = reflect_axis(self.pos.y, self.radius, bounds.height, self.vel.y);
        }
    }

    /// Count down an active flash, restoring the spawn color when it ends
    pub fn tick_flash(&mut self) {
        if let FlashState::Flashing { frames_remaining } = self.flash {
            let left = frames_remaining.saturating_sub(1);
            if left == 0 {
                self.flash = FlashState::Idle;
                self.color = self.original_color;
            } else {
                self.flash = FlashState::Flashing {
                    frames_remaining: left,
                };
            }
        }
    }

    /// Strict overlap test; circles that only touch do not collide
    pub fn intersects(&self, other: &Circle) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }

    /// Switch to the highlight color and (re)start the flash timer
    pub fn apply_flash(&mut self, highlight: Color, frames: u32) {
        self.color = highlight;
        self.flash = FlashState::Flashing {
            frames_remaining: frames.max(1),
        };
    }

    /// Exchange velocities with `other`, optionally pushing the pair apart first
    ///
    /// Separation splits the overlap evenly along the center-to-center axis.
    /// Coincident centers have no axis, so they are split along +x.
    pub fn resolve_collision(&mut self, other: &mut Circle, separate: bool) {
        if separate {
            let delta = self.pos - other.pos;
            let distance = delta.length();
            let overlap = self.radius + other.radius - distance;

            if overlap > 0.0 {
                let axis = if distance > f32::EPSILON {
                    delta / distance
                } else {
                    Vec2::X
                };
                let push = axis * (overlap / 2.0);
                self.pos += push;
                other.pos -= push;
            }
        }

        std::mem::swap(&mut self.vel, &mut other.vel);
    }

    /// Strict point-in-circle test used for click removal
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.radius
    }

    /// Entirely above the top edge of the canvas
    pub fn has_exited_top(&self) -> bool {
        self.pos.y + self.radius < 0.0
    }
}

/// Point a velocity component back inside `[0, extent]` when the circle pokes out
///
/// Direction-aware so that a circle already heading inward is left alone.
#[inline]
fn reflect_axis(center: f32, radius: f32, extent: f32, vel: f32) -> f32 {
    if center + radius > extent {
        -vel.abs()
    } else if center - radius < 0.0 {
        vel.abs()
    } else {
        vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 600.0,
    };

    fn circle(x: f32, y: f32, r: f32) -> Circle {
        Circle::new(1, "C1", Vec2::new(x, y), Vec2::ZERO, r, Color::from_u32(0x123456))
    }

    #[test]
    fn test_touching_circles_do_not_intersect() {
        let a = circle(0.0, 0.0, 10.0);
        let b = circle(20.0, 0.0, 10.0);
        assert!(!a.intersects(&b));

        let c = circle(19.9, 0.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_resolve_swaps_velocities_exactly() {
        let mut a = circle(0.0, 0.0, 10.0);
        let mut b = circle(100.0, 0.0, 10.0);
        a.vel = Vec2::new(1.5, -3.0);
        b.vel = Vec2::new(-4.25, 2.0);

        a.resolve_collision(&mut b, true);
        assert_eq!(a.vel, Vec2::new(-4.25, 2.0));
        assert_eq!(b.vel, Vec2::new(1.5, -3.0));
        // Far apart: no positional change
        assert_eq!(a.pos, Vec2::ZERO);
        assert_eq!(b.pos, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_separation_splits_overlap() {
        let mut a = circle(0.0, 0.0, 10.0);
        let mut b = circle(5.0, 0.0, 10.0);

        a.resolve_collision(&mut b, true);
        assert!((a.pos.x - (-7.5)).abs() < 1e-4);
        assert!((b.pos.x - 12.5).abs() < 1e-4);
        assert!((a.pos.distance(b.pos) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_no_separation_when_disabled() {
        let mut a = circle(0.0, 0.0, 10.0);
        let mut b = circle(5.0, 0.0, 10.0);

        a.resolve_collision(&mut b, false);
        assert_eq!(a.pos, Vec2::ZERO);
        assert_eq!(b.pos, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_coincident_centers_stay_finite() {
        let mut a = circle(50.0, 50.0, 10.0);
        let mut b = circle(50.0, 50.0, 15.0);

        a.resolve_collision(&mut b, true);
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!((a.pos.distance(b.pos) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_flash_lasts_exactly_n_frames() {
        let mut c = circle(0.0, 0.0, 10.0);
        let original = c.color;

        c.apply_flash(Color::BLUE, 10);
        assert!(c.is_flashing());
        assert_eq!(c.color, Color::BLUE);

        for _ in 0..9 {
            c.tick_flash();
            assert!(c.is_flashing());
            assert_eq!(c.color, Color::BLUE);
        }
        c.tick_flash();
        assert!(!c.is_flashing());
        assert_eq!(c.flash_frames_remaining(), 0);
        assert_eq!(c.color, original);
    }

    #[test]
    fn test_flash_restarts_while_flashing() {
        let mut c = circle(0.0, 0.0, 10.0);
        c.apply_flash(Color::BLUE, 10);
        for _ in 0..7 {
            c.tick_flash();
        }
        assert_eq!(c.flash_frames_remaining(), 3);

        c.apply_flash(Color::BLUE, 10);
        assert_eq!(c.flash_state(), FlashState::Flashing { frames_remaining: 10 });
    }

    #[test]
    fn test_tick_flash_idle_is_noop() {
        let mut c = circle(0.0, 0.0, 10.0);
        c.tick_flash();
        assert_eq!(c.flash_state(), FlashState::Idle);
        assert_eq!(c.color, c.original_color());
    }

    #[test]
    fn test_enclosed_right_edge_flips_once() {
        let mut c = circle(795.0, 300.0, 10.0);
        c.vel = Vec2::new(3.0, 0.0);

        c.advance(BOUNDS, Variant::Enclosed);
        assert_eq!(c.vel.x, -3.0);

        // Still past the edge but heading back in: no second flip
        c.pos.x = 795.0;
        c.advance(BOUNDS, Variant::Enclosed);
        assert_eq!(c.vel.x, -3.0);
    }

    #[test]
    fn test_enclosed_reflects_vertically() {
        let mut top = circle(400.0, 11.0, 10.0);
        top.vel = Vec2::new(0.0, -2.0);
        top.advance(BOUNDS, Variant::Enclosed);
        assert_eq!(top.vel.y, 2.0);

        let mut bottom = circle(400.0, 589.0, 10.0);
        bottom.vel = Vec2::new(0.0, 2.0);
        bottom.advance(BOUNDS, Variant::Enclosed);
        assert_eq!(bottom.vel.y, -2.0);
    }

    #[test]
    fn test_rising_ignores_vertical_edges() {
        let mut c = circle(400.0, 5.0, 10.0);
        c.vel = Vec2::new(1.0, -4.0);
        c.advance(BOUNDS, Variant::Rising);
        assert_eq!(c.vel, Vec2::new(1.0, -4.0));
        assert_eq!(c.pos, Vec2::new(401.0, 1.0));

        let mut left = circle(11.0, 300.0, 10.0);
        left.vel = Vec2::new(-2.0, -1.0);
        left.advance(BOUNDS, Variant::Rising);
        assert_eq!(left.vel.x, 2.0);
    }

    #[test]
    fn test_contains_point_is_strict() {
        let c = circle(100.0, 100.0, 20.0);
        assert!(c.contains_point(Vec2::new(110.0, 100.0)));
        assert!(!c.contains_point(Vec2::new(120.0, 100.0)));
        assert!(!c.contains_point(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_has_exited_top() {
        assert!(circle(0.0, -10.5, 10.0).has_exited_top());
        assert!(!circle(0.0, -10.0, 10.0).has_exited_top());
        assert!(!circle(0.0, 5.0, 10.0).has_exited_top());
    }

    proptest! {
        #[test]
        fn prop_intersects_is_symmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0, ar in 1.0f32..60.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0, br in 1.0f32..60.0,
        ) {
            let a = circle(ax, ay, ar);
            let b = circle(bx, by, br);
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn prop_resolve_is_exact_swap(
            avx in -5.0f32..5.0, avy in -5.0f32..5.0,
            bvx in -5.0f32..5.0, bvy in -5.0f32..5.0,
            dx in -30.0f32..30.0, dy in -30.0f32..30.0,
        ) {
            let mut a = circle(0.0, 0.0, 20.0);
            let mut b = circle(dx, dy, 20.0);
            a.vel = Vec2::new(avx, avy);
            b.vel = Vec2::new(bvx, bvy);

            a.resolve_collision(&mut b, true);
            prop_assert_eq!(a.vel, Vec2::new(bvx, bvy));
            prop_assert_eq!(b.vel, Vec2::new(avx, avy));
            prop_assert!(a.pos.is_finite() && b.pos.is_finite());
        }
    }
}
