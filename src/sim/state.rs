//! Simulation state and spawning
//!
//! The circle collection lives here and nowhere else. It is only grown by
//! spawning and only shrunk by the exit rules applied in [`super::tick`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::circle::Circle;
use super::color::Color;
use crate::config::{SimConfig, SpawnRange};

/// Which set of rules the simulation runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Circles rise from below the canvas, leave through the top and can be
    /// clicked away. Overlapping pairs are pushed apart.
    #[default]
    Rising,
    /// Circles bounce inside all four edges forever
    Enclosed,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Rising => "rising",
            Variant::Enclosed => "enclosed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rising" | "1" => Some(Variant::Rising),
            "enclosed" | "bounded" | "2" => Some(Variant::Enclosed),
            _ => None,
        }
    }

    /// The other variant (for the toggle key)
    pub fn toggled(self) -> Self {
        match self {
            Variant::Rising => Variant::Enclosed,
            Variant::Enclosed => Variant::Rising,
        }
    }

    pub fn reflects_vertically(self) -> bool {
        self == Variant::Enclosed
    }

    /// Circles above the top edge are dropped
    pub fn removes_exited(self) -> bool {
        self == Variant::Rising
    }

    pub fn accepts_clicks(self) -> bool {
        self == Variant::Rising
    }

    /// Overlapping pairs are separated on collision
    pub fn separates_overlaps(self) -> bool {
        self == Variant::Rising
    }
}

/// Canvas size in canvas pixels; origin top-left, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: SimConfig,
    pub bounds: Bounds,
    /// Live circles, in spawn order
    pub circles: Vec<Circle>,
    /// Steps taken so far
    pub frame: u64,
    rng: Pcg32,
    next_id: u32,
}

impl Simulation {
    /// Create a simulation and spawn `config.circle_count` circles
    pub fn new(config: SimConfig, bounds: Bounds, seed: u64) -> Self {
        let count = config.circle_count;
        let mut sim = Self::empty(config, bounds, seed);
        sim.spawn_circles(count);

        log::info!(
            "Spawned {} circles ({}) on {}x{} canvas, seed {}",
            sim.circles.len(),
            sim.variant().as_str(),
            bounds.width,
            bounds.height,
            seed
        );
        sim
    }

    /// Create a simulation with no circles
    pub fn empty(config: SimConfig, bounds: Bounds, seed: u64) -> Self {
        Self {
            seed,
            config,
            bounds,
            circles: Vec::new(),
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_circles(&mut self, count: usize) {
        self.circles.reserve(count);
        for _ in 0..count {
            self.spawn_circle();
        }
    }

    /// Spawn one random circle according to the variant's entry rules
    pub fn spawn_circle(&mut self) -> &Circle {
        let id = self.next_entity_id();
        let Bounds { width, height } = self.bounds;

        let radius = sample(&mut self.rng, self.config.radius);
        let x = spawn_coord(&mut self.rng, width, radius);
        let color = Color::random(&mut self.rng);
        let speed = sample(&mut self.rng, self.config.speed);

        let (pos, vel) = match self.config.variant {
            Variant::Rising => {
                // Just below the bottom edge, heading up
                let dx = random_sign(&mut self.rng) * speed;
                (Vec2::new(x, height + radius), Vec2::new(dx, -speed))
            }
            Variant::Enclosed => {
                let y = spawn_coord(&mut self.rng, height, radius);
                let dx = random_sign(&mut self.rng) * speed;
                let dy = random_sign(&mut self.rng) * speed;
                (Vec2::new(x, y), Vec2::new(dx, dy))
            }
        };

        let circle = Circle::new(id, format!("C{id}"), pos, vel, radius, color);
        self.circles.push(circle);
        &self.circles[self.circles.len() - 1]
    }

    /// Append an already-built circle (keeps IDs unique)
    pub fn insert(&mut self, mut circle: Circle) {
        circle.id = self.next_entity_id();
        self.circles.push(circle);
    }

    /// Index of the topmost circle under `point`
    ///
    /// Later circles draw over earlier ones, so the search runs newest first.
    pub fn hit_test(&self, point: Vec2) -> Option<usize> {
        self.circles.iter().rposition(|c| c.contains_point(point))
    }

    /// Remove at most one circle under `point`, topmost first
    pub fn remove_at(&mut self, point: Vec2) -> Option<Circle> {
        let index = self.hit_test(point)?;
        Some(self.circles.remove(index))
    }
}

/// Uniform sample from `[min, max)`, or `min` for an empty range
fn sample<R: Rng>(rng: &mut R, range: SpawnRange) -> f32 {
    if range.max > range.min {
        rng.random_range(range.min..range.max)
    } else {
        range.min
    }
}

/// Coordinate keeping a circle of `radius` fully inside `[0, extent]`
///
/// When the circle is wider than the extent it is centered instead.
fn spawn_coord<R: Rng>(rng: &mut R, extent: f32, radius: f32) -> f32 {
    let span = extent - radius * 2.0;
    if span > 0.0 {
        rng.random::<f32>() * span + radius
    } else {
        extent / 2.0
    }
}

fn random_sign<R: Rng>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}
