//! Drawing
//!
//! The simulation never draws. A [`Surface`] is handed each circle by the
//! tick's draw visitor: centered label first, then the outline.

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod record;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2dSurface;
pub use record::{CommandBuffer, DrawCommand};

use glam::Vec2;

use crate::config::SimConfig;
use crate::sim::{Circle, Color, Simulation, TickInput, TickReport, tick};

/// A 2D drawing target
pub trait Surface {
    /// Wipe the whole `width` x `height` area
    fn clear(&mut self, width: f32, height: f32);

    /// Stroke a full circle outline
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32);

    /// Fill text centered on `center`
    fn fill_label(&mut self, text: &str, center: Vec2, font: &str, color: Color);
}

/// Per-run drawing parameters taken from the config
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStyle {
    pub line_width: f32,
    pub label_font: String,
    pub label_color: Color,
}

impl DrawStyle {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            line_width: config.line_width,
            label_font: config.label_font.clone(),
            label_color: config.label_color,
        }
    }
}

/// Draw one circle in its current color
pub fn draw_circle<S: Surface + ?Sized>(surface: &mut S, circle: &Circle, style: &DrawStyle) {
    surface.fill_label(&circle.label, circle.pos, &style.label_font, style.label_color);
    surface.stroke_circle(circle.pos, circle.radius, circle.color, style.line_width);
}

/// Clear the surface and run one step that draws every circle before it moves
pub fn render_frame<S: Surface + ?Sized>(
    surface: &mut S,
    sim: &mut Simulation,
    input: &TickInput,
) -> TickReport {
    let style = DrawStyle::from_config(&sim.config);
    surface.clear(sim.bounds.width, sim.bounds.height);
    tick(sim, input, |circle| draw_circle(&mut *surface, circle, &style))
}

/// Run `steps` steps for one host frame, drawing only the last
///
/// `input` is consumed by the first step so clicks apply once. Zero steps
/// leaves both the simulation and the surface untouched.
pub fn render_steps<S: Surface + ?Sized>(
    surface: &mut S,
    sim: &mut Simulation,
    input: &mut TickInput,
    steps: u32,
) -> TickReport {
    let mut report = TickReport::default();
    if steps == 0 {
        return report;
    }

    for _ in 1..steps {
        report.merge(tick(sim, input, |_| {}));
        input.clear();
    }
    report.merge(render_frame(surface, sim, input));
    input.clear();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Bounds, Variant};

    fn sim_with(circles: &[(Vec2, Vec2, f32)], variant: Variant) -> Simulation {
        let config = SimConfig {
            variant,
            ..Default::default()
        };
        let mut sim = Simulation::empty(config, Bounds::new(400.0, 300.0), 1);
        for &(pos, vel, r) in circles {
            sim.insert(Circle::new(0, "x", pos, vel, r, Color::from_u32(0x336699)));
        }
        sim
    }

    #[test]
    fn test_empty_frame_only_clears() {
        let mut sim = sim_with(&[], Variant::Rising);
        let mut buffer = CommandBuffer::default();
        render_frame(&mut buffer, &mut sim, &TickInput::default());
        assert_eq!(
            buffer.commands(),
            &[DrawCommand::Clear {
                width: 400.0,
                height: 300.0
            }]
        );
    }

    #[test]
    fn test_frame_draws_label_then_outline_before_moving() {
        let mut sim = sim_with(
            &[(Vec2::new(100.0, 100.0), Vec2::new(2.0, -1.0), 20.0)],
            Variant::Enclosed,
        );
        let mut buffer = CommandBuffer::default();
        render_frame(&mut buffer, &mut sim, &TickInput::default());

        let cmds = buffer.commands();
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], DrawCommand::Clear { .. }));
        assert_eq!(
            cmds[1],
            DrawCommand::Label {
                text: "x".to_string(),
                center: Vec2::new(100.0, 100.0),
                font: "20px Arial".to_string(),
                color: Color::BLACK,
            }
        );
        assert_eq!(
            cmds[2],
            DrawCommand::Circle {
                center: Vec2::new(100.0, 100.0),
                radius: 20.0,
                color: Color::from_u32(0x336699),
                line_width: 2.0,
            }
        );
        assert_eq!(sim.circles[0].pos, Vec2::new(102.0, 99.0));
    }

    #[test]
    fn test_flashing_circle_draws_highlight() {
        let mut sim = sim_with(
            &[
                (Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0),
                (Vec2::new(110.0, 100.0), Vec2::ZERO, 20.0),
            ],
            Variant::Enclosed,
        );
        let mut buffer = CommandBuffer::default();
        // First frame detects the overlap, second frame shows it
        render_frame(&mut buffer, &mut sim, &TickInput::default());
        buffer.reset();
        render_frame(&mut buffer, &mut sim, &TickInput::default());
        assert_eq!(buffer.circle_colors(), vec![Color::BLUE, Color::BLUE]);
    }

    #[test]
    fn test_render_steps_draws_last_step_only() {
        let mut sim = sim_with(
            &[
                (Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 10.0),
                (Vec2::new(300.0, 100.0), Vec2::new(1.0, 0.0), 10.0),
            ],
            Variant::Rising,
        );
        let mut buffer = CommandBuffer::default();
        let mut input = TickInput::default();
        input.click(Vec2::new(300.0, 100.0));

        let report = render_steps(&mut buffer, &mut sim, &mut input, 3);
        assert_eq!(report.clicked, 1);
        assert!(input.clicks.is_empty());
        assert_eq!(sim.frame, 3);
        // One clear plus label and outline of the surviving circle
        assert_eq!(buffer.commands().len(), 3);
        assert_eq!(buffer.circle_centers(), vec![Vec2::new(102.0, 100.0)]);
    }

    #[test]
    fn test_render_zero_steps_is_noop() {
        let mut sim = sim_with(&[(Vec2::new(100.0, 100.0), Vec2::ONE, 10.0)], Variant::Enclosed);
        let mut buffer = CommandBuffer::default();
        let mut input = TickInput::default();
        assert_eq!(render_steps(&mut buffer, &mut sim, &mut input, 0), TickReport::default());
        assert!(buffer.commands().is_empty());
        assert_eq!(sim.frame, 0);
    }
}
