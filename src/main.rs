//! Circle Bounce entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use circle_bounce::render::{Canvas2dSurface, render_steps};
    use circle_bounce::sim::{Bounds, Simulation, TickInput};
    use circle_bounce::{FrameClock, SimConfig};

    /// App instance holding all state
    struct App {
        config: SimConfig,
        sim: Simulation,
        surface: Canvas2dSurface,
        clock: FrameClock,
        /// Clicks queued by event handlers, drained by the next frame
        input: TickInput,
        paused: bool,
        reported_empty: bool,
    }

    impl App {
        fn new(config: SimConfig, bounds: Bounds, surface: Canvas2dSurface) -> Self {
            let seed = config.seed.unwrap_or_else(fresh_seed);
            Self {
                sim: Simulation::new(config.clone(), bounds, seed),
                clock: FrameClock::from_config(config.fixed_step_hz),
                config,
                surface,
                input: TickInput::default(),
                paused: false,
                reported_empty: false,
            }
        }

        /// Respawn everything on the same canvas
        fn restart(&mut self, seed: u64) {
            let bounds = self.sim.bounds;
            self.sim = Simulation::new(self.config.clone(), bounds, seed);
            self.clock.reset();
            self.input.clear();
            self.reported_empty = false;
        }

        fn toggle_variant(&mut self) {
            self.config.variant = self.config.variant.toggled();
            self.config.save();
            self.restart(fresh_seed());
            log::info!("Switched to {} variant", self.config.variant.as_str());
        }

        fn toggle_pause(&mut self) {
            self.paused = !self.paused;
            self.clock.reset();
            self.input.clear();
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }

        /// Run the steps due for this animation frame and draw the last one
        fn frame(&mut self, time: f64) {
            if self.paused {
                self.input.clear();
                return;
            }

            let steps = self.clock.advance(time);
            let report = render_steps(&mut self.surface, &mut self.sim, &mut self.input, steps);
            if report.clicked > 0 || report.exited > 0 {
                log::debug!(
                    "Frame {}: {} clicked, {} exited, {} left",
                    self.sim.frame,
                    report.clicked,
                    report.exited,
                    self.sim.len()
                );
            }

            if self.sim.is_empty() && !self.reported_empty {
                log::info!("No circles left after {} frames (press R to restart)", self.sim.frame);
                self.reported_empty = true;
            }
        }
    }

    fn fresh_seed() -> u64 {
        js_sys::Date::now() as u64
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already initialized: {e}").into());
        }

        log::info!("Circle Bounce starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        // Viewport size at startup; not re-queried on resize
        let width = window.inner_width()?.as_f64().unwrap_or(0.0) as f32;
        let height = window.inner_height()?.as_f64().unwrap_or(0.0) as f32;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let config = SimConfig::load();
        for warning in config.validate() {
            log::warn!("Config: {}", warning);
        }
        let config = config.sanitized();

        canvas
            .style()
            .set_property("background", &config.background_color.to_css())?;

        let surface = Canvas2dSurface::from_canvas(&canvas)?;
        let app = Rc::new(RefCell::new(App::new(config, Bounds::new(width, height), surface)));

        setup_input_handlers(&canvas, &window, app.clone())?;

        request_animation_frame(app);

        log::info!("Circle Bounce running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        window: &web_sys::Window,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        // Click - queue for removal at the start of the next frame
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                app.borrow_mut().input.click(point);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                match event.key().as_str() {
                    "r" | "R" => {
                        let seed = fresh_seed();
                        app.restart(seed);
                        log::info!("Restarted with seed: {}", seed);
                    }
                    "v" | "V" => app.toggle_variant(),
                    "p" | "P" | " " => app.toggle_pause(),
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::error!("Window gone, stopping animation loop");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            animation_loop(app, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn animation_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use circle_bounce::SimConfig;
    use circle_bounce::consts::*;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Circle Bounce (native, headless) starting...");
    log::info!("Run with `trunk serve` for the canvas version");

    // Usage: circle-bounce [config.json] [frames]
    let mut config = SimConfig::default();
    let mut frames = HEADLESS_FRAMES;
    for arg in std::env::args().skip(1) {
        if let Ok(n) = arg.parse::<u64>() {
            frames = n;
            continue;
        }
        match SimConfig::load_file(&arg) {
            Ok(loaded) => {
                log::info!("Loaded config from {}", arg);
                config = loaded;
            }
            Err(e) => log::warn!("{} ({}), using defaults", e, arg),
        }
    }

    for warning in config.validate() {
        log::warn!("Config: {}", warning);
    }
    headless::run(config.sanitized(), frames);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use circle_bounce::consts::{HEADLESS_HEIGHT, HEADLESS_WIDTH};
    use circle_bounce::render::{CommandBuffer, render_steps};
    use circle_bounce::sim::{Bounds, Simulation, TickInput, TickReport};
    use circle_bounce::{FrameClock, SimConfig};

    /// Simulated display refresh rate
    const HOST_HZ: f64 = 60.0;

    pub fn run(config: SimConfig, frames: u64) {
        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        let mut clock = FrameClock::from_config(config.fixed_step_hz);
        let mut sim = Simulation::new(config, Bounds::new(HEADLESS_WIDTH, HEADLESS_HEIGHT), seed);
        let mut surface = CommandBuffer::default();
        let mut input = TickInput::default();
        let mut total = TickReport::default();

        for frame in 0..frames {
            surface.reset();
            let steps = clock.advance(frame as f64 * 1000.0 / HOST_HZ);
            total.merge(render_steps(&mut surface, &mut sim, &mut input, steps));

            if (frame + 1) % 60 == 0 {
                log::info!(
                    "Frame {}: {} circles drawn, {} collisions, {} exited",
                    frame + 1,
                    surface.circle_count(),
                    total.collisions,
                    total.exited
                );
            }

            if sim.is_empty() {
                log::info!("No circles left after {} steps", sim.frame);
                break;
            }
        }

        log::info!(
            "Done: {} steps, {} circles remaining, {} collisions resolved",
            sim.frame,
            sim.len(),
            total.collisions
        );

        match serde_json::to_string_pretty(&sim.circles) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
