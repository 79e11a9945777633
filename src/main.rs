//! Wormhole entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use glam::Vec2;
    use wormhole::consts::TARGET_FRAME_MS;
    use wormhole::renderer::{CanvasSurface, render_frame};
    use wormhole::{Config, FrameInput, Wormhole};

    /// Animation instance holding all state
    struct App {
        world: Wormhole,
        surface: CanvasSurface,
        input: FrameInput,
        last_time: f64,
        /// Latched on the first touch event; mouse moves are ignored after
        touch_screen: bool,
    }

    impl App {
        /// One displayed frame: step the simulation once, paint once
        fn frame(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                (time - self.last_time) as f32
            } else {
                TARGET_FRAME_MS
            };
            self.last_time = time;

            render_frame(&mut self.world, &self.input, elapsed, &mut self.surface);

            // Viewport pushes are one-shot
            self.input.viewport = None;
        }
    }

    /// Size of the element the canvas stretches to fill
    fn container_size(canvas: &HtmlCanvasElement) -> (f32, f32) {
        canvas
            .parent_element()
            .map(|parent| (parent.client_width() as f32, parent.client_height() as f32))
            .unwrap_or((0.0, 0.0))
    }

    fn window_size() -> Vec2 {
        let window = web_sys::window().unwrap();
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
        Vec2::new(width.max(1.0) as f32, height.max(1.0) as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Wormhole starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("wormhole")
            .expect("no #wormhole canvas")
            .dyn_into()
            .expect("not a canvas");

        let surface = CanvasSurface::new(canvas.clone()).expect("Failed to get 2d context");

        let config = Config::load();
        let seed = js_sys::Date::now() as u64;
        let world = Wormhole::new(config, seed);

        let mut input = FrameInput::default();
        input.viewport = Some(container_size(&canvas));

        let app = Rc::new(RefCell::new(App {
            world,
            surface,
            input,
            last_time: 0.0,
            touch_screen: false,
        }));

        setup_input_handlers(&canvas, app.clone());

        request_animation_frame(app);

        log::info!("Wormhole running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Mouse move - normalized window position, unless a touch screen took over
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                if a.touch_screen {
                    return;
                }
                let size = window_size();
                a.input.cursor = Vec2::new(
                    event.client_x() as f32 / size.x,
                    event.client_y() as f32 / size.y,
                );
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - average of all active touches
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut a = app.borrow_mut();
                a.touch_screen = true;

                let touches = event.touches();
                if touches.length() == 0 {
                    return;
                }
                let mut sum = Vec2::ZERO;
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        sum += Vec2::new(touch.screen_x() as f32, touch.screen_y() as f32);
                    }
                }
                a.input.cursor = sum / touches.length() as f32 / window_size();
            });
            let _ = document
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - recenter once the last finger lifts
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if event.touches().length() == 0 {
                    app.borrow_mut().input.cursor = Vec2::splat(0.5);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize - push the new container size
        {
            let app = app.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let size = container_size(&canvas);
                app.borrow_mut().input.viewport = Some(size);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use wormhole::consts::TARGET_FRAME_MS;
    use wormhole::renderer::{RecordingSurface, render_frame};
    use wormhole::{Config, FrameInput, Wormhole};

    env_logger::init();
    log::info!("Wormhole (native) starting...");

    // Headless demo: a few simulated seconds against the recording backend,
    // with the cursor sweeping a diagonal
    let config = Config::load();
    log::info!(
        "{} entities, shape {}",
        config.entity_count,
        config.entity_shape.as_str()
    );

    let seed = 0xB0DE;
    let mut world = Wormhole::new(config, seed);
    let mut surface = RecordingSurface::new();
    let mut input = FrameInput {
        cursor: Vec2::splat(0.5),
        viewport: Some((1920.0, 1080.0)),
    };

    let frames: usize = 600;
    let mut shapes = 0usize;
    for frame in 0..frames {
        let sweep = frame as f32 / frames as f32;
        input.cursor = Vec2::new(sweep, 1.0 - sweep);

        surface.clear();
        render_frame(&mut world, &input, TARGET_FRAME_MS, &mut surface);
        input.viewport = None;
        shapes += surface.shape_count();
    }

    log::info!(
        "{} frames, {} draw calls ({} per frame), {} live edges",
        frames,
        shapes,
        shapes / frames,
        world.connection_count()
    );

    // Smoke check: long runs keep every progress value inside the cycle
    assert!(
        world
            .entities
            .iter()
            .all(|e| (0.0..=1.0).contains(&e.progress))
    );
    println!("✓ {} frames simulated without drift", frames);
}
