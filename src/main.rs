//! Skyburst entry point
//!
//! On the web: sizes the canvas, sets up WebGPU, drives the engine from
//! `requestAnimationFrame` and exports the small API the page UI calls.
//! Natively: runs the engine headless for a few seconds and logs frame stats.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use skyburst::audio::WebAudio;
    use skyburst::renderer::RenderState;
    use skyburst::{Engine, FireworkConfig, QualityPreset, Settings, VisualStyle};

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// Everything the page keeps alive between frames
    struct App {
        engine: Engine<WebAudio>,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        last_time: f64,
        running: bool,
        /// Pending `requestAnimationFrame` id, cancelled on teardown
        frame_handle: Option<i32>,
        frame_callback: FrameCallback,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            self.last_time = time;

            self.engine.tick(dt);

            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(self.engine.draw_list()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Match the canvas backing store to its CSS size × devicePixelRatio
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if width == 0 || height == 0 {
                return;
            }
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
            self.engine.resize(width as f32, height as f32);
        }

        fn teardown(&mut self) {
            if !self.running {
                return;
            }
            self.running = false;
            if let (Some(window), Some(handle)) = (web_sys::window(), self.frame_handle.take()) {
                let _ = window.cancel_animation_frame(handle);
            }
            // Breaks the callback's reference cycle back to the app
            self.frame_callback.borrow_mut().take();
            self.engine.settings().save();
            self.engine.dispose();
            log::info!("Skyburst stopped");
        }
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    /// Run `f` against the live app, if there is one
    fn with_app<T>(f: impl FnOnce(&mut App) -> T) -> Option<T> {
        let app = APP.with(|slot| slot.borrow().clone())?;
        let mut app = app.borrow_mut();
        Some(f(&mut app))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Skyburst starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let settings = Settings::load();
        let app = Rc::new(RefCell::new(App {
            engine: Engine::new(settings),
            render_state: None,
            canvas: canvas.clone(),
            last_time: 0.0,
            running: true,
            frame_handle: None,
            frame_callback: Rc::new(RefCell::new(None)),
        }));
        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

        // Initialize WebGPU (WebGL2 fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        app.borrow_mut().fit_canvas();
        match init_renderer(&instance, &canvas).await {
            Some(render_state) => app.borrow_mut().render_state = Some(render_state),
            None => log::warn!("Rendering unavailable - simulation runs without output"),
        }

        setup_input_handlers(&canvas, app.clone());
        setup_lifecycle_handlers(app.clone());
        start_loop(app);

        log::info!("Skyburst running!");
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: &HtmlCanvasElement,
    ) -> Option<RenderState> {
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| log::warn!("Failed to create surface: {:?}", e))
            .ok()?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| log::warn!("No suitable adapter: {:?}", e))
            .ok()?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let width = canvas.width().max(1);
        let height = canvas.height().max(1);
        RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| log::warn!("Failed to create device: {:?}", e))
            .ok()
    }

    fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Option<i32> {
        web_sys::window()?
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
    }

    fn start_loop(app: Rc<RefCell<App>>) {
        let callback = app.borrow().frame_callback.clone();
        let next = callback.clone();
        let loop_app = app.clone();

        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            let mut a = loop_app.borrow_mut();
            if !a.running {
                return;
            }
            a.frame(time);
            a.frame_handle = next.borrow().as_ref().and_then(request_frame);
        }));

        let handle = callback.borrow().as_ref().and_then(request_frame);
        app.borrow_mut().frame_handle = handle;
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Click/tap: unlock audio inside the gesture, then launch something
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut a = app.borrow_mut();
                a.engine.unlock_audio();
                a.engine.launch_random();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        a.engine.unlock_audio();
                        a.engine.launch_random();
                    }
                    "c" | "C" => a.engine.clear(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().fit_canvas();
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().teardown();
                APP.with(|slot| slot.borrow_mut().take());
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    // API for the page UI

    /// Launch from a JSON configuration. Returns false if it doesn't parse.
    #[wasm_bindgen]
    pub fn launch_json(json: &str) -> bool {
        match FireworkConfig::from_json(json) {
            Ok(config) => with_app(|a| a.engine.launch(config)).is_some(),
            Err(e) => {
                log::warn!("Invalid firework config: {}", e);
                false
            }
        }
    }

    #[wasm_bindgen]
    pub fn launch_random() {
        with_app(|a| a.engine.launch_random());
    }

    #[wasm_bindgen]
    pub fn clear() {
        with_app(|a| a.engine.clear());
    }

    #[wasm_bindgen]
    pub fn unlock_audio() {
        with_app(|a| a.engine.unlock_audio());
    }

    /// Volume 0 - 100
    #[wasm_bindgen]
    pub fn set_volume(volume: u32) {
        with_app(|a| a.engine.set_volume(volume));
    }

    /// "low" | "medium" | "high"
    #[wasm_bindgen]
    pub fn set_quality(quality: &str) -> bool {
        let Some(preset) = QualityPreset::from_str(quality) else {
            log::warn!("Unknown quality preset: {}", quality);
            return false;
        };
        with_app(|a| a.engine.set_quality(preset)).is_some()
    }

    /// "bloom" | "wireframe"
    #[wasm_bindgen]
    pub fn set_style(style: &str) -> bool {
        let Some(style) = VisualStyle::from_str(style) else {
            log::warn!("Unknown visual style: {}", style);
            return false;
        };
        with_app(|a| a.engine.set_style(style)).is_some()
    }

    #[wasm_bindgen]
    pub fn set_clouds(enabled: bool) {
        with_app(|a| a.engine.set_clouds(enabled));
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use skyburst::{Engine, FireworkConfig, NullAudio, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Skyburst (native) starting...");
    log::info!("Running headless - use `trunk serve` for the web version");

    // Optional JSON config file; otherwise random presets
    let config = std::env::args().nth(1).and_then(|path| {
        let json = std::fs::read_to_string(&path)
            .map_err(|e| log::warn!("Can't read {}: {}", path, e))
            .ok()?;
        FireworkConfig::from_json(&json)
            .map_err(|e| log::warn!("Invalid config in {}: {}", path, e))
            .ok()
    });

    let mut engine = Engine::<NullAudio>::new(Settings::load());
    engine.resize(1280.0, 720.0);
    engine.unlock_audio();

    const DT: f32 = 1.0 / 60.0;
    const FRAMES: u32 = 60 * 8;
    let mut peak_particles = 0;
    let mut bursts = 0;

    for frame in 0..FRAMES {
        if frame % 45 == 0 && frame < FRAMES / 2 {
            match &config {
                Some(config) => engine.launch(config.clone()),
                None => engine.launch_random(),
            }
        }
        let stats = engine.tick(DT);
        peak_particles = peak_particles.max(stats.particles);
        bursts += stats.bursts;
        if frame % 60 == 0 || stats.bursts > 0 {
            log::info!(
                "t={:>5.2}s rockets={} particles={} transients={} drawn={} bursts={} vertices={}",
                frame as f32 * DT,
                stats.rockets,
                stats.particles,
                stats.transients,
                stats.drawn,
                stats.bursts,
                engine.draw_list().vertex_count()
            );
        }
    }

    engine.dispose();
    log::info!(
        "Done: {} bursts, peak {} live particles",
        bursts,
        peak_particles
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {}
