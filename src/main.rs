//! Tani Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use tani_rush::consts::*;
    use tani_rush::effects::{Effects, FrameContext};
    use tani_rush::flavor;
    use tani_rush::persistence::LocalStorageStore;
    use tani_rush::platform::{FixedStep, FpsCounter, FrameClock};
    use tani_rush::renderer::{Camera, RenderState, SceneInput, build_scene};
    use tani_rush::sim::{GameEvent, GamePhase, Session, TickInput};
    use tani_rush::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorageStore>,
        effects: Effects,
        settings: Settings,
        camera: Camera,
        render_state: Option<RenderState>,
        clock: FrameClock,
        step: FixedStep,
        fps: FpsCounter,
        input: TickInput,
        /// Canvas size in CSS pixels
        view_size: (f32, f32),
        document: Document,
    }

    impl Game {
        fn new(seed: u64, document: Document, view_size: (f32, f32)) -> Self {
            let tuning = Tuning::load();
            Self {
                session: Session::new(seed, tuning, LocalStorageStore),
                effects: Effects::new(seed.wrapping_add(1), DEBRIS_COUNT),
                settings: Settings::load(),
                camera: Camera::new(view_size.0 / view_size.1.max(1.0)),
                render_state: None,
                clock: FrameClock::new(),
                step: FixedStep::default(),
                fps: FpsCounter::default(),
                input: TickInput::default(),
                view_size,
                document,
            }
        }

        fn start(&mut self) {
            self.session.start();
            self.effects.reset();
            self.step.reset();
            self.clock.reset();
        }

        /// Horizontal pointer position in canvas pixels
        fn point_at(&mut self, x: f32) {
            let ndc_x = (x / self.view_size.0.max(1.0)) * 2.0 - 1.0;
            self.input.pointer_lateral = self.camera.pointer_to_lateral(ndc_x);
        }

        fn resize(&mut self, css_w: f32, css_h: f32, width: u32, height: u32) {
            self.view_size = (css_w, css_h);
            self.camera = Camera::new(css_w / css_h.max(1.0));
            if let Some(render_state) = &mut self.render_state {
                render_state.resize(width, height);
            }
        }

        /// Run simulation ticks and advance the presentation state
        fn update(&mut self, time: f64) {
            let dt = self.clock.delta(time);
            let steps = self.step.advance(dt);

            for _ in 0..steps {
                for event in self.session.update(SIM_DT, &self.input) {
                    if let GameEvent::SessionEnded { new_best: true, .. } = event {
                        self.set_visible("new-best", true);
                    }
                    self.effects.handle_event(&event, &self.settings);
                }
            }

            let ctx = FrameContext {
                playing: self.session.phase() == GamePhase::Playing,
                score: self.session.score(),
                target_lateral: self.session.player_lateral(),
                panic_threshold: self.session.tuning().panic_threshold,
            };
            self.effects.update(dt, &ctx, &self.settings);
            self.fps.record(time);
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = &mut self.render_state else {
                return;
            };
            let camera = self.camera.shaken(self.effects.camera_offset());
            let input = SceneInput {
                units: self.session.units(),
                effects: &self.effects,
                settings: &self.settings,
                player_depth: self.session.tuning().player_depth,
            };
            let vertices = build_scene(&input, &camera);

            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                if el.text_content().as_deref() != Some(text) {
                    el.set_text_content(Some(text));
                }
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let phase = self.session.phase();
            let score = self.session.score();

            self.set_visible("hud", phase == GamePhase::Playing);
            self.set_text("hud-score", &score.to_string());
            self.set_text("hud-rank", self.session.rank_title());
            self.set_text("hud-best", &self.session.best_score().to_string());

            let alerts = flavor::alert_text(score, self.session.tuning().panic_threshold);
            self.set_text("hud-alert", alerts[0]);
            self.set_visible("hud-panic", alerts.len() > 1);
            if let Some(panic) = alerts.get(1) {
                self.set_text("hud-panic", panic);
            }

            self.set_visible("hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                self.set_text("hud-fps", &format!("{} FPS", self.fps.fps()));
            }

            self.set_visible("start-screen", phase == GamePhase::NotStarted);
            self.set_visible("game-over", phase == GamePhase::Ended);
            if phase == GamePhase::Ended {
                self.set_text("final-score", &score.to_string());
                self.set_text("final-rank", self.session.rank_title());
                self.set_text("excuse", self.session.excuse().unwrap_or_default());
            }

            self.update_popups();
        }

        /// Position the DOM grade popups over their projected world positions
        fn update_popups(&self) {
            let camera = self.camera.shaken(self.effects.camera_offset());
            let popups = self.effects.popups();
            let (w, h) = self.view_size;

            for slot in 0..MAX_POPUPS {
                let Some(el) = self
                    .document
                    .get_element_by_id(&format!("popup-{slot}"))
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                let projected = popups
                    .get(slot)
                    .and_then(|popup| camera.project(popup.position).map(|p| (popup, p)));
                let Some((popup, p)) = projected else {
                    let _ = el.class_list().add_1("hidden");
                    continue;
                };

                let x = (p.ndc.x + 1.0) * 0.5 * w;
                let y = (1.0 - p.ndc.y) * 0.5 * h;
                el.set_text_content(Some(popup.grade.as_str()));
                let style = el.style();
                let _ = style.set_property("left", &format!("{x:.1}px"));
                let _ = style.set_property("top", &format!("{y:.1}px"));
                let _ = style.set_property("color", popup.grade.css_color());
                let _ = style.set_property("opacity", &format!("{:.3}", popup.opacity.max(0.0)));
                let _ = style.set_property(
                    "transform",
                    &format!("translate(-50%, -50%) scale({:.3})", popup.scale),
                );
                let _ = el.class_list().remove_1("hidden");
            }
        }
    }

    fn js_err(e: JsValue) -> anyhow::Error {
        anyhow!("{e:?}")
    }

    /// Size the canvas backing store to its CSS size times the device pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (f32, f32, u32, u32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (client_w as f32, client_h as f32, width, height)
    }

    pub async fn run() -> anyhow::Result<()> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| anyhow!("failed to init logger: {e}"))?;

        log::info!("Tani Rush starting...");

        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .context("no canvas")?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas"))?;

        let (css_w, css_h, width, height) = fit_canvas(&window, &canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, document.clone(), (css_w, css_h))));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to get adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        create_popup_slots(&document)?;
        setup_input_handlers(&canvas, game.clone())?;
        setup_buttons(&document, game.clone())?;
        setup_resize(&window, &canvas, game.clone())?;

        request_animation_frame(game);

        log::info!("Tani Rush running!");
        Ok(())
    }

    fn create_popup_slots(document: &Document) -> anyhow::Result<()> {
        let layer = document
            .get_element_by_id("popup-layer")
            .context("no #popup-layer")?;
        for slot in 0..MAX_POPUPS {
            let el = document.create_element("div").map_err(js_err)?;
            el.set_id(&format!("popup-{slot}"));
            el.set_class_name("grade-popup hidden");
            layer.append_child(&el).map_err(js_err)?;
        }
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> anyhow::Result<()> {
        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                game.borrow_mut().point_at(x);
            });
            canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
                .map_err(js_err)?;
            closure.forget();
        }

        // Touch start and move
        for kind in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    game.borrow_mut().point_at(x);
                }
            });
            canvas
                .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
                .map_err(js_err)?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> anyhow::Result<()> {
        // Start and retry both begin a fresh session
        for id in ["start-btn", "retry-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{id}");
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.set_visible("new-best", false);
                g.start();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(js_err)?;
            closure.forget();
        }

        // Quality cycles Low -> Medium -> High
        if let Some(btn) = document.get_element_by_id("quality-btn") {
            btn.set_text_content(Some(game.borrow().settings.quality.as_str()));
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let next = g.settings.quality.next();
                g.settings.apply_preset(next);
                g.settings.save();
                btn_clone.set_text_content(Some(next.as_str()));
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(js_err)?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> anyhow::Result<()> {
        let window_clone = window.clone();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (css_w, css_h, width, height) = fit_canvas(&window_clone, &canvas);
            game.borrow_mut().resize(css_w, css_h, width, height);
        });
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Tani Rush failed to start: {e:#}");
        web_sys::console::error_1(&format!("Tani Rush failed to start: {e:#}").into());
    }
}

/// Seed and length of the headless run
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SEED: u64 = 0x7a41;
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: f32 = 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tani_rush::sim::{Session, run_autopilot};
    use tani_rush::{MemoryStore, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tani Rush (native) starting...");
    log::info!("Rendering needs the web build (`trunk serve`); running a headless autopilot session");

    let mut session = Session::new(DEMO_SEED, Tuning::load(), MemoryStore::default());
    session.start();
    let run = run_autopilot(&mut session, DEMO_SECONDS);

    if run.ended_by_miss {
        log::info!(
            "Held back after {:.1}s with {} credits ({}), best {}",
            run.elapsed,
            session.score(),
            session.rank_title(),
            session.best_score()
        );
        if let Some(excuse) = session.excuse() {
            log::info!("Excuse: {excuse}");
        }
    } else {
        log::info!(
            "Autopilot survived {DEMO_SECONDS}s with {} credits ({})",
            session.score(),
            session.rank_title()
        );
    }
    for (grade, count) in &run.grades {
        log::info!("  {}: {count}", grade.as_str());
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
