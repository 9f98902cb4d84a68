//! Flower Finder entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use flower_finder::assets::{AssetCatalog, FlowerCatalog};
    use flower_finder::platform::PointerInput;
    use flower_finder::platform::web::{DomUi, WebImageLoader};
    use flower_finder::renderer::SpriteRenderState;
    use flower_finder::sim::BodyFactory;
    use flower_finder::{ClickOutcome, Game, GameConfig, GameError, GameUi};

    type WebGame = Game<FlowerCatalog, SpriteRenderState, DomUi>;

    fn graphics(what: &str) -> GameError {
        GameError::Graphics(what.to_string())
    }

    /// Canvas size in device pixels
    fn canvas_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    /// Canvas `data-config` JSON, else a `data-level` preset, else defaults
    fn load_config(canvas: &HtmlCanvasElement) -> Result<GameConfig, GameError> {
        if let Some(json) = canvas.get_attribute("data-config") {
            return GameConfig::from_json(&json);
        }
        match canvas.get_attribute("data-level") {
            Some(level) => GameConfig::from_level_name(&level),
            None => Ok(GameConfig::default()),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Flower Finder starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("Initialization failed: no document");
            return;
        };
        let mut ui = DomUi::new(document.clone());

        match init(document, ui.clone()).await {
            Ok(game) => {
                setup_start_button(game.clone());
                log::info!("Flower Finder ready");
            }
            Err(e) => {
                log::error!("Initialization failed: {e}");
                ui.on_init_error(&e.to_string());
            }
        }
    }

    /// Every error returned here is shown to the player by `run`
    async fn init(document: web_sys::Document, ui: DomUi) -> Result<Rc<RefCell<WebGame>>, GameError> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| graphics("no canvas"))?
            .dyn_into()
            .map_err(|_| graphics("not a canvas"))?;

        let (width, height) = canvas_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let mut config = load_config(&canvas)?;
        config.fit_viewport(width as f32, height as f32);

        let seed = config.seed.unwrap_or(js_sys::Date::now() as u64);
        log::info!("Round seed: {}", seed);

        // Pick the flower to find and show it before the round starts
        let catalog = FlowerCatalog::new("");
        let mut rng = Pcg32::seed_from_u64(seed);
        let (target, info) = catalog
            .random_target(&mut rng)
            .ok_or_else(|| GameError::Config("flower catalog is empty".into()))?;
        ui.show_target(info, &catalog.resolve(target)?);
        log::info!("Target flower: {} (#{})", info.name, target);

        let factory = BodyFactory::new(catalog, target, seed.wrapping_add(1))?;

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| GameError::Graphics(format!("create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GameError::Graphics(format!("request adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SpriteRenderState::new(surface, &adapter, width, height).await?;

        ui.set_loading(true);
        let mut game = Game::new(config, factory, render_state, ui, (width, height))?;
        let loaded = game.load_round(&WebImageLoader).await;
        game.ui().set_loading(false);
        loaded?;

        let game = Rc::new(RefCell::new(game));
        setup_input_handlers(&canvas, game.clone());
        setup_resize(canvas, game.clone());
        Ok(game)
    }

    fn start(game: &Rc<RefCell<WebGame>>) {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        match game.borrow_mut().start(now) {
            Ok(true) => request_animation_frame(game.clone()),
            Ok(false) => {}
            Err(e) => log::warn!("Cannot start: {e}"),
        }
    }

    fn setup_start_button(game: Rc<RefCell<WebGame>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        match document.get_element_by_id("start-btn") {
            Some(btn) => {
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    if let Some(intro) = web_sys::window()
                        .and_then(|w| w.document())
                        .and_then(|d| d.get_element_by_id("intro"))
                    {
                        let _ = intro.set_attribute("class", "hidden");
                    }
                    start(&game);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            // No intro screen: start right away
            None => start(&game),
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let pointer = PointerInput::new(
                event.offset_x() as f32,
                event.offset_y() as f32,
                canvas_clone.client_width() as f32,
                canvas_clone.client_height() as f32,
            );
            let outcome = game.borrow_mut().handle_click(pointer);
            if outcome == ClickOutcome::Won {
                log::info!("Target found!");
            }
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = canvas_size(&canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One tick per frame; the next frame is requested only while running
    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
        let keep_going = game.borrow_mut().frame(time);
        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flower Finder (native) starting...");
    log::info!("Native mode runs a headless round - use `trunk serve` for the web version");

    if let Err(e) = headless_round() {
        log::error!("Demo round failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one round with placeholder images: let it run, then click the target
#[cfg(not(target_arch = "wasm32"))]
fn headless_round() -> Result<(), flower_finder::GameError> {
    use flower_finder::assets::FlowerCatalog;
    use flower_finder::platform::{PlaceholderLoader, PointerInput, RecordingUi, poll_immediate};
    use flower_finder::renderer::HeadlessSurface;
    use flower_finder::sim::{BodyFactory, ScreenProjection};
    use flower_finder::{Game, GameConfig, GameError, Level};
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WIDTH: u32 = 1280;
    const HEIGHT: u32 = 720;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    // Optional level name as the first argument
    let mut config = match std::env::args().nth(1) {
        Some(level) => GameConfig::from_level_name(&level)?,
        None => GameConfig::for_level(Level::One),
    };
    config.fit_viewport(WIDTH as f32, HEIGHT as f32);
    let seed = config.seed.unwrap_or(42);

    let catalog = FlowerCatalog::new("");
    let mut rng = Pcg32::seed_from_u64(seed);
    let (target, info) = catalog
        .random_target(&mut rng)
        .ok_or_else(|| GameError::Config("flower catalog is empty".into()))?;
    log::info!("Find the {} ({})", info.name, info.bloom_period);

    let factory = BodyFactory::new(catalog, target, seed.wrapping_add(1))?;
    let mut game = Game::new(
        config,
        factory,
        HeadlessSurface::new(WIDTH, HEIGHT),
        RecordingUi::default(),
        (WIDTH, HEIGHT),
    )?;

    poll_immediate(game.load_round(&PlaceholderLoader::default()))
        .ok_or(GameError::InvariantViolation("placeholder images load instantly"))??;
    game.start(0.0)?;

    let mut now = 0.0;
    for _ in 0..300 {
        now += FRAME_MS;
        game.frame(now);
    }

    let target_id = game
        .round()
        .map(|r| r.target)
        .ok_or(GameError::InvariantViolation("round is loaded"))?;
    let pos = game
        .bodies()
        .get(target_id)
        .map(|b| b.pos)
        .ok_or(GameError::InvariantViolation("target body exists"))?;
    let Some(px) = game.camera().world_to_pixel(Vec3::new(pos.x, pos.y, 0.0)) else {
        log::warn!("Target is off screen");
        return Ok(());
    };

    let outcome = game.handle_click(PointerInput::new(px.x, px.y, WIDTH as f32, HEIGHT as f32));
    log::info!(
        "Clicked at ({:.0}, {:.0}): {:?} after {} frames, {} misses",
        px.x,
        px.y,
        outcome,
        game.surface().frames,
        game.round().map(|r| r.misses()).unwrap_or(0)
    );
    Ok(())
}
