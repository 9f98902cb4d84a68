//! Round orchestration
//!
//! `Game` owns the body table and wires the factory, motion engine, round
//! state and sprite surface together. The host drives it: `load_round`
//! once, `start` on the player's go, `frame` from each animation frame and
//! `handle_click` from pointer events.

use crate::GameError;
use crate::assets::{AssetCatalog, ImageLoader, SpriteImage};
use crate::platform::PointerInput;
use crate::renderer::{Camera, SpriteSurface};
use crate::settings::GameConfig;
use crate::sim::{
    Arena, BodyFactory, BodyPlan, BodyTable, EnginePhase, MotionEngine, RoundState, hit_test,
};

/// Score, message and error display
pub trait GameUi {
    fn on_score_tick(&mut self, elapsed_seconds: f32);
    fn on_miss(&mut self, misses: u32);
    fn on_win(&mut self, elapsed_seconds: f32);
    fn on_init_error(&mut self, message: &str);
}

impl<U: GameUi + ?Sized> GameUi for &mut U {
    fn on_score_tick(&mut self, elapsed_seconds: f32) {
        (**self).on_score_tick(elapsed_seconds);
    }

    fn on_miss(&mut self, misses: u32) {
        (**self).on_miss(misses);
    }

    fn on_win(&mut self, elapsed_seconds: f32) {
        (**self).on_win(elapsed_seconds);
    }

    fn on_init_error(&mut self, message: &str) {
        (**self).on_init_error(message);
    }
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Target hit; round over
    Won,
    /// A decoy was hit
    Miss,
    /// Empty space
    Nothing,
    /// Round not running (not started, or already won)
    Ignored,
}

pub struct Game<C: AssetCatalog, S: SpriteSurface, U: GameUi> {
    config: GameConfig,
    factory: BodyFactory<C>,
    surface: S,
    ui: U,
    camera: Camera,
    arena: Arena,
    engine: MotionEngine,
    bodies: BodyTable,
    round: Option<RoundState>,
}

impl<C: AssetCatalog, S: SpriteSurface, U: GameUi> Game<C, S, U> {
    pub fn new(
        config: GameConfig,
        factory: BodyFactory<C>,
        surface: S,
        mut ui: U,
        viewport: (u32, u32),
    ) -> Result<Self, GameError> {
        if let Err(e) = config.validate() {
            ui.on_init_error(&e.to_string());
            return Err(e);
        }
        let arena = Arena::new(config.boundary_size_x, config.boundary_size_y);
        log::info!(
            "Game configured: {} decoys, arena {:.1}x{:.1}",
            config.num_shapes,
            config.boundary_size_x,
            config.boundary_size_y
        );
        Ok(Self {
            config,
            factory,
            surface,
            ui,
            camera: Camera::new(viewport.0 as f32, viewport.1 as f32),
            arena,
            engine: MotionEngine::new(),
            bodies: BodyTable::new(),
            round: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bodies(&self) -> &BodyTable {
        &self.bodies
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn phase(&self) -> EnginePhase {
        self.engine.phase()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn factory(&self) -> &BodyFactory<C> {
        &self.factory
    }

    /// Plan the target followed by every decoy
    pub fn plan_round(&mut self) -> Result<Vec<BodyPlan>, GameError> {
        let mut plans = Vec::with_capacity(self.config.num_shapes as usize + 1);
        plans.push(self.factory.plan(
            true,
            &self.arena,
            Some(self.config.target_scale_factor),
        )?);
        for _ in 0..self.config.num_shapes {
            plans.push(self.factory.plan(
                false,
                &self.arena,
                Some(self.config.non_target_scale_factor),
            )?);
        }
        Ok(plans)
    }

    /// Create every body for a new round.
    ///
    /// All image requests are issued before any is awaited; results are
    /// joined back in request order.
    pub async fn load_round<L: ImageLoader>(&mut self, loader: &L) -> Result<(), GameError> {
        let plans = match self.plan_round() {
            Ok(plans) => plans,
            Err(e) => {
                self.ui.on_init_error(&e.to_string());
                return Err(e);
            }
        };

        let pending: Vec<_> = plans
            .iter()
            .map(|plan| loader.request(plan.image, &plan.url))
            .collect();
        let mut results = Vec::with_capacity(pending.len());
        for request in pending {
            results.push(request.await);
        }

        self.assemble(plans, results)
    }

    /// Turn planned bodies and their load results into the round's body
    /// table. A failed decoy is dropped; a failed target aborts setup.
    pub fn assemble(
        &mut self,
        plans: Vec<BodyPlan>,
        results: Vec<Result<SpriteImage, GameError>>,
    ) -> Result<(), GameError> {
        if plans.len() != results.len() {
            return Err(GameError::InvariantViolation(
                "one load result per planned body",
            ));
        }

        let mut bodies = BodyTable::new();
        let mut loaded = Vec::with_capacity(plans.len());
        let mut target = None;
        let mut skipped = 0;

        for (plan, result) in plans.into_iter().zip(results) {
            let image = match result {
                Ok(image) => image,
                Err(e) if plan.is_target || !e.is_recoverable() => {
                    log::error!("Round setup failed: {e}");
                    self.ui.on_init_error(&e.to_string());
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("Skipping decoy: {e}");
                    skipped += 1;
                    continue;
                }
            };

            let id = bodies.next_body_id();
            let body = plan.finish(id, &image);
            if plan.is_target {
                target = Some((id, plan.base_scale));
            }
            bodies.push(body);
            loaded.push((id, image));
        }

        let Some((target, base_scale)) = target else {
            let err = GameError::InvariantViolation("round has no target body");
            self.ui.on_init_error(&err.to_string());
            return Err(err);
        };

        // The previous round is left alone until the new one is complete
        for (id, image) in &loaded {
            self.surface.register(*id, image);
        }
        log::info!(
            "Round ready: {} bodies ({} decoys skipped)",
            bodies.len(),
            skipped
        );
        self.bodies = bodies;
        self.round = Some(RoundState::new(target, base_scale));
        self.engine = MotionEngine::new();
        Ok(())
    }

    /// Start the round timer and the motion loop. Returns true if the host
    /// should begin requesting frames.
    pub fn start(&mut self, now_ms: f64) -> Result<bool, GameError> {
        let round = self
            .round
            .as_mut()
            .ok_or(GameError::InvariantViolation("start before the round is loaded"))?;
        if self.engine.is_running() {
            return Ok(self.engine.start());
        }
        // A won round keeps its final time
        if !round.won {
            round.start_game(now_ms);
        }
        Ok(self.engine.start())
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// One animation frame. Returns whether another frame should be
    /// requested.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.engine.is_running() {
            return false;
        }
        let Some(round) = self.round.as_mut() else {
            return false;
        };

        round.update_elapsed_time(now_ms);
        self.ui.on_score_tick(round.elapsed_seconds);
        self.engine
            .advance(&mut self.bodies, &self.arena, round, now_ms);

        if let Err(e) = self.surface.draw(&self.bodies, &self.camera, now_ms) {
            log::error!("Draw failed: {e}");
        }
        self.engine.is_running()
    }

    /// Resolve a click against the current body positions
    pub fn handle_click(&mut self, pointer: PointerInput) -> ClickOutcome {
        let Some(round) = self.round.as_mut() else {
            return ClickOutcome::Ignored;
        };
        if round.won || !self.engine.is_running() {
            return ClickOutcome::Ignored;
        }
        if pointer.to_ndc().is_none() {
            log::debug!("Click on empty viewport ignored");
            return ClickOutcome::Nothing;
        }

        // Hit boxes are sized in the pointer's pixels (CSS, not device)
        let mut view = self.camera;
        view.resize(pointer.width, pointer.height);
        match hit_test(&self.bodies, pointer.pixel(), &view) {
            Some(id) if id == round.target => {
                round.mark_as_won(&mut self.bodies);
                self.engine.stop();
                // Show the highlight even though no more frames are requested
                if let Err(e) = self.surface.draw(&self.bodies, &self.camera, 0.0) {
                    log::error!("Draw failed: {e}");
                }
                self.ui.on_win(round.elapsed_seconds);
                ClickOutcome::Won
            }
            Some(id) => {
                round.increment_misses();
                log::debug!("Missed: clicked decoy {:?} ({} misses)", id, round.misses());
                self.ui.on_miss(round.misses());
                ClickOutcome::Miss
            }
            None => ClickOutcome::Nothing,
        }
    }

    /// Viewport changed: camera aspect, arena bounds and surface size.
    /// Bodies are left where they are; walls pull them back in.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.resize(width as f32, height as f32);
        self.arena = Arena::from_viewport(self.config.boundary_size_x, width as f32, height as f32);
        self.surface.resize(width, height);
        log::debug!(
            "Resized to {width}x{height}, arena {:.1}x{:.1}",
            self.arena.half_width * 2.0,
            self.arena.half_height * 2.0
        );
    }
}
