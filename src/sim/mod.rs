//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the body table)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod factory;
pub mod state;
pub mod tick;

pub use body::{Arena, Body, BodyId, BodyTable, NO_TINT};
pub use collision::{ScreenBox, ScreenProjection, WallBounce, bounce_off_walls, hit_test};
pub use factory::{BodyFactory, BodyPlan, ImageRotation};
pub use state::RoundState;
pub use tick::{EnginePhase, MotionEngine};
