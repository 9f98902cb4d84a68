//! Round state: timer, win flag and miss counter
//!
//! Times are passed in as milliseconds (host clock) so the state stays pure.

use serde::{Deserialize, Serialize};

use super::body::{BodyId, BodyTable};
use crate::consts::{WIN_SCALE_BOOST, WIN_TINT};

/// State for a single round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    /// Target found
    pub won: bool,
    /// Host time when the round started (ms)
    pub started_at_ms: Option<f64>,
    /// Seconds since start, frozen once won
    pub elapsed_seconds: f32,
    misses: u32,
    /// The body the player must find
    pub target: BodyId,
    /// Target's uniform scale before aspect correction
    pub target_base_scale: f32,
}

impl RoundState {
    pub fn new(target: BodyId, target_base_scale: f32) -> Self {
        Self {
            won: false,
            started_at_ms: None,
            elapsed_seconds: 0.0,
            misses: 0,
            target,
            target_base_scale,
        }
    }

    /// Record the start time. Calling again restarts the timer.
    pub fn start_game(&mut self, now_ms: f64) {
        self.started_at_ms = Some(now_ms);
        self.elapsed_seconds = 0.0;
    }

    /// Recompute elapsed time (no-op before start or after win)
    pub fn update_elapsed_time(&mut self, now_ms: f64) {
        if self.won {
            return;
        }
        if let Some(start) = self.started_at_ms {
            let elapsed = ((now_ms - start) / 1000.0) as f32;
            // Host clocks can jitter backwards; never rewind the display
            self.elapsed_seconds = self.elapsed_seconds.max(elapsed);
        }
    }

    /// Mark the round won and highlight the target (tint + enlarge)
    pub fn mark_as_won(&mut self, bodies: &mut BodyTable) {
        if self.won {
            return;
        }
        self.won = true;

        if let Some(target) = bodies.get_mut(self.target) {
            target.tint = WIN_TINT;
            target.set_uniform_scale(self.target_base_scale * WIN_SCALE_BOOST);
        } else {
            log::warn!("Target body {:?} missing when marking win", self.target);
        }
        log::info!("Target found after {:.1}s", self.elapsed_seconds);
    }

    pub fn increment_misses(&mut self) {
        self.misses += 1;
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }
}
