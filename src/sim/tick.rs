//! Per-frame simulation tick
//!
//! One tick per rendered frame, fixed step (no delta-time scaling).

use serde::{Deserialize, Serialize};

use super::body::{Arena, BodyTable};
use super::collision::bounce_off_walls;
use super::state::RoundState;
use crate::consts::*;

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnginePhase {
    /// Bodies registered, loop not started
    #[default]
    Idle,
    /// Frames are being requested and bodies move
    Running,
    /// Loop ended; no further mutation
    Stopped,
}

/// Advances all bodies and gates the frame loop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MotionEngine {
    phase: EnginePhase,
    /// Ticks advanced since the engine was created
    pub ticks: u64,
}

impl MotionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == EnginePhase::Running
    }

    /// Enter Running. Returns true if the caller should schedule the first
    /// frame; false if the loop was already running.
    pub fn start(&mut self) -> bool {
        if self.phase == EnginePhase::Running {
            log::warn!("Animation already started");
            return false;
        }
        log::info!("Starting animation loop");
        self.phase = EnginePhase::Running;
        true
    }

    /// Enter Stopped. Takes effect before the next frame is requested.
    pub fn stop(&mut self) {
        if self.phase == EnginePhase::Running {
            log::info!("Stopping animation loop after {} ticks", self.ticks);
        }
        self.phase = EnginePhase::Stopped;
    }

    /// Advance every body by one tick. Returns false (and mutates nothing)
    /// unless the engine is running.
    pub fn advance(
        &mut self,
        bodies: &mut BodyTable,
        arena: &Arena,
        round: &RoundState,
        now_ms: f64,
    ) -> bool {
        if !self.is_running() {
            return false;
        }
        self.ticks += 1;

        for (index, body) in bodies.iter_mut().enumerate() {
            if !body.is_finite() {
                log::warn!("Skipping body {:?} with non-finite state", body.id);
                continue;
            }

            // Found target stays put and pulses
            if round.won && body.id == round.target {
                let pulse = 1.0 + PULSE_AMPLITUDE * (now_ms * PULSE_RATE).sin() as f32;
                body.set_uniform_scale(round.target_base_scale * pulse);
                continue;
            }

            body.pos += body.vel;
            if bounce_off_walls(body, arena).any() {
                log::trace!("Body {:?} bounced at {:?}", body.id, body.pos);
            }

            // Cosmetic spin, alternating direction
            let direction = if index % 2 == 0 { 1.0 } else { -1.0 };
            body.spin += SPIN_STEP * direction;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyId, test_body};
    use glam::Vec2;
    use proptest::prelude::*;

    fn table(bodies: &[(Vec2, Vec2, bool)]) -> BodyTable {
        let mut table = BodyTable::new();
        for &(pos, vel, is_target) in bodies {
            let id = table.next_body_id();
            table.push(test_body(id.0, pos, vel, is_target));
        }
        table
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut engine = MotionEngine::new();
        assert_eq!(engine.phase(), EnginePhase::Idle);
        assert!(engine.start());
        assert!(!engine.start());
        assert_eq!(engine.phase(), EnginePhase::Running);
    }

    #[test]
    fn test_idle_does_not_move() {
        let mut engine = MotionEngine::new();
        let mut bodies = table(&[(Vec2::ZERO, Vec2::new(0.01, 0.0), true)]);
        let round = RoundState::new(BodyId(1), 0.5);
        assert!(!engine.advance(&mut bodies, &Arena::new(10.0, 10.0), &round, 0.0));
        assert_eq!(bodies.get(BodyId(1)).unwrap().pos, Vec2::ZERO);
    }

    #[test]
    fn test_stop_freezes_positions() {
        let mut engine = MotionEngine::new();
        let arena = Arena::new(10.0, 10.0);
        let mut bodies = table(&[
            (Vec2::ZERO, Vec2::new(0.02, 0.01), true),
            (Vec2::ONE, Vec2::new(-0.02, 0.01), false),
        ]);
        let round = RoundState::new(BodyId(1), 0.5);

        engine.start();
        assert!(engine.advance(&mut bodies, &arena, &round, 0.0));
        engine.stop();

        let before: Vec<_> = bodies.iter().map(|b| (b.pos, b.vel, b.spin)).collect();
        for _ in 0..10 {
            assert!(!engine.advance(&mut bodies, &arena, &round, 16.0));
        }
        let after: Vec<_> = bodies.iter().map(|b| (b.pos, b.vel, b.spin)).collect();
        assert_eq!(before, after);
        assert_eq!(engine.phase(), EnginePhase::Stopped);
    }

    #[test]
    fn test_euler_step() {
        let mut engine = MotionEngine::new();
        engine.start();
        let mut bodies = table(&[(Vec2::new(1.0, 1.0), Vec2::new(0.02, -0.01), true)]);
        let round = RoundState::new(BodyId(1), 0.5);
        engine.advance(&mut bodies, &Arena::new(10.0, 10.0), &round, 0.0);
        let body = bodies.get(BodyId(1)).unwrap();
        assert!((body.pos - Vec2::new(1.02, 0.99)).length() < 1e-6);
    }

    #[test]
    fn test_alternating_spin() {
        let mut engine = MotionEngine::new();
        engine.start();
        let mut bodies = table(&[
            (Vec2::ZERO, Vec2::ZERO, true),
            (Vec2::ZERO, Vec2::ZERO, false),
        ]);
        let round = RoundState::new(BodyId(1), 0.5);
        for _ in 0..4 {
            engine.advance(&mut bodies, &Arena::new(10.0, 10.0), &round, 0.0);
        }
        assert!((bodies.get(BodyId(1)).unwrap().spin - 0.02).abs() < 1e-6);
        assert!((bodies.get(BodyId(2)).unwrap().spin + 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_body_skipped() {
        let mut engine = MotionEngine::new();
        engine.start();
        let mut bodies = table(&[
            (Vec2::new(f32::NAN, 0.0), Vec2::new(0.01, 0.0), false),
            (Vec2::ZERO, Vec2::new(0.01, 0.0), true),
        ]);
        let round = RoundState::new(BodyId(2), 0.5);
        assert!(engine.advance(&mut bodies, &Arena::new(10.0, 10.0), &round, 0.0));
        assert!((bodies.get(BodyId(2)).unwrap().pos.x - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_won_target_pulses_in_place() {
        let mut engine = MotionEngine::new();
        engine.start();
        let arena = Arena::new(10.0, 10.0);
        let mut bodies = table(&[
            (Vec2::new(1.0, 2.0), Vec2::new(0.02, 0.02), true),
            (Vec2::ZERO, Vec2::new(0.02, 0.0), false),
        ]);
        let mut round = RoundState::new(BodyId(1), 2.5);
        round.mark_as_won(&mut bodies);

        let base = round.target_base_scale;
        let mut saw_low = false;
        let mut saw_high = false;
        for frame in 0..400 {
            let now_ms = frame as f64 * 16.0;
            engine.advance(&mut bodies, &arena, &round, now_ms);
            let target = bodies.get(BodyId(1)).unwrap();
            assert_eq!(target.pos, Vec2::new(1.0, 2.0));
            assert!(target.scale.y >= 0.9 * base - 1e-4 && target.scale.y <= 1.1 * base + 1e-4);
            saw_low |= target.scale.y < base * 0.95;
            saw_high |= target.scale.y > base * 1.05;
        }
        assert!(saw_low && saw_high, "target scale did not oscillate");

        // Decoy kept moving
        assert!(bodies.get(BodyId(2)).unwrap().pos.x.abs() > 0.0);
    }

    #[test]
    fn test_bounce_flips_once_and_returns_inside() {
        let mut engine = MotionEngine::new();
        engine.start();
        let arena = Arena::new(10.0, 10.0);
        let mut bodies = table(&[(Vec2::new(4.99, 0.0), Vec2::new(0.025, 0.0), true)]);
        let round = RoundState::new(BodyId(1), 0.5);

        engine.advance(&mut bodies, &arena, &round, 0.0);
        let body = bodies.get(BodyId(1)).unwrap();
        assert_eq!(body.pos.x, 5.0);
        assert_eq!(body.vel.x, -0.025);

        engine.advance(&mut bodies, &arena, &round, 0.0);
        let body = bodies.get(BodyId(1)).unwrap();
        assert!(body.pos.x < 5.0);
        assert_eq!(body.vel.x, -0.025);
    }

    proptest! {
        #[test]
        fn prop_bodies_stay_in_arena(
            half_w in 0.5f32..20.0,
            half_h in 0.5f32..20.0,
            starts in prop::collection::vec(
                ((-1.0f32..1.0, -1.0f32..1.0), (-0.025f32..0.025, -0.025f32..0.025)),
                1..12,
            ),
            ticks in 1usize..600,
        ) {
            let arena = Arena { half_width: half_w, half_height: half_h };
            let mut bodies = BodyTable::new();
            for ((fx, fy), (vx, vy)) in &starts {
                let id = bodies.next_body_id();
                let pos = Vec2::new(fx * half_w, fy * half_h);
                bodies.push(test_body(id.0, pos, Vec2::new(*vx, *vy), id.0 == 1));
            }
            let round = RoundState::new(BodyId(1), 0.5);
            let mut engine = MotionEngine::new();
            engine.start();

            for _ in 0..ticks {
                let before: Vec<Vec2> = bodies.iter().map(|b| b.vel).collect();
                engine.advance(&mut bodies, &arena, &round, 0.0);
                for (body, old_vel) in bodies.iter().zip(before) {
                    prop_assert!(arena.contains(body.pos, 1e-5));
                    // Each axis either keeps or exactly negates its velocity
                    prop_assert!(body.vel.x == old_vel.x || body.vel.x == -old_vel.x);
                    prop_assert!(body.vel.y == old_vel.y || body.vel.y == -old_vel.y);
                    // Speed per axis never changes
                    prop_assert_eq!(body.vel.abs(), old_vel.abs());
                }
            }
        }
    }
}
