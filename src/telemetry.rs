//! Per-step telemetry
//!
//! The core decides *whether* a sample is emitted (the logging flag); sinks
//! own the storage and must swallow their own I/O failures so a bad write
//! can never abort a simulation step. Velocities are reported in px/sec,
//! converted from the internal px/frame units.

use serde::{Deserialize, Serialize};

use crate::consts::GAME_FPS;
use crate::sim::state::GameState;

/// One append-only telemetry record, captured once per step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub step: u64,
    pub ball_x: f32,
    pub ball_y: f32,
    pub vx_px_per_sec: f32,
    pub vy_px_per_sec: f32,
    pub speed_px_per_sec: f32,
}

/// Append-only sink for speed samples.
///
/// Implementations are infallible by interface: file- or network-backed
/// sinks log and drop on error rather than propagating it into the
/// simulation.
pub trait SpeedLog {
    fn append(&mut self, sample: &SpeedSample);
}

/// In-memory sink, handy for tests and buffering drivers
#[derive(Debug, Clone, Default)]
pub struct MemorySpeedLog {
    pub samples: Vec<SpeedSample>,
}

impl SpeedLog for MemorySpeedLog {
    fn append(&mut self, sample: &SpeedSample) {
        self.samples.push(*sample);
    }
}

impl GameState {
    /// Current step's telemetry record, or `None` while logging is disabled
    pub fn telemetry_sample(&self) -> Option<SpeedSample> {
        if !self.logging {
            return None;
        }
        Some(SpeedSample {
            step: self.time_ticks,
            ball_x: self.ball.pos.x,
            ball_y: self.ball.pos.y,
            vx_px_per_sec: self.ball.vel.x * GAME_FPS,
            vy_px_per_sec: self.ball.vel.y * GAME_FPS,
            speed_px_per_sec: self.ball_speed_per_sec(),
        })
    }
}
