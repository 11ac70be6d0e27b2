//! Pinball Sim - a deterministic 2D pinball physics core
//!
//! Core modules:
//! - `sim`: deterministic simulation (physics, collisions, episode state)
//! - `config`: construction-time configuration with fail-fast validation
//! - `telemetry`: per-step speed samples for append-only persistence
//!
//! The crate is headless. Rendering, input polling and log-file writing are
//! collaborator concerns: a driver feeds one [`Action`] per step, reads the
//! [`StepOutput`], and draws from the read-only [`RenderSnapshot`].

pub mod config;
pub mod sim;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use sim::state::{Action, GameState, RenderSnapshot};
pub use sim::tick::{StepOutput, step};
pub use telemetry::{MemorySpeedLog, SpeedLog, SpeedSample};

/// Physics tuning constants
pub mod consts {
    /// Nominal frame rate used for px/frame <-> px/sec conversion
    pub const GAME_FPS: f32 = 60.0;
    /// Gravity added to vertical velocity each frame (px/frame^2, +y is down)
    pub const GRAVITY: f32 = 0.1;
    /// Continuous friction factor applied to velocity each frame
    pub const FRICTION: f32 = 0.995;
    /// Velocity retention on wall bounces (< 1 = energy loss)
    pub const WALL_RESTITUTION: f32 = 0.98;

    /// Flipper rotation rate in degrees per step, before the configured scale
    pub const FLIPPER_ROTATION_SPEED: f32 = 500.0;
    /// Velocity multiplier on a player-triggered flipper hit
    pub const FLIPPER_BOOST: f32 = 55.5;
    /// Hitbox extension beyond nominal flipper length (forgiving collision)
    pub const FLIPPER_HITBOX_SCALE: f32 = 1.1;
    /// Push-out distance past the ball radius after a flipper hit.
    /// Larger than just-outside so the ball cannot tunnel into or rest on
    /// the flipper segment.
    pub const FLIPPER_PUSH_OUT: f32 = 20.0;

    /// Flipper rest/active angles in degrees.
    /// Idle: left at 45 (like `\`), right at 135 (like `/`).
    /// Active: left sweeps to 0 (horizontal), right to 180.
    pub const LEFT_IDLE_ANGLE: f32 = 45.0;
    pub const RIGHT_IDLE_ANGLE: f32 = 135.0;
    pub const LEFT_ACTIVE_ANGLE: f32 = 0.0;
    pub const RIGHT_ACTIVE_ANGLE: f32 = 180.0;

    /// Bumper bounce multiplier
    pub const BUMPER_BOUNCE: f32 = 1.2;
    /// Reward for a bumper hit
    pub const BUMPER_REWARD: f32 = 10.0;
    /// Penalty for losing a ball down the drain
    pub const DRAIN_PENALTY: f32 = -10.0;

    /// Downward nudge applied when the ball is pinned at the ceiling with
    /// vertical speed below this threshold
    pub const TOP_NUDGE: f32 = 0.2;

    /// Respawn velocity range, px/frame per axis
    pub const RESPAWN_SPEED_MIN: f32 = 3.0;
    pub const RESPAWN_SPEED_MAX: f32 = 10.0;

    /// Ball stock at the start of each episode
    pub const BALLS_PER_EPISODE: u32 = 1;
}
