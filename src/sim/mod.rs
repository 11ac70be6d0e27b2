//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame stepping only
//! - Seeded RNG only (respawn velocities, LED layout)
//! - No rendering or platform dependencies
//!
//! Per-step control flow: flipper targets set from the action, flipper angles
//! updated, collisions resolved on the pre-integration position, then
//! gravity/integration/friction/clamp, stuck-ball check, drain bookkeeping.

pub mod collision;
pub mod flipper;
pub mod geometry;
pub mod state;
pub mod tick;

pub use flipper::{ActionTargets, action_targets};
pub use geometry::{point_segment_distance, reflect, rotate_deg};
pub use state::{
    Action, Ball, Bumper, Flipper, FlipperSide, FlipperStats, GameState, Layout, Led,
    RenderSnapshot,
};
pub use tick::{StepOutput, step};
